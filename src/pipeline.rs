//! The compile → build → execute → compare pipeline.
//!
//! Each stage is a blocking call; the harness suspends until the external
//! process or generator returns. There is no timeout: a hung build or a
//! non-terminating executable hangs the whole run.

use std::fs;
use std::process::{Command, Stdio};

use crate::codegen::Codegen;
use crate::config::HarnessConfig;
use crate::diagnostics::HarnessError;
use crate::registry::{OutputKind, TestCase};
use crate::sink::with_file_sink;

/// Compilation stage: writes generated code for `expr` to the artifact file.
///
/// The sink is scoped to the artifact for the dynamic extent of the
/// generator call; the handle closes on every exit path, and generator
/// failures propagate unchanged. This stage adds no error semantics of its
/// own.
pub fn compile_program(
    cfg: &HarnessConfig,
    gen: &dyn Codegen,
    expr: &str,
) -> Result<(), HarnessError> {
    with_file_sink(&cfg.artifact, |sink| gen.emit(expr, sink))
}

/// Build stage: runs the external builder, inheriting the harness's own
/// stdio, and gates progression to execution on a zero exit status.
pub fn build(cfg: &HarnessConfig) -> Result<(), HarnessError> {
    let status = Command::new(&cfg.build_program)
        .args(&cfg.build_args)
        .current_dir(&cfg.workdir)
        .status()
        .map_err(|source| HarnessError::Io {
            context: format!("could not run builder '{}'", cfg.build_program),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(HarnessError::Build { status })
    }
}

/// Execution stage: runs the built executable with stdout redirected to the
/// capture file (truncated first). Stderr is left alone, and the harness
/// blocks until the process exits.
pub fn execute(cfg: &HarnessConfig) -> Result<(), HarnessError> {
    let capture = fs::File::create(&cfg.capture).map_err(|source| HarnessError::InvalidSink {
        path: cfg.capture.clone(),
        source,
    })?;
    let status = Command::new(&cfg.executable)
        .current_dir(&cfg.workdir)
        .stdout(Stdio::from(capture))
        .status()
        .map_err(|source| HarnessError::Io {
            context: format!("could not run '{}'", cfg.executable.display()),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(HarnessError::Execution { status })
    }
}

/// Reads the capture file verbatim: every byte, embedded newlines and
/// control characters included, with no trimming or normalization.
pub fn read_captured(cfg: &HarnessConfig) -> Result<String, HarnessError> {
    fs::read_to_string(&cfg.capture).map_err(|source| HarnessError::Io {
        context: format!("failed to read capture file '{}'", cfg.capture.display()),
        source,
    })
}

/// Exact string equality; anything else is a mismatch. No
/// whitespace-insensitive or numeric-tolerant modes exist.
pub fn compare(
    test_id: usize,
    expr: &str,
    expected: &str,
    actual: &str,
) -> Result<(), HarnessError> {
    if expected == actual {
        Ok(())
    } else {
        Err(HarnessError::OutputMismatch {
            test_id,
            expr: expr.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Drives one case through the full pipeline for its output kind.
///
/// Unrecognized kinds fail before compilation is invoked.
pub fn run_case(
    cfg: &HarnessConfig,
    gen: &dyn Codegen,
    test_id: usize,
    case: &TestCase,
) -> Result<(), HarnessError> {
    match case.kind {
        OutputKind::String => {
            compile_program(cfg, gen, &case.expr)?;
            build(cfg)?;
            execute(cfg)?;
            let actual = read_captured(cfg)?;
            compare(test_id, &case.expr, &case.expected, &actual)
        }
        kind => Err(HarnessError::InvalidTestKind {
            test_id,
            expr: case.expr.clone(),
            kind,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_is_byte_for_byte() {
        assert!(compare(1, "x", "42\n", "42\n").is_ok());
        // Trailing whitespace is significant.
        assert!(matches!(
            compare(1, "x", "42", "42\n"),
            Err(HarnessError::OutputMismatch { .. })
        ));
        // Control characters are preserved and compared.
        assert!(compare(1, "x", "a\tb\0c", "a\tb\0c").is_ok());
    }

    #[test]
    fn mismatch_carries_the_case_identity() {
        let err = compare(9, "(sub 5 2)", "3\n", "2\n").unwrap_err();
        match err {
            HarnessError::OutputMismatch {
                test_id,
                expr,
                expected,
                actual,
            } => {
                assert_eq!(test_id, 9);
                assert_eq!(expr, "(sub 5 2)");
                assert_eq!(expected, "3\n");
                assert_eq!(actual, "2\n");
            }
            other => panic!("expected OutputMismatch, got {other:?}"),
        }
    }
}
