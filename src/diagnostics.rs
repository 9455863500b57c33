//! Unified diagnostics for the harness.
//!
//! Every failure mode of the pipeline is a variant of [`HarnessError`].
//! Nothing in the core catches or retries: the first error unwinds straight
//! out of the run loop and `main` renders it through `miette`. A single
//! failing case is enough signal to stop, so there is no partial-result
//! recovery anywhere.
//!
//! Each variant carries a stable diagnostic code (`inctest::build`,
//! `inctest::mismatch`, ...) so scripts and regression tests can match on
//! the rendered output without parsing prose.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use difference::{Changeset, Difference};
use miette::Diagnostic;
use thiserror::Error;

use crate::registry::OutputKind;

/// Unified error type for all harness failure modes.
///
/// All variants are fatal: the runner never continues past the first one.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The external builder exited non-zero.
    #[error("build failed with {status}")]
    Build { status: ExitStatus },

    /// The executable under test exited non-zero.
    #[error("executable under test exited with {status}")]
    Execution { status: ExitStatus },

    /// Captured output differs from the expected string.
    #[error(
        "test {test_id} ({expr}): output mismatch\n  expected: {expected:?}\n  actual:   {actual:?}"
    )]
    OutputMismatch {
        test_id: usize,
        expr: String,
        expected: String,
        actual: String,
    },

    /// The case's output kind has no pipeline to dispatch to.
    #[error("test {test_id} ({expr}): unsupported output kind {kind:?}")]
    InvalidTestKind {
        test_id: usize,
        expr: String,
        kind: OutputKind,
    },

    /// A sink destination could not be opened or written.
    #[error("cannot write sink at '{}'", .path.display())]
    InvalidSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The external code generator itself failed.
    #[error("code generator failed: {message}")]
    Codegen { message: String },

    /// Harness-side file or process I/O failed.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A suite file could not be parsed.
    #[error("malformed suite file '{}'", .path.display())]
    SuiteFormat {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Diagnostic for HarnessError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self {
            HarnessError::Build { .. } => "inctest::build",
            HarnessError::Execution { .. } => "inctest::exec",
            HarnessError::OutputMismatch { .. } => "inctest::mismatch",
            HarnessError::InvalidTestKind { .. } => "inctest::kind",
            HarnessError::InvalidSink { .. } => "inctest::sink",
            HarnessError::Codegen { .. } => "inctest::codegen",
            HarnessError::Io { .. } => "inctest::io",
            HarnessError::SuiteFormat { .. } => "inctest::suite",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self {
            HarnessError::OutputMismatch {
                expected, actual, ..
            } => Some(Box::new(render_diff(expected, actual))),
            HarnessError::InvalidTestKind { .. } => Some(Box::new(
                "only \"string\" cases are currently runnable".to_string(),
            )),
            _ => None,
        }
    }
}

/// Line diff of expected vs actual, used as the mismatch help text.
fn render_diff(expected: &str, actual: &str) -> String {
    let changeset = Changeset::new(expected, actual, "\n");
    let mut out = String::from("diff (expected vs actual):");
    for diff in &changeset.diffs {
        let (prefix, text) = match diff {
            Difference::Same(x) => ("  ", x),
            Difference::Add(x) => ("+ ", x),
            Difference::Rem(x) => ("- ", x),
        };
        for line in text.split('\n') {
            out.push('\n');
            out.push_str(prefix);
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_help_contains_both_sides() {
        let err = HarnessError::OutputMismatch {
            test_id: 7,
            expr: "(add 1 2)".to_string(),
            expected: "3\n".to_string(),
            actual: "4\n".to_string(),
        };
        let help = err.help().unwrap().to_string();
        assert!(help.contains("- 3"), "missing expected side: {help}");
        assert!(help.contains("+ 4"), "missing actual side: {help}");
    }

    #[test]
    fn codes_are_namespaced() {
        let err = HarnessError::Build {
            status: std::process::Command::new("false")
                .status()
                .expect("spawn false"),
        };
        assert_eq!(err.code().unwrap().to_string(), "inctest::build");
    }

    #[test]
    fn mismatch_message_names_the_case() {
        let err = HarnessError::OutputMismatch {
            test_id: 3,
            expr: "42".to_string(),
            expected: "42\n".to_string(),
            actual: "43\n".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("test 3"));
        assert!(msg.contains("42"));
    }
}
