//! The code-generator seam.
//!
//! The compiler under test is an external collaborator consumed through a
//! narrow interface: given a source-level expression and the currently bound
//! output sink, write generated target-code text to that sink. The harness
//! never interprets the generated text; it only ever observes the built
//! executable's runtime output.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::diagnostics::HarnessError;
use crate::sink::OutputSink;

/// A code generator: writes target code for `expr` to the sink, one line
/// per emitted unit. Failures propagate unchanged through the compilation
/// stage.
pub trait Codegen {
    fn emit(&self, expr: &str, sink: &mut dyn OutputSink) -> Result<(), HarnessError>;
}

/// Generic adapter for an external generator command.
///
/// The command receives the expression on stdin (with a trailing newline)
/// and must write generated code to stdout; every stdout line is emitted to
/// the sink. Stderr is inherited so compiler diagnostics stay visible.
#[derive(Debug, Clone)]
pub struct CommandCodegen {
    program: String,
    args: Vec<String>,
}

impl CommandCodegen {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl Codegen for CommandCodegen {
    fn emit(&self, expr: &str, sink: &mut dyn OutputSink) -> Result<(), HarnessError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| HarnessError::Codegen {
                message: format!("could not start '{}': {}", self.program, e),
            })?;

        {
            let stdin = child.stdin.as_mut().ok_or_else(|| HarnessError::Codegen {
                message: format!("'{}' has no stdin", self.program),
            })?;
            stdin
                .write_all(expr.as_bytes())
                .and_then(|_| stdin.write_all(b"\n"))
                .map_err(|e| HarnessError::Codegen {
                    message: format!("could not write to '{}': {}", self.program, e),
                })?;
        }

        // wait_with_output drops stdin, signalling EOF to the generator.
        let output = child.wait_with_output().map_err(|source| HarnessError::Io {
            context: format!("failed waiting for '{}'", self.program),
            source,
        })?;
        if !output.status.success() {
            return Err(HarnessError::Codegen {
                message: format!("'{}' exited with {}", self.program, output.status),
            });
        }

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            sink.emit(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{BufferSink, NullSink};

    #[test]
    fn command_codegen_pipes_expression_through() {
        let gen = CommandCodegen::new("cat");
        let mut sink = BufferSink::new();
        gen.emit("mov rax, 42", &mut sink).unwrap();
        assert_eq!(sink.as_str(), "mov rax, 42\n");
    }

    #[test]
    fn generator_failure_surfaces_as_codegen_error() {
        let gen = CommandCodegen::new("sh").arg("-c").arg("exit 2");
        let result = gen.emit("anything", &mut NullSink);
        assert!(matches!(result, Err(HarnessError::Codegen { .. })));
    }

    #[test]
    fn missing_generator_program_is_a_codegen_error() {
        let gen = CommandCodegen::new("definitely-not-a-real-compiler");
        let result = gen.emit("42", &mut NullSink);
        assert!(matches!(result, Err(HarnessError::Codegen { .. })));
    }
}
