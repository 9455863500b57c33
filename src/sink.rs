//! Output sinks for generated code.
//!
//! The code generator is written against "the current sink" and never knows
//! whether its text is destined for the artifact file or for interactive
//! inspection on stdout. Centralizing the destinations here keeps that
//! indirection in one place and makes the generator's I/O injectable in
//! tests.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::diagnostics::HarnessError;

// ============================================================================
// OUTPUT SINKS: StdoutSink, FileSink, and test doubles
// ============================================================================

/// Destination for generated code text. `emit` writes one formatted line
/// plus a trailing newline to whatever destination the sink wraps.
pub trait OutputSink {
    fn emit(&mut self, text: &str) -> Result<(), HarnessError>;
}

/// Writes generated code to stdout, for ad hoc inspection.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) -> Result<(), HarnessError> {
        println!("{}", text);
        Ok(())
    }
}

/// Writes generated code to a file, truncating any previous contents on
/// open. Opening a destination that cannot be written is `InvalidSink`,
/// surfaced at rebind time rather than at the first emit.
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    pub fn create(path: &Path) -> Result<Self, HarnessError> {
        let file = File::create(path).map_err(|source| HarnessError::InvalidSink {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&mut self) -> Result<(), HarnessError> {
        self.file.flush().map_err(|source| HarnessError::InvalidSink {
            path: self.path.clone(),
            source,
        })
    }
}

impl OutputSink for FileSink {
    fn emit(&mut self, text: &str) -> Result<(), HarnessError> {
        writeln!(self.file, "{}", text).map_err(|source| HarnessError::InvalidSink {
            path: self.path.clone(),
            source,
        })
    }
}

/// Collects emitted lines into a String, for tests and programmatic capture.
#[derive(Default)]
pub struct BufferSink {
    buffer: String,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl OutputSink for BufferSink {
    fn emit(&mut self, text: &str) -> Result<(), HarnessError> {
        self.buffer.push_str(text);
        self.buffer.push('\n');
        Ok(())
    }
}

/// A null sink for callers that only care about side effects.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _text: &str) -> Result<(), HarnessError> {
        Ok(())
    }
}

/// Scopes the sink to the file at `path` for the duration of `f`.
///
/// The file handle is flushed and closed on every exit path, including a
/// failure raised inside `f`: harness output printed after a failed
/// compilation goes to the harness's own stdout, never to a half-written
/// artifact.
pub fn with_file_sink<T>(
    path: &Path,
    f: impl FnOnce(&mut FileSink) -> Result<T, HarnessError>,
) -> Result<T, HarnessError> {
    let mut sink = FileSink::create(path)?;
    let value = f(&mut sink)?;
    sink.flush()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_writes_lines_with_trailing_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.s");
        with_file_sink(&path, |sink| {
            sink.emit("mov rax, 42")?;
            sink.emit("ret")
        })
        .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "mov rax, 42\nret\n");
    }

    #[test]
    fn file_sink_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.s");
        std::fs::write(&path, "stale text from an earlier case\n").unwrap();
        with_file_sink(&path, |sink| sink.emit("fresh")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn failing_closure_still_leaves_a_closed_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.s");
        let result: Result<(), HarnessError> = with_file_sink(&path, |sink| {
            sink.emit("partial line")?;
            Err(HarnessError::Codegen {
                message: "generator died midway".to_string(),
            })
        });
        assert!(matches!(result, Err(HarnessError::Codegen { .. })));
        // The handle is closed; the partial artifact is readable as-is.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "partial line\n");
    }

    #[test]
    fn unwritable_destination_is_invalid_sink_at_open_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-subdir").join("out.s");
        let result = FileSink::create(&path);
        assert!(matches!(result, Err(HarnessError::InvalidSink { .. })));
    }

    #[test]
    fn buffer_sink_matches_file_semantics() {
        let mut sink = BufferSink::new();
        sink.emit("a").unwrap();
        sink.emit("b").unwrap();
        assert_eq!(sink.as_str(), "a\nb\n");
    }
}
