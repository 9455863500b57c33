//! Harness configuration.

use std::path::{Path, PathBuf};

/// Paths, build command, and reporting options for one harness run.
///
/// The artifact, executable, and capture paths are fixed per configuration,
/// not derived per test: every case truncates and rewrites the same three
/// files, and each case's files are fully consumed before the next case
/// compiles. Overlapping runs against one working directory are therefore
/// unsupported.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory the build and execution stages run in. The builder is
    /// expected to locate the artifact file itself by this convention.
    pub workdir: PathBuf,
    /// Generated-code artifact written by the compilation stage.
    pub artifact: PathBuf,
    /// Executable produced by the builder.
    pub executable: PathBuf,
    /// File the executable's stdout is redirected to.
    pub capture: PathBuf,
    /// Builder program, invoked as a child process with inherited stdio.
    pub build_program: String,
    /// Arguments for the builder program.
    pub build_args: Vec<String>,
    pub use_colors: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            artifact: PathBuf::from("test.s"),
            executable: PathBuf::from("./test-bin"),
            capture: PathBuf::from("test.out"),
            build_program: "make".to_string(),
            build_args: Vec::new(),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl HarnessConfig {
    /// Roots all pipeline paths in `dir`, keeping the file-name conventions.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            workdir: dir.to_path_buf(),
            artifact: dir.join("test.s"),
            executable: dir.join("test-bin"),
            capture: dir.join("test.out"),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_keeps_file_name_conventions() {
        let cfg = HarnessConfig::in_dir(Path::new("/tmp/work"));
        assert_eq!(cfg.workdir, Path::new("/tmp/work"));
        assert_eq!(cfg.artifact, Path::new("/tmp/work/test.s"));
        assert_eq!(cfg.executable, Path::new("/tmp/work/test-bin"));
        assert_eq!(cfg.capture, Path::new("/tmp/work/test.out"));
        assert_eq!(cfg.build_program, "make");
    }
}
