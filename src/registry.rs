//! Test registration: cases, suites, and the ordered registry.
//!
//! Suites are registered during a setup phase, strictly before the run
//! phase begins. The runner takes the registry by value, so the type system
//! itself forbids registration after the first run call: there is no way
//! back from `Running` to `Registering`.
//!
//! Suites can also be defined declaratively in YAML files:
//!
//! ```yaml
//! - name: literals
//!   cases:
//!     - expr: "42"
//!       expected: "42\n"
//!     - expr: "(add 1 2)"
//!       kind: string
//!       expected: "3\n"
//! ```
//!
//! `kind` defaults to `string`; it exists so that future observation modes
//! (e.g. comparing object code) have a registration surface today, even
//! though the runner rejects everything but `string`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::diagnostics::HarnessError;

/// How a case's result is observed.
///
/// Only `String` cases (compare the built executable's textual stdout) are
/// currently runnable; `Binary` is reserved and rejected by the runner at
/// dispatch time, not at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    String,
    Binary,
}

/// One (expression, expected-output) pair. Immutable once created; `expr`
/// is passed unmodified to the code generator.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub expr: String,
    #[serde(default = "OutputKind::default_kind")]
    pub kind: OutputKind,
    pub expected: String,
}

impl OutputKind {
    fn default_kind() -> Self {
        OutputKind::String
    }
}

impl TestCase {
    /// A `string`-kind case, the only kind the pipeline currently runs.
    pub fn string(expr: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            kind: OutputKind::String,
            expected: expected.into(),
        }
    }
}

/// A named, ordered group of cases sharing one registration call.
#[derive(Debug, Clone, Deserialize)]
pub struct TestSuite {
    pub name: String,
    pub cases: Vec<TestCase>,
}

/// Ordered collection of suites, populated during setup and consumed by the
/// runner.
///
/// Suites execute in registration order and cases in the order passed to
/// [`Registry::register_suite`], including when suites arrive through
/// multiple separate calls.
#[derive(Debug, Default)]
pub struct Registry {
    suites: Vec<TestSuite>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a suite. Registration performs no validation of case kinds;
    /// unsupported kinds surface when the runner reaches them.
    pub fn register_suite(&mut self, name: impl Into<String>, cases: Vec<TestCase>) {
        self.suites.push(TestSuite {
            name: name.into(),
            cases,
        });
    }

    /// Appends an already-built suite, e.g. one loaded from YAML.
    pub fn register(&mut self, suite: TestSuite) {
        self.suites.push(suite);
    }

    pub fn suites(&self) -> &[TestSuite] {
        &self.suites
    }

    /// Total case count across all suites.
    pub fn case_count(&self) -> usize {
        self.suites.iter().map(|s| s.cases.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

/// Loads suites from one YAML file.
pub fn load_suites(path: &Path) -> Result<Vec<TestSuite>, HarnessError> {
    let content = fs::read_to_string(path).map_err(|source| HarnessError::Io {
        context: format!("failed to read suite file '{}'", path.display()),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| HarnessError::SuiteFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Discovers all YAML suite files recursively under the given root.
///
/// Results are path-sorted so that a directory of suites registers in a
/// deterministic order.
pub fn discover_suite_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}
