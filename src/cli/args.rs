//! Defines the command-line arguments and subcommands for the harness CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "inctest",
    version,
    about = "Test harness for an incremental, code-generating compiler."
)]
pub struct HarnessArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every registered suite from a YAML file or directory.
    Run {
        /// A suite file, or a directory searched recursively for .yaml/.yml
        /// suite files.
        #[arg(required = true)]
        suites: PathBuf,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Run a single ad hoc case through the full pipeline.
    One {
        /// Numeric id to report the case under.
        #[arg(long, default_value_t = 1)]
        id: usize,
        /// The source expression to compile.
        expr: String,
        /// Expected stdout of the built executable, verbatim.
        expected: String,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Print generated code for an expression to stdout instead of the
    /// artifact file.
    Emit {
        /// The source expression to compile.
        expr: String,
        /// External generator command; receives the expression on stdin.
        #[arg(long)]
        compiler: String,
    },
}

/// Options shared by the pipeline-driving subcommands.
#[derive(Debug, Args)]
pub struct PipelineArgs {
    /// External generator command; receives the expression on stdin and
    /// writes generated code to stdout.
    #[arg(long)]
    pub compiler: String,
    /// Builder command, run through `sh -c`. Defaults to `make`.
    #[arg(long)]
    pub build: Option<String>,
    /// Working directory for the build and execution stages.
    #[arg(long)]
    pub workdir: Option<PathBuf>,
}
