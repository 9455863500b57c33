//! The harness command-line interface.
//!
//! This module is the entry point for all CLI commands and orchestrates the
//! core library functions.

use std::path::Path;

use clap::Parser;

use crate::cli::args::{Command, HarnessArgs, PipelineArgs};
use crate::codegen::{Codegen, CommandCodegen};
use crate::config::HarnessConfig;
use crate::diagnostics::HarnessError;
use crate::registry::{self, Registry, TestCase};
use crate::runner;
use crate::sink::StdoutSink;

pub mod args;

/// The main entry point for the CLI.
pub fn run() -> miette::Result<()> {
    let args = HarnessArgs::parse();

    match args.command {
        Command::Run { suites, pipeline } => handle_run(&suites, &pipeline)?,
        Command::One {
            id,
            expr,
            expected,
            pipeline,
        } => handle_one(id, expr, expected, &pipeline)?,
        Command::Emit { expr, compiler } => handle_emit(&expr, &compiler)?,
    }
    Ok(())
}

fn config_from(args: &PipelineArgs) -> HarnessConfig {
    let mut cfg = match &args.workdir {
        Some(dir) => HarnessConfig::in_dir(dir),
        None => HarnessConfig::default(),
    };
    if let Some(build) = &args.build {
        cfg.build_program = "sh".to_string();
        cfg.build_args = vec!["-c".to_string(), build.clone()];
    }
    cfg
}

/// Handles the `run` subcommand: registers every suite, then runs the
/// frozen registry front to back.
fn handle_run(suites_path: &Path, args: &PipelineArgs) -> Result<(), HarnessError> {
    let mut registry = Registry::new();
    if suites_path.is_dir() {
        for file in registry::discover_suite_files(suites_path) {
            for suite in registry::load_suites(&file)? {
                registry.register(suite);
            }
        }
    } else {
        for suite in registry::load_suites(suites_path)? {
            registry.register(suite);
        }
    }

    let cfg = config_from(args);
    let gen = CommandCodegen::new(&args.compiler);
    runner::run_all(registry, &cfg, &gen)?;
    Ok(())
}

/// Handles the `one` subcommand: a single ad hoc case for isolated
/// debugging.
fn handle_one(
    id: usize,
    expr: String,
    expected: String,
    args: &PipelineArgs,
) -> Result<(), HarnessError> {
    let cfg = config_from(args);
    let gen = CommandCodegen::new(&args.compiler);
    let case = TestCase::string(expr, expected);
    runner::run_one(&cfg, &gen, id, &case)
}

/// Handles the `emit` subcommand: same generator, sink bound to stdout.
fn handle_emit(expr: &str, compiler: &str) -> Result<(), HarnessError> {
    CommandCodegen::new(compiler).emit(expr, &mut StdoutSink)
}
