//! Sequential runner and reporter.
//!
//! Walks the registry in registration order, one case at a time, and halts
//! the entire run on the first failure of any kind. The failing error is not
//! caught here; it unwinds to the caller, which terminates the process.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::codegen::Codegen;
use crate::config::HarnessConfig;
use crate::diagnostics::HarnessError;
use crate::pipeline;
use crate::registry::{Registry, TestCase};

fn color_choice(cfg: &HarnessConfig) -> ColorChoice {
    if cfg.use_colors {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Runs every suite in registration order, maintaining a single global
/// counter across all suites.
///
/// Consuming the registry is the phase transition: once a run begins there
/// is no way back to registration. Returns the total number of executed
/// cases on full success.
pub fn run_all(
    registry: Registry,
    cfg: &HarnessConfig,
    gen: &dyn Codegen,
) -> Result<usize, HarnessError> {
    let mut stdout = StandardStream::stdout(color_choice(cfg));
    let mut test_id = 0usize;

    for suite in registry.suites() {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        println!("--- Suite: {} ---", suite.name);
        let _ = stdout.reset();

        for case in &suite.cases {
            test_id += 1;
            run_reported(cfg, gen, test_id, case, &mut stdout)?;
        }
    }

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    println!("Passed all {} tests", test_id);
    let _ = stdout.reset();
    Ok(test_id)
}

/// Runs a single case in isolation with the same progress output as the
/// full run. Useful when debugging one failing test.
pub fn run_one(
    cfg: &HarnessConfig,
    gen: &dyn Codegen,
    test_id: usize,
    case: &TestCase,
) -> Result<(), HarnessError> {
    let mut stdout = StandardStream::stdout(color_choice(cfg));
    run_reported(cfg, gen, test_id, case, &mut stdout)
}

fn run_reported(
    cfg: &HarnessConfig,
    gen: &dyn Codegen,
    test_id: usize,
    case: &TestCase,
    stdout: &mut StandardStream,
) -> Result<(), HarnessError> {
    // The progress line is flushed before the pipeline runs so a hung or
    // crashed stage still shows which case it belonged to.
    print!("Test {}: {} ...", test_id, case.expr);
    let _ = io::stdout().flush();

    pipeline::run_case(cfg, gen, test_id, case)?;

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
    println!(" ok");
    let _ = stdout.reset();
    Ok(())
}
