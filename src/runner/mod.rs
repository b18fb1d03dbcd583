//! CLI execution logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! reads the rule file, builds the plan, and writes it out. The plan is
//! rendered completely in memory first, so a failure never leaves a partial
//! plan on the output.

mod error;

pub use error::RunnerError;

use crate::ast::Makefile;
use crate::cli::Cli;
use crate::ir::{Plan, PlanOptions};
use crate::{parser, plan_gen};
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::{self, Write};
use tracing::{Level, debug, enabled, info};

/// Execute the translation described by `cli`.
///
/// # Errors
///
/// Returns an error if the rule file cannot be read or translated, or the
/// plan cannot be written.
pub fn run(cli: &Cli) -> Result<()> {
    let plan = generate_plan(cli)?;
    match cli.output_file() {
        Some(path) => write_and_log(path, &plan),
        None => write_stdout(&plan),
    }
}

/// Translate the rule file referenced by `cli` into knit text.
///
/// # Errors
///
/// Returns an error if the rule file is missing, fails to parse, or cannot be
/// turned into a plan for the requested target.
pub fn generate_plan(cli: &Cli) -> Result<String> {
    let path = cli.file.as_path();
    if !path.is_file() {
        return Err(RunnerError::RuleFileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    parser::from_path(path)
        .and_then(|makefile| render_plan(&makefile, &cli.target, &cli.plan_options()))
        .with_context(|| format!("translating {path} for target `{}`", cli.target))
}

/// Translate rule file text into knit text for `target`.
///
/// `name` labels parse diagnostics.
///
/// # Errors
///
/// Returns an error if parsing or plan construction fails.
///
/// ```rust
/// use knitmake::ir::PlanOptions;
/// let plan = knitmake::runner::translate("a:\n\ttouch a\n", "Makefile", "a", &PlanOptions::default())
///     .expect("translate");
/// assert!(plan.starts_with("step _params: params\nstep rule@a: cmd"));
/// ```
pub fn translate(source: &str, name: &str, target: &str, options: &PlanOptions) -> Result<String> {
    let makefile = parser::from_str_named(source, name)?;
    render_plan(&makefile, target, options)
}

fn render_plan(makefile: &Makefile, target: &str, options: &PlanOptions) -> Result<String> {
    if enabled!(Level::DEBUG) {
        let json = serde_json::to_string_pretty(makefile).context("serialising rule graph")?;
        debug!("rule graph:\n{json}");
    }
    let plan = Plan::from_makefile(makefile, target, options)?;
    debug!(steps = plan.steps.len(), "built plan");
    Ok(plan_gen::generate(&plan))
}

/// Write `content` to `path` and log the file's location.
fn write_and_log(path: &Utf8Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("failed to write plan to {path}"))?;
    info!("Generated plan at {path}");
    Ok(())
}

fn write_stdout(content: &str) -> Result<()> {
    let mut handle = io::stdout().lock();
    handle
        .write_all(content.as_bytes())
        .and_then(|()| handle.flush())
        .context("failed to write plan to standard output")
}

#[cfg(test)]
mod tests;
