//! Error types for the runner module.

// The miette/thiserror derives trip `unused_assignments` on some compiler
// versions only, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while running a translation.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The rule file does not exist at the given path.
    #[error("rule file not found: {path}")]
    #[diagnostic(
        code(knitmake::runner::rule_file_not_found),
        help("pass the path of an existing Makefile as the first argument")
    )]
    RuleFileNotFound {
        /// The path that was attempted.
        path: Utf8PathBuf,
    },
}
