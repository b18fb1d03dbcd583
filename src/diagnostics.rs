//! Diagnostics utilities.
//!
//! Renders a failed translation for the terminal. Errors that carry a
//! [`miette::Diagnostic`] with source code are drawn with the offending line
//! highlighted; everything else falls back to the `anyhow` context chain.
//!
//! # Examples
//! ```rust
//! use knitmake::diagnostics::render_error;
//!
//! let err = knitmake::parser::from_str("\techo orphan\n").expect_err("dangling");
//! let rendered = render_error(&anyhow::Error::from(err));
//! assert!(rendered.contains("no rule to belong to"));
//! ```

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

use crate::ir::PlanError;
use crate::parser::ParseError;
use crate::runner::RunnerError;

fn as_diagnostic(err: &anyhow::Error) -> Option<&(dyn Diagnostic + 'static)> {
    if let Some(diag) = err.downcast_ref::<ParseError>() {
        return Some(diag);
    }
    if let Some(diag) = err.downcast_ref::<PlanError>() {
        return Some(diag);
    }
    err.downcast_ref::<RunnerError>()
        .map(|diag| diag as &(dyn Diagnostic + 'static))
}

/// Render `err` for display on standard error.
#[must_use]
pub fn render_error(err: &anyhow::Error) -> String {
    let context = format!("{err:#}");
    let Some(diag) = as_diagnostic(err) else {
        return context;
    };
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut report = String::new();
    match handler.render_report(&mut report, diag) {
        Ok(()) => format!("{context}\n{report}"),
        Err(_) => context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn parse_errors_show_code_and_context() {
        let err = crate::parser::from_str("out: in\nnot valid\n").expect_err("malformed");
        let wrapped = Err::<(), _>(err)
            .context("translating Makefile")
            .expect_err("wrapped");
        let rendered = render_error(&wrapped);
        assert!(rendered.starts_with("translating Makefile: line 2"));
        assert!(rendered.contains("knitmake::parse::malformed_line"));
    }

    #[test]
    fn plain_errors_use_context_chain() {
        let err = anyhow::anyhow!("disk full").context("writing plan");
        assert_eq!(render_error(&err), "writing plan: disk full");
    }
}
