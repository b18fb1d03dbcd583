//! Parse failures with source spans for `miette` reports.

// The miette/thiserror derives trip `unused_assignments` on some compiler
// versions only, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors raised while reading a rule file.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    /// The line is not blank, a binding, a rule header, or a recipe line.
    #[error("line {line}: malformed line `{text}`")]
    #[diagnostic(
        code(knitmake::parse::malformed_line),
        help("expected `NAME = VALUE`, `TARGET: DEPS...`, or a tab-indented recipe line")
    )]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// The offending line without its terminator.
        text: String,
        /// Whole input, for rendering.
        #[source_code]
        src: NamedSource<String>,
        /// Byte span of the offending line.
        #[label("unrecognised line")]
        span: SourceSpan,
    },

    /// A tab-indented line appeared before any rule header.
    #[error("line {line}: recipe line `{text}` has no rule to belong to")]
    #[diagnostic(
        code(knitmake::parse::dangling_recipe),
        help("declare a `TARGET: DEPS...` header before its recipe lines")
    )]
    DanglingRecipe {
        /// 1-based line number.
        line: usize,
        /// The offending line without its terminator.
        text: String,
        /// Whole input, for rendering.
        #[source_code]
        src: NamedSource<String>,
        /// Byte span of the offending line.
        #[label("no preceding rule header")]
        span: SourceSpan,
    },
}

impl ParseError {
    /// 1-based line number of the failure.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::MalformedLine { line, .. } | Self::DanglingRecipe { line, .. } => *line,
        }
    }

    /// Text of the offending line.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::MalformedLine { text, .. } | Self::DanglingRecipe { text, .. } => text,
        }
    }
}
