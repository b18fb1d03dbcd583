//! Rule file parsing.
//!
//! The input is read in a single pass. Each line is one of:
//!
//! - blank or comment-only, and skipped,
//! - a tab-indented recipe line for the most recent rule header,
//! - a `NAME = VALUE` binding,
//! - a `TARGET: DEP...` rule header.
//!
//! Anything else is rejected. Recipe lines are stored raw during the pass and
//! expanded afterwards against the final binding table, so a binding declared
//! below a rule still applies to that rule's recipe.

mod error;

pub use error::ParseError;

use std::fs;

use anyhow::{Context, Result};
use camino::Utf8Path;
use miette::{NamedSource, SourceSpan};
use tracing::debug;

use crate::ast::{Makefile, Rule};
use crate::substitute::expand;

/// Name used in diagnostics when the input has no file name.
const DEFAULT_SOURCE_NAME: &str = "Makefile";

/// One classified input line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Recipe(&'a str),
    Binding { name: String, value: String },
    Header { target: String, dependencies: Vec<String> },
}

/// Remove a trailing comment, keeping `\#` as a literal `#`.
fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'#') => {
                out.push('#');
                chars.next();
            }
            '#' => break,
            other => out.push(other),
        }
    }
    out
}

fn parse_binding(text: &str) -> Option<Line<'static>> {
    let (name, value) = text.split_once(" = ")?;
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some(Line::Binding {
        name: name.to_owned(),
        value: value.trim().to_owned(),
    })
}

fn parse_header(text: &str) -> Option<Line<'static>> {
    if text.matches(':').count() != 1 {
        return None;
    }
    let (target, deps) = text.split_once(':')?;
    let target_name = target.trim();
    if target_name.is_empty() || target_name.contains(char::is_whitespace) {
        return None;
    }
    Some(Line::Header {
        target: target_name.to_owned(),
        dependencies: deps.split_whitespace().map(str::to_owned).collect(),
    })
}

fn classify(raw: &str) -> Option<Line<'_>> {
    let stripped = strip_comment(raw);
    if stripped.trim().is_empty() {
        return Some(Line::Blank);
    }
    if raw.starts_with('\t') {
        return Some(Line::Recipe(raw.trim()));
    }
    parse_binding(&stripped).or_else(|| parse_header(&stripped))
}

/// Iterate lines with their byte offset, dropping `\n` or `\r\n`.
fn lines_with_offsets(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .split_inclusive('\n')
        .scan(0usize, |offset, segment| {
            let start = *offset;
            *offset += segment.len();
            let without_newline = segment.strip_suffix('\n').unwrap_or(segment);
            let text = without_newline.strip_suffix('\r').unwrap_or(without_newline);
            Some((start, text))
        })
}

/// Parse a rule file held in memory.
///
/// # Errors
///
/// Returns [`ParseError`] when a line is malformed or a recipe line precedes
/// every rule header.
///
/// ```rust
/// let makefile = knitmake::parser::from_str("V = 1\nout: in\n\techo $(V) $@\n")
///     .expect("parse");
/// let rule = makefile.rule("out").expect("rule");
/// assert_eq!(rule.recipe, vec!["echo 1 out".to_owned()]);
/// ```
pub fn from_str(source: &str) -> Result<Makefile, ParseError> {
    from_str_named(source, DEFAULT_SOURCE_NAME)
}

/// Parse a rule file, labelling diagnostics with `name`.
///
/// # Errors
///
/// See [`from_str`].
pub fn from_str_named(source: &str, name: &str) -> Result<Makefile, ParseError> {
    let mut makefile = Makefile::default();
    let mut current: Option<usize> = None;

    for (idx, (offset, raw)) in lines_with_offsets(source).enumerate() {
        let line_no = idx + 1;
        let span = SourceSpan::from((offset, raw.len()));
        match classify(raw) {
            Some(Line::Blank) => {}
            Some(Line::Recipe(text)) => {
                let rule = current
                    .and_then(|handle| makefile.rules.get_index_mut(handle))
                    .map(|(_, rule)| rule)
                    .ok_or_else(|| ParseError::DanglingRecipe {
                        line: line_no,
                        text: raw.to_owned(),
                        src: NamedSource::new(name, source.to_owned()),
                        span,
                    })?;
                rule.recipe.push(text.to_owned());
            }
            Some(Line::Binding { name: var, value }) => {
                makefile.bindings.insert(var, value);
            }
            Some(Line::Header {
                target,
                dependencies,
            }) => {
                if makefile.has_rule(&target) {
                    debug!(%target, line = line_no, "rule redeclared; replacing earlier rule");
                }
                current = Some(makefile.insert_rule(Rule::new(target, dependencies)));
            }
            None => {
                return Err(ParseError::MalformedLine {
                    line: line_no,
                    text: raw.to_owned(),
                    src: NamedSource::new(name, source.to_owned()),
                    span,
                });
            }
        }
    }

    expand_recipes(&mut makefile);
    debug!(
        rules = makefile.rules.len(),
        bindings = makefile.bindings.len(),
        "parsed rule file"
    );
    Ok(makefile)
}

/// Expand every recipe line against the final binding snapshot.
fn expand_recipes(makefile: &mut Makefile) {
    let Makefile { rules, bindings } = makefile;
    for rule in rules.values_mut() {
        let raw = std::mem::take(&mut rule.recipe);
        let expanded = raw.iter().map(|line| expand(line, rule, bindings)).collect();
        rule.recipe = expanded;
    }
}

/// Load and parse the rule file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse.
pub fn from_path(path: impl AsRef<Utf8Path>) -> Result<Makefile> {
    let path_ref = path.as_ref();
    let data = fs::read_to_string(path_ref).with_context(|| format!("failed to read {path_ref}"))?;
    Ok(from_str_named(&data, path_ref.as_str())?)
}
