//! Recipe line expansion.
//!
//! Expansion is textual macro replacement, not template evaluation. Each
//! pattern is replaced across the whole line in a fixed order and the result
//! is never scanned again, so a binding whose value contains `$(OTHER)` is
//! only expanded further when `OTHER` comes later in the binding table.

use crate::ast::{Bindings, Rule};

/// Expand automatic variables and bindings in a single recipe line.
///
/// Replacement order:
///
/// 1. `$<` with the first dependency (empty when there is none),
/// 2. `$^` with all dependencies joined by spaces,
/// 3. `$@` with the target,
/// 4. `$(NAME)` with its value, for each binding in table order.
///
/// `$` cannot be escaped and unknown `$(...)` references are left as written.
///
/// ```rust
/// use knitmake::ast::{Bindings, Rule};
/// use knitmake::substitute::expand;
///
/// let mut bindings = Bindings::default();
/// bindings.insert("V", "hi");
/// let rule = Rule::new("out", vec!["a".into(), "b".into()]);
/// assert_eq!(expand("echo $@ $^ $(V)", &rule, &bindings), "echo out a b hi");
/// ```
#[must_use]
pub fn expand(line: &str, rule: &Rule, bindings: &Bindings) -> String {
    let first = rule.dependencies.first().map_or("", String::as_str);
    let all = rule.dependencies.join(" ");
    let automatic = line
        .replace("$<", first)
        .replace("$^", &all)
        .replace("$@", &rule.target);
    bindings
        .iter()
        .fold(automatic, |acc, (name, value)| {
            acc.replace(&format!("$({name})"), value)
        })
}
