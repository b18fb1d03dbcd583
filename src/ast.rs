//! Rule graph structures for a parsed Makefile.
//!
//! These types hold the result of [`crate::parser`]: every rule keyed by its
//! target, and the binding table used to expand recipe lines. Both maps keep
//! insertion order so that anything iterating them produces the same output on
//! every run.
//!
//! ```rust
//! use knitmake::ast::{Makefile, Rule};
//!
//! let mut makefile = Makefile::default();
//! makefile.insert_rule(Rule::new("out", vec!["in".into()]));
//! assert!(makefile.rule("out").is_some());
//! assert!(makefile.rule("in").is_none());
//! ```

use indexmap::IndexMap;
use serde::Serialize;

/// Dependency prefix that refers to an externally supplied plan parameter.
pub const PARAMS_PREFIX: &str = "_params/";

/// Final path segment naming a parameters pseudo-target, e.g. `sub/_params/`.
pub const PARAMS_MARKER: &str = "_params/";

/// Ordered `NAME = VALUE` bindings.
///
/// Redefining a name replaces its value but keeps its original position, so
/// substitution order follows first declaration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bindings(IndexMap<String, String>);

impl Bindings {
    /// Bind `name` to `value`, overwriting any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate bindings in substitution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no binding has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A target, its prerequisites, and its recipe lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Target path produced by the recipe.
    pub target: String,
    /// Prerequisites in declaration order.
    pub dependencies: Vec<String>,
    /// Recipe lines. Raw while parsing, expanded once parsing completes.
    pub recipe: Vec<String>,
}

impl Rule {
    /// Create a rule with no recipe lines yet.
    #[must_use]
    pub fn new(target: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self {
            target: target.into(),
            dependencies,
            recipe: Vec::new(),
        }
    }

    /// Whether this rule declares plan parameters rather than a build step.
    ///
    /// ```rust
    /// use knitmake::ast::Rule;
    /// assert!(Rule::new("sub/_params/", vec![]).is_params_target());
    /// assert!(!Rule::new("sub/params", vec![]).is_params_target());
    /// ```
    #[must_use]
    pub fn is_params_target(&self) -> bool {
        is_params_target(&self.target)
    }
}

/// Whether `target` names a parameters pseudo-target.
#[must_use]
pub fn is_params_target(target: &str) -> bool {
    target == PARAMS_MARKER
        || target
            .strip_suffix(PARAMS_MARKER)
            .is_some_and(|dir| dir.ends_with('/'))
}

/// The parameter name referenced by a `_params/NAME` dependency.
///
/// ```rust
/// use knitmake::ast::param_name;
/// assert_eq!(param_name("_params/version"), Some("version"));
/// assert_eq!(param_name("src/main.c"), None);
/// ```
#[must_use]
pub fn param_name(dependency: &str) -> Option<&str> {
    dependency.strip_prefix(PARAMS_PREFIX)
}

/// A parsed rule file: every rule keyed by target plus the binding snapshot.
///
/// The rule map doubles as an arena; [`Makefile::handle`] returns the stable
/// index of a rule, which graph traversal uses in place of target strings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Makefile {
    /// Rules in first-declaration order.
    pub rules: IndexMap<String, Rule>,
    /// Bindings as they stood once the whole file was read.
    pub bindings: Bindings,
}

impl Makefile {
    /// Insert `rule`, replacing any earlier rule with the same target.
    ///
    /// Returns the handle of the inserted rule.
    pub fn insert_rule(&mut self, rule: Rule) -> usize {
        self.rules.insert_full(rule.target.clone(), rule).0
    }

    /// Look up the rule producing `target`.
    #[must_use]
    pub fn rule(&self, target: &str) -> Option<&Rule> {
        self.rules.get(target)
    }

    /// Handle of the rule producing `target`.
    #[must_use]
    pub fn handle(&self, target: &str) -> Option<usize> {
        self.rules.get_index_of(target)
    }

    /// Rule stored under `handle`.
    #[must_use]
    pub fn rule_at(&self, handle: usize) -> Option<&Rule> {
        self.rules.get_index(handle).map(|(_, rule)| rule)
    }

    /// Whether `name` is produced by a rule rather than being a leaf.
    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("_params/", true)]
    #[case("sub/_params/", true)]
    #[case("a/b/_params/", true)]
    #[case("sub_params/", false)]
    #[case("sub/_params", false)]
    #[case("_params/name", false)]
    fn recognises_params_targets(#[case] target: &str, #[case] expected: bool) {
        assert_eq!(is_params_target(target), expected);
    }

    #[rstest]
    fn binding_overwrite_keeps_position() {
        let mut bindings = Bindings::default();
        bindings.insert("A", "1");
        bindings.insert("B", "2");
        bindings.insert("A", "3");
        let seen: Vec<_> = bindings.iter().collect();
        assert_eq!(seen, vec![("A", "3"), ("B", "2")]);
    }

    #[rstest]
    fn redeclared_rule_keeps_handle() {
        let mut makefile = Makefile::default();
        let first = makefile.insert_rule(Rule::new("a", vec!["x".into()]));
        makefile.insert_rule(Rule::new("b", Vec::new()));
        let again = makefile.insert_rule(Rule::new("a", vec!["y".into()]));
        assert_eq!(first, again);
        let rule = makefile.rule("a").expect("rule a");
        assert_eq!(rule.dependencies, vec!["y".to_owned()]);
    }
}
