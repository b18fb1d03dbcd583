//! Step identifiers.
//!
//! knit does not allow `/` in step names, so target paths are escaped: `@`
//! becomes `@@` and `/` becomes `@_`. Every `@` in an escaped path is
//! followed by `@` or `_`, which keeps the mapping injective and keeps plain
//! ids apart from the `@plan` and `@flow` helper steps of a delegate.

/// Identifier of the parameters collector step.
pub const PARAMS_STEP_ID: &str = "_params";

const NAMESPACE: &str = "rule@";

/// Helper steps emitted alongside a delegating rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperStep {
    /// Produces the nested plan text.
    Plan,
    /// Runs the nested plan.
    Flow,
}

impl HelperStep {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Plan => "@plan",
            Self::Flow => "@flow",
        }
    }
}

/// Map a target path to its step identifier.
///
/// ```rust
/// use knitmake::ir::ident::step_id;
/// assert_eq!(step_id("out"), "rule@out");
/// assert_eq!(step_id("build/a.o"), "rule@build@_a.o");
/// assert_ne!(step_id("a@_b"), step_id("a/b"));
/// ```
#[must_use]
pub fn step_id(target: &str) -> String {
    let mut id = String::with_capacity(NAMESPACE.len() + target.len());
    id.push_str(NAMESPACE);
    for ch in target.chars() {
        match ch {
            '@' => id.push_str("@@"),
            '/' => id.push_str("@_"),
            other => id.push(other),
        }
    }
    id
}

/// Identifier of a delegate helper step for `target`.
///
/// ```rust
/// use knitmake::ir::ident::{helper_step_id, HelperStep};
/// assert_eq!(helper_step_id("lib", HelperStep::Flow), "rule@lib@flow");
/// ```
#[must_use]
pub fn helper_step_id(target: &str, helper: HelperStep) -> String {
    let mut id = step_id(target);
    id.push_str(helper.suffix());
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("out", "rule@out")]
    #[case("a/b/c", "rule@a@_b@_c")]
    #[case("sub/_params/", "rule@sub@__params@_")]
    #[case("mail@host", "rule@mail@@host")]
    fn escapes_targets(#[case] target: &str, #[case] expected: &str) {
        assert_eq!(step_id(target), expected);
    }

    #[rstest]
    #[case("a@_b", "a/b")]
    #[case("a@", "a/")]
    #[case("x@plan", "x")]
    fn distinct_targets_do_not_collide(#[case] left: &str, #[case] right: &str) {
        assert_ne!(step_id(left), step_id(right));
        assert_ne!(step_id(left), helper_step_id(right, HelperStep::Plan));
    }
}
