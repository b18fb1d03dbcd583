//! Errors raised while turning a rule graph into a plan.

// The miette/thiserror derives trip `unused_assignments` on some compiler
// versions only, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

/// Failures while classifying or ordering rules.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum PlanError {
    /// The requested target has no rule.
    #[error("no rule to make target `{target}`")]
    #[diagnostic(code(knitmake::plan::unknown_target))]
    UnknownTarget {
        /// Requested target name.
        target: String,
    },

    /// A delegating rule depends on something other than its subdirectory's
    /// parameters pseudo-target.
    #[error(
        "rule `{target}` delegates to a subdirectory and may only depend on `{expected}`, found [{}]",
        .found.join(", ")
    )]
    #[diagnostic(
        code(knitmake::plan::invalid_delegate_shape),
        help("declare forwarded parameters as dependencies of `{expected}`")
    )]
    InvalidDelegateShape {
        /// The delegating rule.
        target: String,
        /// The only dependency a delegating rule may declare.
        expected: String,
        /// The dependencies actually declared.
        found: Vec<String>,
    },

    /// A rule other than a delegate reads a parameters pseudo-target, which
    /// emits no step.
    #[error("rule `{target}` depends on parameters target `{dependency}`, which produces no output")]
    #[diagnostic(
        code(knitmake::plan::params_dependency),
        help("only a `$(MAKE) -C DIR TARGET` rule may depend on `DIR/_params/`")
    )]
    ParamsDependency {
        /// The rule declaring the dependency.
        target: String,
        /// The parameters pseudo-target it depends on.
        dependency: String,
    },

    /// No step pattern matches the rule.
    #[error(
        "rule `{target}` has {recipe_lines} recipe line(s) and {dependencies} dependency(ies), which no step pattern supports"
    )]
    #[diagnostic(
        code(knitmake::plan::unsupported_rule_shape),
        help("use one recipe line, or no recipe line and exactly one dependency")
    )]
    UnsupportedRuleShape {
        /// The offending rule.
        target: String,
        /// Number of recipe lines.
        recipe_lines: usize,
        /// Number of dependencies.
        dependencies: usize,
    },

    /// A target depends on itself, directly or transitively.
    #[error("dependency cycle detected: {}", .cycle.iter().join(" -> "))]
    #[diagnostic(code(knitmake::plan::cycle))]
    CycleDetected {
        /// Targets along the cycle; the first is repeated at the end.
        cycle: Vec<String>,
    },
}
