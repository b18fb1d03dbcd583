//! Rule graph to plan conversion.

use itertools::Itertools;
use tracing::debug;

use crate::ast::{Makefile, param_name};

use super::ident::PARAMS_STEP_ID;
use super::plan::{Plan, PlanOptions, Step, StepKind, Value};
use super::{PlanError, classify, walk};

impl Plan {
    /// Build the plan for `target`.
    ///
    /// The plan opens with the parameters collector, followed by the steps of
    /// `target` and every rule it transitively depends on, each rule once and
    /// after the rules it depends on.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] when `target` has no rule, the rules form a
    /// cycle, or a reachable rule matches no step pattern.
    pub fn from_makefile(
        makefile: &Makefile,
        target: &str,
        options: &PlanOptions,
    ) -> Result<Self, PlanError> {
        let root = makefile
            .handle(target)
            .ok_or_else(|| PlanError::UnknownTarget {
                target: target.to_owned(),
            })?;

        let mut steps = vec![params_step(makefile)];
        for handle in walk::post_order(makefile, root)? {
            let Some(rule) = makefile.rule_at(handle) else {
                continue;
            };
            let emitted = classify::classify(rule, makefile, options)?;
            debug!(target = %rule.target, steps = emitted.len(), "classified rule");
            steps.extend(emitted);
        }
        Ok(Self { steps })
    }
}

/// Collect every `_params/NAME` dependency in the file as a required
/// parameter, first occurrence first.
fn params_step(makefile: &Makefile) -> Step {
    let mut step = Step::new(PARAMS_STEP_ID, StepKind::Params);
    step.params = makefile
        .rules
        .values()
        .flat_map(|rule| rule.dependencies.iter())
        .filter_map(|dep| param_name(dep))
        .unique()
        .map(|name| (name.to_owned(), Value::Required))
        .collect();
    step
}
