//! Rule classification into knit steps.
//!
//! Checked in order, first match wins:
//!
//! | Rule | Steps |
//! |---|---|
//! | parameters pseudo-target | none |
//! | no recipe, one dependency | `identity` |
//! | one `$(MAKE) -C DIR TARGET` line | `@plan` cmd, `@flow` flow, `identity` |
//! | one other recipe line | shell `cmd` |

use camino::Utf8Path;

use crate::ast::{Makefile, PARAMS_MARKER, Rule, is_params_target, param_name};

use super::ident::{HelperStep, helper_step_id, step_id};
use super::plan::{InputRef, PlanOptions, RULE_FILE_NAME, Step, StepKind, Value};
use super::shape::RecipeShape;
use super::PlanError;

/// Script wrapping a shell recipe: create the target's directory, run the
/// recipe, then publish the target under `out/result/`.
pub(crate) const RUN_SCRIPT: &str =
    "cd in; mkdir -p $(dirname $_target); sh recipe; install -D $_target ../out/result/$_target";

/// Steps for `rule`, in emission order.
pub(crate) fn classify(
    rule: &Rule,
    makefile: &Makefile,
    options: &PlanOptions,
) -> Result<Vec<Step>, PlanError> {
    if rule.is_params_target() {
        return Ok(Vec::new());
    }
    match (rule.recipe.as_slice(), rule.dependencies.as_slice()) {
        ([], [dep]) => Ok(vec![identity_step(rule, dep, makefile)?]),
        ([line], _) => match RecipeShape::parse(line) {
            RecipeShape::Delegate { dir, target } => {
                delegate_steps(rule, &dir, &target, makefile, options)
            }
            RecipeShape::Shell(command) => Ok(vec![shell_step(rule, command, makefile)?]),
        },
        (recipe, deps) => Err(PlanError::UnsupportedRuleShape {
            target: rule.target.clone(),
            recipe_lines: recipe.len(),
            dependencies: deps.len(),
        }),
    }
}

/// Resolve a dependency of `rule` to the input it denotes.
///
/// Parameters pseudo-targets with a rule emit no step, so only a delegate's
/// own `DIR/_params/` dependency may name one; anywhere else it is an error.
pub(crate) fn resolve_input(
    rule: &Rule,
    dep: &str,
    makefile: &Makefile,
) -> Result<InputRef, PlanError> {
    if makefile.has_rule(dep) {
        if is_params_target(dep) {
            return Err(PlanError::ParamsDependency {
                target: rule.target.clone(),
                dependency: dep.to_owned(),
            });
        }
        Ok(InputRef::StepResult {
            step: step_id(dep),
            path: format!("result/{dep}"),
        })
    } else if let Some(name) = param_name(dep) {
        Ok(InputRef::Param {
            name: name.to_owned(),
        })
    } else {
        Ok(InputRef::File {
            path: dep.to_owned(),
        })
    }
}

fn identity_step(rule: &Rule, dep: &str, makefile: &Makefile) -> Result<Step, PlanError> {
    let step = Step::new(step_id(&rule.target), StepKind::Identity);
    let input = resolve_input(rule, dep, makefile)?;
    Ok(match input {
        InputRef::StepResult { step: producer, .. } => step.with_param(
            "result/",
            Value::Input(InputRef::StepResult {
                step: producer,
                path: "result/".to_owned(),
            }),
        ),
        other @ (InputRef::Param { .. } | InputRef::File { .. }) => {
            step.with_param(format!("result/{dep}"), Value::Input(other))
        }
    })
}

fn shell_step(rule: &Rule, command: &str, makefile: &Makefile) -> Result<Step, PlanError> {
    let step = Step::new(
        step_id(&rule.target),
        StepKind::Cmd {
            program: "sh".to_owned(),
            args: vec!["-e".to_owned(), "in/run.sh".to_owned()],
        },
    )
    .with_param("run.sh", Value::Literal(RUN_SCRIPT.to_owned()))
    .with_param("$_target", Value::Literal(rule.target.clone()))
    .with_param("recipe", Value::Literal(command.to_owned()));
    rule.dependencies.iter().try_fold(step, |acc, dep| {
        let input = resolve_input(rule, dep, makefile)?;
        Ok(acc.with_param(dep.as_str(), Value::Input(input)))
    })
}

fn delegate_steps(
    rule: &Rule,
    dir: &str,
    sub_target: &str,
    makefile: &Makefile,
    options: &PlanOptions,
) -> Result<Vec<Step>, PlanError> {
    let forwarded = forwarded_params(rule, dir, makefile)?;
    let plan_id = helper_step_id(&rule.target, HelperStep::Plan);
    let flow_id = helper_step_id(&rule.target, HelperStep::Flow);
    let rule_file = Utf8Path::new(dir).join(RULE_FILE_NAME);

    let plan = Step::new(
        plan_id.clone(),
        StepKind::Cmd {
            program: "sh".to_owned(),
            args: vec!["in/plan.sh".to_owned()],
        },
    )
    .with_param("plan.sh", Value::Literal(options.plan_script()))
    .with_param(
        RULE_FILE_NAME,
        Value::Input(InputRef::File {
            path: rule_file.into_string(),
        }),
    )
    .with_param("$target", Value::Literal(sub_target.to_owned()));

    let mut flow = Step::new(
        flow_id.clone(),
        StepKind::Flow {
            dir: format!("./{dir}/"),
            plan: InputRef::StepResult {
                step: plan_id,
                path: "plan.knit".to_owned(),
            },
        },
    );
    flow.params = forwarded;

    let alias = Step::new(step_id(&rule.target), StepKind::Identity).with_param(
        format!("result/{dir}/"),
        Value::Input(InputRef::StepResult {
            step: flow_id,
            path: "result/".to_owned(),
        }),
    );

    Ok(vec![plan, flow, alias])
}

/// Parameters a delegate passes to its nested plan.
///
/// A delegating rule may depend on nothing, or only on `DIR/_params/`, whose
/// own dependencies name the values to forward.
fn forwarded_params(
    rule: &Rule,
    dir: &str,
    makefile: &Makefile,
) -> Result<Vec<(String, Value)>, PlanError> {
    let expected = format!("{dir}/{PARAMS_MARKER}");
    let params_rule = match rule.dependencies.as_slice() {
        [] => return Ok(Vec::new()),
        [dep] if *dep == expected => makefile.rule(dep),
        _ => None,
    };
    let Some(params_rule) = params_rule else {
        return Err(PlanError::InvalidDelegateShape {
            target: rule.target.clone(),
            expected,
            found: rule.dependencies.clone(),
        });
    };
    params_rule
        .dependencies
        .iter()
        .map(|sub| {
            let key = param_name(sub).unwrap_or(sub);
            let input = resolve_input(params_rule, sub, makefile)?;
            Ok((key.to_owned(), Value::Input(input)))
        })
        .collect()
}
