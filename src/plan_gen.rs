//! knit plan generator.
//!
//! This module converts an [`crate::ir::Plan`] into knit text. Steps are
//! written in plan order, which the IR already makes deterministic; nothing
//! here iterates an unordered collection.

use crate::ir::{InputRef, Plan, Step, StepKind, Value};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// Render a plan as knit text.
///
/// ```rust
/// use knitmake::ir::{Plan, Step, StepKind};
/// use knitmake::plan_gen::generate;
///
/// let plan = Plan { steps: vec![Step::new("_params", StepKind::Params)] };
/// assert_eq!(generate(&plan), "step _params: params\n");
/// ```
#[must_use]
pub fn generate(plan: &Plan) -> String {
    plan.steps.iter().map(DisplayStep).join("")
}

/// Escape text for a double-quoted knit string.
///
/// Backslashes are doubled first, then double quotes and newlines are
/// escaped, each exactly once.
///
/// ```rust
/// use knitmake::plan_gen::quote;
/// assert_eq!(quote(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
/// assert_eq!(quote("a\nb"), r"a\nb");
/// ```
#[must_use]
pub fn quote(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Wrapper struct to display a step declaration and its parameters.
struct DisplayStep<'a>(&'a Step);

impl Display for DisplayStep<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let step = self.0;
        writeln!(f, "step {}: {}", step.id, DisplayKind(&step.kind))?;
        for (key, value) in &step.params {
            writeln!(f, "    {key} = {}", DisplayValue(value))?;
        }
        Ok(())
    }
}

struct DisplayKind<'a>(&'a StepKind);

impl Display for DisplayKind<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            StepKind::Params => f.write_str("params"),
            StepKind::Identity => f.write_str("identity"),
            StepKind::Cmd { program, args } => {
                write!(f, "cmd \"{}\"", quote(program))?;
                for arg in args {
                    write!(f, " \"{}\"", quote(arg))?;
                }
                Ok(())
            }
            StepKind::Flow { dir, plan } => write!(f, "flow {dir} {}", DisplayInput(plan)),
        }
    }
}

struct DisplayValue<'a>(&'a Value);

impl Display for DisplayValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Required => f.write_str("!"),
            Value::Literal(text) => write!(f, "\"{}\"", quote(text)),
            Value::Input(input) => DisplayInput(input).fmt(f),
        }
    }
}

struct DisplayInput<'a>(&'a InputRef);

impl Display for DisplayInput<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            InputRef::StepResult { step, path } => write!(f, "{step}:{path}"),
            InputRef::Param { name } => write!(f, "{}:{name}", crate::ir::ident::PARAMS_STEP_ID),
            InputRef::File { path } => write!(f, "./{path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn generate_cmd_step() {
        let step = Step::new(
            "rule@out",
            StepKind::Cmd {
                program: "sh".into(),
                args: vec!["-e".into(), "in/run.sh".into()],
            },
        )
        .with_param("recipe", Value::Literal("echo \"hi\"".into()))
        .with_param("src.c", Value::Input(InputRef::File { path: "src.c".into() }))
        .with_param("v", Value::Input(InputRef::Param { name: "v".into() }));
        let plan = Plan { steps: vec![step] };
        let expected = concat!(
            "step rule@out: cmd \"sh\" \"-e\" \"in/run.sh\"\n",
            "    recipe = \"echo \\\"hi\\\"\"\n",
            "    src.c = ./src.c\n",
            "    v = _params:v\n",
        );
        assert_eq!(generate(&plan), expected);
    }

    #[rstest]
    fn generate_flow_and_params_steps() {
        let plan = Plan {
            steps: vec![
                Step::new("_params", StepKind::Params).with_param("cc", Value::Required),
                Step::new(
                    "rule@lib@flow",
                    StepKind::Flow {
                        dir: "./lib/".into(),
                        plan: InputRef::StepResult {
                            step: "rule@lib@plan".into(),
                            path: "plan.knit".into(),
                        },
                    },
                ),
            ],
        };
        let expected = concat!(
            "step _params: params\n",
            "    cc = !\n",
            "step rule@lib@flow: flow ./lib/ rule@lib@plan:plan.knit\n",
        );
        assert_eq!(generate(&plan), expected);
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case(r"a\b", r"a\\b")]
    #[case(r#"\""#, r#"\\\""#)]
    #[case("x\ny", r"x\ny")]
    fn quote_escapes_once(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(quote(input), expected);
    }

    #[rstest]
    fn generate_empty_plan() {
        assert!(generate(&Plan::default()).is_empty());
    }
}
