//! Plan structures.

use serde::Serialize;

use super::ident::PARAMS_STEP_ID;

/// Program re-invoked by delegate planning steps unless configured otherwise.
pub const DEFAULT_TRANSLATOR: &str = "knitmake";

/// File name of the rule file read inside a delegated subdirectory.
pub const RULE_FILE_NAME: &str = "Makefile";

/// Knobs that affect emitted steps but not the rule graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Program name nested planning steps run to translate subdirectories.
    pub translator: String,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            translator: DEFAULT_TRANSLATOR.to_owned(),
        }
    }
}

impl PlanOptions {
    /// Shell script run by a delegate's planning step.
    ///
    /// A non-default translator is passed down so nested delegates use it too.
    ///
    /// ```rust
    /// use knitmake::ir::PlanOptions;
    /// assert_eq!(
    ///     PlanOptions::default().plan_script(),
    ///     "exec knitmake in/Makefile $target > out/plan.knit",
    /// );
    /// ```
    #[must_use]
    pub fn plan_script(&self) -> String {
        let translator = &self.translator;
        if translator == DEFAULT_TRANSLATOR {
            format!("exec {translator} in/{RULE_FILE_NAME} $target > out/plan.knit")
        } else {
            format!(
                "exec {translator} --translator {translator} in/{RULE_FILE_NAME} $target > out/plan.knit"
            )
        }
    }
}

/// Where a step input comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum InputRef {
    /// A path inside another step's output, e.g. `rule@a:result/a`.
    StepResult {
        /// Producing step.
        step: String,
        /// Path within that step's output.
        path: String,
    },
    /// A plan parameter, e.g. `_params:version`.
    Param {
        /// Parameter name.
        name: String,
    },
    /// A repository-relative file, e.g. `./src/main.c`.
    File {
        /// Path relative to the rule file's directory.
        path: String,
    },
}

impl InputRef {
    /// Producing step, when the input is another step's result.
    #[must_use]
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::StepResult { step, .. } => Some(step),
            Self::Param { .. } => Some(PARAMS_STEP_ID),
            Self::File { .. } => None,
        }
    }
}

/// Right-hand side of a `key = value` step line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// A parameter that must be supplied, rendered as `!`.
    Required,
    /// A literal string, rendered quoted.
    Literal(String),
    /// A reference to another step, parameter, or file.
    Input(InputRef),
}

/// Step kinds understood by knit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Declares plan parameters.
    Params,
    /// Output is an alias of its inputs; no computation.
    Identity,
    /// Runs a program with arguments inside the step sandbox.
    Cmd {
        /// Program to run.
        program: String,
        /// Arguments in order.
        args: Vec<String>,
    },
    /// Runs a nested plan inside a subdirectory.
    Flow {
        /// Working directory of the nested plan.
        dir: String,
        /// Reference to the nested plan text.
        plan: InputRef,
    },
}

/// One `step` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Unique identifier, see [`super::ident`].
    pub id: String,
    /// What the step does.
    pub kind: StepKind,
    /// Ordered `key = value` lines.
    pub params: Vec<(String, Value)>,
}

impl Step {
    /// Create a step with no parameters.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id: id.into(),
            kind,
            params: Vec::new(),
        }
    }

    /// Append a `key = value` line.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.push((key.into(), value));
        self
    }

    /// Look up the value of `key`.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Steps this step reads from, in parameter order.
    pub fn referenced_steps(&self) -> impl Iterator<Item = &str> {
        let from_kind = match &self.kind {
            StepKind::Flow { plan, .. } => plan.step(),
            StepKind::Params | StepKind::Identity | StepKind::Cmd { .. } => None,
        };
        from_kind.into_iter().chain(self.params.iter().filter_map(|(_, value)| match value {
            Value::Input(input) => input.step(),
            Value::Required | Value::Literal(_) => None,
        }))
    }
}

/// An ordered knit plan.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Steps in emission order; every step follows the steps it reads from.
    pub steps: Vec<Step>,
}

impl Plan {
    /// Find a step by identifier.
    #[must_use]
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Names of the parameters the plan requires.
    pub fn required_params(&self) -> impl Iterator<Item = &str> {
        self.step(PARAMS_STEP_ID)
            .into_iter()
            .flat_map(|step| step.params.iter().map(|(name, _)| name.as_str()))
    }
}
