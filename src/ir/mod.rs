//! Intermediate representation of a knit plan.
//!
//! A [`Plan`] is the ordered list of steps produced from a parsed
//! [`Makefile`](crate::ast::Makefile) for one requested target. It carries no
//! knit syntax; [`crate::plan_gen`] renders it.
//!
//! # Examples
//!
//! ```
//! use knitmake::ir::{Plan, PlanOptions};
//!
//! let makefile = knitmake::parser::from_str("out: in\n\tcp $< $@\n").expect("parse");
//! let plan = Plan::from_makefile(&makefile, "out", &PlanOptions::default()).expect("plan");
//! let ids: Vec<_> = plan.steps.iter().map(|s| s.id.as_str()).collect();
//! assert_eq!(ids, ["_params", "rule@out"]);
//! ```

mod classify;
mod error;
mod from_makefile;
pub mod ident;
mod plan;
pub mod shape;
mod walk;

pub use error::PlanError;
pub use plan::{
    DEFAULT_TRANSLATOR, InputRef, Plan, PlanOptions, RULE_FILE_NAME, Step, StepKind, Value,
};
