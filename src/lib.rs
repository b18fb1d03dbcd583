//! knitmake core library.
//!
//! Translates Makefile rules into knit execution plans: [`parser`] reads the
//! rule file into an [`ast::Makefile`], [`ir::Plan::from_makefile`] orders and
//! classifies the rules reachable from a target, and [`plan_gen`] renders the
//! plan as text.

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod ir;
pub mod parser;
pub mod plan_gen;
pub mod runner;
pub mod substitute;
