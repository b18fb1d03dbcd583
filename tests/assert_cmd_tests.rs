//! Integration tests for CLI execution using `assert_cmd`.
//!
//! These tests invoke the compiled binary and check its exit status, the plan
//! written to stdout or a file, and the diagnostics written to stderr.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn knitmake() -> Result<Command> {
    Command::cargo_bin("knitmake").context("locate knitmake binary")
}

#[test]
fn prints_plan_to_stdout() -> Result<()> {
    knitmake()?
        .arg("tests/data/hello.mk")
        .arg("out")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("step _params: params\n"))
        .stdout(predicate::str::contains("    dep1 = rule@dep1:result/dep1\n"));
    Ok(())
}

#[test]
fn dash_output_streams_to_stdout() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    let rule_file = temp.path().join("Makefile");
    fs::copy("tests/data/hello.mk", &rule_file).context("copy fixture")?;
    knitmake()?
        .current_dir(temp.path())
        .args(["-o", "-", "Makefile", "dep1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("step rule@dep1: cmd"));
    ensure!(
        !temp.path().join("-").exists(),
        "-o - should not create a file named '-'"
    );
    Ok(())
}

#[test]
fn output_option_writes_file() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    let output = temp.path().join("plan.knit");
    knitmake()?
        .arg("tests/data/diamond.mk")
        .arg("top")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let plan = fs::read_to_string(&output).context("read generated plan")?;
    ensure!(
        plan.ends_with("    right = rule@right:result/right\n"),
        "unexpected plan: {plan}"
    );
    Ok(())
}

#[test]
fn dangling_recipe_fails_without_output() -> Result<()> {
    knitmake()?
        .arg("tests/data/dangling.mk")
        .arg("all")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("knitmake::parse::dangling_recipe"));
    Ok(())
}

#[test]
fn cycle_fails_without_output() -> Result<()> {
    knitmake()?
        .arg("tests/data/cycle.mk")
        .arg("a")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("dependency cycle detected"));
    Ok(())
}

#[test]
fn unknown_target_is_reported() -> Result<()> {
    knitmake()?
        .arg("tests/data/hello.mk")
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
    Ok(())
}

#[test]
fn missing_rule_file_is_reported() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    knitmake()?
        .current_dir(temp.path())
        .arg("Makefile")
        .arg("all")
        .assert()
        .failure()
        .stderr(predicate::str::contains("knitmake::runner::rule_file_not_found"));
    Ok(())
}

#[test]
fn missing_arguments_are_a_usage_error() -> Result<()> {
    knitmake()?
        .arg("tests/data/hello.mk")
        .assert()
        .failure()
        .code(2);
    Ok(())
}

#[test]
fn verbose_logs_go_to_stderr() -> Result<()> {
    knitmake()?
        .args(["-v", "tests/data/hello.mk", "out"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("step _params: params\n"))
        .stderr(predicate::str::contains("parsed rule file"));
    Ok(())
}
