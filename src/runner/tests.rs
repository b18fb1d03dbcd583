//! Unit tests for the runner module.

use super::*;
use camino::Utf8PathBuf;
use rstest::rstest;
use tempfile::TempDir;

fn cli_for(file: Utf8PathBuf, target: &str) -> Cli {
    Cli {
        file,
        target: target.to_owned(),
        output: None,
        translator: crate::ir::DEFAULT_TRANSLATOR.to_owned(),
        verbose: false,
    }
}

fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
}

#[rstest]
fn missing_rule_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let cli = cli_for(utf8_dir(&dir).join("Makefile"), "all");
    let err = generate_plan(&cli).expect_err("missing file");
    assert!(matches!(
        err.downcast_ref::<RunnerError>(),
        Some(RunnerError::RuleFileNotFound { .. })
    ));
}

#[rstest]
fn output_file_is_not_created_on_failure() {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_dir(&dir);
    let makefile = root.join("Makefile");
    fs::write(&makefile, "all: a b\n").expect("write rules");
    let output = root.join("plan.knit");
    let cli = Cli {
        output: Some(output.clone()),
        ..cli_for(makefile, "all")
    };
    assert!(run(&cli).is_err());
    assert!(!output.exists());
}

#[rstest]
fn output_file_receives_plan() {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8_dir(&dir);
    let makefile = root.join("Makefile");
    fs::write(&makefile, "out:\n\ttouch out\n").expect("write rules");
    let output = root.join("plan.knit");
    let cli = Cli {
        output: Some(output.clone()),
        ..cli_for(makefile, "out")
    };
    run(&cli).expect("run");
    let written = fs::read_to_string(&output).expect("read plan");
    assert!(written.starts_with("step _params: params\nstep rule@out: cmd "));
}

#[rstest]
fn parse_errors_keep_their_diagnostic() {
    let dir = TempDir::new().expect("temp dir");
    let makefile = utf8_dir(&dir).join("Makefile");
    fs::write(&makefile, "out: in\n\techo ok\nnot a rule\n").expect("write rules");
    let err = generate_plan(&cli_for(makefile, "out")).expect_err("malformed");
    let parse = err
        .downcast_ref::<crate::parser::ParseError>()
        .expect("parse error");
    assert_eq!(parse.line(), 3);
    assert!(format!("{err:#}").starts_with("translating "));
}
