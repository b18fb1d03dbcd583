//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure: the rule file, the requested
//! target, and the few options that shape output.

use camino::Utf8PathBuf;
use clap::Parser;

use crate::ir::{DEFAULT_TRANSLATOR, PlanOptions};

mod parsing;

use parsing::parse_translator;

/// Output path that selects standard output.
pub const STDOUT_PATH: &str = "-";

/// Translate Makefile rules into a knit execution plan.
#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Rule file to translate.
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,

    /// Target to produce a plan for.
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Write the plan to this file instead of standard output.
    ///
    /// The file is only written once translation has succeeded. `-` selects
    /// standard output.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,

    /// Program that nested planning steps run to translate subdirectories.
    #[arg(
        long,
        value_name = "NAME",
        default_value = DEFAULT_TRANSLATOR,
        value_parser = parse_translator
    )]
    pub translator: String,

    /// Enable verbose diagnostic logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Options for plan generation derived from the flags.
    #[must_use]
    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            translator: self.translator.clone(),
        }
    }

    /// Destination file, or `None` for standard output.
    #[must_use]
    pub fn output_file(&self) -> Option<&Utf8PathBuf> {
        self.output.as_ref().filter(|path| path.as_str() != STDOUT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_positional_arguments() {
        let cli = Cli::try_parse_from(["knitmake", "Makefile", "all"]).expect("parse");
        assert_eq!(cli.file, Utf8PathBuf::from("Makefile"));
        assert_eq!(cli.target, "all");
        assert_eq!(cli.translator, DEFAULT_TRANSLATOR);
        assert!(cli.output_file().is_none());
        assert!(!cli.verbose);
    }

    #[rstest]
    #[case(&["knitmake", "Makefile"])]
    #[case(&["knitmake"])]
    #[case(&["knitmake", "Makefile", "all", "extra"])]
    #[case(&["knitmake", "--translator", "two words", "Makefile", "all"])]
    fn rejects_bad_invocations(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[rstest]
    #[case("-", None)]
    #[case("plan.knit", Some("plan.knit"))]
    fn output_dash_means_stdout(#[case] output: &str, #[case] expected: Option<&str>) {
        let cli = Cli::try_parse_from(["knitmake", "-o", output, "Makefile", "all"])
            .expect("parse");
        assert_eq!(cli.output_file().map(|path| path.as_str()), expected);
    }
}
