//! Recipe line shapes.
//!
//! A single recipe line is either an invocation of the build tool in a
//! subdirectory or an opaque shell line. The delegate grammar, over shell
//! words, is
//!
//! ```text
//! delegate := "$(MAKE)" "-C" DIR TARGET
//! ```
//!
//! Words are split with POSIX shell rules, so `"$(MAKE)" -C sub all` also
//! matches. `DIR` and `TARGET` are written unquoted into the plan and the
//! nested invocation, so a word containing whitespace makes the line a shell
//! line, as does a line that cannot be split.

/// Build tool reference recognised at the start of a delegate line.
pub const MAKE_REFERENCE: &str = "$(MAKE)";

/// Classified recipe line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeShape<'a> {
    /// Build `target` with the rule file in `dir`.
    Delegate {
        /// Subdirectory without a trailing `/`.
        dir: String,
        /// Requested target in the subdirectory.
        target: String,
    },
    /// Any other command, run verbatim.
    Shell(&'a str),
}

impl<'a> RecipeShape<'a> {
    /// Classify an expanded recipe line.
    ///
    /// ```rust
    /// use knitmake::ir::shape::RecipeShape;
    /// assert_eq!(
    ///     RecipeShape::parse("$(MAKE) -C lib/ all"),
    ///     RecipeShape::Delegate { dir: "lib".into(), target: "all".into() },
    /// );
    /// assert_eq!(RecipeShape::parse("make -C lib all"), RecipeShape::Shell("make -C lib all"));
    /// ```
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let Some(words) = shlex::split(line) else {
            return Self::Shell(line);
        };
        match words.as_slice() {
            [make, flag, dir, target]
                if make == MAKE_REFERENCE
                    && flag == "-C"
                    && !dir.contains(char::is_whitespace)
                    && !target.contains(char::is_whitespace) =>
            {
                let trimmed = dir.trim_end_matches('/');
                if trimmed.is_empty() {
                    return Self::Shell(line);
                }
                Self::Delegate {
                    dir: trimmed.to_owned(),
                    target: target.clone(),
                }
            }
            _ => Self::Shell(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("$(MAKE) -C sub all", "sub", "all")]
    #[case("$(MAKE)  -C  sub/  all", "sub", "all")]
    #[case("$(MAKE) -C a/b out/x.o", "a/b", "out/x.o")]
    #[case("\"$(MAKE)\" -C 'sub' all", "sub", "all")]
    fn recognises_delegates(#[case] line: &str, #[case] dir: &str, #[case] target: &str) {
        assert_eq!(
            RecipeShape::parse(line),
            RecipeShape::Delegate {
                dir: dir.into(),
                target: target.into(),
            }
        );
    }

    #[rstest]
    #[case("$(MAKE) -C sub")]
    #[case("$(MAKE) all")]
    #[case("$(MAKE) -C / all")]
    #[case("$(MAKE) -C 'my dir' all")]
    #[case("$(MAKE) -C sub 'two words'")]
    #[case("$(MAKE) -C sub one two")]
    #[case("cd sub && $(MAKE) all")]
    #[case("echo 'unterminated")]
    #[case("gcc -c main.c")]
    fn other_lines_are_shell(#[case] line: &str) {
        assert_eq!(RecipeShape::parse(line), RecipeShape::Shell(line));
    }
}
