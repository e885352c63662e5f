use thiserror::Error;

/// A file that one output stream is rewritten to for the duration of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    /// Path as written on the command line, relative to the working directory.
    pub path: String,
    /// `true` for `>>`-style operators: create or append instead of truncate.
    pub append: bool,
}

/// Redirections collected from one command line.
///
/// `None` means the stream is inherited from the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    pub stdout: Option<RedirectTarget>,
    pub stderr: Option<RedirectTarget>,
}

/// A **simple command**: the argument vector left after pulling out redirections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleCommand {
    /// Command name followed by its arguments, in their original relative order.
    pub argv: Vec<String>,
    pub redirects: Redirections,
}

/// Kind of redirection operator.
///
/// `>` and `1>` truncate stdout, `>>` and `1>>` append to it, `2>` and `2>>` do the
/// same for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    Stdout,
    StdoutAppend,
    Stderr,
    StderrAppend,
}

impl RedirectKind {
    /// Recognizes a whole token as an operator. Operators glued to a file name
    /// (`>out.txt`) are not recognized.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            ">" | "1>" => Some(RedirectKind::Stdout),
            ">>" | "1>>" => Some(RedirectKind::StdoutAppend),
            "2>" => Some(RedirectKind::Stderr),
            "2>>" => Some(RedirectKind::StderrAppend),
            _ => None,
        }
    }

    fn is_append(self) -> bool {
        matches!(self, RedirectKind::StdoutAppend | RedirectKind::StderrAppend)
    }
}

/// Errors that can occur while extracting redirections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingError {
    /// A redirection operator was the last token on the line.
    #[error("syntax error: no file specified for redirection after `{0}`")]
    MissingRedirectTarget(String),
}

struct RedirectionExtractor {
    tokens: Vec<String>,
    pos: usize,
}

impl RedirectionExtractor {
    fn from(tokens: Vec<String>) -> Self {
        RedirectionExtractor { tokens, pos: 0 }
    }

    fn consume(&mut self) -> Option<String> {
        let token = self.tokens.get_mut(self.pos).map(std::mem::take);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn build_command(mut self) -> Result<SimpleCommand, ParsingError> {
        let mut command = SimpleCommand::default();

        while let Some(token) = self.consume() {
            match RedirectKind::from_token(&token) {
                Some(kind) => {
                    let path = self
                        .consume()
                        .ok_or(ParsingError::MissingRedirectTarget(token))?;
                    let target = RedirectTarget {
                        path,
                        append: kind.is_append(),
                    };
                    // Later operators for the same stream replace earlier ones.
                    match kind {
                        RedirectKind::Stdout | RedirectKind::StdoutAppend => {
                            command.redirects.stdout = Some(target)
                        }
                        RedirectKind::Stderr | RedirectKind::StderrAppend => {
                            command.redirects.stderr = Some(target)
                        }
                    }
                }
                None => command.argv.push(token),
            }
        }

        Ok(command)
    }
}

/// Pulls redirection operators and their targets out of `tokens`.
///
/// Every operator must be followed by exactly one target token, which is taken
/// verbatim even if it looks like another operator. A dangling operator rejects
/// the whole line.
pub fn extract_redirections(tokens: Vec<String>) -> Result<SimpleCommand, ParsingError> {
    RedirectionExtractor::from(tokens).build_command()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn target(path: &str, append: bool) -> Option<RedirectTarget> {
        Some(RedirectTarget {
            path: path.to_string(),
            append,
        })
    }

    #[test]
    fn test_stdout_truncate() {
        let cmd = extract_redirections(tokens(&["ls", ">", "out.txt"])).unwrap();
        assert_eq!(cmd.argv, tokens(&["ls"]));
        assert_eq!(cmd.redirects.stdout, target("out.txt", false));
        assert_eq!(cmd.redirects.stderr, None);
    }

    #[test]
    fn test_all_operator_spellings() {
        let cmd = extract_redirections(tokens(&["a", "1>", "x"])).unwrap();
        assert_eq!(cmd.redirects.stdout, target("x", false));

        let cmd = extract_redirections(tokens(&["a", ">>", "x"])).unwrap();
        assert_eq!(cmd.redirects.stdout, target("x", true));

        let cmd = extract_redirections(tokens(&["a", "1>>", "x"])).unwrap();
        assert_eq!(cmd.redirects.stdout, target("x", true));

        let cmd = extract_redirections(tokens(&["a", "2>", "x"])).unwrap();
        assert_eq!(cmd.redirects.stderr, target("x", false));
        assert_eq!(cmd.redirects.stdout, None);

        let cmd = extract_redirections(tokens(&["a", "2>>", "x"])).unwrap();
        assert_eq!(cmd.redirects.stderr, target("x", true));
    }

    #[test]
    fn test_missing_target_rejects_line() {
        let err = extract_redirections(tokens(&["cmd", ">"])).unwrap_err();
        assert_eq!(err, ParsingError::MissingRedirectTarget(">".to_string()));
        assert!(err.to_string().starts_with("syntax error"));
    }

    #[test]
    fn test_last_operator_wins() {
        let cmd = extract_redirections(tokens(&["a", ">", "x.txt", ">", "y.txt"])).unwrap();
        assert_eq!(cmd.argv, tokens(&["a"]));
        assert_eq!(cmd.redirects.stdout, target("y.txt", false));

        let cmd = extract_redirections(tokens(&["a", ">>", "x.txt", "1>", "y.txt"])).unwrap();
        assert_eq!(cmd.redirects.stdout, target("y.txt", false));
    }

    #[test]
    fn test_operators_interleaved_with_arguments() {
        let cmd = extract_redirections(tokens(&[
            "cmd", "2>", "err.log", "one", ">>", "out.log", "two",
        ]))
        .unwrap();
        assert_eq!(cmd.argv, tokens(&["cmd", "one", "two"]));
        assert_eq!(cmd.redirects.stdout, target("out.log", true));
        assert_eq!(cmd.redirects.stderr, target("err.log", false));
    }

    #[test]
    fn test_operator_as_target_is_taken_verbatim() {
        let cmd = extract_redirections(tokens(&["a", ">", ">"])).unwrap();
        assert_eq!(cmd.argv, tokens(&["a"]));
        assert_eq!(cmd.redirects.stdout, target(">", false));
    }

    #[test]
    fn test_glued_operator_is_an_argument() {
        let cmd = extract_redirections(tokens(&["echo", ">out.txt"])).unwrap();
        assert_eq!(cmd.argv, tokens(&["echo", ">out.txt"]));
        assert_eq!(cmd.redirects, Redirections::default());
    }

    #[derive(Debug, Clone)]
    enum Segment {
        Word(String),
        Redirect(&'static str, String),
    }

    fn segment() -> impl Strategy<Value = Segment> {
        let word = "[a-z0-9._]{1,8}";
        prop_oneof![
            word.prop_map(Segment::Word),
            (
                prop::sample::select(vec![">", "1>", ">>", "1>>", "2>", "2>>"]),
                word
            )
                .prop_map(|(op, path)| Segment::Redirect(op, path)),
        ]
    }

    proptest! {
        #[test]
        fn extraction_neither_loses_nor_duplicates_tokens(segments in prop::collection::vec(segment(), 0..12)) {
            let mut line = Vec::new();
            let mut words = Vec::new();
            let mut operators = 0;
            let mut expected = Redirections::default();
            for segment in &segments {
                match segment {
                    Segment::Word(w) => {
                        line.push(w.clone());
                        words.push(w.clone());
                    }
                    Segment::Redirect(op, path) => {
                        line.push(op.to_string());
                        line.push(path.clone());
                        operators += 1;
                        let kind = RedirectKind::from_token(op).unwrap();
                        let target = target(path, kind.is_append());
                        match kind {
                            RedirectKind::Stdout | RedirectKind::StdoutAppend => expected.stdout = target,
                            RedirectKind::Stderr | RedirectKind::StderrAppend => expected.stderr = target,
                        }
                    }
                }
            }

            let cmd = extract_redirections(line.clone()).unwrap();
            prop_assert_eq!(&cmd.argv, &words);
            prop_assert_eq!(&cmd.redirects, &expected);

            // One operator and one target removed per redirection.
            let mut removed = line;
            for word in &cmd.argv {
                let at = removed.iter().position(|t| t == word);
                prop_assert!(at.is_some(), "{} appears in argv more often than on the line", word);
                if let Some(at) = at {
                    removed.remove(at);
                }
            }
            prop_assert_eq!(removed.len(), 2 * operators);
            let operator_count = removed.iter().filter(|t| RedirectKind::from_token(t).is_some()).count();
            prop_assert_eq!(operator_count, operators);
            for target in [&cmd.redirects.stdout, &cmd.redirects.stderr].into_iter().flatten() {
                prop_assert!(removed.contains(&target.path));
            }
        }
    }
}
