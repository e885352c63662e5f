//! Lexical analysis of a command line into argument strings.
//!
//! The rules are a small subset of POSIX shell quoting:
//! - unquoted blanks separate words, and runs of blanks collapse;
//! - inside single quotes every character is literal;
//! - inside double quotes a backslash only escapes `$`, `` ` ``, `"`, `\` and newline,
//!   otherwise it is kept together with the following character;
//! - outside quotes a backslash makes the next character literal.
//!
//! Lexing never fails. An unterminated quote is closed at the end of the line and a
//! trailing lone backslash is dropped.

/// Characters a backslash may escape inside double quotes.
const DOUBLE_QUOTE_ESCAPABLE: [char; 5] = ['$', '`', '"', '\\', '\n'];

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    in_single_quote: bool,
    in_double_quote: bool,
    escaped: bool,
    current: String,
    tokens: Vec<String>,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            in_single_quote: false,
            in_double_quote: false,
            escaped: false,
            current: String::new(),
            tokens: Vec::new(),
        }
    }

    fn make_tokens(mut self) -> Vec<String> {
        while let Some(ch) = self.read_char() {
            if self.escaped {
                self.handle_escaped(ch);
                continue;
            }

            match ch {
                '\\' => self.handle_backslash(),
                '\'' => self.handle_single_quote(),
                '"' => self.handle_double_quote(),
                ' ' | '\t' => self.handle_blank(ch),
                _ => self.current.push(ch),
            }
        }

        // A pending escape at the end of input is dropped.
        self.finish_token();
        self.tokens
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn handle_escaped(&mut self, ch: char) {
        if self.in_double_quote && !DOUBLE_QUOTE_ESCAPABLE.contains(&ch) {
            self.current.push('\\');
        }
        self.current.push(ch);
        self.escaped = false;
    }

    fn handle_backslash(&mut self) {
        if self.in_single_quote {
            self.current.push('\\');
        } else {
            self.escaped = true;
        }
    }

    fn handle_single_quote(&mut self) {
        if self.in_double_quote {
            self.current.push('\'');
        } else {
            self.in_single_quote = !self.in_single_quote;
        }
    }

    fn handle_double_quote(&mut self) {
        if self.in_single_quote {
            self.current.push('"');
        } else {
            self.in_double_quote = !self.in_double_quote;
        }
    }

    fn handle_blank(&mut self, ch: char) {
        if self.in_single_quote || self.in_double_quote {
            self.current.push(ch);
        } else {
            self.finish_token();
        }
    }

    fn finish_token(&mut self) {
        if !self.current.is_empty() {
            self.tokens.push(std::mem::take(&mut self.current));
        }
    }
}

/// Splits `line` into words according to the quoting rules described in the module docs.
///
/// Empty words are never produced, so `''` on its own yields nothing.
pub fn tokenize(line: &str) -> Vec<String> {
    LexingFSM::new(line).make_tokens()
}
