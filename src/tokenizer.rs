//! Tokenizer — Character-precise token generation for `be` source.
//!
//! Driven as a state function: each state consumes some characters, emits
//! zero or more tokens, and returns the next state (or `None` to stop).
//! See the module-level docs in `lib.rs` for the full state diagram.

use crate::error::{TokenizerError, TokenizerErrorKind};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    TextOrForm,
    Form,
    NilOrAtom,
    Atom,
    Nil,
    Text,
    NilOrTextOrForm,
}

/// Entry point: tokenize a complete `be` source string.
///
/// `file` is used only to label error positions; pass `None` for anonymous
/// input (e.g. in tests).
pub fn tokenize(source: &str, file: Option<&str>) -> Result<Vec<Token>, TokenizerError> {
    let mut tokenizer = Tokenizer::new(source, file);
    tokenizer.run()?;
    Ok(tokenizer.tokens)
}

struct Tokenizer<'a> {
    chars: Vec<char>,
    len: usize,
    pos: usize,
    tokens: Vec<Token>,
    file: Option<&'a str>,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str, file: Option<&'a str>) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let len = chars.len();
        Self {
            chars,
            len,
            pos: 0,
            tokens: Vec::new(),
            file,
        }
    }

    fn error(&self, kind: TokenizerErrorKind) -> TokenizerError {
        TokenizerError {
            kind,
            pos: self.pos,
            file: self.file.map(str::to_string),
        }
    }

    fn run(&mut self) -> Result<(), TokenizerError> {
        let mut state = Some(State::TextOrForm);
        while let Some(s) = state {
            self.skip_whitespace();
            if self.pos >= self.len {
                self.emit_eof();
                return Ok(());
            }
            state = self.step(s)?;
        }
        Ok(())
    }

    fn step(&mut self, state: State) -> Result<Option<State>, TokenizerError> {
        match state {
            State::TextOrForm | State::NilOrTextOrForm => Ok(Some(self.dispatch())),
            State::Form => Ok(Some(self.tok_form())),
            State::NilOrAtom => self.tok_nil_or_atom(),
            State::Atom => Ok(Some(self.tok_atom())),
            State::Nil => Ok(Some(self.tok_nil())),
            State::Text => Ok(Some(self.tok_text()?)),
        }
    }

    /// Shared dispatch for `TextOrForm` and `NilOrTextOrForm`.
    fn dispatch(&self) -> State {
        match self.chars[self.pos] {
            '(' => State::Form,
            ')' => State::Nil,
            _ => State::Text,
        }
    }

    fn tok_form(&mut self) -> State {
        self.tokens
            .push(Token::new(TokenKind::FormStart, "(", self.pos));
        self.pos += 1;
        State::NilOrAtom
    }

    fn tok_nil_or_atom(&mut self) -> Result<Option<State>, TokenizerError> {
        match self.chars[self.pos] {
            '(' => Err(self.error(TokenizerErrorKind::CannotStartForm)),
            ')' => Ok(Some(State::Nil)),
            c if is_atom_char(c) => Ok(Some(State::Atom)),
            _ => Err(self.error(TokenizerErrorKind::ExpectedAtomOrNil)),
        }
    }

    fn tok_nil(&mut self) -> State {
        self.tokens
            .push(Token::new(TokenKind::FormEnd, ")", self.pos));
        self.pos += 1;
        State::NilOrTextOrForm
    }

    fn tok_atom(&mut self) -> State {
        let start = self.pos;
        while self.pos < self.len && is_atom_char(self.chars[self.pos]) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.tokens.push(Token::new(TokenKind::Atom, text, start));
        State::NilOrTextOrForm
    }

    fn tok_text(&mut self) -> Result<State, TokenizerError> {
        let start = self.pos;
        let text = self.scan_text()?;
        self.tokens.push(Token::new(TokenKind::Text, text, start));
        Ok(State::NilOrTextOrForm)
    }

    /// Scans a single `Text` token body, applying the rewrite rules from
    /// §4.1: space collapsing, newline joining/splitting, `~`, `...`,
    /// escapes, and raw mode.
    fn scan_text(&mut self) -> Result<String, TokenizerError> {
        let mut out = String::new();
        let mut raw = false;

        loop {
            if self.pos >= self.len {
                break;
            }
            let c = self.chars[self.pos];

            if !raw && (c == '(' || c == ')') {
                break;
            }

            if c == '\\' {
                if self.pos + 1 >= self.len {
                    return Err(self.error(TokenizerErrorKind::UnfinishedEscape));
                }
                let next = self.chars[self.pos + 1];
                if raw {
                    if next == '+' {
                        raw = false;
                        self.pos += 2;
                    } else {
                        out.push(c);
                        self.pos += 1;
                    }
                    continue;
                }
                match next {
                    '(' | ')' | '\\' => {
                        out.push(next);
                        self.pos += 2;
                    }
                    '+' => {
                        raw = true;
                        self.pos += 2;
                    }
                    other => return Err(self.error(TokenizerErrorKind::InvalidEscape(other))),
                }
                continue;
            }

            if raw {
                out.push(c);
                self.pos += 1;
                continue;
            }

            if c == '\n' {
                let mut j = self.pos;
                let mut newline_count = 0;
                while j < self.len && self.chars[j] == '\n' {
                    newline_count += 1;
                    j += 1;
                }
                // Spaces immediately adjacent to a newline are dropped, not
                // joined — otherwise the space branch below would add a
                // second join space on top of this branch's own.
                while j < self.len && self.chars[j] == ' ' {
                    j += 1;
                }
                if newline_count >= 2 {
                    self.pos = j;
                    break;
                }
                if j < self.len && self.chars[j] == ')' {
                    self.pos = j;
                    break;
                }
                if !out.is_empty() {
                    if out.ends_with(' ') {
                        out.pop();
                    }
                    out.push(' ');
                }
                self.pos = j;
                continue;
            }

            if c == ' ' {
                let mut j = self.pos;
                while j < self.len && self.chars[j] == ' ' {
                    j += 1;
                }
                self.pos = j;
                if j < self.len && self.chars[j] != '(' && self.chars[j] != ')' && self.chars[j] != '\n' {
                    out.push(' ');
                }
                continue;
            }

            if c == '~' {
                out.push('\u{00A0}');
                self.pos += 1;
                continue;
            }

            if c == '.'
                && self.pos + 2 < self.len
                && self.chars[self.pos + 1] == '.'
                && self.chars[self.pos + 2] == '.'
            {
                out.push('\u{2026}');
                self.pos += 3;
                continue;
            }

            out.push(c);
            self.pos += 1;
        }

        Ok(out)
    }

    fn emit_eof(&mut self) {
        let pos = self.pos;
        self.tokens
            .push(Token::new(TokenKind::FormStart, "(", pos));
        self.tokens.push(Token::new(TokenKind::Atom, "eof", pos));
        self.tokens.push(Token::new(TokenKind::FormEnd, ")", pos));
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.len && is_whitespace(self.chars[self.pos]) {
            self.pos += 1;
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t' | '\u{0B}' | '\u{0C}')
}

fn is_atom_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '-' | '@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        tokenize(source, None)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind == TokenKind::Text)
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn collapses_space_runs() {
        assert_eq!(texts("a   b"), vec!["a b"]);
    }

    #[test]
    fn joins_single_newline() {
        assert_eq!(texts("a\nb"), vec!["a b"]);
    }

    #[test]
    fn splits_on_double_newline() {
        assert_eq!(texts("a\n\nb"), vec!["a", "b"]);
    }

    #[test]
    fn a_trailing_space_before_a_newline_does_not_double_the_join_space() {
        // The space run before the newline is dropped; the newline branch
        // contributes the single joining space on its own.
        assert_eq!(texts("foo\n bar"), vec!["foo bar"]);
        assert_eq!(texts("foo \nbar"), vec!["foo bar"]);
        assert_eq!(texts("foo \n bar"), vec!["foo bar"]);
    }

    #[test]
    fn rewrites_tilde_to_nbsp() {
        assert_eq!(texts("a~b"), vec!["a\u{00A0}b"]);
    }

    #[test]
    fn rewrites_ellipsis() {
        assert_eq!(texts("a...b"), vec!["a\u{2026}b"]);
    }

    #[test]
    fn unescapes_parens_and_backslash() {
        assert_eq!(texts("\\(\\)\\\\"), vec!["()\\"]);
    }

    #[test]
    fn raw_mode_is_verbatim() {
        assert_eq!(texts("\\+  a  b  \\+"), vec!["  a  b  "]);
    }

    #[test]
    fn balanced_forms_and_eof_tail() {
        let tokens = tokenize("(title Hello World)", None).unwrap();
        let starts = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::FormStart)
            .count();
        let ends = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::FormEnd)
            .count();
        assert_eq!(starts, ends);
        let tail = &tokens[tokens.len() - 3..];
        assert_eq!(tail[0].kind, TokenKind::FormStart);
        assert_eq!(tail[1].kind, TokenKind::Atom);
        assert_eq!(tail[1].text, "eof");
        assert_eq!(tail[2].kind, TokenKind::FormEnd);
    }

    #[test]
    fn example_title_hello_world() {
        let tokens = tokenize("(title Hello World)", None).unwrap();
        assert_eq!(
            tokens[..4],
            [
                Token::new(TokenKind::FormStart, "(", 0),
                Token::new(TokenKind::Atom, "title", 1),
                Token::new(TokenKind::Text, "Hello World", 7),
                Token::new(TokenKind::FormEnd, ")", 18),
            ]
        );
    }

    #[test]
    fn invalid_escape_errors() {
        let err = tokenize("\\q", None).unwrap_err();
        assert_eq!(err.kind, TokenizerErrorKind::InvalidEscape('q'));
    }

    #[test]
    fn unfinished_escape_errors() {
        let err = tokenize("abc\\", None).unwrap_err();
        assert_eq!(err.kind, TokenizerErrorKind::UnfinishedEscape);
    }

    #[test]
    fn atom_chars_include_at_sign() {
        let tokens = tokenize("(e@x-1)", None).unwrap();
        assert_eq!(tokens[1].text, "e@x-1");
    }
}
