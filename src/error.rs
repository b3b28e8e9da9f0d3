//! Error Types and Handling
//!
//! One enum per pipeline phase, composed into a top-level `BeError` at the
//! CLI boundary. Mirrors the teacher's `ParserError` split
//! (lexer/block-grouping/parsing/post-processing) one phase at a time.

use std::fmt;

use crate::ast::TypeMask;

/// Errors raised while scanning the raw code-point stream into tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizerError {
    pub kind: TokenizerErrorKind,
    pub pos: usize,
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenizerErrorKind {
    InvalidEscape(char),
    UnfinishedEscape,
    CannotStartForm,
    ExpectedAtomOrNil,
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.file.as_deref().unwrap_or("<input>");
        match &self.kind {
            TokenizerErrorKind::InvalidEscape(c) => {
                write!(f, "{label}:{}: invalid escape `\\{c}`", self.pos)
            }
            TokenizerErrorKind::UnfinishedEscape => {
                write!(f, "{label}:{}: unfinished escape at end of input", self.pos)
            }
            TokenizerErrorKind::CannotStartForm => {
                write!(f, "{label}:{}: a form cannot start with `(`", self.pos)
            }
            TokenizerErrorKind::ExpectedAtomOrNil => {
                write!(f, "{label}:{}: expected an atom or `)`", self.pos)
            }
        }
    }
}

impl std::error::Error for TokenizerError {}

/// Errors raised while walking the AST and invoking handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    FunctionNotInScope(String),
    MissingArgument(String),
    SuperfluousArguments,
    TypeMismatch { want: TypeMask, got: TypeMask },
    /// A lower-level error, wrapped with the name of the handler that
    /// observed it — builds the "section: missing argument: …" style
    /// context chains described by the spec's propagation policy.
    Context(String, Box<EvalError>),
}

impl EvalError {
    pub fn context(self, handler: &str) -> Self {
        EvalError::Context(handler.to_string(), Box::new(self))
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::FunctionNotInScope(name) => write!(f, "function not in scope: {name}"),
            EvalError::MissingArgument(name) => write!(f, "missing argument: {name}"),
            EvalError::SuperfluousArguments => write!(f, "superfluous arguments"),
            EvalError::TypeMismatch { want, got } => {
                write!(f, "argument of incorrect type, want: {want:?}, got: {got:?}")
            }
            EvalError::Context(handler, inner) => write!(f, "{handler}: {inner}"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Errors raised by the rendering stage.
#[derive(Debug)]
pub enum RenderError {
    Template(askama::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Template(e) => write!(f, "template error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<askama::Error> for RenderError {
    fn from(e: askama::Error) -> Self {
        RenderError::Template(e)
    }
}

/// Top-level error composing every pipeline phase, used at the CLI boundary.
#[derive(Debug)]
pub enum BeError {
    Tokenizer(TokenizerError),
    Eval(EvalError),
    Render(RenderError),
    Io(std::io::Error),
}

impl fmt::Display for BeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeError::Tokenizer(e) => write!(f, "tokenizer error: {e}"),
            BeError::Eval(e) => write!(f, "evaluation error: {e}"),
            BeError::Render(e) => write!(f, "{e}"),
            BeError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for BeError {}

impl From<TokenizerError> for BeError {
    fn from(e: TokenizerError) -> Self {
        BeError::Tokenizer(e)
    }
}

impl From<EvalError> for BeError {
    fn from(e: EvalError) -> Self {
        BeError::Eval(e)
    }
}

impl From<RenderError> for BeError {
    fn from(e: RenderError) -> Self {
        BeError::Render(e)
    }
}

impl From<std::io::Error> for BeError {
    fn from(e: std::io::Error) -> Self {
        BeError::Io(e)
    }
}
