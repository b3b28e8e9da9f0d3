//! Pure processing pipeline, independent of the CLI and server shells.
//!
//! Mirrors the teacher crate's `api.rs`: a thin `process` function that
//! the binary and integration tests both call directly, keeping all I/O
//! at the edges.

use crate::error::BeError;
use crate::{eval, lexer, render, tokenizer};

/// Input to a single tokenize → lex → eval → render pass.
#[derive(Debug, Clone)]
pub struct ProcessArgs<'a> {
    pub source: &'a str,
    /// Label used only for error messages; `None` for anonymous input.
    pub file: Option<&'a str>,
}

/// Run the full pipeline over `args.source`, returning the rendered HTML
/// document.
pub fn process(args: ProcessArgs<'_>) -> Result<String, BeError> {
    let tokens = tokenizer::tokenize(args.source, args.file)?;
    let root = lexer::lex(&tokens);
    let blog = eval::eval(&root)?;
    let html = render::render(&blog)?;
    Ok(html)
}
