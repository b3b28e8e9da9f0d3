//! Evaluator — walks the lexed AST and builds the [`Blog`] content tree.
//!
//! Each function is addressed by name through a [`Scopes`] chain rather
//! than hard-coded dispatch, mirroring the source's `rootFuns`/dynamic
//! local-scope design: `author` registers `name`/`email` only while its
//! own sub-forms are being evaluated, and `section` registers `subsection`
//! the same way.
//!
//! The source lets a scope hold a pointer to "its" content node and have
//! handlers append into it directly. Rust ownership forces a different
//! shape: composite handlers (`section`, `paragraph`, …) evaluate their
//! children into a local `Vec<ContentNode>` first and push the finished
//! node into the caller's `out` only once it is complete — a
//! deferred-append in place of the source's build-in-place mutation, with
//! an identical final tree and source order.

mod args;
mod builtins;
mod scope;

pub use args::Args;
pub use scope::Scopes;

use crate::ast::Node;
use crate::content::{Blog, IdRegistry, Meta};
use crate::error::EvalError;

/// A built-in or dynamically-registered handler. All handlers in this
/// crate are stateless, so a plain function pointer suffices — no
/// `Rc<dyn Fn>` boxing is needed the way a closure-capturing host would
/// require.
pub type Handler =
    fn(&mut EvalState, &mut Scopes, &mut Vec<crate::content::ContentNode>, &mut Args) -> Result<(), EvalError>;

/// Mutable state threaded through every handler call: the front-matter
/// under construction and the process-wide id registry. Kept separate
/// from `Vec<ContentNode>` so a handler can hold `&mut EvalState` and
/// `&mut Vec<ContentNode>` at once without aliasing one struct.
#[derive(Debug, Default)]
pub struct EvalState {
    pub meta: Meta,
    pub ids: IdRegistry,
}

/// Evaluate a fully-lexed document (the synthetic root form) into a
/// [`Blog`].
///
/// Mirrors entering the document by calling `Apply(blog, scopes,
/// root_form.first)`: the outermost scope holds only `root`, and
/// `eval_form` over the whole root form dispatches to it with every
/// top-level form as its argument list — exactly the same shape `Eval`
/// gives any other form head.
pub fn eval(root: &Node) -> Result<Blog, EvalError> {
    let mut state = EvalState::default();
    let mut scopes = Scopes::new();
    scopes.define("root", builtins::root);

    let mut content = Vec::new();
    eval_form(&mut state, &mut scopes, &mut content, root.children())?;

    Ok(Blog {
        meta: state.meta,
        content,
    })
}

/// Evaluate a run of sibling nodes in source order, appending each
/// node's output to `out`.
pub fn apply(
    state: &mut EvalState,
    scopes: &mut Scopes,
    out: &mut Vec<crate::content::ContentNode>,
    nodes: &[Node],
) -> Result<(), EvalError> {
    for node in nodes {
        eval_single(state, scopes, out, node)?;
    }
    Ok(())
}

fn eval_single(
    state: &mut EvalState,
    scopes: &mut Scopes,
    out: &mut Vec<crate::content::ContentNode>,
    node: &Node,
) -> Result<(), EvalError> {
    match node {
        Node::Form(children) => eval_form(state, scopes, out, children),
        Node::Text(text) => {
            out.push(crate::content::ContentNode::Text(text.clone()));
            Ok(())
        }
        // The grammar never actually produces a bare Atom outside a form
        // head, but resolving it as a zero-argument call keeps this
        // function total over every Node variant.
        Node::Atom(name) => {
            let handler = scopes
                .resolve(name)
                .ok_or_else(|| EvalError::FunctionNotInScope(name.clone()))?;
            let mut args = Args::new(&[]);
            handler(state, scopes, out, &mut args).map_err(|e| e.context(name))
        }
    }
}

fn eval_form(
    state: &mut EvalState,
    scopes: &mut Scopes,
    out: &mut Vec<crate::content::ContentNode>,
    children: &[Node],
) -> Result<(), EvalError> {
    let head = children
        .first()
        .expect("lexer: an empty form should be unreachable");
    let name = match head {
        Node::Atom(name) => name.as_str(),
        _ => return Err(EvalError::FunctionNotInScope("<non-atom form head>".to_string())),
    };
    let handler = scopes
        .resolve(name)
        .ok_or_else(|| EvalError::FunctionNotInScope(name.to_string()))?;
    let mut args = Args::new(&children[1..]);
    handler(state, scopes, out, &mut args).map_err(|e| e.context(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::tokenizer::tokenize;

    fn eval_source(source: &str) -> Blog {
        let tokens = tokenize(source, None).unwrap();
        let root = lex(&tokens);
        eval(&root).unwrap()
    }

    #[test]
    fn title_sets_meta_title() {
        let blog = eval_source("(title My Post)");
        assert_eq!(blog.meta.title.as_deref(), Some("My Post"));
    }

    #[test]
    fn unknown_function_errors() {
        let tokens = tokenize("(frobnicate x)", None).unwrap();
        let root = lex(&tokens);
        let err = eval(&root).unwrap_err();
        assert_eq!(
            err,
            EvalError::Context(
                "root".to_string(),
                Box::new(EvalError::FunctionNotInScope("frobnicate".to_string()))
            )
        );
    }
}
