//! Lexer — builds the nested [`Node`] AST from a flat token stream.
//!
//! Maintains a stack of "current form" child lists, initialized with a
//! synthetic root form whose first child is `Atom("root")`. The tokenizer
//! guarantees a well-formed, balanced token sequence (including the
//! injected `(eof)` tail), so a mismatched `FormEnd` here is a programming
//! error rather than a user-facing one.

use crate::ast::Node;
use crate::token::{Token, TokenKind};

/// Consume a token stream and return the synthetic root form.
pub fn lex(tokens: &[Token]) -> Node {
    let mut stack: Vec<Vec<Node>> = vec![vec![Node::Atom("root".to_string())]];

    for token in tokens {
        match token.kind {
            TokenKind::FormStart => stack.push(Vec::new()),
            TokenKind::Atom => {
                let top = stack.last_mut().expect("lexer: form stack underflow");
                top.push(Node::Atom(token.text.clone()));
            }
            TokenKind::Text => {
                let top = stack.last_mut().expect("lexer: form stack underflow");
                top.push(Node::Text(token.text.clone()));
            }
            TokenKind::FormEnd => {
                let children = stack
                    .pop()
                    .expect("lexer: mismatched FormEnd against an empty stack");
                let top = stack
                    .last_mut()
                    .expect("lexer: mismatched FormEnd at the document root");
                top.push(Node::Form(children));
            }
        }
    }

    assert_eq!(
        stack.len(),
        1,
        "lexer: unbalanced form stack at end of token stream"
    );
    Node::Form(stack.pop().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn root_starts_with_root_atom_and_ends_with_eof() {
        let tokens = tokenize("(title Hello)", None).unwrap();
        let root = lex(&tokens);
        let children = root.children();
        assert_eq!(children[0], Node::Atom("root".to_string()));
        let last = children.last().unwrap();
        match last {
            Node::Form(form_children) => {
                assert_eq!(form_children[0], Node::Atom("eof".to_string()));
            }
            _ => panic!("expected the last top-level child to be the (eof) form"),
        }
    }

    #[test]
    fn nested_forms_preserve_source_order() {
        // A single space never splits a Text token, so "Intro Hello" stays
        // one run; the blank line before the nested subsection is what
        // forces a second, distinct Text sibling.
        let tokens = tokenize("(section Intro Hello\n\n(subsection S1 World))", None).unwrap();
        let root = lex(&tokens);
        let section_form = &root.children()[1];
        let section_children = section_form.children();
        assert_eq!(section_children[0], Node::Atom("section".to_string()));
        assert_eq!(section_children[1], Node::Text("Intro Hello".to_string()));
        match &section_children[2] {
            Node::Form(sub) => {
                assert_eq!(sub[0], Node::Atom("subsection".to_string()));
                assert_eq!(sub[1], Node::Text("S1 World".to_string()));
            }
            _ => panic!("expected a nested subsection form"),
        }
    }
}
