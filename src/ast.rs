//! AST node model produced by the lexer.

use bitflags::bitflags;

bitflags! {
    /// Bitset over the three [`Node`] cases, used at evaluator boundaries
    /// to constrain which argument kinds a handler accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeMask: u8 {
        const FORM = 0b001;
        const ATOM = 0b010;
        const TEXT = 0b100;
        const ANY = Self::FORM.bits() | Self::ATOM.bits() | Self::TEXT.bits();
    }
}

/// A node in the nested AST built by the lexer.
///
/// An ordered `Vec` replaces the source's hand-built linked list: it
/// preserves source order, gives O(1) indexed access for the `Args`
/// reader, and avoids pointer-chasing.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Form(Vec<Node>),
    Atom(String),
    Text(String),
}

impl Node {
    pub fn type_mask(&self) -> TypeMask {
        match self {
            Node::Form(_) => TypeMask::FORM,
            Node::Atom(_) => TypeMask::ATOM,
            Node::Text(_) => TypeMask::TEXT,
        }
    }

    /// Children of a `Form` node. Panics on other variants — callers that
    /// reach this only do so after matching on `type_mask()`.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Form(children) => children,
            _ => unreachable!("Node::children called on a non-Form node"),
        }
    }

    /// Text content of a `Text` node.
    pub fn text(&self) -> &str {
        match self {
            Node::Text(s) => s,
            _ => unreachable!("Node::text called on a non-Text node"),
        }
    }

    /// Atom name of an `Atom` node.
    pub fn atom(&self) -> &str {
        match self {
            Node::Atom(s) => s,
            _ => unreachable!("Node::atom called on a non-Atom node"),
        }
    }
}
