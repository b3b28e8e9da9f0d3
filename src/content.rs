//! Content tree — the evaluator's output, and the renderer's input.
//!
//! Grounded on `original_source/component.go`'s `Blog`/`Author`/`Meta`
//! component set and its `GenerateID` slug algorithm.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

/// Heading depth for a `Section`/`Subsection` node. The source models these
/// as two distinct component types; a single enum with a level keeps the
/// renderer's template selection simple without losing the distinction.
/// Sections below the first nested level stay tagged `Subsection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLevel {
    Section,
    Subsection,
}

/// A node in the evaluated content tree, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Section {
        id: String,
        level: SectionLevel,
        title: String,
        children: Vec<ContentNode>,
    },
    Paragraph {
        children: Vec<ContentNode>,
    },
    Aside {
        children: Vec<ContentNode>,
    },
    Sidenote {
        id: String,
        short_text: String,
        expanded: Vec<ContentNode>,
    },
    CodeBlock {
        lines: Vec<String>,
    },
    Link {
        url: String,
        external: bool,
        label: String,
    },
    /// Leaf text variants: each carries only a value, per §3's
    /// `{Text, Em, Mono, Enquote}` leaf-text group.
    Enquote(String),
    Mono(String),
    Em(String),
    Comment {
        text: String,
    },
    Text(String),
}

impl ContentNode {
    /// Concatenated plain-text content, used where the source's
    /// `TextRenderable` interface is consulted (e.g. building a sidenote's
    /// id from its short text).
    pub fn text(&self) -> String {
        match self {
            ContentNode::Text(s) | ContentNode::Enquote(s) | ContentNode::Mono(s) | ContentNode::Em(s) => {
                s.clone()
            }
            ContentNode::Section { title, .. } => title.clone(),
            ContentNode::Paragraph { children }
            | ContentNode::Aside { children }
            | ContentNode::Sidenote {
                expanded: children, ..
            } => children.iter().map(ContentNode::text).collect::<Vec<_>>().join(""),
            ContentNode::CodeBlock { lines } => lines.join("\n"),
            ContentNode::Link { label, .. } => label.clone(),
            ContentNode::Comment { text } => text.clone(),
        }
    }
}

/// The `author` block: name and e-mail, both required once an `author`
/// block is present (see `eval::builtins::author`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A translation link, as collected by repeated `language` sub-forms.
#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    pub link: String,
    pub language: String,
}

/// Front-matter metadata. Flattens the source's `Blog` direct fields and
/// its nested `Meta` substruct into one Rust struct — kept distinct from
/// `Blog::content` so a handler can hold `&mut Meta` and `&mut
/// Vec<ContentNode>` at once without aliasing one struct (see DESIGN.md).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta {
    pub blog_name: Option<String>,
    pub title: Option<String>,
    pub alt_title: Option<String>,
    pub author: Option<Author>,
    pub tags: Vec<String>,
    pub language: Option<String>,
    pub canonical_url: Option<String>,
    pub description: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub revisions: Vec<DateTime<Utc>>,
    pub topic: Option<String>,
    /// Always zero: the source estimates reading time from a word count
    /// that this implementation never computes (see SPEC_FULL.md §9).
    pub est_reading_time: u32,
    pub languages: Vec<Language>,
    /// Always `None`: `abstract` is a no-op stub in the source and stays
    /// one here (see SPEC_FULL.md §9).
    pub abstract_text: Option<String>,
}

impl Meta {
    /// Tags joined as a `", "`-separated keyword list, per §3's invariant.
    pub fn tags_keyword_list(&self) -> String {
        self.tags.join(", ")
    }
}

/// The complete evaluated document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blog {
    pub meta: Meta,
    pub content: Vec<ContentNode>,
}

/// Process-scoped id generator, guaranteeing unique, URL-safe slugs for
/// sections and sidenotes. Mirrors `component.go`'s `GenerateID` and
/// spec §4.3's character mapping exactly: `[a-z]` verbatim, `[A-Z]`
/// lowercased, space becomes `-`, anything else becomes `_`; collisions
/// are broken by appending the smallest `-<n>` that is still unused.
#[derive(Debug, Default)]
pub struct IdRegistry {
    seen: HashSet<String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self, text: &str) -> String {
        let base = slugify(text);
        if self.seen.insert(base.clone()) {
            return base;
        }
        let mut n = 0;
        loop {
            n += 1;
            let candidate = format!("{base}-{n}");
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

fn slugify(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'a'..='z' => c,
            'A'..='Z' => c.to_ascii_lowercase(),
            ' ' => '-',
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_maps_case_and_space_and_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello_-world_");
    }

    #[test]
    fn id_registry_deduplicates() {
        let mut reg = IdRegistry::new();
        assert_eq!(reg.generate("Intro"), "intro");
        assert_eq!(reg.generate("Intro"), "intro-1");
        assert_eq!(reg.generate("Intro"), "intro-2");
    }
}
