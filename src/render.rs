//! HTML rendering — turns an evaluated [`Blog`] into a full document.
//!
//! The page shell (`<html>`/`<head>`/byline) is an askama template, chosen
//! because neither the teacher crate nor the rest of the retrieval pack
//! carries an HTML-templating dependency to ground this on; askama's
//! compile-time-checked templates are the closest idiomatic fit. The
//! per-node fragments below are plain functions instead, named after and
//! grounded on the Go template constants in
//! `original_source/component.go` (`HtmlSection`, `HtmlParagraph`,
//! `HtmlSidenote`, …) — askama's template syntax has no ergonomic way to
//! recurse over an arbitrarily nested `ContentNode` tree, so those
//! constants are reproduced as string-building functions instead.

use askama::Template;

use crate::content::{Blog, ContentNode, SectionLevel};
use crate::error::RenderError;

#[derive(Template)]
#[template(path = "entry.html")]
struct EntryTemplate<'a> {
    title: &'a str,
    language: &'a str,
    description: Option<&'a str>,
    author_name: Option<&'a str>,
    body_html: String,
}

/// Render a complete HTML document for `blog`.
pub fn render(blog: &Blog) -> Result<String, RenderError> {
    let body_html = render_nodes(&blog.content);
    let template = EntryTemplate {
        title: blog.meta.title.as_deref().unwrap_or(""),
        language: blog.meta.language.as_deref().unwrap_or("en"),
        description: blog.meta.description.as_deref(),
        author_name: blog
            .meta
            .author
            .as_ref()
            .and_then(|author| author.name.as_deref()),
        body_html,
    };
    Ok(template.render()?)
}

fn render_nodes(nodes: &[ContentNode]) -> String {
    nodes.iter().map(render_node).collect()
}

fn render_node(node: &ContentNode) -> String {
    match node {
        ContentNode::Section {
            id,
            level,
            title,
            children,
        } => {
            let tag = match level {
                SectionLevel::Section => "h2",
                SectionLevel::Subsection => "h3",
            };
            format!(
                r#"<section id="{id}"><{tag}>{title}</{tag}>{body}</section>"#,
                id = escape_attr(id),
                title = escape_text(title),
                body = render_nodes(children),
            )
        }
        ContentNode::Paragraph { children } => {
            format!("<p>{}</p>", render_nodes(children))
        }
        ContentNode::Aside { children } => {
            format!("<aside>{}</aside>", render_nodes(children))
        }
        ContentNode::Sidenote {
            id,
            short_text,
            expanded,
        } => format!(
            r#"<span class="sidenote" id="{id}">{short}<span class="sidenote-expanded">{body}</span></span>"#,
            id = escape_attr(id),
            short = escape_text(short_text),
            body = render_nodes(expanded),
        ),
        ContentNode::CodeBlock { lines } => {
            format!("<pre><code>{}</code></pre>", escape_text(&lines.join("\n")))
        }
        ContentNode::Link {
            url,
            external,
            label,
        } => {
            let rel = if *external { r#" rel="noopener noreferrer""# } else { "" };
            format!(
                r#"<a href="{url}"{rel}>{label}</a>"#,
                url = escape_attr(url),
                rel = rel,
                label = escape_text(label),
            )
        }
        ContentNode::Enquote(text) => format!("<q>{}</q>", escape_text(text)),
        ContentNode::Mono(text) => format!("<code>{}</code>", escape_text(text)),
        ContentNode::Em(text) => format!("<em>{}</em>", escape_text(text)),
        // Unescaped by design: an author who reaches for html-comment wants
        // the text to survive as a literal HTML comment.
        ContentNode::Comment { text } => format!("<!-- {text} -->"),
        ContentNode::Text(text) => escape_text(text),
    }
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    let mut out = escape_text(s);
    out = out.replace('"', "&quot;");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Author, Meta};

    #[test]
    fn renders_section_with_nested_paragraph() {
        let blog = Blog {
            meta: Meta {
                title: Some("My Post".to_string()),
                author: Some(Author {
                    name: Some("Ada".to_string()),
                    email: None,
                }),
                ..Default::default()
            },
            content: vec![ContentNode::Section {
                id: "intro".to_string(),
                level: SectionLevel::Section,
                title: "Intro".to_string(),
                children: vec![ContentNode::Paragraph {
                    children: vec![ContentNode::Text("Hello".to_string())],
                }],
            }],
        };
        let html = render(&blog).unwrap();
        assert!(html.contains("<title>My Post</title>"));
        assert!(html.contains("<p class=\"byline\">Ada</p>"));
        assert!(html.contains(r#"<section id="intro"><h2>Intro</h2><p>Hello</p></section>"#));
    }

    #[test]
    fn escapes_text_but_not_html_comments() {
        let blog = Blog {
            content: vec![
                ContentNode::Text("<script>".to_string()),
                ContentNode::Comment {
                    text: "raw & unescaped".to_string(),
                },
            ],
            ..Default::default()
        };
        let html = render(&blog).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<!-- raw & unescaped -->"));
    }

    #[test]
    fn renders_sidenote_with_expanded_body() {
        let blog = Blog {
            content: vec![ContentNode::Sidenote {
                id: "sn".to_string(),
                short_text: "see footnote".to_string(),
                expanded: vec![ContentNode::Text("long expanded note".to_string())],
            }],
            ..Default::default()
        };
        let html = render(&blog).unwrap();
        assert!(html.contains(r#"<span class="sidenote" id="sn">see footnote"#));
        assert!(html.contains("long expanded note"));
    }

    #[test]
    fn renders_external_link_with_rel() {
        let blog = Blog {
            content: vec![ContentNode::Link {
                url: "https://example.com".to_string(),
                external: true,
                label: "Example".to_string(),
            }],
            ..Default::default()
        };
        let html = render(&blog).unwrap();
        assert!(html.contains(r#"rel="noopener noreferrer""#));
    }
}
