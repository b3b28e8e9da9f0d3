//! Built-in handler functions, grounded on the source's `rootFuns` map and
//! the section/sidenote/component evaluators in `original_source/`.

use log::warn;

use crate::ast::TypeMask;
use crate::content::{Author, ContentNode, SectionLevel};
use crate::error::EvalError;

use super::scope::Scope;
use super::{apply, eval_single, Args, EvalState, Handler, Scopes};

/// Default blog-name and author placeholder, hardcoded per
/// `original_source/eval.go` (see SPEC_FULL.md §9 — no configuration
/// mechanism is specified).
const DEFAULT_BLOG_NAME: &str = "save-lisp-and-die";
const DEFAULT_AUTHOR_NAME: &str = "cvl";

/// Handlers usable anywhere inline text is accepted: quoting, emphasis,
/// monospace, links, and both comment forms.
fn inline_scope() -> Scope {
    let mut scope = Scope::new();
    scope.insert("enquote", enquote as Handler);
    scope.insert("mono", mono as Handler);
    scope.insert("em", em as Handler);
    scope.insert("link", link as Handler);
    scope.insert("html-comment", html_comment as Handler);
    scope.insert("comment", comment as Handler);
    scope
}

/// Block-level content handlers: the inline set plus `paragraph`, `aside`,
/// `sidenote`, `code` and `section` itself — everything §4.3's "Built-in
/// handler set (root scope)" lists alongside `title`/`author`/`tags`, so
/// it is reachable both at the top level and recursively wherever content
/// is being applied (inside `body`, a `section`, a `paragraph`, …).
fn block_scope() -> Scope {
    let mut scope = inline_scope();
    scope.insert("paragraph", paragraph as Handler);
    scope.insert("aside", aside as Handler);
    scope.insert("sidenote", sidenote as Handler);
    scope.insert("code", code as Handler);
    scope.insert("section", section as Handler);
    scope
}

/// The document entry point: sets front-matter defaults, then pushes the
/// complete root-scope handler set — `title`, `author`, `tags`, `body`,
/// `abstract`, `eof`, plus the whole [`block_scope`] — and applies every
/// top-level form under it. Content forms are therefore legal directly at
/// the document root, not only nested inside `body`.
pub(super) fn root(
    state: &mut EvalState,
    scopes: &mut Scopes,
    out: &mut Vec<ContentNode>,
    args: &mut Args,
) -> Result<(), EvalError> {
    state
        .meta
        .blog_name
        .get_or_insert_with(|| DEFAULT_BLOG_NAME.to_string());
    state.meta.author.get_or_insert_with(|| Author {
        name: Some(DEFAULT_AUTHOR_NAME.to_string()),
        email: None,
    });

    // Each remaining argument must be a Form, per §4.3's "each remaining
    // argument is Form" — mirroring the original's TypeForm-gated loop
    // rather than accepting any node kind at the document root.
    let rest = args.rest();
    for node in rest {
        let got = node.type_mask();
        if !TypeMask::FORM.contains(got) {
            return Err(EvalError::TypeMismatch {
                want: TypeMask::FORM,
                got,
            });
        }
    }

    let mut scope = block_scope();
    scope.insert("title", title as Handler);
    scope.insert("author", author as Handler);
    scope.insert("tags", tags as Handler);
    scope.insert("body", body as Handler);
    scope.insert("abstract", abstract_ as Handler);
    scope.insert("eof", eof as Handler);
    scopes.push(scope);
    let result = apply(state, scopes, out, rest);
    scopes.pop();
    result
}

fn title(state: &mut EvalState, _scopes: &mut Scopes, _out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let text = args.required_text("title")?;
    let alt = args.optional_text()?;
    args.finish()?;
    state.meta.title = Some(text);
    state.meta.alt_title = alt;
    Ok(())
}

/// A no-op stub: consumes its arguments without producing any content,
/// matching the source's unfinished `abstract` handler (see
/// SPEC_FULL.md §9).
fn abstract_(_state: &mut EvalState, _scopes: &mut Scopes, _out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let _ = args.rest();
    Ok(())
}

fn tags(state: &mut EvalState, _scopes: &mut Scopes, _out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let first = args.required_text("tags")?;
    let mut texts = vec![first];
    while let Some(text) = args.optional_text()? {
        texts.push(text);
    }
    args.finish()?;

    let names: Vec<String> = texts
        .iter()
        .flat_map(|t| t.split(' ').filter(|w| !w.is_empty()).map(str::to_string))
        .collect();

    if !state.meta.tags.is_empty() {
        warn!("tags: overwriting {} previously declared tag(s)", state.meta.tags.len());
    }
    state.meta.tags = names;
    Ok(())
}

/// Registers `name`/`email` into a fresh scope, then reads and `Apply`s
/// exactly two `Form` arguments — one per registered sub-handler, per
/// §4.3's "iterates exactly len(sub-scope) Form arguments" contract.
fn author(state: &mut EvalState, scopes: &mut Scopes, _out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let first = args.required_form("author-field")?.clone();
    let second = args.required_form("author-field")?.clone();
    args.finish()?;

    state.meta.author = Some(Author::default());
    let mut scope = Scope::new();
    scope.insert("name", name as Handler);
    scope.insert("email", email as Handler);
    scopes.push(scope);

    let mut scratch = Vec::new();
    let result = (|| -> Result<(), EvalError> {
        eval_single(state, scopes, &mut scratch, &first)?;
        eval_single(state, scopes, &mut scratch, &second)?;
        Ok(())
    })();
    scopes.pop();
    result?;
    assert!(
        scratch.is_empty(),
        "author: name/email handlers must not produce content nodes"
    );
    Ok(())
}

fn name(state: &mut EvalState, _scopes: &mut Scopes, _out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let text = args.required_text("name")?;
    args.finish()?;
    state
        .meta
        .author
        .as_mut()
        .expect("name: called outside of an author block")
        .name = Some(text);
    Ok(())
}

fn email(state: &mut EvalState, _scopes: &mut Scopes, _out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let text = args.required_text("email")?;
    args.finish()?;
    state
        .meta
        .author
        .as_mut()
        .expect("email: called outside of an author block")
        .email = Some(text);
    Ok(())
}

/// A grouping form only — every handler it can contain is already live in
/// the scope `root` pushed, so `body` pushes nothing of its own and just
/// applies its children under the inherited scope.
fn body(state: &mut EvalState, scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    apply(state, scopes, out, args.rest())
}

/// Finalizes `Meta` defaults left unset by the document: language
/// defaults to `"en"`, publication time defaults to the moment of
/// evaluation.
fn eof(state: &mut EvalState, _scopes: &mut Scopes, _out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    args.finish()?;
    state.meta.language.get_or_insert_with(|| "en".to_string());
    state.meta.published.get_or_insert_with(chrono::Utc::now);
    Ok(())
}

fn section(state: &mut EvalState, scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    build_section(state, scopes, out, args, SectionLevel::Section)
}

/// Registered only inside an enclosing `section`'s (or `subsection`'s)
/// own scope, and itself registers a further nested `subsection` — "same
/// shape" as `section` per §4.3 — so sections may nest arbitrarily deep,
/// though every level past the first stays tagged `Subsection`.
fn subsection(state: &mut EvalState, scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    build_section(state, scopes, out, args, SectionLevel::Subsection)
}

fn build_section(
    state: &mut EvalState,
    scopes: &mut Scopes,
    out: &mut Vec<ContentNode>,
    args: &mut Args,
    level: SectionLevel,
) -> Result<(), EvalError> {
    let title = args.required_text("title")?;
    let rest = args.rest();

    // Allocated before evaluating children, mirroring NewSection/
    // NewSubsection's construction-time id assignment: a parent section
    // claims its slug before any nested subsection gets a chance to.
    let id = state.ids.generate(&title);

    let mut scope = block_scope();
    scope.insert("subsection", subsection as Handler);
    scopes.push(scope);
    let mut children = Vec::new();
    let result = apply(state, scopes, &mut children, rest);
    scopes.pop();
    result?;

    out.push(ContentNode::Section {
        id,
        level,
        title,
        children,
    });
    Ok(())
}

fn paragraph(state: &mut EvalState, scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let rest = args.rest();
    let mut children = Vec::new();
    apply(state, scopes, &mut children, rest)?;
    out.push(ContentNode::Paragraph { children });
    Ok(())
}

fn aside(state: &mut EvalState, scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let rest = args.rest();
    let mut children = Vec::new();
    apply(state, scopes, &mut children, rest)?;
    out.push(ContentNode::Aside { children });
    Ok(())
}

/// IDs are a fixed `"sn"` prefix, not a slug of the short text — matching
/// `original_source/component.go`'s `NewSidenote` (`GenerateID("sn")`) and
/// spec.md §8 example 6 (`id = "sn"`, then `"sn-1"`, `"sn-2"`, …),
/// unlike `Section`, whose id is a slug of its own title.
fn sidenote(state: &mut EvalState, _scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let short_text = args.required_text("short")?;
    let expanded_text = args.required_text("expanded")?;
    args.finish()?;
    let id = state.ids.generate("sn");
    out.push(ContentNode::Sidenote {
        id,
        short_text,
        expanded: vec![ContentNode::Text(expanded_text)],
    });
    Ok(())
}

fn code(_state: &mut EvalState, _scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let text = args.required_text("code")?;
    args.finish()?;
    let lines = text.split('\n').map(str::to_string).collect();
    out.push(ContentNode::CodeBlock { lines });
    Ok(())
}

fn enquote(_state: &mut EvalState, _scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let text = args.required_text("text")?;
    args.finish()?;
    out.push(ContentNode::Enquote(text));
    Ok(())
}

fn mono(_state: &mut EvalState, _scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let text = args.required_text("text")?;
    args.finish()?;
    out.push(ContentNode::Mono(text));
    Ok(())
}

fn em(_state: &mut EvalState, _scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let text = args.required_text("text")?;
    args.finish()?;
    out.push(ContentNode::Em(text));
    Ok(())
}

/// Not named in §4.3's built-in handler list, but `Link` is a cataloged
/// §3 content-node variant with no other producer — supplemented here
/// from `original_source/component.go`'s `Link{Link, External}` struct.
fn link(_state: &mut EvalState, _scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let url = args.required_text("url")?;
    let label = args.required_text("label")?;
    args.finish()?;
    let external = url.starts_with("http://") || url.starts_with("https://");
    out.push(ContentNode::Link { url, external, label });
    Ok(())
}

fn html_comment(_state: &mut EvalState, _scopes: &mut Scopes, out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let text = args.optional_text()?.unwrap_or_default();
    args.finish()?;
    out.push(ContentNode::Comment { text });
    Ok(())
}

/// An editorial comment: its arguments are read and discarded, never
/// rendered. Distinct from `html-comment`, which survives as a `Comment`
/// content node.
fn comment(_state: &mut EvalState, _scopes: &mut Scopes, _out: &mut Vec<ContentNode>, args: &mut Args) -> Result<(), EvalError> {
    let _ = args.rest();
    Ok(())
}
