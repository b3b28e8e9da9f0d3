//! Integration tests for the tokenizer's text-rewriting rules and
//! structural invariants (spec.md §8's "Text rewriting round-trips" and
//! "quantified invariants" over `FormStart`/`FormEnd` balance).

use proptest::prelude::*;
use rstest::rstest;

use be::token::TokenKind;
use be::tokenizer::tokenize;

fn texts(source: &str) -> Vec<String> {
    tokenize(source, None)
        .unwrap()
        .into_iter()
        .filter(|t| t.kind == TokenKind::Text)
        .map(|t| t.text)
        .collect()
}

#[rstest]
#[case("a   b", &["a b"])]
#[case("a\nb", &["a b"])]
#[case("a\n\nb", &["a", "b"])]
#[case("a~b", &["a\u{00A0}b"])]
#[case("a...b", &["a\u{2026}b"])]
#[case("\\(\\)\\\\", &["()\\"])]
#[case("\\+  a  b  \\+", &["  a  b  "])]
fn rewrites_match_spec_round_trips(#[case] input: &str, #[case] expected: &[&str]) {
    assert_eq!(texts(input), expected);
}

#[rstest]
#[case("(title Hello World)")]
#[case("(section Intro (subsection S1 World))")]
#[case("(body (paragraph a) (paragraph b))")]
#[case("()")]
fn every_well_formed_source_ends_with_the_eof_tail(#[case] source: &str) {
    let tokens = tokenize(source, None).unwrap();
    let starts = tokens.iter().filter(|t| t.kind == TokenKind::FormStart).count();
    let ends = tokens.iter().filter(|t| t.kind == TokenKind::FormEnd).count();
    assert_eq!(starts, ends, "FormStart/FormEnd must balance");

    let tail = &tokens[tokens.len() - 3..];
    assert_eq!(tail[0].kind, TokenKind::FormStart);
    assert_eq!(tail[1].kind, TokenKind::Atom);
    assert_eq!(tail[1].text, "eof");
    assert_eq!(tail[2].kind, TokenKind::FormEnd);
}

proptest! {
    /// For every generated well-formed source (balanced, atom-headed
    /// forms with plain-word text bodies), the tokenizer always emits an
    /// equal count of `FormStart`/`FormEnd` and the synthetic `(eof)`
    /// tail — spec.md §8's quantified invariant.
    #[test]
    fn arbitrary_balanced_forms_keep_the_eof_invariant(
        words in prop::collection::vec("[a-z]{1,6}", 0..5),
        atom in "[a-z][a-z0-9-]{0,7}",
    ) {
        let body = words.join(" ");
        let source = format!("({atom} {body})");
        let tokens = tokenize(&source, None).unwrap();

        let starts = tokens.iter().filter(|t| t.kind == TokenKind::FormStart).count();
        let ends = tokens.iter().filter(|t| t.kind == TokenKind::FormEnd).count();
        prop_assert_eq!(starts, ends);

        let tail = &tokens[tokens.len() - 3..];
        prop_assert_eq!(tail[0].kind, TokenKind::FormStart);
        prop_assert_eq!(tail[1].text.as_str(), "eof");
        prop_assert_eq!(tail[2].kind, TokenKind::FormEnd);
    }
}
