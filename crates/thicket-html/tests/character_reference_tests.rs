//! Tests for named and numeric character references in text and attributes.

use thicket_common::Span;
use thicket_html::tokenizer::named_character_references::lookup_entity;
use thicket_html::{HTMLTokenizer, ParseErrorCode, SpannedToken, Token};

fn tokenize(input: &str) -> (Vec<SpannedToken>, Vec<ParseErrorCode>) {
    let mut tokenizer = HTMLTokenizer::new(input).with_warnings(false);
    let mut tokens = Vec::new();
    loop {
        let spanned = tokenizer.next_token().unwrap();
        let done = spanned.token.is_eof();
        tokens.push(spanned);
        if done {
            break;
        }
    }
    let codes = tokenizer.issues().iter().map(|issue| issue.code).collect();
    (tokens, codes)
}

/// Decoded text and the error codes it produced.
fn decode(input: &str) -> (String, Vec<ParseErrorCode>) {
    let (tokens, codes) = tokenize(input);
    let text = tokens
        .iter()
        .filter_map(|spanned| match spanned.token {
            Token::Character { data } => Some(data),
            _ => None,
        })
        .collect();
    (text, codes)
}

/// Value of attribute `title` on the first tag of `input`.
fn title_attribute(input: &str) -> String {
    let (tokens, _) = tokenize(input);
    tokens[0].token.attribute("title").unwrap_or_default().to_string()
}

#[test]
fn test_named_references() {
    assert_eq!(decode("&amp;&lt;&gt;&quot;"), ("&<>\"".to_string(), vec![]));
    assert_eq!(decode("&copy; &eacute;"), ("\u{A9} \u{E9}".to_string(), vec![]));
}

#[test]
fn test_reference_expanding_to_two_characters() {
    assert_eq!(decode("&fjlig;").0, "fj");
}

#[test]
fn test_legacy_reference_without_semicolon() {
    let (text, codes) = decode("a &amp b");
    assert_eq!(text, "a & b");
    assert_eq!(codes, vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]);
}

#[test]
fn test_longest_legacy_prefix_wins() {
    let (text, codes) = decode("&notit;");
    assert_eq!(text, "\u{AC}it;");
    assert_eq!(codes, vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]);
}

#[test]
fn test_unknown_reference_stays_literal() {
    let (text, codes) = decode("&bogus;");
    assert_eq!(text, "&bogus;");
    assert_eq!(codes, vec![ParseErrorCode::UnknownNamedCharacterReference]);
}

#[test]
fn test_unknown_reference_without_semicolon_is_not_an_error() {
    assert_eq!(decode("&bogus x"), ("&bogus x".to_string(), vec![]));
}

#[test]
fn test_bare_ampersand() {
    assert_eq!(decode("a & b"), ("a & b".to_string(), vec![]));
    assert_eq!(decode("a&"), ("a&".to_string(), vec![]));
}

#[test]
fn test_decimal_and_hexadecimal_references() {
    assert_eq!(decode("&#65;&#x42;&#X43;"), ("ABC".to_string(), vec![]));
}

#[test]
fn test_numeric_reference_without_semicolon() {
    let (text, codes) = decode("&#65 x");
    assert_eq!(text, "A x");
    assert_eq!(codes, vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]);
}

#[test]
fn test_numeric_reference_at_eof() {
    let (text, codes) = decode("&#x41");
    assert_eq!(text, "A");
    assert_eq!(codes, vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]);
}

#[test]
fn test_numeric_reference_without_digits() {
    let (text, codes) = decode("&#;");
    assert_eq!(text, "&#;");
    assert_eq!(codes, vec![ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference]);

    let (text, _) = decode("&#xg;");
    assert_eq!(text, "&#xg;");
}

#[test]
fn test_null_reference_becomes_replacement_character() {
    let (text, codes) = decode("&#0;");
    assert_eq!(text, "\u{FFFD}");
    assert_eq!(codes, vec![ParseErrorCode::NullCharacterReference]);
}

#[test]
fn test_out_of_range_reference() {
    let (text, codes) = decode("&#x110000;");
    assert_eq!(text, "\u{FFFD}");
    assert_eq!(codes, vec![ParseErrorCode::CharacterReferenceOutsideUnicodeRange]);

    let (text, _) = decode("&#99999999999999999999;");
    assert_eq!(text, "\u{FFFD}");
}

#[test]
fn test_surrogate_reference() {
    let (text, codes) = decode("&#xD800;");
    assert_eq!(text, "\u{FFFD}");
    assert_eq!(codes, vec![ParseErrorCode::SurrogateCharacterReference]);
}

#[test]
fn test_c1_control_reference_maps_to_windows_1252() {
    let (text, codes) = decode("&#x80;&#x99;");
    assert_eq!(text, "\u{20AC}\u{2122}");
    assert_eq!(
        codes,
        vec![
            ParseErrorCode::ControlCharacterReference,
            ParseErrorCode::ControlCharacterReference
        ]
    );
}

#[test]
fn test_noncharacter_reference_is_kept() {
    let (text, codes) = decode("&#xFFFE;");
    assert_eq!(text, "\u{FFFE}");
    assert_eq!(codes, vec![ParseErrorCode::NoncharacterCharacterReference]);
}

#[test]
fn test_reference_in_attribute_value() {
    assert_eq!(title_attribute(r#"<a title="x &amp; y">"#), "x & y");
    assert_eq!(title_attribute("<a title='&#60;'>"), "<");
    assert_eq!(title_attribute("<a title=&lt;b>"), "<b");
}

#[test]
fn test_legacy_reference_in_attribute_before_equals_is_literal() {
    assert_eq!(title_attribute(r#"<a title="?x=1&amp=2">"#), "?x=1&amp=2");
    assert_eq!(title_attribute(r#"<a title="&notit">"#), "&notit");
}

#[test]
fn test_reference_characters_span_the_whole_reference() {
    let (tokens, _) = tokenize("x&amp;y");
    assert_eq!(tokens[1].token, Token::Character { data: '&' });
    assert_eq!(tokens[1].span, Span::new(1, 6));
    assert_eq!(tokens[2].span, Span::new(6, 7));

    let (tokens, _) = tokenize("&#65;x");
    assert_eq!(tokens[0].span, Span::new(0, 5));
    assert_eq!(tokens[1].span, Span::new(5, 6));
}

#[test]
fn test_lookup_table() {
    assert_eq!(lookup_entity("nbsp;"), Some("\u{A0}"));
    assert_eq!(lookup_entity("nbsp"), Some("\u{A0}"));
    assert_eq!(lookup_entity("apos;"), Some("'"));
    assert_eq!(lookup_entity("apos"), None);
    assert_eq!(lookup_entity("&amp;"), None);
}
