//! Integration tests for the HTML tokenizer.

use thicket_common::Span;
use thicket_html::{Attribute, HTMLTokenizer, ParseErrorCode, SpannedToken, Token};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input).with_warnings(false);
    tokenizer.run().unwrap();
    tokenizer.into_tokens()
}

/// Helper to tokenize a string and return the recorded error codes
fn error_codes(input: &str) -> Vec<ParseErrorCode> {
    let mut tokenizer = HTMLTokenizer::new(input).with_warnings(false);
    tokenizer.run().unwrap();
    tokenizer.issues().iter().map(|issue| issue.code).collect()
}

/// Concatenate the character tokens
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

fn start_tag(name: &str, attributes: &[(&str, &str)], self_closing: bool) -> Token {
    Token::StartTag {
        name: name.to_string(),
        self_closing,
        attributes: attributes
            .iter()
            .map(|(n, v)| Attribute::new((*n).to_string(), (*v).to_string()))
            .collect(),
    }
}

fn end_tag(name: &str) -> Token {
    Token::EndTag {
        name: name.to_string(),
        self_closing: false,
        attributes: Vec::new(),
    }
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_empty_input_is_just_eof() {
    assert_eq!(tokenize(""), vec![Token::EndOfFile]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(*public_identifier, None);
            assert_eq!(*system_identifier, None);
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other}"),
    }
}

#[test]
fn test_doctype_name_is_lowercased() {
    let tokens = tokenize("<!doctype HTML>");
    assert!(matches!(&tokens[0], Token::Doctype { name: Some(n), .. } if n == "html"));
}

#[test]
fn test_doctype_public_and_system_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    match &tokens[0] {
        Token::Doctype {
            public_identifier,
            system_identifier,
            force_quirks,
            ..
        } => {
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other}"),
    }
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    assert!(matches!(
        &tokens[0],
        Token::Doctype {
            name: None,
            force_quirks: true,
            ..
        }
    ));
    assert!(error_codes("<!DOCTYPE>").contains(&ParseErrorCode::MissingDoctypeName));
}

#[test]
fn test_start_and_end_tags() {
    let tokens = tokenize("<div></div>");
    assert_eq!(
        tokens,
        vec![start_tag("div", &[], false), end_tag("div"), Token::EndOfFile]
    );
}

#[test]
fn test_tag_names_are_lowercased() {
    let tokens = tokenize("<DiV></DIV>");
    assert_eq!(tokens[0], start_tag("div", &[], false));
    assert_eq!(tokens[1], end_tag("div"));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert_eq!(tokens[0], start_tag("br", &[], true));
}

#[test]
fn test_attribute_forms() {
    let tokens = tokenize(r#"<input type="text" name='q' value=42 disabled>"#);
    assert_eq!(
        tokens[0],
        start_tag(
            "input",
            &[("type", "text"), ("name", "q"), ("value", "42"), ("disabled", "")],
            false
        )
    );
}

#[test]
fn test_attribute_names_are_lowercased() {
    let tokens = tokenize(r#"<div CLASS="Big">"#);
    assert_eq!(tokens[0], start_tag("div", &[("class", "Big")], false));
}

#[test]
fn test_duplicate_attribute_keeps_first_value() {
    let input = r#"<p id="first" id="second">"#;
    let tokens = tokenize(input);
    assert_eq!(tokens[0], start_tag("p", &[("id", "first")], false));
    assert_eq!(error_codes(input), vec![ParseErrorCode::DuplicateAttribute]);
}

#[test]
fn test_end_tag_with_attributes_is_reported() {
    let codes = error_codes(r#"</p class="x">"#);
    assert_eq!(codes, vec![ParseErrorCode::EndTagWithAttributes]);
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hi -->");
    assert_eq!(
        tokens,
        vec![
            Token::Comment {
                data: " hi ".to_string()
            },
            Token::EndOfFile
        ]
    );
}

#[test]
fn test_abruptly_closed_empty_comment() {
    let input = "<!-->x";
    let tokens = tokenize(input);
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: String::new()
        }
    );
    assert!(matches!(tokens[1], Token::Character { data: 'x' }));
    assert_eq!(error_codes(input), vec![ParseErrorCode::AbruptClosingOfEmptyComment]);
}

#[test]
fn test_question_mark_starts_bogus_comment() {
    let input = "<?xml version?>";
    let tokens = tokenize(input);
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "?xml version?".to_string()
        }
    );
    assert_eq!(
        error_codes(input),
        vec![ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName]
    );
}

#[test]
fn test_less_than_followed_by_digit_is_text() {
    let input = "<1";
    let tokens = tokenize(input);
    assert_eq!(text_of(&tokens), "<1");
    assert_eq!(
        error_codes(input),
        vec![ParseErrorCode::InvalidFirstCharacterOfTagName]
    );
}

#[test]
fn test_empty_end_tag_is_dropped() {
    let input = "a</>b";
    let tokens = tokenize(input);
    assert_eq!(text_of(&tokens), "ab");
    assert_eq!(tokens.len(), 3);
    assert_eq!(error_codes(input), vec![ParseErrorCode::MissingEndTagName]);
}

#[test]
fn test_eof_after_less_than_sign() {
    let tokens = tokenize("a<");
    assert_eq!(text_of(&tokens), "a<");
    assert_eq!(tokens.last(), Some(&Token::EndOfFile));
    assert_eq!(error_codes("a<"), vec![ParseErrorCode::EofBeforeTagName]);
}

#[test]
fn test_eof_inside_tag_keeps_the_partial_tag() {
    let input = r#"<div class="x"#;
    let tokens = tokenize(input);
    assert_eq!(
        tokens,
        vec![start_tag("div", &[("class", "x")], false), Token::EndOfFile]
    );
    assert_eq!(error_codes(input), vec![ParseErrorCode::EofInTag]);
}

#[test]
fn test_eof_inside_comment_keeps_the_comment() {
    let input = "<!-- open";
    let tokens = tokenize(input);
    assert_eq!(
        tokens,
        vec![
            Token::Comment {
                data: " open".to_string()
            },
            Token::EndOfFile
        ]
    );
    assert_eq!(error_codes(input), vec![ParseErrorCode::EofInComment]);
}

#[test]
fn test_null_character_in_data_is_reported() {
    let tokens = tokenize("a\0b");
    assert!(matches!(tokens[1], Token::Character { data: '\0' }));
    assert_eq!(error_codes("a\0b"), vec![ParseErrorCode::UnexpectedNullCharacter]);
}

#[test]
fn test_title_content_is_rcdata() {
    let tokens = tokenize("<title>a <b> &amp; c</title>");
    assert_eq!(tokens[0], start_tag("title", &[], false));
    assert_eq!(text_of(&tokens), "a <b> & c");
    assert_eq!(tokens[tokens.len() - 2], end_tag("title"));
}

#[test]
fn test_style_content_is_rawtext() {
    let tokens = tokenize("<style>p > a { content: '&amp;' }</style>");
    assert_eq!(text_of(&tokens), "p > a { content: '&amp;' }");
    assert_eq!(tokens[tokens.len() - 2], end_tag("style"));
}

#[test]
fn test_script_content_is_not_markup() {
    let tokens = tokenize(r#"<script>if (a<b) x = "</p>";</script>"#);
    assert_eq!(tokens[0], start_tag("script", &[], false));
    assert_eq!(text_of(&tokens), r#"if (a<b) x = "</p>";"#);
    assert_eq!(tokens[tokens.len() - 2], end_tag("script"));
}

#[test]
fn test_script_end_tag_is_case_insensitive() {
    let tokens = tokenize("<script>x</SCRIPT>y");
    assert_eq!(tokens[2], end_tag("script"));
    assert!(matches!(tokens[3], Token::Character { data: 'y' }));
}

#[test]
fn test_script_escaped_comment_hides_end_tag() {
    let tokens = tokenize("<script><!--<script></script>--></script>");
    assert_eq!(text_of(&tokens), "<!--<script></script>-->");
    assert_eq!(tokens[tokens.len() - 2], end_tag("script"));
}

#[test]
fn test_plaintext_swallows_everything() {
    let tokens = tokenize("<plaintext></plaintext><b>");
    assert_eq!(tokens[0], start_tag("plaintext", &[], false));
    assert_eq!(text_of(&tokens), "</plaintext><b>");
}

#[test]
fn test_spans_cover_source_text() {
    let input = r#"<p class="a">hi</p>"#;
    let mut tokenizer = HTMLTokenizer::new(input).with_warnings(false);
    let spanned: Vec<SpannedToken> = tokenizer.by_ref().map(Result::unwrap).collect();

    assert_eq!(spanned[0].span, Span::new(0, 13));
    assert_eq!(&input[spanned[0].span.start..spanned[0].span.end], r#"<p class="a">"#);
    assert_eq!(spanned[1].span, Span::new(13, 14));
    assert_eq!(spanned[3].span, Span::new(15, 19));
    assert_eq!(spanned[4].token, Token::EndOfFile);
    assert_eq!(spanned[4].span, Span::point(input.len()));
}

#[test]
fn test_spans_use_normalized_offsets() {
    let mut tokenizer = HTMLTokenizer::new("a\r\nb").with_warnings(false);
    let spanned: Vec<SpannedToken> = tokenizer.by_ref().map(Result::unwrap).collect();
    assert_eq!(spanned[1].token, Token::Character { data: '\n' });
    assert_eq!(spanned[2].span, Span::new(2, 3));
}

#[test]
fn test_eof_repeats_after_end() {
    let mut tokenizer = HTMLTokenizer::new("x").with_warnings(false);
    let _ = tokenizer.next_token().unwrap();
    assert!(tokenizer.next_token().unwrap().token.is_eof());
    assert!(tokenizer.next_token().unwrap().token.is_eof());
}

#[test]
fn test_iterator_stops_after_eof() {
    let tokenizer = HTMLTokenizer::new("<a>").with_warnings(false);
    assert_eq!(tokenizer.count(), 2);
}

#[test]
fn test_take_issues_drains() {
    let mut tokenizer = HTMLTokenizer::new("<1").with_warnings(false);
    tokenizer.run().unwrap();
    assert_eq!(tokenizer.take_issues().len(), 1);
    assert!(tokenizer.issues().is_empty());
}
