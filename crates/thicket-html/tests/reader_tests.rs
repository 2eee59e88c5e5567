//! Tests for the character reader: cursor movement, lookahead and newline
//! normalization.

use thicket_common::ContractViolation;
use thicket_html::CharacterReader;

#[test]
fn test_consume_walks_the_input() {
    let mut reader = CharacterReader::new("ab");
    assert_eq!(reader.consume(), Some('a'));
    assert_eq!(reader.consume(), Some('b'));
    assert_eq!(reader.consume(), None);
    assert!(reader.is_eof());
}

#[test]
fn test_reading_past_the_end_stays_at_eof() {
    let mut reader = CharacterReader::new("x");
    reader.advance();
    reader.advance();
    reader.advance_by(5);
    assert_eq!(reader.current(), None);
    assert_eq!(reader.peek(3), None);
    assert_eq!(reader.position(), 1);
}

#[test]
fn test_empty_input() {
    let reader = CharacterReader::new("");
    assert!(reader.is_empty());
    assert!(reader.is_eof());
    assert_eq!(reader.current(), None);
}

#[test]
fn test_peek_does_not_move() {
    let reader = CharacterReader::new("abc");
    assert_eq!(reader.peek(0), Some('a'));
    assert_eq!(reader.peek(2), Some('c'));
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_positions_are_byte_offsets() {
    let mut reader = CharacterReader::new("é<");
    assert_eq!(reader.consume(), Some('é'));
    assert_eq!(reader.position(), 2);
    assert_eq!(reader.current(), Some('<'));
}

#[test]
fn test_crlf_and_lone_cr_become_lf() {
    let reader = CharacterReader::new("a\r\nb\rc\n");
    assert_eq!(reader.as_str(), "a\nb\nc\n");
    assert_eq!(reader.len(), 6);
}

#[test]
fn test_mark_and_rewind() {
    let mut reader = CharacterReader::new("hello");
    reader.advance();
    reader.mark();
    reader.advance_by(3);
    assert_eq!(reader.current(), Some('o'));

    reader.rewind().unwrap();
    assert_eq!(reader.position(), 1);
    assert_eq!(reader.current(), Some('e'));
}

#[test]
fn test_rewind_without_mark_is_a_contract_violation() {
    let mut reader = CharacterReader::new("hello");
    let err = reader.rewind().unwrap_err();
    assert!(matches!(err, ContractViolation::NullValue(_)));
}

#[test]
fn test_rewind_clears_the_mark() {
    let mut reader = CharacterReader::new("hello");
    reader.mark();
    reader.rewind().unwrap();
    assert!(reader.rewind().is_err());
}

#[test]
fn test_consume_to() {
    let mut reader = CharacterReader::new("text<tag");
    assert_eq!(reader.consume_to('<'), "text");
    assert_eq!(reader.current(), Some('<'));
    assert_eq!(reader.consume_to('#'), "<tag");
    assert!(reader.is_eof());
}

#[test]
fn test_matches() {
    let mut reader = CharacterReader::new("<!DOCTYPE html>");
    reader.advance_by(2);
    assert!(reader.matches("DOCTYPE"));
    assert!(!reader.matches("doctype"));
    assert!(reader.matches_ignore_case("doctype"));
    assert!(!reader.matches_ignore_case("doctype html> and more"));
}
