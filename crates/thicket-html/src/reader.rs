//! Cursor over the input text.
//!
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
//!
//! The reader owns the preprocessed input and a byte cursor into it. It never
//! reads past the end: every lookup past the last character yields `None`,
//! which the tokenizer treats as EOF.

use thicket_common::contracts::{self, ContractResult};

/// Buffered cursor over preprocessed HTML input.
#[derive(Debug, Clone)]
pub struct CharacterReader {
    input: String,
    pos: usize,
    mark: Option<usize>,
}

impl CharacterReader {
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines. Thus, newlines in HTML DOMs are represented by
    /// U+000A LF characters, and there are never any U+000D CR characters in
    /// the input to the tokenization stage."
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: normalize_newlines(input),
            pos: 0,
            mark: None,
        }
    }

    /// The character under the cursor, or `None` at end of input.
    #[must_use]
    pub fn current(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Move past the current character. Does nothing at end of input.
    pub fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
        }
    }

    /// "Consume the next input character"
    ///
    /// Returns the character under the cursor and moves past it.
    pub fn consume(&mut self) -> Option<char> {
        let c = self.current()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// The character `n` positions after the cursor (`peek(0)` is `current()`).
    #[must_use]
    pub fn peek(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    /// Consume everything up to, not including, the next occurrence of `marker`
    /// (or to the end of input) and return it.
    pub fn consume_to(&mut self, marker: char) -> &str {
        let start = self.pos;
        let end = self.input[start..]
            .find(marker)
            .map_or(self.input.len(), |offset| start + offset);
        self.pos = end;
        &self.input[start..end]
    }

    /// "If the next few characters are..."
    #[must_use]
    pub fn matches(&self, literal: &str) -> bool {
        self.input[self.pos..].starts_with(literal)
    }

    /// "...an ASCII case-insensitive match for the word..."
    #[must_use]
    pub fn matches_ignore_case(&self, literal: &str) -> bool {
        self.input[self.pos..]
            .get(..literal.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(literal))
    }

    /// Move past `n` characters, stopping early at end of input.
    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            if self.consume().is_none() {
                break;
            }
        }
    }

    /// Remember the current position for a later [`rewind`](Self::rewind).
    pub const fn mark(&mut self) {
        self.mark = Some(self.pos);
    }

    /// Restore the cursor to the last [`mark`](Self::mark) and clear the mark.
    ///
    /// # Errors
    ///
    /// Fails with a contract violation if no mark was set.
    pub fn rewind(&mut self) -> ContractResult<()> {
        self.pos = contracts::not_null(self.mark.take(), "rewind called without a mark")?;
        Ok(())
    }

    /// Byte offset of the cursor into the normalized input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Byte length of the normalized input.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.input.len()
    }

    /// Whether the normalized input is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Whether the cursor sits at end of input.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The normalized input.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.input
    }
}

/// Replace every CR LF pair, then every lone CR, with a single LF.
fn normalize_newlines(input: &str) -> String {
    if !input.contains('\r') {
        return input.to_string();
    }
    input.replace("\r\n", "\n").replace('\r', "\n")
}
