//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Token emission ("Emit the current token")
//! - RCDATA/RAWTEXT/script end tag helpers
//! - Attribute helpers for duplicate detection
//! - Parse error recording

use thicket_common::contracts::{self, ContractResult};
use thicket_common::warning::warn_once;
use thicket_common::Span;

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::{SpannedToken, Token};
use crate::error::{ParseErrorCode, ParseIssue};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next step.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// "Switch to the return state" / "Reconsume in the return state"
    pub(super) fn leave_to_return_state(&mut self, reconsume: bool) -> ContractResult<()> {
        let state = contracts::not_null(
            self.return_state.take(),
            "character reference finished without a return state",
        )?;
        if reconsume {
            self.reconsume_in(state);
        } else {
            self.switch_to(state);
        }
        Ok(())
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// The tokenizer's whitespace set. CR never reaches it, the reader
    /// normalizes newlines first.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }

    /// Remember where the `<` of a tag, comment or DOCTYPE was.
    pub(super) const fn begin_markup(&mut self) {
        self.token_start = self.char_start;
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token"
    ///
    /// Finishes the token in the builder and queues it. After a start tag for
    /// a raw text element the content model switches the way the tree
    /// builder's generic RCDATA / raw text / script algorithms would.
    pub(super) fn emit_current_token(&mut self) -> ContractResult<()> {
        let (token, dropped) = self.builder.finish()?;
        if let Some(name) = dropped {
            self.record_issue(ParseErrorCode::DuplicateAttribute, name);
        }

        match &token {
            Token::StartTag { name, .. } => {
                self.last_start_tag_name = Some(name.clone());
                match name.as_str() {
                    // [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
                    // "Switch the tokenizer to the RCDATA state."
                    "title" | "textarea" => self.switch_to(TokenizerState::RCDATA),
                    // "Switch the tokenizer to the RAWTEXT state."
                    "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                        self.switch_to(TokenizerState::RAWTEXT);
                    }
                    // "Switch the tokenizer to the script data state."
                    "script" => self.switch_to(TokenizerState::ScriptData),
                    // "A start tag whose tag name is "plaintext"":
                    // "Switch the tokenizer to the PLAINTEXT state."
                    "plaintext" => self.switch_to(TokenizerState::PLAINTEXT),
                    _ => {}
                }
            }
            Token::EndTag {
                self_closing,
                attributes,
                ..
            } => {
                // "When an end tag token is emitted with attributes, that is an
                // end-tag-with-attributes parse error."
                if !attributes.is_empty() {
                    self.parse_error(ParseErrorCode::EndTagWithAttributes);
                }
                // "When an end tag token is emitted with its self-closing flag
                // set, that is an end-tag-with-trailing-solidus parse error."
                if *self_closing {
                    self.parse_error(ParseErrorCode::EndTagWithTrailingSolidus);
                }
            }
            _ => {}
        }

        let span = Span::new(self.token_start, self.reader.position());
        self.pending.push_back(SpannedToken::new(token, span));
        Ok(())
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        let span = Span::new(self.char_start, self.reader.position());
        self.pending
            .push_back(SpannedToken::new(Token::new_character(c), span));
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        let span = self.eof_span();
        self.pending
            .push_back(SpannedToken::new(Token::EndOfFile, span));
        self.eof_emitted = true;
    }

    /// Emit whatever the builder holds, then end-of-file.
    ///
    /// Unterminated comments, DOCTYPEs and tags are all closed this way so
    /// nothing read so far is lost.
    pub(super) fn emit_current_token_and_eof(&mut self) -> ContractResult<()> {
        self.emit_current_token()?;
        self.emit_eof_token();
        Ok(())
    }

    pub(super) const fn eof_span(&self) -> Span {
        Span::point(self.reader.len())
    }
}

// =============================================================================
// RCDATA/RAWTEXT/Script End Tag Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        self.builder
            .is_end_tag_named(self.last_start_tag_name.as_deref())
    }

    /// "Anything else" branch shared by the RCDATA, RAWTEXT and script data
    /// end tag states:
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer (in the order they were added to the buffer). Reconsume in the
    /// X state."
    pub(super) fn emit_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        for c in buffer.chars() {
            self.emit_character_token(c);
        }
        self.builder.clear();
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Start a new attribute in the current tag token."
    ///
    /// The previous attribute is finished first; if its name was already on
    /// the token, "this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    pub(super) fn start_new_attribute(&mut self) -> ContractResult<()> {
        if let Some(name) = self.builder.start_attribute()? {
            self.record_issue(ParseErrorCode::DuplicateAttribute, name);
        }
        Ok(())
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Records a parse error at the current input character. Parse errors in
    /// HTML are not fatal: the tokenizer recovers and continues.
    pub(super) fn parse_error(&mut self, code: ParseErrorCode) {
        self.record_issue(code, String::new());
    }

    pub(super) fn record_issue(&mut self, code: ParseErrorCode, detail: String) {
        let span = Span::new(self.char_start, self.reader.position());
        let issue = ParseIssue::new(code, span, detail);
        if self.log_warnings {
            warn_once("HTML Tokenizer", &issue.to_string());
        }
        self.issues.push(issue);
    }
}
