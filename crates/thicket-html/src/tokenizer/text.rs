//! Text content states: data, RCDATA, RAWTEXT and PLAINTEXT, plus the end
//! tag detection shared by every raw text content model.

use thicket_common::ContractResult;

use super::core::{HTMLTokenizer, TokenizerState};
use crate::error::ParseErrorCode;

impl HTMLTokenizer {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    pub(super) fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            Some('&') => {
                self.return_state = Some(TokenizerState::Data);
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => {
                self.begin_markup();
                self.switch_to(TokenizerState::TagOpen);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\0');
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    pub(super) fn handle_rcdata_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&)"
            // "Set the return state to the RCDATA state. Switch to the character reference state."
            Some('&') => {
                self.return_state = Some(TokenizerState::RCDATA);
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the RCDATA less-than sign state."
            Some('<') => {
                self.begin_markup();
                self.switch_to(TokenizerState::RCDATALessThanSign);
            }
            _ => self.emit_raw_text_character(),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    pub(super) fn handle_rawtext_state(&mut self) {
        if self.current_input_character == Some('<') {
            // "Switch to the RAWTEXT less-than sign state."
            self.begin_markup();
            self.switch_to(TokenizerState::RAWTEXTLessThanSign);
        } else {
            self.emit_raw_text_character();
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    ///
    /// Nothing ends PLAINTEXT except the end of input.
    pub(super) fn handle_plaintext_state(&mut self) {
        self.emit_raw_text_character();
    }

    /// Tail shared by the RCDATA, RAWTEXT, script data and PLAINTEXT states:
    ///
    /// "U+0000 NULL - This is an unexpected-null-character parse error. Emit a
    /// U+FFFD REPLACEMENT CHARACTER character token."
    /// "EOF - Emit an end-of-file token."
    /// "Anything else - Emit the current input character as a character token."
    pub(super) fn emit_raw_text_character(&mut self) {
        match self.current_input_character {
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    pub(super) fn handle_rcdata_less_than_sign_state(&mut self) {
        self.handle_text_less_than_sign(
            TokenizerState::RCDATA,
            TokenizerState::RCDATAEndTagOpen,
        );
    }

    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    pub(super) fn handle_rawtext_less_than_sign_state(&mut self) {
        self.handle_text_less_than_sign(
            TokenizerState::RAWTEXT,
            TokenizerState::RAWTEXTEndTagOpen,
        );
    }

    /// "U+002F SOLIDUS (/)"
    /// "Set the temporary buffer to the empty string. Switch to the X end tag open state."
    /// "Anything else"
    /// "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the X state."
    fn handle_text_less_than_sign(
        &mut self,
        text_state: TokenizerState,
        end_tag_open: TokenizerState,
    ) {
        if self.current_input_character == Some('/') {
            self.temporary_buffer.clear();
            self.switch_to(end_tag_open);
        } else {
            self.emit_character_token('<');
            self.reconsume_in(text_state);
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    pub(super) fn handle_rcdata_end_tag_open_state(&mut self) {
        self.handle_text_end_tag_open(TokenizerState::RCDATA, TokenizerState::RCDATAEndTagName);
    }

    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    pub(super) fn handle_rawtext_end_tag_open_state(&mut self) {
        self.handle_text_end_tag_open(TokenizerState::RAWTEXT, TokenizerState::RAWTEXTEndTagName);
    }

    /// Shared by the RCDATA, RAWTEXT, script data and script data escaped end
    /// tag open states.
    pub(super) fn handle_text_end_tag_open(
        &mut self,
        text_state: TokenizerState,
        end_tag_name: TokenizerState,
    ) {
        match self.current_input_character {
            // "ASCII alpha"
            // "Create a new end tag token, set its tag name to the empty string. Reconsume in
            // the X end tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.builder.end_tag();
                self.reconsume_in(end_tag_name);
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token and a U+002F SOLIDUS character token.
            // Reconsume in the X state."
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    pub(super) fn handle_rcdata_end_tag_name_state(&mut self) -> ContractResult<()> {
        self.handle_text_end_tag_name(TokenizerState::RCDATA)
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    pub(super) fn handle_rawtext_end_tag_name_state(&mut self) -> ContractResult<()> {
        self.handle_text_end_tag_name(TokenizerState::RAWTEXT)
    }

    /// Shared by every "X end tag name state". Only an appropriate end tag
    /// leaves the raw text content model; anything else is replayed as text.
    pub(super) fn handle_text_end_tag_name(
        &mut self,
        text_state: TokenizerState,
    ) -> ContractResult<()> {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab)"
            // "U+000A LINE FEED (LF)"
            // "U+000C FORM FEED (FF)"
            // "U+0020 SPACE"
            // "If the current end tag token is an appropriate end tag token, then switch to the
            // before attribute name state. Otherwise, treat it as per the "anything else" entry below."
            Some(c) if Self::is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "U+002F SOLIDUS (/)"
            // "If the current end tag token is an appropriate end tag token, then switch to the
            // self-closing start tag state."
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "If the current end tag token is an appropriate end tag token, then switch to the
            // data state and emit the current tag token."
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token()?;
            }
            // "ASCII alpha"
            // "Append the lowercase version of the current input character to the current tag
            // token's tag name. Append the current input character to the temporary buffer."
            Some(c) if c.is_ascii_alphabetic() => {
                self.builder.push_tag_name(c.to_ascii_lowercase())?;
                self.temporary_buffer.push(c);
            }
            // "Anything else"
            _ => self.emit_end_tag_name_anything_else(text_state),
        }
        Ok(())
    }
}
