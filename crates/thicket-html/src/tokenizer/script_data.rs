//! Script data states, including the escaped and double-escaped forms that
//! keep `<!-- <script> ... </script> -->` inside a script from ending it early.

use thicket_common::ContractResult;

use super::core::{HTMLTokenizer, TokenizerState};
use crate::error::ParseErrorCode;

impl HTMLTokenizer {
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    pub(super) fn handle_script_data_state(&mut self) {
        if self.current_input_character == Some('<') {
            // "U+003C LESS-THAN SIGN (<) - Switch to the script data less-than sign state."
            self.begin_markup();
            self.switch_to(TokenizerState::ScriptDataLessThanSign);
        } else {
            self.emit_raw_text_character();
        }
    }

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    pub(super) fn handle_script_data_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/) - Set the temporary buffer to the empty string.
            // Switch to the script data end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEndTagOpen);
            }
            // "U+0021 EXCLAMATION MARK (!) - Switch to the script data escape start state.
            // Emit a U+003C LESS-THAN SIGN character token and a U+0021 EXCLAMATION MARK
            // character token."
            Some('!') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStart);
                self.emit_character_token('<');
                self.emit_character_token('!');
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token. Reconsume in
            // the script data state."
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    pub(super) fn handle_script_data_end_tag_open_state(&mut self) {
        self.handle_text_end_tag_open(
            TokenizerState::ScriptData,
            TokenizerState::ScriptDataEndTagName,
        );
    }

    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    pub(super) fn handle_script_data_end_tag_name_state(&mut self) -> ContractResult<()> {
        self.handle_text_end_tag_name(TokenizerState::ScriptData)
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    pub(super) fn handle_script_data_escape_start_state(&mut self) {
        self.handle_escape_start_dash(TokenizerState::ScriptDataEscapeStartDash);
    }

    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    pub(super) fn handle_script_data_escape_start_dash_state(&mut self) {
        self.handle_escape_start_dash(TokenizerState::ScriptDataEscapedDashDash);
    }

    /// "U+002D HYPHEN-MINUS (-) - Switch to the X state. Emit a U+002D
    /// HYPHEN-MINUS character token."
    /// "Anything else - Reconsume in the script data state."
    fn handle_escape_start_dash(&mut self, next: TokenizerState) {
        if self.current_input_character == Some('-') {
            self.switch_to(next);
            self.emit_character_token('-');
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    pub(super) fn handle_script_data_escaped_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the script data escaped dash state.
            // Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDash);
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the script data escaped less-than
            // sign state."
            Some('<') => {
                self.begin_markup();
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            _ => self.emit_escaped_script_character(TokenizerState::ScriptDataEscaped),
        }
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    pub(super) fn handle_script_data_escaped_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the script data escaped dash dash
            // state. Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_character_token('-');
            }
            Some('<') => {
                self.begin_markup();
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            _ => self.emit_escaped_script_character(TokenizerState::ScriptDataEscaped),
        }
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    pub(super) fn handle_script_data_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => self.emit_character_token('-'),
            Some('<') => {
                self.begin_markup();
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            // "U+003E GREATER-THAN SIGN (>) - Switch to the script data state. Emit a
            // U+003E GREATER-THAN SIGN character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            _ => self.emit_escaped_script_character(TokenizerState::ScriptDataEscaped),
        }
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_escaped_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/) - Set the temporary buffer to the empty string. Switch
            // to the script data escaped end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEscapedEndTagOpen);
            }
            // "ASCII alpha - Set the temporary buffer to the empty string. Emit a U+003C
            // LESS-THAN SIGN character token. Reconsume in the script data double escape
            // start state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.clear();
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscapeStart);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token. Reconsume in
            // the script data escaped state."
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    pub(super) fn handle_script_data_escaped_end_tag_open_state(&mut self) {
        self.handle_text_end_tag_open(
            TokenizerState::ScriptDataEscaped,
            TokenizerState::ScriptDataEscapedEndTagName,
        );
    }

    /// [§ 13.2.5.25 Script data escaped end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    pub(super) fn handle_script_data_escaped_end_tag_name_state(&mut self) -> ContractResult<()> {
        self.handle_text_end_tag_name(TokenizerState::ScriptDataEscaped)
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    pub(super) fn handle_script_data_double_escape_start_state(&mut self) {
        self.handle_double_escape_boundary(
            TokenizerState::ScriptDataDoubleEscaped,
            TokenizerState::ScriptDataEscaped,
        );
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    pub(super) fn handle_script_data_double_escaped_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the script data double escaped dash
            // state. Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDash);
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the script data double escaped
            // less-than sign state. Emit a U+003C LESS-THAN SIGN character token."
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            _ => self.emit_escaped_script_character(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDashDash);
                self.emit_character_token('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            _ => self.emit_escaped_script_character(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.emit_character_token('-'),
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            // "U+003E GREATER-THAN SIGN (>) - Switch to the script data state. Emit a
            // U+003E GREATER-THAN SIGN character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            _ => self.emit_escaped_script_character(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_double_escaped_less_than_sign_state(&mut self) {
        if self.current_input_character == Some('/') {
            // "Set the temporary buffer to the empty string. Switch to the script data
            // double escape end state. Emit a U+002F SOLIDUS character token."
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::ScriptDataDoubleEscapeEnd);
            self.emit_character_token('/');
        } else {
            self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped);
        }
    }

    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    pub(super) fn handle_script_data_double_escape_end_state(&mut self) {
        self.handle_double_escape_boundary(
            TokenizerState::ScriptDataEscaped,
            TokenizerState::ScriptDataDoubleEscaped,
        );
    }

    /// The double escape start and end states are mirror images:
    ///
    /// "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED, U+0020 SPACE,
    /// U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>) - If the temporary buffer is the
    /// string "script", then switch to the X state. Otherwise, switch to the Y state.
    /// Emit the current input character as a character token."
    /// "ASCII alpha - Append the lowercase version of the current input character to
    /// the temporary buffer. Emit the current input character as a character token."
    /// "Anything else - Reconsume in the Y state."
    fn handle_double_escape_boundary(
        &mut self,
        on_script: TokenizerState,
        otherwise: TokenizerState,
    ) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                let next = if self.temporary_buffer == "script" {
                    on_script
                } else {
                    otherwise
                };
                self.switch_to(next);
                self.emit_character_token(c);
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_character_token(c);
            }
            _ => self.reconsume_in(otherwise),
        }
    }

    /// Tail shared by the escaped and double escaped states:
    ///
    /// "U+0000 NULL - This is an unexpected-null-character parse error. Switch to the
    /// X state. Emit a U+FFFD REPLACEMENT CHARACTER character token."
    /// "EOF - This is an eof-in-script-html-comment-like-text parse error. Emit an
    /// end-of-file token."
    /// "Anything else - Switch to the X state. Emit the current input character as a
    /// character token."
    fn emit_escaped_script_character(&mut self, escaped: TokenizerState) {
        match self.current_input_character {
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.switch_to(escaped);
                self.emit_character_token('\u{FFFD}');
            }
            None => {
                self.parse_error(ParseErrorCode::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            Some(c) => {
                self.switch_to(escaped);
                self.emit_character_token(c);
            }
        }
    }
}
