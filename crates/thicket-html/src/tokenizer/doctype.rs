//! DOCTYPE states.
//!
//! [§ 13.2.5.53](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
//! through [§ 13.2.5.68](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state).

use thicket_common::ContractResult;

use super::core::{HTMLTokenizer, TokenizerState};
use crate::error::ParseErrorCode;

/// Which identifier of the DOCTYPE a state is reading.
#[derive(Clone, Copy)]
enum Identifier {
    Public,
    System,
}

impl HTMLTokenizer {
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) -> ContractResult<()> {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED,
            // U+0020 SPACE - Switch to the before DOCTYPE name state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            // "U+003E GREATER-THAN SIGN (>) - Reconsume in the before DOCTYPE name state."
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            // "EOF - This is an eof-in-doctype parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Emit the current token. Emit an
            // end-of-file token."
            None => {
                self.builder.doctype();
                self.eof_in_doctype()?;
            }
            // "Anything else - This is a missing-whitespace-before-doctype-name parse
            // error. Reconsume in the before DOCTYPE name state."
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) -> ContractResult<()> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-doctype-name parse error.
            // Create a new DOCTYPE token. Set its force-quirks flag to on. Switch to the
            // data state. Emit the current token."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingDoctypeName);
                self.builder.doctype();
                self.builder.set_force_quirks()?;
                self.switch_to(TokenizerState::Data);
                self.emit_current_token()?;
            }
            None => {
                self.builder.doctype();
                self.eof_in_doctype()?;
            }
            // "Create a new DOCTYPE token. Set the token's name to the lowercase version
            // of the current input character [or U+FFFD for NULL]. Switch to the DOCTYPE
            // name state."
            Some(c) => {
                let first = if c == '\0' {
                    self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                    '\u{FFFD}'
                } else {
                    c.to_ascii_lowercase()
                };
                self.builder.doctype();
                self.builder.push_doctype_name(first)?;
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) -> ContractResult<()> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token()?;
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.builder.push_doctype_name('\u{FFFD}')?;
            }
            None => self.eof_in_doctype()?,
            Some(c) => self.builder.push_doctype_name(c.to_ascii_lowercase())?,
        }
        Ok(())
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) -> ContractResult<()> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token()?;
            }
            None => self.eof_in_doctype()?,
            // "If the six characters starting from the current input character are an
            // ASCII case-insensitive match for the word "PUBLIC", then consume those
            // characters and switch to the after DOCTYPE public keyword state."
            Some(c) if c.eq_ignore_ascii_case(&'p') && self.reader.matches_ignore_case("ublic") => {
                self.reader.advance_by(5);
                self.switch_to(TokenizerState::AfterDOCTYPEPublicKeyword);
            }
            // "Otherwise, if [they] are an ASCII case-insensitive match for the word
            // "SYSTEM", then consume those characters and switch to the after DOCTYPE
            // system keyword state."
            Some(c) if c.eq_ignore_ascii_case(&'s') && self.reader.matches_ignore_case("ystem") => {
                self.reader.advance_by(5);
                self.switch_to(TokenizerState::AfterDOCTYPESystemKeyword);
            }
            // "Otherwise, this is an invalid-character-sequence-after-doctype-name parse
            // error. Set the current DOCTYPE token's force-quirks flag to on. Reconsume
            // in the bogus DOCTYPE state."
            Some(_) => {
                self.parse_error(ParseErrorCode::InvalidCharacterSequenceAfterDoctypeName);
                self.builder.set_force_quirks()?;
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    pub(super) fn handle_after_doctype_public_keyword_state(&mut self) -> ContractResult<()> {
        self.handle_after_keyword(Identifier::Public)
    }

    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_system_keyword_state(&mut self) -> ContractResult<()> {
        self.handle_after_keyword(Identifier::System)
    }

    fn handle_after_keyword(&mut self, which: Identifier) -> ContractResult<()> {
        match self.current_input_character {
            // "Switch to the before DOCTYPE public/system identifier state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(match which {
                    Identifier::Public => TokenizerState::BeforeDOCTYPEPublicIdentifier,
                    Identifier::System => TokenizerState::BeforeDOCTYPESystemIdentifier,
                });
            }
            // "U+0022 QUOTATION MARK ("), U+0027 APOSTROPHE (') - This is a
            // missing-whitespace-after-doctype-public-keyword parse error. Set the
            // DOCTYPE token's public identifier to the empty string (not missing), then
            // switch to the DOCTYPE public identifier (double/single-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(match which {
                    Identifier::Public => ParseErrorCode::MissingWhitespaceAfterDoctypePublicKeyword,
                    Identifier::System => ParseErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword,
                });
                self.open_identifier(which, quote)?;
            }
            _ => self.handle_missing_identifier(which)?,
        }
        Ok(())
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    pub(super) fn handle_before_doctype_public_identifier_state(&mut self) -> ContractResult<()> {
        self.handle_before_identifier(Identifier::Public)
    }

    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_system_identifier_state(&mut self) -> ContractResult<()> {
        self.handle_before_identifier(Identifier::System)
    }

    fn handle_before_identifier(&mut self, which: Identifier) -> ContractResult<()> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.open_identifier(which, quote)?,
            _ => self.handle_missing_identifier(which)?,
        }
        Ok(())
    }

    /// The `>`, EOF and "anything else" entries shared by the keyword and
    /// before-identifier states.
    fn handle_missing_identifier(&mut self, which: Identifier) -> ContractResult<()> {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-doctype-public-identifier
            // parse error. Set the current DOCTYPE token's force-quirks flag to on.
            // Switch to the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.parse_error(match which {
                    Identifier::Public => ParseErrorCode::MissingDoctypePublicIdentifier,
                    Identifier::System => ParseErrorCode::MissingDoctypeSystemIdentifier,
                });
                self.builder.set_force_quirks()?;
                self.switch_to(TokenizerState::Data);
                self.emit_current_token()?;
            }
            None => self.eof_in_doctype()?,
            // "Anything else - This is a missing-quote-before-doctype-public-identifier
            // parse error. Set the current DOCTYPE token's force-quirks flag to on.
            // Reconsume in the bogus DOCTYPE state."
            Some(_) => {
                self.parse_error(match which {
                    Identifier::Public => ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier,
                    Identifier::System => ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier,
                });
                self.builder.set_force_quirks()?;
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
        Ok(())
    }

    /// "Set the current DOCTYPE token's X identifier to the empty string (not
    /// missing), then switch to the DOCTYPE X identifier (double/single-quoted) state."
    fn open_identifier(&mut self, which: Identifier, quote: char) -> ContractResult<()> {
        let double = quote == '"';
        match which {
            Identifier::Public => {
                self.builder.start_public_identifier()?;
                self.switch_to(if double {
                    TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted
                } else {
                    TokenizerState::DOCTYPEPublicIdentifierSingleQuoted
                });
            }
            Identifier::System => {
                self.builder.start_system_identifier()?;
                self.switch_to(if double {
                    TokenizerState::DOCTYPESystemIdentifierDoubleQuoted
                } else {
                    TokenizerState::DOCTYPESystemIdentifierSingleQuoted
                });
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_public_identifier_quoted_state(
        &mut self,
        quote: char,
    ) -> ContractResult<()> {
        self.handle_quoted_identifier(Identifier::Public, quote)
    }

    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_system_identifier_quoted_state(
        &mut self,
        quote: char,
    ) -> ContractResult<()> {
        self.handle_quoted_identifier(Identifier::System, quote)
    }

    fn handle_quoted_identifier(&mut self, which: Identifier, quote: char) -> ContractResult<()> {
        match self.current_input_character {
            // "Switch to the after DOCTYPE public/system identifier state."
            Some(c) if c == quote => self.switch_to(match which {
                Identifier::Public => TokenizerState::AfterDOCTYPEPublicIdentifier,
                Identifier::System => TokenizerState::AfterDOCTYPESystemIdentifier,
            }),
            // "U+0000 NULL - This is an unexpected-null-character parse error. Append a
            // U+FFFD REPLACEMENT CHARACTER to the current DOCTYPE token's identifier."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.push_identifier(which, '\u{FFFD}')?;
            }
            // "U+003E GREATER-THAN SIGN (>) - This is an abrupt-doctype-public-identifier
            // parse error. Set the current DOCTYPE token's force-quirks flag to on.
            // Switch to the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.parse_error(match which {
                    Identifier::Public => ParseErrorCode::AbruptDoctypePublicIdentifier,
                    Identifier::System => ParseErrorCode::AbruptDoctypeSystemIdentifier,
                });
                self.builder.set_force_quirks()?;
                self.switch_to(TokenizerState::Data);
                self.emit_current_token()?;
            }
            None => self.eof_in_doctype()?,
            Some(c) => self.push_identifier(which, c)?,
        }
        Ok(())
    }

    fn push_identifier(&mut self, which: Identifier, c: char) -> ContractResult<()> {
        match which {
            Identifier::Public => self.builder.push_public_identifier(c),
            Identifier::System => self.builder.push_system_identifier(c),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) -> ContractResult<()> {
        match self.current_input_character {
            // "Switch to the between DOCTYPE public and system identifiers state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            // "U+0022 QUOTATION MARK ("), U+0027 APOSTROPHE (') - This is a
            // missing-whitespace-between-doctype-public-and-system-identifiers parse error."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(
                    ParseErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.open_identifier(Identifier::System, quote)?;
            }
            _ => self.handle_identifiers_tail()?,
        }
        Ok(())
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(
        &mut self,
    ) -> ContractResult<()> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.open_identifier(Identifier::System, quote)?,
            _ => self.handle_identifiers_tail()?,
        }
        Ok(())
    }

    /// "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit the current
    /// DOCTYPE token."
    /// "EOF - eof-in-doctype."
    /// "Anything else - This is a missing-quote-before-doctype-system-identifier parse
    /// error. Set the current DOCTYPE token's force-quirks flag to on. Reconsume in
    /// the bogus DOCTYPE state."
    fn handle_identifiers_tail(&mut self) -> ContractResult<()> {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token()?;
            }
            None => self.eof_in_doctype()?,
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.builder.set_force_quirks()?;
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) -> ContractResult<()> {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token()?;
            }
            None => self.eof_in_doctype()?,
            // "Anything else - This is an unexpected-character-after-doctype-system-identifier
            // parse error. Reconsume in the bogus DOCTYPE state. (This does not set the
            // current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) -> ContractResult<()> {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token()?;
            }
            // "U+0000 NULL - This is an unexpected-null-character parse error. Ignore
            // the character."
            Some('\0') => self.parse_error(ParseErrorCode::UnexpectedNullCharacter),
            // "EOF - Emit the DOCTYPE token. Emit an end-of-file token."
            None => self.emit_current_token_and_eof()?,
            Some(_) => {}
        }
        Ok(())
    }

    /// "EOF - This is an eof-in-doctype parse error. Set the current DOCTYPE
    /// token's force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) -> ContractResult<()> {
        self.parse_error(ParseErrorCode::EofInDoctype);
        self.builder.set_force_quirks()?;
        self.emit_current_token_and_eof()
    }
}
