//! Character reference states.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//! through [§ 13.2.5.80](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state).

use thicket_common::contracts::{self, ContractResult};
use thicket_common::Span;

use super::core::{HTMLTokenizer, TokenizerState};
use super::named_character_references::{any_entity_has_prefix, lookup_entity};
use super::token::{SpannedToken, Token};
use crate::error::ParseErrorCode;

/// [§ 13.2.5.80](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// C1 control code points a numeric reference maps to the Windows-1252
/// character they stood for. Unlisted C1 codes pass through unchanged.
const C1_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// [Noncharacter](https://infra.spec.whatwg.org/#noncharacter)
const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || (code <= 0x10_FFFF && (code & 0xFFFE) == 0xFFFE)
}

/// [Control](https://infra.spec.whatwg.org/#control) that is not
/// [ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace), or CR.
const fn is_disallowed_control(code: u32) -> bool {
    let control = matches!(code, 0x00..=0x1F | 0x7F..=0x9F);
    code == 0x0D || (control && !matches!(code, 0x09 | 0x0A | 0x0C | 0x20))
}

impl HTMLTokenizer {
    /// Returns true if the return state is an attribute value state.
    /// WHATWG: "consumed as part of an attribute"
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value. Otherwise, emit
    /// each character as a character token."
    ///
    /// Character tokens produced here all span the whole reference. Outside
    /// the named state the current input character is not part of it.
    pub(super) fn flush_code_points_consumed_as_character_reference(
        &mut self,
    ) -> ContractResult<()> {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.is_consumed_as_part_of_attribute() {
            self.builder.push_attribute_value_str(&buffer)?;
        } else {
            let end = if self.state == TokenizerState::NamedCharacterReference {
                self.reader.position()
            } else {
                self.char_start
            };
            let span = Span::new(self.reference_start, end);
            for c in buffer.chars() {
                self.pending
                    .push_back(SpannedToken::new(Token::new_character(c), span));
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) -> ContractResult<()> {
        // Always switched to right after the '&', which is a single byte.
        self.reference_start = self.char_start.saturating_sub(1);

        // "Set the temporary buffer to the empty string. Append a U+0026 AMPERSAND
        // (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');

        match self.current_input_character {
            // "ASCII alphanumeric - Reconsume in the named character reference state."
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            // "U+0023 NUMBER SIGN (#) - Append the current input character to the
            // temporary buffer. Switch to the numeric character reference state."
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            // "Anything else - Flush code points consumed as a character reference.
            // Reconsume in the return state."
            _ => {
                self.flush_code_points_consumed_as_character_reference()?;
                self.leave_to_return_state(true)?;
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the first column of the named
    /// character references table."
    ///
    /// Entered by reconsuming the first alphanumeric. The reader is marked
    /// after each full match and rewound once no longer entity can follow, so
    /// anything read past the longest match is consumed again by the next state.
    pub(super) fn handle_named_character_reference_state(&mut self) -> ContractResult<()> {
        let first = contracts::not_null(
            self.current_input_character,
            "named character reference entered without a character",
        )?;
        let mut name = String::from(first);
        let mut longest: Option<(usize, &'static str)> = None;
        self.reader.mark();

        while !name.ends_with(';') && any_entity_has_prefix(&name) {
            let Some(c) = self.reader.current() else {
                break;
            };
            if !(c.is_ascii_alphanumeric() || c == ';') {
                break;
            }
            self.reader.advance();
            name.push(c);
            if let Some(replacement) = lookup_entity(&name) {
                longest = Some((name.len(), replacement));
                self.reader.mark();
            }
        }
        self.reader.rewind()?;

        // "If there is a match:"
        if let Some((len, replacement)) = longest {
            name.truncate(len);
            let ends_with_semicolon = name.ends_with(';');

            // "If the character reference was consumed as part of an attribute, and the
            // last character matched is not a U+003B SEMICOLON character (;), and the
            // next input character is either a U+003D EQUALS SIGN character (=) or an
            // ASCII alphanumeric, then, for historical reasons, flush code points
            // consumed as a character reference and switch to the return state."
            let next_is_name_like = self
                .reader
                .current()
                .is_some_and(|c| c == '=' || c.is_ascii_alphanumeric());
            if self.is_consumed_as_part_of_attribute() && !ends_with_semicolon && next_is_name_like
            {
                self.temporary_buffer.push_str(&name);
                self.flush_code_points_consumed_as_character_reference()?;
                return self.leave_to_return_state(false);
            }

            // "If the last character matched is not a U+003B SEMICOLON character (;),
            // then this is a missing-semicolon-after-character-reference parse error."
            if !ends_with_semicolon {
                self.record_issue(ParseErrorCode::MissingSemicolonAfterCharacterReference, name);
            }

            // "Set the temporary buffer to the empty string. Append one or two
            // characters corresponding to the character reference name to the
            // temporary buffer. Flush code points consumed as a character reference.
            // Switch to the return state."
            self.temporary_buffer.clear();
            self.temporary_buffer.push_str(replacement);
            self.flush_code_points_consumed_as_character_reference()?;
            self.leave_to_return_state(false)
        } else {
            // "Otherwise - Flush code points consumed as a character reference. Switch
            // to the ambiguous ampersand state."
            self.temporary_buffer.push(first);
            self.flush_code_points_consumed_as_character_reference()?;
            self.switch_to(TokenizerState::AmbiguousAmpersand);
            Ok(())
        }
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) -> ContractResult<()> {
        match self.current_input_character {
            // "ASCII alphanumeric - If the character reference was consumed as part of an
            // attribute, then append the current input character to the current
            // attribute's value. Otherwise, emit the current input character as a
            // character token."
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.is_consumed_as_part_of_attribute() {
                    self.builder.push_attribute_value(c)?;
                } else {
                    self.emit_character_token(c);
                }
            }
            // "U+003B SEMICOLON (;) - This is an unknown-named-character-reference parse
            // error. Reconsume in the return state."
            Some(';') => {
                self.parse_error(ParseErrorCode::UnknownNamedCharacterReference);
                self.leave_to_return_state(true)?;
            }
            // "Anything else - Reconsume in the return state."
            _ => self.leave_to_return_state(true)?,
        }
        Ok(())
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;
        match self.current_input_character {
            // "U+0078 LATIN SMALL LETTER X, U+0058 LATIN CAPITAL LETTER X - Append the
            // current input character to the temporary buffer. Switch to the hexadecimal
            // character reference start state."
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            // "Anything else - Reconsume in the decimal character reference start state."
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    pub(super) fn handle_hexadecimal_character_reference_start_state(
        &mut self,
    ) -> ContractResult<()> {
        self.handle_numeric_start(16, TokenizerState::HexadecimalCharacterReference)
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_decimal_character_reference_start_state(&mut self) -> ContractResult<()> {
        self.handle_numeric_start(10, TokenizerState::DecimalCharacterReference)
    }

    /// "ASCII (hex) digit - Reconsume in the X character reference state."
    /// "Anything else - This is an absence-of-digits-in-numeric-character-reference
    /// parse error. Flush code points consumed as a character reference. Reconsume
    /// in the return state."
    fn handle_numeric_start(&mut self, radix: u32, digits: TokenizerState) -> ContractResult<()> {
        if self
            .current_input_character
            .is_some_and(|c| c.is_digit(radix))
        {
            self.reconsume_in(digits);
        } else {
            self.parse_error(ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference);
            self.flush_code_points_consumed_as_character_reference()?;
            self.leave_to_return_state(true)?;
        }
        Ok(())
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    pub(super) fn handle_hexadecimal_character_reference_state(&mut self) {
        self.handle_numeric_digits(16);
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_decimal_character_reference_state(&mut self) {
        self.handle_numeric_digits(10);
    }

    /// "ASCII digit - Multiply the character reference code by 10 (16). Add a
    /// numeric version of the current input character to the character reference
    /// code."
    /// "U+003B SEMICOLON - Switch to the numeric character reference end state."
    /// "Anything else - This is a missing-semicolon-after-character-reference parse
    /// error. Reconsume in the numeric character reference end state."
    fn handle_numeric_digits(&mut self, radix: u32) {
        match self.current_input_character {
            Some(c) if c.is_digit(radix) => {
                let digit = c.to_digit(radix).unwrap_or(0);
                // Saturates well past 0x10FFFF so overlong references stay out of range.
                self.character_reference_code = self
                    .character_reference_code
                    .saturating_mul(radix)
                    .saturating_add(digit);
            }
            Some(';') => self.switch_to(TokenizerState::NumericCharacterReferenceEnd),
            _ => {
                self.parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// "Check the character reference code". This state consumes nothing, so
    /// the character that follows the reference is always handed back to the
    /// return state.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) -> ContractResult<()> {
        let mut code = self.character_reference_code;

        if code == 0 {
            // "If the number is 0x00, then this is a null-character-reference parse
            // error. Set the character reference code to 0xFFFD."
            self.parse_error(ParseErrorCode::NullCharacterReference);
            code = 0xFFFD;
        } else if code > 0x10_FFFF {
            // "If the number is greater than 0x10FFFF, then this is a
            // character-reference-outside-unicode-range parse error."
            self.parse_error(ParseErrorCode::CharacterReferenceOutsideUnicodeRange);
            code = 0xFFFD;
        } else if (0xD800..=0xDFFF).contains(&code) {
            // "If the number is a surrogate, then this is a
            // surrogate-character-reference parse error."
            self.parse_error(ParseErrorCode::SurrogateCharacterReference);
            code = 0xFFFD;
        } else if is_noncharacter(code) {
            // "If the number is a noncharacter, then this is a
            // noncharacter-character-reference parse error."
            self.parse_error(ParseErrorCode::NoncharacterCharacterReference);
        } else if is_disallowed_control(code) {
            // "If the number is 0x0D, or a control that's not ASCII whitespace, then
            // this is a control-character-reference parse error. If the number is one
            // of the numbers in the first column of the following table, then find the
            // row with that number in the first column, and set the character reference
            // code to the number in the second column of that row."
            self.parse_error(ParseErrorCode::ControlCharacterReference);
            if let Some((_, replacement)) = C1_REPLACEMENTS.iter().find(|(c1, _)| *c1 == code) {
                code = u32::from(*replacement);
            }
        }

        // "Set the temporary buffer to the empty string. Append a code point equal to
        // the character reference code to the temporary buffer. Flush code points
        // consumed as a character reference. Switch to the return state."
        self.temporary_buffer.clear();
        self.temporary_buffer
            .push(char::from_u32(code).unwrap_or('\u{FFFD}'));
        self.flush_code_points_consumed_as_character_reference()?;
        self.leave_to_return_state(true)
    }
}
