//! Recoverable markup errors.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! The parsing rules cover documents "whether they are syntactically correct
//! or not". Every error below is recovered from; it is recorded as a
//! [`ParseIssue`] and parsing continues.

use core::fmt;

use strum_macros::Display;
use thicket_common::Span;

/// Error codes, named after the WHATWG parse error table where one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorCode {
    // Tokenizer errors
    /// NULL code point in the input.
    UnexpectedNullCharacter,
    /// `<?` where a tag name was expected.
    UnexpectedQuestionMarkInsteadOfTagName,
    /// Input ended right after `<` or `</`.
    EofBeforeTagName,
    /// `<` or `</` followed by something that cannot start a tag name.
    InvalidFirstCharacterOfTagName,
    /// `</>`.
    MissingEndTagName,
    /// Input ended inside a tag.
    EofInTag,
    /// A `/` inside a tag that is not immediately followed by `>`.
    UnexpectedSolidusInTag,
    /// `=` at the start of an attribute name.
    UnexpectedEqualsSignBeforeAttributeName,
    /// `"`, `'` or `<` in an attribute name.
    UnexpectedCharacterInAttributeName,
    /// `=` followed directly by `>`.
    MissingAttributeValue,
    /// `"`, `'`, `<`, `=` or a backtick in an unquoted attribute value.
    UnexpectedCharacterInUnquotedAttributeValue,
    /// Quoted attribute value followed directly by another attribute.
    MissingWhitespaceBetweenAttributes,
    /// The same attribute name twice on one tag; the later one is dropped.
    DuplicateAttribute,
    /// An end tag carried attributes.
    EndTagWithAttributes,
    /// An end tag carried the self-closing flag.
    EndTagWithTrailingSolidus,
    /// `<!` not followed by `--` or `DOCTYPE`.
    IncorrectlyOpenedComment,
    /// `<!-->` or `<!--->`.
    AbruptClosingOfEmptyComment,
    /// Input ended inside a comment.
    EofInComment,
    /// `<!--` inside a comment.
    NestedComment,
    /// `--!>`.
    IncorrectlyClosedComment,
    /// Input ended inside a DOCTYPE.
    EofInDoctype,
    /// `<!DOCTYPEhtml>`.
    MissingWhitespaceBeforeDoctypeName,
    /// `<!DOCTYPE>`.
    MissingDoctypeName,
    /// Something other than `PUBLIC` or `SYSTEM` after the DOCTYPE name.
    InvalidCharacterSequenceAfterDoctypeName,
    /// `PUBLIC"`.
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `PUBLIC>`.
    MissingDoctypePublicIdentifier,
    /// Unquoted public identifier.
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// `>` inside a quoted public identifier.
    AbruptDoctypePublicIdentifier,
    /// Public and system identifiers not separated by whitespace.
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `SYSTEM"`.
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `SYSTEM>`.
    MissingDoctypeSystemIdentifier,
    /// Unquoted system identifier.
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// `>` inside a quoted system identifier.
    AbruptDoctypeSystemIdentifier,
    /// Trailing garbage after the system identifier.
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `<![CDATA[` in HTML content; treated as a bogus comment.
    CdataInHtmlContent,
    /// Input ended inside an escaped `<!--` section of a script.
    EofInScriptHtmlCommentLikeText,
    /// Named reference without its trailing `;`.
    MissingSemicolonAfterCharacterReference,
    /// `&name;` with no matching entry.
    UnknownNamedCharacterReference,
    /// `&#` or `&#x` with no digits.
    AbsenceOfDigitsInNumericCharacterReference,
    /// `&#0;`.
    NullCharacterReference,
    /// Numeric reference above U+10FFFF.
    CharacterReferenceOutsideUnicodeRange,
    /// Numeric reference to a surrogate.
    SurrogateCharacterReference,
    /// Numeric reference to a noncharacter.
    NoncharacterCharacterReference,
    /// Numeric reference to a control character.
    ControlCharacterReference,

    // Tree construction errors
    /// First token was not a DOCTYPE.
    MissingDoctype,
    /// DOCTYPE anywhere but the start of the document.
    UnexpectedDoctype,
    /// Start tag not allowed in the current insertion mode.
    UnexpectedStartTag,
    /// End tag with no matching open element, or not allowed here.
    UnexpectedEndTag,
    /// Non-whitespace text where only whitespace is allowed.
    UnexpectedCharacter,
    /// Content relocated in front of a table.
    FosterParentedContent,
    /// Formatting elements overlapping other elements.
    MisnestedFormattingElement,
    /// `<div/>` and friends; the flag is ignored.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// Elements still open when the input ended.
    EofWithOpenElements,
    /// A token kept switching insertion modes and was dropped.
    ReprocessBudgetExceeded,
}

/// A recovered markup error and where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What went wrong.
    pub code: ParseErrorCode,
    /// Byte range in the normalized input.
    pub span: Span,
    /// Extra context, such as the offending tag name. May be empty.
    pub detail: String,
}

impl ParseIssue {
    /// Create an issue.
    #[must_use]
    pub fn new(code: ParseErrorCode, span: Span, detail: impl Into<String>) -> Self {
        Self {
            code,
            span,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.code, self.span)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}
