//! Scratch space for the token currently being assembled.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! The tokenizer states talk about "the current tag token", "the current
//! attribute" and "the current DOCTYPE token". [`TokenBuilder`] holds exactly
//! one of those under construction. It is emptied every time a token is
//! finished, so nothing leaks from one token into the next.
//!
//! Calling a method for the wrong kind of token means the state machine is
//! broken; those calls return a contract violation instead of guessing.

use thicket_common::contracts::{self, ContractResult};

use super::token::{Attribute, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Start,
    End,
}

#[derive(Debug)]
enum Partial {
    Tag {
        kind: TagKind,
        name: String,
        self_closing: bool,
        attributes: Vec<Attribute>,
        current_attribute: Option<Attribute>,
    },
    Comment(String),
    Doctype(DoctypeParts),
}

#[derive(Debug, Default)]
struct DoctypeParts {
    name: Option<String>,
    public_identifier: Option<String>,
    system_identifier: Option<String>,
    force_quirks: bool,
}

/// Owns the partial data of the token being built.
#[derive(Debug, Default)]
pub struct TokenBuilder {
    partial: Option<Partial>,
}

impl TokenBuilder {
    /// Create an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self { partial: None }
    }

    /// Whether a token is under construction.
    #[must_use]
    pub const fn is_building(&self) -> bool {
        self.partial.is_some()
    }

    /// Drop whatever is under construction.
    pub fn clear(&mut self) {
        self.partial = None;
    }

    // =========================================================================
    // Starting a token
    // =========================================================================

    /// "Create a new start tag token, set its tag name to the empty string."
    pub fn start_tag(&mut self) {
        self.partial = Some(Self::new_tag(TagKind::Start));
    }

    /// "Create a new end tag token, set its tag name to the empty string."
    pub fn end_tag(&mut self) {
        self.partial = Some(Self::new_tag(TagKind::End));
    }

    const fn new_tag(kind: TagKind) -> Partial {
        Partial::Tag {
            kind,
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
            current_attribute: None,
        }
    }

    /// "Create a comment token whose data is the empty string."
    pub fn comment(&mut self) {
        self.partial = Some(Partial::Comment(String::new()));
    }

    /// "Create a new DOCTYPE token." Name and identifiers start out missing.
    pub fn doctype(&mut self) {
        self.partial = Some(Partial::Doctype(DoctypeParts::default()));
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// "Append the current input character to the current tag token's tag name."
    ///
    /// # Errors
    ///
    /// Fails if no tag is under construction.
    pub fn push_tag_name(&mut self, c: char) -> ContractResult<()> {
        match &mut self.partial {
            Some(Partial::Tag { name, .. }) => {
                name.push(c);
                Ok(())
            }
            _ => contracts::unreachable("tag name character with no tag under construction"),
        }
    }

    /// The tag name read so far, if a tag is under construction.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match &self.partial {
            Some(Partial::Tag { name, .. }) => Some(name),
            _ => None,
        }
    }

    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    #[must_use]
    pub fn is_end_tag_named(&self, expected: Option<&str>) -> bool {
        match (&self.partial, expected) {
            (
                Some(Partial::Tag {
                    kind: TagKind::End,
                    name,
                    ..
                }),
                Some(expected),
            ) => name == expected,
            _ => false,
        }
    }

    /// "Set the self-closing flag of the current tag token."
    ///
    /// # Errors
    ///
    /// Fails if no tag is under construction.
    pub fn set_self_closing(&mut self) -> ContractResult<()> {
        match &mut self.partial {
            Some(Partial::Tag { self_closing, .. }) => {
                *self_closing = true;
                Ok(())
            }
            _ => contracts::unreachable("self-closing flag with no tag under construction"),
        }
    }

    /// "Start a new attribute in the current tag token. Set that attribute's
    /// name and value to the empty string."
    ///
    /// Finishes the previous attribute first and returns its name if it was a
    /// duplicate and got dropped.
    ///
    /// # Errors
    ///
    /// Fails if no tag is under construction.
    pub fn start_attribute(&mut self) -> ContractResult<Option<String>> {
        let dropped = self.finish_attribute();
        match &mut self.partial {
            Some(Partial::Tag {
                current_attribute, ..
            }) => {
                *current_attribute = Some(Attribute::new(String::new(), String::new()));
                Ok(dropped)
            }
            _ => contracts::unreachable("attribute started with no tag under construction"),
        }
    }

    /// "Append the current input character to the current attribute's name."
    ///
    /// # Errors
    ///
    /// Fails if no attribute is under construction.
    pub fn push_attribute_name(&mut self, c: char) -> ContractResult<()> {
        self.current_attribute()?.name.push(c);
        Ok(())
    }

    /// "Append the current input character to the current attribute's value."
    ///
    /// # Errors
    ///
    /// Fails if no attribute is under construction.
    pub fn push_attribute_value(&mut self, c: char) -> ContractResult<()> {
        self.current_attribute()?.value.push(c);
        Ok(())
    }

    /// Append a whole string to the current attribute's value.
    ///
    /// # Errors
    ///
    /// Fails if no attribute is under construction.
    pub fn push_attribute_value_str(&mut self, s: &str) -> ContractResult<()> {
        self.current_attribute()?.value.push_str(s);
        Ok(())
    }

    fn current_attribute(&mut self) -> ContractResult<&mut Attribute> {
        match &mut self.partial {
            Some(Partial::Tag {
                current_attribute, ..
            }) => contracts::not_null(
                current_attribute.as_mut(),
                "attribute data with no attribute under construction",
            ),
            _ => contracts::unreachable("attribute data with no tag under construction"),
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "...if there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    ///
    /// Moves the current attribute onto the tag. Returns the attribute's name
    /// if it was dropped as a duplicate.
    pub fn finish_attribute(&mut self) -> Option<String> {
        let Some(Partial::Tag {
            attributes,
            current_attribute,
            ..
        }) = &mut self.partial
        else {
            return None;
        };
        let attribute = current_attribute.take()?;
        if attributes.iter().any(|a| a.name == attribute.name) {
            return Some(attribute.name);
        }
        attributes.push(attribute);
        None
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// "Append the current input character to the comment token's data."
    ///
    /// # Errors
    ///
    /// Fails if no comment is under construction.
    pub fn push_comment(&mut self, c: char) -> ContractResult<()> {
        match &mut self.partial {
            Some(Partial::Comment(data)) => {
                data.push(c);
                Ok(())
            }
            _ => contracts::unreachable("comment data with no comment under construction"),
        }
    }

    /// Append a whole string to the comment token's data.
    ///
    /// # Errors
    ///
    /// Fails if no comment is under construction.
    pub fn push_comment_str(&mut self, s: &str) -> ContractResult<()> {
        match &mut self.partial {
            Some(Partial::Comment(data)) => {
                data.push_str(s);
                Ok(())
            }
            _ => contracts::unreachable("comment data with no comment under construction"),
        }
    }

    // =========================================================================
    // DOCTYPE
    // =========================================================================

    fn doctype_parts(&mut self) -> ContractResult<&mut DoctypeParts> {
        match &mut self.partial {
            Some(Partial::Doctype(parts)) => Ok(parts),
            _ => contracts::unreachable("DOCTYPE data with no DOCTYPE under construction"),
        }
    }

    /// "Append the current input character to the current DOCTYPE token's name."
    ///
    /// # Errors
    ///
    /// Fails if no DOCTYPE is under construction.
    pub fn push_doctype_name(&mut self, c: char) -> ContractResult<()> {
        self.doctype_parts()?
            .name
            .get_or_insert_with(String::new)
            .push(c);
        Ok(())
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on."
    ///
    /// # Errors
    ///
    /// Fails if no DOCTYPE is under construction.
    pub fn set_force_quirks(&mut self) -> ContractResult<()> {
        self.doctype_parts()?.force_quirks = true;
        Ok(())
    }

    /// "Set the current DOCTYPE token's public identifier to the empty string
    /// (not missing)."
    ///
    /// # Errors
    ///
    /// Fails if no DOCTYPE is under construction.
    pub fn start_public_identifier(&mut self) -> ContractResult<()> {
        self.doctype_parts()?.public_identifier = Some(String::new());
        Ok(())
    }

    /// "Append the current input character to the current DOCTYPE token's
    /// public identifier."
    ///
    /// # Errors
    ///
    /// Fails if no DOCTYPE is under construction.
    pub fn push_public_identifier(&mut self, c: char) -> ContractResult<()> {
        self.doctype_parts()?
            .public_identifier
            .get_or_insert_with(String::new)
            .push(c);
        Ok(())
    }

    /// "Set the current DOCTYPE token's system identifier to the empty string
    /// (not missing)."
    ///
    /// # Errors
    ///
    /// Fails if no DOCTYPE is under construction.
    pub fn start_system_identifier(&mut self) -> ContractResult<()> {
        self.doctype_parts()?.system_identifier = Some(String::new());
        Ok(())
    }

    /// "Append the current input character to the current DOCTYPE token's
    /// system identifier."
    ///
    /// # Errors
    ///
    /// Fails if no DOCTYPE is under construction.
    pub fn push_system_identifier(&mut self, c: char) -> ContractResult<()> {
        self.doctype_parts()?
            .system_identifier
            .get_or_insert_with(String::new)
            .push(c);
        Ok(())
    }

    // =========================================================================
    // Finishing
    // =========================================================================

    /// Take the finished token and reset the builder.
    ///
    /// A pending attribute is finished first; its name is returned alongside
    /// the token if it was dropped as a duplicate.
    ///
    /// # Errors
    ///
    /// Fails if nothing is under construction.
    pub fn finish(&mut self) -> ContractResult<(Token, Option<String>)> {
        let dropped = self.finish_attribute();
        let partial =
            contracts::not_null(self.partial.take(), "emit with no token under construction")?;
        let token = match partial {
            Partial::Tag {
                kind: TagKind::Start,
                name,
                self_closing,
                attributes,
                ..
            } => Token::StartTag {
                name,
                self_closing,
                attributes,
            },
            Partial::Tag {
                kind: TagKind::End,
                name,
                self_closing,
                attributes,
                ..
            } => Token::EndTag {
                name,
                self_closing,
                attributes,
            },
            Partial::Comment(data) => Token::Comment { data },
            Partial::Doctype(DoctypeParts {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            }) => Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            },
        };
        Ok((token, dropped))
    }
}
