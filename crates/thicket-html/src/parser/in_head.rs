//! Insertion modes up to the start of the body, plus the "text" mode.

use thicket_common::ContractResult;
use thicket_dom::{DocumentTypeData, NodeId};

use super::core::{InsertionMode, Step, TreeBuilder, is_parser_whitespace};
use super::quirks::quirks_mode_for_doctype;
use crate::document::QuirksMode;
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

impl TreeBuilder {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(super) fn handle_initial_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if is_parser_whitespace(*data) => Step::Done,

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_in(NodeId::ROOT, data);
                Step::Done
            }

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                // "If the DOCTYPE token's name is not "html", or the token's
                // public identifier is not missing, or the token's system
                // identifier is neither missing nor "about:legacy-compat", then
                // there is a parse error."
                let legacy_compat = system_identifier
                    .as_deref()
                    .is_none_or(|system| system == "about:legacy-compat");
                if name.as_deref() != Some("html") || public_identifier.is_some() || !legacy_compat {
                    self.parse_error(ParseErrorCode::UnexpectedDoctype, token.to_string());
                }

                // "Append a DocumentType node to the Document node, with its
                // name set to the name given in the DOCTYPE token, or the empty
                // string if the name was missing; its public ID set to the
                // public identifier given in the DOCTYPE token, or the empty
                // string if the public identifier was missing; and its system
                // ID set to the system identifier given in the DOCTYPE token, or
                // the empty string if the system identifier was missing."
                self.insert_doctype(DocumentTypeData {
                    name: name.clone().unwrap_or_default(),
                    public_id: public_identifier.clone().unwrap_or_default(),
                    system_id: system_identifier.clone().unwrap_or_default(),
                });

                self.quirks_mode = quirks_mode_for_doctype(
                    name.as_deref(),
                    public_identifier.as_deref(),
                    system_identifier.as_deref(),
                    *force_quirks,
                );

                // "Then, switch the insertion mode to "before html"."
                self.insertion_mode = InsertionMode::BeforeHtml;
                Step::Done
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is a
            // parse error; if the parser cannot change the mode flag is false,
            // set the Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then
            // reprocess the token."
            _ => {
                self.parse_error(ParseErrorCode::MissingDoctype, "");
                self.quirks_mode = QuirksMode::Quirks;
                self.insertion_mode = InsertionMode::BeforeHtml;
                Step::Reprocess
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(super) fn handle_before_html_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => Ok(self.ignore_doctype()),

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_in(NodeId::ROOT, data);
                Ok(Step::Done)
            }

            // "A character token that is one of U+0009 ..., or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if is_parser_whitespace(*data) => Ok(Step::Done),

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document
            // object. Put this element in the stack of open elements."
            // "Switch the insertion mode to "before head"."
            Token::StartTag { name, .. } if name == "html" => {
                let _ = self.insert_html_element(token)?;
                self.insertion_mode = InsertionMode::BeforeHead;
                Ok(Step::Done)
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                Ok(self.ignore_end_tag(name))
            }

            // "Anything else"
            // "Create an html element whose node document is the Document
            // object. Append it to the Document object. Put this element in the
            // stack of open elements."
            // "Switch the insertion mode to "before head", then reprocess the
            // token."
            _ => {
                let _ = self.insert_synthesized_element("html")?;
                self.insertion_mode = InsertionMode::BeforeHead;
                Ok(Step::Reprocess)
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(super) fn handle_before_head_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            Token::Character { data } if is_parser_whitespace(*data) => Ok(Step::Done),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
                Ok(Step::Done)
            }

            Token::Doctype { .. } => Ok(self.ignore_doctype()),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            Token::StartTag { name, .. } if name == "head" => {
                let head = self.insert_html_element(token)?;
                self.head_element_pointer = Some(head);
                self.insertion_mode = InsertionMode::InHead;
                Ok(Step::Done)
            }

            Token::EndTag { name, .. } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                Ok(self.ignore_end_tag(name))
            }

            // "Anything else"
            // "Insert an HTML element for a "head" start tag token with no
            // attributes."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            // "Reprocess the current token."
            _ => {
                let head = self.insert_synthesized_element("head")?;
                self.head_element_pointer = Some(head);
                self.insertion_mode = InsertionMode::InHead;
                Ok(Step::Reprocess)
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(super) fn handle_in_head_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "A character token that is one of U+0009 ..., or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if is_parser_whitespace(*data) => {
                self.insert_character(*data);
                Ok(Step::Done)
            }

            Token::Comment { data } => {
                self.insert_comment(data);
                Ok(Step::Done)
            }

            Token::Doctype { .. } => Ok(self.ignore_doctype()),

            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            //
            // "A start tag whose tag name is "meta"" is handled the same way;
            // encoding changes from <meta charset> are left to the caller.
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "base" | "basefont" | "bgsound" | "link" | "meta") =>
            {
                let _ = self.insert_html_element(token)?;
                let _ = self.stack_of_open_elements.pop();
                Ok(Step::Done)
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            //
            // "A start tag whose tag name is "noframes", "style""
            // "Follow the generic raw text element parsing algorithm."
            //
            // "A start tag whose tag name is "script""
            // The script element is inserted the same way; it is never run.
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "title" | "noframes" | "style" | "script") =>
            {
                self.parse_raw_text_element(token)?;
                Ok(Step::Done)
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            // is disabled"
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in head noscript"."
            Token::StartTag { name, .. } if name == "noscript" => {
                let _ = self.insert_html_element(token)?;
                self.insertion_mode = InsertionMode::InHeadNoscript;
                Ok(Step::Done)
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the
            // stack of open elements."
            // "Switch the insertion mode to "after head"."
            Token::EndTag { name, .. } if name == "head" => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
                Ok(Step::Done)
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => Ok(self.ignore_start_tag(name)),
            Token::EndTag { name, .. } if !matches!(name.as_str(), "body" | "html" | "br") => {
                Ok(self.ignore_end_tag(name))
            }

            // "Anything else"
            // "Pop the current node (which will be the head element) off the
            // stack of open elements."
            // "Switch the insertion mode to "after head"."
            // "Reprocess the token."
            _ => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
                Ok(Step::Reprocess)
            }
        }
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(super) fn handle_in_head_noscript_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            Token::Doctype { .. } => Ok(self.ignore_doctype()),

            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the
            // stack of open elements; the new current node will be a head
            // element."
            // "Switch the insertion mode to "in head"."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InHead;
                Ok(Step::Done)
            }

            // "A character token that is one of U+0009 ..., or U+0020 SPACE"
            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound",
            // "link", "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            Token::Character { data } if is_parser_whitespace(*data) => self.handle_in_head_mode(token),
            Token::Comment { .. } => self.handle_in_head_mode(token),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.handle_in_head_mode(token)
            }

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                Ok(self.ignore_start_tag(name))
            }
            Token::EndTag { name, .. } if name != "br" => Ok(self.ignore_end_tag(name)),

            // "Anything else"
            // "Parse error."
            // "Pop the current node (which will be a noscript element) from the
            // stack of open elements; the new current node will be a head
            // element."
            // "Switch the insertion mode to "in head"."
            // "Reprocess the token."
            _ => {
                self.parse_error(
                    ParseErrorCode::UnexpectedStartTag,
                    format!("{token} inside <noscript> in <head>"),
                );
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InHead;
                Ok(Step::Reprocess)
            }
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(super) fn handle_after_head_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            Token::Character { data } if is_parser_whitespace(*data) => {
                self.insert_character(*data);
                Ok(Step::Done)
            }

            Token::Comment { data } => {
                self.insert_comment(data);
                Ok(Step::Done)
            }

            Token::Doctype { .. } => Ok(self.ignore_doctype()),

            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "body""
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in body"."
            Token::StartTag { name, .. } if name == "body" => {
                let _ = self.insert_html_element(token)?;
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InBody;
                Ok(Step::Done)
            }

            // "A start tag whose tag name is "frameset""
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in frameset"."
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_html_element(token)?;
                self.insertion_mode = InsertionMode::InFrameset;
                Ok(Step::Done)
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "Parse error."
            // "Push the node pointed to by the head element pointer onto the
            // stack of open elements."
            // "Process the token using the rules for the "in head" insertion
            // mode."
            // "Remove the node pointed to by the head element pointer from the
            // stack of open elements. (It might not be the current node at this
            // point.)"
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base"
                        | "basefont"
                        | "bgsound"
                        | "link"
                        | "meta"
                        | "noframes"
                        | "script"
                        | "style"
                        | "title"
                ) =>
            {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, format!("<{name}> after </head>"));
                let Some(head) = self.head_element_pointer else {
                    return self.handle_in_head_mode(token);
                };
                self.stack_of_open_elements.push(head);
                let step = self.handle_in_head_mode(token)?;
                self.remove_from_stack(head);
                Ok(step)
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => Ok(self.ignore_start_tag(name)),
            Token::EndTag { name, .. } if !matches!(name.as_str(), "body" | "html" | "br") => {
                Ok(self.ignore_end_tag(name))
            }

            // "Anything else"
            // "Insert an HTML element for a "body" start tag token with no
            // attributes."
            // "Switch the insertion mode to "in body"."
            // "Reprocess the current token."
            _ => {
                let _ = self.insert_synthesized_element("body")?;
                self.insertion_mode = InsertionMode::InBody;
                Ok(Step::Reprocess)
            }
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(super) fn handle_text_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token"
            // "Insert the character."
            Token::Character { data } => {
                self.insert_character(*data);
                Step::Done
            }

            // "An end-of-file token"
            // "Parse error."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and
            // reprocess the token."
            Token::EndOfFile => {
                let open = self.current_node_name();
                self.parse_error(ParseErrorCode::EofWithOpenElements, open);
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = self.original_insertion_mode.take().unwrap_or(InsertionMode::InBody);
                Step::Reprocess
            }

            // "An end tag whose tag name is "script""
            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = self.original_insertion_mode.take().unwrap_or(InsertionMode::InBody);
                Step::Done
            }

            // The tokenizer stays in its text content model until the matching
            // end tag, so nothing else reaches this mode.
            Token::Doctype { .. } | Token::StartTag { .. } | Token::Comment { .. } => Step::Done,
        }
    }
}
