//! Insertion modes after the body or frameset has been closed.

use thicket_common::ContractResult;
use thicket_dom::NodeId;

use super::core::{InsertionMode, Step, TreeBuilder, is_parser_whitespace};
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

impl TreeBuilder {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(super) fn handle_after_body_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "A character token that is one of U+0009 ..., or U+0020 SPACE"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::Character { data } if is_parser_whitespace(*data) => self.handle_in_body_mode(token),

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT);
                self.insert_comment_in(html, data);
                Ok(Step::Done)
            }

            Token::Doctype { .. } => Ok(self.ignore_doctype()),

            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after body"."
            Token::EndTag { name, .. } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterBody;
                Ok(Step::Done)
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {
                self.stop_parsing();
                Ok(Step::Done)
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess
            // the token."
            _ => {
                self.parse_error(ParseErrorCode::UnexpectedCharacter, format!("{token} after </body>"));
                self.insertion_mode = InsertionMode::InBody;
                Ok(Step::Reprocess)
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(super) fn handle_in_frameset_mode(&mut self, token: &Token) -> ContractResult<Step> {
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

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.handle_in_body_mode(token),

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token."
                "frameset" => {
                    let _ = self.insert_html_element(token)?;
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "frame""
                // "Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements."
                "frame" => {
                    let _ = self.insert_html_element(token)?;
                    let _ = self.stack_of_open_elements.pop();
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "noframes""
                // "Process the token using the rules for the "in head" insertion
                // mode."
                "noframes" => self.handle_in_head_mode(token),

                _ => Ok(self.ignore_start_tag(name)),
            },

            // "An end tag whose tag name is "frameset""
            // "If the current node is the root html element, then this is a
            // parse error; ignore the token. (fragment case)"
            // "Otherwise, pop the current node from the stack of open elements."
            // "If the parser was not created as part of the HTML fragment
            // parsing algorithm (fragment case), and the current node is no
            // longer a frameset element, then switch the insertion mode to
            // "after frameset"."
            Token::EndTag { name, .. } if name == "frameset" => {
                if self.stack_of_open_elements.len() <= 1 {
                    return Ok(self.ignore_end_tag(name));
                }
                let _ = self.stack_of_open_elements.pop();
                if !self.current_node_is("frameset") {
                    self.insertion_mode = InsertionMode::AfterFrameset;
                }
                Ok(Step::Done)
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a
            // parse error."
            // "Stop parsing."
            Token::EndOfFile => {
                if self.stack_of_open_elements.len() > 1 {
                    self.check_open_elements_at_eof();
                }
                self.stop_parsing();
                Ok(Step::Done)
            }

            Token::EndTag { name, .. } => Ok(self.ignore_end_tag(name)),

            // "Anything else"
            // "Parse error. Ignore the token."
            Token::Character { data } => {
                self.parse_error(ParseErrorCode::UnexpectedCharacter, format!("{data:?} in <frameset>"));
                Ok(Step::Done)
            }
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(super) fn handle_after_frameset_mode(&mut self, token: &Token) -> ContractResult<Step> {
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

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            Token::EndTag { name, .. } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterFrameset;
                Ok(Step::Done)
            }

            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),

            Token::EndOfFile => {
                self.stop_parsing();
                Ok(Step::Done)
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } => Ok(self.ignore_start_tag(name)),
            Token::EndTag { name, .. } => Ok(self.ignore_end_tag(name)),
            Token::Character { data } => {
                self.parse_error(ParseErrorCode::UnexpectedCharacter, format!("{data:?} after </frameset>"));
                Ok(Step::Done)
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(super) fn handle_after_after_body_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_in(NodeId::ROOT, data);
                Ok(Step::Done)
            }

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 ..., or U+0020 SPACE"
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data } if is_parser_whitespace(*data) => self.handle_in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            Token::EndOfFile => {
                self.stop_parsing();
                Ok(Step::Done)
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess
            // the token."
            _ => {
                self.parse_error(ParseErrorCode::UnexpectedCharacter, format!("{token} after </html>"));
                self.insertion_mode = InsertionMode::InBody;
                Ok(Step::Reprocess)
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(super) fn handle_after_after_frameset_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            Token::Comment { data } => {
                self.insert_comment_in(NodeId::ROOT, data);
                Ok(Step::Done)
            }

            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data } if is_parser_whitespace(*data) => self.handle_in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            Token::EndOfFile => {
                self.stop_parsing();
                Ok(Step::Done)
            }

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),

            // "Anything else"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } => Ok(self.ignore_start_tag(name)),
            Token::EndTag { name, .. } => Ok(self.ignore_end_tag(name)),
            Token::Character { data } => {
                self.parse_error(ParseErrorCode::UnexpectedCharacter, format!("{data:?} after </html>"));
                Ok(Step::Done)
            }
        }
    }
}
