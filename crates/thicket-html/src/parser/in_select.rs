//! Select insertion modes.

use thicket_common::ContractResult;

use super::core::{Scope, Step, TreeBuilder};
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

impl TreeBuilder {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(super) fn handle_in_select_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => Ok(Step::Done),

            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data } => {
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

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node from
                // the stack of open elements."
                // "Insert an HTML element for the token."
                "option" => {
                    self.pop_if_current_is("option");
                    let _ = self.insert_html_element(token)?;
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "optgroup""
                // "If the current node is an option element, pop that node from
                // the stack of open elements."
                // "If the current node is an optgroup element, pop that node
                // from the stack of open elements."
                // "Insert an HTML element for the token."
                "optgroup" => {
                    self.pop_if_current_is("option");
                    self.pop_if_current_is("optgroup");
                    let _ = self.insert_html_element(token)?;
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "hr""
                // As "optgroup", then "Immediately pop the current node off the
                // stack of open elements."
                "hr" => {
                    self.pop_if_current_is("option");
                    self.pop_if_current_is("optgroup");
                    let _ = self.insert_html_element(token)?;
                    let _ = self.stack_of_open_elements.pop();
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "select""
                // "Parse error."
                // "If the stack of open elements does not have a select element
                // in select scope, ignore the token. (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements until
                // a select element has been popped from the stack. Reset the
                // insertion mode appropriately."
                "select" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, "<select> inside <select>");
                    let _ = self.close_select();
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is one of: "input", "keygen",
                // "textarea""
                // "Parse error."
                // "If the stack of open elements does not have a select element
                // in select scope, ignore the token. (fragment case)"
                // "Otherwise: ... Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, format!("<{name}> inside <select>"));
                    if self.close_select() {
                        Ok(Step::Reprocess)
                    } else {
                        Ok(Step::Done)
                    }
                }

                // "A start tag whose tag name is one of: "script", "template""
                // "Process the token using the rules for the "in head" insertion
                // mode."
                "script" => self.handle_in_head_mode(token),

                _ => Ok(self.ignore_start_tag(name)),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                // "First, if the current node is an option element, and the node
                // immediately before it in the stack of open elements is an
                // optgroup element, then pop the current node from the stack of
                // open elements."
                // "If the current node is an optgroup element, then pop that
                // node from the stack of open elements. Otherwise, this is a
                // parse error; ignore the token."
                "optgroup" => {
                    let len = self.stack_of_open_elements.len();
                    let above_is_optgroup = len >= 2
                        && self.tag_name_of(self.stack_of_open_elements[len - 2]) == Some("optgroup");
                    if self.current_node_is("option") && above_is_optgroup {
                        let _ = self.stack_of_open_elements.pop();
                    }
                    if self.current_node_is("optgroup") {
                        let _ = self.stack_of_open_elements.pop();
                        Ok(Step::Done)
                    } else {
                        Ok(self.ignore_end_tag(name))
                    }
                }

                // "An end tag whose tag name is "option""
                // "If the current node is an option element, then pop that node
                // from the stack of open elements. Otherwise, this is a parse
                // error; ignore the token."
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.stack_of_open_elements.pop();
                        Ok(Step::Done)
                    } else {
                        Ok(self.ignore_end_tag(name))
                    }
                }

                // "An end tag whose tag name is "select""
                // "If the stack of open elements does not have a select element
                // in select scope, this is a parse error; ignore the token.
                // (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements until
                // a select element has been popped from the stack. Reset the
                // insertion mode appropriately."
                "select" => {
                    if self.close_select() {
                        Ok(Step::Done)
                    } else {
                        Ok(self.ignore_end_tag(name))
                    }
                }

                _ => Ok(self.ignore_end_tag(name)),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::EndOfFile => self.handle_in_body_mode(token),
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(super) fn handle_in_select_in_table_mode(&mut self, token: &Token) -> ContractResult<Step> {
        const TABLE_TAGS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "Pop elements from the stack of open elements until a select
            // element has been popped from the stack."
            // "Reset the insertion mode appropriately."
            // "Reprocess the token."
            Token::StartTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, format!("<{name}> inside <select>"));
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                Ok(Step::Reprocess)
            }

            // "An end tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of
            // the token, then ignore the token."
            // "Otherwise: ... Reprocess the token."
            Token::EndTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                let step = self.ignore_end_tag(name);
                if !self.has_element_in_table_scope(name) {
                    return Ok(step);
                }
                self.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                Ok(Step::Reprocess)
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion
            // mode."
            _ => self.handle_in_select_mode(token),
        }
    }

    fn pop_if_current_is(&mut self, tag_name: &str) {
        if self.current_node_is(tag_name) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// Pop through the open select and reset the insertion mode. Returns
    /// false when there is no select in select scope.
    fn close_select(&mut self) -> bool {
        if !self.has_element_in_specific_scope("select", Scope::Select) {
            return false;
        }
        self.pop_until_tag("select");
        self.reset_insertion_mode_appropriately();
        true
    }
}
