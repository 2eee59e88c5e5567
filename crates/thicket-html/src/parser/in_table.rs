//! Table insertion modes: "in table" through "in cell".

use thicket_common::ContractResult;

use super::core::{InsertionMode, Scope, Step, TreeBuilder, is_parser_whitespace};
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl TreeBuilder {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(super) fn handle_in_table_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element"
            // "Let the pending table character tokens be an empty list of
            // tokens."
            // "Let the original insertion mode be the current insertion mode."
            // "Switch the insertion mode to "in table text" and reprocess the
            // token."
            Token::Character { .. }
                if self.current_node_is_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"]) =>
            {
                self.pending_table_character_tokens.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.insertion_mode = InsertionMode::InTableText;
                Ok(Step::Reprocess)
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
                Ok(Step::Done)
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => Ok(self.ignore_doctype()),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "caption""
                // "Clear the stack back to a table context."
                // "Insert a marker at the end of the list of active formatting
                // elements."
                // "Insert an HTML element for the token, then switch the
                // insertion mode to "in caption"."
                "caption" => {
                    self.clear_stack_back_to_table_context();
                    self.push_active_formatting_marker();
                    let _ = self.insert_html_element(token)?;
                    self.insertion_mode = InsertionMode::InCaption;
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "colgroup""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for the token, then switch the
                // insertion mode to "in column group"."
                "colgroup" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(token)?;
                    self.insertion_mode = InsertionMode::InColumnGroup;
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "col""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for a "colgroup" start tag token with
                // no attributes, then switch the insertion mode to "in column
                // group"."
                // "Reprocess the current token."
                "col" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_synthesized_element("colgroup")?;
                    self.insertion_mode = InsertionMode::InColumnGroup;
                    Ok(Step::Reprocess)
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot",
                // "thead""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for the token, then switch the
                // insertion mode to "in table body"."
                "tbody" | "tfoot" | "thead" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(token)?;
                    self.insertion_mode = InsertionMode::InTableBody;
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for a "tbody" start tag token with no
                // attributes, then switch the insertion mode to "in table
                // body"."
                // "Reprocess the current token."
                "td" | "th" | "tr" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_synthesized_element("tbody")?;
                    self.insertion_mode = InsertionMode::InTableBody;
                    Ok(Step::Reprocess)
                }

                // "A start tag whose tag name is "table""
                // "Parse error."
                // "If the stack of open elements does not have a table element
                // in table scope, ignore the token."
                // "Otherwise: Pop elements from this stack until a table element
                // has been popped from the stack. Reset the insertion mode
                // appropriately. Reprocess the token."
                "table" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, "<table> inside <table>");
                    if !self.has_element_in_table_scope("table") {
                        return Ok(Step::Done);
                    }
                    self.pop_until_tag("table");
                    self.reset_insertion_mode_appropriately();
                    Ok(Step::Reprocess)
                }

                // "A start tag whose tag name is one of: "style", "script",
                // "template""
                // "Process the token using the rules for the "in head" insertion
                // mode."
                "style" | "script" => self.handle_in_head_mode(token),

                // "A start tag whose tag name is "input""
                // "If the token does not have an attribute with the name "type",
                // or if it does, but that attribute's value is not an ASCII
                // case-insensitive match for the string "hidden", then: act as
                // described in the "anything else" entry below."
                // "Otherwise: Parse error. Insert an HTML element for the token.
                // Pop that input element off the stack of open elements.
                // Acknowledge the token's self-closing flag, if it is set."
                "input"
                    if token
                        .attribute("type")
                        .is_some_and(|value| value.eq_ignore_ascii_case("hidden")) =>
                {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, "hidden <input> in <table>");
                    let _ = self.insert_html_element(token)?;
                    let _ = self.stack_of_open_elements.pop();
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "form""
                // "Parse error."
                // "If there is a template element on the stack of open elements,
                // or if the form element pointer is not null, ignore the token."
                // "Otherwise: Insert an HTML element for the token, and set the
                // form element pointer to point to the element created. Pop that
                // form element off the stack of open elements."
                "form" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, "<form> in <table>");
                    if self.form_element_pointer.is_none() {
                        let form = self.insert_html_element(token)?;
                        self.form_element_pointer = Some(form);
                        let _ = self.stack_of_open_elements.pop();
                    }
                    Ok(Step::Done)
                }

                _ => self.foster_parent_in_body(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "table""
                // "If the stack of open elements does not have a table element
                // in table scope, this is a parse error; ignore the token."
                // "Otherwise: Pop elements from this stack until a table element
                // has been popped from the stack. Reset the insertion mode
                // appropriately."
                "table" => {
                    if !self.has_element_in_table_scope("table") {
                        return Ok(self.ignore_end_tag(name));
                    }
                    self.pop_until_tag("table");
                    self.reset_insertion_mode_appropriately();
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                // "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                | "thead" | "tr" => Ok(self.ignore_end_tag(name)),

                _ => self.foster_parent_in_body(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::EndOfFile => self.handle_in_body_mode(token),

            Token::Character { .. } => self.foster_parent_in_body(token),
        }
    }

    /// "Anything else" in the "in table" mode:
    ///
    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn foster_parent_in_body(&mut self, token: &Token) -> ContractResult<Step> {
        self.parse_error(ParseErrorCode::FosterParentedContent, token.to_string());
        self.foster_parenting = true;
        let step = self.handle_in_body_mode(token);
        self.foster_parenting = false;
        step
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(super) fn handle_in_table_text_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => Ok(Step::Done),

            // "Any other character token"
            // "Append the character token to the pending table character tokens
            // list."
            Token::Character { data } => {
                self.pending_table_character_tokens.push(*data);
                Ok(Step::Done)
            }

            // "Anything else"
            // "If any of the tokens in the pending table character tokens list
            // are character tokens that are not ASCII whitespace, then this is a
            // parse error: reprocess the character tokens in the pending table
            // character tokens list using the rules given in the "anything
            // else" entry in the "in table" insertion mode."
            // "Otherwise, insert the characters given by the pending table
            // character tokens list."
            // "Switch the insertion mode to the original insertion mode and
            // reprocess the token."
            _ => {
                let pending = std::mem::take(&mut self.pending_table_character_tokens);
                if pending.chars().all(is_parser_whitespace) {
                    self.insert_characters(&pending);
                } else {
                    self.parse_error(ParseErrorCode::FosterParentedContent, pending.trim().to_string());
                    self.foster_parenting = true;
                    for c in pending.chars() {
                        let _ = self.handle_in_body_mode(&Token::new_character(c))?;
                    }
                    self.foster_parenting = false;
                }
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InTable);
                Ok(Step::Reprocess)
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(super) fn handle_in_caption_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name, .. } if name == "caption" => {
                if !self.close_caption() {
                    return Ok(self.ignore_end_tag(name));
                }
                Ok(Step::Done)
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            // "If the stack of open elements does not have a caption element in
            // table scope, this is a parse error; ignore the token."
            // "Otherwise: ... Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                if !self.close_caption() {
                    return Ok(self.ignore_start_tag(name));
                }
                Ok(Step::Reprocess)
            }
            Token::EndTag { name, .. } if name == "table" => {
                if !self.close_caption() {
                    return Ok(self.ignore_end_tag(name));
                }
                Ok(Step::Reprocess)
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                Ok(self.ignore_end_tag(name))
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            _ => self.handle_in_body_mode(token),
        }
    }

    /// "If the stack of open elements does not have a caption element in
    /// table scope, this is a parse error; ignore the token."
    /// "Otherwise: Generate implied end tags. Now, if the current node is not a
    /// caption element, then this is a parse error. Pop elements from this
    /// stack until a caption element has been popped from the stack. Clear the
    /// list of active formatting elements up to the last marker. Switch the
    /// insertion mode to "in table"."
    ///
    /// Returns false when there was no caption to close.
    fn close_caption(&mut self) -> bool {
        if !self.has_element_in_table_scope("caption") {
            return false;
        }
        self.close_element("caption");
        self.clear_active_formatting_elements_to_last_marker();
        self.insertion_mode = InsertionMode::InTable;
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(super) fn handle_in_column_group_mode(&mut self, token: &Token) -> ContractResult<Step> {
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

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_html_element(token)?;
                let _ = self.stack_of_open_elements.pop();
                Ok(Step::Done)
            }

            // "An end tag whose tag name is "colgroup""
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open elements.
            // Switch the insertion mode to "in table"."
            Token::EndTag { name, .. } if name == "colgroup" => {
                if !self.current_node_is("colgroup") {
                    return Ok(self.ignore_end_tag(name));
                }
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
                Ok(Step::Done)
            }

            // "An end tag whose tag name is "col""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. } if name == "col" => Ok(self.ignore_end_tag(name)),

            Token::EndOfFile => self.handle_in_body_mode(token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open elements."
            // "Switch the insertion mode to "in table"."
            // "Reprocess the token."
            _ => {
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorCode::UnexpectedCharacter, format!("{token} in <colgroup>"));
                    return Ok(Step::Done);
                }
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
                Ok(Step::Reprocess)
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(super) fn handle_in_table_body_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "A start tag whose tag name is "tr""
            // "Clear the stack back to a table body context."
            // "Insert an HTML element for the token, then switch the insertion
            // mode to "in row"."
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(token)?;
                self.insertion_mode = InsertionMode::InRow;
                Ok(Step::Done)
            }

            // "A start tag whose tag name is one of: "th", "td""
            // "Parse error."
            // "Clear the stack back to a table body context."
            // "Insert an HTML element for a "tr" start tag token with no
            // attributes, then switch the insertion mode to "in row"."
            // "Reprocess the current token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, format!("<{name}> outside <tr>"));
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_synthesized_element("tr")?;
                self.insertion_mode = InsertionMode::InRow;
                Ok(Step::Reprocess)
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as the token,
            // this is a parse error; ignore the token."
            // "Otherwise: Clear the stack back to a table body context. Pop the
            // current node from the stack of open elements. Switch the
            // insertion mode to "in table"."
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_table_scope(name) {
                    return Ok(self.ignore_end_tag(name));
                }
                self.clear_stack_back_to_table_body_context();
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
                Ok(Step::Done)
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead""
            // "An end tag whose tag name is "table""
            // "If the stack of open elements does not have a tbody, thead, or
            // tfoot element in table scope, this is a parse error; ignore the
            // token."
            // "Otherwise: Clear the stack back to a table body context. Pop the
            // current node from the stack of open elements. Switch the
            // insertion mode to "in table". Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                Ok(self.close_table_section(token))
            }
            Token::EndTag { name, .. } if name == "table" => Ok(self.close_table_section(token)),

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                Ok(self.ignore_end_tag(name))
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion
            // mode."
            _ => self.handle_in_table_mode(token),
        }
    }

    fn close_table_section(&mut self, token: &Token) -> Step {
        if !self.has_any_element_in_scope(TABLE_SECTIONS, Scope::Table) {
            let code = if matches!(token, Token::EndTag { .. }) {
                ParseErrorCode::UnexpectedEndTag
            } else {
                ParseErrorCode::UnexpectedStartTag
            };
            self.parse_error(code, format!("{token} outside a table section"));
            return Step::Done;
        }
        self.clear_stack_back_to_table_body_context();
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = InsertionMode::InTable;
        Step::Reprocess
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(super) fn handle_in_row_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "A start tag whose tag name is one of: "th", "td""
            // "Clear the stack back to a table row context."
            // "Insert an HTML element for the token, then switch the insertion
            // mode to "in cell"."
            // "Insert a marker at the end of the list of active formatting
            // elements."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.clear_stack_back_to_table_row_context();
                let _ = self.insert_html_element(token)?;
                self.insertion_mode = InsertionMode::InCell;
                self.push_active_formatting_marker();
                Ok(Step::Done)
            }

            // "An end tag whose tag name is "tr""
            // "If the stack of open elements does not have a tr element in table
            // scope, this is a parse error; ignore the token."
            // "Otherwise: Clear the stack back to a table row context. Pop the
            // current node (which will be a tr element) from the stack of open
            // elements. Switch the insertion mode to "in table body"."
            Token::EndTag { name, .. } if name == "tr" => {
                if !self.close_row() {
                    return Ok(self.ignore_end_tag(name));
                }
                Ok(Step::Done)
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead", "tr""
            // "An end tag whose tag name is "table""
            // "If the stack of open elements does not have a tr element in table
            // scope, this is a parse error; ignore the token."
            // "Otherwise: ... Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                if !self.close_row() {
                    return Ok(self.ignore_start_tag(name));
                }
                Ok(Step::Reprocess)
            }
            Token::EndTag { name, .. } if name == "table" => {
                if !self.close_row() {
                    return Ok(self.ignore_end_tag(name));
                }
                Ok(Step::Reprocess)
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as the token,
            // this is a parse error; ignore the token."
            // "If the stack of open elements does not have a tr element in table
            // scope, ignore the token."
            // "Otherwise: ... Reprocess the token."
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_table_scope(name) {
                    return Ok(self.ignore_end_tag(name));
                }
                if !self.close_row() {
                    return Ok(Step::Done);
                }
                Ok(Step::Reprocess)
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                Ok(self.ignore_end_tag(name))
            }

            _ => self.handle_in_table_mode(token),
        }
    }

    /// Clear back to the row, pop it and return to "in table body". Returns
    /// false when no `tr` is in table scope.
    fn close_row(&mut self) -> bool {
        if !self.has_element_in_table_scope("tr") {
            return false;
        }
        self.clear_stack_back_to_table_row_context();
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = InsertionMode::InTableBody;
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(super) fn handle_in_cell_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of
            // the token, then this is a parse error; ignore the token."
            // "Otherwise: Generate implied end tags. Now, if the current node is
            // not an HTML element with the same tag name as the token, then this
            // is a parse error. Pop elements from the stack of open elements
            // stack until an HTML element with the same tag name as the token
            // has been popped from the stack. Clear the list of active
            // formatting elements up to the last marker. Switch the insertion
            // mode to "in row"."
            Token::EndTag { name, .. } if matches!(name.as_str(), "td" | "th") => {
                if !self.has_element_in_table_scope(name) {
                    return Ok(self.ignore_end_tag(name));
                }
                self.close_element(name);
                self.clear_active_formatting_elements_to_last_marker();
                self.insertion_mode = InsertionMode::InRow;
                Ok(Step::Done)
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Assert: The stack of open elements has a td or th element in
            // table scope."
            // "Close the cell (see below) and reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                if !self.has_any_element_in_scope(&["td", "th"], Scope::Table) {
                    return Ok(self.ignore_start_tag(name));
                }
                self.close_the_cell()?;
                Ok(Step::Reprocess)
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                Ok(self.ignore_end_tag(name))
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of
            // the token, then this is a parse error; ignore the token."
            // "Otherwise, close the cell (see below) and reprocess the token."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if !self.has_element_in_table_scope(name) {
                    return Ok(self.ignore_end_tag(name));
                }
                self.close_the_cell()?;
                Ok(Step::Reprocess)
            }

            _ => self.handle_in_body_mode(token),
        }
    }
}
