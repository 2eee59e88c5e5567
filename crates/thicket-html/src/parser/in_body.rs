//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use thicket_common::ContractResult;
use thicket_dom::NodeId;

use super::core::{
    InsertionMode, Scope, Step, TreeBuilder, is_parser_whitespace, synthesized_start_tag,
};
use super::formatting::{Adoption, is_formatting_element, is_special_element};
use crate::document::QuirksMode;
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

/// Start tags that close an open `p` before inserting themselves.
const BLOCK_STARTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div", "dl",
    "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav", "ol",
    "p", "search", "section", "summary", "ul",
];

/// End tags closed through "generate implied end tags" and a pop.
const BLOCK_ENDS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong",
/// "tt", "u"
const FORMATTING_STARTS: &[&str] = &[
    "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong", "tt", "u",
];

/// Table structure start tags that are meaningless in body.
const TABLE_PARTS: &[&str] = &[
    "caption", "col", "colgroup", "frame", "head", "tbody", "td", "tfoot", "th", "thead", "tr",
];

impl TreeBuilder {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn handle_in_body_mode(&mut self, token: &Token) -> ContractResult<Step> {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            // The tokenizer has already reported the NULL.
            Token::Character { data: '\0' } => {}

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the character."
            //
            // "Any other character token"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_character(*data);
                if !is_parser_whitespace(*data) {
                    self.frameset_ok = false;
                }
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => return Ok(self.ignore_doctype()),

            Token::StartTag { name, .. } => return self.handle_in_body_start_tag(name, token),
            Token::EndTag { name, .. } => return self.handle_in_body_end_tag(name),

            // "An end-of-file token"
            // "If there is a node in the stack of open elements that is not
            // either a dd element, a dt element, ... or the html element, then
            // this is a parse error."
            // "Stop parsing."
            Token::EndOfFile => {
                self.check_open_elements_at_eof();
                self.stop_parsing();
            }
        }
        Ok(Step::Done)
    }

    fn handle_in_body_start_tag(&mut self, name: &str, token: &Token) -> ContractResult<Step> {
        match name {
            // "A start tag whose tag name is "html""
            // "Parse error."
            // "Otherwise, for each attribute on the token, check to see if the
            // attribute is already present on the top element of the stack of
            // open elements. If it is not, add the attribute and its
            // corresponding value to that element."
            "html" => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, "<html>");
                if let Some(&html) = self.stack_of_open_elements.first() {
                    self.merge_attributes(html, token);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "title" => return self.handle_in_head_mode(token),

            // "A start tag whose tag name is "body""
            // "Parse error."
            // "If the second element on the stack of open elements is not a
            // body element, if the stack of open elements has only one node on
            // it, or if there is a template element on the stack of open
            // elements, then ignore the token."
            // "Otherwise, set the frameset-ok flag to "not ok"; then, for each
            // attribute on the token, check to see if the attribute is already
            // present on the body element (the second element) on the stack of
            // open elements, and if it is not, add the attribute and its
            // corresponding value to that element."
            "body" => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, "<body>");
                if let Some(body) = self.second_element_if_body() {
                    self.frameset_ok = false;
                    self.merge_attributes(body, token);
                }
            }

            // "A start tag whose tag name is "frameset""
            // "Parse error."
            // "If the stack of open elements has only one node on it, or if the
            // second element on the stack of open elements is not a body
            // element, then ignore the token."
            // "If the frameset-ok flag is set to "not ok", ignore the token."
            // "Otherwise, run the following steps:
            //  1. Remove the second element on the stack of open elements from
            //     its parent node, if it has one.
            //  2. Pop all the nodes from the bottom of the stack of open
            //     elements, from the current node up to, but not including, the
            //     root html element.
            //  3. Insert an HTML element for the token.
            //  4. Switch the insertion mode to "in frameset"."
            "frameset" => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, "<frameset>");
                if let Some(body) = self.second_element_if_body()
                    && self.frameset_ok
                {
                    if let Some(parent) = self.tree.parent(body) {
                        self.tree.remove_child(parent, body);
                    }
                    self.stack_of_open_elements.truncate(1);
                    let _ = self.insert_html_element(token)?;
                    self.insertion_mode = InsertionMode::InFrameset;
                }
            }

            // "A start tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "center", "details", "dialog", "dir",
            // "div", "dl", "fieldset", "figcaption", "figure", "footer",
            // "header", "hgroup", "main", "menu", "nav", "ol", "p", "search",
            // "section", "summary", "ul""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            _ if BLOCK_STARTS.contains(&name) => {
                self.close_p_element_if_in_button_scope();
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "If the current node is an HTML element whose tag name is one of
            // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
            // error; pop the current node off the stack of open elements."
            // "Insert an HTML element for the token."
            _ if HEADINGS.contains(&name) => {
                self.close_p_element_if_in_button_scope();
                if self.current_node_is_one_of(HEADINGS) {
                    let open = self.current_node_name();
                    self.parse_error(
                        ParseErrorCode::UnexpectedStartTag,
                        format!("<{name}> inside <{open}>"),
                    );
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            // "If the next token is a U+000A LINE FEED (LF) character token,
            // then ignore that token and move on to the next one. (Newlines at
            // the start of pre blocks are ignored as an authoring convenience.)"
            // "Set the frameset-ok flag to "not ok"."
            "pre" | "listing" => {
                self.close_p_element_if_in_button_scope();
                let _ = self.insert_html_element(token)?;
                self.skip_next_line_feed = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            // "If the form element pointer is not null, and there is no
            // template element on the stack of open elements, then this is a
            // parse error; ignore the token."
            // "Otherwise: If the stack of open elements has a p element in
            // button scope, then close a p element. Insert an HTML element for
            // the token, and, if there is no template element on the stack of
            // open elements, set the form element pointer to point to the
            // element created."
            "form" => {
                if self.form_element_pointer.is_some() {
                    return Ok(self.ignore_start_tag(name));
                }
                self.close_p_element_if_in_button_scope();
                let form = self.insert_html_element(token)?;
                self.form_element_pointer = Some(form);
            }

            // "A start tag whose tag name is "li""
            "li" => {
                self.close_list_item(&["li"]);
                self.close_p_element_if_in_button_scope();
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                self.close_list_item(&["dd", "dt"]);
                self.close_p_element_if_in_button_scope();
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is "plaintext""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            "plaintext" => {
                self.close_p_element_if_in_button_scope();
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is "button""
            // "1. If the stack of open elements has a button element in scope,
            //     then run these substeps: Parse error. Generate implied end
            //     tags. Pop elements from the stack of open elements until a
            //     button element has been popped from the stack."
            // "2. Reconstruct the active formatting elements, if any."
            // "3. Insert an HTML element for the token."
            // "4. Set the frameset-ok flag to "not ok"."
            "button" => {
                if self.has_element_in_scope("button") {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, "<button> inside <button>");
                    self.generate_implied_end_tags();
                    self.pop_until_tag("button");
                }
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            // "If the list of active formatting elements contains an a element
            // between the end of the list and the last marker on the list (or
            // the start of the list if there is no marker on the list), then
            // this is a parse error; run the adoption agency algorithm for the
            // token, then remove that element from the list of active
            // formatting elements and the stack of open elements if the adoption
            // agency algorithm didn't already remove it (it might not have if
            // the element is not in table scope)."
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Push onto the list of
            // active formatting elements that element."
            "a" => {
                if let Some(existing) = self.active_formatting_element_named("a") {
                    self.parse_error(ParseErrorCode::MisnestedFormattingElement, "<a> inside <a>");
                    let _ = self.run_adoption_agency("a")?;
                    self.remove_active_formatting_element(existing);
                    self.remove_from_stack(existing);
                }
                self.insert_formatting_element(token)?;
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Push onto the list of
            // active formatting elements that element."
            _ if FORMATTING_STARTS.contains(&name) => self.insert_formatting_element(token)?,

            // "A start tag whose tag name is "nobr""
            // "Reconstruct the active formatting elements, if any."
            // "If the stack of open elements has a nobr element in scope, then
            // this is a parse error; run the adoption agency algorithm for the
            // token, then once again reconstruct the active formatting
            // elements, if any."
            "nobr" => {
                self.reconstruct_active_formatting_elements()?;
                if self.has_element_in_scope("nobr") {
                    self.parse_error(ParseErrorCode::MisnestedFormattingElement, "<nobr> inside <nobr>");
                    let _ = self.run_adoption_agency("nobr")?;
                }
                self.insert_formatting_element(token)?;
            }

            // "A start tag whose tag name is one of: "applet", "marquee",
            // "object""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Insert a marker at the end of the list of active formatting
            // elements."
            // "Set the frameset-ok flag to "not ok"."
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
                self.push_active_formatting_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            // "If the Document is not set to quirks mode, and the stack of open
            // elements has a p element in button scope, then close a p
            // element."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in table"."
            "table" => {
                if self.quirks_mode != QuirksMode::Quirks {
                    self.close_p_element_if_in_button_scope();
                }
                let _ = self.insert_html_element(token)?;
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTable;
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "Set the frameset-ok flag to "not ok"."
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.insert_void_element(token)?;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            // "If the token does not have an attribute with the name "type", or
            // if it does, but that attribute's value is not an ASCII
            // case-insensitive match for the string "hidden", then: set the
            // frameset-ok flag to "not ok"."
            "input" => {
                self.insert_void_element(token)?;
                let hidden = token
                    .attribute("type")
                    .is_some_and(|value| value.eq_ignore_ascii_case("hidden"));
                if !hidden {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            "param" | "source" | "track" => {
                let _ = self.insert_html_element(token)?;
                let _ = self.stack_of_open_elements.pop();
            }

            // "A start tag whose tag name is "hr""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Set the frameset-ok flag to "not ok"."
            "hr" => {
                self.close_p_element_if_in_button_scope();
                let _ = self.insert_html_element(token)?;
                let _ = self.stack_of_open_elements.pop();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            // it. (Don't ask.)"
            "image" => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, "<image>");
                let Token::StartTag {
                    self_closing,
                    attributes,
                    ..
                } = token
                else {
                    return Ok(Step::Done);
                };
                let renamed = Token::StartTag {
                    name: "img".to_string(),
                    self_closing: *self_closing,
                    attributes: attributes.clone(),
                };
                return self.handle_in_body_start_tag("img", &renamed);
            }

            // "A start tag whose tag name is "textarea""
            // "1. Insert an HTML element for the token."
            // "2. If the next token is a U+000A LINE FEED (LF) character token,
            //     then ignore that token and move on to the next one."
            // "3. Switch the tokenizer to the RCDATA state."
            // "4. Set the original insertion mode to the current insertion mode."
            // "5. Set the frameset-ok flag to "not ok"."
            // "6. Switch the insertion mode to "text"."
            "textarea" => {
                self.parse_raw_text_element(token)?;
                self.skip_next_line_feed = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "xmp""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Reconstruct the active formatting elements, if any."
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            "xmp" => {
                self.close_p_element_if_in_button_scope();
                self.reconstruct_active_formatting_elements()?;
                self.frameset_ok = false;
                self.parse_raw_text_element(token)?;
            }

            // "A start tag whose tag name is "iframe""
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            "iframe" => {
                self.frameset_ok = false;
                self.parse_raw_text_element(token)?;
            }

            // "A start tag whose tag name is "noembed""
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => self.parse_raw_text_element(token)?,

            // "A start tag whose tag name is "select""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "If the insertion mode is one of "in table", "in caption", "in
            // table body", "in row", or "in cell", then switch the insertion
            // mode to "in select in table". Otherwise, switch the insertion mode
            // to "in select"."
            "select" => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
                self.frameset_ok = false;
                self.insertion_mode = match self.insertion_mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current
            // node off the stack of open elements."
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags. If the current node is not now a ruby
            // element, this is a parse error."
            // "Insert an HTML element for the token."
            "rb" | "rtc" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags();
                    if !self.current_node_is("ruby") {
                        self.parse_error(ParseErrorCode::UnexpectedStartTag, format!("<{name}> outside <ruby>"));
                    }
                }
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags, except for rtc elements. If the current
            // node is not now a rtc element or a ruby element, this is a parse
            // error."
            // "Insert an HTML element for the token."
            "rp" | "rt" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags_excluding(Some("rtc"));
                    if !self.current_node_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error(ParseErrorCode::UnexpectedStartTag, format!("<{name}> outside <ruby>"));
                    }
                }
                let _ = self.insert_html_element(token)?;
            }

            // "A start tag whose tag name is "math"" / "svg""
            // Built as ordinary elements; a self-closing flag is honoured the
            // way foreign content would.
            "math" | "svg" => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
                if matches!(token, Token::StartTag { self_closing: true, .. }) {
                    let _ = self.stack_of_open_elements.pop();
                }
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr""
            // "Parse error. Ignore the token."
            _ if TABLE_PARTS.contains(&name) => return Ok(self.ignore_start_tag(name)),

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(token)?;
            }
        }
        Ok(Step::Done)
    }

    fn handle_in_body_end_tag(&mut self, name: &str) -> ContractResult<Step> {
        match name {
            // "An end tag whose tag name is "body""
            // "If the stack of open elements does not have a body element in
            // scope, this is a parse error; ignore the token."
            // "Otherwise, if there is a node in the stack of open elements that
            // is not either a dd element, ... or the html element, then this is
            // a parse error."
            // "Switch the insertion mode to "after body"."
            "body" => {
                if !self.has_element_in_scope("body") {
                    return Ok(self.ignore_end_tag(name));
                }
                self.insertion_mode = InsertionMode::AfterBody;
            }

            // "An end tag whose tag name is "html""
            // "If the stack of open elements does not have a body element in
            // scope, this is a parse error; ignore the token."
            // "Switch the insertion mode to "after body"."
            // "Reprocess the token."
            "html" => {
                if !self.has_element_in_scope("body") {
                    return Ok(self.ignore_end_tag(name));
                }
                self.insertion_mode = InsertionMode::AfterBody;
                return Ok(Step::Reprocess);
            }

            // "An end tag whose tag name is one of: "address", "article", ...
            // "ul""
            // "If the stack of open elements does not have an element in scope
            // that is an HTML element with the same tag name as that of the
            // token, then this is a parse error; ignore the token."
            // "Otherwise, run these steps: Generate implied end tags. If the
            // current node is not an HTML element with the same tag name as
            // that of the token, then this is a parse error. Pop elements from
            // the stack of open elements until an HTML element with the same
            // tag name as the token has been popped from the stack."
            _ if BLOCK_ENDS.contains(&name) => {
                if !self.has_element_in_scope(name) {
                    return Ok(self.ignore_end_tag(name));
                }
                self.close_element(name);
            }

            // "An end tag whose tag name is "form""
            // "1. Let node be the element that the form element pointer is set
            //     to, or null if it is not set to an element."
            // "2. Set the form element pointer to null."
            // "3. If node is null or if the stack of open elements does not have
            //     node in scope, then this is a parse error; return and ignore
            //     the token."
            // "4. Generate implied end tags."
            // "5. If the current node is not node, then this is a parse error."
            // "6. Remove node from the stack of open elements."
            "form" => {
                let node = self.form_element_pointer.take();
                let Some(node) = node.filter(|&form| self.has_node_in_scope(form)) else {
                    return Ok(self.ignore_end_tag(name));
                };
                self.generate_implied_end_tags();
                if self.current_node() != Some(node) {
                    let open = self.current_node_name();
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, format!("</form> with <{open}> open"));
                }
                self.remove_from_stack(node);
            }

            // "An end tag whose tag name is "p""
            // "If the stack of open elements does not have a p element in button
            // scope, then this is a parse error; insert an HTML element for a
            // "p" start tag token with no attributes."
            // "Close a p element."
            "p" => {
                if !self.has_element_in_button_scope("p") {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, "</p> without an open <p>");
                    let _ = self.insert_synthesized_element("p")?;
                }
                self.close_p_element();
            }

            // "An end tag whose tag name is "li""
            // "If the stack of open elements does not have an li element in
            // list item scope, then this is a parse error; ignore the token."
            // "Otherwise: Generate implied end tags, except for li elements. If
            // the current node is not an li element, then this is a parse
            // error. Pop elements from the stack of open elements until an li
            // element has been popped from the stack."
            "li" => {
                if !self.has_element_in_specific_scope("li", Scope::ListItem) {
                    return Ok(self.ignore_end_tag(name));
                }
                self.close_element_excluding_itself(name);
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                if !self.has_element_in_scope(name) {
                    return Ok(self.ignore_end_tag(name));
                }
                self.close_element_excluding_itself(name);
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            // "If the stack of open elements does not have an element in scope
            // that is an HTML element and whose tag name is one of "h1", "h2",
            // "h3", "h4", "h5", or "h6", then this is a parse error; ignore the
            // token."
            // "Otherwise: Generate implied end tags. If the current node is not
            // an HTML element with the same tag name as that of the token, then
            // this is a parse error. Pop elements from the stack of open
            // elements until an HTML element whose tag name is one of "h1",
            // "h2", "h3", "h4", "h5", or "h6" has been popped from the stack."
            _ if HEADINGS.contains(&name) => {
                if !self.has_any_element_in_scope(HEADINGS, Scope::Default) {
                    return Ok(self.ignore_end_tag(name));
                }
                self.generate_implied_end_tags();
                if !self.current_node_is(name) {
                    let open = self.current_node_name();
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, format!("</{name}> with <{open}> open"));
                }
                self.pop_until_one_of(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            // "tt", "u""
            // "Run the adoption agency algorithm for the token."
            _ if is_formatting_element(name) => {
                if self.run_adoption_agency(name)? == Adoption::AnyOtherEndTag {
                    self.any_other_end_tag(name);
                }
            }

            // "An end tag token whose tag name is one of: "applet", "marquee",
            // "object""
            // "If the stack of open elements does not have an element in scope
            // that is an HTML element with the same tag name as that of the
            // token, then this is a parse error; ignore the token."
            // "Otherwise: Generate implied end tags. If the current node is not
            // an HTML element with the same tag name as that of the token, then
            // this is a parse error. Pop elements from the stack of open
            // elements until an HTML element with the same tag name as the
            // token has been popped from the stack. Clear the list of active
            // formatting elements up to the last marker."
            "applet" | "marquee" | "object" => {
                if !self.has_element_in_scope(name) {
                    return Ok(self.ignore_end_tag(name));
                }
                self.close_element(name);
                self.clear_active_formatting_elements_to_last_marker();
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br" start
            // tag token with no attributes, rather than the end tag token that
            // it actually is."
            "br" => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, "</br>");
                let token = synthesized_start_tag("br");
                return self.handle_in_body_start_tag("br", &token);
            }

            // "Any other end tag"
            _ => self.any_other_end_tag(name),
        }
        Ok(Step::Done)
    }

    /// The body element when it is the second entry on the stack of open
    /// elements, which is where stray `<body>` and `<frameset>` tags look.
    fn second_element_if_body(&self) -> Option<NodeId> {
        self.stack_of_open_elements
            .get(1)
            .copied()
            .filter(|&id| self.tag_name_of(id) == Some("body"))
    }

    /// The loop shared by the "li" and "dd"/"dt" start tags:
    ///
    /// "1. Set the frameset-ok flag to "not ok"."
    /// "2. Initialize node to be the current node (the bottommost node of the
    ///     stack)."
    /// "3. Loop: If node is an li element, then run these substeps: Generate
    ///     implied end tags, except for li elements. If the current node is not
    ///     an li element, then this is a parse error. Pop elements from the
    ///     stack of open elements until an li element has been popped from the
    ///     stack. Jump to the step labeled done below."
    /// "4. If node is in the special category, but is not an address, div, or
    ///     p element, then jump to the step labeled done below."
    /// "5. Otherwise, set node to the previous entry in the stack of open
    ///     elements and return to the step labeled loop."
    fn close_list_item(&mut self, closes: &[&str]) {
        self.frameset_ok = false;
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            let name = self.tag_name_of(node).unwrap_or_default();
            if closes.contains(&name) {
                let name = name.to_string();
                self.close_element_excluding_itself(&name);
                return;
            }
            if is_special_element(name) && !matches!(name, "address" | "div" | "p") {
                return;
            }
        }
    }

    /// "Generate implied end tags, except for" `tag_name` "elements. If the
    /// current node is not" a `tag_name` "element, then this is a parse error.
    /// Pop elements from the stack of open elements until" a `tag_name`
    /// "element has been popped from the stack."
    fn close_element_excluding_itself(&mut self, tag_name: &str) {
        self.generate_implied_end_tags_excluding(Some(tag_name));
        if !self.current_node_is(tag_name) {
            let open = self.current_node_name();
            self.parse_error(
                ParseErrorCode::UnexpectedEndTag,
                format!("<{tag_name}> closed with <{open}> open"),
            );
        }
        self.pop_until_tag(tag_name);
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Push onto the list of active formatting elements
    /// that element."
    fn insert_formatting_element(&mut self, token: &Token) -> ContractResult<()> {
        self.reconstruct_active_formatting_elements()?;
        let element = self.insert_html_element(token)?;
        self.push_active_formatting_element(element, token);
        Ok(())
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Immediately pop the current node off the stack
    /// of open elements."
    fn insert_void_element(&mut self, token: &Token) -> ContractResult<()> {
        self.reconstruct_active_formatting_elements()?;
        let _ = self.insert_html_element(token)?;
        let _ = self.stack_of_open_elements.pop();
        Ok(())
    }
}

