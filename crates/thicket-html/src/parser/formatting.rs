//! Active formatting elements and the adoption agency algorithm.

use thicket_common::{ContractResult, contracts};
use thicket_dom::NodeId;

use super::core::{ActiveFormattingElement, TreeBuilder};
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
/// "The following HTML elements are those that end up in the list of active
/// formatting elements"
const FORMATTING_ELEMENTS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
/// "The following elements have varying levels of special parsing rules"
const SPECIAL_ELEMENTS: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
    "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure", "footer",
    "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup",
    "hr", "html", "iframe", "img", "input", "keygen", "li", "link", "listing", "main",
    "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript", "object", "ol", "p",
    "param", "plaintext", "pre", "script", "search", "section", "select", "source", "style",
    "summary", "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "title",
    "tr", "track", "ul", "wbr", "xmp",
];

/// Whether the tag name belongs to the "special" category.
pub(super) fn is_special_element(tag_name: &str) -> bool {
    SPECIAL_ELEMENTS.contains(&tag_name)
}

/// Whether the tag name is one of the formatting elements.
pub(super) fn is_formatting_element(tag_name: &str) -> bool {
    FORMATTING_ELEMENTS.contains(&tag_name)
}

/// How the adoption agency algorithm finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Adoption {
    Handled,
    /// "If there is no such element, then return and instead act as
    /// described in the "any other end tag" entry above."
    AnyOtherEndTag,
}

/// Two start tags are "the same" for the Noah's Ark clause when they share a
/// tag name and the same attributes, in any order.
fn same_tag_and_attributes(a: &Token, b: &Token) -> bool {
    let (
        Token::StartTag {
            name: name_a,
            attributes: attrs_a,
            ..
        },
        Token::StartTag {
            name: name_b,
            attributes: attrs_b,
            ..
        },
    ) = (a, b)
    else {
        return false;
    };
    name_a == name_b
        && attrs_a.len() == attrs_b.len()
        && attrs_a.iter().all(|attr| {
            attrs_b
                .iter()
                .any(|other| other.name == attr.name && other.value == attr.value)
        })
}

impl TreeBuilder {
    fn afe_index_of(&self, node: NodeId) -> Option<usize> {
        self.active_formatting_elements.iter().position(|entry| {
            matches!(entry, ActiveFormattingElement::Element { node_id, .. } if *node_id == node)
        })
    }

    fn is_open(&self, node: NodeId) -> bool {
        self.stack_of_open_elements.contains(&node)
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    /// "Push onto the list of active formatting elements"
    pub(super) fn push_active_formatting_element(&mut self, node_id: NodeId, token: &Token) {
        // "1. If there are already three elements in the list of active
        // formatting elements after the last marker, if any, or anywhere in
        // the list if there are no markers, that have the same tag name,
        // namespace, and attributes as element, then remove the earliest such
        // element from the list of active formatting elements."
        let mut earliest = None;
        let mut count = 0;
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => break,
                ActiveFormattingElement::Element { token: existing, .. }
                    if same_tag_and_attributes(existing, token) =>
                {
                    count += 1;
                    earliest = Some(index);
                }
                ActiveFormattingElement::Element { .. } => {}
            }
        }
        if count >= 3
            && let Some(index) = earliest
        {
            let _ = self.active_formatting_elements.remove(index);
        }

        // "2. Add element to the list of active formatting elements."
        self.active_formatting_elements
            .push(ActiveFormattingElement::Element {
                node_id,
                token: token.clone(),
            });
    }

    pub(super) fn push_active_formatting_marker(&mut self) {
        self.active_formatting_elements
            .push(ActiveFormattingElement::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    /// "Clear the list of active formatting elements up to the last marker"
    pub(super) fn clear_active_formatting_elements_to_last_marker(&mut self) {
        // "1. Let entry be the last (most recently added) entry in the list of
        // active formatting elements."
        // "2. Remove entry from the list of active formatting elements."
        // "3. If entry was a marker, then stop the algorithm at this point."
        while let Some(entry) = self.active_formatting_elements.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// The last element named `tag_name` between the end of the list and
    /// the last marker.
    pub(super) fn active_formatting_element_named(&self, tag_name: &str) -> Option<NodeId> {
        for entry in self.active_formatting_elements.iter().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { node_id, .. }
                    if self.tag_name_of(*node_id) == Some(tag_name) =>
                {
                    return Some(*node_id);
                }
                ActiveFormattingElement::Element { .. } => {}
            }
        }
        None
    }

    pub(super) fn remove_active_formatting_element(&mut self, node: NodeId) {
        if let Some(index) = self.afe_index_of(node) {
            let _ = self.active_formatting_elements.remove(index);
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    /// "Reconstruct the active formatting elements, if any"
    ///
    /// # Errors
    ///
    /// The rewind phase stops at markers, so the entries to recreate never
    /// include one; a marker there is a contract violation.
    pub(super) fn reconstruct_active_formatting_elements(&mut self) -> ContractResult<()> {
        // "1. If there are no entries in the list of active formatting
        // elements, then there is nothing to reconstruct; stop this algorithm."
        let Some(last) = self.active_formatting_elements.last() else {
            return Ok(());
        };

        // "2. If the last (most recently added) entry in the list of active
        // formatting elements is a marker, or if it is an element that is in
        // the stack of open elements, then there is nothing to reconstruct;
        // stop this algorithm."
        let settled = |entry: &ActiveFormattingElement| match entry {
            ActiveFormattingElement::Marker => true,
            ActiveFormattingElement::Element { node_id, .. } => self.is_open(*node_id),
        };
        if settled(last) {
            return Ok(());
        }

        // "3. Let entry be the last (most recently added) element in the list
        // of active formatting elements."
        // "4. Rewind: If there are no entries before entry in the list of
        // active formatting elements, then jump to the step labeled create."
        // "5. Let entry be the entry one earlier than entry in the list of
        // active formatting elements."
        // "6. If entry is neither a marker nor an element that is also in the
        // stack of open elements, go to the step labeled rewind."
        let mut first = self.active_formatting_elements.len() - 1;
        while first > 0 && !settled(&self.active_formatting_elements[first - 1]) {
            first -= 1;
        }

        let tokens: Vec<Option<Token>> = self.active_formatting_elements[first..]
            .iter()
            .map(|entry| match entry {
                ActiveFormattingElement::Element { token, .. } => Some(token.clone()),
                ActiveFormattingElement::Marker => None,
            })
            .collect();
        contracts::no_null_elements(&tokens, "formatting elements to reconstruct must not include a marker")?;

        // "8. Create: Insert an HTML element for the token for which the
        // element entry was created, to obtain new element."
        // "9. Replace the entry for entry in the list with an entry for new
        // element."
        // "10. If the entry for new element in the list of active formatting
        // elements is not the last entry in the list, return to the step
        // labeled advance."
        for (offset, token) in tokens.into_iter().flatten().enumerate() {
            let node_id = self.insert_html_element(&token)?;
            self.active_formatting_elements[first + offset] =
                ActiveFormattingElement::Element { node_id, token };
        }
        Ok(())
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    /// "The adoption agency algorithm, which takes as its only argument a
    /// token token for which the algorithm is being run"
    pub(super) fn run_adoption_agency(&mut self, subject: &str) -> ContractResult<Adoption> {
        // "2. If the current node is an HTML element whose tag name is subject,
        // and the current node is not in the list of active formatting
        // elements, then pop the current node off the stack of open elements
        // and return."
        if let Some(current) = self.current_node()
            && self.tag_name_of(current) == Some(subject)
            && self.afe_index_of(current).is_none()
        {
            let _ = self.stack_of_open_elements.pop();
            return Ok(Adoption::Handled);
        }

        // "3. Let outer loop counter be 0."
        // "4. While true: If outer loop counter is greater than or equal to 8,
        // then return."
        for _ in 0..8 {
            // "4.3 Let formatting element be the last element in the list of
            // active formatting elements that: is between the end of the list
            // and the last marker in the list, if any, or the start of the list
            // otherwise, and has the tag name subject."
            let Some(formatting_element) = self.active_formatting_element_named(subject) else {
                return Ok(Adoption::AnyOtherEndTag);
            };

            // "4.4 If formatting element is not in the stack of open elements,
            // then this is a parse error; remove the element from the list, and
            // return."
            let Some(formatting_index) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == formatting_element)
            else {
                self.parse_error(
                    ParseErrorCode::MisnestedFormattingElement,
                    format!("</{subject}> for an element that is no longer open"),
                );
                self.remove_active_formatting_element(formatting_element);
                return Ok(Adoption::Handled);
            };

            // "4.5 If formatting element is in the stack of open elements, but
            // the element is not in scope, then this is a parse error; return."
            if !self.has_node_in_scope(formatting_element) {
                self.parse_error(
                    ParseErrorCode::MisnestedFormattingElement,
                    format!("</{subject}> for an element out of scope"),
                );
                return Ok(Adoption::Handled);
            }

            // "4.6 If formatting element is not the current node, this is a
            // parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error(
                    ParseErrorCode::MisnestedFormattingElement,
                    format!("</{subject}> closes misnested content"),
                );
            }

            // "4.7 Let furthest block be the topmost node in the stack of open
            // elements that is lower in the stack than formatting element, and
            // is an element in the special category. There might not be one."
            let furthest_block_index = (formatting_index + 1..self.stack_of_open_elements.len())
                .find(|&index| {
                    self.tag_name_of(self.stack_of_open_elements[index])
                        .is_some_and(is_special_element)
                });

            // "4.8 If there is no furthest block, then the UA must first pop all
            // the nodes from the bottom of the stack of open elements, from the
            // current node up to and including formatting element, then remove
            // formatting element from the list of active formatting elements,
            // and finally return."
            let Some(furthest_block_index) = furthest_block_index else {
                self.stack_of_open_elements.truncate(formatting_index);
                self.remove_active_formatting_element(formatting_element);
                return Ok(Adoption::Handled);
            };
            let furthest_block = self.stack_of_open_elements[furthest_block_index];

            // "4.9 Let common ancestor be the element immediately above
            // formatting element in the stack of open elements."
            contracts::is_true(
                formatting_index > 0,
                "a formatting element in scope always has an element above it",
            )?;
            let common_ancestor = self.stack_of_open_elements[formatting_index - 1];

            // "4.10 Let a bookmark note the position of formatting element in
            // the list of active formatting elements relative to the elements
            // on either side of it in the list."
            let mut bookmark = contracts::not_null(
                self.afe_index_of(formatting_element),
                "formatting element must be in the list of active formatting elements",
            )?;

            // "4.11 Let node and last node be furthest block."
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block;

            // "4.12 Let inner loop counter be 0."
            let mut inner_loop_counter = 0;
            loop {
                // "4.13.1 Increment inner loop counter by 1."
                inner_loop_counter += 1;

                // "4.13.2 Let node be the element immediately above node in the
                // stack of open elements, or if node is no longer in the stack
                // of open elements (e.g. because it got removed by this
                // algorithm), the element that was immediately above node in
                // the stack of open elements before node was removed."
                node_index -= 1;
                let node = self.stack_of_open_elements[node_index];

                // "4.13.3 If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // "4.13.4 If inner loop counter is greater than 3 and node is in
                // the list of active formatting elements, then remove node from
                // the list of active formatting elements."
                let mut node_afe_index = self.afe_index_of(node);
                if inner_loop_counter > 3
                    && let Some(index) = node_afe_index.take()
                {
                    let _ = self.active_formatting_elements.remove(index);
                    if index < bookmark {
                        bookmark -= 1;
                    }
                }

                // "4.13.5 If node is not in the list of active formatting
                // elements, then remove node from the stack of open elements and
                // continue."
                let Some(node_afe_index) = node_afe_index else {
                    let _ = self.stack_of_open_elements.remove(node_index);
                    continue;
                };

                // "4.13.6 Create an element for the token for which the element
                // node was created, in the HTML namespace, with common ancestor
                // as the intended parent; replace the entry for node in the list
                // of active formatting elements with an entry for the new
                // element, replace the entry for node in the stack of open
                // elements with an entry for the new element, and let node be
                // the new element."
                let ActiveFormattingElement::Element { token, .. } =
                    self.active_formatting_elements[node_afe_index].clone()
                else {
                    return contracts::unreachable("list index found for an element entry");
                };
                let new_element = self.create_element_for_token(&token)?;
                self.active_formatting_elements[node_afe_index] = ActiveFormattingElement::Element {
                    node_id: new_element,
                    token,
                };
                self.stack_of_open_elements[node_index] = new_element;

                // "4.13.7 If last node is furthest block, then move the
                // aforementioned bookmark to be immediately after the new node
                // in the list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_afe_index + 1;
                }

                // "4.13.8 Append last node to node."
                self.tree.append_child(new_element, last_node);

                // "4.13.9 Set last node to node."
                last_node = new_element;
            }

            // "4.14 Insert whatever last node ended up being in the appropriate
            // place for inserting a node, but using common ancestor as the
            // override target."
            let location = self.insertion_location_for(common_ancestor);
            self.insert_at(location, last_node);

            // "4.15 Create an element for the token for which formatting element
            // was created, in the HTML namespace, with furthest block as the
            // intended parent."
            let formatting_afe_index = contracts::not_null(
                self.afe_index_of(formatting_element),
                "formatting element must still be in the list of active formatting elements",
            )?;
            let ActiveFormattingElement::Element { token, .. } =
                self.active_formatting_elements[formatting_afe_index].clone()
            else {
                return contracts::unreachable("list index found for an element entry");
            };
            let new_element = self.create_element_for_token(&token)?;

            // "4.16 Take all of the child nodes of furthest block and append
            // them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // "4.17 Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // "4.18 Remove formatting element from the list of active
            // formatting elements, and insert the new element into the list of
            // active formatting elements at the position of the aforementioned
            // bookmark."
            let _ = self.active_formatting_elements.remove(formatting_afe_index);
            if formatting_afe_index < bookmark {
                bookmark -= 1;
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                ActiveFormattingElement::Element {
                    node_id: new_element,
                    token,
                },
            );

            // "4.19 Remove formatting element from the stack of open elements,
            // and insert the new element into the stack of open elements
            // immediately below the position of furthest block in that stack."
            self.remove_from_stack(formatting_element);
            let furthest_block_position = contracts::not_null(
                self.stack_of_open_elements
                    .iter()
                    .position(|&id| id == furthest_block),
                "furthest block must still be on the stack of open elements",
            )?;
            self.stack_of_open_elements
                .insert(furthest_block_position + 1, new_element);
        }
        Ok(Adoption::Handled)
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    /// "Any other end tag"
    pub(super) fn any_other_end_tag(&mut self, tag_name: &str) {
        // "1. Initialize node to be the current node (the bottommost node of
        // the stack)."
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            let name = self.tag_name_of(node).unwrap_or_default();

            // "2. Loop: If node is an HTML element with the same tag name as
            // the token, then: Generate implied end tags, except for HTML
            // elements with the same tag name as the token. If node is not the
            // current node, then this is a parse error. Pop all the nodes from
            // the current node up to node, including node, then stop these
            // steps."
            if name == tag_name {
                let tag = name.to_string();
                self.generate_implied_end_tags_excluding(Some(&tag));
                if self.current_node() != Some(node) {
                    let open = self.current_node_name();
                    self.parse_error(
                        ParseErrorCode::UnexpectedEndTag,
                        format!("</{tag}> with <{open}> open"),
                    );
                }
                self.pop_until_node(node);
                return;
            }

            // "3. Otherwise, if node is in the special category, then this is a
            // parse error; ignore the token, and return."
            if is_special_element(name) {
                let _ = self.ignore_end_tag(tag_name);
                return;
            }

            // "4. Set node to the previous entry in the stack of open elements."
        }
    }
}
