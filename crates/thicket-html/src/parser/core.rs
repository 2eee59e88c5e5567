use strum_macros::Display;
use thicket_common::contracts;
use thicket_common::warning::warn_once;
use thicket_common::{ContractResult, Span};
use thicket_dom::{AttributesMap, DocumentTypeData, DomTree, ElementData, NodeId, NodeType};

use crate::document::{ParseOptions, QuirksMode};
use crate::error::{ParseErrorCode, ParseIssue};
use crate::tokenizer::{Attribute, SpannedToken, Token};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
///
/// The template and foreign-content modes are not part of this parser;
/// `template`, `svg` and `math` are built as ordinary elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// What an insertion mode handler did with a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The token was consumed.
    Done,
    /// "Reprocess the token": the mode changed and the same token must be
    /// handled again by the new mode.
    Reprocess,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
#[derive(Debug, Clone)]
pub enum ActiveFormattingElement {
    /// A formatting element and the token it was created from, kept so the
    /// element can be recreated during reconstruction and adoption.
    Element {
        /// The element in the tree.
        node_id: NodeId,
        /// "the token for which the element was created"
        token: Token,
    },
    /// "Markers are inserted when entering applet, object, marquee,
    /// template, td, th, and caption elements"
    Marker,
}

/// The scopes of [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    Default,
    ListItem,
    Button,
    Table,
    Select,
}

impl Scope {
    /// Whether `tag` is in this scope's "list of element types" that stops
    /// the search.
    fn is_boundary(self, tag: &str) -> bool {
        // "applet, caption, html, table, td, th, marquee, object, template,
        // MathML mi, ..." (the foreign entries never occur here)
        const DEFAULT: &[&str] = &[
            "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
        ];
        match self {
            Self::Default => DEFAULT.contains(&tag),
            Self::ListItem => DEFAULT.contains(&tag) || matches!(tag, "ol" | "ul"),
            Self::Button => DEFAULT.contains(&tag) || tag == "button",
            Self::Table => matches!(tag, "html" | "table" | "template"),
            // "all element types except the following: optgroup, option"
            Self::Select => !matches!(tag, "optgroup" | "option"),
        }
    }
}

/// Elements whose start tag never needs an end tag.
pub(super) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Consumes tokens one at a time and builds the document tree. The tree
/// builder never fails on malformed markup; errors are recorded as
/// [`ParseIssue`]s and the algorithm's recovery path is taken. Only broken
/// internal invariants surface as a
/// [`ContractViolation`](thicket_common::ContractViolation).
pub struct TreeBuilder {
    pub(super) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    /// "the original insertion mode" used by the text and in table text modes.
    pub(super) original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    /// "Initially, the stack of open elements is empty. The stack grows
    /// downwards; the topmost node on the stack is the first one added to the
    /// stack, and the bottommost node of the stack is the most recently added
    /// node in the stack."
    pub(super) stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,
    pub(super) form_element_pointer: Option<NodeId>,

    pub(super) active_formatting_elements: Vec<ActiveFormattingElement>,

    pub(super) tree: DomTree,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    /// "The frameset-ok flag is set to "ok" when the parser is created."
    pub(super) frameset_ok: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    /// "the foster parenting flag"
    pub(super) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    /// "pending table character tokens"
    pub(super) pending_table_character_tokens: String,

    /// Set after `<pre>`, `<listing>` and `<textarea>`: "If the next token is a
    /// U+000A LINE FEED (LF) character token, then ignore that token".
    pub(super) skip_next_line_feed: bool,

    pub(super) quirks_mode: QuirksMode,

    /// Set once "stop parsing" has run.
    pub(super) stopped: bool,

    issues: Vec<ParseIssue>,
    current_span: Span,
    reprocess_budget: usize,
    log_warnings: bool,
}

impl TreeBuilder {
    /// Create a tree builder with an empty document.
    #[must_use]
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            stack_of_open_elements: Vec::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            active_formatting_elements: Vec::new(),
            tree: DomTree::new(),
            frameset_ok: true,
            foster_parenting: false,
            pending_table_character_tokens: String::new(),
            skip_next_line_feed: false,
            quirks_mode: QuirksMode::NoQuirks,
            stopped: false,
            issues: Vec::new(),
            current_span: Span::default(),
            reprocess_budget: options.reprocess_budget,
            log_warnings: options.log_warnings,
        }
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// The document's quirks mode, known once the first token has been seen.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The stack of open elements, outermost first.
    #[must_use]
    pub fn open_elements(&self) -> &[NodeId] {
        &self.stack_of_open_elements
    }

    /// Tree construction errors recorded so far.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Whether the end-of-file token has been processed.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Consume the builder, returning the tree, the quirks mode and the
    /// recorded issues.
    #[must_use]
    pub fn finish(self) -> (DomTree, QuirksMode, Vec<ParseIssue>) {
        (self.tree, self.quirks_mode, self.issues)
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must
    /// follow the appropriate steps from the following list, known as the
    /// tree construction dispatcher"
    ///
    /// A handler that asks for the token to be reprocessed gets it again in
    /// the new mode, at most `reprocess_budget` extra times. Past that the
    /// token is dropped and a `ReprocessBudgetExceeded` issue is recorded.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`](thicket_common::ContractViolation) if a
    /// tree construction invariant is broken.
    pub fn process_token(&mut self, spanned: &SpannedToken) -> ContractResult<()> {
        if self.stopped {
            return Ok(());
        }
        self.current_span = spanned.span;
        let token = &spanned.token;

        if std::mem::take(&mut self.skip_next_line_feed)
            && matches!(token, Token::Character { data: '\n' })
        {
            return Ok(());
        }

        // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
        // "acknowledge the token's self-closing flag": anything but a void
        // element (or the foreign roots) gets the flag reported and ignored.
        if let Token::StartTag {
            name,
            self_closing: true,
            ..
        } = token
            && !VOID_ELEMENTS.contains(&name.as_str())
            && !matches!(name.as_str(), "svg" | "math")
        {
            self.parse_error(
                ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus,
                format!("<{name}/>"),
            );
        }

        let mut remaining = self.reprocess_budget;
        loop {
            match self.dispatch(token)? {
                Step::Done => return Ok(()),
                Step::Reprocess if remaining == 0 => {
                    let mode = self.insertion_mode;
                    self.parse_error(
                        ParseErrorCode::ReprocessBudgetExceeded,
                        format!("{token} dropped in {mode}"),
                    );
                    return Ok(());
                }
                Step::Reprocess => remaining -= 1,
            }
        }
    }

    fn dispatch(&mut self, token: &Token) -> ContractResult<Step> {
        match self.insertion_mode {
            InsertionMode::Initial => Ok(self.handle_initial_mode(token)),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => Ok(self.handle_text_mode(token)),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// Record a tree construction error at the current token.
    pub(super) fn parse_error(&mut self, code: ParseErrorCode, detail: impl Into<String>) {
        let issue = ParseIssue::new(code, self.current_span, detail);
        if self.log_warnings {
            warn_once("HTML Parser", &issue.to_string());
        }
        self.issues.push(issue);
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// Tag name of an element node, if `id` is one.
    pub(super) fn tag_name_of(&self, id: NodeId) -> Option<&str> {
        self.tree.tag_name(id)
    }

    pub(super) fn current_node_is(&self, tag: &str) -> bool {
        self.current_node()
            .and_then(|id| self.tag_name_of(id))
            .is_some_and(|name| name == tag)
    }

    pub(super) fn current_node_is_one_of(&self, tags: &[&str]) -> bool {
        self.current_node()
            .and_then(|id| self.tag_name_of(id))
            .is_some_and(|name| tags.contains(&name))
    }

    pub(super) fn current_node_name(&self) -> String {
        self.current_node()
            .and_then(|id| self.tag_name_of(id))
            .unwrap_or_default()
            .to_string()
    }

    // ===== Insertion =====

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    /// "The appropriate place for inserting a node"
    ///
    /// Returns the parent and, for foster-parented insertions, the sibling the
    /// new node goes in front of.
    pub(super) fn adjusted_insertion_location(&self) -> (NodeId, Option<NodeId>) {
        // "1. If there was an override target specified, then let target be
        // the override target. Otherwise, let target be the current node."
        let target = self.current_node().unwrap_or(NodeId::ROOT);
        self.insertion_location_for(target)
    }

    /// The appropriate place for inserting a node with `target` as the
    /// override target.
    pub(super) fn insertion_location_for(&self, target: NodeId) -> (NodeId, Option<NodeId>) {
        // "2. If foster parenting is enabled and target is a table, tbody,
        // tfoot, thead, or tr element"
        if self.foster_parenting
            && self
                .tag_name_of(target)
                .is_some_and(|name| matches!(name, "table" | "tbody" | "tfoot" | "thead" | "tr"))
        {
            return self.foster_parent_location();
        }

        // "3. Otherwise, let adjusted insertion location be inside target,
        // after its last child (if any)."
        (target, None)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    fn foster_parent_location(&self) -> (NodeId, Option<NodeId>) {
        // "2.1 Let last template be the last template element in the stack of
        // open elements, if any."
        // "2.2 Let last table be the last table element in the stack of open
        // elements, if any."
        let last_table = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.tag_name_of(id) == Some("table"));

        let Some(table_index) = last_table else {
            // "2.3 If there is no last table, then let adjusted insertion
            // location be inside the first element in the stack of open
            // elements (the html element), after its last child (if any)"
            let html = self
                .stack_of_open_elements
                .first()
                .copied()
                .unwrap_or(NodeId::ROOT);
            return (html, None);
        };
        let table = self.stack_of_open_elements[table_index];

        // "2.4 If last table has a parent node, then let adjusted insertion
        // location be inside last table's parent node, immediately before last
        // table"
        if let Some(parent) = self.tree.parent(table) {
            return (parent, Some(table));
        }

        // "2.5 Let previous element be the element immediately above last
        // table in the stack of open elements."
        // "2.6 Let adjusted insertion location be inside previous element,
        // after its last child (if any)."
        let previous = table_index
            .checked_sub(1)
            .map_or(NodeId::ROOT, |index| self.stack_of_open_elements[index]);
        (previous, None)
    }

    pub(super) fn insert_at(&mut self, (parent, before): (NodeId, Option<NodeId>), child: NodeId) {
        match before {
            Some(reference) => self.tree.insert_before(parent, child, reference),
            None => self.tree.append_child(parent, child),
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    /// "Create an element for a token"
    ///
    /// # Errors
    ///
    /// Fails when `token` is not a start tag or its name is empty; the
    /// tokenizer never produces either.
    pub(super) fn create_element_for_token(&mut self, token: &Token) -> ContractResult<NodeId> {
        let Token::StartTag {
            name, attributes, ..
        } = token
        else {
            return contracts::unreachable("an element can only be created for a start tag token");
        };
        let name = contracts::not_empty(Some(name.as_str()), "element tag name must not be empty")?;
        Ok(self.create_element(name, attributes))
    }

    fn create_element(&mut self, tag_name: &str, attributes: &[Attribute]) -> NodeId {
        let attrs: AttributesMap = attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect();
        self.tree.alloc(NodeType::Element(ElementData {
            tag_name: tag_name.to_string(),
            attrs,
        }))
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    /// "Insert an HTML element for the token": create it, insert it at the
    /// adjusted insertion location, and push it onto the stack of open
    /// elements so that it is the new current node.
    pub(super) fn insert_html_element(&mut self, token: &Token) -> ContractResult<NodeId> {
        let element = self.create_element_for_token(token)?;
        let location = self.adjusted_insertion_location();
        self.insert_at(location, element);
        self.stack_of_open_elements.push(element);
        Ok(element)
    }

    /// Insert an element for a start tag the parser made up itself, such as
    /// the implied `html`, `head` and `body`.
    pub(super) fn insert_synthesized_element(&mut self, tag_name: &str) -> ContractResult<NodeId> {
        self.insert_html_element(&synthesized_start_tag(tag_name))
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    /// "Insert a character"
    pub(super) fn insert_character(&mut self, c: char) {
        let (parent, before) = self.adjusted_insertion_location();

        // "If the adjusted insertion location is in a Document node, then
        // return."
        if parent == NodeId::ROOT {
            return;
        }

        // "If there is a Text node immediately before the adjusted insertion
        // location, then append data to that Text node's data."
        let previous = match before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(parent),
        };
        if let Some(previous) = previous
            && let Some(node) = self.tree.get_mut(previous)
            && let NodeType::Text(text) = &mut node.node_type
        {
            text.push(c);
            return;
        }

        // "Otherwise, create a new Text node whose data is data ... and insert
        // the newly created node at the adjusted insertion location."
        let text = self.tree.alloc(NodeType::Text(c.to_string()));
        self.insert_at((parent, before), text);
    }

    pub(super) fn insert_characters(&mut self, data: &str) {
        for c in data.chars() {
            self.insert_character(c);
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    /// "Insert a comment" at the adjusted insertion location.
    pub(super) fn insert_comment(&mut self, data: &str) {
        let location = self.adjusted_insertion_location();
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.insert_at(location, comment);
    }

    /// "Insert a comment as the last child of" `parent`.
    pub(super) fn insert_comment_in(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    /// Append a DocumentType node to the Document.
    pub(super) fn insert_doctype(&mut self, doctype: DocumentTypeData) {
        let node = self.tree.alloc(NodeType::DocumentType(doctype));
        self.tree.append_child(NodeId::ROOT, node);
    }

    /// "for each attribute on the token, check to see if the attribute is
    /// already present on the ... element. If it is not, add the attribute and
    /// its corresponding value to that element."
    pub(super) fn merge_attributes(&mut self, target: NodeId, token: &Token) {
        let Token::StartTag { attributes, .. } = token else {
            return;
        };
        if let Some(element) = self.tree.as_element_mut(target) {
            for attr in attributes {
                let _ = element.attrs.insert_if_absent(&attr.name, &attr.value);
            }
        }
    }

    // ===== Stack of open elements =====

    /// Pop elements until one with `tag_name` has been popped.
    pub(super) fn pop_until_tag(&mut self, tag_name: &str) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.tag_name_of(id) == Some(tag_name) {
                break;
            }
        }
    }

    /// Pop elements until one whose tag is in `tag_names` has been popped.
    pub(super) fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self
                .tag_name_of(id)
                .is_some_and(|name| tag_names.contains(&name))
            {
                break;
            }
        }
    }

    /// Pop elements until `node` has been popped.
    pub(super) fn pop_until_node(&mut self, node: NodeId) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if id == node {
                break;
            }
        }
    }

    pub(super) fn remove_from_stack(&mut self, node: NodeId) {
        self.stack_of_open_elements.retain(|&id| id != node);
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the
    /// stack)."
    /// "2. If node is the target node, terminate in a match state."
    /// "3. Otherwise, if node is one of the element types in list, terminate
    /// in a failure state."
    /// "4. Otherwise, set node to the previous entry in the stack of open
    /// elements and return to step 2."
    fn has_in_scope(&self, scope: Scope, is_target: impl Fn(NodeId, &str) -> bool) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            let Some(name) = self.tag_name_of(id) else {
                continue;
            };
            if is_target(id, name) {
                return true;
            }
            if scope.is_boundary(name) {
                return false;
            }
        }
        false
    }

    pub(super) fn has_element_in_specific_scope(&self, tag_name: &str, scope: Scope) -> bool {
        self.has_in_scope(scope, |_, name| name == tag_name)
    }

    /// "has an element in scope"
    pub(super) fn has_element_in_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, Scope::Default)
    }

    pub(super) fn has_any_element_in_scope(&self, tag_names: &[&str], scope: Scope) -> bool {
        self.has_in_scope(scope, |_, name| tag_names.contains(&name))
    }

    /// "has an element in button scope"
    pub(super) fn has_element_in_button_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, Scope::Button)
    }

    /// "has an element in table scope"
    pub(super) fn has_element_in_table_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, Scope::Table)
    }

    /// Scope check against a particular node rather than a tag name.
    pub(super) fn has_node_in_scope(&self, node: NodeId) -> bool {
        self.has_in_scope(Scope::Default, |id, _| id == node)
    }

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    pub(super) fn generate_implied_end_tags_excluding(&mut self, excluded: Option<&str>) {
        const IMPLIED: &[&str] = &[
            "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
        ];
        while let Some(id) = self.current_node() {
            let Some(name) = self.tag_name_of(id) else {
                break;
            };
            if !IMPLIED.contains(&name) || excluded == Some(name) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    pub(super) fn generate_implied_end_tags(&mut self) {
        self.generate_implied_end_tags_excluding(None);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    /// "close a p element"
    pub(super) fn close_p_element(&mut self) {
        // "Generate implied end tags, except for p elements."
        self.generate_implied_end_tags_excluding(Some("p"));
        // "If the current node is not a p element, then this is a parse error."
        if !self.current_node_is("p") {
            let open = self.current_node_name();
            self.parse_error(ParseErrorCode::UnexpectedEndTag, format!("</p> with <{open}> open"));
        }
        // "Pop elements from the stack of open elements until a p element has
        // been popped from the stack."
        self.pop_until_tag("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(super) fn close_p_element_if_in_button_scope(&mut self) {
        if self.has_element_in_button_scope("p") {
            self.close_p_element();
        }
    }

    /// Generate implied end tags, report a mismatched current node, then pop
    /// through the named element. The common tail of many end tag rules.
    pub(super) fn close_element(&mut self, tag_name: &str) {
        self.generate_implied_end_tags();
        if !self.current_node_is(tag_name) {
            let open = self.current_node_name();
            self.parse_error(
                ParseErrorCode::UnexpectedEndTag,
                format!("</{tag_name}> with <{open}> open"),
            );
        }
        self.pop_until_tag(tag_name);
    }

    // ===== Table helpers =====

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    /// "pop elements from the stack of open elements until the current node is
    /// a table, template, or html element."
    pub(super) fn clear_stack_back_to_table_context(&mut self) {
        self.clear_stack_back_to(&["table", "template", "html"]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    pub(super) fn clear_stack_back_to_table_body_context(&mut self) {
        self.clear_stack_back_to(&["tbody", "tfoot", "thead", "template", "html"]);
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    pub(super) fn clear_stack_back_to_table_row_context(&mut self) {
        self.clear_stack_back_to(&["tr", "template", "html"]);
    }

    fn clear_stack_back_to(&mut self, stop_at: &[&str]) {
        while self.stack_of_open_elements.len() > 1 && !self.current_node_is_one_of(stop_at) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    /// "close the cell"
    ///
    /// # Errors
    ///
    /// Callers check for a `td` or `th` in table scope first; a missing cell
    /// is a contract violation.
    pub(super) fn close_the_cell(&mut self) -> ContractResult<()> {
        contracts::is_true(
            self.has_any_element_in_scope(&["td", "th"], Scope::Table),
            "close the cell requires a td or th element in table scope",
        )?;
        // "1. Generate implied end tags."
        self.generate_implied_end_tags();
        // "2. If the current node is not now a td element or a th element,
        // then this is a parse error."
        if !self.current_node_is_one_of(&["td", "th"]) {
            let open = self.current_node_name();
            self.parse_error(ParseErrorCode::UnexpectedEndTag, format!("cell closed with <{open}> open"));
        }
        // "3. Pop elements from the stack of open elements stack until a td
        // element or a th element has been popped from the stack."
        self.pop_until_one_of(&["td", "th"]);
        // "4. Clear the list of active formatting elements up to the last
        // marker."
        self.clear_active_formatting_elements_to_last_marker();
        // "5. Switch the insertion mode to "in row"."
        self.insertion_mode = InsertionMode::InRow;
        Ok(())
    }

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    /// "Reset the insertion mode appropriately"
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        // "1. Let last be false."
        // "2. Let node be the last node in the stack of open elements."
        // "3. Loop: If node is the first node in the stack of open elements,
        // then set last to true"
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let last = index == 0;
            let node = self.stack_of_open_elements[index];
            let name = self.tag_name_of(node).unwrap_or_default();

            let mode = match name {
                // "4. If node is a select element"
                "select" => {
                    // "4.3 Loop: If ancestor is the first node in the stack of
                    // open elements, jump to the step below labeled Done."
                    // "4.6 If ancestor is a table node, switch the insertion
                    // mode to "in select in table" and return."
                    let in_table = !last
                        && self.stack_of_open_elements[..index]
                            .iter()
                            .rev()
                            .any(|&ancestor| self.tag_name_of(ancestor) == Some("table"));
                    // "4.8 Done: Switch the insertion mode to "in select" and
                    // return."
                    Some(if in_table {
                        InsertionMode::InSelectInTable
                    } else {
                        InsertionMode::InSelect
                    })
                }
                // "5. If node is a td or th element and last is false, then
                // switch the insertion mode to "in cell" and return."
                "td" | "th" if !last => Some(InsertionMode::InCell),
                "tr" => Some(InsertionMode::InRow),
                "tbody" | "thead" | "tfoot" => Some(InsertionMode::InTableBody),
                "caption" => Some(InsertionMode::InCaption),
                "colgroup" => Some(InsertionMode::InColumnGroup),
                "table" => Some(InsertionMode::InTable),
                // "12. If node is a head element and last is false, then switch
                // the insertion mode to "in head" and return."
                "head" if !last => Some(InsertionMode::InHead),
                "body" => Some(InsertionMode::InBody),
                "frameset" => Some(InsertionMode::InFrameset),
                // "16. If node is an html element, run these substeps: If the
                // head element pointer is null, switch the insertion mode to
                // "before head" and return. Otherwise, the head element pointer
                // is not null, switch the insertion mode to "after head" and
                // return."
                "html" => Some(if self.head_element_pointer.is_none() {
                    InsertionMode::BeforeHead
                } else {
                    InsertionMode::AfterHead
                }),
                _ => None,
            };
            if let Some(mode) = mode {
                self.insertion_mode = mode;
                return;
            }
        }
        // "17. If last is true, then switch the insertion mode to "in body"
        // and return."
        self.insertion_mode = InsertionMode::InBody;
    }

    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    /// "The generic raw text element parsing algorithm and the generic RCDATA
    /// element parsing algorithm"
    ///
    /// The tokenizer switches its own content model when it emits the start
    /// tag, so only the tree side of the algorithm remains.
    pub(super) fn parse_raw_text_element(&mut self, token: &Token) -> ContractResult<()> {
        // "1. Insert an HTML element for the token."
        let _ = self.insert_html_element(token)?;
        // "3. Set the original insertion mode to the current insertion mode."
        self.original_insertion_mode = Some(self.insertion_mode);
        // "4. Then, switch the insertion mode to "text"."
        self.insertion_mode = InsertionMode::Text;
        Ok(())
    }

    /// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    /// "Stop parsing": "Pop all the nodes off the stack of open elements."
    pub(super) fn stop_parsing(&mut self) {
        self.stack_of_open_elements.clear();
        self.active_formatting_elements.clear();
        self.stopped = true;
    }

    /// Report elements other than the ones that may legitimately be left
    /// open when the input ends.
    pub(super) fn check_open_elements_at_eof(&mut self) {
        const MAY_STAY_OPEN: &[&str] = &[
            "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td",
            "tfoot", "th", "thead", "tr", "body", "html",
        ];
        let unclosed: Vec<String> = self
            .stack_of_open_elements
            .iter()
            .filter_map(|&id| self.tag_name_of(id))
            .filter(|name| !MAY_STAY_OPEN.contains(name))
            .map(ToString::to_string)
            .collect();
        if !unclosed.is_empty() {
            self.parse_error(ParseErrorCode::EofWithOpenElements, unclosed.join(", "));
        }
    }

    /// Fallback for end tags a mode has no rule for.
    pub(super) fn ignore_end_tag(&mut self, name: &str) -> Step {
        self.parse_error(ParseErrorCode::UnexpectedEndTag, format!("</{name}>"));
        Step::Done
    }

    /// Fallback for start tags a mode has no rule for.
    pub(super) fn ignore_start_tag(&mut self, name: &str) -> Step {
        self.parse_error(ParseErrorCode::UnexpectedStartTag, format!("<{name}>"));
        Step::Done
    }

    pub(super) fn ignore_doctype(&mut self) -> Step {
        self.parse_error(ParseErrorCode::UnexpectedDoctype, "");
        Step::Done
    }
}

/// A start tag token with no attributes, for elements the parser implies.
pub(super) fn synthesized_start_tag(name: &str) -> Token {
    Token::StartTag {
        name: name.to_string(),
        self_closing: false,
        attributes: Vec::new(),
    }
}

/// "U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF), U+000C FORM FEED (FF),
/// U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
pub(super) const fn is_parser_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}
