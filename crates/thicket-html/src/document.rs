//! Parser entry point and the parsed document.

use thicket_common::{ContractResult, contracts};
use thicket_dom::{DescendantIterator, DomTree, NodeId};

use crate::error::ParseIssue;
use crate::parser::TreeBuilder;
use crate::tokenizer::HTMLTokenizer;

/// [§ 3.2 Quirks mode](https://dom.spec.whatwg.org/#concept-document-quirks)
///
/// "Unless stated otherwise, a document's mode is "no-quirks"."
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuirksMode {
    /// Standards mode.
    #[default]
    NoQuirks,
    /// Almost-standards mode.
    LimitedQuirks,
    /// Legacy compatibility mode.
    Quirks,
}

/// Settings for a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// How many times one token may be handed back for reprocessing before it
    /// is dropped.
    pub reprocess_budget: usize,
    /// Keep the recovered parse errors on the [`Document`].
    pub collect_issues: bool,
    /// Print each distinct parse error to stderr once.
    pub log_warnings: bool,
    /// Encoding label supplied by the caller, recorded on the document.
    pub declared_encoding: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            reprocess_budget: 16,
            collect_issues: true,
            log_warnings: true,
            declared_encoding: None,
        }
    }
}

impl ParseOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-token reprocess budget.
    #[must_use]
    pub const fn with_reprocess_budget(mut self, budget: usize) -> Self {
        self.reprocess_budget = budget;
        self
    }

    /// Keep or discard parse issues on the resulting document.
    #[must_use]
    pub const fn with_collect_issues(mut self, collect: bool) -> Self {
        self.collect_issues = collect;
        self
    }

    /// Turn terminal warnings on or off.
    #[must_use]
    pub const fn with_log_warnings(mut self, log: bool) -> Self {
        self.log_warnings = log;
        self
    }

    /// Record the encoding label the input was decoded with.
    #[must_use]
    pub fn with_declared_encoding(mut self, label: impl Into<String>) -> Self {
        self.declared_encoding = Some(label.into());
        self
    }
}

/// A parsed HTML document: the node tree plus what the parser learned about
/// it along the way.
#[derive(Debug, Clone)]
pub struct Document {
    tree: DomTree,
    quirks_mode: QuirksMode,
    declared_encoding: Option<String>,
    issues: Vec<ParseIssue>,
}

impl Document {
    /// The node tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Take the node tree out of the document.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// The Document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The compatibility mode chosen from the DOCTYPE.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// The encoding label passed in through [`ParseOptions`], if any.
    #[must_use]
    pub fn declared_encoding(&self) -> Option<&str> {
        self.declared_encoding.as_deref()
    }

    /// Recovered parse errors in input order. Empty when issue collection
    /// was turned off.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Every node, starting with the Document node, depth-first in tree order.
    #[must_use]
    pub fn descendants(&self) -> DescendantIterator<'_> {
        self.tree.descendants(self.root())
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.tag_name(id)
    }

    /// Attribute value on an element node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree.attribute(id, name)
    }

    /// The `html` element.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.document_element()
    }

    /// The `body` element (or `frameset`, for frameset documents).
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.tree.body()
    }
}

/// [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parsing)
///
/// Drives the tokenizer and the tree builder over one input buffer.
///
/// ```
/// use thicket_html::{HTMLParser, ParseOptions};
///
/// let parser = HTMLParser::new(ParseOptions::default().with_log_warnings(false));
/// let document = parser.parse(Some("<p>Hello")).unwrap();
/// assert!(document.body().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HTMLParser {
    options: ParseOptions,
}

impl HTMLParser {
    /// Create a parser with the given options.
    #[must_use]
    pub const fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// The options this parser was created with.
    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a complete document.
    ///
    /// Malformed markup never fails; it is repaired and reported through
    /// [`Document::issues`].
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`](thicket_common::ContractViolation)
    /// when `input` is `None` or an internal invariant of the tokenizer or
    /// tree builder is broken.
    pub fn parse(&self, input: Option<&str>) -> ContractResult<Document> {
        let input = contracts::not_null(input, "input buffer must not be null")?;

        let mut tokenizer = HTMLTokenizer::new(input).with_warnings(self.options.log_warnings);
        let mut builder = TreeBuilder::new(&self.options);

        // [§ 13.2.1 Overview of the parsing model](https://html.spec.whatwg.org/multipage/parsing.html#overview-of-the-parsing-model)
        // "The output of the tokenization step is a series of zero or more of
        // the following tokens ... As each token is emitted from the
        // tokenizer, the user agent must follow the appropriate steps".
        loop {
            let spanned = tokenizer.next_token()?;
            builder.process_token(&spanned)?;
            if spanned.token.is_eof() || builder.is_stopped() {
                break;
            }
        }

        let mut issues = tokenizer.take_issues();
        let (tree, quirks_mode, tree_issues) = builder.finish();
        if self.options.collect_issues {
            issues.extend(tree_issues);
            issues.sort_by_key(|issue| issue.span.start);
        } else {
            issues.clear();
        }

        Ok(Document {
            tree,
            quirks_mode,
            declared_encoding: self.options.declared_encoding.clone(),
            issues,
        })
    }
}

/// Parse `input` with default options.
///
/// # Errors
///
/// Only on an internal contract violation; see [`HTMLParser::parse`].
pub fn parse_document(input: &str) -> ContractResult<Document> {
    HTMLParser::default().parse(Some(input))
}
