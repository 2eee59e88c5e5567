//! Forgiving HTML tokenizer and tree builder.
//!
//! # Scope
//!
//! This crate implements:
//! - **Character reader** over the decoded input, with CRLF normalization and
//!   mark/rewind for lookahead
//!
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, PLAINTEXT and script data states
//!   - DOCTYPE, comment, and named/numeric character references
//!   - Attribute parsing with duplicate detection
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Every insertion mode except "in template" and foreign content
//!   - Implied end tags, foster parenting, the adoption agency algorithm
//!   - Quirks mode selection from the DOCTYPE
//!
//! - **Serializer** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!
//! # Not Implemented
//!
//! - Scripting (documents are parsed as if scripting were disabled)
//! - `<template>` contents and the template insertion mode
//! - SVG and MathML namespaces
//! - Fragment parsing and byte-level encoding sniffing

/// Parser entry point and the resulting document.
pub mod document;
/// Recoverable parse error codes and issues.
pub mod error;
/// HTML tree construction.
pub mod parser;
/// Code point reader over the input buffer.
pub mod reader;
/// Tree serialization and debug output.
pub mod serializer;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use document::{Document, HTMLParser, ParseOptions, QuirksMode, parse_document};
pub use error::{ParseErrorCode, ParseIssue};
pub use parser::{InsertionMode, TreeBuilder};
pub use reader::CharacterReader;
pub use serializer::{format_tree, print_tree, serialize};
pub use tokenizer::{Attribute, HTMLTokenizer, SpannedToken, Token};
