//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.

/// Incremental construction of tag, comment and DOCTYPE tokens.
pub mod builder;
/// HTML tokenizer state machine implementation.
pub mod core;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Token types produced by the tokenizer.
pub mod token;

mod character_reference;
mod comment;
mod doctype;
mod helpers;
mod script_data;
mod tag;
mod text;

pub use builder::TokenBuilder;
pub use self::core::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, SpannedToken, Token};
