//! HTML tree construction.
//!
//! Implements [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//! of the WHATWG HTML Living Standard, without scripting, templates or
//! foreign content.

/// The tree builder, its insertion modes and the shared insertion helpers.
pub mod core;

mod after_body;
mod formatting;
mod in_body;
mod in_head;
mod in_select;
mod in_table;
mod quirks;

pub use self::core::{ActiveFormattingElement, InsertionMode, Step, TreeBuilder};
