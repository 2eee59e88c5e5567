//! Shared building blocks for the thicket HTML parser.
//!
//! - [`contracts`]: internal invariant checks that abort a parse
//! - [`span`]: byte ranges into the parser input
//! - [`warning`]: deduplicated diagnostics for recoverable markup errors

/// Internal invariant checks.
pub mod contracts;
/// Byte ranges into the parser input.
pub mod span;
/// Deduplicated terminal warnings.
pub mod warning;

pub use contracts::{ContractResult, ContractViolation};
pub use span::Span;
