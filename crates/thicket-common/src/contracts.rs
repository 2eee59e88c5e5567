//! Internal invariant checks.
//!
//! Each check returns `Ok` when the condition holds and a [`ContractViolation`]
//! otherwise. A violation means the parser itself is wrong, not the markup it
//! was given, so callers propagate it with `?` and abort the parse. Malformed
//! HTML must never be reported through this module.
//!
//! ```
//! use thicket_common::contracts;
//!
//! let name = contracts::not_empty(Some("div"), "tag name must not be empty")?;
//! assert_eq!(name, "div");
//! # Ok::<(), thicket_common::contracts::ContractViolation>(())
//! ```

use thiserror::Error;

/// Message used by [`not_null`] callers that have nothing more specific to say.
pub const MUST_NOT_BE_NULL: &str = "Object must not be null";
/// Message used by [`is_true`] callers that have nothing more specific to say.
pub const MUST_BE_TRUE: &str = "Must be true";
/// Message used by [`is_false`] callers that have nothing more specific to say.
pub const MUST_BE_FALSE: &str = "Must be false";
/// Message used by [`no_null_elements`] callers that have nothing more specific to say.
pub const MUST_NOT_CONTAIN_NULLS: &str = "Array must not contain any null objects";
/// Message used by [`not_empty`] callers that have nothing more specific to say.
pub const MUST_NOT_BE_EMPTY: &str = "String must not be empty";

/// A violated internal invariant. Fatal for the parse that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// A required value was absent.
    #[error("contract violated: {0}")]
    NullValue(String),

    /// A condition that must hold did not.
    #[error("contract violated: {0}")]
    ExpectedTrue(String),

    /// A condition that must not hold did.
    #[error("contract violated: {0}")]
    ExpectedFalse(String),

    /// A sequence contained an absent entry.
    #[error("contract violated: {message} (first null at index {index})")]
    NullElement {
        /// Position of the first absent entry.
        index: usize,
        /// Caller-supplied description.
        message: String,
    },

    /// A required string was absent or empty.
    #[error("contract violated: {0}")]
    EmptyString(String),

    /// An explicit failure raised by [`fail`].
    #[error("contract violated: {0}")]
    Failed(String),

    /// Control reached a state the parser treats as impossible.
    #[error("unreachable state: {0}")]
    Unreachable(String),
}

impl ContractViolation {
    /// The caller-supplied description, without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NullValue(message)
            | Self::ExpectedTrue(message)
            | Self::ExpectedFalse(message)
            | Self::EmptyString(message)
            | Self::Failed(message)
            | Self::Unreachable(message)
            | Self::NullElement { message, .. } => message,
        }
    }
}

/// Result alias for operations that can only fail on a contract violation.
pub type ContractResult<T> = Result<T, ContractViolation>;

/// Unwraps `value`, or fails with [`ContractViolation::NullValue`].
///
/// # Errors
///
/// Returns an error when `value` is `None`.
pub fn not_null<T>(value: Option<T>, message: &str) -> ContractResult<T> {
    value.ok_or_else(|| ContractViolation::NullValue(message.to_string()))
}

/// Fails with [`ContractViolation::ExpectedTrue`] unless `condition` holds.
///
/// # Errors
///
/// Returns an error when `condition` is false.
pub fn is_true(condition: bool, message: &str) -> ContractResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ContractViolation::ExpectedTrue(message.to_string()))
    }
}

/// Fails with [`ContractViolation::ExpectedFalse`] if `condition` holds.
///
/// # Errors
///
/// Returns an error when `condition` is true.
pub fn is_false(condition: bool, message: &str) -> ContractResult<()> {
    if condition {
        Err(ContractViolation::ExpectedFalse(message.to_string()))
    } else {
        Ok(())
    }
}

/// Fails with [`ContractViolation::NullElement`] if any entry of `items` is `None`.
///
/// # Errors
///
/// Returns an error naming the index of the first `None` entry.
pub fn no_null_elements<T>(items: &[Option<T>], message: &str) -> ContractResult<()> {
    match items.iter().position(Option::is_none) {
        Some(index) => Err(ContractViolation::NullElement {
            index,
            message: message.to_string(),
        }),
        None => Ok(()),
    }
}

/// Unwraps `value` if it is present and non-empty.
///
/// # Errors
///
/// Returns [`ContractViolation::EmptyString`] when `value` is `None` or `""`.
pub fn not_empty<'a>(value: Option<&'a str>, message: &str) -> ContractResult<&'a str> {
    match value {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ContractViolation::EmptyString(message.to_string())),
    }
}

/// Always fails with [`ContractViolation::Failed`].
///
/// # Errors
///
/// Always returns an error carrying `message`.
pub fn fail<T>(message: &str) -> ContractResult<T> {
    Err(ContractViolation::Failed(message.to_string()))
}

/// Always fails. Use at branches the surrounding logic has already excluded.
///
/// # Errors
///
/// Always returns [`ContractViolation::Unreachable`].
pub fn unreachable<T>(message: &str) -> ContractResult<T> {
    Err(ContractViolation::Unreachable(message.to_string()))
}
