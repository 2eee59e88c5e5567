//! Parser diagnostics with colored terminal output.
//!
//! Markup errors are recoverable, so they are reported rather than raised.
//! Each distinct message is printed once per process (until
//! [`clear_warnings`]) so a malformed page cannot flood the terminal.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Messages already printed, keyed by `[component] message`.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Global switch for terminal output. Deduplication still happens when off.
static ENABLED: AtomicBool = AtomicBool::new(true);

/// Report a recoverable problem (prints once per unique message).
///
/// # Example
/// ```
/// use thicket_common::warning::warn_once;
///
/// warn_once("HTML Tokenizer", "duplicate-attribute at 12..20");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time && warnings_enabled() {
        eprintln!("{}", format!("[thicket {component}] ⚠ {message}").yellow());
    }
}

/// Forget every recorded warning (call before parsing an unrelated document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Turn terminal output on or off for the whole process.
pub fn set_warnings_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether [`warn_once`] currently prints.
#[must_use]
pub fn warnings_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Whether `message` has been reported for `component` since the last clear.
#[must_use]
pub fn was_reported(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}
