//! Source positions attached to tokens and parse issues.

use core::fmt;

/// Byte range into the normalized input text.
///
/// `start` and `end` always fall on UTF-8 character boundaries of the text the
/// `CharacterReader` was built from (after newline normalization).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Offset of the first byte covered by the span.
    pub start: usize,
    /// Offset one past the last byte covered by the span.
    pub end: usize,
}

impl Span {
    /// Create a span covering `start..end`. An inverted range collapses to `start`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        if end < start {
            Self { start, end: start }
        } else {
            Self { start, end }
        }
    }

    /// A zero-width span at `offset`.
    #[must_use]
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
