//! Source location tracking for tokens and AST nodes.

use core::fmt;
use core::hash::{Hash, Hasher};

/// A position in the source text.
///
/// Lines and columns are 1-based. Locations exist for diagnostics only:
/// any two locations compare equal, so trees parsed from differently
/// formatted text are structurally equal. Compare `line` and `column`
/// directly when the position itself matters.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    /// Line number (1-based).
    pub line: u32,
    /// Column number (1-based).
    pub column: u32,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Returns the location as a `(line, column)` pair.
    #[must_use]
    pub const fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Returns true if `self` lies strictly before `other` in the source.
    #[must_use]
    pub const fn is_before(&self, other: &Self) -> bool {
        self.line < other.line || (self.line == other.line && self.column < other.column)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl PartialEq for Location {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_new() {
        let location = Location::new(3, 7);
        assert_eq!(location.line, 3);
        assert_eq!(location.column, 7);
        assert_eq!(location.position(), (3, 7));
    }

    #[test]
    fn test_location_default_is_start_of_input() {
        assert_eq!(Location::default().position(), (1, 1));
    }

    #[test]
    fn test_locations_never_affect_equality() {
        assert_eq!(Location::new(1, 1), Location::new(9, 42));
    }

    #[test]
    fn test_location_ordering() {
        assert!(Location::new(1, 5).is_before(&Location::new(2, 1)));
        assert!(Location::new(2, 1).is_before(&Location::new(2, 3)));
        assert!(!Location::new(2, 3).is_before(&Location::new(2, 3)));
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new(4, 2).to_string(), "line 4, column 2");
    }
}
