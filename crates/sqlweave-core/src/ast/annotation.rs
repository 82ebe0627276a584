//! Write-once annotation slots filled in after parsing.

use core::fmt;
use std::sync::OnceLock;

/// A slot an analysis pass writes into an otherwise immutable node.
///
/// The first write wins; later writes are ignored so that a tree resolved
/// twice keeps its original bindings. Annotations never take part in
/// structural equality.
pub struct Annotation<T>(OnceLock<T>);

impl<T> Annotation<T> {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the annotation, if one was written.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.0.get()
    }

    /// Writes the annotation. Returns false if the slot was already filled.
    pub fn set(&self, value: T) -> bool {
        self.0.set(value).is_ok()
    }

    /// Returns true if an annotation was written.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.get().is_some()
    }
}

impl<T> Default for Annotation<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Annotation<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> PartialEq for Annotation<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for Annotation<T> {}

impl<T: fmt::Debug> fmt::Debug for Annotation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.get() {
            Some(value) => f.debug_tuple("Annotation").field(value).finish(),
            None => f.write_str("Annotation(<unset>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_wins() {
        let slot = Annotation::new();
        assert!(!slot.is_set());
        assert!(slot.set(1));
        assert!(!slot.set(2));
        assert_eq!(slot.get(), Some(&1));
    }

    #[test]
    fn test_annotations_never_affect_equality() {
        let filled = Annotation::new();
        filled.set("x");
        assert_eq!(filled, Annotation::new());
    }
}
