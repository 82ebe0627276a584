//! Generic wrappers and the copy-on-write contract shared by all nodes.

use std::sync::Arc;

use crate::lexer::Location;

/// Reference identity between two versions of a child slot.
pub trait Same {
    /// Returns true if both sides point at the very same node(s) and any
    /// fields held inline are equal.
    fn same(&self, other: &Self) -> bool;
}

impl<T> Same for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Same> Same for Option<T> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Same> Same for Vec<T> {
    fn same(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same(b))
    }
}

/// Copy-on-write update for a node stored behind an [`Arc`].
pub trait Node: Sized {
    /// Returns true if `other` holds reference-identical children and
    /// equal values in every other field. Locations and annotations are
    /// not compared.
    fn same_as(&self, other: &Self) -> bool;

    /// Returns `this` unchanged when `next` is the same node, otherwise
    /// allocates `next`.
    fn update(this: &Arc<Self>, next: Self) -> Arc<Self> {
        if this.same_as(&next) {
            Arc::clone(this)
        } else {
            Arc::new(next)
        }
    }
}

/// An ordered, comma separated sequence of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List<T> {
    /// The elements, in source order.
    pub items: Vec<T>,
    /// Location of the first element.
    pub location: Location,
}

impl<T> List<T> {
    /// Creates a list.
    #[must_use]
    pub const fn new(items: Vec<T>, location: Location) -> Self {
        Self { items, location }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the elements.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> core::ops::Index<usize> for List<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T: Same> Same for List<T> {
    fn same(&self, other: &Self) -> bool {
        self.items.same(&other.items)
    }
}

/// A node written between parentheses.
///
/// Kept in the tree so rendering reproduces the source grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paren<T> {
    /// The wrapped node.
    pub inner: T,
    /// Location of the opening parenthesis.
    pub location: Location,
}

impl<T> Paren<T> {
    /// Wraps a node.
    #[must_use]
    pub const fn new(inner: T, location: Location) -> Self {
        Self { inner, location }
    }
}

impl<T: Same> Node for Paren<T> {
    fn same_as(&self, other: &Self) -> bool {
        self.inner.same(&other.inner)
    }
}
