//! Longest-match trie of multi-character operators.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct Node {
    children: HashMap<char, Node>,
    terminal: bool,
}

/// A trie of the multi-character operators registered by a dialect.
///
/// Single characters never need registering: any punctuation character is
/// a valid one-character symbol on its own.
#[derive(Debug, Clone, Default)]
pub struct OperatorTrie {
    root: Node,
}

impl OperatorTrie {
    /// Creates an empty trie.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an operator.
    pub fn insert(&mut self, operator: &str) {
        let mut node = &mut self.root;
        for c in operator.chars() {
            node = node.children.entry(c).or_default();
        }
        node.terminal = true;
    }

    /// Returns true if `operator` was registered.
    #[must_use]
    pub fn contains(&self, operator: &str) -> bool {
        self.walk(operator).is_some_and(|node| node.terminal)
    }

    /// Returns true if some registered operator starts with `prefix` and is
    /// longer than it.
    #[must_use]
    pub fn extends(&self, prefix: &str, next: char) -> bool {
        self.walk(prefix)
            .is_some_and(|node| node.children.contains_key(&next))
    }

    fn walk(&self, prefix: &str) -> Option<&Node> {
        let mut node = &self.root;
        for c in prefix.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}

impl<'a> FromIterator<&'a str> for OperatorTrie {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut trie = Self::new();
        for operator in iter {
            trie.insert(operator);
        }
        trie
    }
}
