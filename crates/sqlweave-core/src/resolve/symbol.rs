//! Symbols, bindings and the per-scope symbol table.

use std::collections::BTreeMap;

use crate::lexer::Location;

/// Where a symbol came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolOrigin {
    /// Declared by the batch itself: DECLARE, assignment or CTE.
    UserDeclared,
    /// An exposed table name or a column alias.
    Alias,
    /// Supplied by the host through an [`super::Environment`].
    Environmental,
}

/// What a symbol can be used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Scalar,
    /// Anything usable as a table source.
    Table,
}

impl SymbolKind {
    /// Returns the kind as a lowercase word.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Table => "table",
        }
    }
}

/// How a reference converts between the sigil and bare variable spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationRule {
    /// `x` becomes `@x`.
    AddSigil,
    /// `@x` becomes `x`.
    StripSigil,
}

impl TranslationRule {
    /// Returns the rule converting `name` to the other spelling.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        if name.starts_with('@') {
            Self::StripSigil
        } else {
            Self::AddSigil
        }
    }

    /// Converts `name`.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::AddSigil => format!("@{name}"),
            Self::StripSigil => name.strip_prefix('@').unwrap_or(name).to_string(),
        }
    }
}

/// How a symbol was used while its scope was open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Usage {
    pub assigned: bool,
    pub scalar: bool,
    pub table: bool,
    pub invoked: bool,
}

/// A symbol table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    /// The name as first written.
    pub name: String,
    pub origin: SymbolOrigin,
    pub kind: SymbolKind,
    pub defined_at: Location,
    /// Set for variables, which exist under both spellings.
    pub translation: Option<TranslationRule>,
    /// True for the alternate spelling registered next to a variable.
    pub shadow: bool,
    pub usage: Usage,
}

impl SymbolInfo {
    pub(crate) fn new(
        name: impl Into<String>,
        origin: SymbolOrigin,
        kind: SymbolKind,
        defined_at: Location,
    ) -> Self {
        Self {
            name: name.into(),
            origin,
            kind,
            defined_at,
            translation: None,
            shadow: false,
            usage: Usage::default(),
        }
    }

    /// Returns true for DECLAREd or assigned variables, shadows included.
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        self.translation.is_some()
    }

    /// Returns the binding a reference to this symbol records.
    #[must_use]
    pub fn binding(&self) -> Binding {
        Binding {
            name: self.name.clone(),
            origin: self.origin,
            kind: self.kind,
            defined_at: self.defined_at,
            translation: self.translation,
        }
    }
}

/// What a reference resolved to, stored on the referencing node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub origin: SymbolOrigin,
    pub kind: SymbolKind,
    pub defined_at: Location,
    pub translation: Option<TranslationRule>,
}

/// The kind of node that owns a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Host-supplied symbols; the outermost frame.
    Environment,
    /// A statement list.
    Block,
    Select,
    Insert,
    Update,
    Delete,
    Merge,
    With,
}

impl ScopeKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Block => "block",
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Merge => "merge",
            Self::With => "with",
        }
    }
}

/// Folds a name to its lookup key.
pub(crate) fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// The symbols defined directly in one scope.
///
/// Names are looked up case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    kind: ScopeKind,
    symbols: BTreeMap<String, SymbolInfo>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            symbols: BTreeMap::new(),
        }
    }

    /// Returns the kind of node owning this scope.
    #[must_use]
    pub const fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Looks up `name`, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SymbolInfo> {
        self.symbols.get(&fold(name))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut SymbolInfo> {
        self.symbols.get_mut(&fold(name))
    }

    /// Returns true if `name` is defined here.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(&fold(name))
    }

    pub(crate) fn insert(&mut self, symbol: SymbolInfo) {
        self.symbols.insert(fold(&symbol.name), symbol);
    }

    /// Iterates over the symbols in key order.
    pub fn symbols(&self) -> impl Iterator<Item = &SymbolInfo> {
        self.symbols.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_rule() {
        assert_eq!(TranslationRule::for_name("@x"), TranslationRule::StripSigil);
        assert_eq!(TranslationRule::for_name("x"), TranslationRule::AddSigil);
        assert_eq!(TranslationRule::StripSigil.apply("@total"), "total");
        assert_eq!(TranslationRule::AddSigil.apply("total"), "@total");
    }

    #[test]
    fn test_table_lookup_ignores_case() {
        let mut table = SymbolTable::new(ScopeKind::Block);
        table.insert(SymbolInfo::new(
            "MyTable",
            SymbolOrigin::Alias,
            SymbolKind::Table,
            Location::default(),
        ));
        assert!(table.contains("mytable"));
        assert_eq!(table.get("MYTABLE").map(|s| s.name.as_str()), Some("MyTable"));
        assert_eq!(table.len(), 1);
    }
}
