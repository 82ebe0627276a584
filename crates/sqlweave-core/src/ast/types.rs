//! SQL data types and column definitions.

use core::fmt;
use std::sync::Arc;

use super::{Identifier, NumberKind};
use crate::lexer::Location;

/// A type name with optional arguments, e.g. `VARCHAR(MAX)` or
/// `DECIMAL(10, 2)`.
///
/// Type names are not keywords, so they keep their source spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    /// The type name, possibly multi-word (`DOUBLE PRECISION`).
    pub name: String,
    /// Arguments as written (`10`, `MAX`).
    pub args: Vec<String>,
    pub location: Location,
}

impl DataType {
    /// Creates a data type without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            location,
        }
    }

    /// Returns the numeric sub-kind this type converts literals to.
    #[must_use]
    pub fn number_kind(&self) -> Option<NumberKind> {
        NumberKind::from_type_name(&self.name)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            write!(f, "({})", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// A column of a table variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: Identifier,
    pub data_type: Arc<DataType>,
    /// `Some(true)` for `NULL`, `Some(false)` for `NOT NULL`.
    pub nullable: Option<bool>,
    pub primary_key: bool,
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_display() {
        let mut ty = DataType::new("VARCHAR", Location::default());
        assert_eq!(ty.to_string(), "VARCHAR");
        ty.args.push("MAX".to_string());
        assert_eq!(ty.to_string(), "VARCHAR(MAX)");
        ty.args = vec!["10".to_string(), "2".to_string()];
        assert_eq!(ty.to_string(), "VARCHAR(10, 2)");
    }

    #[test]
    fn test_number_kind_of_type() {
        assert_eq!(
            DataType::new("bigint", Location::default()).number_kind(),
            Some(NumberKind::BigInt)
        );
    }
}
