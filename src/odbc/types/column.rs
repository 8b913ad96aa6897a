//! Resolved column metadata.
//!
//! `ColumnMeta` pairs a column's identity with the static
//! [`TypeDescriptor`] of its type tag. It is built per request from the
//! schema provider's raw [`SchemaColumn`] and owned by the statement.

use crate::catalog::type_info;
use crate::error::{Error, Result};
use crate::odbc::constants::{SQL_NO_NULLS, SQL_NULLABLE};

use super::descriptor::TypeDescriptor;
use super::metadata::{SchemaColumn, SizeHint};
use super::type_tag::TypeTag;

/// A column of a result set or table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    /// 1-based position.
    pub ordinal: u16,
    /// Column name.
    pub name: String,
    /// Owning schema, empty for synthetic catalog columns.
    pub schema_name: String,
    /// Owning table, empty for synthetic catalog columns.
    pub table_name: String,
    /// SQL identity of the column's type tag.
    pub descriptor: &'static TypeDescriptor,
    /// Declared size from the schema.
    pub size: SizeHint,
    /// `SQL_NO_NULLS`, `SQL_NULLABLE` or `SQL_NULLABLE_UNKNOWN`.
    pub nullable: i16,
}

impl ColumnMeta {
    /// Create a nullable column of the given tag with no declared size.
    pub fn new(ordinal: u16, name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            ordinal,
            name: name.into(),
            schema_name: String::new(),
            table_name: String::new(),
            descriptor: type_info::resolve(tag),
            size: SizeHint::none(),
            nullable: SQL_NULLABLE,
        }
    }

    /// Resolve a raw schema column.
    ///
    /// Returns `Err(Error::SchemaInconsistency)` if the column's type id is
    /// outside the supported set.
    pub fn from_schema(
        ordinal: u16,
        schema_name: &str,
        table_name: &str,
        column: &SchemaColumn,
    ) -> Result<Self> {
        let tag = TypeTag::from_type_id(column.type_id)?;
        Ok(Self {
            ordinal,
            name: column.name.clone(),
            schema_name: schema_name.to_string(),
            table_name: table_name.to_string(),
            descriptor: type_info::resolve(tag),
            size: column.size,
            nullable: if column.nullable {
                SQL_NULLABLE
            } else {
                SQL_NO_NULLS
            },
        })
    }

    /// Set the declared size.
    pub fn with_size(mut self, size: SizeHint) -> Self {
        self.size = size;
        self
    }

    /// Set the nullability code.
    pub fn with_nullable(mut self, nullable: i16) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the owning schema and table.
    pub fn with_table(mut self, schema_name: &str, table_name: &str) -> Self {
        self.schema_name = schema_name.to_string();
        self.table_name = table_name.to_string();
        self
    }

    /// Internal type tag.
    pub fn tag(&self) -> TypeTag {
        self.descriptor.tag
    }
}

/// 1-based ordinal of the column at a 0-based position.
///
/// Fails with `Error::SchemaInconsistency` past `u16::MAX` columns.
pub fn ordinal_at(index: usize) -> Result<u16> {
    index
        .checked_add(1)
        .and_then(|ordinal| u16::try_from(ordinal).ok())
        .ok_or_else(|| Error::SchemaInconsistency {
            message: format!("column position {} exceeds {} columns", index, u16::MAX),
        })
}

/// Find a column index by name (case-insensitive).
pub fn find_by_name(columns: &[ColumnMeta], name: &str) -> Option<usize> {
    columns.iter().position(|c| c.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::odbc::constants::*;

    fn make_test_schema() -> Vec<SchemaColumn> {
        vec![
            SchemaColumn::new("ID", BINARY_TYPE_LONG).not_null(),
            SchemaColumn::new("NAME", BINARY_TYPE_STRING).with_size(SizeHint::length(100)),
        ]
    }

    #[test]
    fn test_column_from_schema() {
        let schema = make_test_schema();
        let col = ColumnMeta::from_schema(1, "cache", "TestType", &schema[0]).unwrap();

        assert_eq!(col.ordinal, 1);
        assert_eq!(col.name, "ID");
        assert_eq!(col.tag(), TypeTag::Int64);
        assert_eq!(col.nullable, SQL_NO_NULLS);
        assert_eq!(col.table_name, "TestType");
        assert_eq!(col.descriptor.sql_type, SQL_BIGINT);

        let col = ColumnMeta::from_schema(2, "cache", "TestType", &schema[1]).unwrap();
        assert_eq!(col.size.length, Some(100));
        assert_eq!(col.nullable, SQL_NULLABLE);
    }

    #[test]
    fn test_column_from_schema_unknown_type() {
        let raw = SchemaColumn::new("BROKEN", 250);
        let result = ColumnMeta::from_schema(1, "cache", "TestType", &raw);
        assert!(matches!(result, Err(Error::SchemaInconsistency { .. })));
    }

    #[test]
    fn test_ordinal_at() {
        assert_eq!(ordinal_at(0).unwrap(), 1);
        assert_eq!(ordinal_at(65_534).unwrap(), u16::MAX);
        assert!(matches!(ordinal_at(65_535), Err(Error::SchemaInconsistency { .. })));
        assert!(matches!(ordinal_at(usize::MAX), Err(Error::SchemaInconsistency { .. })));
    }

    #[test]
    fn test_find_by_name() {
        let columns = vec![
            ColumnMeta::new(1, "ID", TypeTag::Int64),
            ColumnMeta::new(2, "strField", TypeTag::String),
        ];
        assert_eq!(find_by_name(&columns, "STRFIELD"), Some(1));
        assert_eq!(find_by_name(&columns, "missing"), None);
    }
}
