//! Row type for synthetic catalog result sets.

use std::sync::Arc;

use super::column::{find_by_name, ColumnMeta};
use super::value::CellValue;

/// One materialized row of a catalog result set.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    /// Cell values, one per result column.
    values: Vec<CellValue>,
    /// Shared result set schema.
    columns: Arc<[ColumnMeta]>,
}

impl CatalogRow {
    /// Create a new row with values and the shared result schema.
    pub fn new(values: Vec<CellValue>, columns: Arc<[ColumnMeta]>) -> Self {
        debug_assert_eq!(values.len(), columns.len());
        Self { values, columns }
    }

    /// Get value by column index (0-based).
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.values.get(index)
    }

    /// Get value by column name (case-insensitive).
    pub fn get_by_name(&self, name: &str) -> Option<&CellValue> {
        find_by_name(&self.columns, name).and_then(|idx| self.values.get(idx))
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get all values.
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Get the result set schema.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }
}

impl IntoIterator for CatalogRow {
    type Item = CellValue;
    type IntoIter = std::vec::IntoIter<CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a CatalogRow {
    type Item = &'a CellValue;
    type IntoIter = std::slice::Iter<'a, CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odbc::types::TypeTag;

    fn make_test_columns() -> Arc<[ColumnMeta]> {
        Arc::from(vec![
            ColumnMeta::new(1, "TYPE_NAME", TypeTag::String),
            ColumnMeta::new(2, "DATA_TYPE", TypeTag::Int16),
        ])
    }

    #[test]
    fn test_row_access() {
        let row = CatalogRow::new(
            vec![CellValue::from("INTEGER"), CellValue::Int(4)],
            make_test_columns(),
        );

        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&CellValue::Str("INTEGER".to_string())));
        assert_eq!(row.get_by_name("data_type"), Some(&CellValue::Int(4)));
        assert_eq!(row.get_by_name("DATA_TYPE"), row.get_by_name("data_type"));
        assert_eq!(row.get(5), None);
    }

    #[test]
    fn test_row_into_iter() {
        let row = CatalogRow::new(
            vec![CellValue::from("BIGINT"), CellValue::Int(-5)],
            make_test_columns(),
        );
        let values: Vec<CellValue> = row.into_iter().collect();
        assert_eq!(values[1], CellValue::Int(-5));
    }
}
