//! Cell values of synthetic catalog result sets.

use std::fmt;

/// A single cell of a catalog row.
///
/// Catalog result sets only carry integers and strings; the column's
/// declared SQL type says how wide the integer is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// NULL value.
    Null,
    /// Exact integer (SMALLINT / INTEGER catalog columns).
    Int(i64),
    /// Character value (VARCHAR catalog columns).
    Str(String),
}

impl CellValue {
    /// Build a cell from an optional integer, NULL when absent.
    pub fn int_or_null<T: Into<i64>>(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, |v| CellValue::Int(v.into()))
    }

    /// Build a cell from an optional string, NULL when absent.
    pub fn str_or_null<S: Into<String>>(value: Option<S>) -> Self {
        value.map_or(CellValue::Null, |v| CellValue::Str(v.into()))
    }

    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Str(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Str(value)
    }
}

impl From<i16> for CellValue {
    fn from(value: i16) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "NULL"),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Str(s) => write!(f, "{}", s),
        }
    }
}
