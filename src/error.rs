//! Error types, SQLSTATE mapping and diagnostic records.

use thiserror::Error;

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for catalog and metadata operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Column ordinal outside `1..=count`.
    #[error("Column index {index} out of bounds (columns: {count})")]
    InvalidColumnIndex { index: u16, count: usize },

    /// Column not found in a described table.
    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    /// Table not known to the schema provider.
    #[error("Table not found: {schema}.{table}")]
    TableNotFound { schema: String, table: String },

    /// Unknown SQLColAttribute field identifier.
    #[error("Invalid descriptor field identifier: {field}")]
    InvalidAttribute { field: u16 },

    /// Unsupported C target type for a binding or SQLGetData.
    #[error("Invalid application buffer type: {c_type}")]
    InvalidTargetType { c_type: i16 },

    /// Operation on a cursor that is closed or absent.
    #[error("Invalid cursor state: {message}")]
    InvalidCursorState { message: String },

    /// API functions called out of order.
    #[error("Function sequence error: {message}")]
    FunctionSequence { message: String },

    /// The schema provider reported something the catalog cannot represent.
    #[error("Schema inconsistency: {message}")]
    SchemaInconsistency { message: String },

    /// Integer cell does not fit the requested C type.
    #[error("Numeric value out of range: {value} does not fit C type {c_type}")]
    NumericOutOfRange { value: i64, c_type: i16 },

    /// Character cell cannot be converted to the requested numeric C type.
    #[error("Invalid character value for cast specification: '{value}'")]
    InvalidCharacterValue { value: String },

    /// Invalid connection string.
    #[error("Invalid connect string: {message}")]
    InvalidConnectString { message: String },

    /// Schema provider failure.
    #[error("Schema provider error: {message}")]
    Provider { message: String },
}

impl Error {
    /// Create an invalid cursor state error.
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::InvalidCursorState {
            message: message.into(),
        }
    }

    /// Create a function sequence error.
    pub fn sequence(message: impl Into<String>) -> Self {
        Self::FunctionSequence {
            message: message.into(),
        }
    }

    /// Create a schema provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// SQLSTATE reported in the diagnostic record for this error.
    pub fn sql_state(&self) -> &'static str {
        match self {
            Error::InvalidColumnIndex { .. } => "07009",
            Error::ColumnNotFound { .. } => "42S22",
            Error::TableNotFound { .. } => "42S02",
            Error::InvalidAttribute { .. } => "HY091",
            Error::InvalidTargetType { .. } => "HY003",
            Error::InvalidCursorState { .. } => "24000",
            Error::FunctionSequence { .. } => "HY010",
            Error::NumericOutOfRange { .. } => "22003",
            Error::InvalidCharacterValue { .. } => "22018",
            Error::SchemaInconsistency { .. }
            | Error::InvalidConnectString { .. }
            | Error::Provider { .. } => "HY000",
        }
    }

    /// Whether the caller violated the API contract, as opposed to an
    /// internal or provider failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidColumnIndex { .. }
                | Error::InvalidAttribute { .. }
                | Error::InvalidTargetType { .. }
                | Error::InvalidCursorState { .. }
                | Error::FunctionSequence { .. }
        )
    }
}

/// SQLSTATE for string data, right truncated.
pub const SQLSTATE_TRUNCATED: &str = "01004";

/// ODBC return code of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlReturn {
    Success,
    /// Succeeded with warnings, e.g. truncated character data.
    SuccessWithInfo,
    NoData,
    Error,
}

impl SqlReturn {
    /// Numeric `SQLRETURN` value.
    pub fn code(&self) -> i16 {
        match self {
            SqlReturn::Success => 0,
            SqlReturn::SuccessWithInfo => 1,
            SqlReturn::NoData => 100,
            SqlReturn::Error => -1,
        }
    }

    /// `SQL_SUCCEEDED` macro.
    pub fn succeeded(&self) -> bool {
        matches!(self, SqlReturn::Success | SqlReturn::SuccessWithInfo)
    }
}

/// One diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Five character SQLSTATE.
    pub sql_state: &'static str,
    /// Human readable message.
    pub message: String,
    /// Result column the record refers to, if any.
    pub column: Option<u16>,
}

impl Diagnostic {
    /// Record for a failed call.
    pub fn from_error(err: &Error) -> Self {
        let column = match err {
            Error::InvalidColumnIndex { index, .. } => Some(*index),
            _ => None,
        };
        Self {
            sql_state: err.sql_state(),
            message: err.to_string(),
            column,
        }
    }

    /// Warning record for a truncated column value.
    pub fn truncated(column: u16) -> Self {
        Self {
            sql_state: SQLSTATE_TRUNCATED,
            message: format!("String data, right truncated (column {})", column),
            column: Some(column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_states() {
        assert_eq!(
            Error::InvalidColumnIndex { index: 3, count: 1 }.sql_state(),
            "07009"
        );
        assert_eq!(Error::InvalidAttribute { field: 999 }.sql_state(), "HY091");
        assert_eq!(Error::invalid_cursor("closed").sql_state(), "24000");
        assert_eq!(
            Error::SchemaInconsistency {
                message: "bad".into()
            }
            .sql_state(),
            "HY000"
        );
    }

    #[test]
    fn test_invalid_argument_classification() {
        assert!(Error::InvalidAttribute { field: 1 }.is_invalid_argument());
        assert!(Error::invalid_cursor("x").is_invalid_argument());
        assert!(!Error::provider("down").is_invalid_argument());
        assert!(!Error::SchemaInconsistency {
            message: "x".into()
        }
        .is_invalid_argument());
    }

    #[test]
    fn test_diagnostic_from_error() {
        let diag = Diagnostic::from_error(&Error::InvalidColumnIndex { index: 4, count: 2 });
        assert_eq!(diag.sql_state, "07009");
        assert_eq!(diag.column, Some(4));
        assert!(diag.message.contains("out of bounds"));
    }

    #[test]
    fn test_sql_return_codes() {
        assert_eq!(SqlReturn::NoData.code(), 100);
        assert!(SqlReturn::SuccessWithInfo.succeeded());
        assert!(!SqlReturn::Error.succeeded());
    }
}
