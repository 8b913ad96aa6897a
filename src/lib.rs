//! Catalog and metadata resolution for an ODBC driver in front of an Apache
//! Ignite cache cluster.
//!
//! The cache stores self-describing binary objects rather than relational
//! rows. This crate maps their type identifiers onto ODBC SQL types and
//! answers the introspection calls (SQLGetTypeInfo, SQLColumns, SQLTables,
//! SQLColAttribute, ...) from schema metadata alone, exposing the answers as
//! forward-only cursors that support binding and piecewise reads.
//!
//! # Example
//!
//! ```no_run
//! use ignite_odbc_rs::odbc::constants::{BINARY_TYPE_STRING, SQL_COLUMN_LENGTH};
//! use ignite_odbc_rs::{Connection, MemorySchemaProvider, Result, SchemaColumn};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let provider = MemorySchemaProvider::new().with_table(
//!         "cache",
//!         "TestType",
//!         vec![SchemaColumn::new("strField", BINARY_TYPE_STRING)],
//!     );
//!     let conn = Connection::connect(
//!         "DRIVER={Apache Ignite};ADDRESS=127.0.0.1:11110;SCHEMA=cache",
//!         provider,
//!     )?;
//!
//!     let mut stmt = conn.statement();
//!     stmt.describe("TestType", &["strField"]).await?;
//!     let length = stmt.col_attribute(1, SQL_COLUMN_LENGTH)?;
//!     println!("strField length: {:?}", length);
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod connection;
pub mod cursor;
pub mod error;
pub mod logging;
pub mod odbc;
pub mod statement;

// Re-export main types
pub use catalog::{AttributeValue, ColumnAttribute, Limits, MemorySchemaProvider, SchemaProvider};
pub use config::DriverConfig;
pub use connection::Connection;
pub use cursor::{Binding, CatalogCursor, Cursor, CursorState, CursorStreamExt, FetchOutcome};
pub use error::{Diagnostic, Error, Result, SqlReturn};
pub use logging::LogConfig;
pub use odbc::convert::{Converted, TargetType};
pub use odbc::types::{
    CatalogRow, CellValue, ColumnMeta, SchemaColumn, SizeHint, TableMeta, TypeDescriptor, TypeTag,
};
pub use statement::{AttributeOutput, ColumnDescription, Statement};
