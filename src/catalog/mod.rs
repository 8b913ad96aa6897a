//! Catalog and metadata resolution.
//!
//! Answers the ODBC introspection calls from the cache's binary object
//! schema without running a query.
//!
//! ## Module Structure
//!
//! - `type_info`: static type table and SQLGetTypeInfo rows
//! - `attributes`: per-column length, precision and scale
//! - `objects`: SQLTables and SQLColumns rows
//! - `schemas`: fixed result-set schemas of the catalog functions
//! - `pattern`: ODBC search patterns
//! - `schema`: the schema provider seam

pub mod attributes;
pub mod objects;
pub mod pattern;
pub mod schema;
pub mod schemas;
pub mod type_info;

pub use attributes::{AttributeValue, ColumnAttribute, ColumnAttributes, Limits};
pub use pattern::SearchPattern;
pub use schema::{MemorySchemaProvider, SchemaProvider};
