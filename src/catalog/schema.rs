//! Schema provider: the source of table and column descriptors.
//!
//! A provider answers from schema metadata the node has already published;
//! the catalog layer calls it once per catalog request and resolves
//! everything else in memory.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::odbc::types::{SchemaColumn, TableMeta};

/// Source of cache table schemas.
///
/// Implementations must be shareable across statements of a connection.
///
/// # Example
///
/// ```no_run
/// use ignite_odbc_rs::{MemorySchemaProvider, SchemaColumn, SchemaProvider};
/// use ignite_odbc_rs::odbc::constants::BINARY_TYPE_STRING;
///
/// #[tokio::main]
/// async fn main() -> ignite_odbc_rs::Result<()> {
///     let provider = MemorySchemaProvider::new();
///     provider
///         .register_table("cache", "TestType", vec![SchemaColumn::new("strField", BINARY_TYPE_STRING)])
///         .await;
///
///     let columns = provider.describe_columns("cache", "TestType").await?;
///     assert_eq!(columns.len(), 1);
///     Ok(())
/// }
/// ```
pub trait SchemaProvider: Send + Sync {
    /// All tables, ordered by schema then table name.
    fn list_tables(&self) -> impl Future<Output = Result<Vec<TableMeta>>> + Send;

    /// Columns of one table in declaration order.
    ///
    /// Returns `Err(Error::TableNotFound)` if the table does not exist.
    fn describe_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> impl Future<Output = Result<Vec<SchemaColumn>>> + Send;
}

impl<T: SchemaProvider> SchemaProvider for Arc<T> {
    fn list_tables(&self) -> impl Future<Output = Result<Vec<TableMeta>>> + Send {
        (**self).list_tables()
    }

    fn describe_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> impl Future<Output = Result<Vec<SchemaColumn>>> + Send {
        (**self).describe_columns(schema, table)
    }
}

/// Schema provider backed by an in-memory map.
#[derive(Debug, Default)]
pub struct MemorySchemaProvider {
    /// (schema, table) → columns.
    tables: RwLock<BTreeMap<(String, String), Vec<SchemaColumn>>>,
}

impl MemorySchemaProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table while the provider is still exclusively owned.
    pub fn with_table(
        mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<SchemaColumn>,
    ) -> Self {
        self.tables
            .get_mut()
            .insert((schema.into(), table.into()), columns);
        self
    }

    /// Add or replace a table.
    pub async fn register_table(
        &self,
        schema: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<SchemaColumn>,
    ) {
        let (schema, table) = (schema.into(), table.into());
        tracing::debug!(%schema, %table, columns = columns.len(), "registering table");
        self.tables.write().await.insert((schema, table), columns);
    }

    /// Remove a table. Returns whether it existed.
    pub async fn drop_table(&self, schema: &str, table: &str) -> bool {
        self.tables
            .write()
            .await
            .remove(&(schema.to_string(), table.to_string()))
            .is_some()
    }
}

impl SchemaProvider for MemorySchemaProvider {
    async fn list_tables(&self) -> Result<Vec<TableMeta>> {
        let tables = self.tables.read().await;
        Ok(tables
            .keys()
            .map(|(schema, table)| TableMeta::new(schema.as_str(), table.as_str()))
            .collect())
    }

    async fn describe_columns(&self, schema: &str, table: &str) -> Result<Vec<SchemaColumn>> {
        let tables = self.tables.read().await;
        tables
            .iter()
            .find(|((s, t), _)| s.eq_ignore_ascii_case(schema) && t.eq_ignore_ascii_case(table))
            .map(|(_, columns)| columns.clone())
            .ok_or_else(|| Error::TableNotFound {
                schema: schema.to_string(),
                table: table.to_string(),
            })
    }
}
