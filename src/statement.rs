//! Statement handle: the ODBC entry points of the catalog subsystem.
//!
//! Every call clears the diagnostics of the previous call. Failures are
//! returned as `Err` and also recorded as a [`Diagnostic`]; truncation is
//! not a failure and shows up as [`SqlReturn::SuccessWithInfo`] with an
//! `01004` record per truncated value.
//!
//! Opening a new result set (type info, columns, tables, describe) closes
//! the previous cursor and drops its bindings.

use std::sync::Arc;

use crate::catalog::attributes::{self, AttributeValue, ColumnAttribute};
use crate::catalog::objects::{self, TablesRequest};
use crate::catalog::schema::SchemaProvider;
use crate::catalog::{schemas, type_info};
use crate::connection::Connection;
use crate::cursor::{Binding, CatalogCursor, Cursor, FetchOutcome};
use crate::error::{Diagnostic, Error, Result, SqlReturn};
use crate::odbc::convert::{self, Converted, TargetType};
use crate::odbc::types::{find_by_name, ordinal_at, ColumnMeta};

/// SQLDescribeCol output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
    /// Concise SQL type code.
    pub data_type: i16,
    pub column_size: i64,
    pub decimal_digits: i16,
    pub nullable: i16,
}

/// SQLColAttribute output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOutput {
    /// Value for the numeric attribute pointer.
    Numeric(i64),
    /// NUL-terminated text written to the caller's character buffer.
    Text(Converted),
}

/// A statement on a [`Connection`].
///
/// # Example
///
/// ```no_run
/// use ignite_odbc_rs::{Connection, MemorySchemaProvider, SqlReturn};
/// use ignite_odbc_rs::odbc::constants::{SQL_ALL_TYPES, SQL_C_CHAR};
///
/// let conn = Connection::connect("SCHEMA=cache", MemorySchemaProvider::new())?;
/// let mut stmt = conn.statement();
///
/// stmt.get_type_info(SQL_ALL_TYPES)?;
/// stmt.bind_col(1, SQL_C_CHAR, 64)?;
/// while stmt.fetch()? != SqlReturn::NoData {
///     println!("{:?}", stmt.binding(1).and_then(|b| b.text()));
/// }
/// # Ok::<(), ignite_odbc_rs::Error>(())
/// ```
pub struct Statement<'conn, P: SchemaProvider> {
    conn: &'conn Connection<P>,
    /// Projection loaded by `describe()`.
    described: Option<Arc<[ColumnMeta]>>,
    cursor: Option<CatalogCursor>,
    diagnostics: Vec<Diagnostic>,
}

impl<'conn, P: SchemaProvider> Statement<'conn, P> {
    pub(crate) fn new(conn: &'conn Connection<P>) -> Self {
        Self {
            conn,
            described: None,
            cursor: None,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostic records of the last call.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The open (or closed but not yet replaced) cursor.
    pub fn cursor(&self) -> Option<&CatalogCursor> {
        self.cursor.as_ref()
    }

    /// Detach the cursor, e.g. to consume it as a stream.
    pub fn take_cursor(&mut self) -> Option<CatalogCursor> {
        self.diagnostics.clear();
        self.cursor.take()
    }

    fn record<T>(&mut self, call: &'static str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            tracing::debug!(call, sql_state = e.sql_state(), error = %e, "call failed");
            self.diagnostics.push(Diagnostic::from_error(e));
        }
        result
    }

    fn replace_result(&mut self, cursor: Option<CatalogCursor>, described: Option<Arc<[ColumnMeta]>>) {
        if let Some(old) = self.cursor.as_mut() {
            old.close();
        }
        self.cursor = cursor;
        self.described = described;
    }

    /// Columns of the current result set.
    fn result_columns(&self) -> Result<&[ColumnMeta]> {
        match (&self.cursor, &self.described) {
            (Some(cursor), _) if !cursor.is_closed() => Ok(cursor.columns()),
            (_, Some(described)) => Ok(&described[..]),
            _ => Err(Error::sequence("no result set")),
        }
    }

    fn cursor_mut(&mut self) -> Result<&mut CatalogCursor> {
        self.cursor
            .as_mut()
            .ok_or_else(|| Error::sequence("no result set"))
    }

    /// SQLGetTypeInfo: open a result set describing the supported types.
    ///
    /// `SQL_ALL_TYPES` lists every type; a code no type maps to yields an
    /// empty result set.
    pub fn get_type_info(&mut self, sql_type: i16) -> Result<()> {
        self.diagnostics.clear();
        let limits = self.conn.limits();
        let rows = type_info::type_info_rows(sql_type, limits);
        let cursor = CatalogCursor::open(schemas::type_info_columns(), rows);
        tracing::debug!(sql_type, rows = ?cursor.state().total(), "SQLGetTypeInfo");
        self.replace_result(Some(cursor), None);
        Ok(())
    }

    /// SQLColumns: open a result set describing the columns matching the
    /// search patterns.
    ///
    /// A named catalog matches nothing, the cache has none. On failure the
    /// statement is left without a result set and stays usable.
    pub async fn columns(
        &mut self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        column_pattern: Option<&str>,
    ) -> Result<()> {
        self.diagnostics.clear();
        self.replace_result(None, None);

        let columns = schemas::columns_columns();
        if !matches!(catalog, None | Some("") | Some("%")) {
            self.cursor = Some(CatalogCursor::empty(columns));
            return Ok(());
        }

        let provider = self.conn.provider();
        let result =
            objects::collect_columns(provider, schema_pattern, table_pattern, column_pattern).await;
        let metas = self.record("SQLColumns", result)?;
        tracing::debug!(
            schema = ?schema_pattern,
            table = ?table_pattern,
            column = ?column_pattern,
            rows = metas.len(),
            "SQLColumns"
        );
        let rows = objects::column_rows(metas, self.conn.limits());
        self.cursor = Some(CatalogCursor::open(columns, rows));
        Ok(())
    }

    /// SQLTables: open a result set listing tables, or one of the special
    /// catalog, schema and table type enumerations.
    pub async fn tables(
        &mut self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        table_types: Option<&str>,
    ) -> Result<()> {
        self.diagnostics.clear();
        self.replace_result(None, None);

        let request = TablesRequest {
            catalog,
            schema_pattern,
            table_pattern,
            table_types,
        };
        let result = objects::collect_tables(self.conn.provider(), &request).await;
        let tables = self.record("SQLTables", result)?;
        tracing::debug!(rows = tables.len(), "SQLTables");
        let rows = objects::table_rows(&request, tables);
        self.cursor = Some(CatalogCursor::open(schemas::tables_columns(), rows));
        Ok(())
    }

    /// Load the result columns of a projection over `table` without
    /// executing anything.
    ///
    /// `table` is `schema.table` or a table of the default schema. An empty
    /// projection selects every column in declaration order.
    pub async fn describe(&mut self, table: &str, projection: &[&str]) -> Result<()> {
        self.diagnostics.clear();
        self.replace_result(None, None);
        let result = self.load_projection(table, projection).await;
        let columns = self.record("describe", result)?;
        tracing::debug!(table, columns = columns.len(), "described projection");
        self.described = Some(columns);
        Ok(())
    }

    async fn load_projection(&self, table: &str, projection: &[&str]) -> Result<Arc<[ColumnMeta]>> {
        let (schema, table) = match table.split_once('.') {
            Some((schema, table)) => (schema, table),
            None => (self.conn.config().schema.as_str(), table),
        };
        let declared: Vec<ColumnMeta> = self
            .conn
            .provider()
            .describe_columns(schema, table)
            .await?
            .iter()
            .enumerate()
            .map(|(i, c)| {
                ordinal_at(i).and_then(|ordinal| ColumnMeta::from_schema(ordinal, schema, table, c))
            })
            .collect::<Result<_>>()?;

        if projection.is_empty() {
            return Ok(declared.into());
        }

        let mut columns = Vec::with_capacity(projection.len());
        for (i, name) in projection.iter().enumerate() {
            let index = find_by_name(&declared, name).ok_or_else(|| Error::ColumnNotFound {
                name: name.to_string(),
            })?;
            // ordinals follow the projection, not the table
            let mut column = declared[index].clone();
            column.ordinal = ordinal_at(i)?;
            columns.push(column);
        }
        Ok(columns.into())
    }

    /// SQLNumResultCols.
    pub fn num_result_cols(&mut self) -> Result<u16> {
        self.diagnostics.clear();
        let result = self.result_columns().and_then(|columns| {
            u16::try_from(columns.len()).map_err(|_| Error::SchemaInconsistency {
                message: format!("{} result columns exceed {}", columns.len(), u16::MAX),
            })
        });
        self.record("SQLNumResultCols", result)
    }

    /// SQLDescribeCol.
    pub fn describe_col(&mut self, ordinal: u16) -> Result<ColumnDescription> {
        self.diagnostics.clear();
        let limits = self.conn.limits();
        let result = self.result_columns().and_then(|columns| {
            let column = attributes::column_at(columns, ordinal)?;
            let attrs = attributes::resolve(column, &limits);
            Ok(ColumnDescription {
                name: column.name.clone(),
                data_type: column.descriptor.sql_type,
                column_size: attrs.column_size,
                decimal_digits: attrs.scale as i16,
                nullable: column.nullable,
            })
        });
        self.record("SQLDescribeCol", result)
    }

    /// SQLColAttribute with a raw ODBC 2 or ODBC 3 field identifier.
    pub fn col_attribute(&mut self, ordinal: u16, field: u16) -> Result<AttributeValue> {
        self.diagnostics.clear();
        let limits = self.conn.limits();
        let result = ColumnAttribute::from_raw(field).and_then(|attr| {
            let columns = self.result_columns()?;
            attributes::column_attribute(columns, ordinal, attr, &limits)
        });
        if let Ok(value) = &result {
            tracing::trace!(ordinal, field, ?value, "SQLColAttribute");
        }
        self.record("SQLColAttribute", result)
    }

    /// SQLColAttribute writing string values into a caller buffer of
    /// `capacity` bytes.
    pub fn col_attribute_into(
        &mut self,
        ordinal: u16,
        field: u16,
        capacity: usize,
    ) -> Result<(SqlReturn, AttributeOutput)> {
        match self.col_attribute(ordinal, field)? {
            AttributeValue::Int(v) => Ok((SqlReturn::Success, AttributeOutput::Numeric(v))),
            AttributeValue::Str(s) => {
                let converted = convert::write_char(&s, capacity, 0);
                let status = if converted.truncated {
                    self.diagnostics.push(Diagnostic::truncated(ordinal));
                    SqlReturn::SuccessWithInfo
                } else {
                    SqlReturn::Success
                };
                Ok((status, AttributeOutput::Text(converted)))
            }
        }
    }

    /// SQLBindCol on the open result set.
    pub fn bind_col(&mut self, ordinal: u16, c_type: i16, capacity: usize) -> Result<()> {
        self.diagnostics.clear();
        let result = TargetType::from_raw(c_type)
            .and_then(|target| self.cursor_mut()?.bind_column(ordinal, target, capacity));
        self.record("SQLBindCol", result)
    }

    /// Buffer bound to a column.
    pub fn binding(&self, ordinal: u16) -> Option<&Binding> {
        self.cursor.as_ref()?.binding(ordinal)
    }

    /// SQLFetch.
    pub fn fetch(&mut self) -> Result<SqlReturn> {
        self.diagnostics.clear();
        let result = self.cursor_mut().and_then(|cursor| cursor.fetch());
        match self.record("SQLFetch", result)? {
            FetchOutcome::NoData => Ok(SqlReturn::NoData),
            FetchOutcome::Row { truncated } if truncated.is_empty() => Ok(SqlReturn::Success),
            FetchOutcome::Row { truncated } => {
                self.diagnostics
                    .extend(truncated.into_iter().map(Diagnostic::truncated));
                Ok(SqlReturn::SuccessWithInfo)
            }
        }
    }

    /// SQLGetData. Returns `NoData` once the value has been fully read.
    pub fn get_data(
        &mut self,
        ordinal: u16,
        c_type: i16,
        capacity: usize,
    ) -> Result<(SqlReturn, Option<Converted>)> {
        self.diagnostics.clear();
        let result = TargetType::from_raw(c_type)
            .and_then(|target| self.cursor_mut()?.get_data(ordinal, target, capacity));
        match self.record("SQLGetData", result)? {
            None => Ok((SqlReturn::NoData, None)),
            Some(converted) if converted.truncated => {
                self.diagnostics.push(Diagnostic::truncated(ordinal));
                Ok((SqlReturn::SuccessWithInfo, Some(converted)))
            }
            Some(converted) => Ok((SqlReturn::Success, Some(converted))),
        }
    }

    /// SQLMoreResults. Catalog calls produce a single result set, so this
    /// closes the current one and reports no data.
    pub fn more_results(&mut self) -> SqlReturn {
        self.diagnostics.clear();
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.close();
        }
        SqlReturn::NoData
    }

    /// SQLCloseCursor. Closing twice is a no-op.
    pub fn close_cursor(&mut self) {
        self.diagnostics.clear();
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.close();
        }
    }

    /// SQLFreeStmt with `SQL_UNBIND`.
    pub fn unbind(&mut self) {
        self.diagnostics.clear();
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.unbind_all();
        }
    }

    /// Release the result set, its bindings and any described projection.
    /// Idempotent.
    pub fn close(&mut self) {
        self.diagnostics.clear();
        self.replace_result(None, None);
    }
}

impl<P: SchemaProvider> Drop for Statement<'_, P> {
    fn drop(&mut self) {
        self.replace_result(None, None);
    }
}
