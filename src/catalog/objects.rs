//! SQLTables and SQLColumns result sets.
//!
//! Table and column descriptors are gathered from the schema provider up
//! front; rows are produced lazily from the resolved metadata.

use std::sync::Arc;

use crate::catalog::attributes::{self, Limits};
use crate::catalog::pattern::SearchPattern;
use crate::catalog::schema::SchemaProvider;
use crate::catalog::schemas;
use crate::error::Result;
use crate::odbc::constants::*;
use crate::odbc::types::{ordinal_at, CatalogRow, CellValue, ColumnMeta, TableMeta, TypeTag};

/// The only table type the cache exposes.
pub const TABLE_TYPE: &str = "TABLE";

/// Arguments of SQLTables.
#[derive(Debug, Clone, Default)]
pub struct TablesRequest<'a> {
    pub catalog: Option<&'a str>,
    pub schema_pattern: Option<&'a str>,
    pub table_pattern: Option<&'a str>,
    pub table_types: Option<&'a str>,
}

/// What a SQLTables call enumerates.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TablesMode {
    /// `catalog = "%"`, schema and table empty.
    Catalogs,
    /// `schema = "%"`, catalog and table empty.
    Schemas,
    /// `table_types = "%"`, catalog, schema and table empty.
    TableTypes,
    Tables,
}

impl TablesRequest<'_> {
    fn mode(&self) -> TablesMode {
        let empty = |v: Option<&str>| v == Some("");
        if self.catalog == Some("%") && empty(self.schema_pattern) && empty(self.table_pattern) {
            TablesMode::Catalogs
        } else if self.schema_pattern == Some("%")
            && empty(self.catalog)
            && empty(self.table_pattern)
        {
            TablesMode::Schemas
        } else if self.table_types == Some("%")
            && empty(self.catalog)
            && empty(self.schema_pattern)
            && empty(self.table_pattern)
        {
            TablesMode::TableTypes
        } else {
            TablesMode::Tables
        }
    }

    /// The cache has no catalogs; only an absent, empty or `%` catalog
    /// selects anything.
    fn catalog_matches(&self) -> bool {
        matches!(self.catalog, None | Some("") | Some("%"))
    }

    /// Whether the table type list admits `TABLE`.
    fn table_type_matches(&self) -> bool {
        match self.table_types {
            None | Some("") | Some("%") => true,
            Some(list) => list
                .split(',')
                .map(|t| t.trim().trim_matches('\''))
                .any(|t| t.eq_ignore_ascii_case(TABLE_TYPE)),
        }
    }
}

/// Gather the tables a SQLTables call reports.
pub async fn collect_tables<P: SchemaProvider>(
    provider: &P,
    request: &TablesRequest<'_>,
) -> Result<Vec<TableMeta>> {
    let mode = request.mode();
    tracing::debug!(?mode, "collecting tables");

    let tables = match mode {
        TablesMode::Catalogs | TablesMode::TableTypes => Vec::new(),
        TablesMode::Schemas => {
            let mut schemas: Vec<TableMeta> = Vec::new();
            for table in provider.list_tables().await? {
                if !schemas.iter().any(|s| s.schema == table.schema) {
                    schemas.push(TableMeta::new(table.schema, ""));
                }
            }
            schemas
        }
        TablesMode::Tables => {
            if !request.catalog_matches() || !request.table_type_matches() {
                return Ok(Vec::new());
            }
            let schema_pattern = SearchPattern::from_option(request.schema_pattern);
            let table_pattern = SearchPattern::from_option(request.table_pattern);
            provider
                .list_tables()
                .await?
                .into_iter()
                .filter(|t| schema_pattern.matches(&t.schema) && table_pattern.matches(&t.name))
                .collect()
        }
    };
    Ok(tables)
}

/// Lazily produce SQLTables rows.
///
/// A table-types enumeration yields a single `TABLE` row regardless of
/// `tables`.
pub fn table_rows(
    request: &TablesRequest<'_>,
    tables: Vec<TableMeta>,
) -> Box<dyn Iterator<Item = CatalogRow> + Send> {
    let columns = schemas::tables_columns();
    match request.mode() {
        TablesMode::TableTypes => {
            let row = CatalogRow::new(
                vec![
                    CellValue::Null,
                    CellValue::Null,
                    CellValue::Null,
                    CellValue::from(TABLE_TYPE),
                    CellValue::Null,
                ],
                columns,
            );
            Box::new(std::iter::once(row))
        }
        TablesMode::Schemas => Box::new(tables.into_iter().map(move |t| {
            CatalogRow::new(
                vec![
                    CellValue::Null,
                    CellValue::from(t.schema),
                    CellValue::Null,
                    CellValue::Null,
                    CellValue::Null,
                ],
                columns.clone(),
            )
        })),
        TablesMode::Catalogs | TablesMode::Tables => Box::new(tables.into_iter().map(move |t| {
            CatalogRow::new(
                vec![
                    CellValue::Null,
                    CellValue::from(t.schema),
                    CellValue::from(t.name),
                    CellValue::from(TABLE_TYPE),
                    CellValue::Null,
                ],
                columns.clone(),
            )
        })),
    }
}

/// Gather and resolve the columns a SQLColumns call reports.
///
/// Fails with `Error::SchemaInconsistency` if any matching column carries a
/// type id outside the supported set.
pub async fn collect_columns<P: SchemaProvider>(
    provider: &P,
    schema_pattern: Option<&str>,
    table_pattern: Option<&str>,
    column_pattern: Option<&str>,
) -> Result<Vec<ColumnMeta>> {
    let schema_pattern = SearchPattern::from_option(schema_pattern);
    let table_pattern = SearchPattern::from_option(table_pattern);
    let column_pattern = SearchPattern::from_option(column_pattern);

    let mut result = Vec::new();
    for table in provider.list_tables().await? {
        if !schema_pattern.matches(&table.schema) || !table_pattern.matches(&table.name) {
            continue;
        }
        let raw = provider.describe_columns(&table.schema, &table.name).await?;
        for (i, column) in raw.iter().enumerate() {
            if !column_pattern.matches(&column.name) {
                continue;
            }
            let meta = ordinal_at(i)
                .and_then(|ordinal| {
                    ColumnMeta::from_schema(ordinal, &table.schema, &table.name, column)
                })
                .inspect_err(|e| {
                    tracing::warn!(
                        schema = %table.schema,
                        table = %table.name,
                        column = %column.name,
                        error = %e,
                        "unrepresentable column type"
                    )
                })?;
            result.push(meta);
        }
    }
    tracing::debug!(columns = result.len(), "collected columns");
    Ok(result)
}

/// Lazily produce SQLColumns rows.
pub fn column_rows(
    metas: Vec<ColumnMeta>,
    limits: Limits,
) -> impl Iterator<Item = CatalogRow> + Send + 'static {
    let columns = schemas::columns_columns();
    metas
        .into_iter()
        .map(move |meta| column_row(&meta, &limits, columns.clone()))
}

/// Build one SQLColumns row.
pub fn column_row(meta: &ColumnMeta, limits: &Limits, columns: Arc<[ColumnMeta]>) -> CatalogRow {
    let desc = meta.descriptor;
    let attrs = attributes::resolve(meta, limits);

    let decimal_digits =
        (desc.decimal_digits.is_some() || desc.tag == TypeTag::Decimal).then_some(attrs.scale);
    let char_octet_length =
        (desc.is_character() || desc.is_binary()).then_some(attrs.byte_length);
    let is_nullable = match meta.nullable {
        SQL_NO_NULLS => "NO",
        SQL_NULLABLE => "YES",
        _ => "",
    };

    let values = vec![
        CellValue::Null,
        CellValue::from(meta.schema_name.as_str()),
        CellValue::from(meta.table_name.as_str()),
        CellValue::from(meta.name.as_str()),
        CellValue::from(desc.sql_type),
        CellValue::from(desc.type_name),
        CellValue::Int(attrs.column_size),
        CellValue::Int(attrs.byte_length),
        CellValue::int_or_null(decimal_digits),
        CellValue::int_or_null(desc.num_prec_radix),
        CellValue::from(meta.nullable),
        CellValue::Null,
        CellValue::Null,
        CellValue::from(desc.verbose_type),
        CellValue::int_or_null(desc.datetime_sub),
        CellValue::int_or_null(char_octet_length),
        CellValue::Int(i64::from(meta.ordinal)),
        CellValue::from(is_nullable),
    ];
    CatalogRow::new(values, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::MemorySchemaProvider;
    use crate::catalog::schemas::column_ordinals;
    use crate::error::Error;
    use crate::odbc::types::{SchemaColumn, SizeHint};

    fn make_provider() -> MemorySchemaProvider {
        MemorySchemaProvider::new()
            .with_table(
                "cache",
                "TestType",
                vec![
                    SchemaColumn::new("i8Field", BINARY_TYPE_BYTE),
                    SchemaColumn::new("strField", BINARY_TYPE_STRING),
                    SchemaColumn::new("decField", BINARY_TYPE_DECIMAL)
                        .with_size(SizeHint::decimal(10, 3))
                        .not_null(),
                ],
            )
            .with_table(
                "cache2",
                "ComplexType",
                vec![SchemaColumn::new("objField", BINARY_TYPE_BINARY_OBJECT)],
            )
    }

    fn cell(row: &CatalogRow, ordinal: u16) -> &CellValue {
        row.get(usize::from(ordinal) - 1).unwrap()
    }

    #[test]
    fn test_collect_tables_with_patterns() {
        let provider = make_provider();
        let request = TablesRequest {
            table_pattern: Some("Test%"),
            ..TablesRequest::default()
        };
        let tables = tokio_test::block_on(collect_tables(&provider, &request)).unwrap();
        assert_eq!(tables, vec![TableMeta::new("cache", "TestType")]);

        let rows: Vec<CatalogRow> = table_rows(&request, tables).collect();
        assert_eq!(rows[0].get(2).unwrap().as_str(), Some("TestType"));
        assert_eq!(rows[0].get(3).unwrap().as_str(), Some("TABLE"));
    }

    #[test]
    fn test_collect_tables_type_filter() {
        let provider = make_provider();
        let views = TablesRequest {
            table_types: Some("'VIEW'"),
            ..TablesRequest::default()
        };
        assert!(tokio_test::block_on(collect_tables(&provider, &views))
            .unwrap()
            .is_empty());

        let tables = TablesRequest {
            table_types: Some("'VIEW', 'TABLE'"),
            ..TablesRequest::default()
        };
        assert_eq!(
            tokio_test::block_on(collect_tables(&provider, &tables))
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn test_collect_tables_special_enumerations() {
        let provider = make_provider();

        let schemas = TablesRequest {
            catalog: Some(""),
            schema_pattern: Some("%"),
            table_pattern: Some(""),
            table_types: None,
        };
        let tables = tokio_test::block_on(collect_tables(&provider, &schemas)).unwrap();
        let rows: Vec<CatalogRow> = table_rows(&schemas, tables).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get(1).unwrap().as_str(), Some("cache2"));
        assert!(rows[1].get(2).unwrap().is_null());

        let types = TablesRequest {
            catalog: Some(""),
            schema_pattern: Some(""),
            table_pattern: Some(""),
            table_types: Some("%"),
        };
        let tables = tokio_test::block_on(collect_tables(&provider, &types)).unwrap();
        let rows: Vec<CatalogRow> = table_rows(&types, tables).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(3).unwrap().as_str(), Some("TABLE"));

        let catalogs = TablesRequest {
            catalog: Some("%"),
            schema_pattern: Some(""),
            table_pattern: Some(""),
            table_types: None,
        };
        let tables = tokio_test::block_on(collect_tables(&provider, &catalogs)).unwrap();
        assert_eq!(table_rows(&catalogs, tables).count(), 0);
    }

    #[test]
    fn test_collect_columns_filters_and_ordinals() {
        let provider = make_provider();
        let metas = tokio_test::block_on(collect_columns(
            &provider,
            Some("cache"),
            Some("TestType"),
            Some("%Field"),
        ))
        .unwrap();
        assert_eq!(metas.len(), 3);

        let metas = tokio_test::block_on(collect_columns(&provider, None, None, Some("dec%")))
            .unwrap();
        assert_eq!(metas.len(), 1);
        // ordinal is the position in the table, not in the result
        assert_eq!(metas[0].ordinal, 3);
    }

    #[test]
    fn test_column_rows_content() {
        let provider = make_provider();
        let metas =
            tokio_test::block_on(collect_columns(&provider, None, Some("TestType"), None)).unwrap();
        let rows: Vec<CatalogRow> = column_rows(metas, Limits::default()).collect();
        assert_eq!(rows.len(), 3);

        let str_row = &rows[1];
        assert_eq!(cell(str_row, column_ordinals::COLUMN_NAME).as_str(), Some("strField"));
        assert_eq!(
            cell(str_row, column_ordinals::DATA_TYPE).as_i64(),
            Some(i64::from(SQL_VARCHAR))
        );
        assert_eq!(
            cell(str_row, column_ordinals::COLUMN_SIZE).as_i64(),
            Some(i64::from(DEFAULT_MAX_VARLEN))
        );
        assert!(cell(str_row, column_ordinals::DECIMAL_DIGITS).is_null());
        assert_eq!(cell(str_row, column_ordinals::IS_NULLABLE).as_str(), Some("YES"));

        let dec_row = &rows[2];
        assert_eq!(cell(dec_row, column_ordinals::COLUMN_SIZE).as_i64(), Some(10));
        assert_eq!(cell(dec_row, column_ordinals::DECIMAL_DIGITS).as_i64(), Some(3));
        assert_eq!(
            cell(dec_row, column_ordinals::NULLABLE).as_i64(),
            Some(i64::from(SQL_NO_NULLS))
        );
        assert_eq!(cell(dec_row, column_ordinals::ORDINAL_POSITION).as_i64(), Some(3));
    }

    #[test]
    fn test_collect_columns_unknown_type() {
        let provider = MemorySchemaProvider::new()
            .with_table("cache", "Broken", vec![SchemaColumn::new("x", 99)]);
        let result = tokio_test::block_on(collect_columns(&provider, None, None, None));
        assert!(matches!(result, Err(Error::SchemaInconsistency { .. })));
    }
}
