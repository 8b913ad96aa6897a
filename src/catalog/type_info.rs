//! Type catalog resolution.
//!
//! Owns the process-wide table mapping every [`TypeTag`] to its
//! [`TypeDescriptor`]. The table is built once on first use and never
//! mutated afterwards, so lookups need no synchronization.
//!
//! SQLGetTypeInfo rows are ordered by SQL type code ascending; tags that share
//! a code (the binary family) keep their declaration order.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::catalog::attributes::{self, Limits};
use crate::catalog::schemas;
use crate::odbc::constants::*;
use crate::odbc::types::{CatalogRow, CellValue, ColumnMeta, SizeHint, TypeDescriptor, TypeTag};

/// Immutable tag → descriptor table.
#[derive(Debug)]
pub struct TypeTable {
    /// Descriptors indexed by [`TypeTag::ordinal`].
    descriptors: Vec<TypeDescriptor>,
    /// Tags ordered by SQL type code, then declaration order.
    sorted: Vec<TypeTag>,
    /// SQL type code → tags, in declaration order.
    by_sql_type: BTreeMap<i16, Vec<TypeTag>>,
}

impl TypeTable {
    fn build() -> Self {
        let descriptors: Vec<TypeDescriptor> =
            TypeTag::ALL.iter().map(|tag| TypeDescriptor::describe(*tag)).collect();

        let mut sorted = TypeTag::ALL.to_vec();
        // stable sort keeps declaration order for equal codes
        sorted.sort_by_key(|tag| descriptors[tag.ordinal()].sql_type);

        let mut by_sql_type: BTreeMap<i16, Vec<TypeTag>> = BTreeMap::new();
        for tag in TypeTag::ALL {
            by_sql_type
                .entry(descriptors[tag.ordinal()].sql_type)
                .or_default()
                .push(tag);
        }

        tracing::trace!(types = descriptors.len(), "type table initialized");

        Self {
            descriptors,
            sorted,
            by_sql_type,
        }
    }

    /// Descriptor of a tag.
    pub fn get(&self, tag: TypeTag) -> &TypeDescriptor {
        &self.descriptors[tag.ordinal()]
    }

    /// Tags in SQLGetTypeInfo order.
    pub fn sorted_tags(&self) -> &[TypeTag] {
        &self.sorted
    }

    /// Tags reported for a SQL type code, in declaration order.
    pub fn tags_for(&self, sql_type: i16) -> &[TypeTag] {
        self.by_sql_type
            .get(&sql_type)
            .map_or(&[], |tags| tags.as_slice())
    }
}

static TYPE_TABLE: OnceLock<TypeTable> = OnceLock::new();

/// The process-wide type table.
pub fn type_table() -> &'static TypeTable {
    TYPE_TABLE.get_or_init(TypeTable::build)
}

/// Resolve a tag to its descriptor. Total over [`TypeTag`].
pub fn resolve(tag: TypeTag) -> &'static TypeDescriptor {
    type_table().get(tag)
}

/// All descriptors, ordered by SQL type code then declaration order.
pub fn list_all_types() -> impl Iterator<Item = &'static TypeDescriptor> + Clone {
    let table = type_table();
    table.sorted_tags().iter().map(move |tag| table.get(*tag))
}

/// Descriptors matching a SQLGetTypeInfo filter.
///
/// `SQL_ALL_TYPES` selects everything; a code no tag maps to selects
/// nothing.
pub fn types_for(sql_type: i16) -> impl Iterator<Item = &'static TypeDescriptor> + Clone {
    let table = type_table();
    let tags = if sql_type == SQL_ALL_TYPES {
        table.sorted_tags()
    } else {
        table.tags_for(sql_type)
    };
    tags.iter().map(move |tag| table.get(*tag))
}

/// Lazily produce SQLGetTypeInfo rows for a filter.
pub fn type_info_rows(
    sql_type: i16,
    limits: Limits,
) -> impl Iterator<Item = CatalogRow> + Send + 'static {
    let columns = schemas::type_info_columns();
    types_for(sql_type).map(move |desc| type_info_row(desc, &limits, columns.clone()))
}

/// Build one SQLGetTypeInfo row.
pub fn type_info_row(
    desc: &TypeDescriptor,
    limits: &Limits,
    columns: Arc<[ColumnMeta]>,
) -> CatalogRow {
    let column_size = if desc.tag == TypeTag::Decimal {
        i64::from(MAX_DECIMAL_PRECISION)
    } else {
        attributes::resolve_type(desc, &SizeHint::none(), limits).column_size
    };
    // UNSIGNED_ATTRIBUTE and AUTO_UNIQUE_VALUE are NULL for non-numeric types
    let numeric = desc.num_prec_radix.is_some();
    let flag = |value: bool| i16::from(value);

    let values = vec![
        CellValue::from(desc.type_name),
        CellValue::from(desc.sql_type),
        CellValue::Int(column_size),
        CellValue::str_or_null(desc.literal_prefix),
        CellValue::str_or_null(desc.literal_suffix),
        CellValue::str_or_null(desc.create_params),
        CellValue::from(desc.nullable),
        CellValue::from(flag(desc.case_sensitive)),
        CellValue::from(desc.searchable),
        CellValue::int_or_null(numeric.then(|| flag(desc.unsigned))),
        CellValue::from(flag(false)),
        CellValue::int_or_null(numeric.then(|| flag(desc.auto_unique))),
        CellValue::from(desc.type_name),
        CellValue::int_or_null(desc.min_scale),
        CellValue::int_or_null(desc.max_scale),
        CellValue::from(desc.verbose_type),
        CellValue::int_or_null(desc.datetime_sub),
        CellValue::int_or_null(desc.num_prec_radix),
        CellValue::Null,
    ];
    CatalogRow::new(values, columns)
}
