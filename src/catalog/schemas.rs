//! Fixed result-set schemas of the ODBC catalog functions.
//!
//! Column names, order and types follow the ODBC 3.x reference for
//! SQLGetTypeInfo, SQLColumns and SQLTables.

use std::sync::{Arc, OnceLock};

use crate::odbc::constants::{SQL_NO_NULLS, SQL_NULLABLE};
use crate::odbc::types::{ColumnMeta, SizeHint, TypeTag};

/// Declared length of identifier and name columns.
const NAME_LENGTH: u32 = 128;

/// 1-based positions of the SQLGetTypeInfo columns.
pub mod type_info_ordinals {
    pub const TYPE_NAME: u16 = 1;
    pub const DATA_TYPE: u16 = 2;
    pub const COLUMN_SIZE: u16 = 3;
    pub const NULLABLE: u16 = 7;
    pub const SEARCHABLE: u16 = 9;
    pub const SQL_DATA_TYPE: u16 = 16;
    pub const NUM_PREC_RADIX: u16 = 18;
}

/// 1-based positions of the SQLColumns columns.
pub mod column_ordinals {
    pub const TABLE_NAME: u16 = 3;
    pub const COLUMN_NAME: u16 = 4;
    pub const DATA_TYPE: u16 = 5;
    pub const COLUMN_SIZE: u16 = 7;
    pub const DECIMAL_DIGITS: u16 = 9;
    pub const NULLABLE: u16 = 11;
    pub const ORDINAL_POSITION: u16 = 17;
    pub const IS_NULLABLE: u16 = 18;
}

static TYPE_INFO: OnceLock<Arc<[ColumnMeta]>> = OnceLock::new();
static COLUMNS: OnceLock<Arc<[ColumnMeta]>> = OnceLock::new();
static TABLES: OnceLock<Arc<[ColumnMeta]>> = OnceLock::new();

/// Column definition: name, tag, NOT NULL.
type Def = (&'static str, TypeTag, bool);

fn build(defs: &[Def]) -> Arc<[ColumnMeta]> {
    (1u16..)
        .zip(defs)
        .map(|(ordinal, (name, tag, not_null))| {
            let mut col = ColumnMeta::new(ordinal, *name, *tag)
                .with_nullable(if *not_null { SQL_NO_NULLS } else { SQL_NULLABLE });
            if *tag == TypeTag::String {
                col = col.with_size(SizeHint::length(NAME_LENGTH));
            }
            col
        })
        .collect()
}

/// The 19 columns of SQLGetTypeInfo.
pub fn type_info_columns() -> Arc<[ColumnMeta]> {
    TYPE_INFO
        .get_or_init(|| {
            build(&[
                ("TYPE_NAME", TypeTag::String, true),
                ("DATA_TYPE", TypeTag::Int16, true),
                ("COLUMN_SIZE", TypeTag::Int32, false),
                ("LITERAL_PREFIX", TypeTag::String, false),
                ("LITERAL_SUFFIX", TypeTag::String, false),
                ("CREATE_PARAMS", TypeTag::String, false),
                ("NULLABLE", TypeTag::Int16, true),
                ("CASE_SENSITIVE", TypeTag::Int16, true),
                ("SEARCHABLE", TypeTag::Int16, true),
                ("UNSIGNED_ATTRIBUTE", TypeTag::Int16, false),
                ("FIXED_PREC_SCALE", TypeTag::Int16, true),
                ("AUTO_UNIQUE_VALUE", TypeTag::Int16, false),
                ("LOCAL_TYPE_NAME", TypeTag::String, false),
                ("MINIMUM_SCALE", TypeTag::Int16, false),
                ("MAXIMUM_SCALE", TypeTag::Int16, false),
                ("SQL_DATA_TYPE", TypeTag::Int16, true),
                ("SQL_DATETIME_SUB", TypeTag::Int16, false),
                ("NUM_PREC_RADIX", TypeTag::Int32, false),
                ("INTERVAL_PRECISION", TypeTag::Int16, false),
            ])
        })
        .clone()
}

/// The 18 columns of SQLColumns.
pub fn columns_columns() -> Arc<[ColumnMeta]> {
    COLUMNS
        .get_or_init(|| {
            build(&[
                ("TABLE_CAT", TypeTag::String, false),
                ("TABLE_SCHEM", TypeTag::String, false),
                ("TABLE_NAME", TypeTag::String, true),
                ("COLUMN_NAME", TypeTag::String, true),
                ("DATA_TYPE", TypeTag::Int16, true),
                ("TYPE_NAME", TypeTag::String, true),
                ("COLUMN_SIZE", TypeTag::Int32, false),
                ("BUFFER_LENGTH", TypeTag::Int32, false),
                ("DECIMAL_DIGITS", TypeTag::Int16, false),
                ("NUM_PREC_RADIX", TypeTag::Int16, false),
                ("NULLABLE", TypeTag::Int16, true),
                ("REMARKS", TypeTag::String, false),
                ("COLUMN_DEF", TypeTag::String, false),
                ("SQL_DATA_TYPE", TypeTag::Int16, true),
                ("SQL_DATETIME_SUB", TypeTag::Int16, false),
                ("CHAR_OCTET_LENGTH", TypeTag::Int32, false),
                ("ORDINAL_POSITION", TypeTag::Int32, true),
                ("IS_NULLABLE", TypeTag::String, false),
            ])
        })
        .clone()
}

/// The 5 columns of SQLTables.
pub fn tables_columns() -> Arc<[ColumnMeta]> {
    TABLES
        .get_or_init(|| {
            build(&[
                ("TABLE_CAT", TypeTag::String, false),
                ("TABLE_SCHEM", TypeTag::String, false),
                ("TABLE_NAME", TypeTag::String, false),
                ("TABLE_TYPE", TypeTag::String, false),
                ("REMARKS", TypeTag::String, false),
            ])
        })
        .clone()
}
