//! ODBC constants used by the catalog layer.
//!
//! Values match `sql.h` / `sqlext.h` from the ODBC 3.8 SDK.

// Concise SQL data types
pub const SQL_UNKNOWN_TYPE: i16 = 0;
pub const SQL_CHAR: i16 = 1;
pub const SQL_NUMERIC: i16 = 2;
pub const SQL_DECIMAL: i16 = 3;
pub const SQL_INTEGER: i16 = 4;
pub const SQL_SMALLINT: i16 = 5;
pub const SQL_FLOAT: i16 = 6;
pub const SQL_REAL: i16 = 7;
pub const SQL_DOUBLE: i16 = 8;
pub const SQL_DATETIME: i16 = 9;
pub const SQL_VARCHAR: i16 = 12;
pub const SQL_TYPE_DATE: i16 = 91;
pub const SQL_TYPE_TIME: i16 = 92;
pub const SQL_TYPE_TIMESTAMP: i16 = 93;
pub const SQL_LONGVARCHAR: i16 = -1;
pub const SQL_BINARY: i16 = -2;
pub const SQL_VARBINARY: i16 = -3;
pub const SQL_LONGVARBINARY: i16 = -4;
pub const SQL_BIGINT: i16 = -5;
pub const SQL_TINYINT: i16 = -6;
pub const SQL_BIT: i16 = -7;
pub const SQL_WCHAR: i16 = -8;
pub const SQL_WVARCHAR: i16 = -9;
pub const SQL_GUID: i16 = -11;

/// Wildcard accepted by SQLGetTypeInfo.
pub const SQL_ALL_TYPES: i16 = 0;

// Datetime subcodes (SQL_DATETIME_SUB)
pub const SQL_CODE_DATE: i16 = 1;
pub const SQL_CODE_TIME: i16 = 2;
pub const SQL_CODE_TIMESTAMP: i16 = 3;

// C data types
pub const SQL_C_CHAR: i16 = SQL_CHAR;
pub const SQL_C_WCHAR: i16 = SQL_WCHAR;
pub const SQL_C_SSHORT: i16 = -15;
pub const SQL_C_SLONG: i16 = -16;
pub const SQL_C_SBIGINT: i16 = -25;
pub const SQL_C_DEFAULT: i16 = 99;

// Length / indicator sentinels
pub const SQL_NULL_DATA: i64 = -1;
pub const SQL_NO_TOTAL: i64 = -4;

// Nullability
pub const SQL_NO_NULLS: i16 = 0;
pub const SQL_NULLABLE: i16 = 1;
pub const SQL_NULLABLE_UNKNOWN: i16 = 2;

// Searchability
pub const SQL_PRED_NONE: i16 = 0;
pub const SQL_PRED_CHAR: i16 = 1;
pub const SQL_PRED_BASIC: i16 = 2;
pub const SQL_SEARCHABLE: i16 = 3;

pub const SQL_TRUE: i16 = 1;
pub const SQL_FALSE: i16 = 0;

// SQLColAttribute field identifiers, ODBC 2.x names
pub const SQL_COLUMN_COUNT: u16 = 0;
pub const SQL_COLUMN_NAME: u16 = 1;
pub const SQL_COLUMN_TYPE: u16 = 2;
pub const SQL_COLUMN_LENGTH: u16 = 3;
pub const SQL_COLUMN_PRECISION: u16 = 4;
pub const SQL_COLUMN_SCALE: u16 = 5;
pub const SQL_COLUMN_DISPLAY_SIZE: u16 = 6;
pub const SQL_COLUMN_NULLABLE: u16 = 7;
pub const SQL_COLUMN_UNSIGNED: u16 = 8;
pub const SQL_COLUMN_MONEY: u16 = 9;
pub const SQL_COLUMN_UPDATABLE: u16 = 10;
pub const SQL_COLUMN_AUTO_INCREMENT: u16 = 11;
pub const SQL_COLUMN_CASE_SENSITIVE: u16 = 12;
pub const SQL_COLUMN_SEARCHABLE: u16 = 13;
pub const SQL_COLUMN_TYPE_NAME: u16 = 14;
pub const SQL_COLUMN_TABLE_NAME: u16 = 15;
pub const SQL_COLUMN_OWNER_NAME: u16 = 16;
pub const SQL_COLUMN_QUALIFIER_NAME: u16 = 17;
pub const SQL_COLUMN_LABEL: u16 = 18;

// SQLColAttribute field identifiers, ODBC 3.x names
pub const SQL_DESC_CONCISE_TYPE: u16 = SQL_COLUMN_TYPE;
pub const SQL_DESC_DISPLAY_SIZE: u16 = SQL_COLUMN_DISPLAY_SIZE;
pub const SQL_DESC_UNSIGNED: u16 = SQL_COLUMN_UNSIGNED;
pub const SQL_DESC_FIXED_PREC_SCALE: u16 = SQL_COLUMN_MONEY;
pub const SQL_DESC_UPDATABLE: u16 = SQL_COLUMN_UPDATABLE;
pub const SQL_DESC_AUTO_UNIQUE_VALUE: u16 = SQL_COLUMN_AUTO_INCREMENT;
pub const SQL_DESC_CASE_SENSITIVE: u16 = SQL_COLUMN_CASE_SENSITIVE;
pub const SQL_DESC_SEARCHABLE: u16 = SQL_COLUMN_SEARCHABLE;
pub const SQL_DESC_TYPE_NAME: u16 = SQL_COLUMN_TYPE_NAME;
pub const SQL_DESC_TABLE_NAME: u16 = SQL_COLUMN_TABLE_NAME;
pub const SQL_DESC_SCHEMA_NAME: u16 = SQL_COLUMN_OWNER_NAME;
pub const SQL_DESC_CATALOG_NAME: u16 = SQL_COLUMN_QUALIFIER_NAME;
pub const SQL_DESC_LABEL: u16 = SQL_COLUMN_LABEL;
pub const SQL_DESC_BASE_COLUMN_NAME: u16 = 22;
pub const SQL_DESC_BASE_TABLE_NAME: u16 = 23;
pub const SQL_DESC_LITERAL_PREFIX: u16 = 27;
pub const SQL_DESC_LITERAL_SUFFIX: u16 = 28;
pub const SQL_DESC_LOCAL_TYPE_NAME: u16 = 29;
pub const SQL_DESC_NUM_PREC_RADIX: u16 = 32;
pub const SQL_DESC_COUNT: u16 = 1001;
pub const SQL_DESC_TYPE: u16 = 1002;
pub const SQL_DESC_LENGTH: u16 = 1003;
pub const SQL_DESC_PRECISION: u16 = 1005;
pub const SQL_DESC_SCALE: u16 = 1006;
pub const SQL_DESC_NULLABLE: u16 = 1008;
pub const SQL_DESC_NAME: u16 = 1011;
pub const SQL_DESC_UNNAMED: u16 = 1012;
pub const SQL_DESC_OCTET_LENGTH: u16 = 1013;

pub const SQL_NAMED: i16 = 0;
pub const SQL_ATTR_READONLY: i16 = 0;

// Ignite binary object type identifiers
pub const BINARY_TYPE_BYTE: u8 = 1;
pub const BINARY_TYPE_SHORT: u8 = 2;
pub const BINARY_TYPE_INT: u8 = 3;
pub const BINARY_TYPE_LONG: u8 = 4;
pub const BINARY_TYPE_FLOAT: u8 = 5;
pub const BINARY_TYPE_DOUBLE: u8 = 6;
pub const BINARY_TYPE_BOOL: u8 = 8;
pub const BINARY_TYPE_STRING: u8 = 9;
pub const BINARY_TYPE_UUID: u8 = 10;
pub const BINARY_TYPE_DATE: u8 = 11;
pub const BINARY_TYPE_ARR_BYTE: u8 = 12;
pub const BINARY_TYPE_ARR_OBJECT: u8 = 23;
pub const BINARY_TYPE_COLLECTION: u8 = 24;
pub const BINARY_TYPE_MAP: u8 = 25;
pub const BINARY_TYPE_BINARY_OBJECT: u8 = 27;
pub const BINARY_TYPE_DECIMAL: u8 = 30;
pub const BINARY_TYPE_TIMESTAMP: u8 = 33;
pub const BINARY_TYPE_TIME: u8 = 36;
pub const BINARY_TYPE_OBJECT: u8 = 103;

/// Largest length a column can report (signed 32-bit `SQLINTEGER` range).
pub const MAX_REPRESENTABLE_LENGTH: i64 = i32::MAX as i64;

/// Default length limit for variable-length string and binary columns.
pub const DEFAULT_MAX_VARLEN: u32 = 65535;

/// Default DECIMAL precision and scale when the schema declares none.
pub const DEFAULT_DECIMAL_PRECISION: u16 = 38;
pub const DEFAULT_DECIMAL_SCALE: i16 = 18;

/// Largest DECIMAL precision the cache accepts.
pub const MAX_DECIMAL_PRECISION: u16 = 38;

/// Fractional-second digits carried by TIMESTAMP values (nanoseconds).
pub const TIMESTAMP_FRACTION_DIGITS: i16 = 9;
