//! SQL type identity of each internal type tag.
//!
//! `describe` is an exhaustive `match` over [`TypeTag`], so adding a tag
//! without a SQL mapping fails to compile.

use super::type_tag::TypeTag;
use crate::odbc::constants::*;

/// SQL catalog attributes of one internal type tag.
///
/// Immutable; the process-wide table of descriptors lives in
/// [`crate::catalog::type_info`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Internal tag this descriptor belongs to.
    pub tag: TypeTag,
    /// Data-source type name reported as TYPE_NAME.
    pub type_name: &'static str,
    /// Concise SQL type code (DATA_TYPE).
    pub sql_type: i16,
    /// Verbose SQL type code (SQL_DATA_TYPE).
    pub verbose_type: i16,
    /// Datetime subcode for temporal types.
    pub datetime_sub: Option<i16>,
    /// NULLABLE column of SQLGetTypeInfo.
    pub nullable: i16,
    pub unsigned: bool,
    pub auto_unique: bool,
    pub case_sensitive: bool,
    /// One of the `SQL_PRED_*` / `SQL_SEARCHABLE` levels.
    pub searchable: i16,
    /// Fixed column size; `None` for variable length and decimal types.
    pub column_size: Option<i64>,
    /// Fixed transfer octet length; `None` when it depends on the column.
    pub octet_length: Option<i64>,
    /// Fixed display size; `None` when it depends on the column.
    pub display_size: Option<i64>,
    /// Default decimal digits (scale).
    pub decimal_digits: Option<i16>,
    pub min_scale: Option<i16>,
    pub max_scale: Option<i16>,
    pub num_prec_radix: Option<i16>,
    pub literal_prefix: Option<&'static str>,
    pub literal_suffix: Option<&'static str>,
    pub create_params: Option<&'static str>,
    /// Whether every value of the type occupies the same number of bytes.
    pub fixed_width: bool,
}

impl TypeDescriptor {
    const fn base(tag: TypeTag, type_name: &'static str, sql_type: i16) -> Self {
        Self {
            tag,
            type_name,
            sql_type,
            verbose_type: sql_type,
            datetime_sub: None,
            nullable: SQL_NULLABLE,
            unsigned: false,
            auto_unique: false,
            case_sensitive: false,
            searchable: SQL_PRED_BASIC,
            column_size: None,
            octet_length: None,
            display_size: None,
            decimal_digits: None,
            min_scale: None,
            max_scale: None,
            num_prec_radix: None,
            literal_prefix: None,
            literal_suffix: None,
            create_params: None,
            fixed_width: false,
        }
    }

    const fn integer(
        tag: TypeTag,
        type_name: &'static str,
        sql_type: i16,
        digits: i64,
        bytes: i64,
    ) -> Self {
        let mut d = Self::base(tag, type_name, sql_type);
        d.column_size = Some(digits);
        d.octet_length = Some(bytes);
        // one extra character for the sign
        d.display_size = Some(digits + 1);
        d.decimal_digits = Some(0);
        d.min_scale = Some(0);
        d.max_scale = Some(0);
        d.num_prec_radix = Some(10);
        d.fixed_width = true;
        d
    }

    const fn floating(
        tag: TypeTag,
        type_name: &'static str,
        sql_type: i16,
        digits: i64,
        bytes: i64,
        display: i64,
    ) -> Self {
        let mut d = Self::base(tag, type_name, sql_type);
        d.column_size = Some(digits);
        d.octet_length = Some(bytes);
        d.display_size = Some(display);
        d.decimal_digits = Some(0);
        d.num_prec_radix = Some(10);
        d.fixed_width = true;
        d
    }

    const fn temporal(
        tag: TypeTag,
        type_name: &'static str,
        sql_type: i16,
        sub: i16,
        size: i64,
        bytes: i64,
        scale: i16,
    ) -> Self {
        let mut d = Self::base(tag, type_name, sql_type);
        d.verbose_type = SQL_DATETIME;
        d.datetime_sub = Some(sub);
        d.column_size = Some(size);
        d.octet_length = Some(bytes);
        d.display_size = Some(size);
        d.decimal_digits = Some(scale);
        d.min_scale = Some(0);
        d.max_scale = Some(scale);
        d.literal_prefix = Some("'");
        d.literal_suffix = Some("'");
        d.fixed_width = true;
        d
    }

    const fn opaque(tag: TypeTag, type_name: &'static str) -> Self {
        let mut d = Self::base(tag, type_name, SQL_VARBINARY);
        d.searchable = SQL_PRED_NONE;
        d
    }

    /// Build the descriptor for a tag.
    pub const fn describe(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Int8 => Self::integer(tag, "TINYINT", SQL_TINYINT, 3, 1),
            TypeTag::Int16 => Self::integer(tag, "SMALLINT", SQL_SMALLINT, 5, 2),
            TypeTag::Int32 => Self::integer(tag, "INTEGER", SQL_INTEGER, 10, 4),
            TypeTag::Int64 => Self::integer(tag, "BIGINT", SQL_BIGINT, 19, 8),
            TypeTag::Float32 => Self::floating(tag, "REAL", SQL_REAL, 7, 4, 14),
            TypeTag::Float64 => Self::floating(tag, "DOUBLE", SQL_DOUBLE, 15, 8, 24),
            TypeTag::Bool => {
                let mut d = Self::base(tag, "BOOLEAN", SQL_BIT);
                d.column_size = Some(1);
                d.octet_length = Some(1);
                d.display_size = Some(1);
                d.fixed_width = true;
                d
            }
            TypeTag::Decimal => {
                let mut d = Self::base(tag, "DECIMAL", SQL_DECIMAL);
                d.min_scale = Some(0);
                d.max_scale = Some(MAX_DECIMAL_PRECISION as i16);
                d.num_prec_radix = Some(10);
                d.create_params = Some("precision,scale");
                d
            }
            TypeTag::String => {
                let mut d = Self::base(tag, "VARCHAR", SQL_VARCHAR);
                d.case_sensitive = true;
                d.searchable = SQL_SEARCHABLE;
                d.literal_prefix = Some("'");
                d.literal_suffix = Some("'");
                d.create_params = Some("length");
                d
            }
            TypeTag::Binary => {
                let mut d = Self::base(tag, "VARBINARY", SQL_VARBINARY);
                d.literal_prefix = Some("X'");
                d.literal_suffix = Some("'");
                d.create_params = Some("length");
                d
            }
            TypeTag::Date => Self::temporal(tag, "DATE", SQL_TYPE_DATE, SQL_CODE_DATE, 10, 6, 0),
            TypeTag::Time => Self::temporal(tag, "TIME", SQL_TYPE_TIME, SQL_CODE_TIME, 8, 6, 0),
            TypeTag::Timestamp => Self::temporal(
                tag,
                "TIMESTAMP",
                SQL_TYPE_TIMESTAMP,
                SQL_CODE_TIMESTAMP,
                // yyyy-mm-dd hh:mm:ss.fffffffff
                20 + TIMESTAMP_FRACTION_DIGITS as i64,
                16,
                TIMESTAMP_FRACTION_DIGITS,
            ),
            TypeTag::Guid => {
                let mut d = Self::base(tag, "UUID", SQL_GUID);
                d.column_size = Some(36);
                d.octet_length = Some(16);
                d.display_size = Some(36);
                d.literal_prefix = Some("'");
                d.literal_suffix = Some("'");
                d.fixed_width = true;
                d
            }
            TypeTag::Object => Self::opaque(tag, "OBJECT"),
            TypeTag::Array => Self::opaque(tag, "ARRAY"),
            TypeTag::Map => Self::opaque(tag, "MAP"),
        }
    }

    /// Whether the type is one of the character types.
    pub fn is_character(&self) -> bool {
        matches!(self.sql_type, SQL_CHAR | SQL_VARCHAR | SQL_LONGVARCHAR)
    }

    /// Whether the type is one of the binary types.
    pub fn is_binary(&self) -> bool {
        matches!(self.sql_type, SQL_BINARY | SQL_VARBINARY | SQL_LONGVARBINARY)
    }

    /// Whether the type is numeric, i.e. carries a precision radix.
    pub fn is_numeric(&self) -> bool {
        self.num_prec_radix.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_descriptor() {
        let d = TypeDescriptor::describe(TypeTag::Int32);
        assert_eq!(d.sql_type, SQL_INTEGER);
        assert_eq!(d.type_name, "INTEGER");
        assert_eq!(d.column_size, Some(10));
        assert_eq!(d.octet_length, Some(4));
        assert_eq!(d.display_size, Some(11));
        assert_eq!(d.num_prec_radix, Some(10));
        assert!(d.fixed_width);
    }

    #[test]
    fn test_temporal_descriptor() {
        let d = TypeDescriptor::describe(TypeTag::Timestamp);
        assert_eq!(d.sql_type, SQL_TYPE_TIMESTAMP);
        assert_eq!(d.verbose_type, SQL_DATETIME);
        assert_eq!(d.datetime_sub, Some(SQL_CODE_TIMESTAMP));
        assert_eq!(d.column_size, Some(29));
        assert_eq!(d.decimal_digits, Some(9));
    }

    #[test]
    fn test_composites_are_opaque_binary() {
        for tag in [TypeTag::Object, TypeTag::Array, TypeTag::Map] {
            let d = TypeDescriptor::describe(tag);
            assert_eq!(d.sql_type, SQL_VARBINARY);
            assert_eq!(d.searchable, SQL_PRED_NONE);
            assert!(d.is_binary());
        }
    }

    #[test]
    fn test_string_descriptor() {
        let d = TypeDescriptor::describe(TypeTag::String);
        assert!(d.is_character());
        assert!(d.case_sensitive);
        assert_eq!(d.column_size, None);
        assert_eq!(d.literal_prefix, Some("'"));
        assert!(!d.is_numeric());
    }

    #[test]
    fn test_numeric_types() {
        let numeric: Vec<TypeTag> = TypeTag::ALL
            .into_iter()
            .filter(|tag| TypeDescriptor::describe(*tag).is_numeric())
            .collect();
        assert_eq!(
            numeric,
            vec![
                TypeTag::Int8,
                TypeTag::Int16,
                TypeTag::Int32,
                TypeTag::Int64,
                TypeTag::Float32,
                TypeTag::Float64,
                TypeTag::Decimal,
            ]
        );
    }

    #[test]
    fn test_every_tag_describes_itself() {
        for tag in TypeTag::ALL {
            assert_eq!(TypeDescriptor::describe(tag).tag, tag);
        }
    }
}
