//! Column attribute resolution.
//!
//! Derives length, display size, precision and scale of a column purely from
//! its type tag and declared size. Nothing here touches the network.
//!
//! | Family | length / octets | display | precision | scale |
//! |--------|-----------------|---------|-----------|-------|
//! | integer, float, bool | fixed per tag | fixed per tag | decimal digits | 0 |
//! | decimal | p + 2 | p + 2 | p | s |
//! | string | declared or limit | same | [`NO_PRECISION`] | 0 |
//! | binary | declared or limit | 2 × length | [`NO_PRECISION`] | 0 |
//! | date / time / timestamp | fixed per tag | fixed per tag | column size | fraction digits |
//! | object / array / map | [`MAX_REPRESENTABLE_LENGTH`] | same | [`NO_PRECISION`] | 0 |

use crate::error::{Error, Result};
use crate::odbc::constants::*;
use crate::odbc::types::{ColumnMeta, SizeHint, TypeDescriptor, TypeTag};

/// Precision reported for types without numeric precision.
pub const NO_PRECISION: i64 = SQL_NO_TOTAL;

/// Length limits applied when a column declares no size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum string length; `None` means unbounded.
    pub max_string_length: Option<u32>,
    /// Maximum binary length; `None` means unbounded.
    pub max_binary_length: Option<u32>,
    /// DECIMAL precision when none is declared.
    pub decimal_precision: u16,
    /// DECIMAL scale when none is declared.
    pub decimal_scale: i16,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_string_length: Some(DEFAULT_MAX_VARLEN),
            max_binary_length: Some(DEFAULT_MAX_VARLEN),
            decimal_precision: DEFAULT_DECIMAL_PRECISION,
            decimal_scale: DEFAULT_DECIMAL_SCALE,
        }
    }
}

/// Derived numeric attributes of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnAttributes {
    /// COLUMN_SIZE: digits for numerics, characters for strings.
    pub column_size: i64,
    /// Transfer octet length in bytes.
    pub byte_length: i64,
    pub display_size: i64,
    pub precision: i64,
    pub scale: i64,
}

/// Resolve the attributes of a column.
pub fn resolve(column: &ColumnMeta, limits: &Limits) -> ColumnAttributes {
    resolve_type(column.descriptor, &column.size, limits)
}

/// Resolve the attributes of a type with a declared size.
pub fn resolve_type(desc: &TypeDescriptor, size: &SizeHint, limits: &Limits) -> ColumnAttributes {
    let tag = desc.tag;
    if tag.is_fixed_numeric() || tag.is_temporal() || tag == TypeTag::Guid {
        return fixed(desc);
    }

    match tag {
        TypeTag::Decimal => {
            let (precision, scale) = decimal_params(size, limits);
            let digits = i64::from(precision);
            ColumnAttributes {
                column_size: digits,
                // sign and decimal point
                byte_length: digits + 2,
                display_size: digits + 2,
                precision: digits,
                scale: i64::from(scale),
            }
        }
        TypeTag::String => {
            let length = variable_length(size.length, limits.max_string_length);
            ColumnAttributes {
                column_size: length,
                byte_length: length,
                display_size: length,
                precision: NO_PRECISION,
                scale: 0,
            }
        }
        TypeTag::Binary => {
            let length = variable_length(size.length, limits.max_binary_length);
            ColumnAttributes {
                column_size: length,
                byte_length: length,
                display_size: hex_display_size(length),
                precision: NO_PRECISION,
                scale: 0,
            }
        }
        _ => ColumnAttributes {
            column_size: MAX_REPRESENTABLE_LENGTH,
            byte_length: MAX_REPRESENTABLE_LENGTH,
            display_size: MAX_REPRESENTABLE_LENGTH,
            precision: NO_PRECISION,
            scale: 0,
        },
    }
}

fn fixed(desc: &TypeDescriptor) -> ColumnAttributes {
    let column_size = desc.column_size.unwrap_or(NO_PRECISION);
    ColumnAttributes {
        column_size,
        byte_length: desc.octet_length.unwrap_or(SQL_NO_TOTAL),
        display_size: desc.display_size.unwrap_or(SQL_NO_TOTAL),
        precision: column_size,
        scale: desc.decimal_digits.map_or(0, i64::from),
    }
}

/// Precision and scale of a DECIMAL column.
///
/// A declared precision without a scale means scale 0. The scale never
/// exceeds the precision.
fn decimal_params(size: &SizeHint, limits: &Limits) -> (u16, i16) {
    let (precision, scale) = match (size.precision, size.scale) {
        (Some(p), s) => (p, s.unwrap_or(0)),
        (None, Some(s)) => (limits.decimal_precision, s),
        (None, None) => (limits.decimal_precision, limits.decimal_scale),
    };
    let precision = precision.clamp(1, MAX_DECIMAL_PRECISION);
    let scale = scale.clamp(0, precision as i16);
    (precision, scale)
}

fn variable_length(declared: Option<u32>, limit: Option<u32>) -> i64 {
    match declared.or(limit) {
        Some(length) => i64::from(length).min(MAX_REPRESENTABLE_LENGTH),
        None => SQL_NO_TOTAL,
    }
}

fn hex_display_size(length: i64) -> i64 {
    if length < 0 {
        length
    } else {
        length.saturating_mul(2).min(MAX_REPRESENTABLE_LENGTH)
    }
}

/// SQLColAttribute field identifiers understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAttribute {
    Count,
    Name,
    Label,
    BaseColumnName,
    Unnamed,
    ConciseType,
    VerboseType,
    TypeName,
    LocalTypeName,
    /// `SQL_COLUMN_LENGTH`: transfer octet length.
    Length,
    /// `SQL_DESC_LENGTH`: character or digit count.
    DescLength,
    OctetLength,
    /// `SQL_COLUMN_PRECISION`: column size for every type.
    Precision,
    /// `SQL_DESC_PRECISION`: fractional-second digits for datetime types.
    DescPrecision,
    Scale,
    DisplaySize,
    Nullable,
    Unsigned,
    Searchable,
    CaseSensitive,
    AutoUnique,
    FixedPrecScale,
    Updatable,
    TableName,
    BaseTableName,
    SchemaName,
    CatalogName,
    NumPrecRadix,
    LiteralPrefix,
    LiteralSuffix,
}

impl ColumnAttribute {
    /// Decode a raw field identifier, ODBC 2.x or 3.x.
    pub fn from_raw(field: u16) -> Result<Self> {
        let attr = match field {
            SQL_COLUMN_COUNT | SQL_DESC_COUNT => ColumnAttribute::Count,
            SQL_COLUMN_NAME | SQL_DESC_NAME => ColumnAttribute::Name,
            SQL_DESC_LABEL => ColumnAttribute::Label,
            SQL_DESC_BASE_COLUMN_NAME => ColumnAttribute::BaseColumnName,
            SQL_DESC_UNNAMED => ColumnAttribute::Unnamed,
            SQL_DESC_CONCISE_TYPE => ColumnAttribute::ConciseType,
            SQL_DESC_TYPE => ColumnAttribute::VerboseType,
            SQL_DESC_TYPE_NAME => ColumnAttribute::TypeName,
            SQL_DESC_LOCAL_TYPE_NAME => ColumnAttribute::LocalTypeName,
            SQL_COLUMN_LENGTH => ColumnAttribute::Length,
            SQL_DESC_LENGTH => ColumnAttribute::DescLength,
            SQL_DESC_OCTET_LENGTH => ColumnAttribute::OctetLength,
            SQL_COLUMN_PRECISION => ColumnAttribute::Precision,
            SQL_DESC_PRECISION => ColumnAttribute::DescPrecision,
            SQL_COLUMN_SCALE | SQL_DESC_SCALE => ColumnAttribute::Scale,
            SQL_DESC_DISPLAY_SIZE => ColumnAttribute::DisplaySize,
            SQL_COLUMN_NULLABLE | SQL_DESC_NULLABLE => ColumnAttribute::Nullable,
            SQL_DESC_UNSIGNED => ColumnAttribute::Unsigned,
            SQL_DESC_SEARCHABLE => ColumnAttribute::Searchable,
            SQL_DESC_CASE_SENSITIVE => ColumnAttribute::CaseSensitive,
            SQL_DESC_AUTO_UNIQUE_VALUE => ColumnAttribute::AutoUnique,
            SQL_DESC_FIXED_PREC_SCALE => ColumnAttribute::FixedPrecScale,
            SQL_DESC_UPDATABLE => ColumnAttribute::Updatable,
            SQL_DESC_TABLE_NAME => ColumnAttribute::TableName,
            SQL_DESC_BASE_TABLE_NAME => ColumnAttribute::BaseTableName,
            SQL_DESC_SCHEMA_NAME => ColumnAttribute::SchemaName,
            SQL_DESC_CATALOG_NAME => ColumnAttribute::CatalogName,
            SQL_DESC_NUM_PREC_RADIX => ColumnAttribute::NumPrecRadix,
            SQL_DESC_LITERAL_PREFIX => ColumnAttribute::LiteralPrefix,
            SQL_DESC_LITERAL_SUFFIX => ColumnAttribute::LiteralSuffix,
            _ => return Err(Error::InvalidAttribute { field }),
        };
        Ok(attr)
    }
}

/// Value of a column attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Int(i64),
    Str(String),
}

impl AttributeValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            AttributeValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            AttributeValue::Int(_) => None,
        }
    }
}

fn flag(value: bool) -> AttributeValue {
    AttributeValue::Int(i64::from(if value { SQL_TRUE } else { SQL_FALSE }))
}

fn text(value: Option<&str>) -> AttributeValue {
    AttributeValue::Str(value.unwrap_or_default().to_string())
}

/// Answer SQLColAttribute for a 1-based ordinal of a result set.
///
/// `Count` ignores the ordinal; every other attribute requires
/// `1 <= ordinal <= columns.len()`.
pub fn column_attribute(
    columns: &[ColumnMeta],
    ordinal: u16,
    attr: ColumnAttribute,
    limits: &Limits,
) -> Result<AttributeValue> {
    if attr == ColumnAttribute::Count {
        return Ok(AttributeValue::Int(columns.len() as i64));
    }

    let column = column_at(columns, ordinal)?;
    let desc = column.descriptor;
    let attrs = resolve(column, limits);

    let value = match attr {
        ColumnAttribute::Count => AttributeValue::Int(columns.len() as i64),
        ColumnAttribute::Name | ColumnAttribute::Label | ColumnAttribute::BaseColumnName => {
            AttributeValue::Str(column.name.clone())
        }
        ColumnAttribute::Unnamed => AttributeValue::Int(i64::from(SQL_NAMED)),
        ColumnAttribute::ConciseType => AttributeValue::Int(i64::from(desc.sql_type)),
        ColumnAttribute::VerboseType => AttributeValue::Int(i64::from(desc.verbose_type)),
        ColumnAttribute::TypeName | ColumnAttribute::LocalTypeName => {
            AttributeValue::Str(desc.type_name.to_string())
        }
        ColumnAttribute::Length | ColumnAttribute::OctetLength => {
            AttributeValue::Int(attrs.byte_length)
        }
        ColumnAttribute::DescLength => AttributeValue::Int(attrs.column_size),
        ColumnAttribute::Precision => AttributeValue::Int(attrs.precision),
        ColumnAttribute::DescPrecision if desc.tag.is_temporal() => {
            AttributeValue::Int(attrs.scale)
        }
        ColumnAttribute::DescPrecision => AttributeValue::Int(attrs.precision),
        ColumnAttribute::Scale => AttributeValue::Int(attrs.scale),
        ColumnAttribute::DisplaySize => AttributeValue::Int(attrs.display_size),
        ColumnAttribute::Nullable => AttributeValue::Int(i64::from(column.nullable)),
        // non-numeric types report unsigned
        ColumnAttribute::Unsigned => flag(desc.unsigned || !desc.is_numeric()),
        ColumnAttribute::Searchable => AttributeValue::Int(i64::from(desc.searchable)),
        ColumnAttribute::CaseSensitive => flag(desc.case_sensitive),
        ColumnAttribute::AutoUnique => flag(desc.auto_unique),
        ColumnAttribute::FixedPrecScale => flag(false),
        ColumnAttribute::Updatable => AttributeValue::Int(i64::from(SQL_ATTR_READONLY)),
        ColumnAttribute::TableName | ColumnAttribute::BaseTableName => {
            AttributeValue::Str(column.table_name.clone())
        }
        ColumnAttribute::SchemaName => AttributeValue::Str(column.schema_name.clone()),
        ColumnAttribute::CatalogName => AttributeValue::Str(String::new()),
        ColumnAttribute::NumPrecRadix => {
            AttributeValue::Int(desc.num_prec_radix.map_or(0, i64::from))
        }
        ColumnAttribute::LiteralPrefix => text(desc.literal_prefix),
        ColumnAttribute::LiteralSuffix => text(desc.literal_suffix),
    };
    Ok(value)
}

/// Look up a column by 1-based ordinal.
pub fn column_at(columns: &[ColumnMeta], ordinal: u16) -> Result<&ColumnMeta> {
    if ordinal == 0 {
        return Err(Error::InvalidColumnIndex {
            index: ordinal,
            count: columns.len(),
        });
    }
    columns
        .get(usize::from(ordinal) - 1)
        .ok_or(Error::InvalidColumnIndex {
            index: ordinal,
            count: columns.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(tag: TypeTag) -> ColumnMeta {
        ColumnMeta::new(1, "c", tag)
    }

    #[test]
    fn test_fixed_numeric_ignores_size_hint() {
        let limits = Limits::default();
        let plain = resolve(&column(TypeTag::Int32), &limits);
        let hinted = resolve(
            &column(TypeTag::Int32).with_size(SizeHint {
                length: Some(99),
                precision: Some(3),
                scale: Some(2),
            }),
            &limits,
        );
        assert_eq!(plain, hinted);
        assert_eq!(plain.byte_length, 4);
        assert_eq!(plain.precision, 10);
        assert_eq!(plain.scale, 0);
    }

    #[test]
    fn test_fixed_numeric_byte_lengths() {
        let limits = Limits::default();
        let expected = [
            (TypeTag::Int8, 1, 3),
            (TypeTag::Int16, 2, 5),
            (TypeTag::Int64, 8, 19),
            (TypeTag::Float32, 4, 7),
            (TypeTag::Float64, 8, 15),
            (TypeTag::Bool, 1, 1),
        ];
        for (tag, bytes, precision) in expected {
            let attrs = resolve(&column(tag), &limits);
            assert_eq!(attrs.byte_length, bytes, "{}", tag);
            assert_eq!(attrs.precision, precision, "{}", tag);
            assert_eq!(attrs.scale, 0, "{}", tag);
        }
    }

    #[test]
    fn test_decimal_defaults() {
        let attrs = resolve(&column(TypeTag::Decimal), &Limits::default());
        assert_eq!(attrs.precision, 38);
        assert_eq!(attrs.scale, 18);
        assert_eq!(attrs.byte_length, 40);
        assert_eq!(attrs.display_size, 40);
    }

    #[test]
    fn test_decimal_declared() {
        let limits = Limits::default();
        let attrs = resolve(
            &column(TypeTag::Decimal).with_size(SizeHint::decimal(10, 2)),
            &limits,
        );
        assert_eq!((attrs.precision, attrs.scale, attrs.byte_length), (10, 2, 12));

        let precision_only = SizeHint {
            precision: Some(5),
            ..SizeHint::default()
        };
        let attrs = resolve(&column(TypeTag::Decimal).with_size(precision_only), &limits);
        assert_eq!((attrs.precision, attrs.scale), (5, 0));

        let attrs = resolve(
            &column(TypeTag::Decimal).with_size(SizeHint::decimal(4, 9)),
            &limits,
        );
        assert_eq!((attrs.precision, attrs.scale), (4, 4));
    }

    #[test]
    fn test_string_without_hint_uses_limit() {
        let limits = Limits::default();
        let attrs = resolve(&column(TypeTag::String), &limits);
        assert_eq!(attrs.byte_length, i64::from(DEFAULT_MAX_VARLEN));
        assert_eq!(attrs.display_size, attrs.byte_length);
        assert_eq!(attrs.column_size, attrs.byte_length);
        assert_eq!(attrs.precision, NO_PRECISION);
        assert_eq!(attrs.scale, 0);
    }

    #[test]
    fn test_string_with_hint_and_unbounded() {
        let attrs = resolve(
            &column(TypeTag::String).with_size(SizeHint::length(20)),
            &Limits::default(),
        );
        assert_eq!(attrs.byte_length, 20);

        let unbounded = Limits {
            max_string_length: None,
            ..Limits::default()
        };
        let attrs = resolve(&column(TypeTag::String), &unbounded);
        assert_eq!(attrs.byte_length, SQL_NO_TOTAL);
        assert_eq!(attrs.display_size, SQL_NO_TOTAL);
    }

    #[test]
    fn test_binary_display_is_hex() {
        let attrs = resolve(
            &column(TypeTag::Binary).with_size(SizeHint::length(16)),
            &Limits::default(),
        );
        assert_eq!(attrs.byte_length, 16);
        assert_eq!(attrs.display_size, 32);
    }

    #[test]
    fn test_temporal_attributes() {
        let limits = Limits::default();
        let date = resolve(&column(TypeTag::Date), &limits);
        assert_eq!((date.byte_length, date.precision, date.scale), (6, 10, 0));
        let time = resolve(&column(TypeTag::Time), &limits);
        assert_eq!((time.byte_length, time.precision, time.scale), (6, 8, 0));
        let ts = resolve(&column(TypeTag::Timestamp), &limits);
        assert_eq!((ts.byte_length, ts.precision, ts.scale), (16, 29, 9));
    }

    #[test]
    fn test_composite_is_max_sized() {
        for tag in [TypeTag::Object, TypeTag::Array, TypeTag::Map] {
            let attrs = resolve(&column(tag).with_size(SizeHint::length(8)), &Limits::default());
            assert_eq!(attrs.byte_length, MAX_REPRESENTABLE_LENGTH);
            assert_eq!(attrs.precision, NO_PRECISION);
        }
    }

    #[test]
    fn test_attribute_from_raw() {
        assert_eq!(
            ColumnAttribute::from_raw(SQL_COLUMN_LENGTH).unwrap(),
            ColumnAttribute::Length
        );
        assert_eq!(
            ColumnAttribute::from_raw(SQL_DESC_PRECISION).unwrap(),
            ColumnAttribute::DescPrecision
        );
        assert_eq!(
            ColumnAttribute::from_raw(SQL_COLUMN_PRECISION).unwrap(),
            ColumnAttribute::Precision
        );
        assert_eq!(
            ColumnAttribute::from_raw(4242),
            Err(Error::InvalidAttribute { field: 4242 })
        );
    }

    #[test]
    fn test_column_attribute_values() {
        let limits = Limits::default();
        let columns = vec![
            ColumnMeta::new(1, "strField", TypeTag::String).with_table("cache", "TestType"),
            ColumnMeta::new(2, "i32Field", TypeTag::Int32),
        ];

        let length = column_attribute(&columns, 1, ColumnAttribute::Length, &limits).unwrap();
        assert_eq!(length, AttributeValue::Int(i64::from(DEFAULT_MAX_VARLEN)));
        let table = column_attribute(&columns, 1, ColumnAttribute::TableName, &limits).unwrap();
        assert_eq!(table.as_str(), Some("TestType"));
        let prefix = column_attribute(&columns, 2, ColumnAttribute::LiteralPrefix, &limits).unwrap();
        assert_eq!(prefix.as_str(), Some(""));
        let count = column_attribute(&columns, 0, ColumnAttribute::Count, &limits).unwrap();
        assert_eq!(count.as_i64(), Some(2));
    }

    #[test]
    fn test_precision_identifiers_on_datetime() {
        let limits = Limits::default();
        let columns = vec![
            ColumnMeta::new(1, "ts", TypeTag::Timestamp),
            ColumnMeta::new(2, "d", TypeTag::Date),
            ColumnMeta::new(3, "t", TypeTag::Time),
            ColumnMeta::new(4, "n", TypeTag::Int32),
        ];
        let int = |ordinal, attr| {
            column_attribute(&columns, ordinal, attr, &limits)
                .unwrap()
                .as_i64()
                .unwrap()
        };
        assert_eq!(int(1, ColumnAttribute::DescPrecision), 9);
        assert_eq!(int(1, ColumnAttribute::Precision), 29);
        assert_eq!(int(2, ColumnAttribute::DescPrecision), 0);
        assert_eq!(int(2, ColumnAttribute::Precision), 10);
        assert_eq!(int(3, ColumnAttribute::DescPrecision), 0);
        assert_eq!(int(4, ColumnAttribute::DescPrecision), 10);
    }

    #[test]
    fn test_unsigned_for_non_numeric() {
        let limits = Limits::default();
        let columns: Vec<ColumnMeta> = [
            TypeTag::String,
            TypeTag::Timestamp,
            TypeTag::Binary,
            TypeTag::Guid,
            TypeTag::Object,
            TypeTag::Int32,
            TypeTag::Decimal,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, tag)| ColumnMeta::new(i as u16 + 1, "c", tag))
        .collect();
        let unsigned: Vec<_> = (1..=columns.len() as u16)
            .map(|ordinal| {
                column_attribute(&columns, ordinal, ColumnAttribute::Unsigned, &limits).unwrap()
            })
            .collect();
        let flags: Vec<i64> = unsigned.iter().filter_map(AttributeValue::as_i64).collect();
        assert_eq!(flags, vec![1, 1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_column_attribute_bad_ordinal() {
        let columns = vec![ColumnMeta::new(1, "a", TypeTag::Int8)];
        let limits = Limits::default();
        for ordinal in [0, 2] {
            assert_eq!(
                column_attribute(&columns, ordinal, ColumnAttribute::Scale, &limits),
                Err(Error::InvalidColumnIndex {
                    index: ordinal,
                    count: 1
                })
            );
        }
    }
}
