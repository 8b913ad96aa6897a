//! Internal type tags of the cache's binary object format.
//!
//! The cache stores self-describing binary objects; every field carries a
//! one-byte type identifier. This enum is the closed set of identifiers the
//! catalog layer understands.

use crate::error::{Error, Result};
use crate::odbc::constants::*;

/// Internal type identity of a cache field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    /// Signed 8-bit integer (`byte`).
    Int8,
    /// Signed 16-bit integer (`short`).
    Int16,
    /// Signed 32-bit integer (`int`).
    Int32,
    /// Signed 64-bit integer (`long`).
    Int64,
    /// IEEE-754 single precision.
    Float32,
    /// IEEE-754 double precision.
    Float64,
    /// Boolean.
    Bool,
    /// Arbitrary precision decimal.
    Decimal,
    /// Variable length UTF-8 string.
    String,
    /// Variable length byte array.
    Binary,
    /// Calendar date.
    Date,
    /// Time of day, second resolution.
    Time,
    /// Date and time with nanosecond fraction.
    Timestamp,
    /// 128-bit UUID.
    Guid,
    /// Nested binary object.
    Object,
    /// Object array or collection.
    Array,
    /// Key/value map.
    Map,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 17] = [
        TypeTag::Int8,
        TypeTag::Int16,
        TypeTag::Int32,
        TypeTag::Int64,
        TypeTag::Float32,
        TypeTag::Float64,
        TypeTag::Bool,
        TypeTag::Decimal,
        TypeTag::String,
        TypeTag::Binary,
        TypeTag::Date,
        TypeTag::Time,
        TypeTag::Timestamp,
        TypeTag::Guid,
        TypeTag::Object,
        TypeTag::Array,
        TypeTag::Map,
    ];

    /// Decode a binary object type identifier.
    ///
    /// Returns `Err(Error::SchemaInconsistency)` for identifiers outside the
    /// supported set.
    pub fn from_type_id(type_id: u8) -> Result<Self> {
        match type_id {
            BINARY_TYPE_BYTE => Ok(TypeTag::Int8),
            BINARY_TYPE_SHORT => Ok(TypeTag::Int16),
            BINARY_TYPE_INT => Ok(TypeTag::Int32),
            BINARY_TYPE_LONG => Ok(TypeTag::Int64),
            BINARY_TYPE_FLOAT => Ok(TypeTag::Float32),
            BINARY_TYPE_DOUBLE => Ok(TypeTag::Float64),
            BINARY_TYPE_BOOL => Ok(TypeTag::Bool),
            BINARY_TYPE_DECIMAL => Ok(TypeTag::Decimal),
            BINARY_TYPE_STRING => Ok(TypeTag::String),
            BINARY_TYPE_ARR_BYTE => Ok(TypeTag::Binary),
            BINARY_TYPE_DATE => Ok(TypeTag::Date),
            BINARY_TYPE_TIME => Ok(TypeTag::Time),
            BINARY_TYPE_TIMESTAMP => Ok(TypeTag::Timestamp),
            BINARY_TYPE_UUID => Ok(TypeTag::Guid),
            BINARY_TYPE_OBJECT | BINARY_TYPE_BINARY_OBJECT => Ok(TypeTag::Object),
            BINARY_TYPE_ARR_OBJECT | BINARY_TYPE_COLLECTION => Ok(TypeTag::Array),
            BINARY_TYPE_MAP => Ok(TypeTag::Map),
            _ => Err(Error::SchemaInconsistency {
                message: format!("unknown binary type id {}", type_id),
            }),
        }
    }

    /// Get the canonical binary object type identifier.
    pub fn type_id(&self) -> u8 {
        match self {
            TypeTag::Int8 => BINARY_TYPE_BYTE,
            TypeTag::Int16 => BINARY_TYPE_SHORT,
            TypeTag::Int32 => BINARY_TYPE_INT,
            TypeTag::Int64 => BINARY_TYPE_LONG,
            TypeTag::Float32 => BINARY_TYPE_FLOAT,
            TypeTag::Float64 => BINARY_TYPE_DOUBLE,
            TypeTag::Bool => BINARY_TYPE_BOOL,
            TypeTag::Decimal => BINARY_TYPE_DECIMAL,
            TypeTag::String => BINARY_TYPE_STRING,
            TypeTag::Binary => BINARY_TYPE_ARR_BYTE,
            TypeTag::Date => BINARY_TYPE_DATE,
            TypeTag::Time => BINARY_TYPE_TIME,
            TypeTag::Timestamp => BINARY_TYPE_TIMESTAMP,
            TypeTag::Guid => BINARY_TYPE_UUID,
            TypeTag::Object => BINARY_TYPE_OBJECT,
            TypeTag::Array => BINARY_TYPE_ARR_OBJECT,
            TypeTag::Map => BINARY_TYPE_MAP,
        }
    }

    /// Position in declaration order, used to break SQL type code ties.
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Fixed-width numeric tags (integers, floats, bool).
    pub fn is_fixed_numeric(&self) -> bool {
        matches!(
            self,
            TypeTag::Int8
                | TypeTag::Int16
                | TypeTag::Int32
                | TypeTag::Int64
                | TypeTag::Float32
                | TypeTag::Float64
                | TypeTag::Bool
        )
    }

    /// Composite tags, exposed as opaque binary.
    pub fn is_composite(&self) -> bool {
        matches!(self, TypeTag::Object | TypeTag::Array | TypeTag::Map)
    }

    /// Temporal tags.
    pub fn is_temporal(&self) -> bool {
        matches!(self, TypeTag::Date | TypeTag::Time | TypeTag::Timestamp)
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeTag::Int8 => "byte",
            TypeTag::Int16 => "short",
            TypeTag::Int32 => "int",
            TypeTag::Int64 => "long",
            TypeTag::Float32 => "float",
            TypeTag::Float64 => "double",
            TypeTag::Bool => "bool",
            TypeTag::Decimal => "decimal",
            TypeTag::String => "string",
            TypeTag::Binary => "byte[]",
            TypeTag::Date => "date",
            TypeTag::Time => "time",
            TypeTag::Timestamp => "timestamp",
            TypeTag::Guid => "uuid",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
            TypeTag::Map => "map",
        };
        write!(f, "{}", name)
    }
}
