//! Raw column descriptors as delivered by a schema provider.
//!
//! These preserve what the binary object format reports about a field.
//! For the resolved, catalog-facing view use `ColumnMeta`.

/// Declared size of a column, if the schema carries one.
///
/// Strings and byte arrays use `length`; decimals use `precision`/`scale`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeHint {
    /// Maximum length in characters (strings) or bytes (binary).
    pub length: Option<u32>,
    /// Total number of decimal digits.
    pub precision: Option<u16>,
    /// Digits right of the decimal point.
    pub scale: Option<i16>,
}

impl SizeHint {
    /// No declared size.
    pub fn none() -> Self {
        Self::default()
    }

    /// Declared maximum length.
    pub fn length(length: u32) -> Self {
        Self {
            length: Some(length),
            ..Self::default()
        }
    }

    /// Declared decimal precision and scale.
    pub fn decimal(precision: u16, scale: i16) -> Self {
        Self {
            precision: Some(precision),
            scale: Some(scale),
            ..Self::default()
        }
    }
}

/// One field of a cache table, as described by the schema provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    /// Field name.
    pub name: String,
    /// Binary object type identifier (raw format).
    pub type_id: u8,
    /// Declared size.
    pub size: SizeHint,
    /// Whether NULL values are allowed.
    pub nullable: bool,
}

impl SchemaColumn {
    /// Create a nullable column with no declared size.
    pub fn new(name: impl Into<String>, type_id: u8) -> Self {
        Self {
            name: name.into(),
            type_id,
            size: SizeHint::none(),
            nullable: true,
        }
    }

    /// Set the declared size.
    pub fn with_size(mut self, size: SizeHint) -> Self {
        self.size = size;
        self
    }

    /// Mark the column as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// A table known to the schema provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    /// Schema (cache) name.
    pub schema: String,
    /// Table (value type) name.
    pub name: String,
}

impl TableMeta {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}
