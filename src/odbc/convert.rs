//! Conversion of cell values into application buffers.
//!
//! Character targets are NUL-terminated and may be truncated; the reported
//! length is always the untruncated length of the remaining data so callers
//! can grow their buffer and fetch again.

use bytes::{BufMut, BytesMut};

use crate::error::{Error, Result};
use crate::odbc::constants::*;
use crate::odbc::types::{CellValue, ColumnMeta, TypeTag};

/// C data type of an application buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    /// `SQL_C_CHAR`: UTF-8, NUL-terminated.
    Char,
    /// `SQL_C_WCHAR`: UTF-16LE, NUL-terminated.
    WChar,
    /// `SQL_C_SSHORT`.
    SShort,
    /// `SQL_C_SLONG`.
    SLong,
    /// `SQL_C_SBIGINT`.
    SBigInt,
    /// `SQL_C_DEFAULT`: chosen from the column's SQL type.
    Default,
}

impl TargetType {
    /// Decode a raw C type code.
    pub fn from_raw(c_type: i16) -> Result<Self> {
        match c_type {
            SQL_C_CHAR => Ok(TargetType::Char),
            SQL_C_WCHAR => Ok(TargetType::WChar),
            SQL_C_SSHORT => Ok(TargetType::SShort),
            SQL_C_SLONG => Ok(TargetType::SLong),
            SQL_C_SBIGINT => Ok(TargetType::SBigInt),
            SQL_C_DEFAULT => Ok(TargetType::Default),
            _ => Err(Error::InvalidTargetType { c_type }),
        }
    }

    /// Raw C type code.
    pub fn c_type(&self) -> i16 {
        match self {
            TargetType::Char => SQL_C_CHAR,
            TargetType::WChar => SQL_C_WCHAR,
            TargetType::SShort => SQL_C_SSHORT,
            TargetType::SLong => SQL_C_SLONG,
            TargetType::SBigInt => SQL_C_SBIGINT,
            TargetType::Default => SQL_C_DEFAULT,
        }
    }

    /// Replace `Default` with the C type matching a column.
    pub fn for_column(self, column: &ColumnMeta) -> Self {
        if self != TargetType::Default {
            return self;
        }
        match column.tag() {
            TypeTag::Int8 | TypeTag::Int16 | TypeTag::Bool => TargetType::SShort,
            TypeTag::Int32 => TargetType::SLong,
            TypeTag::Int64 => TargetType::SBigInt,
            _ => TargetType::Char,
        }
    }

    /// Byte width of fixed-size targets.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            TargetType::SShort => Some(2),
            TargetType::SLong => Some(4),
            TargetType::SBigInt => Some(8),
            _ => None,
        }
    }
}

/// Result of converting one value (or one piece of it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    /// Bytes written to the application buffer.
    pub data: BytesMut,
    /// Length/indicator: `SQL_NULL_DATA`, or the untruncated byte length of
    /// the remaining value.
    pub indicator: i64,
    /// Whether the value did not fit.
    pub truncated: bool,
    /// Bytes of the target representation consumed by this piece.
    pub consumed: usize,
}

impl Converted {
    fn null() -> Self {
        Self {
            data: BytesMut::new(),
            indicator: SQL_NULL_DATA,
            truncated: false,
            consumed: 0,
        }
    }
}

/// Convert a cell into a `target` buffer of `capacity` bytes.
///
/// `offset` is the number of bytes of the target representation already
/// returned by earlier SQLGetData calls on the same value. `target` must
/// not be `Default`.
pub fn convert(
    value: &CellValue,
    target: TargetType,
    capacity: usize,
    offset: usize,
) -> Result<Converted> {
    match (value, target) {
        (CellValue::Null, _) => Ok(Converted::null()),
        (_, TargetType::Char) => Ok(write_char(&value.to_string(), capacity, offset)),
        (_, TargetType::WChar) => Ok(write_wchar(&value.to_string(), capacity, offset)),
        (_, TargetType::SShort) => {
            let v = integer_value(value)?;
            let v = i16::try_from(v).map_err(|_| out_of_range(v, target))?;
            Ok(fixed(&v.to_le_bytes()))
        }
        (_, TargetType::SLong) => {
            let v = integer_value(value)?;
            let v = i32::try_from(v).map_err(|_| out_of_range(v, target))?;
            Ok(fixed(&v.to_le_bytes()))
        }
        (_, TargetType::SBigInt) => Ok(fixed(&integer_value(value)?.to_le_bytes())),
        (_, TargetType::Default) => Err(Error::InvalidTargetType {
            c_type: SQL_C_DEFAULT,
        }),
    }
}

/// Write a string into a `SQL_C_CHAR` buffer.
pub fn write_char(text: &str, capacity: usize, offset: usize) -> Converted {
    let offset = offset.min(text.len());
    let remaining = &text[offset..];
    let mut data = BytesMut::with_capacity(capacity);

    if capacity == 0 {
        return Converted {
            data,
            indicator: remaining.len() as i64,
            truncated: !remaining.is_empty(),
            consumed: 0,
        };
    }

    // leave room for the terminator, never split a UTF-8 sequence
    let mut n = remaining.len().min(capacity - 1);
    while n > 0 && !remaining.is_char_boundary(n) {
        n -= 1;
    }
    data.put_slice(&remaining.as_bytes()[..n]);
    data.put_u8(0);

    Converted {
        data,
        indicator: remaining.len() as i64,
        truncated: n < remaining.len(),
        consumed: n,
    }
}

/// Write a string into a `SQL_C_WCHAR` buffer.
pub fn write_wchar(text: &str, capacity: usize, offset: usize) -> Converted {
    let units: Vec<u16> = text.encode_utf16().collect();
    let start = (offset / 2).min(units.len());
    let remaining = &units[start..];
    let mut data = BytesMut::with_capacity(capacity);

    if capacity < 2 {
        return Converted {
            data,
            indicator: (remaining.len() * 2) as i64,
            truncated: !remaining.is_empty(),
            consumed: 0,
        };
    }

    let mut n = remaining.len().min(capacity / 2 - 1);
    // keep surrogate pairs together
    if n > 0 && n < remaining.len() && (0xD800..0xDC00).contains(&remaining[n - 1]) {
        n -= 1;
    }
    for unit in &remaining[..n] {
        data.put_u16_le(*unit);
    }
    data.put_u16_le(0);

    Converted {
        data,
        indicator: (remaining.len() * 2) as i64,
        truncated: n < remaining.len(),
        consumed: n * 2,
    }
}

fn fixed(bytes: &[u8]) -> Converted {
    Converted {
        data: BytesMut::from(bytes),
        indicator: bytes.len() as i64,
        truncated: false,
        consumed: bytes.len(),
    }
}

fn integer_value(value: &CellValue) -> Result<i64> {
    match value {
        CellValue::Int(v) => Ok(*v),
        CellValue::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidCharacterValue { value: s.clone() }),
        CellValue::Null => Ok(0),
    }
}

fn out_of_range(value: i64, target: TargetType) -> Error {
    Error::NumericOutOfRange {
        value,
        c_type: target.c_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_raw() {
        assert_eq!(TargetType::from_raw(SQL_C_CHAR).unwrap(), TargetType::Char);
        assert_eq!(TargetType::from_raw(SQL_C_SLONG).unwrap(), TargetType::SLong);
        assert_eq!(
            TargetType::from_raw(42),
            Err(Error::InvalidTargetType { c_type: 42 })
        );
    }

    #[test]
    fn test_default_target_for_column() {
        let short = ColumnMeta::new(1, "DATA_TYPE", TypeTag::Int16);
        let name = ColumnMeta::new(2, "TYPE_NAME", TypeTag::String);
        assert_eq!(TargetType::Default.for_column(&short), TargetType::SShort);
        assert_eq!(TargetType::Default.for_column(&name), TargetType::Char);
        assert_eq!(TargetType::WChar.for_column(&short), TargetType::WChar);
    }

    #[test]
    fn test_char_fits() {
        let c = convert(&CellValue::from("VARCHAR"), TargetType::Char, 64, 0).unwrap();
        assert_eq!(&c.data[..], b"VARCHAR\0");
        assert_eq!(c.indicator, 7);
        assert!(!c.truncated);
    }

    #[test]
    fn test_char_truncated_reports_full_length() {
        let c = convert(&CellValue::from("TIMESTAMP"), TargetType::Char, 5, 0).unwrap();
        assert_eq!(&c.data[..], b"TIME\0");
        assert_eq!(c.indicator, 9);
        assert!(c.truncated);
        assert_eq!(c.consumed, 4);

        let rest = convert(&CellValue::from("TIMESTAMP"), TargetType::Char, 16, c.consumed).unwrap();
        assert_eq!(&rest.data[..], b"STAMP\0");
        assert_eq!(rest.indicator, 5);
        assert!(!rest.truncated);
    }

    #[test]
    fn test_char_zero_capacity() {
        let c = write_char("abc", 0, 0);
        assert!(c.data.is_empty());
        assert_eq!(c.indicator, 3);
        assert!(c.truncated);
    }

    #[test]
    fn test_char_does_not_split_utf8() {
        let c = write_char("héllo", 3, 0);
        // 'h' + 2-byte 'é' would need 3 bytes plus terminator
        assert_eq!(&c.data[..], b"h\0");
        assert_eq!(c.indicator, 6);
    }

    #[test]
    fn test_wchar() {
        let c = convert(&CellValue::from("INT"), TargetType::WChar, 64, 0).unwrap();
        assert_eq!(&c.data[..], &[b'I', 0, b'N', 0, b'T', 0, 0, 0]);
        assert_eq!(c.indicator, 6);

        let c = convert(&CellValue::from("INTEGER"), TargetType::WChar, 6, 0).unwrap();
        assert_eq!(&c.data[..], &[b'I', 0, b'N', 0, 0, 0]);
        assert_eq!(c.indicator, 14);
        assert!(c.truncated);
    }

    #[test]
    fn test_integer_targets() {
        let c = convert(&CellValue::Int(-5), TargetType::SShort, 0, 0).unwrap();
        assert_eq!(&c.data[..], &(-5i16).to_le_bytes());
        assert_eq!(c.indicator, 2);

        let c = convert(&CellValue::from("12"), TargetType::SLong, 0, 0).unwrap();
        assert_eq!(&c.data[..], &12i32.to_le_bytes());

        let c = convert(&CellValue::Int(i64::MAX), TargetType::SBigInt, 0, 0).unwrap();
        assert_eq!(c.indicator, 8);
    }

    #[test]
    fn test_integer_errors() {
        assert_eq!(
            convert(&CellValue::Int(70000), TargetType::SShort, 0, 0),
            Err(Error::NumericOutOfRange {
                value: 70000,
                c_type: SQL_C_SSHORT
            })
        );
        assert!(matches!(
            convert(&CellValue::from("VARCHAR"), TargetType::SLong, 0, 0),
            Err(Error::InvalidCharacterValue { .. })
        ));
    }

    #[test]
    fn test_null_indicator() {
        let c = convert(&CellValue::Null, TargetType::Char, 10, 0).unwrap();
        assert_eq!(c.indicator, SQL_NULL_DATA);
        assert!(c.data.is_empty());
    }
}
