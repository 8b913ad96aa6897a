//! Forward-only cursor over synthetic catalog result sets.
//!
//! A [`CatalogCursor`] pulls rows lazily from a row source and drives the
//! ODBC fetch protocol on top of them: column bindings are refreshed on every
//! [`fetch`](CatalogCursor::fetch), unbound columns can be read piecewise with
//! [`get_data`](CatalogCursor::get_data).
//!
//! # Lifecycle
//!
//! 1. Opened by a catalog call on a [`Statement`](crate::Statement)
//! 2. Advanced by `fetch()` or [`Cursor::next`] until no data remains
//! 3. Closed explicitly, by re-executing the statement, or by dropping it
//!
//! Fetching past the end keeps returning no data. Anything but `close()`
//! after the cursor is closed fails with `Error::InvalidCursorState`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bytes::BytesMut;
use futures::Stream;

use crate::catalog::attributes::column_at;
use crate::error::{Error, Result};
use crate::odbc::convert::{self, Converted, TargetType};
use crate::odbc::types::{CatalogRow, ColumnMeta};

/// Lazily evaluated rows of a result set.
pub type RowSource = Box<dyn Iterator<Item = CatalogRow> + Send>;

/// Base trait for cursors.
///
/// # Example
///
/// ```no_run
/// use ignite_odbc_rs::{CatalogRow, Cursor};
///
/// fn count_rows<C: Cursor<Item = CatalogRow>>(cursor: &mut C) -> u64 {
///     let mut count = 0;
///     while let Ok(Some(_)) = cursor.next() {
///         count += 1;
///     }
///     count
/// }
/// ```
pub trait Cursor {
    /// The type of item this cursor yields.
    type Item;

    /// Column metadata of the result set.
    fn columns(&self) -> &[ColumnMeta];

    /// Number of rows fetched so far.
    fn rowcount(&self) -> u64;

    fn is_closed(&self) -> bool;

    /// Whether another fetch may return a row.
    fn has_more(&self) -> bool;

    /// Release the row source and all bindings. Idempotent.
    fn close(&mut self);

    /// Advance and return the next row.
    ///
    /// Returns `Ok(None)` once exhausted.
    fn next(&mut self) -> Result<Option<Self::Item>>;

    /// Drain all remaining rows.
    fn fetch_all(&mut self) -> Result<Vec<Self::Item>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Exhausted,
    Closed,
}

/// Position of a cursor within its result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorState {
    /// Rows fetched so far; the current row is `position` (1-based).
    position: u64,
    /// Row count, when the source knows it up front.
    total: Option<u64>,
    phase: Phase,
}

impl CursorState {
    fn new(total: Option<u64>) -> Self {
        Self {
            position: 0,
            total,
            phase: Phase::Open,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total row count; `None` until exhausted if the source is unsized.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase == Phase::Exhausted
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }
}

/// Application buffer bound to a result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    target: TargetType,
    capacity: usize,
    buffer: BytesMut,
    indicator: Option<i64>,
    truncated: bool,
}

impl Binding {
    fn new(target: TargetType, capacity: usize) -> Self {
        let capacity = target.fixed_width().unwrap_or(capacity);
        Self {
            target,
            capacity,
            buffer: BytesMut::with_capacity(capacity),
            indicator: None,
            truncated: false,
        }
    }

    fn store(&mut self, converted: Converted) {
        self.buffer = converted.data;
        self.indicator = Some(converted.indicator);
        self.truncated = converted.truncated;
    }

    pub fn target(&self) -> TargetType {
        self.target
    }

    /// Buffer length in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes written by the last fetch.
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// Length/indicator written by the last fetch; `None` before the first.
    pub fn indicator(&self) -> Option<i64> {
        self.indicator
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Buffer contents as text, up to the terminator.
    ///
    /// `None` for integer targets and before the first fetch.
    pub fn text(&self) -> Option<String> {
        match self.target {
            TargetType::Char => {
                let end = self.buffer.iter().position(|b| *b == 0)?;
                Some(String::from_utf8_lossy(&self.buffer[..end]).into_owned())
            }
            TargetType::WChar => {
                let units: Vec<u16> = self
                    .buffer
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]))
                    .take_while(|u| *u != 0)
                    .collect();
                (!self.buffer.is_empty()).then(|| String::from_utf16_lossy(&units))
            }
            _ => None,
        }
    }

    /// Buffer contents as an integer for `SSHORT`, `SLONG` and `SBIGINT`
    /// targets.
    pub fn as_i64(&self) -> Option<i64> {
        let data = &self.buffer[..];
        match self.target {
            TargetType::SShort => Some(i64::from(i16::from_le_bytes(data.try_into().ok()?))),
            TargetType::SLong => Some(i64::from(i32::from_le_bytes(data.try_into().ok()?))),
            TargetType::SBigInt => Some(i64::from_le_bytes(data.try_into().ok()?)),
            _ => None,
        }
    }
}

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A row was fetched; lists the bound columns that were truncated.
    Row { truncated: Vec<u16> },
    /// No more rows.
    NoData,
}

impl FetchOutcome {
    pub fn is_row(&self) -> bool {
        matches!(self, FetchOutcome::Row { .. })
    }
}

/// Progress of piecewise SQLGetData on one column of the current row.
#[derive(Debug, Clone, Copy, Default)]
struct ReadProgress {
    consumed: usize,
    finished: bool,
}

/// Read-only, forward-only cursor over catalog rows.
pub struct CatalogCursor {
    columns: Arc<[ColumnMeta]>,
    /// Released on exhaustion and close.
    source: Option<RowSource>,
    state: CursorState,
    current: Option<CatalogRow>,
    bindings: BTreeMap<u16, Binding>,
    reads: BTreeMap<u16, ReadProgress>,
}

impl fmt::Debug for CatalogCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogCursor")
            .field("columns", &self.columns.len())
            .field("state", &self.state)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CatalogCursor {
    /// Open a cursor over `rows`.
    pub fn open<I>(columns: Arc<[ColumnMeta]>, rows: I) -> Self
    where
        I: IntoIterator<Item = CatalogRow>,
        I::IntoIter: Send + 'static,
    {
        let source = rows.into_iter();
        let total = match source.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower as u64),
            _ => None,
        };
        tracing::trace!(columns = columns.len(), ?total, "cursor opened");
        Self {
            columns,
            source: Some(Box::new(source)),
            state: CursorState::new(total),
            current: None,
            bindings: BTreeMap::new(),
            reads: BTreeMap::new(),
        }
    }

    /// Open a cursor that yields no rows.
    pub fn empty(columns: Arc<[ColumnMeta]>) -> Self {
        Self::open(columns, std::iter::empty())
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// Shared handle to the column metadata.
    pub fn column_handle(&self) -> Arc<[ColumnMeta]> {
        self.columns.clone()
    }

    /// The row last fetched, if any.
    pub fn current_row(&self) -> Option<&CatalogRow> {
        self.current.as_ref()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state.is_closed() {
            return Err(Error::invalid_cursor("cursor is closed"));
        }
        Ok(())
    }

    /// Bind an application buffer of `capacity` bytes to a column.
    ///
    /// Replaces any earlier binding of the same column. Integer targets
    /// ignore `capacity`.
    pub fn bind_column(&mut self, ordinal: u16, target: TargetType, capacity: usize) -> Result<()> {
        self.ensure_open()?;
        let column = column_at(&self.columns, ordinal)?;
        let target = target.for_column(column);
        tracing::trace!(ordinal, ?target, capacity, "column bound");
        self.bindings.insert(ordinal, Binding::new(target, capacity));
        Ok(())
    }

    /// Release one binding. Returns whether the column was bound.
    pub fn unbind_column(&mut self, ordinal: u16) -> bool {
        self.bindings.remove(&ordinal).is_some()
    }

    /// Release all bindings.
    pub fn unbind_all(&mut self) {
        self.bindings.clear();
    }

    pub fn binding(&self, ordinal: u16) -> Option<&Binding> {
        self.bindings.get(&ordinal)
    }

    pub fn bound_columns(&self) -> impl Iterator<Item = u16> + '_ {
        self.bindings.keys().copied()
    }

    fn advance(&mut self) -> Result<bool> {
        self.ensure_open()?;
        if self.state.is_exhausted() {
            return Ok(false);
        }

        self.reads.clear();
        match self.source.as_mut().and_then(|source| source.next()) {
            Some(row) => {
                self.state.position += 1;
                self.current = Some(row);
                Ok(true)
            }
            None => {
                self.source = None;
                self.current = None;
                self.state.phase = Phase::Exhausted;
                self.state.total = Some(self.state.position);
                tracing::trace!(rows = self.state.position, "cursor exhausted");
                Ok(false)
            }
        }
    }

    /// Advance to the next row and refresh bound buffers.
    ///
    /// A conversion failure leaves the cursor on the new row.
    pub fn fetch(&mut self) -> Result<FetchOutcome> {
        if !self.advance()? {
            return Ok(FetchOutcome::NoData);
        }
        let Some(row) = self.current.as_ref() else {
            return Ok(FetchOutcome::NoData);
        };

        let mut truncated = Vec::new();
        for (ordinal, binding) in self.bindings.iter_mut() {
            let Some(value) = row.get(usize::from(*ordinal) - 1) else {
                continue;
            };
            let converted = convert::convert(value, binding.target, binding.capacity, 0)?;
            if converted.truncated {
                tracing::debug!(
                    ordinal = *ordinal,
                    length = converted.indicator,
                    capacity = binding.capacity,
                    "bound value truncated"
                );
                truncated.push(*ordinal);
            }
            binding.store(converted);
        }
        Ok(FetchOutcome::Row { truncated })
    }

    /// Read a column of the current row into a buffer of `capacity` bytes.
    ///
    /// Character data is returned piecewise: each call continues where the
    /// previous one stopped. Returns `Ok(None)` once the value has been fully
    /// returned.
    pub fn get_data(
        &mut self,
        ordinal: u16,
        target: TargetType,
        capacity: usize,
    ) -> Result<Option<Converted>> {
        self.ensure_open()?;
        let column = column_at(&self.columns, ordinal)?;
        let target = target.for_column(column);
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| Error::invalid_cursor("no current row"))?;
        let value = row
            .get(usize::from(ordinal) - 1)
            .ok_or(Error::InvalidColumnIndex {
                index: ordinal,
                count: row.len(),
            })?;

        let progress = self.reads.entry(ordinal).or_default();
        if progress.finished {
            return Ok(None);
        }

        let converted = convert::convert(value, target, capacity, progress.consumed)?;
        progress.consumed += converted.consumed;
        progress.finished = !converted.truncated;
        Ok(Some(converted))
    }
}

impl Cursor for CatalogCursor {
    type Item = CatalogRow;

    fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    fn rowcount(&self) -> u64 {
        self.state.position
    }

    fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    fn has_more(&self) -> bool {
        match self.state.phase {
            Phase::Open => self
                .state
                .total
                .map_or(true, |total| self.state.position < total),
            Phase::Exhausted | Phase::Closed => false,
        }
    }

    fn close(&mut self) {
        if self.state.is_closed() {
            return;
        }
        self.source = None;
        self.current = None;
        self.bindings.clear();
        self.reads.clear();
        self.state.phase = Phase::Closed;
        tracing::trace!(rows = self.state.position, "cursor closed");
    }

    fn next(&mut self) -> Result<Option<Self::Item>> {
        if self.advance()? {
            Ok(self.current.clone())
        } else {
            Ok(None)
        }
    }

    fn fetch_all(&mut self) -> Result<Vec<Self::Item>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next()? {
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Extension trait for converting a [`Cursor`] into a `Stream`.
///
/// # Example
///
/// ```no_run
/// use futures::stream::TryStreamExt;
/// use ignite_odbc_rs::{Connection, CursorStreamExt, MemorySchemaProvider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let conn = Connection::connect("SCHEMA=cache", MemorySchemaProvider::new())?;
///     let mut stmt = conn.statement();
///     stmt.get_type_info(0)?;
///
///     let names: Vec<String> = stmt
///         .take_cursor()
///         .unwrap()
///         .into_stream()
///         .map_ok(|row| row.get(0).unwrap().to_string())
///         .try_collect()
///         .await?;
///     Ok(())
/// }
/// ```
pub trait CursorStreamExt: Cursor + Sized {
    /// Convert this cursor into a `Stream` yielding `Result<Item>`.
    ///
    /// The stream takes ownership of the cursor and ends after the first
    /// error.
    fn into_stream(self) -> impl Stream<Item = Result<Self::Item>>;
}

impl<C: Cursor + Unpin> CursorStreamExt for C {
    fn into_stream(self) -> impl Stream<Item = Result<Self::Item>> {
        use futures::stream;

        stream::unfold(Some(self), |opt_cursor| async move {
            let mut cursor = opt_cursor?;
            match cursor.next() {
                Ok(Some(item)) => Some((Ok(item), Some(cursor))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odbc::constants::SQL_NULL_DATA;
    use crate::odbc::types::{CellValue, TypeTag};
    use futures::StreamExt;

    fn columns() -> Arc<[ColumnMeta]> {
        Arc::from(vec![
            ColumnMeta::new(1, "TYPE_NAME", TypeTag::String),
            ColumnMeta::new(2, "DATA_TYPE", TypeTag::Int16),
            ColumnMeta::new(3, "REMARKS", TypeTag::String),
        ])
    }

    fn rows(columns: &Arc<[ColumnMeta]>) -> Vec<CatalogRow> {
        [("INTEGER", 4), ("VARCHAR", 12), ("TIMESTAMP", 93)]
            .into_iter()
            .map(|(name, code)| {
                CatalogRow::new(
                    vec![CellValue::from(name), CellValue::from(code as i16), CellValue::Null],
                    columns.clone(),
                )
            })
            .collect()
    }

    fn make_cursor() -> CatalogCursor {
        let columns = columns();
        let rows = rows(&columns);
        CatalogCursor::open(columns, rows)
    }

    #[test]
    fn test_fetch_until_exhausted() {
        let mut cursor = make_cursor();
        assert_eq!(cursor.state().total(), Some(3));
        assert!(cursor.has_more());

        for expected in 1..=3 {
            assert!(cursor.fetch().unwrap().is_row());
            assert_eq!(cursor.rowcount(), expected);
        }
        assert_eq!(cursor.fetch().unwrap(), FetchOutcome::NoData);
        assert!(cursor.state().is_exhausted());
        assert!(!cursor.has_more());
        // fetching past the end stays a no-op
        assert_eq!(cursor.fetch().unwrap(), FetchOutcome::NoData);
        assert_eq!(cursor.rowcount(), 3);
    }

    #[test]
    fn test_closed_cursor_rejects_operations() {
        let mut cursor = make_cursor();
        cursor.close();
        cursor.close();
        assert!(cursor.is_closed());
        assert!(matches!(cursor.fetch(), Err(Error::InvalidCursorState { .. })));
        assert!(matches!(
            cursor.bind_column(1, TargetType::Char, 16),
            Err(Error::InvalidCursorState { .. })
        ));
        assert!(matches!(
            cursor.get_data(1, TargetType::Char, 16),
            Err(Error::InvalidCursorState { .. })
        ));
    }

    #[test]
    fn test_bound_columns_refresh_on_fetch() {
        let mut cursor = make_cursor();
        cursor.bind_column(1, TargetType::Char, 32).unwrap();
        cursor.bind_column(2, TargetType::Default, 0).unwrap();
        cursor.bind_column(3, TargetType::Char, 32).unwrap();
        assert_eq!(cursor.binding(2).unwrap().target(), TargetType::SShort);
        assert_eq!(cursor.binding(1).unwrap().indicator(), None);

        cursor.fetch().unwrap();
        assert_eq!(cursor.binding(1).unwrap().text().as_deref(), Some("INTEGER"));
        assert_eq!(cursor.binding(2).unwrap().as_i64(), Some(4));
        assert_eq!(cursor.binding(3).unwrap().indicator(), Some(SQL_NULL_DATA));

        cursor.fetch().unwrap();
        assert_eq!(cursor.binding(1).unwrap().text().as_deref(), Some("VARCHAR"));
        assert_eq!(cursor.binding(1).unwrap().indicator(), Some(7));
    }

    #[test]
    fn test_bound_truncation_reported() {
        let mut cursor = make_cursor();
        cursor.bind_column(1, TargetType::Char, 6).unwrap();

        assert_eq!(
            cursor.fetch().unwrap(),
            FetchOutcome::Row { truncated: vec![1] }
        );
        let binding = cursor.binding(1).unwrap();
        assert_eq!(binding.text().as_deref(), Some("INTEG"));
        assert_eq!(binding.indicator(), Some(7));
        assert!(binding.is_truncated());
    }

    #[test]
    fn test_bind_invalid_ordinal() {
        let mut cursor = make_cursor();
        assert!(matches!(
            cursor.bind_column(0, TargetType::Char, 8),
            Err(Error::InvalidColumnIndex { index: 0, count: 3 })
        ));
        assert!(matches!(
            cursor.bind_column(4, TargetType::Char, 8),
            Err(Error::InvalidColumnIndex { index: 4, .. })
        ));
    }

    #[test]
    fn test_unbind() {
        let mut cursor = make_cursor();
        cursor.bind_column(1, TargetType::Char, 8).unwrap();
        cursor.bind_column(2, TargetType::SLong, 0).unwrap();
        assert!(cursor.unbind_column(1));
        assert!(!cursor.unbind_column(1));
        assert_eq!(cursor.bound_columns().collect::<Vec<_>>(), vec![2]);
        cursor.unbind_all();
        assert_eq!(cursor.bound_columns().count(), 0);
    }

    #[test]
    fn test_get_data_piecewise() {
        let mut cursor = make_cursor();
        assert!(matches!(
            cursor.get_data(1, TargetType::Char, 8),
            Err(Error::InvalidCursorState { .. })
        ));

        cursor.fetch().unwrap();
        cursor.fetch().unwrap();
        cursor.fetch().unwrap();

        let first = cursor.get_data(1, TargetType::Char, 5).unwrap().unwrap();
        assert_eq!(&first.data[..], b"TIME\0");
        assert_eq!(first.indicator, 9);
        assert!(first.truncated);

        let second = cursor.get_data(1, TargetType::Char, 5).unwrap().unwrap();
        assert_eq!(&second.data[..], b"STAM\0");
        assert_eq!(second.indicator, 5);

        let last = cursor.get_data(1, TargetType::Char, 5).unwrap().unwrap();
        assert_eq!(&last.data[..], b"P\0");
        assert!(!last.truncated);

        assert_eq!(cursor.get_data(1, TargetType::Char, 5).unwrap(), None);

        let code = cursor.get_data(2, TargetType::SLong, 0).unwrap().unwrap();
        assert_eq!(&code.data[..], &93i32.to_le_bytes());
        assert_eq!(cursor.get_data(2, TargetType::SLong, 0).unwrap(), None);
    }

    #[test]
    fn test_conversion_error_surfaces() {
        let mut cursor = make_cursor();
        cursor.bind_column(1, TargetType::SLong, 0).unwrap();
        assert!(matches!(
            cursor.fetch(),
            Err(Error::InvalidCharacterValue { .. })
        ));
        // the cursor still moved
        assert_eq!(cursor.rowcount(), 1);
    }

    #[test]
    fn test_unsized_source_total_known_after_exhaustion() {
        let columns = columns();
        let rows = rows(&columns);
        let mut cursor = CatalogCursor::open(columns, rows.into_iter().filter(|_| true));
        assert_eq!(cursor.state().total(), None);
        assert_eq!(cursor.fetch_all().unwrap().len(), 3);
        assert_eq!(cursor.state().total(), Some(3));
    }

    #[test]
    fn test_empty_cursor() {
        let mut cursor = CatalogCursor::empty(columns());
        assert!(!cursor.has_more());
        assert_eq!(cursor.next().unwrap(), None);
    }

    #[tokio::test]
    async fn test_into_stream() {
        let cursor = make_cursor();
        let names: Vec<String> = cursor
            .into_stream()
            .map(|row| row.unwrap().get(0).unwrap().to_string())
            .collect()
            .await;
        assert_eq!(names, vec!["INTEGER", "VARCHAR", "TIMESTAMP"]);
    }
}
