//! Row sources: the forward-only sequence of rows a renderer consumes.
//!
//! A `ResultCursor` is the live result as the driver delivers it; a
//! `RowSource` wraps one for rendering. `BufferedRows` drains the cursor
//! before the first row is handed out, `IncrementalRows` (see
//! `incremental.rs`) streams it from a producer thread.

use crate::error::{QuillError, QuillResult};
use crate::row::{normalize_widths, Row};
use std::collections::{BTreeSet, VecDeque};

/// A live query result, as produced by the connection.
pub trait ResultCursor: Send {
    fn column_labels(&self) -> Vec<String>;

    /// Indices of the columns that belong to the primary key of the queried
    /// table, when the driver can tell.
    fn primary_key_columns(&self) -> BTreeSet<usize> {
        BTreeSet::new()
    }

    /// Next data row, `None` once the result is exhausted.
    fn fetch(&mut self) -> QuillResult<Option<Row>>;
}

/// Sequence of rows handed to a renderer. The first row is always the
/// header.
pub trait RowSource {
    /// Fix the column widths of the result. Called once, before the first
    /// row is taken.
    fn normalize_widths(&mut self, max_column_width: usize);

    fn is_primary_key(&self, column: usize) -> bool;

    /// May block while the next row is being fetched.
    fn has_next(&mut self) -> QuillResult<bool>;

    fn next_row(&mut self) -> QuillResult<Row>;
}

/// Fully materialized result.
#[derive(Debug)]
pub struct BufferedRows {
    rows: Vec<Row>,
    position: usize,
    primary_keys: BTreeSet<usize>,
}

impl BufferedRows {
    /// Drain `cursor` completely. Null cells become `null_value` when one is
    /// configured.
    pub fn new(cursor: &mut dyn ResultCursor, null_value: Option<&str>) -> QuillResult<Self> {
        let header = Row::header(cursor.column_labels());
        let columns = header.len();
        let mut rows = vec![header];
        while let Some(mut row) = cursor.fetch()? {
            row.fit_columns(columns);
            if let Some(nv) = null_value {
                row.fill_nulls(nv);
            }
            rows.push(row);
        }
        tracing::debug!("buffered {} rows", rows.len() - 1);
        Ok(Self {
            rows,
            position: 0,
            primary_keys: cursor.primary_key_columns(),
        })
    }

    /// Build from already materialized rows; `rows[0]` must be the header.
    pub fn from_rows(rows: Vec<Row>, primary_keys: BTreeSet<usize>) -> Self {
        Self {
            rows,
            position: 0,
            primary_keys,
        }
    }

    /// Number of data rows (header excluded).
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

impl RowSource for BufferedRows {
    fn normalize_widths(&mut self, max_column_width: usize) {
        normalize_widths(&mut self.rows, max_column_width);
    }

    fn is_primary_key(&self, column: usize) -> bool {
        self.primary_keys.contains(&column)
    }

    fn has_next(&mut self) -> QuillResult<bool> {
        Ok(self.position < self.rows.len())
    }

    fn next_row(&mut self) -> QuillResult<Row> {
        let row = self
            .rows
            .get(self.position)
            .cloned()
            .ok_or(QuillError::Exhausted)?;
        self.position += 1;
        Ok(row)
    }
}

/// In-memory cursor over rows that are already at hand: catalog listings,
/// option tables, tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    labels: Vec<String>,
    rows: VecDeque<Row>,
    primary_keys: BTreeSet<usize>,
    fail_after: Option<(usize, String)>,
}

impl MemoryCursor {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Build from string rows; the first row holds the labels.
    pub fn from_table(table: &[&[&str]]) -> Self {
        let mut iter = table.iter();
        let mut cursor = Self::new(iter.next().map(|h| h.to_vec()).unwrap_or_default());
        for row in iter {
            cursor.push(row.iter().map(|c| Some(c.to_string())).collect());
        }
        cursor
    }

    pub fn push(&mut self, values: Vec<Option<String>>) {
        self.rows.push_back(Row::data(values));
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push_back(row);
    }

    pub fn with_primary_keys(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.primary_keys = columns.into_iter().collect();
        self
    }

    /// Make the cursor fail with `message` after delivering `rows` rows.
    pub fn fail_after(mut self, rows: usize, message: impl Into<String>) -> Self {
        self.fail_after = Some((rows, message.into()));
        self
    }
}

impl ResultCursor for MemoryCursor {
    fn column_labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn primary_key_columns(&self) -> BTreeSet<usize> {
        self.primary_keys.clone()
    }

    fn fetch(&mut self) -> QuillResult<Option<Row>> {
        if let Some((remaining, message)) = self.fail_after.as_mut() {
            if *remaining == 0 {
                return Err(QuillError::Fetch(message.clone()));
            }
            *remaining -= 1;
        }
        Ok(self.rows.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> MemoryCursor {
        MemoryCursor::from_table(&[&["ID", "NAME"], &["1", "Alice"], &["2", "Bob"]])
    }

    fn drain(source: &mut dyn RowSource) -> Vec<Row> {
        let mut out = Vec::new();
        while source.has_next().unwrap() {
            out.push(source.next_row().unwrap());
        }
        out
    }

    #[test]
    fn test_buffered_yields_header_then_rows() {
        let mut cursor = people();
        let mut rows = BufferedRows::new(&mut cursor, None).unwrap();
        assert_eq!(rows.data_row_count(), 2);
        let all = drain(&mut rows);
        assert_eq!(all.len(), 3);
        assert!(all[0].is_header);
        assert_eq!(all[2].values[1].as_deref(), Some("Bob"));
    }

    #[test]
    fn test_buffered_next_after_end_is_exhausted() {
        let mut cursor = MemoryCursor::new(["A"]);
        let mut rows = BufferedRows::new(&mut cursor, None).unwrap();
        rows.next_row().unwrap();
        assert!(!rows.has_next().unwrap());
        assert!(matches!(rows.next_row(), Err(QuillError::Exhausted)));
    }

    #[test]
    fn test_buffered_normalizes_over_all_rows() {
        let mut cursor = people();
        let mut rows = BufferedRows::new(&mut cursor, None).unwrap();
        rows.normalize_widths(0);
        for row in drain(&mut rows) {
            assert_eq!(row.sizes, vec![2, 5]);
        }
    }

    #[test]
    fn test_buffered_fills_nulls() {
        let mut cursor = MemoryCursor::new(["A", "B"]);
        cursor.push(vec![None, Some("x".into())]);
        let mut rows = BufferedRows::new(&mut cursor, Some("<null>")).unwrap();
        let all = drain(&mut rows);
        assert_eq!(all[1].values[0].as_deref(), Some("<null>"));
    }

    #[test]
    fn test_buffered_fits_ragged_rows_to_header() {
        let mut cursor = MemoryCursor::new(["A", "B"]);
        cursor.push(vec![Some("1".into())]);
        cursor.push(vec![Some("1".into()), Some("2".into()), Some("3".into())]);
        let mut rows = BufferedRows::new(&mut cursor, None).unwrap();
        for row in drain(&mut rows) {
            assert_eq!(row.len(), 2);
        }
    }

    #[test]
    fn test_buffered_propagates_fetch_error() {
        let mut cursor = people().fail_after(1, "server closed the connection");
        let err = BufferedRows::new(&mut cursor, None).unwrap_err();
        assert!(matches!(err, QuillError::Fetch(ref m) if m.contains("server closed")));
    }

    #[test]
    fn test_primary_keys_are_kept() {
        let mut cursor = people().with_primary_keys([0]);
        let rows = BufferedRows::new(&mut cursor, None).unwrap();
        assert!(rows.is_primary_key(0));
        assert!(!rows.is_primary_key(1));
    }
}
