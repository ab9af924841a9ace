//! Row model shared by every renderer.

use crate::styled::text_width;

/// One result row: cell values plus presentation flags.
///
/// `sizes` starts out as the display width of each cell and is overwritten
/// by width normalization with the final column widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub values: Vec<Option<String>>,
    pub sizes: Vec<usize>,
    pub is_header: bool,
    pub inserted: bool,
    pub updated: bool,
    pub deleted: bool,
}

impl Row {
    /// Column-label row.
    pub fn header<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        let values: Vec<Option<String>> = labels.into_iter().map(|l| Some(l.into())).collect();
        let mut row = Self::from_values(values);
        row.is_header = true;
        row
    }

    pub fn data(values: Vec<Option<String>>) -> Self {
        Self::from_values(values)
    }

    fn from_values(values: Vec<Option<String>>) -> Self {
        let sizes = values.iter().map(|v| cell_width(v.as_deref())).collect();
        Self {
            values,
            sizes,
            is_header: false,
            inserted: false,
            updated: false,
            deleted: false,
        }
    }

    pub fn with_inserted(mut self, inserted: bool) -> Self {
        self.inserted = inserted;
        self
    }

    pub fn with_updated(mut self, updated: bool) -> Self {
        self.updated = updated;
        self
    }

    pub fn with_deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Force the row to exactly `columns` cells: missing cells become null,
    /// surplus cells are dropped.
    pub fn fit_columns(&mut self, columns: usize) {
        self.values.resize(columns, None);
        self.sizes.resize(columns, 0);
    }

    /// Replace null cells with `null_value`.
    pub fn fill_nulls(&mut self, null_value: &str) {
        for (value, size) in self.values.iter_mut().zip(self.sizes.iter_mut()) {
            if value.is_none() {
                *size = cell_width(Some(null_value));
                *value = Some(null_value.to_string());
            }
        }
    }

    /// The display lines of cell `i`. Null and empty cells have one empty
    /// line; a trailing line break does not start a new line.
    pub fn cell_lines(&self, i: usize) -> Vec<&str> {
        match self.values.get(i).and_then(|v| v.as_deref()) {
            None | Some("") => vec![""],
            Some(v) => v.lines().collect(),
        }
    }

    /// Number of output lines this row needs (max lines over its cells).
    pub fn line_count(&self) -> usize {
        (0..self.values.len())
            .map(|i| self.cell_lines(i).len())
            .max()
            .unwrap_or(1)
            .max(1)
    }
}

/// Display width of a cell: the widest of its lines.
pub fn cell_width(value: Option<&str>) -> usize {
    match value {
        None => 0,
        Some(v) => v.lines().map(text_width).max().unwrap_or(0),
    }
}

/// Set every column of every row to the widest cell of that column, capped
/// at `max_column_width` (0 disables the cap).
pub fn normalize_widths(rows: &mut [Row], max_column_width: usize) {
    let columns = rows.iter().map(Row::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows.iter() {
        for (i, size) in row.sizes.iter().enumerate() {
            widths[i] = widths[i].max(*size);
        }
    }
    if max_column_width > 0 {
        for w in widths.iter_mut() {
            *w = (*w).min(max_column_width);
        }
    }
    for row in rows.iter_mut() {
        row.sizes = widths[..row.len()].to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(cells: &[Option<&str>]) -> Row {
        Row::data(cells.iter().map(|c| c.map(str::to_string)).collect())
    }

    #[test]
    fn test_header_row_flags_and_sizes() {
        let row = Row::header(["ID", "NAME"]);
        assert!(row.is_header);
        assert_eq!(row.sizes, vec![2, 4]);
    }

    #[test]
    fn test_null_cell_has_zero_width() {
        let row = data(&[None, Some("abc")]);
        assert_eq!(row.sizes, vec![0, 3]);
    }

    #[test]
    fn test_multiline_cell_width_is_widest_line() {
        let row = data(&[Some("ab\nabcdef\nabc")]);
        assert_eq!(row.sizes, vec![6]);
        assert_eq!(row.line_count(), 3);
    }

    #[test]
    fn test_wide_chars_measured_by_display_width() {
        let row = data(&[Some("日本")]);
        assert_eq!(row.sizes, vec![4]);
    }

    #[test]
    fn test_cell_lines_trailing_newline() {
        let row = data(&[Some("abc\n"), None]);
        assert_eq!(row.cell_lines(0), vec!["abc"]);
        assert_eq!(row.cell_lines(1), vec![""]);
        assert_eq!(row.line_count(), 1);
    }

    #[test]
    fn test_normalize_widths_takes_column_max() {
        let mut rows = vec![
            Row::header(["ID", "NAME"]),
            data(&[Some("1"), Some("Alice")]),
            data(&[Some("100"), Some("Bob")]),
        ];
        normalize_widths(&mut rows, 0);
        for row in &rows {
            assert_eq!(row.sizes, vec![3, 5]);
        }
    }

    #[test]
    fn test_normalize_widths_respects_cap() {
        let mut rows = vec![
            Row::header(["DESCRIPTION"]),
            data(&[Some("a rather long description")]),
        ];
        normalize_widths(&mut rows, 8);
        assert_eq!(rows[0].sizes, vec![8]);
        assert_eq!(rows[1].sizes, vec![8]);
    }

    #[test]
    fn test_fit_columns_pads_and_cuts() {
        let mut short = data(&[Some("a")]);
        short.fit_columns(3);
        assert_eq!(short.values, vec![Some("a".to_string()), None, None]);
        assert_eq!(short.sizes.len(), 3);

        let mut long = data(&[Some("a"), Some("b"), Some("c")]);
        long.fit_columns(2);
        assert_eq!(long.len(), 2);
    }

    #[test]
    fn test_fill_nulls() {
        let mut row = data(&[None, Some("x")]);
        row.fill_nulls("NULL");
        assert_eq!(row.values[0].as_deref(), Some("NULL"));
        assert_eq!(row.sizes, vec![4, 1]);
    }
}
