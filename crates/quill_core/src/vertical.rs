//! Vertical output: one `label  value` line per column, rows separated by a
//! blank line. Handy for wide rows.

use crate::error::QuillResult;
use crate::format::RowFormat;
use crate::row::{cell_width, Row};
use crate::styled::{pad_right, styles};
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct VerticalFormat {
    color: bool,
    label_width: usize,
    rows_written: usize,
}

impl VerticalFormat {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

impl RowFormat for VerticalFormat {
    fn print_header(&mut self, header: &Row, _out: &mut dyn Write) -> QuillResult<()> {
        self.label_width = header
            .values
            .iter()
            .map(|l| cell_width(l.as_deref()))
            .max()
            .unwrap_or(0);
        self.rows_written = 0;
        Ok(())
    }

    fn print_row(&mut self, header: &Row, row: &Row, out: &mut dyn Write) -> QuillResult<()> {
        if self.rows_written > 0 {
            writeln!(out)?;
        }
        let indent = " ".repeat(self.label_width + 2);
        for (i, label) in header.values.iter().enumerate() {
            let label = pad_right(label.as_deref().unwrap_or_default(), self.label_width);
            let label = if self.color {
                styles::header().paint(label).to_string()
            } else {
                label
            };
            let mut lines = row.cell_lines(i).into_iter();
            let first = lines.next().unwrap_or_default();
            writeln!(out, "{}  {}", label, first)?;
            for line in lines {
                writeln!(out, "{}{}", indent, line)?;
            }
        }
        self.rows_written += 1;
        Ok(())
    }
}
