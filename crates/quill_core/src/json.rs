//! JSON output: `{"resultset":[...]}` with one object per row.

use crate::error::QuillResult;
use crate::format::RowFormat;
use crate::row::Row;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
    rows_written: usize,
}

/// A row keyed by the header labels, in column order.
struct LabeledRow<'a> {
    header: &'a Row,
    row: &'a Row,
}

impl Serialize for LabeledRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.header.len()))?;
        for (label, value) in self.header.values.iter().zip(self.row.values.iter()) {
            map.serialize_entry(label.as_deref().unwrap_or_default(), value)?;
        }
        map.end()
    }
}

impl RowFormat for JsonFormat {
    fn print_header(&mut self, _header: &Row, out: &mut dyn Write) -> QuillResult<()> {
        self.rows_written = 0;
        write!(out, "{{\"resultset\":[")?;
        Ok(())
    }

    fn print_row(&mut self, header: &Row, row: &Row, out: &mut dyn Write) -> QuillResult<()> {
        let lead = if self.rows_written == 0 { "\n  " } else { ",\n  " };
        out.write_all(lead.as_bytes())?;
        serde_json::to_writer(&mut *out, &LabeledRow { header, row }).map_err(io::Error::from)?;
        self.rows_written += 1;
        Ok(())
    }

    fn print_footer(&mut self, _header: &Row, out: &mut dyn Write) -> QuillResult<()> {
        writeln!(out, "\n]}}")?;
        Ok(())
    }
}
