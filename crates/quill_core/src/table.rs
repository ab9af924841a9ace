//! Box-drawn table output.
//!
//! Every row becomes one line per wrap segment: a cell with embedded line
//! breaks spans several output lines, each bordered on its own. Cells are
//! clipped, never re-flowed, once a line runs out of room.

use crate::error::QuillResult;
use crate::options::RenderOptions;
use crate::row::Row;
use crate::rows::RowSource;
use crate::style::{LineType, TableStyle};
use crate::styled::{center, clip, pad_right, styles, StyledLine};
use nu_ansi_term::Style;
use std::io::Write;

/// Columns reserved for the outer borders and their padding.
const BORDER_ALLOWANCE: usize = 4;

/// Usable line width: `max_width`, or the terminal width when `max_width` is
/// 0, minus the border allowance.
pub fn render_width(max_width: usize, terminal_width: usize) -> usize {
    let total = if max_width == 0 { terminal_width } else { max_width };
    total.saturating_sub(BORDER_ALLOWANCE)
}

#[derive(Debug, Clone)]
pub struct TableRenderer {
    style: &'static TableStyle,
    width: usize,
    max_column_width: usize,
    header_interval: usize,
    show_header: bool,
    color: bool,
}

/// Border lines computed from the header row's widths.
struct Borders {
    top: String,
    divider: String,
    header_bottom: String,
    body_bottom: String,
}

impl TableRenderer {
    pub fn new(opts: &RenderOptions, terminal_width: usize) -> QuillResult<Self> {
        Ok(Self {
            style: TableStyle::by_name(&opts.table_style)?,
            width: render_width(opts.max_width, terminal_width),
            max_column_width: opts.max_column_width,
            header_interval: opts.header_interval,
            show_header: opts.show_header,
            color: opts.color,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render every row of `rows` and return the number of data rows.
    pub fn print(&self, rows: &mut dyn RowSource, out: &mut dyn Write) -> QuillResult<usize> {
        rows.normalize_widths(self.max_column_width);

        let mut index = 0usize;
        let mut header_lines: Vec<StyledLine> = Vec::new();
        let mut borders: Option<Borders> = None;

        while rows.has_next()? {
            let row = rows.next_row()?;
            let lines = self.row_lines(&*rows, &row, index == 0);

            if index == 0 {
                header_lines = lines;
                if self.show_header {
                    borders = Some(self.borders(&row, &header_lines));
                    if let Some(b) = &borders {
                        self.emit_border(out, &b.top)?;
                    }
                    self.emit_lines(out, &header_lines)?;
                }
                index += 1;
                continue;
            }

            if let Some(b) = &borders {
                if index == 1 {
                    self.emit_border(out, &b.divider)?;
                } else if self.header_interval > 0 && index % self.header_interval == 0 {
                    self.emit_border(out, &b.divider)?;
                    self.emit_lines(out, &header_lines)?;
                }
            }
            self.emit_lines(out, &lines)?;
            index += 1;
        }

        if let Some(b) = &borders {
            let closing = if index > 1 { &b.body_bottom } else { &b.header_bottom };
            self.emit_border(out, closing)?;
        }
        out.flush()?;
        Ok(index.saturating_sub(1))
    }

    fn borders(&self, header: &Row, header_lines: &[StyledLine]) -> Borders {
        let limit = header_lines.first().map(StyledLine::width).unwrap_or(0);
        let build = |line_type| {
            let border = self.border_line(&header.sizes, line_type);
            clip(&border, limit).to_string()
        };
        Borders {
            top: build(LineType::HeaderTop),
            divider: build(LineType::HeaderBody),
            header_bottom: build(LineType::HeaderBottom),
            body_bottom: build(LineType::BodyBottom),
        }
    }

    /// `left`, then per column an optional cross and `width + 2` line glyphs,
    /// stopping once the line reaches the render width; always closed by
    /// `right`.
    fn border_line(&self, sizes: &[usize], line_type: LineType) -> String {
        let glyphs = line_type.glyphs(self.style);
        let width = self.width as isize;
        let mut line = vec![glyphs.left];
        for (j, size) in sizes.iter().enumerate() {
            if j != 0 {
                line.push(glyphs.cross);
            }
            line.push(glyphs.line);
            let run = (width - 2 - line.len() as isize).min(*size as isize);
            line.extend(std::iter::repeat(glyphs.line).take(run.max(0) as usize));
            line.push(glyphs.line);
            if line.len() as isize >= width - 1 {
                break;
            }
        }
        line.push(glyphs.right);
        line.into_iter().collect()
    }

    fn row_lines(&self, rows: &dyn RowSource, row: &Row, header: bool) -> Vec<StyledLine> {
        let separator = if header {
            self.style.header_separator
        } else {
            self.style.body_separator
        }
        .to_string();

        let cells: Vec<Vec<&str>> = (0..row.len()).map(|i| row.cell_lines(i)).collect();
        let segments = row.line_count();
        let mut out = Vec::with_capacity(segments);

        for segment in 0..segments {
            let mut line = StyledLine::new();
            for (i, lines) in cells.iter().enumerate() {
                if i > 0 {
                    line.push_plain(" ");
                }
                line.push(separator.as_str(), styles::border());
                line.push_plain(" ");

                let value = lines.get(segment).copied().unwrap_or("");
                let size = row.sizes.get(i).copied().unwrap_or(0);
                let text = if header {
                    center(value, size)
                } else {
                    pad_right(value, size)
                };
                let cell_style = if rows.is_primary_key(i) {
                    styles::primary_key()
                } else if header {
                    styles::header()
                } else {
                    Style::default()
                };

                let room = (self.width + 2).saturating_sub(line.width());
                let clipped = clip(&text, room);
                let overflow = clipped.len() < text.len();
                line.push(clipped, cell_style);
                if overflow {
                    break;
                }
            }
            line.push_plain(" ");
            line.push(separator.as_str(), styles::border());
            line.truncate(self.width + BORDER_ALLOWANCE);

            if row.deleted {
                line.restyle(styles::deleted());
            } else if row.updated {
                line.restyle(styles::updated());
            } else if row.inserted {
                line.restyle(styles::inserted());
            }
            out.push(line);
        }
        out
    }

    fn emit_lines(&self, out: &mut dyn Write, lines: &[StyledLine]) -> QuillResult<()> {
        for line in lines {
            writeln!(out, "{}", line.render(self.color))?;
        }
        Ok(())
    }

    fn emit_border(&self, out: &mut dyn Write, border: &str) -> QuillResult<()> {
        let line = StyledLine::styled(border, styles::border());
        writeln!(out, "{}", line.render(self.color))?;
        Ok(())
    }
}
