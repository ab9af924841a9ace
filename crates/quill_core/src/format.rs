//! Output format selection and the shared row-printing loop.

use crate::cancel::CancelSignal;
use crate::error::{QuillError, QuillResult};
use crate::incremental::IncrementalRows;
use crate::json::JsonFormat;
use crate::options::RenderOptions;
use crate::row::Row;
use crate::rows::{BufferedRows, ResultCursor, RowSource};
use crate::separated::SeparatedValuesFormat;
use crate::table::TableRenderer;
use crate::vertical::VerticalFormat;
use crate::xml::XmlAttributeFormat;
use std::io::Write;
use tracing::debug;

/// Hooks of a line-oriented output format. The header row is handed to
/// every hook so formats can label their output.
pub trait RowFormat {
    fn print_header(&mut self, header: &Row, out: &mut dyn Write) -> QuillResult<()>;

    fn print_row(&mut self, header: &Row, row: &Row, out: &mut dyn Write) -> QuillResult<()>;

    fn print_footer(&mut self, _header: &Row, _out: &mut dyn Write) -> QuillResult<()> {
        Ok(())
    }
}

/// Feed every row of `rows` through `format`. Returns the number of data
/// rows printed.
pub fn drive(
    format: &mut dyn RowFormat,
    rows: &mut dyn RowSource,
    out: &mut dyn Write,
) -> QuillResult<usize> {
    let mut header: Option<Row> = None;
    let mut count = 0;
    while rows.has_next()? {
        let row = rows.next_row()?;
        match &header {
            None => {
                format.print_header(&row, out)?;
                header = Some(row);
            }
            Some(h) => {
                format.print_row(h, &row, out)?;
                count += 1;
            }
        }
    }
    if let Some(h) = &header {
        format.print_footer(h, out)?;
    }
    out.flush()?;
    Ok(count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatKind {
    Table,
    Csv,
    Tsv,
    Xml,
    Json,
    Vertical,
}

impl OutputFormatKind {
    pub const NAMES: &'static [&'static str] =
        &["table", "csv", "tsv", "xml", "xmlattr", "json", "vertical"];

    pub fn parse(name: &str) -> QuillResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormatKind::Table),
            "csv" => Ok(OutputFormatKind::Csv),
            "tsv" => Ok(OutputFormatKind::Tsv),
            "xml" | "xmlattr" => Ok(OutputFormatKind::Xml),
            "json" => Ok(OutputFormatKind::Json),
            "vertical" => Ok(OutputFormatKind::Vertical),
            _ => Err(QuillError::UnknownFormat {
                name: name.to_string(),
                known: Self::NAMES.join(", "),
            }),
        }
    }
}

/// A ready-to-use renderer for one output format.
#[derive(Debug, Clone)]
pub enum Renderer {
    Table(TableRenderer),
    Separated(SeparatedValuesFormat),
    Xml(XmlAttributeFormat),
    Json(JsonFormat),
    Vertical(VerticalFormat),
}

impl Renderer {
    pub fn build(
        kind: OutputFormatKind,
        opts: &RenderOptions,
        terminal_width: usize,
    ) -> QuillResult<Self> {
        Ok(match kind {
            OutputFormatKind::Table => Renderer::Table(TableRenderer::new(opts, terminal_width)?),
            OutputFormatKind::Csv => Renderer::Separated(SeparatedValuesFormat::new(
                opts.csv_delimiter.clone(),
                opts.csv_quote_character,
                opts.show_header,
            )),
            OutputFormatKind::Tsv => Renderer::Separated(SeparatedValuesFormat::tsv(opts.show_header)),
            OutputFormatKind::Xml => Renderer::Xml(XmlAttributeFormat),
            OutputFormatKind::Json => Renderer::Json(JsonFormat::default()),
            OutputFormatKind::Vertical => Renderer::Vertical(VerticalFormat::new(opts.color)),
        })
    }

    pub fn print(&mut self, rows: &mut dyn RowSource, out: &mut dyn Write) -> QuillResult<usize> {
        match self {
            Renderer::Table(t) => t.print(rows, out),
            Renderer::Separated(f) => drive(f, rows, out),
            Renderer::Xml(f) => drive(f, rows, out),
            Renderer::Json(f) => drive(f, rows, out),
            Renderer::Vertical(f) => drive(f, rows, out),
        }
    }
}

/// Prints query results in the configured format.
///
/// The renderer built for the last `(options, terminal width)` pair is kept
/// and reused until either changes.
#[derive(Debug, Default)]
pub struct OutputFormatter {
    cached: Option<(RenderOptions, usize, Renderer)>,
    builds: usize,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `cursor` to `out`. An unknown format name is reported on `warn`
    /// and the table format is used instead. Returns the number of data rows
    /// printed.
    pub fn print(
        &mut self,
        opts: &RenderOptions,
        terminal_width: usize,
        mut cursor: Box<dyn ResultCursor>,
        cancel: CancelSignal,
        out: &mut dyn Write,
        warn: &mut dyn Write,
    ) -> QuillResult<usize> {
        let kind = match OutputFormatKind::parse(&opts.output_format) {
            Ok(kind) => kind,
            Err(e) => {
                writeln!(warn, "Warning: {}; using table", e)?;
                OutputFormatKind::Table
            }
        };
        let renderer = self.renderer(kind, opts, terminal_width)?;

        if opts.incremental {
            let mut rows = IncrementalRows::start(
                cursor,
                opts.incremental_buffer_rows,
                cancel,
                opts.null_value.clone(),
            )?;
            renderer.print(&mut rows, out)
        } else {
            let mut rows = BufferedRows::new(cursor.as_mut(), opts.null_value.as_deref())?;
            if cancel.is_cancelled() {
                debug!("cancelled while buffering; nothing printed");
                return Ok(0);
            }
            renderer.print(&mut rows, out)
        }
    }

    fn renderer(
        &mut self,
        kind: OutputFormatKind,
        opts: &RenderOptions,
        terminal_width: usize,
    ) -> QuillResult<&mut Renderer> {
        let cached = match self.cached.take() {
            Some((cached_opts, width, renderer))
                if cached_opts == *opts && width == terminal_width =>
            {
                (cached_opts, width, renderer)
            }
            _ => {
                let renderer = Renderer::build(kind, opts, terminal_width)?;
                debug!("built {:?} renderer", kind);
                self.builds += 1;
                (opts.clone(), terminal_width, renderer)
            }
        };
        let (_, _, renderer) = self.cached.insert(cached);
        Ok(renderer)
    }
}
