//! Result rendering and completion for the quill SQL shell.
//!
//! - `OutputFormatter`: prints a query result as table, csv, tsv, xml, json
//!   or vertical text
//! - `BufferedRows` / `IncrementalRows`: row sources over a `ResultCursor`
//! - `build_candidates` / `complete_buffer`: tab completion over keywords,
//!   functions and schema metadata
//! - `SqlScanner`: statement splitting and completeness checks

pub mod cancel;
pub mod complete;
pub mod error;
pub mod format;
pub mod incremental;
pub mod json;
pub mod keywords;
pub mod options;
pub mod row;
pub mod rows;
pub mod separated;
pub mod splitter;
pub mod style;
pub mod styled;
pub mod table;
pub mod vertical;
pub mod xml;

pub use cancel::CancelSignal;
pub use complete::{build_candidates, complete_buffer, CandidateSet, MetadataProvider};
pub use error::{MetadataError, QuillError, QuillResult};
pub use format::{OutputFormatKind, OutputFormatter, Renderer, RowFormat};
pub use incremental::IncrementalRows;
pub use options::RenderOptions;
pub use row::Row;
pub use rows::{BufferedRows, MemoryCursor, ResultCursor, RowSource};
pub use splitter::{split_statements, MissingToken, ParseOutcome, SqlScanner, StatementParser};
pub use style::TableStyle;
pub use table::TableRenderer;
