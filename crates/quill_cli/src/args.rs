use clap::Parser;
use quill_core::{QuillResult, RenderOptions};
use std::path::PathBuf;

/// quill: interactive SQL shell
#[derive(Debug, Parser)]
#[command(
    name = "quill",
    about = "Interactive SQL shell with table, csv, xml and json output",
    version,
    disable_help_flag = true
)]
pub struct Args {
    /// Print help (`-h` is the host)
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,

    /// Database host
    #[arg(short = 'h', long, env = "PGHOST", default_value = "localhost")]
    pub host: String,

    /// Database port
    #[arg(short = 'p', long, env = "PGPORT", default_value_t = 5432)]
    pub port: u16,

    /// Database user
    #[arg(short = 'U', long, env = "PGUSER", default_value = "postgres")]
    pub user: String,

    /// Database name
    #[arg(short = 'd', long, env = "PGDATABASE", default_value = "postgres")]
    pub dbname: String,

    /// Password (use PGPASSWORD env var to keep it off the command line)
    #[arg(short = 'W', long, env = "PGPASSWORD")]
    pub password: Option<String>,

    /// Execute the given SQL and exit
    #[arg(short = 'e', long)]
    pub execute: Option<String>,

    /// Execute SQL from a file and exit
    #[arg(short = 'f', long)]
    pub file: Option<String>,

    /// Config file (default: ~/.quillrc)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub print_default_config: bool,

    /// Output format: table, csv, tsv, xml, json, vertical
    #[arg(long = "format", value_name = "FORMAT")]
    pub output_format: Option<String>,

    /// Table style: default, solid, heavy, double, rounded
    #[arg(long)]
    pub table_style: Option<String>,

    /// Maximum line width (0 = terminal width)
    #[arg(long)]
    pub max_width: Option<usize>,

    /// Maximum column width (0 = unlimited)
    #[arg(long)]
    pub max_column_width: Option<usize>,

    /// Colorize table output
    #[arg(long)]
    pub color: bool,

    /// Tuples only: suppress column headers and summaries
    #[arg(short = 't', long)]
    pub tuples_only: bool,

    /// Stream rows as they arrive instead of buffering the result
    #[arg(long)]
    pub incremental: bool,

    /// Text shown for NULL values
    #[arg(long)]
    pub null_value: Option<String>,

    /// Do not load table and column names for completion
    #[arg(long)]
    pub skip_schema: bool,

    /// Stop a script at the first failing statement
    #[arg(long)]
    pub on_error_stop: bool,
}

impl Args {
    /// Command-line formatting flags override the config file.
    pub fn apply_to(&self, opts: &mut RenderOptions) -> QuillResult<()> {
        if let Some(format) = &self.output_format {
            opts.set("output_format", format)?;
        }
        if let Some(style) = &self.table_style {
            opts.set("table_style", style)?;
        }
        if let Some(width) = self.max_width {
            opts.max_width = width;
        }
        if let Some(width) = self.max_column_width {
            opts.max_column_width = width;
        }
        if self.color {
            opts.color = true;
        }
        if self.tuples_only {
            opts.show_header = false;
        }
        if self.incremental {
            opts.incremental = true;
        }
        if let Some(nv) = &self.null_value {
            opts.set("null_value", nv)?;
        }
        Ok(())
    }
}
