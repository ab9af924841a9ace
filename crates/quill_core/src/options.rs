use crate::error::{QuillError, QuillResult};
use crate::style::TableStyle;
use serde::{Deserialize, Serialize};

/// Formatting options for query results.
///
/// Loaded from the `[display]` section of the config file and adjustable at
/// runtime by name (see [`RenderOptions::set`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// table, csv, tsv, xml, json or vertical.
    pub output_format: String,
    pub csv_delimiter: String,
    /// Quote wrapped around every delimited-text cell (None = no quoting).
    pub csv_quote_character: Option<char>,
    /// Maximum line width (0 = terminal width).
    pub max_width: usize,
    /// Maximum column width (0 = unlimited).
    pub max_column_width: usize,
    /// Re-print the header every N rows (0 = never).
    pub header_interval: usize,
    pub show_header: bool,
    pub color: bool,
    pub table_style: String,
    /// Stream rows as they arrive instead of buffering the whole result.
    pub incremental: bool,
    /// Rows the fetch thread may queue ahead of the renderer.
    pub incremental_buffer_rows: usize,
    /// Text shown for NULL (None = empty cell).
    pub null_value: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_format: "table".to_string(),
            csv_delimiter: ",".to_string(),
            csv_quote_character: Some('\''),
            max_width: 0,
            max_column_width: 50,
            header_interval: 100,
            show_header: true,
            color: false,
            table_style: "default".to_string(),
            incremental: false,
            incremental_buffer_rows: 1000,
            null_value: None,
        }
    }
}

const OPTION_NAMES: &[&str] = &[
    "output_format",
    "csv_delimiter",
    "csv_quote_character",
    "max_width",
    "max_column_width",
    "header_interval",
    "show_header",
    "color",
    "table_style",
    "incremental",
    "incremental_buffer_rows",
    "null_value",
];

/// `maxColumnWidth`, `max-column-width` and `max_column_width` all name the
/// same option.
fn canonical_name(name: &str) -> Option<&'static str> {
    let squashed: String = name
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    OPTION_NAMES
        .iter()
        .copied()
        .find(|n| n.replace('_', "") == squashed)
}

fn parse_bool(option: &str, value: &str) -> QuillResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(QuillError::invalid_option(option, value, "expected true or false")),
    }
}

fn parse_usize(option: &str, value: &str) -> QuillResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| QuillError::invalid_option(option, value, "expected a non-negative number"))
}

impl RenderOptions {
    /// Change one option by name. Values are parsed and validated; the table
    /// style must exist. Output format names are checked when printing.
    pub fn set(&mut self, name: &str, value: &str) -> QuillResult<()> {
        let option = canonical_name(name).ok_or_else(|| QuillError::UnknownOption(name.to_string()))?;
        match option {
            "output_format" => self.output_format = value.trim().to_ascii_lowercase(),
            "csv_delimiter" => {
                if value.is_empty() {
                    return Err(QuillError::invalid_option(option, value, "delimiter cannot be empty"));
                }
                self.csv_delimiter = unescape(value);
            }
            "csv_quote_character" => {
                let value = unescape(value);
                let mut chars = value.chars();
                self.csv_quote_character = match (chars.next(), chars.next()) {
                    (None, _) => None,
                    (Some(c), None) => Some(c),
                    _ => {
                        return Err(QuillError::invalid_option(
                            option,
                            &value,
                            "expected a single character or nothing",
                        ))
                    }
                };
            }
            "max_width" => self.max_width = parse_usize(option, value)?,
            "max_column_width" => self.max_column_width = parse_usize(option, value)?,
            "header_interval" => self.header_interval = parse_usize(option, value)?,
            "show_header" => self.show_header = parse_bool(option, value)?,
            "color" => self.color = parse_bool(option, value)?,
            "table_style" => {
                let style = TableStyle::by_name(value)?;
                self.table_style = style.name.to_string();
            }
            "incremental" => self.incremental = parse_bool(option, value)?,
            "incremental_buffer_rows" => {
                let rows = parse_usize(option, value)?;
                if rows == 0 {
                    return Err(QuillError::invalid_option(option, value, "must be at least 1"));
                }
                self.incremental_buffer_rows = rows;
            }
            "null_value" => {
                self.null_value = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            _ => return Err(QuillError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<String> {
        let option = canonical_name(name)?;
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == option)
            .map(|(_, v)| v)
    }

    /// All options with their current values, in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("output_format", self.output_format.clone()),
            ("csv_delimiter", escape(&self.csv_delimiter)),
            (
                "csv_quote_character",
                self.csv_quote_character.map(|c| c.to_string()).unwrap_or_default(),
            ),
            ("max_width", self.max_width.to_string()),
            ("max_column_width", self.max_column_width.to_string()),
            ("header_interval", self.header_interval.to_string()),
            ("show_header", self.show_header.to_string()),
            ("color", self.color.to_string()),
            ("table_style", self.table_style.clone()),
            ("incremental", self.incremental.to_string()),
            ("incremental_buffer_rows", self.incremental_buffer_rows.to_string()),
            ("null_value", self.null_value.clone().unwrap_or_default()),
        ]
    }
}

/// `\t` typed at the prompt means a tab.
fn unescape(value: &str) -> String {
    match value {
        "\\t" => "\t".to_string(),
        _ => value.to_string(),
    }
}

fn escape(value: &str) -> String {
    value.replace('\t', "\\t")
}
