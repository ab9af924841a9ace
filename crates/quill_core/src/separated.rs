//! Delimited text output (csv, tsv).

use crate::error::QuillResult;
use crate::format::RowFormat;
use crate::row::Row;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatedValuesFormat {
    pub delimiter: String,
    pub quote: Option<char>,
    pub show_header: bool,
}

impl Default for SeparatedValuesFormat {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            quote: Some('\''),
            show_header: true,
        }
    }
}

impl SeparatedValuesFormat {
    pub fn new(delimiter: impl Into<String>, quote: Option<char>, show_header: bool) -> Self {
        Self {
            delimiter: delimiter.into(),
            quote,
            show_header,
        }
    }

    /// Tab separated, unquoted.
    pub fn tsv(show_header: bool) -> Self {
        Self::new("\t", None, show_header)
    }

    /// One output line for `row`, without the line terminator.
    pub fn format_line(&self, row: &Row) -> String {
        row.values
            .iter()
            .map(|v| match v {
                None => String::new(),
                Some(v) => self.quote_field(v),
            })
            .collect::<Vec<_>>()
            .join(&self.delimiter)
    }

    /// Wrap `value` in the quote character, doubling embedded quotes.
    fn quote_field(&self, value: &str) -> String {
        match self.quote {
            None => value.to_string(),
            Some(q) => {
                let doubled: String = [q, q].iter().collect();
                format!("{q}{}{q}", value.replace(q, &doubled))
            }
        }
    }
}

impl RowFormat for SeparatedValuesFormat {
    fn print_header(&mut self, header: &Row, out: &mut dyn Write) -> QuillResult<()> {
        if self.show_header {
            writeln!(out, "{}", self.format_line(header))?;
        }
        Ok(())
    }

    fn print_row(&mut self, _header: &Row, row: &Row, out: &mut dyn Write) -> QuillResult<()> {
        writeln!(out, "{}", self.format_line(row))?;
        Ok(())
    }
}

/// Decode one line written by [`SeparatedValuesFormat::format_line`].
/// With a quote character, an empty unquoted field is a null. Returns `None`
/// for a malformed line (unclosed quote, text after a closing quote).
pub fn parse_separated_line(
    line: &str,
    delimiter: &str,
    quote: Option<char>,
) -> Option<Vec<Option<String>>> {
    if delimiter.is_empty() {
        return None;
    }
    let Some(q) = quote else {
        return Some(line.split(delimiter).map(|f| Some(f.to_string())).collect());
    };

    let mut fields = Vec::new();
    let mut rest = line;
    loop {
        if let Some(body) = rest.strip_prefix(q) {
            let mut field = String::new();
            let mut chars = body.char_indices().peekable();
            let mut end = None;
            while let Some((idx, c)) = chars.next() {
                if c != q {
                    field.push(c);
                    continue;
                }
                // doubled quote
                if matches!(chars.peek(), Some((_, next)) if *next == q) {
                    chars.next();
                    field.push(q);
                } else {
                    end = Some(idx + c.len_utf8());
                    break;
                }
            }
            fields.push(Some(field));
            rest = &body[end?..];
            if rest.is_empty() {
                return Some(fields);
            }
            rest = rest.strip_prefix(delimiter)?;
        } else {
            match rest.find(delimiter) {
                Some(pos) => {
                    fields.push(unquoted(&rest[..pos]));
                    rest = &rest[pos + delimiter.len()..];
                }
                None => {
                    fields.push(unquoted(rest));
                    return Some(fields);
                }
            }
        }
    }
}

fn unquoted(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}
