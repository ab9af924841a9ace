//! XML output: one `<result>` element per row, one attribute per column.

use crate::error::QuillResult;
use crate::format::RowFormat;
use crate::row::Row;
use std::io::Write;

/// Characters left as-is inside double-quoted attribute values.
const ALLOWED_UNESCAPED: &str = "'>";

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlAttributeFormat;

impl RowFormat for XmlAttributeFormat {
    fn print_header(&mut self, _header: &Row, out: &mut dyn Write) -> QuillResult<()> {
        writeln!(out, "<resultset>")?;
        Ok(())
    }

    fn print_row(&mut self, header: &Row, row: &Row, out: &mut dyn Write) -> QuillResult<()> {
        let mut line = String::from("  <result");
        let mut seen: Vec<String> = Vec::with_capacity(header.len());
        for (label, value) in header.values.iter().zip(row.values.iter()) {
            let mut name = xml_name(label.as_deref().unwrap_or_default());
            if seen.contains(&name) {
                let base = name.clone();
                let mut n = 2;
                while seen.contains(&name) {
                    name = format!("{base}_{n}");
                    n += 1;
                }
            }
            line.push(' ');
            line.push_str(&name);
            seen.push(name);
            line.push_str("=\"");
            line.push_str(&xml_encode(value.as_deref().unwrap_or_default(), ALLOWED_UNESCAPED));
            line.push('"');
        }
        line.push_str("/>");
        writeln!(out, "{}", line)?;
        Ok(())
    }

    fn print_footer(&mut self, _header: &Row, out: &mut dyn Write) -> QuillResult<()> {
        writeln!(out, "</resultset>")?;
        Ok(())
    }
}

/// A well-formed attribute name for the column label `label`. Characters
/// outside letters, digits, `_`, `-` and `.` become `_`, and a name that is
/// empty or does not start with a letter or `_` gets a leading `_`.
pub fn xml_name(label: &str) -> String {
    let mut name: String = label
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if !name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        name.insert(0, '_');
    }
    name
}

/// Escape the XML special characters of `value`, except those listed in
/// `allowed`.
pub fn xml_encode(value: &str, allowed: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if allowed.contains(c) {
            out.push(c);
            continue;
        }
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::drive;
    use crate::rows::{BufferedRows, MemoryCursor};

    #[test]
    fn test_xml_encode_all() {
        assert_eq!(xml_encode(r#"<a href="x">&'"#, ""), "&lt;a href=&quot;x&quot;&gt;&amp;&apos;");
    }

    #[test]
    fn test_xml_encode_allow_list() {
        assert_eq!(xml_encode("a & b > 'c' < \"d\"", ALLOWED_UNESCAPED), "a &amp; b > 'c' &lt; &quot;d&quot;");
    }

    #[test]
    fn test_resultset_document() {
        let mut cursor = MemoryCursor::new(["ID", "NOTE"]);
        cursor.push(vec![Some("1".into()), Some("Tom & \"Jerry\" <3".into())]);
        cursor.push(vec![Some("2".into()), None]);
        let mut rows = BufferedRows::new(&mut cursor, None).unwrap();
        let mut out = Vec::new();
        let n = drive(&mut XmlAttributeFormat, &mut rows, &mut out).unwrap();
        assert_eq!(n, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "<resultset>",
                r#"  <result ID="1" NOTE="Tom &amp; &quot;Jerry&quot; &lt;3"/>"#,
                r#"  <result ID="2" NOTE=""/>"#,
                "</resultset>",
            ]
        );
    }

    #[test]
    fn test_xml_name() {
        assert_eq!(xml_name("order_id"), "order_id");
        assert_eq!(xml_name("count(*)"), "count___");
        assert_eq!(xml_name("first name"), "first_name");
        assert_eq!(xml_name("?column?"), "_column_");
        assert_eq!(xml_name("1st"), "_1st");
        assert_eq!(xml_name(""), "_");
    }

    #[test]
    fn test_labels_become_unique_attribute_names() {
        let mut cursor = MemoryCursor::new(["count(*)", "count(*)", "a\"b"]);
        cursor.push(vec![Some("1".into()), Some("2".into()), Some("3".into())]);
        let mut rows = BufferedRows::new(&mut cursor, None).unwrap();
        let mut out = Vec::new();
        drive(&mut XmlAttributeFormat, &mut rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().nth(1),
            Some(r#"  <result count___="1" count____2="2" a_b="3"/>"#)
        );
    }

    #[test]
    fn test_empty_result_still_wrapped() {
        let mut cursor = MemoryCursor::new(["ID"]);
        let mut rows = BufferedRows::new(&mut cursor, None).unwrap();
        let mut out = Vec::new();
        drive(&mut XmlAttributeFormat, &mut rows, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<resultset>\n</resultset>\n");
    }
}
