use crate::runner::Session;
use anyhow::{anyhow, Result};
use quill_core::complete::TABLES;
use quill_core::MemoryCursor;

/// Result of parsing a meta-command line.
#[derive(Debug, PartialEq)]
pub enum MetaCommand {
    Quit,
    Help,
    /// `\set` lists every option, `\set name` shows one, `\set name value`
    /// changes it.
    Set(Option<String>, Option<String>),
    Refresh,
    Tables,
    Unknown(String),
}

pub enum MetaResult {
    Quit,
    Continue,
}

const HELP: &str = "\
General
  \\q                    quit quill
  \\?                    show this help

Display
  \\set                  list display options
  \\set NAME             show one option
  \\set NAME VALUE       change an option (e.g. \\set output_format csv)

Completion
  \\refresh              reload keywords, tables and columns
  \\tables               list the tables known to completion
";

/// Try to parse a line as a meta-command. Returns None if it's not a meta-command.
pub fn parse_meta(line: &str) -> Option<MetaCommand> {
    let trimmed = line.trim().trim_end_matches(';').trim_end();
    let rest = trimmed.strip_prefix('\\')?.trim();
    let (cmd, arg) = rest
        .split_once(char::is_whitespace)
        .map(|(c, a)| (c, a.trim()))
        .unwrap_or((rest, ""));

    Some(match cmd {
        "q" | "quit" => MetaCommand::Quit,
        "?" | "help" => MetaCommand::Help,
        "set" => {
            let (name, value) = arg
                .split_once(char::is_whitespace)
                .map(|(n, v)| (n, Some(v.trim())))
                .unwrap_or((arg, None));
            MetaCommand::Set(
                Some(name).filter(|n| !n.is_empty()).map(str::to_string),
                value.map(unquote).map(str::to_string),
            )
        }
        "refresh" => MetaCommand::Refresh,
        "tables" | "dt" => MetaCommand::Tables,
        other => MetaCommand::Unknown(format!("\\{}", other)),
    })
}

/// `'x'` → `x`, so values with spaces or an empty value can be given.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
}

pub async fn execute_meta(cmd: &MetaCommand, session: &mut Session) -> Result<MetaResult> {
    match cmd {
        MetaCommand::Quit => return Ok(MetaResult::Quit),
        MetaCommand::Help => print!("{}", HELP),
        MetaCommand::Set(None, _) => {
            let mut cursor = MemoryCursor::new(["OPTION", "VALUE"]);
            for (name, value) in session.options.entries() {
                cursor.push(vec![Some(name.to_string()), Some(value)]);
            }
            session.render(Box::new(cursor)).await?;
        }
        MetaCommand::Set(Some(name), None) => {
            let value = session
                .options
                .get(name)
                .ok_or_else(|| anyhow!("Unknown option: {}", name))?;
            println!("{} = {}", name, value);
        }
        MetaCommand::Set(Some(name), Some(value)) => {
            session.options.set(name, value)?;
        }
        MetaCommand::Refresh => {
            let terms = session.refresh_candidates().await;
            println!("{} completion terms loaded.", terms);
        }
        MetaCommand::Tables => {
            let tables: Vec<String> = session
                .candidates
                .read()
                .get(TABLES)
                .map(|t| t.iter().cloned().collect())
                .unwrap_or_default();
            let mut cursor = MemoryCursor::new(["TABLE_NAME"]);
            for table in tables {
                cursor.push(vec![Some(table)]);
            }
            session.render(Box::new(cursor)).await?;
        }
        MetaCommand::Unknown(name) => {
            eprintln!("Unknown command: {} (try \\? for help)", name);
        }
    }
    Ok(MetaResult::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_meta() {
        assert_eq!(parse_meta("SELECT 1;"), None);
        assert_eq!(parse_meta(""), None);
    }

    #[test]
    fn test_quit_and_help() {
        assert_eq!(parse_meta("\\q"), Some(MetaCommand::Quit));
        assert_eq!(parse_meta("  \\quit  "), Some(MetaCommand::Quit));
        assert_eq!(parse_meta("\\?"), Some(MetaCommand::Help));
    }

    #[test]
    fn test_set_forms() {
        assert_eq!(parse_meta("\\set"), Some(MetaCommand::Set(None, None)));
        assert_eq!(
            parse_meta("\\set color"),
            Some(MetaCommand::Set(Some("color".into()), None))
        );
        assert_eq!(
            parse_meta("\\set output_format csv;"),
            Some(MetaCommand::Set(
                Some("output_format".into()),
                Some("csv".into())
            ))
        );
        assert_eq!(
            parse_meta("\\set null_value '(null value)'"),
            Some(MetaCommand::Set(
                Some("null_value".into()),
                Some("(null value)".into())
            ))
        );
        assert_eq!(
            parse_meta("\\set null_value ''"),
            Some(MetaCommand::Set(Some("null_value".into()), Some("".into())))
        );
    }

    #[test]
    fn test_refresh_tables_unknown() {
        assert_eq!(parse_meta("\\refresh"), Some(MetaCommand::Refresh));
        assert_eq!(parse_meta("\\tables"), Some(MetaCommand::Tables));
        assert_eq!(parse_meta("\\dt"), Some(MetaCommand::Tables));
        assert_eq!(
            parse_meta("\\frobnicate"),
            Some(MetaCommand::Unknown("\\frobnicate".into()))
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        for cmd in ["\\q", "\\?", "\\set", "\\refresh", "\\tables"] {
            assert!(HELP.contains(cmd), "{cmd}");
        }
    }
}
