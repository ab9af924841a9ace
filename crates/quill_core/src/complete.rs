//! Completion candidates: static keywords merged with what the connection
//! reports about itself and its schema.

use crate::error::MetadataError;
use crate::keywords::DEFAULT_KEYWORDS;
use crate::splitter::{ParseOutcome, StatementParser};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Group label → distinct terms.
pub type CandidateSet = BTreeMap<String, BTreeSet<String>>;

pub const KEYWORDS: &str = "Keywords";
pub const STRING_FUNCTIONS: &str = "String functions";
pub const NUMERIC_FUNCTIONS: &str = "Numeric functions";
pub const SYSTEM_FUNCTIONS: &str = "System functions";
pub const TIME_DATE_FUNCTIONS: &str = "Time date functions";
pub const TABLES: &str = "Tables";

/// What a connection can tell about its SQL dialect and schema. Every
/// lookup may fail on its own; the term lists are comma separated.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn sql_keywords(&self) -> Result<String, MetadataError>;
    async fn string_functions(&self) -> Result<String, MetadataError>;
    async fn numeric_functions(&self) -> Result<String, MetadataError>;
    async fn system_functions(&self) -> Result<String, MetadataError>;
    async fn time_date_functions(&self) -> Result<String, MetadataError>;

    /// Table name → column names.
    async fn table_columns(&self) -> Result<BTreeMap<String, Vec<String>>, MetadataError>;
}

fn split_terms(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn add_group(set: &mut CandidateSet, label: &str, lookup: Result<String, MetadataError>) {
    match lookup {
        Ok(list) => {
            set.insert(label.to_string(), split_terms(&list));
        }
        Err(e) => debug!("{} left out of completion: {}", label, e),
    }
}

/// Build the candidate set for one connection. A failed lookup only drops
/// its own group; the default keywords are always present.
pub async fn build_candidates(provider: &dyn MetadataProvider, include_schema: bool) -> CandidateSet {
    let mut set = CandidateSet::new();
    add_group(&mut set, KEYWORDS, provider.sql_keywords().await);
    add_group(&mut set, STRING_FUNCTIONS, provider.string_functions().await);
    add_group(&mut set, NUMERIC_FUNCTIONS, provider.numeric_functions().await);
    add_group(&mut set, SYSTEM_FUNCTIONS, provider.system_functions().await);
    add_group(&mut set, TIME_DATE_FUNCTIONS, provider.time_date_functions().await);

    if include_schema {
        match provider.table_columns().await {
            Ok(tables) => {
                let names: BTreeSet<String> = tables.keys().cloned().collect();
                for (table, columns) in tables {
                    set.entry(table).or_default().extend(columns);
                }
                set.entry(TABLES.to_string()).or_default().extend(names);
            }
            Err(e) => debug!("schema left out of completion: {}", e),
        }
    }

    set.entry(KEYWORDS.to_string())
        .or_default()
        .extend(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()));
    debug!(
        "{} completion groups, {} terms",
        set.len(),
        set.values().map(BTreeSet::len).sum::<usize>()
    );
    set
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}

/// Candidates for the word ending at byte offset `pos` of `buffer`.
///
/// Returns the start of the replaced word and the matching terms, sorted.
/// Nothing is offered inside an unterminated literal or block comment, or
/// for an empty word. Terms are matched by case-insensitive prefix, falling
/// back to substring matches; `table.col` completes the columns of `table`.
pub fn complete_buffer(
    set: &CandidateSet,
    parser: &dyn StatementParser,
    buffer: &str,
    pos: usize,
) -> (usize, Vec<String>) {
    let mut pos = pos.min(buffer.len());
    while !buffer.is_char_boundary(pos) {
        pos -= 1;
    }
    if let ParseOutcome::Incomplete(missing) = parser.parse(buffer) {
        if missing.suppresses_completion() {
            return (pos, Vec::new());
        }
    }

    let head = &buffer[..pos];
    let start = head
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(pos);
    let word = &head[start..];
    if word.is_empty() {
        return (start, Vec::new());
    }

    if let Some((qualifier, stem)) = word.rsplit_once('.') {
        let columns = set
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(qualifier))
            .map(|(_, terms)| terms.iter().map(String::as_str).collect::<BTreeSet<_>>())
            .unwrap_or_default();
        let matches = match_terms(columns, stem, true);
        return (
            start,
            matches.into_iter().map(|c| format!("{qualifier}.{c}")).collect(),
        );
    }

    let all: BTreeSet<&str> = set.values().flatten().map(String::as_str).collect();
    (start, match_terms(all, word, false))
}

fn match_terms(terms: BTreeSet<&str>, stem: &str, allow_empty: bool) -> Vec<String> {
    if stem.is_empty() {
        return if allow_empty {
            terms.into_iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };
    }
    let needle = stem.to_lowercase();
    let prefixed: Vec<String> = terms
        .iter()
        .filter(|t| t.to_lowercase().starts_with(&needle))
        .map(|t| t.to_string())
        .collect();
    if !prefixed.is_empty() {
        return prefixed;
    }
    terms
        .iter()
        .filter(|t| t.to_lowercase().contains(&needle))
        .map(|t| t.to_string())
        .collect()
}
