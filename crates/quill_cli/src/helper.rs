use parking_lot::{Mutex, RwLock};
use quill_core::{complete_buffer, CandidateSet, SqlScanner};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::sync::Arc;
use tracing::debug;

/// Meta-commands offered when the word starts with a backslash.
static META_COMMANDS: &[&str] = &["\\q", "\\?", "\\set", "\\refresh", "\\tables"];

/// rustyline Helper completing SQL terms from the connection's candidate
/// set, and meta-commands.
///
/// rustyline only hands over the line being edited. `pending` holds the
/// statement text entered on earlier lines so that a literal or comment
/// opened there still suppresses completion.
pub struct QuillHelper {
    candidates: Arc<RwLock<CandidateSet>>,
    pending: Arc<Mutex<String>>,
    parser: SqlScanner,
}

impl QuillHelper {
    pub fn new(candidates: Arc<RwLock<CandidateSet>>, pending: Arc<Mutex<String>>) -> Self {
        Self {
            candidates,
            pending,
            parser: SqlScanner,
        }
    }
}

fn pair(term: String) -> Pair {
    Pair {
        display: term.clone(),
        replacement: term,
    }
}

impl Completer for QuillHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = line.get(..pos).unwrap_or(line);
        let word_start = prefix
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &prefix[word_start..];

        let pending = self.pending.lock();
        if pending.is_empty() && word_start == 0 && word.starts_with('\\') {
            let lower = word.to_lowercase();
            let candidates = META_COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(&lower))
                .map(|cmd| pair(cmd.to_string()))
                .collect();
            return Ok((0, candidates));
        }

        let set = self.candidates.read();
        let (start, terms) = if pending.is_empty() {
            complete_buffer(&set, &self.parser, line, pos)
        } else {
            // words never span a newline, so the start maps back into `line`
            let buffer = format!("{}\n{}", pending, line);
            let offset = pending.len() + 1;
            let (start, terms) = complete_buffer(&set, &self.parser, &buffer, offset + pos);
            (start.saturating_sub(offset), terms)
        };
        debug!("Completing at {}: {} candidates", start, terms.len());
        Ok((start, terms.into_iter().map(pair).collect()))
    }
}

impl Hinter for QuillHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for QuillHelper {}
impl Validator for QuillHelper {}
impl Helper for QuillHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::complete::{KEYWORDS, TABLES};
    use rustyline::history::DefaultHistory;
    use std::collections::BTreeSet;

    fn helper() -> QuillHelper {
        let mut set = CandidateSet::new();
        set.insert(
            KEYWORDS.into(),
            BTreeSet::from(["SELECT".to_string(), "FROM".to_string()]),
        );
        set.insert(TABLES.into(), BTreeSet::from(["orders".to_string()]));
        set.insert(
            "orders".into(),
            BTreeSet::from(["order_id".to_string(), "total".to_string()]),
        );
        QuillHelper::new(Arc::new(RwLock::new(set)), Arc::default())
    }

    #[test]
    fn test_complete_keyword() {
        let helper = helper();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, candidates) = helper.complete("sel", 3, &ctx).unwrap();
        assert_eq!(start, 0);
        assert!(candidates.iter().any(|c| c.replacement == "SELECT"));
    }

    #[test]
    fn test_complete_mid_line_word() {
        let helper = helper();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, candidates) = helper.complete("SELECT * FRO", 12, &ctx).unwrap();
        assert_eq!(start, 9);
        assert!(candidates.iter().any(|c| c.replacement == "FROM"));
    }

    #[test]
    fn test_complete_meta_command() {
        let helper = helper();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, candidates) = helper.complete("\\re", 3, &ctx).unwrap();
        assert_eq!(start, 0);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].replacement, "\\refresh");

        let (_, candidates) = helper.complete("\\", 1, &ctx).unwrap();
        assert_eq!(candidates.len(), META_COMMANDS.len());
    }

    #[test]
    fn test_refreshed_candidates_are_seen() {
        let helper = helper();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        assert!(helper.complete("cust", 4, &ctx).unwrap().1.is_empty());
        helper
            .candidates
            .write()
            .insert(TABLES.into(), BTreeSet::from(["customers".to_string()]));
        let (_, candidates) = helper.complete("cust", 4, &ctx).unwrap();
        assert_eq!(candidates[0].replacement, "customers");
    }

    #[test]
    fn test_no_completion_inside_literal() {
        let helper = helper();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (_, candidates) = helper.complete("SELECT 'ord", 11, &ctx).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_no_completion_inside_literal_from_earlier_line() {
        let helper = helper();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        *helper.pending.lock() = "SELECT 'abc".to_string();
        let (_, candidates) = helper.complete("def WHE", 7, &ctx).unwrap();
        assert!(candidates.is_empty());
        let (_, candidates) = helper.complete("ord", 3, &ctx).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_complete_continuation_line() {
        let helper = helper();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        *helper.pending.lock() = "SELECT *".to_string();
        let (start, candidates) = helper.complete("FRO", 3, &ctx).unwrap();
        assert_eq!(start, 0);
        assert!(candidates.iter().any(|c| c.replacement == "FROM"));

        let (start, candidates) = helper.complete("FROM ord", 8, &ctx).unwrap();
        assert_eq!(start, 5);
        assert!(candidates.iter().any(|c| c.replacement == "orders"));

        // meta-commands are only recognised on a fresh statement
        let (_, candidates) = helper.complete("\\re", 3, &ctx).unwrap();
        assert!(candidates.iter().all(|c| c.replacement != "\\refresh"));
    }
}
