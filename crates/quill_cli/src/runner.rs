use crate::client::DbClient;
use crate::cursor::{self, Outcome};
use crate::meta::{execute_meta, parse_meta, MetaResult};
use crate::metadata::PgMetadata;
use crate::timing::{command_summary, rows_summary, Timer};
use anyhow::Result;
use parking_lot::{Mutex, RwLock};
use quill_core::{
    build_candidates, split_statements, CancelSignal, CandidateSet, OutputFormatter, ParseOutcome,
    RenderOptions, ResultCursor, SqlScanner, StatementParser,
};
use std::io;
use std::sync::Arc;
use tracing::debug;

/// Used when stdout is not a terminal.
const FALLBACK_WIDTH: usize = 80;

pub fn terminal_width() -> usize {
    match crossterm::terminal::size() {
        Ok((w, _)) if w > 0 => w as usize,
        _ => FALLBACK_WIDTH,
    }
}

/// Split a script into statements and meta-commands. A line starting with
/// a backslash is a meta-command when no statement is pending.
pub fn split_script(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut pending = String::new();
    for line in text.lines() {
        if pending.trim().is_empty() && line.trim_start().starts_with('\\') {
            pending.clear();
            items.push(line.trim().to_string());
            continue;
        }
        pending.push_str(line);
        pending.push('\n');
        if matches!(SqlScanner.parse(&pending), ParseOutcome::Complete) {
            items.extend(split_statements(&pending));
            pending.clear();
        }
    }
    items.extend(split_statements(&pending));
    items
}

/// Connection plus everything that outlives a single statement.
pub struct Session {
    pub client: DbClient,
    pub options: RenderOptions,
    pub candidates: Arc<RwLock<CandidateSet>>,
    formatter: Arc<Mutex<OutputFormatter>>,
    include_schema: bool,
}

impl Session {
    pub fn new(client: DbClient, options: RenderOptions, include_schema: bool) -> Self {
        Self {
            client,
            options,
            candidates: Arc::new(RwLock::new(CandidateSet::new())),
            formatter: Arc::new(Mutex::new(OutputFormatter::new())),
            include_schema,
        }
    }

    /// Reload completion candidates from the connection. Returns the number
    /// of terms.
    pub async fn refresh_candidates(&self) -> usize {
        let provider = PgMetadata::new(self.client.client.clone());
        let set = build_candidates(&provider, self.include_schema).await;
        let terms = set.values().map(|t| t.len()).sum();
        *self.candidates.write() = set;
        terms
    }

    /// Render `cursor` to stdout with the session's options. Ctrl-C stops
    /// the render and asks the server to cancel the statement.
    pub async fn render(&self, cursor: Box<dyn ResultCursor>) -> Result<usize> {
        let cancel = CancelSignal::new();
        let signal = cancel.clone();
        let opts = self.options.clone();
        let formatter = self.formatter.clone();
        let width = terminal_width();

        let mut task = tokio::task::spawn_blocking(move || {
            let stdout = io::stdout();
            let stderr = io::stderr();
            let mut out = stdout.lock();
            let mut warn = stderr.lock();
            formatter
                .lock()
                .print(&opts, width, cursor, signal, &mut out, &mut warn)
        });

        let printed = tokio::select! {
            res = &mut task => res?,
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted, cancelling statement");
                cancel.cancel();
                self.client.cancel_running().await;
                task.await?
            }
        }?;
        Ok(printed)
    }

    /// Execute a single SQL statement and print the result.
    pub async fn run_statement(&self, sql: &str) -> Result<()> {
        debug!("run_statement: {}", sql);
        let timer = Timer::start();
        match cursor::open(&self.client.client, sql).await? {
            Outcome::Rows(cursor) => {
                let rows = self.render(Box::new(cursor)).await?;
                if self.options.show_header {
                    eprintln!("{}", rows_summary(rows, timer.elapsed_secs()));
                }
            }
            Outcome::Command(affected) => {
                if self.options.show_header {
                    eprintln!("{}", command_summary(affected, timer.elapsed_secs()));
                }
            }
        }
        Ok(())
    }

    /// Run a script. Meta-commands are honored; a failing statement is
    /// reported and, with `on_error_stop`, ends the script. Returns the
    /// number of failed statements.
    pub async fn run_statements(&mut self, stmts: &[String], on_error_stop: bool) -> Result<usize> {
        let mut failed = 0;
        for stmt in stmts {
            let outcome = match parse_meta(stmt) {
                Some(cmd) => match execute_meta(&cmd, self).await {
                    Ok(MetaResult::Quit) => break,
                    Ok(MetaResult::Continue) => Ok(()),
                    Err(e) => Err(e),
                },
                None => self.run_statement(stmt).await,
            };
            if let Err(e) = outcome {
                eprintln!("ERROR: {:#}", e);
                failed += 1;
                if on_error_stop {
                    break;
                }
            }
        }
        Ok(failed)
    }
}
