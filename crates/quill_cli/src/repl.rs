use crate::helper::QuillHelper;
use crate::history::{load_history, save_history};
use crate::meta::{execute_meta, parse_meta, MetaResult};
use crate::runner::Session;
use anyhow::Result;
use parking_lot::Mutex;
use quill_core::{split_statements, ParseOutcome, SqlScanner, StatementParser};
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::Editor;
use std::sync::Arc;
use tracing::debug;

pub async fn run_repl(session: &mut Session) -> Result<()> {
    let mut rl: Editor<QuillHelper, FileHistory> = Editor::new()?;
    // statement text from earlier lines, shared with the completer
    let pending = Arc::new(Mutex::new(String::new()));
    rl.set_helper(Some(QuillHelper::new(
        session.candidates.clone(),
        pending.clone(),
    )));
    load_history(&mut rl);

    let mut buffer = String::new();

    println!(
        "quill v{}: {}",
        env!("CARGO_PKG_VERSION"),
        session.client.conninfo()
    );
    println!("Type \\? for help, \\q to quit.");

    loop {
        let prompt = if buffer.is_empty() {
            format!("quill ({})> ", session.client.dbname)
        } else {
            "quill ...> ".to_string()
        };

        let line = match rl.readline(&prompt) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C: clear buffer
                if !buffer.is_empty() {
                    println!("(buffer cleared)");
                    buffer.clear();
                    pending.lock().clear();
                }
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() && buffer.is_empty() {
            continue;
        }
        if !trimmed.is_empty() {
            let _ = rl.add_history_entry(trimmed);
        }

        // Meta-command (only when buffer is empty)
        if buffer.is_empty() {
            if let Some(cmd) = parse_meta(trimmed) {
                match execute_meta(&cmd, session).await {
                    Ok(MetaResult::Quit) => break,
                    Ok(MetaResult::Continue) => {}
                    Err(e) => eprintln!("ERROR: {:#}", e),
                }
                continue;
            }
        }

        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&line);

        // Execute once the scanner sees every statement terminated
        if SqlScanner.parse(&buffer) != ParseOutcome::Complete {
            pending.lock().clone_from(&buffer);
            continue;
        }
        let statements = split_statements(&buffer);
        buffer.clear();
        pending.lock().clear();
        for sql in statements {
            debug!("REPL execute: {}", sql);
            if let Err(e) = session.run_statement(&sql).await {
                eprintln!("ERROR: {:#}", e);
            }
        }
    }

    save_history(&mut rl);
    Ok(())
}
