mod args;
mod client;
mod config;
mod cursor;
mod helper;
mod history;
mod meta;
mod metadata;
mod repl;
mod runner;
mod timing;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use client::DbClient;
use runner::{split_script, Session};
use std::process;
use tracing::debug;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("quill: error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns the process exit code.
async fn run() -> Result<i32> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.print_default_config {
        print!("{}", config::default_config_toml()?);
        return Ok(0);
    }

    let cfg = config::load_config(args.config.as_deref())?;
    let mut options = cfg.display;
    args.apply_to(&mut options).context("Invalid display option")?;
    let include_schema = cfg.completion.schema && !args.skip_schema;

    let client = DbClient::connect(&args)
        .await
        .context("Could not connect to the database")?;
    let mut session = Session::new(client, options, include_schema);

    let script = if let Some(sql) = args.execute.as_deref() {
        debug!("Mode: -e");
        Some(sql.to_string())
    } else if let Some(path) = args.file.as_deref() {
        debug!("Mode: -f {}", path);
        let sql =
            std::fs::read_to_string(path).with_context(|| format!("Cannot read file: {}", path))?;
        Some(sql)
    } else {
        None
    };

    match script {
        Some(text) => {
            let failed = session
                .run_statements(&split_script(&text), args.on_error_stop)
                .await?;
            if failed > 0 && args.on_error_stop {
                return Ok(3);
            }
        }
        None => {
            debug!("Mode: REPL");
            let terms = session.refresh_candidates().await;
            debug!("{} completion terms", terms);
            repl::run_repl(&mut session).await?;
        }
    }

    Ok(0)
}
