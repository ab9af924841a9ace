//! `ResultCursor` over a PostgreSQL simple-query stream.
//!
//! Rows are pulled one message at a time, so a large result is never held by
//! the connection layer. `fetch` blocks on the runtime handle and must only
//! be called off the async workers (`spawn_blocking` or the incremental
//! fetch thread).

use futures_util::StreamExt;
use quill_core::{QuillError, QuillResult, ResultCursor, Row};
use std::pin::Pin;
use tokio::runtime::Handle;
use tokio_postgres::{Client, SimpleQueryMessage, SimpleQueryStream};

pub struct PgCursor {
    labels: Vec<String>,
    stream: Pin<Box<SimpleQueryStream>>,
    handle: Handle,
    done: bool,
}

/// What a statement produced.
pub enum Outcome {
    Rows(PgCursor),
    /// Statement without a result set, with its affected row count.
    Command(u64),
}

/// Send `sql` and read up to the first row description or completion.
pub async fn open(client: &Client, sql: &str) -> anyhow::Result<Outcome> {
    let mut stream = Box::pin(client.simple_query_raw(sql).await?);
    while let Some(msg) = stream.next().await {
        match msg? {
            SimpleQueryMessage::RowDescription(columns) => {
                let labels = columns.iter().map(|c| c.name().to_string()).collect();
                return Ok(Outcome::Rows(PgCursor {
                    labels,
                    stream,
                    handle: Handle::current(),
                    done: false,
                }));
            }
            SimpleQueryMessage::CommandComplete(n) => return Ok(Outcome::Command(n)),
            _ => {}
        }
    }
    Ok(Outcome::Command(0))
}

impl ResultCursor for PgCursor {
    fn column_labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn fetch(&mut self) -> QuillResult<Option<Row>> {
        if self.done {
            return Ok(None);
        }
        loop {
            let next = self.handle.block_on(self.stream.next());
            match next {
                Some(Ok(SimpleQueryMessage::Row(row))) => {
                    let values = (0..row.len())
                        .map(|i| row.get(i).map(str::to_string))
                        .collect();
                    return Ok(Some(Row::data(values)));
                }
                Some(Ok(SimpleQueryMessage::CommandComplete(_))) | None => {
                    self.done = true;
                    return Ok(None);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.done = true;
                    return Err(QuillError::fetch(e));
                }
            }
        }
    }
}
