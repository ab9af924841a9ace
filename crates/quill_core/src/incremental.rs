//! Streaming row source.
//!
//! A producer thread pulls rows from the cursor into a bounded queue while
//! the renderer consumes them. The queue read is the only suspension point
//! on the consumer side; it is raced against the cancel signal so an
//! interrupt wakes the renderer at once.
//!
//! Column widths are normalized against the header alone: later rows are
//! not known yet when the first line is printed, so their cells are clipped
//! to the header-derived widths instead of re-flowing the table.

use crate::cancel::CancelSignal;
use crate::error::{QuillError, QuillResult};
use crate::row::Row;
use crate::rows::{ResultCursor, RowSource};
use crossbeam_channel::{select, Receiver, Sender};
use std::collections::BTreeSet;
use std::thread;
use tracing::debug;

pub struct IncrementalRows {
    header: Option<Row>,
    pending: Option<Row>,
    widths: Option<Vec<usize>>,
    receiver: Receiver<QuillResult<Row>>,
    cancel: CancelSignal,
    primary_keys: BTreeSet<usize>,
    finished: bool,
}

impl IncrementalRows {
    /// Start streaming `cursor`. At most `capacity` fetched rows wait in the
    /// queue; the producer blocks when it is full.
    pub fn start(
        mut cursor: Box<dyn ResultCursor>,
        capacity: usize,
        cancel: CancelSignal,
        null_value: Option<String>,
    ) -> QuillResult<Self> {
        let header = Row::header(cursor.column_labels());
        let primary_keys = cursor.primary_key_columns();
        let columns = header.len();
        let (sender, receiver) = crossbeam_channel::bounded(capacity.max(1));

        let producer_cancel = cancel.clone();
        thread::Builder::new()
            .name("quill-fetch".to_string())
            .spawn(move || {
                produce(
                    cursor.as_mut(),
                    sender,
                    producer_cancel,
                    columns,
                    null_value.as_deref(),
                )
            })?;

        Ok(Self {
            header: Some(header),
            pending: None,
            widths: None,
            receiver,
            cancel,
            primary_keys,
            finished: false,
        })
    }
}

fn produce(
    cursor: &mut dyn ResultCursor,
    sender: Sender<QuillResult<Row>>,
    cancel: CancelSignal,
    columns: usize,
    null_value: Option<&str>,
) {
    let mut produced: u64 = 0;
    loop {
        if cancel.is_cancelled() {
            debug!("fetch cancelled after {} rows", produced);
            return;
        }
        let item = match cursor.fetch() {
            Ok(Some(mut row)) => {
                row.fit_columns(columns);
                if let Some(nv) = null_value {
                    row.fill_nulls(nv);
                }
                Ok(row)
            }
            Ok(None) => {
                debug!("fetch finished after {} rows", produced);
                return;
            }
            Err(e) => Err(e),
        };
        // The fetch may have blocked for a long time.
        if cancel.is_cancelled() {
            debug!("fetch cancelled after {} rows", produced);
            return;
        }
        let failed = item.is_err();
        select! {
            send(sender, item) -> res => {
                if res.is_err() {
                    debug!("row consumer went away after {} rows", produced);
                    return;
                }
            }
            recv(cancel.wakeup()) -> _ => {
                debug!("fetch cancelled after {} rows", produced);
                return;
            }
        }
        if failed {
            return;
        }
        produced += 1;
    }
}

impl RowSource for IncrementalRows {
    fn normalize_widths(&mut self, max_column_width: usize) {
        if let Some(header) = self.header.as_mut() {
            if max_column_width > 0 {
                for size in header.sizes.iter_mut() {
                    *size = (*size).min(max_column_width);
                }
            }
            self.widths = Some(header.sizes.clone());
        }
    }

    fn is_primary_key(&self, column: usize) -> bool {
        self.primary_keys.contains(&column)
    }

    fn has_next(&mut self) -> QuillResult<bool> {
        if self.cancel.is_cancelled() {
            self.finished = true;
            self.pending = None;
            return Ok(false);
        }
        if self.header.is_some() || self.pending.is_some() {
            return Ok(true);
        }
        if self.finished {
            return Ok(false);
        }

        let receiver = self.receiver.clone();
        let wakeup = self.cancel.wakeup().clone();
        select! {
            recv(receiver) -> msg => match msg {
                Ok(Ok(mut row)) => {
                    if let Some(widths) = &self.widths {
                        row.sizes = widths.clone();
                    }
                    self.pending = Some(row);
                    Ok(true)
                }
                Ok(Err(e)) => {
                    self.finished = true;
                    Err(e)
                }
                // Producer hung up: result exhausted.
                Err(_) => {
                    self.finished = true;
                    Ok(false)
                }
            },
            recv(wakeup) -> _ => {
                self.finished = true;
                Ok(false)
            }
        }
    }

    fn next_row(&mut self) -> QuillResult<Row> {
        if let Some(header) = self.header.take() {
            return Ok(header);
        }
        if self.pending.is_none() {
            self.has_next()?;
        }
        self.pending.take().ok_or(QuillError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::MemoryCursor;
    use crossbeam_channel::{unbounded, RecvTimeoutError};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    /// Cursor whose rows are fed one by one from the test.
    struct GatedCursor {
        gate: Receiver<Row>,
        dropped: Arc<AtomicBool>,
    }

    impl ResultCursor for GatedCursor {
        fn column_labels(&self) -> Vec<String> {
            vec!["N".to_string()]
        }

        fn fetch(&mut self) -> QuillResult<Option<Row>> {
            Ok(self.gate.recv().ok())
        }
    }

    impl Drop for GatedCursor {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    fn row(v: &str) -> Row {
        Row::data(vec![Some(v.to_string())])
    }

    fn big_cursor(n: usize) -> MemoryCursor {
        let mut cursor = MemoryCursor::new(["N", "SQUARE"]);
        for i in 0..n {
            cursor.push(vec![Some(i.to_string()), Some((i * i).to_string())]);
        }
        cursor
    }

    #[test]
    fn test_streams_all_rows_through_small_queue() {
        let mut rows =
            IncrementalRows::start(Box::new(big_cursor(50)), 2, CancelSignal::new(), None)
                .unwrap();
        let mut seen = Vec::new();
        while rows.has_next().unwrap() {
            seen.push(rows.next_row().unwrap());
        }
        assert_eq!(seen.len(), 51);
        assert!(seen[0].is_header);
        assert_eq!(seen[50].values[1].as_deref(), Some("2401"));
    }

    #[test]
    fn test_widths_come_from_header_only() {
        let mut cursor = MemoryCursor::new(["N"]);
        cursor.push(vec![Some("a much wider value".into())]);
        let mut rows =
            IncrementalRows::start(Box::new(cursor), 4, CancelSignal::new(), None).unwrap();
        rows.normalize_widths(0);
        let header = rows.next_row().unwrap();
        assert_eq!(header.sizes, vec![1]);
        assert!(rows.has_next().unwrap());
        let body = rows.next_row().unwrap();
        assert_eq!(body.sizes, vec![1]);
        assert_eq!(body.values[0].as_deref(), Some("a much wider value"));
    }

    #[test]
    fn test_fetch_error_surfaces_from_has_next() {
        let cursor = big_cursor(5).fail_after(1, "connection reset by peer");
        let mut rows = IncrementalRows::start(Box::new(cursor), 4, CancelSignal::new(), None)
            .unwrap();
        assert!(rows.has_next().unwrap());
        rows.next_row().unwrap(); // header
        assert!(rows.has_next().unwrap());
        rows.next_row().unwrap(); // first data row
        let err = rows.has_next().unwrap_err();
        assert!(matches!(err, QuillError::Fetch(ref m) if m.contains("reset")));
        assert!(!rows.has_next().unwrap());
    }

    #[test]
    fn test_cancel_wakes_blocked_has_next() {
        let (feed, gate) = unbounded();
        let dropped = Arc::new(AtomicBool::new(false));
        let cursor = GatedCursor {
            gate,
            dropped: dropped.clone(),
        };
        let cancel = CancelSignal::new();
        let mut rows = IncrementalRows::start(Box::new(cursor), 4, cancel.clone(), None).unwrap();

        feed.send(row("1")).unwrap();
        assert!(rows.has_next().unwrap());
        rows.next_row().unwrap(); // header
        assert!(rows.has_next().unwrap());
        rows.next_row().unwrap(); // "1"

        let canceller = cancel.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            canceller.cancel();
        });
        let start = Instant::now();
        assert!(!rows.has_next().unwrap(), "cancelled source must report end");
        assert!(
            start.elapsed() < Duration::from_secs(1),
            "has_next should wake promptly, took {:?}",
            start.elapsed()
        );
        handle.join().unwrap();

        // A row arriving after cancellation is never appended.
        let _ = feed.send(row("2"));
        assert!(!rows.has_next().unwrap());

        let deadline = Instant::now() + Duration::from_secs(2);
        while !dropped.load(Ordering::SeqCst) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(dropped.load(Ordering::SeqCst), "producer should stop");
    }

    #[test]
    fn test_cancel_before_start_yields_nothing() {
        let cancel = CancelSignal::new();
        cancel.cancel();
        let mut rows =
            IncrementalRows::start(Box::new(big_cursor(3)), 4, cancel, None).unwrap();
        assert!(!rows.has_next().unwrap());
    }

    #[test]
    fn test_dropping_source_stops_producer() {
        let (feed, gate) = unbounded();
        let dropped = Arc::new(AtomicBool::new(false));
        let cursor = GatedCursor {
            gate,
            dropped: dropped.clone(),
        };
        let rows = IncrementalRows::start(Box::new(cursor), 1, CancelSignal::new(), None).unwrap();
        drop(rows);
        // Producer is parked in fetch; hand it a row so it notices.
        feed.send(row("1")).unwrap();
        let (done_tx, done_rx) = unbounded::<()>();
        let watcher = dropped.clone();
        thread::spawn(move || {
            while !watcher.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(5));
            }
            let _ = done_tx.send(());
        });
        assert!(!matches!(
            done_rx.recv_timeout(Duration::from_secs(2)),
            Err(RecvTimeoutError::Timeout)
        ));
    }

    #[test]
    fn test_null_value_applied_by_producer() {
        let mut cursor = MemoryCursor::new(["A"]);
        cursor.push(vec![None]);
        let mut rows = IncrementalRows::start(
            Box::new(cursor),
            4,
            CancelSignal::new(),
            Some("NULL".to_string()),
        )
        .unwrap();
        rows.next_row().unwrap();
        assert!(rows.has_next().unwrap());
        assert_eq!(rows.next_row().unwrap().values[0].as_deref(), Some("NULL"));
    }
}
