//! Single-owner output writer
//!
//! All day tasks share one destination. Instead of each task opening the
//! file, one writer task owns it and receives finished records over a
//! bounded channel. A record is written whole and flushed before the next
//! one is taken, so records from different days never interleave.

use crate::{CrawlerError, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default number of records that may wait for the writer
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Producer side: cloned into every day task
#[derive(Debug, Clone)]
pub struct RecordSink {
    tx: mpsc::Sender<String>,
}

impl RecordSink {
    /// Queues one serialized record, waiting while the queue is full
    ///
    /// # Errors
    ///
    /// `CrawlerError::OutputClosed` if the writer has stopped.
    pub async fn send(&self, record: String) -> Result<()> {
        self.tx
            .send(record)
            .await
            .map_err(|_| CrawlerError::OutputClosed)
    }
}

/// Owner of the destination
pub struct RecordWriter {
    handle: JoinHandle<Result<u64>>,
}

impl RecordWriter {
    /// Creates (truncating) `path` and starts the writer task
    pub async fn create(path: &Path, capacity: usize) -> Result<(RecordSink, RecordWriter)> {
        let file = File::create(path).await?;
        tracing::debug!("Opened output file: {}", path.display());
        Ok(Self::spawn(BufWriter::new(file), capacity))
    }

    /// Starts a writer task over any async destination
    pub fn spawn<W>(writer: W, capacity: usize) -> (RecordSink, RecordWriter)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(write_records(writer, rx));
        (RecordSink { tx }, RecordWriter { handle })
    }

    /// Waits for the writer to drain and returns the number of records written
    ///
    /// Completes once every [`RecordSink`] clone has been dropped.
    pub async fn finish(self) -> Result<u64> {
        self.handle
            .await
            .map_err(|e| CrawlerError::Task(format!("output writer: {}", e)))?
    }
}

async fn write_records<W>(mut writer: W, mut rx: mpsc::Receiver<String>) -> Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(record) = rx.recv().await {
        writer.write_all(record.as_bytes()).await?;
        writer.flush().await?;
        written += 1;
    }
    writer.shutdown().await?;
    tracing::debug!("Output writer finished after {} records", written);
    Ok(written)
}
