//! # Pending-Write Queue
//!
//! Bounded FIFO between any number of submitters and the single dispatcher.
//! A shared depth counter backs the non-blocking `has_pending_writes` probe:
//! it is incremented when a write is enqueued and decremented when the
//! dispatcher dequeues it.

mod pending;

pub use pending::{response_channel, PendingWrite, ResponseSender, ResponseSink, WriteId};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::batch::WriteBatch;
use crate::errors::{WriteError, WriteResult};

/// Create a queue holding at most `capacity` writes
pub fn write_queue(capacity: usize) -> (WriteQueue, QueueReceiver) {
    let capacity = capacity.max(1);
    let (tx, rx) = mpsc::channel(capacity);
    let depth = Arc::new(AtomicUsize::new(0));
    (
        WriteQueue {
            tx,
            depth: Arc::clone(&depth),
            capacity,
        },
        QueueReceiver { rx, depth },
    )
}

/// Submitting side. Cheap to clone; every clone feeds the same FIFO.
#[derive(Debug, Clone)]
pub struct WriteQueue {
    tx: mpsc::Sender<PendingWrite>,
    depth: Arc<AtomicUsize>,
    capacity: usize,
}

impl WriteQueue {
    /// Enqueue a copy of `batch`, waiting for capacity if the queue is full.
    pub async fn submit(&self, batch: &WriteBatch) -> WriteResult<ResponseSink> {
        let (pending, sink) = PendingWrite::new(batch.clone());
        let permit = self.tx.reserve().await.map_err(|_| WriteError::Closed)?;
        self.depth.fetch_add(1, Ordering::SeqCst);
        permit.send(pending);
        Ok(sink)
    }

    /// Enqueue a copy of `batch` without waiting
    pub fn try_submit(&self, batch: &WriteBatch) -> WriteResult<ResponseSink> {
        let (pending, sink) = PendingWrite::new(batch.clone());
        let permit = self.tx.try_reserve().map_err(|e| match e {
            TrySendError::Full(()) => WriteError::QueueFull(self.capacity),
            TrySendError::Closed(()) => WriteError::Closed,
        })?;
        self.depth.fetch_add(1, Ordering::SeqCst);
        permit.send(pending);
        Ok(sink)
    }

    /// Whether any write is queued and not yet taken by the dispatcher
    pub fn has_pending_writes(&self) -> bool {
        self.depth() > 0
    }

    /// Writes queued and not yet taken by the dispatcher
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the receiving side is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Dispatcher side of the queue
#[derive(Debug)]
pub struct QueueReceiver {
    rx: mpsc::Receiver<PendingWrite>,
    depth: Arc<AtomicUsize>,
}

impl QueueReceiver {
    /// Next write in FIFO order. `None` once every submitter is gone and
    /// the queue is empty.
    pub async fn recv(&mut self) -> Option<PendingWrite> {
        let pending = self.rx.recv().await?;
        self.depth.fetch_sub(1, Ordering::SeqCst);
        Some(pending)
    }

    /// Refuse further submissions and release everything still queued.
    ///
    /// Waits for submitters that already hold a slot to finish sending, so
    /// no write lands after the drain. Released writes are dropped unsent;
    /// their submitters observe [`WriteError::Closed`]. Returns how many
    /// were released.
    pub async fn close(&mut self) -> usize {
        self.rx.close();
        let mut released = 0;
        while let Some(pending) = self.rx.recv().await {
            self.release(pending);
            released += 1;
        }
        released
    }

    fn release(&self, pending: PendingWrite) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
        drop(pending);
    }
}

impl Drop for QueueReceiver {
    fn drop(&mut self) {
        // Reached without `close` only if the dispatcher never ran to
        // completion; release what is already buffered.
        self.rx.close();
        while let Ok(pending) = self.rx.try_recv() {
            self.release(pending);
        }
    }
}
