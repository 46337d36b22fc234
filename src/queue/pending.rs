//! Pending writes and their single-use response channel

use std::fmt;

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::batch::WriteBatch;
use crate::errors::{WriteError, WriteResult};
use crate::status::ItemResult;

/// Identifies one submitted write in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteId(Uuid);

impl WriteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WriteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Create a connected sender/sink pair for one write
pub fn response_channel(id: WriteId) -> (ResponseSender, ResponseSink) {
    let (tx, rx) = oneshot::channel();
    (ResponseSender { id, tx }, ResponseSink { id, rx })
}

/// Writable half. Delivering consumes it, so a result set is written at
/// most once.
#[derive(Debug)]
pub struct ResponseSender {
    id: WriteId,
    tx: oneshot::Sender<Vec<ItemResult>>,
}

impl ResponseSender {
    pub fn id(&self) -> WriteId {
        self.id
    }

    /// Deliver the results. Never waits. Returns the results back if the
    /// sink has been dropped.
    pub fn deliver(self, results: Vec<ItemResult>) -> Result<(), Vec<ItemResult>> {
        self.tx.send(results)
    }

    /// Whether the submitter has stopped waiting
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Readable half, held by the submitter
#[derive(Debug)]
pub struct ResponseSink {
    id: WriteId,
    rx: oneshot::Receiver<Vec<ItemResult>>,
}

impl ResponseSink {
    pub fn id(&self) -> WriteId {
        self.id
    }

    /// Wait for the results, one per update in submission order.
    ///
    /// Fails with [`WriteError::Closed`] if the write was released without
    /// being sent (dispatcher stopped).
    pub async fn recv(self) -> WriteResult<Vec<ItemResult>> {
        self.rx.await.map_err(|_| WriteError::Closed)
    }
}

/// A batch waiting for the dispatcher, paired with where its results go
#[derive(Debug)]
pub struct PendingWrite {
    pub id: WriteId,
    pub batch: WriteBatch,
    pub responder: ResponseSender,
}

impl PendingWrite {
    /// Take ownership of `batch` and create its response channel
    pub fn new(batch: WriteBatch) -> (Self, ResponseSink) {
        let id = WriteId::new();
        let (responder, sink) = response_channel(id);
        (
            Self {
                id,
                batch,
                responder,
            },
            sink,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Code;

    #[tokio::test]
    async fn test_deliver_then_recv() {
        let (pending, sink) = PendingWrite::new(WriteBatch::new(1));
        assert_eq!(pending.id, sink.id());

        pending
            .responder
            .deliver(vec![ItemResult::ok(), ItemResult::ok()])
            .unwrap();

        let results = sink.recv().await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.code == Code::Ok));
    }

    #[tokio::test]
    async fn test_dropped_sender_reports_closed() {
        let (pending, sink) = PendingWrite::new(WriteBatch::new(1));
        drop(pending);

        assert!(matches!(sink.recv().await, Err(WriteError::Closed)));
    }

    #[test]
    fn test_deliver_to_dropped_sink_returns_results() {
        let (sender, sink) = response_channel(WriteId::new());
        drop(sink);

        assert!(sender.is_closed());
        let returned = sender.deliver(vec![ItemResult::ok()]).unwrap_err();
        assert_eq!(returned.len(), 1);
    }

    #[test]
    fn test_write_ids_are_unique() {
        assert_ne!(WriteId::new(), WriteId::new());
    }
}
