//! # Write Client
//!
//! Entry point for submitting batches. Owns the queue, the dispatcher task,
//! the trace emitter and the counters they share.
//!
//! ```ignore
//! let client = WriteClient::start(transport, WriteConfig::default())?;
//! let sink = client.write(&batch).await?;
//! let results = sink.recv().await?; // one result per update
//! ```

mod config;

pub use config::WriteConfig;

use std::sync::Arc;

use crate::batch::WriteBatch;
use crate::dispatcher::{Dispatcher, DispatcherHandle};
use crate::errors::WriteResult;
use crate::observability::{MetricsSnapshot, WriteMetrics};
use crate::queue::{write_queue, ResponseSink, WriteQueue};
use crate::trace::{trace_channel, TraceEmitter, TraceReceiver, TraceSender};
use crate::transport::Transport;

/// Client side of the device write path
#[derive(Debug)]
pub struct WriteClient {
    queue: WriteQueue,
    traces: Arc<TraceEmitter>,
    metrics: Arc<WriteMetrics>,
    dispatcher: DispatcherHandle,
    config: WriteConfig,
}

impl WriteClient {
    /// Validate `config` and start the dispatcher.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(transport: Arc<dyn Transport>, config: WriteConfig) -> WriteResult<Self> {
        config.validate()?;

        let metrics = Arc::new(WriteMetrics::new());
        let traces = Arc::new(TraceEmitter::new(Arc::clone(&metrics)));
        let (queue, receiver) = write_queue(config.queue_capacity);
        let dispatcher = Dispatcher::new(
            receiver,
            transport,
            Arc::clone(&traces),
            Arc::clone(&metrics),
        )
        .spawn();

        Ok(Self {
            queue,
            traces,
            metrics,
            dispatcher,
            config,
        })
    }

    /// Queue a copy of `batch`, waiting only if the queue is full
    pub async fn write(&self, batch: &WriteBatch) -> WriteResult<ResponseSink> {
        self.queue.submit(batch).await
    }

    /// Queue a copy of `batch`, failing with `QueueFull` instead of waiting
    pub fn try_write(&self, batch: &WriteBatch) -> WriteResult<ResponseSink> {
        self.queue.try_submit(batch)
    }

    /// Submission handle for producer tasks; every handle feeds the same
    /// queue
    pub fn queue(&self) -> WriteQueue {
        self.queue.clone()
    }

    /// Whether writes are queued that the dispatcher has not yet taken
    pub fn has_pending_writes(&self) -> bool {
        self.queue.has_pending_writes()
    }

    /// Register a trace sink, replacing any previous one. `None` disables
    /// tracing.
    pub fn set_trace_sink(&self, sink: Option<TraceSender>) {
        self.traces.set_sink(sink);
    }

    /// Create a trace channel sized from the config and register its sender
    pub fn trace_channel(&self) -> TraceReceiver {
        let (tx, rx) = trace_channel(self.config.trace_capacity);
        self.traces.set_sink(Some(tx));
        rx
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn config(&self) -> &WriteConfig {
        &self.config
    }

    /// Stop the dispatcher after its in-flight write.
    ///
    /// Writes still queued are released and their sinks report `Closed`.
    pub async fn shutdown(self) -> WriteResult<()> {
        self.dispatcher.stop().await
    }
}
