//! # Write Dispatcher
//!
//! Single long-lived task draining the write queue in FIFO order.
//!
//! ## Invariants
//!
//! - At most one transport call is in flight.
//! - Transport invocation order equals queue order.
//! - Decoding and delivery run in a separate task per batch, so the next
//!   write is sent without waiting for the previous submitter to read its
//!   results. Deliveries across batches may complete in any order.
//! - A write taken from the queue always runs to completion; stopping only
//!   takes effect between writes.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::demux::{self, Completion};
use crate::errors::{WriteError, WriteResult};
use crate::observability::{Event, Logger, Severity, WriteMetrics};
use crate::queue::{PendingWrite, QueueReceiver};
use crate::trace::TraceEmitter;
use crate::transport::Transport;

/// Serial write dispatcher
pub struct Dispatcher {
    queue: QueueReceiver,
    transport: Arc<dyn Transport>,
    traces: Arc<TraceEmitter>,
    metrics: Arc<WriteMetrics>,
}

impl Dispatcher {
    pub fn new(
        queue: QueueReceiver,
        transport: Arc<dyn Transport>,
        traces: Arc<TraceEmitter>,
        metrics: Arc<WriteMetrics>,
    ) -> Self {
        Self {
            queue,
            transport,
            traces,
            metrics,
        }
    }

    /// Run the dispatch loop on its own task
    pub fn spawn(self) -> DispatcherHandle {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = tokio::spawn(self.run(shutdown_rx));
        DispatcherHandle { shutdown_tx, task }
    }

    /// Dispatch writes until a shutdown signal arrives or every submitter
    /// is gone. Writes still queued on exit are released unsent.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let Dispatcher {
            mut queue,
            transport,
            traces,
            metrics,
        } = self;

        Logger::info(Event::DispatcherStart, &[]);

        loop {
            let pending = tokio::select! {
                biased;
                Ok(()) = shutdown.recv() => break,
                next = queue.recv() => match next {
                    Some(pending) => pending,
                    None => break,
                },
            };
            dispatch(pending, transport.as_ref(), &traces, &metrics).await;
        }

        let released = queue.close().await;
        if released > 0 {
            metrics.add_writes_abandoned(released as u64);
            Logger::warn(
                Event::QueueTeardown,
                &[("released", released.to_string().as_str())],
            );
        }
        Logger::info(Event::DispatcherStop, &[]);
    }
}

/// Send one write and hand its outcome to a decoding task
async fn dispatch(
    pending: PendingWrite,
    transport: &dyn Transport,
    traces: &Arc<TraceEmitter>,
    metrics: &Arc<WriteMetrics>,
) {
    let PendingWrite {
        id,
        batch,
        responder,
    } = pending;

    let started = Instant::now();
    let outcome = transport.write(&batch).await;
    metrics.increment_batches_dispatched();

    if Logger::enabled(Severity::Trace) {
        let code = match &outcome {
            Ok(()) => "OK",
            Err(status) => status.code.as_str(),
        };
        Logger::trace(
            Event::WriteDispatched,
            &[
                ("batch_size", batch.len().to_string().as_str()),
                ("code", code),
                ("write_id", id.to_string().as_str()),
            ],
        );
    }

    demux::spawn_complete(
        Completion {
            id,
            batch_size: batch.len(),
            outcome,
            started,
            responder,
        },
        Arc::clone(traces),
        Arc::clone(metrics),
    );
}

/// Handle to a running dispatcher
#[derive(Debug)]
pub struct DispatcherHandle {
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl DispatcherHandle {
    /// Stop after the in-flight write (if any) and wait for the loop to exit.
    ///
    /// Fails with [`WriteError::DispatcherPanicked`] if the loop died from a
    /// panic, typically raised by the transport.
    pub async fn stop(self) -> WriteResult<()> {
        let _ = self.shutdown_tx.send(());
        match self.task.await {
            Ok(()) => Ok(()),
            Err(err) if err.is_panic() => {
                Logger::error(
                    Event::DispatcherStop,
                    &[("reason", "dispatcher task panicked")],
                );
                Err(WriteError::DispatcherPanicked)
            }
            Err(_) => Ok(()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
