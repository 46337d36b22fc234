//! # Write Traces
//!
//! Optional per-batch telemetry. A trace is offered once per completed
//! transport call and is delivered only if a sink is registered and has
//! room; otherwise it is dropped. Offering never waits and never fails.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::observability::{Event, Logger, WriteMetrics};
use crate::status::ItemResult;

/// Timing and outcome of one batch call
#[derive(Debug, Clone)]
pub struct WriteTrace {
    pub batch_size: usize,
    /// From transport invocation to decoded results
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
    pub results: Vec<ItemResult>,
}

impl WriteTrace {
    pub fn new(batch_size: usize, duration: Duration, results: Vec<ItemResult>) -> Self {
        Self {
            batch_size,
            duration,
            completed_at: Utc::now(),
            results,
        }
    }

    /// Number of updates that did not succeed
    pub fn failed_items(&self) -> usize {
        self.results.iter().filter(|r| !r.is_ok()).count()
    }
}

pub type TraceSender = mpsc::Sender<WriteTrace>;
pub type TraceReceiver = mpsc::Receiver<WriteTrace>;

/// Bounded trace channel
pub fn trace_channel(capacity: usize) -> (TraceSender, TraceReceiver) {
    mpsc::channel(capacity.max(1))
}

/// What happened to an offered trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    Delivered,
    /// Sink registered but full
    DroppedFull,
    /// Sink registered but its receiver is gone
    DroppedClosed,
    /// No sink registered
    Disabled,
}

/// Holds the currently registered trace sink, if any.
///
/// The sink can be replaced or removed at any time; a trace offered
/// concurrently with a swap goes to either the old or the new sink.
#[derive(Debug)]
pub struct TraceEmitter {
    sink: RwLock<Option<TraceSender>>,
    metrics: Arc<WriteMetrics>,
}

impl Default for TraceEmitter {
    fn default() -> Self {
        Self::new(Arc::new(WriteMetrics::new()))
    }
}

impl TraceEmitter {
    pub fn new(metrics: Arc<WriteMetrics>) -> Self {
        Self {
            sink: RwLock::new(None),
            metrics,
        }
    }

    /// Register a sink, or disable tracing with `None`
    ///
    /// A poisoned lock is recovered: the slot only ever holds a whole
    /// `Option<TraceSender>`.
    pub fn set_sink(&self, sink: Option<TraceSender>) {
        let mut current = self.sink.write().unwrap_or_else(PoisonError::into_inner);
        *current = sink;
    }

    /// Whether a sink is registered
    pub fn is_enabled(&self) -> bool {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Offer a trace to the registered sink without waiting
    pub fn offer(&self, trace: WriteTrace) -> OfferOutcome {
        let sink = self
            .sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(sink) = sink else {
            return OfferOutcome::Disabled;
        };

        let batch_size = trace.batch_size;
        let outcome = match sink.try_send(trace) {
            Ok(()) => OfferOutcome::Delivered,
            Err(TrySendError::Full(_)) => OfferOutcome::DroppedFull,
            Err(TrySendError::Closed(_)) => OfferOutcome::DroppedClosed,
        };

        match outcome {
            OfferOutcome::Delivered => self.metrics.increment_traces_delivered(),
            OfferOutcome::DroppedFull | OfferOutcome::DroppedClosed => {
                self.metrics.increment_traces_dropped();
                let reason = if outcome == OfferOutcome::DroppedFull {
                    "sink full"
                } else {
                    "sink closed"
                };
                Logger::warn(
                    Event::WriteTraceDropped,
                    &[
                        ("batch_size", batch_size.to_string().as_str()),
                        ("reason", reason),
                    ],
                );
            }
            OfferOutcome::Disabled => {}
        }
        outcome
    }
}
