//! # Error Demultiplexer
//!
//! Turns the single outcome of a batch call into one [`ItemResult`] per
//! update. The result count always equals the batch size.
//!
//! Decoding order:
//!
//! 1. Success: every update is `OK` with an empty message.
//! 2. `UNKNOWN` with exactly one detail record per update: each record is
//!    decoded into the result at its position. A record that does not
//!    decode becomes a local `INTERNAL` result at that position only.
//! 3. Anything else: the batch status is copied to every position, since
//!    the device did not say which updates failed.

use std::sync::Arc;
use std::time::Instant;

use crate::observability::{Event, Logger, WriteMetrics};
use crate::queue::{ResponseSender, WriteId};
use crate::status::{Code, ItemResult};
use crate::trace::{TraceEmitter, WriteTrace};
use crate::transport::TransportOutcome;

/// Decode a transport outcome into exactly `batch_size` results
pub fn decode(outcome: &TransportOutcome, batch_size: usize) -> Vec<ItemResult> {
    let status = match outcome {
        Ok(()) => return vec![ItemResult::ok(); batch_size],
        Err(status) => status,
    };

    if status.code == Code::Unknown && batch_size > 0 && status.details.len() == batch_size {
        return status
            .details
            .iter()
            .enumerate()
            .map(|(position, detail)| match detail.unpack() {
                Ok(error) => ItemResult::from_device(error),
                Err(err) => {
                    Logger::warn(
                        Event::DetailDecodeFailed,
                        &[
                            ("position", position.to_string().as_str()),
                            ("reason", err.to_string().as_str()),
                        ],
                    );
                    ItemResult::synthesized(&err)
                }
            })
            .collect();
    }

    vec![ItemResult::from_status(status.code, status.message.as_str()); batch_size]
}

/// A finished transport call, handed from the dispatcher to a decoding task
#[derive(Debug)]
pub struct Completion {
    pub id: WriteId,
    pub batch_size: usize,
    pub outcome: TransportOutcome,
    /// When the transport call was started
    pub started: Instant,
    pub responder: ResponseSender,
}

/// Decode a completion, deliver the results to the submitter and offer a
/// trace. Never waits on the submitter or on the trace sink.
pub fn complete(completion: Completion, traces: &TraceEmitter, metrics: &WriteMetrics) {
    let Completion {
        id,
        batch_size,
        outcome,
        started,
        responder,
    } = completion;

    let duration = started.elapsed();
    let results = decode(&outcome, batch_size);
    metrics.record_results(&results);

    let traced = traces.is_enabled().then(|| results.clone());

    if responder.deliver(results).is_err() {
        metrics.increment_results_unclaimed();
        Logger::warn(
            Event::WriteResultUnclaimed,
            &[("write_id", id.to_string().as_str())],
        );
    }

    Logger::trace(
        Event::WriteComplete,
        &[
            ("batch_size", batch_size.to_string().as_str()),
            ("duration_us", duration.as_micros().to_string().as_str()),
            ("write_id", id.to_string().as_str()),
        ],
    );

    if let Some(results) = traced {
        traces.offer(WriteTrace::new(batch_size, duration, results));
    }
}

/// Run [`complete`] as an independent task
pub fn spawn_complete(
    completion: Completion,
    traces: Arc<TraceEmitter>,
    metrics: Arc<WriteMetrics>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move { complete(completion, &traces, &metrics) })
}
