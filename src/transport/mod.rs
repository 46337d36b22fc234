//! # Transport
//!
//! The call that carries one batch to the device. Connection management,
//! retries and deadlines belong to the implementation.

use futures_util::future::BoxFuture;

use crate::batch::WriteBatch;
use crate::status::Status;

/// Outcome of a batch call. The success response carries no data.
pub type TransportOutcome = Result<(), Status>;

/// Executes one batch call and reports its aggregate outcome.
///
/// The dispatcher never has more than one call outstanding, so
/// implementations need not handle concurrent writes.
pub trait Transport: Send + Sync + 'static {
    fn write<'a>(&'a self, batch: &'a WriteBatch) -> BoxFuture<'a, TransportOutcome>;
}
