//! p4write - serialized write dispatch for batched device writes
//!
//! Write batches submitted from any number of producers are sent to the
//! device one at a time, in submission order. The single aggregate status
//! returned for each batch is demultiplexed into one result per update.

pub mod batch;
pub mod client;
pub mod demux;
pub mod dispatcher;
pub mod errors;
pub mod observability;
pub mod queue;
pub mod status;
pub mod trace;
pub mod transport;

pub use batch::{Update, UpdateKind, WriteBatch};
pub use client::{WriteClient, WriteConfig};
pub use errors::{WriteError, WriteResult};
pub use queue::{ResponseSink, WriteId, WriteQueue};
pub use status::{Code, Detail, DeviceError, ItemResult, Origin, Status};
pub use trace::{TraceReceiver, TraceSender, WriteTrace};
pub use transport::{Transport, TransportOutcome};
