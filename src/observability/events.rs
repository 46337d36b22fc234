//! Observable write path events

use std::fmt;

/// Events logged by the write path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Dispatcher loop started
    DispatcherStart,
    /// Dispatcher loop exited
    DispatcherStop,
    /// Queued writes released without being sent
    QueueTeardown,

    // Per write
    /// Transport call returned
    WriteDispatched,
    /// Results decoded and delivered
    WriteComplete,
    /// Submitter dropped its response sink before delivery
    WriteResultUnclaimed,
    /// A detail record could not be decoded
    DetailDecodeFailed,

    // Telemetry
    /// Write trace discarded (no capacity or sink gone)
    WriteTraceDropped,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DispatcherStart => "DISPATCHER_START",
            Event::DispatcherStop => "DISPATCHER_STOP",
            Event::QueueTeardown => "QUEUE_TEARDOWN",
            Event::WriteDispatched => "WRITE_DISPATCHED",
            Event::WriteComplete => "WRITE_COMPLETE",
            Event::WriteResultUnclaimed => "WRITE_RESULT_UNCLAIMED",
            Event::DetailDecodeFailed => "DETAIL_DECODE_FAILED",
            Event::WriteTraceDropped => "WRITE_TRACE_DROPPED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
