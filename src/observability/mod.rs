//! Observability for the write path
//!
//! - Structured logging (JSON lines)
//! - Monotonic counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Never blocks or fails the write path
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use p4write::observability::{Event, Logger};
//!
//! Logger::warn(Event::WriteTraceDropped, &[("batch_size", "3")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, WriteMetrics};
