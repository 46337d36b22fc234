//! # Status Types
//!
//! Batch-level status returned by the transport, the detail records it may
//! carry, and the per-update results they are decoded into.

mod code;
mod detail;
mod result;

pub use code::Code;
pub use detail::{Detail, DetailDecodeError, DeviceError, DEVICE_ERROR_TYPE_URL};
pub use result::{ItemResult, Origin, LOCAL_ERROR_SPACE};

use thiserror::Error;

/// Failed batch call: an aggregate code and message plus optional
/// per-update detail records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct Status {
    pub code: Code,
    pub message: String,
    pub details: Vec<Detail>,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(code: Code, message: impl Into<String>, details: Vec<Detail>) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let status = Status::new(Code::Unavailable, "device unreachable");
        assert_eq!(status.to_string(), "UNAVAILABLE: device unreachable");
        assert!(status.details.is_empty());
    }
}
