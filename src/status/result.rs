//! Per-update results

use super::code::Code;
use super::detail::{DetailDecodeError, DeviceError};

/// Error space of results synthesized by this crate
pub const LOCAL_ERROR_SPACE: &str = "p4write";

/// Where an [`ItemResult`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Decoded from the device's per-update detail record
    Device,
    /// Copied from the batch-level status; the device did not attribute it
    Batch,
    /// Synthesized locally because a detail record could not be decoded
    Local,
}

/// Outcome of one update within a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub code: Code,
    pub message: String,
    /// Namespace of `device_code`
    pub space: String,
    /// Device specific error code
    pub device_code: i32,
    pub origin: Origin,
}

impl ItemResult {
    /// Successful update
    pub fn ok() -> Self {
        Self::from_status(Code::Ok, String::new())
    }

    /// Result broadcast from a batch-level status
    pub fn from_status(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            space: String::new(),
            device_code: 0,
            origin: Origin::Batch,
        }
    }

    /// Result reported by the device for this update
    pub fn from_device(error: DeviceError) -> Self {
        Self {
            code: Code::from_i32(error.canonical_code),
            message: error.message,
            space: error.space,
            device_code: error.code,
            origin: Origin::Device,
        }
    }

    /// Stand-in for a detail record that failed to decode
    pub fn synthesized(error: &DetailDecodeError) -> Self {
        Self {
            code: Code::Internal,
            message: error.to_string(),
            space: LOCAL_ERROR_SPACE.to_string(),
            device_code: 0,
            origin: Origin::Local,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }

    pub fn is_synthesized(&self) -> bool {
        self.origin == Origin::Local
    }
}
