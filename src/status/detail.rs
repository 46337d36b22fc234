//! Per-update detail records attached to a failed batch status

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type URL of a packed [`DeviceError`]
pub const DEVICE_ERROR_TYPE_URL: &str = "type.googleapis.com/p4.v1.Error";

/// Error reported by the device for one update of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceError {
    /// Canonical status code (wire value)
    pub canonical_code: i32,
    #[serde(default)]
    pub message: String,
    /// Namespace of `code`
    #[serde(default)]
    pub space: String,
    /// Device specific error code, meaningful within `space`
    #[serde(default)]
    pub code: i32,
}

impl DeviceError {
    pub fn new(canonical_code: i32, message: impl Into<String>) -> Self {
        Self {
            canonical_code,
            message: message.into(),
            space: String::new(),
            code: 0,
        }
    }
}

/// Failure to unpack a detail record
#[derive(Debug, Error)]
pub enum DetailDecodeError {
    #[error("mismatched message type: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    #[error("malformed device error: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A packed detail record: a type URL plus the encoded message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl Detail {
    pub fn new(type_url: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            type_url: type_url.into(),
            value: value.into(),
        }
    }

    /// Pack a device error
    pub fn pack(error: &DeviceError) -> Result<Self, serde_json::Error> {
        Ok(Self::new(DEVICE_ERROR_TYPE_URL, serde_json::to_vec(error)?))
    }

    /// Unpack the device error carried by this record
    pub fn unpack(&self) -> Result<DeviceError, DetailDecodeError> {
        if self.type_url != DEVICE_ERROR_TYPE_URL {
            return Err(DetailDecodeError::TypeMismatch {
                expected: DEVICE_ERROR_TYPE_URL,
                actual: self.type_url.clone(),
            });
        }
        Ok(serde_json::from_slice(&self.value)?)
    }
}
