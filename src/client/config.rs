//! Write client configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{WriteError, WriteResult};

/// Write client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteConfig {
    /// Writes that may wait for the dispatcher before submitters are held
    /// back (default: 1024)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Capacity of channels created by `WriteClient::trace_channel`
    /// (default: 256)
    #[serde(default = "default_trace_capacity")]
    pub trace_capacity: usize,
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_trace_capacity() -> usize {
    256
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            trace_capacity: default_trace_capacity(),
        }
    }
}

impl WriteConfig {
    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            queue_capacity,
            ..Default::default()
        }
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> WriteResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: WriteConfig = serde_json::from_str(&raw)
            .map_err(|e| WriteError::Config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WriteResult<()> {
        if self.queue_capacity == 0 {
            return Err(WriteError::Config(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.trace_capacity == 0 {
            return Err(WriteError::Config(
                "trace_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
