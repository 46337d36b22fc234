//! Write batches
//!
//! The entity payload of an update is opaque to the write path; it is
//! carried as encoded bytes and handed to the transport unchanged.

/// Kind of mutation carried by an [`Update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    Insert,
    Modify,
    Delete,
}

/// A single mutation within a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub kind: UpdateKind,
    /// Encoded entity
    pub entity: Vec<u8>,
}

impl Update {
    pub fn new(kind: UpdateKind, entity: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            entity: entity.into(),
        }
    }

    pub fn insert(entity: impl Into<Vec<u8>>) -> Self {
        Self::new(UpdateKind::Insert, entity)
    }

    pub fn modify(entity: impl Into<Vec<u8>>) -> Self {
        Self::new(UpdateKind::Modify, entity)
    }

    pub fn delete(entity: impl Into<Vec<u8>>) -> Self {
        Self::new(UpdateKind::Delete, entity)
    }
}

/// A batch of updates sent to one device in a single transport call.
///
/// The write path always works on its own copy of a batch, so callers may
/// keep mutating the value they submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    /// Target device
    pub device_id: u64,
    /// Updates, in the order the device applies them
    pub updates: Vec<Update>,
}

impl WriteBatch {
    /// Create an empty batch for a device
    pub fn new(device_id: u64) -> Self {
        Self {
            device_id,
            updates: Vec::new(),
        }
    }

    /// Append an update
    pub fn push(&mut self, update: Update) {
        self.updates.push(update);
    }

    /// Builder-style append
    pub fn with_update(mut self, update: Update) -> Self {
        self.push(update);
        self
    }

    /// Number of updates (the number of results the batch yields)
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}
