//! Shape id generation.
//!
//! Id generation is injectable so hosts and tests can supply deterministic
//! ids; the engine re-rolls any candidate that collides with a live or
//! retired id.

use crate::shapes::ShapeId;
use uuid::Uuid;

/// Source of candidate shape ids.
pub trait IdGenerator {
    /// Mint the next candidate id.
    fn next_id(&mut self) -> ShapeId;
}

/// Random v4 UUID ids. The default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> ShapeId {
        ShapeId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic `prefix-N` ids for tests and reproducible sessions.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> ShapeId {
        self.counter += 1;
        ShapeId::new(format!("{}-{}", self.prefix, self.counter))
    }
}
