use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Produces fresh record ids. Uniqueness is the generator's job; the
/// repository never checks for an existing key before writing.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// "1", "2", "3", ... for deterministic tests
#[derive(Debug, Default)]
pub struct SequentialIds {
    last: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        (self.last.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }
}
