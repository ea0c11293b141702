use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Port for minting globally unique feature identifiers
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs in simple (32 hex digit) form
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `{prefix}{n}` identifiers starting at 1
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), counter: AtomicU64::new(0) }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_simple_hex() {
        let generator = UuidIdGenerator;
        let a = generator.next_id();
        let b = generator.next_id();

        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequential_ids() {
        let generator = SequentialIdGenerator::new("f-");
        assert_eq!(generator.next_id(), "f-1");
        assert_eq!(generator.next_id(), "f-2");
    }
}
