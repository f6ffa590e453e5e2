//! Identifier generation for newly created records

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

/// Produces identifiers for records created through the API
///
/// Uniqueness is best-effort; the engine never checks it.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self, resource: &str) -> String;
}

/// `{resource}_{unix_millis}` identifiers
///
/// The millisecond suffix is strictly increasing within one generator, so two
/// creations in the same millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct TimestampIdGenerator {
    last: AtomicI64,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn new_id(&self, resource: &str) -> String {
        format!("{}_{}", resource, self.next_millis())
    }
}

/// Random v4 UUID identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn new_id(&self, _resource: &str) -> String {
        Uuid::new_v4().to_string()
    }
}
