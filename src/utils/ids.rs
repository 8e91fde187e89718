// file: src/utils/ids.rs
// version: 1.0.0
// guid: 22eaaebe-1d92-49b9-8e85-ec91ba60536b

//! Timestamp-based identifiers for nodes, interfaces and registry mappings

use chrono::Utc;

/// Hands out millisecond-timestamp ids that never repeat within one generator.
///
/// Two requests in the same millisecond get consecutive values, so ids stay
/// unique even when a caller adds several entities in a tight loop.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator whose first id is `start` (or the clock, if that is later)
    pub fn starting_at(start: i64) -> Self {
        Self { last: start - 1 }
    }

    /// Next unique id
    pub fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = if now > self.last { now } else { self.last + 1 };
        self.last.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_in_tight_loop() {
        let mut ids = IdGenerator::new();
        let generated: Vec<String> = (0..100).map(|_| ids.next_id()).collect();
        let mut deduped = generated.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), generated.len());
    }

    #[test]
    fn test_far_future_start_counts_up() {
        let mut ids = IdGenerator::starting_at(i64::MAX / 2);
        let first: i64 = ids.next_id().parse().unwrap();
        let second: i64 = ids.next_id().parse().unwrap();
        assert_eq!(first, i64::MAX / 2);
        assert_eq!(second, first + 1);
    }
}
