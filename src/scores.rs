//! Best-score persistence
//!
//! One integer per game, stored under a game-specific key, read at session
//! start and written only when the new value improves on the stored one.
//! The store itself is host-provided (LocalStorage in a browser, a file on
//! native); the crate ships an in-memory implementation for tests and demos.

use std::collections::HashMap;

/// Key -> string storage. No schema beyond "key -> integer string".
pub trait ScoreStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str);
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }
}

/// Load the stored best score. A missing or corrupt value defaults to zero
/// and never fails the session.
pub fn load_best(store: &dyn ScoreStore, key: &str) -> u64 {
    match store.read(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("corrupt best score under {key:?}, treating as no record");
                0
            }
        },
        None => 0,
    }
}

/// Record `score` if it strictly exceeds the stored best. Returns whether a
/// new record was written.
pub fn record_best(store: &mut dyn ScoreStore, key: &str, score: u64) -> bool {
    let best = load_best(store, key);
    if score > best {
        store.write(key, &score.to_string());
        log::info!("new best score {score} under {key:?} (previous {best})");
        true
    } else {
        false
    }
}

/// Per-game storage keys.
pub mod keys {
    pub const BRICK_BREAKER: &str = "brick_breaker_best";
    pub const FLAPPY: &str = "flappy_best";
    pub const INVADERS: &str = "invaders_best";
    pub const BALL_BOUNCE: &str = "ball_bounce_best";
    pub const RAIN_DODGE: &str = "rain_dodge_best";
    pub const CATCH: &str = "catch_best";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_score_only_improves() {
        let mut store = MemoryStore::new();
        store.write(keys::FLAPPY, "100");

        // Session ends with 120: stored value updates.
        assert!(record_best(&mut store, keys::FLAPPY, 120));
        assert_eq!(load_best(&store, keys::FLAPPY), 120);

        // A later session ending with 80 leaves it alone.
        assert!(!record_best(&mut store, keys::FLAPPY, 80));
        assert_eq!(load_best(&store, keys::FLAPPY), 120);

        // Ties do not rewrite.
        assert!(!record_best(&mut store, keys::FLAPPY, 120));
    }

    #[test]
    fn missing_or_corrupt_value_reads_as_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(load_best(&store, keys::CATCH), 0);
        store.write(keys::CATCH, "not a number");
        assert_eq!(load_best(&store, keys::CATCH), 0);
        // Recovery: a real score overwrites the garbage.
        assert!(record_best(&mut store, keys::CATCH, 10));
        assert_eq!(load_best(&store, keys::CATCH), 10);
    }
}
