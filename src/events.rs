//! Discrete events emitted by simulation steps
//!
//! Events are the step's only output besides the new state. Audio and
//! visual effects triggered by them are the caller's responsibility.

use serde::{Deserialize, Serialize};

/// Something that happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Points were awarded.
    Scored { points: u32 },
    /// An obstacle or collectible was destroyed/consumed.
    Destroyed { id: u32 },
    /// A new obstacle or collectible entered play.
    Spawned { id: u32 },
    /// A body left the visible area (or became numerically invalid and was
    /// removed as a recoverable event).
    OutOfBounds { id: u32 },
    /// Difficulty/level increased.
    LevelUp { level: u32 },
    /// The session ended in a loss. Emitted exactly once per session.
    GameOver,
    /// The session ended in a win. Emitted exactly once per session.
    Won,
}
