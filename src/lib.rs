//! Arcade Loop - simulation cores for a set of casual arcade games
//!
//! Core modules:
//! - `driver`: frame driver turning host timestamps into measured ticks
//! - `body`: movable bodies, boundary policies, overlap tests
//! - `spawn`: seeded spawn policies (fixed interval / probabilistic)
//! - `session`: lifecycle state machine, score and level tracking
//! - `scores`: best-score persistence behind a key/value store
//! - `games`: the per-game simulation steps
//!
//! All gameplay logic is pure and deterministic: seeded RNG only, no
//! rendering or platform dependencies, no I/O inside a step. A renderer
//! reads entity positions from the game state after each tick; input
//! handlers write only the [`input::InputSnapshot`].

pub mod body;
pub mod driver;
pub mod events;
pub mod games;
pub mod input;
pub mod scores;
pub mod session;
pub mod spawn;

pub use body::{Body, Bounds, EdgePolicy, Shape};
pub use driver::{Dt, FrameDriver, IntervalDriver, SessionToken, TickOutcome};
pub use events::GameEvent;
pub use games::Simulation;
pub use input::InputSnapshot;
pub use session::{Lifecycle, Session};

/// Shared timing constants
pub mod consts {
    /// Nominal frame duration the per-tick motion constants assume (~60 Hz).
    ///
    /// Motion constants are expressed per nominal frame; integration scales
    /// them by `elapsed / NOMINAL_FRAME_MS` so behavior is independent of
    /// the actual refresh cadence.
    pub const NOMINAL_FRAME_MS: f32 = 16.7;

    /// Maximum elapsed time credited to a single tick.
    ///
    /// Caps the catch-up after a background tab or a long pause so a single
    /// tick never teleports bodies across the play area.
    pub const MAX_FRAME_MS: f32 = 100.0;
}
