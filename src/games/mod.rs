//! Game simulations
//!
//! Each game is a self-contained deterministic state machine implementing
//! [`Simulation`]: given the previous state, the elapsed time and an input
//! snapshot, one step produces the next state plus a list of discrete
//! events. Steps have no side effects; sounds, confetti and HUD updates are
//! the caller's business.
//!
//! Shared conventions:
//! - Motion constants are logical units per nominal frame, scaled by
//!   [`Dt::norm`](crate::driver::Dt::norm).
//! - Collisions are evaluated against the freshly integrated positions,
//!   never against the previous frame's state.
//! - Terminal transitions go through [`Session`](crate::session::Session)
//!   so GameOver/Won fire exactly once and nothing moves afterwards.

pub mod ball_bounce;
pub mod brick_breaker;
pub mod catcher;
pub mod flappy;
pub mod gravity;
pub mod invaders;
pub mod rain_dodge;

pub use ball_bounce::BallBounce;
pub use brick_breaker::BrickBreaker;
pub use catcher::Catcher;
pub use flappy::Flappy;
pub use gravity::GravitySandbox;
pub use invaders::Invaders;
pub use rain_dodge::RainDodge;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::driver::Dt;
use crate::events::GameEvent;
use crate::input::InputSnapshot;
use crate::session::Lifecycle;

/// One game's simulation step.
pub trait Simulation {
    /// Current coarse session state, gating whether the driver keeps
    /// scheduling ticks.
    fn lifecycle(&self) -> Lifecycle;

    /// Advance by one tick. Must make no forward progress while paused or
    /// in a terminal state (the pause toggle itself is still observed).
    fn step(&mut self, input: &InputSnapshot, dt: Dt, events: &mut Vec<GameEvent>);
}

/// Serialize a game state for suspend/resume.
pub fn snapshot<S: Serialize>(state: &S) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Restore a previously snapshotted game state.
pub fn restore<S: DeserializeOwned>(json: &str) -> Result<S, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_a_game() {
        let mut game = BallBounce::new();
        game.step(
            &InputSnapshot {
                action: true,
                ..Default::default()
            },
            Dt::NOMINAL,
            &mut Vec::new(),
        );

        let json = snapshot(&game).expect("serialize");
        let restored: BallBounce = restore(&json).expect("deserialize");
        assert_eq!(restored.lifecycle(), game.lifecycle());
        assert_eq!(restored.ball.pos, game.ball.pos);
    }

    #[test]
    fn restore_rejects_garbage() {
        assert!(restore::<BallBounce>("{not json").is_err());
    }
}
