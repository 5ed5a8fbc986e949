//! Session lifecycle and scoring
//!
//! The coarse per-session state machine shared by every game:
//! `Idle -> Running <-> Paused`, with `Running -> Over` or `Running -> Won`
//! terminal until an explicit restart recreates the game state.

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Waiting for the player to start (or serve).
    #[default]
    Idle,
    Running,
    Paused,
    /// Run ended in a loss. Terminal.
    Over,
    /// Run ended in a win. Terminal.
    Won,
}

impl Lifecycle {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Lifecycle::Over | Lifecycle::Won)
    }
}

/// Score, level and lifecycle for one game session.
///
/// Score only ever increases; the terminal transitions fire their event
/// exactly once no matter how many hazards land on the same tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    lifecycle: Lifecycle,
    score: u64,
    level: u32,
    ticks: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            score: 0,
            level: 1,
            ticks: 0,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Forward progress is only made while running.
    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Leave Idle. No-op in any other state; a terminal session is restarted
    /// by recreating the game state, not by calling this.
    pub fn start(&mut self) {
        if self.lifecycle == Lifecycle::Idle {
            self.lifecycle = Lifecycle::Running;
        }
    }

    /// Cooperative pause: toggles between Running and Paused, ignored in
    /// terminal states and while idle.
    pub fn toggle_pause(&mut self) {
        self.lifecycle = match self.lifecycle {
            Lifecycle::Running => Lifecycle::Paused,
            Lifecycle::Paused => Lifecycle::Running,
            other => other,
        };
    }

    /// Count one simulation tick.
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    pub fn add_score(&mut self, points: u32, events: &mut Vec<GameEvent>) {
        if points > 0 {
            self.score += points as u64;
            events.push(GameEvent::Scored { points });
        }
    }

    pub fn level_up(&mut self, events: &mut Vec<GameEvent>) {
        self.level += 1;
        events.push(GameEvent::LevelUp { level: self.level });
    }

    /// Transition to Over. Emits GameOver exactly once per session.
    pub fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        if !self.lifecycle.is_terminal() {
            self.lifecycle = Lifecycle::Over;
            events.push(GameEvent::GameOver);
            log::info!("game over at score {} (level {})", self.score, self.level);
        }
    }

    /// Transition to Won. Emits Won exactly once per session.
    pub fn win(&mut self, events: &mut Vec<GameEvent>) {
        if !self.lifecycle.is_terminal() {
            self.lifecycle = Lifecycle::Won;
            events.push(GameEvent::Won);
            log::info!("session won at score {} (level {})", self.score, self.level);
        }
    }
}
