//! Flappy
//!
//! One-button side scroller. Gravity pulls the bird down, the action input
//! flaps it upward, and pipe pairs scroll in from the right on a fixed
//! schedule. Passing a pipe scores a point; touching a pipe or the court's
//! top or bottom edge ends the run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::body::{Body, Shape};
use crate::driver::Dt;
use crate::events::GameEvent;
use crate::input::InputSnapshot;
use crate::session::{Lifecycle, Session};
use crate::spawn::{SpawnPolicy, Spawner, span_between};

use super::Simulation;

pub const AREA_WIDTH: f32 = 600.0;
pub const AREA_HEIGHT: f32 = 500.0;
pub const BIRD_SIZE: f32 = 30.0;
/// X coordinate of the bird's left edge; the bird never moves horizontally.
pub const BIRD_X: f32 = 50.0;
/// Downward acceleration per nominal frame.
pub const GRAVITY: f32 = 0.5;
/// Flap impulse; replaces the current vertical velocity outright.
pub const JUMP_VELOCITY: f32 = -6.0;
pub const PIPE_WIDTH: f32 = 60.0;
pub const PIPE_GAP: f32 = 190.0;
pub const PIPE_INTERVAL_MS: f32 = 1500.0;
/// Leftward pipe travel per nominal frame.
pub const SCROLL_SPEED: f32 = 2.0;
/// Shortest pipe segment; keeps the gap clear of both edges.
const MIN_PIPE: f32 = 50.0;

/// A pipe pair. The gap spans `[gap_top, gap_top + PIPE_GAP]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge.
    pub x: f32,
    pub gap_top: f32,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flappy {
    session: Session,
    pub bird: Body,
    pub pipes: Vec<Pipe>,
    spawner: Spawner,
    next_id: u32,
}

impl Default for Flappy {
    fn default() -> Self {
        Self::new()
    }
}

impl Flappy {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            session: Session::new(),
            bird: Body::new(
                0,
                Vec2::new(BIRD_X + BIRD_SIZE / 2.0, AREA_HEIGHT / 2.0),
                Shape::rect(BIRD_SIZE, BIRD_SIZE),
            ),
            pipes: Vec::new(),
            spawner: Spawner::new(SpawnPolicy::Interval { every_ms: PIPE_INTERVAL_MS }, seed),
            next_id: 1,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn restart(&mut self) {
        let seed = self.next_id as u64;
        *self = Self::with_seed(seed);
        self.session.start();
    }

    fn spawn_pipe(&mut self, events: &mut Vec<GameEvent>) {
        let id = self.next_id;
        self.next_id += 1;
        let gap_top = span_between(
            self.spawner.rng(),
            MIN_PIPE,
            AREA_HEIGHT - PIPE_GAP - MIN_PIPE,
        );
        self.pipes.push(Pipe {
            id,
            x: AREA_WIDTH,
            gap_top,
            passed: false,
        });
        events.push(GameEvent::Spawned { id });
    }

    fn tick(&mut self, input: &InputSnapshot, dt: Dt, events: &mut Vec<GameEvent>) {
        if input.restart {
            self.restart();
            return;
        }
        if input.pause {
            self.session.toggle_pause();
        }
        if self.session.lifecycle() == Lifecycle::Idle && input.action {
            self.session.start();
        }
        if !self.session.is_active() {
            return;
        }
        self.session.advance();
        if dt.is_zero() {
            return;
        }

        if input.action {
            self.bird.vel.y = JUMP_VELOCITY;
        }
        self.bird.vel.y += GRAVITY * dt.norm();
        self.bird.integrate(dt);

        let half = BIRD_SIZE / 2.0;
        if self.bird.pos.y - half < 0.0 || self.bird.pos.y + half > AREA_HEIGHT {
            events.push(GameEvent::OutOfBounds { id: self.bird.id });
            self.session.game_over(events);
            return;
        }

        for _ in 0..self.spawner.poll(dt, self.session.level()) {
            self.spawn_pipe(events);
        }

        let step = SCROLL_SPEED * dt.norm();
        let bird_left = self.bird.pos.x - half;
        let bird_right = self.bird.pos.x + half;
        let bird_top = self.bird.pos.y - half;
        let bird_bottom = self.bird.pos.y + half;
        let mut hit = false;
        let mut passes = 0;

        for pipe in &mut self.pipes {
            pipe.x -= step;
            if bird_right > pipe.x && bird_left < pipe.x + PIPE_WIDTH {
                if bird_top < pipe.gap_top || bird_bottom > pipe.gap_top + PIPE_GAP {
                    hit = true;
                }
            } else if !pipe.passed && pipe.x + PIPE_WIDTH < bird_left {
                pipe.passed = true;
                passes += 1;
            }
        }
        self.pipes.retain(|p| p.x > -PIPE_WIDTH);

        for _ in 0..passes {
            self.session.add_score(1, events);
        }
        if hit {
            self.session.game_over(events);
        }
    }
}

impl Simulation for Flappy {
    fn lifecycle(&self) -> Lifecycle {
        self.session.lifecycle()
    }

    fn step(&mut self, input: &InputSnapshot, dt: Dt, events: &mut Vec<GameEvent>) {
        self.tick(input, dt, events);
    }
}
