//! Rain Dodge
//!
//! Survival dodger in a 100x100 logical court. Raindrops spawn along the
//! top edge and fall at randomized speeds; the player slides along the
//! bottom. Score is survival time, and every 500 points raises the
//! difficulty tier, which adds spawn rolls and faster drops.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::body::{Body, Bounds, EdgePolicy, Shape, confine, overlaps};
use crate::driver::Dt;
use crate::events::GameEvent;
use crate::input::InputSnapshot;
use crate::session::{Lifecycle, Session};
use crate::spawn::{SpawnPolicy, Spawner, span_between};

use super::Simulation;

pub const AREA: f32 = 100.0;
pub const PLAYER_WIDTH: f32 = 4.0;
pub const PLAYER_HEIGHT: f32 = 6.0;
/// Player travel per nominal frame while a direction is held.
pub const PLAYER_STEP: f32 = 3.0;
pub const DROP_RADIUS: f32 = 1.5;
/// Per-difficulty-slot spawn chance on a nominal frame.
pub const DROP_CHANCE: f64 = 0.3;
/// Base fall speed per nominal frame at tier 1; each drop adds up to one
/// extra unit of its own.
pub const DROP_BASE_SPEED: f32 = 2.0;
pub const DROP_SPEED_CAP: f32 = 5.0;
/// Survival points needed per difficulty tier.
pub const POINTS_PER_TIER: u64 = 500;
pub const MAX_TIER: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainDodge {
    session: Session,
    pub player: Body,
    pub drops: Vec<Body>,
    spawner: Spawner,
    /// Fractional survival score carried between ticks.
    score_carry: f32,
    next_id: u32,
    bounds: Bounds,
}

impl Default for RainDodge {
    fn default() -> Self {
        Self::new()
    }
}

impl RainDodge {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            session: Session::new(),
            player: Body::new(
                0,
                Vec2::new(AREA / 2.0, AREA - PLAYER_HEIGHT / 2.0),
                Shape::rect(PLAYER_WIDTH, PLAYER_HEIGHT),
            ),
            drops: Vec::new(),
            spawner: Spawner::new(
                SpawnPolicy::Chance {
                    base: DROP_CHANCE,
                    per_level: 0.0,
                    max: DROP_CHANCE,
                },
                seed,
            ),
            score_carry: 0.0,
            next_id: 1,
            bounds: Bounds::new(AREA, AREA),
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

    /// Tier speed floor: 2 at tier 1, +0.5 per tier, capped at 5.
    fn tier_speed(&self) -> f32 {
        (DROP_BASE_SPEED + 0.5 * (self.session.level() - 1) as f32).min(DROP_SPEED_CAP)
    }

    fn spawn_drops(&mut self, dt: Dt, events: &mut Vec<GameEvent>) {
        let tier = self.session.level();
        let floor = self.tier_speed();
        for _ in 0..tier {
            for _ in 0..self.spawner.poll(dt, 1) {
                let x = span_between(self.spawner.rng(), 0.0, AREA - 2.0 * DROP_RADIUS)
                    + DROP_RADIUS;
                let speed = span_between(self.spawner.rng(), floor, floor + 1.0);
                let id = self.next_id;
                self.next_id += 1;
                self.drops.push(Body {
                    vel: Vec2::new(0.0, speed),
                    ..Body::new(id, Vec2::new(x, 0.0), Shape::Circle { radius: DROP_RADIUS })
                });
                events.push(GameEvent::Spawned { id });
            }
        }
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

        // Survival score: one point per nominal frame of elapsed time.
        self.score_carry += dt.norm();
        while self.score_carry >= 1.0 {
            self.score_carry -= 1.0;
            self.session.add_score(1, events);
        }
        let tier = ((self.session.score() / POINTS_PER_TIER) as u32 + 1).min(MAX_TIER);
        while self.session.level() < tier {
            self.session.level_up(events);
        }

        self.player.vel.x = input.axis_x() * PLAYER_STEP;
        self.player.integrate(dt);
        confine(&mut self.player, &self.bounds, EdgePolicy::Clamp);

        self.spawn_drops(dt, events);

        let mut hit = false;
        for drop in &mut self.drops {
            drop.integrate(dt);
            if overlaps(drop.pos, drop.shape, self.player.pos, self.player.shape) {
                hit = true;
            }
        }
        for drop in &self.drops {
            if drop.pos.y >= AREA + DROP_RADIUS {
                events.push(GameEvent::OutOfBounds { id: drop.id });
            }
        }
        self.drops.retain(|d| d.pos.y < AREA + DROP_RADIUS);

        if hit {
            self.session.game_over(events);
        }
    }
}

impl Simulation for RainDodge {
    fn lifecycle(&self) -> Lifecycle {
        self.session.lifecycle()
    }

    fn step(&mut self, input: &InputSnapshot, dt: Dt, events: &mut Vec<GameEvent>) {
        self.tick(input, dt, events);
    }
}
