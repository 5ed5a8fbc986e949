//! Gravity sandbox
//!
//! N-body toy with no score or win condition: every orb attracts every
//! other with an inverse-square pull, velocity decays with friction and is
//! speed-capped, and the walls bounce with damping. Orbs are placed by the
//! pointer while the action input is pressed.
//!
//! An orb whose state goes non-finite (degenerate masses, overlapping
//! spawns) is removed rather than poisoning the rest of the system.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::body::{Body, Bounds, EdgePolicy, Shape, confine};
use crate::driver::Dt;
use crate::events::GameEvent;
use crate::input::InputSnapshot;
use crate::session::{Lifecycle, Session};

use super::Simulation;

pub const AREA_WIDTH: f32 = 600.0;
pub const AREA_HEIGHT: f32 = 400.0;
pub const DEFAULT_GRAVITY: f32 = 0.1;
pub const GRAVITY_RANGE: (f32, f32) = (0.01, 0.5);
/// Per-nominal-frame velocity retention.
pub const FRICTION: f32 = 0.99;
/// Inside this separation the pull switches to a deflecting shove.
pub const MIN_DISTANCE: f32 = 20.0;
pub const MAX_SPEED: f32 = 15.0;
/// Velocity retained across a wall bounce or a close deflection.
pub const DAMPING: f32 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub body: Body,
    pub mass: f32,
}

impl Orb {
    pub fn new(id: u32, pos: Vec2, mass: f32) -> Self {
        Self {
            body: Body::new(id, pos, Shape::Circle { radius: mass / 2.0 }),
            mass,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravitySandbox {
    session: Session,
    pub orbs: Vec<Orb>,
    g: f32,
    pub collisions: bool,
    rng: Pcg32,
    next_id: u32,
    bounds: Bounds,
}

impl Default for GravitySandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl GravitySandbox {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            session: Session::new(),
            orbs: Vec::new(),
            g: DEFAULT_GRAVITY,
            collisions: true,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            bounds: Bounds::new(AREA_WIDTH, AREA_HEIGHT),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn gravity(&self) -> f32 {
        self.g
    }

    pub fn set_gravity(&mut self, g: f32) {
        self.g = g.clamp(GRAVITY_RANGE.0, GRAVITY_RANGE.1);
    }

    pub fn clear(&mut self) {
        self.orbs.clear();
    }

    pub fn restart(&mut self) {
        let seed = self.next_id as u64;
        *self = Self::with_seed(seed);
        self.session.start();
    }

    /// Drop a new orb with a random mass in `[10, 30)`.
    pub fn add_orb(&mut self, pos: Vec2, events: &mut Vec<GameEvent>) {
        let mass = self.rng.random_range(10.0..30.0);
        let id = self.next_id;
        self.next_id += 1;
        self.orbs.push(Orb::new(id, pos, mass));
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

        if input.action {
            let pos = input
                .pointer
                .unwrap_or(Vec2::new(AREA_WIDTH / 2.0, AREA_HEIGHT / 2.0));
            self.add_orb(pos, events);
        }
        if dt.is_zero() {
            return;
        }

        // Forces are computed against the previous frame's positions so the
        // update is order-independent.
        let prev: Vec<(u32, Vec2, f32)> =
            self.orbs.iter().map(|o| (o.body.id, o.body.pos, o.mass)).collect();
        let friction = FRICTION.powf(dt.norm());

        for orb in &mut self.orbs {
            let mut acc = Vec2::ZERO;
            for &(other_id, other_pos, other_mass) in &prev {
                if other_id == orb.body.id {
                    continue;
                }
                let delta = other_pos - orb.body.pos;
                let d = delta.length();
                if d > MIN_DISTANCE {
                    acc += delta / d * (self.g * other_mass) / (d * d);
                } else if self.collisions && d > 0.0 {
                    // Too close: shove away from the neighbor, losing some speed.
                    let speed = orb.body.vel.length();
                    orb.body.vel = -delta / d * speed * DAMPING;
                }
            }

            orb.body.vel = (orb.body.vel + acc * dt.norm()) * friction;
            orb.body.vel = orb.body.vel.clamp_length_max(MAX_SPEED);
            orb.body.integrate(dt);

            let contact = confine(&mut orb.body, &self.bounds, EdgePolicy::Reflect);
            if contact.left || contact.right {
                orb.body.vel.x *= DAMPING;
            }
            if contact.top || contact.bottom {
                orb.body.vel.y *= DAMPING;
            }
        }

        // Non-finite orbs are dropped, not propagated.
        self.orbs.retain(|orb| {
            if orb.body.is_finite() {
                true
            } else {
                log::warn!("removing non-finite orb {}", orb.body.id);
                events.push(GameEvent::Destroyed { id: orb.body.id });
                false
            }
        });
    }
}

impl Simulation for GravitySandbox {
    fn lifecycle(&self) -> Lifecycle {
        self.session.lifecycle()
    }

    fn step(&mut self, input: &InputSnapshot, dt: Dt, events: &mut Vec<GameEvent>) {
        self.tick(input, dt, events);
    }
}
