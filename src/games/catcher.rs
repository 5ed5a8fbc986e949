//! Catcher
//!
//! Timed catch-the-fruit round in a 100x100 logical court. Items drop from
//! the top at randomized speeds; catching fruit scores and gradually raises
//! both the drop rate and the fall speed, catching a bomb ends the run on
//! the spot. Surviving the full 60 seconds completes the round.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::driver::Dt;
use crate::events::GameEvent;
use crate::input::InputSnapshot;
use crate::session::{Lifecycle, Session};

use super::Simulation;

pub const AREA: f32 = 100.0;
pub const ROUND_MS: f32 = 60_000.0;
/// Basket half width; an item is caught when its center lands within this
/// of the basket center.
pub const BASKET_HALF: f32 = 10.0;
/// Basket travel per nominal frame while a direction is held.
pub const BASKET_STEP: f32 = 5.0;
/// Y line at which an item is either caught or missed.
pub const CATCH_LINE: f32 = 90.0;
pub const FRUIT_POINTS: u32 = 10;
/// Starting per-nominal-frame drop chance, raised by each catch up to the cap.
pub const DROP_RATE_START: f64 = 0.05;
pub const DROP_RATE_CAP: f64 = 0.2;
pub const DROP_RATE_PER_CATCH: f64 = 0.002;
/// Fall-speed multiplier, likewise raised by each catch.
pub const SPEED_START: f32 = 2.0;
pub const SPEED_CAP: f32 = 5.0;
pub const SPEED_PER_CATCH: f32 = 0.05;
/// One item in six is a bomb.
const BOMB_ODDS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Fruit,
    Bomb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub pos: Vec2,
    /// Fall speed per nominal frame.
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catcher {
    session: Session,
    /// Basket center x along the bottom edge.
    pub basket_x: f32,
    pub items: Vec<Item>,
    pub time_left_ms: f32,
    drop_rate: f64,
    speed_scale: f32,
    rng: Pcg32,
    next_id: u32,
}

impl Default for Catcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Catcher {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            session: Session::new(),
            basket_x: AREA / 2.0,
            items: Vec::new(),
            time_left_ms: ROUND_MS,
            drop_rate: DROP_RATE_START,
            speed_scale: SPEED_START,
            rng: Pcg32::seed_from_u64(seed),
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

    fn spawn_item(&mut self, events: &mut Vec<GameEvent>) {
        let kind = if self.rng.random_range(0..BOMB_ODDS) == 0 {
            ItemKind::Bomb
        } else {
            ItemKind::Fruit
        };
        let x = self.rng.random_range(0.0..AREA - BASKET_HALF) + BASKET_HALF / 2.0;
        let speed = 1.0 + self.rng.random::<f32>() * self.speed_scale;
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Item {
            id,
            kind,
            pos: Vec2::new(x, 0.0),
            speed,
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

        // The round clock only runs while playing; pausing freezes it.
        self.time_left_ms -= dt.ms();
        if self.time_left_ms <= 0.0 {
            self.time_left_ms = 0.0;
            self.session.win(events);
            return;
        }

        if let Some(p) = input.pointer {
            self.basket_x = p.x;
        } else {
            self.basket_x += input.axis_x() * BASKET_STEP * dt.norm();
        }
        self.basket_x = self.basket_x.clamp(BASKET_HALF, AREA - BASKET_HALF);

        let p = (self.drop_rate * dt.norm() as f64).min(1.0);
        if self.rng.random::<f64>() < p {
            self.spawn_item(events);
        }

        // Fall, then judge each item at its new height.
        let mut caught_bomb = false;
        let mut catches = 0;
        let basket_x = self.basket_x;
        for item in &mut self.items {
            item.pos.y += item.speed * dt.norm();
        }
        self.items.retain(|item| {
            if item.pos.y < CATCH_LINE {
                return true;
            }
            if (item.pos.x - basket_x).abs() < BASKET_HALF {
                match item.kind {
                    ItemKind::Fruit => catches += 1,
                    ItemKind::Bomb => caught_bomb = true,
                }
            } else {
                events.push(GameEvent::OutOfBounds { id: item.id });
            }
            false
        });

        for _ in 0..catches {
            self.session.add_score(FRUIT_POINTS, events);
            self.speed_scale = (self.speed_scale + SPEED_PER_CATCH).min(SPEED_CAP);
            self.drop_rate = (self.drop_rate + DROP_RATE_PER_CATCH).min(DROP_RATE_CAP);
        }
        if caught_bomb {
            self.session.game_over(events);
        }
    }
}

impl Simulation for Catcher {
    fn lifecycle(&self) -> Lifecycle {
        self.session.lifecycle()
    }

    fn step(&mut self, input: &InputSnapshot, dt: Dt, events: &mut Vec<GameEvent>) {
        self.tick(input, dt, events);
    }
}
