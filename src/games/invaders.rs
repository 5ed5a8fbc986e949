//! Invaders
//!
//! Fixed-emplacement shooter over five waves. A stationary enemy grid fires
//! probabilistically at the player; shield cells soak two hits from either
//! side. Clearing a wave advances to the next table row, clearing the last
//! one wins the session. Any enemy bullet reaching the player ends it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::body::{Body, Shape, overlaps};
use crate::driver::Dt;
use crate::events::GameEvent;
use crate::input::InputSnapshot;
use crate::session::{Lifecycle, Session};

use super::Simulation;

pub const AREA_WIDTH: f32 = 800.0;
pub const AREA_HEIGHT: f32 = 600.0;
pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 20.0;
/// Player travel per nominal frame while a direction is held.
pub const PLAYER_STEP: f32 = 20.0;
pub const BULLET_WIDTH: f32 = 5.0;
pub const BULLET_HEIGHT: f32 = 10.0;
/// Upward player-bullet travel per nominal frame.
pub const PLAYER_BULLET_SPEED: f32 = 5.0;
/// Downward enemy-bullet travel per nominal frame.
pub const ENEMY_BULLET_SPEED: f32 = 4.0;
pub const ENEMY_WIDTH: f32 = 40.0;
pub const ENEMY_HEIGHT: f32 = 30.0;
pub const ENEMY_ROWS: usize = 3;
pub const ENEMY_COLS: usize = 8;
pub const SHIELD_CELL: f32 = 10.0;
pub const KILL_POINTS: u32 = 10;
/// Minimum time between player shots.
pub const FIRE_COOLDOWN_MS: f32 = 300.0;

/// Per-wave tuning: enemy hit points and the per-enemy chance of firing on
/// a nominal frame.
const WAVES: [(u8, f64); 5] = [
    (1, 0.01),
    (2, 0.015),
    (2, 0.02),
    (3, 0.025),
    (3, 0.03),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Center position. The grid never moves.
    pub pos: Vec2,
    pub hp: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldCell {
    pub id: u32,
    pub pos: Vec2,
    pub hp: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invaders {
    session: Session,
    pub player: Body,
    pub player_bullets: Vec<Body>,
    pub enemy_bullets: Vec<Body>,
    pub enemies: Vec<Enemy>,
    pub shields: Vec<ShieldCell>,
    fire_cooldown_ms: f32,
    rng: Pcg32,
    next_id: u32,
}

impl Default for Invaders {
    fn default() -> Self {
        Self::new()
    }
}

impl Invaders {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut game = Self {
            session: Session::new(),
            player: Body::new(
                0,
                Vec2::new(AREA_WIDTH / 2.0, AREA_HEIGHT - 60.0 + PLAYER_HEIGHT / 2.0),
                Shape::rect(PLAYER_WIDTH, PLAYER_HEIGHT),
            ),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            shields: Vec::new(),
            fire_cooldown_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        game.build_wave();
        game
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn restart(&mut self) {
        let seed = self.next_id as u64;
        *self = Self::with_seed(seed);
        self.session.start();
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn wave_row(&self) -> (u8, f64) {
        let i = (self.session.level() as usize - 1).min(WAVES.len() - 1);
        WAVES[i]
    }

    /// Enemy grid and fresh shields for the current wave. In-flight bullets
    /// are cleared too.
    fn build_wave(&mut self) {
        let (hp, _) = self.wave_row();
        self.enemies.clear();
        self.shields.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();

        for row in 0..ENEMY_ROWS {
            for col in 0..ENEMY_COLS {
                let id = self.next_id();
                self.enemies.push(Enemy {
                    id,
                    pos: Vec2::new(
                        80.0 + col as f32 * 80.0 + ENEMY_WIDTH / 2.0,
                        60.0 + row as f32 * 40.0 + ENEMY_HEIGHT / 2.0,
                    ),
                    hp,
                });
            }
        }

        // Four shield clusters, each a 3x6 grid of 10x10 cells.
        for cluster in 0..4 {
            for row in 0..3 {
                for col in 0..6 {
                    let id = self.next_id();
                    self.shields.push(ShieldCell {
                        id,
                        pos: Vec2::new(
                            100.0 + cluster as f32 * 160.0 + col as f32 * SHIELD_CELL
                                + SHIELD_CELL / 2.0,
                            AREA_HEIGHT - 150.0 + row as f32 * SHIELD_CELL + SHIELD_CELL / 2.0,
                        ),
                        hp: 2,
                    });
                }
            }
        }
    }

    fn bullet_shape() -> Shape {
        Shape::rect(BULLET_WIDTH, BULLET_HEIGHT)
    }

    fn shield_shape() -> Shape {
        Shape::rect(SHIELD_CELL, SHIELD_CELL)
    }

    fn enemy_shape() -> Shape {
        Shape::rect(ENEMY_WIDTH, ENEMY_HEIGHT)
    }

    fn fire(&mut self) {
        let id = self.next_id();
        self.player_bullets.push(Body {
            vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            ..Body::new(
                id,
                self.player.pos - Vec2::new(0.0, PLAYER_HEIGHT / 2.0 + BULLET_HEIGHT / 2.0),
                Self::bullet_shape(),
            )
        });
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
            return;
        }
        if !self.session.is_active() {
            return;
        }
        self.session.advance();
        if dt.is_zero() {
            return;
        }

        // Player movement and firing. The cooldown caps the fire rate even
        // when the host reports the action held every frame.
        let half = PLAYER_WIDTH / 2.0;
        self.player.pos.x =
            (self.player.pos.x + input.axis_x() * PLAYER_STEP * dt.norm()).clamp(half, AREA_WIDTH - half);
        self.fire_cooldown_ms = (self.fire_cooldown_ms - dt.ms()).max(0.0);
        if input.action && self.fire_cooldown_ms == 0.0 {
            self.fire();
            self.fire_cooldown_ms = FIRE_COOLDOWN_MS;
        }

        // Enemy fire: each surviving enemy rolls against the wave's rate,
        // scaled to elapsed time so the barrage is cadence-independent.
        let (_, fire_rate) = self.wave_row();
        let p = (fire_rate * dt.norm() as f64).min(1.0);
        for i in 0..self.enemies.len() {
            if self.rng.random::<f64>() < p {
                let origin =
                    self.enemies[i].pos + Vec2::new(0.0, ENEMY_HEIGHT / 2.0 + BULLET_HEIGHT / 2.0);
                let id = self.next_id();
                self.enemy_bullets.push(Body {
                    vel: Vec2::new(0.0, ENEMY_BULLET_SPEED),
                    ..Body::new(id, origin, Self::bullet_shape())
                });
            }
        }

        // Move bullets, then resolve hits at the new positions.
        for b in self.player_bullets.iter_mut().chain(self.enemy_bullets.iter_mut()) {
            b.integrate(dt);
        }

        let mut player_hit = false;
        for b in &mut self.enemy_bullets {
            if overlaps(b.pos, b.shape, self.player.pos, self.player.shape) {
                player_hit = true;
                b.pos.y = AREA_HEIGHT + BULLET_HEIGHT;
            } else if let Some(cell) = self.shields.iter_mut().find(|s| {
                s.hp > 0 && overlaps(b.pos, Self::bullet_shape(), s.pos, Self::shield_shape())
            }) {
                cell.hp -= 1;
                if cell.hp == 0 {
                    events.push(GameEvent::Destroyed { id: cell.id });
                }
                b.pos.y = AREA_HEIGHT + BULLET_HEIGHT;
            }
        }

        // Entities at zero hp are skipped: they are dead, just not retained
        // out yet, and a second bullet the same tick must pass through.
        let mut kills = 0;
        for b in &mut self.player_bullets {
            if let Some(enemy) = self.enemies.iter_mut().find(|e| {
                e.hp > 0 && overlaps(b.pos, Self::bullet_shape(), e.pos, Self::enemy_shape())
            }) {
                enemy.hp -= 1;
                if enemy.hp == 0 {
                    events.push(GameEvent::Destroyed { id: enemy.id });
                    kills += 1;
                }
                b.pos.y = -BULLET_HEIGHT;
            } else if let Some(cell) = self.shields.iter_mut().find(|s| {
                s.hp > 0 && overlaps(b.pos, Self::bullet_shape(), s.pos, Self::shield_shape())
            }) {
                cell.hp -= 1;
                if cell.hp == 0 {
                    events.push(GameEvent::Destroyed { id: cell.id });
                }
                b.pos.y = -BULLET_HEIGHT;
            }
        }
        self.session.add_score(kills * KILL_POINTS, events);

        self.enemies.retain(|e| e.hp > 0);
        self.shields.retain(|s| s.hp > 0);
        self.player_bullets.retain(|b| b.pos.y > -BULLET_HEIGHT / 2.0);
        self.enemy_bullets.retain(|b| b.pos.y < AREA_HEIGHT + BULLET_HEIGHT / 2.0);

        if player_hit {
            self.session.game_over(events);
            return;
        }

        if self.enemies.is_empty() {
            if self.session.level() as usize >= WAVES.len() {
                self.session.win(events);
            } else {
                self.session.level_up(events);
                self.build_wave();
            }
        }
    }
}

impl Simulation for Invaders {
    fn lifecycle(&self) -> Lifecycle {
        self.session.lifecycle()
    }

    fn step(&mut self, input: &InputSnapshot, dt: Dt, events: &mut Vec<GameEvent>) {
        self.tick(input, dt, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> Invaders {
        let mut game = Invaders::with_seed(11);
        game.restart();
        game
    }

    fn plain_step(game: &mut Invaders) -> Vec<GameEvent> {
        let mut events = Vec::new();
        game.step(&InputSnapshot::default(), Dt::NOMINAL, &mut events);
        events
    }

    #[test]
    fn wave_one_layout() {
        let game = Invaders::new();
        assert_eq!(game.enemies.len(), ENEMY_ROWS * ENEMY_COLS);
        assert!(game.enemies.iter().all(|e| e.hp == 1));
        assert_eq!(game.shields.len(), 4 * 3 * 6);
        assert!(game.shields.iter().all(|s| s.hp == 2));
    }

    #[test]
    fn firing_spawns_one_bullet_per_press() {
        let mut game = started();
        let fire = InputSnapshot {
            action: true,
            ..Default::default()
        };
        game.step(&fire, Dt::NOMINAL, &mut Vec::new());
        assert_eq!(game.player_bullets.len(), 1);
        assert!(game.player_bullets[0].vel.y < 0.0);
    }

    #[test]
    fn holding_fire_is_rate_limited_by_the_cooldown() {
        let mut game = started();
        let fire = InputSnapshot {
            action: true,
            ..Default::default()
        };
        let mut events = Vec::new();

        // Action held every frame: one shot, then the cooldown gates.
        game.step(&fire, Dt::NOMINAL, &mut events);
        game.step(&fire, Dt::NOMINAL, &mut events);
        game.step(&fire, Dt::NOMINAL, &mut events);
        assert_eq!(game.player_bullets.len(), 1, "no shot while cooling down");

        // After the cooldown window elapses the held action fires again.
        let ticks = (FIRE_COOLDOWN_MS / Dt::NOMINAL.ms()).ceil() as u32;
        for _ in 0..ticks {
            game.step(&fire, Dt::NOMINAL, &mut events);
        }
        assert_eq!(game.player_bullets.len(), 2);
    }

    #[test]
    fn stacked_bullets_kill_an_enemy_only_once() {
        let mut game = started();
        let target = game.enemies[0].pos;
        let id = game.enemies[0].id;
        // Two in-flight bullets close enough to both overlap the enemy on
        // the same tick; the second must pass through the fresh kill.
        for offset in [18.0, 22.0] {
            game.player_bullets.push(Body {
                vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
                ..Body::new(500, target + Vec2::new(0.0, offset), Invaders::bullet_shape())
            });
        }

        let events = plain_step(&mut game);
        let destroyed = events
            .iter()
            .filter(|e| **e == GameEvent::Destroyed { id })
            .count();
        assert_eq!(destroyed, 1);
        assert_eq!(game.session().score(), KILL_POINTS as u64);
        assert_eq!(game.enemies.len(), ENEMY_ROWS * ENEMY_COLS - 1);
    }

    #[test]
    fn stacked_bullets_spend_a_dying_shield_cell_only_once() {
        let mut game = started();
        game.shields[0].hp = 1;
        let cell = game.shields[0].pos;
        for offset in [10.0, 13.0] {
            game.enemy_bullets.push(Body {
                vel: Vec2::new(0.0, ENEMY_BULLET_SPEED),
                ..Body::new(600, cell - Vec2::new(0.0, offset), Invaders::bullet_shape())
            });
        }

        plain_step(&mut game);
        assert_eq!(game.shields.len(), 4 * 3 * 6 - 1);
        // The second bullet flew on instead of draining a dead cell.
        let survivors = game.enemy_bullets.iter().filter(|b| b.id == 600).count();
        assert_eq!(survivors, 1);
    }

    #[test]
    fn bullet_kill_scores_and_removes_enemy() {
        let mut game = started();
        let target = game.enemies[0].pos;
        let id = game.enemies[0].id;
        game.player_bullets.push(Body {
            vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            ..Body::new(500, target + Vec2::new(0.0, 20.0), Invaders::bullet_shape())
        });

        let events = plain_step(&mut game);
        assert!(events.contains(&GameEvent::Destroyed { id }));
        assert!(events.contains(&GameEvent::Scored { points: KILL_POINTS }));
        assert_eq!(game.enemies.len(), ENEMY_ROWS * ENEMY_COLS - 1);
        assert!(game.player_bullets.is_empty());
    }

    #[test]
    fn armored_enemy_survives_first_hit() {
        let mut game = started();
        let mut events = Vec::new();
        game.session.level_up(&mut events); // wave 2: hp 2
        game.build_wave();
        let target = game.enemies[0].pos;
        game.player_bullets.push(Body {
            vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            ..Body::new(500, target + Vec2::new(0.0, 20.0), Invaders::bullet_shape())
        });

        let events = plain_step(&mut game);
        assert!(events.iter().all(|e| !matches!(e, GameEvent::Destroyed { .. })));
        assert_eq!(game.enemies[0].hp, 1);
        assert_eq!(game.session().score(), 0);
    }

    #[test]
    fn shield_cell_soaks_two_hits() {
        let mut game = started();
        let cell = game.shields[0].pos;
        for _ in 0..2 {
            game.enemy_bullets.push(Body {
                vel: Vec2::new(0.0, ENEMY_BULLET_SPEED),
                ..Body::new(600, cell - Vec2::new(0.0, SHIELD_CELL), Invaders::bullet_shape())
            });
            plain_step(&mut game);
        }
        assert_eq!(game.shields.len(), 4 * 3 * 6 - 1);
    }

    #[test]
    fn enemy_bullet_on_player_ends_the_run() {
        let mut game = started();
        game.enemy_bullets.push(Body {
            vel: Vec2::new(0.0, ENEMY_BULLET_SPEED),
            ..Body::new(
                600,
                game.player.pos,
                Invaders::bullet_shape(),
            )
        });

        let events = plain_step(&mut game);
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(game.lifecycle(), Lifecycle::Over);
    }

    #[test]
    fn clearing_the_last_wave_wins() {
        let mut game = started();
        let mut events = Vec::new();
        for _ in 0..4 {
            game.session.level_up(&mut events);
        }
        game.build_wave();
        game.enemies.truncate(1);
        game.enemies[0].hp = 1;
        let target = game.enemies[0].pos;
        game.player_bullets.push(Body {
            vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            ..Body::new(500, target + Vec2::new(0.0, 20.0), Invaders::bullet_shape())
        });

        let events = plain_step(&mut game);
        assert!(events.contains(&GameEvent::Won));
        assert_eq!(game.lifecycle(), Lifecycle::Won);
    }

    #[test]
    fn clearing_an_early_wave_advances_and_rebuilds() {
        let mut game = started();
        game.enemies.truncate(1);
        game.enemies[0].hp = 1;
        let target = game.enemies[0].pos;
        game.player_bullets.push(Body {
            vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            ..Body::new(500, target + Vec2::new(0.0, 20.0), Invaders::bullet_shape())
        });

        let events = plain_step(&mut game);
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
        assert_eq!(game.enemies.len(), ENEMY_ROWS * ENEMY_COLS);
        assert!(game.enemies.iter().all(|e| e.hp == 2));
    }

    #[test]
    fn player_stays_inside_the_court() {
        let mut game = started();
        let input = InputSnapshot {
            right: true,
            ..Default::default()
        };
        let mut events = Vec::new();
        for _ in 0..100 {
            game.step(&input, Dt::NOMINAL, &mut events);
            if game.lifecycle().is_terminal() {
                break;
            }
        }
        assert!(game.player.pos.x <= AREA_WIDTH - PLAYER_WIDTH / 2.0);
    }
}
