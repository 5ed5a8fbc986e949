//! Brick Breaker
//!
//! Paddle-and-ball brick clearing over five fixed level patterns. The ball
//! reflects off the side and top walls, deflects off the paddle by hit
//! offset, and is lost past the bottom edge. From level five on, the top
//! brick rows take multiple hits.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::body::{Body, Shape, overlaps};
use crate::driver::Dt;
use crate::events::GameEvent;
use crate::input::InputSnapshot;
use crate::session::{Lifecycle, Session};

use super::Simulation;

pub const AREA: f32 = 500.0;
pub const PADDLE_WIDTH: f32 = 100.0;
pub const PADDLE_HEIGHT: f32 = 10.0;
/// Paddle centerline sits just above the bottom edge.
pub const PADDLE_Y: f32 = AREA - 15.0;
pub const BALL_RADIUS: f32 = 8.0;
/// Starting speed in units per nominal frame; raised 10% per level.
pub const BALL_START_SPEED: f32 = 2.0;
pub const SPEED_MULTIPLIER: f32 = 1.1;
/// Paddle travel per nominal frame while a direction is held.
pub const PADDLE_STEP: f32 = 20.0;
/// Horizontal deflection per unit of paddle hit offset.
const DEFLECTION: f32 = AREA * 0.012;

pub const BRICK_COLS: usize = 10;
pub const BRICK_WIDTH: f32 = AREA / BRICK_COLS as f32;
pub const BRICK_HEIGHT: f32 = 20.0;
const BRICK_TOP_OFFSET: f32 = 30.0;
pub const MAX_LEVEL: u32 = 5;

/// One brick. Destroyed when `hp` reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    /// Center position.
    pub pos: Vec2,
    pub hp: u8,
}

impl Brick {
    fn shape() -> Shape {
        Shape::rect(BRICK_WIDTH, BRICK_HEIGHT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickBreaker {
    session: Session,
    pub ball: Body,
    /// Paddle center x; the paddle only moves horizontally.
    pub paddle_x: f32,
    pub bricks: Vec<Brick>,
    speed_scale: f32,
    next_id: u32,
}

impl Default for BrickBreaker {
    fn default() -> Self {
        Self::new()
    }
}

impl BrickBreaker {
    pub fn new() -> Self {
        let mut game = Self {
            session: Session::new(),
            ball: Body::new(0, Vec2::ZERO, Shape::Circle { radius: BALL_RADIUS }),
            paddle_x: AREA / 2.0,
            bricks: Vec::new(),
            speed_scale: 1.0,
            next_id: 1,
        };
        game.build_level();
        game.reset_court();
        game
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn restart(&mut self) {
        *self = Self::new();
        self.session.start();
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Brick layout for the current level.
    fn build_level(&mut self) {
        let level = self.session.level();
        let rows = (3 + level).min(7) as usize;
        self.bricks.clear();

        for r in 0..rows {
            for c in 0..BRICK_COLS {
                let hp = brick_hp(level, r, c, rows);
                if hp == 0 {
                    continue;
                }
                let id = self.next_id();
                self.bricks.push(Brick {
                    id,
                    pos: Vec2::new(
                        c as f32 * BRICK_WIDTH + BRICK_WIDTH / 2.0,
                        r as f32 * BRICK_HEIGHT + BRICK_TOP_OFFSET + BRICK_HEIGHT / 2.0,
                    ),
                    hp,
                });
            }
        }
    }

    /// Put ball and paddle back to their serve positions.
    fn reset_court(&mut self) {
        let speed = BALL_START_SPEED * self.speed_scale;
        self.paddle_x = AREA / 2.0;
        self.ball.pos = Vec2::new(AREA / 2.0, AREA - 40.0);
        self.ball.vel = Vec2::new(speed, -speed);
    }

    fn paddle_shape() -> Shape {
        Shape::rect(PADDLE_WIDTH, PADDLE_HEIGHT)
    }

    fn paddle_pos(&self) -> Vec2 {
        Vec2::new(self.paddle_x, PADDLE_Y)
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

        // Paddle: held keys or pointer drag, clamped into the court.
        if let Some(p) = input.pointer {
            self.paddle_x = p.x;
        } else {
            self.paddle_x += input.axis_x() * PADDLE_STEP * dt.norm();
        }
        let half = PADDLE_WIDTH / 2.0;
        self.paddle_x = self.paddle_x.clamp(half, AREA - half);

        // Integrate first, then test everything against the new position.
        self.ball.integrate(dt);

        // Walls: reflect on sides and top; the bottom edge is the losing side.
        let r = BALL_RADIUS;
        if self.ball.pos.x <= r {
            self.ball.pos.x = r;
            self.ball.vel.x = self.ball.vel.x.abs();
        } else if self.ball.pos.x >= AREA - r {
            self.ball.pos.x = AREA - r;
            self.ball.vel.x = -self.ball.vel.x.abs();
        }
        if self.ball.pos.y <= r {
            self.ball.pos.y = r;
            self.ball.vel.y = self.ball.vel.y.abs();
        }
        if self.ball.pos.y >= AREA {
            events.push(GameEvent::OutOfBounds { id: self.ball.id });
            self.session.game_over(events);
            return;
        }

        // Paddle deflection: horizontal component proportional to how far
        // from the paddle center the ball landed.
        if self.ball.vel.y > 0.0
            && overlaps(self.ball.pos, self.ball.shape, self.paddle_pos(), Self::paddle_shape())
        {
            let hit = (self.ball.pos.x - self.paddle_x) / (PADDLE_WIDTH / 2.0);
            self.ball.vel.x = hit * DEFLECTION * self.speed_scale;
            self.ball.vel.y = -self.ball.vel.y.abs();
        }

        // Bricks: first overlap wins this tick.
        let level = self.session.level();
        let mut hit_brick: Option<usize> = None;
        for (i, brick) in self.bricks.iter().enumerate() {
            if overlaps(self.ball.pos, self.ball.shape, brick.pos, Brick::shape()) {
                hit_brick = Some(i);
                break;
            }
        }
        if let Some(i) = hit_brick {
            self.ball.vel.y = -self.ball.vel.y;
            self.session.add_score(10 * level, events);
            let brick = &mut self.bricks[i];
            brick.hp -= 1;
            if brick.hp == 0 {
                events.push(GameEvent::Destroyed { id: brick.id });
                self.bricks.remove(i);
            }
        }

        if self.bricks.is_empty() {
            if level >= MAX_LEVEL {
                self.session.win(events);
            } else {
                self.session.level_up(events);
                self.speed_scale *= SPEED_MULTIPLIER;
                self.build_level();
                self.reset_court();
            }
        }
    }
}

/// Hit points for a grid cell under the level's pattern; zero means no
/// brick. Levels past the table reuse the solid layout.
fn brick_hp(level: u32, r: usize, c: usize, rows: usize) -> u8 {
    match level {
        2 => u8::from((r + c) % 2 == 0),
        3 => u8::from(c < 3 || c > 6),
        4 => {
            let center = (BRICK_COLS - 1) as f32 / 2.0;
            let dist = (c as f32 - center).abs() + (r as f32 - (rows - 1) as f32 / 2.0).abs();
            u8::from(dist <= rows as f32 / 2.0)
        }
        5 => match r {
            0 => 3,
            1 => 2,
            _ => 1,
        },
        _ => 1,
    }
}

impl Simulation for BrickBreaker {
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

    fn started() -> BrickBreaker {
        let mut game = BrickBreaker::new();
        game.restart();
        game
    }

    fn run(game: &mut BrickBreaker, ticks: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let input = InputSnapshot::default();
        for _ in 0..ticks {
            game.step(&input, Dt::NOMINAL, &mut events);
        }
        events
    }

    #[test]
    fn level_one_is_a_solid_wall() {
        let game = BrickBreaker::new();
        assert_eq!(game.bricks.len(), 4 * BRICK_COLS);
        assert!(game.bricks.iter().all(|b| b.hp == 1));
    }

    #[test]
    fn checkerboard_pattern_skips_alternating_cells() {
        assert_eq!(brick_hp(2, 0, 0, 5), 1);
        assert_eq!(brick_hp(2, 0, 1, 5), 0);
        assert_eq!(brick_hp(2, 1, 1, 5), 1);
    }

    #[test]
    fn level_five_front_rows_are_armored() {
        assert_eq!(brick_hp(5, 0, 4, 7), 3);
        assert_eq!(brick_hp(5, 1, 4, 7), 2);
        assert_eq!(brick_hp(5, 3, 4, 7), 1);
    }

    #[test]
    fn brick_hit_scores_and_reflects() {
        let mut game = started();
        // Park the ball just under the lowest brick row, heading up.
        let target = game.bricks.last().expect("bricks").pos;
        game.ball.pos = target + Vec2::new(0.0, BRICK_HEIGHT / 2.0 + BALL_RADIUS + 1.0);
        game.ball.vel = Vec2::new(0.0, -3.0);

        let mut events = Vec::new();
        game.step(&InputSnapshot::default(), Dt::NOMINAL, &mut events);

        assert!(events.iter().any(|e| matches!(e, GameEvent::Scored { points: 10 })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Destroyed { .. })));
        assert!(game.ball.vel.y > 0.0);
        assert_eq!(game.session().score(), 10);
    }

    #[test]
    fn ball_past_bottom_ends_the_game_once() {
        let mut game = started();
        game.ball.pos = Vec2::new(250.0, AREA - 1.0);
        game.ball.vel = Vec2::new(0.0, 5.0);
        // Keep the paddle out of the way.
        game.paddle_x = PADDLE_WIDTH / 2.0;

        let events = run(&mut game, 10);
        let overs = events.iter().filter(|e| **e == GameEvent::GameOver).count();
        assert_eq!(overs, 1);
        assert_eq!(game.lifecycle(), Lifecycle::Over);

        // No further position updates until restart.
        let frozen = game.ball.pos;
        run(&mut game, 5);
        assert_eq!(game.ball.pos, frozen);
    }

    #[test]
    fn clearing_a_level_rebuilds_and_speeds_up() {
        let mut game = started();
        game.bricks.truncate(1);
        let brick = game.bricks[0].pos;
        game.ball.pos = brick + Vec2::new(0.0, BRICK_HEIGHT / 2.0 + BALL_RADIUS + 1.0);
        game.ball.vel = Vec2::new(0.0, -3.0);

        let mut events = Vec::new();
        game.step(&InputSnapshot::default(), Dt::NOMINAL, &mut events);

        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
        assert_eq!(game.session().level(), 2);
        assert!(!game.bricks.is_empty());
        assert!(game.ball.vel.length() > BALL_START_SPEED);
    }

    #[test]
    fn clearing_level_five_wins() {
        let mut game = started();
        for _ in 0..4 {
            let mut events = Vec::new();
            game.session.level_up(&mut events);
        }
        game.build_level();
        game.bricks.truncate(1);
        let brick = game.bricks[0].pos;
        game.ball.pos = brick + Vec2::new(0.0, BRICK_HEIGHT / 2.0 + BALL_RADIUS + 1.0);
        game.ball.vel = Vec2::new(0.0, -3.0);

        let mut events = Vec::new();
        game.step(&InputSnapshot::default(), Dt::NOMINAL, &mut events);
        assert_eq!(game.lifecycle(), Lifecycle::Won);
        assert!(events.contains(&GameEvent::Won));
    }

    #[test]
    fn paddle_stays_inside_the_court() {
        let mut game = started();
        game.ball.vel = Vec2::ZERO;
        game.ball.pos = Vec2::new(250.0, 250.0);
        let input = InputSnapshot {
            left: true,
            ..Default::default()
        };
        let mut events = Vec::new();
        for _ in 0..200 {
            game.step(&input, Dt::NOMINAL, &mut events);
        }
        assert_eq!(game.paddle_x, PADDLE_WIDTH / 2.0);
    }

    #[test]
    fn pause_freezes_motion() {
        let mut game = started();
        run(&mut game, 2);
        let pos = game.ball.pos;
        let mut events = Vec::new();
        game.step(
            &InputSnapshot {
                pause: true,
                ..Default::default()
            },
            Dt::NOMINAL,
            &mut events,
        );
        run(&mut game, 5);
        assert_eq!(game.ball.pos, pos);
        assert_eq!(game.lifecycle(), Lifecycle::Paused);
    }
}
