//! Ball Bounce
//!
//! Single-paddle wall game in a 100x100 logical court. The ball reflects
//! off the left, top and bottom walls; the right side is guarded by a
//! vertical paddle. Each return scores a point, a miss ends the run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::body::{Body, Bounds, EdgePolicy, Shape, confine};
use crate::driver::Dt;
use crate::events::GameEvent;
use crate::input::InputSnapshot;
use crate::session::{Lifecycle, Session};

use super::Simulation;

pub const AREA: f32 = 100.0;
pub const BALL_RADIUS: f32 = 5.0;
/// X coordinate of the paddle face.
pub const PADDLE_X: f32 = 90.0;
pub const PADDLE_HALF_HEIGHT: f32 = 15.0;
/// Paddle travel per nominal frame while a direction is held.
pub const PADDLE_STEP: f32 = 5.0;
const BALL_START_VEL: Vec2 = Vec2::new(2.0, 0.7);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallBounce {
    session: Session,
    pub ball: Body,
    /// Paddle center y on the right wall.
    pub paddle_y: f32,
    bounds: Bounds,
}

impl Default for BallBounce {
    fn default() -> Self {
        Self::new()
    }
}

impl BallBounce {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            ball: Body {
                vel: BALL_START_VEL,
                ..Body::new(0, Vec2::splat(AREA / 2.0), Shape::Circle { radius: BALL_RADIUS })
            },
            paddle_y: AREA / 2.0,
            bounds: Bounds::new(AREA, AREA),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn restart(&mut self) {
        *self = Self::new();
        self.session.start();
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

        if let Some(p) = input.pointer {
            self.paddle_y = p.y;
        } else {
            self.paddle_y += input.axis_y() * PADDLE_STEP * dt.norm();
        }
        self.paddle_y = self
            .paddle_y
            .clamp(PADDLE_HALF_HEIGHT - BALL_RADIUS, AREA - PADDLE_HALF_HEIGHT + BALL_RADIUS);

        self.ball.integrate(dt);

        // Return off the paddle face, judged at the ball's new position.
        let reachable = (self.ball.pos.y - self.paddle_y).abs() < PADDLE_HALF_HEIGHT;
        if self.ball.vel.x > 0.0 && self.ball.pos.x >= PADDLE_X - BALL_RADIUS && reachable {
            self.ball.pos.x = PADDLE_X - BALL_RADIUS;
            self.ball.vel.x = -self.ball.vel.x.abs();
            self.session.add_score(1, events);
        } else if self.ball.pos.x >= AREA - BALL_RADIUS {
            events.push(GameEvent::OutOfBounds { id: self.ball.id });
            self.session.game_over(events);
            return;
        }

        // Everything else is a plain reflecting wall. The right edge cannot
        // fire here: a miss already ended the tick above.
        confine(&mut self.ball, &self.bounds, EdgePolicy::Reflect);
    }
}

impl Simulation for BallBounce {
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

    fn started() -> BallBounce {
        let mut game = BallBounce::new();
        game.restart();
        game
    }

    #[test]
    fn idle_until_action() {
        let mut game = BallBounce::new();
        let start = game.ball.pos;
        let mut events = Vec::new();
        game.step(&InputSnapshot::default(), Dt::NOMINAL, &mut events);
        assert_eq!(game.ball.pos, start);
        assert_eq!(game.lifecycle(), Lifecycle::Idle);

        game.step(
            &InputSnapshot {
                action: true,
                ..Default::default()
            },
            Dt::NOMINAL,
            &mut events,
        );
        assert_ne!(game.ball.pos, start);
        assert_eq!(game.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn paddle_return_scores_and_reverses() {
        let mut game = started();
        game.ball.pos = Vec2::new(PADDLE_X - BALL_RADIUS - 1.0, 50.0);
        game.ball.vel = Vec2::new(2.0, 0.0);
        game.paddle_y = 50.0;

        let mut events = Vec::new();
        game.step(&InputSnapshot::default(), Dt::NOMINAL, &mut events);

        assert!(game.ball.vel.x < 0.0);
        assert_eq!(game.session().score(), 1);
        assert!(events.contains(&GameEvent::Scored { points: 1 }));
    }

    #[test]
    fn miss_ends_the_run() {
        let mut game = started();
        game.ball.pos = Vec2::new(AREA - BALL_RADIUS - 1.0, 20.0);
        game.ball.vel = Vec2::new(3.0, 0.0);
        game.paddle_y = 80.0; // nowhere near

        let mut events = Vec::new();
        game.step(&InputSnapshot::default(), Dt::NOMINAL, &mut events);
        assert_eq!(game.lifecycle(), Lifecycle::Over);
        assert!(events.contains(&GameEvent::GameOver));

        // Terminal state freezes the ball.
        let frozen = game.ball.pos;
        game.step(&InputSnapshot::default(), Dt::NOMINAL, &mut events);
        assert_eq!(game.ball.pos, frozen);
    }

    #[test]
    fn ball_reflects_off_the_left_wall() {
        let mut game = started();
        game.ball.pos = Vec2::new(BALL_RADIUS + 1.0, 50.0);
        game.ball.vel = Vec2::new(-2.0, 0.0);

        game.step(&InputSnapshot::default(), Dt::NOMINAL, &mut Vec::new());
        assert!(game.ball.vel.x > 0.0);
        assert!(game.ball.pos.x >= BALL_RADIUS);
    }

    #[test]
    fn half_speed_ticks_cover_the_same_ground() {
        let mut whole = started();
        let mut halves = whole.clone();
        let input = InputSnapshot::default();
        let mut events = Vec::new();

        whole.step(&input, Dt::from_ms(16.7), &mut events);
        halves.step(&input, Dt::from_ms(8.35), &mut events);
        halves.step(&input, Dt::from_ms(8.35), &mut events);

        assert!((whole.ball.pos - halves.ball.pos).length() < 1e-4);
    }

    #[test]
    fn restart_from_terminal_resets_score() {
        let mut game = started();
        let mut events = Vec::new();
        game.session.add_score(7, &mut events);
        game.session.game_over(&mut events);

        game.step(
            &InputSnapshot {
                restart: true,
                ..Default::default()
            },
            Dt::NOMINAL,
            &mut events,
        );
        assert_eq!(game.session().score(), 0);
        assert_eq!(game.lifecycle(), Lifecycle::Running);
    }
}
