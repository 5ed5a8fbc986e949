//! Headless demo runner.
//!
//! Drives one of the simulations from the command line with a scripted
//! player, logging events as they happen and recording the best score at
//! the end. Useful for eyeballing tuning changes without a frontend.

use arcade_loop::games::{BallBounce, Catcher, Flappy, RainDodge};
use arcade_loop::scores::{self, MemoryStore, keys};
use arcade_loop::{FrameDriver, GameEvent, InputSnapshot, Simulation, TickOutcome};
use glam::Vec2;

const DEMO_TICKS: u32 = 10_000;
const FRAME_MS: f64 = 16.7;

fn main() {
    env_logger::init();

    let game = std::env::args().nth(1).unwrap_or_else(|| "ball-bounce".into());
    let (score, key) = match game.as_str() {
        "ball-bounce" => (
            run(BallBounce::new(), follow_ball, |g| g.session().score()),
            keys::BALL_BOUNCE,
        ),
        "flappy" => (
            run(Flappy::new(), flap_to_center, |g| g.session().score()),
            keys::FLAPPY,
        ),
        "rain-dodge" => (
            run(RainDodge::new(), dodge_drops, |g| g.session().score()),
            keys::RAIN_DODGE,
        ),
        "catcher" => (
            run(Catcher::new(), chase_items, |g| g.session().score()),
            keys::CATCH,
        ),
        other => {
            eprintln!("unknown game {other:?}; try ball-bounce, flappy, rain-dodge or catcher");
            std::process::exit(2);
        }
    };

    let mut store = MemoryStore::new();
    if scores::record_best(&mut store, key, score) {
        println!("{game}: new best {score}");
    } else {
        println!("{game}: finished at {score}");
    }
}

/// Run one session to completion (or the tick limit) under a scripted
/// player, returning the final score.
fn run<S, F, G>(mut sim: S, mut pilot: F, score: G) -> u64
where
    S: Simulation,
    F: FnMut(&S) -> InputSnapshot,
    G: Fn(&S) -> u64,
{
    let mut driver = FrameDriver::new();
    let token = driver.start();
    let mut events = Vec::new();
    let mut timestamp = 0.0;

    // First input starts the session.
    let mut input = InputSnapshot {
        action: true,
        ..Default::default()
    };

    for _ in 0..DEMO_TICKS {
        events.clear();
        let outcome = driver.tick(token, &mut sim, &input, timestamp, &mut events);
        for event in &events {
            match event {
                GameEvent::Scored { .. } | GameEvent::Spawned { .. } => {}
                other => log::info!("{other:?}"),
            }
        }
        if outcome == TickOutcome::Stopped {
            break;
        }
        timestamp += FRAME_MS;
        input = pilot(&sim);
    }
    driver.stop();
    score(&sim)
}

/// Keep the paddle on the ball's height.
fn follow_ball(game: &BallBounce) -> InputSnapshot {
    InputSnapshot {
        pointer: Some(Vec2::new(0.0, game.ball.pos.y)),
        ..Default::default()
    }
}

/// Flap whenever the bird sinks below the nearest gap's center.
fn flap_to_center(game: &Flappy) -> InputSnapshot {
    use arcade_loop::games::flappy::{AREA_HEIGHT, PIPE_GAP};

    let target = game
        .pipes
        .iter()
        .filter(|p| !p.passed)
        .map(|p| p.gap_top + PIPE_GAP / 2.0)
        .next()
        .unwrap_or(AREA_HEIGHT / 2.0);
    InputSnapshot {
        action: game.bird.pos.y > target,
        ..Default::default()
    }
}

/// Step away from the nearest falling drop.
fn dodge_drops(game: &RainDodge) -> InputSnapshot {
    let threat = game
        .drops
        .iter()
        .filter(|d| d.pos.y > 50.0)
        .min_by(|a, b| {
            let da = (a.pos.x - game.player.pos.x).abs();
            let db = (b.pos.x - game.player.pos.x).abs();
            da.total_cmp(&db)
        });
    match threat {
        Some(drop) => InputSnapshot {
            left: drop.pos.x >= game.player.pos.x,
            right: drop.pos.x < game.player.pos.x,
            ..Default::default()
        },
        None => InputSnapshot::default(),
    }
}

/// Chase the lowest fruit; bombs are simply not chased.
fn chase_items(game: &Catcher) -> InputSnapshot {
    use arcade_loop::games::catcher::ItemKind;

    let target = game
        .items
        .iter()
        .filter(|i| i.kind == ItemKind::Fruit)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
    match target {
        Some(item) => InputSnapshot {
            left: item.pos.x < game.basket_x,
            right: item.pos.x > game.basket_x,
            ..Default::default()
        },
        None => InputSnapshot::default(),
    }
}
