//! Spawn policies
//!
//! Obstacles and collectibles are created either on a fixed schedule (one
//! every N milliseconds of elapsed game time) or probabilistically per tick,
//! with the probability scaling as difficulty rises. All randomness comes
//! from a seeded per-session RNG so runs are reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::driver::Dt;

/// Rule deciding when new bodies are created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnPolicy {
    /// One spawn every `every_ms` of elapsed game time.
    Interval { every_ms: f32 },
    /// Per-tick roll at `base + per_level * (level - 1)`, capped at `max`.
    /// The roll probability is scaled to elapsed time so the emission rate
    /// is independent of tick cadence.
    Chance { base: f64, per_level: f64, max: f64 },
}

/// Stateful spawner: owns the policy, the elapsed-time carry and the RNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    policy: SpawnPolicy,
    rng: Pcg32,
    carry_ms: f32,
}

impl Spawner {
    pub fn new(policy: SpawnPolicy, seed: u64) -> Self {
        Self {
            policy,
            rng: Pcg32::seed_from_u64(seed),
            carry_ms: 0.0,
        }
    }

    /// How many bodies to spawn this tick. Zero-elapsed ticks never spawn.
    pub fn poll(&mut self, dt: Dt, level: u32) -> u32 {
        if dt.is_zero() {
            return 0;
        }
        match self.policy {
            SpawnPolicy::Interval { every_ms } => {
                let every = every_ms.max(1.0);
                self.carry_ms += dt.ms();
                let mut count = 0;
                while self.carry_ms >= every {
                    self.carry_ms -= every;
                    count += 1;
                }
                count
            }
            SpawnPolicy::Chance {
                base,
                per_level,
                max,
            } => {
                let level_ups = level.saturating_sub(1) as f64;
                let p = (base + per_level * level_ups).min(max).max(0.0);
                let p = (p * dt.norm() as f64).min(1.0);
                u32::from(self.rng.random::<f64>() < p)
            }
        }
    }

    /// RNG for drawing spawn positions/speeds, so one seed covers the whole
    /// spawn stream.
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}

/// Random value in `[min, max)`, falling back to `min` when the range is
/// empty or inverted (e.g. a spawn area smaller than the gap it must hold).
pub fn span_between<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
