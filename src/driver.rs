//! Frame driver
//!
//! Turns a stream of host timestamps (animation-frame callbacks, or a fixed
//! repeating timer) into measured-elapsed ticks and feeds them to a
//! [`Simulation`]. The driver owns all timing state, so repeated mounts or
//! multiple concurrent instances never cross-contaminate, and teardown is a
//! synchronous `stop()` that makes any already-scheduled callback inert.

use crate::consts::{MAX_FRAME_MS, NOMINAL_FRAME_MS};
use crate::events::GameEvent;
use crate::games::Simulation;
use crate::input::InputSnapshot;
use crate::session::Lifecycle;

/// Elapsed time for one tick.
///
/// Wraps measured milliseconds; [`Dt::norm`] is the scale factor applied to
/// per-nominal-frame motion constants. A zero-elapsed tick (the first tick
/// after start) produces no motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dt {
    ms: f32,
}

impl Dt {
    /// Zero elapsed time; a no-motion tick.
    pub const ZERO: Dt = Dt { ms: 0.0 };

    /// One nominal frame (~16.7 ms).
    pub const NOMINAL: Dt = Dt {
        ms: NOMINAL_FRAME_MS,
    };

    /// Wrap a measured elapsed time. Negative or non-finite values collapse
    /// to zero; anything beyond the frame budget is clamped.
    pub fn from_ms(ms: f32) -> Self {
        if !ms.is_finite() || ms < 0.0 {
            return Self::ZERO;
        }
        Self {
            ms: ms.min(MAX_FRAME_MS),
        }
    }

    #[inline]
    pub fn ms(&self) -> f32 {
        self.ms
    }

    #[inline]
    pub fn seconds(&self) -> f32 {
        self.ms / 1000.0
    }

    /// Elapsed time in nominal frames. 1.0 at exactly 60 Hz.
    #[inline]
    pub fn norm(&self) -> f32 {
        self.ms / NOMINAL_FRAME_MS
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.ms == 0.0
    }
}

/// Identifies one start/stop span of a driver.
///
/// Host callbacks capture the token they were scheduled under; a callback
/// firing after `stop()` (or after a restart) presents a stale token and is
/// ignored, so a torn-down view can never have its state advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(u64);

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Schedule the next callback.
    Continue,
    /// The tick was ignored (stopped driver or stale token) or the
    /// simulation reached a terminal lifecycle; do not reschedule.
    Stopped,
}

/// Requests ticks, measures elapsed time, and advances a simulation.
#[derive(Debug)]
pub struct FrameDriver {
    session: u64,
    running: bool,
    last_timestamp: Option<f64>,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            session: 0,
            running: false,
            last_timestamp: None,
        }
    }

    /// Begin delivering ticks. No-op if already started; returns the token
    /// callbacks must present.
    pub fn start(&mut self) -> SessionToken {
        if !self.running {
            self.session += 1;
            self.running = true;
            self.last_timestamp = None;
            log::debug!("frame driver started (session {})", self.session);
        }
        SessionToken(self.session)
    }

    /// Cancel any pending tick. Idempotent; safe to call from teardown paths
    /// that may run more than once.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.last_timestamp = None;
            log::debug!("frame driver stopped (session {})", self.session);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The token of the current (or most recent) session.
    pub fn token(&self) -> SessionToken {
        SessionToken(self.session)
    }

    /// Deliver one tick at `timestamp_ms` (host monotonic clock).
    ///
    /// The first tick of a session sees zero elapsed time; afterwards the
    /// elapsed is measured from the previous timestamp and clamped to the
    /// frame budget. The cadence is never assumed constant. Returns
    /// [`TickOutcome::Stopped`] once the simulation reaches a terminal
    /// lifecycle, stopping the driver so the host cannot forget to.
    pub fn tick<S: Simulation>(
        &mut self,
        token: SessionToken,
        sim: &mut S,
        input: &InputSnapshot,
        timestamp_ms: f64,
        events: &mut Vec<GameEvent>,
    ) -> TickOutcome {
        if !self.running || token.0 != self.session {
            return TickOutcome::Stopped;
        }

        let dt = match self.last_timestamp {
            Some(last) => Dt::from_ms((timestamp_ms - last) as f32),
            None => Dt::ZERO,
        };
        self.last_timestamp = Some(timestamp_ms);

        sim.step(input, dt, events);

        match sim.lifecycle() {
            Lifecycle::Over | Lifecycle::Won => {
                self.stop();
                TickOutcome::Stopped
            }
            _ => TickOutcome::Continue,
        }
    }
}

/// Degenerate frame driver for games built on a fixed repeating timer
/// instead of refresh-synced callbacks: every tick carries the same
/// elapsed time. Equally valid under the frame-driver contract.
#[derive(Debug)]
pub struct IntervalDriver {
    inner: FrameDriver,
    interval_ms: f32,
    clock_ms: f64,
}

impl IntervalDriver {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            inner: FrameDriver::new(),
            interval_ms: interval_ms.max(0.0),
            clock_ms: 0.0,
        }
    }

    pub fn start(&mut self) -> SessionToken {
        self.inner.start()
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    /// Deliver one constant-elapsed tick.
    pub fn tick<S: Simulation>(
        &mut self,
        token: SessionToken,
        sim: &mut S,
        input: &InputSnapshot,
        events: &mut Vec<GameEvent>,
    ) -> TickOutcome {
        self.clock_ms += self.interval_ms as f64;
        self.inner.tick(token, sim, input, self.clock_ms, events)
    }
}
