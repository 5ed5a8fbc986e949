//! Bodies, boundaries and overlap tests
//!
//! The pure geometric model every game simulates against: each body carries
//! its own logical position and size, and collisions are computed from that
//! model, never from rendered layout. Keeps the step deterministic and
//! testable without a rendering environment.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::driver::Dt;

/// Shape descriptor used for collision testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned rectangle, stored as half extents.
    Rect { half: Vec2 },
}

impl Shape {
    pub fn rect(width: f32, height: f32) -> Self {
        Shape::Rect {
            half: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Half extents on each axis, for boundary handling.
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Rect { half } => half,
        }
    }
}

/// A movable body. Owned exclusively by one simulation instance and
/// recreated on game start/restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
}

impl Body {
    pub fn new(id: u32, pos: Vec2, shape: Shape) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            shape,
        }
    }

    /// Advance position by velocity over the elapsed time. Velocity is in
    /// logical units per nominal frame, so a zero-elapsed tick moves nothing.
    pub fn integrate(&mut self, dt: Dt) {
        self.pos += self.vel * dt.norm();
    }

    /// Whether position and velocity are still valid numbers. A body that
    /// picked up a NaN (division by zero in an angle/distance calculation)
    /// must be removed as a recoverable event, not propagated.
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        overlaps(self.pos, self.shape, other.pos, other.shape)
    }
}

/// Two bodies collide when their shape descriptors overlap: axis-aligned
/// rectangle overlap for rectangular bodies, center distance less than the
/// sum of radii for circles, closest-point distance for a mixed pair.
pub fn overlaps(a_pos: Vec2, a: Shape, b_pos: Vec2, b: Shape) -> bool {
    match (a, b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            let r = ra + rb;
            a_pos.distance_squared(b_pos) < r * r
        }
        (Shape::Rect { half: ha }, Shape::Rect { half: hb }) => {
            let d = (a_pos - b_pos).abs();
            d.x < ha.x + hb.x && d.y < ha.y + hb.y
        }
        (Shape::Circle { radius }, Shape::Rect { half }) => {
            let closest = b_pos + (a_pos - b_pos).clamp(-half, half);
            a_pos.distance_squared(closest) < radius * radius
        }
        (Shape::Rect { .. }, Shape::Circle { .. }) => overlaps(b_pos, b, a_pos, a),
    }
}

/// Logical play-area bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// What to do when a body would cross a play-area edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgePolicy {
    /// Reflect the crossing velocity component (ball/brick games).
    Reflect,
    /// Clamp position to the edge and zero the component
    /// (paddle-confinement games).
    Clamp,
}

/// Edges a body touched during boundary handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl EdgeContact {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// Keep a body inside `bounds` after integration, accounting for its shape
/// extent. Returns which edges were contacted.
pub fn confine(body: &mut Body, bounds: &Bounds, policy: EdgePolicy) -> EdgeContact {
    let ext = body.shape.half_extents();
    let mut contact = EdgeContact::default();

    // Degenerate case: body larger than the area on an axis. Pin to the
    // axis midpoint rather than oscillating between edges.
    let lo = bounds.min + ext;
    let hi = bounds.max - ext;
    let (lo_x, hi_x) = if lo.x <= hi.x {
        (lo.x, hi.x)
    } else {
        let mid = (bounds.min.x + bounds.max.x) / 2.0;
        (mid, mid)
    };
    let (lo_y, hi_y) = if lo.y <= hi.y {
        (lo.y, hi.y)
    } else {
        let mid = (bounds.min.y + bounds.max.y) / 2.0;
        (mid, mid)
    };

    if body.pos.x <= lo_x {
        body.pos.x = lo_x;
        contact.left = true;
        body.vel.x = match policy {
            EdgePolicy::Reflect if body.vel.x < 0.0 => -body.vel.x,
            EdgePolicy::Reflect => body.vel.x,
            EdgePolicy::Clamp => 0.0,
        };
    } else if body.pos.x >= hi_x {
        body.pos.x = hi_x;
        contact.right = true;
        body.vel.x = match policy {
            EdgePolicy::Reflect if body.vel.x > 0.0 => -body.vel.x,
            EdgePolicy::Reflect => body.vel.x,
            EdgePolicy::Clamp => 0.0,
        };
    }

    if body.pos.y <= lo_y {
        body.pos.y = lo_y;
        contact.top = true;
        body.vel.y = match policy {
            EdgePolicy::Reflect if body.vel.y < 0.0 => -body.vel.y,
            EdgePolicy::Reflect => body.vel.y,
            EdgePolicy::Clamp => 0.0,
        };
    } else if body.pos.y >= hi_y {
        body.pos.y = hi_y;
        contact.bottom = true;
        body.vel.y = match policy {
            EdgePolicy::Reflect if body.vel.y > 0.0 => -body.vel.y,
            EdgePolicy::Reflect => body.vel.y,
            EdgePolicy::Clamp => 0.0,
        };
    }

    contact
}
