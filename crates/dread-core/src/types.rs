//! Fundamental geometric and simulation types.
//!
//! Positions are planar (`glam::Vec2`, world units). x = right, y = up.

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::DT;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one fixed tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += DT as f64;
    }
}

/// Stable identifier for an agent within one encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Stable identifier for an encounter director.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DirectorId(pub u32);

/// Stable identifier for a hazard area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HazardId(pub u32);

/// Stable identifier for a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

/// Linear RGBA color used by flash intents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    pub const ORANGE: Rgba = Rgba::new(1.0, 0.55, 0.0, 1.0);
    pub const PURPLE: Rgba = Rgba::new(0.5, 0.0, 1.0, 1.0);
    pub const GREEN: Rgba = Rgba::new(0.3, 1.0, 0.3, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle centered on `center` with the given half extents.
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// True when the rectangle has no interior area.
    pub fn is_empty(&self) -> bool {
        !(self.max.x > self.min.x && self.max.y > self.min.y)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Nearest point inside the rectangle.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Unit vector pointing from `threat` toward `from`.
///
/// Falls back to +x when the two points coincide so retreat math never
/// produces NaN.
pub fn away_from(from: Vec2, threat: Vec2) -> Vec2 {
    let dir = (from - threat).normalize_or_zero();
    if dir == Vec2::ZERO {
        Vec2::X
    } else {
        dir
    }
}

/// Unit vector at `angle` radians from +x.
pub fn unit_at(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
