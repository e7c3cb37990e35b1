//! ECS components and engine-owned entity state.
//!
//! Agent, director, hazard and projectile logic lives in `dread-agent-ai`.
//! Entities carry those logic structs directly, plus the small markers below.

use serde::{Deserialize, Serialize};

use dread_core::types::{DirectorId, Vec2};

/// The director that spawned an agent. Counts against its population cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedBy(pub DirectorId);

/// Projectile position. Projectiles fly straight and do not use a pathfinder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
}

/// The tracked target. Only its position and liveness matter to the core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    pub position: Vec2,
    pub active: bool,
    pub radius: f32,
}

impl TargetState {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            active: true,
            radius,
        }
    }

    /// True when a circle at `center` with `radius` overlaps the target.
    pub fn overlaps(&self, center: Vec2, radius: f32) -> bool {
        self.active && self.position.distance(center) <= self.radius + radius
    }
}
