//! Straight-line navigation over a rectangular arena.
//!
//! Every point inside the arena bounds is navigable. Paths are solved
//! instantly, so a path is never pending.

use dread_core::collaborators::Pathfinder;
use dread_core::types::{Rect, Vec2};

/// Pathfinder for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaNav {
    bounds: Rect,
    position: Vec2,
    destination: Option<Vec2>,
    speed: f32,
    velocity: Vec2,
    stopped: bool,
}

impl ArenaNav {
    /// Start at `position`, pulled inside `bounds`.
    pub fn new(bounds: Rect, position: Vec2) -> Self {
        Self {
            bounds,
            position: bounds.clamp(position),
            destination: None,
            speed: 0.0,
            velocity: Vec2::ZERO,
            stopped: false,
        }
    }

    /// Move toward the destination for `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let Some(destination) = self.destination else {
            self.velocity = Vec2::ZERO;
            return;
        };
        if self.stopped || self.speed <= 0.0 {
            self.velocity = Vec2::ZERO;
            return;
        }
        let to_go = destination - self.position;
        let distance = to_go.length();
        let step = self.speed * dt;
        if distance <= step {
            self.velocity = if dt > 0.0 { to_go / dt } else { Vec2::ZERO };
            self.position = destination;
        } else {
            self.velocity = to_go / distance * self.speed;
            self.position = self.bounds.clamp(self.position + self.velocity * dt);
        }
    }

    pub fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Pathfinder for ArenaNav {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_destination(&mut self, point: Vec2) {
        self.destination = Some(self.bounds.clamp(point));
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn current_velocity(&self) -> Vec2 {
        self.velocity
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map_or(0.0, |destination| self.position.distance(destination))
    }

    fn is_path_pending(&self) -> bool {
        false
    }

    fn is_on_navigable_surface(&self) -> bool {
        self.bounds.contains(self.position)
    }

    fn sample_point_on_surface(&self, point: Vec2, max_radius: f32) -> Option<Vec2> {
        let nearest = self.bounds.clamp(point);
        (nearest.distance(point) <= max_radius).then_some(nearest)
    }

    fn warp(&mut self, point: Vec2) {
        self.position = self.bounds.clamp(point);
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.velocity = Vec2::ZERO;
    }

    fn resume(&mut self) {
        self.stopped = false;
    }
}
