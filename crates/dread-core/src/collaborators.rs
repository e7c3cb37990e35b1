//! Interfaces to the collaborators the agent logic depends on.
//!
//! Path solving, persistence and session flow are owned outside the agents.
//! The engine provides concrete implementations. Tests provide scripted doubles.

use crate::types::Vec2;

/// Navigation capability for one moving entity.
///
/// The pathfinder owns the entity's position; agents read it every tick.
pub trait Pathfinder {
    /// Current position of the entity.
    fn position(&self) -> Vec2;
    fn set_destination(&mut self, point: Vec2);
    fn set_speed(&mut self, speed: f32);
    fn current_velocity(&self) -> Vec2;
    /// Distance left on the current path (0 when there is none).
    fn remaining_distance(&self) -> f32;
    fn is_path_pending(&self) -> bool;
    fn is_on_navigable_surface(&self) -> bool;
    /// Nearest navigable point within `max_radius` of `point`.
    fn sample_point_on_surface(&self, point: Vec2, max_radius: f32) -> Option<Vec2>;
    /// Relocate instantly, bypassing path following.
    fn warp(&mut self, point: Vec2);
    /// Halt movement while keeping the current destination.
    fn stop(&mut self);
    fn resume(&mut self);
}

/// Records which persistent objects have been resolved (killed, collected)
/// so they are not recreated when a level reloads.
pub trait PersistenceRegistry {
    fn is_resolved(&self, id: &str) -> bool;
    fn mark_resolved(&mut self, id: &str);
}

/// Session flow hook invoked when the fear meter overflows.
pub trait SessionController {
    /// Called once per fill. Returning `Some(value)` resets the meter to
    /// `value`; returning `None` leaves it full.
    fn on_fear_overflow(&mut self) -> Option<f32>;
}
