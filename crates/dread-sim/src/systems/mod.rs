//! ECS systems that operate on the encounter world each tick.
//!
//! Systems are functions over `&mut World` (or `&World` for read-only) plus
//! the shared `SimContext`. Per-entity state lives in components.

pub mod agents;
pub mod cleanup;
pub mod contacts;
pub mod directors;
pub mod effects;
pub mod hazards;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
