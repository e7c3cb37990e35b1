//! Hostile agent behavior for the DREAD encounter engine.
//!
//! Archetype state machines, ability scheduling, phase escalation, hazard
//! areas, projectiles and the encounter director. No ECS dependency: every
//! type here operates on plain data plus the collaborator traits from
//! `dread-core`, so it can be driven by the engine or by scripted doubles.

pub mod archetypes;
pub mod controller;
pub mod director;
pub mod hazard;
pub mod output;
pub mod phase;
pub mod profiles;
pub mod projectile;
pub mod scheduler;

pub use dread_core as core;

#[cfg(test)]
mod tests;
