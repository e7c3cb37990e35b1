//! Simulation engine for DREAD.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces EncounterSnapshots for whatever hosts it.

pub mod components;
pub mod config;
pub mod context;
pub mod engine;
pub mod layouts;
pub mod nav;
pub mod systems;
pub mod world_setup;

pub use dread_core as core;
pub use config::{EncounterConfig, OverflowPolicy};
pub use engine::EncounterEngine;

#[cfg(test)]
mod tests;
