//! Core types and definitions for the DREAD encounter engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! collaborator traits, commands, state snapshots, presentation events,
//! the fear meter and session context, and constants.
//! It has no dependency on any ECS or runtime framework.

pub mod collaborators;
pub mod commands;
pub mod constants;
pub mod director;
pub mod enums;
pub mod error;
pub mod events;
pub mod fear;
pub mod health;
pub mod session;
pub mod state;
pub mod types;
