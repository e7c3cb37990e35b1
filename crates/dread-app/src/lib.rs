//! DREAD headless host.
//!
//! Wires the encounter engine to a paced game loop thread, a scripted target
//! and a command-line front end.

pub mod cli;
pub mod game_loop;
pub mod script;
pub mod state;

pub use dread_core as core;
