//! Simulation constants and tuning defaults.
//!
//! Per-archetype tuning lives in agent profiles; these are the shared values
//! every archetype and the engine agree on.

// --- Timing ---

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Fixed time step per tick (seconds).
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Navigation ---

/// Remaining path distance at which a movement leg counts as arrived.
pub const ARRIVAL_TOLERANCE: f32 = 0.5;

/// Velocities below this magnitude do not update the facing hint.
pub const FACING_DEADZONE: f32 = 0.1;

/// Default interval between path refreshes while chasing (seconds).
pub const PATH_UPDATE_INTERVAL: f32 = 0.2;

/// Radius searched for a navigable point around a teleport candidate.
pub const TELEPORT_SEARCH_RADIUS: f32 = 3.0;

// --- Escalation ---

/// Health ratio at or below which an agent is enraged.
pub const ENRAGED_HEALTH_RATIO: f32 = 0.5;

/// Health ratio at or below which an agent is desperate.
pub const DESPERATE_HEALTH_RATIO: f32 = 0.25;

// --- Health bands (display) ---

/// Health ratio at or below which the display band is mid.
pub const HEALTH_BAND_MID: f32 = 0.5;

/// Health ratio at or below which the display band is low.
pub const HEALTH_BAND_LOW: f32 = 0.3;

// --- Fear meter ---

pub const FEAR_MAX: f32 = 100.0;
pub const FEAR_FILL_SMOOTHING: f32 = 6.0;
pub const FEAR_DECAY_PER_SECOND: f32 = 0.0;
pub const FEAR_TENSE_THRESHOLD: f32 = 0.3;
pub const FEAR_PANIC_THRESHOLD: f32 = 0.7;

// --- Presentation ---

/// Duration of the hit flash applied when an agent takes damage.
pub const DAMAGE_FLASH_SECS: f32 = 0.1;

/// Duration of the target damage flash emitted by the fear meter.
pub const FEAR_FLASH_SECS: f32 = 0.15;

/// Default time a dead agent lingers before removal when it has no death clip.
pub const DEFAULT_DEATH_LINGER_SECS: f32 = 0.5;

// --- Target ---

/// Default collision radius of the target.
pub const TARGET_RADIUS: f32 = 0.5;
