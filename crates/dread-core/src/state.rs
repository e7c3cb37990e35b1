//! Encounter snapshot: the complete visible state produced after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::PresentationEvent;
use crate::types::{AgentId, DirectorId, HazardId, ProjectileId, SimTime, Vec2};

/// Complete encounter state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub time: SimTime,
    pub layout: Option<EncounterLayout>,
    pub target: TargetView,
    pub fear: FearView,
    pub agents: Vec<AgentView>,
    pub hazards: Vec<HazardView>,
    pub projectiles: Vec<ProjectileView>,
    pub directors: Vec<DirectorView>,
    pub keys_collected: u32,
    /// Number of fear overflows handled this session.
    pub session_resets: u32,
    /// Presentation intents emitted during this tick, in emission order.
    pub presentation: Vec<PresentationEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetView {
    pub position: Vec2,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FearView {
    pub value: f32,
    pub max: f32,
    /// Smoothed value for bar rendering.
    pub visual: f32,
    pub band: FearBand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub archetype: AgentArchetype,
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub health_band: HealthBand,
    pub mode: AgentMode,
    /// Archetype-specific state name, e.g. "shooting" or "teleport_telegraph".
    pub state: String,
    pub enraged: bool,
    pub desperate: bool,
    pub invulnerable: bool,
    pub facing: Option<Facing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardView {
    pub id: HazardId,
    pub owner: Option<AgentId>,
    pub center: Vec2,
    pub radius: f32,
    pub phase: HazardPhase,
    pub damage_multiplier: f32,
    pub target_inside: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: ProjectileId,
    pub owner: Option<AgentId>,
    pub position: Vec2,
    /// Presentation rotation in degrees, from the launch direction.
    pub rotation_degrees: f32,
    pub state: ProjectileState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorView {
    pub id: DirectorId,
    pub position: Vec2,
    pub live_agents: u32,
    pub population_cap: u32,
    /// Telegraph progress in [0, 1] while a spawn is being announced.
    pub telegraph_progress: Option<f32>,
}
