//! Commands accepted by the encounter engine.
//!
//! Commands are queued and processed at the start of the next tick, before
//! any system runs.

use serde::{Deserialize, Serialize};

use crate::director::DirectorProfile;
use crate::enums::{AgentArchetype, ContactCategory, ContactPhase, EncounterLayout};
use crate::events::EntityRef;
use crate::types::{AgentId, DirectorId, Vec2};

/// All commands the host can send to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncounterCommand {
    /// Move the tracked target.
    MoveTarget { position: Vec2 },
    /// Activate or deactivate the target. Inactive targets cancel telegraphs and tasks.
    SetTargetActive { active: bool },
    /// Damage an agent (the target's weapon hit it).
    DamageAgent { agent: AgentId, amount: f32 },
    /// Place an agent. Agents with an already-resolved persistence id are suppressed.
    PlaceAgent {
        archetype: AgentArchetype,
        position: Vec2,
        persistence_id: Option<String>,
    },
    PlaceDirector {
        position: Vec2,
        profile: DirectorProfile,
    },
    /// The target's weapon destroyed a director.
    DestroyDirector { director: DirectorId },
    CollectKey { key_id: String },
    /// A contact reported by an external collision collaborator.
    ReportContact {
        subject: EntityRef,
        category: ContactCategory,
        phase: ContactPhase,
    },
    /// Clear the arena and place a prebuilt layout.
    LoadLayout { layout: EncounterLayout },
    /// Freeze simulation time. Commands are still applied.
    Pause,
    Resume,
}
