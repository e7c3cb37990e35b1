//! Presentation events emitted by the simulation.
//!
//! The engine never animates or plays audio. It emits intents and a host
//! decides how to render them.

use serde::{Deserialize, Serialize};

use crate::enums::{ClipRef, EffectKind, Facing};
use crate::types::{AgentId, DirectorId, HazardId, ProjectileId, Rgba, Vec2};

/// Entity a presentation intent is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRef {
    Target,
    Agent(AgentId),
    Director(DirectorId),
    Hazard(HazardId),
    Projectile(ProjectileId),
}

/// A rendering or audio request. Purely declarative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PresentationIntent {
    /// Movement direction hint for animation, with its four-way facing.
    MovementHint { direction: Vec2, facing: Facing },
    PlayOneShot { clip: ClipRef },
    Flash { color: Rgba, duration_secs: f32 },
    SetVisible { visible: bool },
    SetScale { scale: f32 },
    SpawnEffect { effect: EffectKind, at: Vec2 },
    /// The target took fear damage; drives the meter flash.
    TargetDamaged { amount: f32 },
}

/// An intent tagged with its source entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresentationEvent {
    pub source: EntityRef,
    pub intent: PresentationIntent,
}

impl PresentationEvent {
    pub fn new(source: EntityRef, intent: PresentationIntent) -> Self {
        Self { source, intent }
    }
}
