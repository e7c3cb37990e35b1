//! Effects requested by agents and directors during a tick.
//!
//! Agent logic never touches the world directly. It appends effects here and
//! the driver applies them in order, which keeps fear additions in tick order.

use dread_core::events::PresentationIntent;
use dread_core::types::Vec2;

use crate::hazard::HazardSpec;
use crate::projectile::ProjectileSpec;

/// One requested side effect.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEffect {
    /// Apply fear to the target.
    FearDamage { amount: f32 },
    SpawnProjectile {
        origin: Vec2,
        direction: Vec2,
        spec: ProjectileSpec,
    },
    SpawnHazard { center: Vec2, spec: HazardSpec },
    /// Destroy every hazard this agent owns.
    ClearOwnedHazards,
    /// Record the agent's persistence id as resolved.
    MarkResolved { persistence_id: String },
    Present(PresentationIntent),
}

/// Ordered effect buffer.
#[derive(Debug, Clone, Default)]
pub struct AgentOutput {
    effects: Vec<AgentEffect>,
}

impl AgentOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: AgentEffect) {
        self.effects.push(effect);
    }

    pub fn present(&mut self, intent: PresentationIntent) {
        self.effects.push(AgentEffect::Present(intent));
    }

    pub fn fear(&mut self, amount: f32) {
        self.effects.push(AgentEffect::FearDamage { amount });
    }

    pub fn effects(&self) -> &[AgentEffect] {
        &self.effects
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, AgentEffect> {
        self.effects.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Total fear requested so far.
    pub fn total_fear(&self) -> f32 {
        self.effects
            .iter()
            .map(|e| match e {
                AgentEffect::FearDamage { amount } => *amount,
                _ => 0.0,
            })
            .sum()
    }
}
