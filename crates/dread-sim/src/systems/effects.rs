//! Applies the effects agents request during a tick.

use hecs::World;

use dread_agent_ai::output::AgentEffect;
use dread_core::events::EntityRef;
use dread_core::types::AgentId;

use crate::context::SimContext;
use crate::systems::{agents, hazards};
use crate::world_setup;

/// Effects one agent produced in one call, in emission order.
#[derive(Debug, Clone)]
pub struct AgentBatch {
    pub agent: AgentId,
    pub effects: Vec<AgentEffect>,
}

/// Apply batches in agent-id order, each batch in emission order.
pub fn apply(world: &mut World, ctx: &mut SimContext<'_>, mut batches: Vec<AgentBatch>) {
    batches.sort_by_key(|batch| batch.agent);
    for batch in batches {
        for effect in batch.effects {
            apply_one(world, ctx, batch.agent, effect);
        }
    }
}

fn apply_one(world: &mut World, ctx: &mut SimContext<'_>, agent: AgentId, effect: AgentEffect) {
    match effect {
        AgentEffect::FearDamage { amount } => ctx.add_fear(amount, EntityRef::Agent(agent)),
        AgentEffect::SpawnProjectile {
            origin,
            direction,
            spec,
        } => {
            world_setup::spawn_projectile(world, ctx, origin, direction, spec, Some(agent));
        }
        AgentEffect::SpawnHazard { center, spec } => {
            world_setup::spawn_hazard(world, ctx, center, spec, Some(agent));
        }
        AgentEffect::ClearOwnedHazards => {
            let destroyed = hazards::destroy_owned(world, agent);
            agents::notify_hazards_destroyed(world, agent, destroyed);
        }
        AgentEffect::MarkResolved { persistence_id } => ctx.session.mark_resolved(&persistence_id),
        AgentEffect::Present(intent) => ctx.present(EntityRef::Agent(agent), intent),
    }
}
