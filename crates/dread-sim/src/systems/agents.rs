//! Agent AI system: ticks every agent controller.
//!
//! Controllers never touch the world. Their effects are collected per agent
//! and applied after the query, in agent-id order.

use hecs::World;

use dread_agent_ai::controller::{AgentController, AgentEnv};
use dread_agent_ai::output::AgentOutput;
use dread_core::constants::DT;
use dread_core::types::AgentId;

use crate::context::SimContext;
use crate::nav::ArenaNav;
use crate::systems::effects::{self, AgentBatch};
use crate::world_setup;

pub fn run(world: &mut World, ctx: &mut SimContext<'_>) {
    let target = ctx.agent_target();
    let mut batches = Vec::new();

    for (_entity, (agent, nav)) in world.query_mut::<(&mut AgentController, &mut ArenaNav)>() {
        let mut out = AgentOutput::new();
        let mut env = AgentEnv {
            target,
            nav,
            rng: &mut *ctx.rng,
            out: &mut out,
        };
        agent.tick(DT, &mut env);
        if !out.is_empty() {
            batches.push(AgentBatch {
                agent: agent.id(),
                effects: out.drain().collect(),
            });
        }
    }

    effects::apply(world, ctx, batches);
}

/// Run one call against a single agent and apply its effects.
/// Returns false when the agent does not exist.
pub fn with_agent(
    world: &mut World,
    ctx: &mut SimContext<'_>,
    id: AgentId,
    f: impl FnOnce(&mut AgentController, &mut AgentEnv<'_>),
) -> bool {
    let Some(entity) = world_setup::find_agent(world, id) else {
        return false;
    };
    let target = ctx.agent_target();
    let mut out = AgentOutput::new();
    {
        let Ok((agent, nav)) =
            world.query_one_mut::<(&mut AgentController, &mut ArenaNav)>(entity)
        else {
            return false;
        };
        let mut env = AgentEnv {
            target,
            nav,
            rng: &mut *ctx.rng,
            out: &mut out,
        };
        f(agent, &mut env);
    }
    let batch = AgentBatch {
        agent: id,
        effects: out.drain().collect(),
    };
    effects::apply(world, ctx, vec![batch]);
    true
}

/// Tell an agent that `count` of its hazards were destroyed.
pub fn notify_hazards_destroyed(world: &mut World, owner: AgentId, count: u32) {
    if count == 0 {
        return;
    }
    let Some(entity) = world_setup::find_agent(world, owner) else {
        return;
    };
    if let Ok(agent) = world.query_one_mut::<&mut AgentController>(entity) {
        for _ in 0..count {
            agent.on_hazard_destroyed();
        }
    }
}
