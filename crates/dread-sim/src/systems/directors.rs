//! Director system: spawn telegraphs, spawns and flee movement.

use std::collections::BTreeMap;

use hecs::World;

use dread_agent_ai::controller::AgentController;
use dread_agent_ai::director::{DirectorEnv, DirectorEvent, EncounterDirector};
use dread_core::constants::DT;
use dread_core::enums::AgentArchetype;
use dread_core::events::{EntityRef, PresentationIntent};
use dread_core::types::{DirectorId, Vec2};

use crate::components::SpawnedBy;
use crate::context::SimContext;
use crate::nav::ArenaNav;
use crate::world_setup;

/// Live (not dying) agents per director.
pub fn live_counts(world: &World) -> BTreeMap<DirectorId, u32> {
    let mut counts = BTreeMap::new();
    for (_entity, (agent, spawned_by)) in world.query::<(&AgentController, &SpawnedBy)>().iter() {
        if !agent.is_dying() {
            *counts.entry(spawned_by.0).or_insert(0) += 1;
        }
    }
    counts
}

pub fn run(world: &mut World, ctx: &mut SimContext<'_>) {
    let counts = live_counts(world);
    let target = ctx.agent_target();
    let mut intents: Vec<(DirectorId, PresentationIntent)> = Vec::new();
    let mut spawns: Vec<(DirectorId, AgentArchetype, Vec2)> = Vec::new();

    for (_entity, (director, nav)) in world.query_mut::<(&mut EncounterDirector, &mut ArenaNav)>()
    {
        let id = director.id();
        let mut env = DirectorEnv {
            target,
            live_agents: counts.get(&id).copied().unwrap_or(0),
            nav,
            rng: &mut *ctx.rng,
        };
        let mut events = Vec::new();
        let mut director_intents = Vec::new();
        director.tick(DT, &mut env, &mut events, &mut director_intents);
        intents.extend(director_intents.into_iter().map(|intent| (id, intent)));

        for event in events {
            match event {
                DirectorEvent::TelegraphStarted { at } => {
                    tracing::debug!(director = id.0, x = at.x, y = at.y, "spawn telegraph started");
                }
                DirectorEvent::TelegraphCancelled => {}
                DirectorEvent::Spawn { archetype, at } => spawns.push((id, archetype, at)),
            }
        }
    }

    for (id, intent) in intents {
        ctx.present(EntityRef::Director(id), intent);
    }
    for (director, archetype, at) in spawns {
        world_setup::spawn_agent(world, ctx, archetype, at, None, Some(director));
    }
}
