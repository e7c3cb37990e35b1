//! Cleanup system: removes entities whose lifecycle has ended.

use hecs::{Entity, World};

use dread_agent_ai::controller::AgentController;
use dread_agent_ai::director::EncounterDirector;
use dread_agent_ai::hazard::HazardArea;
use dread_agent_ai::projectile::Projectile;

/// Despawn dead agents past their linger, destroyed hazards, finished
/// projectiles and destroyed directors. Uses a pre-allocated buffer to avoid
/// per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, agent) in world.query_mut::<&AgentController>() {
        if agent.is_removable() {
            tracing::debug!(agent = agent.id().0, "agent removed");
            despawn_buffer.push(entity);
        }
    }

    for (entity, area) in world.query_mut::<&HazardArea>() {
        if area.is_destroyed() {
            despawn_buffer.push(entity);
        }
    }

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if projectile.is_finished() {
            despawn_buffer.push(entity);
        }
    }

    // A destroyed director lingers one tick so its telegraph can be cancelled.
    for (entity, director) in world.query_mut::<&EncounterDirector>() {
        if !director.is_active() && director.telegraph_progress().is_none() {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
