//! Hazard system: occupancy, damage ticks and expiry.

use hecs::World;

use dread_agent_ai::hazard::HazardArea;
use dread_core::constants::DT;
use dread_core::events::EntityRef;
use dread_core::types::{AgentId, HazardId};

use crate::context::SimContext;
use crate::systems::agents;

pub fn run(world: &mut World, ctx: &mut SimContext<'_>) {
    let detect = ctx.config.detect_contacts;
    let target = ctx.target;
    let mut hits: Vec<(HazardId, f32)> = Vec::new();
    let mut expired_owners: Vec<AgentId> = Vec::new();

    for (_entity, (id, area)) in world.query_mut::<(&HazardId, &mut HazardArea)>() {
        if area.is_destroyed() {
            continue;
        }
        if detect {
            let inside = target.active && area.contains(target.position);
            if inside && !area.is_target_inside() {
                area.on_target_enter();
            } else if !inside && area.is_target_inside() {
                area.on_target_exit();
            }
        }

        let tick = area.tick(DT);
        if tick.activated {
            tracing::debug!(hazard = id.0, "hazard active");
        }
        if let Some(amount) = tick.damage {
            hits.push((*id, amount));
        }
        if tick.expired && area.destroy() {
            tracing::debug!(hazard = id.0, "hazard expired");
            if let Some(owner) = area.owner() {
                expired_owners.push(owner);
            }
        }
    }

    hits.sort_by_key(|(id, _)| *id);
    for (id, amount) in hits {
        ctx.add_fear(amount, EntityRef::Hazard(id));
    }
    for owner in expired_owners {
        agents::notify_hazards_destroyed(world, owner, 1);
    }
}

/// Destroy every live hazard owned by `owner`. Returns how many were destroyed.
pub fn destroy_owned(world: &mut World, owner: AgentId) -> u32 {
    let mut destroyed = 0;
    for (_entity, (id, area)) in world.query_mut::<(&HazardId, &mut HazardArea)>() {
        if area.owner() == Some(owner) && area.destroy() {
            tracing::debug!(hazard = id.0, owner = owner.0, "hazard destroyed with owner");
            destroyed += 1;
        }
    }
    destroyed
}
