//! Contact detection between agents and the target, and routing of
//! externally reported contacts.
//!
//! Agents react to contact *begin* only. Overlap is tracked across ticks so
//! an agent standing on the target does not strike every tick.

use std::collections::BTreeSet;

use hecs::World;

use dread_agent_ai::controller::AgentController;
use dread_agent_ai::hazard::HazardArea;
use dread_core::collaborators::Pathfinder;
use dread_core::enums::{ContactCategory, ContactPhase};
use dread_core::events::EntityRef;
use dread_core::types::AgentId;

use crate::context::SimContext;
use crate::nav::ArenaNav;
use crate::systems::{agents, projectiles};
use crate::world_setup;

/// Agents currently overlapping the target.
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    touching: BTreeSet<AgentId>,
}

impl ContactTracker {
    /// Replace the overlap set. Returns agents whose contact began.
    pub fn update(&mut self, now: BTreeSet<AgentId>) -> Vec<AgentId> {
        let began = now.difference(&self.touching).copied().collect();
        self.touching = now;
        began
    }

    pub fn is_touching(&self, agent: AgentId) -> bool {
        self.touching.contains(&agent)
    }

    pub fn clear(&mut self) {
        self.touching.clear();
    }
}

/// Detect agent/target overlap and deliver contact-begin events.
pub fn run(world: &mut World, ctx: &mut SimContext<'_>) {
    let mut touching = BTreeSet::new();
    for (_entity, (agent, nav)) in world.query::<(&AgentController, &ArenaNav)>().iter() {
        if !agent.is_dying() && ctx.target.overlaps(nav.position(), agent.hitbox_radius()) {
            touching.insert(agent.id());
        }
    }

    for agent in ctx.contacts.update(touching) {
        tracing::debug!(agent = agent.0, "target contact");
        agents::with_agent(world, ctx, agent, |controller, env| {
            controller.on_target_contact(env)
        });
    }
}

/// Route a contact reported by an external collision collaborator.
pub fn report(
    world: &mut World,
    ctx: &mut SimContext<'_>,
    subject: EntityRef,
    category: ContactCategory,
    phase: ContactPhase,
) {
    match (subject, category, phase) {
        (EntityRef::Agent(agent), ContactCategory::Target, ContactPhase::Begin) => {
            agents::with_agent(world, ctx, agent, |controller, env| {
                controller.on_target_contact(env)
            });
        }
        (EntityRef::Hazard(id), ContactCategory::Target, phase) => {
            let Some(entity) = world_setup::find_hazard(world, id) else {
                return;
            };
            if let Ok(area) = world.query_one_mut::<&mut HazardArea>(entity) {
                match phase {
                    ContactPhase::Begin => area.on_target_enter(),
                    ContactPhase::End => area.on_target_exit(),
                }
            }
        }
        (EntityRef::Projectile(id), category, ContactPhase::Begin) => {
            projectiles::report_contact(world, ctx, id, category);
        }
        _ => {
            tracing::trace!(?subject, ?category, ?phase, "contact ignored");
        }
    }
}
