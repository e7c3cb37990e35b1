//! Projectile system: straight-line flight and contact resolution.
//!
//! Each flying projectile checks the target first, then agents, then the
//! arena edge (terrain). The first qualifying contact consumes it, so a hit
//! lands at most once however many overlaps occur in the tick.

use hecs::World;

use dread_agent_ai::controller::AgentController;
use dread_agent_ai::projectile::{ContactOutcome, Projectile};
use dread_core::collaborators::Pathfinder;
use dread_core::constants::DT;
use dread_core::enums::{ContactCategory, EffectKind, ProjectileState};
use dread_core::events::{EntityRef, PresentationIntent};
use dread_core::types::{AgentId, ProjectileId, Vec2};

use crate::components::Body;
use crate::context::SimContext;
use crate::nav::ArenaNav;
use crate::world_setup;

#[derive(Debug, Default)]
struct Resolved {
    hits: Vec<(ProjectileId, f32)>,
    effects: Vec<(ProjectileId, EffectKind, Vec2)>,
}

impl Resolved {
    fn record(&mut self, id: ProjectileId, outcome: ContactOutcome, projectile: &Projectile, at: Vec2) {
        let hit_effect = projectile.spec().hit_effect;
        match outcome {
            ContactOutcome::Ignored => return,
            ContactOutcome::HitTarget { damage } => {
                tracing::debug!(projectile = id.0, damage, "projectile hit target");
                self.hits.push((id, damage));
            }
            ContactOutcome::Embedded => {
                tracing::debug!(projectile = id.0, "projectile embedded");
            }
            ContactOutcome::Shattered => {
                tracing::debug!(projectile = id.0, "projectile shattered");
            }
        }
        if let Some(effect) = hit_effect {
            self.effects.push((id, effect, at));
        }
    }

    fn apply(mut self, ctx: &mut SimContext<'_>) {
        self.hits.sort_by_key(|(id, _)| *id);
        for (id, damage) in self.hits {
            ctx.add_fear(damage, EntityRef::Projectile(id));
        }
        for (id, effect, at) in self.effects {
            ctx.present(
                EntityRef::Projectile(id),
                PresentationIntent::SpawnEffect { effect, at },
            );
        }
    }
}

pub fn run(world: &mut World, ctx: &mut SimContext<'_>) {
    let arena = ctx.config.arena;
    let target = ctx.target;
    let agents: Vec<(AgentId, Vec2, f32)> = world
        .query::<(&AgentController, &ArenaNav)>()
        .iter()
        .filter(|(_, (agent, _))| !agent.is_dying())
        .map(|(_, (agent, nav))| (agent.id(), nav.position(), agent.hitbox_radius()))
        .collect();

    let mut resolved = Resolved::default();
    for (_entity, (id, projectile, body)) in
        world.query_mut::<(&ProjectileId, &mut Projectile, &mut Body)>()
    {
        body.position += projectile.tick(DT);
        if projectile.state() != ProjectileState::Flying {
            continue;
        }
        let radius = projectile.spec().radius;

        let mut outcome = ContactOutcome::Ignored;
        if target.overlaps(body.position, radius) {
            outcome = projectile.on_contact(ContactCategory::Target);
        }
        if outcome == ContactOutcome::Ignored {
            let owner = projectile.owner();
            let struck = agents.iter().any(|(agent, position, hitbox)| {
                Some(*agent) != owner && position.distance(body.position) <= hitbox + radius
            });
            if struck {
                outcome = projectile.on_contact(ContactCategory::Agent);
            }
        }
        if outcome == ContactOutcome::Ignored && !arena.contains(body.position) {
            outcome = projectile.on_contact(ContactCategory::Terrain);
        }
        resolved.record(*id, outcome, projectile, body.position);
    }

    resolved.apply(ctx);
}

/// Deliver an externally reported contact to one projectile.
pub fn report_contact(
    world: &mut World,
    ctx: &mut SimContext<'_>,
    id: ProjectileId,
    category: ContactCategory,
) {
    let Some(entity) = world_setup::find_projectile(world, id) else {
        return;
    };
    let mut resolved = Resolved::default();
    if let Ok((projectile, body)) = world.query_one_mut::<(&mut Projectile, &Body)>(entity) {
        let outcome = projectile.on_contact(category);
        resolved.record(id, outcome, projectile, body.position);
    }
    resolved.apply(ctx);
}
