//! Entity spawn factories and lookups.
//!
//! Creates agent, director, hazard and projectile entities with
//! appropriate component bundles.

use hecs::{Entity, World};

use dread_agent_ai::controller::AgentController;
use dread_agent_ai::director::EncounterDirector;
use dread_agent_ai::hazard::{HazardArea, HazardSpec};
use dread_agent_ai::projectile::{Projectile, ProjectileSpec};
use dread_core::director::DirectorProfile;
use dread_core::enums::AgentArchetype;
use dread_core::types::{AgentId, DirectorId, HazardId, ProjectileId, Vec2};

use crate::components::{Body, SpawnedBy};
use crate::context::SimContext;
use crate::nav::ArenaNav;

/// Spawn an agent. Returns `None` when its persistence id is already resolved.
pub fn spawn_agent(
    world: &mut World,
    ctx: &mut SimContext<'_>,
    archetype: AgentArchetype,
    position: Vec2,
    persistence_id: Option<String>,
    spawned_by: Option<DirectorId>,
) -> Option<AgentId> {
    if let Some(key) = persistence_id.as_deref() {
        if ctx.session.is_resolved(key) {
            tracing::debug!(persistence_id = key, "placement suppressed: already resolved");
            return None;
        }
    }

    let id = ctx.ids.next_agent();
    let profile = ctx.config.profile(archetype);
    let controller = AgentController::new(id, archetype, profile, persistence_id, &mut *ctx.rng);
    let nav = ArenaNav::new(ctx.config.arena, position);
    match spawned_by {
        Some(director) => world.spawn((controller, nav, SpawnedBy(director))),
        None => world.spawn((controller, nav)),
    };
    tracing::debug!(
        agent = id.0,
        ?archetype,
        x = position.x,
        y = position.y,
        director = spawned_by.map(|d| d.0),
        "agent spawned"
    );
    Some(id)
}

pub fn spawn_director(
    world: &mut World,
    ctx: &mut SimContext<'_>,
    position: Vec2,
    profile: DirectorProfile,
) -> DirectorId {
    let id = ctx.ids.next_director();
    let nav = ArenaNav::new(ctx.config.arena, position);
    tracing::debug!(director = id.0, archetype = ?profile.spawn_archetype, "director placed");
    world.spawn((EncounterDirector::new(id, profile), nav));
    id
}

pub fn spawn_hazard(
    world: &mut World,
    ctx: &mut SimContext<'_>,
    center: Vec2,
    spec: HazardSpec,
    owner: Option<AgentId>,
) -> HazardId {
    let id = ctx.ids.next_hazard();
    tracing::debug!(hazard = id.0, owner = owner.map(|o| o.0), "hazard spawned");
    world.spawn((id, HazardArea::new(center, spec, owner)));
    id
}

pub fn spawn_projectile(
    world: &mut World,
    ctx: &mut SimContext<'_>,
    origin: Vec2,
    direction: Vec2,
    spec: ProjectileSpec,
    owner: Option<AgentId>,
) -> ProjectileId {
    let id = ctx.ids.next_projectile();
    world.spawn((
        id,
        Projectile::new(spec, owner, direction),
        Body { position: origin },
    ));
    id
}

pub fn find_agent(world: &World, id: AgentId) -> Option<Entity> {
    world
        .query::<&AgentController>()
        .iter()
        .find(|(_, agent)| agent.id() == id)
        .map(|(entity, _)| entity)
}

pub fn find_director(world: &World, id: DirectorId) -> Option<Entity> {
    world
        .query::<&EncounterDirector>()
        .iter()
        .find(|(_, director)| director.id() == id)
        .map(|(entity, _)| entity)
}

pub fn find_hazard(world: &World, id: HazardId) -> Option<Entity> {
    world
        .query::<&HazardId>()
        .iter()
        .find(|(_, hazard)| **hazard == id)
        .map(|(entity, _)| entity)
}

pub fn find_projectile(world: &World, id: ProjectileId) -> Option<Entity> {
    world
        .query::<&ProjectileId>()
        .iter()
        .find(|(_, projectile)| **projectile == id)
        .map(|(entity, _)| entity)
}
