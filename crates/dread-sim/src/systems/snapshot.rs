//! Snapshot builder: reads the ECS world and produces an EncounterSnapshot.
//!
//! Views are sorted by id so two runs with the same seed and commands
//! serialize identically.

use hecs::World;

use dread_agent_ai::controller::AgentController;
use dread_agent_ai::director::EncounterDirector;
use dread_agent_ai::hazard::HazardArea;
use dread_agent_ai::projectile::Projectile;
use dread_core::collaborators::Pathfinder;
use dread_core::enums::EncounterLayout;
use dread_core::events::PresentationEvent;
use dread_core::health::HasHealth;
use dread_core::session::Session;
use dread_core::state::*;
use dread_core::types::{HazardId, ProjectileId, SimTime};

use crate::components::{Body, TargetState};
use crate::nav::ArenaNav;
use crate::systems::directors;

/// Build a complete snapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    layout: Option<EncounterLayout>,
    target: &TargetState,
    session: &Session,
    presentation: Vec<PresentationEvent>,
) -> EncounterSnapshot {
    EncounterSnapshot {
        time: *time,
        layout,
        target: TargetView {
            position: target.position,
            active: target.active,
        },
        fear: FearView {
            value: session.fear.value(),
            max: session.fear.max(),
            visual: session.fear.visual(),
            band: session.fear.band(),
        },
        agents: build_agents(world),
        hazards: build_hazards(world),
        projectiles: build_projectiles(world),
        directors: build_directors(world),
        keys_collected: session.keys_collected(),
        session_resets: session.overflow_count(),
        presentation,
    }
}

fn build_agents(world: &World) -> Vec<AgentView> {
    let mut agents: Vec<AgentView> = world
        .query::<(&AgentController, &ArenaNav)>()
        .iter()
        .map(|(_entity, (agent, nav))| AgentView {
            id: agent.id(),
            archetype: agent.archetype(),
            position: nav.position(),
            health: agent.current_health(),
            max_health: agent.max_health(),
            health_band: agent.health_band(),
            mode: agent.mode(),
            state: agent.state_name().to_string(),
            enraged: agent.is_enraged(),
            desperate: agent.is_desperate(),
            invulnerable: agent.is_invulnerable(),
            facing: agent.facing(),
        })
        .collect();
    agents.sort_by_key(|view| view.id);
    agents
}

fn build_hazards(world: &World) -> Vec<HazardView> {
    let mut hazards: Vec<HazardView> = world
        .query::<(&HazardId, &HazardArea)>()
        .iter()
        .filter(|(_entity, (_, area))| !area.is_destroyed())
        .map(|(_entity, (id, area))| HazardView {
            id: *id,
            owner: area.owner(),
            center: area.center(),
            radius: area.radius(),
            phase: area.phase(),
            damage_multiplier: area.damage_multiplier(),
            target_inside: area.is_target_inside(),
        })
        .collect();
    hazards.sort_by_key(|view| view.id);
    hazards
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&ProjectileId, &Projectile, &Body)>()
        .iter()
        .filter(|(_entity, (_, projectile, _))| !projectile.is_finished())
        .map(|(_entity, (id, projectile, body))| ProjectileView {
            id: *id,
            owner: projectile.owner(),
            position: body.position,
            rotation_degrees: projectile.rotation_degrees(),
            state: projectile.state(),
        })
        .collect();
    projectiles.sort_by_key(|view| view.id);
    projectiles
}

fn build_directors(world: &World) -> Vec<DirectorView> {
    let counts = directors::live_counts(world);
    let mut views: Vec<DirectorView> = world
        .query::<(&EncounterDirector, &ArenaNav)>()
        .iter()
        .filter(|(_entity, (director, _))| director.is_active())
        .map(|(_entity, (director, nav))| DirectorView {
            id: director.id(),
            position: nav.position(),
            live_agents: counts.get(&director.id()).copied().unwrap_or(0),
            population_cap: director.profile().population_cap,
            telegraph_progress: director.telegraph_progress(),
        })
        .collect();
    views.sort_by_key(|view| view.id);
    views
}
