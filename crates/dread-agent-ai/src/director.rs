//! Encounter director: a population-capped stream of agents.
//!
//! On a fixed interval, and only while below its cap, the director announces a
//! spawn with a telegraph at the spawn point. When the telegraph completes it
//! re-checks that it is still active, that the target is still there and that
//! the cap still has room; otherwise the spawn is dropped silently. A director
//! with a flee profile also runs from the target when it gets close.

use rand::{Rng, RngCore};

use dread_core::collaborators::Pathfinder;
use dread_core::director::DirectorProfile;
use dread_core::enums::{AgentArchetype, EffectKind};
use dread_core::events::PresentationIntent;
use dread_core::types::{away_from, DirectorId, Rgba, Vec2};

use crate::controller::Target;

/// Duration of the flash when an agent appears.
const SPAWN_FLASH_SECS: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SpawnTelegraph {
    at: Vec2,
    elapsed: f32,
}

/// What the director decided this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectorEvent {
    TelegraphStarted { at: Vec2 },
    TelegraphCancelled,
    Spawn { archetype: AgentArchetype, at: Vec2 },
}

/// Per-tick inputs the director cannot own.
pub struct DirectorEnv<'a> {
    pub target: Target,
    /// Live agents this director has spawned.
    pub live_agents: u32,
    pub nav: &'a mut dyn Pathfinder,
    pub rng: &'a mut dyn RngCore,
}

/// Director state machine.
#[derive(Debug, Clone)]
pub struct EncounterDirector {
    id: DirectorId,
    profile: DirectorProfile,
    spawn_timer: f32,
    telegraph: Option<SpawnTelegraph>,
    active: bool,
    spawned_total: u32,
}

impl EncounterDirector {
    pub fn new(id: DirectorId, profile: DirectorProfile) -> Self {
        Self {
            id,
            profile,
            spawn_timer: 0.0,
            telegraph: None,
            active: true,
            spawned_total: 0,
        }
    }

    /// Advance one tick. Events are appended to `events`; presentation intents
    /// addressed to the director go to `intents`.
    pub fn tick(
        &mut self,
        dt: f32,
        env: &mut DirectorEnv<'_>,
        events: &mut Vec<DirectorEvent>,
        intents: &mut Vec<PresentationIntent>,
    ) {
        if let Some(telegraph) = self.telegraph.as_mut() {
            if !self.active || !env.target.alive {
                self.telegraph = None;
                tracing::debug!(director = self.id.0, "spawn telegraph cancelled");
                events.push(DirectorEvent::TelegraphCancelled);
                return;
            }
            telegraph.elapsed += dt;
            if telegraph.elapsed >= self.profile.telegraph_secs {
                let at = telegraph.at;
                self.telegraph = None;
                self.complete_spawn(at, env.live_agents, events, intents);
            }
        }
        if !self.active {
            return;
        }

        self.flee(env);

        self.spawn_timer += dt;
        if self.telegraph.is_none()
            && self.spawn_timer >= self.profile.spawn_interval_secs
            && env.live_agents < self.profile.population_cap
            && env.target.alive
        {
            self.spawn_timer = 0.0;
            let at = self.pick_spawn_point(env);
            self.telegraph = Some(SpawnTelegraph { at, elapsed: 0.0 });
            intents.push(PresentationIntent::SpawnEffect {
                effect: EffectKind::SpawnIndicator,
                at,
            });
            events.push(DirectorEvent::TelegraphStarted { at });
        }
    }

    fn complete_spawn(
        &mut self,
        at: Vec2,
        live_agents: u32,
        events: &mut Vec<DirectorEvent>,
        intents: &mut Vec<PresentationIntent>,
    ) {
        if live_agents >= self.profile.population_cap {
            tracing::debug!(
                director = self.id.0,
                cap = self.profile.population_cap,
                "population cap reached; spawn dropped"
            );
            events.push(DirectorEvent::TelegraphCancelled);
            return;
        }
        self.spawned_total += 1;
        intents.push(PresentationIntent::SpawnEffect {
            effect: EffectKind::SpawnBurst,
            at,
        });
        intents.push(PresentationIntent::Flash {
            color: Rgba::WHITE,
            duration_secs: SPAWN_FLASH_SECS,
        });
        events.push(DirectorEvent::Spawn {
            archetype: self.profile.spawn_archetype,
            at,
        });
    }

    fn pick_spawn_point(&self, env: &mut DirectorEnv<'_>) -> Vec2 {
        match self.profile.spawn_area {
            Some(area) => Vec2::new(
                env.rng.gen_range(area.min.x..=area.max.x),
                env.rng.gen_range(area.min.y..=area.max.y),
            ),
            None => env.nav.position(),
        }
    }

    fn flee(&self, env: &mut DirectorEnv<'_>) {
        let Some(flee) = &self.profile.flee else {
            return;
        };
        let position = env.nav.position();
        if env.target.alive && position.distance(env.target.position) < flee.detection_range {
            let point = position + away_from(position, env.target.position) * flee.flee_distance;
            env.nav.resume();
            env.nav.set_speed(flee.move_speed);
            env.nav.set_destination(point);
        } else {
            env.nav.stop();
        }
    }

    /// Deactivate. A telegraph in progress is cancelled on the next tick.
    pub fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            tracing::info!(director = self.id.0, "director destroyed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn id(&self) -> DirectorId {
        self.id
    }

    pub fn profile(&self) -> &DirectorProfile {
        &self.profile
    }

    /// Telegraph progress in [0, 1], if announcing a spawn.
    pub fn telegraph_progress(&self) -> Option<f32> {
        self.telegraph
            .map(|t| (t.elapsed / self.profile.telegraph_secs).min(1.0))
    }

    pub fn spawned_total(&self) -> u32 {
        self.spawned_total
    }
}
