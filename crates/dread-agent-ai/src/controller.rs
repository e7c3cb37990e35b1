//! Agent controller: one hostile entity's per-tick behavior.
//!
//! The controller owns the state every archetype shares (health, escalation,
//! cooldowns, invulnerability, death) and forwards archetype-specific work to
//! its behavior. Side effects go into an `AgentOutput`; movement goes through
//! the `Pathfinder` collaborator.

use rand::RngCore;

use dread_core::collaborators::Pathfinder;
use dread_core::constants::DAMAGE_FLASH_SECS;
use dread_core::enums::{AgentArchetype, AgentMode, Facing};
use dread_core::events::PresentationIntent;
use dread_core::health::HasHealth;
use dread_core::types::{AgentId, Rgba, Vec2};

use crate::archetypes::ArchetypeBehavior;
use crate::output::{AgentEffect, AgentOutput};
use crate::phase::PhaseTracker;
use crate::profiles::AgentProfile;
use crate::scheduler::AbilityScheduler;

/// What the agent knows about its target this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Vec2,
    /// False when the target is destroyed or inactive.
    pub alive: bool,
}

/// Collaborators lent to an agent for one call.
pub struct AgentEnv<'a> {
    pub target: Target,
    pub nav: &'a mut dyn Pathfinder,
    pub rng: &'a mut dyn RngCore,
    pub out: &'a mut AgentOutput,
}

/// State shared by every archetype.
#[derive(Debug, Clone)]
pub struct AgentCore {
    pub(crate) id: AgentId,
    pub(crate) archetype: AgentArchetype,
    pub(crate) persistence_id: Option<String>,
    pub(crate) profile: AgentProfile,
    pub(crate) health: f32,
    pub(crate) phase: PhaseTracker,
    pub(crate) scheduler: AbilityScheduler,
    pub(crate) invulnerable: bool,
    /// Seconds until removal once dying.
    dying: Option<f32>,
    facing: Option<Facing>,
    path_timer: f32,
}

impl AgentCore {
    /// Movement speed after escalation.
    pub(crate) fn speed(&self, base: f32) -> f32 {
        base * self
            .profile
            .speed_multiplier(self.phase.is_enraged(), self.phase.is_desperate())
    }

    pub(crate) fn cooldown_multiplier(&self) -> f32 {
        self.profile.cooldown_multiplier(self.phase.is_enraged())
    }

    /// Re-target the pathfinder at most once per path update interval.
    pub(crate) fn refresh_path(&mut self, dt: f32, nav: &mut dyn Pathfinder, point: Vec2) {
        self.path_timer -= dt;
        if self.path_timer <= 0.0 {
            nav.set_destination(point);
            self.path_timer = self.profile.path_update_interval;
        }
    }

    /// Make the next `refresh_path` call re-target immediately.
    pub(crate) fn force_path_refresh(&mut self) {
        self.path_timer = 0.0;
    }

    pub(crate) fn is_dying(&self) -> bool {
        self.dying.is_some()
    }

    /// Single-entry death. Returns false if the agent was already dying.
    pub(crate) fn begin_death(&mut self, env: &mut AgentEnv<'_>) -> bool {
        if self.dying.is_some() {
            return false;
        }
        let linger = match self.profile.death_clip {
            Some(clip) => clip.length_secs(),
            None => self.profile.death_linger_secs,
        };
        self.dying = Some(linger);
        self.invulnerable = false;
        env.nav.stop();

        if let Some(persistence_id) = &self.persistence_id {
            env.out.push(AgentEffect::MarkResolved {
                persistence_id: persistence_id.clone(),
            });
        }
        if let Some(clip) = self.profile.death_clip {
            env.out.present(PresentationIntent::PlayOneShot { clip });
        }
        env.out
            .present(PresentationIntent::SetVisible { visible: false });
        tracing::info!(
            agent = self.id.0,
            archetype = ?self.archetype,
            linger_secs = linger,
            "agent died"
        );
        true
    }

    fn update_facing(&mut self, nav: &dyn Pathfinder, out: &mut AgentOutput) {
        let velocity = nav.current_velocity();
        if let Some(facing) = Facing::from_velocity(velocity) {
            if self.facing != Some(facing) {
                self.facing = Some(facing);
                out.present(PresentationIntent::MovementHint {
                    direction: velocity.normalize_or_zero(),
                    facing,
                });
            }
        }
    }
}

/// Drives one hostile agent.
#[derive(Debug, Clone)]
pub struct AgentController {
    core: AgentCore,
    behavior: ArchetypeBehavior,
    target_lost: bool,
}

impl AgentController {
    /// Create an agent. `rng` seeds any randomized initial ability timers.
    pub fn new(
        id: AgentId,
        archetype: AgentArchetype,
        profile: AgentProfile,
        persistence_id: Option<String>,
        rng: &mut dyn RngCore,
    ) -> Self {
        let mut core = AgentCore {
            id,
            archetype,
            persistence_id,
            health: profile.max_health,
            phase: PhaseTracker::default(),
            scheduler: AbilityScheduler::new(),
            invulnerable: false,
            dying: None,
            facing: None,
            path_timer: 0.0,
            profile,
        };
        let behavior_profile = core.profile.behavior.clone();
        let behavior = ArchetypeBehavior::from_profile(&behavior_profile, &mut core, rng);
        tracing::debug!(agent = id.0, ?archetype, "agent created");
        Self {
            core,
            behavior,
            target_lost: false,
        }
    }

    /// Advance one tick.
    pub fn tick(&mut self, dt: f32, env: &mut AgentEnv<'_>) {
        if let Some(remaining) = self.core.dying.as_mut() {
            *remaining = (*remaining - dt).max(0.0);
            return;
        }
        self.core.scheduler.tick(dt);

        if !env.target.alive {
            if !self.target_lost {
                self.target_lost = true;
                tracing::debug!(agent = self.core.id.0, "target lost; cancelling current action");
                self.behavior.as_dyn().on_target_lost(&mut self.core, env);
                env.nav.stop();
            }
            self.behavior
                .as_dyn()
                .tick_without_target(&mut self.core, dt, env);
            return;
        }
        if self.target_lost {
            self.target_lost = false;
            env.nav.resume();
            self.core.force_path_refresh();
        }

        self.behavior.as_dyn().tick(&mut self.core, dt, env);
        if !self.core.is_dying() {
            self.core.update_facing(&*env.nav, env.out);
        }
    }

    /// Apply damage from the target. No-op while invulnerable or dying.
    pub fn take_damage(&mut self, amount: f32, env: &mut AgentEnv<'_>) {
        if self.core.is_dying() {
            return;
        }
        if self.core.invulnerable {
            tracing::debug!(agent = self.core.id.0, amount, "damage ignored: invulnerable");
            return;
        }
        if amount.is_nan() || amount <= 0.0 {
            return;
        }

        self.core.health = (self.core.health - amount).max(0.0);
        if !self.behavior.as_dyn_ref().suppress_damage_flash() {
            env.out.present(PresentationIntent::Flash {
                color: Rgba::RED,
                duration_secs: DAMAGE_FLASH_SECS,
            });
        }
        let ratio = self.health_ratio();
        if let Some(phase) = self.core.phase.update(ratio) {
            tracing::info!(agent = self.core.id.0, ?phase, "agent escalated");
        }

        let handled = self.behavior.as_dyn().on_damaged(&mut self.core, env);
        if !handled && self.core.health <= 0.0 {
            self.die(env);
        }
    }

    /// The agent's hitbox began overlapping the target.
    pub fn on_target_contact(&mut self, env: &mut AgentEnv<'_>) {
        if self.core.is_dying() || !env.target.alive {
            return;
        }
        self.behavior
            .as_dyn()
            .on_target_contact(&mut self.core, env);
    }

    /// One of this agent's hazards was destroyed.
    pub fn on_hazard_destroyed(&mut self) {
        self.behavior.as_dyn().on_hazard_destroyed();
    }

    /// Enter the death path. Re-entrant calls are no-ops.
    pub fn die(&mut self, env: &mut AgentEnv<'_>) {
        if self.core.begin_death(env) {
            self.behavior.as_dyn().on_death(&mut self.core, env);
        }
    }

    /// True once dead and the removal delay has elapsed.
    pub fn is_removable(&self) -> bool {
        matches!(self.core.dying, Some(remaining) if remaining <= 0.0)
    }

    pub fn id(&self) -> AgentId {
        self.core.id
    }

    pub fn archetype(&self) -> AgentArchetype {
        self.core.archetype
    }

    pub fn persistence_id(&self) -> Option<&str> {
        self.core.persistence_id.as_deref()
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.core.profile
    }

    pub fn hitbox_radius(&self) -> f32 {
        self.core.profile.hitbox_radius
    }

    pub fn is_invulnerable(&self) -> bool {
        self.core.invulnerable
    }

    pub fn is_dying(&self) -> bool {
        self.core.is_dying()
    }

    pub fn is_enraged(&self) -> bool {
        self.core.phase.is_enraged()
    }

    pub fn is_desperate(&self) -> bool {
        self.core.phase.is_desperate()
    }

    pub fn facing(&self) -> Option<Facing> {
        self.core.facing
    }

    pub fn scheduler(&self) -> &AbilityScheduler {
        &self.core.scheduler
    }

    pub fn mode(&self) -> AgentMode {
        if self.core.is_dying() {
            AgentMode::Dying
        } else {
            self.behavior.as_dyn_ref().mode()
        }
    }

    /// Archetype-specific state name for snapshots and logs.
    pub fn state_name(&self) -> &'static str {
        if self.core.is_dying() {
            "dying"
        } else {
            self.behavior.as_dyn_ref().state_name()
        }
    }

    /// Current retreat destination, if withdrawing.
    pub fn retreat_point(&self) -> Option<Vec2> {
        self.behavior.as_dyn_ref().retreat_point()
    }

    /// Countdown progress in [0, 1] while a bomber is about to explode.
    pub fn explosion_progress(&self) -> Option<f32> {
        match &self.behavior {
            ArchetypeBehavior::Bomber(bomber) => bomber.explosion_progress(),
            _ => None,
        }
    }

    /// Live hazards owned by a teleporter (0 for other archetypes).
    pub fn active_hazards(&self) -> u32 {
        match &self.behavior {
            ArchetypeBehavior::Teleporter(reaper) => reaper.active_hazards(),
            _ => 0,
        }
    }
}

impl HasHealth for AgentController {
    fn current_health(&self) -> f32 {
        self.core.health
    }

    fn max_health(&self) -> f32 {
        self.core.profile.max_health
    }
}
