//! Melee kiter: chase, strike on contact, back off, chase again.

use dread_core::collaborators::Pathfinder;
use dread_core::constants::ARRIVAL_TOLERANCE;
use dread_core::enums::{AbilityEffect, AbilityId, AgentMode, ClipRef, EffectKind};
use dread_core::events::PresentationIntent;
use dread_core::types::{away_from, Vec2};

use super::Behavior;
use crate::controller::{AgentCore, AgentEnv};
use crate::profiles::MeleeProfile;
use crate::scheduler::Ability;

/// Strike-then-withdraw sequence shared by contact fighters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Skirmish {
    Striking { elapsed: f32 },
    Withdrawing { point: Vec2 },
}

impl Skirmish {
    pub(crate) fn begin(nav: &mut dyn Pathfinder) -> Self {
        nav.stop();
        Skirmish::Striking { elapsed: 0.0 }
    }

    /// Advance the sequence. Returns true once the withdraw point is reached.
    pub(crate) fn advance(
        &mut self,
        dt: f32,
        attack_duration: f32,
        retreat_distance: f32,
        retreat_speed: f32,
        target: Vec2,
        nav: &mut dyn Pathfinder,
    ) -> bool {
        match self {
            Skirmish::Striking { elapsed } => {
                *elapsed += dt;
                if *elapsed >= attack_duration {
                    let position = nav.position();
                    let point = position + away_from(position, target) * retreat_distance;
                    nav.resume();
                    nav.set_speed(retreat_speed);
                    nav.set_destination(point);
                    *self = Skirmish::Withdrawing { point };
                }
                false
            }
            Skirmish::Withdrawing { .. } => {
                !nav.is_path_pending() && nav.remaining_distance() <= ARRIVAL_TOLERANCE
            }
        }
    }

    pub(crate) fn mode(&self) -> AgentMode {
        match self {
            Skirmish::Striking { .. } => AgentMode::ExecutingAbility,
            Skirmish::Withdrawing { .. } => AgentMode::Retreating,
        }
    }

    pub(crate) fn state_name(&self) -> &'static str {
        match self {
            Skirmish::Striking { .. } => "attacking",
            Skirmish::Withdrawing { .. } => "retreating",
        }
    }

    pub(crate) fn retreat_point(&self) -> Option<Vec2> {
        match self {
            Skirmish::Withdrawing { point } => Some(*point),
            Skirmish::Striking { .. } => None,
        }
    }
}

/// Brawler and wrench behavior.
#[derive(Debug, Clone)]
pub struct MeleeKiter {
    profile: MeleeProfile,
    skirmish: Option<Skirmish>,
}

impl MeleeKiter {
    pub(crate) fn new(profile: MeleeProfile, core: &mut AgentCore) -> Self {
        core.scheduler.register(
            Ability::instant(
                AbilityId::Melee,
                profile.contact_cooldown,
                AbilityEffect::DirectDamage,
            ),
            profile.contact_cooldown,
        );
        Self {
            profile,
            skirmish: None,
        }
    }
}

impl Behavior for MeleeKiter {
    fn tick(&mut self, core: &mut AgentCore, dt: f32, env: &mut AgentEnv<'_>) {
        match self.skirmish.as_mut() {
            None => {
                env.nav.resume();
                env.nav.set_speed(core.speed(self.profile.speed));
                core.refresh_path(dt, env.nav, env.target.position);
            }
            Some(skirmish) => {
                let arrived = skirmish.advance(
                    dt,
                    self.profile.attack_duration,
                    self.profile.retreat_distance,
                    core.speed(self.profile.retreat_speed),
                    env.target.position,
                    env.nav,
                );
                if arrived {
                    self.skirmish = None;
                    core.force_path_refresh();
                }
            }
        }
    }

    fn on_target_lost(&mut self, _core: &mut AgentCore, _env: &mut AgentEnv<'_>) {
        self.skirmish = None;
    }

    fn on_target_contact(&mut self, core: &mut AgentCore, env: &mut AgentEnv<'_>) {
        if self.skirmish.is_some()
            || !core
                .scheduler
                .ready(AbilityId::Melee, core.cooldown_multiplier())
        {
            return;
        }
        core.scheduler.reset(AbilityId::Melee);
        env.out.fear(self.profile.contact_damage);
        if self.profile.slash_effect {
            env.out.present(PresentationIntent::SpawnEffect {
                effect: EffectKind::Slash,
                at: env.target.position,
            });
            env.out
                .present(PresentationIntent::PlayOneShot { clip: ClipRef::Slash });
        }
        tracing::debug!(
            agent = core.id.0,
            damage = self.profile.contact_damage,
            "melee strike"
        );
        self.skirmish = Some(Skirmish::begin(env.nav));
    }

    fn on_death(&mut self, _core: &mut AgentCore, _env: &mut AgentEnv<'_>) {
        self.skirmish = None;
    }

    fn mode(&self) -> AgentMode {
        self.skirmish.map_or(AgentMode::Chasing, |s| s.mode())
    }

    fn state_name(&self) -> &'static str {
        self.skirmish.map_or("chasing", |s| s.state_name())
    }

    fn retreat_point(&self) -> Option<Vec2> {
        self.skirmish.and_then(|s| s.retreat_point())
    }
}
