//! Ranged kiter: holds a shooting band around the target.
//!
//! Three concentric bands: `too_close < shooting_range <= max_range`.
//! Beyond the shooting range it chases. Inside it stops and fires. If the
//! target closes to `too_close` it backs off to a point beyond the shooting
//! range, then resumes firing. Past `max_range` it gives chase again.

use dread_core::constants::ARRIVAL_TOLERANCE;
use dread_core::enums::{AbilityEffect, AbilityId, AgentMode, ClipRef};
use dread_core::types::{away_from, Vec2};

use super::{fire_projectile, Behavior};
use crate::controller::{AgentCore, AgentEnv};
use crate::profiles::RangedProfile;
use crate::scheduler::Ability;

/// Fraction of the shooting range at which a retreat counts as far enough.
const RETREAT_EXIT_FRACTION: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ArcherState {
    Chasing,
    Shooting,
    Retreating { point: Vec2 },
}

/// Archer behavior.
#[derive(Debug, Clone)]
pub struct RangedKiter {
    profile: RangedProfile,
    state: ArcherState,
}

impl RangedKiter {
    pub(crate) fn new(profile: RangedProfile, core: &mut AgentCore) -> Self {
        core.scheduler.register(
            Ability::instant(
                AbilityId::Shoot,
                profile.shoot_interval,
                AbilityEffect::SpawnProjectile,
            ),
            profile.shoot_interval,
        );
        Self {
            profile,
            state: ArcherState::Chasing,
        }
    }

    fn begin_retreat(&mut self, core: &AgentCore, env: &mut AgentEnv<'_>, distance: f32) {
        let position = env.nav.position();
        // Lands one unit beyond the shooting range along the away vector.
        let leg = self.profile.shooting_range - distance + 1.0;
        let point = position + away_from(position, env.target.position) * leg;
        env.nav.resume();
        env.nav.set_speed(core.speed(self.profile.retreat_speed));
        env.nav.set_destination(point);
        self.state = ArcherState::Retreating { point };
        tracing::debug!(agent = core.id.0, distance, "archer retreating");
    }

    fn begin_shooting(&mut self, core: &mut AgentCore, env: &mut AgentEnv<'_>) {
        env.nav.stop();
        // Fire as soon as the band is entered.
        core.scheduler.prime(AbilityId::Shoot);
        self.state = ArcherState::Shooting;
    }
}

impl Behavior for RangedKiter {
    fn tick(&mut self, core: &mut AgentCore, dt: f32, env: &mut AgentEnv<'_>) {
        let position = env.nav.position();
        let distance = position.distance(env.target.position);

        match self.state {
            ArcherState::Chasing => {
                if distance <= self.profile.too_close {
                    self.begin_retreat(core, env, distance);
                } else if distance <= self.profile.shooting_range {
                    self.begin_shooting(core, env);
                } else {
                    env.nav.resume();
                    env.nav.set_speed(core.speed(self.profile.chase_speed));
                    core.refresh_path(dt, env.nav, env.target.position);
                }
            }
            ArcherState::Shooting => {
                env.nav.stop();
                if core
                    .scheduler
                    .ready(AbilityId::Shoot, core.cooldown_multiplier())
                {
                    fire_projectile(
                        core,
                        self.profile.arrow.as_ref(),
                        position,
                        env.target.position,
                        ClipRef::Shoot,
                        env.out,
                    );
                    core.scheduler.reset(AbilityId::Shoot);
                }
                if distance <= self.profile.too_close {
                    self.begin_retreat(core, env, distance);
                } else if distance > self.profile.max_range {
                    self.state = ArcherState::Chasing;
                    core.force_path_refresh();
                }
            }
            ArcherState::Retreating { .. } => {
                let far_enough =
                    distance >= self.profile.shooting_range * RETREAT_EXIT_FRACTION;
                let arrived =
                    !env.nav.is_path_pending() && env.nav.remaining_distance() <= ARRIVAL_TOLERANCE;
                if far_enough || arrived {
                    self.begin_shooting(core, env);
                }
            }
        }
    }

    fn on_target_lost(&mut self, _core: &mut AgentCore, _env: &mut AgentEnv<'_>) {
        self.state = ArcherState::Chasing;
    }

    fn mode(&self) -> AgentMode {
        match self.state {
            ArcherState::Chasing => AgentMode::Chasing,
            ArcherState::Shooting => AgentMode::ExecutingAbility,
            ArcherState::Retreating { .. } => AgentMode::Retreating,
        }
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            ArcherState::Chasing => "chasing",
            ArcherState::Shooting => "shooting",
            ArcherState::Retreating { .. } => "retreating",
        }
    }

    fn retreat_point(&self) -> Option<Vec2> {
        match self.state {
            ArcherState::Retreating { point } => Some(point),
            _ => None,
        }
    }
}
