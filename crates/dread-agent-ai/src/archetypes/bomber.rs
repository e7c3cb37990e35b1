//! Bomber: spits poison from range and detonates when badly hurt.
//!
//! Once the explosion countdown starts it cannot be stopped. The bomber stands
//! still, flashes, swells, and on completion damages the target if it is
//! inside the blast radius before dying.

use dread_core::enums::{AbilityEffect, AbilityId, AgentMode, ClipRef, EffectKind};
use dread_core::events::PresentationIntent;
use dread_core::types::{away_from, Rgba, Vec2};

use super::{fire_projectile, random_in_disc, Behavior, Pulse};
use crate::controller::{AgentCore, AgentEnv};
use crate::profiles::BomberProfile;
use crate::scheduler::Ability;

/// Scale reached at the end of the countdown, relative to normal size.
const MAX_SWELL: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum BomberState {
    Chasing,
    KeepingDistance,
    /// Stationary for one tick while the spit goes out.
    Spitting,
    Exploding {
        elapsed: f32,
        anchor: Vec2,
    },
    Detonated,
}

/// Pumpkin behavior.
#[derive(Debug, Clone)]
pub struct Bomber {
    profile: BomberProfile,
    state: BomberState,
    alive_secs: f32,
    pulse: Pulse,
}

impl Bomber {
    pub(crate) fn new(profile: BomberProfile, core: &mut AgentCore) -> Self {
        core.scheduler.register(
            Ability::instant(
                AbilityId::Spit,
                profile.spit_cooldown,
                AbilityEffect::SpawnProjectile,
            ),
            profile.spit_cooldown,
        );
        Self {
            profile,
            state: BomberState::Chasing,
            alive_secs: 0.0,
            pulse: Pulse::default(),
        }
    }

    /// Countdown progress in [0, 1], if counting down.
    pub fn explosion_progress(&self) -> Option<f32> {
        match self.state {
            BomberState::Exploding { elapsed, .. } => {
                Some((elapsed / self.profile.countdown_secs).min(1.0))
            }
            _ => None,
        }
    }

    fn is_exploding(&self) -> bool {
        matches!(
            self.state,
            BomberState::Exploding { .. } | BomberState::Detonated
        )
    }

    fn start_countdown(&mut self, core: &AgentCore, env: &mut AgentEnv<'_>) {
        if self.is_exploding() {
            return;
        }
        env.nav.stop();
        self.state = BomberState::Exploding {
            elapsed: 0.0,
            anchor: env.nav.position(),
        };
        env.out
            .present(PresentationIntent::PlayOneShot { clip: ClipRef::Fuse });
        tracing::info!(
            agent = core.id.0,
            health = core.health,
            "bomber explosion countdown started"
        );
    }

    fn advance_countdown(&mut self, core: &mut AgentCore, dt: f32, env: &mut AgentEnv<'_>) {
        let BomberState::Exploding { elapsed, anchor } = &mut self.state else {
            return;
        };
        *elapsed += dt;
        let elapsed = *elapsed;
        let anchor = *anchor;

        self.pulse
            .update(elapsed, self.profile.pulse_hz, Rgba::ORANGE, env.out);
        let fraction = (elapsed / self.profile.countdown_secs).min(1.0);
        env.out.present(PresentationIntent::SetScale {
            scale: 1.0 + fraction * MAX_SWELL,
        });
        let shake = random_in_disc(env.rng, self.profile.shake);
        env.nav.warp(anchor + shake);

        if elapsed >= self.profile.countdown_secs {
            env.nav.warp(anchor);
            self.explode(core, env);
        }
    }

    fn explode(&mut self, core: &mut AgentCore, env: &mut AgentEnv<'_>) {
        if self.state == BomberState::Detonated {
            return;
        }
        let position = env.nav.position();
        self.state = BomberState::Detonated;
        env.out.present(PresentationIntent::SpawnEffect {
            effect: EffectKind::Explosion,
            at: position,
        });
        env.out.present(PresentationIntent::PlayOneShot {
            clip: ClipRef::Explosion,
        });
        let in_blast = env.target.alive
            && position.distance(env.target.position) <= self.profile.explosion_radius;
        if in_blast {
            env.out.fear(self.profile.explosion_damage);
        }
        tracing::info!(agent = core.id.0, hit_target = in_blast, "bomber exploded");
        core.begin_death(env);
    }

    fn should_auto_explode(&self) -> bool {
        self.profile.auto_explode_on_start
            || self
                .profile
                .auto_explode_after_secs
                .is_some_and(|after| self.alive_secs >= after)
    }
}

impl Behavior for Bomber {
    fn tick(&mut self, core: &mut AgentCore, dt: f32, env: &mut AgentEnv<'_>) {
        self.alive_secs += dt;
        if matches!(self.state, BomberState::Exploding { .. }) {
            self.advance_countdown(core, dt, env);
            return;
        }
        if self.state == BomberState::Detonated {
            return;
        }
        if self.should_auto_explode() {
            self.start_countdown(core, env);
            return;
        }

        let position = env.nav.position();
        let distance = position.distance(env.target.position);
        match self.state {
            BomberState::Chasing => {
                env.nav.resume();
                env.nav.set_speed(core.speed(self.profile.speed));
                core.refresh_path(dt, env.nav, env.target.position);
                if distance <= self.profile.spit_range {
                    self.state = BomberState::KeepingDistance;
                }
            }
            BomberState::KeepingDistance => {
                if distance <= self.profile.too_close {
                    let point = position
                        + away_from(position, env.target.position) * self.profile.keep_distance;
                    env.nav.resume();
                    env.nav.set_speed(core.speed(self.profile.speed));
                    env.nav.set_destination(point);
                } else if distance > self.profile.spit_range {
                    self.state = BomberState::Chasing;
                    core.force_path_refresh();
                } else if core
                    .scheduler
                    .ready(AbilityId::Spit, core.cooldown_multiplier())
                {
                    env.nav.stop();
                    self.state = BomberState::Spitting;
                } else {
                    env.nav.stop();
                }
            }
            BomberState::Spitting => {
                fire_projectile(
                    core,
                    self.profile.poison.as_ref(),
                    position,
                    env.target.position,
                    ClipRef::Spit,
                    env.out,
                );
                core.scheduler.reset(AbilityId::Spit);
                self.state = BomberState::KeepingDistance;
            }
            BomberState::Exploding { .. } | BomberState::Detonated => {}
        }
    }

    fn tick_without_target(&mut self, core: &mut AgentCore, dt: f32, env: &mut AgentEnv<'_>) {
        // The fuse keeps burning with nobody around.
        self.alive_secs += dt;
        if matches!(self.state, BomberState::Exploding { .. }) {
            self.advance_countdown(core, dt, env);
        }
    }

    fn on_target_lost(&mut self, _core: &mut AgentCore, _env: &mut AgentEnv<'_>) {
        if matches!(
            self.state,
            BomberState::KeepingDistance | BomberState::Spitting
        ) {
            self.state = BomberState::Chasing;
        }
    }

    fn on_damaged(&mut self, core: &mut AgentCore, env: &mut AgentEnv<'_>) -> bool {
        if self.is_exploding() {
            // Already committed; the countdown decides when it dies.
            return true;
        }
        if core.health <= 0.0 {
            self.explode(core, env);
            return true;
        }
        if core.health <= self.profile.explosion_health_threshold {
            self.start_countdown(core, env);
            return true;
        }
        false
    }

    fn suppress_damage_flash(&self) -> bool {
        self.is_exploding()
    }

    fn on_death(&mut self, _core: &mut AgentCore, _env: &mut AgentEnv<'_>) {
        self.state = BomberState::Detonated;
    }

    fn mode(&self) -> AgentMode {
        match self.state {
            BomberState::Chasing | BomberState::KeepingDistance => AgentMode::Chasing,
            BomberState::Spitting | BomberState::Exploding { .. } => AgentMode::ExecutingAbility,
            BomberState::Detonated => AgentMode::Dying,
        }
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            BomberState::Chasing => "chasing",
            BomberState::KeepingDistance => "keeping_distance",
            BomberState::Spitting => "spitting",
            BomberState::Exploding { .. } => "exploding",
            BomberState::Detonated => "detonated",
        }
    }
}
