//! Hovering turret (sentinel): bobs side to side and fires at a fixed interval.

use dread_core::enums::{AbilityEffect, AbilityId, AgentMode, ClipRef};
use dread_core::types::Vec2;

use super::{fire_projectile, Behavior};
use crate::controller::{AgentCore, AgentEnv};
use crate::profiles::TurretProfile;
use crate::scheduler::Ability;

#[derive(Debug, Clone)]
pub struct Turret {
    profile: TurretProfile,
    anchor: Option<Vec2>,
    hover_phase: f32,
}

impl Turret {
    pub(crate) fn new(profile: TurretProfile, core: &mut AgentCore) -> Self {
        // First shot after one full interval.
        core.scheduler.register(
            Ability::instant(
                AbilityId::Shoot,
                profile.shoot_interval,
                AbilityEffect::SpawnProjectile,
            ),
            0.0,
        );
        Self {
            profile,
            anchor: None,
            hover_phase: 0.0,
        }
    }
}

impl Behavior for Turret {
    fn tick(&mut self, core: &mut AgentCore, dt: f32, env: &mut AgentEnv<'_>) {
        let anchor = *self.anchor.get_or_insert_with(|| env.nav.position());
        self.hover_phase += dt * self.profile.float_speed;
        let offset = Vec2::new(self.hover_phase.sin() * self.profile.float_amplitude, 0.0);
        env.nav.warp(anchor + offset);

        if core
            .scheduler
            .ready(AbilityId::Shoot, core.cooldown_multiplier())
        {
            fire_projectile(
                core,
                self.profile.bolt.as_ref(),
                anchor + offset,
                env.target.position,
                ClipRef::Shoot,
                env.out,
            );
            core.scheduler.reset(AbilityId::Shoot);
        }
    }

    fn mode(&self) -> AgentMode {
        AgentMode::ExecutingAbility
    }

    fn state_name(&self) -> &'static str {
        "hovering"
    }
}
