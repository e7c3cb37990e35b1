//! Archetype behaviors.
//!
//! Each archetype implements `Behavior` against the shared `AgentCore`.
//! `ArchetypeBehavior` is the closed set the controller dispatches over.

pub mod bomber;
pub mod melee;
pub mod ranged;
pub mod teleporter;
pub mod turret;

use rand::{Rng, RngCore};

use dread_core::enums::{AgentMode, ClipRef};
use dread_core::events::PresentationIntent;
use dread_core::types::{unit_at, Rgba, Vec2};

use crate::controller::{AgentCore, AgentEnv};
use crate::output::{AgentEffect, AgentOutput};
use crate::profiles::BehaviorProfile;
use crate::projectile::ProjectileSpec;

pub use bomber::Bomber;
pub use melee::MeleeKiter;
pub use ranged::RangedKiter;
pub use teleporter::Teleporter;
pub use turret::Turret;

/// Archetype hooks called by the controller.
pub(crate) trait Behavior {
    fn tick(&mut self, core: &mut AgentCore, dt: f32, env: &mut AgentEnv<'_>);

    /// Runs instead of `tick` while the target is gone.
    fn tick_without_target(&mut self, _core: &mut AgentCore, _dt: f32, _env: &mut AgentEnv<'_>) {}

    /// The target disappeared: cancel whatever is in progress.
    fn on_target_lost(&mut self, _core: &mut AgentCore, _env: &mut AgentEnv<'_>) {}

    fn on_target_contact(&mut self, _core: &mut AgentCore, _env: &mut AgentEnv<'_>) {}

    /// Called after health dropped. Return true to take over lethal-damage handling.
    fn on_damaged(&mut self, _core: &mut AgentCore, _env: &mut AgentEnv<'_>) -> bool {
        false
    }

    fn suppress_damage_flash(&self) -> bool {
        false
    }

    fn on_death(&mut self, _core: &mut AgentCore, _env: &mut AgentEnv<'_>) {}

    fn on_hazard_destroyed(&mut self) {}

    fn mode(&self) -> AgentMode;

    fn state_name(&self) -> &'static str;

    fn retreat_point(&self) -> Option<Vec2> {
        None
    }
}

/// The behavior half of an agent.
#[derive(Debug, Clone)]
pub enum ArchetypeBehavior {
    Melee(MeleeKiter),
    Ranged(RangedKiter),
    Bomber(Bomber),
    Teleporter(Teleporter),
    Turret(Turret),
}

impl ArchetypeBehavior {
    /// Build the behavior and register its abilities on `core`.
    pub(crate) fn from_profile(
        profile: &BehaviorProfile,
        core: &mut AgentCore,
        rng: &mut dyn RngCore,
    ) -> Self {
        match profile {
            BehaviorProfile::MeleeKiter(p) => Self::Melee(MeleeKiter::new(p.clone(), core)),
            BehaviorProfile::RangedKiter(p) => Self::Ranged(RangedKiter::new(p.clone(), core)),
            BehaviorProfile::Bomber(p) => Self::Bomber(Bomber::new(p.clone(), core)),
            BehaviorProfile::Teleporter(p) => {
                Self::Teleporter(Teleporter::new(p.clone(), core, rng))
            }
            BehaviorProfile::Turret(p) => Self::Turret(Turret::new(p.clone(), core)),
        }
    }

    pub(crate) fn as_dyn(&mut self) -> &mut dyn Behavior {
        match self {
            Self::Melee(b) => b,
            Self::Ranged(b) => b,
            Self::Bomber(b) => b,
            Self::Teleporter(b) => b,
            Self::Turret(b) => b,
        }
    }

    pub(crate) fn as_dyn_ref(&self) -> &dyn Behavior {
        match self {
            Self::Melee(b) => b,
            Self::Ranged(b) => b,
            Self::Bomber(b) => b,
            Self::Teleporter(b) => b,
            Self::Turret(b) => b,
        }
    }
}

/// Request an aimed projectile. Returns false when the shot was skipped.
pub(crate) fn fire_projectile(
    core: &AgentCore,
    spec: Option<&ProjectileSpec>,
    origin: Vec2,
    aim_at: Vec2,
    clip: ClipRef,
    out: &mut AgentOutput,
) -> bool {
    let Some(spec) = spec else {
        tracing::warn!(agent = core.id.0, "no projectile configured; skipping shot");
        return false;
    };
    let direction = (aim_at - origin).normalize_or_zero();
    if direction == Vec2::ZERO {
        tracing::debug!(agent = core.id.0, "target on top of shooter; skipping shot");
        return false;
    }
    out.push(AgentEffect::SpawnProjectile {
        origin,
        direction,
        spec: spec.clone(),
    });
    out.present(PresentationIntent::PlayOneShot { clip });
    true
}

/// Uniform random point in a disc of `radius` around the origin.
pub(crate) fn random_in_disc(rng: &mut dyn RngCore, radius: f32) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let r = rng.gen::<f32>().sqrt() * radius;
    unit_at(angle) * r
}

/// Square-wave pulse used by telegraphs. Emits a flash on each rising edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Pulse {
    lit: bool,
}

impl Pulse {
    pub(crate) fn update(&mut self, elapsed: f32, hz: f32, color: Rgba, out: &mut AgentOutput) {
        let lit = (elapsed * hz).fract() < 0.5;
        if lit && !self.lit {
            out.present(PresentationIntent::Flash {
                color,
                duration_secs: 0.5 / hz,
            });
        }
        self.lit = lit;
    }
}
