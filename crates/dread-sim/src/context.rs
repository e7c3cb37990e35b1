//! Engine state shared by systems during one tick.

use rand_chacha::ChaCha8Rng;

use dread_agent_ai::controller::Target;
use dread_core::collaborators::SessionController;
use dread_core::constants::FEAR_FLASH_SECS;
use dread_core::enums::ClipRef;
use dread_core::events::{EntityRef, PresentationEvent, PresentationIntent};
use dread_core::session::Session;
use dread_core::types::{AgentId, DirectorId, HazardId, ProjectileId, Rgba};

use crate::components::TargetState;
use crate::config::{EncounterConfig, OverflowPolicy};
use crate::systems::contacts::ContactTracker;

/// Monotonic id counters. Ids are never reused within an engine.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    agents: u32,
    directors: u32,
    hazards: u32,
    projectiles: u32,
}

impl IdAllocator {
    pub fn next_agent(&mut self) -> AgentId {
        self.agents += 1;
        AgentId(self.agents)
    }

    pub fn next_director(&mut self) -> DirectorId {
        self.directors += 1;
        DirectorId(self.directors)
    }

    pub fn next_hazard(&mut self) -> HazardId {
        self.hazards += 1;
        HazardId(self.hazards)
    }

    pub fn next_projectile(&mut self) -> ProjectileId {
        self.projectiles += 1;
        ProjectileId(self.projectiles)
    }
}

/// Session controller applying the configured overflow policy.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    policy: OverflowPolicy,
    reload_requested: bool,
}

impl SessionPolicy {
    pub fn new(policy: OverflowPolicy) -> Self {
        Self {
            policy,
            reload_requested: false,
        }
    }

    /// True once after an overflow that asked for an encounter reload.
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    /// An overflow this tick already asked for a reload.
    pub fn reload_pending(&self) -> bool {
        self.reload_requested
    }
}

impl SessionController for SessionPolicy {
    fn on_fear_overflow(&mut self) -> Option<f32> {
        match self.policy {
            OverflowPolicy::ReloadEncounter => {
                self.reload_requested = true;
                Some(0.0)
            }
            OverflowPolicy::ResetMeter => Some(0.0),
            OverflowPolicy::Hold => None,
        }
    }
}

/// Borrowed engine state handed to systems.
pub struct SimContext<'a> {
    pub config: &'a EncounterConfig,
    pub target: TargetState,
    pub rng: &'a mut ChaCha8Rng,
    pub session: &'a mut Session,
    pub policy: &'a mut SessionPolicy,
    pub ids: &'a mut IdAllocator,
    pub contacts: &'a mut ContactTracker,
    pub presentation: &'a mut Vec<PresentationEvent>,
}

impl SimContext<'_> {
    /// The target as agents see it.
    pub fn agent_target(&self) -> Target {
        Target {
            position: self.target.position,
            alive: self.target.active,
        }
    }

    pub fn present(&mut self, source: EntityRef, intent: PresentationIntent) {
        self.presentation.push(PresentationEvent::new(source, intent));
    }

    /// Apply fear to the target, in call order.
    ///
    /// Fear arriving after an overflow that requested a reload is dropped, so
    /// the reloaded session starts from an empty meter.
    pub fn add_fear(&mut self, amount: f32, source: EntityRef) {
        if self.policy.reload_pending() {
            tracing::trace!(?source, amount, "fear dropped while reload is pending");
            return;
        }
        let change = self.session.add_fear(amount, &mut *self.policy);
        if change.damaged {
            tracing::debug!(
                ?source,
                amount,
                fear = change.current,
                "target frightened"
            );
            self.present(EntityRef::Target, PresentationIntent::TargetDamaged { amount });
            self.present(
                EntityRef::Target,
                PresentationIntent::Flash {
                    color: Rgba::RED,
                    duration_secs: FEAR_FLASH_SECS,
                },
            );
        }
        if change.overflowed {
            tracing::info!(
                ?source,
                overflows = self.session.overflow_count(),
                "fear overflow"
            );
            self.present(
                EntityRef::Target,
                PresentationIntent::PlayOneShot {
                    clip: ClipRef::FearFilled,
                },
            );
        }
    }
}
