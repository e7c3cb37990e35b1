//! Area hazards: warned, then damaging ground with escalating intensity.

use serde::{Deserialize, Serialize};

use dread_core::enums::HazardPhase;
use dread_core::error::{ensure_non_negative, ensure_positive, ConfigError};
use dread_core::types::{AgentId, Vec2};

/// Tuning for one hazard kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardSpec {
    pub radius: f32,
    /// Harmless warning period before the area turns active.
    pub warning_secs: f32,
    /// Active period after the warning.
    pub active_secs: f32,
    /// Base fear applied each damage tick.
    pub damage_per_tick: f32,
    pub tick_interval: f32,
    /// Extra damage fraction reached at the end of the active period.
    pub max_escalation: f32,
}

impl Default for HazardSpec {
    fn default() -> Self {
        Self::cursed_ground(15.0)
    }
}

impl HazardSpec {
    /// Cursed ground dealing `damage_per_second`, applied every half second.
    pub fn cursed_ground(damage_per_second: f32) -> Self {
        let tick_interval = 0.5;
        Self {
            radius: 2.5,
            warning_secs: 0.5,
            active_secs: 5.0,
            damage_per_tick: damage_per_second * tick_interval,
            tick_interval,
            max_escalation: 0.5,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("hazard.radius", self.radius)?;
        ensure_non_negative("hazard.warning_secs", self.warning_secs)?;
        ensure_positive("hazard.active_secs", self.active_secs)?;
        ensure_non_negative("hazard.damage_per_tick", self.damage_per_tick)?;
        ensure_positive("hazard.tick_interval", self.tick_interval)?;
        ensure_non_negative("hazard.max_escalation", self.max_escalation)
    }
}

/// What happened to a hazard during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HazardTick {
    /// Fear to apply to the target this tick.
    pub damage: Option<f32>,
    /// The warning period ended this tick.
    pub activated: bool,
    /// Warning plus active period have fully elapsed.
    pub expired: bool,
}

/// A circular area that damages the target while it stands inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardArea {
    center: Vec2,
    spec: HazardSpec,
    owner: Option<AgentId>,
    phase: HazardPhase,
    elapsed: f32,
    damage_timer: f32,
    target_inside: bool,
    destroyed: bool,
}

impl HazardArea {
    pub fn new(center: Vec2, spec: HazardSpec, owner: Option<AgentId>) -> Self {
        Self {
            center,
            spec,
            owner,
            phase: HazardPhase::Warning,
            elapsed: 0.0,
            damage_timer: 0.0,
            target_inside: false,
            destroyed: false,
        }
    }

    pub fn tick(&mut self, dt: f32) -> HazardTick {
        let mut result = HazardTick::default();
        if self.destroyed {
            return result;
        }
        self.elapsed += dt;

        if self.phase == HazardPhase::Warning && self.elapsed >= self.spec.warning_secs {
            self.phase = HazardPhase::Active;
            result.activated = true;
            if self.target_inside {
                // Standing in it when it turns on: hit on this tick.
                self.damage_timer = self.spec.tick_interval;
            }
        }

        if self.phase == HazardPhase::Active && self.target_inside {
            if !result.activated {
                self.damage_timer += dt;
            }
            if self.damage_timer >= self.spec.tick_interval {
                self.damage_timer -= self.spec.tick_interval;
                result.damage = Some(self.spec.damage_per_tick * self.damage_multiplier());
            }
        }

        result.expired = self.elapsed >= self.spec.warning_secs + self.spec.active_secs;
        result
    }

    /// Intensity multiplier, growing linearly over the active period.
    pub fn damage_multiplier(&self) -> f32 {
        if self.phase != HazardPhase::Active {
            return 1.0;
        }
        let active_elapsed = (self.elapsed - self.spec.warning_secs).max(0.0);
        let progress = (active_elapsed / self.spec.active_secs).min(1.0);
        1.0 + progress * self.spec.max_escalation
    }

    /// Target entered. While active the next tick damages immediately.
    pub fn on_target_enter(&mut self) {
        if self.target_inside {
            return;
        }
        self.target_inside = true;
        if self.phase == HazardPhase::Active {
            self.damage_timer = self.spec.tick_interval;
        }
    }

    pub fn on_target_exit(&mut self) {
        self.target_inside = false;
        self.damage_timer = 0.0;
    }

    /// Mark destroyed. Returns true only on the first call, so the owner's
    /// hazard count is decremented exactly once.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        true
    }

    /// True when `point` lies inside the area.
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.spec.radius
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.spec.radius
    }

    pub fn owner(&self) -> Option<AgentId> {
        self.owner
    }

    pub fn phase(&self) -> HazardPhase {
        self.phase
    }

    pub fn is_target_inside(&self) -> bool {
        self.target_inside
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
