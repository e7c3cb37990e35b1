//! Fear meter: the target's accumulated stress.
//!
//! Agents add fear by damaging the target. When the meter fills, the session
//! controller is notified exactly once per fill and decides what value the
//! meter continues from.

use serde::{Deserialize, Serialize};

use crate::collaborators::SessionController;
use crate::constants::*;
use crate::enums::FearBand;
use crate::error::{ensure_non_negative, ensure_positive, ConfigError};

/// Fear meter tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FearConfig {
    pub max: f32,
    /// Exponential smoothing rate for the presentation value (per second).
    pub fill_smoothing: f32,
    /// Passive decay (fear per second). 0 disables decay.
    pub decay_per_second: f32,
    /// Ratio at which the meter reads as tense.
    pub tense_threshold: f32,
    /// Ratio at which the meter reads as panic.
    pub panic_threshold: f32,
}

impl Default for FearConfig {
    fn default() -> Self {
        Self {
            max: FEAR_MAX,
            fill_smoothing: FEAR_FILL_SMOOTHING,
            decay_per_second: FEAR_DECAY_PER_SECOND,
            tense_threshold: FEAR_TENSE_THRESHOLD,
            panic_threshold: FEAR_PANIC_THRESHOLD,
        }
    }
}

impl FearConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("fear.max", self.max)?;
        ensure_non_negative("fear.fill_smoothing", self.fill_smoothing)?;
        ensure_non_negative("fear.decay_per_second", self.decay_per_second)?;
        let ordered = self.tense_threshold >= 0.0
            && self.tense_threshold < self.panic_threshold
            && self.panic_threshold <= 1.0;
        if !ordered {
            return Err(ConfigError::UnorderedThresholds {
                tense: self.tense_threshold,
                panic: self.panic_threshold,
            });
        }
        Ok(())
    }
}

/// Result of a single fear mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FearChange {
    pub previous: f32,
    pub current: f32,
    /// A positive delta actually raised the value; presentation should flash.
    pub damaged: bool,
    /// The session controller was notified of an overflow by this call.
    pub overflowed: bool,
}

/// The shared stress resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FearMeter {
    config: FearConfig,
    current: f32,
    visual: f32,
    /// Cleared when an overflow fires, set again once the value drops below max.
    overflow_armed: bool,
}

impl FearMeter {
    pub fn new(config: FearConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            current: 0.0,
            visual: 0.0,
            overflow_armed: true,
        })
    }

    /// Add (or with a negative delta, remove) fear.
    ///
    /// The value is clamped to `[0, max]`. Reaching max notifies `session`
    /// once; further additions while full do not notify again.
    pub fn add_fear(&mut self, delta: f32, session: &mut dyn SessionController) -> FearChange {
        let previous = self.current;
        if !delta.is_finite() {
            tracing::warn!(delta, "ignoring non-finite fear delta");
            return FearChange {
                previous,
                current: previous,
                ..FearChange::default()
            };
        }

        self.shift(delta);
        let mut change = FearChange {
            previous,
            current: self.current,
            damaged: delta > 0.0 && self.current > previous,
            overflowed: false,
        };

        if self.current >= self.config.max && self.overflow_armed {
            self.overflow_armed = false;
            change.overflowed = true;
            tracing::info!(max = self.config.max, "fear meter overflowed");
            if let Some(reset_to) = session.on_fear_overflow() {
                self.set(reset_to);
            }
            change.current = self.current;
        }
        change
    }

    /// Passive decay and presentation smoothing.
    pub fn tick(&mut self, dt: f32) {
        if self.config.decay_per_second > 0.0 && self.current > 0.0 {
            self.shift(-self.config.decay_per_second * dt);
        }
        let k = self.config.fill_smoothing;
        if k > 0.0 {
            self.visual += (self.current - self.visual) * (1.0 - (-k * dt).exp());
        } else {
            self.visual = self.current;
        }
    }

    /// Overwrite the value (clamped). Used by session resets; never notifies.
    pub fn set(&mut self, value: f32) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.current = value.clamp(0.0, self.config.max);
        self.visual = self.current;
        if self.current < self.config.max {
            self.overflow_armed = true;
        }
    }

    fn shift(&mut self, delta: f32) {
        self.current = (self.current + delta).clamp(0.0, self.config.max);
        if self.current < self.config.max {
            self.overflow_armed = true;
        }
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    /// Smoothed value for bar rendering. Never used for gameplay decisions.
    pub fn visual(&self) -> f32 {
        self.visual
    }

    pub fn max(&self) -> f32 {
        self.config.max
    }

    pub fn ratio(&self) -> f32 {
        self.current / self.config.max
    }

    pub fn band(&self) -> FearBand {
        let ratio = self.ratio();
        if ratio >= self.config.panic_threshold {
            FearBand::Panic
        } else if ratio >= self.config.tense_threshold {
            FearBand::Tense
        } else {
            FearBand::Calm
        }
    }

    pub fn is_tense(&self) -> bool {
        self.band() != FearBand::Calm
    }

    pub fn is_panic(&self) -> bool {
        self.band() == FearBand::Panic
    }

    pub fn config(&self) -> &FearConfig {
        &self.config
    }
}
