//! Health-driven escalation phases.

use serde::{Deserialize, Serialize};

use dread_core::constants::{DESPERATE_HEALTH_RATIO, ENRAGED_HEALTH_RATIO};

/// Escalation phase. Ordered: an agent only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EscalationPhase {
    #[default]
    Calm,
    Enraged,
    Desperate,
}

/// Latches escalation flags as health drops. Healing never clears them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhaseTracker {
    phase: EscalationPhase,
    enraged_at: f32,
    desperate_at: f32,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new(ENRAGED_HEALTH_RATIO, DESPERATE_HEALTH_RATIO)
    }
}

impl PhaseTracker {
    pub fn new(enraged_at: f32, desperate_at: f32) -> Self {
        Self {
            phase: EscalationPhase::Calm,
            enraged_at,
            desperate_at,
        }
    }

    /// Feed the current health ratio. Returns the new phase when it advanced.
    ///
    /// Dropping straight past both thresholds sets both flags at once.
    pub fn update(&mut self, health_ratio: f32) -> Option<EscalationPhase> {
        let observed = if health_ratio <= self.desperate_at {
            EscalationPhase::Desperate
        } else if health_ratio <= self.enraged_at {
            EscalationPhase::Enraged
        } else {
            EscalationPhase::Calm
        };
        if observed > self.phase {
            self.phase = observed;
            Some(observed)
        } else {
            None
        }
    }

    pub fn phase(&self) -> EscalationPhase {
        self.phase
    }

    pub fn is_enraged(&self) -> bool {
        self.phase >= EscalationPhase::Enraged
    }

    pub fn is_desperate(&self) -> bool {
        self.phase == EscalationPhase::Desperate
    }
}
