//! Health read-out shared by agents and health bars.

use crate::enums::HealthBand;

/// Anything with a current and maximum health.
pub trait HasHealth {
    fn current_health(&self) -> f32;
    fn max_health(&self) -> f32;

    /// Current health as a fraction of max, clamped to [0, 1].
    fn health_ratio(&self) -> f32 {
        let max = self.max_health();
        if max <= 0.0 {
            return 0.0;
        }
        (self.current_health() / max).clamp(0.0, 1.0)
    }

    fn health_band(&self) -> HealthBand {
        HealthBand::from_ratio(self.health_ratio())
    }
}
