//! Configuration errors.
//!
//! Runtime anomalies (missing prefab, off-surface teleport, stale target)
//! are logged and skipped rather than surfaced as errors.

/// Rejected configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse encounter config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error(
        "distance bands out of order: expected too_close ({too_close}) < preferred ({preferred}) <= max ({max})"
    )]
    UnorderedBands {
        too_close: f32,
        preferred: f32,
        max: f32,
    },

    #[error("fear thresholds out of order: expected 0 <= tense ({tense}) < panic ({panic}) <= 1")]
    UnorderedThresholds { tense: f32, panic: f32 },

    #[error("{field} must be a probability in [0, 1], got {value}")]
    NotAProbability { field: &'static str, value: f32 },

    #[error("population cap must be at least 1")]
    ZeroPopulationCap,

    #[error("hazard cap must be at least 1")]
    ZeroHazardCap,

    #[error("spawn area is empty")]
    EmptySpawnArea,

    #[error("arena bounds are empty")]
    EmptyArena,
}

/// Reject zero, negative and non-finite values.
pub fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Reject negative and non-finite values.
pub fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

pub fn ensure_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotAProbability { field, value })
    }
}
