//! Encounter director tuning.

use serde::{Deserialize, Serialize};

use crate::enums::AgentArchetype;
use crate::error::{ensure_positive, ConfigError};
use crate::types::Rect;

/// Flee behavior for a director that can move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleeProfile {
    pub move_speed: f32,
    /// Distance to put between the director and the target when fleeing.
    pub flee_distance: f32,
    /// Target range that triggers fleeing.
    pub detection_range: f32,
}

impl Default for FleeProfile {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            flee_distance: 5.0,
            detection_range: 10.0,
        }
    }
}

/// Spawn cadence, population cap and placement for one director.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorProfile {
    pub spawn_archetype: AgentArchetype,
    pub spawn_interval_secs: f32,
    pub population_cap: u32,
    /// Warning shown at the spawn point before the agent appears.
    pub telegraph_secs: f32,
    /// Random spawn rectangle. `None` spawns at the director's position.
    pub spawn_area: Option<Rect>,
    pub flee: Option<FleeProfile>,
}

impl Default for DirectorProfile {
    fn default() -> Self {
        Self {
            spawn_archetype: AgentArchetype::Brawler,
            spawn_interval_secs: 2.0,
            population_cap: 10,
            telegraph_secs: 1.0,
            spawn_area: None,
            flee: None,
        }
    }
}

impl DirectorProfile {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("director.spawn_interval_secs", self.spawn_interval_secs)?;
        ensure_positive("director.telegraph_secs", self.telegraph_secs)?;
        if self.population_cap == 0 {
            return Err(ConfigError::ZeroPopulationCap);
        }
        if self.spawn_area.is_some_and(|area| area.is_empty()) {
            return Err(ConfigError::EmptySpawnArea);
        }
        if let Some(flee) = &self.flee {
            ensure_positive("director.flee.move_speed", flee.move_speed)?;
            ensure_positive("director.flee.flee_distance", flee.flee_distance)?;
            ensure_positive("director.flee.detection_range", flee.detection_range)?;
        }
        Ok(())
    }
}
