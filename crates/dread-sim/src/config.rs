//! Encounter configuration.
//!
//! `EncounterConfig::default()` is a complete playable setup. Hosts load
//! overrides from JSON; any field left out keeps its default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dread_agent_ai::profiles::AgentProfile;
use dread_core::constants::TARGET_RADIUS;
use dread_core::enums::AgentArchetype;
use dread_core::error::{ensure_positive, ConfigError};
use dread_core::fear::FearConfig;
use dread_core::types::{Rect, Vec2};

/// What happens when the fear meter fills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Empty the meter and reload the encounter: unresolved placements come
    /// back, the target returns to its start.
    #[default]
    ReloadEncounter,
    /// Empty the meter and carry on.
    ResetMeter,
    /// Leave the meter full. Overflow re-arms once fear drains below max.
    Hold,
}

/// Configuration for starting a new encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// RNG seed for determinism. Same seed = same encounter.
    pub seed: u64,
    /// Navigable surface. Projectiles leaving it hit terrain.
    pub arena: Rect,
    pub target_start: Vec2,
    pub target_radius: f32,
    pub fear: FearConfig,
    pub overflow_policy: OverflowPolicy,
    /// Derive contacts from hitbox overlap. Disable when an external
    /// collision collaborator reports them instead.
    pub detect_contacts: bool,
    /// Per-archetype overrides. Archetypes not listed use their preset.
    pub profiles: BTreeMap<AgentArchetype, AgentProfile>,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena: Rect::from_center(Vec2::ZERO, Vec2::new(20.0, 12.0)),
            target_start: Vec2::ZERO,
            target_radius: TARGET_RADIUS,
            fear: FearConfig::default(),
            overflow_policy: OverflowPolicy::default(),
            detect_contacts: true,
            profiles: BTreeMap::new(),
        }
    }
}

impl EncounterConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena.is_empty() {
            return Err(ConfigError::EmptyArena);
        }
        ensure_positive("target_radius", self.target_radius)?;
        self.fear.validate()?;
        for profile in self.profiles.values() {
            profile.validate()?;
        }
        Ok(())
    }

    /// Tuning for an archetype: the override if present, else the preset.
    pub fn profile(&self, archetype: AgentArchetype) -> AgentProfile {
        self.profiles
            .get(&archetype)
            .cloned()
            .unwrap_or_else(|| AgentProfile::preset(archetype))
    }
}
