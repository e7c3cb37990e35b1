//! Session context: fear, persistence and key/door state for one play session.
//!
//! Passed explicitly to whatever needs it. There is no global instance.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::collaborators::{PersistenceRegistry, SessionController};
use crate::error::ConfigError;
use crate::fear::{FearChange, FearConfig, FearMeter};

/// In-memory persistence registry backed by a sorted set of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSet {
    ids: BTreeSet<String>,
}

impl ResolvedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl PersistenceRegistry for ResolvedSet {
    fn is_resolved(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn mark_resolved(&mut self, id: &str) {
        if self.ids.insert(id.to_string()) {
            tracing::debug!(id, "persistent object resolved");
        }
    }
}

/// State for one play session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub fear: FearMeter,
    pub registry: ResolvedSet,
    keys_collected: u32,
    overflow_count: u32,
}

impl Session {
    pub fn new(fear: FearConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            fear: FearMeter::new(fear)?,
            registry: ResolvedSet::new(),
            keys_collected: 0,
            overflow_count: 0,
        })
    }

    /// Add fear, counting overflows for the session summary.
    pub fn add_fear(&mut self, delta: f32, controller: &mut dyn SessionController) -> FearChange {
        let change = self.fear.add_fear(delta, controller);
        if change.overflowed {
            self.overflow_count += 1;
        }
        change
    }

    /// Collect a key. Returns false when the key was already collected.
    pub fn collect_key(&mut self, key_id: &str) -> bool {
        if self.registry.is_resolved(key_id) {
            return false;
        }
        self.registry.mark_resolved(key_id);
        self.keys_collected += 1;
        tracing::info!(key_id, total = self.keys_collected, "key collected");
        true
    }

    pub fn keys_collected(&self) -> u32 {
        self.keys_collected
    }

    /// True when enough keys have been collected to open a door.
    pub fn can_open(&self, required_keys: u32) -> bool {
        self.keys_collected >= required_keys
    }

    pub fn is_resolved(&self, id: &str) -> bool {
        self.registry.is_resolved(id)
    }

    pub fn mark_resolved(&mut self, id: &str) {
        self.registry.mark_resolved(id);
    }

    /// Number of fear overflows this session.
    pub fn overflow_count(&self) -> u32 {
        self.overflow_count
    }
}
