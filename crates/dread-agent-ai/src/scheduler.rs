//! Ability cooldown bookkeeping.
//!
//! Each registered ability tracks the time since it was last used. Readiness
//! is a pure query so an ability that is ready this tick stays selectable
//! until something consumes it with `reset`.

use serde::{Deserialize, Serialize};

use dread_core::enums::{AbilityEffect, AbilityId};

/// Static description of an ability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub id: AbilityId,
    pub cooldown_secs: f32,
    /// Warning shown before the effect commits.
    pub telegraph_secs: f32,
    pub invulnerable_while_executing: bool,
    pub effect: AbilityEffect,
}

impl Ability {
    /// An ability with no telegraph and no invulnerability.
    pub fn instant(id: AbilityId, cooldown_secs: f32, effect: AbilityEffect) -> Self {
        Self {
            id,
            cooldown_secs,
            telegraph_secs: 0.0,
            invulnerable_while_executing: false,
            effect,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot {
    ability: Ability,
    elapsed: f32,
}

/// Cooldown timers for one agent's abilities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityScheduler {
    slots: Vec<Slot>,
}

impl AbilityScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ability with a starting elapsed time.
    ///
    /// `initial_elapsed >= cooldown_secs` makes it ready immediately.
    /// Re-registering an id replaces the earlier entry.
    pub fn register(&mut self, ability: Ability, initial_elapsed: f32) {
        let slot = Slot {
            ability,
            elapsed: initial_elapsed.max(0.0),
        };
        match self.slots.iter_mut().find(|s| s.ability.id == ability.id) {
            Some(existing) => *existing = slot,
            None => self.slots.push(slot),
        }
    }

    pub fn tick(&mut self, dt: f32) {
        for slot in &mut self.slots {
            slot.elapsed += dt;
        }
    }

    /// True when the ability's cooldown, scaled by `cooldown_multiplier`, has elapsed.
    /// Unregistered abilities are never ready.
    pub fn ready(&self, id: AbilityId, cooldown_multiplier: f32) -> bool {
        self.slot(id)
            .is_some_and(|s| s.elapsed >= s.ability.cooldown_secs * cooldown_multiplier)
    }

    /// Consume the ability: restart its cooldown.
    pub fn reset(&mut self, id: AbilityId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.elapsed = 0.0;
        }
    }

    /// Make the ability ready right now.
    pub fn prime(&mut self, id: AbilityId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.elapsed = slot.elapsed.max(slot.ability.cooldown_secs);
        }
    }

    /// Seconds since the ability was last used.
    pub fn elapsed(&self, id: AbilityId) -> Option<f32> {
        self.slot(id).map(|s| s.elapsed)
    }

    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.slot(id).map(|s| &s.ability)
    }

    /// Telegraph duration of an ability, 0 when unregistered.
    pub fn telegraph_secs(&self, id: AbilityId) -> f32 {
        self.ability(id).map_or(0.0, |a| a.telegraph_secs)
    }

    fn slot(&self, id: AbilityId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.ability.id == id)
    }

    fn slot_mut(&mut self, id: AbilityId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.ability.id == id)
    }
}
