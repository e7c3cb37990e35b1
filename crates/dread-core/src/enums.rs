//! Enumerations shared across the encounter engine.

use serde::{Deserialize, Serialize};

use crate::constants::{FACING_DEADZONE, HEALTH_BAND_LOW, HEALTH_BAND_MID};
use crate::types::Vec2;

/// Agent archetype. Selects the behavior state machine and default tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentArchetype {
    /// Contact fighter that strikes and backs off.
    Brawler,
    /// Brawler variant with a slash effect, death clip and persistence guard.
    Wrench,
    /// Keeps a shooting band and fires embedding arrows.
    Archer,
    /// Spits poison and detonates when badly hurt.
    Pumpkin,
    /// Teleporting caster that drops cursed ground.
    Reaper,
    /// Stationary hovering turret.
    Sentinel,
}

impl AgentArchetype {
    pub const ALL: [AgentArchetype; 6] = [
        AgentArchetype::Brawler,
        AgentArchetype::Wrench,
        AgentArchetype::Archer,
        AgentArchetype::Pumpkin,
        AgentArchetype::Reaper,
        AgentArchetype::Sentinel,
    ];
}

/// Coarse state shape shared by every archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentMode {
    Chasing,
    ExecutingAbility,
    Retreating,
    Dying,
}

/// Ability identifiers registered with an ability scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbilityId {
    Melee,
    Shoot,
    Spit,
    Teleport,
    HazardCast,
}

/// What an ability commits once its telegraph has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityEffect {
    DirectDamage,
    SpawnProjectile,
    SpawnHazard,
    Relocate,
}

/// Collision category reported by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContactCategory {
    Target,
    Agent,
    HostileProjectile,
    Terrain,
    Other,
}

/// Whether a reported contact began or ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactPhase {
    Begin,
    End,
}

/// What a projectile does when it hits something that is neither excluded nor the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleResponse {
    /// Stop, become inert, and stay until lifetime expiry.
    Embed,
    /// Destroy immediately.
    Shatter,
}

/// Projectile lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    #[default]
    Flying,
    Embedded,
    Spent,
}

/// Hazard area lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardPhase {
    #[default]
    Warning,
    Active,
}

/// Fear meter display band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FearBand {
    #[default]
    Calm,
    Tense,
    Panic,
}

/// Health bar display band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    #[default]
    Full,
    Mid,
    Low,
}

impl HealthBand {
    /// Classify a health ratio in [0, 1].
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio <= HEALTH_BAND_LOW {
            HealthBand::Low
        } else if ratio <= HEALTH_BAND_MID {
            HealthBand::Mid
        } else {
            HealthBand::Full
        }
    }
}

/// Four-way facing derived from movement velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
    Up,
    Down,
}

impl Facing {
    /// Dominant-axis facing for a velocity, or `None` inside the dead zone.
    pub fn from_velocity(velocity: Vec2) -> Option<Self> {
        if velocity.length() < FACING_DEADZONE {
            return None;
        }
        if velocity.x.abs() > velocity.y.abs() {
            Some(if velocity.x > 0.0 {
                Facing::Right
            } else {
                Facing::Left
            })
        } else {
            Some(if velocity.y > 0.0 {
                Facing::Up
            } else {
                Facing::Down
            })
        }
    }
}

/// One-shot audio clips an agent may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipRef {
    Death,
    Explosion,
    Fuse,
    Shoot,
    Spit,
    Teleport,
    Cast,
    Slash,
    FearFilled,
}

impl ClipRef {
    /// Nominal clip length, used to time removal after a death sound.
    pub fn length_secs(self) -> f32 {
        match self {
            ClipRef::Death => 1.2,
            ClipRef::Explosion => 1.0,
            ClipRef::FearFilled => 2.0,
            _ => 0.3,
        }
    }
}

/// Visual effects an agent or director may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Slash,
    TeleportOut,
    TeleportIn,
    Explosion,
    PoisonSplash,
    CastCircle,
    SpawnIndicator,
    SpawnBurst,
}

/// Prebuilt encounter layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterLayout {
    /// Brawlers, a wrench and an archer, fed by a graveyard spawner.
    Graveyard,
    /// Pumpkins under a sentinel.
    PumpkinPatch,
    /// A single reaper.
    ReaperLair,
}

impl EncounterLayout {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "graveyard" => Some(EncounterLayout::Graveyard),
            "pumpkin_patch" | "pumpkinpatch" | "pumpkins" => Some(EncounterLayout::PumpkinPatch),
            "reaper_lair" | "reaperlair" | "reaper" => Some(EncounterLayout::ReaperLair),
            _ => None,
        }
    }
}
