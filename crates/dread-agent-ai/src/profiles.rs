//! Archetype tuning profiles.
//!
//! Every tunable an archetype reads lives here. `AgentProfile::preset` gives
//! the stock tuning; hosts can override any profile through the encounter
//! config, and overrides are validated before use.

use serde::{Deserialize, Serialize};

use dread_core::constants::*;
use dread_core::enums::{AgentArchetype, ClipRef};
use dread_core::error::{
    ensure_non_negative, ensure_positive, ensure_probability, ConfigError,
};

use crate::hazard::HazardSpec;
use crate::projectile::ProjectileSpec;

/// Speed and cooldown scaling applied as an agent escalates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationProfile {
    pub enraged_speed_multiplier: f32,
    /// Applied on top of the enraged multiplier.
    pub desperate_speed_multiplier: f32,
    /// Cooldown scale while enraged (lower acts faster).
    pub enraged_cooldown_multiplier: f32,
}

impl Default for EscalationProfile {
    fn default() -> Self {
        Self {
            enraged_speed_multiplier: 1.0,
            desperate_speed_multiplier: 1.0,
            enraged_cooldown_multiplier: 1.0,
        }
    }
}

/// Contact fighter: strike, back off, chase again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeleeProfile {
    pub speed: f32,
    pub retreat_speed: f32,
    pub retreat_distance: f32,
    /// Pause after a strike before backing off.
    pub attack_duration: f32,
    /// Fear applied on contact.
    pub contact_damage: f32,
    pub contact_cooldown: f32,
    /// Spawn a slash effect on the target when striking.
    pub slash_effect: bool,
}

/// Archer: holds a shooting band around the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangedProfile {
    pub chase_speed: f32,
    pub retreat_speed: f32,
    pub too_close: f32,
    pub shooting_range: f32,
    pub max_range: f32,
    pub shoot_interval: f32,
    pub arrow: Option<ProjectileSpec>,
}

/// Pumpkin: spits from range and detonates when badly hurt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomberProfile {
    pub speed: f32,
    pub keep_distance: f32,
    pub too_close: f32,
    pub spit_range: f32,
    pub spit_cooldown: f32,
    pub poison: Option<ProjectileSpec>,
    /// Absolute health at or below which the countdown starts.
    pub explosion_health_threshold: f32,
    pub explosion_radius: f32,
    pub explosion_damage: f32,
    pub countdown_secs: f32,
    pub auto_explode_on_start: bool,
    pub auto_explode_after_secs: Option<f32>,
    /// Countdown flash frequency (Hz).
    pub pulse_hz: f32,
    /// Positional shake while counting down (units per second).
    pub shake: f32,
}

/// Reaper: teleports, drops cursed ground, fights in melee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleporterProfile {
    pub speed: f32,
    pub attack_range: f32,
    pub melee_damage: f32,
    pub melee_cooldown: f32,
    pub attack_duration: f32,
    pub retreat_distance: f32,
    pub retreat_speed: f32,

    pub teleport_cooldown: f32,
    pub teleport_min_distance: f32,
    pub teleport_distance: f32,
    pub teleport_warning_secs: f32,
    pub teleport_settle_secs: f32,
    pub teleport_recovery_secs: f32,
    /// Chance per ready tick to teleport when enraged and close.
    pub enraged_teleport_chance: f32,
    pub desperate_teleport_chance: f32,

    pub cast_cooldown: f32,
    pub cast_windup_secs: f32,
    pub cast_recovery_secs: f32,
    /// Chance per ready tick to cast while calm.
    pub cast_chance_calm: f32,
    pub cast_chance_enraged: f32,
    pub hazard_cap: u32,
    pub hazard: Option<HazardSpec>,
    /// Wait between teleport arrival and cast in the desperate combo.
    pub combo_gap_secs: f32,

    /// Initial ability timers are drawn from this fraction range of each cooldown.
    pub initial_timer_fraction: (f32, f32),
    pub pulse_hz: f32,
    pub jitter: f32,
}

/// Sentinel: hovers in place and fires at a fixed interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretProfile {
    pub float_amplitude: f32,
    pub float_speed: f32,
    pub shoot_interval: f32,
    pub bolt: Option<ProjectileSpec>,
}

/// Archetype-specific part of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BehaviorProfile {
    MeleeKiter(MeleeProfile),
    RangedKiter(RangedProfile),
    Bomber(BomberProfile),
    Teleporter(TeleporterProfile),
    Turret(TurretProfile),
}

/// Complete tuning for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub max_health: f32,
    pub hitbox_radius: f32,
    /// Delay between death and removal when there is no death clip.
    pub death_linger_secs: f32,
    pub death_clip: Option<ClipRef>,
    pub path_update_interval: f32,
    #[serde(default)]
    pub escalation: EscalationProfile,
    pub behavior: BehaviorProfile,
}

fn melee(slash_effect: bool) -> MeleeProfile {
    MeleeProfile {
        speed: 3.5,
        retreat_speed: 5.0,
        retreat_distance: 2.0,
        attack_duration: 0.3,
        contact_damage: 20.0,
        contact_cooldown: 0.5,
        slash_effect,
    }
}

impl AgentProfile {
    /// Stock tuning for an archetype.
    pub fn preset(archetype: AgentArchetype) -> Self {
        match archetype {
            AgentArchetype::Brawler => AgentProfile {
                max_health: 10.0,
                hitbox_radius: 0.5,
                death_linger_secs: DEFAULT_DEATH_LINGER_SECS,
                death_clip: None,
                path_update_interval: PATH_UPDATE_INTERVAL,
                escalation: EscalationProfile::default(),
                behavior: BehaviorProfile::MeleeKiter(melee(false)),
            },
            AgentArchetype::Wrench => AgentProfile {
                max_health: 10.0,
                hitbox_radius: 0.5,
                death_linger_secs: DEFAULT_DEATH_LINGER_SECS,
                death_clip: Some(ClipRef::Death),
                path_update_interval: PATH_UPDATE_INTERVAL,
                escalation: EscalationProfile::default(),
                behavior: BehaviorProfile::MeleeKiter(melee(true)),
            },
            AgentArchetype::Archer => AgentProfile {
                max_health: 10.0,
                hitbox_radius: 0.5,
                death_linger_secs: DEFAULT_DEATH_LINGER_SECS,
                death_clip: None,
                path_update_interval: PATH_UPDATE_INTERVAL,
                escalation: EscalationProfile::default(),
                behavior: BehaviorProfile::RangedKiter(RangedProfile {
                    chase_speed: 3.0,
                    retreat_speed: 5.0,
                    too_close: 3.0,
                    shooting_range: 6.0,
                    max_range: 10.0,
                    shoot_interval: 1.5,
                    arrow: Some(ProjectileSpec::arrow()),
                }),
            },
            AgentArchetype::Pumpkin => AgentProfile {
                max_health: 50.0,
                hitbox_radius: 0.6,
                death_linger_secs: 0.0,
                death_clip: None,
                path_update_interval: PATH_UPDATE_INTERVAL,
                escalation: EscalationProfile::default(),
                behavior: BehaviorProfile::Bomber(BomberProfile {
                    speed: 2.0,
                    keep_distance: 4.0,
                    too_close: 2.0,
                    spit_range: 6.0,
                    spit_cooldown: 2.0,
                    poison: Some(ProjectileSpec::poison()),
                    explosion_health_threshold: 15.0,
                    explosion_radius: 3.0,
                    explosion_damage: 30.0,
                    countdown_secs: 5.0,
                    auto_explode_on_start: false,
                    auto_explode_after_secs: None,
                    pulse_hz: 15.0,
                    shake: 0.1,
                }),
            },
            AgentArchetype::Reaper => AgentProfile {
                max_health: 100.0,
                hitbox_radius: 0.6,
                death_linger_secs: DEFAULT_DEATH_LINGER_SECS,
                death_clip: Some(ClipRef::Death),
                path_update_interval: PATH_UPDATE_INTERVAL,
                escalation: EscalationProfile {
                    enraged_speed_multiplier: 5.0 / 3.5,
                    desperate_speed_multiplier: 1.2,
                    enraged_cooldown_multiplier: 0.7,
                },
                behavior: BehaviorProfile::Teleporter(TeleporterProfile {
                    speed: 3.5,
                    attack_range: 1.5,
                    melee_damage: 20.0,
                    melee_cooldown: 1.2,
                    attack_duration: 0.3,
                    retreat_distance: 2.0,
                    retreat_speed: 5.0,
                    teleport_cooldown: 4.0,
                    teleport_min_distance: 1.0,
                    teleport_distance: 2.5,
                    teleport_warning_secs: 0.7,
                    teleport_settle_secs: 0.3,
                    teleport_recovery_secs: 0.5,
                    enraged_teleport_chance: 0.4,
                    desperate_teleport_chance: 0.6,
                    cast_cooldown: 6.0,
                    cast_windup_secs: 0.5,
                    cast_recovery_secs: 0.5,
                    cast_chance_calm: 0.7,
                    cast_chance_enraged: 1.0,
                    hazard_cap: 3,
                    hazard: Some(HazardSpec::cursed_ground(15.0)),
                    combo_gap_secs: 0.3,
                    initial_timer_fraction: (0.3, 0.7),
                    pulse_hz: 20.0,
                    jitter: 0.05,
                }),
            },
            AgentArchetype::Sentinel => AgentProfile {
                max_health: 10.0,
                hitbox_radius: 0.8,
                death_linger_secs: DEFAULT_DEATH_LINGER_SECS,
                death_clip: None,
                path_update_interval: PATH_UPDATE_INTERVAL,
                escalation: EscalationProfile::default(),
                behavior: BehaviorProfile::Turret(TurretProfile {
                    float_amplitude: 0.5,
                    float_speed: 2.0,
                    shoot_interval: 1.0,
                    bolt: Some(ProjectileSpec::bolt()),
                }),
            },
        }
    }

    /// Effective movement speed multiplier for the given escalation flags.
    pub fn speed_multiplier(&self, enraged: bool, desperate: bool) -> f32 {
        let mut mult = 1.0;
        if enraged {
            mult *= self.escalation.enraged_speed_multiplier;
        }
        if desperate {
            mult *= self.escalation.desperate_speed_multiplier;
        }
        mult
    }

    pub fn cooldown_multiplier(&self, enraged: bool) -> f32 {
        if enraged {
            self.escalation.enraged_cooldown_multiplier
        } else {
            1.0
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("max_health", self.max_health)?;
        ensure_positive("hitbox_radius", self.hitbox_radius)?;
        ensure_non_negative("death_linger_secs", self.death_linger_secs)?;
        ensure_non_negative("path_update_interval", self.path_update_interval)?;
        ensure_positive(
            "escalation.enraged_speed_multiplier",
            self.escalation.enraged_speed_multiplier,
        )?;
        ensure_positive(
            "escalation.desperate_speed_multiplier",
            self.escalation.desperate_speed_multiplier,
        )?;
        ensure_positive(
            "escalation.enraged_cooldown_multiplier",
            self.escalation.enraged_cooldown_multiplier,
        )?;

        match &self.behavior {
            BehaviorProfile::MeleeKiter(p) => {
                ensure_positive("melee.speed", p.speed)?;
                ensure_positive("melee.retreat_speed", p.retreat_speed)?;
                ensure_positive("melee.retreat_distance", p.retreat_distance)?;
                ensure_non_negative("melee.attack_duration", p.attack_duration)?;
                ensure_non_negative("melee.contact_damage", p.contact_damage)?;
                ensure_non_negative("melee.contact_cooldown", p.contact_cooldown)?;
            }
            BehaviorProfile::RangedKiter(p) => {
                ensure_positive("ranged.chase_speed", p.chase_speed)?;
                ensure_positive("ranged.retreat_speed", p.retreat_speed)?;
                ensure_positive("ranged.shoot_interval", p.shoot_interval)?;
                ensure_non_negative("ranged.too_close", p.too_close)?;
                if !(p.too_close < p.shooting_range && p.shooting_range <= p.max_range) {
                    return Err(ConfigError::UnorderedBands {
                        too_close: p.too_close,
                        preferred: p.shooting_range,
                        max: p.max_range,
                    });
                }
                if let Some(arrow) = &p.arrow {
                    arrow.validate()?;
                }
            }
            BehaviorProfile::Bomber(p) => {
                ensure_positive("bomber.speed", p.speed)?;
                ensure_positive("bomber.keep_distance", p.keep_distance)?;
                ensure_positive("bomber.spit_cooldown", p.spit_cooldown)?;
                ensure_non_negative("bomber.explosion_health_threshold", p.explosion_health_threshold)?;
                ensure_positive("bomber.explosion_radius", p.explosion_radius)?;
                ensure_non_negative("bomber.explosion_damage", p.explosion_damage)?;
                ensure_positive("bomber.countdown_secs", p.countdown_secs)?;
                ensure_non_negative("bomber.shake", p.shake)?;
                ensure_positive("bomber.pulse_hz", p.pulse_hz)?;
                if let Some(after) = p.auto_explode_after_secs {
                    ensure_positive("bomber.auto_explode_after_secs", after)?;
                }
                if !(p.too_close < p.spit_range) {
                    return Err(ConfigError::UnorderedBands {
                        too_close: p.too_close,
                        preferred: p.spit_range,
                        max: p.spit_range,
                    });
                }
                if let Some(poison) = &p.poison {
                    poison.validate()?;
                }
            }
            BehaviorProfile::Teleporter(p) => {
                ensure_positive("teleporter.speed", p.speed)?;
                ensure_positive("teleporter.attack_range", p.attack_range)?;
                ensure_non_negative("teleporter.melee_damage", p.melee_damage)?;
                ensure_positive("teleporter.melee_cooldown", p.melee_cooldown)?;
                ensure_positive("teleporter.retreat_distance", p.retreat_distance)?;
                ensure_positive("teleporter.retreat_speed", p.retreat_speed)?;
                ensure_positive("teleporter.teleport_cooldown", p.teleport_cooldown)?;
                ensure_non_negative("teleporter.teleport_min_distance", p.teleport_min_distance)?;
                ensure_positive("teleporter.teleport_distance", p.teleport_distance)?;
                if p.teleport_min_distance > p.teleport_distance {
                    return Err(ConfigError::UnorderedBands {
                        too_close: p.teleport_min_distance,
                        preferred: p.teleport_distance,
                        max: p.teleport_distance,
                    });
                }
                ensure_non_negative("teleporter.teleport_warning_secs", p.teleport_warning_secs)?;
                ensure_non_negative("teleporter.teleport_settle_secs", p.teleport_settle_secs)?;
                ensure_non_negative("teleporter.teleport_recovery_secs", p.teleport_recovery_secs)?;
                ensure_positive("teleporter.cast_cooldown", p.cast_cooldown)?;
                ensure_non_negative("teleporter.cast_windup_secs", p.cast_windup_secs)?;
                ensure_non_negative("teleporter.cast_recovery_secs", p.cast_recovery_secs)?;
                ensure_non_negative("teleporter.combo_gap_secs", p.combo_gap_secs)?;
                ensure_probability("teleporter.cast_chance_calm", p.cast_chance_calm)?;
                ensure_probability("teleporter.cast_chance_enraged", p.cast_chance_enraged)?;
                ensure_probability("teleporter.enraged_teleport_chance", p.enraged_teleport_chance)?;
                ensure_probability(
                    "teleporter.desperate_teleport_chance",
                    p.desperate_teleport_chance,
                )?;
                ensure_probability("teleporter.initial_timer_fraction.0", p.initial_timer_fraction.0)?;
                ensure_probability("teleporter.initial_timer_fraction.1", p.initial_timer_fraction.1)?;
                ensure_positive("teleporter.pulse_hz", p.pulse_hz)?;
                ensure_non_negative("teleporter.jitter", p.jitter)?;
                if p.hazard_cap == 0 {
                    return Err(ConfigError::ZeroHazardCap);
                }
                if let Some(hazard) = &p.hazard {
                    hazard.validate()?;
                }
            }
            BehaviorProfile::Turret(p) => {
                ensure_non_negative("turret.float_amplitude", p.float_amplitude)?;
                ensure_non_negative("turret.float_speed", p.float_speed)?;
                ensure_positive("turret.shoot_interval", p.shoot_interval)?;
                if let Some(bolt) = &p.bolt {
                    bolt.validate()?;
                }
            }
        }
        Ok(())
    }
}
