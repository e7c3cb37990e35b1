//! Projectile logic: flight, single-hit consumption and lifetime.

use serde::{Deserialize, Serialize};

use dread_core::enums::{ContactCategory, EffectKind, ObstacleResponse, ProjectileState};
use dread_core::error::{ensure_non_negative, ensure_positive, ConfigError};
use dread_core::types::{AgentId, Vec2};

/// Tuning for one projectile kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub speed: f32,
    /// Fear applied to the target on hit.
    pub damage: f32,
    pub lifetime_secs: f32,
    pub radius: f32,
    pub on_obstacle: ObstacleResponse,
    /// Categories passed through without effect.
    pub ignores: Vec<ContactCategory>,
    pub hit_effect: Option<EffectKind>,
}

impl ProjectileSpec {
    /// Arrow: embeds in obstacles and stays until its lifetime runs out.
    pub fn arrow() -> Self {
        Self {
            speed: 8.0,
            damage: 15.0,
            lifetime_secs: 5.0,
            radius: 0.15,
            on_obstacle: ObstacleResponse::Embed,
            ignores: vec![ContactCategory::Agent, ContactCategory::HostileProjectile],
            hit_effect: None,
        }
    }

    /// Poison glob: splashes on anything that is not an agent.
    pub fn poison() -> Self {
        Self {
            speed: 12.0,
            damage: 15.0,
            lifetime_secs: 5.0,
            radius: 0.2,
            on_obstacle: ObstacleResponse::Shatter,
            ignores: vec![ContactCategory::Agent],
            hit_effect: Some(EffectKind::PoisonSplash),
        }
    }

    /// Turret bolt.
    pub fn bolt() -> Self {
        Self {
            speed: 5.0,
            damage: 10.0,
            lifetime_secs: 5.0,
            radius: 0.2,
            on_obstacle: ObstacleResponse::Shatter,
            ignores: vec![ContactCategory::Agent],
            hit_effect: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("projectile.speed", self.speed)?;
        ensure_non_negative("projectile.damage", self.damage)?;
        ensure_positive("projectile.lifetime_secs", self.lifetime_secs)?;
        ensure_positive("projectile.radius", self.radius)
    }
}

/// Result of reporting a contact to a projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactOutcome {
    /// Excluded category, or the projectile was already consumed.
    Ignored,
    /// Hit the target. Apply `damage` as fear; the projectile is spent.
    HitTarget { damage: f32 },
    /// Stuck in an obstacle. Inert until lifetime expiry.
    Embedded,
    /// Destroyed on an obstacle.
    Shattered,
}

/// A flying damage carrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    spec: ProjectileSpec,
    owner: Option<AgentId>,
    direction: Vec2,
    velocity: Vec2,
    age: f32,
    state: ProjectileState,
}

impl Projectile {
    /// Launch along `direction`. A zero direction launches along +x.
    pub fn new(spec: ProjectileSpec, owner: Option<AgentId>, direction: Vec2) -> Self {
        let direction = direction.try_normalize().unwrap_or(Vec2::X);
        Self {
            velocity: direction * spec.speed,
            spec,
            owner,
            direction,
            age: 0.0,
            state: ProjectileState::Flying,
        }
    }

    /// Age the projectile. Returns the displacement for this tick.
    pub fn tick(&mut self, dt: f32) -> Vec2 {
        self.age += dt;
        if self.state == ProjectileState::Flying {
            self.velocity * dt
        } else {
            Vec2::ZERO
        }
    }

    /// Handle a contact. Only the first qualifying contact has an effect.
    pub fn on_contact(&mut self, category: ContactCategory) -> ContactOutcome {
        if self.state != ProjectileState::Flying || self.spec.ignores.contains(&category) {
            return ContactOutcome::Ignored;
        }
        match category {
            ContactCategory::Target => {
                self.state = ProjectileState::Spent;
                ContactOutcome::HitTarget {
                    damage: self.spec.damage,
                }
            }
            _ => match self.spec.on_obstacle {
                ObstacleResponse::Embed => {
                    self.state = ProjectileState::Embedded;
                    self.velocity = Vec2::ZERO;
                    ContactOutcome::Embedded
                }
                ObstacleResponse::Shatter => {
                    self.state = ProjectileState::Spent;
                    ContactOutcome::Shattered
                }
            },
        }
    }

    /// Presentation rotation from the launch direction (degrees, 0 = +x, counter-clockwise).
    pub fn rotation_degrees(&self) -> f32 {
        self.direction.y.atan2(self.direction.x).to_degrees()
    }

    /// True once spent or past its lifetime.
    pub fn is_finished(&self) -> bool {
        self.state == ProjectileState::Spent || self.age >= self.spec.lifetime_secs
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    pub fn owner(&self) -> Option<AgentId> {
        self.owner
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn spec(&self) -> &ProjectileSpec {
        &self.spec
    }
}
