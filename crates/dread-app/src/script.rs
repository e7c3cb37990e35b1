//! Scripted target for headless runs.
//!
//! Walks the target along an orbit and swings at the nearest agent in reach,
//! so an encounter plays out without a human driving it.

use dread_core::commands::EncounterCommand;
use dread_core::constants::DT;
use dread_core::enums::AgentMode;
use dread_core::state::EncounterSnapshot;
use dread_core::types::{unit_at, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct TargetScript {
    pub center: Vec2,
    pub radius: f32,
    /// Radians per second.
    pub angular_speed: f32,
    /// Weapon reach, measured center to center.
    pub reach: f32,
    pub swing_damage: f32,
    pub swing_every_ticks: u64,
}

impl Default for TargetScript {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            radius: 8.0,
            angular_speed: 0.4,
            reach: 2.0,
            swing_damage: 5.0,
            swing_every_ticks: 15,
        }
    }
}

impl TargetScript {
    /// Orbit around `center`.
    pub fn orbit(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            ..Self::default()
        }
    }

    /// Target position at a tick.
    pub fn position_at(&self, tick: u64) -> Vec2 {
        let angle = tick as f32 * DT * self.angular_speed;
        self.center + unit_at(angle) * self.radius
    }

    /// Commands for the coming tick, given the last snapshot.
    pub fn step(&self, tick: u64, last: Option<&EncounterSnapshot>) -> Vec<EncounterCommand> {
        let position = self.position_at(tick);
        let mut commands = vec![EncounterCommand::MoveTarget { position }];

        if self.swing_every_ticks == 0 || tick % self.swing_every_ticks != 0 {
            return commands;
        }
        let nearest = last.and_then(|snapshot| {
            snapshot
                .agents
                .iter()
                .filter(|agent| agent.mode != AgentMode::Dying && !agent.invulnerable)
                .map(|agent| (agent.id, agent.position.distance(position)))
                .filter(|(_, distance)| *distance <= self.reach)
                .min_by(|a, b| a.1.total_cmp(&b.1))
        });
        if let Some((agent, _)) = nearest {
            commands.push(EncounterCommand::DamageAgent {
                agent,
                amount: self.swing_damage,
            });
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dread_core::enums::{AgentArchetype, HealthBand};
    use dread_core::state::AgentView;
    use dread_core::types::AgentId;

    fn view(id: u32, position: Vec2) -> AgentView {
        AgentView {
            id: AgentId(id),
            archetype: AgentArchetype::Brawler,
            position,
            health: 10.0,
            max_health: 10.0,
            health_band: HealthBand::Full,
            mode: AgentMode::Chasing,
            state: "chasing".into(),
            enraged: false,
            desperate: false,
            invulnerable: false,
            facing: None,
        }
    }

    #[test]
    fn test_orbit_starts_on_positive_x() {
        let script = TargetScript::orbit(Vec2::new(1.0, 1.0), 4.0);
        let start = script.position_at(0);
        assert!((start - Vec2::new(5.0, 1.0)).length() < 1e-5);
        assert!((script.position_at(1000).distance(script.center) - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_swings_at_nearest_agent_in_reach() {
        let script = TargetScript::orbit(Vec2::ZERO, 4.0);
        let at = script.position_at(0);
        let snapshot = EncounterSnapshot {
            agents: vec![
                view(1, at + Vec2::new(1.5, 0.0)),
                view(2, at + Vec2::new(0.5, 0.0)),
                view(3, at + Vec2::new(10.0, 0.0)),
            ],
            ..Default::default()
        };

        let commands = script.step(0, Some(&snapshot));
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            commands[1],
            EncounterCommand::DamageAgent { agent: AgentId(2), .. }
        ));

        // Off-beat ticks only move.
        assert_eq!(script.step(1, Some(&snapshot)).len(), 1);
    }
}
