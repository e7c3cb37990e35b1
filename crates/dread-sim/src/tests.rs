#[cfg(test)]
mod tests {
    use dread_agent_ai::profiles::{AgentProfile, BehaviorProfile};
    use dread_core::collaborators::Pathfinder;
    use dread_core::commands::EncounterCommand;
    use dread_core::director::DirectorProfile;
    use dread_core::enums::*;
    use dread_core::error::ConfigError;
    use dread_core::events::{EntityRef, PresentationIntent};
    use dread_core::state::EncounterSnapshot;
    use dread_core::types::{AgentId, DirectorId, Rect, Vec2};

    use crate::config::{EncounterConfig, OverflowPolicy};
    use crate::engine::EncounterEngine;
    use crate::layouts::build_layout;
    use crate::nav::ArenaNav;

    fn engine(config: EncounterConfig) -> EncounterEngine {
        EncounterEngine::new(config).unwrap()
    }

    fn run(engine: &mut EncounterEngine, ticks: usize) -> EncounterSnapshot {
        let mut snapshot = engine.tick();
        for _ in 1..ticks {
            snapshot = engine.tick();
        }
        snapshot
    }

    fn place(archetype: AgentArchetype, position: Vec2, persistence_id: Option<&str>) -> EncounterCommand {
        EncounterCommand::PlaceAgent {
            archetype,
            position,
            persistence_id: persistence_id.map(str::to_string),
        }
    }

    /// Sentinel whose bolts deal `damage` fear.
    fn sentinel_config(damage: f32, policy: OverflowPolicy) -> EncounterConfig {
        let mut profile = AgentProfile::preset(AgentArchetype::Sentinel);
        if let BehaviorProfile::Turret(turret) = &mut profile.behavior {
            if let Some(bolt) = turret.bolt.as_mut() {
                bolt.damage = damage;
            }
        }
        let mut config = EncounterConfig {
            overflow_policy: policy,
            ..Default::default()
        };
        config.profiles.insert(AgentArchetype::Sentinel, profile);
        config
    }

    // ---- Determinism ----

    #[test]
    fn test_determinism_same_seed() {
        let mut engine_a = engine(EncounterConfig {
            seed: 12345,
            ..Default::default()
        });
        let mut engine_b = engine(EncounterConfig {
            seed: 12345,
            ..Default::default()
        });

        let load = EncounterCommand::LoadLayout {
            layout: EncounterLayout::Graveyard,
        };
        engine_a.queue_command(load.clone());
        engine_b.queue_command(load);

        for tick in 0..300 {
            let step = EncounterCommand::MoveTarget {
                position: Vec2::new(-15.0 + tick as f32 * 0.05, (tick as f32 * 0.1).sin() * 3.0),
            };
            engine_a.queue_command(step.clone());
            engine_b.queue_command(step);

            let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
            let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
            assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
        }
    }

    // ---- Commands and lifecycle ----

    #[test]
    fn test_pause_freezes_time_but_applies_commands() {
        let mut engine = engine(EncounterConfig::default());
        run(&mut engine, 3);
        let before = engine.time();

        engine.queue_command(EncounterCommand::Pause);
        engine.queue_command(EncounterCommand::MoveTarget {
            position: Vec2::new(2.0, 1.0),
        });
        let snapshot = run(&mut engine, 5);
        assert!(engine.is_paused());
        assert_eq!(snapshot.time, before);
        assert_eq!(snapshot.target.position, Vec2::new(2.0, 1.0));

        engine.queue_command(EncounterCommand::Resume);
        let snapshot = engine.tick();
        assert_eq!(snapshot.time.tick, before.tick + 1);
    }

    #[test]
    fn test_move_target_clamped_to_arena() {
        let mut engine = engine(EncounterConfig::default());
        engine.queue_command(EncounterCommand::MoveTarget {
            position: Vec2::new(100.0, -100.0),
        });
        let snapshot = engine.tick();
        assert_eq!(snapshot.target.position, Vec2::new(20.0, -12.0));
    }

    #[test]
    fn test_layout_places_agents_and_target() {
        let mut engine = engine(EncounterConfig::default());
        engine.queue_command(EncounterCommand::LoadLayout {
            layout: EncounterLayout::ReaperLair,
        });
        let snapshot = engine.tick();
        assert_eq!(snapshot.layout, Some(EncounterLayout::ReaperLair));
        assert_eq!(snapshot.target.position, Vec2::new(-12.0, 0.0));
        assert_eq!(snapshot.agents.len(), 1);
        assert_eq!(snapshot.agents[0].archetype, AgentArchetype::Reaper);
    }

    #[test]
    fn test_layouts_are_valid() {
        let arena = EncounterConfig::default().arena;
        for layout in [
            EncounterLayout::Graveyard,
            EncounterLayout::PumpkinPatch,
            EncounterLayout::ReaperLair,
        ] {
            let plan = build_layout(layout);
            assert!(arena.contains(plan.target_start));
            for command in &plan.placements {
                match command {
                    EncounterCommand::PlaceAgent { position, .. } => {
                        assert!(arena.contains(*position), "{layout:?} agent outside arena")
                    }
                    EncounterCommand::PlaceDirector { position, profile } => {
                        assert!(arena.contains(*position));
                        assert!(profile.validate().is_ok());
                    }
                    other => panic!("unexpected placement {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_damage_unknown_agent_is_ignored() {
        let mut engine = engine(EncounterConfig::default());
        engine.queue_command(EncounterCommand::DamageAgent {
            agent: AgentId(99),
            amount: 10.0,
        });
        let snapshot = engine.tick();
        assert!(snapshot.agents.is_empty());
        assert_eq!(snapshot.fear.value, 0.0);
    }

    #[test]
    fn test_resolved_agent_is_not_placed_again() {
        let mut engine = engine(EncounterConfig::default());
        engine.queue_command(place(AgentArchetype::Wrench, Vec2::new(10.0, 0.0), Some("yard/wrench")));
        engine.queue_command(EncounterCommand::DamageAgent {
            agent: AgentId(1),
            amount: 100.0,
        });
        let snapshot = engine.tick();
        assert!(engine.session().is_resolved("yard/wrench"));
        assert_eq!(snapshot.agents[0].mode, AgentMode::Dying);

        engine.queue_command(place(AgentArchetype::Wrench, Vec2::new(10.0, 0.0), Some("yard/wrench")));
        let snapshot = engine.tick();
        assert!(snapshot.agents.iter().all(|agent| agent.id == AgentId(1)));

        // The dead wrench is removed once its death clip has played.
        let snapshot = run(&mut engine, 120);
        assert!(snapshot.agents.is_empty());
    }

    #[test]
    fn test_invalid_director_placement_is_rejected() {
        let mut engine = engine(EncounterConfig::default());
        engine.queue_command(EncounterCommand::PlaceDirector {
            position: Vec2::ZERO,
            profile: DirectorProfile {
                population_cap: 0,
                ..Default::default()
            },
        });
        let snapshot = engine.tick();
        assert!(snapshot.directors.is_empty());
    }

    // ---- Contacts and fear ----

    #[test]
    fn test_melee_contact_frightens_target_once() {
        let mut engine = engine(EncounterConfig::default());
        engine.queue_command(place(AgentArchetype::Brawler, Vec2::new(0.5, 0.0), None));
        let snapshot = engine.tick();

        assert_eq!(snapshot.fear.value, 20.0);
        assert!(snapshot.presentation.iter().any(|event| {
            event.source == EntityRef::Target
                && matches!(event.intent, PresentationIntent::TargetDamaged { amount } if amount == 20.0)
        }));

        // Standing in contact does not strike again.
        engine.tick();
        assert_eq!(engine.session().fear.value(), 20.0);
    }

    #[test]
    fn test_reported_contact_when_detection_is_off() {
        let mut engine = engine(EncounterConfig {
            detect_contacts: false,
            ..Default::default()
        });
        engine.queue_command(place(AgentArchetype::Brawler, Vec2::new(0.5, 0.0), None));
        let snapshot = engine.tick();
        assert_eq!(snapshot.fear.value, 0.0);

        engine.queue_command(EncounterCommand::ReportContact {
            subject: EntityRef::Agent(AgentId(1)),
            category: ContactCategory::Target,
            phase: ContactPhase::Begin,
        });
        let snapshot = engine.tick();
        assert_eq!(snapshot.fear.value, 20.0);
    }

    #[test]
    fn test_sentinel_bolts_hit_target() {
        let mut engine = engine(EncounterConfig::default());
        engine.queue_command(place(AgentArchetype::Sentinel, Vec2::new(4.0, 0.0), None));

        let mut saw_projectile = false;
        for _ in 0..90 {
            let snapshot = engine.tick();
            saw_projectile |= !snapshot.projectiles.is_empty();
        }
        assert!(saw_projectile);
        assert!(engine.session().fear.value() >= 10.0);
    }

    #[test]
    fn test_fear_overflow_reloads_encounter() {
        let mut engine = engine(sentinel_config(60.0, OverflowPolicy::ReloadEncounter));
        engine.queue_command(place(AgentArchetype::Sentinel, Vec2::new(4.0, 0.0), None));
        engine.queue_command(EncounterCommand::MoveTarget {
            position: Vec2::new(-1.0, 0.0),
        });

        let mut reset = None;
        for _ in 0..200 {
            let snapshot = engine.tick();
            if snapshot.session_resets > 0 {
                reset = Some(snapshot);
                break;
            }
        }
        let snapshot = reset.expect("fear should overflow");

        assert_eq!(snapshot.session_resets, 1);
        assert_eq!(snapshot.fear.value, 0.0);
        assert_eq!(snapshot.target.position, Vec2::ZERO);
        assert!(snapshot.projectiles.is_empty());
        assert_eq!(snapshot.agents.len(), 1);
        assert_eq!(snapshot.agents[0].id, AgentId(2));
        assert!(snapshot.presentation.iter().any(|event| matches!(
            event.intent,
            PresentationIntent::PlayOneShot {
                clip: ClipRef::FearFilled
            }
        )));
    }

    #[test]
    fn test_fear_after_overflow_does_not_carry_into_reload() {
        let mut config = EncounterConfig::default();
        config.fear.max = 30.0;
        let mut engine = engine(config);
        // Four strikes of 20 in one tick: the second overflows, the rest arrive after.
        for position in [
            Vec2::new(0.5, 0.0),
            Vec2::new(-0.5, 0.0),
            Vec2::new(0.0, 0.5),
            Vec2::new(0.0, -0.5),
        ] {
            engine.queue_command(place(AgentArchetype::Brawler, position, None));
        }

        let snapshot = engine.tick();
        assert_eq!(snapshot.session_resets, 1);
        assert_eq!(snapshot.fear.value, 0.0);
        assert_eq!(snapshot.fear.visual, 0.0);
        assert_eq!(snapshot.agents.len(), 4);
        assert!(snapshot.agents.iter().all(|agent| agent.id.0 > 4));
        let hits = snapshot
            .presentation
            .iter()
            .filter(|event| matches!(event.intent, PresentationIntent::TargetDamaged { .. }))
            .count();
        assert_eq!(hits, 2);
    }

    #[test]
    fn test_fear_overflow_reset_meter_keeps_agents() {
        let mut engine = engine(sentinel_config(60.0, OverflowPolicy::ResetMeter));
        engine.queue_command(place(AgentArchetype::Sentinel, Vec2::new(4.0, 0.0), None));

        let mut reset = None;
        for _ in 0..200 {
            let snapshot = engine.tick();
            if snapshot.session_resets > 0 {
                reset = Some(snapshot);
                break;
            }
        }
        let snapshot = reset.expect("fear should overflow");
        assert_eq!(snapshot.fear.value, 0.0);
        assert_eq!(snapshot.agents[0].id, AgentId(1));
    }

    #[test]
    fn test_fear_overflow_hold_keeps_meter_full() {
        let mut engine = engine(sentinel_config(60.0, OverflowPolicy::Hold));
        engine.queue_command(place(AgentArchetype::Sentinel, Vec2::new(4.0, 0.0), None));

        let snapshot = run(&mut engine, 200);
        assert_eq!(snapshot.session_resets, 1);
        assert_eq!(snapshot.fear.value, snapshot.fear.max);
        assert_eq!(snapshot.fear.band, FearBand::Panic);
    }

    #[test]
    fn test_inactive_target_is_not_attacked() {
        let mut engine = engine(EncounterConfig::default());
        engine.queue_command(EncounterCommand::SetTargetActive { active: false });
        engine.queue_command(place(AgentArchetype::Sentinel, Vec2::new(4.0, 0.0), None));
        engine.queue_command(place(AgentArchetype::Brawler, Vec2::new(0.5, 0.0), None));

        let snapshot = run(&mut engine, 120);
        assert!(!snapshot.target.active);
        assert_eq!(snapshot.fear.value, 0.0);
    }

    // ---- Same-tick ordering ----

    /// Tick until the first agent leaves `state`. Returns that tick's number.
    fn ticks_until_state_ends(engine: &mut EncounterEngine, state: &str, limit: usize) -> usize {
        let mut entered = false;
        for tick in 1..=limit {
            let snapshot = engine.tick();
            let current = snapshot.agents.first().map(|agent| agent.state.as_str());
            if current == Some(state) {
                entered = true;
            } else if entered {
                return tick;
            }
        }
        panic!("agent never left {state} within {limit} ticks");
    }

    /// Reaper that teleports soon and never casts.
    fn teleport_only_config() -> EncounterConfig {
        let mut profile = AgentProfile::preset(AgentArchetype::Reaper);
        if let BehaviorProfile::Teleporter(p) = &mut profile.behavior {
            p.initial_timer_fraction = (1.0, 1.0);
            p.teleport_cooldown = 0.5;
            p.cast_cooldown = 1000.0;
        }
        let mut config = EncounterConfig::default();
        config.profiles.insert(AgentArchetype::Reaper, profile);
        config
    }

    #[test]
    fn test_damage_lands_before_teleport_settles() {
        let reaper = || place(AgentArchetype::Reaper, Vec2::new(10.0, 0.0), None);

        let mut first_run = engine(teleport_only_config());
        first_run.queue_command(reaper());
        let settle_ends = ticks_until_state_ends(&mut first_run, "teleport_settle", 300);

        let mut engine = engine(teleport_only_config());
        engine.queue_command(reaper());
        let before = run(&mut engine, settle_ends - 1);
        assert_eq!(before.agents[0].state, "teleport_settle");
        assert!(before.agents[0].invulnerable);

        // Commands run first, so the hit meets the still-invulnerable reaper.
        engine.queue_command(EncounterCommand::DamageAgent {
            agent: AgentId(1),
            amount: 500.0,
        });
        let snapshot = engine.tick();
        let agent = &snapshot.agents[0];
        assert_eq!(agent.health, 100.0);
        assert_eq!(agent.state, "teleport_recover");
        assert_eq!(agent.mode, AgentMode::ExecutingAbility);
        assert!(!agent.invulnerable);

        engine.queue_command(EncounterCommand::DamageAgent {
            agent: AgentId(1),
            amount: 30.0,
        });
        let snapshot = engine.tick();
        assert_eq!(snapshot.agents[0].health, 70.0);
    }

    /// Pumpkin with a short fuse that lingers after detonating.
    fn short_fuse_config() -> EncounterConfig {
        let mut profile = AgentProfile::preset(AgentArchetype::Pumpkin);
        profile.death_linger_secs = 1.0;
        if let BehaviorProfile::Bomber(p) = &mut profile.behavior {
            p.countdown_secs = 0.5;
        }
        let mut config = EncounterConfig::default();
        config.profiles.insert(AgentArchetype::Pumpkin, profile);
        config
    }

    #[test]
    fn test_damage_lands_before_countdown_completes() {
        let setup = |engine: &mut EncounterEngine| {
            engine.queue_command(place(AgentArchetype::Pumpkin, Vec2::new(10.0, 0.0), None));
            engine.queue_command(EncounterCommand::DamageAgent {
                agent: AgentId(1),
                amount: 40.0,
            });
        };

        let mut first_run = engine(short_fuse_config());
        setup(&mut first_run);
        let countdown_ends = ticks_until_state_ends(&mut first_run, "exploding", 300);

        let mut engine = engine(short_fuse_config());
        setup(&mut engine);
        let before = run(&mut engine, countdown_ends - 1);
        assert_eq!(before.agents[0].state, "exploding");
        assert_eq!(before.agents[0].health, 10.0);

        engine.queue_command(EncounterCommand::DamageAgent {
            agent: AgentId(1),
            amount: 5.0,
        });
        let snapshot = engine.tick();
        let agent = &snapshot.agents[0];
        assert_eq!(agent.health, 5.0);
        assert_eq!(agent.state, "detonated");
        assert_eq!(agent.mode, AgentMode::Dying);
        assert!(!agent.invulnerable);
    }

    // ---- Directors ----

    fn quick_director() -> EncounterCommand {
        EncounterCommand::PlaceDirector {
            position: Vec2::new(15.0, 0.0),
            profile: DirectorProfile {
                spawn_archetype: AgentArchetype::Brawler,
                spawn_interval_secs: 0.5,
                population_cap: 2,
                telegraph_secs: 0.2,
                spawn_area: None,
                flee: None,
            },
        }
    }

    #[test]
    fn test_director_spawns_up_to_cap() {
        let mut engine = engine(EncounterConfig {
            target_start: Vec2::new(-15.0, 0.0),
            ..Default::default()
        });
        engine.queue_command(quick_director());

        let snapshot = run(&mut engine, 300);
        assert_eq!(snapshot.agents.len(), 2);
        assert!(snapshot
            .agents
            .iter()
            .all(|agent| agent.archetype == AgentArchetype::Brawler));
        assert_eq!(snapshot.directors.len(), 1);
        assert_eq!(snapshot.directors[0].live_agents, 2);
    }

    #[test]
    fn test_destroyed_director_stops_spawning() {
        let mut engine = engine(EncounterConfig {
            target_start: Vec2::new(-15.0, 0.0),
            ..Default::default()
        });
        engine.queue_command(quick_director());
        engine.queue_command(EncounterCommand::DestroyDirector {
            director: DirectorId(1),
        });

        let snapshot = run(&mut engine, 120);
        assert!(snapshot.directors.is_empty());
        assert!(snapshot.agents.is_empty());
    }

    // ---- Config ----

    #[test]
    fn test_config_from_json_keeps_defaults() {
        let config = EncounterConfig::from_json_str(r#"{"seed": 7, "overflow_policy": "Hold"}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.overflow_policy, OverflowPolicy::Hold);
        assert!(config.detect_contacts);
        assert_eq!(config.arena, EncounterConfig::default().arena);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(matches!(
            EncounterConfig::from_json_str(r#"{"target_radius": 0.0}"#),
            Err(ConfigError::NonPositive { .. })
        ));
        assert!(matches!(
            EncounterConfig::from_json_str("not json"),
            Err(ConfigError::Json(_))
        ));

        let empty = EncounterConfig {
            arena: Rect::new(Vec2::ZERO, Vec2::ZERO),
            ..Default::default()
        };
        assert!(matches!(EncounterEngine::new(empty), Err(ConfigError::EmptyArena)));
    }

    #[test]
    fn test_profile_override_replaces_preset() {
        let mut config = EncounterConfig::default();
        let mut profile = AgentProfile::preset(AgentArchetype::Brawler);
        profile.max_health = 42.0;
        config.profiles.insert(AgentArchetype::Brawler, profile);

        assert_eq!(config.profile(AgentArchetype::Brawler).max_health, 42.0);
        assert_eq!(
            config.profile(AgentArchetype::Archer),
            AgentProfile::preset(AgentArchetype::Archer)
        );
    }

    // ---- Navigation ----

    #[test]
    fn test_arena_nav_moves_and_arrives() {
        let bounds = Rect::from_center(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let mut nav = ArenaNav::new(bounds, Vec2::ZERO);
        nav.set_speed(2.0);
        nav.set_destination(Vec2::new(1.0, 0.0));

        nav.advance(0.25);
        assert!((nav.position().x - 0.5).abs() < 1e-5);
        assert!((nav.current_velocity().x - 2.0).abs() < 1e-5);

        nav.advance(0.5);
        assert_eq!(nav.position(), Vec2::new(1.0, 0.0));
        assert_eq!(nav.remaining_distance(), 0.0);
    }

    #[test]
    fn test_arena_nav_stays_inside_bounds() {
        let bounds = Rect::from_center(Vec2::ZERO, Vec2::new(5.0, 5.0));
        let mut nav = ArenaNav::new(bounds, Vec2::new(50.0, 0.0));
        assert_eq!(nav.position(), Vec2::new(5.0, 0.0));

        nav.warp(Vec2::new(0.0, -9.0));
        assert_eq!(nav.position(), Vec2::new(0.0, -5.0));

        assert_eq!(
            nav.sample_point_on_surface(Vec2::new(6.0, 0.0), 2.0),
            Some(Vec2::new(5.0, 0.0))
        );
        assert_eq!(nav.sample_point_on_surface(Vec2::new(9.0, 0.0), 2.0), None);

        nav.set_speed(3.0);
        nav.set_destination(Vec2::new(0.0, 3.0));
        nav.stop();
        nav.advance(0.5);
        assert_eq!(nav.position(), Vec2::new(0.0, -5.0));
        nav.resume();
        nav.advance(0.5);
        assert!(nav.position().y > -5.0);
    }
}
