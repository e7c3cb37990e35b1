#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use dread_core::collaborators::Pathfinder;
    use dread_core::director::DirectorProfile;
    use dread_core::enums::*;
    use dread_core::error::ConfigError;
    use dread_core::events::PresentationIntent;
    use dread_core::health::HasHealth;
    use dread_core::types::{AgentId, DirectorId, Vec2};

    use crate::controller::{AgentController, AgentEnv, Target};
    use crate::director::{DirectorEnv, DirectorEvent, EncounterDirector};
    use crate::hazard::{HazardArea, HazardSpec};
    use crate::output::{AgentEffect, AgentOutput};
    use crate::phase::{EscalationPhase, PhaseTracker};
    use crate::profiles::{AgentProfile, BehaviorProfile, TeleporterProfile};
    use crate::projectile::{ContactOutcome, Projectile, ProjectileSpec};
    use crate::scheduler::{Ability, AbilityScheduler};

    const DT: f32 = 0.05;

    /// Pathfinder double: moves only when told to, records the last destination.
    struct ScriptedNav {
        position: Vec2,
        destination: Option<Vec2>,
        velocity: Vec2,
        stopped: bool,
        surface_ok: bool,
    }

    impl ScriptedNav {
        fn at(x: f32, y: f32) -> Self {
            Self {
                position: Vec2::new(x, y),
                destination: None,
                velocity: Vec2::ZERO,
                stopped: false,
                surface_ok: true,
            }
        }
    }

    impl Pathfinder for ScriptedNav {
        fn position(&self) -> Vec2 {
            self.position
        }
        fn set_destination(&mut self, point: Vec2) {
            self.destination = Some(point);
        }
        fn set_speed(&mut self, _speed: f32) {}
        fn current_velocity(&self) -> Vec2 {
            self.velocity
        }
        fn remaining_distance(&self) -> f32 {
            self.destination
                .map_or(0.0, |d| self.position.distance(d))
        }
        fn is_path_pending(&self) -> bool {
            false
        }
        fn is_on_navigable_surface(&self) -> bool {
            self.surface_ok
        }
        fn sample_point_on_surface(&self, point: Vec2, _max_radius: f32) -> Option<Vec2> {
            self.surface_ok.then_some(point)
        }
        fn warp(&mut self, point: Vec2) {
            self.position = point;
        }
        fn stop(&mut self) {
            self.stopped = true;
        }
        fn resume(&mut self) {
            self.stopped = false;
        }
    }

    /// Everything an agent needs for a test run.
    struct Rig {
        agent: AgentController,
        nav: ScriptedNav,
        rng: ChaCha8Rng,
        out: AgentOutput,
        target: Target,
    }

    impl Rig {
        fn new(archetype: AgentArchetype, profile: AgentProfile, at: Vec2) -> Self {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            let agent = AgentController::new(
                AgentId(1),
                archetype,
                profile,
                Some(format!("{archetype:?}-1")),
                &mut rng,
            );
            Self {
                agent,
                nav: ScriptedNav::at(at.x, at.y),
                rng,
                out: AgentOutput::new(),
                target: Target {
                    position: Vec2::ZERO,
                    alive: true,
                },
            }
        }

        fn preset(archetype: AgentArchetype, at: Vec2) -> Self {
            Self::new(archetype, AgentProfile::preset(archetype), at)
        }

        fn with_env(&mut self, f: impl FnOnce(&mut AgentController, &mut AgentEnv<'_>)) {
            let mut env = AgentEnv {
                target: self.target,
                nav: &mut self.nav,
                rng: &mut self.rng,
                out: &mut self.out,
            };
            f(&mut self.agent, &mut env);
        }

        fn tick(&mut self) {
            self.with_env(|agent, env| agent.tick(DT, env));
        }

        fn tick_until(&mut self, state: &str, max_ticks: usize) -> bool {
            for _ in 0..max_ticks {
                if self.agent.state_name() == state {
                    return true;
                }
                self.tick();
            }
            self.agent.state_name() == state
        }

        fn damage(&mut self, amount: f32) {
            self.with_env(|agent, env| agent.take_damage(amount, env));
        }

        fn contact(&mut self) {
            self.with_env(|agent, env| agent.on_target_contact(env));
        }

        fn die(&mut self) {
            self.with_env(|agent, env| agent.die(env));
        }

        fn count(&self, pred: impl Fn(&AgentEffect) -> bool) -> usize {
            self.out.effects().iter().filter(|e| pred(e)).count()
        }
    }

    fn teleporter(profile: &mut AgentProfile) -> &mut TeleporterProfile {
        match &mut profile.behavior {
            BehaviorProfile::Teleporter(p) => p,
            _ => panic!("not a teleporter profile"),
        }
    }

    /// Reaper whose timers start at zero, with the given cooldowns.
    fn reaper_profile(teleport_cooldown: f32, cast_cooldown: f32) -> AgentProfile {
        let mut profile = AgentProfile::preset(AgentArchetype::Reaper);
        let p = teleporter(&mut profile);
        p.initial_timer_fraction = (1.0, 1.0);
        p.teleport_cooldown = teleport_cooldown;
        p.cast_cooldown = cast_cooldown;
        p.cast_chance_calm = 1.0;
        profile
    }

    // --- Scheduler and phases ---

    #[test]
    fn test_scheduler_ready_reset_prime() {
        let mut scheduler = AbilityScheduler::new();
        scheduler.register(
            Ability::instant(AbilityId::Shoot, 1.0, AbilityEffect::SpawnProjectile),
            0.0,
        );
        assert!(!scheduler.ready(AbilityId::Shoot, 1.0));
        scheduler.tick(0.75);
        assert!(!scheduler.ready(AbilityId::Shoot, 1.0));
        assert!(scheduler.ready(AbilityId::Shoot, 0.7), "scaled cooldown is shorter");
        // Readiness is a pure query.
        assert!(scheduler.ready(AbilityId::Shoot, 0.7));

        scheduler.reset(AbilityId::Shoot);
        assert_eq!(scheduler.elapsed(AbilityId::Shoot), Some(0.0));
        scheduler.prime(AbilityId::Shoot);
        assert!(scheduler.ready(AbilityId::Shoot, 1.0));

        assert!(!scheduler.ready(AbilityId::Teleport, 1.0));
        assert_eq!(scheduler.elapsed(AbilityId::Teleport), None);
    }

    #[test]
    fn test_phase_flags_are_monotonic() {
        let mut tracker = PhaseTracker::default();
        assert_eq!(tracker.update(0.8), None);
        assert_eq!(tracker.update(0.5), Some(EscalationPhase::Enraged));
        assert!(tracker.is_enraged());
        assert_eq!(tracker.update(0.9), None, "healing never clears a flag");
        assert!(tracker.is_enraged());
        assert_eq!(tracker.update(0.1), Some(EscalationPhase::Desperate));
        assert!(tracker.is_enraged() && tracker.is_desperate());
    }

    #[test]
    fn test_phase_jump_sets_both_flags() {
        let mut tracker = PhaseTracker::default();
        assert_eq!(tracker.update(0.2), Some(EscalationPhase::Desperate));
        assert!(tracker.is_enraged());
        assert!(tracker.is_desperate());
    }

    // --- Hazards ---

    #[test]
    fn test_hazard_warning_is_harmless() {
        let mut area = HazardArea::new(Vec2::ZERO, HazardSpec::default(), None);
        area.on_target_enter();
        let tick = area.tick(0.25);
        assert_eq!(tick.damage, None);
        assert_eq!(area.phase(), HazardPhase::Warning);
    }

    #[test]
    fn test_hazard_damages_on_activation_when_occupied() {
        let spec = HazardSpec::default();
        let mut area = HazardArea::new(Vec2::ZERO, spec.clone(), None);
        area.on_target_enter();
        area.tick(0.25);
        let tick = area.tick(0.25);
        assert!(tick.activated);
        assert_eq!(tick.damage, Some(spec.damage_per_tick));
    }

    #[test]
    fn test_hazard_enter_while_active_damages_immediately() {
        let spec = HazardSpec::default();
        let mut area = HazardArea::new(Vec2::ZERO, spec.clone(), None);
        area.tick(0.6);
        assert_eq!(area.phase(), HazardPhase::Active);

        area.on_target_enter();
        let tick = area.tick(0.05);
        assert!(tick.damage.is_some());
        // Next hit waits a full interval.
        assert_eq!(area.tick(0.05).damage, None);

        area.on_target_exit();
        assert_eq!(area.tick(0.6).damage, None);
    }

    #[test]
    fn test_hazard_escalates_and_expires() {
        let spec = HazardSpec::default();
        let mut area = HazardArea::new(Vec2::ZERO, spec.clone(), None);
        area.tick(spec.warning_secs);
        assert!((area.damage_multiplier() - 1.0).abs() < 1e-5);
        area.tick(spec.active_secs / 2.0);
        assert!((area.damage_multiplier() - 1.25).abs() < 1e-4);
        let tick = area.tick(spec.active_secs / 2.0);
        assert!((area.damage_multiplier() - 1.5).abs() < 1e-4);
        assert!(tick.expired);
    }

    #[test]
    fn test_hazard_destroy_reports_once() {
        let mut area = HazardArea::new(Vec2::ZERO, HazardSpec::default(), Some(AgentId(3)));
        assert!(area.destroy());
        assert!(!area.destroy());
        assert!(area.is_destroyed());
        assert_eq!(area.tick(1.0), Default::default());
    }

    // --- Projectiles ---

    #[test]
    fn test_projectile_hits_at_most_once() {
        let mut arrow = Projectile::new(ProjectileSpec::arrow(), None, Vec2::X);
        assert_eq!(
            arrow.on_contact(ContactCategory::Target),
            ContactOutcome::HitTarget { damage: 15.0 }
        );
        assert_eq!(arrow.on_contact(ContactCategory::Target), ContactOutcome::Ignored);
        assert_eq!(arrow.on_contact(ContactCategory::Terrain), ContactOutcome::Ignored);
        assert!(arrow.is_finished());
    }

    #[test]
    fn test_arrow_embeds_in_terrain_until_lifetime() {
        let mut arrow = Projectile::new(ProjectileSpec::arrow(), None, Vec2::Y);
        assert_eq!(arrow.on_contact(ContactCategory::Agent), ContactOutcome::Ignored);
        assert_eq!(arrow.on_contact(ContactCategory::Terrain), ContactOutcome::Embedded);
        assert_eq!(arrow.state(), ProjectileState::Embedded);
        assert_eq!(arrow.velocity(), Vec2::ZERO);
        assert_eq!(arrow.tick(1.0), Vec2::ZERO);
        assert!(!arrow.is_finished());
        // An embedded arrow no longer hurts.
        assert_eq!(arrow.on_contact(ContactCategory::Target), ContactOutcome::Ignored);
        arrow.tick(4.0);
        assert!(arrow.is_finished());
    }

    #[test]
    fn test_poison_shatters_on_obstacles() {
        let mut glob = Projectile::new(ProjectileSpec::poison(), None, Vec2::X);
        assert_eq!(glob.on_contact(ContactCategory::Other), ContactOutcome::Shattered);
        assert!(glob.is_finished());
    }

    #[test]
    fn test_projectile_flight_and_rotation() {
        let mut bolt = Projectile::new(ProjectileSpec::bolt(), None, Vec2::new(0.0, -2.0));
        assert!((bolt.rotation_degrees() + 90.0).abs() < 1e-4);
        let step = bolt.tick(0.5);
        assert!((step - Vec2::new(0.0, -2.5)).length() < 1e-5);
    }

    // --- Melee kiter ---

    #[test]
    fn test_melee_contact_strikes_then_retreats() {
        let mut rig = Rig::preset(AgentArchetype::Brawler, Vec2::new(1.0, 0.0));
        rig.tick();
        assert_eq!(rig.agent.mode(), AgentMode::Chasing);

        rig.contact();
        assert_eq!(rig.out.total_fear(), 20.0);
        assert_eq!(rig.agent.state_name(), "attacking");

        assert!(rig.tick_until("retreating", 20));
        let point = rig.agent.retreat_point().unwrap();
        assert!((point - Vec2::new(3.0, 0.0)).length() < 1e-4);
        assert_eq!(rig.agent.mode(), AgentMode::Retreating);

        // Contact while retreating does nothing.
        rig.contact();
        assert_eq!(rig.out.total_fear(), 20.0);

        rig.nav.position = point;
        rig.tick();
        assert_eq!(rig.agent.mode(), AgentMode::Chasing);
    }

    #[test]
    fn test_wrench_spawns_slash_effect() {
        let mut rig = Rig::preset(AgentArchetype::Wrench, Vec2::new(1.0, 0.0));
        rig.contact();
        let slashes = rig.count(|e| {
            matches!(
                e,
                AgentEffect::Present(PresentationIntent::SpawnEffect {
                    effect: EffectKind::Slash,
                    ..
                })
            )
        });
        assert_eq!(slashes, 1);
    }

    #[test]
    fn test_facing_hint_follows_velocity() {
        let mut rig = Rig::preset(AgentArchetype::Brawler, Vec2::new(5.0, 0.0));
        rig.nav.velocity = Vec2::new(-3.0, 0.5);
        rig.tick();
        assert_eq!(rig.agent.facing(), Some(Facing::Left));
        let hints = rig.count(|e| {
            matches!(
                e,
                AgentEffect::Present(PresentationIntent::MovementHint { .. })
            )
        });
        assert_eq!(hints, 1);
        // Unchanged facing does not repeat the hint.
        rig.tick();
        let hints_after = rig.count(|e| {
            matches!(
                e,
                AgentEffect::Present(PresentationIntent::MovementHint { .. })
            )
        });
        assert_eq!(hints_after, 1);
    }

    // --- Death ---

    #[test]
    fn test_death_is_single_entry() {
        let mut rig = Rig::preset(AgentArchetype::Wrench, Vec2::new(2.0, 0.0));
        rig.damage(10.0);
        assert!(rig.agent.is_dying());
        assert_eq!(rig.agent.mode(), AgentMode::Dying);
        rig.die();
        rig.damage(10.0);

        let resolved = rig.count(|e| matches!(e, AgentEffect::MarkResolved { .. }));
        assert_eq!(resolved, 1);
        let death_clips = rig.count(|e| {
            matches!(
                e,
                AgentEffect::Present(PresentationIntent::PlayOneShot {
                    clip: ClipRef::Death
                })
            )
        });
        assert_eq!(death_clips, 1);

        assert!(!rig.agent.is_removable());
        for _ in 0..40 {
            rig.tick();
        }
        assert!(rig.agent.is_removable());
    }

    // --- Ranged kiter ---

    #[test]
    fn test_archer_too_close_retreats_beyond_shooting_range() {
        let profile = AgentProfile::preset(AgentArchetype::Archer);
        let shooting_range = match &profile.behavior {
            BehaviorProfile::RangedKiter(p) => p.shooting_range,
            _ => unreachable!(),
        };
        let mut rig = Rig::new(
            AgentArchetype::Archer,
            profile,
            Vec2::new(shooting_range * 0.5, 0.0),
        );
        rig.tick();
        assert_eq!(rig.agent.mode(), AgentMode::Retreating);
        let point = rig.agent.retreat_point().unwrap();
        assert!(point.distance(Vec2::ZERO) >= shooting_range);
        assert!(point.y.abs() < 1e-5, "retreat along the away vector");
        assert!(point.x > shooting_range * 0.5);
    }

    #[test]
    fn test_archer_fires_on_entering_band() {
        let mut rig = Rig::preset(AgentArchetype::Archer, Vec2::new(5.0, 0.0));
        rig.tick();
        assert_eq!(rig.agent.state_name(), "shooting");
        rig.tick();
        let shots = rig.count(|e| matches!(e, AgentEffect::SpawnProjectile { .. }));
        assert_eq!(shots, 1);
        if let Some(AgentEffect::SpawnProjectile { direction, .. }) = rig
            .out
            .effects()
            .iter()
            .find(|e| matches!(e, AgentEffect::SpawnProjectile { .. }))
        {
            assert!((*direction - Vec2::new(-1.0, 0.0)).length() < 1e-5);
        }
        // Interval gates the next shot.
        rig.tick();
        assert_eq!(
            rig.count(|e| matches!(e, AgentEffect::SpawnProjectile { .. })),
            1
        );
    }

    #[test]
    fn test_archer_chases_beyond_max_range() {
        let mut rig = Rig::preset(AgentArchetype::Archer, Vec2::new(5.0, 0.0));
        rig.tick();
        assert_eq!(rig.agent.state_name(), "shooting");
        rig.nav.position = Vec2::new(11.0, 0.0);
        rig.tick();
        assert_eq!(rig.agent.state_name(), "chasing");
    }

    #[test]
    fn test_archer_without_arrow_skips_shot() {
        let mut profile = AgentProfile::preset(AgentArchetype::Archer);
        if let BehaviorProfile::RangedKiter(p) = &mut profile.behavior {
            p.arrow = None;
        }
        let mut rig = Rig::new(AgentArchetype::Archer, profile, Vec2::new(5.0, 0.0));
        for _ in 0..5 {
            rig.tick();
        }
        assert_eq!(
            rig.count(|e| matches!(e, AgentEffect::SpawnProjectile { .. })),
            0
        );
        assert_eq!(rig.agent.state_name(), "shooting");
    }

    // --- Bomber ---

    fn fuse_count(rig: &Rig) -> usize {
        rig.count(|e| {
            matches!(
                e,
                AgentEffect::Present(PresentationIntent::PlayOneShot {
                    clip: ClipRef::Fuse
                })
            )
        })
    }

    #[test]
    fn test_pumpkin_countdown_starts_once() {
        let mut rig = Rig::preset(AgentArchetype::Pumpkin, Vec2::new(2.5, 0.0));
        rig.damage(35.0);
        assert_eq!(rig.agent.current_health(), 15.0);
        assert_eq!(rig.agent.state_name(), "exploding");
        assert_eq!(fuse_count(&rig), 1);

        for _ in 0..10 {
            rig.tick();
        }
        let progress = rig.agent.explosion_progress().unwrap();
        rig.damage(5.0);
        rig.damage(5.0);
        assert_eq!(fuse_count(&rig), 1);
        assert_eq!(rig.agent.explosion_progress(), Some(progress));
        assert!(!rig.agent.is_dying());
    }

    #[test]
    fn test_pumpkin_countdown_explodes_on_target_in_radius() {
        let mut rig = Rig::preset(AgentArchetype::Pumpkin, Vec2::new(2.5, 0.0));
        rig.damage(40.0);
        // 5 s countdown at 0.05 s per tick.
        for _ in 0..101 {
            rig.tick();
        }
        assert!(rig.agent.is_dying());
        assert!(rig.agent.is_removable());
        assert_eq!(rig.out.total_fear(), 30.0);
        assert_eq!(rig.nav.position, Vec2::new(2.5, 0.0));
    }

    #[test]
    fn test_pumpkin_lethal_damage_explodes_immediately() {
        let mut rig = Rig::preset(AgentArchetype::Pumpkin, Vec2::new(10.0, 0.0));
        rig.damage(60.0);
        assert_eq!(rig.agent.current_health(), 0.0);
        assert!(rig.agent.is_dying());
        assert_eq!(fuse_count(&rig), 0, "no countdown on lethal damage");
        let explosions = rig.count(|e| {
            matches!(
                e,
                AgentEffect::Present(PresentationIntent::SpawnEffect {
                    effect: EffectKind::Explosion,
                    ..
                })
            )
        });
        assert_eq!(explosions, 1);
        // Target out of the blast radius.
        assert_eq!(rig.out.total_fear(), 0.0);
    }

    #[test]
    fn test_pumpkin_spits_inside_range() {
        let mut rig = Rig::preset(AgentArchetype::Pumpkin, Vec2::new(5.0, 0.0));
        for _ in 0..3 {
            rig.tick();
        }
        assert_eq!(
            rig.count(|e| matches!(e, AgentEffect::SpawnProjectile { .. })),
            1
        );
        assert_eq!(rig.agent.state_name(), "keeping_distance");
    }

    #[test]
    fn test_pumpkin_auto_explode_after_time() {
        let mut profile = AgentProfile::preset(AgentArchetype::Pumpkin);
        if let BehaviorProfile::Bomber(p) = &mut profile.behavior {
            p.auto_explode_after_secs = Some(0.5);
        }
        let mut rig = Rig::new(AgentArchetype::Pumpkin, profile, Vec2::new(20.0, 0.0));
        assert!(rig.tick_until("exploding", 20));
        assert_eq!(fuse_count(&rig), 1);
    }

    // --- Teleporter ---

    #[test]
    fn test_reaper_teleport_without_surface_stays_put() {
        let mut rig = Rig::new(
            AgentArchetype::Reaper,
            reaper_profile(0.1, 100.0),
            Vec2::new(10.0, 0.0),
        );
        rig.nav.surface_ok = false;

        assert!(rig.tick_until("teleport_telegraph", 10));
        assert!(rig.agent.scheduler().elapsed(AbilityId::Teleport).unwrap() < 0.01);
        assert!(rig.tick_until("chasing", 60));
        assert_eq!(rig.nav.position, Vec2::new(10.0, 0.0));
        assert!(!rig.agent.is_invulnerable());
    }

    #[test]
    fn test_reaper_teleport_lands_in_annulus() {
        let mut rig = Rig::new(
            AgentArchetype::Reaper,
            reaper_profile(0.1, 100.0),
            Vec2::new(10.0, 0.0),
        );
        assert!(rig.tick_until("teleport_settle", 40));
        assert!(rig.agent.is_invulnerable());

        rig.damage(50.0);
        assert_eq!(rig.agent.current_health(), 100.0);

        assert!(rig.tick_until("teleport_recover", 20));
        assert!(!rig.agent.is_invulnerable());
        let distance = rig.nav.position.distance(Vec2::ZERO);
        assert!((1.0..=2.5).contains(&distance), "landed at {distance}");
    }

    #[test]
    fn test_reaper_target_loss_aborts_teleport() {
        let mut rig = Rig::new(
            AgentArchetype::Reaper,
            reaper_profile(0.1, 100.0),
            Vec2::new(10.0, 0.0),
        );
        assert!(rig.tick_until("teleport_settle", 40));
        rig.target.alive = false;
        rig.tick();
        assert_eq!(rig.agent.state_name(), "chasing");
        assert!(!rig.agent.is_invulnerable());
        assert_eq!(rig.nav.position, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_reaper_hazard_cap_and_counter() {
        let mut profile = reaper_profile(100.0, 0.1);
        teleporter(&mut profile).hazard_cap = 1;
        let mut rig = Rig::new(AgentArchetype::Reaper, profile, Vec2::new(1.0, 0.0));

        assert!(rig.tick_until("cast_recover", 40));
        assert_eq!(rig.agent.active_hazards(), 1);
        assert!(rig.tick_until("chasing", 40));
        for _ in 0..20 {
            rig.tick();
        }
        let hazards = rig.count(|e| matches!(e, AgentEffect::SpawnHazard { .. }));
        assert_eq!(hazards, 1, "cap blocks further casts");

        rig.agent.on_hazard_destroyed();
        rig.agent.on_hazard_destroyed();
        assert_eq!(rig.agent.active_hazards(), 0);
    }

    #[test]
    fn test_reaper_death_clears_hazards() {
        let mut rig = Rig::new(
            AgentArchetype::Reaper,
            reaper_profile(100.0, 0.1),
            Vec2::new(1.0, 0.0),
        );
        assert!(rig.tick_until("cast_recover", 40));
        rig.die();
        rig.die();
        assert_eq!(
            rig.count(|e| matches!(e, AgentEffect::ClearOwnedHazards)),
            1
        );
    }

    #[test]
    fn test_reaper_desperate_combo() {
        let mut rig = Rig::new(
            AgentArchetype::Reaper,
            reaper_profile(0.1, 0.1),
            Vec2::new(1.0, 0.0),
        );
        rig.damage(80.0);
        assert!(rig.agent.is_desperate());
        assert!(rig.tick_until("combo_gap", 60));
        assert!(rig.tick_until("cast_windup", 20));
        assert!(rig.tick_until("chasing", 60));
        assert_eq!(
            rig.count(|e| matches!(e, AgentEffect::SpawnHazard { .. })),
            1
        );
    }

    #[test]
    fn test_reaper_melee_contact_while_chasing() {
        let mut rig = Rig::new(
            AgentArchetype::Reaper,
            reaper_profile(100.0, 100.0),
            Vec2::new(1.0, 0.0),
        );
        rig.tick();
        rig.contact();
        assert_eq!(rig.out.total_fear(), 20.0);
        assert_eq!(rig.agent.state_name(), "attacking");
    }

    // --- Director ---

    fn director_profile() -> DirectorProfile {
        DirectorProfile {
            spawn_interval_secs: 1.0,
            telegraph_secs: 0.5,
            population_cap: 2,
            ..DirectorProfile::default()
        }
    }

    fn run_director(
        director: &mut EncounterDirector,
        ticks: usize,
        live_agents: u32,
        target_alive: bool,
    ) -> Vec<DirectorEvent> {
        let mut nav = ScriptedNav::at(0.0, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let mut intents = Vec::new();
        for _ in 0..ticks {
            let mut env = DirectorEnv {
                target: Target {
                    position: Vec2::new(20.0, 0.0),
                    alive: target_alive,
                },
                live_agents,
                nav: &mut nav,
                rng: &mut rng,
            };
            director.tick(0.1, &mut env, &mut events, &mut intents);
        }
        events
    }

    #[test]
    fn test_director_telegraphs_then_spawns() {
        let mut director = EncounterDirector::new(DirectorId(0), director_profile());
        let events = run_director(&mut director, 11, 0, true);
        assert!(matches!(events[0], DirectorEvent::TelegraphStarted { .. }));
        assert_eq!(events.len(), 1);
        assert!(director.telegraph_progress().is_some());

        let events = run_director(&mut director, 6, 0, true);
        assert!(events
            .iter()
            .any(|e| matches!(e, DirectorEvent::Spawn { archetype: AgentArchetype::Brawler, .. })));
        assert_eq!(director.spawned_total(), 1);
    }

    #[test]
    fn test_director_respects_population_cap() {
        let mut director = EncounterDirector::new(DirectorId(0), director_profile());
        let events = run_director(&mut director, 50, 2, true);
        assert!(events.is_empty());
    }

    #[test]
    fn test_director_destroyed_mid_telegraph_does_not_spawn() {
        let mut director = EncounterDirector::new(DirectorId(0), director_profile());
        run_director(&mut director, 11, 0, true);
        assert!(director.telegraph_progress().is_some());
        director.deactivate();
        let events = run_director(&mut director, 20, 0, true);
        assert_eq!(events, vec![DirectorEvent::TelegraphCancelled]);
        assert_eq!(director.spawned_total(), 0);
    }

    #[test]
    fn test_director_cancels_when_target_inactive() {
        let mut director = EncounterDirector::new(DirectorId(0), director_profile());
        run_director(&mut director, 11, 0, true);
        let events = run_director(&mut director, 10, 0, false);
        assert_eq!(events, vec![DirectorEvent::TelegraphCancelled]);
        assert_eq!(director.spawned_total(), 0);
    }

    // --- Profiles ---

    #[test]
    fn test_presets_validate() {
        for archetype in AgentArchetype::ALL {
            AgentProfile::preset(archetype).validate().unwrap();
        }
    }

    #[test]
    fn test_profile_rejects_unordered_bands() {
        let mut profile = AgentProfile::preset(AgentArchetype::Archer);
        if let BehaviorProfile::RangedKiter(p) = &mut profile.behavior {
            p.too_close = 8.0;
        }
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::UnorderedBands { .. })
        ));

        let mut profile = AgentProfile::preset(AgentArchetype::Reaper);
        teleporter(&mut profile).hazard_cap = 0;
        assert!(matches!(profile.validate(), Err(ConfigError::ZeroHazardCap)));
    }

    #[test]
    fn test_zero_path_interval_refreshes_every_tick() {
        let mut profile = AgentProfile::preset(AgentArchetype::Brawler);
        profile.path_update_interval = 0.0;
        profile.validate().unwrap();

        let mut rig = Rig::new(AgentArchetype::Brawler, profile.clone(), Vec2::new(10.0, 0.0));
        rig.tick();
        assert_eq!(rig.nav.destination, Some(Vec2::ZERO));
        for step in 1..4 {
            rig.target.position = Vec2::new(0.0, step as f32);
            rig.tick();
            assert_eq!(rig.nav.destination, Some(rig.target.position));
        }

        profile.path_update_interval = -0.1;
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::Negative { .. })
        ));
    }

    #[test]
    fn test_escalation_speeds_up_reaper() {
        let profile = AgentProfile::preset(AgentArchetype::Reaper);
        let calm = profile.speed_multiplier(false, false);
        let enraged = profile.speed_multiplier(true, false);
        let desperate = profile.speed_multiplier(true, true);
        assert_eq!(calm, 1.0);
        assert!((enraged * 3.5 - 5.0).abs() < 1e-4);
        assert!((desperate * 3.5 - 6.0).abs() < 1e-4);
        assert_eq!(profile.cooldown_multiplier(true), 0.7);
    }
}
