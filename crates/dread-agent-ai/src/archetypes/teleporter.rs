//! Teleporting caster (reaper).
//!
//! Chases by default and runs three cooled abilities in priority order:
//!
//! 1. Combo: teleport, short gap, hazard cast. Desperate only, and only when
//!    both parts are ready and the hazard cap has room.
//! 2. Hazard cast on the target's position. Skipped by chance more often
//!    while calm.
//! 3. Teleport to a random point around the target. Always taken when far
//!    away; taken by chance when enraged or desperate.
//!
//! Abilities run as resumable tasks advanced once per tick. A task only
//! commits its effect after its telegraph has fully elapsed, and is abandoned
//! without effect if the target disappears or the reaper dies.

use std::f32::consts::TAU;

use rand::{Rng, RngCore};

use dread_core::constants::TELEPORT_SEARCH_RADIUS;
use dread_core::enums::{AbilityEffect, AbilityId, AgentMode, ClipRef, EffectKind};
use dread_core::events::PresentationIntent;
use dread_core::types::{unit_at, Rgba, Vec2};

use super::melee::Skirmish;
use super::{random_in_disc, Behavior, Pulse};
use crate::controller::{AgentCore, AgentEnv};
use crate::output::AgentEffect;
use crate::profiles::TeleporterProfile;
use crate::scheduler::Ability;

/// Multiple of the attack range beyond which the reaper always teleports.
const FAR_RANGE_FACTOR: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Running,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TeleportStage {
    Telegraph,
    Settle,
    Recover,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TeleportTask {
    stage: TeleportStage,
    elapsed: f32,
    anchor: Vec2,
    pulse: Pulse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CastStage {
    Windup,
    Recover,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CastTask {
    stage: CastStage,
    elapsed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ComboTask {
    Teleport(TeleportTask),
    Gap { elapsed: f32 },
    Cast(CastTask),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ReaperTask {
    Teleport(TeleportTask),
    Cast(CastTask),
    Combo(ComboTask),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ReaperState {
    Chasing,
    Skirmishing(Skirmish),
    Acting(ReaperTask),
    Dead,
}

/// Reaper behavior.
#[derive(Debug, Clone)]
pub struct Teleporter {
    profile: TeleporterProfile,
    state: ReaperState,
    active_hazards: u32,
}

impl Teleporter {
    pub(crate) fn new(
        profile: TeleporterProfile,
        core: &mut AgentCore,
        rng: &mut dyn RngCore,
    ) -> Self {
        let (a, b) = profile.initial_timer_fraction;
        let (lo, hi) = (a.min(b), a.max(b));

        // Timers start part-way so a fresh reaper does not open with every ability at once.
        let teleport_wait = rng.gen_range(lo..=hi) * profile.teleport_cooldown;
        core.scheduler.register(
            Ability {
                id: AbilityId::Teleport,
                cooldown_secs: profile.teleport_cooldown,
                telegraph_secs: profile.teleport_warning_secs,
                invulnerable_while_executing: true,
                effect: AbilityEffect::Relocate,
            },
            profile.teleport_cooldown - teleport_wait,
        );
        let cast_wait = rng.gen_range(lo..=hi) * profile.cast_cooldown;
        core.scheduler.register(
            Ability {
                id: AbilityId::HazardCast,
                cooldown_secs: profile.cast_cooldown,
                telegraph_secs: profile.cast_windup_secs,
                invulnerable_while_executing: false,
                effect: AbilityEffect::SpawnHazard,
            },
            profile.cast_cooldown - cast_wait,
        );
        core.scheduler.register(
            Ability::instant(
                AbilityId::Melee,
                profile.melee_cooldown,
                AbilityEffect::DirectDamage,
            ),
            profile.melee_cooldown,
        );

        Self {
            profile,
            state: ReaperState::Chasing,
            active_hazards: 0,
        }
    }

    /// Hazards this reaper currently owns.
    pub fn active_hazards(&self) -> u32 {
        self.active_hazards
    }

    fn hazard_cap_reached(&self) -> bool {
        self.active_hazards >= self.profile.hazard_cap
    }

    /// Pick the next ability, or keep chasing.
    fn choose_action(&mut self, core: &mut AgentCore, env: &mut AgentEnv<'_>) -> Option<ReaperTask> {
        let mult = core.cooldown_multiplier();
        let enraged = core.phase.is_enraged();
        let desperate = core.phase.is_desperate();
        let teleport_ready = core.scheduler.ready(AbilityId::Teleport, mult);
        let cast_ready =
            core.scheduler.ready(AbilityId::HazardCast, mult) && !self.hazard_cap_reached();

        if desperate && teleport_ready && cast_ready {
            tracing::debug!(agent = core.id.0, "reaper combo");
            return Some(ReaperTask::Combo(ComboTask::Teleport(begin_teleport(
                core, env,
            ))));
        }

        if cast_ready {
            let chance = if enraged {
                self.profile.cast_chance_enraged
            } else {
                self.profile.cast_chance_calm
            };
            if env.rng.gen::<f32>() < chance {
                tracing::debug!(agent = core.id.0, "reaper hazard cast");
                return Some(ReaperTask::Cast(begin_cast(core, env)));
            }
            return None;
        }

        if teleport_ready {
            let distance = env.nav.position().distance(env.target.position);
            let far = distance > self.profile.attack_range * FAR_RANGE_FACTOR;
            let go = far
                || (enraged && env.rng.gen::<f32>() < self.profile.enraged_teleport_chance)
                || (desperate && env.rng.gen::<f32>() < self.profile.desperate_teleport_chance);
            if go {
                tracing::debug!(agent = core.id.0, distance, "reaper teleport");
                return Some(ReaperTask::Teleport(begin_teleport(core, env)));
            }
        }
        None
    }

    fn advance_task(
        &mut self,
        task: &mut ReaperTask,
        core: &mut AgentCore,
        dt: f32,
        env: &mut AgentEnv<'_>,
    ) -> Step {
        match task {
            ReaperTask::Teleport(t) => advance_teleport(t, &self.profile, core, dt, env),
            ReaperTask::Cast(c) => self.advance_cast(c, core, dt, env),
            ReaperTask::Combo(combo) => match combo {
                ComboTask::Teleport(t) => {
                    if advance_teleport(t, &self.profile, core, dt, env) == Step::Done {
                        env.nav.stop();
                        *combo = ComboTask::Gap { elapsed: 0.0 };
                    }
                    Step::Running
                }
                ComboTask::Gap { elapsed } => {
                    *elapsed += dt;
                    if *elapsed >= self.profile.combo_gap_secs {
                        *combo = ComboTask::Cast(begin_cast(core, env));
                    }
                    Step::Running
                }
                ComboTask::Cast(c) => self.advance_cast(c, core, dt, env),
            },
        }
    }

    fn advance_cast(
        &mut self,
        task: &mut CastTask,
        core: &mut AgentCore,
        dt: f32,
        env: &mut AgentEnv<'_>,
    ) -> Step {
        task.elapsed += dt;
        match task.stage {
            CastStage::Windup => {
                if task.elapsed >= core.scheduler.telegraph_secs(AbilityId::HazardCast) {
                    self.commit_cast(core, env);
                    task.stage = CastStage::Recover;
                    task.elapsed = 0.0;
                }
                Step::Running
            }
            CastStage::Recover => {
                if task.elapsed >= self.profile.cast_recovery_secs {
                    env.nav.resume();
                    Step::Done
                } else {
                    Step::Running
                }
            }
        }
    }

    fn commit_cast(&mut self, core: &AgentCore, env: &mut AgentEnv<'_>) {
        // Re-checked at commit: hazards may have been created since the cast began.
        if self.hazard_cap_reached() {
            tracing::debug!(agent = core.id.0, "hazard cap reached; cast fizzles");
            return;
        }
        let Some(spec) = self.profile.hazard.clone() else {
            tracing::warn!(agent = core.id.0, "no hazard configured; skipping cast");
            return;
        };
        self.active_hazards += 1;
        env.out.push(AgentEffect::SpawnHazard {
            center: env.target.position,
            spec,
        });
        tracing::debug!(
            agent = core.id.0,
            active = self.active_hazards,
            "hazard cast committed"
        );
    }

    fn abort(&mut self, core: &mut AgentCore, env: &mut AgentEnv<'_>) {
        if let ReaperState::Acting(task) = self.state {
            if let Some(anchor) = telegraph_anchor(&task) {
                env.nav.warp(anchor);
            }
            tracing::debug!(agent = core.id.0, "reaper task aborted");
        }
        core.invulnerable = false;
        if self.state != ReaperState::Dead {
            self.state = ReaperState::Chasing;
        }
    }
}

/// Start position of a teleport still in its telegraph, to undo jitter on abort.
fn telegraph_anchor(task: &ReaperTask) -> Option<Vec2> {
    let teleport = match task {
        ReaperTask::Teleport(t) | ReaperTask::Combo(ComboTask::Teleport(t)) => t,
        _ => return None,
    };
    (teleport.stage == TeleportStage::Telegraph).then_some(teleport.anchor)
}

fn begin_teleport(core: &mut AgentCore, env: &mut AgentEnv<'_>) -> TeleportTask {
    // Consumed up front so a failed relocation still waits out the cooldown.
    core.scheduler.reset(AbilityId::Teleport);
    env.nav.stop();
    env.out.present(PresentationIntent::PlayOneShot {
        clip: ClipRef::Teleport,
    });
    TeleportTask {
        stage: TeleportStage::Telegraph,
        elapsed: 0.0,
        anchor: env.nav.position(),
        pulse: Pulse::default(),
    }
}

fn begin_cast(core: &mut AgentCore, env: &mut AgentEnv<'_>) -> CastTask {
    core.scheduler.reset(AbilityId::HazardCast);
    env.nav.stop();
    env.out
        .present(PresentationIntent::PlayOneShot { clip: ClipRef::Cast });
    env.out.present(PresentationIntent::SpawnEffect {
        effect: EffectKind::CastCircle,
        at: env.target.position,
    });
    CastTask {
        stage: CastStage::Windup,
        elapsed: 0.0,
    }
}

fn advance_teleport(
    task: &mut TeleportTask,
    profile: &TeleporterProfile,
    core: &mut AgentCore,
    dt: f32,
    env: &mut AgentEnv<'_>,
) -> Step {
    task.elapsed += dt;
    match task.stage {
        TeleportStage::Telegraph => {
            task.pulse
                .update(task.elapsed, profile.pulse_hz, Rgba::PURPLE, env.out);

            let warning = core.scheduler.telegraph_secs(AbilityId::Teleport);
            if task.elapsed >= warning {
                env.nav.warp(task.anchor);
                core.invulnerable = true;
                env.out.present(PresentationIntent::SpawnEffect {
                    effect: EffectKind::TeleportOut,
                    at: task.anchor,
                });
                task.stage = TeleportStage::Settle;
                task.elapsed = 0.0;
            } else {
                let jitter = random_in_disc(env.rng, profile.jitter);
                env.nav.warp(task.anchor + jitter);
            }
            Step::Running
        }
        TeleportStage::Settle => {
            if task.elapsed >= profile.teleport_settle_secs {
                relocate(profile, core, env);
                core.invulnerable = false;
                task.stage = TeleportStage::Recover;
                task.elapsed = 0.0;
            }
            Step::Running
        }
        TeleportStage::Recover => {
            if task.elapsed >= profile.teleport_recovery_secs {
                env.nav.resume();
                core.force_path_refresh();
                Step::Done
            } else {
                Step::Running
            }
        }
    }
}

/// Move to a random point in the annulus around the target, if one is navigable.
fn relocate(profile: &TeleporterProfile, core: &AgentCore, env: &mut AgentEnv<'_>) {
    let angle = env.rng.gen_range(0.0..TAU);
    let radius = env
        .rng
        .gen_range(profile.teleport_min_distance..=profile.teleport_distance);
    let candidate = env.target.position + unit_at(angle) * radius;
    match env
        .nav
        .sample_point_on_surface(candidate, TELEPORT_SEARCH_RADIUS)
    {
        Some(point) => {
            env.nav.warp(point);
            env.out.present(PresentationIntent::SpawnEffect {
                effect: EffectKind::TeleportIn,
                at: point,
            });
            tracing::debug!(agent = core.id.0, x = point.x, y = point.y, "reaper relocated");
        }
        None => {
            tracing::warn!(
                agent = core.id.0,
                x = candidate.x,
                y = candidate.y,
                "no navigable teleport destination; staying in place"
            );
        }
    }
}

impl Behavior for Teleporter {
    fn tick(&mut self, core: &mut AgentCore, dt: f32, env: &mut AgentEnv<'_>) {
        match self.state {
            ReaperState::Dead => {}
            ReaperState::Acting(mut task) => {
                let step = self.advance_task(&mut task, core, dt, env);
                self.state = match step {
                    Step::Running => ReaperState::Acting(task),
                    Step::Done => ReaperState::Chasing,
                };
            }
            ReaperState::Skirmishing(mut skirmish) => {
                let arrived = skirmish.advance(
                    dt,
                    self.profile.attack_duration,
                    self.profile.retreat_distance,
                    core.speed(self.profile.retreat_speed),
                    env.target.position,
                    env.nav,
                );
                self.state = if arrived {
                    core.force_path_refresh();
                    ReaperState::Chasing
                } else {
                    ReaperState::Skirmishing(skirmish)
                };
            }
            ReaperState::Chasing => {
                if let Some(task) = self.choose_action(core, env) {
                    self.state = ReaperState::Acting(task);
                    return;
                }
                env.nav.resume();
                env.nav.set_speed(core.speed(self.profile.speed));
                core.refresh_path(dt, env.nav, env.target.position);
            }
        }
    }

    fn on_target_lost(&mut self, core: &mut AgentCore, env: &mut AgentEnv<'_>) {
        self.abort(core, env);
    }

    fn on_target_contact(&mut self, core: &mut AgentCore, env: &mut AgentEnv<'_>) {
        if self.state != ReaperState::Chasing
            || !core
                .scheduler
                .ready(AbilityId::Melee, core.cooldown_multiplier())
        {
            return;
        }
        core.scheduler.reset(AbilityId::Melee);
        env.out.fear(self.profile.melee_damage);
        env.out.present(PresentationIntent::Flash {
            color: Rgba::RED,
            duration_secs: 0.2,
        });
        tracing::debug!(agent = core.id.0, damage = self.profile.melee_damage, "reaper strike");
        self.state = ReaperState::Skirmishing(Skirmish::begin(env.nav));
    }

    fn on_death(&mut self, core: &mut AgentCore, env: &mut AgentEnv<'_>) {
        self.abort(core, env);
        self.state = ReaperState::Dead;
        if self.active_hazards > 0 {
            env.out.push(AgentEffect::ClearOwnedHazards);
        }
    }

    fn on_hazard_destroyed(&mut self) {
        self.active_hazards = self.active_hazards.saturating_sub(1);
    }

    fn mode(&self) -> AgentMode {
        match self.state {
            ReaperState::Chasing => AgentMode::Chasing,
            ReaperState::Skirmishing(s) => s.mode(),
            ReaperState::Acting(_) => AgentMode::ExecutingAbility,
            ReaperState::Dead => AgentMode::Dying,
        }
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            ReaperState::Chasing => "chasing",
            ReaperState::Skirmishing(s) => s.state_name(),
            ReaperState::Acting(task) => match task {
                ReaperTask::Teleport(t) | ReaperTask::Combo(ComboTask::Teleport(t)) => {
                    match t.stage {
                        TeleportStage::Telegraph => "teleport_telegraph",
                        TeleportStage::Settle => "teleport_settle",
                        TeleportStage::Recover => "teleport_recover",
                    }
                }
                ReaperTask::Combo(ComboTask::Gap { .. }) => "combo_gap",
                ReaperTask::Cast(c) | ReaperTask::Combo(ComboTask::Cast(c)) => match c.stage {
                    CastStage::Windup => "cast_windup",
                    CastStage::Recover => "cast_recover",
                },
            },
            ReaperState::Dead => "dead",
        }
    }

    fn retreat_point(&self) -> Option<Vec2> {
        match self.state {
            ReaperState::Skirmishing(s) => s.retreat_point(),
            _ => None,
        }
    }
}
