//! Game loop thread: runs the encounter engine at 30Hz and publishes snapshots.
//!
//! The engine is moved into the thread and owned there. Commands arrive via
//! an `mpsc` channel. Snapshots are stored in shared state for polling, and a
//! run summary is returned when the loop ends.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde::Serialize;

use dread_core::constants::TICK_RATE;
use dread_core::enums::{AgentArchetype, AgentMode};
use dread_core::events::{EntityRef, PresentationIntent};
use dread_core::state::EncounterSnapshot;
use dread_sim::EncounterEngine;

use crate::script::TargetScript;
use crate::state::LoopCommand;

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep between ticks to hold 30Hz.
    RealTime,
    /// Tick as fast as possible.
    Unpaced,
}

#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub pacing: Pacing,
    /// Stop after this many ticks. `None` runs until shutdown.
    pub max_ticks: Option<u64>,
    pub script: Option<TargetScript>,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            pacing: Pacing::RealTime,
            max_ticks: None,
            script: None,
        }
    }
}

/// What happened over one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed_secs: f64,
    pub fear: f32,
    pub peak_fear: f32,
    pub fear_hits: u32,
    pub session_resets: u32,
    pub keys_collected: u32,
    pub agents_killed: u32,
    pub agents_remaining: BTreeMap<AgentArchetype, u32>,
}

impl RunSummary {
    /// Fold one snapshot into the running totals.
    fn record(&mut self, snapshot: &EncounterSnapshot, previous: Option<&EncounterSnapshot>) {
        self.ticks += 1;
        self.elapsed_secs = snapshot.time.elapsed_secs;
        self.fear = snapshot.fear.value;
        self.peak_fear = self.peak_fear.max(snapshot.fear.value);
        self.session_resets = snapshot.session_resets;
        self.keys_collected = snapshot.keys_collected;
        self.fear_hits += snapshot
            .presentation
            .iter()
            .filter(|event| {
                event.source == EntityRef::Target
                    && matches!(event.intent, PresentationIntent::TargetDamaged { .. })
            })
            .count() as u32;

        if let Some(previous) = previous {
            let newly_dying = snapshot.agents.iter().filter(|agent| {
                agent.mode == AgentMode::Dying
                    && previous
                        .agents
                        .iter()
                        .any(|before| before.id == agent.id && before.mode != AgentMode::Dying)
            });
            self.agents_killed += newly_dying.count() as u32;
        }

        self.agents_remaining.clear();
        for agent in &snapshot.agents {
            if agent.mode != AgentMode::Dying {
                *self.agents_remaining.entry(agent.archetype).or_insert(0) += 1;
            }
        }
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and a handle that yields the run summary.
pub fn spawn_game_loop(
    engine: EncounterEngine,
    options: LoopOptions,
    latest_snapshot: Arc<Mutex<Option<EncounterSnapshot>>>,
) -> anyhow::Result<(mpsc::Sender<LoopCommand>, JoinHandle<RunSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("dread-game-loop".into())
        .spawn(move || run_game_loop(engine, options, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until shutdown, channel disconnect or the tick limit.
fn run_game_loop(
    mut engine: EncounterEngine,
    options: LoopOptions,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<EncounterSnapshot>>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut previous: Option<EncounterSnapshot> = None;
    let mut next_tick_time = Instant::now();
    tracing::info!(pacing = ?options.pacing, max_ticks = ?options.max_ticks, "game loop started");

    loop {
        if options.max_ticks.is_some_and(|max| summary.ticks >= max) {
            break;
        }

        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Encounter(command)) => engine.queue_command(command),
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::info!(ticks = summary.ticks, "game loop stopped");
                    return summary;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Scripted target input
        if let Some(script) = &options.script {
            engine.queue_commands(script.step(engine.time().tick, previous.as_ref()));
        }

        // 3. Advance one tick (the engine handles pause internally)
        let snapshot = engine.tick();
        summary.record(&snapshot, previous.as_ref());

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        previous = Some(snapshot);

        // 5. Sleep until next tick
        if options.pacing == Pacing::RealTime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind: reset to avoid catch-up spiral
                next_tick_time = now;
            }
        }
    }

    tracing::info!(ticks = summary.ticks, "game loop finished");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use dread_core::commands::EncounterCommand;
    use dread_core::enums::EncounterLayout;
    use dread_sim::EncounterConfig;

    fn unpaced(max_ticks: u64) -> LoopOptions {
        LoopOptions {
            pacing: Pacing::Unpaced,
            max_ticks: Some(max_ticks),
            script: None,
        }
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<LoopCommand>();

        tx.send(LoopCommand::Encounter(EncounterCommand::Pause))
            .unwrap();
        tx.send(LoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 2);
        assert!(matches!(
            commands[0],
            LoopCommand::Encounter(EncounterCommand::Pause)
        ));
        assert!(matches!(commands[1], LoopCommand::Shutdown));
    }

    #[test]
    fn test_loop_stops_at_tick_limit() {
        let mut engine = EncounterEngine::new(EncounterConfig::default()).unwrap();
        engine.queue_command(EncounterCommand::LoadLayout {
            layout: EncounterLayout::PumpkinPatch,
        });
        let latest = Arc::new(Mutex::new(None));
        let (_tx, handle) = spawn_game_loop(engine, unpaced(30), Arc::clone(&latest)).unwrap();

        let summary = handle.join().unwrap();
        assert_eq!(summary.ticks, 30);
        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.time.tick, 30);
    }

    #[test]
    fn test_shutdown_ends_loop() {
        let engine = EncounterEngine::new(EncounterConfig::default()).unwrap();
        let latest = Arc::new(Mutex::new(None));
        let options = LoopOptions {
            pacing: Pacing::RealTime,
            ..LoopOptions::default()
        };
        let (tx, handle) = spawn_game_loop(engine, options, latest).unwrap();
        tx.send(LoopCommand::Shutdown).unwrap();
        let summary = handle.join().unwrap();
        assert!(summary.ticks < 1000);
    }

    #[test]
    fn test_summary_counts_kills() {
        let mut engine = EncounterEngine::new(EncounterConfig::default()).unwrap();
        engine.queue_command(EncounterCommand::PlaceAgent {
            archetype: AgentArchetype::Brawler,
            position: dread_core::types::Vec2::new(10.0, 0.0),
            persistence_id: None,
        });
        let mut summary = RunSummary::default();
        let first = engine.tick();
        summary.record(&first, None);
        assert_eq!(summary.agents_remaining.get(&AgentArchetype::Brawler), Some(&1));

        engine.queue_command(EncounterCommand::DamageAgent {
            agent: dread_core::types::AgentId(1),
            amount: 50.0,
        });
        let second = engine.tick();
        summary.record(&second, Some(&first));
        assert_eq!(summary.agents_killed, 1);
        assert!(summary.agents_remaining.is_empty());
    }

    #[test]
    fn test_tick_duration_constant() {
        // 30Hz = 33.333ms per tick
        let expected_nanos = 1_000_000_000u64 / 30;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
