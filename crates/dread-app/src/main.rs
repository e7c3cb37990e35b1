use std::io::BufRead;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use dread_app::cli::{self, USAGE};
use dread_app::game_loop::{self, LoopOptions, Pacing};
use dread_app::script::TargetScript;
use dread_app::state::AppState;
use dread_core::commands::EncounterCommand;
use dread_sim::layouts::build_layout;
use dread_sim::{EncounterConfig, EncounterEngine};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = cli::parse_args(&args)?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            EncounterConfig::from_json_str(&json)
                .with_context(|| format!("loading {}", path.display()))?
        }
        None => EncounterConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    tracing::info!(seed = config.seed, layout = ?args.layout, ticks = args.ticks, "starting encounter");

    // Orbit around the middle of the arena, starting near the layout's entry.
    let script = args.scripted.then(|| {
        let start = build_layout(args.layout).target_start;
        let center = config.arena.center();
        TargetScript::orbit(center, start.distance(center).min(config.arena.size().y * 0.4))
    });

    let mut engine = EncounterEngine::new(config).context("invalid encounter config")?;
    engine.queue_command(EncounterCommand::LoadLayout {
        layout: args.layout,
    });
    let state = Arc::new(AppState::new());
    let (tx, handle) = game_loop::spawn_game_loop(
        engine,
        LoopOptions {
            pacing: args.pacing,
            max_ticks: Some(args.ticks),
            script,
        },
        Arc::clone(&state.latest_snapshot),
    )?;
    if let Ok(mut slot) = state.command_tx.lock() {
        *slot = Some(tx);
    }
    if args.pacing == Pacing::RealTime {
        spawn_console(Arc::clone(&state))?;
    }

    let summary = handle
        .join()
        .map_err(|_| anyhow::anyhow!("game loop thread panicked"))?;
    if let Some(last) = state.snapshot() {
        tracing::info!(
            tick = last.time.tick,
            agents = last.agents.len(),
            hazards = last.hazards.len(),
            "final snapshot"
        );
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Forward stdin commands to the running loop until it stops or stdin closes.
fn spawn_console(state: Arc<AppState>) -> anyhow::Result<()> {
    std::thread::Builder::new()
        .name("dread-console".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(command) = cli::parse_console_command(&line) else {
                    tracing::warn!(%line, "unrecognized console command");
                    continue;
                };
                if let Err(error) = state.send(command) {
                    tracing::debug!(%error, "console detached");
                    break;
                }
            }
        })?;
    Ok(())
}
