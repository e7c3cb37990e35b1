//! Command-line parsing for the headless runner.

use std::path::PathBuf;

use anyhow::{bail, Context};

use dread_core::commands::EncounterCommand;
use dread_core::enums::EncounterLayout;

use crate::game_loop::Pacing;
use crate::state::LoopCommand;

pub const USAGE: &str = "\
Usage: dread-app [options]

Options:
  --layout <graveyard|pumpkin-patch|reaper-lair>   Layout to load (default: graveyard)
  --config <path>                                  Encounter config JSON
  --seed <n>                                       Override the config seed
  --ticks <n>                                      Ticks to run (default: 900)
  --realtime                                       Pace the loop at 30Hz
  --no-script                                      Leave the target standing still
  -h, --help                                       Show this help

While running with --realtime, stdin accepts: pause, resume, key <id>, quit";

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub layout: EncounterLayout,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub ticks: u64,
    pub pacing: Pacing,
    pub scripted: bool,
    pub help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            layout: EncounterLayout::Graveyard,
            config: None,
            seed: None,
            ticks: 900,
            pacing: Pacing::Unpaced,
            scripted: true,
            help: false,
        }
    }
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--layout" => {
                let value = value_of(args, i)?;
                parsed.layout = parse_layout(value)
                    .with_context(|| format!("unknown layout: {value}"))?;
                i += 1;
            }
            "--config" => {
                parsed.config = Some(PathBuf::from(value_of(args, i)?));
                i += 1;
            }
            "--seed" => {
                let value = value_of(args, i)?;
                parsed.seed = Some(value.parse().with_context(|| format!("invalid seed: {value}"))?);
                i += 1;
            }
            "--ticks" => {
                let value = value_of(args, i)?;
                parsed.ticks = value
                    .parse()
                    .with_context(|| format!("invalid tick count: {value}"))?;
                i += 1;
            }
            "--realtime" => parsed.pacing = Pacing::RealTime,
            "--no-script" => parsed.scripted = false,
            "help" | "--help" | "-h" => parsed.help = true,
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }
    Ok(parsed)
}

pub fn parse_layout(name: &str) -> Option<EncounterLayout> {
    match name.to_ascii_lowercase().replace('_', "-").as_str() {
        "graveyard" => Some(EncounterLayout::Graveyard),
        "pumpkin-patch" | "pumpkins" => Some(EncounterLayout::PumpkinPatch),
        "reaper-lair" | "reaper" => Some(EncounterLayout::ReaperLair),
        _ => None,
    }
}

/// Parse one line typed on stdin while the loop runs.
pub fn parse_console_command(line: &str) -> Option<LoopCommand> {
    let mut words = line.split_whitespace();
    let command = match words.next()? {
        "pause" | "p" => LoopCommand::Encounter(EncounterCommand::Pause),
        "resume" | "r" => LoopCommand::Encounter(EncounterCommand::Resume),
        "key" => LoopCommand::Encounter(EncounterCommand::CollectKey {
            key_id: words.next()?.to_string(),
        }),
        "quit" | "q" | "exit" => LoopCommand::Shutdown,
        _ => return None,
    };
    Some(command)
}

fn value_of(args: &[String], flag_index: usize) -> anyhow::Result<&str> {
    match args.get(flag_index + 1) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} requires a value", args[flag_index]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let parsed = parse_args(&[]).unwrap();
        assert_eq!(parsed, CliArgs::default());
    }

    #[test]
    fn test_all_flags() {
        let parsed = parse_args(&args(&[
            "--layout",
            "reaper_lair",
            "--seed",
            "9",
            "--ticks",
            "60",
            "--config",
            "encounter.json",
            "--realtime",
            "--no-script",
        ]))
        .unwrap();
        assert_eq!(parsed.layout, EncounterLayout::ReaperLair);
        assert_eq!(parsed.seed, Some(9));
        assert_eq!(parsed.ticks, 60);
        assert_eq!(parsed.config, Some(PathBuf::from("encounter.json")));
        assert_eq!(parsed.pacing, Pacing::RealTime);
        assert!(!parsed.scripted);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_args(&args(&["--layout", "moon"])).is_err());
        assert!(parse_args(&args(&["--ticks"])).is_err());
        assert!(parse_args(&args(&["--seed", "-1"])).is_err());
        assert!(parse_args(&args(&["--fast"])).is_err());
    }

    #[test]
    fn test_console_commands() {
        assert!(matches!(
            parse_console_command("pause"),
            Some(LoopCommand::Encounter(EncounterCommand::Pause))
        ));
        assert!(matches!(
            parse_console_command("  r "),
            Some(LoopCommand::Encounter(EncounterCommand::Resume))
        ));
        assert!(matches!(
            parse_console_command("key crypt_gate"),
            Some(LoopCommand::Encounter(EncounterCommand::CollectKey { key_id })) if key_id == "crypt_gate"
        ));
        assert!(matches!(parse_console_command("quit"), Some(LoopCommand::Shutdown)));
        assert!(parse_console_command("key").is_none());
        assert!(parse_console_command("").is_none());
        assert!(parse_console_command("dance").is_none());
    }
}
