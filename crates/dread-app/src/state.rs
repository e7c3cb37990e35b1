//! State shared between the host and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use dread_core::commands::EncounterCommand;
use dread_core::state::EncounterSnapshot;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A command to forward to the encounter engine.
    Encounter(EncounterCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle to a running game loop.
///
/// `mpsc::Sender` is Send but not Sync, so it sits behind a `Mutex`.
pub struct AppState {
    pub command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    /// Latest snapshot, updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<EncounterSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a command to the game loop.
    pub fn send(&self, command: LoopCommand) -> anyhow::Result<()> {
        let guard = self
            .command_tx
            .lock()
            .map_err(|_| anyhow!("command channel lock poisoned"))?;
        let tx = guard
            .as_ref()
            .ok_or_else(|| anyhow!("game loop is not running"))?;
        tx.send(command)
            .map_err(|_| anyhow!("game loop has stopped"))
    }

    /// Clone of the most recent snapshot, if any tick has run.
    pub fn snapshot(&self) -> Option<EncounterSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }
}
