//! State shared between the input reader, the run loop thread and `main`.

use std::sync::{Arc, Mutex};

use tacmap_core::commands::OperatorCommand;
use tacmap_core::state::TacticalSnapshot;

/// Commands sent to the run loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// An operator command to apply to the engine.
    Operator(OperatorCommand),
    /// Stop the run loop.
    Shutdown,
}

/// Latest snapshot, replaced by the run loop after every frame.
pub type SharedSnapshot = Arc<Mutex<Option<TacticalSnapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(None))
}
