//! Access modes and the gate that serializes store access.

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

/// Controls whether concurrent handlers may interleave on the store.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// One handler at a time runs its whole load → mutate → save sequence.
    #[default]
    Serialized,
    /// No locking. Two concurrent writers can both read the same snapshot,
    /// hand out the same id, and the later save silently drops the earlier
    /// change. Only for reproducing the unlocked behaviour.
    Unsynchronized,
}

impl std::str::FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serialized" => Ok(AccessMode::Serialized),
            "unsynchronized" => Ok(AccessMode::Unsynchronized),
            other => Err(format!("unknown access mode `{other}`")),
        }
    }
}

/// Hands out turns on the store according to an [`AccessMode`].
pub struct AccessGate {
    mode: AccessMode,
    lock: Mutex<()>,
}

impl AccessGate {
    /// Gate for the given mode.
    pub fn new(mode: AccessMode) -> Self {
        Self {
            mode,
            lock: Mutex::new(()),
        }
    }

    /// Mode this gate was built with.
    #[must_use]
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Wait for a turn. Hold the returned guard until the store sequence is
    /// finished; it is `None` in unsynchronized mode.
    #[must_use]
    pub fn enter(&self) -> Option<MutexGuard<'_, ()>> {
        match self.mode {
            AccessMode::Serialized => Some(self.lock.lock()),
            AccessMode::Unsynchronized => None,
        }
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
