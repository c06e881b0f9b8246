//! Host state probes consulted by the trigger router.
//!
//! Probes may fail (the host state they read can be unavailable). Callers
//! treat a failure as "enabled" and log it; see [`fail_open`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("host state unavailable: {0}")]
    Unavailable(String),
}

/// Whether the host's own sound effects are switched on.
pub trait SfxEnabledProbe: Send + Sync {
    fn sfx_enabled(&self) -> Result<bool, ProbeError>;
}

/// Whether the current content counts as a qualifying encounter for the
/// combat-intro cue (e.g. an 8-player trial or raid).
pub trait EncounterProbe: Send + Sync {
    fn is_qualifying_encounter(&self) -> Result<bool, ProbeError>;
}

/// Resolve a probe result, treating failure as `true`.
pub fn fail_open(probe: &str, result: Result<bool, ProbeError>) -> bool {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(probe, error = %e, "Probe failed, assuming enabled");
            true
        }
    }
}

/// Probe backed by a flag the host flips.
#[derive(Debug, Clone)]
pub struct FlagProbe {
    flag: Arc<AtomicBool>,
}

impl FlagProbe {
    pub fn new(initial: bool) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(initial)),
        }
    }

    pub fn set(&self, value: bool) {
        self.flag.store(value, Ordering::SeqCst);
    }

    pub fn get(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl SfxEnabledProbe for FlagProbe {
    fn sfx_enabled(&self) -> Result<bool, ProbeError> {
        Ok(self.get())
    }
}

impl EncounterProbe for FlagProbe {
    fn is_qualifying_encounter(&self) -> Result<bool, ProbeError> {
        Ok(self.get())
    }
}
