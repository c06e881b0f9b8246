//! Shared types for ERFX
//!
//! Configuration documents persisted by the host and the closed asset enums
//! (overlay variants and sound cues) used by the core, the renderer and the CLI.

pub mod assets;
pub mod formatting;
pub mod settings;

pub use assets::{AnimationVariant, AudioCue, BACKGROUND_ASSET};
pub use settings::{CombatIntroPolicy, DeathSfx, Settings, TriggerConfig};
