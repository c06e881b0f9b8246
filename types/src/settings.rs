//! User settings
//!
//! `Settings` is the document the host persists. Every field carries a serde
//! default so a partially written or older file still yields a complete
//! snapshot.

use serde::{Deserialize, Serialize};

use crate::assets::AudioCue;

/// Which sound plays when the player is downed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathSfx {
    Malenia,
    #[default]
    #[serde(alias = "old")]
    Classic,
}

impl DeathSfx {
    /// Cue played for this choice.
    pub fn cue(self) -> AudioCue {
        match self {
            DeathSfx::Malenia => AudioCue::MaleniaDeath,
            DeathSfx::Classic => AudioCue::Death,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeathSfx::Malenia => "Malenia",
            DeathSfx::Classic => "Old",
        }
    }
}

/// Whether combat start shows the `CombatIntro` overlay alongside its sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatIntroPolicy {
    #[default]
    AudioOnly,
    AudioAndOverlay,
}

impl CombatIntroPolicy {
    pub fn shows_overlay(self) -> bool {
        matches!(self, CombatIntroPolicy::AudioAndOverlay)
    }
}

/// Enable/disable flags read by the trigger router on every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub show_death: bool,
    pub show_enemy_felled: bool,
    pub show_craft_failed: bool,
    pub show_combat_intro: bool,
    pub death_sfx: DeathSfx,
    pub combat_intro_policy: CombatIntroPolicy,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            show_death: true,
            show_enemy_felled: true,
            show_craft_failed: true,
            show_combat_intro: true,
            death_sfx: DeathSfx::default(),
            combat_intro_policy: CombatIntroPolicy::default(),
        }
    }
}

/// Persisted settings document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    /// Output volume, 0.0 - 1.0
    pub volume: f32,
    /// Echo raw director updates into the log
    pub debug: bool,
    pub triggers: TriggerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 0,
            volume: 1.0,
            debug: false,
            triggers: TriggerConfig::default(),
        }
    }
}

impl Settings {
    /// Volume clamped into the valid range. Hand-edited files may hold anything.
    pub fn effective_volume(&self) -> f32 {
        if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}
