//! Overlay variants and sound cues, each mapped to the asset file it loads.

use serde::{Deserialize, Serialize};

/// Full-viewport backdrop drawn beneath every overlay variant.
pub const BACKGROUND_ASSET: &str = "er_death_bg.png";

/// Which foreground image an overlay animation shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationVariant {
    Death,
    CraftFailed,
    EnemyFelled,
    CombatIntro,
}

impl AnimationVariant {
    pub const ALL: [AnimationVariant; 4] = [
        AnimationVariant::Death,
        AnimationVariant::CraftFailed,
        AnimationVariant::EnemyFelled,
        AnimationVariant::CombatIntro,
    ];

    /// Foreground image file name
    pub fn asset_file(self) -> &'static str {
        match self {
            AnimationVariant::Death => "er_normal_death.png",
            AnimationVariant::CraftFailed => "er_craft_failed.png",
            AnimationVariant::EnemyFelled => "er_enemy_felled.png",
            AnimationVariant::CombatIntro => "er_combat_intro.png",
        }
    }
}

/// A pre-loaded sound asset playable on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    Death,
    MaleniaDeath,
    EnemyFelled,
    MaleniaIntro,
}

impl AudioCue {
    pub const ALL: [AudioCue; 4] = [
        AudioCue::Death,
        AudioCue::MaleniaDeath,
        AudioCue::EnemyFelled,
        AudioCue::MaleniaIntro,
    ];

    /// Sound file name
    pub fn asset_file(self) -> &'static str {
        match self {
            AudioCue::Death => "snd_death_er.wav",
            AudioCue::MaleniaDeath => "snd_malenia_death_er.wav",
            AudioCue::EnemyFelled => "snd_enemy_felled_er.wav",
            AudioCue::MaleniaIntro => "snd_malenia_intro_er.wav",
        }
    }
}
