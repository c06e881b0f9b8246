//! Sound cue playback
//!
//! The router only ever asks for a cue by enum value and checks whether
//! anything is still playing. [`RodioPlayer`] is the real output backend;
//! [`NullPlayer`] stands in for muted or headless hosts.

mod cache;
mod mixer;

pub use mixer::RodioPlayer;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use erfx_types::AudioCue;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("failed to open audio output: {0}")]
    Stream(#[from] rodio::StreamError),

    #[error("failed to create playback sink: {0}")]
    Play(#[from] rodio::PlayError),

    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to spawn audio thread: {0}")]
    Thread(std::io::Error),

    #[error("audio thread is not running")]
    Disconnected,
}

/// Fire-and-forget cue playback mixed into one always-running output.
pub trait AudioPlayer: Send + Sync {
    /// Start playing a cue. Overlapping cues mix.
    fn play(&self, cue: AudioCue);

    /// True while at least one cue is still mixing
    fn is_playing(&self) -> bool;

    /// Set output volume, clamped to 0.0 - 1.0. Applies to cues already playing.
    fn set_volume(&self, volume: f32);

    fn volume(&self) -> f32;
}

/// Clamp a requested volume into range; non-finite values become silence.
pub(crate) fn clamp_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Player that never produces sound.
#[derive(Debug)]
pub struct NullPlayer {
    volume_bits: AtomicU32,
}

impl NullPlayer {
    pub fn new() -> Self {
        Self {
            volume_bits: AtomicU32::new(1.0f32.to_bits()),
        }
    }
}

impl Default for NullPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for NullPlayer {
    fn play(&self, cue: AudioCue) {
        tracing::debug!(?cue, "Audio muted, skipping cue");
    }

    fn is_playing(&self) -> bool {
        false
    }

    fn set_volume(&self, volume: f32) {
        self.volume_bits
            .store(clamp_volume(volume).to_bits(), Ordering::Relaxed);
    }

    fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_player_clamps_volume() {
        let player = NullPlayer::new();
        assert_eq!(player.volume(), 1.0);
        player.set_volume(0.42);
        assert_eq!(player.volume(), 0.42);
        player.set_volume(3.0);
        assert_eq!(player.volume(), 1.0);
        player.set_volume(f32::NAN);
        assert_eq!(player.volume(), 0.0);
    }

    #[test]
    fn null_player_is_never_busy() {
        let player = NullPlayer::new();
        player.play(AudioCue::Death);
        assert!(!player.is_playing());
    }
}
