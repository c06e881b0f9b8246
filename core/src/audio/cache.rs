//! Cue decoding and in-memory storage, independent of the output device.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, Source};

use erfx_types::AudioCue;

use super::AudioError;

/// A fully decoded sound held in memory for the process lifetime.
#[derive(Debug, Clone)]
pub(crate) struct CachedSound {
    channels: u16,
    sample_rate: u32,
    samples: Arc<[i16]>,
}

impl CachedSound {
    pub(crate) fn load(path: &Path) -> Result<Self, AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<i16> = decoder.collect();

        Ok(Self {
            channels,
            sample_rate,
            samples: samples.into(),
        })
    }

    /// Playable source sharing the decoded samples.
    pub(crate) fn source(&self) -> CueSource {
        CueSource {
            samples: Arc::clone(&self.samples),
            pos: 0,
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }
}

/// rodio source over a cached sample buffer
pub(crate) struct CueSource {
    samples: Arc<[i16]>,
    pos: usize,
    channels: u16,
    sample_rate: u32,
}

impl Iterator for CueSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        let sample = self.samples.get(self.pos).copied()?;
        self.pos += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl Source for CueSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.pos)
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let frames = self.samples.len() as u64 / u64::from(self.channels.max(1));
        Some(Duration::from_nanos(
            frames * 1_000_000_000 / u64::from(self.sample_rate.max(1)),
        ))
    }
}

/// Decoded cues keyed by cue
#[derive(Debug, Default)]
pub(crate) struct CueCache {
    sounds: HashMap<AudioCue, CachedSound>,
}

impl CueCache {
    /// Decode a single cue file into memory.
    pub(crate) fn load(&mut self, cue: AudioCue, path: &Path) -> Result<(), AudioError> {
        let sound = CachedSound::load(path)?;
        tracing::debug!(
            ?cue,
            path = %path.display(),
            channels = sound.channels,
            sample_rate = sound.sample_rate,
            "Loaded cue"
        );
        self.sounds.insert(cue, sound);
        Ok(())
    }

    /// Load every cue from `dir` by its asset file name.
    ///
    /// A cue that fails to load is logged and left silent; returns the
    /// number of cues loaded.
    pub(crate) fn load_dir(&mut self, dir: &Path) -> usize {
        let mut loaded = 0;
        for cue in AudioCue::ALL {
            let path = dir.join(cue.asset_file());
            match self.load(cue, &path) {
                Ok(()) => loaded += 1,
                Err(e) => tracing::error!(?cue, error = %e, "Failed to load cue"),
            }
        }
        loaded
    }

    pub(crate) fn get(&self, cue: AudioCue) -> Option<&CachedSound> {
        self.sounds.get(&cue)
    }

    pub(crate) fn contains(&self, cue: AudioCue) -> bool {
        self.sounds.contains_key(&cue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal 16-bit PCM WAV file.
    fn wav_bytes(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let block_align = channels * 2;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    const SAMPLES: [i16; 8] = [0, 1000, -1000, 2000, -2000, 3000, -3000, 0];

    fn write_cue(dir: &Path, cue: AudioCue) {
        std::fs::write(dir.join(cue.asset_file()), wav_bytes(2, 8000, &SAMPLES)).unwrap();
    }

    #[test]
    fn decodes_wav_into_memory() {
        let dir = tempfile::tempdir().unwrap();
        write_cue(dir.path(), AudioCue::Death);

        let sound = CachedSound::load(&dir.path().join(AudioCue::Death.asset_file())).unwrap();
        assert_eq!(sound.channels, 2);
        assert_eq!(sound.sample_rate, 8000);
        assert_eq!(sound.samples.len(), SAMPLES.len());
    }

    #[test]
    fn sources_share_samples_and_replay_from_start() {
        let dir = tempfile::tempdir().unwrap();
        write_cue(dir.path(), AudioCue::EnemyFelled);
        let sound = CachedSound::load(&dir.path().join(AudioCue::EnemyFelled.asset_file())).unwrap();

        let first: Vec<i16> = sound.source().collect();
        let second = sound.source();
        assert_eq!(first, SAMPLES);
        assert_eq!(second.current_frame_len(), Some(SAMPLES.len()));
        assert_eq!(second.total_duration(), Some(Duration::from_micros(500)));
        assert_eq!(Arc::strong_count(&sound.samples), 2);
    }

    #[test]
    fn missing_cue_only_silences_that_cue() {
        let dir = tempfile::tempdir().unwrap();
        for cue in [AudioCue::Death, AudioCue::MaleniaDeath, AudioCue::EnemyFelled] {
            write_cue(dir.path(), cue);
        }

        let mut cache = CueCache::default();
        assert_eq!(cache.load_dir(dir.path()), 3);
        assert!(cache.contains(AudioCue::Death));
        assert!(cache.get(AudioCue::EnemyFelled).is_some());
        assert!(!cache.contains(AudioCue::MaleniaIntro));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CachedSound::load(&dir.path().join("nope.wav")).unwrap_err();
        assert!(matches!(err, AudioError::Io { .. }));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AudioCue::Death.asset_file());
        std::fs::write(&path, b"definitely not audio").unwrap();

        let mut cache = CueCache::default();
        let err = cache.load(AudioCue::Death, &path).unwrap_err();
        assert!(matches!(err, AudioError::Decode { .. }));
        assert!(!cache.contains(AudioCue::Death));
    }
}
