//! rodio-backed cue player.
//!
//! rodio's `OutputStream` must stay on the thread that created it, so a
//! dedicated audio thread owns the stream and every active `Sink`. The public
//! handle talks to it over a channel and answers `is_playing` from atomics
//! without blocking.

use std::path::Path;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, Sink};

use erfx_types::AudioCue;

use super::cache::{CachedSound, CueCache};
use super::{AudioError, AudioPlayer, clamp_volume};

/// How often the audio thread prunes finished sinks
const PRUNE_INTERVAL: Duration = Duration::from_millis(25);

enum MixerCommand {
    Play(CachedSound),
    SetVolume(f32),
    Shutdown,
}

/// State shared between the handle and the audio thread
#[derive(Debug, Default)]
struct MixerStatus {
    /// Play commands sent but not yet picked up by the audio thread
    pending: AtomicUsize,
    /// Sinks still producing samples
    active: AtomicUsize,
}

impl MixerStatus {
    fn queued(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    /// A queued play never reached the audio thread.
    fn dropped(&self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }

    /// The audio thread handled a play command and now owns `active` sinks.
    ///
    /// The sink count is published before the pending mark is cleared so
    /// `is_busy` never sees a gap.
    fn started(&self, active: usize) {
        self.active.store(active, Ordering::SeqCst);
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }

    fn set_active(&self, active: usize) {
        self.active.store(active, Ordering::SeqCst);
    }

    fn is_busy(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0 || self.active.load(Ordering::SeqCst) > 0
    }
}

pub struct RodioPlayer {
    tx: mpsc::Sender<MixerCommand>,
    status: Arc<MixerStatus>,
    volume_bits: AtomicU32,
    cues: RwLock<CueCache>,
    thread: Option<JoinHandle<()>>,
}

impl RodioPlayer {
    /// Open the default output device on a new audio thread.
    pub fn new(volume: f32) -> Result<Self, AudioError> {
        let volume = clamp_volume(volume);
        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let status = Arc::new(MixerStatus::default());

        let thread_status = Arc::clone(&status);
        let thread = std::thread::Builder::new()
            .name("erfx-audio".to_string())
            .spawn(move || run_mixer(rx, thread_status, volume, ready_tx))
            .map_err(AudioError::Thread)?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => return Err(AudioError::Disconnected),
        }

        tracing::info!(volume, "Audio output opened");

        Ok(Self {
            tx,
            status,
            volume_bits: AtomicU32::new(volume.to_bits()),
            cues: RwLock::new(CueCache::default()),
            thread: Some(thread),
        })
    }

    /// Decode a single cue file into memory.
    pub fn load_cue(&self, cue: AudioCue, path: &Path) -> Result<(), AudioError> {
        self.cues
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .load(cue, path)
    }

    /// Load every cue from `dir` by its asset file name.
    ///
    /// A cue that fails to load is logged and left silent; returns the
    /// number of cues loaded.
    pub fn load_cues(&self, dir: &Path) -> usize {
        self.cues
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .load_dir(dir)
    }

    pub fn is_loaded(&self, cue: AudioCue) -> bool {
        self.cues
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(cue)
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(&self, cue: AudioCue) {
        let sound = {
            let cues = self.cues.read().unwrap_or_else(|e| e.into_inner());
            let Some(sound) = cues.get(cue) else {
                tracing::warn!(?cue, "Cue not loaded");
                return;
            };
            sound.clone()
        };

        self.status.queued();
        if self.tx.send(MixerCommand::Play(sound)).is_err() {
            self.status.dropped();
            tracing::error!(?cue, "Audio thread gone, cue dropped");
        }
    }

    fn is_playing(&self) -> bool {
        self.status.is_busy()
    }

    fn set_volume(&self, volume: f32) {
        let volume = clamp_volume(volume);
        self.volume_bits.store(volume.to_bits(), Ordering::Relaxed);
        if self.tx.send(MixerCommand::SetVolume(volume)).is_err() {
            tracing::error!("Audio thread gone, volume change dropped");
        }
    }

    fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        let _ = self.tx.send(MixerCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run_mixer(
    rx: mpsc::Receiver<MixerCommand>,
    status: Arc<MixerStatus>,
    mut volume: f32,
    ready: mpsc::SyncSender<Result<(), AudioError>>,
) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(e.into()));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    let mut sinks: Vec<Sink> = Vec::new();

    loop {
        match rx.recv_timeout(PRUNE_INTERVAL) {
            Ok(MixerCommand::Play(sound)) => {
                match Sink::try_new(&handle) {
                    Ok(sink) => {
                        sink.set_volume(volume);
                        sink.append(sound.source());
                        sinks.push(sink);
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to create sink"),
                }
                status.started(sinks.len());
            }
            Ok(MixerCommand::SetVolume(v)) => {
                volume = v;
                for sink in &sinks {
                    sink.set_volume(volume);
                }
            }
            Ok(MixerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        sinks.retain(|sink| !sink.empty());
        status.set_active(sinks.len());
    }

    tracing::debug!("Audio thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_play_counts_as_busy_until_its_sink_finishes() {
        let status = MixerStatus::default();
        assert!(!status.is_busy());

        status.queued();
        assert!(status.is_busy());

        status.started(1);
        assert!(status.is_busy());

        status.set_active(0);
        assert!(!status.is_busy());
    }

    #[test]
    fn dropped_or_failed_play_is_not_busy() {
        let status = MixerStatus::default();
        status.queued();
        status.dropped();
        assert!(!status.is_busy());

        // sink creation failed on the audio thread
        status.queued();
        status.started(0);
        assert!(!status.is_busy());
    }

    #[test]
    fn overlapping_plays_stay_busy_while_any_remain() {
        let status = MixerStatus::default();
        status.queued();
        status.queued();
        status.started(1);
        assert!(status.is_busy());
        status.started(2);
        status.set_active(1);
        assert!(status.is_busy());
        status.set_active(0);
        assert!(!status.is_busy());
    }
}
