//! Trigger routing
//!
//! Turns each [`GameEvent`] into at most one overlay request and at most one
//! sound cue, honouring the user's enable flags and avoiding stacked sounds:
//!
//! | event                  | gate                          | overlay        | cue                         |
//! |------------------------|-------------------------------|----------------|-----------------------------|
//! | PlayerDowned           | show_death                    | Death          | death_sfx, if host SFX on   |
//! | EnemyEncounterCleared  | show_enemy_felled (+1s delay) | EnemyFelled    | EnemyFelled, if not busy    |
//! | CraftingFailed         | show_craft_failed             | CraftFailed    | -                           |
//! | CombatEngaged          | show_combat_intro + qualifying| policy         | MaleniaIntro, if not busy   |
//! | BossIntroThreshold     | show_combat_intro, 5th counted| policy         | MaleniaIntro, if not busy   |
//! | EncounterReset         | -                             | -              | - (zeroes the epoch counter)|

mod scheduler;

pub use scheduler::{Job, ManualScheduler, Scheduler, TokioScheduler};

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use erfx_types::{AnimationVariant, AudioCue, TriggerConfig};

use crate::animator::OverlayAnimator;
use crate::audio::AudioPlayer;
use crate::config::ConfigStore;
use crate::events::GameEvent;
use crate::probes::{EncounterProbe, SfxEnabledProbe, fail_open};

/// Delay between a cleared encounter and its overlay/cue
pub const ENEMY_FELLED_DELAY: Duration = Duration::from_millis(1000);

/// Boss-intro music changes per epoch before the intro cue plays
pub const BOSS_INTRO_THRESHOLD: u32 = 5;

/// What a single `handle` call dispatched immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerOutcome {
    pub animation: Option<AnimationVariant>,
    pub audio: Option<AudioCue>,
    /// A delayed continuation was scheduled
    pub scheduled: bool,
}

impl TriggerOutcome {
    pub fn is_empty(&self) -> bool {
        self.animation.is_none() && self.audio.is_none() && !self.scheduled
    }
}

/// Collaborator answers `decide` needs, gathered by `TriggerRouter` per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteContext {
    pub sfx_enabled: bool,
    pub qualifying_encounter: bool,
    pub audio_busy: bool,
    /// Epoch count including this event; `None` when the event was not counted
    pub boss_intro_count: Option<u32>,
}

/// Routing table: what an event should dispatch under `config` and `ctx`.
///
/// Pure; `TriggerRouter::handle` gathers the context and performs the result.
pub fn decide(event: GameEvent, config: &TriggerConfig, ctx: &RouteContext) -> TriggerOutcome {
    match event {
        GameEvent::PlayerDowned if config.show_death => TriggerOutcome {
            animation: Some(AnimationVariant::Death),
            audio: ctx.sfx_enabled.then(|| config.death_sfx.cue()),
            scheduled: false,
        },
        GameEvent::EnemyEncounterCleared if config.show_enemy_felled => TriggerOutcome {
            scheduled: true,
            ..Default::default()
        },
        GameEvent::CraftingFailed if config.show_craft_failed => TriggerOutcome {
            animation: Some(AnimationVariant::CraftFailed),
            ..Default::default()
        },
        GameEvent::CombatEngaged if config.show_combat_intro && ctx.qualifying_encounter => {
            combat_intro(config, ctx)
        }
        GameEvent::BossIntroThreshold { repeat }
            if repeat >= 0
                && config.show_combat_intro
                && ctx.boss_intro_count == Some(BOSS_INTRO_THRESHOLD) =>
        {
            combat_intro(config, ctx)
        }
        _ => TriggerOutcome::default(),
    }
}

/// Intro cue (unless something is already playing) plus the optional overlay.
fn combat_intro(config: &TriggerConfig, ctx: &RouteContext) -> TriggerOutcome {
    TriggerOutcome {
        animation: config
            .combat_intro_policy
            .shows_overlay()
            .then_some(AnimationVariant::CombatIntro),
        audio: (!ctx.audio_busy).then_some(AudioCue::MaleniaIntro),
        scheduled: false,
    }
}

/// Collaborators the router dispatches to and consults.
pub struct RouterDeps {
    pub config: Arc<dyn ConfigStore>,
    pub audio: Arc<dyn AudioPlayer>,
    pub animator: Arc<OverlayAnimator>,
    pub scheduler: Arc<dyn Scheduler>,
    pub sfx_probe: Arc<dyn SfxEnabledProbe>,
    pub encounter_probe: Arc<dyn EncounterProbe>,
}

pub struct TriggerRouter {
    config: Arc<dyn ConfigStore>,
    audio: Arc<dyn AudioPlayer>,
    animator: Arc<OverlayAnimator>,
    scheduler: Arc<dyn Scheduler>,
    sfx_probe: Arc<dyn SfxEnabledProbe>,
    encounter_probe: Arc<dyn EncounterProbe>,
    /// Boss-intro occurrences in the current epoch
    boss_intro_count: AtomicU32,
}

impl TriggerRouter {
    pub fn new(deps: RouterDeps) -> Self {
        Self {
            config: deps.config,
            audio: deps.audio,
            animator: deps.animator,
            scheduler: deps.scheduler,
            sfx_probe: deps.sfx_probe,
            encounter_probe: deps.encounter_probe,
            boss_intro_count: AtomicU32::new(0),
        }
    }

    /// Handle an event against the current config snapshot.
    pub fn handle(&self, event: GameEvent) -> TriggerOutcome {
        let config = self.config.triggers();
        let ctx = self.prepare(event, &config);
        let outcome = decide(event, &config, &ctx);
        self.dispatch(&outcome);

        if !outcome.is_empty() {
            tracing::debug!(
                event = event.name(),
                animation = ?outcome.animation,
                audio = ?outcome.audio,
                scheduled = outcome.scheduled,
                "Trigger dispatched"
            );
        }
        outcome
    }

    /// Boss-intro occurrences counted in the current epoch
    pub fn boss_intro_count(&self) -> u32 {
        self.boss_intro_count.load(Ordering::SeqCst)
    }

    pub fn animator(&self) -> &Arc<OverlayAnimator> {
        &self.animator
    }

    /// Query only the collaborators this event needs and update the epoch counter.
    fn prepare(&self, event: GameEvent, config: &TriggerConfig) -> RouteContext {
        let mut ctx = RouteContext::default();
        match event {
            GameEvent::PlayerDowned if config.show_death => {
                ctx.sfx_enabled = fail_open("sfx_enabled", self.sfx_probe.sfx_enabled());
                if !ctx.sfx_enabled {
                    tracing::debug!("Host SFX disabled, death cue suppressed");
                }
            }
            GameEvent::CombatEngaged if config.show_combat_intro => {
                ctx.qualifying_encounter = fail_open(
                    "qualifying_encounter",
                    self.encounter_probe.is_qualifying_encounter(),
                );
                if ctx.qualifying_encounter {
                    ctx.audio_busy = self.audio_busy();
                }
            }
            GameEvent::BossIntroThreshold { repeat } if repeat < 0 => {
                tracing::warn!(repeat, "Ignoring boss intro event with invalid repeat count");
            }
            GameEvent::BossIntroThreshold { repeat } if config.show_combat_intro => {
                // Increment-then-compare in one atomic step so concurrent callbacks
                // cannot both observe the threshold.
                let count = self.boss_intro_count.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::trace!(count, repeat, "Boss intro counter");
                ctx.boss_intro_count = Some(count);
                if count == BOSS_INTRO_THRESHOLD {
                    ctx.audio_busy = self.audio_busy();
                }
            }
            GameEvent::EncounterReset => {
                let previous = self.boss_intro_count.swap(0, Ordering::SeqCst);
                tracing::debug!(previous, "Boss intro counter reset");
            }
            _ => {}
        }
        ctx
    }

    fn audio_busy(&self) -> bool {
        let busy = self.audio.is_playing();
        if busy {
            tracing::debug!("Audio busy, intro cue suppressed");
        }
        busy
    }

    fn dispatch(&self, outcome: &TriggerOutcome) {
        if let Some(variant) = outcome.animation {
            // A busy animator drops the request; that is the overlap policy, not an error.
            let _ = self.animator.request(variant);
        }
        if let Some(cue) = outcome.audio {
            self.audio.play(cue);
        }
        if outcome.scheduled {
            let animator = Arc::clone(&self.animator);
            let audio = Arc::clone(&self.audio);
            self.scheduler.schedule(
                ENEMY_FELLED_DELAY,
                Box::new(move || fire_enemy_felled(&animator, audio.as_ref())),
            );
        }
    }
}

/// Delayed half of `EnemyEncounterCleared`. Reads audio state at fire time.
fn fire_enemy_felled(animator: &OverlayAnimator, audio: &dyn AudioPlayer) {
    let accepted = animator.request(AnimationVariant::EnemyFelled).is_accepted();
    let played = if audio.is_playing() {
        false
    } else {
        audio.play(AudioCue::EnemyFelled);
        true
    };
    tracing::debug!(accepted, played, "Enemy felled trigger fired");
}
