//! Service wiring
//!
//! [`TriggerService`] is the single object a host talks to: raw notifications
//! go in through [`TriggerService::on_host_event`], chat commands through
//! [`TriggerService::on_command`], and the render loop calls
//! [`TriggerService::draw`] once per frame.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::animator::{Clock, OverlayAnimator};
use crate::audio::AudioPlayer;
use crate::command::{self, CommandReply};
use crate::config::ConfigStore;
use crate::events::GameEvent;
use crate::probes::SfxEnabledProbe;
use crate::render::OverlayRenderer;
use crate::router::{RouterDeps, Scheduler, TriggerOutcome, TriggerRouter};
use crate::signal_processor::{
    ContentEncounterProbe, EventProcessor, HostEvent, TerritoryState,
};

/// Host-provided collaborators
pub struct ServiceDeps {
    pub config: Arc<dyn ConfigStore>,
    pub audio: Arc<dyn AudioPlayer>,
    pub clock: Arc<dyn Clock>,
    pub scheduler: Arc<dyn Scheduler>,
    pub sfx_probe: Arc<dyn SfxEnabledProbe>,
}

pub struct TriggerService {
    config: Arc<dyn ConfigStore>,
    audio: Arc<dyn AudioPlayer>,
    animator: Arc<OverlayAnimator>,
    router: TriggerRouter,
    processor: Mutex<EventProcessor>,
}

impl TriggerService {
    pub fn new(deps: ServiceDeps) -> Self {
        let territory = Arc::new(TerritoryState::new());
        let animator = Arc::new(OverlayAnimator::new(deps.clock));

        let router = TriggerRouter::new(RouterDeps {
            config: Arc::clone(&deps.config),
            audio: Arc::clone(&deps.audio),
            animator: Arc::clone(&animator),
            scheduler: deps.scheduler,
            sfx_probe: deps.sfx_probe,
            encounter_probe: Arc::new(ContentEncounterProbe::new(Arc::clone(&territory))),
        });

        Self {
            config: deps.config,
            audio: deps.audio,
            animator,
            router,
            processor: Mutex::new(EventProcessor::new(territory)),
        }
    }

    /// Replace the processor, e.g. to set a localized craft-failure text.
    ///
    /// The new processor is rebound to the territory the encounter probe reads
    /// and keeps the debug logging already applied from settings.
    pub fn with_processor(self, processor: EventProcessor) -> Self {
        let (territory, debug) = {
            let current = self.lock_processor();
            (Arc::clone(current.territory()), current.is_debug())
        };
        let mut processor = processor.with_territory(territory);
        processor.set_debug(debug);
        Self {
            processor: Mutex::new(processor),
            ..self
        }
    }

    fn lock_processor(&self) -> MutexGuard<'_, EventProcessor> {
        self.processor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Push the stored settings into the live collaborators.
    pub fn apply_settings(&self) {
        let settings = self.config.settings();
        let volume = settings.effective_volume();
        self.audio.set_volume(volume);
        self.lock_processor().set_debug(settings.debug);
        tracing::info!(volume, debug = settings.debug, "Settings applied");
    }

    /// Translate one host notification and route the resulting game event.
    pub fn on_host_event(&self, event: &HostEvent) -> Vec<TriggerOutcome> {
        let game_event = self.lock_processor().process(event);
        game_event
            .into_iter()
            .map(|event| self.router.handle(event))
            .collect()
    }

    /// Route an already-interpreted game event.
    pub fn on_game_event(&self, event: GameEvent) -> TriggerOutcome {
        self.router.handle(event)
    }

    /// Execute the arguments of an `/erfx` chat command.
    pub fn on_command(&self, args: &str) -> CommandReply {
        command::run(args, self.audio.as_ref(), self.config.as_ref())
    }

    /// Advance the animation and hand this frame to the renderer.
    pub fn draw(&self, renderer: &mut dyn OverlayRenderer) {
        let frame = self.animator.poll();
        if let Some(frame) = &frame {
            tracing::trace!(
                variant = ?frame.variant,
                phase = ?frame.phase,
                opacity = frame.opacity,
                scale = frame.scale,
                "Overlay frame"
            );
        }
        renderer.render(frame.as_ref());
    }

    pub fn animator(&self) -> &Arc<OverlayAnimator> {
        &self.animator
    }

    pub fn router(&self) -> &TriggerRouter {
        &self.router
    }

    pub fn config(&self) -> &Arc<dyn ConfigStore> {
        &self.config
    }
}
