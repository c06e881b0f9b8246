pub mod animator;
pub mod audio;
pub mod command;
pub mod config;
pub mod events;
pub mod probes;
pub mod render;
pub mod router;
pub mod service;
pub mod signal_processor;

// Re-exports for convenience
pub use animator::{AnimationPhase, Clock, ManualClock, OverlayAnimator, RenderDescriptor, SystemClock};
pub use audio::{AudioError, AudioPlayer, NullPlayer, RodioPlayer};
pub use command::{Command, CommandError, CommandReply};
pub use config::{ConfigError, ConfigStore, FileConfigStore, MemoryConfigStore};
pub use events::GameEvent;
pub use probes::{EncounterProbe, FlagProbe, ProbeError, SfxEnabledProbe};
pub use render::OverlayRenderer;
pub use router::{
    ManualScheduler, RouteContext, Scheduler, TokioScheduler, TriggerOutcome, TriggerRouter, decide,
};
pub use service::{ServiceDeps, TriggerService};
pub use signal_processor::{EventProcessor, HostEvent};
