//! Host notification processing
//!
//! The host layer extracts raw notifications from the game (network control
//! packets, chat lines, condition flag changes). [`EventProcessor`] tracks the
//! little context needed to interpret them and emits [`GameEvent`]s for the
//! trigger router.
//!
//! [`GameEvent`]: crate::events::GameEvent

pub mod director;
mod processor;

pub use director::{ContentType, DirectorUpdate};
pub use processor::{
    ConditionFlag, ContentEncounterProbe, DEFAULT_CRAFT_FAILED_TEXT, EventProcessor, HostEvent,
    TerritoryState,
};
