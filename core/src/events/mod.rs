pub mod signal;

pub use signal::GameEvent;
