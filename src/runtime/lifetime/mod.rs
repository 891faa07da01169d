//! Application lifecycle: startup wiring and graceful shutdown

pub mod shutdown;
pub mod startup;

pub use startup::{StartupContext, prepare_server_startup};
