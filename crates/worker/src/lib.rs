//! Background batch jobs for the complaint platform.
//!
//! Currently hosts the stale-complaint reaper; the library surface exists so
//! the API server can trigger a one-off run from an operator endpoint.

pub mod config;
pub mod reaper;

pub use config::WorkerConfig;
pub use reaper::StaleReaper;
