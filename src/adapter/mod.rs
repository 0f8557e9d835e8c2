//! Player event to telemetry adapter.
//!
//! `logger` owns the lifecycle (`initialize` / `log` / one-time `configure`)
//! and the staged listener tree. Records are built by the pure functions in
//! `records`, routed by the static table in `dispatch`, and handed to the
//! single `forward` path.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod forward;
pub mod logger;
pub mod records;
pub mod state;

pub use config::{AdapterConfig, AdapterSettings};
pub use error::AdapterError;
pub use logger::TelemetryAdapter;
pub use state::{ConfigureOutcome, SetupPhase};
