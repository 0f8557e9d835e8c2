pub mod adapter;
pub mod demo;
pub mod player;
pub mod telemetry;

// Re-export specific items for convenient access
pub use adapter::{AdapterConfig, AdapterError, AdapterSettings, ConfigureOutcome, SetupPhase, TelemetryAdapter};
pub use telemetry::event::{EventId, EventRecord, Severity};
pub use telemetry::sink::TelemetrySink;
