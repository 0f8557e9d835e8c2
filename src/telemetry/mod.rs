//! Telemetry records and the backend they are forwarded to.
//!
//! `event` is the record contract every forwarded item conforms to.
//! `sink` is the capability surface of the remote backend; `recorder`
//! is an in-memory implementation of it, summarized by `metrics`.

pub mod event;
pub mod metrics;
pub mod recorder;
pub mod sink;
