use std::rc::Rc;

use tracing::debug;

use crate::telemetry::event::EventRecord;
use crate::telemetry::sink::TelemetrySink;

/// The single forwarding path every record goes through.
///
/// Each record becomes one named event on the sink; `Error` records are
/// additionally reported as exceptions. No other per-event branching.
#[derive(Clone)]
pub struct Forwarder {
    sink: Rc<dyn TelemetrySink>,
}

impl Forwarder {
    pub fn new(sink: Rc<dyn TelemetrySink>) -> Self {
        Self { sink }
    }

    pub fn forward(&self, record: &EventRecord) {
        debug!(
            "[FORWARD] {} level={} user={}",
            record.event_id,
            record.severity.level(),
            record.field_str("currentUserIdentifier").unwrap_or("")
        );
        self.sink.track_event(record.event_id.as_str(), &record.payload);
        if record.is_error() {
            self.sink.track_exception(record);
        }
    }
}
