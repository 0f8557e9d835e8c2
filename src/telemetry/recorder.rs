use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use tracing::debug;
use uuid::Uuid;

use super::event::{EventRecord, Payload};
use super::metrics::{compute_snapshot, TelemetrySnapshot};
use super::sink::{Envelope, Interceptor, TelemetrySink, AUTH_USER_ID_TAG, USER_ID_TAG};

const MAX_ENVELOPES: usize = 10_000;

/// In-memory telemetry backend.
///
/// Behaves like a real backend client as far as the adapter can tell:
/// every envelope is tagged with an anonymous user id, the authenticated
/// user context is attached when set, and interceptors run before the
/// envelope is "sent" (appended to the buffer).
///
/// A sink created with [`RecordingSink::deferred`] models a backend whose
/// send pipeline is still loading: interceptors are queued and only take
/// effect once [`RecordingSink::mark_ready`] is called.
pub struct RecordingSink {
    anonymous_id: String,
    instrumentation_key: RefCell<Option<String>>,
    auth_user: RefCell<Option<String>>,
    ready: Cell<bool>,
    pending: RefCell<Vec<Interceptor>>,
    interceptors: RefCell<Vec<Interceptor>>,
    buffer: RefCell<VecDeque<Envelope>>,
    exceptions: RefCell<Vec<EventRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::with_readiness(true)
    }

    pub fn deferred() -> Self {
        Self::with_readiness(false)
    }

    fn with_readiness(ready: bool) -> Self {
        Self {
            anonymous_id: Uuid::new_v4().to_string(),
            instrumentation_key: RefCell::new(None),
            auth_user: RefCell::new(None),
            ready: Cell::new(ready),
            pending: RefCell::new(Vec::new()),
            interceptors: RefCell::new(Vec::new()),
            buffer: RefCell::new(VecDeque::with_capacity(64)),
            exceptions: RefCell::new(Vec::new()),
        }
    }

    /// Drains the readiness queue into the active interceptor chain.
    pub fn mark_ready(&self) {
        if self.ready.replace(true) {
            return;
        }
        let queued: Vec<Interceptor> = self.pending.borrow_mut().drain(..).collect();
        debug!("Telemetry backend ready, activating {} queued interceptor(s)", queued.len());
        self.interceptors.borrow_mut().extend(queued);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    pub fn anonymous_id(&self) -> &str {
        &self.anonymous_id
    }

    pub fn instrumentation_key(&self) -> Option<String> {
        self.instrumentation_key.borrow().clone()
    }

    pub fn authenticated_user(&self) -> Option<String> {
        self.auth_user.borrow().clone()
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.borrow().len()
    }

    pub fn pending_interceptor_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn envelopes(&self) -> Vec<Envelope> {
        self.buffer.borrow().iter().cloned().collect()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.buffer.borrow().iter().map(|e| e.name.clone()).collect()
    }

    pub fn exceptions(&self) -> Vec<EventRecord> {
        self.exceptions.borrow().clone()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.buffer.borrow(), &self.exceptions.borrow())
    }

    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
        self.exceptions.borrow_mut().clear();
    }

    fn push(&self, envelope: Envelope) {
        let mut buffer = self.buffer.borrow_mut();
        if buffer.len() >= MAX_ENVELOPES {
            buffer.pop_front();
        }
        buffer.push_back(envelope);
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySink for RecordingSink {
    fn setup(&self, instrumentation_key: &str) {
        debug!("Telemetry backend set up");
        *self.instrumentation_key.borrow_mut() = Some(instrumentation_key.to_string());
    }

    fn track_event(&self, name: &str, properties: &Payload) {
        let mut tags = HashMap::new();
        tags.insert(USER_ID_TAG.to_string(), self.anonymous_id.clone());
        if let Some(user) = self.auth_user.borrow().as_ref() {
            tags.insert(AUTH_USER_ID_TAG.to_string(), user.clone());
        }

        let mut envelope = Envelope {
            name: name.to_string(),
            tags,
            properties: properties.clone(),
        };
        for interceptor in self.interceptors.borrow().iter() {
            interceptor(&mut envelope);
        }

        debug!(
            "[ENVELOPE] {} user={}",
            envelope.name,
            envelope.user_id().unwrap_or("-")
        );
        self.push(envelope);
    }

    fn track_exception(&self, record: &EventRecord) {
        self.exceptions.borrow_mut().push(record.clone());
    }

    fn set_authenticated_user_context(&self, user_id: &str) {
        *self.auth_user.borrow_mut() = Some(user_id.to_string());
    }

    fn clear_authenticated_user_context(&self) {
        *self.auth_user.borrow_mut() = None;
    }

    fn register_interceptor(&self, interceptor: Interceptor) {
        if self.ready.get() {
            self.interceptors.borrow_mut().push(interceptor);
        } else {
            self.pending.borrow_mut().push(interceptor);
        }
    }
}
