use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::event::{EventRecord, Payload};

/// Envelope tag holding the (by default anonymous) user id.
pub const USER_ID_TAG: &str = "ai.user.id";
/// Envelope tag holding the authenticated user context.
pub const AUTH_USER_ID_TAG: &str = "ai.user.authUserId";

/// Outgoing telemetry item as the backend is about to send it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub name: String,
    pub tags: HashMap<String, String>,
    pub properties: Payload,
}

impl Envelope {
    pub fn user_id(&self) -> Option<&str> {
        self.tags.get(USER_ID_TAG).map(String::as_str)
    }
}

/// Pre-send hook. May rewrite any part of the envelope.
pub type Interceptor = Box<dyn Fn(&mut Envelope)>;

/// Capability surface of the remote telemetry backend.
///
/// All calls are fire-and-forget. Delivery, batching and retries are the
/// implementor's business. Whether `register_interceptor` takes effect
/// immediately or is queued until the backend is ready is also decided
/// here, never by the caller.
pub trait TelemetrySink {
    fn setup(&self, instrumentation_key: &str);
    fn track_event(&self, name: &str, properties: &Payload);
    fn track_exception(&self, record: &EventRecord);
    fn set_authenticated_user_context(&self, user_id: &str);
    fn clear_authenticated_user_context(&self);
    fn register_interceptor(&self, interceptor: Interceptor);
}
