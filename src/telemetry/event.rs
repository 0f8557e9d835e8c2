use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured payload carried by every record.
pub type Payload = Map<String, Value>;

/// The closed set of record names the adapter ever forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventId {
    InstanceCreated,
    PresentationInfo,
    Error,
    DownloadFailed,
    PlaybackBitrateChanged,
    DownloadBitrateChanged,
    Play,
    Playing,
    Seeking,
    Seeked,
    Paused,
    Waiting,
    FullScreenChange,
    CanPlayThrough,
    Ended,
}

impl EventId {
    pub const ALL: [EventId; 15] = [
        EventId::InstanceCreated,
        EventId::PresentationInfo,
        EventId::Error,
        EventId::DownloadFailed,
        EventId::PlaybackBitrateChanged,
        EventId::DownloadBitrateChanged,
        EventId::Play,
        EventId::Playing,
        EventId::Seeking,
        EventId::Seeked,
        EventId::Paused,
        EventId::Waiting,
        EventId::FullScreenChange,
        EventId::CanPlayThrough,
        EventId::Ended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventId::InstanceCreated => "InstanceCreated",
            EventId::PresentationInfo => "PresentationInfo",
            EventId::Error => "Error",
            EventId::DownloadFailed => "DownloadFailed",
            EventId::PlaybackBitrateChanged => "PlaybackBitrateChanged",
            EventId::DownloadBitrateChanged => "DownloadBitrateChanged",
            EventId::Play => "Play",
            EventId::Playing => "Playing",
            EventId::Seeking => "Seeking",
            EventId::Seeked => "Seeked",
            EventId::Paused => "Paused",
            EventId::Waiting => "Waiting",
            EventId::FullScreenChange => "FullScreenChange",
            EventId::CanPlayThrough => "CanPlayThrough",
            EventId::Ended => "Ended",
        }
    }

    pub fn parse(name: &str) -> Option<EventId> {
        Self::ALL.iter().copied().find(|id| id.as_str() == name)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record severity. Serialized as the bare integer level (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Severity {
    /// Error or critical condition (level 0).
    Critical = 0,
    /// Informational (level 1).
    Informational = 1,
}

impl Severity {
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.level()
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Severity::Critical),
            1 => Ok(Severity::Informational),
            other => Err(format!("severity level out of range: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub event_id: EventId,
    pub severity: Severity,
    pub payload: Payload,
}

impl EventRecord {
    pub fn new(event_id: EventId, severity: Severity, payload: Payload) -> Self {
        Self {
            event_id,
            severity,
            payload,
        }
    }

    /// String field lookup, `None` when absent or not a string.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.event_id == EventId::Error
    }
}
