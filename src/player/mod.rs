//! Capability surface of the media player the adapter observes.
//!
//! The player is owned by the host. The adapter only registers listeners
//! and reads state through [`PlayerHandle`].

pub mod simulated;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Callback invoked with the raw event the player emitted.
pub type Listener = Rc<dyn Fn(&PlayerEvent)>;

/// One-shot callback for the player's "ready" milestone.
pub type ReadyCallback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerEventName {
    LoadedMetadata,
    Error,
    PlaybackBitrateChanged,
    DownloadBitrateChanged,
    Play,
    Playing,
    Seeking,
    Seeked,
    Pause,
    Waiting,
    FullscreenChange,
    CanPlayThrough,
    Ended,
    /// Raised by the player but deliberately not observed by the adapter.
    TimeUpdate,
    /// Raised by the player but deliberately not observed by the adapter.
    VolumeChange,
}

impl PlayerEventName {
    /// Raw event type string as the player reports it.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerEventName::LoadedMetadata => "loadedmetadata",
            PlayerEventName::Error => "error",
            PlayerEventName::PlaybackBitrateChanged => "playbackbitratechanged",
            PlayerEventName::DownloadBitrateChanged => "downloadbitratechanged",
            PlayerEventName::Play => "play",
            PlayerEventName::Playing => "playing",
            PlayerEventName::Seeking => "seeking",
            PlayerEventName::Seeked => "seeked",
            PlayerEventName::Pause => "pause",
            PlayerEventName::Waiting => "waiting",
            PlayerEventName::FullscreenChange => "fullscreenchange",
            PlayerEventName::CanPlayThrough => "canplaythrough",
            PlayerEventName::Ended => "ended",
            PlayerEventName::TimeUpdate => "timeupdate",
            PlayerEventName::VolumeChange => "volumechange",
        }
    }
}

/// Events raised by a buffer-data object (one per audio/video stream).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferDataEventName {
    DownloadFailed,
}

impl BufferDataEventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            BufferDataEventName::DownloadFailed => "downloadfailed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEvent {
    /// Raw event type, e.g. `"playing"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub presentation_time_in_sec: Option<f64>,
    pub message: Option<String>,
}

impl PlayerEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            presentation_time_in_sec: None,
            message: None,
        }
    }

    pub fn at(mut self, presentation_time_in_sec: f64) -> Self {
        self.presentation_time_in_sec = Some(presentation_time_in_sec);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<PlayerEventName> for PlayerEvent {
    fn from(name: PlayerEventName) -> Self {
        PlayerEvent::new(name.as_str())
    }
}

/// Media error as exposed by the player. Either part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaError {
    pub code: Option<u32>,
    pub message: Option<String>,
}

impl MediaError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOptions {
    pub autoplay: bool,
    pub heuristic_profile: Option<String>,
    pub tech_order: Vec<String>,
}

/// Content protection descriptor (DRM system in use).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionInfo {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDownload {
    pub url: String,
}

/// Detail of the most recent failed segment download on a buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFailure {
    pub code: Option<u32>,
    pub message: Option<String>,
    pub media_download: Option<MediaDownload>,
}

impl DownloadFailure {
    pub fn url(&self) -> Option<&str> {
        self.media_download.as_ref().map(|d| d.url.as_str())
    }
}

/// Per-stream buffer state. Only present once the player has selected a tech.
pub trait BufferData {
    fn buffer_level(&self) -> f64;
    fn download_failed(&self) -> Option<DownloadFailure>;
    fn add_event_listener(&self, name: BufferDataEventName, listener: Listener);
}

pub trait PlayerHandle {
    fn add_event_listener(&self, name: PlayerEventName, listener: Listener);

    /// Runs `callback` once the player is ready, immediately if it already is.
    fn ready(&self, callback: ReadyCallback);

    fn current_src(&self) -> String;
    fn current_time(&self) -> f64;
    fn is_live(&self) -> bool;
    fn duration(&self) -> f64;
    fn current_tech_name(&self) -> String;
    fn current_protection_info(&self) -> Vec<ProtectionInfo>;
    fn error(&self) -> Option<MediaError>;
    fn options(&self) -> PlayerOptions;
    fn audio_buffer_data(&self) -> Option<Rc<dyn BufferData>>;
    fn video_buffer_data(&self) -> Option<Rc<dyn BufferData>>;
    fn amp_version(&self) -> String;
}
