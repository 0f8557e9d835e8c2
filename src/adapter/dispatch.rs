use crate::player::PlayerEventName;
use crate::telemetry::event::{EventId, Severity};

/// Routing for one steady-state player event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub event: PlayerEventName,
    pub record: EventId,
    pub severity: Severity,
}

const fn route(event: PlayerEventName, record: EventId, severity: Severity) -> Route {
    Route {
        event,
        record,
        severity,
    }
}

/// Listeners attached once metadata has loaded. Only `Waiting` is critical here.
pub static STEADY_STATE_ROUTES: [Route; 11] = [
    route(PlayerEventName::PlaybackBitrateChanged, EventId::PlaybackBitrateChanged, Severity::Informational),
    route(PlayerEventName::DownloadBitrateChanged, EventId::DownloadBitrateChanged, Severity::Informational),
    route(PlayerEventName::Play, EventId::Play, Severity::Informational),
    route(PlayerEventName::Playing, EventId::Playing, Severity::Informational),
    route(PlayerEventName::Seeking, EventId::Seeking, Severity::Informational),
    route(PlayerEventName::Seeked, EventId::Seeked, Severity::Informational),
    route(PlayerEventName::Pause, EventId::Paused, Severity::Informational),
    route(PlayerEventName::Waiting, EventId::Waiting, Severity::Critical),
    route(PlayerEventName::FullscreenChange, EventId::FullScreenChange, Severity::Informational),
    route(PlayerEventName::CanPlayThrough, EventId::CanPlayThrough, Severity::Informational),
    route(PlayerEventName::Ended, EventId::Ended, Severity::Informational),
];
