use std::collections::{BTreeMap, HashSet, VecDeque};

use super::event::{EventId, EventRecord};
use super::sink::{Envelope, AUTH_USER_ID_TAG};

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub total_events: u64,
    pub by_name: BTreeMap<String, u64>,
    pub playback: PlaybackStats,
    pub failures: FailureStats,
    pub sessions: SessionStats,
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackStats {
    pub plays: u64,
    pub pauses: u64,
    pub seeks: u64,
    pub stalls: u64,
    pub bitrate_changes: u64,
    pub completions: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FailureStats {
    pub errors: u64,
    pub download_failures: u64,
    pub exceptions: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub instances_created: u64,
    pub presentations: u64,
    pub distinct_users: u64,
}

impl TelemetrySnapshot {
    pub fn count(&self, id: EventId) -> u64 {
        self.by_name.get(id.as_str()).copied().unwrap_or(0)
    }
}

pub fn compute_snapshot(envelopes: &VecDeque<Envelope>, exceptions: &[EventRecord]) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut users: HashSet<&str> = HashSet::new();

    for envelope in envelopes {
        snap.total_events += 1;
        *snap.by_name.entry(envelope.name.clone()).or_insert(0) += 1;

        // Authenticated context only: the backend's anonymous id is not a user
        if let Some(user) = envelope.tags.get(AUTH_USER_ID_TAG) {
            users.insert(user.as_str());
        }

        // Names outside the record set are counted but not classified
        let Some(id) = EventId::parse(&envelope.name) else {
            continue;
        };
        match id {
            EventId::Play => snap.playback.plays += 1,
            EventId::Paused => snap.playback.pauses += 1,
            EventId::Seeking => snap.playback.seeks += 1,
            EventId::Waiting => snap.playback.stalls += 1,
            EventId::PlaybackBitrateChanged | EventId::DownloadBitrateChanged => {
                snap.playback.bitrate_changes += 1
            }
            EventId::Ended => snap.playback.completions += 1,
            EventId::Error => snap.failures.errors += 1,
            EventId::DownloadFailed => snap.failures.download_failures += 1,
            EventId::InstanceCreated => snap.sessions.instances_created += 1,
            EventId::PresentationInfo => snap.sessions.presentations += 1,
            EventId::Playing
            | EventId::Seeked
            | EventId::FullScreenChange
            | EventId::CanPlayThrough => {}
        }
    }

    snap.failures.exceptions = exceptions.len() as u64;
    snap.sessions.distinct_users = users.len() as u64;

    snap
}
