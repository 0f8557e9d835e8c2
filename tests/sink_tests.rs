mod common;

use amp_diagnostics::player::simulated::SimulatedPlayer;
use amp_diagnostics::player::PlayerEventName;
use amp_diagnostics::telemetry::event::{EventId, Payload};
use amp_diagnostics::telemetry::recorder::RecordingSink;
use amp_diagnostics::telemetry::sink::{TelemetrySink, AUTH_USER_ID_TAG, USER_ID_TAG};
use common::{options, rig_with};

#[test]
fn test_backend_tags_anonymous_user_by_default() {
    let sink = RecordingSink::new();
    sink.track_event("Custom", &Payload::new());

    let envelopes = sink.envelopes();
    let envelope = &envelopes[0];
    assert_eq!(envelope.user_id(), Some(sink.anonymous_id()));
    assert!(!envelope.tags.contains_key(AUTH_USER_ID_TAG));

    sink.set_authenticated_user_context("user-9");
    sink.track_event("Custom", &Payload::new());
    assert_eq!(sink.envelopes()[1].tags[AUTH_USER_ID_TAG], "user-9");

    sink.clear_authenticated_user_context();
    assert_eq!(sink.authenticated_user(), None);
}

#[test]
fn test_interceptor_deferred_until_backend_ready() {
    let rig = rig_with(SimulatedPlayer::new(options()), RecordingSink::deferred());
    rig.adapter.initialize(rig.config()).unwrap();
    rig.adapter.log("user-42");

    assert_eq!(rig.sink.interceptor_count(), 0);
    assert_eq!(rig.sink.pending_interceptor_count(), 1);

    // Sent before the backend is ready: still anonymous
    rig.player.fire_ready();
    let created = rig.last("InstanceCreated");
    assert_eq!(created.tags[USER_ID_TAG], rig.sink.anonymous_id());

    rig.sink.mark_ready();
    assert_eq!(rig.sink.interceptor_count(), 1);
    assert_eq!(rig.sink.pending_interceptor_count(), 0);

    rig.player.fire(PlayerEventName::LoadedMetadata);
    let info = rig.last("PresentationInfo");
    assert_eq!(info.tags[USER_ID_TAG], "user-42");
    assert_eq!(info.tags[AUTH_USER_ID_TAG], "user-42");

    // Marking ready again is a no-op
    rig.sink.mark_ready();
    assert_eq!(rig.sink.interceptor_count(), 1);

    // The anonymous id on the early envelope is not counted as a user
    assert_eq!(rig.sink.snapshot().sessions.distinct_users, 1);
}

#[test]
fn test_snapshot_summarizes_forwarded_records() {
    let rig = common::playing_rig("user-1");
    rig.player.fire(PlayerEventName::Play);
    rig.player.fire(PlayerEventName::Waiting);
    rig.player.fire(PlayerEventName::Seeking);
    rig.player.fire(PlayerEventName::Pause);
    rig.player.fire(PlayerEventName::Ended);
    rig.player.fire_error(None);

    rig.adapter.log("user-2");
    rig.player.fire(PlayerEventName::Play);

    let snap = rig.sink.snapshot();
    assert_eq!(snap.total_events, 9);
    assert_eq!(snap.playback.plays, 2);
    assert_eq!(snap.playback.stalls, 1);
    assert_eq!(snap.playback.seeks, 1);
    assert_eq!(snap.playback.pauses, 1);
    assert_eq!(snap.playback.completions, 1);
    assert_eq!(snap.failures.errors, 1);
    assert_eq!(snap.failures.exceptions, 1);
    assert_eq!(snap.sessions.instances_created, 1);
    assert_eq!(snap.sessions.presentations, 1);
    assert_eq!(snap.sessions.distinct_users, 2);
    assert_eq!(snap.count(EventId::Play), 2);

    rig.sink.clear();
    assert_eq!(rig.sink.snapshot().total_events, 0);
}
