mod common;

use amp_diagnostics::adapter::dispatch::{Route, STEADY_STATE_ROUTES};
use amp_diagnostics::adapter::records::{self, format_error_code, RecordContext};
use amp_diagnostics::adapter::state::{AdapterState, SetupGraph, SetupPhase, SetupRequest};
use amp_diagnostics::player::simulated::SimulatedPlayer;
use amp_diagnostics::player::{PlayerEvent, PlayerEventName};
use amp_diagnostics::telemetry::event::{EventId, EventRecord, Payload, Severity};
use common::options;
use std::collections::HashSet;

fn route_for(event: PlayerEventName) -> Option<&'static Route> {
    STEADY_STATE_ROUTES.iter().find(|r| r.event == event)
}

fn ctx() -> RecordContext<'static> {
    RecordContext {
        app_name: "app",
        user: "user-1",
        user_agent: "agent",
    }
}

#[test]
fn test_error_code_formatting() {
    assert_eq!(format_error_code(Some(0x1F)), "0x1f");
    assert_eq!(format_error_code(Some(0)), "0x0");
    assert_eq!(format_error_code(Some(0x0300_0001)), "0x3000001");
    assert_eq!(format_error_code(Some(u32::MAX)), "0xffffffff");
    assert_eq!(format_error_code(None), "unknown");
}

#[test]
fn test_steady_state_table() {
    let events: HashSet<PlayerEventName> = STEADY_STATE_ROUTES.iter().map(|r| r.event).collect();
    assert_eq!(events.len(), 11, "Every steady-state event is routed once");

    let critical: Vec<EventId> = STEADY_STATE_ROUTES
        .iter()
        .filter(|r| r.severity == Severity::Critical)
        .map(|r| r.record)
        .collect();
    assert_eq!(critical, vec![EventId::Waiting]);

    assert_eq!(route_for(PlayerEventName::Pause).map(|r| r.record), Some(EventId::Paused));
    assert!(route_for(PlayerEventName::LoadedMetadata).is_none());
    assert!(route_for(PlayerEventName::Error).is_none());
    assert!(route_for(PlayerEventName::TimeUpdate).is_none());
}

#[test]
fn test_event_ids_are_a_closed_set() {
    for id in EventId::ALL {
        assert_eq!(EventId::parse(id.as_str()), Some(id));
        assert_eq!(serde_json::to_value(id).unwrap(), id.as_str());
    }
    assert_eq!(EventId::parse("Pause"), None);
    assert_eq!(EventId::parse("Stalled"), None);

    for route in STEADY_STATE_ROUTES.iter() {
        assert!(EventId::ALL.contains(&route.record));
    }
}

#[test]
fn test_severity_is_level_zero_or_one() {
    assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "0");
    assert_eq!(serde_json::to_string(&Severity::Informational).unwrap(), "1");
    assert_eq!(serde_json::from_str::<Severity>("1").unwrap(), Severity::Informational);
    assert!(serde_json::from_str::<Severity>("2").is_err());
    assert!(Severity::try_from(7u8).is_err());
}

#[test]
fn test_record_serialization_shape() {
    let mut payload = Payload::new();
    payload.insert("applicationName".into(), "app".into());
    let record = EventRecord::new(EventId::Waiting, Severity::Critical, payload);

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["eventId"], "Waiting");
    assert_eq!(value["severity"], 0);
    assert_eq!(value["payload"]["applicationName"], "app");
    assert!(!record.is_error());
}

#[test]
fn test_builders_assign_fixed_ids_and_levels() {
    let player = SimulatedPlayer::new(options());

    let created = records::instance_created(&ctx(), &player);
    assert_eq!((created.event_id, created.severity), (EventId::InstanceCreated, Severity::Informational));

    let info = records::presentation_info(&ctx(), &player);
    assert_eq!((info.event_id, info.severity), (EventId::PresentationInfo, Severity::Informational));

    let error = records::error(&ctx(), &player);
    assert_eq!((error.event_id, error.severity), (EventId::Error, Severity::Critical));
    assert!(error.is_error());

    for record in [&created, &info, &error] {
        assert_eq!(record.field_str("applicationName"), Some("app"));
        assert_eq!(record.field_str("currentUserIdentifier"), Some("user-1"));
    }

    let waiting = route_for(PlayerEventName::Waiting).unwrap();
    let record = records::playback(&ctx(), &player, waiting, &PlayerEvent::new("waiting"));
    assert_eq!((record.event_id, record.severity), (EventId::Waiting, Severity::Critical));
    assert_eq!(record.field_str("event"), Some("waiting"));
}

#[test]
fn test_setup_graph_transitions() {
    use SetupPhase::*;
    use SetupRequest::*;

    assert_eq!(SetupGraph::transition(Uninitialized, Initialize), Some(Initialized));
    assert_eq!(SetupGraph::transition(Uninitialized, Configure), None);
    assert_eq!(SetupGraph::transition(Initialized, Configure), Some(Configured));
    assert_eq!(SetupGraph::transition(Initialized, Initialize), None);
    assert_eq!(SetupGraph::transition(Configured, Configure), None);
    assert_eq!(SetupGraph::transition(Configured, Initialize), None);

    let mut state = AdapterState::new();
    assert_eq!(state.advance(Configure), None);
    assert!(!state.is_initialized());
    assert_eq!(state.advance(Initialize), Some(Uninitialized));
    assert_eq!(state.advance(Configure), Some(Initialized));
    assert!(state.is_configured());
    assert_eq!(state.advance(Configure), None);
}
