//! Pure record builders: player state in, [`EventRecord`] out.

use serde_json::{json, Value};

use super::dispatch::Route;
use crate::player::{BufferData, PlayerEvent, PlayerHandle};
use crate::telemetry::event::{EventId, EventRecord, Payload, Severity};

pub const CLEAR_PROTECTION: &str = "clear";
pub const UNKNOWN_CODE: &str = "unknown";

/// Identity fields stamped onto every record.
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'a> {
    pub app_name: &'a str,
    pub user: &'a str,
    pub user_agent: &'a str,
}

/// `0x` + lowercase hex. A missing code still yields a reportable value.
pub fn format_error_code(code: Option<u32>) -> String {
    match code {
        Some(code) => format!("0x{:x}", code),
        None => UNKNOWN_CODE.to_string(),
    }
}

fn identity(ctx: &RecordContext<'_>) -> Payload {
    let mut payload = Payload::new();
    payload.insert("applicationName".into(), json!(ctx.app_name));
    payload.insert("currentUserIdentifier".into(), json!(ctx.user));
    payload
}

fn position(ctx: &RecordContext<'_>, player: &dyn PlayerHandle) -> Payload {
    let mut payload = identity(ctx);
    payload.insert("sessionId".into(), json!(player.current_src()));
    payload.insert("currentTime".into(), json!(player.current_time()));
    payload
}

pub fn instance_created(ctx: &RecordContext<'_>, player: &dyn PlayerHandle) -> EventRecord {
    let options = player.options();
    let tech_order = serde_json::to_string(&options.tech_order).unwrap_or_default();

    let mut payload = identity(ctx);
    payload.insert("ampVersion".into(), json!(player.amp_version()));
    payload.insert("userAgent".into(), json!(ctx.user_agent));
    payload.insert(
        "options".into(),
        json!({
            "autoplay": options.autoplay,
            "heuristicProfile": options.heuristic_profile,
            "techOrder": tech_order,
        }),
    );

    EventRecord::new(EventId::InstanceCreated, Severity::Informational, payload)
}

pub fn presentation_info(ctx: &RecordContext<'_>, player: &dyn PlayerHandle) -> EventRecord {
    let protection = player
        .current_protection_info()
        .into_iter()
        .next()
        .map(|p| p.kind)
        .unwrap_or_else(|| CLEAR_PROTECTION.to_string());

    let mut payload = identity(ctx);
    payload.insert("sessionId".into(), json!(player.current_src()));
    payload.insert("isLive".into(), json!(player.is_live()));
    payload.insert("duration".into(), json!(player.duration()));
    payload.insert("tech".into(), json!(player.current_tech_name()));
    payload.insert("protection".into(), json!(protection));

    EventRecord::new(EventId::PresentationInfo, Severity::Informational, payload)
}

pub fn error(ctx: &RecordContext<'_>, player: &dyn PlayerHandle) -> EventRecord {
    let err = player.error().unwrap_or_default();

    let mut payload = position(ctx, player);
    payload.insert("code".into(), json!(format_error_code(err.code)));
    payload.insert("message".into(), json!(err.message.unwrap_or_default()));

    EventRecord::new(EventId::Error, Severity::Critical, payload)
}

pub fn download_failed(
    ctx: &RecordContext<'_>,
    player: &dyn PlayerHandle,
    buffer: &dyn BufferData,
) -> EventRecord {
    let failure = buffer.download_failed().unwrap_or_default();

    let mut payload = position(ctx, player);
    payload.insert("bufferLevel".into(), json!(buffer.buffer_level()));
    payload.insert("url".into(), json!(failure.url().unwrap_or_default()));
    payload.insert("code".into(), json!(format_error_code(failure.code)));
    payload.insert(
        "message".into(),
        serde_json::to_value(&failure).unwrap_or(Value::Null),
    );

    EventRecord::new(EventId::DownloadFailed, Severity::Critical, payload)
}

pub fn playback(
    ctx: &RecordContext<'_>,
    player: &dyn PlayerHandle,
    route: &Route,
    event: &PlayerEvent,
) -> EventRecord {
    let mut payload = position(ctx, player);
    payload.insert("isLive".into(), json!(player.is_live()));
    payload.insert("event".into(), json!(event.kind));
    payload.insert(
        "presentationTimeInSec".into(),
        json!(event.presentation_time_in_sec),
    );
    payload.insert(
        "message".into(),
        json!(event.message.clone().unwrap_or_default()),
    );

    EventRecord::new(route.record, route.severity, payload)
}
