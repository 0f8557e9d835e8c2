use std::rc::Rc;

use amp_diagnostics::adapter::config::{AdapterConfig, AdapterSettings};
use amp_diagnostics::adapter::TelemetryAdapter;
use amp_diagnostics::demo;
use amp_diagnostics::player::simulated::SimulatedPlayer;
use amp_diagnostics::player::PlayerHandle;
use amp_diagnostics::telemetry::recorder::RecordingSink;
use amp_diagnostics::telemetry::sink::TelemetrySink;
use anyhow::Context;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging/tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("AMP diagnostics demo starting...");

    let settings = AdapterSettings::from_env().unwrap_or_else(|e| {
        tracing::warn!("{}; falling back to demo settings", e);
        AdapterSettings::new("play-media-component", "00000000-0000-0000-0000-000000000000")
    });

    let player = Rc::new(
        SimulatedPlayer::new(demo::default_options())
            .with_audio_buffer()
            .with_video_buffer(),
    );
    let sink = Rc::new(RecordingSink::new());

    let adapter = TelemetryAdapter::new(sink.clone() as Rc<dyn TelemetrySink>);
    adapter
        .initialize(AdapterConfig::new(settings, player.clone() as Rc<dyn PlayerHandle>))
        .context("initializing telemetry adapter")?;

    demo::run(&adapter, &player, &demo::playlist(), Duration::from_millis(demo::TICK_MS)).await;

    let snap = sink.snapshot();
    tracing::info!(
        "Forwarded {} event(s) for {} user(s): plays={} stalls={} seeks={} completions={}",
        snap.total_events,
        snap.sessions.distinct_users,
        snap.playback.plays,
        snap.playback.stalls,
        snap.playback.seeks,
        snap.playback.completions,
    );
    tracing::info!(
        "Failures: errors={} download_failures={} exceptions={}",
        snap.failures.errors,
        snap.failures.download_failures,
        snap.failures.exceptions,
    );
    for (name, count) in &snap.by_name {
        println!("{:<24} {}", name, count);
    }

    Ok(())
}
