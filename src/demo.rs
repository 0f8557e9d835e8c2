//! Demo host: a playlist of titles played on a simulated player, one
//! scripted event per cadence tick, with the adapter observing.

use std::rc::Rc;

use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

use crate::adapter::TelemetryAdapter;
use crate::player::simulated::SimulatedPlayer;
use crate::player::{
    DownloadFailure, MediaDownload, MediaError, PlayerEventName, PlayerHandle, PlayerOptions,
};

pub const TICK_MS: u64 = 50;

const SAMPLE_URL: &str = "//amssamples.streaming.mediaservices.windows.net/91492735-c523-432b-ba01-faba6c2206a2/AzureMediaServicesPromo.ism/manifest";

#[derive(Debug, Clone, PartialEq)]
pub struct Mezzanine {
    pub id: String,
    pub title: String,
    pub url: String,
}

pub fn playlist() -> Vec<Mezzanine> {
    (1..=3)
        .map(|n| Mezzanine {
            id: format!("project-000-00{}", n),
            title: format!("Movie {}", n),
            url: SAMPLE_URL.to_string(),
        })
        .collect()
}

pub fn default_options() -> PlayerOptions {
    PlayerOptions {
        autoplay: true,
        heuristic_profile: Some("QuickStart".to_string()),
        tech_order: vec![
            "azureHtml5JS".to_string(),
            "flashSS".to_string(),
            "html5FairPlayHLSv3".to_string(),
            "silverlightSS".to_string(),
            "html5".to_string(),
        ],
    }
}

/// One scripted step of a playback session.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Ready,
    Event(PlayerEventName),
    Advance(f64),
    Error(MediaError),
    VideoDownloadFailed(DownloadFailure),
}

/// Happy-path session with one stall, one seek and a failed segment.
pub fn script(duration: f64) -> Vec<Step> {
    use PlayerEventName::*;
    vec![
        Step::Event(LoadedMetadata),
        Step::Event(CanPlayThrough),
        Step::Event(Play),
        Step::Event(Playing),
        Step::Advance(duration * 0.25),
        Step::Event(PlaybackBitrateChanged),
        Step::Event(Waiting),
        Step::VideoDownloadFailed(DownloadFailure {
            code: Some(0x0020_0101),
            message: Some("segment request timed out".to_string()),
            media_download: Some(MediaDownload {
                url: format!("{}/QualityLevels(1500000)/Fragments(video=0)", SAMPLE_URL),
            }),
        }),
        Step::Event(Playing),
        Step::Event(Seeking),
        Step::Advance(duration * 0.75),
        Step::Event(Seeked),
        Step::Event(Pause),
        Step::Event(Play),
        Step::Advance(duration),
        Step::Event(Ended),
    ]
}

pub fn apply(player: &SimulatedPlayer, step: &Step) {
    match step {
        Step::Ready => player.fire_ready(),
        Step::Event(name) => player.fire(*name),
        Step::Advance(time) => player.set_current_time(*time),
        Step::Error(error) => player.fire_error(Some(error.clone())),
        Step::VideoDownloadFailed(failure) => {
            if let Some(buffer) = player.video_buffer() {
                buffer.fail(failure.clone());
            }
        }
    }
}

/// Plays every title in order. The player becomes ready during the first
/// title; each title starts a new adapter session.
pub async fn run(
    adapter: &TelemetryAdapter,
    player: &Rc<SimulatedPlayer>,
    titles: &[Mezzanine],
    tick: Duration,
) {
    let mut cadence = interval(tick);
    cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);

    for (n, title) in titles.iter().enumerate() {
        info!("Now playing '{}' ({})", title.title, title.id);
        player.set_source(&title.url, 120.0);
        adapter.log(&title.id);

        let mut steps = script(player.duration());
        if n == 0 {
            steps.insert(0, Step::Ready);
        }
        for step in steps {
            cadence.tick().await;
            apply(player, &step);
        }
    }
}
