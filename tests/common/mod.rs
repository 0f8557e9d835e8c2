#![allow(dead_code)]

use std::rc::Rc;

use amp_diagnostics::adapter::config::{AdapterConfig, AdapterSettings};
use amp_diagnostics::adapter::TelemetryAdapter;
use amp_diagnostics::player::simulated::SimulatedPlayer;
use amp_diagnostics::player::{PlayerHandle, PlayerOptions};
use amp_diagnostics::telemetry::recorder::RecordingSink;
use amp_diagnostics::telemetry::sink::{Envelope, TelemetrySink};

pub const APP_NAME: &str = "play-media-component";
pub const KEY: &str = "11111111-2222-3333-4444-555555555555";

pub struct Rig {
    pub player: Rc<SimulatedPlayer>,
    pub sink: Rc<RecordingSink>,
    pub adapter: TelemetryAdapter,
}

impl Rig {
    pub fn config(&self) -> AdapterConfig {
        AdapterConfig::new(settings(), self.player.clone() as Rc<dyn PlayerHandle>)
    }

    pub fn last(&self, name: &str) -> Envelope {
        self.sink
            .envelopes()
            .into_iter()
            .rev()
            .find(|e| e.name == name)
            .unwrap_or_else(|| panic!("no '{}' envelope recorded", name))
    }

    pub fn count(&self, name: &str) -> usize {
        self.sink.event_names().iter().filter(|n| n.as_str() == name).count()
    }
}

pub fn settings() -> AdapterSettings {
    AdapterSettings::new(APP_NAME, KEY).with_user_agent("test-agent/1.0")
}

pub fn options() -> PlayerOptions {
    PlayerOptions {
        autoplay: true,
        heuristic_profile: Some("QuickStart".to_string()),
        tech_order: vec!["azureHtml5JS".to_string(), "html5".to_string()],
    }
}

pub fn rig_with(player: SimulatedPlayer, sink: RecordingSink) -> Rig {
    let player = Rc::new(player);
    let sink = Rc::new(sink);
    let adapter = TelemetryAdapter::new(sink.clone() as Rc<dyn TelemetrySink>);
    Rig { player, sink, adapter }
}

/// Fresh, uninitialized adapter over a player with both buffers.
pub fn rig() -> Rig {
    rig_with(
        SimulatedPlayer::new(options()).with_audio_buffer().with_video_buffer(),
        RecordingSink::new(),
    )
}

/// Initialized adapter, session started for `user`, player ready and metadata loaded.
pub fn playing_rig(user: &str) -> Rig {
    let rig = rig();
    rig.player.set_source("//cdn.example.net/title.ism/manifest", 300.0);
    rig.adapter.initialize(rig.config()).expect("initialize");
    rig.adapter.log(user);
    rig.player.fire_ready();
    rig.player.fire(amp_diagnostics::player::PlayerEventName::LoadedMetadata);
    rig
}
