use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{
    BufferData, BufferDataEventName, DownloadFailure, Listener, MediaError, PlayerEvent,
    PlayerEventName, PlayerHandle, PlayerOptions, ProtectionInfo, ReadyCallback,
};

pub const SIMULATED_AMP_VERSION: &str = "2.3.11";

/// Scriptable player. Listeners fire in registration order; callbacks may
/// register further listeners while an event is being dispatched.
pub struct SimulatedPlayer {
    listeners: RefCell<HashMap<PlayerEventName, Vec<Listener>>>,
    ready_callbacks: RefCell<Vec<ReadyCallback>>,
    is_ready: Cell<bool>,
    src: RefCell<String>,
    time: Cell<f64>,
    live: Cell<bool>,
    duration: Cell<f64>,
    tech: RefCell<String>,
    protection: RefCell<Vec<ProtectionInfo>>,
    error: RefCell<Option<MediaError>>,
    options: PlayerOptions,
    audio: RefCell<Option<Rc<SimulatedBuffer>>>,
    video: RefCell<Option<Rc<SimulatedBuffer>>>,
}

impl SimulatedPlayer {
    pub fn new(options: PlayerOptions) -> Self {
        Self {
            listeners: RefCell::new(HashMap::new()),
            ready_callbacks: RefCell::new(Vec::new()),
            is_ready: Cell::new(false),
            src: RefCell::new(String::new()),
            time: Cell::new(0.0),
            live: Cell::new(false),
            duration: Cell::new(0.0),
            tech: RefCell::new("azureHtml5JS".to_string()),
            protection: RefCell::new(Vec::new()),
            error: RefCell::new(None),
            options,
            audio: RefCell::new(None),
            video: RefCell::new(None),
        }
    }

    pub fn with_audio_buffer(self) -> Self {
        self.replace_audio_buffer();
        self
    }

    pub fn with_video_buffer(self) -> Self {
        self.replace_video_buffer();
        self
    }

    pub fn audio_buffer(&self) -> Option<Rc<SimulatedBuffer>> {
        self.audio.borrow().clone()
    }

    pub fn video_buffer(&self) -> Option<Rc<SimulatedBuffer>> {
        self.video.borrow().clone()
    }

    /// Hands out a fresh audio buffer object, as a tech switch would.
    pub fn replace_audio_buffer(&self) -> Rc<SimulatedBuffer> {
        let buffer = Rc::new(SimulatedBuffer::new());
        *self.audio.borrow_mut() = Some(buffer.clone());
        buffer
    }

    pub fn replace_video_buffer(&self) -> Rc<SimulatedBuffer> {
        let buffer = Rc::new(SimulatedBuffer::new());
        *self.video.borrow_mut() = Some(buffer.clone());
        buffer
    }

    /// Loads a new source and resets playback position.
    pub fn set_source(&self, src: &str, duration: f64) {
        *self.src.borrow_mut() = src.to_string();
        self.duration.set(duration);
        self.time.set(0.0);
        *self.error.borrow_mut() = None;
    }

    pub fn set_current_time(&self, time: f64) {
        self.time.set(time);
    }

    pub fn set_live(&self, live: bool) {
        self.live.set(live);
    }

    pub fn set_tech(&self, tech: &str) {
        *self.tech.borrow_mut() = tech.to_string();
    }

    pub fn set_protection(&self, protection: Vec<ProtectionInfo>) {
        *self.protection.borrow_mut() = protection;
    }

    pub fn listener_count(&self, name: PlayerEventName) -> usize {
        self.listeners.borrow().get(&name).map_or(0, Vec::len)
    }

    pub fn total_listener_count(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }

    pub fn pending_ready_callbacks(&self) -> usize {
        self.ready_callbacks.borrow().len()
    }

    /// Marks the player ready and drains queued ready callbacks.
    pub fn fire_ready(&self) {
        self.is_ready.set(true);
        let callbacks: Vec<ReadyCallback> = self.ready_callbacks.borrow_mut().drain(..).collect();
        for callback in callbacks {
            callback();
        }
    }

    pub fn fire(&self, name: PlayerEventName) {
        let event = PlayerEvent::new(name.as_str()).at(self.time.get());
        self.fire_event(name, &event);
    }

    pub fn fire_event(&self, name: PlayerEventName, event: &PlayerEvent) {
        // Snapshot first: a listener may attach more listeners mid-dispatch
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .get(&name)
            .cloned()
            .unwrap_or_default();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn fire_error(&self, error: Option<MediaError>) {
        *self.error.borrow_mut() = error;
        self.fire(PlayerEventName::Error);
    }
}

impl PlayerHandle for SimulatedPlayer {
    fn add_event_listener(&self, name: PlayerEventName, listener: Listener) {
        self.listeners.borrow_mut().entry(name).or_default().push(listener);
    }

    fn ready(&self, callback: ReadyCallback) {
        if self.is_ready.get() {
            callback();
        } else {
            self.ready_callbacks.borrow_mut().push(callback);
        }
    }

    fn current_src(&self) -> String {
        self.src.borrow().clone()
    }

    fn current_time(&self) -> f64 {
        self.time.get()
    }

    fn is_live(&self) -> bool {
        self.live.get()
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn current_tech_name(&self) -> String {
        self.tech.borrow().clone()
    }

    fn current_protection_info(&self) -> Vec<ProtectionInfo> {
        self.protection.borrow().clone()
    }

    fn error(&self) -> Option<MediaError> {
        self.error.borrow().clone()
    }

    fn options(&self) -> PlayerOptions {
        self.options.clone()
    }

    fn audio_buffer_data(&self) -> Option<Rc<dyn BufferData>> {
        self.audio_buffer().map(|b| b as Rc<dyn BufferData>)
    }

    fn video_buffer_data(&self) -> Option<Rc<dyn BufferData>> {
        self.video_buffer().map(|b| b as Rc<dyn BufferData>)
    }

    fn amp_version(&self) -> String {
        SIMULATED_AMP_VERSION.to_string()
    }
}

pub struct SimulatedBuffer {
    level: Cell<f64>,
    failure: RefCell<Option<DownloadFailure>>,
    listeners: RefCell<HashMap<BufferDataEventName, Vec<Listener>>>,
}

impl SimulatedBuffer {
    pub fn new() -> Self {
        Self {
            level: Cell::new(0.0),
            failure: RefCell::new(None),
            listeners: RefCell::new(HashMap::new()),
        }
    }

    pub fn set_level(&self, level: f64) {
        self.level.set(level);
    }

    pub fn listener_count(&self, name: BufferDataEventName) -> usize {
        self.listeners.borrow().get(&name).map_or(0, Vec::len)
    }

    /// Records `failure` as the latest failed download and notifies listeners.
    pub fn fail(&self, failure: DownloadFailure) {
        *self.failure.borrow_mut() = Some(failure);
        let event = PlayerEvent::new(BufferDataEventName::DownloadFailed.as_str());
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .get(&BufferDataEventName::DownloadFailed)
            .cloned()
            .unwrap_or_default();
        for listener in listeners {
            listener(&event);
        }
    }
}

impl Default for SimulatedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferData for SimulatedBuffer {
    fn buffer_level(&self) -> f64 {
        self.level.get()
    }

    fn download_failed(&self) -> Option<DownloadFailure> {
        self.failure.borrow().clone()
    }

    fn add_event_listener(&self, name: BufferDataEventName, listener: Listener) {
        self.listeners.borrow_mut().entry(name).or_default().push(listener);
    }
}
