use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use super::config::AdapterConfig;
use super::dispatch::{Route, STEADY_STATE_ROUTES};
use super::error::AdapterError;
use super::forward::Forwarder;
use super::records::{self, RecordContext};
use super::state::{AdapterState, ConfigureOutcome, SetupPhase, SetupRequest};
use crate::player::{BufferData, BufferDataEventName, Listener, PlayerEvent, PlayerEventName, PlayerHandle};
use crate::telemetry::event::EventRecord;
use crate::telemetry::sink::{Envelope, TelemetrySink, USER_ID_TAG};

/// Observes a player and forwards one [`EventRecord`] per lifecycle event
/// to the telemetry sink, tagged with the current user.
///
/// Call [`initialize`](Self::initialize) once the player exists, then
/// [`log`](Self::log) whenever a new session starts. The first `log` after
/// `initialize` wires the backend interceptor and the player's listener
/// tree; later calls only re-tag the user.
///
/// Listeners and the interceptor hold weak references: once the adapter is
/// dropped they go quiet.
pub struct TelemetryAdapter {
    inner: Rc<Inner>,
}

struct Inner {
    sink: Rc<dyn TelemetrySink>,
    state: RefCell<AdapterState>,
}

/// What a listener needs, copied out so no state borrow is held while the
/// player or sink is called.
struct Session {
    player: Rc<dyn PlayerHandle>,
    app_name: String,
    user_agent: String,
    user: String,
    forwarder: Forwarder,
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Audio,
    Video,
}

impl TelemetryAdapter {
    pub fn new(sink: Rc<dyn TelemetrySink>) -> Self {
        Self {
            inner: Rc::new(Inner {
                sink,
                state: RefCell::new(AdapterState::new()),
            }),
        }
    }

    /// Stores `config`, sets up the backend and builds the forwarding path.
    /// Attaches no player listeners.
    pub fn initialize(&self, config: AdapterConfig) -> Result<(), AdapterError> {
        if self.inner.state.borrow().is_initialized() {
            warn!("initialize called twice, keeping the first configuration");
            return Err(AdapterError::AlreadyInitialized);
        }
        config.settings.validate()?;

        self.inner.sink.setup(&config.settings.instrumentation_key);

        let mut state = self.inner.state.borrow_mut();
        state.forwarder = Some(Forwarder::new(self.inner.sink.clone()));
        info!("Telemetry adapter initialized for '{}'", config.settings.app_name);
        state.config = Some(config);
        state.advance(SetupRequest::Initialize);
        Ok(())
    }

    /// Starts a new session for `user`: re-tags the sink's user context,
    /// then runs the one-time [`configure`](Self::configure).
    pub fn log(&self, user: &str) -> ConfigureOutcome {
        self.inner.state.borrow_mut().current_user = user.to_string();
        self.inner.sink.clear_authenticated_user_context();
        self.inner.sink.set_authenticated_user_context(user);
        self.configure()
    }

    /// One-time wiring guard. Registers the user-id interceptor and the
    /// player's ready listener exactly once per adapter lifetime.
    pub fn configure(&self) -> ConfigureOutcome {
        let player = {
            let mut state = self.inner.state.borrow_mut();
            match state.phase {
                SetupPhase::Uninitialized => {
                    warn!("Please call initialize before log");
                    return ConfigureOutcome::NotInitialized;
                }
                SetupPhase::Configured => return ConfigureOutcome::AlreadyConfigured,
                SetupPhase::Initialized => {}
            }
            let Some(player) = state.config.as_ref().map(|c| c.player.clone()) else {
                return ConfigureOutcome::NotInitialized;
            };
            state.advance(SetupRequest::Configure);
            player
        };

        self.register_interceptor();

        // May run on_ready immediately if the player is already ready
        let weak = Rc::downgrade(&self.inner);
        player.ready(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                on_ready(&inner);
            }
        }));

        info!("Telemetry adapter configured");
        ConfigureOutcome::Configured
    }

    pub fn phase(&self) -> SetupPhase {
        self.inner.state.borrow().phase
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.state.borrow().is_initialized()
    }

    pub fn is_configured(&self) -> bool {
        self.inner.state.borrow().is_configured()
    }

    pub fn current_user(&self) -> String {
        self.inner.state.borrow().current_user.clone()
    }

    /// The backend tags envelopes with an anonymous id; replace it with the
    /// current session user.
    fn register_interceptor(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.sink.register_interceptor(Box::new(move |envelope: &mut Envelope| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Some(tag) = envelope.tags.get_mut(USER_ID_TAG) {
                if !tag.is_empty() {
                    *tag = inner.state.borrow().current_user.clone();
                }
            }
        }));
    }
}

impl Inner {
    fn session(&self) -> Option<Session> {
        let state = self.state.borrow();
        let config = state.config.as_ref()?;
        let forwarder = state.forwarder.clone()?;
        Some(Session {
            player: config.player.clone(),
            app_name: config.settings.app_name.clone(),
            user_agent: config.settings.user_agent().to_string(),
            user: state.current_user.clone(),
            forwarder,
        })
    }
}

impl Session {
    fn ctx(&self) -> RecordContext<'_> {
        RecordContext {
            app_name: &self.app_name,
            user: &self.user,
            user_agent: &self.user_agent,
        }
    }

    fn emit(&self, record: EventRecord) {
        self.forwarder.forward(&record);
    }
}

fn listener<F>(inner: &Rc<Inner>, handler: F) -> Listener
where
    F: Fn(&Rc<Inner>, &PlayerEvent) + 'static,
{
    let weak = Rc::downgrade(inner);
    Rc::new(move |event: &PlayerEvent| {
        if let Some(inner) = weak.upgrade() {
            handler(&inner, event);
        }
    })
}

/// Stage 1: player ready.
fn on_ready(inner: &Rc<Inner>) {
    let Some(session) = inner.session() else {
        return;
    };
    let player = session.player.as_ref();

    player.add_event_listener(
        PlayerEventName::LoadedMetadata,
        listener(inner, |inner, _| on_loaded_metadata(inner)),
    );
    player.add_event_listener(
        PlayerEventName::Error,
        listener(inner, |inner, _| on_error(inner)),
    );

    session.emit(records::instance_created(&session.ctx(), player));
}

/// Stage 2: metadata loaded. Attaches the steady-state listeners once and
/// a download-failed listener to every buffer object not yet seen.
fn on_loaded_metadata(inner: &Rc<Inner>) {
    let Some(session) = inner.session() else {
        return;
    };
    let player = session.player.as_ref();

    // Metadata reloads with every new source; the listener set must not grow
    let first_load = !std::mem::replace(&mut inner.state.borrow_mut().steady_state_attached, true);
    if first_load {
        attach_steady_state(inner, player);
    }

    // Buffers may appear or be replaced per source, so check on every load
    for stream in [Stream::Audio, Stream::Video] {
        attach_download_failed(inner, player, stream);
    }

    session.emit(records::presentation_info(&session.ctx(), player));
}

fn attach_steady_state(inner: &Rc<Inner>, player: &dyn PlayerHandle) {
    for route in STEADY_STATE_ROUTES.iter() {
        player.add_event_listener(
            route.event,
            listener(inner, move |inner, event| on_playback(inner, route, event)),
        );
    }
}

fn attach_download_failed(inner: &Rc<Inner>, player: &dyn PlayerHandle, stream: Stream) {
    let Some(buffer) = buffer_for(player, stream) else {
        debug!("No {:?} buffer data, skipping download-failed listener", stream);
        return;
    };

    {
        let mut state = inner.state.borrow_mut();
        let attached = match stream {
            Stream::Audio => &mut state.audio_buffer,
            Stream::Video => &mut state.video_buffer,
        };
        if attached.as_ref().is_some_and(|seen| same_buffer(seen, &buffer)) {
            return;
        }
        *attached = Some(buffer.clone());
    }

    // Weak: the buffer owns this listener
    let weak = Rc::downgrade(&buffer);
    buffer.add_event_listener(
        BufferDataEventName::DownloadFailed,
        listener(inner, move |inner, _| {
            if let Some(buffer) = weak.upgrade() {
                on_download_failed(inner, buffer.as_ref());
            }
        }),
    );
}

fn same_buffer(a: &Rc<dyn BufferData>, b: &Rc<dyn BufferData>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Stage 3: any steady-state event.
fn on_playback(inner: &Rc<Inner>, route: &Route, event: &PlayerEvent) {
    let Some(session) = inner.session() else {
        return;
    };
    session.emit(records::playback(&session.ctx(), session.player.as_ref(), route, event));
}

fn on_error(inner: &Rc<Inner>) {
    let Some(session) = inner.session() else {
        return;
    };
    session.emit(records::error(&session.ctx(), session.player.as_ref()));
}

fn on_download_failed(inner: &Rc<Inner>, buffer: &dyn BufferData) {
    let Some(session) = inner.session() else {
        return;
    };
    session.emit(records::download_failed(&session.ctx(), session.player.as_ref(), buffer));
}

fn buffer_for(player: &dyn PlayerHandle, stream: Stream) -> Option<Rc<dyn BufferData>> {
    match stream {
        Stream::Audio => player.audio_buffer_data(),
        Stream::Video => player.video_buffer_data(),
    }
}
