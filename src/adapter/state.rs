use std::rc::Rc;

use super::config::AdapterConfig;
use super::forward::Forwarder;
use crate::player::BufferData;

/// One-time setup lifecycle of the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SetupPhase {
    /// No configuration yet. Nothing can be wired.
    #[default]
    Uninitialized,
    /// Configuration stored and backend set up, no interceptor or listeners yet.
    Initialized,
    /// Interceptor registered and the player's ready listener attached. Terminal.
    Configured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupRequest {
    Initialize,
    Configure,
}

/// Result of a `configure` (or `log`) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// `initialize` has not run; nothing was wired.
    NotInitialized,
    /// This call performed the one-time wiring.
    Configured,
    /// Wiring happened on an earlier call; nothing was done.
    AlreadyConfigured,
}

pub struct SetupGraph;

impl SetupGraph {
    /// Pure function: (Current Phase, Request) -> New Phase.
    /// Returns None if the request is not allowed from `current`.
    pub fn transition(current: SetupPhase, request: SetupRequest) -> Option<SetupPhase> {
        use SetupPhase::*;
        use SetupRequest::*;

        match (current, request) {
            (Uninitialized, Initialize) => Some(Initialized),
            (Initialized, Configure) => Some(Configured),
            _ => None,
        }
    }
}

/// Mutable adapter state. Written only by `initialize`, `log` and `configure`.
#[derive(Default)]
pub struct AdapterState {
    pub phase: SetupPhase,
    pub config: Option<AdapterConfig>,
    pub current_user: String,
    pub forwarder: Option<Forwarder>,
    /// Steady-state listeners are attached on the first metadata load only.
    pub steady_state_attached: bool,
    /// Buffer objects currently carrying a download-failed listener.
    pub audio_buffer: Option<Rc<dyn BufferData>>,
    pub video_buffer: Option<Rc<dyn BufferData>>,
}

impl AdapterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.phase != SetupPhase::Uninitialized
    }

    pub fn is_configured(&self) -> bool {
        self.phase == SetupPhase::Configured
    }

    /// Applies `request`, returning the phase left behind on success.
    pub fn advance(&mut self, request: SetupRequest) -> Option<SetupPhase> {
        let next = SetupGraph::transition(self.phase, request)?;
        Some(std::mem::replace(&mut self.phase, next))
    }
}
