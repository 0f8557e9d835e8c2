use std::rc::Rc;

use serde::Deserialize;

use super::error::AdapterError;
use crate::player::PlayerHandle;

pub const ENV_APP_NAME: &str = "AMP_DIAGNOSTICS_APP_NAME";
pub const ENV_INSTRUMENTATION_KEY: &str = "AMP_DIAGNOSTICS_INSTRUMENTATION_KEY";
pub const ENV_USER_AGENT: &str = "AMP_DIAGNOSTICS_USER_AGENT";

pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Plain settings, loadable from the environment or any serde source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdapterSettings {
    pub app_name: String,
    pub instrumentation_key: String,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl AdapterSettings {
    pub fn new(app_name: impl Into<String>, instrumentation_key: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            instrumentation_key: instrumentation_key.into(),
            user_agent: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Reads settings from `AMP_DIAGNOSTICS_*` variables. The user agent is optional.
    pub fn from_env() -> Result<Self, AdapterError> {
        let required = |key: &str| {
            std::env::var(key).map_err(|_| AdapterError::Env(format!("{} is not set", key)))
        };
        Ok(Self {
            app_name: required(ENV_APP_NAME)?,
            instrumentation_key: required(ENV_INSTRUMENTATION_KEY)?,
            user_agent: std::env::var(ENV_USER_AGENT).ok(),
        })
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn validate(&self) -> Result<(), AdapterError> {
        if self.app_name.trim().is_empty() {
            return Err(AdapterError::InvalidConfig("app_name is empty".to_string()));
        }
        if self.instrumentation_key.trim().is_empty() {
            return Err(AdapterError::InvalidConfig(
                "instrumentation_key is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything `initialize` needs. Immutable once handed over.
#[derive(Clone)]
pub struct AdapterConfig {
    pub settings: AdapterSettings,
    pub player: Rc<dyn PlayerHandle>,
}

impl AdapterConfig {
    pub fn new(settings: AdapterSettings, player: Rc<dyn PlayerHandle>) -> Self {
        Self { settings, player }
    }
}

impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
