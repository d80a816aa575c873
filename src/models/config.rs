//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_debounce_ms() -> u64 {
    500
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_session_idle_secs() -> u64 {
    60 * 60
}

fn default_assets_dir() -> String {
    "./assets".to_string()
}

/// What happens to unsaved claim drafts when a different event is selected.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DraftPolicy {
    /// Discard drafts of dishes outside the new selection.
    #[default]
    Reset,
    /// Keep every draft until it is saved.
    Preserve,
}

#[derive(Clone, Debug, Deserialize)]
/// Connection settings for the hosted table service.
pub struct RemoteConfig {
    /// Base URL of the service, e.g. `https://project.supabase.co`.
    pub url: String,
    /// Publishable access key sent with every request.
    pub api_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    pub secret: String,
    /// Quiet period after the last claim keystroke before the value is saved.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub draft_policy: DraftPolicy,
    /// A visitor's view state is dropped after this long without requests.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    pub remote: RemoteConfig,
}
