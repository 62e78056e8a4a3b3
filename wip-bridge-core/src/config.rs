use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_LOOKBACK_MINUTES: i64 = 60;
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PRIVACY_MARKER: &str = "!private";
pub const DEFAULT_WIP_GRAPHQL_URL: &str = "https://wip.co/graphql";
pub const DEFAULT_TWITTER_API_URL: &str = "https://api.twitter.com";
pub const DEFAULT_TWITTER_UPLOAD_URL: &str = "https://upload.twitter.com";

pub const WIP_API_KEY: &str = "WIP_API_KEY";
pub const TWITTER_API_KEY: &str = "TWITTER_API_KEY";
pub const TWITTER_API_KEY_SECRET: &str = "TWITTER_API_KEY_SECRET";
pub const TWITTER_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const TWITTER_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";

/// Everything a run needs, constructed once at process start.
#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    pub credentials: Credentials,
    pub settings: Settings,
}

impl BridgeConfig {
    pub fn trace_loaded(&self) {
        info!(
            lookback_minutes = self.settings.lookback_minutes,
            connection_timeout_secs = self.settings.connection_timeout_secs,
            missing_credentials = self.credentials.missing().len(),
            "Loaded BridgeConfig"
        );
        debug!(?self, "BridgeConfig loaded (full debug)");
    }
}

/// Upstream and destination secrets. Blank means unset.
#[derive(Clone, Default)]
pub struct Credentials {
    pub wip_api_key: String,
    pub twitter_api_key: String,
    pub twitter_api_key_secret: String,
    pub twitter_access_token: String,
    pub twitter_access_token_secret: String,
}

impl Credentials {
    /// Names of the environment variables whose values are blank.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (WIP_API_KEY, &self.wip_api_key),
            (TWITTER_API_KEY, &self.twitter_api_key),
            (TWITTER_API_KEY_SECRET, &self.twitter_api_key_secret),
            (TWITTER_ACCESS_TOKEN, &self.twitter_access_token),
            (TWITTER_ACCESS_TOKEN_SECRET, &self.twitter_access_token_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("wip_api_key_len", &self.wip_api_key.len())
            .field("twitter_api_key_len", &self.twitter_api_key.len())
            .field("twitter_api_key_secret_len", &self.twitter_api_key_secret.len())
            .field("twitter_access_token_len", &self.twitter_access_token.len())
            .field(
                "twitter_access_token_secret_len",
                &self.twitter_access_token_secret.len(),
            )
            .finish()
    }
}

/// Tunables. Every field has a default so a partial YAML file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lookback_minutes: i64,
    pub connection_timeout_secs: u64,
    pub privacy_marker: String,
    pub wip_graphql_url: String,
    pub twitter_api_url: String,
    pub twitter_upload_url: String,
    /// Upper bound for a whole run; unset means no deadline beyond per-call timeouts.
    pub run_deadline_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lookback_minutes: DEFAULT_LOOKBACK_MINUTES,
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
            privacy_marker: DEFAULT_PRIVACY_MARKER.to_string(),
            wip_graphql_url: DEFAULT_WIP_GRAPHQL_URL.to_string(),
            twitter_api_url: DEFAULT_TWITTER_API_URL.to_string(),
            twitter_upload_url: DEFAULT_TWITTER_UPLOAD_URL.to_string(),
            run_deadline_secs: None,
        }
    }
}

impl Settings {
    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.lookback_minutes)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}
