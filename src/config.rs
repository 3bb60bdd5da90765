//! Runtime configuration with environment overrides.
//!
//! Defaults target a local development setup; `ATESTA_*` variables override
//! them at load time. Empty or whitespace-only values are ignored rather
//! than clobbering a default. Configuration values are not secrets.

use std::{env, path::PathBuf, time::Duration};

/// Default identity-provider endpoint (local emulator port).
const DEFAULT_PROVIDER_URL: &str = "http://localhost:9099";
/// Default analysis/minting backend endpoint.
const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Session file name, placed under the home directory when available.
const SESSION_FILE_NAME: &str = "session.json";
/// Default deadline for provider calls, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client configuration assembled from defaults and environment overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub provider_base_url: String,
    pub api_base_url: String,
    pub session_path: PathBuf,
    pub call_timeout: Duration,
    pub demo_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider_base_url: DEFAULT_PROVIDER_URL.to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            session_path: default_session_path(),
            call_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            demo_mode: false,
        }
    }
}

impl AppConfig {
    /// Loads defaults and applies `ATESTA_*` environment overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        apply_env_overrides(&mut config, EnvOverrides::read());
        config
    }
}

#[derive(Default)]
struct EnvOverrides {
    provider_base_url: Option<String>,
    api_base_url: Option<String>,
    session_path: Option<String>,
    timeout_secs: Option<u64>,
    demo_mode: Option<bool>,
}

impl EnvOverrides {
    fn read() -> Self {
        Self {
            provider_base_url: read_env("ATESTA_PROVIDER_URL"),
            api_base_url: read_env("ATESTA_API_URL"),
            session_path: read_env("ATESTA_SESSION_FILE"),
            timeout_secs: read_env("ATESTA_TIMEOUT_SECS").and_then(|raw| raw.parse().ok()),
            demo_mode: read_env("ATESTA_DEMO_MODE").map(|raw| parse_bool(&raw)),
        }
    }
}

fn apply_env_overrides(config: &mut AppConfig, overrides: EnvOverrides) {
    if let Some(value) = overrides.provider_base_url {
        config.provider_base_url = value;
    }
    if let Some(value) = overrides.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = overrides.session_path {
        config.session_path = PathBuf::from(value);
    }
    if let Some(value) = overrides.timeout_secs {
        config.call_timeout = Duration::from_secs(value);
    }
    if let Some(value) = overrides.demo_mode {
        config.demo_mode = value;
    }
}

fn read_env(name: &str) -> Option<String> {
    env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn default_session_path() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".atesta").join(SESSION_FILE_NAME),
        None => PathBuf::from(SESSION_FILE_NAME),
    }
}
