use crate::error::{config_error, env_error, PortalResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Spreadsheet-backed endpoint publishing the weekly events
pub const DEFAULT_FEED_URL: &str = "https://script.google.com/macros/s/AKfycbzHST8dAN9lWEAPzRiZ-B7CFE92AZntVhPYndbtAXNFEw6D3GDriLesygsYucTKhuVO/exec";

/// Default polling period for the events feed
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60_000;

/// Default timeout for a single feed request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Path of the optional components file
pub const COMPONENTS_FILE: &str = "config/components.toml";

/// Main configuration structure for the portal service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint returning `{ "eventos": [...] }`
    pub feed_url: String,
    /// Polling period in milliseconds
    pub refresh_interval_ms: u64,
    /// Timeout for one feed request in seconds
    pub request_timeout_secs: u64,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
}

impl Default for Config {
    fn default() -> Self {
        let mut components = HashMap::new();
        components.insert("weekly_events".to_string(), true);

        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            components,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> PortalResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::from_lookup(|name| env::var(name).ok())?;

        config.merge_components_file(COMPONENTS_FILE)?;

        Ok(config)
    }

    /// Merge the components file at `path`; a missing file leaves the map untouched
    pub fn merge_components_file(&mut self, path: impl AsRef<Path>) -> PortalResult<()> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        self.merge_components(&content)
    }

    /// Build configuration from a variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> PortalResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let feed_url = lookup("EVENTOS_FEED_URL").unwrap_or(defaults.feed_url);
        url::Url::parse(&feed_url)
            .map_err(|e| config_error(&format!("Invalid EVENTOS_FEED_URL '{}': {}", feed_url, e)))?;

        let refresh_interval_ms = parse_positive(
            &lookup,
            "EVENTOS_REFRESH_INTERVAL_MS",
            defaults.refresh_interval_ms,
        )?;

        let request_timeout_secs = parse_positive(
            &lookup,
            "EVENTOS_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout_secs,
        )?;

        Ok(Config {
            feed_url,
            refresh_interval_ms,
            request_timeout_secs,
            components: defaults.components,
        })
    }

    /// Merge a TOML table of `name = bool` entries into the component map
    pub fn merge_components(&mut self, content: &str) -> PortalResult<()> {
        let file_components = toml::from_str::<HashMap<String, bool>>(content)?;
        for (key, value) in file_components {
            self.components.insert(key, value);
        }
        Ok(())
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_positive<F>(lookup: &F, name: &str, default: u64) -> PortalResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) => Err(env_error(&format!("{} must be greater than zero", name))),
            Ok(value) => Ok(value),
            Err(_) => Err(env_error(&format!("Invalid {} format: '{}'", name, raw))),
        },
    }
}
