//! Configuration loading and resolution.
//!
//! Each setting resolves as: explicit CLI value, then environment variable,
//! then the built-in default.

use std::sync::Arc;
use std::time::Duration;

use pagefetch::extract::{DEFAULT_MARKER, DEFAULT_RECORD_PATH, DEFAULT_SCRIPT_ID};
use pagefetch::{ExtractorConfig, ReqwestFetcher};

use crate::context::ToolContext;
use crate::types::McpResult;

pub const ENV_MARKER: &str = "PAGEFETCH_MARKER";
pub const ENV_SCRIPT_ID: &str = "PAGEFETCH_SCRIPT_ID";
pub const ENV_RECORD_PATH: &str = "PAGEFETCH_RECORD_PATH";
pub const ENV_TIMEOUT_SECS: &str = "PAGEFETCH_TIMEOUT_SECS";
pub const ENV_TOKEN: &str = "PAGEFETCH_TOKEN";

/// Values as given on the command line, before resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub marker: Option<String>,
    pub script_id: Option<String>,
    pub record_path: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub marker: String,
    pub script_id: String,
    pub record_path: String,
    pub timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            script_id: DEFAULT_SCRIPT_ID.to_string(),
            record_path: DEFAULT_RECORD_PATH.to_string(),
            timeout: None,
        }
    }
}

impl ServerConfig {
    pub fn resolve(overrides: &ConfigOverrides) -> Self {
        let timeout_secs = overrides.timeout_secs.or_else(|| {
            std::env::var(ENV_TIMEOUT_SECS)
                .ok()
                .and_then(|raw| parse_timeout_secs(&raw))
        });

        Self {
            marker: resolve_setting(overrides.marker.as_deref(), ENV_MARKER, DEFAULT_MARKER),
            script_id: resolve_setting(
                overrides.script_id.as_deref(),
                ENV_SCRIPT_ID,
                DEFAULT_SCRIPT_ID,
            ),
            record_path: resolve_setting(
                overrides.record_path.as_deref(),
                ENV_RECORD_PATH,
                DEFAULT_RECORD_PATH,
            ),
            timeout: timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        }
    }

    pub fn extractor(&self) -> McpResult<ExtractorConfig> {
        Ok(ExtractorConfig::new(
            &self.marker,
            &self.script_id,
            &self.record_path,
        )?)
    }

    pub fn build_context(&self) -> McpResult<ToolContext> {
        let fetcher = match self.timeout {
            Some(timeout) => ReqwestFetcher::with_timeout(timeout)?,
            None => ReqwestFetcher::new()?,
        };
        Ok(ToolContext::new(Arc::new(fetcher), self.extractor()?))
    }
}

/// Read a timeout from the environment. Garbage is ignored with a warning.
fn parse_timeout_secs(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(e) => {
            tracing::warn!("Ignoring {ENV_TIMEOUT_SECS}={raw:?}: {e}");
            None
        }
    }
}

/// Resolve one string setting.
pub fn resolve_setting(explicit: Option<&str>, env_key: &str, default: &str) -> String {
    if let Some(value) = explicit {
        return value.to_string();
    }

    if let Ok(value) = std::env::var(env_key) {
        if !value.trim().is_empty() {
            return value;
        }
    }

    default.to_string()
}
