//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub extractor: ExtractorConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backend service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base address of the summarize/scrape service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_gateway_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_gateway_timeout() -> u64 {
    60
}

/// Text extractor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum characters kept from an extraction. `0` disables truncation.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Leaf prefixes (case-insensitive) marking a speaker turn.
    #[serde(default = "default_speaker_prefixes")]
    pub speaker_prefixes: Vec<String>,

    /// Tags pruned in addition to the built-in skip set.
    #[serde(default)]
    pub extra_skip_tags: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            speaker_prefixes: default_speaker_prefixes(),
            extra_skip_tags: Vec::new(),
        }
    }
}

fn default_max_chars() -> usize {
    10_000
}

fn default_speaker_prefixes() -> Vec<String> {
    [
        "You said:",
        "ChatGPT said:",
        "Claude said:",
        "Gemini said:",
        "GenAI said:",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Router and tab messaging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Upper bound on waiting for a freshly bootstrapped listener.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// How long a sender waits for the single response to a request.
    #[serde(default = "default_response_timeout")]
    pub response_timeout_secs: u64,

    #[serde(default = "default_word_limit")]
    pub default_word_limit: u32,
}

impl RouterConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            response_timeout_secs: default_response_timeout(),
            default_word_limit: default_word_limit(),
        }
    }
}

fn default_settle_delay_ms() -> u64 {
    300
}

fn default_response_timeout() -> u64 {
    120
}

fn default_word_limit() -> u32 {
    200
}

/// Persisted state configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the persisted keys.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> String {
    "~/.carryover/state.json".to_string()
}
