use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use url::Url;

/// Default character budget for trimming conversation history
const DEFAULT_TRIM_BUDGET: usize = 120_000;

/// Upstream API configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model used when a chat request names none
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Deadline for the assistants list call (e.g. "20s")
    #[serde(default = "default_list_timeout", deserialize_with = "deserialize_duration")]
    pub list_timeout: Duration,
    /// Deadline for a completion call, or for stream initiation (e.g. "25s")
    #[serde(
        default = "default_completion_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub completion_timeout: Duration,
    /// Maximum total character count of forwarded conversation history
    #[serde(default = "default_trim_budget")]
    pub trim_budget: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            default_model: default_model(),
            list_timeout: default_list_timeout(),
            completion_timeout: default_completion_timeout(),
            trim_budget: default_trim_budget(),
        }
    }
}

fn default_model() -> String {
    "gpt-5".to_string()
}

const fn default_list_timeout() -> Duration {
    Duration::from_secs(20)
}

const fn default_completion_timeout() -> Duration {
    Duration::from_secs(25)
}

#[allow(clippy::missing_const_for_fn)]
fn default_trim_budget() -> usize {
    DEFAULT_TRIM_BUDGET
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{raw}': {e}")))
}
