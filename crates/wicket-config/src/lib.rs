#![allow(clippy::must_use_candidate)]

mod env;
pub mod health;
mod loader;
pub mod server;
pub mod upstream;

use serde::Deserialize;

pub use health::HealthConfig;
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;

/// Top-level Wicket configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream API configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
}
