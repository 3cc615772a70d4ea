use std::path::PathBuf;

use clap::Parser;

/// Wicket LLM gateway
#[derive(Debug, Parser)]
#[command(name = "wicket", about = "Minimal HTTP gateway for an upstream LLM API")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "wicket.toml", env = "WICKET_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "WICKET_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
