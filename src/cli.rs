use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_MIRROR_HOST, DEFAULT_USER_AGENT, FetchConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the scrape endpoint over HTTP.
    Serve(ServeArgs),
    /// Scrape a single thread and print the cleaned JSON to stdout.
    Fetch(FetchArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    #[command(flatten)]
    pub upstream: UpstreamArgs,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Reddit thread URL.
    #[arg(long)]
    pub url: String,

    /// Pretty-print the output document.
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub upstream: UpstreamArgs,
}

#[derive(Debug, Clone, Args)]
pub struct UpstreamArgs {
    /// Host that reddit.com thread URLs are rewritten to.
    #[arg(long, default_value = DEFAULT_MIRROR_HOST, conflicts_with = "no_mirror")]
    pub mirror_host: String,

    /// Keep the host of the submitted URL.
    #[arg(long)]
    pub no_mirror: bool,

    /// User-Agent sent to Reddit.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Timeout for each fetch attempt.
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Delay between the first and second fetch attempt.
    #[arg(long, default_value_t = 1000)]
    pub retry_delay_ms: u64,
}

impl UpstreamArgs {
    pub fn to_config(&self) -> FetchConfig {
        let mirror_host = if self.no_mirror {
            None
        } else {
            Some(self.mirror_host.trim().to_owned()).filter(|host| !host.is_empty())
        };

        FetchConfig {
            mirror_host,
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}
