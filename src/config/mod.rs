pub mod fetcher_config;
pub mod toml_config;

pub use fetcher_config::FetcherConfig;
pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "buyback-contracts")]
#[command(about = "Fetch buyback contracts from the item configurator")]
pub struct CliConfig {
    /// Item configurator endpoint, e.g. https://configurator.example.com
    #[arg(long, env = "ITEM_CONFIGURATOR_SERVER_ADDRESS")]
    pub server_address: Option<String>,

    #[arg(long, env = "ITEM_CONFIGURATOR_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// Optional TOML file; flags and environment variables override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub max_attempts: Option<u32>,

    #[arg(long)]
    pub retry_delay_secs: Option<u64>,

    /// Per-request timeout applied by the HTTP client
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Deadline for the whole fetch, retries included
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Allow plaintext http:// endpoints")]
    pub insecure: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Merges the optional TOML file with flag and environment overrides.
    pub fn resolve(&self) -> Result<FetcherConfig> {
        let mut toml = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(address) = &self.server_address {
            toml.server.address = Some(address.clone());
        }
        if let Some(token) = &self.refresh_token {
            toml.server.refresh_token = Some(token.clone());
        }
        if let Some(timeout) = self.request_timeout_secs {
            toml.server.request_timeout_seconds = Some(timeout);
        }
        if self.insecure {
            toml.server.insecure = Some(true);
        }

        let retry = toml.retry.get_or_insert_with(Default::default);
        if let Some(max_attempts) = self.max_attempts {
            retry.max_attempts = Some(max_attempts);
        }
        if let Some(delay) = self.retry_delay_secs {
            retry.delay_seconds = Some(delay);
        }

        toml.into_fetcher_config()
    }
}
