pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpConnectionProvider, HttpItemConfigurator};
pub use config::{FetcherConfig, TomlConfig};
pub use core::{context::FetchContext, fetcher::ContractFetcher, retry::RetryPolicy};
pub use domain::model::{Contract, HashCode};
pub use utils::error::{ContractError, Result, RpcError};
