use crate::core::retry::RetryPolicy;
use crate::domain::model::{BuybackContractsRep, BuybackContractsReq};
use crate::utils::error::{Result, RpcError};
use async_trait::async_trait;
use std::time::Duration;

/// Callable stub for the remote item configurator service.
///
/// Implementations are shared by reference across attempts and must be safe to
/// call concurrently.
#[async_trait]
pub trait ItemConfigurator: Send + Sync {
    async fn buyback_contracts(
        &self,
        request: &BuybackContractsReq,
    ) -> std::result::Result<BuybackContractsRep, RpcError>;
}

/// Establishes a channel to a named endpoint and yields a connected stub.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    type Stub: ItemConfigurator;

    async fn connect(&self, address: &str) -> Result<Self::Stub>;
}

pub trait ConfigProvider: Send + Sync {
    fn server_address(&self) -> &str;
    fn refresh_token(&self) -> &str;
    fn retry_policy(&self) -> RetryPolicy;
    fn request_timeout(&self) -> Option<Duration>;
    /// Whether plaintext `http://` endpoints are accepted.
    fn allow_plaintext(&self) -> bool;
}
