use crate::core::{
    BuybackContractsRep, BuybackContractsReq, ConfigProvider, ConnectionProvider, ItemConfigurator,
};
use crate::utils::error::{ContractError, Result, RpcError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const BUYBACK_CONTRACTS_PATH: &str = "/item_configurator.ItemConfigurator/BuybackContracts";

/// JSON-over-HTTP stub for the item configurator.
#[derive(Debug, Clone)]
pub struct HttpItemConfigurator {
    client: Client,
    endpoint: Url,
}

impl HttpItemConfigurator {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ItemConfigurator for HttpItemConfigurator {
    async fn buyback_contracts(
        &self,
        request: &BuybackContractsReq,
    ) -> std::result::Result<BuybackContractsRep, RpcError> {
        tracing::debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("BuybackContracts response status: {}", status);

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Failed to read {} response body: {}", status, e);
                    String::new()
                }
            };
            return Err(RpcError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<BuybackContractsRep>().await?)
    }
}

/// Builds [`HttpItemConfigurator`] stubs. TLS is required unless the provider
/// was created with [`HttpConnectionProvider::insecure`].
#[derive(Debug, Clone)]
pub struct HttpConnectionProvider {
    require_tls: bool,
    request_timeout: Option<Duration>,
}

impl Default for HttpConnectionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpConnectionProvider {
    pub fn new() -> Self {
        Self {
            require_tls: true,
            request_timeout: None,
        }
    }

    pub fn insecure() -> Self {
        Self {
            require_tls: false,
            request_timeout: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let provider = if config.allow_plaintext() {
            Self::insecure()
        } else {
            Self::new()
        };
        provider.with_request_timeout(config.request_timeout())
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn connection_failure(address: &str, reason: impl Into<String>) -> ContractError {
        ContractError::ConnectionFailure {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ConnectionProvider for HttpConnectionProvider {
    type Stub = HttpItemConfigurator;

    async fn connect(&self, address: &str) -> Result<Self::Stub> {
        let base = Url::parse(address)
            .map_err(|e| Self::connection_failure(address, format!("invalid address: {}", e)))?;

        match base.scheme() {
            "https" => {}
            "http" if !self.require_tls => {
                tracing::warn!("Connecting to {} without TLS", address);
            }
            scheme => {
                return Err(Self::connection_failure(
                    address,
                    format!("scheme '{}' is not allowed, a TLS endpoint is required", scheme),
                ))
            }
        }

        let endpoint = base
            .join(BUYBACK_CONTRACTS_PATH)
            .map_err(|e| Self::connection_failure(address, e.to_string()))?;

        let mut builder = Client::builder()
            .use_rustls_tls()
            .https_only(self.require_tls);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Self::connection_failure(address, e.to_string()))?;

        tracing::debug!("Item configurator stub ready for {}", endpoint);
        Ok(HttpItemConfigurator::new(client, endpoint))
    }
}
