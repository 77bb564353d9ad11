use crate::core::retry::RetryPolicy;
use crate::core::ConfigProvider;
use crate::utils::error::{ContractError, Result};
use crate::utils::validation::{
    validate_no_placeholder, validate_non_empty_string, validate_range, validate_url, Validate,
};
use std::fmt;
use std::time::Duration;

pub const MAX_CONFIGURED_ATTEMPTS: u32 = 10;

/// Settings resolved once at startup and handed to the fetcher.
#[derive(Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    pub server_address: String,
    pub refresh_token: String,
    pub retry: RetryPolicy,
    pub request_timeout: Option<Duration>,
    /// Allow plaintext `http://` endpoints.
    pub insecure: bool,
}

impl FetcherConfig {
    pub fn new(server_address: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            refresh_token: refresh_token.into(),
            retry: RetryPolicy::default(),
            request_timeout: None,
            insecure: false,
        }
    }
}

// 不輸出 refresh token
impl fmt::Debug for FetcherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetcherConfig")
            .field("server_address", &self.server_address)
            .field("refresh_token", &"<redacted>")
            .field("retry", &self.retry)
            .field("request_timeout", &self.request_timeout)
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl ConfigProvider for FetcherConfig {
    fn server_address(&self) -> &str {
        &self.server_address
    }

    fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    fn allow_plaintext(&self) -> bool {
        self.insecure
    }
}

impl Validate for FetcherConfig {
    fn validate(&self) -> Result<()> {
        validate_url("server.address", &self.server_address)?;
        validate_no_placeholder("server.address", &self.server_address)?;

        validate_non_empty_string("server.refresh_token", &self.refresh_token).map_err(|_| {
            ContractError::MissingConfigError {
                field: "server.refresh_token".to_string(),
            }
        })?;
        validate_no_placeholder("server.refresh_token", &self.refresh_token)?;

        validate_range(
            "retry.max_attempts",
            self.retry.max_attempts,
            1,
            MAX_CONFIGURED_ATTEMPTS,
        )?;

        Ok(())
    }
}
