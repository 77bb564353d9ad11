use crate::config::fetcher_config::FetcherConfig;
use crate::core::retry::RetryPolicy;
use crate::utils::error::{ContractError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub retry: Option<RetryConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: Option<String>,
    pub refresh_token: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub insecure: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: Option<u32>,
    pub delay_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ContractError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ContractError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ITEM_CONFIGURATOR_REFRESH_TOKEN})
    ///
    /// Unset variables are left as-is so validation can report them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ContractError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        match &self.retry {
            Some(retry) => RetryPolicy {
                max_attempts: retry.max_attempts.unwrap_or(defaults.max_attempts),
                delay: retry
                    .delay_seconds
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.delay),
            },
            None => defaults,
        }
    }

    pub fn into_fetcher_config(self) -> Result<FetcherConfig> {
        let retry = self.retry_policy();
        let address = validate_required_field("server.address", &self.server.address)?;
        let refresh_token =
            validate_required_field("server.refresh_token", &self.server.refresh_token)?;

        Ok(FetcherConfig {
            server_address: address.clone(),
            refresh_token: refresh_token.clone(),
            retry,
            request_timeout: self.server.request_timeout_seconds.map(Duration::from_secs),
            insecure: self.server.insecure.unwrap_or(false),
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_fetcher_config()?.validate()
    }
}
