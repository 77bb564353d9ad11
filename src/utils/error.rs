use thiserror::Error;

/// Failure reported by an RPC stub for a single call.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("RPC request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("RPC returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("RPC endpoint unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Failed to connect to {address}: {reason}")]
    ConnectionFailure { address: String, reason: String },

    #[error("Failed to get contracts after {attempts} attempt(s): {source}")]
    TransportFailure {
        attempts: u32,
        #[source]
        source: RpcError,
    },

    #[error("Contract #{index} ({hash_code}) is malformed: {reason}")]
    MalformedRecord {
        index: usize,
        hash_code: String,
        reason: String,
    },

    #[error("Fetch was cancelled")]
    Cancelled,

    #[error("Fetch deadline exceeded")]
    DeadlineExceeded,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Transport,
    Data,
    Interrupted,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ContractError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConnectionFailure { .. } => ErrorCategory::Connection,
            Self::TransportFailure { .. } => ErrorCategory::Transport,
            Self::MalformedRecord { .. } | Self::SerializationError(_) => ErrorCategory::Data,
            Self::Cancelled | Self::DeadlineExceeded => ErrorCategory::Interrupted,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    /// 嚴重程度決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        if let Self::DeadlineExceeded = self {
            return ErrorSeverity::Medium;
        }
        match self.category() {
            ErrorCategory::Interrupted => ErrorSeverity::Low,
            ErrorCategory::Transport | ErrorCategory::Connection => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ConnectionFailure { .. } => {
                "Check the server address and that the endpoint is reachable over TLS"
            }
            Self::TransportFailure { .. } => {
                "The item configurator did not answer; try again later"
            }
            Self::MalformedRecord { .. } => {
                "The service returned a contract without ESI details; report it to the service owner"
            }
            Self::Cancelled => "The fetch was interrupted; run it again when ready",
            Self::DeadlineExceeded => "Increase the timeout or retry when the service is less busy",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Fix the configuration file or the environment variables and retry"
            }
            Self::IoError(_) => "Check file permissions and paths",
            Self::SerializationError(_) => "The data could not be encoded as JSON",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::TransportFailure { attempts, .. } => {
                format!("Could not fetch buyback contracts after {} attempt(s)", attempts)
            }
            Self::MalformedRecord { index, hash_code, .. } => format!(
                "Contract #{} ({}) in the response is missing required data",
                index, hash_code
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContractError>;
