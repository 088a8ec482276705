use thiserror::Error;

use crate::constants::error_codes;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signing service error: {0}")]
    Signing(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("TLS configuration error: {0}")]
    Tls(String),
}

impl ProxyError {
    /// JSON-RPC error code reported to the client for this failure
    pub fn rpc_code(&self) -> i64 {
        match self {
            ProxyError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            _ => error_codes::INTERNAL_ERROR,
        }
    }
}

impl From<anyhow::Error> for ProxyError {
    fn from(err: anyhow::Error) -> Self {
        ProxyError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        ProxyError::Internal(format!("JSON error: {err}"))
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Internal(err.without_url().to_string())
    }
}
