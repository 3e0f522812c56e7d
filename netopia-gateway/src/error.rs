//! Gateway error types.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur while preparing payments or processing
/// gateway callbacks.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("envelope error: {0}")]
    Crypto(#[from] netopia_crypto::CryptoError),

    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
