use thiserror::Error;

use crate::provider::{ProviderError, ProviderErrorKind};

#[derive(Debug, Error)]
pub enum DappError {
    #[error("No wallet found in the host environment")]
    CapabilityAbsent,

    #[error("Request rejected by user: {0}")]
    UserRejected(String),

    #[error("Wallet transport error: {0}")]
    Transport(String),

    #[error("Transaction reverted: {0}")]
    ChainRevert(String),

    #[error("Wallet authorized no accounts")]
    NoAccounts,

    #[error("No account connected")]
    NotConnected,

    #[error("Invalid wallet response: {0}")]
    InvalidResponse(String),

    #[error("Timed out waiting for transaction {0}")]
    Timeout(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("Contract error: {0}")]
    Contract(#[from] chain_eth::error::EthError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("No async runtime available to run the call")]
    NoRuntime,
}

/// Failure of the account-authorization flow.
pub type ConnectError = DappError;

/// Failure of the contract-invocation flow.
pub type InvokeError = DappError;

impl From<ProviderError> for DappError {
    fn from(e: ProviderError) -> Self {
        match e.kind() {
            ProviderErrorKind::UserRejected => DappError::UserRejected(e.to_string()),
            ProviderErrorKind::Reverted => DappError::ChainRevert(e.to_string()),
            ProviderErrorKind::Other => DappError::Transport(e.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for DappError {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_cancelled() {
            DappError::Cancelled
        } else {
            DappError::Task(e.to_string())
        }
    }
}
