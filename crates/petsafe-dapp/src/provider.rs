//! The wallet capability: an EIP-1193 style request interface supplied by the
//! hosting environment.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// EIP-1193: the user rejected the request.
pub const USER_REJECTED: i64 = 4001;
/// EIP-1193: the requested account or method has not been authorized.
pub const UNAUTHORIZED: i64 = 4100;
/// EIP-1193: the provider does not support the method.
pub const UNSUPPORTED_METHOD: i64 = 4200;
/// EIP-1193: the provider is disconnected from all chains.
pub const DISCONNECTED: i64 = 4900;
/// EIP-1474 / geth: execution reverted.
pub const EXECUTION_REVERTED: i64 = 3;

/// A request-based RPC channel to a wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Issues `method` with positional `params`. May suspend for as long as
    /// the user takes to answer a wallet prompt.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String, data: Option<Value> },

    #[error("transport: {0}")]
    Transport(String),
}

/// Coarse classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    UserRejected,
    Reverted,
    Other,
}

impl ProviderError {
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc { code, message: message.into(), data: None }
    }

    pub fn user_rejected() -> Self {
        Self::rpc(USER_REJECTED, "User rejected the request.")
    }

    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::Rpc { code: USER_REJECTED, .. } => ProviderErrorKind::UserRejected,
            Self::Rpc { code: EXECUTION_REVERTED, .. } => ProviderErrorKind::Reverted,
            // Some nodes report reverts as a generic server error.
            Self::Rpc { message, .. } if message.contains("execution reverted") => {
                ProviderErrorKind::Reverted
            }
            _ => ProviderErrorKind::Other,
        }
    }
}

/// The hosting environment, which may or may not have injected a wallet.
#[derive(Clone, Default)]
pub struct Host {
    wallet: Option<Arc<dyn WalletProvider>>,
}

impl Host {
    /// A host with no wallet installed.
    pub fn without_wallet() -> Self {
        Self::default()
    }

    pub fn with_wallet(wallet: Arc<dyn WalletProvider>) -> Self {
        Self { wallet: Some(wallet) }
    }

    pub fn wallet(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.wallet.as_ref()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").field("wallet", &self.wallet.is_some()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_user_rejection() {
        assert_eq!(ProviderError::user_rejected().kind(), ProviderErrorKind::UserRejected);
    }

    #[test]
    fn classifies_reverts_by_code_and_message() {
        assert_eq!(ProviderError::rpc(EXECUTION_REVERTED, "reverted").kind(), ProviderErrorKind::Reverted);
        assert_eq!(
            ProviderError::rpc(-32000, "execution reverted: closed").kind(),
            ProviderErrorKind::Reverted
        );
    }

    #[test]
    fn everything_else_is_other() {
        assert_eq!(ProviderError::rpc(DISCONNECTED, "disconnected").kind(), ProviderErrorKind::Other);
        assert_eq!(ProviderError::rpc(UNAUTHORIZED, "unauthorized").kind(), ProviderErrorKind::Other);
        assert_eq!(ProviderError::Transport("socket closed".into()).kind(), ProviderErrorKind::Other);
    }

    #[test]
    fn display_rpc_error() {
        let err = ProviderError::rpc(UNSUPPORTED_METHOD, "method not supported");
        assert_eq!(err.to_string(), "method not supported (code 4200)");
    }

    #[test]
    fn host_debug_hides_wallet() {
        assert_eq!(format!("{:?}", Host::without_wallet()), "Host { wallet: false }");
    }
}
