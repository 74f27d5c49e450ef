use serde_json::json;
use tracing::{debug, info};

use crate::error::{ConnectError, DappError};
use crate::provider::Host;
use crate::view::{AccountId, Notifier};

/// Shown when the user asks to connect but no wallet is installed.
pub const INSTALL_WALLET_ALERT: &str = "Please install MetaMask!";

/// Asks the wallet to authorize accounts and returns the first one, as
/// reported.
///
/// Suspends while the user answers the wallet's prompt. With no wallet in
/// the host, the user is alerted and this returns
/// [`DappError::CapabilityAbsent`] without sending any request.
pub async fn connect(host: &Host, notifier: &dyn Notifier) -> Result<AccountId, ConnectError> {
    let Some(wallet) = host.wallet() else {
        notifier.alert(INSTALL_WALLET_ALERT);
        return Err(DappError::CapabilityAbsent);
    };

    debug!("requesting accounts");
    let response = wallet.request("eth_requestAccounts", json!([])).await?;
    let accounts: Vec<String> = serde_json::from_value(response)
        .map_err(|e| DappError::InvalidResponse(format!("eth_requestAccounts: {e}")))?;

    let first = accounts.into_iter().next().ok_or(DappError::NoAccounts)?;
    let account = AccountId::new(first);
    info!(%account, "found an account");
    Ok(account)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::provider::ProviderError;
    use crate::testing::{FakeWallet, RecordingNotifier, ALICE, BOB};

    #[tokio::test]
    async fn missing_wallet_alerts() {
        let notifier = RecordingNotifier::default();
        let result = connect(&Host::without_wallet(), &notifier).await;

        assert!(matches!(result, Err(DappError::CapabilityAbsent)));
        assert_eq!(notifier.alerts(), vec![INSTALL_WALLET_ALERT.to_string()]);
    }

    #[tokio::test]
    async fn returns_first_account() {
        let wallet = Arc::new(FakeWallet::new().with_accounts(&[BOB, ALICE]));
        let notifier = RecordingNotifier::default();

        let account = connect(&Host::with_wallet(wallet.clone()), &notifier).await.unwrap();

        assert_eq!(account.to_string(), BOB);
        assert_eq!(wallet.count("eth_requestAccounts"), 1);
        assert!(notifier.alerts().is_empty());
    }

    #[tokio::test]
    async fn rejection_is_surfaced() {
        let wallet = FakeWallet::new().fail_accounts(ProviderError::user_rejected());
        let notifier = RecordingNotifier::default();

        let result = connect(&Host::with_wallet(Arc::new(wallet)), &notifier).await;

        assert!(matches!(result, Err(DappError::UserRejected(_))));
        assert!(notifier.alerts().is_empty());
    }

    #[tokio::test]
    async fn empty_account_list_errors() {
        let wallet = FakeWallet::new().with_accounts(&[]);
        let result = connect(&Host::with_wallet(Arc::new(wallet)), &RecordingNotifier::default()).await;
        assert!(matches!(result, Err(DappError::NoAccounts)));
    }

    #[tokio::test]
    async fn account_is_returned_verbatim() {
        let wallet = FakeWallet::new().with_accounts(&["0xABC"]);
        let account = connect(&Host::with_wallet(Arc::new(wallet)), &RecordingNotifier::default()).await.unwrap();
        assert_eq!(account.as_str(), "0xABC");
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let wallet = FakeWallet::new().fail_accounts(ProviderError::Transport("offline".into()));
        let result = connect(&Host::with_wallet(Arc::new(wallet)), &RecordingNotifier::default()).await;
        assert!(matches!(result, Err(DappError::Transport(_))));
    }
}
