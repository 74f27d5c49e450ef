//! UI state and rendering.
//!
//! Exactly one action is rendered at a time, chosen solely by whether an
//! account is connected.

use std::fmt;

use alloy_primitives::Address;
use chain_eth::address;
use serde::Serialize;

use crate::error::DappError;

/// An account identifier authorized by the wallet, kept exactly as the
/// wallet reported it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(account: impl Into<String>) -> Self {
        Self(account.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the identifier as an address, for building transactions.
    pub fn address(&self) -> Result<Address, DappError> {
        address::parse_address(&self.0)
            .map_err(|e| DappError::InvalidResponse(format!("account {:?}: {e}", self.0)))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set once on successful authorization; there is no disconnect path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub current_account: Option<AccountId>,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        self.current_account.is_some()
    }
}

/// Everything the renderer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub connection: ConnectionState,
    /// Opens submitted but not yet confirmed, failed or cancelled.
    pub pending_opens: usize,
}

/// The single call-to-action on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ConnectWallet,
    OpenPetSafe,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::ConnectWallet => "Connect Wallet",
            Action::OpenPetSafe => "Open PetSafe",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Action::ConnectWallet => "cta-button connect-wallet-button",
            Action::OpenPetSafe => "cta-button mint-nft-button",
        }
    }
}

/// A rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub title: &'static str,
    pub action: Action,
    pub pending: bool,
}

impl View {
    pub fn render(state: &ViewState) -> Self {
        let action = if state.connection.is_connected() {
            Action::OpenPetSafe
        } else {
            Action::ConnectWallet
        };
        Self { title: "PetSafe", action, pending: state.pending_opens > 0 }
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div class='main-app'><h1>{}</h1><div><button class='{}'>{}</button></div>",
            self.title,
            self.action.class_name(),
            self.action.label()
        );
        if self.pending {
            html.push_str("<p class='pending'>Mining... please wait</p>");
        }
        html.push_str("</div>");
        html
    }
}

/// Blocking, user-facing notifications.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    fn connected() -> ViewState {
        ViewState {
            connection: ConnectionState { current_account: Some(AccountId::new(ALICE)) },
            pending_opens: 0,
        }
    }

    #[test]
    fn disconnected_renders_connect() {
        let view = View::render(&ViewState::default());
        assert_eq!(view.action, Action::ConnectWallet);
        assert!(!view.pending);
    }

    #[test]
    fn connected_renders_open() {
        assert_eq!(View::render(&connected()).action, Action::OpenPetSafe);
    }

    #[test]
    fn exactly_one_action_in_markup() {
        for state in [ViewState::default(), connected()] {
            let html = View::render(&state).to_html();
            let has_connect = html.contains(Action::ConnectWallet.label());
            let has_open = html.contains(Action::OpenPetSafe.label());
            assert!(has_connect ^ has_open, "{html}");
            assert_eq!(has_open, state.connection.is_connected());
        }
    }

    #[test]
    fn pending_indicator_rendered() {
        let mut state = connected();
        state.pending_opens = 2;
        let view = View::render(&state);
        assert!(view.pending);
        assert!(view.to_html().contains("class='pending'"));
    }

    #[test]
    fn markup_matches_layout() {
        let html = View::render(&ViewState::default()).to_html();
        assert_eq!(
            html,
            "<div class='main-app'><h1>PetSafe</h1><div>\
             <button class='cta-button connect-wallet-button'>Connect Wallet</button></div></div>"
        );
    }

    #[test]
    fn account_is_kept_as_reported() {
        let account = AccountId::new("0xABC");
        assert_eq!(account.as_str(), "0xABC");
        assert_eq!(account.to_string(), "0xABC");
    }

    #[test]
    fn short_account_renders_open() {
        let state = ViewState {
            connection: ConnectionState { current_account: Some(AccountId::new("0xABC")) },
            pending_opens: 0,
        };
        assert_eq!(View::render(&state).action, Action::OpenPetSafe);
    }

    #[test]
    fn account_reads_as_address() {
        let account = AccountId::new(ALICE.to_lowercase());
        assert_eq!(account.address().unwrap().to_checksum(None), ALICE);
        assert!(matches!(AccountId::new("0xABC").address(), Err(DappError::InvalidResponse(_))));
    }
}
