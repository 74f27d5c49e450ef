//! # petsafe-dapp
//!
//! Connects a user's wallet and pays to open the PetSafe contract.
//!
//! The wallet is an explicitly passed [`provider::Host`] capability rather
//! than an ambient global, so the whole flow runs against a scripted wallet
//! in tests (`testing::FakeWallet`, behind the `test-utils` feature).

pub mod app;
pub mod capability;
pub mod config;
pub mod connector;
pub mod contract;
pub mod error;
pub mod invoker;
pub mod provider;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod view;

pub use app::{PendingOpen, PetSafeApp};
pub use config::DappConfig;
pub use error::{ConnectError, DappError, InvokeError};
pub use provider::{Host, ProviderError, WalletProvider};
pub use view::{AccountId, Action, View};

/// Installs a global fmt subscriber filtered by `RUST_LOG`. Safe to call
/// more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
