use tracing::{info, warn};

use crate::provider::Host;

/// Reports whether the host environment provides a wallet. Has no effect
/// beyond a diagnostic line.
pub fn check_wallet_presence(host: &Host) -> bool {
    if host.wallet().is_some() {
        info!("wallet exists, good to go");
        true
    } else {
        warn!("make sure you have a wallet such as MetaMask installed");
        false
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::FakeWallet;

    #[test]
    fn absent_wallet_is_false() {
        assert!(!check_wallet_presence(&Host::without_wallet()));
    }

    #[test]
    fn present_wallet_is_true() {
        let host = Host::with_wallet(Arc::new(FakeWallet::new()));
        assert!(check_wallet_presence(&host));
    }

    #[test]
    fn repeated_checks_agree() {
        let hosts = [Host::without_wallet(), Host::with_wallet(Arc::new(FakeWallet::new()))];
        for host in &hosts {
            let first = check_wallet_presence(host);
            assert!((0..3).all(|_| check_wallet_presence(host) == first));
        }
    }

    #[test]
    fn check_issues_no_requests() {
        let wallet = Arc::new(FakeWallet::new());
        check_wallet_presence(&Host::with_wallet(wallet.clone()));
        assert!(wallet.requests().is_empty());
    }
}
