use std::sync::{Arc, OnceLock};

use chain_eth::transaction::TransactionReceipt;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::capability::check_wallet_presence;
use crate::config::DappConfig;
use crate::connector::connect;
use crate::error::{ConnectError, DappError, InvokeError};
use crate::invoker::{invoke, OpenTarget};
use crate::provider::Host;
use crate::view::{AccountId, Notifier, View, ViewState};

/// The PetSafe page: owns the UI state and handles its events.
///
/// Cloning yields another handle to the same page.
#[derive(Clone)]
pub struct PetSafeApp {
    inner: Arc<Inner>,
}

struct Inner {
    host: Host,
    target: OpenTarget,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<ViewState>,
    wallet_present: OnceLock<bool>,
    shutdown: CancellationToken,
    /// Runtime current at construction, if any. Opens are spawned onto it so
    /// the handler can be called from threads outside the runtime.
    runtime: Option<Handle>,
}

impl PetSafeApp {
    pub fn new(host: Host, config: &DappConfig, notifier: Arc<dyn Notifier>) -> Result<Self, DappError> {
        let target = OpenTarget::from_config(config)?;
        let (state, _) = watch::channel(ViewState::default());
        Ok(Self {
            inner: Arc::new(Inner {
                host,
                target,
                notifier,
                state,
                wallet_present: OnceLock::new(),
                shutdown: CancellationToken::new(),
                runtime: Handle::try_current().ok(),
            }),
        })
    }

    /// Initial-mount hook. The presence check runs on the first call only;
    /// its result is logged and never changes what is rendered.
    pub fn mount(&self) -> bool {
        *self.inner.wallet_present.get_or_init(|| check_wallet_presence(&self.inner.host))
    }

    pub fn state(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Observe state changes, e.g. to re-render.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    pub fn render(&self) -> View {
        View::render(&self.inner.state.borrow())
    }

    /// "Connect Wallet" handler. On success the connected account is stored
    /// and the rendered action switches to open; on failure state is left
    /// untouched.
    pub async fn connect_wallet(&self) -> Result<AccountId, ConnectError> {
        match connect(&self.inner.host, self.inner.notifier.as_ref()).await {
            Ok(account) => {
                self.inner.state.send_modify(|state| state.connection.current_account = Some(account.clone()));
                Ok(account)
            }
            Err(err) => {
                warn!(error = %err, "failed to connect wallet");
                Err(err)
            }
        }
    }

    /// "Open PetSafe" handler. Spawns the invocation and returns at once;
    /// the view shows a pending indicator until it settles.
    ///
    /// Overlapping opens are allowed. Failures are logged and returned
    /// through [`PendingOpen::outcome`], never alerted.
    ///
    /// Runs on the runtime the app was created in, else on the caller's;
    /// with neither this fails with [`DappError::NoRuntime`].
    pub fn open_pet_safe(&self) -> Result<PendingOpen, InvokeError> {
        let account =
            self.inner.state.borrow().connection.current_account.clone().ok_or(DappError::NotConnected)?;
        let runtime = match &self.inner.runtime {
            Some(handle) => handle.clone(),
            None => Handle::try_current().map_err(|_| DappError::NoRuntime)?,
        };

        let cancel = self.inner.shutdown.child_token();
        let guard = PendingGuard::enter(self.inner.clone());
        let token = cancel.clone();
        let handle = runtime.spawn(async move {
            let inner = guard.inner.clone();
            let result = invoke(&inner.host, &account, &inner.target, &token).await;
            drop(guard);
            if let Err(err) = &result {
                warn!(error = %err, "failed to open PetSafe");
            }
            result
        });

        Ok(PendingOpen { handle, cancel })
    }

    /// Cancels every in-flight open. Call when the page goes away.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }
}

/// Keeps the pending count raised for as long as an open is in flight,
/// including when its task panics or is aborted.
struct PendingGuard {
    inner: Arc<Inner>,
}

impl PendingGuard {
    fn enter(inner: Arc<Inner>) -> Self {
        inner.state.send_modify(|state| state.pending_opens += 1);
        Self { inner }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.inner.state.send_modify(|state| state.pending_opens -= 1);
    }
}

/// An open in flight.
pub struct PendingOpen {
    handle: JoinHandle<Result<TransactionReceipt, InvokeError>>,
    cancel: CancellationToken,
}

impl PendingOpen {
    /// Stops waiting. A transaction the wallet already broadcast may still
    /// be mined.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub async fn outcome(self) -> Result<TransactionReceipt, InvokeError> {
        self.handle.await?
    }
}
