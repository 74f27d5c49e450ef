//! In-memory collaborators for tests and demos: a scripted wallet, an alert
//! recorder and a log capture.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use alloy_primitives::Address;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::provider::{ProviderError, WalletProvider, UNSUPPORTED_METHOD};
use crate::view::Notifier;

pub const ALICE: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const BOB: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
pub const TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

pub fn petsafe_address() -> Address {
    crate::config::DappConfig::default()
        .contract_address()
        .unwrap_or_else(|e| panic!("bundled contract address is invalid: {e}"))
}

/// A wallet that answers from a fixed script and records every request.
///
/// By default it authorizes [`ALICE`] on Sepolia, accepts any transaction
/// with hash [`TX_HASH`] and reports it mined on the first receipt poll.
pub struct FakeWallet {
    accounts: Result<Vec<String>, ProviderError>,
    chain_id: Result<u64, ProviderError>,
    send: Result<String, ProviderError>,
    receipts: Result<(), ProviderError>,
    /// Receipt polls answered with `null` before the receipt appears.
    polls_before_mined: Option<usize>,
    reverts: bool,
    requests: Mutex<Vec<(String, Value)>>,
}

impl Default for FakeWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWallet {
    pub fn new() -> Self {
        Self {
            accounts: Ok(vec![ALICE.to_lowercase()]),
            chain_id: Ok(11155111),
            send: Ok(TX_HASH.to_string()),
            receipts: Ok(()),
            polls_before_mined: Some(0),
            reverts: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_accounts(mut self, accounts: &[&str]) -> Self {
        self.accounts = Ok(accounts.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn fail_accounts(mut self, err: ProviderError) -> Self {
        self.accounts = Err(err);
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Ok(chain_id);
        self
    }

    pub fn fail_chain_id(mut self, err: ProviderError) -> Self {
        self.chain_id = Err(err);
        self
    }

    pub fn with_tx_hash(mut self, hash: &str) -> Self {
        self.send = Ok(hash.to_string());
        self
    }

    pub fn fail_send(mut self, err: ProviderError) -> Self {
        self.send = Err(err);
        self
    }

    pub fn fail_receipts(mut self, err: ProviderError) -> Self {
        self.receipts = Err(err);
        self
    }

    pub fn mined_after(mut self, polls: usize) -> Self {
        self.polls_before_mined = Some(polls);
        self
    }

    pub fn never_mined(mut self) -> Self {
        self.polls_before_mined = None;
        self
    }

    /// Transactions are mined with a failed status.
    pub fn reverting(mut self) -> Self {
        self.reverts = true;
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests().iter().filter(|(m, _)| m == method).count()
    }

    pub fn last_params(&self, method: &str) -> Option<Value> {
        self.requests().into_iter().rev().find(|(m, _)| m == method).map(|(_, params)| params)
    }

    fn receipt(&self, params: &Value) -> Value {
        let hash = params.get(0).and_then(Value::as_str).unwrap_or(TX_HASH);
        let status = if self.reverts { "0x0" } else { "0x1" };
        json!({
            "transactionHash": hash,
            "blockHash": format!("0x{}", "ab".repeat(32)),
            "blockNumber": "0x1b4",
            "from": ALICE.to_lowercase(),
            "to": crate::config::PETSAFE_ADDRESS.to_lowercase(),
            "gasUsed": "0xb411",
            "status": status,
            "logs": []
        })
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let receipt_polls = {
            let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
            requests.push((method.to_string(), params.clone()));
            requests.iter().filter(|(m, _)| m == "eth_getTransactionReceipt").count()
        };

        match method {
            "eth_requestAccounts" | "eth_accounts" => self.accounts.clone().map(|accounts| json!(accounts)),
            "eth_chainId" => self.chain_id.clone().map(|id| json!(format!("{id:#x}"))),
            "eth_sendTransaction" => self.send.clone().map(Value::String),
            "eth_getTransactionReceipt" => {
                self.receipts.clone()?;
                match self.polls_before_mined {
                    Some(pending) if receipt_polls > pending => Ok(self.receipt(&params)),
                    _ => Ok(Value::Null),
                }
            }
            other => Err(ProviderError::rpc(UNSUPPORTED_METHOD, format!("unsupported method {other}"))),
        }
    }
}

/// Records alerts instead of showing them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner).push(message.to_string());
    }
}

/// Collects formatted log output from the current thread.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Routes this thread's events into the capture until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap_or_else(PoisonError::into_inner)).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
