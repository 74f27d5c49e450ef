//! Contract calls through a connected wallet.
//!
//! The wallet both signs and broadcasts (`eth_sendTransaction`); the client
//! never holds key material. Confirmation is observed by polling
//! `eth_getTransactionReceipt` through the same wallet.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use chain_eth::abi::{AbiParam, ContractAbi};
use chain_eth::transaction::{CallRequest, TransactionReceipt};
use chain_eth::units::parse_quantity_u64;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::DappError;
use crate::provider::WalletProvider;
use crate::view::AccountId;

/// A handle that signs and submits transactions as one connected account.
#[derive(Clone)]
pub struct Signer {
    wallet: Arc<dyn WalletProvider>,
    account: AccountId,
}

impl Signer {
    pub fn new(wallet: Arc<dyn WalletProvider>, account: AccountId) -> Self {
        Self { wallet, account }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// The chain the wallet is currently connected to.
    pub async fn chain_id(&self) -> Result<u64, DappError> {
        let response = self.wallet.request("eth_chainId", json!([])).await?;
        let quantity = response
            .as_str()
            .ok_or_else(|| DappError::InvalidResponse(format!("eth_chainId: {response}")))?;
        Ok(parse_quantity_u64(quantity)?)
    }

    /// Hands the call to the wallet for signing and broadcast.
    ///
    /// The returned hash is whatever identifier the wallet chose; it is
    /// logged and passed back to the wallet, never decoded.
    pub async fn send_transaction(&self, call: &CallRequest) -> Result<PendingTransaction, DappError> {
        let response = self.wallet.request("eth_sendTransaction", call.to_rpc_params()?).await?;
        let tx_hash = match response {
            serde_json::Value::String(hash) if !hash.is_empty() => hash,
            other => return Err(DappError::InvalidResponse(format!("eth_sendTransaction: {other}"))),
        };

        Ok(PendingTransaction { tx_hash, wallet: self.wallet.clone() })
    }
}

/// A contract address and interface descriptor bound to a signer.
pub struct ContractBinding<'a> {
    address: Address,
    abi: &'a ContractAbi,
    signer: Signer,
}

impl<'a> ContractBinding<'a> {
    pub fn new(address: Address, abi: &'a ContractAbi, signer: Signer) -> Self {
        Self { address, abi, signer }
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Encodes and submits a call to `function` with `value` wei attached.
    pub async fn send(
        &self,
        function: &str,
        params: &[AbiParam],
        value: U256,
    ) -> Result<PendingTransaction, DappError> {
        let function = self.abi.function(function)?;
        let from = self.signer.account().address()?;
        let call = CallRequest::contract_call(from, self.address, function, params, value)?;
        self.signer.send_transaction(&call).await
    }
}

/// How long and how often to look for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub poll_interval: Duration,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// A submitted transaction that has not been observed on chain yet.
pub struct PendingTransaction {
    tx_hash: String,
    wallet: Arc<dyn WalletProvider>,
}

impl PendingTransaction {
    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    /// Waits until the transaction is included.
    ///
    /// Fails with [`DappError::ChainRevert`] if it was included but
    /// reverted, [`DappError::Timeout`] once `options.timeout` elapses, and
    /// [`DappError::Cancelled`] as soon as `cancel` fires.
    pub async fn wait(
        self,
        options: WaitOptions,
        cancel: &CancellationToken,
    ) -> Result<TransactionReceipt, DappError> {
        let included = async {
            match options.timeout {
                Some(limit) => tokio::time::timeout(limit, self.poll_receipt(options.poll_interval))
                    .await
                    .map_err(|_| DappError::Timeout(self.tx_hash.clone()))?,
                None => self.poll_receipt(options.poll_interval).await,
            }
        };

        let receipt = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DappError::Cancelled),
            receipt = included => receipt?,
        };

        if !receipt.is_success() {
            return Err(DappError::ChainRevert(format!(
                "transaction {} reverted in block {}",
                self.tx_hash, receipt.block_number
            )));
        }
        Ok(receipt)
    }

    async fn poll_receipt(&self, interval: Duration) -> Result<TransactionReceipt, DappError> {
        loop {
            let response =
                self.wallet.request("eth_getTransactionReceipt", json!([self.tx_hash])).await?;
            if !response.is_null() {
                debug!(tx_hash = %self.tx_hash, "receipt available");
                return TransactionReceipt::from_json(response)
                    .map_err(|e| DappError::InvalidResponse(e.to_string()));
            }
            trace!(tx_hash = %self.tx_hash, "not mined yet");
            tokio::time::sleep(interval).await;
        }
    }
}
