use std::sync::Arc;

use alloy_primitives::{Address, U256};
use chain_eth::abi::ContractAbi;
use chain_eth::chains::get_chain;
use chain_eth::transaction::TransactionReceipt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{petsafe_abi, DappConfig};
use crate::contract::{ContractBinding, Signer, WaitOptions};
use crate::error::{DappError, InvokeError};
use crate::provider::Host;
use crate::view::AccountId;

/// The function every invocation calls.
pub const OPEN_FUNCTION: &str = "open";

/// Fixed call target: contract, interface descriptor, attached value and
/// confirmation policy.
#[derive(Debug, Clone)]
pub struct OpenTarget {
    pub address: Address,
    pub abi: Arc<ContractAbi>,
    pub value: U256,
    pub wait: WaitOptions,
}

impl OpenTarget {
    pub fn from_config(config: &DappConfig) -> Result<Self, DappError> {
        config.validate()?;
        let abi = petsafe_abi()?;
        // Fail at construction rather than on the first click.
        let open = abi.function(OPEN_FUNCTION)?;
        let value = config.open_value_wei()?;
        if !value.is_zero() && !open.is_payable() {
            return Err(chain_eth::error::EthError::NotPayable(OPEN_FUNCTION.into()).into());
        }

        Ok(Self {
            address: config.contract_address()?,
            abi: Arc::new(abi),
            value,
            wait: WaitOptions {
                poll_interval: config.poll_interval(),
                timeout: config.confirmation_timeout(),
            },
        })
    }
}

/// Calls `open` on the target as `account`, with the configured value
/// attached, and waits for the transaction to be mined.
///
/// `cancel` abandons the flow at any suspension point; a transaction the
/// wallet already broadcast is not recalled.
pub async fn invoke(
    host: &Host,
    account: &AccountId,
    target: &OpenTarget,
    cancel: &CancellationToken,
) -> Result<TransactionReceipt, InvokeError> {
    let Some(wallet) = host.wallet() else {
        warn!("wallet object does not exist");
        return Err(DappError::CapabilityAbsent);
    };

    let signer = Signer::new(wallet.clone(), account.clone());
    let binding = ContractBinding::new(target.address, &target.abi, signer);

    info!(%account, contract = %target.address, "opening PetSafe");
    let pending = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(DappError::Cancelled),
        pending = binding.send(OPEN_FUNCTION, &[], target.value) => pending?,
    };

    info!(tx_hash = pending.tx_hash(), "mining, please wait");
    let receipt = pending.wait(target.wait, cancel).await?;

    info!(tx_hash = %receipt.transaction_hash, block = receipt.block_number, "mined, see transaction");
    match binding.signer().chain_id().await {
        Ok(chain_id) => {
            if let Some(chain) = get_chain(chain_id) {
                info!(url = %chain.tx_url(&receipt.transaction_hash), "view on {}", chain.name);
            }
        }
        Err(err) => debug!(error = %err, "chain id unavailable, skipping explorer link"),
    }

    Ok(receipt)
}
