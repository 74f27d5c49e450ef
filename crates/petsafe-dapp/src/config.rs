use std::time::Duration;

use alloy_primitives::{Address, U256};
use chain_eth::abi::ContractAbi;
use chain_eth::{address, units};
use serde::{Deserialize, Serialize};

use crate::error::DappError;

/// Deployed PetSafe contract.
pub const PETSAFE_ADDRESS: &str = "0x0dB81d10c1D88626bf77202eBe847FC32038230F";

/// Value attached to every `open` call, in ether.
pub const OPEN_VALUE_ETHER: &str = "0.001";

/// Compiled PetSafe artifact; only its `abi` member is read.
pub const PETSAFE_ARTIFACT: &str = include_str!("../contracts/PetSafe.json");

/// Receipt polling interval used by browser wallet libraries.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 4_000;

/// Construction-time settings for the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DappConfig {
    pub contract_address: String,
    /// Decimal ether amount attached to `open`.
    pub open_value: String,
    pub poll_interval_ms: u64,
    /// Give up waiting for confirmation after this long. Unbounded if unset.
    pub confirmation_timeout_secs: Option<u64>,
}

impl Default for DappConfig {
    fn default() -> Self {
        Self {
            contract_address: PETSAFE_ADDRESS.to_string(),
            open_value: OPEN_VALUE_ETHER.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            confirmation_timeout_secs: None,
        }
    }
}

impl DappConfig {
    /// Reads a config from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, DappError> {
        let config: Self = serde_json::from_str(json).map_err(|e| DappError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DappError> {
        self.contract_address()?;
        self.open_value_wei()?;
        if self.poll_interval_ms == 0 {
            return Err(DappError::Config("poll_interval_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn contract_address(&self) -> Result<Address, DappError> {
        address::parse_address(&self.contract_address)
            .map_err(|e| DappError::Config(format!("contract_address: {e}")))
    }

    pub fn open_value_wei(&self) -> Result<U256, DappError> {
        units::ether_to_wei(&self.open_value).map_err(|e| DappError::Config(format!("open_value: {e}")))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Option<Duration> {
        self.confirmation_timeout_secs.map(Duration::from_secs)
    }
}

/// The contract interface descriptor compiled into the crate.
pub fn petsafe_abi() -> Result<ContractAbi, DappError> {
    Ok(ContractAbi::from_json(PETSAFE_ARTIFACT)?)
}
