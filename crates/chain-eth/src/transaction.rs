use alloy_primitives::{Address, U256};
use serde::{Deserialize, Deserializer, Serialize};

use crate::abi::{AbiFunction, AbiParam};
use crate::error::EthError;
use crate::units::{parse_quantity, parse_quantity_u64, to_quantity};

/// A value-bearing contract call, ready to hand to a wallet for signing and
/// submission via `eth_sendTransaction`.
///
/// Gas, fees and nonce are left for the wallet to fill in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    /// Attached value in wei.
    pub value: U256,
    /// ABI-encoded calldata.
    pub data: Vec<u8>,
}

impl CallRequest {
    /// Builds a call to `function` on the contract at `to`.
    ///
    /// Attaching a non-zero value to a function that is not payable is
    /// rejected here rather than left to revert on chain.
    pub fn contract_call(
        from: Address,
        to: Address,
        function: &AbiFunction,
        params: &[AbiParam],
        value: U256,
    ) -> Result<Self, EthError> {
        if !value.is_zero() && !function.is_payable() {
            return Err(EthError::NotPayable(function.name.clone()));
        }

        Ok(Self { from, to, value, data: function.encode_call(params)? })
    }

    /// The positional params array for `eth_sendTransaction`.
    pub fn to_rpc_params(&self) -> Result<serde_json::Value, EthError> {
        let wire = SendTransactionParams {
            from: self.from.to_checksum(None),
            to: self.to.to_checksum(None),
            value: to_quantity(self.value),
            data: format!("0x{}", hex::encode(&self.data)),
        };
        serde_json::to_value([wire]).map_err(|e| EthError::EncodingError(e.to_string()))
    }
}

#[derive(Serialize)]
struct SendTransactionParams {
    from: String,
    to: String,
    value: String,
    data: String,
}

/// Confirmation record for an included transaction, as returned by
/// `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Kept as the wallet reported it; only ever displayed or echoed back.
    pub transaction_hash: String,
    #[serde(deserialize_with = "u64_from_quantity")]
    pub block_number: u64,
    pub from: Address,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(deserialize_with = "u256_from_quantity")]
    pub gas_used: U256,
    /// `None` on pre-Byzantium receipts, which carry a state root instead.
    #[serde(default, deserialize_with = "status_from_quantity")]
    pub status: Option<bool>,
}

impl TransactionReceipt {
    /// Parses a receipt from its JSON-RPC representation.
    pub fn from_json(value: serde_json::Value) -> Result<Self, EthError> {
        serde_json::from_value(value).map_err(|e| EthError::DecodingError(format!("receipt: {e}")))
    }

    /// Whether execution succeeded. Receipts without a status field are
    /// treated as successful.
    pub fn is_success(&self) -> bool {
        self.status != Some(false)
    }
}

fn u64_from_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_quantity_u64(&raw).map_err(serde::de::Error::custom)
}

fn u256_from_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_quantity(&raw).map_err(serde::de::Error::custom)
}

fn status_from_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match parse_quantity_u64(&raw).map_err(serde::de::Error::custom)? {
        0 => Ok(Some(false)),
        1 => Ok(Some(true)),
        other => Err(serde::de::Error::custom(format!("unexpected receipt status {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::abi::ContractAbi;
    use crate::address::parse_address;

    const ABI: &str = r#"[
        { "name": "open", "type": "function", "inputs": [], "stateMutability": "payable" },
        { "name": "close", "type": "function", "inputs": [], "stateMutability": "nonpayable" }
    ]"#;

    const HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

    fn from() -> Address {
        parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap()
    }

    fn petsafe() -> Address {
        parse_address("0x0dB81d10c1D88626bf77202eBe847FC32038230F").unwrap()
    }

    #[test]
    fn builds_payable_call() {
        let abi = ContractAbi::from_json(ABI).unwrap();
        let value = U256::from(1_000_000_000_000_000u64);

        let call = CallRequest::contract_call(from(), petsafe(), abi.function("open").unwrap(), &[], value)
            .unwrap();

        assert_eq!(call.data, vec![0xfc, 0xff, 0xf1, 0x6f]);
        assert_eq!(call.value, value);
    }

    #[test]
    fn value_on_nonpayable_function_is_rejected() {
        let abi = ContractAbi::from_json(ABI).unwrap();
        let result =
            CallRequest::contract_call(from(), petsafe(), abi.function("close").unwrap(), &[], U256::from(1));
        assert!(matches!(result, Err(EthError::NotPayable(name)) if name == "close"));
    }

    #[test]
    fn zero_value_on_nonpayable_function_is_allowed() {
        let abi = ContractAbi::from_json(ABI).unwrap();
        let result =
            CallRequest::contract_call(from(), petsafe(), abi.function("close").unwrap(), &[], U256::ZERO);
        assert!(result.is_ok());
    }

    #[test]
    fn rpc_params_shape() {
        let abi = ContractAbi::from_json(ABI).unwrap();
        let call = CallRequest::contract_call(
            from(),
            petsafe(),
            abi.function("open").unwrap(),
            &[],
            U256::from(1_000_000_000_000_000u64),
        )
        .unwrap();

        let params = call.to_rpc_params().unwrap();
        assert_eq!(
            params,
            json!([{
                "from": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                "to": "0x0dB81d10c1D88626bf77202eBe847FC32038230F",
                "value": "0x38d7ea4c68000",
                "data": "0xfcfff16f"
            }])
        );
    }

    #[test]
    fn parses_receipt() {
        let receipt = TransactionReceipt::from_json(json!({
            "transactionHash": HASH,
            "blockHash": "0x2b4a0a3e1b3f9d4e3a1d6b7d0b1f1e7e8c9d6a5b4c3d2e1f0a9b8c7d6e5f4a3b",
            "blockNumber": "0x1b4",
            "from": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "to": "0x0db81d10c1d88626bf77202ebe847fc32038230f",
            "gasUsed": "0x5208",
            "status": "0x1",
            "logs": []
        }))
        .unwrap();

        assert_eq!(receipt.transaction_hash, HASH);
        assert_eq!(receipt.block_number, 436);
        assert_eq!(receipt.to, Some(petsafe()));
        assert_eq!(receipt.gas_used, U256::from(21_000));
        assert!(receipt.is_success());
    }

    #[test]
    fn reverted_receipt_is_not_success() {
        let receipt = TransactionReceipt::from_json(json!({
            "transactionHash": HASH,
            "blockNumber": "0x1",
            "from": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "to": null,
            "gasUsed": "0x0",
            "status": "0x0"
        }))
        .unwrap();

        assert_eq!(receipt.status, Some(false));
        assert!(!receipt.is_success());
    }

    #[test]
    fn receipt_without_status_is_success() {
        let receipt = TransactionReceipt::from_json(json!({
            "transactionHash": HASH,
            "blockNumber": "0x1",
            "from": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "gasUsed": "0x0",
            "root": "0x00"
        }))
        .unwrap();

        assert_eq!(receipt.status, None);
        assert!(receipt.is_success());
    }

    #[test]
    fn malformed_receipt_errors() {
        let result = TransactionReceipt::from_json(json!({ "transactionHash": HASH, "blockNumber": "1b4" }));
        assert!(matches!(result, Err(EthError::DecodingError(_))));
    }

    #[test]
    fn receipt_hash_is_kept_verbatim() {
        let receipt = TransactionReceipt::from_json(json!({
            "transactionHash": "0xHASH",
            "blockNumber": "0x2",
            "from": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "gasUsed": "0x0",
            "status": "0x1"
        }))
        .unwrap();

        assert_eq!(receipt.transaction_hash, "0xHASH");
    }
}
