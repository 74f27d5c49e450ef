//! Contract interface descriptors and minimal ABI call encoding.
//!
//! A descriptor is read from the JSON artifact a Solidity toolchain emits,
//! either the full artifact (`{"contractName": ..., "abi": [...]}`) or the
//! bare ABI array. Only function entries are kept; events, errors and the
//! constructor are ignored.

use serde::Deserialize;
use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// How a function interacts with chain state and attached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

/// A named, typed function parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiInput {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub components: Vec<AbiInput>,
}

impl AbiInput {
    /// Canonical type string as used in a function signature. Tuples are
    /// expanded into their component types, keeping any array suffix.
    pub fn canonical_type(&self) -> String {
        match self.kind.strip_prefix("tuple") {
            Some(suffix) => {
                let inner: Vec<String> = self.components.iter().map(Self::canonical_type).collect();
                format!("({}){suffix}", inner.join(","))
            }
            None => self.kind.clone(),
        }
    }
}

/// One externally callable function of a contract.
#[derive(Debug, Clone)]
pub struct AbiFunction {
    pub name: String,
    pub inputs: Vec<AbiInput>,
    pub state_mutability: StateMutability,
}

impl AbiFunction {
    /// `name(type1,type2,...)`
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(AbiInput::canonical_type).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// First four bytes of the Keccak-256 hash of the signature.
    pub fn selector(&self) -> [u8; 4] {
        let hash = Keccak256::digest(self.signature().as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash[..4]);
        selector
    }

    pub fn is_payable(&self) -> bool {
        self.state_mutability == StateMutability::Payable
    }

    /// Encodes a call to this function. The number of params must match the
    /// declared inputs.
    pub fn encode_call(&self, params: &[AbiParam]) -> Result<Vec<u8>, EthError> {
        if params.len() != self.inputs.len() {
            return Err(EthError::EncodingError(format!(
                "{} expects {} arguments, got {}",
                self.signature(),
                self.inputs.len(),
                params.len()
            )));
        }
        Ok(encode_function_call(self.selector(), params))
    }
}

/// A parsed contract interface descriptor.
#[derive(Debug, Clone)]
pub struct ContractAbi {
    functions: Vec<AbiFunction>,
}

impl ContractAbi {
    /// Parses a JSON artifact or bare ABI array.
    pub fn from_json(json: &str) -> Result<Self, EthError> {
        let artifact: Artifact =
            serde_json::from_str(json).map_err(|e| EthError::InvalidAbi(e.to_string()))?;
        let items = match artifact {
            Artifact::Compiled { abi } => abi,
            Artifact::Bare(items) => items,
        };

        let mut functions = Vec::new();
        for item in items.into_iter().filter(|item| item.kind == "function") {
            let name = item
                .name
                .ok_or_else(|| EthError::InvalidAbi("function entry without a name".into()))?;
            // Pre-0.5 artifacts carry `payable`/`constant` flags instead.
            let state_mutability = match item.state_mutability {
                Some(mutability) => mutability,
                None if item.payable == Some(true) => StateMutability::Payable,
                None if item.constant == Some(true) => StateMutability::View,
                None => StateMutability::NonPayable,
            };
            functions.push(AbiFunction { name, inputs: item.inputs, state_mutability });
        }

        Ok(Self { functions })
    }

    /// Looks up a function by name. Overloaded names resolve to the first
    /// declaration.
    pub fn function(&self, name: &str) -> Result<&AbiFunction, EthError> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| EthError::FunctionNotFound(name.to_string()))
    }

    pub fn functions(&self) -> &[AbiFunction] {
        &self.functions
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Artifact {
    Compiled { abi: Vec<AbiItem> },
    Bare(Vec<AbiItem>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbiItem {
    #[serde(rename = "type", default = "default_item_kind")]
    kind: String,
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<AbiInput>,
    state_mutability: Option<StateMutability>,
    payable: Option<bool>,
    constant: Option<bool>,
}

fn default_item_kind() -> String {
    "function".to_string()
}

/// A single ABI-encoded parameter.
#[derive(Debug, Clone)]
pub enum AbiParam {
    /// A 20-byte Ethereum address, left-padded to 32 bytes.
    Address([u8; 20]),
    /// A 256-bit unsigned integer as a big-endian 32-byte array.
    Uint256([u8; 32]),
    /// Short bytes, right-padded into a single 32-byte word.
    Bytes(Vec<u8>),
}

/// Encodes a function call as `selector || word(params[0]) || ...`.
pub fn encode_function_call(selector: [u8; 4], params: &[AbiParam]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + params.len() * 32);
    data.extend_from_slice(&selector);

    for param in params {
        data.extend_from_slice(&encode_param(param));
    }

    data
}

fn encode_param(param: &AbiParam) -> [u8; 32] {
    let mut word = [0u8; 32];
    match param {
        AbiParam::Address(addr) => word[12..].copy_from_slice(addr),
        AbiParam::Uint256(value) => word = *value,
        AbiParam::Bytes(bytes) => {
            let len = bytes.len().min(32);
            word[..len].copy_from_slice(&bytes[..len]);
        }
    }
    word
}
