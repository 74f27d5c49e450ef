//! Ethereum/EVM primitives for the PetSafe client.
//!
//! This crate provides:
//! - Contract interface descriptor (ABI) parsing and call encoding
//! - EIP-55 address validation
//! - Ether/wei conversion and JSON-RPC quantity encoding
//! - Contract call requests and transaction receipts in their JSON-RPC shape
//! - Known EVM network definitions for explorer links

pub mod abi;
pub mod address;
pub mod chains;
pub mod error;
pub mod transaction;
pub mod units;
