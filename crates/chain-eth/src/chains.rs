/// Definition of an EVM-compatible blockchain network.
#[derive(Debug, Clone)]
pub struct EvmChain {
    pub chain_id: u64,
    pub name: &'static str,
    pub explorer_url: &'static str,
}

impl EvmChain {
    /// Block explorer page for a transaction.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{tx_hash}", self.explorer_url)
    }
}

/// Ethereum Mainnet (chain ID 1).
pub const ETHEREUM: EvmChain = EvmChain {
    chain_id: 1,
    name: "Ethereum",
    explorer_url: "https://etherscan.io",
};

/// Polygon PoS (chain ID 137).
pub const POLYGON: EvmChain = EvmChain {
    chain_id: 137,
    name: "Polygon",
    explorer_url: "https://polygonscan.com",
};

/// Arbitrum One (chain ID 42161).
pub const ARBITRUM: EvmChain = EvmChain {
    chain_id: 42161,
    name: "Arbitrum One",
    explorer_url: "https://arbiscan.io",
};

/// Base (chain ID 8453).
pub const BASE: EvmChain = EvmChain {
    chain_id: 8453,
    name: "Base",
    explorer_url: "https://basescan.org",
};

/// Optimism (chain ID 10).
pub const OPTIMISM: EvmChain = EvmChain {
    chain_id: 10,
    name: "Optimism",
    explorer_url: "https://optimistic.etherscan.io",
};

/// Sepolia Testnet (chain ID 11155111).
pub const SEPOLIA: EvmChain = EvmChain {
    chain_id: 11155111,
    name: "Sepolia",
    explorer_url: "https://sepolia.etherscan.io",
};

/// Holesky Testnet (chain ID 17000).
pub const HOLESKY: EvmChain = EvmChain {
    chain_id: 17000,
    name: "Holesky",
    explorer_url: "https://holesky.etherscan.io",
};

const ALL_CHAINS: &[&EvmChain] = &[&ETHEREUM, &POLYGON, &ARBITRUM, &BASE, &OPTIMISM, &SEPOLIA, &HOLESKY];

/// Returns the chain definition for a given chain ID, or `None` if unknown.
pub fn get_chain(chain_id: u64) -> Option<&'static EvmChain> {
    ALL_CHAINS.iter().find(|c| c.chain_id == chain_id).copied()
}
