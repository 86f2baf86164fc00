//! EVM chain identifiers.

/// An EIP-155 chain ID (e.g., 8453 for Base, 137 for Polygon).
pub type ChainId = u64;

/// Ethereum Mainnet chain ID.
pub const ETHEREUM_MAINNET: ChainId = 1;

/// Ethereum Sepolia (testnet) chain ID.
pub const ETHEREUM_SEPOLIA: ChainId = 11_155_111;

/// Base Mainnet chain ID.
pub const BASE_MAINNET: ChainId = 8453;

/// Base Sepolia (testnet) chain ID.
pub const BASE_SEPOLIA: ChainId = 84532;

/// Polygon Mainnet chain ID.
pub const POLYGON_MAINNET: ChainId = 137;

/// Local development node (anvil, hardhat) chain ID.
pub const LOCAL_DEVNET: ChainId = 31337;

const KNOWN_NETWORKS: &[(ChainId, &str)] = &[
    (ETHEREUM_MAINNET, "ethereum"),
    (ETHEREUM_SEPOLIA, "sepolia"),
    (BASE_MAINNET, "base"),
    (BASE_SEPOLIA, "base-sepolia"),
    (POLYGON_MAINNET, "polygon"),
    (LOCAL_DEVNET, "local"),
];

/// Formats a chain ID as a CAIP-2 identifier.
///
/// Example: `caip2(8453)` returns `"eip155:8453"`.
#[must_use]
pub fn caip2(chain_id: ChainId) -> String {
    format!("eip155:{chain_id}")
}

/// Returns the short name of a well-known network, if any.
#[must_use]
pub fn network_name(chain_id: ChainId) -> Option<&'static str> {
    KNOWN_NETWORKS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| *name)
}
