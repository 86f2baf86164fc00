//! Type definitions for claim attestations.
//!
//! An attestation is the attester's signed statement that a platform user owns
//! a payout address and may claim a given deposit. It is signed as EIP-712
//! typed data under a domain bound to one chain and one escrow deployment.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{Eip712Domain, eip712_domain, sol};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use social_escrow::UnixTimestamp;

use crate::chain::ChainId;

/// EIP-712 domain name shared by every escrow deployment.
pub const DOMAIN_NAME: &str = "SocialEscrow";

/// EIP-712 domain version shared by every escrow deployment.
pub const DOMAIN_VERSION: &str = "1";

/// A claim authorization for one deposit.
///
/// Integer fields serialize as decimal strings so 256-bit values survive JSON.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    /// Source platform of the recipient identity (e.g. a social network).
    pub platform_id: u8,

    /// Platform-specific numeric identity of the claim recipient.
    #[serde_as(as = "DisplayFromStr")]
    pub user_id: U256,

    /// Destination of the claimed funds.
    pub payout_address: Address,

    /// Deposit record this attestation unlocks.
    #[serde_as(as = "DisplayFromStr")]
    pub deposit_id: U256,

    /// Replay-protection token; consumed on-chain.
    #[serde_as(as = "DisplayFromStr")]
    pub nonce: U256,

    /// The attestation is rejected on-chain after this time.
    pub expiry: UnixTimestamp,
}

/// EIP-712 domain binding a signature to one escrow deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationDomain {
    /// Always [`DOMAIN_NAME`].
    pub name: &'static str,
    /// Always [`DOMAIN_VERSION`].
    pub version: &'static str,
    /// Chain the escrow contract lives on.
    pub chain_id: ChainId,
    /// Escrow contract address.
    pub verifying_contract: Address,
}

impl AttestationDomain {
    /// Creates the domain for an already validated escrow address.
    ///
    /// Use [`build_domain`](super::build_domain) for raw user input.
    #[must_use]
    pub const fn new(chain_id: ChainId, verifying_contract: Address) -> Self {
        Self {
            name: DOMAIN_NAME,
            version: DOMAIN_VERSION,
            chain_id,
            verifying_contract,
        }
    }

    /// Returns the alloy representation used for hashing.
    #[must_use]
    pub fn eip712(&self) -> Eip712Domain {
        eip712_domain! {
            name: self.name,
            version: self.version,
            chain_id: self.chain_id,
            verifying_contract: self.verifying_contract,
        }
    }
}

sol!(
    /// Solidity-compatible struct definition for a claim attestation.
    ///
    /// Field order and widths MUST match the escrow contract: they are part of
    /// the EIP-712 type hash, so any change produces signatures the contract
    /// rejects.
    #[derive(Debug, PartialEq, Eq)]
    struct ClaimAttestation {
        uint8 platformId;
        uint256 userId;
        address payoutAddress;
        uint256 depositId;
        uint256 nonce;
        uint64 expiry;
    }
);

impl From<&Attestation> for ClaimAttestation {
    fn from(value: &Attestation) -> Self {
        Self {
            platformId: value.platform_id,
            userId: value.user_id,
            payoutAddress: value.payout_address,
            depositId: value.deposit_id,
            nonce: value.nonce,
            expiry: value.expiry.as_secs(),
        }
    }
}
