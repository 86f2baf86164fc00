//! Signing keys for attestations and transactions.

use std::future::Future;

use alloy_primitives::{Address, B256, Signature};
use alloy_signer_local::PrivateKeySigner;
use social_escrow::KeyError;

/// The seam the codec signs through.
///
/// Implemented for [`PrivateKeySigner`]; anything that can produce a
/// recoverable secp256k1 signature over a prehash can stand in for it.
pub trait AttestationSigner: Send + Sync {
    /// Returns the address of the signer.
    fn address(&self) -> Address;

    /// Signs the given hash.
    fn sign_hash(
        &self,
        hash: &B256,
    ) -> impl Future<Output = Result<Signature, alloy_signer::Error>> + Send;
}

impl AttestationSigner for PrivateKeySigner {
    fn address(&self) -> Address {
        Self::address(self)
    }

    async fn sign_hash(&self, hash: &B256) -> Result<Signature, alloy_signer::Error> {
        alloy_signer::Signer::sign_hash(self, hash).await
    }
}

/// Parses a hex private key (with or without `0x`).
///
/// `role` names the key in error messages; the key itself is never included.
///
/// # Errors
///
/// Returns [`KeyError::Empty`] for blank input and [`KeyError::Malformed`] if
/// the input is not a valid secp256k1 private scalar.
pub fn parse_signing_key(role: &'static str, key: &str) -> Result<PrivateKeySigner, KeyError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(KeyError::Empty(role));
    }
    key.parse::<PrivateKeySigner>()
        .map_err(|e| KeyError::Malformed {
            role,
            reason: e.to_string(),
        })
}
