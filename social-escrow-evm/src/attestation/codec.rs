//! Signing, recovery and verification of claim attestations.
//!
//! All functions here are local: none of them touch the chain. [`verify`] is
//! the basis of the preflight the client runs before relaying a claim. Expiry
//! and nonce consumption are enforced by the contract, not here.

use alloy_primitives::{Address, B256, Bytes, Signature, hex};
use alloy_sol_types::SolStruct;
use serde::Serialize;
use social_escrow::parse::parse_address;
use social_escrow::{KeyError, SignatureError, ValidationError};
#[cfg(feature = "telemetry")]
use tracing::instrument;

use super::signer::AttestationSigner;
use super::types::{Attestation, AttestationDomain, ClaimAttestation};
use crate::chain::ChainId;

/// Result of a local signature check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// Address recovered from the signature.
    pub recovered: Address,
    /// Whether `recovered` equals the expected signer; `None` if no signer
    /// was expected.
    pub matches: Option<bool>,
}

/// Builds the attestation domain from a raw escrow address.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAddress`] unless `verifying_contract` is
/// `0x` followed by 40 hex characters (any case).
pub fn build_domain(
    chain_id: ChainId,
    verifying_contract: &str,
) -> Result<AttestationDomain, ValidationError> {
    let verifying_contract = parse_address(verifying_contract)?;
    Ok(AttestationDomain::new(chain_id, verifying_contract))
}

/// Encodes an attestation into its canonical typed-data struct.
#[must_use]
pub fn encode(value: &Attestation) -> ClaimAttestation {
    ClaimAttestation::from(value)
}

/// Computes the EIP-712 digest that is signed for `value` under `domain`.
#[must_use]
pub fn signing_hash(domain: &AttestationDomain, value: &Attestation) -> B256 {
    encode(value).eip712_signing_hash(&domain.eip712())
}

/// Signs an attestation.
///
/// This is the only operation that touches key material.
///
/// # Errors
///
/// Returns [`KeyError::Signing`] if the signer rejects the request.
#[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(
    chain_id = domain.chain_id,
    escrow = %domain.verifying_contract,
    deposit_id = %value.deposit_id,
)))]
pub async fn sign<S: AttestationSigner>(
    domain: &AttestationDomain,
    value: &Attestation,
    signer: &S,
) -> Result<Signature, KeyError> {
    let hash = signing_hash(domain, value);
    signer
        .sign_hash(&hash)
        .await
        .map_err(|e| KeyError::Signing(e.to_string()))
}

/// Decodes a hex signature (with or without `0x`) into raw bytes.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidHex`] if the input is not hex.
pub fn decode_signature_hex(input: &str) -> Result<Bytes, SignatureError> {
    hex::decode(input.trim())
        .map(Bytes::from)
        .map_err(|e| SignatureError::InvalidHex(e.to_string()))
}

/// Parses raw signature bytes.
///
/// Accepts the 65-byte `r || s || v` form and the 64-byte ERC-2098 compact
/// form. High-s signatures are normalized.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidLength`] or [`SignatureError::Malformed`].
pub fn parse_signature(bytes: &[u8]) -> Result<Signature, SignatureError> {
    let signature = match bytes.len() {
        65 => Signature::from_raw(bytes).map_err(|e| SignatureError::Malformed(e.to_string()))?,
        64 => Signature::from_erc2098(bytes),
        len => return Err(SignatureError::InvalidLength(len)),
    };
    Ok(signature.normalized_s())
}

/// Recovers the address that signed `value` under `domain`.
///
/// A signature over a different payload or domain recovers to some other
/// address; that is not an error, callers compare against the address they
/// expect.
///
/// # Errors
///
/// Returns [`SignatureError`] if the bytes are not a well-formed signature.
pub fn recover(
    domain: &AttestationDomain,
    value: &Attestation,
    signature: &[u8],
) -> Result<Address, SignatureError> {
    let signature = parse_signature(signature)?;
    let hash = signing_hash(domain, value);
    signature
        .recover_address_from_prehash(&hash)
        .map_err(|e| SignatureError::Malformed(e.to_string()))
}

/// Recovers the signer and, if `expected` is given, compares it.
///
/// # Errors
///
/// Returns [`SignatureError`] if the bytes are not a well-formed signature.
pub fn verify(
    domain: &AttestationDomain,
    value: &Attestation,
    signature: &[u8],
    expected: Option<Address>,
) -> Result<Verification, SignatureError> {
    let recovered = recover(domain, value, signature)?;
    Ok(Verification {
        recovered,
        matches: expected.map(|expected| expected == recovered),
    })
}
