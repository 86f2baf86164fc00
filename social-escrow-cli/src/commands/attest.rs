use alloy_primitives::{Bytes, U256};
use social_escrow::parse::{parse_address, parse_u8, parse_u64, parse_u256};
use social_escrow::{EscrowError, UnixTimestamp, ValidationError};
use social_escrow_evm::attestation::{
    Attestation, AttestationDomain, build_domain, decode_signature_hex, default_expiry,
    default_nonce, parse_signature, sign, signing_hash, verify as verify_attestation,
};

use super::{Dispatcher, LedgerConnector};
use crate::cli::{AttestationArgs, VerifyArgs};
use crate::config::KeyRole;
use crate::output::{AttestReport, VerifyReport};

/// Parses attestation fields, filling a missing nonce or expiry from `now`.
pub(super) fn attestation_with_defaults(
    args: &AttestationArgs,
    now: UnixTimestamp,
) -> Result<Attestation, ValidationError> {
    let nonce = match args.nonce.as_deref() {
        Some(raw) => parse_u256(raw)?,
        None => default_nonce(now),
    };
    let expiry = match args.expiry.as_deref() {
        Some(raw) => UnixTimestamp::from_secs(parse_u64(raw)?),
        None => default_expiry(now),
    };
    attestation(args, nonce, expiry)
}

/// Parses the fields of an already signed attestation; nonce and expiry are
/// part of the signed payload and cannot be defaulted.
pub(super) fn signed_attestation(args: &AttestationArgs) -> Result<Attestation, ValidationError> {
    let nonce = parse_u256(args.nonce.as_deref().ok_or(ValidationError::Missing("--nonce"))?)?;
    let expiry = parse_u64(args.expiry.as_deref().ok_or(ValidationError::Missing("--expiry"))?)?;
    attestation(args, nonce, UnixTimestamp::from_secs(expiry))
}

fn attestation(
    args: &AttestationArgs,
    nonce: U256,
    expiry: UnixTimestamp,
) -> Result<Attestation, ValidationError> {
    Ok(Attestation {
        platform_id: parse_u8(&args.platform_id)?,
        user_id: parse_u256(&args.user_id)?,
        payout_address: parse_address(&args.payout_address)?,
        deposit_id: parse_u256(&args.deposit_id)?,
        nonce,
        expiry,
    })
}

impl<C: LedgerConnector> Dispatcher<'_, C> {
    pub(super) async fn attest(&self, args: &AttestationArgs) -> Result<AttestReport, EscrowError> {
        let attestation = attestation_with_defaults(args, UnixTimestamp::now())?;
        let escrow = self.config.escrow_address()?;
        let signer = self.config.signer(KeyRole::Attester)?;
        let chain_id = self.resolve_chain_id().await?;

        let domain = AttestationDomain::new(chain_id, escrow);
        let signature = sign(&domain, &attestation, &signer).await?;
        tracing::info!(
            signer = %signer.address(),
            deposit_id = %attestation.deposit_id,
            nonce = %attestation.nonce,
            "Attestation signed"
        );

        Ok(AttestReport {
            domain,
            attestation,
            digest: signing_hash(&domain, &attestation),
            signer: signer.address(),
            signature: Bytes::copy_from_slice(&signature.as_bytes()),
        })
    }

    pub(super) fn verify(&self, args: &VerifyArgs) -> Result<VerifyReport, EscrowError> {
        let attestation = signed_attestation(&args.attestation)?;
        let signature = decode_signature_hex(&args.signature)?;
        parse_signature(&signature)?;
        let expected_signer = args
            .expected_signer
            .as_deref()
            .map(parse_address)
            .transpose()?;
        let chain_id = self.config.require_chain_id()?;
        let domain = build_domain(chain_id, self.config.escrow_address_raw()?)?;

        let verification = verify_attestation(&domain, &attestation, &signature, expected_signer)?;
        tracing::info!(
            recovered = %verification.recovered,
            matches = ?verification.matches,
            "Recovered attestation signer"
        );

        Ok(VerifyReport {
            domain,
            attestation,
            expected_signer,
            verification,
        })
    }
}
