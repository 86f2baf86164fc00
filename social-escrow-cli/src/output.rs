//! Command results and their rendering.
//!
//! Every command returns a [`Report`]. With `--json` it is printed as a
//! single JSON document with integers as decimal strings; otherwise as
//! aligned `key: value` lines.

use std::fmt;

use alloy_primitives::{Address, B256, Bytes, U256};
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};
use social_escrow::amount::format_ether;
use social_escrow_evm::attestation::{Attestation, AttestationDomain, Verification};
use social_escrow_evm::chain::{ChainId, caip2, network_name};
use social_escrow_evm::ledger::{DepositCreatedEvent, DepositRecord, TransactionOutcome};

/// Result of a command.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    /// `deposit`
    Deposit(DepositReport),
    /// `attest`
    Attest(AttestReport),
    /// `verify`
    Verify(VerifyReport),
    /// `claim`
    Claim(ClaimReport),
    /// `get-deposit`
    GetDeposit(DepositView),
    /// `refund`
    Refund(RefundReport),
}

/// Result of `deposit`.
#[serde_as]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReport {
    /// Account that funded the deposit.
    pub depositor: Address,
    /// Value sent, in wei.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: U256,
    /// The mined transaction.
    pub transaction: TransactionOutcome,
    /// The `DepositCreated` event, if the escrow emitted one.
    pub event: Option<DepositCreatedEvent>,
}

/// Result of `attest`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestReport {
    /// Domain the attestation was signed under.
    pub domain: AttestationDomain,
    /// The signed attestation.
    pub attestation: Attestation,
    /// EIP-712 digest that was signed.
    pub digest: B256,
    /// Attester address.
    pub signer: Address,
    /// 65-byte signature.
    pub signature: Bytes,
}

/// Result of `verify`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    /// Domain the signature was checked under.
    pub domain: AttestationDomain,
    /// The checked attestation.
    pub attestation: Attestation,
    /// Address the caller expected, if any.
    pub expected_signer: Option<Address>,
    /// Recovered signer and comparison result.
    #[serde(flatten)]
    pub verification: Verification,
}

/// Result of `claim`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReport {
    /// The relayed attestation.
    pub attestation: Attestation,
    /// Signer recovered during the preflight.
    pub signer: Address,
    /// Signature sent to the escrow.
    pub signature: Bytes,
    /// Account that paid gas.
    pub relayer: Address,
    /// The mined transaction.
    pub transaction: TransactionOutcome,
}

/// Result of `get-deposit`.
#[serde_as]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositView {
    /// Requested deposit ID.
    #[serde_as(as = "DisplayFromStr")]
    pub deposit_id: U256,
    /// False when the contract returned a zeroed record.
    pub exists: bool,
    /// The record as stored on chain.
    #[serde(flatten)]
    pub record: DepositRecord,
}

/// Result of `refund`.
#[serde_as]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundReport {
    /// Refunded deposit.
    #[serde_as(as = "DisplayFromStr")]
    pub deposit_id: U256,
    /// Account that requested the refund.
    pub depositor: Address,
    /// The mined transaction.
    pub transaction: TransactionOutcome,
}

impl Report {
    /// Renders the report for stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, json: bool) -> Result<String, serde_json::Error> {
        if json {
            serde_json::to_string_pretty(self)
        } else {
            Ok(self.to_string())
        }
    }
}

fn chain_label(chain_id: ChainId) -> String {
    match network_name(chain_id) {
        Some(name) => format!("{} ({name})", caip2(chain_id)),
        None => caip2(chain_id),
    }
}

fn ether(wei: U256) -> String {
    format!("{} ETH ({wei} wei)", format_ether(wei))
}

fn field(f: &mut fmt::Formatter<'_>, key: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "  {:<18}{value}", format!("{key}:"))
}

fn write_transaction(f: &mut fmt::Formatter<'_>, tx: &TransactionOutcome) -> fmt::Result {
    field(f, "transaction", tx.tx_hash)?;
    if let Some(block) = tx.block_number {
        field(f, "block", block)?;
    }
    field(f, "gas used", tx.gas_used)
}

fn write_attestation(f: &mut fmt::Formatter<'_>, a: &Attestation) -> fmt::Result {
    field(f, "platform id", a.platform_id)?;
    field(f, "user id", a.user_id)?;
    field(f, "payout address", a.payout_address)?;
    field(f, "deposit id", a.deposit_id)?;
    field(f, "nonce", a.nonce)?;
    field(f, "expiry", a.expiry)
}

fn write_domain(f: &mut fmt::Formatter<'_>, d: &AttestationDomain) -> fmt::Result {
    field(f, "chain", chain_label(d.chain_id))?;
    field(f, "escrow", d.verifying_contract)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit(r) => {
                writeln!(f, "Deposit created")?;
                match &r.event {
                    Some(event) => field(f, "deposit id", event.deposit_id)?,
                    None => field(f, "deposit id", "unknown (no DepositCreated event)")?,
                }
                field(f, "depositor", r.depositor)?;
                field(f, "amount", ether(r.amount))?;
                write_transaction(f, &r.transaction)
            }
            Self::Attest(r) => {
                writeln!(f, "Attestation signed")?;
                field(f, "signer", r.signer)?;
                field(f, "signature", &r.signature)?;
                field(f, "digest", r.digest)?;
                write_domain(f, &r.domain)?;
                write_attestation(f, &r.attestation)
            }
            Self::Verify(r) => {
                match r.verification.matches {
                    Some(true) => writeln!(f, "Signature valid: signed by expected signer")?,
                    Some(false) => writeln!(f, "Signature MISMATCH: not signed by expected signer")?,
                    None => writeln!(f, "Signature recovered")?,
                }
                field(f, "recovered", r.verification.recovered)?;
                if let Some(expected) = r.expected_signer {
                    field(f, "expected", expected)?;
                }
                write_domain(f, &r.domain)?;
                write_attestation(f, &r.attestation)
            }
            Self::Claim(r) => {
                writeln!(f, "Claim relayed")?;
                field(f, "signer", r.signer)?;
                field(f, "relayer", r.relayer)?;
                field(f, "signature", &r.signature)?;
                write_attestation(f, &r.attestation)?;
                write_transaction(f, &r.transaction)
            }
            Self::GetDeposit(r) => {
                if !r.exists {
                    writeln!(f, "Deposit {} not found", r.deposit_id)?;
                    return Ok(());
                }
                writeln!(f, "Deposit {}", r.deposit_id)?;
                field(f, "depositor", r.record.depositor)?;
                field(f, "amount", ether(r.record.amount))?;
                field(f, "platform id", r.record.platform_id)?;
                field(f, "recipient user", r.record.recipient_user_id)?;
                field(f, "depositor user", r.record.depositor_user_id)?;
                field(f, "content uri", &r.record.content_uri)?;
                field(f, "claimed", r.record.claimed)
            }
            Self::Refund(r) => {
                writeln!(f, "Deposit {} refunded", r.deposit_id)?;
                field(f, "depositor", r.depositor)?;
                write_transaction(f, &r.transaction)
            }
        }
    }
}
