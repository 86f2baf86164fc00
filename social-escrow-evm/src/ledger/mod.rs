//! Ledger client: the on-chain side of the escrow.
//!
//! [`EscrowLedger`] is the collaborator the command dispatcher talks to for
//! anything that needs the chain: resolving the chain ID, sending deposits,
//! claims and refunds, and reading deposit records. [`AlloyLedger`] is the
//! JSON-RPC implementation.

mod error;
mod provider;

use std::future::Future;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

pub use error::LedgerError;
pub use provider::AlloyLedger;

use crate::attestation::Attestation;
use crate::chain::ChainId;
use crate::contract::ISocialEscrow;

/// Parameters of a new deposit.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeposit {
    /// Platform the recipient identity belongs to.
    pub platform_id: u8,
    /// Platform user who may claim the deposit.
    #[serde_as(as = "DisplayFromStr")]
    pub recipient_user_id: U256,
    /// Platform identity of the depositor.
    #[serde_as(as = "DisplayFromStr")]
    pub depositor_user_id: U256,
    /// Content the tip is attached to.
    pub content_uri: String,
    /// Value sent with the transaction, in wei.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: U256,
}

/// A mined, successful transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// Gas consumed.
    pub gas_used: u64,
}

/// A decoded `DepositCreated` event.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositCreatedEvent {
    /// Identifier assigned by the contract.
    #[serde_as(as = "DisplayFromStr")]
    pub deposit_id: U256,
    /// Account that funded the deposit.
    pub depositor: Address,
    /// Deposited value in wei.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: U256,
    /// Platform the recipient identity belongs to.
    pub platform_id: u8,
    /// Platform user who may claim the deposit.
    #[serde_as(as = "DisplayFromStr")]
    pub recipient_user_id: U256,
    /// Platform identity of the depositor.
    #[serde_as(as = "DisplayFromStr")]
    pub depositor_user_id: U256,
    /// Content the tip is attached to.
    pub content_uri: String,
}

impl From<ISocialEscrow::DepositCreated> for DepositCreatedEvent {
    fn from(event: ISocialEscrow::DepositCreated) -> Self {
        Self {
            deposit_id: event.depositId,
            depositor: event.depositor,
            amount: event.amount,
            platform_id: event.platformId,
            recipient_user_id: event.recipientUserId,
            depositor_user_id: event.depositorUserId,
            content_uri: event.contentUri,
        }
    }
}

/// Result of a deposit transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositSubmission {
    /// The mined transaction.
    pub transaction: TransactionOutcome,
    /// The `DepositCreated` event emitted by the escrow, if found in the logs.
    pub created: Option<DepositCreatedEvent>,
}

/// On-chain deposit record, as returned by `deposits(id)`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    /// Account that funded the deposit; zero if the deposit does not exist.
    pub depositor: Address,
    /// Deposited value in wei.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: U256,
    /// Platform the recipient identity belongs to.
    pub platform_id: u8,
    /// Platform user who may claim the deposit.
    #[serde_as(as = "DisplayFromStr")]
    pub recipient_user_id: U256,
    /// Platform identity of the depositor.
    #[serde_as(as = "DisplayFromStr")]
    pub depositor_user_id: U256,
    /// Content the tip is attached to.
    pub content_uri: String,
    /// Whether the deposit has been claimed.
    pub claimed: bool,
}

impl DepositRecord {
    /// The contract returns a zeroed record for unknown IDs.
    #[must_use]
    pub fn exists(&self) -> bool {
        !self.depositor.is_zero()
    }
}

/// On-chain operations of the escrow.
///
/// Write operations wait for the transaction to be mined without a timeout
/// and fail with [`LedgerError::TransactionReverted`] if it reverted.
pub trait EscrowLedger: Send + Sync {
    /// Resolves the numeric chain ID of the connected network.
    fn chain_id(&self) -> impl Future<Output = Result<ChainId, LedgerError>> + Send;

    /// Creates a deposit, sending `deposit.amount` along with the call.
    fn deposit(
        &self,
        deposit: &NewDeposit,
    ) -> impl Future<Output = Result<DepositSubmission, LedgerError>> + Send;

    /// Relays a claim for `attestation.deposit_id` to `attestation.payout_address`.
    fn claim(
        &self,
        attestation: &Attestation,
        signature: &Bytes,
    ) -> impl Future<Output = Result<TransactionOutcome, LedgerError>> + Send;

    /// Refunds an unclaimed deposit to its depositor.
    fn refund(
        &self,
        deposit_id: U256,
    ) -> impl Future<Output = Result<TransactionOutcome, LedgerError>> + Send;

    /// Reads a deposit record.
    fn get_deposit(
        &self,
        deposit_id: U256,
    ) -> impl Future<Output = Result<DepositRecord, LedgerError>> + Send;
}
