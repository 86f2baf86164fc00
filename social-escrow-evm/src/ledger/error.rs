//! Error types for the ledger client.

use alloy_primitives::TxHash;
use alloy_provider::PendingTransactionError;
use alloy_transport::TransportError;
use social_escrow::EscrowError;

/// Errors surfaced by the ledger client.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// RPC transport error.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Error while waiting for a transaction receipt.
    #[error(transparent)]
    PendingTransaction(#[from] PendingTransactionError),
    /// On-chain transaction was reverted.
    #[error("Transaction {0} reverted")]
    TransactionReverted(TxHash),
    /// Contract call failed (revert during estimation, ABI mismatch).
    #[error("Contract call failed: {0}")]
    ContractCall(String),
}

impl From<alloy_contract::Error> for LedgerError {
    fn from(e: alloy_contract::Error) -> Self {
        match e {
            alloy_contract::Error::TransportError(e) => Self::Transport(e),
            alloy_contract::Error::PendingTransactionError(e) => Self::PendingTransaction(e),
            other => Self::ContractCall(other.to_string()),
        }
    }
}

impl From<LedgerError> for EscrowError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value.to_string())
    }
}
