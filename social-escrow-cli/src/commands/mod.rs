//! Command handlers.
//!
//! The [`Dispatcher`] validates every input of a command before it asks its
//! [`LedgerConnector`] for a ledger, so malformed input never causes network
//! traffic. Commands that do not need the chain (`attest` with a chain ID
//! override, `verify`) never connect at all.

mod attest;
mod claim;
mod deposit;
#[cfg(test)]
mod mock;

use alloy_signer_local::PrivateKeySigner;
use social_escrow::EscrowError;
use social_escrow_evm::chain::ChainId;
use social_escrow_evm::ledger::{AlloyLedger, EscrowLedger};

use crate::cli::Command;
use crate::config::EscrowConfig;
use crate::output::Report;

/// Opens a ledger for a command.
///
/// `signer` is the key that pays for transactions; `None` for reads.
pub trait LedgerConnector {
    /// Ledger produced by this connector.
    type Ledger: EscrowLedger;

    /// Opens a ledger using the RPC URL and escrow address from `config`.
    ///
    /// # Errors
    ///
    /// Returns a config or validation error if either setting is missing or
    /// malformed.
    fn connect(
        &self,
        config: &EscrowConfig,
        signer: Option<PrivateKeySigner>,
    ) -> Result<Self::Ledger, EscrowError>;
}

/// Connects to the escrow over HTTP JSON-RPC.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcConnector;

impl LedgerConnector for RpcConnector {
    type Ledger = AlloyLedger;

    fn connect(
        &self,
        config: &EscrowConfig,
        signer: Option<PrivateKeySigner>,
    ) -> Result<AlloyLedger, EscrowError> {
        let rpc_url = config.rpc_url()?;
        let escrow = config.escrow_address()?;
        Ok(AlloyLedger::connect(rpc_url, escrow, signer))
    }
}

/// Runs commands against one configuration.
#[derive(Debug)]
pub struct Dispatcher<'a, C> {
    config: &'a EscrowConfig,
    connector: C,
}

impl<'a, C: LedgerConnector> Dispatcher<'a, C> {
    /// Creates a dispatcher.
    pub const fn new(config: &'a EscrowConfig, connector: C) -> Self {
        Self { config, connector }
    }

    /// Runs one command.
    ///
    /// # Errors
    ///
    /// Returns the first validation, configuration, key, signature or ledger
    /// error the command hits.
    pub async fn dispatch(&self, command: Command) -> Result<Report, EscrowError> {
        match command {
            Command::Deposit(args) => self.deposit(&args).await.map(Report::Deposit),
            Command::Attest(args) => self.attest(&args).await.map(Report::Attest),
            Command::Verify(args) => self.verify(&args).map(Report::Verify),
            Command::Claim(args) => self.claim(&args).await.map(Report::Claim),
            Command::GetDeposit(args) => self.get_deposit(&args).await.map(Report::GetDeposit),
            Command::Refund(args) => self.refund(&args).await.map(Report::Refund),
        }
    }

    /// Chain ID for the attestation domain: the configured override, or the
    /// chain reported by the RPC node.
    async fn resolve_chain_id(&self) -> Result<ChainId, EscrowError> {
        if let Some(chain_id) = self.config.chain_id_override() {
            tracing::debug!(chain_id, "Using configured chain ID");
            return Ok(chain_id);
        }
        let ledger = self.connector.connect(self.config, None)?;
        let chain_id = ledger.chain_id().await?;
        tracing::debug!(chain_id, "Resolved chain ID from RPC");
        Ok(chain_id)
    }
}
