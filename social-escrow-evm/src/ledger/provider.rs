//! JSON-RPC ledger client built on an alloy provider.

use alloy_contract::SolCallBuilder;
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolCall;
#[cfg(feature = "telemetry")]
use tracing::instrument;
use url::Url;

use super::{
    DepositCreatedEvent, DepositRecord, DepositSubmission, EscrowLedger, LedgerError, NewDeposit,
    TransactionOutcome,
};
use crate::attestation::Attestation;
use crate::chain::ChainId;
use crate::contract::ISocialEscrow;

/// Awaits a future, optionally instrumenting it with a tracing span.
macro_rules! traced {
    ($fut:expr, $span:expr) => {{
        #[cfg(feature = "telemetry")]
        {
            use tracing::Instrument;
            $fut.instrument($span).await
        }
        #[cfg(not(feature = "telemetry"))]
        {
            $fut.await
        }
    }};
}

/// Escrow ledger backed by an HTTP JSON-RPC endpoint.
///
/// Built with or without a wallet: read-only commands (`get-deposit`, chain
/// ID resolution) need none, transactions are signed by the wallet's single
/// signer. Gas, nonce and chain ID are filled by the provider.
pub struct AlloyLedger {
    contract: ISocialEscrow::ISocialEscrowInstance<DynProvider>,
}

impl std::fmt::Debug for AlloyLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyLedger")
            .field("escrow", self.contract.address())
            .finish_non_exhaustive()
    }
}

impl AlloyLedger {
    /// Connects to `rpc_url` and binds the escrow contract at `escrow`.
    ///
    /// No request is made until the first operation.
    #[must_use]
    pub fn connect(rpc_url: Url, escrow: Address, signer: Option<PrivateKeySigner>) -> Self {
        let provider = match signer {
            Some(signer) => {
                #[cfg(feature = "telemetry")]
                tracing::debug!(rpc_url = %rpc_url, sender = %signer.address(), "Using signing provider");
                ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(rpc_url)
                    .erased()
            }
            None => {
                #[cfg(feature = "telemetry")]
                tracing::debug!(rpc_url = %rpc_url, "Using read-only provider");
                ProviderBuilder::new().connect_http(rpc_url).erased()
            }
        };
        Self {
            contract: ISocialEscrow::new(escrow, provider),
        }
    }

    /// Sends a prepared call and waits for a successful receipt.
    async fn submit<C>(call: SolCallBuilder<&DynProvider, C>) -> Result<TransactionReceipt, LedgerError>
    where
        C: SolCall + Send + Sync,
    {
        let pending = call.send().await?;
        #[cfg(feature = "telemetry")]
        tracing::info!(tx = %pending.tx_hash(), "Transaction submitted, waiting for receipt");
        let receipt = pending.get_receipt().await?;
        if receipt.status() {
            Ok(receipt)
        } else {
            Err(LedgerError::TransactionReverted(receipt.transaction_hash))
        }
    }

    /// Finds the `DepositCreated` event emitted by this escrow in a receipt.
    fn deposit_created(&self, receipt: &TransactionReceipt) -> Option<DepositCreatedEvent> {
        let escrow = *self.contract.address();
        receipt
            .inner
            .logs()
            .iter()
            .filter(|log| log.address() == escrow)
            .find_map(|log| log.log_decode::<ISocialEscrow::DepositCreated>().ok())
            .map(|log| DepositCreatedEvent::from(log.inner.data))
    }
}

impl From<&TransactionReceipt> for TransactionOutcome {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        }
    }
}

impl From<ISocialEscrow::depositsReturn> for DepositRecord {
    fn from(value: ISocialEscrow::depositsReturn) -> Self {
        Self {
            depositor: value.depositor,
            amount: value.amount,
            platform_id: value.platformId,
            recipient_user_id: value.recipientUserId,
            depositor_user_id: value.depositorUserId,
            content_uri: value.contentUri,
            claimed: value.claimed,
        }
    }
}

impl EscrowLedger for AlloyLedger {
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err))]
    async fn chain_id(&self) -> Result<ChainId, LedgerError> {
        let chain_id_fut = self.contract.provider().get_chain_id().into_future();
        let chain_id = traced!(
            chain_id_fut,
            tracing::info_span!("get_chain_id", otel.kind = "client")
        )?;
        Ok(chain_id)
    }

    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(
        platform_id = deposit.platform_id,
        recipient_user_id = %deposit.recipient_user_id,
        amount = %deposit.amount,
    )))]
    async fn deposit(&self, deposit: &NewDeposit) -> Result<DepositSubmission, LedgerError> {
        let call = self
            .contract
            .deposit(
                deposit.platform_id,
                deposit.recipient_user_id,
                deposit.depositor_user_id,
                deposit.content_uri.clone(),
            )
            .value(deposit.amount);
        let receipt = Self::submit(call).await?;
        Ok(DepositSubmission {
            transaction: TransactionOutcome::from(&receipt),
            created: self.deposit_created(&receipt),
        })
    }

    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(
        deposit_id = %attestation.deposit_id,
        payout = %attestation.payout_address,
    )))]
    async fn claim(
        &self,
        attestation: &Attestation,
        signature: &Bytes,
    ) -> Result<TransactionOutcome, LedgerError> {
        let call = self.contract.claim(
            attestation.deposit_id,
            attestation.payout_address,
            ISocialEscrow::ClaimAttestation::from(attestation),
            signature.clone(),
        );
        let receipt = Self::submit(call).await?;
        Ok(TransactionOutcome::from(&receipt))
    }

    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(deposit_id = %deposit_id)))]
    async fn refund(&self, deposit_id: U256) -> Result<TransactionOutcome, LedgerError> {
        let call = self.contract.refund(deposit_id);
        let receipt = Self::submit(call).await?;
        Ok(TransactionOutcome::from(&receipt))
    }

    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(deposit_id = %deposit_id)))]
    async fn get_deposit(&self, deposit_id: U256) -> Result<DepositRecord, LedgerError> {
        let deposits = self.contract.deposits(deposit_id);
        let record_fut = deposits.call().into_future();
        let record = traced!(
            record_fut,
            tracing::info_span!("fetch_deposit", deposit_id = %deposit_id, otel.kind = "client")
        )?;
        Ok(DepositRecord::from(record))
    }
}
