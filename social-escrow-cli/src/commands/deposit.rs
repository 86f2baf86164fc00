use social_escrow::EscrowError;
use social_escrow::amount::parse_ether;
use social_escrow::parse::{parse_u8, parse_u256};
use social_escrow_evm::ledger::{EscrowLedger, NewDeposit};

use super::{Dispatcher, LedgerConnector};
use crate::cli::{DepositArgs, DepositIdArgs};
use crate::config::KeyRole;
use crate::output::{DepositReport, DepositView, RefundReport};

impl<C: LedgerConnector> Dispatcher<'_, C> {
    pub(super) async fn deposit(&self, args: &DepositArgs) -> Result<DepositReport, EscrowError> {
        let deposit = NewDeposit {
            platform_id: parse_u8(&args.platform_id)?,
            recipient_user_id: parse_u256(&args.recipient_user_id)?,
            depositor_user_id: parse_u256(&args.depositor_user_id)?,
            content_uri: args.content_uri.clone(),
            amount: parse_ether(&args.amount)?,
        };
        let depositor = self.config.signer(KeyRole::Depositor)?;
        let depositor_address = depositor.address();

        let ledger = self.connector.connect(self.config, Some(depositor))?;
        let submission = ledger.deposit(&deposit).await?;
        match &submission.created {
            Some(event) => tracing::info!(
                deposit_id = %event.deposit_id,
                tx = %submission.transaction.tx_hash,
                "Deposit created"
            ),
            None => tracing::warn!(
                tx = %submission.transaction.tx_hash,
                "Deposit mined but no DepositCreated event was found in the receipt"
            ),
        }

        Ok(DepositReport {
            depositor: depositor_address,
            amount: deposit.amount,
            transaction: submission.transaction,
            event: submission.created,
        })
    }

    pub(super) async fn get_deposit(&self, args: &DepositIdArgs) -> Result<DepositView, EscrowError> {
        let deposit_id = parse_u256(&args.deposit_id)?;
        let ledger = self.connector.connect(self.config, None)?;
        let record = ledger.get_deposit(deposit_id).await?;
        if !record.exists() {
            tracing::debug!(deposit_id = %deposit_id, "Deposit not found");
        }
        Ok(DepositView {
            deposit_id,
            exists: record.exists(),
            record,
        })
    }

    pub(super) async fn refund(&self, args: &DepositIdArgs) -> Result<RefundReport, EscrowError> {
        let deposit_id = parse_u256(&args.deposit_id)?;
        let depositor = self.config.signer(KeyRole::Depositor)?;
        let depositor_address = depositor.address();

        let ledger = self.connector.connect(self.config, Some(depositor))?;
        let transaction = ledger.refund(deposit_id).await?;
        tracing::info!(deposit_id = %deposit_id, tx = %transaction.tx_hash, "Deposit refunded");

        Ok(RefundReport {
            deposit_id,
            depositor: depositor_address,
            transaction,
        })
    }
}
