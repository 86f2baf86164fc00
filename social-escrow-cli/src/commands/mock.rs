//! Recording in-memory ledger for dispatcher tests.

use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_signer_local::PrivateKeySigner;
use social_escrow::EscrowError;
use social_escrow_evm::attestation::Attestation;
use social_escrow_evm::chain::{ChainId, LOCAL_DEVNET};
use social_escrow_evm::ledger::{
    DepositCreatedEvent, DepositRecord, DepositSubmission, EscrowLedger, LedgerError, NewDeposit,
    TransactionOutcome,
};

use super::LedgerConnector;
use crate::cli::{AttestationArgs, GlobalArgs};
use crate::config::EscrowConfig;

pub const ATTESTER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEPOSITOR_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub const RELAYER_KEY: &str = "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

pub const ESCROW: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// A configuration with every setting present except the chain ID override.
pub fn config_with(edit: impl FnOnce(&mut GlobalArgs)) -> EscrowConfig {
    let mut args = GlobalArgs {
        rpc_url: Some("http://127.0.0.1:8545".into()),
        escrow_address: Some(ESCROW.into()),
        chain_id: None,
        depositor_key: Some(DEPOSITOR_KEY.parse().unwrap()),
        relayer_key: Some(RELAYER_KEY.parse().unwrap()),
        attester_key: Some(ATTESTER_KEY.parse().unwrap()),
        json: false,
    };
    edit(&mut args);
    EscrowConfig::from_args(args).unwrap()
}

/// platformId=1, userId=987654321, payout=0x1111…1111, depositId=1, nonce=42,
/// expiry=1724000000.
pub fn fixed_args() -> AttestationArgs {
    AttestationArgs {
        platform_id: "1".into(),
        user_id: "987654321".into(),
        payout_address: "0x1111111111111111111111111111111111111111".into(),
        deposit_id: "1".into(),
        nonce: Some("42".into()),
        expiry: Some("1724000000".into()),
    }
}

pub fn address_of(key: &str) -> Address {
    key.parse::<PrivateKeySigner>().unwrap().address()
}

/// A call observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Connect(Option<Address>),
    ChainId,
    Deposit(NewDeposit),
    Claim(Attestation, Bytes),
    Refund(U256),
    GetDeposit(U256),
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<LedgerCall>,
}

#[derive(Debug, Clone)]
pub struct MockConnector {
    state: Arc<Mutex<State>>,
    chain_id: ChainId,
    record: Option<DepositRecord>,
    emit_event: bool,
    revert: bool,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            chain_id: LOCAL_DEVNET,
            record: None,
            emit_event: true,
            revert: false,
        }
    }
}

impl MockConnector {
    pub fn with_chain_id(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            ..Self::default()
        }
    }

    pub fn with_record(record: DepositRecord) -> Self {
        Self {
            record: Some(record),
            ..Self::default()
        }
    }

    pub fn without_event() -> Self {
        Self {
            emit_event: false,
            ..Self::default()
        }
    }

    pub fn reverting() -> Self {
        Self {
            revert: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<LedgerCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn connects(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, LedgerCall::Connect(_)))
            .count()
    }

    fn push(&self, call: LedgerCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl LedgerConnector for MockConnector {
    type Ledger = MockLedger;

    fn connect(
        &self,
        config: &EscrowConfig,
        signer: Option<PrivateKeySigner>,
    ) -> Result<MockLedger, EscrowError> {
        config.rpc_url()?;
        config.escrow_address()?;
        let sender = signer.map(|s| s.address());
        self.push(LedgerCall::Connect(sender));
        Ok(MockLedger {
            connector: self.clone(),
            sender,
        })
    }
}

pub struct MockLedger {
    connector: MockConnector,
    sender: Option<Address>,
}

impl MockLedger {
    fn outcome(&self) -> Result<TransactionOutcome, LedgerError> {
        let tx_hash = TxHash::repeat_byte(0xab);
        if self.connector.revert {
            return Err(LedgerError::TransactionReverted(tx_hash));
        }
        Ok(TransactionOutcome {
            tx_hash,
            block_number: Some(7),
            gas_used: 21_000,
        })
    }
}

impl EscrowLedger for MockLedger {
    async fn chain_id(&self) -> Result<ChainId, LedgerError> {
        self.connector.push(LedgerCall::ChainId);
        Ok(self.connector.chain_id)
    }

    async fn deposit(&self, deposit: &NewDeposit) -> Result<DepositSubmission, LedgerError> {
        self.connector.push(LedgerCall::Deposit(deposit.clone()));
        let transaction = self.outcome()?;
        let created = self.connector.emit_event.then(|| DepositCreatedEvent {
            deposit_id: U256::from(1),
            depositor: self.sender.unwrap_or_default(),
            amount: deposit.amount,
            platform_id: deposit.platform_id,
            recipient_user_id: deposit.recipient_user_id,
            depositor_user_id: deposit.depositor_user_id,
            content_uri: deposit.content_uri.clone(),
        });
        Ok(DepositSubmission {
            transaction,
            created,
        })
    }

    async fn claim(
        &self,
        attestation: &Attestation,
        signature: &Bytes,
    ) -> Result<TransactionOutcome, LedgerError> {
        self.connector
            .push(LedgerCall::Claim(*attestation, signature.clone()));
        self.outcome()
    }

    async fn refund(&self, deposit_id: U256) -> Result<TransactionOutcome, LedgerError> {
        self.connector.push(LedgerCall::Refund(deposit_id));
        self.outcome()
    }

    async fn get_deposit(&self, deposit_id: U256) -> Result<DepositRecord, LedgerError> {
        self.connector.push(LedgerCall::GetDeposit(deposit_id));
        Ok(self.connector.record.clone().unwrap_or(DepositRecord {
            depositor: Address::ZERO,
            amount: U256::ZERO,
            platform_id: 0,
            recipient_user_id: U256::ZERO,
            depositor_user_id: U256::ZERO,
            content_uri: String::new(),
            claimed: false,
        }))
    }
}

#[test]
fn test_known_addresses() {
    assert_eq!(
        address_of(ATTESTER_KEY),
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            .parse::<Address>()
            .unwrap()
    );
}
