use alloy_primitives::{Address, Bytes};
use alloy_signer_local::PrivateKeySigner;
use social_escrow::parse::parse_address;
use social_escrow::{EscrowError, SignatureError, UnixTimestamp};
use social_escrow_evm::attestation::{
    AttestationDomain, decode_signature_hex, parse_signature, sign, verify as verify_attestation,
};
use social_escrow_evm::ledger::EscrowLedger;

use super::attest::{attestation_with_defaults, signed_attestation};
use super::{Dispatcher, LedgerConnector};
use crate::cli::ClaimArgs;
use crate::config::KeyRole;
use crate::output::ClaimReport;

/// Where the claim signature comes from.
enum SignatureSource {
    Provided(Bytes),
    Attester(PrivateKeySigner),
}

impl<C: LedgerConnector> Dispatcher<'_, C> {
    /// Relays a claim.
    ///
    /// Every input and required key is checked before the ledger is opened.
    /// The signer is always recovered locally first; a mismatch with the
    /// expected signer aborts without sending anything. With a provided
    /// signature the attester key is optional, and an unusable one is skipped
    /// with a warning.
    pub(super) async fn claim(&self, args: &ClaimArgs) -> Result<ClaimReport, EscrowError> {
        let provided = args
            .signature
            .as_deref()
            .map(decode_signature_hex)
            .transpose()?;
        if let Some(bytes) = &provided {
            parse_signature(bytes)?;
        }
        let attestation = if provided.is_some() {
            signed_attestation(&args.attestation)?
        } else {
            attestation_with_defaults(&args.attestation, UnixTimestamp::now())?
        };
        let mut expected = args
            .expected_signer
            .as_deref()
            .map(parse_address)
            .transpose()?;
        let escrow = self.config.escrow_address()?;
        let relayer = self.config.signer(KeyRole::Relayer)?;

        let source = match provided {
            Some(signature) => {
                // The attester key only supplies a default expected signer here.
                if expected.is_none() && self.config.has_key(KeyRole::Attester) {
                    match self.config.signer(KeyRole::Attester) {
                        Ok(attester) => expected = Some(attester.address()),
                        Err(e) => tracing::warn!(
                            error = %e,
                            "Attester key unusable, relaying without an expected signer"
                        ),
                    }
                }
                SignatureSource::Provided(signature)
            }
            None => {
                let attester = self.config.signer(KeyRole::Attester)?;
                expected = expected.or(Some(attester.address()));
                SignatureSource::Attester(attester)
            }
        };

        let relayer_address = relayer.address();
        let ledger = self.connector.connect(self.config, Some(relayer))?;
        let chain_id = match self.config.chain_id_override() {
            Some(chain_id) => chain_id,
            None => ledger.chain_id().await?,
        };
        let domain = AttestationDomain::new(chain_id, escrow);

        let signature = match source {
            SignatureSource::Provided(signature) => signature,
            SignatureSource::Attester(attester) => {
                let signature = sign(&domain, &attestation, &attester).await?;
                Bytes::copy_from_slice(&signature.as_bytes())
            }
        };

        let verification = verify_attestation(&domain, &attestation, &signature, expected)?;
        tracing::info!(
            recovered = %verification.recovered,
            expected = ?expected,
            deposit_id = %attestation.deposit_id,
            "Claim preflight recovered attestation signer"
        );
        check_signer(expected, verification.recovered)?;

        let transaction = ledger.claim(&attestation, &signature).await?;
        tracing::info!(tx = %transaction.tx_hash, relayer = %relayer_address, "Claim relayed");

        Ok(ClaimReport {
            attestation,
            signer: verification.recovered,
            signature,
            relayer: relayer_address,
            transaction,
        })
    }
}

fn check_signer(expected: Option<Address>, recovered: Address) -> Result<(), SignatureError> {
    match expected {
        Some(expected) if expected != recovered => Err(SignatureError::SignerMismatch {
            expected: expected.to_string(),
            recovered: recovered.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use social_escrow::{ConfigError, ValidationError};
    use social_escrow_evm::attestation::{AttestationSigner, recover};

    use super::*;
    use crate::cli::{AttestationArgs, Command};
    use crate::commands::mock::{
        ATTESTER_KEY, ESCROW, LedgerCall, MockConnector, RELAYER_KEY, address_of, config_with,
        fixed_args,
    };
    use crate::output::Report;

    const OTHER_KEY: &str = "0x7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6";

    fn claim_args() -> ClaimArgs {
        ClaimArgs {
            attestation: fixed_args(),
            signature: None,
            expected_signer: None,
        }
    }

    async fn signature_from(key: &str, chain_id: u64) -> String {
        let signer: PrivateKeySigner = key.parse().unwrap();
        let domain = AttestationDomain::new(chain_id, ESCROW.parse().unwrap());
        let value = signed_attestation(&fixed_args()).unwrap();
        let signature = sign(&domain, &value, &signer).await.unwrap();
        assert_eq!(AttestationSigner::address(&signer), address_of(key));
        Bytes::copy_from_slice(&signature.as_bytes()).to_string()
    }

    #[tokio::test]
    async fn test_malformed_payout_never_reaches_ledger() {
        let config = config_with(|_| {});
        let connector = MockConnector::default();
        let mut args = claim_args();
        args.attestation.payout_address = "0x1111".into();

        let err = Dispatcher::new(&config, connector.clone())
            .dispatch(Command::Claim(args))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EscrowError::Validation(ValidationError::InvalidAddress(_))
        ));
        assert!(connector.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_inputs_never_reach_ledger() {
        let cases: [(ClaimArgs, fn(&EscrowError) -> bool); 6] = [
            (
                ClaimArgs {
                    signature: Some("0x0102030405".into()),
                    ..claim_args()
                },
                |e| matches!(e, EscrowError::Signature(SignatureError::InvalidLength(5))),
            ),
            (
                ClaimArgs {
                    signature: Some(format!("0x{}05", "11".repeat(64))),
                    ..claim_args()
                },
                |e| matches!(e, EscrowError::Signature(SignatureError::Malformed(_))),
            ),
            (
                ClaimArgs {
                    signature: Some("0xzz".into()),
                    ..claim_args()
                },
                |e| matches!(e, EscrowError::Signature(SignatureError::InvalidHex(_))),
            ),
            (
                ClaimArgs {
                    attestation: AttestationArgs {
                        nonce: None,
                        ..fixed_args()
                    },
                    signature: Some(format!("0x{}1b", "11".repeat(64))),
                    expected_signer: None,
                },
                |e| matches!(e, EscrowError::Validation(ValidationError::Missing("--nonce"))),
            ),
            (
                ClaimArgs {
                    expected_signer: Some("not an address".into()),
                    ..claim_args()
                },
                |e| matches!(e, EscrowError::Validation(ValidationError::InvalidAddress(_))),
            ),
            (
                ClaimArgs {
                    attestation: AttestationArgs {
                        deposit_id: "-1".into(),
                        ..fixed_args()
                    },
                    ..claim_args()
                },
                |e| matches!(e, EscrowError::Validation(ValidationError::InvalidInteger { .. })),
            ),
        ];

        for (args, is_expected) in cases {
            let config = config_with(|_| {});
            let connector = MockConnector::default();
            let err = Dispatcher::new(&config, connector.clone())
                .dispatch(Command::Claim(args))
                .await
                .unwrap_err();
            assert!(is_expected(&err), "unexpected error: {err}");
            assert!(connector.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_missing_relayer_key_never_reaches_ledger() {
        let config = config_with(|args| args.relayer_key = None);
        let connector = MockConnector::default();
        let err = Dispatcher::new(&config, connector.clone())
            .dispatch(Command::Claim(claim_args()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EscrowError::Config(ConfigError::Missing {
                env: "RELAYER_PRIVATE_KEY",
                ..
            })
        ));
        assert!(connector.calls().is_empty());
    }

    #[tokio::test]
    async fn test_signs_with_attester_and_relays() {
        let config = config_with(|_| {});
        let connector = MockConnector::default();

        let Report::Claim(report) = Dispatcher::new(&config, connector.clone())
            .dispatch(Command::Claim(claim_args()))
            .await
            .unwrap()
        else {
            panic!("expected claim report");
        };
        assert_eq!(report.signer, address_of(ATTESTER_KEY));
        assert_eq!(report.relayer, address_of(RELAYER_KEY));

        let calls = connector.calls();
        assert_eq!(calls[0], LedgerCall::Connect(Some(address_of(RELAYER_KEY))));
        assert_eq!(calls[1], LedgerCall::ChainId);
        let LedgerCall::Claim(relayed, signature) = &calls[2] else {
            panic!("expected claim call, got {calls:?}");
        };
        assert_eq!(relayed.deposit_id, U256::from(1));
        let domain = AttestationDomain::new(31337, ESCROW.parse().unwrap());
        assert_eq!(
            recover(&domain, relayed, signature).unwrap(),
            address_of(ATTESTER_KEY)
        );
    }

    #[tokio::test]
    async fn test_provided_signature_from_other_key_is_rejected() {
        let config = config_with(|args| args.chain_id = Some("31337".into()));
        let connector = MockConnector::default();
        let args = ClaimArgs {
            signature: Some(signature_from(OTHER_KEY, 31337).await),
            ..claim_args()
        };

        let err = Dispatcher::new(&config, connector.clone())
            .dispatch(Command::Claim(args))
            .await
            .unwrap_err();
        let EscrowError::Signature(SignatureError::SignerMismatch { expected, recovered }) = err
        else {
            panic!("expected signer mismatch, got {err}");
        };
        assert_eq!(expected, address_of(ATTESTER_KEY).to_string());
        assert_eq!(recovered, address_of(OTHER_KEY).to_string());
        assert!(
            !connector
                .calls()
                .iter()
                .any(|c| matches!(c, LedgerCall::Claim(..)))
        );
    }

    #[tokio::test]
    async fn test_signature_for_other_chain_is_rejected() {
        let config = config_with(|args| args.chain_id = Some("31337".into()));
        let connector = MockConnector::default();
        let args = ClaimArgs {
            signature: Some(signature_from(ATTESTER_KEY, 8453).await),
            ..claim_args()
        };
        let err = Dispatcher::new(&config, connector.clone())
            .dispatch(Command::Claim(args))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EscrowError::Signature(SignatureError::SignerMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_provided_signature_with_explicit_expected_signer() {
        let config = config_with(|args| {
            args.chain_id = Some("31337".into());
            args.attester_key = None;
        });
        let connector = MockConnector::default();
        let signature = signature_from(OTHER_KEY, 31337).await;
        let args = ClaimArgs {
            signature: Some(signature.clone()),
            expected_signer: Some(address_of(OTHER_KEY).to_string()),
            ..claim_args()
        };

        let Report::Claim(report) = Dispatcher::new(&config, connector.clone())
            .dispatch(Command::Claim(args))
            .await
            .unwrap()
        else {
            panic!("expected claim report");
        };
        assert_eq!(report.signer, address_of(OTHER_KEY));
        assert_eq!(report.signature.to_string(), signature);
        assert!(!connector.calls().contains(&LedgerCall::ChainId));
    }

    #[tokio::test]
    async fn test_provided_signature_without_any_expectation_relays() {
        let config = config_with(|args| {
            args.chain_id = Some("31337".into());
            args.attester_key = None;
        });
        let connector = MockConnector::default();
        let args = ClaimArgs {
            signature: Some(signature_from(OTHER_KEY, 31337).await),
            ..claim_args()
        };
        let report = Dispatcher::new(&config, connector.clone())
            .dispatch(Command::Claim(args))
            .await
            .unwrap();
        assert!(matches!(report, Report::Claim(_)));
    }

    #[tokio::test]
    async fn test_malformed_attester_key_is_ignored_for_provided_signature() {
        let config = config_with(|args| {
            args.chain_id = Some("31337".into());
            args.attester_key = Some("0xnotakey".parse().unwrap());
        });
        let connector = MockConnector::default();
        let args = ClaimArgs {
            signature: Some(signature_from(OTHER_KEY, 31337).await),
            ..claim_args()
        };
        let Report::Claim(report) = Dispatcher::new(&config, connector.clone())
            .dispatch(Command::Claim(args))
            .await
            .unwrap()
        else {
            panic!("expected claim report");
        };
        assert_eq!(report.signer, address_of(OTHER_KEY));
    }

    #[tokio::test]
    async fn test_malformed_attester_key_fails_when_signing() {
        let config = config_with(|args| args.attester_key = Some("0xnotakey".parse().unwrap()));
        let connector = MockConnector::default();
        let err = Dispatcher::new(&config, connector.clone())
            .dispatch(Command::Claim(claim_args()))
            .await
            .unwrap_err();
        assert!(matches!(err, EscrowError::Key(_)));
        assert!(connector.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reverted_claim_is_a_ledger_error() {
        let config = config_with(|args| args.chain_id = Some("31337".into()));
        let err = Dispatcher::new(&config, MockConnector::reverting())
            .dispatch(Command::Claim(claim_args()))
            .await
            .unwrap_err();
        assert!(matches!(err, EscrowError::Ledger(msg) if msg.contains("reverted")));
    }

    #[test]
    fn test_check_signer() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        assert!(check_signer(None, a).is_ok());
        assert!(check_signer(Some(a), a).is_ok());
        assert!(check_signer(Some(a), b).is_err());
    }
}
