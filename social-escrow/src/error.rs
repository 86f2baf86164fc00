//! Error types for the social escrow client.
//!
//! Every command either succeeds or fails with a single [`EscrowError`]. The
//! variants follow the stage that produced the failure: input validation,
//! configuration, key handling, signature handling, or the ledger.

/// Top-level error returned by every command.
#[derive(Debug, thiserror::Error)]
pub enum EscrowError {
    /// Malformed user input (address, amount, integer).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A required configuration item is missing or unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Private key material is missing or malformed.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Signature bytes are malformed or do not match the expected signer.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// Failure surfaced by the ledger client (RPC, reverted transaction).
    #[error("ledger error: {0}")]
    Ledger(String),
}

/// Malformed user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The value is not `0x` followed by exactly 40 hex characters.
    #[error("invalid address {0:?}: expected 0x followed by 40 hex characters")]
    InvalidAddress(String),

    /// The value is not a well-formed unsigned integer of the requested width.
    #[error("invalid {kind} {input:?}: {reason}")]
    InvalidInteger {
        /// Integer kind, e.g. `uint8`.
        kind: &'static str,
        /// Raw input.
        input: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The value is not a valid ether amount.
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount {
        /// Raw input.
        input: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A value that is optional in general is required in this context.
    #[error("{0} is required")]
    Missing(&'static str),
}

/// Missing or unusable configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required setting was not provided by flag or environment.
    #[error("missing {name} (set {env} or pass {flag})")]
    Missing {
        /// Human-readable setting name.
        name: &'static str,
        /// Environment variable that provides it.
        env: &'static str,
        /// Command-line flag that provides it.
        flag: &'static str,
    },

    /// The RPC endpoint is not a valid URL.
    #[error("invalid RPC URL {url:?}: {reason}")]
    InvalidRpcUrl {
        /// Raw value.
        url: String,
        /// Parser message.
        reason: String,
    },
}

/// Missing or malformed private key material.
///
/// Never carries the key itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The key is empty.
    #[error("{0} private key is empty")]
    Empty(&'static str),

    /// The key is not a valid secp256k1 private scalar.
    #[error("{role} private key is malformed: {reason}")]
    Malformed {
        /// Which key (depositor, relayer, attester).
        role: &'static str,
        /// Parser message.
        reason: String,
    },

    /// The signer rejected the signing request.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Malformed signature or signer mismatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The signature is not valid hex.
    #[error("signature is not valid hex: {0}")]
    InvalidHex(String),

    /// The signature has the wrong number of bytes.
    #[error("signature must be 65 bytes (or 64 in compact form), got {0}")]
    InvalidLength(usize),

    /// The signature bytes do not encode a valid secp256k1 signature.
    #[error("malformed signature: {0}")]
    Malformed(String),

    /// The recovered signer differs from the expected one.
    #[error("attestation signed by {recovered}, expected {expected}")]
    SignerMismatch {
        /// Expected signer address.
        expected: String,
        /// Address recovered from the signature.
        recovered: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_single_line() {
        let errors: Vec<EscrowError> = vec![
            ValidationError::InvalidAddress("0x12".into()).into(),
            ConfigError::Missing {
                name: "RPC URL",
                env: "RPC_URL",
                flag: "--rpc-url",
            }
            .into(),
            KeyError::Empty("relayer").into(),
            SignatureError::InvalidLength(12).into(),
            EscrowError::Ledger("execution reverted".into()),
        ];
        for err in errors {
            assert!(!err.to_string().contains('\n'), "{err}");
        }
    }

    #[test]
    fn test_config_error_names_the_source() {
        let err = ConfigError::Missing {
            name: "escrow address",
            env: "ESCROW_ADDRESS",
            flag: "--escrow-address",
        };
        assert_eq!(
            err.to_string(),
            "missing escrow address (set ESCROW_ADDRESS or pass --escrow-address)"
        );
    }
}
