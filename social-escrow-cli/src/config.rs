//! Client configuration.
//!
//! Built once from the global command-line arguments, which clap already
//! fills from the environment. A `.env` file in the working directory is
//! loaded by the binary before parsing.
//!
//! # Environment Variables
//!
//! - `RPC_URL` - JSON-RPC endpoint
//! - `ESCROW_ADDRESS` - Escrow contract address
//! - `CHAIN_ID` - Chain ID override for the attestation domain
//! - `DEPOSITOR_PRIVATE_KEY` - Key funding deposits and refunds
//! - `RELAYER_PRIVATE_KEY` - Key paying gas for claims
//! - `ATTESTER_PRIVATE_KEY` - Key signing attestations
//!
//! Nothing is validated eagerly beyond the chain ID: each command asks for
//! exactly the settings it needs, so `verify` works without an RPC URL and
//! `get-deposit` without any key.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use social_escrow::parse::{parse_address, parse_u64};
use social_escrow::{ConfigError, EscrowError};
use social_escrow_evm::attestation::parse_signing_key;
use social_escrow_evm::chain::ChainId;
use url::Url;

use crate::cli::GlobalArgs;

/// Private key text that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    /// Returns the raw key text.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for SecretKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// The three keys the client may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Funds deposits and requests refunds.
    Depositor,
    /// Pays gas for relayed claims.
    Relayer,
    /// Signs claim attestations.
    Attester,
}

impl KeyRole {
    /// Name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Depositor => "depositor",
            Self::Relayer => "relayer",
            Self::Attester => "attester",
        }
    }

    const fn env(self) -> &'static str {
        match self {
            Self::Depositor => "DEPOSITOR_PRIVATE_KEY",
            Self::Relayer => "RELAYER_PRIVATE_KEY",
            Self::Attester => "ATTESTER_PRIVATE_KEY",
        }
    }

    const fn flag(self) -> &'static str {
        match self {
            Self::Depositor => "--depositor-key",
            Self::Relayer => "--relayer-key",
            Self::Attester => "--attester-key",
        }
    }

    const fn missing_name(self) -> &'static str {
        match self {
            Self::Depositor => "depositor private key",
            Self::Relayer => "relayer private key",
            Self::Attester => "attester private key",
        }
    }
}

/// Resolved client configuration.
#[derive(Debug, Clone, Default)]
pub struct EscrowConfig {
    rpc_url: Option<String>,
    escrow_address: Option<String>,
    chain_id: Option<ChainId>,
    depositor_key: Option<SecretKey>,
    relayer_key: Option<SecretKey>,
    attester_key: Option<SecretKey>,
    json: bool,
}

impl EscrowConfig {
    /// Builds the configuration from parsed global arguments.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `CHAIN_ID` is set but not an unsigned
    /// 64-bit integer.
    pub fn from_args(args: GlobalArgs) -> Result<Self, EscrowError> {
        let chain_id = non_blank(args.chain_id)
            .map(|raw| parse_u64(&raw))
            .transpose()?;
        Ok(Self {
            rpc_url: non_blank(args.rpc_url),
            escrow_address: non_blank(args.escrow_address),
            chain_id,
            depositor_key: args.depositor_key.filter(|k| !k.expose().trim().is_empty()),
            relayer_key: args.relayer_key.filter(|k| !k.expose().trim().is_empty()),
            attester_key: args.attester_key.filter(|k| !k.expose().trim().is_empty()),
            json: args.json,
        })
    }

    /// Whether output should be JSON.
    #[must_use]
    pub const fn json(&self) -> bool {
        self.json
    }

    /// Chain ID override, if configured.
    #[must_use]
    pub const fn chain_id_override(&self) -> Option<ChainId> {
        self.chain_id
    }

    /// Chain ID override, required.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if no chain ID was configured.
    pub fn require_chain_id(&self) -> Result<ChainId, ConfigError> {
        self.chain_id.ok_or(ConfigError::Missing {
            name: "chain ID",
            env: "CHAIN_ID",
            flag: "--chain-id",
        })
    }

    /// The JSON-RPC endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the URL is missing or unparsable.
    pub fn rpc_url(&self) -> Result<Url, ConfigError> {
        let raw = self.rpc_url.as_deref().ok_or(ConfigError::Missing {
            name: "RPC URL",
            env: "RPC_URL",
            flag: "--rpc-url",
        })?;
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidRpcUrl {
            url: raw.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Raw escrow address text, as given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if no address was configured.
    pub fn escrow_address_raw(&self) -> Result<&str, ConfigError> {
        self.escrow_address
            .as_deref()
            .map(str::trim)
            .ok_or(ConfigError::Missing {
                name: "escrow address",
                env: "ESCROW_ADDRESS",
                flag: "--escrow-address",
            })
    }

    /// The escrow contract address.
    ///
    /// # Errors
    ///
    /// Returns a config error if unset and a validation error if malformed.
    pub fn escrow_address(&self) -> Result<Address, EscrowError> {
        Ok(parse_address(self.escrow_address_raw()?)?)
    }

    /// Whether a key is configured for `role`.
    #[must_use]
    pub const fn has_key(&self, role: KeyRole) -> bool {
        self.key(role).is_some()
    }

    /// Parses the key configured for `role`.
    ///
    /// # Errors
    ///
    /// Returns a config error if the key is unset and a key error if it is
    /// not a valid secp256k1 private key.
    pub fn signer(&self, role: KeyRole) -> Result<PrivateKeySigner, EscrowError> {
        let key = self.key(role).ok_or(ConfigError::Missing {
            name: role.missing_name(),
            env: role.env(),
            flag: role.flag(),
        })?;
        Ok(parse_signing_key(role.name(), key.expose())?)
    }

    const fn key(&self, role: KeyRole) -> Option<&SecretKey> {
        match role {
            KeyRole::Depositor => self.depositor_key.as_ref(),
            KeyRole::Relayer => self.relayer_key.as_ref(),
            KeyRole::Attester => self.attester_key.as_ref(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
