//! EIP-712 claim attestations.
//!
//! - [`types`] - the attestation value, its domain and the typed-data struct
//! - [`codec`] - domain building, signing, recovery and verification
//! - [`signer`] - private key parsing and the signing seam
//! - [`defaults`] - default nonce and expiry

pub mod codec;
pub mod defaults;
pub mod signer;
pub mod types;

pub use codec::*;
pub use defaults::{default_expiry, default_nonce};
pub use signer::{AttestationSigner, parse_signing_key};
pub use types::*;
