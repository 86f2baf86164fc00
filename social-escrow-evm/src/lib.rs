#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! EVM support for the social escrow client.
//!
//! Claims against the escrow contract are authorized by an off-chain attester
//! that signs an EIP-712 `ClaimAttestation`. This crate builds, signs and
//! verifies those attestations and, behind the `ledger` feature, talks to the
//! escrow contract over JSON-RPC.
//!
//! # Architecture
//!
//! - [`attestation`] - EIP-712 domain, typed struct, signing and recovery
//! - [`chain`] - Chain ID helpers
//! - `contract` - Solidity bindings of the escrow (`ledger` feature)
//! - `ledger` - the [`EscrowLedger`](ledger::EscrowLedger) collaborator and its
//!   JSON-RPC implementation (`ledger` feature)
//!
//! # Feature Flags
//!
//! - `ledger` - Contract bindings and the alloy-based ledger client
//! - `telemetry` - Tracing instrumentation
//!
pub mod attestation;
pub mod chain;

#[cfg(feature = "ledger")]
pub mod contract;
#[cfg(feature = "ledger")]
pub mod ledger;

pub use attestation::{Attestation, AttestationDomain, Verification};
