#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Command-line client for the social escrow.
//!
//! Tips are deposited against a platform identity (a social network user ID)
//! and released to whichever wallet that user names, once an off-chain
//! attester signs an EIP-712 claim attestation binding the identity to the
//! payout address.
//!
//! # Commands
//!
//! - `deposit` - fund a deposit for a platform user
//! - `attest` - sign a claim attestation with the attester key
//! - `verify` - recover the signer of an attestation, locally
//! - `claim` - preflight and relay a claim with the relayer key
//! - `get-deposit` - read a deposit record
//! - `refund` - refund an unclaimed deposit
//!
//! Handlers live in [`commands`] and are driven by a
//! [`Dispatcher`](commands::Dispatcher) over an
//! [`EscrowConfig`](config::EscrowConfig).

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
