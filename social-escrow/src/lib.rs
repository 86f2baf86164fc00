#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the social escrow client.
//!
//! The escrow itself is a smart contract: it holds deposits made for a user of
//! some social platform and releases them to a payout address once an attester
//! signs off on the claim. This crate holds the chain-agnostic pieces shared by
//! the EVM bindings and the command-line client.
//!
//! # Modules
//!
//! - [`amount`] - Ether amount parsing and formatting
//! - [`error`] - Error taxonomy surfaced by every command
//! - [`parse`] - Strict parsers for addresses and fixed-width integers
//! - [`timestamp`] - Unix timestamps used for attestation expiry

pub mod amount;
pub mod error;
pub mod parse;
pub mod timestamp;

pub use error::{ConfigError, EscrowError, KeyError, SignatureError, ValidationError};
pub use timestamp::UnixTimestamp;
