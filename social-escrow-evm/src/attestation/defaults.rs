//! Default nonce and expiry for freshly issued attestations.
//!
//! The default nonce is time-derived with a small random offset. Two
//! attestations issued within the same second collide with probability 1/1000,
//! so automated or concurrent callers must pass explicit nonces.

use alloy_primitives::U256;
use rand::RngExt;
use social_escrow::UnixTimestamp;

/// Default attestation lifetime (24 hours).
pub const DEFAULT_VALIDITY_SECS: u64 = 86_400;

/// Width of the random offset added to the millisecond-scaled timestamp.
pub const NONCE_JITTER: u64 = 1_000;

/// Returns `now * 1000 + r` with `r` drawn uniformly from `0..1000`.
#[must_use]
pub fn default_nonce(now: UnixTimestamp) -> U256 {
    let jitter = rand::rng().random_range(0..NONCE_JITTER);
    U256::from(now.as_secs()) * U256::from(NONCE_JITTER) + U256::from(jitter)
}

/// Returns `now + 24h`.
#[must_use]
pub fn default_expiry(now: UnixTimestamp) -> UnixTimestamp {
    now + DEFAULT_VALIDITY_SECS
}
