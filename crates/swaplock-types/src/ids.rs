//! Identifiers used throughout SwapLock.
//!
//! Swap IDs are derived deterministically from the swap's commitment inputs,
//! so replaying the same create request always yields the same ID. Order IDs
//! are supplied by the maker.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::SWAP_ID_SEPARATOR;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A local-ledger account address.
///
/// Holding an `Address` does not by itself prove the string is well-formed;
/// addresses entering the engine are produced by the host's address
/// validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// SwapId
// ---------------------------------------------------------------------------

/// Identity of an atomic swap: lowercase hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SwapId(pub String);

impl SwapId {
    /// Deterministic `SwapId` from the swap's identifying fields.
    ///
    /// `SHA-256(sender ":" recipient ":" random_number_hash ":" timestamp)`,
    /// hex-encoded. Identical inputs always collide, which is what makes a
    /// replayed create request fail with `AlreadyExists`.
    #[must_use]
    pub fn derive(
        sender: &str,
        recipient: &str,
        random_number_hash: &str,
        timestamp: i64,
    ) -> Self {
        let preimage = [
            sender,
            recipient,
            random_number_hash,
            &timestamp.to_string(),
        ]
        .join(SWAP_ID_SEPARATOR);
        Self(hex::encode(Sha256::digest(preimage.as_bytes())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SwapId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Maker-supplied identity of a partial-fill order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
