//! Merkle inclusion proof carried by fill requests.

use serde::{Deserialize, Serialize};

/// A 32-byte SHA-256 digest.
pub type Digest32 = [u8; 32];

/// Inclusion proof for one leaf of a Merkle tree.
///
/// `aunts` lists the sibling hashes from the leaf up to (but excluding) the
/// root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Number of leaves in the tree.
    pub total: u64,
    /// Position of the proven leaf.
    pub index: u64,
    /// Domain-separated hash of the proven leaf.
    pub leaf_hash: Digest32,
    /// Sibling path, bottom-up.
    pub aunts: Vec<Digest32>,
}

/// 32 random secret bytes for tests.
#[cfg(any(test, feature = "test-helpers"))]
#[must_use]
pub fn random_secret() -> Vec<u8> {
    rand::random::<[u8; 32]>().to_vec()
}
