//! Merkle trees over fill secrets.
//!
//! Domain-separated SHA-256 (RFC 6962):
//! - `leaf_hash(x)     = SHA-256(0x00 || x)`
//! - `inner_hash(l, r) = SHA-256(0x01 || l || r)`
//!
//! A tree over `n > 1` items splits at the largest power of two strictly
//! less than `n`; the left subtree takes that many items. An empty tree
//! hashes to `SHA-256("")`.

use sha2::{Digest, Sha256};
use swaplock_types::{
    Digest32, MerkleProof, Result, SwapLockError, constants::FILL_COMMITMENT_LEAVES,
};

use crate::commitment::hash_secret;

const LEAF_PREFIX: u8 = 0x00;
const INNER_PREFIX: u8 = 0x01;

fn finalize(hasher: Sha256) -> Digest32 {
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

fn empty_hash() -> Digest32 {
    finalize(Sha256::new())
}

/// Hash of a leaf item.
#[must_use]
pub fn leaf_hash(item: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(item);
    finalize(hasher)
}

/// Hash of an inner node.
#[must_use]
pub fn inner_hash(left: &Digest32, right: &Digest32) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update([INNER_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    finalize(hasher)
}

/// Largest power of two strictly less than `n`. Requires `n >= 2`.
fn split_point(n: usize) -> usize {
    debug_assert!(n >= 2);
    let bits = usize::BITS - (n - 1).leading_zeros();
    1 << (bits - 1)
}

/// Root over a list of items (items are leaf-hashed here).
#[must_use]
pub fn root_from_items<T: AsRef<[u8]>>(items: &[T]) -> Digest32 {
    match items.len() {
        0 => empty_hash(),
        1 => leaf_hash(items[0].as_ref()),
        n => {
            let k = split_point(n);
            inner_hash(&root_from_items(&items[..k]), &root_from_items(&items[k..]))
        }
    }
}

/// Build the inclusion proof for `items[index]`.
#[must_use]
pub fn prove<T: AsRef<[u8]>>(items: &[T], index: usize) -> Option<MerkleProof> {
    if index >= items.len() {
        return None;
    }
    Some(MerkleProof {
        total: items.len() as u64,
        index: index as u64,
        leaf_hash: leaf_hash(items[index].as_ref()),
        aunts: aunts(items, index),
    })
}

fn aunts<T: AsRef<[u8]>>(items: &[T], index: usize) -> Vec<Digest32> {
    if items.len() <= 1 {
        return Vec::new();
    }
    let k = split_point(items.len());
    if index < k {
        let mut path = aunts(&items[..k], index);
        path.push(root_from_items(&items[k..]));
        path
    } else {
        let mut path = aunts(&items[k..], index - k);
        path.push(root_from_items(&items[..k]));
        path
    }
}

/// Recompute the root from a leaf hash and its sibling path.
///
/// Returns `None` when the path length does not fit the tree shape implied
/// by `total`, or `index` is out of range.
#[must_use]
pub fn compute_root_from_aunts(
    index: u64,
    total: u64,
    leaf: Digest32,
    aunts: &[Digest32],
) -> Option<Digest32> {
    if index >= total {
        return None;
    }
    if total == 1 {
        return aunts.is_empty().then_some(leaf);
    }
    let (sibling, rest) = aunts.split_last()?;
    let k = split_point(usize::try_from(total).ok()?) as u64;
    if index < k {
        let left = compute_root_from_aunts(index, k, leaf, rest)?;
        Some(inner_hash(&left, sibling))
    } else {
        let right = compute_root_from_aunts(index - k, total - k, leaf, rest)?;
        Some(inner_hash(sibling, &right))
    }
}

/// Check that `item` is included under `root` according to `proof`.
#[must_use]
pub fn verify(proof: &MerkleProof, root: &Digest32, item: &[u8]) -> bool {
    if proof.total == 0 {
        return false;
    }
    let leaf = leaf_hash(item);
    if leaf != proof.leaf_hash {
        return false;
    }
    compute_root_from_aunts(proof.index, proof.total, leaf, &proof.aunts)
        .is_some_and(|computed| computed == *root)
}

/// The commitment a maker publishes for a partial-fill order: the root over
/// `SHA-256(secret_i)` for the 4 partial secrets and the completion secret,
/// plus the proof for each level.
#[derive(Debug, Clone)]
pub struct FillCommitment {
    pub root: Digest32,
    proofs: Vec<MerkleProof>,
}

impl FillCommitment {
    /// Build the commitment from the ordered secrets.
    ///
    /// # Errors
    /// Returns `InvalidRequest` unless exactly 5 secrets are given.
    pub fn from_secrets<T: AsRef<[u8]>>(secrets: &[T]) -> Result<Self> {
        if secrets.len() != FILL_COMMITMENT_LEAVES {
            return Err(SwapLockError::invalid_request(format!(
                "fill commitment needs {FILL_COMMITMENT_LEAVES} secrets, got {}",
                secrets.len()
            )));
        }
        let leaves: Vec<Digest32> = secrets.iter().map(|s| hash_secret(s.as_ref())).collect();
        let root = root_from_items(&leaves);
        let proofs = (0..leaves.len())
            .filter_map(|i| prove(&leaves, i))
            .collect();
        Ok(Self { root, proofs })
    }

    /// Proof for the secret at `level`.
    #[must_use]
    pub fn proof(&self, level: u8) -> Option<&MerkleProof> {
        self.proofs.get(usize::from(level))
    }
}
