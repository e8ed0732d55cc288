//! Commitment verification: single preimage hashes and Merkle-committed
//! secrets.
//!
//! Both schemes use SHA-256. A swap commits to `hex(SHA-256(secret))`; a
//! partial-fill order commits to a Merkle root whose leaves are
//! `SHA-256(secret_i)`.

use sha2::{Digest, Sha256};
use swaplock_types::{Digest32, MerkleProof, Result, SwapLockError};

use crate::merkle;

/// SHA-256 of a secret.
#[must_use]
pub fn hash_secret(secret: &[u8]) -> Digest32 {
    let result = Sha256::digest(secret);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Lowercase hex SHA-256 of a secret.
#[must_use]
pub fn secret_hash_hex(secret: &[u8]) -> String {
    hex::encode(hash_secret(secret))
}

/// Check a hex-encoded secret against a hex hash commitment.
///
/// The comparison is case-insensitive. Empty or malformed hex yields
/// `false`, never an error.
#[must_use]
pub fn verify_preimage(secret_hex: &str, expected_hash: &str) -> bool {
    if secret_hex.is_empty() {
        return false;
    }
    let Ok(secret) = hex::decode(secret_hex) else {
        return false;
    };
    secret_hash_hex(&secret).eq_ignore_ascii_case(expected_hash)
}

/// Verify that `secret` is leaf `leaf_index` of the tree committed by `root`.
///
/// # Errors
/// - `ProofIndexMismatch` if the proof was built for another position
/// - `ProofInvalid` if the sibling path does not recompute to `root`
pub fn verify_merkle_leaf(
    secret: &[u8],
    proof: &MerkleProof,
    root: &Digest32,
    leaf_index: u8,
) -> Result<()> {
    let leaf = hash_secret(secret);

    if proof.index != u64::from(leaf_index) {
        return Err(SwapLockError::ProofIndexMismatch {
            proof_index: proof.index,
            expected: u64::from(leaf_index),
        });
    }

    if !merkle::verify(proof, root, &leaf) {
        return Err(SwapLockError::ProofInvalid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::FillCommitment;

    const SECRET_HEX: &str = "0102030405";

    fn commitment_of(secret_hex: &str) -> String {
        secret_hash_hex(&hex::decode(secret_hex).unwrap())
    }

    #[test]
    fn preimage_matches() {
        let hash = commitment_of(SECRET_HEX);
        assert!(verify_preimage(SECRET_HEX, &hash));
    }

    #[test]
    fn preimage_case_insensitive() {
        let hash = commitment_of("abcdef").to_uppercase();
        assert!(verify_preimage("abcdef", &hash));
        assert!(verify_preimage("ABCDEF", &hash));
    }

    #[test]
    fn wrong_preimage_rejected() {
        let hash = commitment_of(SECRET_HEX);
        assert!(!verify_preimage("0102030406", &hash));
    }

    #[test]
    fn malformed_hex_is_false() {
        let hash = commitment_of(SECRET_HEX);
        assert!(!verify_preimage("xyz", &hash));
        assert!(!verify_preimage("abc", &hash), "odd length");
        assert!(!verify_preimage("", &hash));
    }

    #[test]
    fn merkle_leaf_verifies_at_its_index() {
        let secrets: Vec<Vec<u8>> = (0u8..5).map(|i| vec![i; 32]).collect();
        let commitment = FillCommitment::from_secrets(&secrets).unwrap();
        for (i, secret) in secrets.iter().enumerate() {
            let level = u8::try_from(i).unwrap();
            verify_merkle_leaf(secret, commitment.proof(level).unwrap(), &commitment.root, level)
                .unwrap();
        }
    }

    #[test]
    fn merkle_index_mismatch() {
        let secrets: Vec<Vec<u8>> = (0u8..5).map(|i| vec![i; 32]).collect();
        let commitment = FillCommitment::from_secrets(&secrets).unwrap();
        let err = verify_merkle_leaf(&secrets[1], commitment.proof(1).unwrap(), &commitment.root, 0)
            .unwrap_err();
        assert!(matches!(
            err,
            SwapLockError::ProofIndexMismatch {
                proof_index: 1,
                expected: 0
            }
        ));
    }

    #[test]
    fn merkle_wrong_secret_invalid() {
        let secrets: Vec<Vec<u8>> = (0u8..5).map(|i| vec![i; 32]).collect();
        let commitment = FillCommitment::from_secrets(&secrets).unwrap();
        let err = verify_merkle_leaf(b"guess", commitment.proof(0).unwrap(), &commitment.root, 0)
            .unwrap_err();
        assert!(matches!(err, SwapLockError::ProofInvalid));
    }

    #[test]
    fn merkle_wrong_root_invalid() {
        let secrets: Vec<Vec<u8>> = (0u8..5).map(|i| vec![i; 32]).collect();
        let commitment = FillCommitment::from_secrets(&secrets).unwrap();
        let err = verify_merkle_leaf(&secrets[2], commitment.proof(2).unwrap(), &[0xAB; 32], 2)
            .unwrap_err();
        assert!(matches!(err, SwapLockError::ProofInvalid));
    }
}
