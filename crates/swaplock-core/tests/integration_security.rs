//! Integration test: commitment soundness.
//!
//! Every release in the core is gated by a hash commitment. These tests
//! check that no secret, proof or caller other than the committed one can
//! move an entity forward, and that a rejected attempt leaves it untouched.

use chrono::Utc;
use rust_decimal::Decimal;
use swaplock_core::merkle;
use swaplock_core::*;
use swaplock_types::*;

fn committed_secrets() -> (Vec<Vec<u8>>, FillCommitment) {
    let secrets: Vec<Vec<u8>> = (0..5).map(|_| random_secret()).collect();
    let commitment = FillCommitment::from_secrets(&secrets).unwrap();
    (secrets, commitment)
}

#[test]
fn preimage_is_bound_to_its_hash() {
    for _ in 0..32 {
        let secret = random_secret();
        let hash = secret_hash_hex(&secret);
        assert!(verify_preimage(&hex::encode(&secret), &hash));
        assert!(verify_preimage(&hex::encode(&secret), &hash.to_uppercase()));
        assert!(!verify_preimage(&hex::encode(random_secret()), &hash));
    }
}

#[test]
fn every_proof_verifies_only_at_its_own_leaf() {
    let (secrets, commitment) = committed_secrets();
    for level in 0u8..5 {
        let proof = commitment.proof(level).unwrap();
        for (other, secret) in secrets.iter().enumerate() {
            let other = u8::try_from(other).unwrap();
            let result = verify_merkle_leaf(secret, proof, &commitment.root, level);
            assert_eq!(result.is_ok(), other == level, "level {level} secret {other}");
            assert!(verify_merkle_leaf(secret, proof, &commitment.root, (level + 1) % 5).is_err());
        }
    }
}

#[test]
fn tampered_aunts_are_rejected() {
    let (secrets, commitment) = committed_secrets();
    let mut proof = commitment.proof(2).unwrap().clone();
    proof.aunts[0][0] ^= 0xFF;
    assert!(!merkle::verify(&proof, &commitment.root, &hash_secret(&secrets[2])));

    let mut short = commitment.proof(2).unwrap().clone();
    short.aunts.pop();
    assert!(!merkle::verify(&short, &commitment.root, &hash_secret(&secrets[2])));
}

#[test]
fn rejected_fill_leaves_order_untouched() {
    let (secrets, commitment) = committed_secrets();
    let (_, foreign) = committed_secrets();
    let mut order = PartialFillOrder::dummy(Decimal::new(1_000, 0), commitment.root);
    let now = Utc::now();

    fill(&mut order, now, &secrets[0], commitment.proof(0).unwrap()).unwrap();
    let snapshot = order.clone();

    let attempts: [(&[u8], &MerkleProof); 4] = [
        (secrets[0].as_slice(), commitment.proof(0).unwrap()),
        (secrets[2].as_slice(), commitment.proof(2).unwrap()),
        (secrets[1].as_slice(), foreign.proof(1).unwrap()),
        (secrets[4].as_slice(), commitment.proof(4).unwrap()),
    ];
    for (secret, proof) in attempts {
        assert!(fill(&mut order, now, secret, proof).is_err());
        assert_eq!(order, snapshot);
    }
}

#[test]
fn third_party_cannot_move_a_swap() {
    let secret = random_secret();
    let mut swap = AtomicSwap::dummy(
        "cosmos1sender",
        "cosmos1recipient",
        &secret_hash_hex(&secret),
        100,
    );
    let mallory = Address("cosmos1mallory".into());
    let snapshot = swap.clone();

    let err = claim(&mut swap, 50, &mallory, &hex::encode(&secret)).unwrap_err();
    assert!(matches!(err, SwapLockError::Unauthorized { .. }));
    let err = refund(&mut swap, 100, &mallory).unwrap_err();
    assert!(matches!(err, SwapLockError::Unauthorized { .. }));
    assert_eq!(swap, snapshot);
}
