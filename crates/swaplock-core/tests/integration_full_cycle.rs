//! Integration test: complete lifecycles through the pure core.
//!
//! Swap: open -> claim, open -> refund.
//! Order: 4 partial fills -> completion, driven by freshly generated secrets.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use swaplock_core::*;
use swaplock_types::*;

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn new_swap(secret: &[u8], cross_chain: bool) -> NewSwap {
    NewSwap {
        sender: Address("cosmos1sender".into()),
        recipient: Address("cosmos1recipient".into()),
        recipient_other_chain: "0xrecipient".into(),
        sender_other_chain: "0xsender".into(),
        random_number_hash: secret_hash_hex(secret),
        timestamp: 1_700_000_000,
        amount: Coins::single("uatom", dec(5_000)),
        height_span: 500,
        cross_chain,
    }
}

#[test]
fn swap_open_then_claim() {
    let secret = random_secret();
    let request = new_swap(&secret, true);
    let expected_id = request.swap_id();

    let mut swap = open_swap(request, 100).unwrap();
    assert_eq!(swap.id, expected_id);
    assert_eq!(swap.expire_height, 600);
    assert_eq!(swap.direction, SwapDirection::Incoming);

    let recipient = swap.recipient.clone();
    claim(&mut swap, 599, &recipient, &hex::encode(&secret)).unwrap();
    assert_eq!(swap.status, SwapStatus::Completed);
    assert_eq!(swap.closed_block, Some(599));
    assert!(swap.claimable_amount().is_empty());
}

#[test]
fn swap_open_then_refund() {
    let secret = random_secret();
    let mut swap = open_swap(new_swap(&secret, false), 100).unwrap();
    let sender = swap.sender.clone();

    assert!(check_refund(&swap, 599, &sender).is_err());
    refund(&mut swap, 600, &sender).unwrap();
    assert_eq!(swap.status, SwapStatus::Expired);
    assert_eq!(swap.direction, SwapDirection::Outgoing);

    let recipient = swap.recipient.clone();
    let err = claim(&mut swap, 600, &recipient, &hex::encode(&secret)).unwrap_err();
    assert!(matches!(err, SwapLockError::InvalidState { .. }));
}

#[test]
fn order_full_cycle_with_random_secrets() {
    let secrets: Vec<Vec<u8>> = (0..5).map(|_| random_secret()).collect();
    let commitment = FillCommitment::from_secrets(&secrets).unwrap();
    let mut order = PartialFillOrder::dummy(dec(10_003), commitment.root);
    let now = Utc::now();

    let mut released = Decimal::ZERO;
    for level in 0u8..4 {
        let proof = commitment.proof(level).unwrap();
        let step = fill(&mut order, now, &secrets[usize::from(level)], proof).unwrap();
        assert_eq!(step.kind, FillKind::Partial);
        assert_eq!(step.level, level);
        released += step.amount;
    }
    assert_eq!(released, dec(10_003));
    assert_eq!(order.status, FillStatus::Filled);
    assert_eq!(order.remaining(), Decimal::ZERO);

    let step = fill(&mut order, now, &secrets[4], commitment.proof(4).unwrap()).unwrap();
    assert_eq!(step.kind, FillKind::Completion);
    assert_eq!(order.status, FillStatus::Settled);
    assert_eq!(order.current_fill_level, 5);

    record_chain_reference(&mut order, "swaplock-1", [7; 32], 42);
    assert_eq!(order.chain_references.len(), 1);
}

#[test]
fn expiry_interrupts_a_partial_order() {
    let secrets: Vec<Vec<u8>> = (0..5).map(|_| random_secret()).collect();
    let commitment = FillCommitment::from_secrets(&secrets).unwrap();
    let mut order = PartialFillOrder::dummy(dec(400), commitment.root);

    let now = Utc::now();
    fill(&mut order, now, &secrets[0], commitment.proof(0).unwrap()).unwrap();
    assert_eq!(order.status, FillStatus::PartiallyFilled);

    let later = order.expiration + Duration::seconds(1);
    assert!(expire_if_due(&mut order, later));
    assert!(!expire_if_due(&mut order, later));
    assert_eq!(order.status, FillStatus::Expired);
    assert_eq!(order.filled_amount, dec(100));
}
