//! # PartialFillOrder: progressive release of a single order
//!
//! An order releases its total in four bounded partial fills followed by a
//! completion step. Each step reveals the secret committed at leaf
//! `current_fill_level` of the order's Merkle root.
//!
//! ```text
//!   OPEN ─▶ PARTIALLY_FILLED ─▶ ... ─▶ FILLED ─▶ SETTLED
//!     │            │                      │
//!     └────────────┴──────────┬───────────┘
//!                             ▼ (observed past expiration)
//!                          EXPIRED
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Digest32, OrderId};

/// Lifecycle status of a partial-fill order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum FillStatus {
    Open,
    PartiallyFilled,
    Filled,
    Settled,
    Expired,
}

impl FillStatus {
    /// Can an order in this status move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::PartiallyFilled | Self::Filled | Self::Expired)
                | (
                    Self::PartiallyFilled,
                    Self::PartiallyFilled | Self::Filled | Self::Expired
                )
                | (Self::Filled, Self::Settled | Self::Expired)
        )
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Expired)
    }

    /// Stable numeric code used in status index keys.
    #[must_use]
    pub fn code(&self) -> u64 {
        match self {
            Self::Open => 0,
            Self::PartiallyFilled => 1,
            Self::Filled => 2,
            Self::Settled => 3,
            Self::Expired => 4,
        }
    }
}

impl fmt::Display for FillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            Self::Filled => write!(f, "FILLED"),
            Self::Settled => write!(f, "SETTLED"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// Whether a fill step releases value or completes the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillKind {
    Partial,
    Completion,
}

impl fmt::Display for FillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Partial => write!(f, "PARTIAL"),
            Self::Completion => write!(f, "COMPLETION"),
        }
    }
}

/// A state reference observed on some chain. Audit data only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRef {
    pub chain_id: String,
    pub state_root: Digest32,
    pub block_height: u64,
}

/// Audit record of one successful fill step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillRecord {
    pub kind: FillKind,
    /// Fill level the step was executed at.
    pub level: u8,
    pub resolver: Address,
    /// Released amount (zero for completion).
    pub amount: Decimal,
    /// Hex SHA-256 of the revealed secret.
    pub secret_hash: String,
    pub chain_id: String,
    pub block_height: u64,
}

/// An order released across bounded, secret-gated partial fills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialFillOrder {
    pub id: OrderId,
    pub maker: Address,
    pub total_amount: Decimal,
    /// Never exceeds `total_amount`.
    pub filled_amount: Decimal,
    /// Commits to 4 partial secrets and 1 completion secret, in order.
    pub merkle_root: Digest32,
    /// 0..=4 while live, 5 after settlement.
    pub current_fill_level: u8,
    pub status: FillStatus,
    pub maker_denom: String,
    pub taker_denom: String,
    pub expiration: DateTime<Utc>,
    /// Append-only.
    pub chain_references: Vec<ChainRef>,
}

impl PartialFillOrder {
    /// A fresh open order with nothing filled.
    #[must_use]
    pub fn new(
        id: OrderId,
        maker: Address,
        total_amount: Decimal,
        merkle_root: Digest32,
        maker_denom: impl Into<String>,
        taker_denom: impl Into<String>,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            maker,
            total_amount,
            filled_amount: Decimal::ZERO,
            merkle_root,
            current_fill_level: 0,
            status: FillStatus::Open,
            maker_denom: maker_denom.into(),
            taker_denom: taker_denom.into(),
            expiration,
            chain_references: Vec::new(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.total_amount - self.filled_amount
    }

    #[must_use]
    pub fn is_past_expiration(&self, now: DateTime<Utc>) -> bool {
        now > self.expiration
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl PartialFillOrder {
    pub fn dummy(total_amount: Decimal, merkle_root: Digest32) -> Self {
        Self::new(
            OrderId::new("order-1"),
            Address("cosmos1maker".to_string()),
            total_amount,
            merkle_root,
            "uatom",
            "uosmo",
            Utc::now() + chrono::Duration::hours(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        assert!(FillStatus::Open.can_transition_to(FillStatus::PartiallyFilled));
        assert!(FillStatus::PartiallyFilled.can_transition_to(FillStatus::PartiallyFilled));
        assert!(FillStatus::PartiallyFilled.can_transition_to(FillStatus::Filled));
        assert!(FillStatus::Filled.can_transition_to(FillStatus::Settled));
    }

    #[test]
    fn terminal_statuses_are_final() {
        for target in [
            FillStatus::Open,
            FillStatus::PartiallyFilled,
            FillStatus::Filled,
            FillStatus::Settled,
            FillStatus::Expired,
        ] {
            assert!(!FillStatus::Settled.can_transition_to(target));
            assert!(!FillStatus::Expired.can_transition_to(target));
        }
        assert!(FillStatus::Settled.is_terminal());
        assert!(FillStatus::Expired.is_terminal());
        assert!(!FillStatus::Filled.is_terminal());
    }

    #[test]
    fn settlement_requires_filled() {
        assert!(!FillStatus::Open.can_transition_to(FillStatus::Settled));
        assert!(!FillStatus::PartiallyFilled.can_transition_to(FillStatus::Settled));
    }

    #[test]
    fn new_order_starts_open() {
        let order = PartialFillOrder::dummy(Decimal::new(1000, 0), [7u8; 32]);
        assert_eq!(order.status, FillStatus::Open);
        assert_eq!(order.current_fill_level, 0);
        assert_eq!(order.filled_amount, Decimal::ZERO);
        assert_eq!(order.remaining(), Decimal::new(1000, 0));
        assert!(order.chain_references.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let mut order = PartialFillOrder::dummy(Decimal::new(1001, 0), [1u8; 32]);
        order.chain_references.push(ChainRef {
            chain_id: "cosmoshub-4".into(),
            state_root: [2u8; 32],
            block_height: 42,
        });
        let json = serde_json::to_string(&order).unwrap();
        let back: PartialFillOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
