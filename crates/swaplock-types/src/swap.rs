//! # AtomicSwap: the hash-time-locked escrow entity
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  claim (height < expire, valid preimage)  ┌───────────┐
//!   │ OPEN ├──────────────────────────────────────────▶│ COMPLETED │
//!   └──┬───┘                                           └───────────┘
//!      │ refund (height >= expire)
//!      ▼
//!   ┌─────────┐
//!   │ EXPIRED │
//!   └─────────┘
//! ```
//!
//! Both exits are terminal. The height guards are complementary, so for any
//! block height at most one of claim/refund is admissible.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, Coins, SwapId};

/// Lifecycle status of an atomic swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum SwapStatus {
    /// Funds are escrowed and the swap awaits claim or refund.
    Open,
    /// The recipient revealed the preimage and received the funds.
    Completed,
    /// The lock expired and the sender was refunded.
    Expired,
}

impl SwapStatus {
    /// Can a swap in this status move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Open, Self::Completed | Self::Expired))
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Open)
    }

    /// Stable numeric code used in status index keys.
    #[must_use]
    pub fn code(&self) -> u64 {
        match self {
            Self::Open => 0,
            Self::Completed => 1,
            Self::Expired => 2,
        }
    }

    #[must_use]
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Open),
            1 => Some(Self::Completed),
            2 => Some(Self::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// Which way value flows relative to this ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum SwapDirection {
    Incoming,
    Outgoing,
}

impl SwapDirection {
    /// `Incoming` for cross-chain swaps, `Outgoing` otherwise.
    #[must_use]
    pub fn from_cross_chain(cross_chain: bool) -> Self {
        if cross_chain {
            Self::Incoming
        } else {
            Self::Outgoing
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => write!(f, "INCOMING"),
            Self::Outgoing => write!(f, "OUTGOING"),
        }
    }
}

/// A hash-time-locked swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicSwap {
    pub id: SwapId,
    pub sender: Address,
    pub recipient: Address,
    /// Counterparty addresses on the remote ledger. Never validated locally.
    pub sender_other_chain: String,
    pub recipient_other_chain: String,
    /// Hex SHA-256 commitment to the secret random number.
    pub random_number_hash: String,
    /// The revealed preimage, set only by a successful claim.
    pub random_number: Option<String>,
    /// Creation time supplied by the caller (seconds).
    pub timestamp: i64,
    pub amount: Coins,
    pub height_span: u64,
    /// `creation height + height_span`.
    pub expire_height: u64,
    pub status: SwapStatus,
    pub cross_chain: bool,
    pub direction: SwapDirection,
    /// Height at which the swap left `Open`.
    pub closed_block: Option<u64>,
}

impl AtomicSwap {
    /// Whether the lock has run out at `height`.
    #[must_use]
    pub fn is_expired(&self, height: u64) -> bool {
        height >= self.expire_height
    }

    #[must_use]
    pub fn can_claim(&self, height: u64) -> bool {
        self.status == SwapStatus::Open && !self.is_expired(height)
    }

    #[must_use]
    pub fn can_refund(&self, height: u64) -> bool {
        self.status == SwapStatus::Open && self.is_expired(height)
    }

    /// The escrowed amount while open, nothing afterwards.
    #[must_use]
    pub fn claimable_amount(&self) -> Coins {
        if self.status == SwapStatus::Open {
            self.amount.clone()
        } else {
            Coins::empty()
        }
    }

    /// Transition to COMPLETED, storing the revealed preimage.
    ///
    /// # Errors
    /// Returns `InvalidState` if the swap is not open.
    pub fn mark_completed(&mut self, random_number: String, height: u64) -> crate::Result<()> {
        self.transition(SwapStatus::Completed, height)?;
        self.random_number = Some(random_number);
        Ok(())
    }

    /// Transition to EXPIRED.
    ///
    /// # Errors
    /// Returns `InvalidState` if the swap is not open.
    pub fn mark_expired(&mut self, height: u64) -> crate::Result<()> {
        self.transition(SwapStatus::Expired, height)
    }

    fn transition(&mut self, target: SwapStatus, height: u64) -> crate::Result<()> {
        if !self.status.can_transition_to(target) {
            return Err(crate::SwapLockError::invalid_state(format!(
                "cannot transition swap {} from {} to {target}",
                self.id, self.status
            )));
        }
        self.status = target;
        self.closed_block = Some(height);
        Ok(())
    }
}

/// Dummy swap for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl AtomicSwap {
    /// An open 1000uatom swap from `sender` to `recipient` expiring at `expire_height`.
    pub fn dummy(sender: &str, recipient: &str, random_number_hash: &str, expire_height: u64) -> Self {
        let timestamp = 1_700_000_000;
        Self {
            id: SwapId::derive(sender, recipient, random_number_hash, timestamp),
            sender: Address(sender.to_string()),
            recipient: Address(recipient.to_string()),
            sender_other_chain: "0xsender".to_string(),
            recipient_other_chain: "0xrecipient".to_string(),
            random_number_hash: random_number_hash.to_string(),
            random_number: None,
            timestamp,
            amount: Coins::single("uatom", rust_decimal::Decimal::new(1000, 0)),
            height_span: expire_height,
            expire_height,
            status: SwapStatus::Open,
            cross_chain: false,
            direction: SwapDirection::Outgoing,
            closed_block: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_swap() -> AtomicSwap {
        AtomicSwap::dummy("sender", "recipient", "ab", 100)
    }

    #[test]
    fn state_transitions_valid() {
        assert!(SwapStatus::Open.can_transition_to(SwapStatus::Completed));
        assert!(SwapStatus::Open.can_transition_to(SwapStatus::Expired));
    }

    #[test]
    fn state_transitions_invalid() {
        assert!(!SwapStatus::Completed.can_transition_to(SwapStatus::Open));
        assert!(!SwapStatus::Completed.can_transition_to(SwapStatus::Expired));
        assert!(!SwapStatus::Expired.can_transition_to(SwapStatus::Open));
        assert!(!SwapStatus::Expired.can_transition_to(SwapStatus::Completed));
        assert!(!SwapStatus::Open.can_transition_to(SwapStatus::Open));
    }

    #[test]
    fn status_codes_roundtrip() {
        for status in [SwapStatus::Open, SwapStatus::Completed, SwapStatus::Expired] {
            assert_eq!(SwapStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(SwapStatus::from_code(9), None);
    }

    #[test]
    fn claim_and_refund_windows_are_disjoint() {
        let swap = make_swap();
        for height in 0..200 {
            assert!(
                !(swap.can_claim(height) && swap.can_refund(height)),
                "both admissible at {height}"
            );
            assert!(swap.can_claim(height) || swap.can_refund(height));
        }
        assert!(swap.can_claim(99));
        assert!(swap.can_refund(100));
    }

    #[test]
    fn mark_completed_records_preimage() {
        let mut swap = make_swap();
        swap.mark_completed("beef".into(), 50).unwrap();
        assert_eq!(swap.status, SwapStatus::Completed);
        assert_eq!(swap.random_number.as_deref(), Some("beef"));
        assert_eq!(swap.closed_block, Some(50));
        assert!(swap.claimable_amount().is_empty());
    }

    #[test]
    fn terminal_swap_rejects_transitions() {
        let mut swap = make_swap();
        swap.mark_expired(120).unwrap();
        let err = swap.mark_completed("beef".into(), 121).unwrap_err();
        assert!(matches!(err, crate::SwapLockError::InvalidState { .. }));
        assert_eq!(swap.closed_block, Some(120));
        assert!(swap.mark_expired(122).is_err());
    }

    #[test]
    fn direction_from_cross_chain() {
        assert_eq!(SwapDirection::from_cross_chain(true), SwapDirection::Incoming);
        assert_eq!(SwapDirection::from_cross_chain(false), SwapDirection::Outgoing);
    }

    #[test]
    fn serde_roundtrip() {
        let swap = make_swap();
        let json = serde_json::to_string(&swap).unwrap();
        let back: AtomicSwap = serde_json::from_str(&json).unwrap();
        assert_eq!(swap, back);
    }
}
