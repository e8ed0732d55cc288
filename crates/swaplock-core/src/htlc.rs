//! Hash-time-locked swap state machine.
//!
//! Pure functions over an [`AtomicSwap`] snapshot. Nothing here moves funds
//! or touches storage. Callers apply a transition to a copy, perform the
//! escrow transfer, and only then persist the copy, so a failed transfer
//! leaves no trace.

use swaplock_types::{
    Address, AtomicSwap, Coins, Result, SwapDirection, SwapId, SwapLockError, SwapStatus,
};

use crate::commitment::verify_preimage;

/// A request to open a swap, after addresses have been parsed.
#[derive(Debug, Clone)]
pub struct NewSwap {
    pub sender: Address,
    pub recipient: Address,
    pub recipient_other_chain: String,
    pub sender_other_chain: String,
    pub random_number_hash: String,
    pub timestamp: i64,
    pub amount: Coins,
    pub height_span: u64,
    pub cross_chain: bool,
}

impl NewSwap {
    /// The deterministic ID this request would create.
    #[must_use]
    pub fn swap_id(&self) -> SwapId {
        SwapId::derive(
            self.sender.as_str(),
            self.recipient.as_str(),
            &self.random_number_hash,
            self.timestamp,
        )
    }

    /// Shape checks that do not depend on chain state.
    ///
    /// # Errors
    /// - `InvalidRequest` for an empty hash, zero height span or non-positive timestamp
    /// - `InvalidAmount` for an empty, zero, fractional or unsorted amount
    pub fn validate(&self) -> Result<()> {
        if self.random_number_hash.is_empty() {
            return Err(SwapLockError::invalid_request(
                "random number hash cannot be empty",
            ));
        }
        self.amount.validate()?;
        if self.height_span == 0 {
            return Err(SwapLockError::invalid_request("height span must be positive"));
        }
        if self.timestamp <= 0 {
            return Err(SwapLockError::invalid_request("timestamp must be positive"));
        }
        Ok(())
    }
}

/// Build the open swap for `request` created at `current_height`.
///
/// # Errors
/// Propagates [`NewSwap::validate`] failures; `InvalidRequest` if the
/// expiry height overflows.
pub fn open_swap(request: NewSwap, current_height: u64) -> Result<AtomicSwap> {
    request.validate()?;
    let expire_height = current_height
        .checked_add(request.height_span)
        .ok_or_else(|| SwapLockError::invalid_request("expire height overflows"))?;

    Ok(AtomicSwap {
        id: request.swap_id(),
        sender: request.sender,
        recipient: request.recipient,
        sender_other_chain: request.sender_other_chain,
        recipient_other_chain: request.recipient_other_chain,
        random_number_hash: request.random_number_hash,
        random_number: None,
        timestamp: request.timestamp,
        amount: request.amount,
        height_span: request.height_span,
        expire_height,
        status: SwapStatus::Open,
        cross_chain: request.cross_chain,
        direction: SwapDirection::from_cross_chain(request.cross_chain),
        closed_block: None,
    })
}

/// Check every claim precondition without mutating the swap.
///
/// Order of checks: state and height, then caller, then preimage.
///
/// # Errors
/// `InvalidState`, `Unauthorized` or `InvalidPreimage`.
pub fn check_claim(
    swap: &AtomicSwap,
    current_height: u64,
    claimer: &Address,
    random_number: &str,
) -> Result<()> {
    if !swap.can_claim(current_height) {
        return Err(SwapLockError::invalid_state(format!(
            "swap {} cannot be claimed: status {}, height {current_height}, expires at {}",
            swap.id, swap.status, swap.expire_height
        )));
    }
    if *claimer != swap.recipient {
        return Err(SwapLockError::unauthorized(format!(
            "only recipient {} can claim swap {}",
            swap.recipient, swap.id
        )));
    }
    if !verify_preimage(random_number, &swap.random_number_hash) {
        return Err(SwapLockError::InvalidPreimage(swap.id.to_string()));
    }
    Ok(())
}

/// Claim: `Open -> Completed`, recording the preimage and closing height.
pub fn claim(
    swap: &mut AtomicSwap,
    current_height: u64,
    claimer: &Address,
    random_number: &str,
) -> Result<()> {
    check_claim(swap, current_height, claimer, random_number)?;
    swap.mark_completed(random_number.to_string(), current_height)
}

/// Check every refund precondition without mutating the swap.
///
/// # Errors
/// `InvalidState` or `Unauthorized`.
pub fn check_refund(swap: &AtomicSwap, current_height: u64, refunder: &Address) -> Result<()> {
    if !swap.can_refund(current_height) {
        return Err(SwapLockError::invalid_state(format!(
            "swap {} cannot be refunded: status {}, height {current_height}, expires at {}",
            swap.id, swap.status, swap.expire_height
        )));
    }
    if *refunder != swap.sender {
        return Err(SwapLockError::unauthorized(format!(
            "only sender {} can refund swap {}",
            swap.sender, swap.id
        )));
    }
    Ok(())
}

/// Refund: `Open -> Expired`, recording the closing height.
pub fn refund(swap: &mut AtomicSwap, current_height: u64, refunder: &Address) -> Result<()> {
    check_refund(swap, current_height, refunder)?;
    swap.mark_expired(current_height)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use swaplock_types::Coin;

    use super::*;
    use crate::commitment::secret_hash_hex;

    const SECRET: &str = "00112233445566778899aabbccddeeff";

    fn secret_hash() -> String {
        secret_hash_hex(&hex::decode(SECRET).unwrap())
    }

    fn request() -> NewSwap {
        NewSwap {
            sender: Address("cosmos1sender".into()),
            recipient: Address("cosmos1recipient".into()),
            recipient_other_chain: "0xabc".into(),
            sender_other_chain: "0xdef".into(),
            random_number_hash: secret_hash(),
            timestamp: 1_700_000_000,
            amount: Coins::single("uatom", Decimal::new(1000, 0)),
            height_span: 300,
            cross_chain: true,
        }
    }

    fn opened() -> AtomicSwap {
        open_swap(request(), 100).unwrap()
    }

    #[test]
    fn open_sets_expiry_and_direction() {
        let swap = opened();
        assert_eq!(swap.status, SwapStatus::Open);
        assert_eq!(swap.expire_height, 400);
        assert_eq!(swap.direction, SwapDirection::Incoming);
        assert_eq!(swap.id, request().swap_id());
        assert!(swap.random_number.is_none());
        assert!(swap.closed_block.is_none());

        let mut local = request();
        local.cross_chain = false;
        assert_eq!(open_swap(local, 1).unwrap().direction, SwapDirection::Outgoing);
    }

    #[test]
    fn open_validation() {
        let mut r = request();
        r.random_number_hash.clear();
        assert!(matches!(open_swap(r, 1), Err(SwapLockError::InvalidRequest { .. })));

        let mut r = request();
        r.height_span = 0;
        assert!(matches!(open_swap(r, 1), Err(SwapLockError::InvalidRequest { .. })));

        let mut r = request();
        r.timestamp = 0;
        assert!(matches!(open_swap(r, 1), Err(SwapLockError::InvalidRequest { .. })));

        let mut r = request();
        r.amount = Coins::new(vec![Coin::new("uatom", Decimal::ZERO)]);
        assert!(matches!(open_swap(r, 1), Err(SwapLockError::InvalidAmount { .. })));
    }

    #[test]
    fn open_expiry_overflow() {
        let mut r = request();
        r.height_span = u64::MAX;
        assert!(matches!(open_swap(r, 2), Err(SwapLockError::InvalidRequest { .. })));
    }

    #[test]
    fn claim_before_expiry() {
        let mut swap = opened();
        let recipient = swap.recipient.clone();
        claim(&mut swap, 399, &recipient, SECRET).unwrap();
        assert_eq!(swap.status, SwapStatus::Completed);
        assert_eq!(swap.random_number.as_deref(), Some(SECRET));
        assert_eq!(swap.closed_block, Some(399));
    }

    #[test]
    fn claim_at_expiry_height_fails() {
        let mut swap = opened();
        let before = swap.clone();
        let recipient = swap.recipient.clone();
        let err = claim(&mut swap, 400, &recipient, SECRET).unwrap_err();
        assert!(matches!(err, SwapLockError::InvalidState { .. }));
        assert_eq!(swap, before);
    }

    #[test]
    fn claim_by_non_recipient_fails() {
        let mut swap = opened();
        let before = swap.clone();
        let sender = swap.sender.clone();
        let err = claim(&mut swap, 200, &sender, SECRET).unwrap_err();
        assert!(matches!(err, SwapLockError::Unauthorized { .. }));
        assert_eq!(swap, before);
    }

    #[test]
    fn claim_with_wrong_preimage_fails() {
        let mut swap = opened();
        let before = swap.clone();
        let recipient = swap.recipient.clone();
        let err = claim(&mut swap, 200, &recipient, "deadbeef").unwrap_err();
        assert!(matches!(err, SwapLockError::InvalidPreimage(_)));
        assert_eq!(swap, before);
    }

    #[test]
    fn claim_with_uppercase_commitment() {
        let mut r = request();
        r.random_number_hash = secret_hash().to_uppercase();
        let mut swap = open_swap(r, 1).unwrap();
        let recipient = swap.recipient.clone();
        claim(&mut swap, 2, &recipient, SECRET).unwrap();
    }

    #[test]
    fn refund_at_expiry() {
        let mut swap = opened();
        let sender = swap.sender.clone();
        refund(&mut swap, 400, &sender).unwrap();
        assert_eq!(swap.status, SwapStatus::Expired);
        assert_eq!(swap.closed_block, Some(400));
        assert!(swap.random_number.is_none());
    }

    #[test]
    fn refund_before_expiry_fails() {
        let mut swap = opened();
        let sender = swap.sender.clone();
        let err = refund(&mut swap, 399, &sender).unwrap_err();
        assert!(matches!(err, SwapLockError::InvalidState { .. }));
        assert_eq!(swap.status, SwapStatus::Open);
    }

    #[test]
    fn refund_by_non_sender_fails() {
        let mut swap = opened();
        let recipient = swap.recipient.clone();
        let err = refund(&mut swap, 500, &recipient).unwrap_err();
        assert!(matches!(err, SwapLockError::Unauthorized { .. }));
    }

    #[test]
    fn terminal_swaps_reject_everything() {
        let mut swap = opened();
        let recipient = swap.recipient.clone();
        let sender = swap.sender.clone();
        claim(&mut swap, 150, &recipient, SECRET).unwrap();
        assert!(refund(&mut swap, 1000, &sender).is_err());
        assert!(claim(&mut swap, 151, &recipient, SECRET).is_err());
        assert_eq!(swap.closed_block, Some(150));
    }

    #[test]
    fn never_both_claimable_and_refundable() {
        let swap = opened();
        for height in 0..1000 {
            let c = check_claim(&swap, height, &swap.recipient, SECRET).is_ok();
            let r = check_refund(&swap, height, &swap.sender).is_ok();
            assert!(!(c && r), "height {height}");
        }
    }
}
