//! Progressive fill state machine.
//!
//! An order's total is released in four partial steps, each gated by the
//! secret at leaf `current_fill_level` of the order's Merkle commitment,
//! followed by a completion step that settles the order.
//!
//! ```text
//! level:   0      1      2      3        4
//! step:  total/4 total/4 total/4 rest  completion
//! ```
//!
//! The last partial step absorbs the division remainder so the four steps
//! always sum to `total_amount` exactly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use swaplock_types::constants::{COMPLETION_LEVEL, PARTIAL_FILL_STEPS, SETTLED_LEVEL};
use swaplock_types::{
    ChainRef, Digest32, FillKind, FillStatus, MerkleProof, PartialFillOrder, Result,
    SwapLockError,
};
use tracing::{debug, info, warn};

use crate::commitment::verify_merkle_leaf;

/// Outcome of one successful fill step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillStep {
    pub kind: FillKind,
    /// Level the step was executed at.
    pub level: u8,
    /// Released amount; zero for completion.
    pub amount: Decimal,
}

/// Amount released by the partial step at `level`.
///
/// Levels below the last partial step release `floor(total / 4)`; the last
/// releases whatever remains. Returns zero for non-partial levels.
#[must_use]
pub fn partial_fill_amount(order: &PartialFillOrder, level: u8) -> Decimal {
    let last = PARTIAL_FILL_STEPS - 1;
    match level {
        l if l < last => quarter(order.total_amount),
        l if l == last => order.total_amount - order.filled_amount,
        _ => Decimal::ZERO,
    }
}

/// Exact integer quotient of `total` by the step count.
///
/// `Decimal` division rounds to 28 significant digits, so dividing first
/// can round up near the top of the range. Subtracting the remainder makes
/// the division exact.
fn quarter(total: Decimal) -> Decimal {
    let steps = Decimal::from(PARTIAL_FILL_STEPS);
    let exact = total - total % steps;
    exact / steps
}

/// Expire the order if `now` is past its expiration.
///
/// Returns `true` if the order was moved to `Expired` by this call.
pub fn expire_if_due(order: &mut PartialFillOrder, now: DateTime<Utc>) -> bool {
    if order.status.is_terminal() || !order.is_past_expiration(now) {
        return false;
    }
    warn!(
        order_id = %order.id,
        status = %order.status,
        expiration = %order.expiration,
        "Order observed past expiration"
    );
    order.status = FillStatus::Expired;
    true
}

/// Execute the next fill step of `order`.
///
/// On success the order is advanced one level. On failure the order is
/// untouched, except that an order observed past its expiration is moved
/// to `Expired` before `Expired` is returned.
///
/// # Errors
/// - `TerminalState` if the order is settled or expired
/// - `Expired` if `now` is past the expiration
/// - `InvalidLevel` if the order is past the completion level
/// - `ProofIndexMismatch` / `ProofInvalid` from leaf verification
/// - `ZeroFillAmount` if the step would release nothing
/// - `Overflow` if the step would fill past the total
/// - `InvalidState` if completion is attempted before the order is filled
pub fn fill(
    order: &mut PartialFillOrder,
    now: DateTime<Utc>,
    secret: &[u8],
    proof: &MerkleProof,
) -> Result<FillStep> {
    if order.status.is_terminal() {
        return Err(SwapLockError::TerminalState {
            id: order.id.to_string(),
            status: order.status.to_string(),
        });
    }
    if expire_if_due(order, now) {
        return Err(SwapLockError::Expired(order.id.to_string()));
    }
    let level = order.current_fill_level;
    if level > COMPLETION_LEVEL {
        return Err(SwapLockError::InvalidLevel(level));
    }

    verify_merkle_leaf(secret, proof, &order.merkle_root, level)?;

    if level < COMPLETION_LEVEL {
        partial_step(order, level)
    } else {
        completion_step(order, level)
    }
}

fn partial_step(order: &mut PartialFillOrder, level: u8) -> Result<FillStep> {
    let amount = partial_fill_amount(order, level);
    if amount.is_zero() {
        return Err(SwapLockError::ZeroFillAmount(level));
    }

    let filled = order
        .filled_amount
        .checked_add(amount)
        .ok_or_else(|| SwapLockError::Overflow {
            reason: format!("filled amount overflows at level {level}"),
        })?;
    let status = match filled.cmp(&order.total_amount) {
        std::cmp::Ordering::Less => FillStatus::PartiallyFilled,
        std::cmp::Ordering::Equal => FillStatus::Filled,
        std::cmp::Ordering::Greater => {
            return Err(SwapLockError::Overflow {
                reason: format!(
                    "fill of {amount} at level {level} exceeds total {}",
                    order.total_amount
                ),
            });
        }
    };

    order.filled_amount = filled;
    order.current_fill_level = level + 1;
    order.status = status;

    debug!(
        order_id = %order.id,
        level,
        amount = %amount,
        filled = %order.filled_amount,
        status = %order.status,
        "Partial fill applied"
    );

    Ok(FillStep {
        kind: FillKind::Partial,
        level,
        amount,
    })
}

fn completion_step(order: &mut PartialFillOrder, level: u8) -> Result<FillStep> {
    if order.status != FillStatus::Filled {
        return Err(SwapLockError::invalid_state(format!(
            "order {} must be {} to complete, is {}",
            order.id,
            FillStatus::Filled,
            order.status
        )));
    }

    order.status = FillStatus::Settled;
    order.current_fill_level = SETTLED_LEVEL;

    info!(order_id = %order.id, total = %order.total_amount, "Order settled");

    Ok(FillStep {
        kind: FillKind::Completion,
        level,
        amount: Decimal::ZERO,
    })
}

/// Append a chain state reference to the order's audit trail.
pub fn record_chain_reference(
    order: &mut PartialFillOrder,
    chain_id: impl Into<String>,
    state_root: Digest32,
    block_height: u64,
) {
    order.chain_references.push(ChainRef {
        chain_id: chain_id.into(),
        state_root,
        block_height,
    });
}
