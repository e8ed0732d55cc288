//! Per-denomination swap volume bookkeeping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Coin, Result, SwapDirection, SwapLockError};

/// Accumulated swap volume for one denomination.
///
/// `incoming_supply` and `outgoing_supply` only ever grow. `current_supply`,
/// `time_limited_current_supply` and `time_elapsed_secs` are reserved for
/// supply-limit enforcement and are not written by the swap state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSupply {
    pub incoming_supply: Coin,
    pub outgoing_supply: Coin,
    pub current_supply: Coin,
    pub time_limited_current_supply: Coin,
    pub time_elapsed_secs: u64,
}

impl AssetSupply {
    /// All-zero supply for `denom`.
    #[must_use]
    pub fn zero(denom: &str) -> Self {
        Self {
            incoming_supply: Coin::zero(denom),
            outgoing_supply: Coin::zero(denom),
            current_supply: Coin::zero(denom),
            time_limited_current_supply: Coin::zero(denom),
            time_elapsed_secs: 0,
        }
    }

    #[must_use]
    pub fn denom(&self) -> &str {
        &self.incoming_supply.denom
    }

    /// Add `amount` to the field selected by `direction`.
    ///
    /// # Errors
    /// `Overflow` if the total leaves the `Decimal` range; `self` is left
    /// unchanged.
    pub fn accumulate(&mut self, amount: Decimal, direction: SwapDirection) -> Result<()> {
        let field = match direction {
            SwapDirection::Incoming => &mut self.incoming_supply,
            SwapDirection::Outgoing => &mut self.outgoing_supply,
        };
        field.amount = field
            .amount
            .checked_add(amount)
            .ok_or_else(|| SwapLockError::Overflow {
                reason: format!("{direction} supply of {} exceeds the amount range", field.denom),
            })?;
        Ok(())
    }
}
