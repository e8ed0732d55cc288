//! Coin amounts for escrowed value.
//!
//! A [`Coins`] value is an ordered multi-asset vector. Well-formed coins are
//! sorted by denomination with no duplicates, and every amount is a positive
//! integer.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_DENOM_LEN, MIN_DENOM_LEN};
use crate::{Result, SwapLockError};

/// Type alias for denomination identifiers (e.g., "uatom", "stake").
pub type Denom = String;

/// Check a denomination against the accepted format.
///
/// 3 to 128 characters, starting with an ASCII letter, followed by ASCII
/// alphanumerics or any of `/ : . _ -`.
pub fn validate_denom(denom: &str) -> Result<()> {
    let len = denom.len();
    if !(MIN_DENOM_LEN..=MAX_DENOM_LEN).contains(&len) {
        return Err(SwapLockError::invalid_amount(format!(
            "denom {denom:?} must be {MIN_DENOM_LEN}-{MAX_DENOM_LEN} characters"
        )));
    }
    let mut chars = denom.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(SwapLockError::invalid_amount(format!(
            "denom {denom:?} must start with a letter"
        )));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || "/:._-".contains(*c))) {
        return Err(SwapLockError::invalid_amount(format!(
            "denom {denom:?} contains invalid character {bad:?}"
        )));
    }
    Ok(())
}

/// Check that an amount is a positive integer.
pub fn validate_positive_integer(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(SwapLockError::invalid_amount(format!(
            "amount {amount} must be positive"
        )));
    }
    if !amount.fract().is_zero() {
        return Err(SwapLockError::invalid_amount(format!(
            "amount {amount} must be an integer"
        )));
    }
    Ok(())
}

/// A single-denomination amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coin {
    pub denom: Denom,
    pub amount: Decimal,
}

impl Coin {
    #[must_use]
    pub fn new(denom: impl Into<String>, amount: Decimal) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// A zero amount of `denom`.
    #[must_use]
    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, Decimal::ZERO)
    }

    /// Validate the denomination and require a positive integral amount.
    pub fn validate(&self) -> Result<()> {
        validate_denom(&self.denom)?;
        validate_positive_integer(self.amount)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount.normalize(), self.denom)
    }
}

/// Ordered multi-asset amount.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coins(pub Vec<Coin>);

impl Coins {
    /// Build from a list of coins, sorted by denomination.
    ///
    /// Duplicates are kept so that [`Coins::validate`] can reject them.
    #[must_use]
    pub fn new(mut coins: Vec<Coin>) -> Self {
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        Self(coins)
    }

    /// A single-coin amount.
    #[must_use]
    pub fn single(denom: impl Into<String>, amount: Decimal) -> Self {
        Self(vec![Coin::new(denom, amount)])
    }

    /// Empty amount.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Require a non-empty, strictly sorted vector of valid positive coins.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(SwapLockError::invalid_amount("amount must not be empty"));
        }
        for coin in &self.0 {
            coin.validate()?;
        }
        for pair in self.0.windows(2) {
            if pair[0].denom >= pair[1].denom {
                return Err(SwapLockError::invalid_amount(format!(
                    "denoms must be sorted and unique: {} before {}",
                    pair[0].denom, pair[1].denom
                )));
            }
        }
        Ok(())
    }

    /// Whether every coin amount is zero (true for an empty vector).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| c.amount.is_zero())
    }

    /// Amount of a single denomination (zero if absent).
    #[must_use]
    pub fn amount_of(&self, denom: &str) -> Decimal {
        self.0
            .iter()
            .filter(|c| c.denom == denom)
            .map(|c| c.amount)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_coin_valid() {
        let coins = Coins::single("uatom", Decimal::new(100, 0));
        assert!(coins.validate().is_ok());
        assert_eq!(coins.to_string(), "100uatom");
        assert_eq!(coins.amount_of("uatom"), Decimal::new(100, 0));
        assert_eq!(coins.amount_of("stake"), Decimal::ZERO);
    }

    #[test]
    fn new_sorts_by_denom() {
        let coins = Coins::new(vec![
            Coin::new("uatom", Decimal::ONE),
            Coin::new("stake", Decimal::TWO),
        ]);
        assert_eq!(coins.0[0].denom, "stake");
        assert!(coins.validate().is_ok());
        assert_eq!(coins.to_string(), "2stake,1uatom");
    }

    #[test]
    fn empty_rejected() {
        let err = Coins::empty().validate().unwrap_err();
        assert!(matches!(err, SwapLockError::InvalidAmount { .. }));
        assert!(Coins::empty().is_zero());
    }

    #[test]
    fn zero_and_negative_rejected() {
        assert!(Coins::single("uatom", Decimal::ZERO).validate().is_err());
        assert!(Coins::single("uatom", Decimal::new(-5, 0)).validate().is_err());
    }

    #[test]
    fn fractional_rejected() {
        let err = Coins::single("uatom", Decimal::new(15, 1))
            .validate()
            .unwrap_err();
        assert!(matches!(err, SwapLockError::InvalidAmount { .. }));
    }

    #[test]
    fn duplicate_denoms_rejected() {
        let coins = Coins::new(vec![
            Coin::new("uatom", Decimal::ONE),
            Coin::new("uatom", Decimal::TWO),
        ]);
        assert!(coins.validate().is_err());
        assert_eq!(coins.amount_of("uatom"), Decimal::new(3, 0));
    }

    #[test]
    fn denom_format() {
        assert!(validate_denom("uatom").is_ok());
        assert!(validate_denom("ibc/27394FB092D2ECCD").is_ok());
        assert!(validate_denom("ab").is_err());
        assert!(validate_denom("1atom").is_err());
        assert!(validate_denom("u atom").is_err());
        assert!(validate_denom(&"a".repeat(129)).is_err());
    }

    #[test]
    fn coins_serde_roundtrip() {
        let coins = Coins::new(vec![
            Coin::new("stake", Decimal::new(5, 0)),
            Coin::new("uatom", Decimal::new(12345, 0)),
        ]);
        let json = serde_json::to_string(&coins).unwrap();
        let back: Coins = serde_json::from_str(&json).unwrap();
        assert_eq!(coins, back);
    }
}
