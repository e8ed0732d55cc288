//! In-memory escrow bank.
//!
//! Tracks per-(address, denom) balances. A transfer checks every coin of the
//! amount before moving any of them, so a failed transfer leaves all
//! balances unchanged.

use std::collections::HashMap;

use rust_decimal::Decimal;
use swaplock_types::{Address, Coin, Coins, Result, SwapLockError};
use tracing::warn;

use crate::capabilities::EscrowBank;

/// Account balances held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBank {
    balances: HashMap<(Address, String), Decimal>,
}

impl InMemoryBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into `address`.
    ///
    /// # Errors
    /// `Overflow` if any resulting balance leaves the `Decimal` range; no
    /// balance changes in that case.
    pub fn deposit(&mut self, address: &Address, amount: &Coins) -> Result<()> {
        let credited = amount
            .iter()
            .map(|coin| {
                let balance = credit(self.balance(address, &coin.denom), coin, address)?;
                Ok(((address.clone(), coin.denom.clone()), balance))
            })
            .collect::<Result<Vec<_>>>()?;
        self.balances.extend(credited);
        Ok(())
    }

    #[must_use]
    pub fn balance(&self, address: &Address, denom: &str) -> Decimal {
        self.balances
            .get(&(address.clone(), denom.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Every non-zero balance of `address`, sorted by denom.
    #[must_use]
    pub fn balances_of(&self, address: &Address) -> Coins {
        Coins::new(
            self.balances
                .iter()
                .filter(|((owner, _), amount)| owner == address && !amount.is_zero())
                .map(|((_, denom), amount)| Coin::new(denom.clone(), *amount))
                .collect(),
        )
    }

    /// Sum of every account's balance in `denom`.
    #[must_use]
    pub fn total_supply(&self, denom: &str) -> Decimal {
        self.balances
            .iter()
            .filter(|((_, d), _)| d == denom)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

fn credit(balance: Decimal, coin: &Coin, owner: &Address) -> Result<Decimal> {
    balance
        .checked_add(coin.amount)
        .ok_or_else(|| SwapLockError::Overflow {
            reason: format!("{owner} balance of {} exceeds the amount range", coin.denom),
        })
}

impl EscrowBank for InMemoryBank {
    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coins) -> Result<()> {
        let mut updates = Vec::with_capacity(amount.len() * 2);
        for coin in amount.iter() {
            let available = self.balance(from, &coin.denom);
            if available < coin.amount {
                warn!(
                    from = %from,
                    to = %to,
                    denom = %coin.denom,
                    needed = %coin.amount,
                    available = %available,
                    "Transfer rejected"
                );
                return Err(SwapLockError::TransferFailed {
                    reason: format!(
                        "{from} has {available}{denom}, needs {needed}{denom}",
                        denom = coin.denom,
                        needed = coin.amount
                    ),
                });
            }
            if from == to {
                continue;
            }
            let received = credit(self.balance(to, &coin.denom), coin, to)
                .inspect_err(|e| warn!(to = %to, error = %e, "Transfer rejected"))?;
            updates.push(((from.clone(), coin.denom.clone()), available - coin.amount));
            updates.push(((to.clone(), coin.denom.clone()), received));
        }

        self.balances.extend(updates);
        Ok(())
    }
}
