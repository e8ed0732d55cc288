//! Asset supply ledger.
//!
//! Per-denomination accumulation of swap volume. Every create, claim and
//! refund adds each coin of the swap's amount to the incoming or outgoing
//! field selected by the swap's direction. Nothing ever decreases and no
//! denomination is rejected; a total past the `Decimal` range is an
//! `Overflow` error.

use swaplock_types::{AssetSupply, Coins, Result, SwapDirection};

use crate::capabilities::KvStore;
use crate::codec::Codec;
use crate::keys;

/// Stored supply for `denom`, if any volume has been recorded.
pub fn get<S: KvStore + ?Sized>(store: &S, codec: &Codec, denom: &str) -> Result<Option<AssetSupply>> {
    store
        .get(&keys::asset_supply_key(denom))
        .map(|bytes| codec.decode(&bytes))
        .transpose()
}

/// Every stored supply, ordered by denomination.
pub fn list<S: KvStore + ?Sized>(store: &S, codec: &Codec) -> Result<Vec<AssetSupply>> {
    store
        .prefix_iter(&keys::all_asset_supplies_prefix())
        .into_iter()
        .map(|(_, bytes)| codec.decode(&bytes))
        .collect()
}

/// Encoded supply records staged ahead of the operation that causes them.
///
/// Staging does every fallible step (decode, checked addition, encode), so
/// [`SupplyUpdate::apply`] cannot fail once the escrow transfer has run.
#[derive(Debug, Default)]
#[must_use]
pub struct SupplyUpdate {
    writes: Vec<(Vec<u8>, Vec<u8>)>,
}

impl SupplyUpdate {
    pub fn apply<S: KvStore + ?Sized>(self, store: &mut S) {
        for (key, value) in self.writes {
            store.set(&key, value);
        }
    }
}

/// Stage the addition of `amount` to the field selected by `direction`.
///
/// # Errors
/// `Serialization` for an undecodable stored record, `Overflow` if a total
/// leaves the amount range. The store is never written.
pub fn stage<S: KvStore + ?Sized>(
    store: &S,
    codec: &Codec,
    amount: &Coins,
    direction: SwapDirection,
) -> Result<SupplyUpdate> {
    let writes = amount
        .iter()
        .map(|coin| {
            let mut supply = get(store, codec, &coin.denom)?.unwrap_or_else(|| AssetSupply::zero(&coin.denom));
            supply.accumulate(coin.amount, direction)?;
            Ok((keys::asset_supply_key(&coin.denom), codec.encode(&supply)?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SupplyUpdate { writes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use rust_decimal::Decimal;
    use swaplock_types::{Coin, SwapLockError};

    fn codec() -> Codec {
        Codec::standard().unwrap()
    }

    #[test]
    fn absent_denom_is_none() {
        let store = MemStore::new();
        assert!(get(&store, &codec(), "uatom").unwrap().is_none());
        assert!(list(&store, &codec()).unwrap().is_empty());
    }

    #[test]
    fn accumulates_by_direction() {
        let mut store = MemStore::new();
        let codec = codec();
        let amount = Coins::single("uatom", Decimal::new(100, 0));
        for direction in [SwapDirection::Incoming, SwapDirection::Incoming, SwapDirection::Outgoing] {
            stage(&store, &codec, &amount, direction).unwrap().apply(&mut store);
        }

        let supply = get(&store, &codec, "uatom").unwrap().unwrap();
        assert_eq!(supply.incoming_supply.amount, Decimal::new(200, 0));
        assert_eq!(supply.outgoing_supply.amount, Decimal::new(100, 0));
        assert!(supply.current_supply.amount.is_zero());
    }

    #[test]
    fn every_coin_recorded_independently() {
        let mut store = MemStore::new();
        let codec = codec();
        let amount = Coins::new(vec![
            Coin::new("uatom", Decimal::new(7, 0)),
            Coin::new("stake", Decimal::new(3, 0)),
        ]);
        stage(&store, &codec, &amount, SwapDirection::Outgoing)
            .unwrap()
            .apply(&mut store);

        let all = list(&store, &codec).unwrap();
        let denoms: Vec<&str> = all.iter().map(AssetSupply::denom).collect();
        assert_eq!(denoms, vec!["stake", "uatom"]);
        assert_eq!(all[0].outgoing_supply.amount, Decimal::new(3, 0));
        assert_eq!(all[1].outgoing_supply.amount, Decimal::new(7, 0));
    }

    #[test]
    fn staging_writes_nothing_until_applied() {
        let mut store = MemStore::new();
        let codec = codec();
        let update = stage(&store, &codec, &Coins::single("uatom", Decimal::ONE), SwapDirection::Incoming)
            .unwrap();
        assert!(store.is_empty());
        update.apply(&mut store);
        assert_eq!(list(&store, &codec).unwrap().len(), 1);
    }

    #[test]
    fn overflow_or_corrupt_record_fails_staging() {
        let mut store = MemStore::new();
        let codec = codec();
        let big = Coins::single("uatom", Decimal::MAX);
        stage(&store, &codec, &big, SwapDirection::Incoming).unwrap().apply(&mut store);

        let err = stage(&store, &codec, &big, SwapDirection::Incoming).unwrap_err();
        assert!(matches!(err, SwapLockError::Overflow { .. }));

        store.set(&keys::asset_supply_key("stake"), b"not json".to_vec());
        let err = stage(&store, &codec, &Coins::single("stake", Decimal::ONE), SwapDirection::Outgoing)
            .unwrap_err();
        assert!(matches!(err, SwapLockError::Serialization(_)));
    }
}
