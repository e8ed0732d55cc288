//! Secondary index maintenance.
//!
//! Every save of an indexed entity goes through [`reindex`], which deletes
//! the index keys derived from the previous version that the new version no
//! longer produces, then writes the new version's keys. Status, sender,
//! recipient and maker lookups therefore never return an entity that no
//! longer matches.

use swaplock_types::{AtomicSwap, PartialFillOrder, Result, SwapLockError};

use crate::capabilities::KvStore;
use crate::keys;

/// An entity with secondary index entries.
pub trait Indexed {
    /// Every secondary key this version of the entity lives under.
    fn index_keys(&self) -> Vec<Vec<u8>>;

    /// Value stored under each secondary key: the entity ID.
    fn index_value(&self) -> Vec<u8>;
}

impl Indexed for AtomicSwap {
    fn index_keys(&self) -> Vec<Vec<u8>> {
        vec![
            keys::swap_by_recipient_key(&self.recipient, &self.id),
            keys::swap_by_sender_key(&self.sender, &self.id),
            keys::swap_by_status_key(self.status, &self.id),
        ]
    }

    fn index_value(&self) -> Vec<u8> {
        self.id.as_str().as_bytes().to_vec()
    }
}

impl Indexed for PartialFillOrder {
    fn index_keys(&self) -> Vec<Vec<u8>> {
        vec![
            keys::order_by_maker_key(&self.maker, &self.id),
            keys::order_by_status_key(self.status, &self.id),
        ]
    }

    fn index_value(&self) -> Vec<u8> {
        self.id.as_str().as_bytes().to_vec()
    }
}

/// Move `entity`'s index entries from `previous` to its current fields.
pub fn reindex<S, T>(store: &mut S, previous: Option<&T>, entity: &T)
where
    S: KvStore + ?Sized,
    T: Indexed,
{
    let current = entity.index_keys();
    if let Some(previous) = previous {
        for stale in previous
            .index_keys()
            .into_iter()
            .filter(|key| !current.contains(key))
        {
            store.delete(&stale);
        }
    }
    let value = entity.index_value();
    for key in current {
        store.set(&key, value.clone());
    }
}

/// IDs recorded under a secondary index prefix, in key order.
///
/// # Errors
/// `Internal` if an index value is not UTF-8.
pub fn ids_under<S: KvStore + ?Sized>(store: &S, prefix: &[u8]) -> Result<Vec<String>> {
    store
        .prefix_iter(prefix)
        .into_iter()
        .map(|(key, value)| {
            String::from_utf8(value).map_err(|_| {
                SwapLockError::Internal(format!("corrupt index entry {}", hex::encode(key)))
            })
        })
        .collect()
}
