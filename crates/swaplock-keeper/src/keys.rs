//! Store key layout.
//!
//! ```text
//! 0x01 | swap_id                          -> AtomicSwap
//! 0x02 | recipient | '/' | swap_id        -> swap_id
//! 0x03 | sender    | '/' | swap_id        -> swap_id
//! 0x04 | status (u64 BE) | '/' | swap_id  -> swap_id
//! 0x05 | denom                            -> AssetSupply
//! 0x06                                    -> Params
//! 0x07 | order_id                         -> PartialFillOrder
//! 0x08 | maker     | '/' | order_id       -> order_id
//! 0x09 | status (u64 BE) | '/' | order_id -> order_id
//! 0x0A | order_id  | '/' | seq (u32 BE)   -> FillRecord
//! ```

use swaplock_types::{Address, FillStatus, OrderId, SwapId, SwapStatus};

pub const SWAP_PREFIX: u8 = 0x01;
pub const SWAP_BY_RECIPIENT_PREFIX: u8 = 0x02;
pub const SWAP_BY_SENDER_PREFIX: u8 = 0x03;
pub const SWAP_BY_STATUS_PREFIX: u8 = 0x04;
pub const ASSET_SUPPLY_PREFIX: u8 = 0x05;
pub const PARAMS_KEY: &[u8] = &[0x06];
pub const ORDER_PREFIX: u8 = 0x07;
pub const ORDER_BY_MAKER_PREFIX: u8 = 0x08;
pub const ORDER_BY_STATUS_PREFIX: u8 = 0x09;
pub const FILL_RECORD_PREFIX: u8 = 0x0A;

/// Separates a secondary field from the entity ID.
pub const SEPARATOR: u8 = b'/';

fn key(prefix: u8, parts: &[&[u8]]) -> Vec<u8> {
    let len = 1 + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.push(prefix);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

/// `prefix | field | '/'`, the scan prefix for one secondary value.
fn field_prefix(prefix: u8, field: &[u8]) -> Vec<u8> {
    let separator: &[u8] = &[SEPARATOR];
    key(prefix, &[field, separator])
}

#[must_use]
pub fn swap_key(id: &SwapId) -> Vec<u8> {
    key(SWAP_PREFIX, &[id.as_str().as_bytes()])
}

#[must_use]
pub fn all_swaps_prefix() -> Vec<u8> {
    vec![SWAP_PREFIX]
}

#[must_use]
pub fn swaps_by_recipient_prefix(recipient: &Address) -> Vec<u8> {
    field_prefix(SWAP_BY_RECIPIENT_PREFIX, recipient.as_str().as_bytes())
}

#[must_use]
pub fn swap_by_recipient_key(recipient: &Address, id: &SwapId) -> Vec<u8> {
    let mut key = swaps_by_recipient_prefix(recipient);
    key.extend_from_slice(id.as_str().as_bytes());
    key
}

#[must_use]
pub fn swaps_by_sender_prefix(sender: &Address) -> Vec<u8> {
    field_prefix(SWAP_BY_SENDER_PREFIX, sender.as_str().as_bytes())
}

#[must_use]
pub fn swap_by_sender_key(sender: &Address, id: &SwapId) -> Vec<u8> {
    let mut key = swaps_by_sender_prefix(sender);
    key.extend_from_slice(id.as_str().as_bytes());
    key
}

#[must_use]
pub fn swaps_by_status_prefix(status: SwapStatus) -> Vec<u8> {
    field_prefix(SWAP_BY_STATUS_PREFIX, &status.code().to_be_bytes())
}

#[must_use]
pub fn swap_by_status_key(status: SwapStatus, id: &SwapId) -> Vec<u8> {
    let mut key = swaps_by_status_prefix(status);
    key.extend_from_slice(id.as_str().as_bytes());
    key
}

#[must_use]
pub fn asset_supply_key(denom: &str) -> Vec<u8> {
    key(ASSET_SUPPLY_PREFIX, &[denom.as_bytes()])
}

#[must_use]
pub fn all_asset_supplies_prefix() -> Vec<u8> {
    vec![ASSET_SUPPLY_PREFIX]
}

#[must_use]
pub fn order_key(id: &OrderId) -> Vec<u8> {
    key(ORDER_PREFIX, &[id.as_str().as_bytes()])
}

#[must_use]
pub fn all_orders_prefix() -> Vec<u8> {
    vec![ORDER_PREFIX]
}

#[must_use]
pub fn orders_by_maker_prefix(maker: &Address) -> Vec<u8> {
    field_prefix(ORDER_BY_MAKER_PREFIX, maker.as_str().as_bytes())
}

#[must_use]
pub fn order_by_maker_key(maker: &Address, id: &OrderId) -> Vec<u8> {
    let mut key = orders_by_maker_prefix(maker);
    key.extend_from_slice(id.as_str().as_bytes());
    key
}

#[must_use]
pub fn orders_by_status_prefix(status: FillStatus) -> Vec<u8> {
    field_prefix(ORDER_BY_STATUS_PREFIX, &status.code().to_be_bytes())
}

#[must_use]
pub fn order_by_status_key(status: FillStatus, id: &OrderId) -> Vec<u8> {
    let mut key = orders_by_status_prefix(status);
    key.extend_from_slice(id.as_str().as_bytes());
    key
}

#[must_use]
pub fn fill_records_prefix(id: &OrderId) -> Vec<u8> {
    field_prefix(FILL_RECORD_PREFIX, id.as_str().as_bytes())
}

#[must_use]
pub fn fill_record_key(id: &OrderId, seq: u32) -> Vec<u8> {
    let mut key = fill_records_prefix(id);
    key.extend_from_slice(&seq.to_be_bytes());
    key
}
