//! # swaplock-keeper
//!
//! **State plane**: persistence, escrow custody, secondary indexes, asset
//! supply and message handling for SwapLock.
//!
//! ## Architecture
//!
//! The [`Keeper`] wraps the pure state machines of `swaplock-core` with the
//! host capabilities it is constructed with:
//! 1. [`KvStore`] for entities, indexes, supply and params
//! 2. [`EscrowBank`] for locking and releasing swap amounts
//! 3. [`AddressValidator`] for parsing account addresses
//! 4. [`EventSink`] for notifications
//!
//! In-memory implementations of each ship here for tests and embedding:
//! [`MemStore`], [`InMemoryBank`], [`Bech32AddressValidator`], [`EventLog`]
//! and [`TracingEventSink`].
//!
//! ## Request path
//!
//! ```text
//! (type_url, bytes) -> Codec::decode_msg -> Msg
//!   -> MsgHandler::handle -> validate_basic, signers -> Keeper operation
//! ```

pub mod address;
pub mod bank;
pub mod capabilities;
pub mod codec;
pub mod events;
pub mod handler;
pub mod index;
pub mod keeper;
pub mod keys;
pub mod msgs;
pub mod store;
pub mod supply_ledger;

pub use address::Bech32AddressValidator;
pub use bank::InMemoryBank;
pub use capabilities::{AddressValidator, BlockContext, EscrowBank, EventSink, KvStore};
pub use codec::{Codec, MsgRegistry};
pub use events::{EventLog, TracingEventSink};
pub use handler::MsgHandler;
pub use keeper::Keeper;
pub use msgs::{
    Msg, MsgClaimAtomicSwap, MsgCreateAtomicSwap, MsgCreatePartialFillOrder, MsgFillOrder,
    MsgKind, MsgRefundAtomicSwap, MsgResponse, MsgSyncOrder,
};
pub use store::MemStore;
