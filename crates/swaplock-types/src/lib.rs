//! # swaplock-types
//!
//! Shared types, errors, and configuration for **SwapLock**.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`SwapId`], [`OrderId`]
//! - **Coins**: [`Coin`], [`Coins`], denomination validation
//! - **Atomic swaps**: [`AtomicSwap`], [`SwapStatus`], [`SwapDirection`]
//! - **Progressive fills**: [`PartialFillOrder`], [`FillStatus`], [`FillKind`], [`FillRecord`], [`ChainRef`]
//! - **Proofs**: [`MerkleProof`], [`Digest32`]
//! - **Supply**: [`AssetSupply`]
//! - **Events**: [`SwapEvent`], [`EventType`]
//! - **Configuration**: [`Params`], [`KeeperConfig`]
//! - **Errors**: [`SwapLockError`] with `SL_ERR_` prefix codes
//! - **Constants**: module name, fill levels, defaults

pub mod coin;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod fill_order;
pub mod ids;
pub mod proof;
pub mod supply;
pub mod swap;

// Re-export all primary types at crate root for ergonomic imports:
//   use swaplock_types::{AtomicSwap, Coins, PartialFillOrder, ...};

pub use coin::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use fill_order::*;
pub use ids::*;
pub use proof::*;
pub use supply::*;
pub use swap::*;

// Constants are accessed via `swaplock_types::constants::FOO`
// (not re-exported to avoid name collisions).
