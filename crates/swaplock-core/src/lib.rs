//! # swaplock-core
//!
//! **Pure state machines for SwapLock.**
//!
//! The core takes an entity snapshot, the current height or time, and the
//! caller's proof material, and returns the next state. It has:
//!
//! - **Zero side effects**: no storage, no transfers, no event emission
//! - **Commitment verification**: SHA-256 preimages and RFC 6962 Merkle leaves
//! - **HTLC lifecycle**: open, claim before expiry, refund at or after expiry
//! - **Progressive fills**: four quarter releases and a completion step,
//!   each gated by the secret at the current Merkle leaf

pub mod commitment;
pub mod htlc;
pub mod merkle;
pub mod progressive;

pub use commitment::{hash_secret, secret_hash_hex, verify_merkle_leaf, verify_preimage};
pub use htlc::{NewSwap, check_claim, check_refund, claim, open_swap, refund};
pub use merkle::FillCommitment;
pub use progressive::{FillStep, expire_if_due, fill, partial_fill_amount, record_chain_reference};
