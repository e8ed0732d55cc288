//! System-wide constants for SwapLock.

/// Module name; also the default escrow account holding locked funds.
pub const MODULE_NAME: &str = "atomicswap";

/// Separator between the fields hashed into a swap ID.
pub const SWAP_ID_SEPARATOR: &str = ":";

/// Default minimum lock span in blocks (~1 hour at 15 second blocks).
pub const DEFAULT_MIN_BLOCK_LOCK: u64 = 220;

/// Default maximum lock span in blocks (~3 months at 15 second blocks).
pub const DEFAULT_MAX_BLOCK_LOCK: u64 = 518_400;

/// Default supported asset denominations.
pub const DEFAULT_SUPPORTED_ASSETS: [&str; 2] = ["uatom", "stake"];

/// Number of bounded partial-fill steps before completion.
pub const PARTIAL_FILL_STEPS: u8 = 4;

/// Fill level at which the completion secret is revealed.
pub const COMPLETION_LEVEL: u8 = PARTIAL_FILL_STEPS;

/// Fill level written after settlement. No fill is ever accepted here.
pub const SETTLED_LEVEL: u8 = COMPLETION_LEVEL + 1;

/// Leaves committed by an order's Merkle root (4 partial + 1 completion).
pub const FILL_COMMITMENT_LEAVES: usize = PARTIAL_FILL_STEPS as usize + 1;

/// Minimum denomination length.
pub const MIN_DENOM_LEN: usize = 3;

/// Maximum denomination length.
pub const MAX_DENOM_LEN: usize = 128;

/// Bech32 data-part alphabet.
pub const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Default bech32 human-readable prefix for account addresses.
pub const DEFAULT_ADDRESS_HRP: &str = "cosmos";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
