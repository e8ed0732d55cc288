//! Request messages.
//!
//! Every message carries raw strings as received from the host. Shape checks
//! run in `validate_basic`; signer resolution goes through the same address
//! validator and fails with `InvalidAddress` on malformed input.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use swaplock_types::constants::MODULE_NAME;
use swaplock_types::{
    Address, Coins, Digest32, FillKind, MerkleProof, OrderId, Result, SwapId, SwapLockError,
    validate_denom, validate_positive_integer,
};

use crate::capabilities::AddressValidator;
use crate::keys::SEPARATOR;

/// Discriminant of a [`Msg`], used for type URL registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum MsgKind {
    CreateAtomicSwap,
    ClaimAtomicSwap,
    RefundAtomicSwap,
    CreatePartialFillOrder,
    FillOrder,
    SyncOrder,
}

impl MsgKind {
    pub const ALL: [Self; 6] = [
        Self::CreateAtomicSwap,
        Self::ClaimAtomicSwap,
        Self::RefundAtomicSwap,
        Self::CreatePartialFillOrder,
        Self::FillOrder,
        Self::SyncOrder,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateAtomicSwap => "MsgCreateAtomicSwap",
            Self::ClaimAtomicSwap => "MsgClaimAtomicSwap",
            Self::RefundAtomicSwap => "MsgRefundAtomicSwap",
            Self::CreatePartialFillOrder => "MsgCreatePartialFillOrder",
            Self::FillOrder => "MsgFillOrder",
            Self::SyncOrder => "MsgSyncOrder",
        }
    }

    /// Default type URL, e.g. `atomicswap/MsgCreateAtomicSwap`.
    #[must_use]
    pub fn type_url(&self) -> String {
        format!("{MODULE_NAME}/{}", self.name())
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SwapLockError::invalid_request(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(())
}

/// Order IDs become key segments, so the key separator is not allowed.
pub(crate) fn validate_order_id(id: &str) -> Result<()> {
    require_non_empty(id, "order id")?;
    if id.as_bytes().contains(&SEPARATOR) {
        return Err(SwapLockError::invalid_request(format!(
            "order id {id:?} contains '{}'",
            char::from(SEPARATOR)
        )));
    }
    Ok(())
}

/// Decode a hex-encoded 32-byte digest.
///
/// # Errors
/// `InvalidRequest` if `raw` is not 64 hex characters.
pub fn parse_digest(raw: &str, field: &str) -> Result<Digest32> {
    let bytes = hex::decode(raw)
        .map_err(|e| SwapLockError::invalid_request(format!("{field} is not hex: {e}")))?;
    let digest: Digest32 = bytes.as_slice().try_into().map_err(|_| {
        SwapLockError::invalid_request(format!(
            "{field} must be 32 bytes, got {}",
            bytes.len()
        ))
    })?;
    Ok(digest)
}

/// Decode a hex-encoded secret.
///
/// # Errors
/// `InvalidRequest` if `raw` is empty or not hex.
pub fn parse_secret(raw: &str) -> Result<Vec<u8>> {
    require_non_empty(raw, "secret")?;
    hex::decode(raw).map_err(|e| SwapLockError::invalid_request(format!("secret is not hex: {e}")))
}

// ---------------------------------------------------------------------------
// Atomic swaps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateAtomicSwap {
    pub sender: String,
    pub recipient: String,
    pub recipient_other_chain: String,
    pub sender_other_chain: String,
    pub random_number_hash: String,
    pub timestamp: i64,
    pub amount: Coins,
    pub height_span: u64,
    pub cross_chain: bool,
}

impl MsgCreateAtomicSwap {
    pub fn validate_basic(&self, addresses: &dyn AddressValidator) -> Result<()> {
        addresses.parse(&self.sender)?;
        addresses.parse(&self.recipient)?;
        require_non_empty(&self.random_number_hash, "random number hash")?;
        self.amount.validate()?;
        if self.height_span == 0 {
            return Err(SwapLockError::invalid_request("height span must be positive"));
        }
        if self.timestamp <= 0 {
            return Err(SwapLockError::invalid_request("timestamp must be positive"));
        }
        Ok(())
    }

    pub fn signers(&self, addresses: &dyn AddressValidator) -> Result<Vec<Address>> {
        Ok(vec![addresses.parse(&self.sender)?])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimAtomicSwap {
    pub sender: String,
    pub swap_id: String,
    pub random_number: String,
}

impl MsgClaimAtomicSwap {
    pub fn validate_basic(&self, addresses: &dyn AddressValidator) -> Result<()> {
        addresses.parse(&self.sender)?;
        require_non_empty(&self.swap_id, "swap id")?;
        require_non_empty(&self.random_number, "random number")
    }

    pub fn signers(&self, addresses: &dyn AddressValidator) -> Result<Vec<Address>> {
        Ok(vec![addresses.parse(&self.sender)?])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRefundAtomicSwap {
    pub sender: String,
    pub swap_id: String,
}

impl MsgRefundAtomicSwap {
    pub fn validate_basic(&self, addresses: &dyn AddressValidator) -> Result<()> {
        addresses.parse(&self.sender)?;
        require_non_empty(&self.swap_id, "swap id")
    }

    pub fn signers(&self, addresses: &dyn AddressValidator) -> Result<Vec<Address>> {
        Ok(vec![addresses.parse(&self.sender)?])
    }
}

// ---------------------------------------------------------------------------
// Partial-fill orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreatePartialFillOrder {
    pub maker: String,
    pub order_id: String,
    pub total_amount: Decimal,
    /// Hex Merkle root over the five fill secrets.
    pub merkle_root: String,
    pub maker_denom: String,
    pub taker_denom: String,
    pub expiration: DateTime<Utc>,
}

impl MsgCreatePartialFillOrder {
    pub fn validate_basic(&self, addresses: &dyn AddressValidator) -> Result<()> {
        addresses.parse(&self.maker)?;
        validate_order_id(&self.order_id)?;
        validate_positive_integer(self.total_amount)?;
        parse_digest(&self.merkle_root, "merkle root")?;
        validate_denom(&self.maker_denom)?;
        validate_denom(&self.taker_denom)
    }

    pub fn signers(&self, addresses: &dyn AddressValidator) -> Result<Vec<Address>> {
        Ok(vec![addresses.parse(&self.maker)?])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgFillOrder {
    pub resolver: String,
    pub order_id: String,
    /// Hex secret for the order's current fill level.
    pub secret: String,
    pub proof: MerkleProof,
}

impl MsgFillOrder {
    pub fn validate_basic(&self, addresses: &dyn AddressValidator) -> Result<()> {
        addresses.parse(&self.resolver)?;
        validate_order_id(&self.order_id)?;
        parse_secret(&self.secret).map(|_| ())
    }

    pub fn signers(&self, addresses: &dyn AddressValidator) -> Result<Vec<Address>> {
        Ok(vec![addresses.parse(&self.resolver)?])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSyncOrder {
    pub relayer: String,
    pub order_id: String,
    /// Hex state root observed on this chain.
    pub state_root: String,
}

impl MsgSyncOrder {
    pub fn validate_basic(&self, addresses: &dyn AddressValidator) -> Result<()> {
        addresses.parse(&self.relayer)?;
        validate_order_id(&self.order_id)?;
        parse_digest(&self.state_root, "state root").map(|_| ())
    }

    pub fn signers(&self, addresses: &dyn AddressValidator) -> Result<Vec<Address>> {
        Ok(vec![addresses.parse(&self.relayer)?])
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    CreateAtomicSwap(MsgCreateAtomicSwap),
    ClaimAtomicSwap(MsgClaimAtomicSwap),
    RefundAtomicSwap(MsgRefundAtomicSwap),
    CreatePartialFillOrder(MsgCreatePartialFillOrder),
    FillOrder(MsgFillOrder),
    SyncOrder(MsgSyncOrder),
}

impl Msg {
    #[must_use]
    pub fn kind(&self) -> MsgKind {
        match self {
            Self::CreateAtomicSwap(_) => MsgKind::CreateAtomicSwap,
            Self::ClaimAtomicSwap(_) => MsgKind::ClaimAtomicSwap,
            Self::RefundAtomicSwap(_) => MsgKind::RefundAtomicSwap,
            Self::CreatePartialFillOrder(_) => MsgKind::CreatePartialFillOrder,
            Self::FillOrder(_) => MsgKind::FillOrder,
            Self::SyncOrder(_) => MsgKind::SyncOrder,
        }
    }

    /// # Errors
    /// The first shape violation found, as `InvalidAddress`,
    /// `InvalidRequest` or `InvalidAmount`.
    pub fn validate_basic(&self, addresses: &dyn AddressValidator) -> Result<()> {
        match self {
            Self::CreateAtomicSwap(m) => m.validate_basic(addresses),
            Self::ClaimAtomicSwap(m) => m.validate_basic(addresses),
            Self::RefundAtomicSwap(m) => m.validate_basic(addresses),
            Self::CreatePartialFillOrder(m) => m.validate_basic(addresses),
            Self::FillOrder(m) => m.validate_basic(addresses),
            Self::SyncOrder(m) => m.validate_basic(addresses),
        }
    }

    /// # Errors
    /// `InvalidAddress` if the signer field is malformed.
    pub fn signers(&self, addresses: &dyn AddressValidator) -> Result<Vec<Address>> {
        match self {
            Self::CreateAtomicSwap(m) => m.signers(addresses),
            Self::ClaimAtomicSwap(m) => m.signers(addresses),
            Self::RefundAtomicSwap(m) => m.signers(addresses),
            Self::CreatePartialFillOrder(m) => m.signers(addresses),
            Self::FillOrder(m) => m.signers(addresses),
            Self::SyncOrder(m) => m.signers(addresses),
        }
    }
}

/// Result of a handled message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsgResponse {
    SwapCreated { swap_id: SwapId },
    SwapClaimed { swap_id: SwapId },
    SwapRefunded { swap_id: SwapId },
    OrderCreated { order_id: OrderId },
    OrderFilled {
        order_id: OrderId,
        kind: FillKind,
        level: u8,
        amount: Decimal,
    },
    OrderSynced { order_id: OrderId },
}
