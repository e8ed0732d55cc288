//! Notifications emitted on every state transition.
//!
//! Events are fire-and-forget: the engine never reads them back.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Coins, FillKind, OrderId, SwapDirection, SwapId};

/// The type of action an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    CreateAtomicSwap,
    ClaimAtomicSwap,
    RefundAtomicSwap,
    CreatePartialFillOrder,
    FillOrder,
    SettleOrder,
    ExpireOrder,
    SyncOrder,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateAtomicSwap => write!(f, "create_atomic_swap"),
            Self::ClaimAtomicSwap => write!(f, "claim_atomic_swap"),
            Self::RefundAtomicSwap => write!(f, "refund_atomic_swap"),
            Self::CreatePartialFillOrder => write!(f, "create_partial_fill_order"),
            Self::FillOrder => write!(f, "fill_order"),
            Self::SettleOrder => write!(f, "settle_order"),
            Self::ExpireOrder => write!(f, "expire_order"),
            Self::SyncOrder => write!(f, "sync_order"),
        }
    }
}

/// A structured notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapEvent {
    SwapCreated {
        swap_id: SwapId,
        sender: Address,
        recipient: Address,
        amount: Coins,
        random_number_hash: String,
        timestamp: i64,
        height_span: u64,
        cross_chain: bool,
        direction: SwapDirection,
        expire_height: u64,
    },
    SwapClaimed {
        swap_id: SwapId,
        claimer: Address,
        random_number: String,
        amount: Coins,
    },
    SwapRefunded {
        swap_id: SwapId,
        refunder: Address,
        amount: Coins,
    },
    OrderCreated {
        order_id: OrderId,
        maker: Address,
        total_amount: Decimal,
    },
    OrderFilled {
        order_id: OrderId,
        resolver: Address,
        kind: FillKind,
        level: u8,
        amount: Decimal,
        filled_amount: Decimal,
    },
    OrderSettled {
        order_id: OrderId,
        resolver: Address,
    },
    OrderExpired {
        order_id: OrderId,
    },
    OrderSynced {
        order_id: OrderId,
        chain_id: String,
        block_height: u64,
    },
}

impl SwapEvent {
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self {
            Self::SwapCreated { .. } => EventType::CreateAtomicSwap,
            Self::SwapClaimed { .. } => EventType::ClaimAtomicSwap,
            Self::SwapRefunded { .. } => EventType::RefundAtomicSwap,
            Self::OrderCreated { .. } => EventType::CreatePartialFillOrder,
            Self::OrderFilled { .. } => EventType::FillOrder,
            Self::OrderSettled { .. } => EventType::SettleOrder,
            Self::OrderExpired { .. } => EventType::ExpireOrder,
            Self::OrderSynced { .. } => EventType::SyncOrder,
        }
    }
}
