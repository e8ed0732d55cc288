//! Message routing.
//!
//! Validates a message's shape, resolves its signer and calls exactly one
//! keeper operation.

use swaplock_types::{OrderId, Result, SwapId, SwapLockError};

use crate::capabilities::{AddressValidator, BlockContext, EscrowBank, EventSink, KvStore};
use crate::keeper::Keeper;
use crate::msgs::{Msg, MsgResponse, parse_digest, parse_secret};

/// Routes messages to keeper operations.
pub struct MsgHandler;

impl MsgHandler {
    /// Handle one decoded message.
    ///
    /// # Errors
    /// Shape and signer errors from the message, then whatever the keeper
    /// operation returns.
    pub fn handle<S, B, V, E>(
        keeper: &mut Keeper<S, B, V, E>,
        ctx: &BlockContext,
        msg: &Msg,
    ) -> Result<MsgResponse>
    where
        S: KvStore,
        B: EscrowBank,
        V: AddressValidator,
        E: EventSink,
    {
        msg.validate_basic(keeper.address_validator())?;
        let signer = msg
            .signers(keeper.address_validator())?
            .into_iter()
            .next()
            .ok_or_else(|| SwapLockError::invalid_request("message has no signer"))?;

        match msg {
            Msg::CreateAtomicSwap(m) => {
                let swap_id = keeper.create_atomic_swap(ctx, m)?;
                Ok(MsgResponse::SwapCreated { swap_id })
            }
            Msg::ClaimAtomicSwap(m) => {
                let swap_id = SwapId::from(m.swap_id.as_str());
                keeper.claim_atomic_swap(ctx, &signer, &swap_id, &m.random_number)?;
                Ok(MsgResponse::SwapClaimed { swap_id })
            }
            Msg::RefundAtomicSwap(m) => {
                let swap_id = SwapId::from(m.swap_id.as_str());
                keeper.refund_atomic_swap(ctx, &signer, &swap_id)?;
                Ok(MsgResponse::SwapRefunded { swap_id })
            }
            Msg::CreatePartialFillOrder(m) => {
                let order_id = keeper.create_partial_fill_order(ctx, m)?;
                Ok(MsgResponse::OrderCreated { order_id })
            }
            Msg::FillOrder(m) => {
                let order_id = OrderId::new(m.order_id.clone());
                let secret = parse_secret(&m.secret)?;
                let step = keeper.fill_order(ctx, &signer, &order_id, &secret, &m.proof)?;
                Ok(MsgResponse::OrderFilled {
                    order_id,
                    kind: step.kind,
                    level: step.level,
                    amount: step.amount,
                })
            }
            Msg::SyncOrder(m) => {
                let order_id = OrderId::new(m.order_id.clone());
                let state_root = parse_digest(&m.state_root, "state root")?;
                keeper.sync_order(ctx, &order_id, state_root)?;
                Ok(MsgResponse::OrderSynced { order_id })
            }
        }
    }

    /// Decode a `(type_url, bytes)` envelope with the keeper's codec and
    /// handle it.
    ///
    /// # Errors
    /// `InvalidRequest` for an unknown type URL, `Serialization` for a bad
    /// body, then anything [`MsgHandler::handle`] returns.
    pub fn handle_envelope<S, B, V, E>(
        keeper: &mut Keeper<S, B, V, E>,
        ctx: &BlockContext,
        type_url: &str,
        bytes: &[u8],
    ) -> Result<MsgResponse>
    where
        S: KvStore,
        B: EscrowBank,
        V: AddressValidator,
        E: EventSink,
    {
        let msg = keeper.codec().decode_msg(type_url, bytes)?;
        Self::handle(keeper, ctx, &msg)
    }
}
