//! The keeper: persistence, escrow and notifications around the pure state
//! machines.
//!
//! Every mutating operation follows the same shape:
//! 1. Load the entity snapshot (or check the ID is free)
//! 2. Run the pure transition from `swaplock-core` on a copy, then encode it
//!    and stage the supply ledger update
//! 3. Move escrowed funds through the bank
//! 4. Persist the copy, its index entries and the staged supply records
//! 5. Emit a notification
//!
//! Step 4 cannot fail, so any error returns before funds move or the store
//! is touched. The one exception is lazy order expiry, which is persisted
//! even though the fill that observed it fails.

use std::collections::BTreeSet;

use swaplock_core::{FillStep, commitment, htlc, progressive};
use swaplock_types::{
    Address, AssetSupply, AtomicSwap, Coins, Digest32, FillKind, FillRecord, FillStatus,
    KeeperConfig, MerkleProof, OrderId, Params, PartialFillOrder, Result, SwapEvent, SwapId,
    SwapLockError, SwapStatus, validate_denom, validate_positive_integer,
};
use tracing::{info, warn};

use crate::capabilities::{AddressValidator, BlockContext, EscrowBank, EventSink, KvStore};
use crate::codec::Codec;
use crate::index;
use crate::keys;
use crate::msgs::{MsgCreateAtomicSwap, MsgCreatePartialFillOrder, parse_digest, validate_order_id};
use crate::supply_ledger::{self, SupplyUpdate};

/// Owns the module's store and drives every operation against it.
pub struct Keeper<S, B, V, E> {
    store: S,
    bank: B,
    addresses: V,
    events: E,
    codec: Codec,
    escrow_account: Address,
}

impl<S, B, V, E> Keeper<S, B, V, E>
where
    S: KvStore,
    B: EscrowBank,
    V: AddressValidator,
    E: EventSink,
{
    /// Build a keeper and persist the configured params.
    ///
    /// # Errors
    /// `Configuration` if the params are invalid.
    pub fn new(
        config: KeeperConfig,
        codec: Codec,
        store: S,
        bank: B,
        addresses: V,
        events: E,
    ) -> Result<Self> {
        let mut keeper = Self {
            store,
            bank,
            addresses,
            events,
            codec,
            escrow_account: config.escrow_account,
        };
        keeper.set_params(&config.params)?;
        Ok(keeper)
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn address_validator(&self) -> &V {
        &self.addresses
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn escrow_account(&self) -> &Address {
        &self.escrow_account
    }

    // -----------------------------------------------------------------
    // Params
    // -----------------------------------------------------------------

    /// # Errors
    /// `Internal` if params were never stored.
    pub fn params(&self) -> Result<Params> {
        let bytes = self
            .store
            .get(keys::PARAMS_KEY)
            .ok_or_else(|| SwapLockError::Internal("params not initialised".into()))?;
        self.codec.decode(&bytes)
    }

    /// # Errors
    /// `Configuration` if the params are invalid.
    pub fn set_params(&mut self, params: &Params) -> Result<()> {
        params.validate()?;
        let bytes = self.codec.encode(params)?;
        self.store.set(keys::PARAMS_KEY, bytes);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Atomic swaps
    // -----------------------------------------------------------------

    /// Open a swap and lock its amount in escrow.
    ///
    /// # Errors
    /// - `AlreadyExists` if the derived ID is taken
    /// - `InvalidAddress` for a malformed sender or recipient
    /// - `InvalidRequest` / `InvalidAmount` for a malformed request or one
    ///   outside the module params
    /// - `Overflow` if the asset supply would leave the amount range
    /// - `TransferFailed` if the sender cannot cover the amount
    pub fn create_atomic_swap(
        &mut self,
        ctx: &BlockContext,
        msg: &MsgCreateAtomicSwap,
    ) -> Result<SwapId> {
        let id = SwapId::derive(
            &msg.sender,
            &msg.recipient,
            &msg.random_number_hash,
            msg.timestamp,
        );
        if self.has_atomic_swap(&id) {
            return Err(SwapLockError::AlreadyExists(id.to_string()));
        }

        let request = htlc::NewSwap {
            sender: self.addresses.parse(&msg.sender)?,
            recipient: self.addresses.parse(&msg.recipient)?,
            recipient_other_chain: msg.recipient_other_chain.clone(),
            sender_other_chain: msg.sender_other_chain.clone(),
            random_number_hash: msg.random_number_hash.clone(),
            timestamp: msg.timestamp,
            amount: msg.amount.clone(),
            height_span: msg.height_span,
            cross_chain: msg.cross_chain,
        };
        request.validate()?;
        self.check_params(&request)?;

        let swap = htlc::open_swap(request, ctx.height)?;
        let bytes = self.codec.encode(&swap)?;
        let supply = supply_ledger::stage(&self.store, &self.codec, &swap.amount, swap.direction)?;

        self.bank
            .transfer(&swap.sender, &self.escrow_account, &swap.amount)
            .inspect_err(|e| warn!(swap_id = %swap.id, error = %e, "Escrow lock failed"))?;

        self.write_swap(None, &swap, bytes, supply);

        info!(
            swap_id = %swap.id,
            sender = %swap.sender,
            recipient = %swap.recipient,
            amount = %swap.amount,
            expire_height = swap.expire_height,
            direction = %swap.direction,
            "Atomic swap created"
        );
        self.events.emit(SwapEvent::SwapCreated {
            swap_id: swap.id.clone(),
            sender: swap.sender.clone(),
            recipient: swap.recipient.clone(),
            amount: swap.amount.clone(),
            random_number_hash: swap.random_number_hash.clone(),
            timestamp: swap.timestamp,
            height_span: swap.height_span,
            cross_chain: swap.cross_chain,
            direction: swap.direction,
            expire_height: swap.expire_height,
        });
        Ok(swap.id)
    }

    fn check_params(&self, request: &htlc::NewSwap) -> Result<()> {
        let params = self.params()?;
        if !params.allows_height_span(request.height_span) {
            return Err(SwapLockError::invalid_request(format!(
                "height span {} outside [{}, {}]",
                request.height_span, params.min_block_lock, params.max_block_lock
            )));
        }
        if let Some(coin) = request.amount.iter().find(|c| !params.is_supported(&c.denom)) {
            return Err(SwapLockError::invalid_amount(format!(
                "asset {} is not supported",
                coin.denom
            )));
        }
        Ok(())
    }

    /// Release escrow to the recipient on a valid preimage before expiry.
    ///
    /// # Errors
    /// `NotFound`, then `InvalidState`, `Unauthorized`, `InvalidPreimage`,
    /// then `Overflow` from the supply ledger, then `TransferFailed`.
    pub fn claim_atomic_swap(
        &mut self,
        ctx: &BlockContext,
        claimer: &Address,
        swap_id: &SwapId,
        random_number: &str,
    ) -> Result<()> {
        let previous = self.get_atomic_swap(swap_id)?;
        let mut swap = previous.clone();
        htlc::claim(&mut swap, ctx.height, claimer, random_number)?;
        let bytes = self.codec.encode(&swap)?;
        let supply = supply_ledger::stage(&self.store, &self.codec, &swap.amount, swap.direction)?;

        self.bank
            .transfer(&self.escrow_account, &swap.recipient, &swap.amount)
            .inspect_err(|e| warn!(swap_id = %swap.id, error = %e, "Claim payout failed"))?;
        self.write_swap(Some(&previous), &swap, bytes, supply);

        info!(
            swap_id = %swap.id,
            claimer = %claimer,
            amount = %swap.amount,
            height = ctx.height,
            "Atomic swap claimed"
        );
        self.events.emit(SwapEvent::SwapClaimed {
            swap_id: swap.id.clone(),
            claimer: claimer.clone(),
            random_number: random_number.to_string(),
            amount: swap.amount.clone(),
        });
        Ok(())
    }

    /// Return escrow to the sender at or after expiry.
    ///
    /// # Errors
    /// `NotFound`, then `InvalidState`, `Unauthorized`, then `Overflow`
    /// from the supply ledger, then `TransferFailed`.
    pub fn refund_atomic_swap(
        &mut self,
        ctx: &BlockContext,
        refunder: &Address,
        swap_id: &SwapId,
    ) -> Result<()> {
        let previous = self.get_atomic_swap(swap_id)?;
        let mut swap = previous.clone();
        htlc::refund(&mut swap, ctx.height, refunder)?;
        let bytes = self.codec.encode(&swap)?;
        let supply = supply_ledger::stage(&self.store, &self.codec, &swap.amount, swap.direction)?;

        self.bank
            .transfer(&self.escrow_account, &swap.sender, &swap.amount)
            .inspect_err(|e| warn!(swap_id = %swap.id, error = %e, "Refund payout failed"))?;
        self.write_swap(Some(&previous), &swap, bytes, supply);

        info!(
            swap_id = %swap.id,
            refunder = %refunder,
            amount = %swap.amount,
            height = ctx.height,
            "Atomic swap refunded"
        );
        self.events.emit(SwapEvent::SwapRefunded {
            swap_id: swap.id.clone(),
            refunder: refunder.clone(),
            amount: swap.amount.clone(),
        });
        Ok(())
    }

    fn write_swap(
        &mut self,
        previous: Option<&AtomicSwap>,
        swap: &AtomicSwap,
        bytes: Vec<u8>,
        supply: SupplyUpdate,
    ) {
        self.store.set(&keys::swap_key(&swap.id), bytes);
        index::reindex(&mut self.store, previous, swap);
        supply.apply(&mut self.store);
    }

    // -----------------------------------------------------------------
    // Swap queries
    // -----------------------------------------------------------------

    /// # Errors
    /// `NotFound` if no swap has this ID.
    pub fn get_atomic_swap(&self, id: &SwapId) -> Result<AtomicSwap> {
        let bytes = self
            .store
            .get(&keys::swap_key(id))
            .ok_or_else(|| SwapLockError::NotFound(format!("atomic swap {id}")))?;
        self.codec.decode(&bytes)
    }

    #[must_use]
    pub fn has_atomic_swap(&self, id: &SwapId) -> bool {
        self.store.has(&keys::swap_key(id))
    }

    /// Every swap, ordered by ID.
    pub fn list_atomic_swaps(&self) -> Result<Vec<AtomicSwap>> {
        self.store
            .prefix_iter(&keys::all_swaps_prefix())
            .into_iter()
            .map(|(_, bytes)| self.codec.decode(&bytes))
            .collect()
    }

    pub fn swaps_by_status(&self, status: SwapStatus) -> Result<Vec<AtomicSwap>> {
        self.swaps_under(&keys::swaps_by_status_prefix(status))
    }

    pub fn swaps_by_sender(&self, sender: &Address) -> Result<Vec<AtomicSwap>> {
        self.swaps_under(&keys::swaps_by_sender_prefix(sender))
    }

    pub fn swaps_by_recipient(&self, recipient: &Address) -> Result<Vec<AtomicSwap>> {
        self.swaps_under(&keys::swaps_by_recipient_prefix(recipient))
    }

    /// Swaps where `user` is sender or recipient, each once, ordered by ID.
    pub fn swaps_by_user(&self, user: &Address) -> Result<Vec<AtomicSwap>> {
        let mut ids = BTreeSet::new();
        ids.extend(index::ids_under(&self.store, &keys::swaps_by_sender_prefix(user))?);
        ids.extend(index::ids_under(&self.store, &keys::swaps_by_recipient_prefix(user))?);
        ids.into_iter()
            .map(|id| self.indexed_swap(SwapId(id)))
            .collect()
    }

    /// Dry-run the claim preimage check.
    ///
    /// # Errors
    /// `NotFound` if no swap has this ID.
    pub fn validate_secret(&self, id: &SwapId, random_number: &str) -> Result<bool> {
        let swap = self.get_atomic_swap(id)?;
        Ok(commitment::verify_preimage(
            random_number,
            &swap.random_number_hash,
        ))
    }

    /// The escrowed amount a claim would release now.
    ///
    /// # Errors
    /// `NotFound` if no swap has this ID.
    pub fn claimable_amount(&self, id: &SwapId) -> Result<Coins> {
        Ok(self.get_atomic_swap(id)?.claimable_amount())
    }

    fn swaps_under(&self, prefix: &[u8]) -> Result<Vec<AtomicSwap>> {
        index::ids_under(&self.store, prefix)?
            .into_iter()
            .map(|id| self.indexed_swap(SwapId(id)))
            .collect()
    }

    fn indexed_swap(&self, id: SwapId) -> Result<AtomicSwap> {
        self.get_atomic_swap(&id).map_err(|_| {
            SwapLockError::Internal(format!("index entry for missing swap {id}"))
        })
    }

    // -----------------------------------------------------------------
    // Asset supply
    // -----------------------------------------------------------------

    pub fn asset_supply(&self, denom: &str) -> Result<Option<AssetSupply>> {
        supply_ledger::get(&self.store, &self.codec, denom)
    }

    pub fn list_asset_supplies(&self) -> Result<Vec<AssetSupply>> {
        supply_ledger::list(&self.store, &self.codec)
    }

    // -----------------------------------------------------------------
    // Partial-fill orders
    // -----------------------------------------------------------------

    /// Register a new progressive-fill order.
    ///
    /// # Errors
    /// - `InvalidRequest` for a malformed ID or root, or a past expiration
    /// - `AlreadyExists` if the ID is taken
    /// - `InvalidAddress` for a malformed maker
    /// - `InvalidAmount` for a non-positive or fractional total, or a bad denom
    pub fn create_partial_fill_order(
        &mut self,
        ctx: &BlockContext,
        msg: &MsgCreatePartialFillOrder,
    ) -> Result<OrderId> {
        validate_order_id(&msg.order_id)?;
        let id = OrderId::new(msg.order_id.clone());
        if self.store.has(&keys::order_key(&id)) {
            return Err(SwapLockError::AlreadyExists(format!("order {id}")));
        }
        let maker = self.addresses.parse(&msg.maker)?;
        validate_positive_integer(msg.total_amount)?;
        let merkle_root = parse_digest(&msg.merkle_root, "merkle root")?;
        validate_denom(&msg.maker_denom)?;
        validate_denom(&msg.taker_denom)?;
        if msg.expiration <= ctx.time {
            return Err(SwapLockError::invalid_request(format!(
                "expiration {} is not after block time {}",
                msg.expiration, ctx.time
            )));
        }

        let order = PartialFillOrder::new(
            id,
            maker,
            msg.total_amount,
            merkle_root,
            msg.maker_denom.clone(),
            msg.taker_denom.clone(),
            msg.expiration,
        );
        self.save_order(None, &order)?;

        info!(
            order_id = %order.id,
            maker = %order.maker,
            total = %order.total_amount,
            expiration = %order.expiration,
            "Partial-fill order created"
        );
        self.events.emit(SwapEvent::OrderCreated {
            order_id: order.id.clone(),
            maker: order.maker.clone(),
            total_amount: order.total_amount,
        });
        Ok(order.id)
    }

    /// Execute the order's next fill step with the revealed `secret`.
    ///
    /// Persists the order and a [`FillRecord`] on success. A fill that finds
    /// the order past its expiration persists the expiry and fails with
    /// `Expired`.
    ///
    /// # Errors
    /// `NotFound`, then any error of [`progressive::fill`].
    pub fn fill_order(
        &mut self,
        ctx: &BlockContext,
        resolver: &Address,
        order_id: &OrderId,
        secret: &[u8],
        proof: &MerkleProof,
    ) -> Result<FillStep> {
        let previous = self.get_order(order_id)?;
        let mut order = previous.clone();

        let step = match progressive::fill(&mut order, ctx.time, secret, proof) {
            Ok(step) => step,
            Err(err) => {
                if order.status == FillStatus::Expired && previous.status != FillStatus::Expired {
                    self.save_order(Some(&previous), &order)?;
                    self.events.emit(SwapEvent::OrderExpired {
                        order_id: order.id.clone(),
                    });
                }
                return Err(err);
            }
        };

        self.save_order(Some(&previous), &order)?;
        self.append_fill_record(
            &order.id,
            &FillRecord {
                kind: step.kind,
                level: step.level,
                resolver: resolver.clone(),
                amount: step.amount,
                secret_hash: commitment::secret_hash_hex(secret),
                chain_id: ctx.chain_id.clone(),
                block_height: ctx.height,
            },
        )?;

        self.events.emit(SwapEvent::OrderFilled {
            order_id: order.id.clone(),
            resolver: resolver.clone(),
            kind: step.kind,
            level: step.level,
            amount: step.amount,
            filled_amount: order.filled_amount,
        });
        if step.kind == FillKind::Completion {
            self.events.emit(SwapEvent::OrderSettled {
                order_id: order.id.clone(),
                resolver: resolver.clone(),
            });
        }
        Ok(step)
    }

    /// Record a state root observed on this chain at the current height.
    ///
    /// # Errors
    /// `NotFound` if no order has this ID.
    pub fn sync_order(
        &mut self,
        ctx: &BlockContext,
        order_id: &OrderId,
        state_root: Digest32,
    ) -> Result<()> {
        let previous = self.get_order(order_id)?;
        let mut order = previous.clone();
        progressive::record_chain_reference(&mut order, ctx.chain_id.clone(), state_root, ctx.height);
        self.save_order(Some(&previous), &order)?;

        info!(
            order_id = %order.id,
            chain_id = %ctx.chain_id,
            height = ctx.height,
            state_root = %hex::encode(state_root),
            "Order synced"
        );
        self.events.emit(SwapEvent::OrderSynced {
            order_id: order.id.clone(),
            chain_id: ctx.chain_id.clone(),
            block_height: ctx.height,
        });
        Ok(())
    }

    fn save_order(
        &mut self,
        previous: Option<&PartialFillOrder>,
        order: &PartialFillOrder,
    ) -> Result<()> {
        let bytes = self.codec.encode(order)?;
        self.store.set(&keys::order_key(&order.id), bytes);
        index::reindex(&mut self.store, previous, order);
        Ok(())
    }

    fn append_fill_record(&mut self, order_id: &OrderId, record: &FillRecord) -> Result<()> {
        let count = self.store.prefix_iter(&keys::fill_records_prefix(order_id)).len();
        let seq = u32::try_from(count)
            .map_err(|_| SwapLockError::Internal(format!("too many fill records for {order_id}")))?;
        let bytes = self.codec.encode(record)?;
        self.store.set(&keys::fill_record_key(order_id, seq), bytes);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Order queries
    // -----------------------------------------------------------------

    /// # Errors
    /// `NotFound` if no order has this ID.
    pub fn get_order(&self, id: &OrderId) -> Result<PartialFillOrder> {
        let bytes = self
            .store
            .get(&keys::order_key(id))
            .ok_or_else(|| SwapLockError::NotFound(format!("order {id}")))?;
        self.codec.decode(&bytes)
    }

    /// Every order, ordered by ID.
    pub fn list_orders(&self) -> Result<Vec<PartialFillOrder>> {
        self.store
            .prefix_iter(&keys::all_orders_prefix())
            .into_iter()
            .map(|(_, bytes)| self.codec.decode(&bytes))
            .collect()
    }

    pub fn orders_by_status(&self, status: FillStatus) -> Result<Vec<PartialFillOrder>> {
        self.orders_under(&keys::orders_by_status_prefix(status))
    }

    pub fn orders_by_maker(&self, maker: &Address) -> Result<Vec<PartialFillOrder>> {
        self.orders_under(&keys::orders_by_maker_prefix(maker))
    }

    /// Fill records of an order, oldest first.
    pub fn fill_records(&self, order_id: &OrderId) -> Result<Vec<FillRecord>> {
        self.store
            .prefix_iter(&keys::fill_records_prefix(order_id))
            .into_iter()
            .map(|(_, bytes)| self.codec.decode(&bytes))
            .collect()
    }

    fn orders_under(&self, prefix: &[u8]) -> Result<Vec<PartialFillOrder>> {
        index::ids_under(&self.store, prefix)?
            .into_iter()
            .map(|id| {
                let id = OrderId(id);
                self.get_order(&id).map_err(|_| {
                    SwapLockError::Internal(format!("index entry for missing order {id}"))
                })
            })
            .collect()
    }
}
