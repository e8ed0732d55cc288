//! Capabilities the keeper consumes from its host.
//!
//! Each external service is a trait with the minimal method set the keeper
//! calls. Concrete implementations are injected at construction; the keeper
//! never reaches for ambient globals.

use chrono::{DateTime, Utc};
use swaplock_types::{Address, Coins, Result, SwapEvent};

/// Ordered byte-keyed storage.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn set(&mut self, key: &[u8], value: Vec<u8>);

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    fn delete(&mut self, key: &[u8]);

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;
}

/// Balance movement between accounts.
///
/// A transfer is all-or-nothing across every coin of `amount`: on error no
/// balance has changed.
pub trait EscrowBank {
    /// # Errors
    /// `TransferFailed` if `from` cannot cover `amount`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coins) -> Result<()>;
}

/// Account address parsing.
pub trait AddressValidator {
    /// # Errors
    /// `InvalidAddress` if `raw` is not a well-formed account address.
    fn parse(&self, raw: &str) -> Result<Address>;
}

/// Fire-and-forget notification sink.
pub trait EventSink {
    fn emit(&mut self, event: SwapEvent);
}

/// Read-only view of the block the current call executes in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContext {
    pub chain_id: String,
    pub height: u64,
    pub time: DateTime<Utc>,
}

impl BlockContext {
    #[must_use]
    pub fn new(chain_id: impl Into<String>, height: u64, time: DateTime<Utc>) -> Self {
        Self {
            chain_id: chain_id.into(),
            height,
            time,
        }
    }

    /// The same chain at a later height and time, saturating at the top of
    /// each range.
    #[must_use]
    pub fn advance(&self, blocks: u64, elapsed: chrono::Duration) -> Self {
        Self {
            chain_id: self.chain_id.clone(),
            height: self.height.saturating_add(blocks),
            time: self
                .time
                .checked_add_signed(elapsed)
                .unwrap_or(if elapsed < chrono::Duration::zero() {
                    DateTime::<Utc>::MIN_UTC
                } else {
                    DateTime::<Utc>::MAX_UTC
                }),
        }
    }
}
