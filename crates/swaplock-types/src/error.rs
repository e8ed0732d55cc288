//! Error types for SwapLock.
//!
//! All errors use the `SL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Request / validation errors
//! - 2xx: Swap and order lifecycle errors
//! - 3xx: Commitment verification errors
//! - 4xx: Progressive fill errors
//! - 5xx: Escrow transfer errors
//! - 9xx: General / internal errors

use thiserror::Error;

/// Central error enum for all SwapLock operations.
///
/// Every variant is detected before any mutation is persisted, so a caller
/// receiving one of these can assume the store is unchanged (the single
/// exception is [`SwapLockError::Expired`], which records the expiry).
#[derive(Debug, Error)]
pub enum SwapLockError {
    // =================================================================
    // Request Errors (1xx)
    // =================================================================
    /// A required field is missing or malformed.
    #[error("SL_ERR_100: Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// An address failed format validation.
    #[error("SL_ERR_101: Invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A coin amount is zero, negative, fractional or badly denominated.
    #[error("SL_ERR_102: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    // =================================================================
    // Lifecycle Errors (2xx)
    // =================================================================
    /// An entity with this identity already exists.
    #[error("SL_ERR_200: Already exists: {0}")]
    AlreadyExists(String),

    /// No entity with this identity.
    #[error("SL_ERR_201: Not found: {0}")]
    NotFound(String),

    /// The entity is in the wrong lifecycle stage for the operation.
    #[error("SL_ERR_202: Invalid state: {reason}")]
    InvalidState { reason: String },

    /// The caller is not the party allowed to perform the operation.
    #[error("SL_ERR_203: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// The order is past its expiration.
    #[error("SL_ERR_204: Expired: {0}")]
    Expired(String),

    /// The order is Settled or Expired and accepts no further fills.
    #[error("SL_ERR_205: Order {id} in terminal state {status}")]
    TerminalState { id: String, status: String },

    // =================================================================
    // Commitment Errors (3xx)
    // =================================================================
    /// The revealed preimage does not hash to the commitment.
    #[error("SL_ERR_300: Invalid preimage for swap {0}")]
    InvalidPreimage(String),

    /// The Merkle proof was built for a different leaf position.
    #[error("SL_ERR_301: Proof index {proof_index} does not match fill level {expected}")]
    ProofIndexMismatch { proof_index: u64, expected: u64 },

    /// The Merkle proof does not recompute to the committed root.
    #[error("SL_ERR_302: Merkle proof verification failed")]
    ProofInvalid,

    // =================================================================
    // Progressive Fill Errors (4xx)
    // =================================================================
    /// The fill level is past the completion step.
    #[error("SL_ERR_400: Invalid fill level: {0}")]
    InvalidLevel(u8),

    /// The computed fill amount for this step is zero.
    #[error("SL_ERR_401: Zero fill amount at level {0}")]
    ZeroFillAmount(u8),

    /// An amount would exceed its total or the representable range.
    #[error("SL_ERR_402: Amount overflow: {reason}")]
    Overflow { reason: String },

    // =================================================================
    // Transfer Errors (5xx)
    // =================================================================
    /// The escrow transfer capability rejected the transfer.
    #[error("SL_ERR_500: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SL_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid params, duplicate codec registration, etc.).
    #[error("SL_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl SwapLockError {
    /// Shorthand for [`SwapLockError::InvalidRequest`].
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SwapLockError::InvalidAmount`].
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SwapLockError::InvalidState`].
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SwapLockError::Unauthorized`].
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Numeric code, e.g. `202` for [`SwapLockError::InvalidState`].
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } => 100,
            Self::InvalidAddress { .. } => 101,
            Self::InvalidAmount { .. } => 102,
            Self::AlreadyExists(_) => 200,
            Self::NotFound(_) => 201,
            Self::InvalidState { .. } => 202,
            Self::Unauthorized { .. } => 203,
            Self::Expired(_) => 204,
            Self::TerminalState { .. } => 205,
            Self::InvalidPreimage(_) => 300,
            Self::ProofIndexMismatch { .. } => 301,
            Self::ProofInvalid => 302,
            Self::InvalidLevel(_) => 400,
            Self::ZeroFillAmount(_) => 401,
            Self::Overflow { .. } => 402,
            Self::TransferFailed { .. } => 500,
            Self::Internal(_) => 900,
            Self::Serialization(_) => 901,
            Self::Configuration(_) => 902,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SwapLockError>;

impl From<serde_json::Error> for SwapLockError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
