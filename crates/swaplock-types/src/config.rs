//! Configuration types: module parameters and keeper construction config.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Address, Result, SwapLockError, constants};

/// Module parameters governing swap creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Smallest accepted `height_span`.
    pub min_block_lock: u64,
    /// Largest accepted `height_span`.
    pub max_block_lock: u64,
    /// Denominations that may be escrowed.
    pub supported_assets: Vec<String>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            min_block_lock: constants::DEFAULT_MIN_BLOCK_LOCK,
            max_block_lock: constants::DEFAULT_MAX_BLOCK_LOCK,
            supported_assets: constants::DEFAULT_SUPPORTED_ASSETS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Params {
    /// Parse params from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| SwapLockError::Configuration(format!("params: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    /// Validate the parameter set.
    ///
    /// # Errors
    /// Returns `Configuration` if a lock bound is zero, `min >= max`, or the
    /// supported asset list is empty or contains empty/duplicate entries.
    pub fn validate(&self) -> Result<()> {
        if self.min_block_lock == 0 {
            return Err(SwapLockError::Configuration(
                "min block lock must be positive".into(),
            ));
        }
        if self.max_block_lock == 0 {
            return Err(SwapLockError::Configuration(
                "max block lock must be positive".into(),
            ));
        }
        if self.min_block_lock >= self.max_block_lock {
            return Err(SwapLockError::Configuration(format!(
                "min block lock {} must be less than max block lock {}",
                self.min_block_lock, self.max_block_lock
            )));
        }
        if self.supported_assets.is_empty() {
            return Err(SwapLockError::Configuration(
                "supported assets cannot be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for asset in &self.supported_assets {
            if asset.is_empty() {
                return Err(SwapLockError::Configuration(
                    "asset denom cannot be empty".into(),
                ));
            }
            if !seen.insert(asset.as_str()) {
                return Err(SwapLockError::Configuration(format!(
                    "duplicate asset: {asset}"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_supported(&self, denom: &str) -> bool {
        self.supported_assets.iter().any(|a| a == denom)
    }

    #[must_use]
    pub fn allows_height_span(&self, height_span: u64) -> bool {
        (self.min_block_lock..=self.max_block_lock).contains(&height_span)
    }
}

/// Construction-time configuration of a keeper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperConfig {
    pub params: Params,
    /// Account holding escrowed funds.
    pub escrow_account: Address,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            params: Params::default(),
            escrow_account: Address(constants::MODULE_NAME.to_string()),
        }
    }
}
