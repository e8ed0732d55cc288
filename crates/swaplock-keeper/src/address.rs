//! Bech32-shaped account address validation.

use swaplock_types::constants::{BECH32_CHARSET, DEFAULT_ADDRESS_HRP};
use swaplock_types::{Address, Result, SwapLockError};

use crate::capabilities::AddressValidator;

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 90;
const SEPARATOR: char = '1';

/// Accepts `hrp` + `1` + a data part over the bech32 alphabet.
///
/// The checksum is not verified.
#[derive(Debug, Clone)]
pub struct Bech32AddressValidator {
    hrp: String,
}

impl Bech32AddressValidator {
    #[must_use]
    pub fn new(hrp: impl Into<String>) -> Self {
        Self { hrp: hrp.into() }
    }

    #[must_use]
    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    fn reject(raw: &str, reason: impl Into<String>) -> SwapLockError {
        SwapLockError::InvalidAddress {
            address: raw.to_string(),
            reason: reason.into(),
        }
    }
}

impl Default for Bech32AddressValidator {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS_HRP)
    }
}

impl AddressValidator for Bech32AddressValidator {
    fn parse(&self, raw: &str) -> Result<Address> {
        if raw.is_empty() {
            return Err(Self::reject(raw, "empty address"));
        }
        if !(MIN_LEN..=MAX_LEN).contains(&raw.len()) {
            return Err(Self::reject(
                raw,
                format!("length {} outside {MIN_LEN}..={MAX_LEN}", raw.len()),
            ));
        }
        if raw.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(Self::reject(raw, "must be lowercase"));
        }
        let Some((hrp, data)) = raw.rsplit_once(SEPARATOR) else {
            return Err(Self::reject(raw, "missing separator"));
        };
        if hrp != self.hrp {
            return Err(Self::reject(
                raw,
                format!("expected prefix {:?}, got {hrp:?}", self.hrp),
            ));
        }
        if data.is_empty() {
            return Err(Self::reject(raw, "empty data part"));
        }
        if let Some(bad) = data.chars().find(|c| !BECH32_CHARSET.contains(*c)) {
            return Err(Self::reject(raw, format!("invalid character {bad:?}")));
        }
        Ok(Address(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu";

    #[test]
    fn accepts_well_formed() {
        let v = Bech32AddressValidator::default();
        assert_eq!(v.parse(ALICE).unwrap().as_str(), ALICE);
    }

    #[test]
    fn rejects_malformed() {
        let v = Bech32AddressValidator::default();
        for raw in [
            "",
            "cosmos1",
            "osmo1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu",
            "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xb",
            "COSMOS1QYPQXPQ9QCRSSZG2PVXQ6RS0ZQG3YYC5LZV7XU",
            "cosmosqypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu",
        ] {
            let err = v.parse(raw).unwrap_err();
            assert!(
                matches!(err, SwapLockError::InvalidAddress { .. }),
                "{raw}: {err:?}"
            );
        }
    }

    #[test]
    fn rejects_overlong() {
        let v = Bech32AddressValidator::default();
        let raw = format!("cosmos1{}", "q".repeat(90));
        assert!(v.parse(&raw).is_err());
    }

    #[test]
    fn custom_hrp() {
        let v = Bech32AddressValidator::new("osmo");
        assert!(v.parse("osmo1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu").is_ok());
        assert!(v.parse(ALICE).is_err());
        assert_eq!(v.hrp(), "osmo");
    }
}
