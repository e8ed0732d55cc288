//! Serialization context.
//!
//! The host builds one [`Codec`] at startup and hands it to the keeper and
//! to whatever decodes incoming transactions. The message registry inside is
//! fixed once the codec is constructed.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use swaplock_types::{Result, SwapLockError};

use crate::msgs::{Msg, MsgKind};

/// Type URL to message kind mapping.
#[derive(Debug, Clone, Default)]
pub struct MsgRegistry {
    by_url: BTreeMap<String, MsgKind>,
    by_kind: BTreeMap<MsgKind, String>,
}

impl MsgRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every message kind under its default type URL.
    ///
    /// # Errors
    /// Never fails for the built-in kinds; the signature matches
    /// [`MsgRegistry::register`].
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        for kind in MsgKind::ALL {
            registry.register(kind.type_url(), kind)?;
        }
        Ok(registry)
    }

    /// # Errors
    /// `Configuration` if the URL or the kind is already registered.
    pub fn register(&mut self, type_url: impl Into<String>, kind: MsgKind) -> Result<()> {
        let type_url = type_url.into();
        if self.by_url.contains_key(&type_url) {
            return Err(SwapLockError::Configuration(format!(
                "type url {type_url} registered twice"
            )));
        }
        if let Some(existing) = self.by_kind.get(&kind) {
            return Err(SwapLockError::Configuration(format!(
                "{} already registered as {existing}",
                kind.name()
            )));
        }
        self.by_url.insert(type_url.clone(), kind);
        self.by_kind.insert(kind, type_url);
        Ok(())
    }

    #[must_use]
    pub fn resolve(&self, type_url: &str) -> Option<MsgKind> {
        self.by_url.get(type_url).copied()
    }

    #[must_use]
    pub fn type_url(&self, kind: MsgKind) -> Option<&str> {
        self.by_kind.get(&kind).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}

/// Record and message encoding.
#[derive(Debug, Clone)]
pub struct Codec {
    registry: MsgRegistry,
}

impl Codec {
    #[must_use]
    pub fn new(registry: MsgRegistry) -> Self {
        Self { registry }
    }

    /// Codec over [`MsgRegistry::with_defaults`].
    ///
    /// # Errors
    /// Propagates registration failures.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(MsgRegistry::with_defaults()?))
    }

    #[must_use]
    pub fn registry(&self) -> &MsgRegistry {
        &self.registry
    }

    /// # Errors
    /// `Serialization` if the value cannot be encoded.
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// # Errors
    /// `Serialization` if the bytes are not a valid `T`.
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode a message into a `(type_url, bytes)` envelope.
    ///
    /// # Errors
    /// `InvalidRequest` if the message kind is not registered.
    pub fn encode_msg(&self, msg: &Msg) -> Result<(String, Vec<u8>)> {
        let type_url = self.registry.type_url(msg.kind()).ok_or_else(|| {
            SwapLockError::invalid_request(format!("{} is not registered", msg.kind().name()))
        })?;
        let bytes = match msg {
            Msg::CreateAtomicSwap(m) => self.encode(m)?,
            Msg::ClaimAtomicSwap(m) => self.encode(m)?,
            Msg::RefundAtomicSwap(m) => self.encode(m)?,
            Msg::CreatePartialFillOrder(m) => self.encode(m)?,
            Msg::FillOrder(m) => self.encode(m)?,
            Msg::SyncOrder(m) => self.encode(m)?,
        };
        Ok((type_url.to_string(), bytes))
    }

    /// Decode a `(type_url, bytes)` envelope.
    ///
    /// # Errors
    /// `InvalidRequest` for an unregistered type URL, `Serialization` for a
    /// body that does not match the registered kind.
    pub fn decode_msg(&self, type_url: &str, bytes: &[u8]) -> Result<Msg> {
        let kind = self.registry.resolve(type_url).ok_or_else(|| {
            SwapLockError::invalid_request(format!("unknown message type url {type_url}"))
        })?;
        Ok(match kind {
            MsgKind::CreateAtomicSwap => Msg::CreateAtomicSwap(self.decode(bytes)?),
            MsgKind::ClaimAtomicSwap => Msg::ClaimAtomicSwap(self.decode(bytes)?),
            MsgKind::RefundAtomicSwap => Msg::RefundAtomicSwap(self.decode(bytes)?),
            MsgKind::CreatePartialFillOrder => Msg::CreatePartialFillOrder(self.decode(bytes)?),
            MsgKind::FillOrder => Msg::FillOrder(self.decode(bytes)?),
            MsgKind::SyncOrder => Msg::SyncOrder(self.decode(bytes)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::{MsgClaimAtomicSwap, MsgRefundAtomicSwap};

    #[test]
    fn defaults_register_every_kind() {
        let registry = MsgRegistry::with_defaults().unwrap();
        assert_eq!(registry.len(), MsgKind::ALL.len());
        assert_eq!(
            registry.resolve("atomicswap/MsgClaimAtomicSwap"),
            Some(MsgKind::ClaimAtomicSwap)
        );
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = MsgRegistry::new();
        registry
            .register("atomicswap/MsgFillOrder", MsgKind::FillOrder)
            .unwrap();
        let err = registry
            .register("atomicswap/MsgFillOrder", MsgKind::SyncOrder)
            .unwrap_err();
        assert!(matches!(err, SwapLockError::Configuration(_)));
        let err = registry
            .register("custom/Fill", MsgKind::FillOrder)
            .unwrap_err();
        assert!(matches!(err, SwapLockError::Configuration(_)));
    }

    #[test]
    fn envelope_roundtrip() {
        let codec = Codec::standard().unwrap();
        let msg = Msg::ClaimAtomicSwap(MsgClaimAtomicSwap {
            sender: "cosmos1abc".into(),
            swap_id: "id".into(),
            random_number: "00".into(),
        });
        let (url, bytes) = codec.encode_msg(&msg).unwrap();
        assert_eq!(url, "atomicswap/MsgClaimAtomicSwap");
        assert_eq!(codec.decode_msg(&url, &bytes).unwrap(), msg);
    }

    #[test]
    fn unknown_type_url_is_invalid_request() {
        let codec = Codec::standard().unwrap();
        let err = codec.decode_msg("bank/MsgSend", b"{}").unwrap_err();
        assert!(matches!(err, SwapLockError::InvalidRequest { .. }));
    }

    #[test]
    fn mismatched_body_is_serialization_error() {
        let codec = Codec::standard().unwrap();
        let err = codec
            .decode_msg("atomicswap/MsgCreateAtomicSwap", b"{\"sender\":1}")
            .unwrap_err();
        assert!(matches!(err, SwapLockError::Serialization(_)));
    }

    #[test]
    fn unregistered_kind_cannot_be_encoded() {
        let mut registry = MsgRegistry::new();
        registry
            .register("x/Claim", MsgKind::ClaimAtomicSwap)
            .unwrap();
        let codec = Codec::new(registry);
        let msg = Msg::RefundAtomicSwap(MsgRefundAtomicSwap {
            sender: "cosmos1abc".into(),
            swap_id: "id".into(),
        });
        assert!(codec.encode_msg(&msg).is_err());
    }
}
