//! Strict-encode / permissive-decode conversion of provider values.
//!
//! Encoding always produces compact JSON. Decoding always goes through the
//! YAML parser, which reads that JSON as well as block-style documents and
//! other relaxed syntax from producers outside this crate. Keep the two
//! entry points separate: collapsing them into a single format would break
//! payloads written by hand or by older tooling.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use vmi::{VirtualMachineInstanceSpec, VirtualMachineInstanceStatus};

use crate::{DecodeObserver, ExtensionError, ExtensionPayload, TracingObserver};

/// Which provider value a payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    /// Desired configuration (`providerSpec`).
    Spec,
    /// Observed state (`providerStatus`).
    Status,
}

impl ExtensionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spec => "providerSpec",
            Self::Status => "providerStatus",
        }
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that can travel inside an [`ExtensionPayload`].
///
/// [`Default`] supplies the value returned for an absent or empty payload.
pub trait ProviderExtension: Serialize + DeserializeOwned + Default + fmt::Debug {
    const KIND: ExtensionKind;
}

impl ProviderExtension for VirtualMachineInstanceSpec {
    const KIND: ExtensionKind = ExtensionKind::Spec;
}

impl ProviderExtension for VirtualMachineInstanceStatus {
    const KIND: ExtensionKind = ExtensionKind::Status;
}

/// Converts provider values to and from [`ExtensionPayload`]s.
///
/// The codec holds no state beyond its observer; a single instance can be
/// shared across threads whenever the observer can.
#[derive(Debug, Clone, Default)]
pub struct ExtensionCodec<O = TracingObserver> {
    observer: O,
}

impl ExtensionCodec<TracingObserver> {
    /// Creates a codec that reports decoded values as `tracing` events.
    pub fn new() -> Self {
        Self {
            observer: TracingObserver,
        }
    }
}

impl<O: DecodeObserver> ExtensionCodec<O> {
    pub fn with_observer(observer: O) -> Self {
        Self { observer }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Encodes `value` as compact JSON.
    ///
    /// `None` yields an empty payload, not an encoded `null`.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::Encoding`] if the value cannot be represented in
    /// JSON. No partial payload is returned.
    pub fn encode<T: ProviderExtension>(
        &self,
        value: Option<&T>,
    ) -> Result<ExtensionPayload, ExtensionError> {
        let Some(value) = value else {
            return Ok(ExtensionPayload::empty());
        };

        ExtensionPayload::to_json(value).map_err(|source| ExtensionError::Encoding {
            kind: T::KIND,
            source,
        })
    }

    /// Decodes a payload of kind `T::KIND`.
    ///
    /// `None`, a blank payload, and a YAML `null` document all yield
    /// `T::default()`. Only the first document of a multi-document stream is
    /// read. Every value materialized from a non-empty payload is reported to
    /// the observer.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::Decoding`] if the bytes are not valid YAML/JSON or
    /// do not match the shape of `T`.
    pub fn decode<T: ProviderExtension>(
        &self,
        payload: Option<&ExtensionPayload>,
    ) -> Result<T, ExtensionError> {
        let Some(payload) = payload.filter(|p| !p.is_blank()) else {
            return Ok(T::default());
        };

        let value = match serde_yaml::Deserializer::from_slice(payload.as_bytes()).next() {
            Some(document) => Option::<T>::deserialize(document)
                .map_err(|source| ExtensionError::Decoding {
                    kind: T::KIND,
                    source,
                })?
                .unwrap_or_default(),
            // Comments and directives only.
            None => T::default(),
        };

        self.observer.decoded(T::KIND, &value);
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Convenience entry points over the default codec
// ---------------------------------------------------------------------------

/// Encodes a provider spec. `None` yields an empty payload.
pub fn payload_from_provider_spec(
    spec: Option<&VirtualMachineInstanceSpec>,
) -> Result<ExtensionPayload, ExtensionError> {
    ExtensionCodec::new().encode(spec)
}

/// Encodes a provider status. `None` yields an empty payload.
pub fn payload_from_provider_status(
    status: Option<&VirtualMachineInstanceStatus>,
) -> Result<ExtensionPayload, ExtensionError> {
    ExtensionCodec::new().encode(status)
}

/// Decodes a provider spec; absent or empty payloads yield the default spec.
pub fn provider_spec_from_payload(
    payload: Option<&ExtensionPayload>,
) -> Result<VirtualMachineInstanceSpec, ExtensionError> {
    ExtensionCodec::new().decode(payload)
}

/// Decodes a provider status; absent or empty payloads yield the default status.
pub fn provider_status_from_payload(
    payload: Option<&ExtensionPayload>,
) -> Result<VirtualMachineInstanceStatus, ExtensionError> {
    ExtensionCodec::new().decode(payload)
}
