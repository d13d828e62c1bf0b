//! rawext extension codec.
//!
//! Carries a [`vmi::VirtualMachineInstanceSpec`] or
//! [`vmi::VirtualMachineInstanceStatus`] as an opaque [`ExtensionPayload`]
//! inside a generic wrapper field, so an outer orchestration API can hold
//! provider-specific data without knowing its shape.
//!
//! ## Architectural Layer
//!
//! **Adapter.** Serialization format selection, absence handling, and decode
//! diagnostics live here. The surrounding system sees only
//! [`ExtensionPayload`] and the two conversion directions.
//!
//! ## Formats
//!
//! - Encoding is strict: compact JSON via `serde_json`. Values JSON cannot
//!   represent fail with [`ExtensionError::Encoding`].
//! - Decoding is permissive: YAML via `serde_yaml`, which also accepts the
//!   JSON the encoder produces. Parse failures yield
//!   [`ExtensionError::Decoding`].
//!
//! ## Absence
//!
//! | Direction | Input | Result |
//! |-----------|-------|--------|
//! | encode | `None` | empty payload |
//! | decode | `None`, empty, whitespace-only, or `null` document | `T::default()` |

pub mod codec;
pub mod error;
pub mod observer;
pub mod payload;

pub use codec::{
    payload_from_provider_spec, payload_from_provider_status, provider_spec_from_payload,
    provider_status_from_payload, ExtensionCodec, ExtensionKind, ProviderExtension,
};
pub use error::ExtensionError;
pub use observer::{DecodeObserver, NoopObserver, TracingObserver};
pub use payload::{ExtensionPayload, PayloadFormat};
