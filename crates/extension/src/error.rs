//! Errors produced by the extension codec.
//!
//! Absence is never an error: a missing value encodes to an empty payload
//! and a missing or empty payload decodes to the zero value. Only genuine
//! serialization or parse failures surface here, always carrying the
//! underlying cause as their [`std::error::Error::source`].

use thiserror::Error;

use crate::ExtensionKind;

/// Failure converting between a provider value and its payload bytes.
///
/// Neither variant is retried internally and neither leaves partial output
/// behind; the caller decides whether the failure is fatal.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// The value could not be represented by the strict JSON encoder
    /// (e.g. a map with non-string keys).
    #[error("error marshalling {kind}")]
    Encoding {
        /// Kind of value that was being encoded.
        kind: ExtensionKind,
        #[source]
        source: serde_json::Error,
    },

    /// The payload bytes are not valid structured text of the expected shape.
    #[error("error unmarshalling {kind}")]
    Decoding {
        /// Kind of value that was requested.
        kind: ExtensionKind,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ExtensionError {
    /// Returns the kind of value involved in the failed conversion.
    pub fn kind(&self) -> ExtensionKind {
        match self {
            Self::Encoding { kind, .. } | Self::Decoding { kind, .. } => *kind,
        }
    }
}
