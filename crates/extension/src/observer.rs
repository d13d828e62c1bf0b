//! Diagnostic hook invoked after a payload has been decoded.
//!
//! Reports are advisory: an observer cannot alter the decoded value or the
//! outcome of the call. The codec owns its observer, so tests can silence or
//! record reports without touching process-wide logging state.

use std::fmt::Debug;
use std::sync::Arc;

use crate::ExtensionKind;

/// Receives every value the codec materializes from a non-empty payload.
///
/// Implementations must be safe to call from many decodes at once.
pub trait DecodeObserver: Send + Sync {
    fn decoded(&self, kind: ExtensionKind, value: &dyn Debug);
}

/// Emits each decoded value as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DecodeObserver for TracingObserver {
    fn decoded(&self, kind: ExtensionKind, value: &dyn Debug) {
        tracing::debug!(
            target: "rawext::extension",
            %kind,
            value = ?value,
            "Got provider {kind} from raw extension"
        );
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DecodeObserver for NoopObserver {
    fn decoded(&self, _kind: ExtensionKind, _value: &dyn Debug) {}
}

impl<O: DecodeObserver + ?Sized> DecodeObserver for &O {
    fn decoded(&self, kind: ExtensionKind, value: &dyn Debug) {
        (**self).decoded(kind, value)
    }
}

impl<O: DecodeObserver + ?Sized> DecodeObserver for Arc<O> {
    fn decoded(&self, kind: ExtensionKind, value: &dyn Debug) {
        (**self).decoded(kind, value)
    }
}
