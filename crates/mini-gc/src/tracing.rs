//! GC tracing support.
//!
//! When the `tracing` feature is enabled, this module provides structured
//! tracing spans and events for garbage collection operations.

#[cfg(feature = "tracing")]
pub mod internal {
    use std::sync::atomic::{AtomicU64, Ordering};
    use tracing::{span, Level};

    use crate::gc::GcPhase;
    use crate::metrics::{CollectionTrigger, GcMetrics};

    /// Stable identifier for a GC run.
    ///
    /// Correlates all events within a single collection. Starts at 1 and
    /// increases monotonically across every VM in the process.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GcId(pub u64);

    static NEXT_GC_ID: AtomicU64 = AtomicU64::new(1);

    /// Generate the next unique GC ID.
    pub fn next_gc_id() -> GcId {
        GcId(NEXT_GC_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Create a span for the entire GC collection.
    pub fn trace_gc_collection(trigger: CollectionTrigger, gc_id: GcId) -> span::EnteredSpan {
        span!(Level::DEBUG, "gc_collect", trigger = ?trigger, gc_id = gc_id.0).entered()
    }

    /// Create a span for a GC phase (mark/sweep).
    pub(crate) fn trace_phase(phase: GcPhase) -> span::EnteredSpan {
        span!(Level::DEBUG, "gc_phase", phase = ?phase).entered()
    }

    /// Log that a collection was skipped because the heap was empty.
    pub fn log_noop() {
        tracing::debug!("heap empty, skipping mark and sweep");
    }

    /// Log the outcome of a collection.
    pub fn log_collection(metrics: &GcMetrics) {
        tracing::debug!(
            live_before = metrics.live_before,
            reclaimed = metrics.objects_reclaimed,
            live_after = metrics.live_after,
            threshold = metrics.threshold_after,
            marked = metrics.objects_marked,
            "gc_complete"
        );
    }
}

#[cfg(feature = "tracing")]
pub use internal::GcId;
