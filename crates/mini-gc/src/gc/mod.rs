//! Mark-Sweep garbage collection.
//!
//! A collection marks everything reachable from the root stack, then sweeps
//! the heap once: unmarked objects are reclaimed and marked ones have their
//! mark cleared for the next cycle. Afterwards the threshold is reset from
//! the surviving live count.
//!
//! Collections are stop-the-world by construction: the collector runs under
//! the VM's `&mut self` and always finishes before returning.

mod mark;
mod sweep;

use std::time::Instant;

use crate::heap::Heap;
use crate::metrics::{CollectionTrigger, GcHistory, GcMetrics, GcStats, PhaseTimer};
use crate::object::ObjectRef;
use crate::roots::RootStack;

#[cfg(feature = "tracing")]
use crate::tracing::internal::{
    log_collection, log_noop, next_gc_id, trace_gc_collection, trace_phase,
};

/// Collector state. Outside of [`Vm`](crate::Vm) calls it is always `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum GcPhase {
    /// No collection in progress.
    #[default]
    Idle,
    /// Tracing the object graph from the roots.
    Mark,
    /// Reclaiming unmarked objects.
    Sweep,
}

/// Threshold to use after a collection leaves `live_count` objects.
///
/// Doubles the live count so collections stay amortized as the live set
/// grows, never dropping below `floor`. Saturates instead of overflowing.
#[must_use]
pub const fn next_threshold(live_count: usize, floor: usize) -> usize {
    if live_count == 0 {
        return floor;
    }
    let doubled = live_count.saturating_mul(2);
    if doubled > floor {
        doubled
    } else {
        floor
    }
}

// ============================================================================
// Collector
// ============================================================================

/// Per-VM collector state: the mark worklist and collection bookkeeping.
#[derive(Debug)]
pub(crate) struct Collector {
    floor: usize,
    phase: GcPhase,
    /// Reused across cycles so marking does not allocate once warmed up.
    worklist: Vec<ObjectRef>,
    stats: GcStats,
    history: GcHistory,
}

impl Collector {
    pub fn new(floor: usize) -> Self {
        Self {
            floor,
            phase: GcPhase::Idle,
            worklist: Vec::new(),
            stats: GcStats::default(),
            history: GcHistory::new(),
        }
    }

    pub const fn stats(&self) -> &GcStats {
        &self.stats
    }

    pub const fn history(&self) -> &GcHistory {
        &self.history
    }

    /// Run one full mark-sweep cycle over `heap` with `roots` as the root set.
    pub fn collect(
        &mut self,
        heap: &mut Heap,
        roots: &RootStack,
        trigger: CollectionTrigger,
    ) -> GcMetrics {
        debug_assert_eq!(self.phase, GcPhase::Idle, "collection re-entered");

        #[cfg(feature = "tracing")]
        let _gc_span = trace_gc_collection(trigger, next_gc_id());

        let start = Instant::now();
        let live_before = heap.live_count();
        let mut timer = PhaseTimer::new();
        let mut objects_marked = 0;
        let mut objects_reclaimed = 0;

        if live_before == 0 {
            #[cfg(feature = "tracing")]
            log_noop();
        } else {
            self.phase = GcPhase::Mark;
            timer.start();
            {
                #[cfg(feature = "tracing")]
                let _phase = trace_phase(GcPhase::Mark);
                objects_marked = mark::mark_from_roots(heap, roots.iter(), &mut self.worklist);
            }
            timer.end_mark();

            self.phase = GcPhase::Sweep;
            timer.start();
            {
                #[cfg(feature = "tracing")]
                let _phase = trace_phase(GcPhase::Sweep);
                objects_reclaimed = sweep::sweep(heap);
            }
            timer.end_sweep();

            heap.set_threshold(next_threshold(heap.live_count(), self.floor));
            self.phase = GcPhase::Idle;
        }

        debug_assert_eq!(objects_marked, heap.live_count());

        let metrics = GcMetrics {
            trigger,
            live_before,
            objects_reclaimed,
            live_after: heap.live_count(),
            objects_marked,
            threshold_after: heap.threshold(),
            total_collections: self.stats.collections + 1,
            duration: start.elapsed(),
            mark_duration: timer.mark,
            sweep_duration: timer.sweep,
        };
        self.stats.record(&metrics);
        self.history.push(metrics);

        #[cfg(feature = "tracing")]
        log_collection(&metrics);

        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_threshold_doubles_live_count() {
        assert_eq!(next_threshold(10, 8), 20);
        assert_eq!(next_threshold(4, 8), 8);
        assert_eq!(next_threshold(5, 8), 10);
    }

    #[test]
    fn test_next_threshold_resets_to_floor_when_empty() {
        assert_eq!(next_threshold(0, 8), 8);
        assert_eq!(next_threshold(0, 1), 1);
    }

    #[test]
    fn test_next_threshold_saturates() {
        assert_eq!(next_threshold(usize::MAX, 8), usize::MAX);
        assert_eq!(next_threshold(usize::MAX / 2 + 1, 8), usize::MAX);
    }

    #[test]
    fn test_collect_empty_heap_is_noop() {
        let mut heap = Heap::new(8);
        let roots = RootStack::with_capacity(4);
        let mut collector = Collector::new(8);

        let metrics = collector.collect(&mut heap, &roots, CollectionTrigger::Explicit);
        assert!(metrics.was_noop());
        assert_eq!(metrics.objects_marked, 0);
        assert_eq!(metrics.threshold_after, 8);
        assert_eq!(collector.stats().collections, 1);
        assert_eq!(collector.phase, GcPhase::Idle);
    }

    #[test]
    fn test_collect_marks_and_sweeps() {
        let mut heap = Heap::new(8);
        let mut roots = RootStack::with_capacity(4);
        let mut collector = Collector::new(2);

        let a = heap.make_int(1);
        let b = heap.make_int(2);
        let _garbage = heap.make_int(3);
        let pair = heap.make_pair(a, b);
        roots.push(pair);

        let metrics = collector.collect(&mut heap, &roots, CollectionTrigger::Explicit);
        assert_eq!(metrics.live_before, 4);
        assert_eq!(metrics.objects_marked, 3);
        assert_eq!(metrics.objects_reclaimed, 1);
        assert_eq!(metrics.live_after, 3);
        assert_eq!(heap.threshold(), 6);
        assert!(heap.iter().all(|(_, obj)| !obj.is_marked()));
        assert_eq!(collector.phase, GcPhase::Idle);
        assert_eq!(collector.history().len(), 1);
    }
}
