//! GC metrics and statistics.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// What caused a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollectionTrigger {
    /// No collection has run yet.
    #[default]
    None,
    /// An allocation found the heap at its threshold.
    Allocation,
    /// The mutator called [`Vm::collect`](crate::Vm::collect).
    Explicit,
    /// [`Vm::teardown`](crate::Vm::teardown) emptied the root set.
    Teardown,
}

/// Statistics from one garbage collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcMetrics {
    /// What caused this collection.
    pub trigger: CollectionTrigger,
    /// Objects in the heap when the collection started.
    pub live_before: usize,
    /// Objects reclaimed by the sweep.
    pub objects_reclaimed: usize,
    /// Objects left in the heap afterwards.
    pub live_after: usize,
    /// Objects reached by the mark phase.
    pub objects_marked: usize,
    /// Threshold in force after the collection.
    pub threshold_after: usize,
    /// Total collections on this VM, including this one.
    pub total_collections: usize,
    /// Duration of the whole collection.
    pub duration: Duration,
    /// Duration of the mark phase.
    pub mark_duration: Duration,
    /// Duration of the sweep phase.
    pub sweep_duration: Duration,
}

impl Default for GcMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GcMetrics {
    /// Create a new `GcMetrics` with all fields set to zero/defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trigger: CollectionTrigger::None,
            live_before: 0,
            objects_reclaimed: 0,
            live_after: 0,
            objects_marked: 0,
            threshold_after: 0,
            total_collections: 0,
            duration: Duration::ZERO,
            mark_duration: Duration::ZERO,
            sweep_duration: Duration::ZERO,
        }
    }

    /// Returns `true` if the collection had nothing to do because the heap
    /// was empty.
    #[must_use]
    pub const fn was_noop(&self) -> bool {
        self.live_before == 0
    }
}

/// Internal helper for capturing phase durations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PhaseTimer {
    pub mark: Duration,
    pub sweep: Duration,
    current_start: Option<Instant>,
}

impl PhaseTimer {
    pub const fn new() -> Self {
        Self {
            mark: Duration::ZERO,
            sweep: Duration::ZERO,
            current_start: None,
        }
    }

    pub fn start(&mut self) {
        self.current_start = Some(Instant::now());
    }

    pub fn end_mark(&mut self) {
        if let Some(start) = self.current_start.take() {
            self.mark = start.elapsed();
        }
    }

    pub fn end_sweep(&mut self) {
        if let Some(start) = self.current_start.take() {
            self.sweep = start.elapsed();
        }
    }
}

/// Cumulative statistics for one VM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GcStats {
    /// Collections run, including no-op ones.
    pub collections: usize,
    /// Collections started by an allocation hitting the threshold.
    pub automatic_collections: usize,
    /// Objects reclaimed across all collections.
    pub objects_reclaimed: usize,
    /// Total time spent collecting.
    pub total_pause: Duration,
}

impl GcStats {
    pub(crate) fn record(&mut self, metrics: &GcMetrics) {
        self.collections += 1;
        if metrics.trigger == CollectionTrigger::Allocation {
            self.automatic_collections += 1;
        }
        self.objects_reclaimed += metrics.objects_reclaimed;
        self.total_pause += metrics.duration;
    }
}

/// Ring buffer size for GC history.
pub const HISTORY_SIZE: usize = 64;

/// The most recent [`HISTORY_SIZE`] collections, oldest first.
#[derive(Debug, Clone, Default)]
pub struct GcHistory {
    entries: VecDeque<GcMetrics>,
    total_recorded: usize,
}

impl GcHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_SIZE),
            total_recorded: 0,
        }
    }

    pub(crate) fn push(&mut self, metrics: GcMetrics) {
        if self.entries.len() == HISTORY_SIZE {
            self.entries.pop_front();
        }
        self.entries.push_back(metrics);
        self.total_recorded += 1;
    }

    /// The most recent collection, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&GcMetrics> {
        self.entries.back()
    }

    /// Iterate over the retained collections, oldest first. Use `.rev()` for
    /// newest first.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = &GcMetrics> + ExactSizeIterator + '_ {
        self.entries.iter()
    }

    /// Number of retained collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no collection has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collections recorded since creation, including evicted ones.
    #[must_use]
    pub const fn total_recorded(&self) -> usize {
        self.total_recorded
    }

    /// Average pause over the retained collections.
    #[must_use]
    pub fn average_pause(&self) -> Duration {
        let Ok(count) = u32::try_from(self.entries.len()) else {
            return Duration::ZERO;
        };
        if count == 0 {
            return Duration::ZERO;
        }
        self.entries.iter().map(|m| m.duration).sum::<Duration>() / count
    }
}
