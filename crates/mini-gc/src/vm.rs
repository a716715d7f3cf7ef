//! The mutator-facing VM.
//!
//! [`Vm`] owns the heap, the root stack and the collector. Every operation
//! that allocates first checks the heap threshold and, if it has been
//! reached, runs a full collection before the new object exists. Operands
//! that a new object will reference are still on the root stack at that
//! point, so they survive.

use crate::config::VmConfig;
use crate::gc::Collector;
use crate::heap::Heap;
use crate::metrics::{CollectionTrigger, GcHistory, GcMetrics, GcStats};
use crate::object::{Object, ObjectRef, Payload};
use crate::roots::RootStack;

/// A stack VM whose values live in a garbage-collected heap.
#[derive(Debug)]
pub struct Vm {
    config: VmConfig,
    heap: Heap,
    roots: RootStack,
    collector: Collector,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    /// Create a VM with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    /// Create a VM with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.stack_max` or `config.initial_threshold` is zero.
    #[must_use]
    pub fn with_config(config: VmConfig) -> Self {
        config.validate();
        Self {
            config,
            heap: Heap::new(config.initial_threshold),
            roots: RootStack::with_capacity(config.stack_max),
            collector: Collector::new(config.initial_threshold),
        }
    }

    // ------------------------------------------------------------------------
    // Mutator operations
    // ------------------------------------------------------------------------

    /// Allocate an integer and push it.
    ///
    /// # Panics
    ///
    /// Panics with `"stack overflow"` if the root stack is full. The check
    /// happens before anything is allocated.
    pub fn push_int(&mut self, value: i64) -> ObjectRef {
        assert!(!self.roots.is_full(), "stack overflow");
        self.maybe_collect();
        let obj = self.heap.make_int(value);
        self.roots.push(obj);
        obj
    }

    /// Pop two values and push a pair of them.
    ///
    /// The value pushed last becomes the `tail` and the one below it the
    /// `head`. Any collection runs while both operands are still rooted.
    ///
    /// # Panics
    ///
    /// Panics with `"stack underflow"` if fewer than two values are on the
    /// stack.
    pub fn push_pair(&mut self) -> ObjectRef {
        assert!(self.roots.depth() >= 2, "stack underflow");
        self.maybe_collect();
        let tail = self.roots.pop();
        let head = self.roots.pop();
        let pair = self.heap.make_pair(head, tail);
        self.roots.push(pair);
        pair
    }

    /// Push an existing object onto the root stack.
    ///
    /// # Panics
    ///
    /// Panics with `"stack overflow"` if the stack is full, or with
    /// `"dangling object reference"` if `obj` has been reclaimed.
    pub fn push(&mut self, obj: ObjectRef) {
        assert!(self.heap.contains(obj), "dangling object reference");
        self.roots.push(obj);
    }

    /// Pop the top of the root stack. The object stays in the heap until a
    /// collection finds it unreachable.
    ///
    /// # Panics
    ///
    /// Panics with `"stack underflow"` if the stack is empty.
    pub fn pop(&mut self) -> ObjectRef {
        self.roots.pop()
    }

    /// Returns the value `distance` entries below the top without popping.
    #[must_use]
    pub fn peek(&self, distance: usize) -> Option<ObjectRef> {
        self.roots.peek(distance)
    }

    /// Number of values on the root stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.roots.depth()
    }

    /// Replace the `head` of a pair.
    ///
    /// # Panics
    ///
    /// Panics if `pair` is not a live pair or `value` is not live.
    pub fn set_head(&mut self, pair: ObjectRef, value: ObjectRef) {
        *self.pair_fields_mut(pair, value).0 = value;
    }

    /// Replace the `tail` of a pair.
    ///
    /// # Panics
    ///
    /// Panics if `pair` is not a live pair or `value` is not live.
    pub fn set_tail(&mut self, pair: ObjectRef, value: ObjectRef) {
        *self.pair_fields_mut(pair, value).1 = value;
    }

    fn pair_fields_mut(
        &mut self,
        pair: ObjectRef,
        value: ObjectRef,
    ) -> (&mut ObjectRef, &mut ObjectRef) {
        assert!(self.heap.contains(value), "dangling object reference");
        match self.heap.get_mut(pair).map(Object::payload_mut) {
            Some(Payload::Pair { head, tail }) => (head, tail),
            Some(Payload::Int(_)) => panic!("expected a pair, found an int"),
            None => panic!("dangling object reference"),
        }
    }

    // ------------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------------

    /// Run a collection now, regardless of the threshold.
    pub fn collect(&mut self) -> GcMetrics {
        self.run_collection(CollectionTrigger::Explicit)
    }

    fn maybe_collect(&mut self) {
        if self.heap.should_collect() {
            self.run_collection(CollectionTrigger::Allocation);
        }
    }

    fn run_collection(&mut self, trigger: CollectionTrigger) -> GcMetrics {
        self.collector.collect(&mut self.heap, &self.roots, trigger)
    }

    /// Drop every root, collect everything, and release the VM.
    ///
    /// Returns the metrics of the final collection, which always leaves the
    /// heap empty.
    pub fn teardown(mut self) -> GcMetrics {
        self.roots.clear();
        let metrics = self.run_collection(CollectionTrigger::Teardown);
        debug_assert_eq!(self.heap.live_count(), 0);
        metrics
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Resolve a handle. Returns `None` if the object has been reclaimed.
    #[must_use]
    pub fn get(&self, obj: ObjectRef) -> Option<&Object> {
        self.heap.get(obj)
    }

    /// Number of objects currently in the heap.
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.heap.live_count()
    }

    /// Live count at which the next allocation collects first.
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.heap.threshold()
    }

    /// The heap, for read-only inspection.
    #[must_use]
    pub const fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The root stack, for read-only inspection.
    #[must_use]
    pub const fn roots(&self) -> &RootStack {
        &self.roots
    }

    /// The configuration this VM was built with.
    #[must_use]
    pub const fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Cumulative collection statistics.
    #[must_use]
    pub const fn stats(&self) -> &GcStats {
        self.collector.stats()
    }

    /// Recent collections, oldest first.
    #[must_use]
    pub const fn history(&self) -> &GcHistory {
        self.collector.history()
    }

    /// Metrics of the most recent collection, or defaults if none has run.
    #[must_use]
    pub fn last_gc_metrics(&self) -> GcMetrics {
        self.history().latest().copied().unwrap_or_default()
    }
}
