//! Object pool owning every allocated object.
//!
//! The heap is a vector of slots addressed by [`ObjectRef`]. Reclaimed slots
//! go on a free list and are reused before the pool grows. Each slot keeps a
//! generation counter so that stale handles are detected instead of silently
//! aliasing a newer object.
//!
//! The heap does not decide when to collect; it only exposes `live_count` and
//! `threshold` so the VM can run the collector before allocating.

use std::alloc::{handle_alloc_error, Layout};

use crate::object::{Object, ObjectRef, Payload};

// ============================================================================
// Slot
// ============================================================================

#[derive(Debug)]
struct Slot {
    generation: u32,
    object: Option<Object>,
}

// ============================================================================
// Heap
// ============================================================================

/// The set of all objects under the collector's management.
///
/// Only the VM allocates into a heap, so every handle stored in a pair has
/// been checked against it first:
///
/// ```compile_fail
/// let mut heap = mini_gc::heap::Heap::new(8);
/// heap.make_int(1);
/// ```
#[derive(Debug)]
pub struct Heap {
    slots: Vec<Slot>,
    /// Indices of empty slots, reused LIFO.
    free: Vec<u32>,
    live_count: usize,
    threshold: usize,
    /// Objects allocated over the heap's lifetime.
    total_allocated: usize,
}

impl Heap {
    /// Create an empty heap that first collects once `threshold` objects are
    /// live.
    pub(crate) const fn new(threshold: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live_count: 0,
            threshold,
            total_allocated: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------------

    /// Place a new unmarked object in the heap and return its handle.
    ///
    /// This never collects; callers check [`Heap::should_collect`] first.
    ///
    /// # Panics
    ///
    /// Panics if the pool would need more than `u32::MAX` slots. Aborts via
    /// [`handle_alloc_error`] if the pool cannot grow.
    pub(crate) fn allocate(&mut self, payload: Payload) -> ObjectRef {
        let object = Object::new(payload);

        let handle = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.object.is_none(), "free list names an occupied slot");
            slot.object = Some(object);
            ObjectRef::new(index, slot.generation)
        } else {
            let Ok(index) = u32::try_from(self.slots.len()) else {
                panic!("heap exhausted: object index space is full");
            };
            if self.slots.try_reserve(1).is_err() {
                handle_alloc_error(Layout::new::<Slot>());
            }
            self.slots.push(Slot {
                generation: 0,
                object: Some(object),
            });
            ObjectRef::new(index, 0)
        };

        self.live_count += 1;
        self.total_allocated += 1;
        handle
    }

    /// Allocate an `Int` object.
    pub(crate) fn make_int(&mut self, value: i64) -> ObjectRef {
        self.allocate(Payload::Int(value))
    }

    /// Allocate a `Pair` object. The root set is not touched.
    pub(crate) fn make_pair(&mut self, head: ObjectRef, tail: ObjectRef) -> ObjectRef {
        self.allocate(Payload::Pair { head, tail })
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// Resolve a handle. Returns `None` if the object has been reclaimed.
    #[must_use]
    pub fn get(&self, handle: ObjectRef) -> Option<&Object> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.object.as_ref())
    }

    pub(crate) fn get_mut(&mut self, handle: ObjectRef) -> Option<&mut Object> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.object.as_mut())
    }

    /// Returns `true` if `handle` names a live object.
    #[must_use]
    pub fn contains(&self, handle: ObjectRef) -> bool {
        self.get(handle).is_some()
    }

    /// Iterate over every live object, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef, &Object)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let object = slot.object.as_ref()?;
            // Slot count never exceeds u32::MAX, see `allocate`.
            #[allow(clippy::cast_possible_truncation)]
            let handle = ObjectRef::new(index as u32, slot.generation);
            Some((handle, object))
        })
    }

    // ------------------------------------------------------------------------
    // Accounting
    // ------------------------------------------------------------------------

    /// Number of objects currently in the heap.
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.live_count
    }

    /// Live count at which the next allocation triggers a collection.
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    pub(crate) fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold;
    }

    /// Returns `true` if the next allocation must be preceded by a collection.
    #[must_use]
    pub const fn should_collect(&self) -> bool {
        self.live_count >= self.threshold
    }

    /// Total objects allocated since the heap was created.
    #[must_use]
    pub const fn total_allocated(&self) -> usize {
        self.total_allocated
    }

    /// Number of slots in the pool, occupied or not.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of empty slots waiting for reuse.
    #[must_use]
    pub fn free_slot_count(&self) -> usize {
        self.free.len()
    }

    // ------------------------------------------------------------------------
    // Collector access
    // ------------------------------------------------------------------------

    /// Object in slot `index`, ignoring generations.
    pub(crate) fn object_at_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.slots.get_mut(index).and_then(|slot| slot.object.as_mut())
    }

    /// Drop the object in slot `index` and put the slot on the free list.
    ///
    /// A slot whose generation cannot advance any further is retired: it
    /// stays empty forever so no old handle can alias a new occupant.
    pub(crate) fn reclaim(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if slot.object.take().is_none() {
            return;
        }
        self.live_count -= 1;
        let Some(generation) = slot.generation.checked_add(1) else {
            return;
        };
        slot.generation = generation;
        // `index` came from `slots`, whose length fits in u32.
        #[allow(clippy::cast_possible_truncation)]
        self.free.push(index as u32);
    }
}
