//! Sweep phase.

use crate::heap::Heap;

/// Reclaim every unmarked object and clear the mark on the survivors.
///
/// Returns the number of objects reclaimed. Clearing marks here means the
/// next mark phase starts from a clean heap without a separate pass.
pub fn sweep(heap: &mut Heap) -> usize {
    let live_before = heap.live_count();

    for index in 0..heap.slot_count() {
        let Some(object) = heap.object_at_mut(index) else {
            continue;
        };
        if object.is_marked() {
            object.clear_mark();
        } else {
            heap.reclaim(index);
        }
    }

    live_before - heap.live_count()
}
