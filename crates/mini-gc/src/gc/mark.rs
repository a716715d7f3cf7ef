//! Mark phase.

use crate::heap::Heap;
use crate::object::ObjectRef;

/// Mark every object reachable from `roots`, returning how many were marked.
///
/// Uses an explicit worklist instead of recursion, so deep pair chains do
/// not grow the native stack. An already-marked object is never expanded
/// again, which is what makes marking terminate on cyclic graphs.
pub fn mark_from_roots<I>(heap: &mut Heap, roots: I, worklist: &mut Vec<ObjectRef>) -> usize
where
    I: IntoIterator<Item = ObjectRef>,
{
    debug_assert!(worklist.is_empty());
    let mut marked = 0;

    for root in roots {
        worklist.push(root);

        while let Some(handle) = worklist.pop() {
            // Handles are validated before entering the root stack or a pair.
            let Some(object) = heap.get_mut(handle) else {
                continue;
            };
            if !object.try_mark() {
                continue;
            }
            marked += 1;

            if let Some((head, tail)) = object.as_pair() {
                // Pushed in reverse so `head` is visited first.
                worklist.push(tail);
                worklist.push(head);
            }
        }
    }

    marked
}
