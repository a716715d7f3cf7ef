//! Root tracking using a bounded operand stack.
//!
//! The VM's operand stack is the only source of roots: anything the
//! collector cannot reach from an entry on this stack is garbage.

use crate::object::ObjectRef;

// ============================================================================
// RootStack
// ============================================================================

/// A fixed-capacity stack of GC roots.
///
/// Overflow and underflow are mutator bugs and panic immediately.
#[derive(Debug, Clone)]
pub struct RootStack {
    roots: Vec<ObjectRef>,
    capacity: usize,
}

impl RootStack {
    /// Create an empty stack holding at most `capacity` roots.
    ///
    /// Storage grows as roots are pushed, so `capacity` is only a bound.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            roots: Vec::new(),
            capacity,
        }
    }

    /// Push a root.
    ///
    /// # Panics
    ///
    /// Panics with `"stack overflow"` if the stack is full.
    pub fn push(&mut self, root: ObjectRef) {
        assert!(self.roots.len() < self.capacity, "stack overflow");
        self.roots.push(root);
    }

    /// Pop the most recently pushed root.
    ///
    /// # Panics
    ///
    /// Panics with `"stack underflow"` if the stack is empty.
    pub fn pop(&mut self) -> ObjectRef {
        self.roots.pop().expect("stack underflow")
    }

    /// Returns the root `distance` entries below the top, without popping.
    /// `peek(0)` is the top of the stack.
    #[must_use]
    pub fn peek(&self, distance: usize) -> Option<ObjectRef> {
        let len = self.roots.len();
        distance
            .checked_add(1)
            .and_then(|n| len.checked_sub(n))
            .map(|i| self.roots[i])
    }

    /// Number of roots on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.roots.len()
    }

    /// Check if there are no roots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns `true` if another push would overflow.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.roots.len() >= self.capacity
    }

    /// Maximum number of roots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over all roots, bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = ObjectRef> + '_ {
        self.roots.iter().copied()
    }

    /// Clear all roots.
    pub fn clear(&mut self) {
        self.roots.clear();
    }
}
