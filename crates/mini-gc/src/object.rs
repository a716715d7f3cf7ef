//! Heap object representation.
//!
//! Every object the VM allocates is either an integer or a pair of two
//! references to other objects. Objects carry a single mark bit used by the
//! collector; ownership always stays with the [`Heap`](crate::heap::Heap).

use std::fmt;

// ============================================================================
// ObjectRef - Handle to a heap slot
// ============================================================================

/// A non-owning handle to an object in the heap.
///
/// A handle is a slot index plus the generation of the slot at the time the
/// object was allocated. When the collector reclaims an object its slot
/// generation is bumped, so a handle that outlives its object never resolves
/// to whatever is allocated into that slot next. A slot whose generation
/// reaches `u32::MAX` is retired instead of reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    index: u32,
    generation: u32,
}

impl ObjectRef {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// ============================================================================
// Payload
// ============================================================================

/// Discriminant of an object's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A boxed integer.
    Int,
    /// A pair of two object references.
    Pair,
}

/// The tagged contents of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// A boxed integer.
    Int(i64),
    /// A pair; `head` and `tail` do not own their targets.
    Pair {
        /// First component.
        head: ObjectRef,
        /// Second component.
        tail: ObjectRef,
    },
}

impl Payload {
    /// Returns the kind of this payload.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        match self {
            Self::Int(_) => ObjectKind::Int,
            Self::Pair { .. } => ObjectKind::Pair,
        }
    }
}

// ============================================================================
// Object
// ============================================================================

/// A heap object: GC bookkeeping plus payload.
#[derive(Debug, Clone)]
pub struct Object {
    marked: bool,
    payload: Payload,
}

impl Object {
    /// Create an unmarked object.
    pub(crate) const fn new(payload: Payload) -> Self {
        Self {
            marked: false,
            payload,
        }
    }

    /// Returns `true` if the current mark phase has reached this object.
    ///
    /// Outside of a collection this is always `false`.
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        self.marked
    }

    /// Set the mark bit, returning `true` if it was previously clear.
    pub(crate) fn try_mark(&mut self) -> bool {
        !std::mem::replace(&mut self.marked, true)
    }

    pub(crate) fn clear_mark(&mut self) {
        self.marked = false;
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    pub(crate) fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    /// Returns the kind of this object.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        self.payload.kind()
    }

    /// Returns the integer value if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self.payload {
            Payload::Int(value) => Some(value),
            Payload::Pair { .. } => None,
        }
    }

    /// Returns `(head, tail)` if this is a `Pair`.
    #[must_use]
    pub const fn as_pair(&self) -> Option<(ObjectRef, ObjectRef)> {
        match self.payload {
            Payload::Pair { head, tail } => Some((head, tail)),
            Payload::Int(_) => None,
        }
    }
}
