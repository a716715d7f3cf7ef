//! A mark-sweep garbage collector for a toy stack VM.
//!
//! `mini-gc` manages a heap of two kinds of objects, integers and pairs,
//! reachable from a bounded operand stack. When the number of live objects
//! reaches a threshold, the next allocation first runs a full mark-sweep
//! collection; the threshold then resets to twice the surviving live count.
//!
//! # Quick Start
//!
//! ```
//! use mini_gc::Vm;
//!
//! let mut vm = Vm::new();
//! vm.push_int(1);
//! vm.push_int(2);
//! let pair = vm.push_pair();
//!
//! vm.collect();
//! assert_eq!(vm.live_count(), 3);
//! assert!(vm.get(pair).is_some());
//!
//! vm.pop();
//! vm.collect();
//! assert_eq!(vm.live_count(), 0);
//! assert!(vm.get(pair).is_none());
//! ```
//!
//! # Handling Cycles
//!
//! ```
//! use mini_gc::Vm;
//!
//! let mut vm = Vm::new();
//! vm.push_int(1);
//! vm.push_int(2);
//! let a = vm.push_pair();
//! vm.push_int(3);
//! vm.push_int(4);
//! let b = vm.push_pair();
//!
//! // Create cycle: a -> b -> a
//! vm.set_tail(a, b);
//! vm.set_tail(b, a);
//!
//! vm.pop();
//! vm.pop();
//! vm.collect(); // Cycle is unreachable and freed
//! assert_eq!(vm.live_count(), 0);
//! ```
//!
//! # Features
//!
//! - `tracing`: emit `tracing` spans for each collection and phase, and a
//!   debug event with the live counts before and after.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod gc;
mod metrics;
mod object;
mod roots;
mod tracing;
mod vm;

/// Read-only view of the object pool.
///
/// A [`heap::Heap`] is only reachable through [`Vm::heap`]; allocation and
/// reclamation stay with the VM and its collector.
pub mod heap;

// Re-export public API
pub use config::{VmConfig, DEFAULT_INITIAL_THRESHOLD, DEFAULT_STACK_MAX};
pub use gc::next_threshold;
pub use metrics::{CollectionTrigger, GcHistory, GcMetrics, GcStats, HISTORY_SIZE};
pub use object::{Object, ObjectKind, ObjectRef, Payload};
pub use roots::RootStack;
#[cfg(feature = "tracing")]
pub use self::tracing::GcId;
pub use vm::Vm;
