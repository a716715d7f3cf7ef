//! Property-based tests for the collector.
//!
//! Random mutator programs are run against a small VM. After every
//! collection the live set must be exactly the set of objects reachable from
//! the root stack, computed here independently of the collector.

use std::collections::HashSet;

use mini_gc::{next_threshold, ObjectRef, Vm, VmConfig};
use proptest::prelude::*;

const STACK_MAX: usize = 24;
const FLOOR: usize = 4;

// ============================================================================
// Helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    PushInt(i64),
    PushPair,
    Pop,
    Collect,
    /// Point the tail of the pair at stack distance `.0` to the value at `.1`.
    SetTail(usize, usize),
    /// Point the head of the pair at stack distance `.0` to the value at `.1`.
    SetHead(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i64>().prop_map(Op::PushInt),
        3 => Just(Op::PushPair),
        2 => Just(Op::Pop),
        1 => Just(Op::Collect),
        1 => (0..STACK_MAX, 0..STACK_MAX).prop_map(|(a, b)| Op::SetTail(a, b)),
        1 => (0..STACK_MAX, 0..STACK_MAX).prop_map(|(a, b)| Op::SetHead(a, b)),
    ]
}

/// Objects reachable from the root stack, by plain graph search.
fn reachable(vm: &Vm) -> HashSet<ObjectRef> {
    let mut seen = HashSet::new();
    let mut pending: Vec<ObjectRef> = vm.roots().iter().collect();
    while let Some(obj) = pending.pop() {
        if !seen.insert(obj) {
            continue;
        }
        let object = vm.get(obj).expect("reachable object was reclaimed");
        if let Some((head, tail)) = object.as_pair() {
            pending.push(head);
            pending.push(tail);
        }
    }
    seen
}

fn is_pair(vm: &Vm, obj: ObjectRef) -> bool {
    vm.get(obj).and_then(|o| o.as_pair()).is_some()
}

/// Apply `op` if it is valid in the current state.
fn apply(vm: &mut Vm, op: &Op) {
    match *op {
        Op::PushInt(value) => {
            if vm.depth() < STACK_MAX {
                vm.push_int(value);
            }
        }
        Op::PushPair => {
            if vm.depth() >= 2 {
                vm.push_pair();
            }
        }
        Op::Pop => {
            if vm.depth() > 0 {
                vm.pop();
            }
        }
        Op::Collect => {
            vm.collect();
        }
        Op::SetTail(a, b) | Op::SetHead(a, b) => {
            let (Some(pair), Some(value)) = (vm.peek(a), vm.peek(b)) else {
                return;
            };
            if !is_pair(vm, pair) {
                return;
            }
            if matches!(op, Op::SetTail(..)) {
                vm.set_tail(pair, value);
            } else {
                vm.set_head(pair, value);
            }
        }
    }
}

fn new_vm() -> Vm {
    Vm::with_config(
        VmConfig::default()
            .with_stack_max(STACK_MAX)
            .with_initial_threshold(FLOOR),
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn live_set_equals_reachable_set(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut vm = new_vm();
        for op in &ops {
            apply(&mut vm, op);
            if matches!(op, Op::Collect) {
                let live: HashSet<ObjectRef> = vm.heap().iter().map(|(h, _)| h).collect();
                prop_assert_eq!(live, reachable(&vm));
            }
        }

        vm.collect();
        let expected = reachable(&vm);
        prop_assert_eq!(vm.live_count(), expected.len());
        prop_assert!(vm.heap().iter().all(|(h, o)| expected.contains(&h) && !o.is_marked()));
    }

    #[test]
    fn roots_always_resolve(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut vm = new_vm();
        for op in &ops {
            apply(&mut vm, op);
            for root in vm.roots().iter() {
                prop_assert!(vm.get(root).is_some());
            }
            prop_assert!(vm.live_count() <= vm.threshold());
        }
    }

    #[test]
    fn threshold_tracks_live_count(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut vm = new_vm();
        for op in &ops {
            apply(&mut vm, op);
        }
        let metrics = vm.collect();
        if metrics.was_noop() {
            // The heap can only be empty if it never held anything or a
            // collection emptied it, and both leave the floor in place.
            prop_assert_eq!(vm.threshold(), FLOOR);
        } else {
            prop_assert_eq!(vm.threshold(), next_threshold(vm.live_count(), FLOOR));
        }
        prop_assert!(vm.threshold() >= FLOOR);
    }

    #[test]
    fn second_collection_reclaims_nothing(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut vm = new_vm();
        for op in &ops {
            apply(&mut vm, op);
        }
        vm.collect();
        let live = vm.live_count();
        let second = vm.collect();
        prop_assert_eq!(second.objects_reclaimed, 0);
        prop_assert_eq!(vm.live_count(), live);
    }

    #[test]
    fn teardown_always_empties(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut vm = new_vm();
        for op in &ops {
            apply(&mut vm, op);
        }
        let metrics = vm.teardown();
        prop_assert_eq!(metrics.live_after, 0);
        prop_assert_eq!(metrics.objects_reclaimed, metrics.live_before);
    }
}
