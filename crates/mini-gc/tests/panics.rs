//! Contract violations by the mutator must fail fast.

use mini_gc::{Vm, VmConfig};

#[test]
#[should_panic(expected = "stack overflow")]
fn test_push_int_overflow() {
    let mut vm = Vm::with_config(VmConfig::default().with_stack_max(2));
    vm.push_int(1);
    vm.push_int(2);
    vm.push_int(3);
}

#[test]
fn test_overflow_does_not_allocate() {
    let mut vm = Vm::with_config(VmConfig::default().with_stack_max(1));
    vm.push_int(1);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        vm.push_int(2);
    }));
    assert!(result.is_err());
    assert_eq!(vm.live_count(), 1);
    assert_eq!(vm.depth(), 1);
}

#[test]
#[should_panic(expected = "stack overflow")]
fn test_push_existing_overflow() {
    let mut vm = Vm::with_config(VmConfig::default().with_stack_max(1));
    let one = vm.push_int(1);
    vm.push(one);
}

#[test]
#[should_panic(expected = "stack underflow")]
fn test_pop_empty() {
    let mut vm = Vm::new();
    vm.pop();
}

#[test]
#[should_panic(expected = "stack underflow")]
fn test_push_pair_with_one_operand() {
    let mut vm = Vm::new();
    vm.push_int(1);
    vm.push_pair();
}

#[test]
fn test_push_pair_underflow_leaves_stack_intact() {
    let mut vm = Vm::new();
    let one = vm.push_int(1);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        vm.push_pair();
    }));
    assert!(result.is_err());
    assert_eq!(vm.depth(), 1);
    assert_eq!(vm.peek(0), Some(one));
    assert_eq!(vm.live_count(), 1);
}

#[test]
#[should_panic(expected = "dangling object reference")]
fn test_set_tail_to_reclaimed_object() {
    let mut vm = Vm::new();
    let stale = vm.push_int(0);
    vm.pop();
    vm.collect();

    vm.push_int(1);
    vm.push_int(2);
    let pair = vm.push_pair();
    vm.set_tail(pair, stale);
}

#[test]
#[should_panic(expected = "initial_threshold must be non-zero")]
fn test_zero_threshold_config() {
    let _ = Vm::with_config(VmConfig::default().with_initial_threshold(0));
}

#[test]
#[should_panic(expected = "stack_max must be non-zero")]
fn test_zero_stack_config() {
    let _ = Vm::with_config(VmConfig::default().with_stack_max(0));
}
