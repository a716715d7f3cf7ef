//! Workload demo
//!
//! Runs the four small collection scenarios, then the push/pop and pair
//! workloads with a random seed, printing a summary of every collection.
//!
//! ```text
//! cargo run --example workload [SEED]
//! cargo run --example workload --features tracing [SEED]
//! ```

use mini_gc::{GcMetrics, Vm, DEFAULT_STACK_MAX};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const ROUNDS: usize = 1_000;

fn report(name: &str, metrics: &GcMetrics) {
    println!(
        "{name}: {:?} live {} -> {} (reclaimed {}, threshold {}) in {:?}",
        metrics.trigger,
        metrics.live_before,
        metrics.live_after,
        metrics.objects_reclaimed,
        metrics.threshold_after,
        metrics.duration,
    );
}

fn check(name: &str, vm: &Vm, expected: usize) {
    assert_eq!(vm.live_count(), expected, "{name}: unexpected live count");
    println!("{name}: ok, {expected} live");
}

fn preserved_on_stack() {
    let mut vm = Vm::new();
    vm.push_int(1);
    vm.push_int(2);
    report("preserved", &vm.collect());
    check("preserved", &vm, 2);
    vm.teardown();
}

fn collected_when_popped() {
    let mut vm = Vm::new();
    vm.push_int(1);
    vm.push_int(2);
    vm.pop();
    vm.pop();
    report("popped", &vm.collect());
    check("popped", &vm, 0);
    vm.teardown();
}

fn nested_pairs() {
    let mut vm = Vm::new();
    vm.push_int(1);
    vm.push_int(2);
    vm.push_pair();
    vm.push_int(3);
    vm.push_int(4);
    vm.push_pair();
    vm.push_pair();
    report("nested", &vm.collect());
    check("nested", &vm, 7);
    vm.teardown();
}

fn unreachable_cycle() {
    let mut vm = Vm::new();
    vm.push_int(1);
    vm.push_int(2);
    let a = vm.push_pair();
    vm.push_int(3);
    vm.push_int(4);
    let b = vm.push_pair();
    vm.set_tail(a, b);
    vm.set_tail(b, a);
    vm.pop();
    vm.pop();
    report("cycle", &vm.collect());
    check("cycle", &vm, 0);
    vm.teardown();
}

fn push_pop_workload(rng: &mut StdRng) -> Vm {
    let mut vm = Vm::new();
    for i in 0..ROUNDS {
        let round = rng.gen_range(1..=DEFAULT_STACK_MAX);
        for j in 0..round {
            #[allow(clippy::cast_possible_wrap)]
            vm.push_int((i + j) as i64);
        }
        for _ in 0..round {
            vm.pop();
        }
    }
    vm
}

fn pair_workload(rng: &mut StdRng) -> Vm {
    let mut vm = Vm::new();
    for i in 0..ROUNDS {
        let round = rng.gen_range(1..=DEFAULT_STACK_MAX);
        let mut popped = 0;
        for j in 0..round {
            #[allow(clippy::cast_possible_wrap)]
            vm.push_int((i + j) as i64);
            if j % 2 == 1 {
                vm.push_pair();
                popped += 1;
            }
        }
        for _ in 0..round - popped {
            vm.pop();
        }
    }
    vm
}

fn summarize(name: &str, vm: Vm, elapsed: std::time::Duration) {
    let stats = *vm.stats();
    println!(
        "{name}: {} collections ({} automatic), {} reclaimed, pause {:?} total / {:?} avg, {:?} elapsed",
        stats.collections,
        stats.automatic_collections,
        stats.objects_reclaimed,
        stats.total_pause,
        vm.history().average_pause(),
        elapsed,
    );
    for metrics in vm.history().iter().rev().take(3) {
        report(name, metrics);
    }
    report(name, &vm.teardown());
}

fn seed() -> u64 {
    std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs())
        })
}

fn main() {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    preserved_on_stack();
    collected_when_popped();
    nested_pairs();
    unreachable_cycle();

    let seed = seed();
    println!("seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let start = Instant::now();
    let vm = push_pop_workload(&mut rng);
    summarize("push_pop", vm, start.elapsed());

    let start = Instant::now();
    let vm = pair_workload(&mut rng);
    summarize("pairs", vm, start.elapsed());
}
