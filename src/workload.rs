//! Demonstration workloads for generating profiling data
//!
//! These exist only to give the section timer something realistic to
//! measure: nested, repeated and recursive sections of varying cost.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::Clock;
use crate::profiler::Profiler;

const DEGREES_TO_RADIANS: f32 = std::f32::consts::PI / 180.0;

/// Which demo workload to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Workload {
    /// Random angle table followed by a cos+sin loop
    Trig,
    /// Insertion sort variants over random integers
    Sort,
    /// Every workload in turn
    All,
}

/// Trig speed test: nested sections with one tiny section per iteration
///
/// Returns the largest `cos + sin` seen so the work is not optimized away.
pub fn trig_speed_test<C: Clock>(profiler: &mut Profiler<C>, entries: usize, rng: &mut StdRng) -> f32 {
    let mut test = profiler.scope("Trig Speed Test");

    test.enter_section("Random Angle Generation");
    let yaw_degrees: Vec<f32> = (0..entries).map(|_| rng.gen_range(0.0..360.0)).collect();
    let _ = test.exit_section_at("Random Angle Generation", crate::call_site!());

    let mut biggest_so_far = 0.0f32;
    test.enter_section("Total Cos and Sin Compute");
    for &yaw in &yaw_degrees {
        test.enter_section("Cos and Sin Compute");
        let radians = yaw * DEGREES_TO_RADIANS;
        let sum = radians.cos() + radians.sin();
        let _ = test.exit_section_at("Cos and Sin Compute", crate::call_site!());
        if sum > biggest_so_far {
            biggest_so_far = sum;
        }
    }
    let _ = test.exit_section_at("Total Cos and Sin Compute", crate::call_site!());

    biggest_so_far
}

/// Classic insertion sort using adjacent swaps
pub fn insertion_sort_swap<T: Ord>(values: &mut [T]) {
    for i in 1..values.len() {
        let mut j = i;
        while j > 0 && values[j - 1] > values[j] {
            values.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Insertion sort that shifts larger elements right, then places the key once
pub fn insertion_sort_shift<T: Ord + Copy>(values: &mut [T]) {
    for i in 1..values.len() {
        let key = values[i];
        let mut j = i;
        while j > 0 && values[j - 1] > key {
            values[j] = values[j - 1];
            j -= 1;
        }
        values[j] = key;
    }
}

/// Insertion sort locating each slot with binary search
pub fn insertion_sort_binary<T: Ord>(values: &mut [T]) {
    for i in 1..values.len() {
        let slot = values[..i].partition_point(|v| v <= &values[i]);
        values[slot..=i].rotate_right(1);
    }
}

/// Recursive insertion sort: sort the prefix, then insert the last element
pub fn insertion_sort_recursive<C: Clock>(profiler: &mut Profiler<C>, values: &mut [i64]) {
    let mut guard = profiler.scope("Recursive Insertion Sort");
    let n = values.len();
    if n <= 1 {
        return;
    }
    insertion_sort_recursive(&mut *guard, &mut values[..n - 1]);

    let key = values[n - 1];
    let mut j = n - 1;
    while j > 0 && values[j - 1] > key {
        values[j] = values[j - 1];
        j -= 1;
    }
    values[j] = key;
}

/// Run every insertion sort variant on copies of the same random input
///
/// Returns `true` if every variant produced the same sorted output.
pub fn sort_speed_test<C: Clock>(profiler: &mut Profiler<C>, elements: usize, rng: &mut StdRng) -> bool {
    let mut test = profiler.scope("Sort Speed Test");

    let input: Vec<i64> = test.time("Random Input Generation", || {
        (0..elements).map(|_| rng.gen_range(-1_000_000..1_000_000)).collect()
    });

    let mut expected = input.clone();
    test.time("std sort_unstable", || expected.sort_unstable());

    let mut swap = input.clone();
    test.time("Insertion Sort (swap)", || insertion_sort_swap(&mut swap));

    let mut shift = input.clone();
    test.time("Insertion Sort (shift)", || insertion_sort_shift(&mut shift));

    let mut binary = input.clone();
    test.time("Insertion Sort (binary search)", || insertion_sort_binary(&mut binary));

    // Recursion depth equals the element count; keep it bounded.
    let mut recursive: Vec<i64> = input.iter().copied().take(RECURSIVE_SORT_LIMIT).collect();
    insertion_sort_recursive(&mut *test, &mut recursive);
    let mut recursive_expected: Vec<i64> = input.iter().copied().take(RECURSIVE_SORT_LIMIT).collect();
    recursive_expected.sort_unstable();

    swap == expected && shift == expected && binary == expected && recursive == recursive_expected
}

/// Largest input handed to [`insertion_sort_recursive`] by the sort test
pub const RECURSIVE_SORT_LIMIT: usize = 256;

/// Deterministic RNG for reproducible workloads
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
