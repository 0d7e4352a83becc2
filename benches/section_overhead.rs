/// Section Timing Overhead Benchmarks
///
/// Measures the cost of one enter/exit pair in both aggregation modes,
/// plus nested scopes and the deferred flush.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sectimer::config::ProfilerConfig;
use sectimer::profiler::Profiler;
use sectimer::stats::AggregationMode;

fn bench_enter_exit(c: &mut Criterion) {
    let mut group = c.benchmark_group("enter_exit");
    group.throughput(Throughput::Elements(1));

    for mode in [AggregationMode::Immediate, AggregationMode::Deferred] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{:?}", mode)), &mode, |b, &mode| {
            let mut profiler = Profiler::with_config(ProfilerConfig::default().with_mode(mode));
            b.iter(|| {
                profiler.enter_section(black_box("hot"));
                let _ = profiler.exit_section(black_box("hot"));
                if profiler.stats().pending() > 100_000 {
                    profiler.calculate_stats();
                }
            });
        });
    }

    group.finish();
}

fn bench_nested_scopes(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_scopes");

    for depth in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let mut profiler = Profiler::new();
            b.iter(|| nest(&mut profiler, depth));
        });
    }

    group.finish();
}

fn nest(profiler: &mut Profiler, depth: usize) {
    if depth == 0 {
        return;
    }
    let mut guard = profiler.scope("level");
    nest(&mut guard, depth - 1);
}

fn bench_deferred_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("deferred_flush");
    group.throughput(Throughput::Elements(10_000));

    group.bench_function("flush_10000_intervals", |b| {
        b.iter_batched(
            || {
                let mut profiler = Profiler::with_config(ProfilerConfig::deferred(10_000));
                for i in 0..10_000 {
                    let name = if i % 2 == 0 { "even" } else { "odd" };
                    profiler.enter_section(name);
                    let _ = profiler.exit_section(name);
                }
                profiler
            },
            |mut profiler| black_box(profiler.calculate_stats()),
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_enter_exit, bench_nested_scopes, bench_deferred_flush);
criterion_main!(benches);
