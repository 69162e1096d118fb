use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use guard_conflict::{find_conflicts, to_reserved_payload, DEFAULT_MAX_RESERVED_ITEMS};
use guard_test_utils::{candidate, product_snapshot};

fn bench_find_conflicts(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflicts.find");
    for count in [10usize, 100, 1_000] {
        let active = product_snapshot(count);
        let proposal = candidate("https://shop.test/products/blue-shoe", ".slot-7");

        group.bench_with_input(BenchmarkId::from_parameter(count), &active, |b, active| {
            b.iter(|| find_conflicts(black_box(active), black_box(&proposal)).len());
        });
    }
    group.finish();
}

fn bench_reserved_payload(c: &mut Criterion) {
    let active = product_snapshot(1_000);

    c.bench_function("conflicts.reserved_payload", |b| {
        b.iter(|| {
            to_reserved_payload(
                black_box("/products/blue-shoe"),
                black_box(&active),
                DEFAULT_MAX_RESERVED_ITEMS,
            )
        });
    });
}

criterion_group!(benches, bench_find_conflicts, bench_reserved_payload);
criterion_main!(benches);
