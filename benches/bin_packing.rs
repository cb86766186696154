use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeMap;
use std::hint::black_box;
use treecut::packing::Packing;

fn bench_pack_perfect(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_perfect");

    for &distinct_sizes in &[4usize, 8, 16] {
        let mut components = BTreeMap::new();
        for i in 0..distinct_sizes {
            components.insert((i as u64 + 1) * 2, 3u64);
        }
        let capacity: u64 = components.iter().map(|(s, c)| s * c).sum::<u64>() / distinct_sizes as u64;

        group.bench_with_input(
            BenchmarkId::new("pack_perfect", distinct_sizes),
            &components,
            |b, components| {
                b.iter(|| {
                    let mut packing = Packing::new(capacity, capacity);
                    let _ = packing.pack_perfect(black_box(components), 64);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pack_perfect);
criterion_main!(benches);
