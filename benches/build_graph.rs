use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ethica_explorer::book::{EntrySource, Lang};
use ethica_explorer::graph::DependencyGraph;
use std::collections::BTreeMap;

// Synthetic book: entry i cites up to three earlier entries, spread out the
// way proofs cite earlier material.
fn synthetic_sources(n: usize) -> Vec<EntrySource> {
    (0..n)
        .map(|i| {
            let parents: Vec<String> = [i / 2, i.saturating_sub(1), i / 3]
                .into_iter()
                .filter(|&p| p < i)
                .map(|p| format!("n{p}"))
                .collect();
            let mut text = BTreeMap::new();
            text.insert(Lang::En, format!("entry {i}"));
            EntrySource { id: format!("n{i}"), parents, text }
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");
    for n in [100usize, 500, 2000] {
        let sources = synthetic_sources(n);
        group.bench_function(BenchmarkId::new("from_sources", n), |b| {
            b.iter(|| {
                let g = DependencyGraph::from_sources(black_box(&sources)).expect("acyclic");
                black_box(g.index().count())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
