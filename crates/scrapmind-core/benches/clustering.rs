use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scrapmind_core::{ClusterEngine, ScrapDocument, ScrapKind};

const TOPICS: [&str; 4] = [
    "rust compiler borrow checker ownership trait lifetime",
    "sourdough flour starter hydration crumb proofing",
    "telescope nebula galaxy aperture eyepiece tracking",
    "watercolor pigment brush paper wash glazing",
];

fn corpus(size: usize) -> Vec<ScrapDocument> {
    (0..size)
        .map(|i| {
            let topic = TOPICS[i % TOPICS.len()];
            ScrapDocument::new(
                format!("scrap-{}", i),
                format!("{} entry number {}", topic, i),
                ScrapKind::Note,
            )
        })
        .collect()
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild_clusters");
    for size in [20usize, 60, 120] {
        let scraps = corpus(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &scraps, |b, scraps| {
            b.iter(|| {
                let mut engine = ClusterEngine::with_seed(42);
                engine.rebuild_clusters(scraps).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_assignment(c: &mut Criterion) {
    let scraps = corpus(60);
    let mut engine = ClusterEngine::with_seed(42);
    let result = engine.rebuild_clusters(&scraps).unwrap();
    let newcomer = ScrapDocument::new(
        "newcomer",
        "rust trait lifetime borrow notes",
        ScrapKind::Note,
    );

    c.bench_function("assign_to_cluster", |b| {
        b.iter(|| engine.assign_to_cluster(&newcomer, &result.clusters));
    });
}

fn bench_similarity(c: &mut Criterion) {
    let scraps = corpus(120);
    let mut engine = ClusterEngine::with_seed(42);
    engine.rebuild_clusters(&scraps).unwrap();

    c.bench_function("similar_scraps", |b| {
        b.iter(|| engine.similar_scraps("scrap-0", 5));
    });
}

criterion_group!(benches, bench_rebuild, bench_assignment, bench_similarity);
criterion_main!(benches);
