//! 미분류 에러 클러스터링 벤치마크
//!
//! 메시지 수와 클러스터 수에 따른 TF-IDF + k-means 소요 시간을 측정합니다.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use loglens_analyzer::{ClusterConfig, UnknownErrorClusterer};

const TEMPLATES: &[&str] = &[
    "NullPointerException in OrderHandler line",
    "ClassCastException casting Invoice to Receipt",
    "IllegalStateException session bean passivated",
    "socket reset by peer while reading payload",
    "unexpected token in JSON payload at offset",
];

fn messages(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{} {}", TEMPLATES[i % TEMPLATES.len()], i))
        .collect()
}

fn bench_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("unknown_error_cluster");
    group.sample_size(20);

    for (count, k) in [(50usize, 2usize), (500, 2), (500, 5), (2000, 5)] {
        let clusterer = UnknownErrorClusterer::new(ClusterConfig {
            n_clusters: k,
            ..ClusterConfig::default()
        })
        .unwrap();
        let input = messages(count);
        group.bench_with_input(
            BenchmarkId::new(format!("k{k}"), count),
            &input,
            |b, input| b.iter(|| clusterer.cluster(black_box(input))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_cluster);
criterion_main!(benches);
