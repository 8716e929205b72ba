//! Candidate generation and the enhance pass over a synthetic catalog.
//!
//! Run with: `cargo bench --bench candidates`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use catalog_patch::catalog::Product;
use catalog_patch::gallery::{enhance_galleries, generate_candidates, CandidateConfig};

fn synthetic_catalog(size: usize) -> Vec<Product> {
    let records: Vec<serde_json::Value> = (0..size)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "name": format!("Herramienta {i}"),
                "imageGallery": [format!("https://cdn.makitatools.com/apps/cms/img/gdt/{i:04x}_p_1500px.png")],
                "detailsUrl": format!("https://www.makitatools.com/products/details/GDT{i:03}Z"),
            })
        })
        .collect();
    serde_json::from_value(serde_json::Value::Array(records)).expect("synthetic catalog")
}

fn bench_candidates(c: &mut Criterion) {
    let config = CandidateConfig::default();
    let gallery = vec!["https://cdn.makitatools.com/apps/cms/img/gdt/abc123_p_1500px.png".to_string()];

    let mut group = c.benchmark_group("candidates");
    group.bench_function("single_product", |b| {
        b.iter(|| {
            generate_candidates(
                black_box(&config),
                black_box(Some("https://www.makitatools.com/products/details/GDT02Z")),
                black_box(&gallery),
            )
        })
    });

    let size = 500usize;
    group.throughput(Throughput::Elements(size as u64));
    group.bench_function("enhance_500_products", |b| {
        b.iter_batched(
            || synthetic_catalog(size),
            |mut products| enhance_galleries(&mut products, &config),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_candidates);
criterion_main!(benches);
