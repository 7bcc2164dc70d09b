use criterion::{black_box, criterion_group, criterion_main, Criterion};
use video_guides::{Catalog, VideoRecord};

const CATEGORIES: [&str; 5] = ["Drill", "First Aid", "Navigation", "Fieldcraft", "Weapons"];

fn synthetic_catalog(size: usize) -> Catalog {
    let videos = (0..size)
        .map(|i| VideoRecord {
            id: format!("video_{}", i),
            title: format!("Lesson {} {}", i, CATEGORIES[i % CATEGORIES.len()]),
            url: format!("https://example.com/{}.mp4", i),
            description: "Step by step instruction for cadets and instructors".to_string(),
            duration: "05:30".to_string(),
            category: CATEGORIES[i % CATEGORIES.len()].to_string(),
            thumbnail: String::new(),
            tags: vec!["training".to_string(), format!("tag{}", i % 50)],
        })
        .collect();

    Catalog::new(videos, "1.0")
}

/// Benchmark category-only filtering
fn bench_filter_category(c: &mut Criterion) {
    let catalog = synthetic_catalog(10_000);

    c.bench_function("filter_category", |b| {
        b.iter(|| catalog.filter(black_box("Navigation"), black_box("")).len())
    });
}

/// Benchmark free-text search across title, description and tags
fn bench_filter_query(c: &mut Criterion) {
    let catalog = synthetic_catalog(10_000);

    c.bench_function("filter_query", |b| {
        b.iter(|| catalog.filter(black_box("All"), black_box("TAG42")).len())
    });
}

criterion_group!(benches, bench_filter_category, bench_filter_query);
criterion_main!(benches);
