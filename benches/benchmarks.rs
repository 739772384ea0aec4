use axum::http::Method;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use json_items::{dispatch, next_id, FileStore, Items, Record, RecordStore, Request};
use serde_json::json;
use std::hint::black_box;
use std::path::PathBuf;
use std::time::Duration;

fn bench_path(name: &str, size: usize) -> PathBuf {
    std::env::temp_dir().join(format!("json_items_bench_{}_{}.json", name, size))
}

fn seed(size: usize) -> Vec<Record> {
    (1..=size)
        .map(|i| {
            json!({"id": i, "name": format!("item{i}"), "qty": i % 7})
                .as_object()
                .cloned()
                .unwrap_or_default()
        })
        .collect()
}

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");
    group.sample_size(50);
    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("file", size), &size, |b, &size| {
            let path = bench_path("create", size);
            let _ = std::fs::remove_file(&path);
            let store = FileStore::open(&path).unwrap();
            let items = Items::new(store);
            b.iter_batched(
                || items.store().save(&seed(size)).unwrap(),
                |_| {
                    let req = Request::new(Method::POST, "/items", r#"{"name":"new"}"#);
                    black_box(dispatch(&items, &req));
                },
                criterion::BatchSize::SmallInput,
            );
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    for size in [100, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::new("file", size), &size, |b, &size| {
            let path = bench_path("read", size);
            let _ = std::fs::remove_file(&path);
            let items = Items::new(FileStore::open(&path).unwrap());
            items.store().save(&seed(size)).unwrap();
            let req = Request::new(Method::GET, "/items", "");
            b.iter(|| black_box(dispatch(&items, &req)));
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(8));
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("file", size), &size, |b, &size| {
            let path = bench_path("update", size);
            let _ = std::fs::remove_file(&path);
            let items = Items::new(FileStore::open(&path).unwrap());
            items.store().save(&seed(size)).unwrap();
            let body = format!(r#"{{"id":{},"name":"renamed"}}"#, size / 2);
            let req = Request::new(Method::PUT, "/items", body);
            b.iter(|| black_box(dispatch(&items, &req)));
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_next_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_id");
    for size in [100, 10_000] {
        let records = seed(size);
        group.bench_with_input(BenchmarkId::new("scan", size), &records, |b, records| {
            b.iter(|| black_box(next_id(records)));
        });
    }
}

criterion_group!(benches, bench_create, bench_read, bench_update, bench_next_id);
criterion_main!(benches);
