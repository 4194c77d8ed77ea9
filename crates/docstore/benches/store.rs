use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use docstore::DocumentStore;
use serde_json::json;
use tempfile::TempDir;

fn populate(store: &DocumentStore, rows: usize) {
    let records: Vec<_> = (0..rows)
        .map(|i| json!({"n": i, "name": format!("user{}", i), "active": i % 2 == 0}))
        .collect();
    store.insert_many(serde_json::Value::Array(records)).unwrap();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("find_one_1k", |b| {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path().join("db.json"));
        populate(&store, 1000);

        b.iter(|| {
            black_box(store.find_one(json!({"n": 500})));
        });
    });

    group.bench_function("find_many_1k", |b| {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path().join("db.json"));
        populate(&store, 1000);

        b.iter(|| {
            black_box(store.find_many(json!({"active": true})));
        });
    });
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.sample_size(20);
    group.throughput(Throughput::Elements(1));

    group.bench_function("insert_one_into_100", |b| {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path().join("db.json"));
        populate(&store, 100);

        b.iter(|| {
            black_box(store.insert_one(json!({"name": "bench"})).unwrap());
        });
    });
    group.finish();
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(20);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_find_50_update", |b| {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path().join("db.json"));
        populate(&store, 100);

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(store.find_one(json!({"n": counter % 100})));
            } else {
                black_box(
                    store
                        .update_one(
                            json!({"n": counter % 100}),
                            json!({"$set": {"active": false}}),
                            false,
                        )
                        .ok(),
                );
            }
            counter += 1;
        });
    });
    group.finish();
}

criterion_group!(benches, bench_find, bench_insert, bench_mixed_workload);
criterion_main!(benches);
