use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use flatdb::{Database, JsonStorage, Value};
use tempfile::TempDir;

fn populated_db(n: usize) -> (TempDir, Database<JsonStorage>) {
    let dir = tempfile::tempdir().unwrap();
    let mut db = Database::open(JsonStorage::new(dir.path())).unwrap();

    db.create_table(
        "users",
        &[
            "name:str".to_string(),
            "age:int".to_string(),
            "active:bool".to_string(),
        ],
    )
    .unwrap();

    for i in 0..n {
        db.insert(
            "users",
            &[
                Value::Str(format!("user{i}")),
                Value::Int((i % 100) as i64),
                Value::Bool(i % 2 == 0),
            ],
        )
        .unwrap();
    }
    (dir, db)
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert_Pipeline");
    group.bench_function("insert_single_record", |b| {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(JsonStorage::new(dir.path())).unwrap();
        db.create_table("tests", &["n:int".to_string()]).unwrap();
        b.iter(|| {
            db.insert("tests", &[Value::Int(black_box(42))]).unwrap();
        });
    });
    group.finish();
}

fn bench_select_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Select_Where_Performance");

    for n in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("cold_cache", n), n, |b, &n| {
            let (dir, _db) = populated_db(n);
            let storage = JsonStorage::new(dir.path());
            b.iter_with_setup(
                || Database::open(storage.clone()).unwrap(),
                |mut db| {
                    let res = db.select("users", Some("age = 42")).unwrap();
                    black_box(res);
                },
            );
        });

        group.bench_with_input(BenchmarkId::new("warm_cache", n), n, |b, &n| {
            let (_dir, mut db) = populated_db(n);
            b.iter(|| {
                let res = db.select("users", Some("age = 42")).unwrap();
                black_box(res);
            });
        });
    }
    group.finish();
}

fn bench_update_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Update_Performance");

    for n in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let (_dir, mut db) = populated_db(n);
            b.iter(|| {
                db.update("users", "age = 99", "active = true").unwrap();
                black_box(&db);
            });
        });
    }
    group.finish();
}

fn bench_delete_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Delete_Performance");

    for n in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter_with_setup(
                || populated_db(n),
                |(_dir, mut db)| {
                    db.delete("users", "active = true").unwrap();
                    black_box(db);
                },
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_select_scaling,
    bench_update_performance,
    bench_delete_performance
);
criterion_main!(benches);
