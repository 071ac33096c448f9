use criterion::{criterion_group, criterion_main, Criterion};
use rinq::source::NamedDataSource;
use rinq::types::Value;
use rinq::{select, Filter, Term};

fn make_rows(rows: usize) -> Vec<Value> {
    (0..rows)
        .map(|i| {
            Value::List(vec![
                Value::from(format!("group-{}", i % 4)),
                Value::from(i),
                Value::F64((i % 10) as f64),
            ])
        })
        .collect()
}

fn bench_filter_project_count(c: &mut Criterion) {
    let src = NamedDataSource::with_columns(make_rows(4096), ["group", "order", "value"]);
    let query = select([Term::col("order"), Term::col("value"), Term::count("value")])
        .from(src)
        .filter(Filter::new(|r| *r.get("value") > 4.0))
        .build()
        .unwrap();
    c.bench_function("filter_project_count", |b| {
        b.iter(|| {
            let _ = query.exec().unwrap();
        })
    });
}

fn bench_wildcard(c: &mut Criterion) {
    let query = select(["*"]).from(make_rows(4096)).build().unwrap();
    c.bench_function("wildcard", |b| {
        b.iter(|| {
            let _ = query.exec().unwrap();
        })
    });
}

criterion_group!(queries, bench_filter_project_count, bench_wildcard);
criterion_main!(queries);
