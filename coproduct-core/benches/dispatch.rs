use criterion::{black_box, criterion_group, criterion_main, Criterion};
use coproduct_core::{matching, some, Handlers, RecordCodec};
use serde_json::json;

fn bench_case(c: &mut Criterion) {
    c.bench_function("case_option", |b| {
        b.iter(|| {
            matching(some(black_box(1)))
                .case(
                    Handlers::new()
                        .on("some", |v: i32| v + 1)
                        .on_unit("none", || 0),
                )
                .unwrap_or_default()
        })
    });
}

fn bench_record_dispatch(c: &mut Criterion) {
    let codec = RecordCodec::whole_record("type");
    let record = json!({ "type": "d", "d": [1, 2, 3] });

    c.bench_function("whole_record_dispatch", |b| {
        b.iter(|| {
            codec
                .matching(black_box(record.clone()))
                .map(|m| {
                    m.partial(
                        Handlers::new()
                            .on("d", |data: serde_json::Value| {
                                data["d"].as_array().map_or(0, Vec::len)
                            })
                            .otherwise(|| 0),
                    )
                })
        })
    });
}

criterion_group!(benches, bench_case, bench_record_dispatch);
criterion_main!(benches);
