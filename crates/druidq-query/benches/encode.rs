//! Encoding benchmarks

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use druidq_query::{
    encoder, Aggregator, ArithmeticFunction, Dimension, Filter, GroupByQuery, Interval, LimitSpec,
    OrderByColumnSpec, PostAggregator, PredefinedGranularity,
};

fn build_query() -> GroupByQuery {
    let filter = Filter::and(vec![
        Filter::selector("carrier", "AT&T").unwrap(),
        Filter::or(vec![
            Filter::selector("make", "Apple").unwrap(),
            Filter::selector("make", "Samsung").unwrap(),
        ])
        .unwrap(),
    ])
    .unwrap();

    GroupByQuery::builder()
        .data_source("sample_datasource")
        .granularity(PredefinedGranularity::Day)
        .dimension(Dimension::simple("country").unwrap())
        .dimension(Dimension::simple("device").unwrap())
        .limit_spec(LimitSpec::new(5000, vec![OrderByColumnSpec::column("country").unwrap()]).unwrap())
        .filter(filter)
        .aggregator(Aggregator::long_sum("total_usage", "user_count").unwrap())
        .aggregator(Aggregator::double_sum("data_transfer", "data_transfer").unwrap())
        .post_aggregator(
            PostAggregator::arithmetic(
                "avg_usage",
                ArithmeticFunction::Divide,
                vec![
                    PostAggregator::field_access("data_transfer").unwrap(),
                    PostAggregator::field_access("total_usage").unwrap(),
                ],
            )
            .unwrap(),
        )
        .interval(
            Interval::new(
                Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2012, 1, 3, 0, 0, 0).unwrap(),
            )
            .unwrap(),
        )
        .build()
        .unwrap()
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_group_by", |b| {
        b.iter(|| black_box(build_query()));
    });
}

fn bench_encode(c: &mut Criterion) {
    let query = build_query();
    c.bench_function("encode_group_by", |b| {
        b.iter(|| encoder::to_string(black_box(&query)).unwrap());
    });
}

criterion_group!(benches, bench_build, bench_encode);
criterion_main!(benches);
