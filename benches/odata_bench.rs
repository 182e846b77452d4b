use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use odata_filter::model::{EntityDef, FieldType, ModelRegistry};
use odata_filter::{build_query, segment, QueryParams};
use sea_query::PostgresQueryBuilder;

fn create_registry() -> ModelRegistry {
    ModelRegistry::with_entities([
        (
            "User",
            EntityDef::new("users")
                .field("id", FieldType::Integer)
                .field("username", FieldType::String)
                .field("is_active", FieldType::Boolean)
                .field("logins", FieldType::Integer)
                .field("note", FieldType::String)
                .field("created", FieldType::DateTime)
                .belongs_to("supervisor", "User", "supervisor_id")
                .many_to_many("roles", "Role", "user_roles", "user_id", "role_id"),
        ),
        (
            "Role",
            EntityDef::new("roles")
                .field("id", FieldType::Integer)
                .field("name", FieldType::String),
        ),
    ])
}

const TEST_CASES: &[(&str, &str)] = &[
    ("simple", "logins ge 51"),
    (
        "medium",
        "isActive eq false or (startswith(username,'od') and id eq 4)",
    ),
    (
        "complex",
        "(username eq 'user2' and logins eq 100 and isActive eq false) or \
         (logins gt 1 and username eq 'user3') or contains(note,'backup') or \
         (logins gt 1000 and supervisor/username eq 'user1' and roles/name eq 'admin')",
    ),
];

fn benchmark_segmenter(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmenter_performance");

    for (name, filter) in TEST_CASES {
        group.bench_with_input(BenchmarkId::new("segment", name), filter, |b, &filter| {
            b.iter(|| {
                let segments = segment::parse(black_box(filter)).expect("segmenting should succeed");
                black_box(segments)
            })
        });
    }

    group.finish();
}

fn benchmark_build_query(c: &mut Criterion) {
    let registry = create_registry();
    let mut group = c.benchmark_group("build_query_performance");

    for (name, filter) in TEST_CASES {
        let params = QueryParams {
            filter: Some(filter.to_string()),
            orderby: Some("created desc".to_string()),
        };
        group.bench_with_input(BenchmarkId::new("build", name), &params, |b, params| {
            b.iter(|| {
                let query = build_query(&registry, "User", black_box(params), None)
                    .expect("query building should succeed");
                black_box(query)
            })
        });
    }

    group.finish();
}

fn benchmark_end_to_end(c: &mut Criterion) {
    let registry = create_registry();
    let mut group = c.benchmark_group("end_to_end_performance");

    for (name, filter) in TEST_CASES {
        group.bench_with_input(BenchmarkId::new("to_sql", name), filter, |b, &filter| {
            b.iter(|| {
                let params = QueryParams::filter(black_box(filter));
                let query = build_query(&registry, "User", &params, Some("id"))
                    .expect("query building should succeed");
                black_box(query.to_sql(PostgresQueryBuilder))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_segmenter,
    benchmark_build_query,
    benchmark_end_to_end
);
criterion_main!(benches);
