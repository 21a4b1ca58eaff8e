use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use chrono::Utc;
use procura_api::auth::{AuthConfig, AuthService};
use procura_api::entities::user;
use procura_api::money;
use procura_api::sequence::DocumentKind;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

// Benchmark for deriving document totals from line items
fn document_total_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_total");

    for size in [1, 5, 10, 20, 50].iter() {
        let items: Vec<(i32, Decimal)> = (0..*size)
            .map(|i| (i + 1, Decimal::new(995 + i as i64 * 25, 2)))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| {
                let total = money::items_total(black_box(items.iter().copied()));
                black_box(total)
            });
        });
    }

    group.finish();
}

// Benchmark for a single line extension
fn line_total_benchmark(c: &mut Criterion) {
    c.bench_function("line_total", |b| {
        b.iter(|| {
            let total = money::line_total(black_box(7), black_box(Decimal::new(1999, 2)));
            black_box(total)
        });
    });
}

// Benchmark for display number formatting
fn display_number_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("display_number");

    for kind in [
        DocumentKind::PurchaseRequest,
        DocumentKind::Rfq,
        DocumentKind::PurchaseOrder,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(kind.prefix()),
            &kind,
            |b, kind| {
                b.iter(|| {
                    let formatted = kind.format(black_box(123_456));
                    black_box(formatted)
                });
            },
        );
    }

    group.finish();
}

// Benchmark for the response envelope round trip
fn json_serialization_benchmark(c: &mut Criterion) {
    use serde_json::json;

    let data = json!({
        "id": "PR000042",
        "requester_id": "123e4567-e89b-12d3-a456-426614174000",
        "status": "draft",
        "purpose": "Restock the assembly line",
        "items": [
            {"product_id": "550e8400-e29b-41d4-a716-446655440000", "quantity": 3, "estimated_unit_price": "10.00", "line_total": "30.00"},
            {"product_id": "550e8400-e29b-41d4-a716-446655440001", "quantity": 2, "estimated_unit_price": "5.00", "line_total": "10.00"}
        ],
        "total": "40.00"
    });

    c.bench_function("json_serialize", |b| {
        b.iter(|| {
            let serialized = serde_json::to_string(&data).unwrap();
            black_box(serialized)
        });
    });

    c.bench_function("json_deserialize", |b| {
        let serialized = serde_json::to_string(&data).unwrap();
        b.iter(|| {
            let deserialized: serde_json::Value = serde_json::from_str(&serialized).unwrap();
            black_box(deserialized)
        });
    });
}

// Benchmark for minting verification tokens
fn verification_token_benchmark(c: &mut Criterion) {
    let auth = AuthService::new(
        AuthConfig {
            jwt_secret: "benchmark-signing-key-benchmark-signing-key-0123456789abcdef".to_string(),
            jwt_audience: "procura-api".to_string(),
            jwt_issuer: "procura-auth".to_string(),
            access_token_expiration: Duration::from_secs(3600),
            refresh_token_expiration: Duration::from_secs(86_400),
            verification_token_expiration: Duration::from_secs(86_400),
        },
        Arc::new(sea_orm::DatabaseConnection::Disconnected),
    );
    let now = Utc::now();
    let account = user::Model {
        id: Uuid::new_v4(),
        name: "Benchmark User".to_string(),
        email: "bench@example.test".to_string(),
        password_hash: String::new(),
        email_verified: true,
        active: true,
        created_at: now,
        updated_at: now,
    };

    c.bench_function("verification_token", |b| {
        b.iter(|| {
            let token = auth.generate_verification_token(black_box(&account)).unwrap();
            black_box(token)
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets =
        document_total_benchmark,
        line_total_benchmark,
        display_number_benchmark,
        json_serialization_benchmark,
        verification_token_benchmark
}

criterion_main!(benches);
