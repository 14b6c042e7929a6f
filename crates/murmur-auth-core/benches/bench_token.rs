//! Benchmarks for session token hot paths

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use murmur_auth_core::{extract_bearer, AllowList, SessionTokenService, SigningSecret};

fn service_with_list_size(size: usize) -> SessionTokenService {
    let emails = (0..size).map(|i| format!("user{i}@example.com"));
    SessionTokenService::new(
        SigningSecret::new("murmur-bench-secret-0123456789abcdef").unwrap(),
        AllowList::new(emails),
        Duration::from_secs(7200),
    )
}

fn bench_issue(c: &mut Criterion) {
    let svc = service_with_list_size(16);

    c.bench_function("session_issue", |b| {
        b.iter(|| svc.issue(black_box("user3@example.com")));
    });
}

fn bench_validate(c: &mut Criterion) {
    let list_sizes = [1, 16, 256, 4096];

    let mut group = c.benchmark_group("session_validate");

    for size in list_sizes {
        let svc = service_with_list_size(size);
        let token = svc.issue("user0@example.com").unwrap().token;

        group.bench_with_input(BenchmarkId::from_parameter(size), &token, |b, token| {
            b.iter(|| svc.validate(black_box(token)));
        });
    }

    group.finish();

    let svc = service_with_list_size(16);
    let token = svc.issue("user0@example.com").unwrap().token;
    let (signing_input, _) = token.rsplit_once('.').unwrap();
    let forged = format!("{signing_input}.AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");

    c.bench_function("session_validate_forged", |b| {
        b.iter(|| svc.validate(black_box(&forged)));
    });
}

fn bench_extract_bearer(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_bearer");

    let well_formed = "Bearer eyJhbGciOiJIUzI1NiJ9.eyJlbWFpbCI6ImFAYi5jIn0.c2ln";
    let too_many = "Bearer one two";

    group.bench_function("well_formed", |b| {
        b.iter(|| extract_bearer(black_box(Some(well_formed))));
    });

    group.bench_function("malformed", |b| {
        b.iter(|| extract_bearer(black_box(Some(too_many))));
    });

    group.finish();
}

criterion_group!(benches, bench_issue, bench_validate, bench_extract_bearer);
criterion_main!(benches);
