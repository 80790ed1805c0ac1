//! 工具函数性能基准测试

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use shrt::utils::url_validator::validate_url;
use shrt::utils::{
    build_short_url, generate_random_code, is_valid_short_code, is_valid_username,
};

fn bench_is_valid_short_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/is_valid_short_code");

    group.bench_function("valid_simple", |b| {
        b.iter(|| assert!(is_valid_short_code(black_box("abc123"))));
    });

    group.bench_function("invalid_special_chars", |b| {
        b.iter(|| assert!(!is_valid_short_code(black_box("'; DROP TABLE--"))));
    });

    let max_len_code = "a".repeat(30);
    group.bench_function("valid_max_length", |b| {
        b.iter(|| assert!(is_valid_short_code(black_box(&max_len_code))));
    });

    let too_long_code = "a".repeat(31);
    group.bench_function("invalid_too_long", |b| {
        b.iter(|| assert!(!is_valid_short_code(black_box(&too_long_code))));
    });

    group.finish();
}

fn bench_generate_random_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_random_code");
    for len in [6, 12, 30] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| generate_random_code(black_box(len)));
        });
    }
    group.finish();
}

fn bench_validate_url(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/validate_url");

    group.bench_function("https_with_path", |b| {
        b.iter(|| validate_url(black_box("https://example.com/a/b?c=d")).is_ok());
    });

    group.bench_function("dangerous_protocol", |b| {
        b.iter(|| validate_url(black_box("javascript:alert(1)")).is_err());
    });

    group.finish();
}

fn bench_misc(c: &mut Criterion) {
    c.bench_function("utils/is_valid_username", |b| {
        b.iter(|| is_valid_username(black_box("jane.doe")));
    });
    c.bench_function("utils/build_short_url", |b| {
        b.iter(|| build_short_url(black_box("https://s.example/"), black_box("abc123")));
    });
}

criterion_group!(
    benches,
    bench_is_valid_short_code,
    bench_generate_random_code,
    bench_validate_url,
    bench_misc
);
criterion_main!(benches);
