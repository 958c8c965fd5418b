use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use autowriter_core::{Locale, enforce_single_trailing_summary, sanitize, trim_to_visible_length, validate};

fn bench_sanitize(c: &mut Criterion) {
    let small = std::fs::read_to_string("../../tests/fixtures/drafts/raw_model_output.html").unwrap();
    let large = small.repeat(50);

    let mut group = c.benchmark_group("sanitize");

    group.bench_with_input(BenchmarkId::new("small", "1KB"), &small, |b, html| b.iter(|| sanitize(black_box(html))));

    group.bench_with_input(BenchmarkId::new("large", "50KB"), &large, |b, html| b.iter(|| sanitize(black_box(html))));

    group.finish();
}

fn bench_trailing_summary(c: &mut Criterion) {
    let html = sanitize(&std::fs::read_to_string("../../tests/fixtures/drafts/raw_model_output.html").unwrap());
    let locale = Locale::default();

    c.bench_function("trailing_summary", |b| {
        b.iter(|| enforce_single_trailing_summary(black_box(&html), "審査", 4, &locale))
    });
}

fn bench_trim(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/drafts/clean_article.html").unwrap().repeat(20);

    c.bench_function("trim_to_visible_length", |b| b.iter(|| trim_to_visible_length(black_box(&html), 2000)));
}

fn bench_validate(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/drafts/clean_article.html").unwrap().repeat(20);

    c.bench_function("validate", |b| b.iter(|| validate(black_box(&html))));
}

criterion_group!(benches, bench_sanitize, bench_trailing_summary, bench_trim, bench_validate);
criterion_main!(benches);
