use criterion::{Criterion, criterion_group, criterion_main};
use fieldstat::field::{DisplayValue, FieldType, FieldValue};
use fieldstat::prefix::{apply_prefix, strip_known_symbols};
use std::hint::black_box;

fn sample_values(count: usize) -> Vec<FieldValue> {
    (0..count)
        .map(|index| {
            let field_type = if index % 4 == 0 {
                FieldType::String
            } else {
                FieldType::Number
            };
            FieldValue {
                field_type,
                display: DisplayValue {
                    title: Some(format!("field-{index}")),
                    text: format!("{index}"),
                    numeric: Some(index as f64),
                    prefix: Some("avg \u{2191}".to_string()),
                    suffix: Some(" ms".to_string()),
                },
            }
        })
        .collect()
}

fn bench_strip_known_symbols(c: &mut Criterion) {
    let mixed = "avg \u{2191}FQ total \u{0394} \u{00B5} Qtr";
    c.bench_function("strip_known_symbols", |b| {
        b.iter(|| strip_known_symbols(black_box(mixed)));
    });
}

fn bench_apply_prefix(c: &mut Criterion) {
    let values = sample_values(1000);
    c.bench_function("apply_prefix_1000", |b| {
        b.iter(|| apply_prefix(black_box(&values), black_box("decrease")));
    });
}

criterion_group!(benches, bench_strip_known_symbols, bench_apply_prefix);
criterion_main!(benches);
