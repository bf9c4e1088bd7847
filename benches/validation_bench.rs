use criterion::{black_box, criterion_group, criterion_main, Criterion};

use telnum::{PhoneNumberFormat, PhoneNumberUtil};

/// A mixed corpus gives a more objective picture than a single number:
/// national and international forms, a vanity number, an extension and a
/// number with a significant leading zero.
fn setup_parsing_data() -> Vec<(&'static str, &'static str)> {
    vec![
        ("(650) 253-0000", "US"),
        ("+44 20 8738 9353", "GB"),
        ("020 8738 9353", "GB"),
        ("03 331 6005 ext 3456", "NZ"),
        ("0064 3 331 6005", "NZ"),
        ("02 3661 8300", "IT"),
        ("1-800-FLOWERS", "US"),
        ("+800 1234 5678", "US"),
    ]
}

fn parsing_benchmark(c: &mut Criterion) {
    let phone_util = PhoneNumberUtil::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/testdata/PhoneNumberMetadata"
    ));
    let numbers_to_parse = setup_parsing_data();

    let mut group = c.benchmark_group("Parse and validate");

    group.bench_function("parse()", |b| {
        b.iter(|| {
            for (number_str, region) in &numbers_to_parse {
                let _ = phone_util.parse(black_box(number_str), black_box(region));
            }
        })
    });

    group.bench_function("parse() + is_valid_number()", |b| {
        b.iter(|| {
            for (number_str, region) in &numbers_to_parse {
                if let Ok(number) = phone_util.parse(black_box(number_str), black_box(region)) {
                    black_box(phone_util.is_valid_number(&number));
                }
            }
        })
    });

    group.bench_function("parse() + format()", |b| {
        b.iter(|| {
            for (number_str, region) in &numbers_to_parse {
                if let Ok(number) = phone_util.parse(black_box(number_str), black_box(region)) {
                    black_box(phone_util.format(&number, PhoneNumberFormat::International));
                }
            }
        })
    });

    group.finish();
}

criterion_group!(benches, parsing_benchmark);
criterion_main!(benches);
