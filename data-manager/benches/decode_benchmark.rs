//! Line Decoding Benchmark
//!
//! Measures decoding of universe lines:
//! - Single line with an encoded identifier
//! - Single line through a mapping resolver
//! - Whole universe batch of 5,000 lines through the reader

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use data_manager::provider::quiver::wikipedia_universe::decode;
use data_manager::{DataFileReader, ReadErrorPolicy};
use trading_common::instruments::{
    EncodedIdentifierResolver, MappedIdentifierResolver, SecurityIdentifier,
};

const BATCH_SIZES: [usize; 2] = [500, 5_000];

/// Build a synthetic universe file with varying values
fn universe_lines(count: usize) -> String {
    let mut contents = String::with_capacity(count * 48);
    for i in 0..count {
        contents.push_str(&format!(
            "AAPL R735QTJ8XC9X,AAPL,{},{}.{},-{}.{}\n",
            1_000_000 + i * 37,
            i % 50,
            i % 10,
            i % 20,
            i % 7
        ));
    }
    contents
}

fn decode_benchmark(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2020, 3, 15).unwrap();
    let line = "AAPL R735QTJ8XC9X,AAPL,1500000,12.5,-3.2";

    c.bench_function("decode_encoded_identifier", |b| {
        b.iter(|| decode(black_box(line), date, &EncodedIdentifierResolver).unwrap())
    });

    let resolver = MappedIdentifierResolver::new()
        .with_mapping("T", SecurityIdentifier::parse("AAPL R735QTJ8XC9X").unwrap());
    c.bench_function("decode_mapped_identifier", |b| {
        b.iter(|| decode(black_box("T,AAPL,1500000,12.5,-3.2"), date, &resolver).unwrap())
    });

    let mut group = c.benchmark_group("read_universe_batch");
    for size in BATCH_SIZES {
        let contents = universe_lines(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &contents, |b, contents| {
            b.iter(|| {
                let reader = DataFileReader::new(
                    contents.as_bytes(),
                    ReadErrorPolicy::Abort,
                    move |line| Ok(decode(line, date, &EncodedIdentifierResolver)?),
                );
                black_box(reader.filter(Result::is_ok).count())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, decode_benchmark);
criterion_main!(benches);
