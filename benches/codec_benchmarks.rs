#![allow(missing_docs)]
//! Benchmarks for the ISO 2709 codec.
//!
//! Fixtures are generated in memory, so the suite needs no data files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marc21_codec::parallel::decode_buffer_parallel;
use marc21_codec::{
    decode, encode_many, encode_one, DecodeOptions, Field, Leader, Record, StreamReader, Subfield,
};
use std::io::Cursor;

/// A record shaped like a typical bibliographic description.
fn sample_record(n: usize) -> Record {
    let subfield = |code, value: String| Subfield::new(code, value).unwrap();
    Record::builder(Leader::new('n', 'a'))
        .field(Field::control("001", format!("ocm{n:08}")).unwrap())
        .field(Field::control("008", "850101s1925    nyu           000 1 eng d").unwrap())
        .field(
            Field::data("100", '1', ' ', vec![subfield('a', format!("Author {n},"))]).unwrap(),
        )
        .field(
            Field::data(
                "245",
                '1',
                '0',
                vec![
                    subfield('a', format!("Title number {n} :")),
                    subfield('b', "a subtitle /".to_string()),
                    subfield('c', format!("by Author {n}.")),
                ],
            )
            .unwrap(),
        )
        .fields((0..5).map(|i| {
            Field::data("650", ' ', '0', vec![subfield('a', format!("Subject {i}."))]).unwrap()
        }))
        .build()
}

fn sample_stream(count: usize) -> Vec<u8> {
    let records: Vec<_> = (0..count).map(sample_record).collect();
    encode_many(&records).unwrap()
}

/// Benchmark encoding and decoding one record.
fn benchmark_single_record(c: &mut Criterion) {
    let record = sample_record(1);
    let bytes = encode_one(&record).unwrap();

    c.bench_function("encode_one", |b| b.iter(|| encode_one(black_box(&record))));
    c.bench_function("decode_one", |b| b.iter(|| decode(black_box(&bytes))));
}

/// Benchmark reading 1,000 records from a stream.
fn benchmark_read_1k(c: &mut Criterion) {
    let stream = black_box(sample_stream(1_000));

    c.bench_function("read_1k_records", |b| {
        b.iter(|| {
            StreamReader::new(Cursor::new(stream.as_slice()))
                .filter(Result::is_ok)
                .count()
        });
    });
}

/// Benchmark parallel decoding of 10,000 records.
fn benchmark_parallel_10k(c: &mut Criterion) {
    let stream = black_box(sample_stream(10_000));
    let options = DecodeOptions::default();

    c.bench_function("decode_buffer_parallel_10k", |b| {
        b.iter(|| decode_buffer_parallel(&stream, &options).map(|records| records.len()));
    });
}

criterion_group!(
    benches,
    benchmark_single_record,
    benchmark_read_1k,
    benchmark_parallel_10k
);
criterion_main!(benches);
