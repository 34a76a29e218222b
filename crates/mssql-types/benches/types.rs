//! Benchmarks for per-cell decoding.

#![allow(clippy::unwrap_used, clippy::approx_constant, missing_docs)]

use chrono::NaiveDate;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use mssql_testing::{MockCell, MockConverter, fixtures};
use mssql_types::{FromSql, SqlValue, classify, decode_cell};
use std::hint::black_box;
use tds_engine::TypeId;

fn bench_decode(c: &mut Criterion, name: &str, type_id: TypeId, cell: &MockCell) {
    let conv = MockConverter::new();
    let tag = type_id.raw();
    c.benchmark_group("decode_cell")
        .bench_function(name, |b| {
            b.iter(|| black_box(decode_cell(&conv, black_box(tag), cell.raw())))
        });
}

/// Benchmark the direct decoders (no engine round-trip).
fn bench_direct(c: &mut Criterion) {
    bench_decode(c, "int4", TypeId::Int4, &fixtures::int4(12345));
    bench_decode(c, "intn_8", TypeId::IntN, &fixtures::int8(9_876_543_210));
    bench_decode(c, "float8", TypeId::Flt8, &fixtures::float8(3.14159));
    bench_decode(c, "guid", TypeId::Unique, &fixtures::guid(uuid::Uuid::nil()));
    bench_decode(c, "null", TypeId::Int4, &fixtures::null());
}

/// Benchmark character decoding, including the Windows-1252 fallback.
fn bench_text(c: &mut Criterion) {
    let ascii = "This is a typical database column value with some content";
    let latin1 = b"Caf\xE9 cr\xE8me br\xFBl\xE9e, na\xEFve fa\xE7ade";

    bench_decode(c, "varchar_utf8", TypeId::VarChar, &fixtures::text(ascii));
    bench_decode(c, "varchar_1252", TypeId::VarChar, &fixtures::bytes(latin1));
}

/// Benchmark the engine string round-trips.
fn bench_round_trip(c: &mut Criterion) {
    let dt = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_milli_opt(10, 30, 0, 500)
        .unwrap();

    bench_decode(c, "datetime_legacy", TypeId::DateTime, &fixtures::datetime(dt));
    bench_decode(
        c,
        "datetime2_text",
        TypeId::MsDateTime2,
        &fixtures::temporal("2024-06-15 10:30:00.1234567"),
    );
    bench_decode(
        c,
        "datetimeoffset_text",
        TypeId::MsDateTimeOffset,
        &fixtures::temporal("2024-06-15 10:30:00.1234567 +02:00"),
    );
    bench_decode(c, "numeric", TypeId::Numeric, &fixtures::numeric(18, 4, 123_456_789));
    bench_decode(c, "money", TypeId::Money, &fixtures::money(123_456_789));
}

/// Benchmark a 1000-row, 6-column materialization loop.
fn bench_row_loop(c: &mut Criterion) {
    let conv = MockConverter::new();
    let columns = [
        (TypeId::Int4.raw(), fixtures::int4(1)),
        (TypeId::XNVarChar.raw(), fixtures::text("Alice")),
        (TypeId::Flt8.raw(), fixtures::float8(1.5)),
        (TypeId::Bit.raw(), fixtures::bit(true)),
        (TypeId::MsDate.raw(), fixtures::temporal("2024-06-15")),
        (TypeId::Decimal.raw(), fixtures::numeric(10, 2, 1999)),
    ];

    let mut group = c.benchmark_group("row_loop");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("1000x6", |b| {
        b.iter(|| {
            let mut rows = Vec::with_capacity(1000);
            for _ in 0..1000 {
                let row: Vec<SqlValue> = columns
                    .iter()
                    .map(|(tag, cell)| decode_cell(&conv, *tag, cell.raw()))
                    .collect();
                rows.push(row);
            }
            black_box(rows)
        })
    });
    group.finish();
}

/// Benchmark catalog lookup and value extraction.
fn bench_catalog_and_from_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");
    group.bench_function("classify_known", |b| {
        b.iter(|| black_box(classify(black_box(0x6F))))
    });
    group.bench_function("classify_unknown", |b| {
        b.iter(|| black_box(classify(black_box(0x99))))
    });
    group.finish();

    let mut group = c.benchmark_group("from_sql");
    let int_sql = SqlValue::Int(12345);
    group.bench_function("i64", |b| {
        b.iter(|| {
            let val: i64 = i64::from_sql(black_box(&int_sql)).unwrap();
            black_box(val)
        })
    });
    let null_sql = SqlValue::Null;
    group.bench_function("Option_i32_None", |b| {
        b.iter(|| {
            let val: Option<i32> = Option::<i32>::from_sql(black_box(&null_sql)).unwrap();
            black_box(val)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_direct,
    bench_text,
    bench_round_trip,
    bench_row_loop,
    bench_catalog_and_from_sql,
);

criterion_main!(benches);
