//! Aggregation engine performance benchmarks.
//!
//! Measures grouping, cross-tabulation, encoding and time-pattern analysis
//! over synthetic coupon offer tables.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;
use tempfile::NamedTempFile;
use uptake::{
    aggregate, analyze_time_patterns, crosstab, encode_categorical, DataTable, Parser, TimeAxes,
};

/// Generate synthetic offer data in CSV form.
fn generate_offer_data(rows: usize) -> String {
    let mut data = String::new();
    data.push_str("destination,passanger,time,coupon,expiration,gender,age,Bar,CoffeeHouse,Y\n");

    let destinations = ["No Urgent Place", "Home", "Work"];
    let passengers = ["Alone", "Friend(s)", "Kid(s)", "Partner"];
    let times = ["7AM", "10AM", "2PM", "6PM", "10PM"];
    let coupons = [
        "Restaurant(<20)",
        "Coffee House",
        "Carry out & Take away",
        "Bar",
        "Restaurant(20-50)",
    ];
    let ages = ["below21", "21", "26", "31", "36", "41", "46", "50plus"];
    let frequencies = ["never", "less1", "1~3", "4~8", "gt8"];

    for row in 0..rows {
        data.push_str(destinations[row % destinations.len()]);
        data.push(',');
        data.push_str(passengers[(row / 3) % passengers.len()]);
        data.push(',');
        data.push_str(times[(row * 7) % times.len()]);
        data.push(',');
        data.push_str(coupons[(row / 2) % coupons.len()]);
        data.push(',');
        data.push_str(if row % 3 == 0 { "2h" } else { "1d" });
        data.push(',');
        data.push_str(if row % 2 == 0 { "Female" } else { "Male" });
        data.push(',');
        data.push_str(ages[(row * 5) % ages.len()]);
        data.push(',');
        // Sparse missing frequencies
        if row % 97 != 0 {
            data.push_str(frequencies[(row * 3) % frequencies.len()]);
        }
        data.push(',');
        data.push_str(frequencies[(row * 11) % frequencies.len()]);
        data.push(',');
        data.push_str(if (row * 13) % 7 < 4 { "1" } else { "0" });
        data.push('\n');
    }

    data
}

fn generate_table(rows: usize) -> DataTable {
    Parser::new()
        .parse_bytes(generate_offer_data(rows).as_bytes(), b',')
        .unwrap()
}

/// Benchmark loading a file end to end.
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for rows in [1_000, 10_000].iter() {
        let data = generate_offer_data(*rows);
        let bytes = data.len();

        group.throughput(Throughput::Bytes(bytes as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| black_box(Parser::new().parse_file(temp.path()).unwrap()),
            )
        });
    }

    group.finish();
}

/// Benchmark grouped acceptance rates by key width.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let table = generate_table(10_000);
    group.throughput(Throughput::Elements(table.row_count() as u64));

    let groupings: [(&str, &[&str]); 4] = [
        ("overall", &[]),
        ("coupon", &["coupon"]),
        ("coupon_time", &["coupon", "time"]),
        ("coupon_time_age", &["coupon", "time", "age"]),
    ];
    for (name, group_by) in groupings {
        group.bench_with_input(BenchmarkId::new("group_by", name), &table, |b, table| {
            b.iter(|| black_box(aggregate(table, "Y", group_by).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark cross-tabulation across table sizes.
fn bench_crosstab(c: &mut Criterion) {
    let mut group = c.benchmark_group("crosstab");

    for rows in [1_000, 10_000, 50_000].iter() {
        let table = generate_table(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(crosstab(table, "time", "coupon", "Y").unwrap()))
        });
    }

    group.finish();
}

/// Benchmark categorical encoding of every text column.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_categorical");

    for rows in [1_000, 10_000].iter() {
        let table = generate_table(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(encode_categorical(table).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark time-of-day analysis, all coupons and a single type.
fn bench_time_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_patterns");
    let table = generate_table(10_000);
    let axes = TimeAxes::default();

    group.bench_function("all_coupons", |b| {
        b.iter(|| black_box(analyze_time_patterns(&table, None, &axes, "Y").unwrap()))
    });
    group.bench_function("single_coupon", |b| {
        b.iter(|| black_box(analyze_time_patterns(&table, Some("Bar"), &axes, "Y").unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_load,
    bench_aggregate,
    bench_crosstab,
    bench_encode,
    bench_time_patterns,
);
criterion_main!(benches);
