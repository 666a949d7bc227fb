//! Property-based tests for the aggregation engine.
//!
//! These tests use proptest to generate random offer tables and verify that
//! the engine's conservation and ordering laws hold for all of them.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p uptake --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p uptake --test property_tests
//! ```

use proptest::prelude::*;

use uptake::{
    aggregate, analyze_time_patterns, bucketize, compare, encode_categorical, Buckets,
    DataTable, Segment, TimeAxes, Value,
};

// =============================================================================
// Test Strategies
// =============================================================================

const COUPONS: &[&str] = &["Bar", "Coffee House", "Carry out & Take away", "Restaurant(<20)"];
const TIMES: &[&str] = &["7AM", "10AM", "2PM", "6PM", "10PM"];
const FREQUENCIES: &[&str] = &["never", "less1", "1~3", "4~8", "gt8", "unknown_val"];

/// One generated row: coupon (or null), time, frequency, accepted.
type Row = (Option<usize>, usize, usize, bool);

fn row() -> impl Strategy<Value = Row> {
    (
        proptest::option::weighted(0.9, 0..COUPONS.len()),
        0..TIMES.len(),
        0..FREQUENCIES.len(),
        any::<bool>(),
    )
}

fn rows(max: usize) -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(row(), 0..max)
}

fn build_table(rows: &[Row]) -> DataTable {
    DataTable::from_columns(vec![
        (
            "coupon",
            rows.iter()
                .map(|r| Value::from(r.0.map(|i| COUPONS[i])))
                .collect(),
        ),
        ("time", rows.iter().map(|r| Value::from(TIMES[r.1])).collect()),
        (
            "expiration",
            rows.iter()
                .map(|r| Value::from(if r.1 % 2 == 0 { "1d" } else { "2h" }))
                .collect(),
        ),
        ("Bar", rows.iter().map(|r| Value::from(FREQUENCIES[r.2])).collect()),
        ("Y", rows.iter().map(|r| Value::Int(r.3 as i64)).collect()),
    ])
    .expect("generated table is rectangular")
}

// =============================================================================
// Aggregation
// =============================================================================

mod aggregation_props {
    use super::*;

    proptest! {
        #[test]
        fn totals_are_conserved(rows in rows(200)) {
            let table = build_table(&rows);
            let accepted = rows.iter().filter(|r| r.3).count();

            let groupings: [&[&str]; 3] = [&["coupon"], &["time"], &["coupon", "time"]];
            for group_by in groupings {
                let result = aggregate(&table, "Y", group_by).unwrap();
                prop_assert_eq!(result.total(), rows.len());
                prop_assert_eq!(result.accepted(), accepted);
                prop_assert!(result.rows.iter().all(|r| r.total > 0));
                prop_assert!(result.rows.iter().all(|r| r.accepted + r.declined == r.total));
            }
        }

        #[test]
        fn rates_are_percentages(rows in rows(200)) {
            let table = build_table(&rows);
            let result = aggregate(&table, "Y", &["coupon", "Bar"]).unwrap();
            for r in &result.rows {
                prop_assert!((0.0..=100.0).contains(&r.acceptance_rate));
            }
        }

        #[test]
        fn grouped_keys_are_sorted(rows in rows(200)) {
            let table = build_table(&rows);
            let result = aggregate(&table, "Y", &["coupon", "time"]).unwrap();
            prop_assert!(result.rows.windows(2).all(|w| w[0].key < w[1].key));
        }
    }
}

// =============================================================================
// Segment comparison
// =============================================================================

mod comparison_props {
    use super::*;

    proptest! {
        #[test]
        fn segments_partition_the_table(rows in rows(200), pick in 0..COUPONS.len()) {
            let table = build_table(&rows);
            let coupon = Value::from(COUPONS[pick]);
            let segment = Segment::from_predicate(&table, |row| row.get("coupon") == Some(&coupon));
            let result = compare(&table, &segment, "Y", ("Target", "Others")).unwrap();

            prop_assert_eq!(result.target.total + result.others.total, rows.len());
            prop_assert_eq!(
                result.target.accepted + result.others.accepted,
                rows.iter().filter(|r| r.3).count()
            );
            prop_assert_eq!(result.target.rate_difference, -result.others.rate_difference);
        }
    }
}

// =============================================================================
// Bucketing
// =============================================================================

mod bucket_props {
    use super::*;

    proptest! {
        #[test]
        fn no_row_is_dropped(rows in rows(200)) {
            let table = build_table(&rows);
            let buckets = Buckets::new()
                .with_bucket("Low", ["never", "less1"])
                .with_bucket("High", ["1~3", "4~8", "gt8"]);
            let labels = bucketize(&table, "Bar", &buckets).unwrap();

            prop_assert_eq!(labels.len(), rows.len());
            for (label, r) in labels.iter().zip(&rows) {
                let expected = match FREQUENCIES[r.2] {
                    "never" | "less1" => "Low",
                    "unknown_val" => "Unknown",
                    _ => "High",
                };
                prop_assert_eq!(label.as_str(), expected);
            }
        }
    }
}

// =============================================================================
// Encoding
// =============================================================================

mod encoding_props {
    use super::*;

    proptest! {
        #[test]
        fn decode_inverts_encode(rows in rows(200)) {
            let table = build_table(&rows);
            let encoded = encode_categorical(&table).unwrap();

            for column in ["coupon", "time", "Bar"] {
                let original: Vec<Value> = table.column(column).unwrap().cloned().collect();
                if original.iter().all(Value::is_null) {
                    continue;
                }
                prop_assert_eq!(encoded.decode_column(column).unwrap(), original);
            }
        }

        #[test]
        fn codes_follow_frequency(rows in rows(200)) {
            let table = build_table(&rows);
            let encoded = encode_categorical(&table).unwrap();

            for (column, mapping) in &encoded.mappings {
                let values: Vec<&Value> = table.column(column).unwrap().collect();
                let count = |v: &Value| values.iter().filter(|x| ***x == *v).count();
                let first_seen = |v: &Value| values.iter().position(|x| *x == v);

                let ranked: Vec<(&Value, i64)> = mapping.iter().collect();
                for w in ranked.windows(2) {
                    let (a, b) = (w[0].0, w[1].0);
                    prop_assert!(
                        count(a) > count(b)
                            || (count(a) == count(b) && first_seen(a) < first_seen(b))
                    );
                }
                prop_assert_eq!(ranked.first().map(|(_, code)| *code), Some(1));
            }
        }

        #[test]
        fn nulls_stay_null(rows in rows(200)) {
            let table = build_table(&rows);
            let encoded = encode_categorical(&table).unwrap();
            let index = table.column_index("coupon").unwrap();

            for (i, r) in rows.iter().enumerate() {
                prop_assert_eq!(encoded.table.get(i, index).unwrap().is_null(), r.0.is_none());
            }
        }
    }
}

// =============================================================================
// Time patterns
// =============================================================================

mod time_props {
    use super::*;

    proptest! {
        #[test]
        fn best_is_not_worse_than_worst(rows in rows(200)) {
            let table = build_table(&rows);
            let patterns = analyze_time_patterns(&table, None, &TimeAxes::default(), "Y").unwrap();

            prop_assert_eq!(patterns.by_time.len(), TIMES.len());
            match (&patterns.best, &patterns.worst) {
                (Some(best), Some(worst)) => {
                    prop_assert!(best.acceptance_rate >= worst.acceptance_rate);
                    for extreme in [best, worst] {
                        let bucket = patterns.bucket(&extreme.time).unwrap();
                        prop_assert!(bucket.total > 0);
                        prop_assert_eq!(bucket.acceptance_rate, Some(extreme.acceptance_rate));
                    }
                }
                (None, None) => prop_assert!(rows.is_empty()),
                _ => prop_assert!(false, "best and worst must both be present or absent"),
            }
        }

        #[test]
        fn absent_buckets_have_no_rate(rows in rows(50)) {
            let table = build_table(&rows);
            let patterns = analyze_time_patterns(&table, None, &TimeAxes::default(), "Y").unwrap();
            for bucket in &patterns.by_time {
                prop_assert_eq!(bucket.total == 0, bucket.acceptance_rate.is_none());
            }
        }
    }
}
