//! Shared fixtures: synthetic diagnostic tables shaped like the reference data.
#![allow(dead_code)]

use std::fmt::Write;

use cellsight_classifiers::config::LoaderConfig;
use cellsight_classifiers::data_handling::Dataset;
use cellsight_classifiers::io::read_diagnostic_csv_from_reader;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const N_ROWS: usize = 569;
pub const N_MALIGNANT: usize = 212;
pub const N_FEATURES: usize = 30;

/// CSV text with an id column, an M/B diagnosis column and `n_features`
/// numeric columns. Malignant rows are shifted up by `separation` in every
/// feature, so the classes overlap more as `separation` shrinks.
pub fn synthetic_csv(n_rows: usize, n_malignant: usize, n_features: usize, separation: f64) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    let mut out = String::from("id,diagnosis");
    for j in 0..n_features {
        write!(out, ",feature_{}", j).unwrap();
    }
    out.push('\n');

    for i in 0..n_rows {
        // interleave classes so the split sees both
        let malignant = i % 8 < 3 && (i / 8) * 3 + (i % 8) < n_malignant;
        write!(out, "{},{}", 842_302 + i, if malignant { "M" } else { "B" }).unwrap();
        for j in 0..n_features {
            let base = 10.0 + j as f64;
            let shift = if malignant { separation } else { 0.0 };
            let value = base + shift + rng.gen_range(-1.0..1.0);
            write!(out, ",{:.5}", value).unwrap();
        }
        out.push('\n');
    }
    out
}

/// Route library logs through the test harness; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn reference_like_dataset() -> Dataset {
    let csv = synthetic_csv(N_ROWS, N_MALIGNANT, N_FEATURES, 0.25);
    read_diagnostic_csv_from_reader(csv.as_bytes(), &LoaderConfig::default()).unwrap()
}

pub fn small_csv() -> &'static str {
    "id,diagnosis,radius,texture\n\
     1,M,20.0,30.0\n\
     2,B,10.0,15.0\n\
     3,M,21.0,29.0\n\
     4,B,11.0,14.0\n\
     5,B,12.0,16.0\n"
}
