//! Diagnostic CSV reader.
//!
//! Expected layout: a header row, an identifier in the first column (dropped),
//! a two-valued label in the second column, and numeric features in every
//! remaining column.
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use ndarray::{Array1, Array2};

use crate::config::LoaderConfig;
use crate::data_handling::{Dataset, LabelMapping};
use crate::error::{CellsightError, Result};

const ID_COLUMN: usize = 0;
const LABEL_COLUMN: usize = 1;
const FIRST_FEATURE_COLUMN: usize = 2;

/// Read a diagnostic CSV file into a `Dataset`.
pub fn read_diagnostic_csv<P: AsRef<Path>>(path: P, config: &LoaderConfig) -> Result<Dataset> {
    let file = std::fs::File::open(&path).map_err(|e| {
        CellsightError::MalformedInput(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    log::info!("Reading diagnostic table from {}", path.as_ref().display());
    read_diagnostic_csv_from_reader(file, config)
}

/// Read a diagnostic table from any reader.
pub fn read_diagnostic_csv_from_reader<R: Read>(reader: R, config: &LoaderConfig) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.len() <= FIRST_FEATURE_COLUMN {
        return Err(CellsightError::MalformedInput(format!(
            "expected an identifier, a label and at least one feature column, found {} columns",
            headers.len()
        )));
    }
    log::debug!(
        "Dropping identifier column '{}', label column '{}'",
        headers.get(ID_COLUMN).unwrap_or(""),
        headers.get(LABEL_COLUMN).unwrap_or("")
    );

    let feature_names: Vec<String> = headers
        .iter()
        .skip(FIRST_FEATURE_COLUMN)
        .map(|h| h.trim().to_string())
        .collect();
    let n_features = feature_names.len();

    let mut features = Vec::new();
    let mut raw_labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        // 1-based data row number, header excluded
        let row_no = row_idx + 1;
        let record = result?;
        if record.len() != headers.len() {
            return Err(CellsightError::MalformedInput(format!(
                "row {} has {} fields, header has {}",
                row_no,
                record.len(),
                headers.len()
            )));
        }

        raw_labels.push(record.get(LABEL_COLUMN).unwrap_or("").trim().to_string());
        parse_features(&record, &headers, row_no, &mut features)?;
    }

    if raw_labels.is_empty() {
        return Err(CellsightError::MalformedInput(
            "input contains a header but no data rows".to_string(),
        ));
    }

    let mapping = resolve_label_mapping(&raw_labels, &config.positive_label)?;
    let labels = raw_labels
        .iter()
        .map(|raw| {
            mapping.parse(raw).ok_or_else(|| {
                CellsightError::MalformedInput(format!("unexpected label '{}'", raw))
            })
        })
        .collect::<Result<Array1<_>>>()?;

    let x = Array2::from_shape_vec((raw_labels.len(), n_features), features)
        .map_err(|e| CellsightError::MalformedInput(format!("failed to build feature matrix: {}", e)))?;

    let dataset = Dataset::new(x, labels, feature_names, mapping)?;
    dataset.log_input_data_summary();
    Ok(dataset)
}

fn parse_features(
    record: &StringRecord,
    headers: &StringRecord,
    row_no: usize,
    out: &mut Vec<f64>,
) -> Result<()> {
    for idx in FIRST_FEATURE_COLUMN..record.len() {
        let raw = record.get(idx).unwrap_or("").trim();
        let column = headers.get(idx).unwrap_or("");
        let value = raw.parse::<f64>().map_err(|_| {
            CellsightError::MalformedInput(format!(
                "invalid value '{}' for feature '{}' at row {}",
                raw, column, row_no
            ))
        })?;
        if !value.is_finite() {
            return Err(CellsightError::MalformedInput(format!(
                "non-finite value for feature '{}' at row {}",
                column, row_no
            )));
        }
        out.push(value);
    }
    Ok(())
}

/// Require exactly two distinct labels, one of which is `positive`.
fn resolve_label_mapping(raw_labels: &[String], positive: &str) -> Result<LabelMapping> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in raw_labels {
        *counts.entry(label.as_str()).or_default() += 1;
    }
    log::debug!("Label counts: {:?}", counts);

    if counts.len() != 2 {
        return Err(CellsightError::MalformedInput(format!(
            "label column must hold exactly two distinct values, found {}: {:?}",
            counts.len(),
            counts.keys().collect::<Vec<_>>()
        )));
    }

    let positive = positive.trim();
    let negative = counts
        .keys()
        .find(|&&label| label != positive)
        .copied()
        .unwrap_or_default();
    if !counts.contains_key(positive) {
        return Err(CellsightError::MalformedInput(format!(
            "positive label '{}' not found; labels present: {:?}",
            positive,
            counts.keys().collect::<Vec<_>>()
        )));
    }

    Ok(LabelMapping::new(positive, negative))
}
