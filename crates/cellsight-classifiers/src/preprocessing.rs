//! Per-feature scaling.
//!
//! A `Scaler` is fitted once over a reference matrix and then applied to any
//! matrix with the same number of columns. Both policies reduce to
//! `(v - offset) / scale` per column, so the fitted parameters are stored in
//! that form.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::{CellsightError, Result};

/// Scaling policy applied to all feature columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMethod {
    /// Leave features untouched.
    None,
    /// Min-max scaling: (x - min) / (max - min) -> [0, 1]
    Normalize,
    /// Standard scaling: (x - mean) / sd, with the sample standard deviation.
    Standardize,
}

impl Default for ScalingMethod {
    fn default() -> Self {
        ScalingMethod::Normalize
    }
}

impl fmt::Display for ScalingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalingMethod::None => "none",
            ScalingMethod::Normalize => "normalize",
            ScalingMethod::Standardize => "standardize",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ScalingMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ScalingMethod::None),
            "normalize" | "minmax" | "min-max" => Ok(ScalingMethod::Normalize),
            "standardize" | "standard" => Ok(ScalingMethod::Standardize),
            _ => Err(format!(
                "Unknown scaling method: {}. Expected one of: none, normalize, standardize",
                s
            )),
        }
    }
}

/// Fitted per-column parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scaler {
    pub method: ScalingMethod,
    pub offset: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    /// Fit scaling parameters over `x` (rows are samples).
    ///
    /// # Errors
    ///
    /// `DegenerateFeature` when a column has zero range (normalize) or zero
    /// standard deviation (standardize), or when fewer than two rows are given
    /// for standardization. `InvalidInput` if `x` has no rows or the number of
    /// names does not match the number of columns.
    pub fn fit(method: ScalingMethod, x: &Array2<f64>, feature_names: &[String]) -> Result<Scaler> {
        let (nrows, ncols) = x.dim();
        if nrows == 0 {
            return Err(CellsightError::InvalidInput(
                "cannot fit a scaler on an empty matrix".to_string(),
            ));
        }
        if feature_names.len() != ncols {
            return Err(CellsightError::InvalidInput(format!(
                "{} feature names for {} columns",
                feature_names.len(),
                ncols
            )));
        }

        let mut offset = Vec::with_capacity(ncols);
        let mut scale = Vec::with_capacity(ncols);

        for (col_idx, name) in feature_names.iter().enumerate() {
            let col = x.column(col_idx);
            match method {
                ScalingMethod::None => {
                    offset.push(0.0);
                    scale.push(1.0);
                }
                ScalingMethod::Normalize => {
                    let min = col.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    let range = max - min;
                    if !(range > 0.0) {
                        return Err(CellsightError::DegenerateFeature {
                            feature: name.clone(),
                            reason: format!("zero range (min = max = {})", min),
                        });
                    }
                    offset.push(min);
                    scale.push(range);
                }
                ScalingMethod::Standardize => {
                    if nrows < 2 {
                        return Err(CellsightError::DegenerateFeature {
                            feature: name.clone(),
                            reason: "standard deviation needs at least two rows".to_string(),
                        });
                    }
                    let mean = Statistics::mean(col.iter());
                    let sd = Statistics::std_dev(col.iter());
                    if !(sd > 0.0) {
                        return Err(CellsightError::DegenerateFeature {
                            feature: name.clone(),
                            reason: "zero standard deviation".to_string(),
                        });
                    }
                    offset.push(mean);
                    scale.push(sd);
                }
            }
        }

        log::debug!("Fitted {} scaler over {} rows x {} features", method, nrows, ncols);

        Ok(Scaler {
            method,
            offset,
            scale,
        })
    }

    pub fn n_features(&self) -> usize {
        self.offset.len()
    }

    /// Apply the fitted parameters to `x` and return a new matrix.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(CellsightError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }

        let mut out = x.to_owned();
        for (col_idx, mut col) in out.columns_mut().into_iter().enumerate() {
            let (offset, scale) = (self.offset[col_idx], self.scale[col_idx]);
            col.mapv_inplace(|v| (v - offset) / scale);
        }
        Ok(out)
    }
}

/// Fit a scaler over `x` and return the transformed matrix in one call.
pub fn fit_transform(
    method: ScalingMethod,
    x: &Array2<f64>,
    feature_names: &[String],
) -> Result<Array2<f64>> {
    Scaler::fit(method, x, feature_names)?.transform(x)
}
