use ndarray::{Array1, Array2};

use crate::data_handling::{Dataset, Diagnosis};
use crate::error::Result;

/// Contract shared by the classifiers in this crate. Prediction never mutates
/// the fitted model.
pub trait ClassifierModel {
    /// Store or learn from the training set.
    fn fit(&mut self, train: &Dataset) -> Result<()>;

    /// Predict one label per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<Diagnosis>>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
