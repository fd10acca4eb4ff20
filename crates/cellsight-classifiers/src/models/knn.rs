//! Brute-force K-nearest-neighbour classifier.
//!
//! The training set is small (hundreds of rows), so every query scans all
//! training rows. Ordering is fully deterministic:
//!
//! * neighbours are ranked by `(distance, training row index)`, so the earlier
//!   training row wins among equal distances;
//! * when both labels receive the same number of votes, the label of the single
//!   nearest neighbour wins.

use std::cmp::Ordering;

use ndarray::{Array1, Array2, ArrayView1};

use crate::data_handling::{Dataset, Diagnosis};
use crate::error::{CellsightError, Result};
use crate::models::classifier_trait::ClassifierModel;

/// One training row close to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row index in the training set.
    pub index: usize,
    pub distance: f64,
    pub label: Diagnosis,
}

#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    train: Option<Dataset>,
}

impl KnnClassifier {
    /// Create an unfitted classifier. `k` is validated against the training
    /// set size in [`ClassifierModel::fit`].
    pub fn new(k: usize) -> Self {
        Self { k, train: None }
    }

    /// Create and fit in one step.
    pub fn fitted(k: usize, train: &Dataset) -> Result<Self> {
        let mut model = Self::new(k);
        model.fit(train)?;
        Ok(model)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn training_set(&self) -> Result<&Dataset> {
        self.train.as_ref().ok_or_else(|| {
            CellsightError::InvalidConfig("KNN classifier used before fit".to_string())
        })
    }

    /// The `k` nearest training rows to `query`, nearest first.
    pub fn neighbors(&self, query: &[f64]) -> Result<Vec<Neighbor>> {
        let train = self.training_set()?;
        if query.len() != train.n_features() {
            return Err(CellsightError::DimensionMismatch {
                expected: train.n_features(),
                actual: query.len(),
            });
        }
        if let Some(pos) = query.iter().position(|v| !v.is_finite()) {
            return Err(CellsightError::InvalidInput(format!(
                "query feature {} is not finite",
                pos
            )));
        }
        let query = ArrayView1::from(query);

        let mut all: Vec<Neighbor> = train
            .features
            .outer_iter()
            .zip(train.labels.iter())
            .enumerate()
            .map(|(index, (row, &label))| Neighbor {
                index,
                distance: euclidean(&row, &query),
                label,
            })
            .collect();

        all.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index)));
        all.truncate(self.k);
        Ok(all)
    }

    /// Majority label among the `k` nearest training rows.
    pub fn predict_one(&self, query: &[f64]) -> Result<Diagnosis> {
        let neighbors = self.neighbors(query)?;
        let label = majority_vote(&neighbors).ok_or_else(|| {
            CellsightError::InvalidConfig("no neighbours to vote with".to_string())
        })?;
        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "k={} votes: {:?} -> {}",
                self.k,
                neighbors.iter().map(|n| n.label).collect::<Vec<_>>(),
                label
            );
        }
        Ok(label)
    }
}

impl ClassifierModel for KnnClassifier {
    /// # Errors
    ///
    /// `InvalidConfig` when `k` is zero or larger than the training set.
    fn fit(&mut self, train: &Dataset) -> Result<()> {
        if self.k == 0 || self.k > train.len() {
            return Err(CellsightError::InvalidConfig(format!(
                "k must lie in 1..={} (training set size), got {}",
                train.len(),
                self.k
            )));
        }
        self.train = Some(train.clone());
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<Diagnosis>> {
        let train = self.training_set()?;
        if x.ncols() != train.n_features() {
            return Err(CellsightError::DimensionMismatch {
                expected: train.n_features(),
                actual: x.ncols(),
            });
        }
        x.outer_iter()
            .map(|row| match row.as_slice() {
                Some(slice) => self.predict_one(slice),
                None => self.predict_one(&row.to_vec()),
            })
            .collect::<Result<Vec<_>>>()
            .map(Array1::from)
    }

    fn name(&self) -> &str {
        "knn"
    }
}

fn euclidean(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// `neighbors` must be ordered nearest first.
fn majority_vote(neighbors: &[Neighbor]) -> Option<Diagnosis> {
    let nearest = neighbors.first()?.label;
    let positive = neighbors
        .iter()
        .filter(|n| n.label == Diagnosis::Positive)
        .count();
    let negative = neighbors.len() - positive;
    Some(match positive.cmp(&negative) {
        Ordering::Greater => Diagnosis::Positive,
        Ordering::Less => Diagnosis::Negative,
        Ordering::Equal => nearest,
    })
}
