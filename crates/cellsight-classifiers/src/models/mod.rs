pub mod classifier_trait;
pub mod knn;

pub use classifier_trait::ClassifierModel;
pub use knn::{KnnClassifier, Neighbor};
