//! Dataset records: a measured association matrix plus its metadata.

use crate::matrix::Matrix;

/// One independently-measured association matrix with its metadata.
///
/// A dataset is immutable input to the pipeline. `name` identifies the
/// measurement for provenance and error reporting; a nameless dataset is
/// legal but draws a consistency warning. `anti` marks inverse-association
/// measurements. `threshold` is the dataset's own significance cutoff;
/// `None` means the dataset carries no cutoff and extraction falls back to
/// its no-threshold mode.
///
/// # Examples
///
/// ```
/// use trellis_core::{dataset::Dataset, identifier::Id, matrix::Matrix};
///
/// let matrix = Matrix::from_rows(
///     vec![Id::new("p1")],
///     vec![(Id::new("g1"), vec![Some(0.01)])],
/// )
/// .unwrap();
///
/// let dataset = Dataset::new(matrix)
///     .with_name("expression.csv")
///     .with_threshold(0.001);
/// assert_eq!(dataset.name(), Some("expression.csv"));
/// assert!(!dataset.anti());
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    name: Option<String>,
    anti: bool,
    threshold: Option<f64>,
    matrix: Matrix,
}

impl Dataset {
    /// Creates an unnamed, non-anti dataset with no threshold of its own.
    pub fn new(matrix: Matrix) -> Self {
        Self {
            name: None,
            anti: false,
            threshold: None,
            matrix,
        }
    }

    /// Sets the dataset name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks the dataset as an (anti-)association measurement.
    pub fn with_anti(mut self, anti: bool) -> Self {
        self.anti = anti;
        self
    }

    /// Sets the dataset's own significance threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Returns the dataset name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns true for anti-association datasets.
    pub fn anti(&self) -> bool {
        self.anti
    }

    /// Returns the dataset's own threshold, if any.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Returns the association matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
}
