//! Error types for trellis operations.
//!
//! This module provides the main error type [`TrellisError`]. Fatal errors
//! abort the offending dataset (configuration errors abort the whole call);
//! non-fatal conditions travel as
//! [`ConsistencyWarning`](trellis_core::warning::ConsistencyWarning) values
//! in the outputs instead.

use thiserror::Error;

use trellis_core::{identifier::Id, matrix::MatrixError};

/// The main error type for trellis operations.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// An option string does not name a known policy. Raised while parsing
    /// configuration, before any dataset is processed.
    #[error("invalid {option} policy {value:?}; expected {expected}")]
    Config {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    /// The selected identifier appears on neither axis of a dataset.
    #[error("selection {selected} not found in rows or columns of {dataset}; is this dataset relevant?")]
    DatasetRelevance { dataset: String, selected: Id },

    /// A malformed input matrix.
    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),
}
