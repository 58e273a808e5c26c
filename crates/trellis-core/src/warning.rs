//! Non-fatal consistency conditions.
//!
//! Warnings are collected into pipeline outputs and logged as they occur;
//! they never change the shape of a result beyond the condition itself
//! (e.g. fewer surviving rows).

use thiserror::Error;

use crate::identifier::Id;

/// A non-fatal condition surfaced to the caller while processing continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsistencyWarning {
    /// A dataset arrived without a name; provenance on its edges is empty.
    #[error("dataset is unnamed; name datasets to keep provenance unambiguous")]
    UnnamedDataset,

    /// The selected-column filter removed every row of a dataset.
    #[error(
        "no rows of {dataset} survive filtering {selected} against {threshold}; \
         lowest value seen is {lowest_value:?} for {lowest_id:?}"
    )]
    NoSurvivingRows {
        dataset: String,
        selected: Id,
        threshold: f64,
        lowest_value: Option<f64>,
        lowest_id: Option<Id>,
    },

    /// NaN values survived into an edge list or the combined edge table.
    #[error("{count} NaN value(s) remain in {context}")]
    ResidualNan { context: String, count: usize },

    /// An edge references an identifier absent from the node position table.
    #[error(
        "edge {source} -> {target} from {provenance} references {missing}, \
         which is absent from the node position table"
    )]
    UnknownEndpoint {
        provenance: String,
        source: Id,
        target: Id,
        missing: Id,
    },
}
