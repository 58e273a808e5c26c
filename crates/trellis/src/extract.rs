//! Edge extraction: one dataset into a filtered, deduplicated, weighted edge list.
//!
//! Extraction runs a fixed sequence over a working copy of the dataset's
//! matrix: orientation check, threshold/anti resolution, selected-column row
//! filtering, symmetric deduplication, flattening, a second threshold pass,
//! and weight normalization. The dataset itself is never mutated.

use std::collections::HashSet;

use log::{debug, trace, warn};

use trellis_core::{
    dataset::Dataset,
    edge::{Edge, EdgeList},
    identifier::Id,
    matrix::Matrix,
    warning::ConsistencyWarning,
};

use crate::{
    config::{ExtractOptions, KeepPolicy},
    error::TrellisError,
};

/// The outcome of extracting one dataset: the edge list plus the non-fatal
/// conditions observed along the way.
#[derive(Debug)]
pub struct Extraction {
    pub edge_list: EdgeList,
    pub warnings: Vec<ConsistencyWarning>,
}

/// Extraction engine turning datasets into edge lists.
///
/// The engine is configured once and reused across datasets; each call is a
/// pure function over the dataset it receives.
#[derive(Debug, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Creates an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Extracts the filtered, deduplicated, weighted edge list of one dataset.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::DatasetRelevance`] when a selected identifier
    /// appears on neither axis of the dataset's matrix.
    pub fn extract(&self, dataset: &Dataset) -> Result<Extraction, TrellisError> {
        let mut warnings = Vec::new();

        let name = dataset.name().map(str::to_owned);
        if name.is_none() {
            warn!("dataset is unnamed; name datasets to keep provenance unambiguous");
            warnings.push(ConsistencyWarning::UnnamedDataset);
        }
        let dataset_label = name.clone().unwrap_or_else(|| "<unnamed>".to_string());
        debug!(dataset = dataset_label; "Extracting edges");

        let mut matrix = dataset.matrix().clone();

        // Orientation check: the focus must sit on the column axis so its
        // cluster ends up in the middle column of the final layout.
        if let Some(selected) = self.options.selected() {
            if !matrix.has_col(selected) {
                if matrix.has_row(selected) {
                    debug!(
                        dataset = dataset_label,
                        selected = selected.to_string();
                        "Matrix is pivoted; transposing",
                    );
                    matrix = matrix.transposed();
                } else {
                    return Err(TrellisError::DatasetRelevance {
                        dataset: dataset_label,
                        selected,
                    });
                }
            }
        }

        let original_size = matrix.present_count();

        let threshold = self
            .options
            .threshold()
            .or(dataset.threshold())
            .unwrap_or_else(|| matrix.max_value().unwrap_or(f64::NEG_INFINITY));
        let anti = self.options.anti().unwrap_or(dataset.anti());
        trace!(threshold = threshold, anti = anti; "Resolved filter parameters");

        if let Some(selected) = self.options.selected() {
            self.filter_rows(&mut matrix, selected, threshold, &dataset_label, &mut warnings);
            debug!(
                dataset = dataset_label,
                original_size = original_size,
                reduced_size = matrix.present_count();
                "Filtered rows against the selected column",
            );
        }

        if self.options.keep() != KeepPolicy::Both {
            self.dedup_symmetric(&mut matrix);
        }

        // Flatten to triples, then re-apply the threshold: the selected-column
        // pass only filtered one column, and the other columns keep their
        // unfiltered values until this point.
        let drop = self.options.drop();
        let selected = self.options.selected();
        let mut edges: Vec<Edge> = matrix
            .entries()
            .filter(|&(_, _, value)| drop.keeps(value, threshold))
            .map(|(source, target, value)| Edge {
                source,
                target,
                value,
                anti,
                provenance: name.clone(),
                direct: selected.is_none_or(|s| source == s || target == s),
                weight: 1.0,
            })
            .collect();

        // Linear map of value onto [0.5, 1.0] within this edge list. When
        // min == max every weight stays at 1.0.
        let mut value_min = f64::INFINITY;
        let mut value_max = f64::NEG_INFINITY;
        for edge in &edges {
            value_min = value_min.min(edge.value);
            value_max = value_max.max(edge.value);
        }
        if value_min < value_max {
            for edge in &mut edges {
                edge.weight = 0.5 + 0.5 * ((edge.value - value_min) / (value_max - value_min));
            }
        }

        let nan_count = edges
            .iter()
            .filter(|edge| edge.value.is_nan() || edge.weight.is_nan())
            .count();
        if nan_count > 0 {
            warn!(dataset = dataset_label, count = nan_count; "NaN values remain in the edge list");
            warnings.push(ConsistencyWarning::ResidualNan {
                context: dataset_label.clone(),
                count: nan_count,
            });
        }

        debug!(dataset = dataset_label, edges_len = edges.len(); "Extraction complete");

        Ok(Extraction {
            edge_list: EdgeList {
                name,
                selected,
                threshold,
                anti,
                edges,
            },
            warnings,
        })
    }

    /// Drops the rows whose selected-column value is missing or fails the
    /// drop policy, then drops columns left with no values at all.
    fn filter_rows(
        &self,
        matrix: &mut Matrix,
        selected: Id,
        threshold: f64,
        dataset: &str,
        warnings: &mut Vec<ConsistencyWarning>,
    ) {
        // Lowest value of the selected column, captured before filtering so
        // the zero-rows warning can point at the nearest miss.
        let mut lowest: Option<(Id, f64)> = None;
        for row in matrix.row_labels() {
            if let Some(value) = matrix.get(row, selected) {
                if value.is_nan() {
                    continue;
                }
                match lowest {
                    Some((_, current)) if value >= current => {}
                    _ => lowest = Some((row, value)),
                }
            }
        }

        let drop = self.options.drop();
        let keep_rows: HashSet<Id> = matrix
            .row_labels()
            .filter(|&row| {
                matrix
                    .get(row, selected)
                    .is_some_and(|value| drop.keeps(value, threshold))
            })
            .collect();
        matrix.retain_rows(|row| keep_rows.contains(&row));

        if matrix.rows_len() == 0 {
            warn!(
                dataset = dataset,
                selected = selected.to_string(),
                threshold = threshold;
                "No rows survive filtering against the selected column",
            );
            warnings.push(ConsistencyWarning::NoSurvivingRows {
                dataset: dataset.to_string(),
                selected,
                threshold,
                lowest_value: lowest.map(|(_, value)| value),
                lowest_id: lowest.map(|(id, _)| id),
            });
        }

        matrix.drop_empty_columns();
    }

    /// Clears symmetric duplicates among distinct label pairs present on both
    /// axes. Both clear decisions are taken on the pre-read pair of values,
    /// so an equal-valued pair loses both cells.
    fn dedup_symmetric(&self, matrix: &mut Matrix) {
        let cols: Vec<Id> = matrix.col_labels().collect();
        let rows: Vec<Id> = matrix.row_labels().collect();
        let keep = self.options.keep();

        for &col in &cols {
            if !matrix.has_row(col) {
                continue;
            }
            for &row in &rows {
                if row == col || !matrix.has_col(row) {
                    continue;
                }
                let (Some(forward), Some(reverse)) = (matrix.get(row, col), matrix.get(col, row))
                else {
                    continue;
                };
                let (clear_forward, clear_reverse) = match keep {
                    KeepPolicy::Lower => (forward >= reverse, forward <= reverse),
                    KeepPolicy::Higher => (forward <= reverse, forward >= reverse),
                    KeepPolicy::Both => return,
                };
                if clear_forward {
                    matrix.clear(row, col);
                }
                if clear_reverse {
                    matrix.clear(col, row);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use crate::config::DropPolicy;

    use super::*;

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    fn single_column_dataset() -> Dataset {
        let matrix = Matrix::from_rows(
            vec![id("p1")],
            vec![
                (id("g1"), vec![Some(0.01)]),
                (id("g2"), vec![Some(0.02)]),
            ],
        )
        .unwrap();
        Dataset::new(matrix).with_name("assoc.csv").with_threshold(0.015)
    }

    #[test]
    fn test_selected_column_filtering() {
        let options = ExtractOptions::default().with_selected(id("p1"));
        let extraction = Extractor::new(options)
            .extract(&single_column_dataset())
            .unwrap();
        let edges = &extraction.edge_list.edges;

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, id("g1"));
        assert_eq!(edges[0].target, id("p1"));
        assert_approx_eq!(f64, edges[0].value, 0.01);
        assert!(!edges[0].anti);
        assert!(edges[0].direct);
        assert_approx_eq!(f64, edges[0].weight, 1.0);
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_pivoted_matrix_is_transposed() {
        // Same dataset but measured the other way around: p1 is a row.
        let matrix = Matrix::from_rows(
            vec![id("g1"), id("g2")],
            vec![(id("p1"), vec![Some(0.01), Some(0.02)])],
        )
        .unwrap();
        let dataset = Dataset::new(matrix).with_name("pivoted.csv").with_threshold(0.015);

        let options = ExtractOptions::default().with_selected(id("p1"));
        let extraction = Extractor::new(options).extract(&dataset).unwrap();
        let edges = &extraction.edge_list.edges;

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, id("g1"));
        assert_eq!(edges[0].target, id("p1"));
    }

    #[test]
    fn test_irrelevant_dataset_errors() {
        let options = ExtractOptions::default().with_selected(id("absent"));
        let err = Extractor::new(options)
            .extract(&single_column_dataset())
            .unwrap_err();

        match err {
            TrellisError::DatasetRelevance { dataset, selected } => {
                assert_eq!(dataset, "assoc.csv");
                assert_eq!(selected, id("absent"));
            }
            other => panic!("Expected DatasetRelevance, got {other:?}"),
        }
    }

    #[test]
    fn test_threshold_override_beats_dataset_threshold() {
        // The dataset threshold of 0.015 would keep only g1; the override
        // keeps both.
        let options = ExtractOptions::default()
            .with_selected(id("p1"))
            .with_threshold(0.5);
        let extraction = Extractor::new(options)
            .extract(&single_column_dataset())
            .unwrap();

        assert_eq!(extraction.edge_list.edges.len(), 2);
        assert_approx_eq!(f64, extraction.edge_list.threshold, 0.5);
    }

    #[test]
    fn test_missing_threshold_defaults_to_max() {
        // Without any threshold the maximum observed value becomes the
        // threshold; under a strict drop=higher the maximum cell itself
        // does not survive.
        let matrix = Matrix::from_rows(
            vec![id("p1")],
            vec![
                (id("g1"), vec![Some(0.01)]),
                (id("g2"), vec![Some(0.02)]),
            ],
        )
        .unwrap();
        let dataset = Dataset::new(matrix).with_name("nothreshold.csv");

        let extraction = Extractor::new(ExtractOptions::default())
            .extract(&dataset)
            .unwrap();

        assert_approx_eq!(f64, extraction.edge_list.threshold, 0.02);
        assert_eq!(extraction.edge_list.edges.len(), 1);
        assert_eq!(extraction.edge_list.edges[0].source, id("g1"));
    }

    #[test]
    fn test_anti_resolution() {
        let matrix = Matrix::from_rows(vec![id("p1")], vec![(id("g1"), vec![Some(0.01)])]).unwrap();
        let dataset = Dataset::new(matrix)
            .with_name("anti.csv")
            .with_anti(true)
            .with_threshold(1.0);

        let extraction = Extractor::new(ExtractOptions::default())
            .extract(&dataset)
            .unwrap();
        assert!(extraction.edge_list.anti);
        assert!(extraction.edge_list.edges[0].anti);

        let options = ExtractOptions::default().with_anti(false);
        let extraction = Extractor::new(options).extract(&dataset).unwrap();
        assert!(!extraction.edge_list.anti);
        assert!(!extraction.edge_list.edges[0].anti);
    }

    fn symmetric_dataset(a_b: f64, b_a: f64) -> Dataset {
        let matrix = Matrix::from_rows(
            vec![id("a"), id("b")],
            vec![
                (id("a"), vec![None, Some(a_b)]),
                (id("b"), vec![Some(b_a), None]),
            ],
        )
        .unwrap();
        Dataset::new(matrix).with_name("sym.csv").with_threshold(1.0)
    }

    #[test]
    fn test_dedup_keep_lower() {
        let extraction = Extractor::new(ExtractOptions::default())
            .extract(&symmetric_dataset(0.2, 0.4))
            .unwrap();
        let edges = &extraction.edge_list.edges;

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, id("a"));
        assert_eq!(edges[0].target, id("b"));
        assert_approx_eq!(f64, edges[0].value, 0.2);
    }

    #[test]
    fn test_dedup_keep_higher() {
        let options = ExtractOptions::new(DropPolicy::Higher, KeepPolicy::Higher);
        let extraction = Extractor::new(options)
            .extract(&symmetric_dataset(0.2, 0.4))
            .unwrap();
        let edges = &extraction.edge_list.edges;

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, id("b"));
        assert_eq!(edges[0].target, id("a"));
        assert_approx_eq!(f64, edges[0].value, 0.4);
    }

    #[test]
    fn test_dedup_equal_pair_drops_both() {
        // The literal tie rule: an equal-valued symmetric pair loses both
        // cells, under either asymmetric keep policy.
        let extraction = Extractor::new(ExtractOptions::default())
            .extract(&symmetric_dataset(0.3, 0.3))
            .unwrap();
        assert!(extraction.edge_list.is_empty());

        let options = ExtractOptions::new(DropPolicy::Higher, KeepPolicy::Higher);
        let extraction = Extractor::new(options)
            .extract(&symmetric_dataset(0.3, 0.3))
            .unwrap();
        assert!(extraction.edge_list.is_empty());
    }

    #[test]
    fn test_dedup_keep_both() {
        let options = ExtractOptions::new(DropPolicy::Higher, KeepPolicy::Both);
        let extraction = Extractor::new(options)
            .extract(&symmetric_dataset(0.2, 0.4))
            .unwrap();

        assert_eq!(extraction.edge_list.len(), 2);
    }

    #[test]
    fn test_direct_flags() {
        let matrix = Matrix::from_rows(
            vec![id("p1"), id("p2")],
            vec![
                (id("g1"), vec![Some(0.01), Some(0.02)]),
            ],
        )
        .unwrap();
        let dataset = Dataset::new(matrix).with_name("direct.csv").with_threshold(1.0);

        // Without a selection every edge is direct.
        let extraction = Extractor::new(ExtractOptions::default())
            .extract(&dataset)
            .unwrap();
        assert!(extraction.edge_list.edges.iter().all(|edge| edge.direct));

        // With a selection only edges touching it are direct.
        let options = ExtractOptions::default().with_selected(id("p1"));
        let extraction = Extractor::new(options).extract(&dataset).unwrap();
        let edges = &extraction.edge_list.edges;
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().any(|edge| edge.target == id("p1") && edge.direct));
        assert!(edges.iter().any(|edge| edge.target == id("p2") && !edge.direct));
    }

    #[test]
    fn test_weight_endpoints() {
        let matrix = Matrix::from_rows(
            vec![id("p1"), id("p2"), id("p3")],
            vec![(id("g1"), vec![Some(0.1), Some(0.2), Some(0.3)])],
        )
        .unwrap();
        let dataset = Dataset::new(matrix).with_name("weights.csv").with_threshold(1.0);

        let extraction = Extractor::new(ExtractOptions::default())
            .extract(&dataset)
            .unwrap();
        let edges = &extraction.edge_list.edges;

        assert_approx_eq!(f64, edges[0].weight, 0.5);
        assert_approx_eq!(f64, edges[1].weight, 0.75);
        assert_approx_eq!(f64, edges[2].weight, 1.0);
    }

    #[test]
    fn test_equal_values_all_weight_one() {
        let matrix = Matrix::from_rows(
            vec![id("p1"), id("p2")],
            vec![(id("g1"), vec![Some(0.2), Some(0.2)])],
        )
        .unwrap();
        let dataset = Dataset::new(matrix).with_name("flat.csv").with_threshold(1.0);

        let extraction = Extractor::new(ExtractOptions::default())
            .extract(&dataset)
            .unwrap();

        for edge in &extraction.edge_list.edges {
            assert_approx_eq!(f64, edge.weight, 1.0);
        }
    }

    #[test]
    fn test_unnamed_dataset_warns() {
        let matrix = Matrix::from_rows(vec![id("p1")], vec![(id("g1"), vec![Some(0.01)])]).unwrap();
        let dataset = Dataset::new(matrix).with_threshold(1.0);

        let extraction = Extractor::new(ExtractOptions::default())
            .extract(&dataset)
            .unwrap();

        assert!(extraction
            .warnings
            .contains(&ConsistencyWarning::UnnamedDataset));
        assert_eq!(extraction.edge_list.edges[0].provenance, None);
    }

    #[test]
    fn test_zero_surviving_rows_warns_with_lowest() {
        let options = ExtractOptions::default()
            .with_selected(id("p1"))
            .with_threshold(0.001);
        let extraction = Extractor::new(options)
            .extract(&single_column_dataset())
            .unwrap();

        assert!(extraction.edge_list.is_empty());
        match &extraction.warnings[0] {
            ConsistencyWarning::NoSurvivingRows {
                dataset,
                selected,
                lowest_value,
                lowest_id,
                ..
            } => {
                assert_eq!(dataset, "assoc.csv");
                assert_eq!(*selected, id("p1"));
                assert_eq!(*lowest_value, Some(0.01));
                assert_eq!(*lowest_id, Some(id("g1")));
            }
            other => panic!("Expected NoSurvivingRows, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_weights_stay_in_range(values in proptest::collection::vec(0.0f64..1.0, 2..40)) {
            let cols: Vec<Id> = (0..values.len()).map(|i| Id::new(&format!("c{i}"))).collect();
            let row: Vec<Option<f64>> = values.iter().map(|&v| Some(v)).collect();
            let matrix = Matrix::from_rows(cols, vec![(Id::new("r"), row)]).unwrap();
            let dataset = Dataset::new(matrix).with_name("prop.csv").with_threshold(2.0);

            let extraction = Extractor::new(ExtractOptions::default()).extract(&dataset).unwrap();
            for edge in &extraction.edge_list.edges {
                prop_assert!((0.5..=1.0).contains(&edge.weight));
            }
        }

        #[test]
        fn prop_drop_higher_keeps_below_threshold(
            values in proptest::collection::vec(0.0f64..1.0, 1..40),
            threshold in 0.1f64..0.9,
        ) {
            let cols: Vec<Id> = (0..values.len()).map(|i| Id::new(&format!("c{i}"))).collect();
            let row: Vec<Option<f64>> = values.iter().map(|&v| Some(v)).collect();
            let matrix = Matrix::from_rows(cols, vec![(Id::new("r"), row)]).unwrap();
            let dataset = Dataset::new(matrix).with_name("prop.csv").with_threshold(threshold);

            let extraction = Extractor::new(ExtractOptions::default()).extract(&dataset).unwrap();
            for edge in &extraction.edge_list.edges {
                prop_assert!(edge.value < threshold);
            }
        }
    }
}
