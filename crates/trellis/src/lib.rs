//! Trellis - layered layout for multi-dataset association networks.
//!
//! Trellis turns a collection of independently-measured association matrices
//! into a single drawable graph: edges filtered by significance threshold and
//! deduplicated for symmetric redundancy, nodes grouped into ordered layers
//! discovered across datasets, and both joined into positioned tables ready
//! for an external renderer.
//!
//! The pipeline runs strictly extraction → clustering → positioning →
//! joining; [`NetworkBuilder`] drives all four stages, and the stage modules
//! ([`extract`], [`cluster`], [`layout`], [`join`]) are public for callers
//! that need a single stage.

pub mod cluster;
pub mod config;
pub mod extract;
pub mod join;
pub mod layout;

mod error;

pub use trellis_core::{dataset, edge, identifier, matrix, position, warning};

pub use error::TrellisError;

use log::{debug, info};

use trellis_core::{
    dataset::Dataset, edge::DrawableEdge, position::NodePosition, warning::ConsistencyWarning,
};

use cluster::Clusterer;
use config::PipelineConfig;
use extract::{Extraction, Extractor};
use join::attach_positions;
use layout::Positioner;

/// A fully laid-out association network.
///
/// `nodes` and `edges` are the two output tables of the pipeline; `warnings`
/// collects every non-fatal condition observed while producing them.
#[derive(Debug)]
pub struct LayeredNetwork {
    pub nodes: Vec<NodePosition>,
    pub edges: Vec<DrawableEdge>,
    pub warnings: Vec<ConsistencyWarning>,
}

/// Builder for extracting and laying out association networks.
///
/// # Examples
///
/// ```
/// use trellis::{NetworkBuilder, config::PipelineConfig};
/// use trellis::{dataset::Dataset, identifier::Id, matrix::Matrix};
///
/// let matrix = Matrix::from_rows(
///     vec![Id::new("p1")],
///     vec![(Id::new("g1"), vec![Some(0.01)])],
/// )
/// .unwrap();
/// let dataset = Dataset::new(matrix)
///     .with_name("assoc.csv")
///     .with_threshold(0.05);
///
/// let builder = NetworkBuilder::new(PipelineConfig::default());
/// let network = builder.build(&[dataset]).expect("Failed to build network");
///
/// assert_eq!(network.edges.len(), 1);
/// assert_eq!(network.nodes.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    config: PipelineConfig,
}

impl NetworkBuilder {
    /// Creates a new network builder with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Extracts the edge list of a single dataset.
    ///
    /// This runs only the extraction stage; use [`NetworkBuilder::build`] for
    /// the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::DatasetRelevance`] when the configured focal
    /// identifier appears on neither axis of the dataset.
    pub fn extract(&self, dataset: &Dataset) -> Result<Extraction, TrellisError> {
        Extractor::new(self.config.extract().clone()).extract(dataset)
    }

    /// Runs the full pipeline over the datasets and returns the laid-out
    /// network.
    ///
    /// Datasets are processed in order; their order is observable in the
    /// resulting layer order.
    ///
    /// # Errors
    ///
    /// Returns the first fatal extraction error. Non-fatal conditions are
    /// collected into [`LayeredNetwork::warnings`] instead.
    pub fn build(&self, datasets: &[Dataset]) -> Result<LayeredNetwork, TrellisError> {
        info!(datasets_len = datasets.len(); "Extracting edge lists");
        let extractor = Extractor::new(self.config.extract().clone());
        let mut edge_lists = Vec::with_capacity(datasets.len());
        let mut warnings = Vec::new();
        for dataset in datasets {
            let extraction = extractor.extract(dataset)?;
            warnings.extend(extraction.warnings);
            edge_lists.push(extraction.edge_list);
        }
        debug!(edge_lists_len = edge_lists.len(); "Edge lists extracted");

        info!("Clustering node sets");
        let clusterer = Clusterer::new(self.config.layout().join_markers().to_vec());
        let partition = clusterer.partition(&edge_lists);
        debug!(clusters_len = partition.len(); "Node sets clustered");

        info!("Positioning layers");
        let positioner = Positioner::new()
            .with_canvas(self.config.layout().width(), self.config.layout().height());
        let nodes = positioner.position(&partition, self.config.extract().selected());
        debug!(nodes_len = nodes.len(); "Nodes positioned");

        info!("Joining edges with node positions");
        let (edges, join_warnings) = attach_positions(&edge_lists, &nodes);
        warnings.extend(join_warnings);

        info!(
            nodes_len = nodes.len(),
            edges_len = edges.len(),
            warnings_len = warnings.len();
            "Network built",
        );

        Ok(LayeredNetwork {
            nodes,
            edges,
            warnings,
        })
    }
}
