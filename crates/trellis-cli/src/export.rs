//! JSON export of the laid-out network.
//!
//! Writes a `{nodes, edges}` document for a downstream renderer: the node
//! position table augmented with display labels, and the drawable edge table
//! with endpoint coordinates.

use std::{fs::File, io::BufWriter, path::Path};

use log::info;
use serde::Serialize;

use trellis::{LayeredNetwork, edge::DrawableEdge, position::NodePosition};

use crate::{error::CliError, label::format_label};

/// One exported node: its position row plus a display label.
#[derive(Debug, Serialize)]
struct NodeRecord {
    #[serde(flatten)]
    position: NodePosition,
    label: String,
}

/// The exported document.
#[derive(Debug, Serialize)]
struct NetworkDocument<'a> {
    nodes: Vec<NodeRecord>,
    edges: &'a [DrawableEdge],
}

/// Serializes the network as pretty-printed JSON at `path`.
///
/// # Errors
///
/// Returns [`CliError`] when the file cannot be created or the network fails
/// to serialize.
pub fn write_json(path: impl AsRef<Path>, network: &LayeredNetwork) -> Result<(), CliError> {
    let path = path.as_ref();
    let document = NetworkDocument {
        nodes: network
            .nodes
            .iter()
            .map(|&position| NodeRecord {
                position,
                label: format_label(&position.id.to_string()),
            })
            .collect(),
        edges: &network.edges,
    };

    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &document)?;

    info!(
        path = path.display().to_string(),
        nodes_len = document.nodes.len(),
        edges_len = document.edges.len();
        "Network exported",
    );
    Ok(())
}
