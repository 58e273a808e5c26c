//! Edge-coordinate joining: edge lists plus node positions into drawable edges.

use std::collections::HashMap;

use log::{debug, warn};

use trellis_core::{
    edge::{DrawableEdge, EdgeList},
    identifier::Id,
    position::NodePosition,
    warning::ConsistencyWarning,
};

/// Attaches node coordinates to every edge of every edge list.
///
/// Edges whose source or target is missing from the position table pass
/// through with `None` coordinates and a consistency warning; they are never
/// silently dropped, since a mismatch between the node and edge universes is
/// a caller-visible condition.
pub fn attach_positions(
    edge_lists: &[EdgeList],
    nodes: &[NodePosition],
) -> (Vec<DrawableEdge>, Vec<ConsistencyWarning>) {
    let mut warnings = Vec::new();

    let points: HashMap<Id, (f64, f64)> = nodes
        .iter()
        .map(|node| (node.id, (node.x, node.y)))
        .collect();

    let mut drawable = Vec::new();
    let mut nan_count = 0usize;
    for edge_list in edge_lists {
        for edge in &edge_list.edges {
            if edge.value.is_nan() || edge.weight.is_nan() {
                nan_count += 1;
            }

            let source_point = points.get(&edge.source).copied();
            let target_point = points.get(&edge.target).copied();
            for (missing, point) in [(edge.source, source_point), (edge.target, target_point)] {
                if point.is_none() {
                    let provenance = edge
                        .provenance
                        .clone()
                        .unwrap_or_else(|| "<unnamed>".to_string());
                    warn!(
                        provenance = provenance,
                        source = edge.source.to_string(),
                        target = edge.target.to_string(),
                        missing = missing.to_string();
                        "Edge references an identifier absent from the node position table",
                    );
                    warnings.push(ConsistencyWarning::UnknownEndpoint {
                        provenance,
                        source: edge.source,
                        target: edge.target,
                        missing,
                    });
                }
            }

            drawable.push(DrawableEdge {
                edge: edge.clone(),
                x1: source_point.map(|(x, _)| x),
                y1: source_point.map(|(_, y)| y),
                x2: target_point.map(|(x, _)| x),
                y2: target_point.map(|(_, y)| y),
            });
        }
    }

    if nan_count > 0 {
        warn!(count = nan_count; "NaN values remain in the combined edge list");
        warnings.push(ConsistencyWarning::ResidualNan {
            context: "combined edge list".to_string(),
            count: nan_count,
        });
    }

    debug!(edges_len = drawable.len(); "Joined edges with node positions");
    (drawable, warnings)
}
