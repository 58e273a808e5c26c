//! Layer positioning: clusters into canvas coordinates.
//!
//! Each cluster becomes one vertical layer. Layers are spread evenly across
//! the canvas width in cluster order, members fan out over the canvas height,
//! and the cluster holding the focal identifier is forced into the middle
//! layer with the focal node moved to the list head before the member order
//! is reversed.

use log::debug;

use trellis_core::{identifier::Id, position::NodePosition};

use crate::cluster::NodeCluster;

/// Positioning engine assigning canvas coordinates to clustered nodes.
#[derive(Debug)]
pub struct Positioner {
    width: f64,
    height: f64,
}

impl Default for Positioner {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
        }
    }
}

impl Positioner {
    /// Creates a positioner with the default 1000x1000 canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the canvas size.
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Assigns a layer and coordinates to every cluster member.
    ///
    /// The running layer index reserves the middle layer for the focal
    /// cluster: a non-focal cluster that lands on the middle index is bumped
    /// one layer to the right, and the index then resumes from its saved
    /// pre-bump value. This is a single conditional increment; it does not
    /// cascade, so without a focal cluster the layer after the middle can be
    /// assigned twice.
    pub fn position(&self, clusters: &[NodeCluster], focus: Option<Id>) -> Vec<NodePosition> {
        let layer_count = clusters.len();
        if layer_count == 0 {
            return Vec::new();
        }
        let middle = layer_count / 2;
        debug!(
            layer_count = layer_count,
            middle = middle,
            focus:? = focus.map(|f| f.to_string());
            "Positioning layers",
        );

        let mut positions = Vec::new();
        let mut index = 0usize;
        for cluster in clusters {
            if cluster.is_empty() {
                continue;
            }
            let saved = index;

            let mut members: Vec<Id> = cluster.members().iter().copied().collect();
            let focal = focus.filter(|f| cluster.contains(*f));
            let layer = match focal {
                Some(f) => {
                    // The focal node goes to the head, then the whole list is
                    // reversed, leaving it last in the fan-out order.
                    members.retain(|&id| id != f);
                    members.insert(0, f);
                    members.reverse();
                    middle
                }
                None => {
                    if index == middle {
                        index += 1;
                    }
                    index
                }
            };

            let x = (self.width / layer_count as f64) * layer as f64;
            let count = members.len();
            for (rank, &id) in members.iter().enumerate() {
                let y = if count > 1 {
                    (self.height / (count - 1) as f64) * rank as f64
                } else {
                    self.height / 2.0
                };
                positions.push(NodePosition { id, layer, x, y });
            }

            index = if focal.is_some() { saved } else { saved + 1 };
        }

        debug!(nodes_len = positions.len(); "Layout complete");
        positions
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use crate::cluster::Clusterer;
    use trellis_core::edge::{Edge, EdgeList};

    use super::*;

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    fn clusters_of(groups: &[&[&str]]) -> Vec<NodeCluster> {
        // Build real clusters through the clusterer: one edge list per group,
        // sources and targets drawn from the same identifier pool so each
        // group collapses to a single cluster.
        let lists: Vec<EdgeList> = groups
            .iter()
            .map(|group| EdgeList {
                name: None,
                selected: None,
                threshold: 1.0,
                anti: false,
                edges: group
                    .iter()
                    .map(|&name| Edge {
                        source: id(name),
                        target: id(group[0]),
                        value: 0.01,
                        anti: false,
                        provenance: None,
                        direct: true,
                        weight: 1.0,
                    })
                    .collect(),
            })
            .collect();
        Clusterer::default().partition(&lists)
    }

    fn find(positions: &[NodePosition], name: &str) -> NodePosition {
        *positions
            .iter()
            .find(|p| p.id == id(name))
            .unwrap_or_else(|| panic!("no position for {name}"))
    }

    #[test]
    fn test_focal_cluster_takes_middle_layer() {
        let clusters = clusters_of(&[&["g1", "g2"], &["p1", "p2"], &["m1"]]);
        assert_eq!(clusters.len(), 3);

        let positions = Positioner::new().position(&clusters, Some(id("p1")));

        assert_eq!(find(&positions, "p1").layer, 1);
        assert_eq!(find(&positions, "p2").layer, 1);
        assert_eq!(find(&positions, "g1").layer, 0);
        // The non-focal cluster after the middle resumes at index 2.
        assert_eq!(find(&positions, "m1").layer, 2);
    }

    #[test]
    fn test_focal_member_order_is_front_then_reversed() {
        let clusters = clusters_of(&[&["a"], &["p1", "p2", "p3"]]);
        let positions = Positioner::new().position(&clusters, Some(id("p2")));

        // Members [p1, p2, p3] become [p2, p1, p3] and reverse to
        // [p3, p1, p2], so the focal node takes the bottom slot.
        assert_approx_eq!(f64, find(&positions, "p3").y, 0.0);
        assert_approx_eq!(f64, find(&positions, "p1").y, 500.0);
        assert_approx_eq!(f64, find(&positions, "p2").y, 1000.0);
    }

    #[test]
    fn test_no_focus_skips_middle_layer() {
        // The literal single-increment rule: with three clusters and no
        // focus, the middle index is skipped and layer 2 is used twice.
        let clusters = clusters_of(&[&["a"], &["b"], &["c"]]);
        let positions = Positioner::new().position(&clusters, None);

        assert_eq!(find(&positions, "a").layer, 0);
        assert_eq!(find(&positions, "b").layer, 2);
        assert_eq!(find(&positions, "c").layer, 2);
    }

    #[test]
    fn test_layer_x_spacing() {
        let clusters = clusters_of(&[&["a", "b"], &["p1"]]);
        let positions = Positioner::new()
            .with_canvas(800.0, 600.0)
            .position(&clusters, Some(id("p1")));

        // Two layers across 800: x = 400 * layer.
        assert_approx_eq!(f64, find(&positions, "a").x, 0.0);
        assert_approx_eq!(f64, find(&positions, "p1").x, 400.0);
    }

    #[test]
    fn test_member_fan_out() {
        let clusters = clusters_of(&[&["a", "b", "c"], &["p1"]]);
        let positions = Positioner::new().position(&clusters, Some(id("p1")));

        assert_approx_eq!(f64, find(&positions, "a").y, 0.0);
        assert_approx_eq!(f64, find(&positions, "b").y, 500.0);
        assert_approx_eq!(f64, find(&positions, "c").y, 1000.0);
    }

    #[test]
    fn test_singleton_sits_at_vertical_middle() {
        let clusters = clusters_of(&[&["a", "b"], &["p1"]]);
        let positions = Positioner::new().position(&clusters, Some(id("p1")));

        assert_approx_eq!(f64, find(&positions, "p1").y, 500.0);
    }

    #[test]
    fn test_every_member_positioned_once() {
        let clusters = clusters_of(&[&["a", "b"], &["p1", "p2"], &["m1"]]);
        let positions = Positioner::new().position(&clusters, Some(id("p1")));

        assert_eq!(positions.len(), 5);
    }

    #[test]
    fn test_empty_partition() {
        let positions = Positioner::new().position(&[], Some(id("p1")));
        assert!(positions.is_empty());
    }
}
