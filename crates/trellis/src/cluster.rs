//! Node-set clustering: edge lists into disjoint identifier clusters.
//!
//! Clustering is an ordered reduce over an explicitly owned mapping, NOT a
//! general union-find. Each dataset contributes one batch of identifiers per
//! role (sources, then targets); a batch is merged into the FIRST existing
//! cluster it overlaps, and no further clusters are examined for that batch.
//! Only the marker pass afterwards performs a true multi-way union. The
//! distinction is observable in the resulting grouping and must not be
//! "fixed" into associative behavior.

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use trellis_core::{edge::EdgeList, identifier::Id};

/// One cluster of node identifiers, destined to become a layout layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCluster {
    id: usize,
    members: IndexSet<Id>,
}

impl NodeCluster {
    /// Returns the cluster id, unique within one partition run.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the members in first-appearance order.
    pub fn members(&self) -> &IndexSet<Id> {
        &self.members
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true when the cluster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true when `id` is a member.
    pub fn contains(&self, id: Id) -> bool {
        self.members.contains(&id)
    }
}

/// Clustering engine grouping edge-list identifiers into layers.
#[derive(Debug, Default)]
pub struct Clusterer {
    join_markers: Vec<String>,
}

impl Clusterer {
    /// Creates a clusterer with the given ordered marker substrings.
    pub fn new(join_markers: Vec<String>) -> Self {
        Self { join_markers }
    }

    /// Partitions every identifier appearing in the edge lists into clusters.
    ///
    /// Batches are processed in edge-list order, sources before targets, so
    /// the resulting cluster order (and therefore layer order) follows the
    /// dataset order the caller supplied.
    pub fn partition(&self, edge_lists: &[EdgeList]) -> Vec<NodeCluster> {
        let mut sets: IndexMap<usize, IndexSet<Id>> = IndexMap::new();
        let mut next_id = 0usize;

        for edge_list in edge_lists {
            let sources: IndexSet<Id> = edge_list.sources().collect();
            let targets: IndexSet<Id> = edge_list.targets().collect();
            for batch in [sources, targets] {
                let overlapping = sets
                    .iter()
                    .find(|(_, members)| batch.iter().any(|id| members.contains(id)))
                    .map(|(&id, _)| id);
                match overlapping {
                    Some(id) => {
                        trace!(cluster_id = id, batch_len = batch.len(); "Merging batch into first overlapping cluster");
                        sets.get_mut(&id)
                            .expect("Overlapping cluster id should exist")
                            .extend(batch);
                    }
                    None => {
                        trace!(cluster_id = next_id, batch_len = batch.len(); "Creating cluster");
                        sets.insert(next_id, batch);
                        next_id += 1;
                    }
                }
            }
        }

        // Marker pass: each marker unions every cluster that mentions it into
        // a fresh cluster, operating on the set as merged by earlier markers.
        for marker in &self.join_markers {
            let matching: Vec<usize> = sets
                .iter()
                .filter(|(_, members)| members.iter().any(|id| id.contains(marker)))
                .map(|(&id, _)| id)
                .collect();
            if matching.len() > 1 {
                debug!(marker = marker, clusters_len = matching.len(); "Joining clusters sharing marker");
                let mut joined = IndexSet::new();
                for id in &matching {
                    if let Some(members) = sets.shift_remove(id) {
                        joined.extend(members);
                    }
                }
                sets.insert(next_id, joined);
                next_id += 1;
            }
        }

        sets.retain(|_, members| !members.is_empty());
        debug!(clusters_len = sets.len(); "Partition complete");

        sets.into_iter()
            .map(|(id, members)| NodeCluster { id, members })
            .collect()
    }
}
