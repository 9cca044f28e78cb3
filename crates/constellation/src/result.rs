//! Layout results and run statistics.

use std::time::Duration;

use glam::DVec3;
use indexmap::IndexMap;

use constellation_core::identifier::Id;

use crate::{clustering::Cluster, error::ConstellationError};

/// Summary of a single layout run.
///
/// All counters are zero and `refinement_successful` is `true` for an empty
/// result.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStatistics {
    computation_time: Duration,
    cluster_count: usize,
    node_count: usize,
    edge_count: usize,
    standalone_count: usize,
    largest_cluster_size: usize,
    average_cluster_size: f64,
    refinement_successful: bool,
    remaining_overlaps: usize,
    total_displacement: f64,
    refinement_iterations: usize,
}

impl Default for LayoutStatistics {
    fn default() -> Self {
        Self {
            computation_time: Duration::ZERO,
            cluster_count: 0,
            node_count: 0,
            edge_count: 0,
            standalone_count: 0,
            largest_cluster_size: 0,
            average_cluster_size: 0.0,
            refinement_successful: true,
            remaining_overlaps: 0,
            total_displacement: 0.0,
            refinement_iterations: 0,
        }
    }
}

impl LayoutStatistics {
    /// Derives the cluster counters from the final clusters.
    pub(crate) fn from_clusters(clusters: &[Cluster]) -> Self {
        let cluster_count = clusters.len();
        let clustered: usize = clusters.iter().map(Cluster::size).sum();
        let largest_cluster_size = clusters.iter().map(Cluster::size).max().unwrap_or(0);
        let average_cluster_size = if cluster_count == 0 {
            0.0
        } else {
            clustered as f64 / cluster_count as f64
        };

        Self {
            cluster_count,
            largest_cluster_size,
            average_cluster_size,
            ..Self::default()
        }
    }

    pub(crate) fn with_graph_counts(
        mut self,
        nodes: usize,
        edges: usize,
        standalone: usize,
    ) -> Self {
        self.node_count = nodes;
        self.edge_count = edges;
        self.standalone_count = standalone;
        self
    }

    pub(crate) fn with_refinement(
        mut self,
        remaining_overlaps: usize,
        total_displacement: f64,
        iterations: usize,
    ) -> Self {
        self.refinement_successful = remaining_overlaps == 0;
        self.remaining_overlaps = remaining_overlaps;
        self.total_displacement = total_displacement;
        self.refinement_iterations = iterations;
        self
    }

    pub(crate) fn with_computation_time(mut self, elapsed: Duration) -> Self {
        self.computation_time = elapsed;
        self
    }

    /// Wall-clock time spent in the layout run.
    pub fn computation_time(&self) -> Duration {
        self.computation_time
    }

    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of nodes placed outside any cluster.
    pub fn standalone_count(&self) -> usize {
        self.standalone_count
    }

    pub fn largest_cluster_size(&self) -> usize {
        self.largest_cluster_size
    }

    /// Mean member count over all clusters, `0.0` without clusters.
    pub fn average_cluster_size(&self) -> f64 {
        self.average_cluster_size
    }

    /// `true` iff refinement left no overlapping cluster pair.
    pub fn refinement_successful(&self) -> bool {
        self.refinement_successful
    }

    pub fn remaining_overlaps(&self) -> usize {
        self.remaining_overlaps
    }

    /// Sum of angular center moves applied during refinement, in radians.
    pub fn total_displacement(&self) -> f64 {
        self.total_displacement
    }

    pub fn refinement_iterations(&self) -> usize {
        self.refinement_iterations
    }
}

/// The outcome of a layout run.
///
/// A result is either complete, or empty with the fault that caused it kept
/// in [`failure`](Self::failure).
#[derive(Debug, Default)]
pub struct LayoutResult {
    node_positions: IndexMap<Id, DVec3>,
    clusters: Vec<Cluster>,
    stats: LayoutStatistics,
    failure: Option<ConstellationError>,
}

impl LayoutResult {
    pub(crate) fn new(
        node_positions: IndexMap<Id, DVec3>,
        clusters: Vec<Cluster>,
        stats: LayoutStatistics,
    ) -> Self {
        Self {
            node_positions,
            clusters,
            stats,
            failure: None,
        }
    }

    /// An empty result with zero-valued statistics.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An empty result that records why the layout could not be computed.
    pub(crate) fn failed(failure: ConstellationError, elapsed: Duration) -> Self {
        Self {
            stats: LayoutStatistics::default().with_computation_time(elapsed),
            failure: Some(failure),
            ..Self::default()
        }
    }

    /// Replaces the position map, e.g. with the output of
    /// [`fallback_fill`](crate::fallback_fill).
    pub fn with_node_positions(mut self, node_positions: IndexMap<Id, DVec3>) -> Self {
        self.node_positions = node_positions;
        self
    }

    /// World-space positions keyed by node id, in input node order.
    pub fn node_positions(&self) -> &IndexMap<Id, DVec3> {
        &self.node_positions
    }

    /// Final clusters, ordered by cluster id.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn stats(&self) -> &LayoutStatistics {
        &self.stats
    }

    /// The fault that produced an empty result, if any.
    pub fn failure(&self) -> Option<&ConstellationError> {
        self.failure.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// The cluster containing `id`, or `None` for standalone or unknown ids.
    pub fn cluster_of(&self, id: Id) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.contains(id))
    }
}
