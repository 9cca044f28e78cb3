//! Connected-component clustering of the relationship graph.
//!
//! Edges are treated as undirected. Every connected component that contains
//! at least one edge becomes a [`ClusterSeed`]; nodes without any incident
//! edge are returned separately as standalone nodes.

use glam::DVec3;
use indexmap::IndexSet;
use log::{debug, trace};
use petgraph::{
    graph::{NodeIndex, UnGraph},
    visit::Bfs,
};

use constellation_core::{color::Color, graph::RelationshipGraph, identifier::Id};

use crate::error::ConstellationError;

/// A cluster before it has been placed on the sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSeed {
    id: usize,
    members: IndexSet<Id>,
    color: Color,
}

impl ClusterSeed {
    pub(crate) fn new(id: usize, members: IndexSet<Id>) -> Self {
        Self {
            id,
            members,
            color: Color::for_cluster(id),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Member ids in input node order.
    pub fn members(&self) -> &IndexSet<Id> {
        &self.members
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn into_parts(self) -> (usize, IndexSet<Id>, Color) {
        (self.id, self.members, self.color)
    }
}

/// A cluster placed on the unit sphere.
///
/// `center` is a unit vector and `radius` an angular radius in radians.
/// Members are disjoint across clusters and never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    id: usize,
    members: IndexSet<Id>,
    center: DVec3,
    radius: f64,
    color: Color,
}

impl Cluster {
    /// Places a seed at the given center with the given angular radius.
    pub(crate) fn place(seed: ClusterSeed, center: DVec3, radius: f64) -> Self {
        let (id, members, color) = seed.into_parts();
        Self {
            id,
            members,
            center,
            radius,
            color,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Member ids in input node order.
    pub fn members(&self) -> &IndexSet<Id> {
        &self.members
    }

    /// Unit vector pointing at the cluster's center.
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Angular radius in radians.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.members.contains(&id)
    }

    /// Returns the same cluster moved to a new center.
    pub(crate) fn with_center(mut self, center: DVec3) -> Self {
        self.center = center;
        self
    }
}

/// Output of [`detect_clusters`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clustering {
    clusters: Vec<ClusterSeed>,
    standalone: Vec<Id>,
}

impl Clustering {
    /// Clusters ordered by the input position of their first member.
    pub fn clusters(&self) -> &[ClusterSeed] {
        &self.clusters
    }

    /// Nodes with no incident edges, in input order.
    pub fn standalone(&self) -> &[Id] {
        &self.standalone
    }

    pub(crate) fn into_parts(self) -> (Vec<ClusterSeed>, Vec<Id>) {
        (self.clusters, self.standalone)
    }
}

/// Partitions the graph into connected components.
///
/// Traversal starts from each unvisited node in input order, so cluster ids
/// and member order depend only on the graph's node and edge order. A node
/// whose only edge is a self-loop counts as connected and forms a cluster of
/// one.
///
/// # Errors
///
/// Returns [`ConstellationError::UnknownEndpoint`] for the first edge whose
/// source or target is not in the node map.
pub fn detect_clusters(graph: &RelationshipGraph) -> Result<Clustering, ConstellationError> {
    let mut connectivity =
        UnGraph::<Id, ()>::with_capacity(graph.nodes_count(), graph.edges_count());
    for id in graph.node_ids() {
        connectivity.add_node(id);
    }

    for (edge_idx, edge) in graph.edges().iter().enumerate() {
        let source = endpoint_index(graph, edge_idx, edge.source())?;
        let target = endpoint_index(graph, edge_idx, edge.target())?;
        connectivity.add_edge(source, target, ());
    }

    let mut visited = vec![false; connectivity.node_count()];
    let mut clusters = Vec::new();
    let mut standalone = Vec::new();

    for start in connectivity.node_indices() {
        if visited[start.index()] {
            continue;
        }
        if connectivity.neighbors(start).next().is_none() {
            visited[start.index()] = true;
            standalone.push(connectivity[start]);
            continue;
        }

        let mut component = Vec::new();
        let mut bfs = Bfs::new(&connectivity, start);
        while let Some(node) = bfs.next(&connectivity) {
            visited[node.index()] = true;
            component.push(node);
        }
        component.sort_unstable();

        let members: IndexSet<Id> = component.iter().map(|&node| connectivity[node]).collect();
        trace!(cluster_id = clusters.len(), size = members.len(); "Component collected");
        clusters.push(ClusterSeed::new(clusters.len(), members));
    }

    debug!(
        cluster_count = clusters.len(),
        standalone_count = standalone.len();
        "Clusters detected"
    );

    Ok(Clustering {
        clusters,
        standalone,
    })
}

fn endpoint_index(
    graph: &RelationshipGraph,
    edge: usize,
    endpoint: Id,
) -> Result<NodeIndex, ConstellationError> {
    graph
        .node_index(endpoint)
        .map(NodeIndex::new)
        .ok_or(ConstellationError::UnknownEndpoint { edge, endpoint })
}

#[cfg(test)]
mod tests {
    use constellation_core::graph::{GraphNode, RelationshipEdge};

    use super::*;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> RelationshipGraph {
        RelationshipGraph::from_parts(
            nodes
                .iter()
                .map(|name| GraphNode::new(Id::new(name), *name, "note")),
            edges
                .iter()
                .map(|(s, t)| RelationshipEdge::new(Id::new(s), Id::new(t))),
        )
    }

    fn member_names(seed: &ClusterSeed) -> Vec<String> {
        seed.members().iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_empty_graph_yields_nothing() {
        let clustering = detect_clusters(&RelationshipGraph::new()).unwrap();
        assert!(clustering.clusters().is_empty());
        assert!(clustering.standalone().is_empty());
    }

    #[test]
    fn test_components_ignore_direction() {
        let g = graph(
            &["c1-a", "c1-b", "c1-c", "c1-d", "c1-e"],
            &[("c1-a", "c1-b"), ("c1-c", "c1-b"), ("c1-d", "c1-e")],
        );
        let clustering = detect_clusters(&g).unwrap();

        assert_eq!(clustering.clusters().len(), 2);
        assert_eq!(member_names(&clustering.clusters()[0]), ["c1-a", "c1-b", "c1-c"]);
        assert_eq!(member_names(&clustering.clusters()[1]), ["c1-d", "c1-e"]);
        assert!(clustering.standalone().is_empty());
    }

    #[test]
    fn test_isolated_nodes_are_standalone() {
        let g = graph(&["c2-lonely", "c2-x", "c2-y", "c2-other"], &[("c2-x", "c2-y")]);
        let clustering = detect_clusters(&g).unwrap();

        assert_eq!(clustering.clusters().len(), 1);
        let standalone: Vec<String> = clustering
            .standalone()
            .iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(standalone, ["c2-lonely", "c2-other"]);
    }

    #[test]
    fn test_members_follow_input_order() {
        // Edge order would make BFS visit "c3-z" first; members still follow node order.
        let g = graph(
            &["c3-a", "c3-m", "c3-z"],
            &[("c3-a", "c3-z"), ("c3-z", "c3-m")],
        );
        let clustering = detect_clusters(&g).unwrap();

        assert_eq!(member_names(&clustering.clusters()[0]), ["c3-a", "c3-m", "c3-z"]);
    }

    #[test]
    fn test_self_loop_forms_singleton_cluster() {
        let g = graph(&["c4-self", "c4-free"], &[("c4-self", "c4-self")]);
        let clustering = detect_clusters(&g).unwrap();

        assert_eq!(clustering.clusters().len(), 1);
        assert_eq!(clustering.clusters()[0].size(), 1);
        assert_eq!(clustering.standalone().len(), 1);
    }

    #[test]
    fn test_duplicate_edges_are_tolerated() {
        let g = graph(
            &["c5-a", "c5-b"],
            &[("c5-a", "c5-b"), ("c5-a", "c5-b"), ("c5-b", "c5-a")],
        );
        let clustering = detect_clusters(&g).unwrap();

        assert_eq!(clustering.clusters().len(), 1);
        assert_eq!(clustering.clusters()[0].size(), 2);
    }

    #[test]
    fn test_unknown_endpoint_is_reported() {
        let g = graph(&["c6-a", "c6-b"], &[("c6-a", "c6-b"), ("c6-b", "c6-ghost")]);

        match detect_clusters(&g) {
            Err(ConstellationError::UnknownEndpoint { edge, endpoint }) => {
                assert_eq!(edge, 1);
                assert_eq!(endpoint, "c6-ghost");
            }
            other => panic!("expected unknown endpoint error, got {other:?}"),
        }
    }

    #[test]
    fn test_cluster_ids_and_colors_are_sequential() {
        let g = graph(
            &["c7-a", "c7-b", "c7-c", "c7-d"],
            &[("c7-a", "c7-b"), ("c7-c", "c7-d")],
        );
        let clustering = detect_clusters(&g).unwrap();

        for (index, seed) in clustering.clusters().iter().enumerate() {
            assert_eq!(seed.id(), index);
            assert_eq!(seed.color(), Color::for_cluster(index));
        }
    }
}
