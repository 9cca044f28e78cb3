//! The layout pipeline.
//!
//! A run threads its state through these phases in order: cluster, position
//! globally, lay out locally and project, place standalone nodes, refine,
//! re-project moved clusters, summarize. Each phase consumes the previous
//! phase's values and returns new ones.

use std::{collections::HashMap, time::Instant};

use glam::DVec3;
use indexmap::IndexMap;
use log::{debug, error, info, warn};

use constellation_core::{graph::RelationshipGraph, identifier::Id};

use crate::{
    clustering::{Cluster, detect_clusters},
    config::LayoutConfig,
    error::ConstellationError,
    layout::{
        engines::{LocalLayoutEngine, PlanarLayout, build_engine},
        global::position_clusters,
        projection::project_cluster,
        refinement::{center_moved, refine_clusters},
    },
    result::{LayoutResult, LayoutStatistics},
    sphere::{fibonacci_point, scale_to_sphere},
};

/// Computes a layout, converting any fault into an empty result.
///
/// The returned result carries the fault in [`LayoutResult::failure`]; this
/// function itself never fails.
pub fn compute_layout(graph: &RelationshipGraph, config: &LayoutConfig) -> LayoutResult {
    let started = Instant::now();
    match try_compute_layout(graph, config) {
        Ok(result) => result,
        Err(err) => {
            error!(err:% = err; "Layout failed, returning empty result");
            LayoutResult::failed(err, started.elapsed())
        }
    }
}

/// Computes a layout, returning the first fault encountered.
///
/// # Errors
///
/// Returns [`ConstellationError::InvalidConfig`] for an out-of-range
/// configuration, [`ConstellationError::UnknownEndpoint`] for an edge that
/// references a missing node, and [`ConstellationError::NonFinite`] if a
/// numeric fault produced an unusable coordinate.
pub fn try_compute_layout(
    graph: &RelationshipGraph,
    config: &LayoutConfig,
) -> Result<LayoutResult, ConstellationError> {
    let started = Instant::now();
    config.validate()?;

    info!(
        nodes = graph.nodes_count(),
        edges = graph.edges_count();
        "Computing constellation layout"
    );

    if graph.is_empty() {
        debug!("Empty graph, nothing to lay out");
        let stats = LayoutStatistics::default().with_computation_time(started.elapsed());
        return Ok(LayoutResult::new(IndexMap::new(), Vec::new(), stats));
    }

    let (seeds, standalone) = detect_clusters(graph)?.into_parts();
    let clusters = position_clusters(seeds, graph.nodes_count(), config);

    let engine = build_engine(config);
    let planar_layouts = layout_clusters(engine.as_ref(), graph, &clusters);

    let mut positions = IndexMap::with_capacity(graph.nodes_count());
    for (cluster, planar) in clusters.iter().zip(&planar_layouts) {
        positions.extend(project(cluster, planar, config)?);
    }
    positions.extend(place_standalone(&standalone, config));

    let report = refine_clusters(clusters.clone(), config.refinement());
    if !report.is_successful() {
        warn!(
            remaining_overlaps = report.remaining_overlaps(),
            iterations = report.iterations();
            "Cluster overlaps remain after refinement"
        );
    }

    let mut reprojected = 0;
    for ((before, after), planar) in clusters.iter().zip(report.clusters()).zip(&planar_layouts) {
        if center_moved(before.center(), after.center()) {
            positions.extend(project(after, planar, config)?);
            reprojected += 1;
        }
    }
    debug!(reprojected; "Moved clusters re-projected");

    positions.sort_by(|a, _, b, _| graph.node_index(*a).cmp(&graph.node_index(*b)));

    let stats = LayoutStatistics::from_clusters(report.clusters())
        .with_graph_counts(graph.nodes_count(), graph.edges_count(), standalone.len())
        .with_refinement(
            report.remaining_overlaps(),
            report.total_displacement(),
            report.iterations(),
        )
        .with_computation_time(started.elapsed());

    info!(
        clusters = stats.cluster_count(),
        standalone = stats.standalone_count(),
        refinement_successful = stats.refinement_successful(),
        elapsed_ms = stats.computation_time().as_millis() as u64;
        "Layout complete"
    );

    Ok(LayoutResult::new(positions, report.into_clusters(), stats))
}

/// Runs the local engine on every cluster, passing each one its internal
/// edges in input order.
fn layout_clusters(
    engine: &dyn LocalLayoutEngine,
    graph: &RelationshipGraph,
    clusters: &[Cluster],
) -> Vec<PlanarLayout> {
    let mut owner: HashMap<Id, usize> = HashMap::new();
    for (index, cluster) in clusters.iter().enumerate() {
        for &member in cluster.members() {
            owner.insert(member, index);
        }
    }

    let mut internal_edges: Vec<Vec<(Id, Id)>> = vec![Vec::new(); clusters.len()];
    for edge in graph.edges() {
        match (owner.get(&edge.source()), owner.get(&edge.target())) {
            (Some(&source), Some(&target)) if source == target => {
                internal_edges[source].push((edge.source(), edge.target()));
            }
            _ => {}
        }
    }

    clusters
        .iter()
        .zip(&internal_edges)
        .map(|(cluster, edges)| {
            let planar = engine.calculate(cluster.id(), cluster.members(), edges);
            debug!(
                cluster_id = cluster.id(),
                members = planar.len(),
                edges = edges.len();
                "Local layout computed"
            );
            planar
        })
        .collect()
}

fn project(
    cluster: &Cluster,
    planar: &PlanarLayout,
    config: &LayoutConfig,
) -> Result<IndexMap<Id, DVec3>, ConstellationError> {
    project_cluster(
        cluster,
        planar,
        config.local_fill_ratio(),
        config.sphere_radius(),
    )
}

/// Places standalone nodes on `fibonacci_sphere(standalone.len())` in order.
fn place_standalone(standalone: &[Id], config: &LayoutConfig) -> IndexMap<Id, DVec3> {
    let count = standalone.len();
    standalone
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            let point = fibonacci_point(index, count);
            (id, scale_to_sphere(point, config.sphere_radius()))
        })
        .collect()
}

/// Returns the ids of `known` that have no entry in `positions`, in the
/// order they appear in `known`.
pub fn validate(known: &[Id], positions: &IndexMap<Id, DVec3>) -> Vec<Id> {
    known
        .iter()
        .filter(|id| !positions.contains_key(*id))
        .copied()
        .collect()
}

/// Completes `existing` so every id in `known` has a position.
///
/// Existing positions are kept as they are. A missing id at index `k` of
/// `known` receives the `k`-th point of `fibonacci_sphere(known.len())`,
/// scaled to the configured sphere radius. The result lists `known` ids
/// first, in order, followed by any extra ids from `existing`.
pub fn fallback_fill(
    known: &[Id],
    existing: &IndexMap<Id, DVec3>,
    config: &LayoutConfig,
) -> IndexMap<Id, DVec3> {
    let count = known.len();
    let mut filled = 0;

    let mut positions: IndexMap<Id, DVec3> = known
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            let position = existing.get(&id).copied().unwrap_or_else(|| {
                filled += 1;
                scale_to_sphere(fibonacci_point(index, count), config.sphere_radius())
            });
            (id, position)
        })
        .collect();

    for (&id, &position) in existing {
        positions.entry(id).or_insert(position);
    }

    if filled > 0 {
        warn!(filled, known = count; "Filled missing node positions with fallback points");
    }

    positions
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use constellation_core::graph::{GraphNode, RelationshipEdge};

    use super::*;
    use crate::{config::LocalEngineKind, sphere::angular_distance};

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

    fn ids(names: &[&str]) -> Vec<Id> {
        names.iter().map(|name| Id::new(name)).collect()
    }

    #[test]
    fn test_positions_follow_input_order() {
        let g = graph(
            &["or-lonely", "or-a", "or-b", "or-c"],
            &[("or-c", "or-a"), ("or-a", "or-b")],
        );
        let result = try_compute_layout(&g, &LayoutConfig::default()).unwrap();

        let order: Vec<String> = result.node_positions().keys().map(|id| id.to_string()).collect();
        assert_eq!(order, ["or-lonely", "or-a", "or-b", "or-c"]);
    }

    #[test]
    fn test_nodes_stay_inside_their_cluster_cap() {
        let config = LayoutConfig::default().with_local_engine(LocalEngineKind::Ring);
        let g = graph(
            &["cap-a", "cap-b", "cap-c", "cap-d"],
            &[("cap-a", "cap-b"), ("cap-b", "cap-c"), ("cap-c", "cap-d")],
        );
        let result = try_compute_layout(&g, &config).unwrap();
        let cluster = &result.clusters()[0];

        for id in cluster.members() {
            let position = result.node_positions()[id];
            let angle = angular_distance(position, cluster.center());
            assert!(angle <= cluster.radius() * config.local_fill_ratio() + 1e-9);
        }
    }

    #[test]
    fn test_moved_clusters_are_reprojected() {
        // Three tiny clusters with huge caps overlap and must be pushed apart.
        let config = LayoutConfig::default()
            .with_coverage_factor(1.0)
            .with_local_engine(LocalEngineKind::Ring);
        let g = graph(
            &["mv-a", "mv-b", "mv-c", "mv-d", "mv-e", "mv-f"],
            &[("mv-a", "mv-b"), ("mv-c", "mv-d"), ("mv-e", "mv-f")],
        );
        let result = try_compute_layout(&g, &config).unwrap();

        assert!(result.stats().total_displacement() > 0.0);
        for cluster in result.clusters() {
            for id in cluster.members() {
                let angle = angular_distance(result.node_positions()[id], cluster.center());
                assert!(angle <= cluster.radius() * config.local_fill_ratio() + 1e-9);
            }
        }
    }

    #[test]
    fn test_standalone_nodes_use_their_own_lattice() {
        let config = LayoutConfig::default();
        let g = graph(&["sa-a", "sa-x", "sa-y", "sa-b"], &[("sa-x", "sa-y")]);
        let result = try_compute_layout(&g, &config).unwrap();

        let expected = scale_to_sphere(fibonacci_point(1, 2), config.sphere_radius());
        let actual = result.node_positions()[&Id::new("sa-b")];
        assert_approx_eq!(f64, actual.x, expected.x, epsilon = 1e-9);
        assert_approx_eq!(f64, actual.y, expected.y, epsilon = 1e-9);
        assert_approx_eq!(f64, actual.z, expected.z, epsilon = 1e-9);
        assert_eq!(result.stats().standalone_count(), 2);
    }

    #[test]
    fn test_unknown_endpoint_becomes_failure() {
        let g = graph(&["ue-a"], &[("ue-a", "ue-ghost")]);

        assert!(matches!(
            try_compute_layout(&g, &LayoutConfig::default()),
            Err(ConstellationError::UnknownEndpoint { .. })
        ));

        let result = compute_layout(&g, &LayoutConfig::default());
        assert!(!result.is_ok());
        assert!(result.node_positions().is_empty());
        assert!(result.stats().refinement_successful());
    }

    #[test]
    fn test_validate_lists_missing_in_known_order() {
        let known = ids(&["vl-c", "vl-a", "vl-b"]);
        let positions: IndexMap<Id, DVec3> =
            [(Id::new("vl-a"), DVec3::X)].into_iter().collect();

        let missing: Vec<String> = validate(&known, &positions)
            .iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(missing, ["vl-c", "vl-b"]);
    }

    #[test]
    fn test_fallback_fill_keeps_existing_and_fills_missing() {
        let config = LayoutConfig::default().with_sphere_radius(10.0);
        let known = ids(&["ff-a", "ff-b", "ff-c"]);
        let kept = DVec3::new(0.0, 0.0, 10.0);
        let existing: IndexMap<Id, DVec3> = [
            (Id::new("ff-b"), kept),
            (Id::new("ff-extra"), DVec3::new(10.0, 0.0, 0.0)),
        ]
        .into_iter()
        .collect();

        let filled = fallback_fill(&known, &existing, &config);

        assert_eq!(filled.len(), 4);
        assert_eq!(filled[&Id::new("ff-b")], kept);
        assert_eq!(
            filled[&Id::new("ff-c")],
            scale_to_sphere(fibonacci_point(2, 3), 10.0)
        );
        assert!(filled.contains_key(&Id::new("ff-extra")));
        assert!(validate(&known, &filled).is_empty());
    }
}
