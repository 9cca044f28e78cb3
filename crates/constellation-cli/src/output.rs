//! Writing layout results as TOML.
//!
//! The document has a `[stats]` table followed by `[[clusters]]` and
//! `[[positions]]` arrays. Positions appear in input node order; standalone
//! nodes have no `cluster` key.

use serde::Serialize;

use constellation::{ConstellationError, DVec3, LayoutResult, LayoutStatistics, clustering::Cluster};

#[derive(Debug, Serialize)]
struct LayoutFile {
    stats: StatsRecord,
    clusters: Vec<ClusterRecord>,
    positions: Vec<PositionRecord>,
}

#[derive(Debug, Serialize)]
struct StatsRecord {
    computation_time_ms: f64,
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

#[derive(Debug, Serialize)]
struct ClusterRecord {
    id: usize,
    size: usize,
    radius: f64,
    color: String,
    center: DVec3,
    members: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PositionRecord {
    id: String,
    x: f64,
    y: f64,
    z: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster: Option<usize>,
}

impl From<&LayoutStatistics> for StatsRecord {
    fn from(stats: &LayoutStatistics) -> Self {
        Self {
            computation_time_ms: stats.computation_time().as_secs_f64() * 1000.0,
            cluster_count: stats.cluster_count(),
            node_count: stats.node_count(),
            edge_count: stats.edge_count(),
            standalone_count: stats.standalone_count(),
            largest_cluster_size: stats.largest_cluster_size(),
            average_cluster_size: stats.average_cluster_size(),
            refinement_successful: stats.refinement_successful(),
            remaining_overlaps: stats.remaining_overlaps(),
            total_displacement: stats.total_displacement(),
            refinement_iterations: stats.refinement_iterations(),
        }
    }
}

impl From<&Cluster> for ClusterRecord {
    fn from(cluster: &Cluster) -> Self {
        Self {
            id: cluster.id(),
            size: cluster.size(),
            radius: cluster.radius(),
            color: cluster.color().to_string(),
            center: cluster.center(),
            members: cluster.members().iter().map(|id| id.to_string()).collect(),
        }
    }
}

/// Renders a layout result as a TOML document.
///
/// # Errors
///
/// Returns [`ConstellationError::Config`] if serialization fails.
pub fn render_layout(result: &LayoutResult) -> Result<String, ConstellationError> {
    let positions = result
        .node_positions()
        .iter()
        .map(|(&id, position)| PositionRecord {
            id: id.to_string(),
            x: position.x,
            y: position.y,
            z: position.z,
            cluster: result.cluster_of(id).map(Cluster::id),
        })
        .collect();

    let file = LayoutFile {
        stats: result.stats().into(),
        clusters: result.clusters().iter().map(ClusterRecord::from).collect(),
        positions,
    };

    toml::to_string(&file)
        .map_err(|e| ConstellationError::Config(format!("Failed to serialize layout: {e}")))
}

#[cfg(test)]
mod tests {
    use constellation::{
        ConstellationBuilder,
        graph::{GraphNode, RelationshipEdge, RelationshipGraph},
        identifier::Id,
    };

    use super::*;

    #[test]
    fn test_render_layout_sections() {
        let mut graph = RelationshipGraph::new();
        for name in ["out-a", "out-b", "out-solo"] {
            graph.add_node(GraphNode::new(Id::new(name), name, "note"));
        }
        graph.add_edge(RelationshipEdge::new(Id::new("out-a"), Id::new("out-b")));

        let result = ConstellationBuilder::default().compute_layout(&graph);
        let rendered = render_layout(&result).unwrap();
        let parsed: toml::Table = toml::from_str(&rendered).unwrap();

        assert!(parsed["stats"].is_table());
        assert_eq!(parsed["clusters"].as_array().unwrap().len(), 1);

        let positions = parsed["positions"].as_array().unwrap();
        assert_eq!(positions.len(), 3);
        assert_eq!(positions[0]["id"].as_str(), Some("out-a"));
        assert_eq!(positions[0]["cluster"].as_integer(), Some(0));
        assert!(positions[2].get("cluster").is_none());

        let center = parsed["clusters"][0]["center"].as_array().unwrap();
        assert_eq!(center.len(), 3);
        assert!(center.iter().all(|c| c.as_float().is_some()));
    }

    #[test]
    fn test_render_empty_layout() {
        let rendered = render_layout(&LayoutResult::empty()).unwrap();
        let parsed: toml::Table = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed["stats"]["node_count"].as_integer(), Some(0));
        assert_eq!(parsed["stats"]["refinement_successful"].as_bool(), Some(true));
    }
}
