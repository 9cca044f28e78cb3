//! Constellation - A layout engine that places relationship graphs on a sphere.
//!
//! Connected nodes gather into clusters that claim spherical caps sized by
//! their share of the graph, while nodes without relationships spread over
//! the whole surface. The pipeline clusters the graph, positions clusters on
//! a Fibonacci lattice, lays out each cluster in its tangent plane, projects
//! that layout onto the sphere and finally pushes overlapping clusters apart.

pub mod clustering;
pub mod config;
pub mod layout;
pub mod sphere;

mod error;
mod orchestrator;
mod result;

pub use constellation_core::{color, geometry, graph, identifier};

pub use error::ConstellationError;
pub use orchestrator::{fallback_fill, validate};
pub use result::{LayoutResult, LayoutStatistics};

/// Vector type for sphere directions and world-space positions.
pub use glam::DVec3;

use indexmap::IndexMap;
use log::info;

use config::LayoutConfig;
use graph::RelationshipGraph;
use identifier::Id;

/// Builder for computing constellation layouts.
///
/// This holds the layout configuration and exposes the layout pipeline along
/// with the validation helpers a caller needs to make sure every known node
/// ends up with a position.
///
/// # Examples
///
/// ```rust
/// use constellation::{
///     ConstellationBuilder,
///     config::LayoutConfig,
///     graph::{GraphNode, RelationshipEdge, RelationshipGraph},
///     identifier::Id,
/// };
///
/// let mut graph = RelationshipGraph::new();
/// graph.add_node(GraphNode::new(Id::new("intro"), "Introduction", "chapter"));
/// graph.add_node(GraphNode::new(Id::new("setup"), "Setup", "chapter"));
/// graph.add_edge(RelationshipEdge::new(Id::new("intro"), Id::new("setup")));
///
/// // With custom config
/// let config = LayoutConfig::default().with_sphere_radius(100.0);
/// let builder = ConstellationBuilder::new(config);
///
/// let result = builder.compute_layout(&graph);
/// assert!(result.is_ok());
/// assert_eq!(result.node_positions().len(), 2);
///
/// // Or use default config
/// let builder = ConstellationBuilder::default();
/// ```
#[derive(Debug, Default)]
pub struct ConstellationBuilder {
    config: LayoutConfig,
}

impl ConstellationBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Layout configuration including force and refinement settings
    ///
    /// # Examples
    ///
    /// ```rust
    /// use constellation::{ConstellationBuilder, config::LayoutConfig};
    ///
    /// let config = LayoutConfig::default();
    /// let builder = ConstellationBuilder::new(config);
    /// ```
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a relationship graph on the sphere.
    ///
    /// This never fails. Any fault (an invalid configuration, an edge that
    /// references an unknown node, a non-finite coordinate) yields an empty
    /// result whose [`LayoutResult::failure`] names the cause.
    ///
    /// # Arguments
    ///
    /// * `graph` - The relationship graph to lay out
    ///
    /// # Examples
    ///
    /// ```rust
    /// use constellation::{
    ///     ConstellationBuilder,
    ///     graph::{GraphNode, RelationshipGraph},
    ///     identifier::Id,
    /// };
    ///
    /// let mut graph = RelationshipGraph::new();
    /// graph.add_node(GraphNode::new(Id::new("alone"), "Alone", "note"));
    ///
    /// let result = ConstellationBuilder::default().compute_layout(&graph);
    /// assert_eq!(result.stats().standalone_count(), 1);
    /// assert!(result.clusters().is_empty());
    /// ```
    pub fn compute_layout(&self, graph: &RelationshipGraph) -> LayoutResult {
        info!(nodes = graph.nodes_count(); "Laying out relationship graph");
        orchestrator::compute_layout(graph, &self.config)
    }

    /// Lay out a relationship graph, returning the fault instead of an
    /// empty result.
    ///
    /// # Errors
    ///
    /// Returns `ConstellationError` for an invalid configuration, an edge
    /// with an unknown endpoint, or a non-finite coordinate.
    pub fn try_compute_layout(
        &self,
        graph: &RelationshipGraph,
    ) -> Result<LayoutResult, ConstellationError> {
        orchestrator::try_compute_layout(graph, &self.config)
    }

    /// Ids from `known` that have no position, in `known` order.
    pub fn validate(&self, known: &[Id], positions: &IndexMap<Id, DVec3>) -> Vec<Id> {
        validate(known, positions)
    }

    /// Fill in a fallback position for every id in `known` that lacks one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use constellation::{ConstellationBuilder, identifier::Id};
    /// use indexmap::IndexMap;
    ///
    /// let builder = ConstellationBuilder::default();
    /// let known = [Id::new("a"), Id::new("b")];
    /// let positions = builder.fill_missing(&known, &IndexMap::new());
    /// assert!(builder.validate(&known, &positions).is_empty());
    /// ```
    pub fn fill_missing(
        &self,
        known: &[Id],
        existing: &IndexMap<Id, DVec3>,
    ) -> IndexMap<Id, DVec3> {
        fallback_fill(known, existing, &self.config)
    }
}
