//! Relationship graph data model.
//!
//! A [`RelationshipGraph`] is produced once per scan by whatever extracts
//! relationships from documents, and is read-only while a layout runs. Node
//! order is insertion order and is load-bearing: every order-sensitive step
//! of the layout iterates nodes and edges in the order they were added here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// Lightweight record describing one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    id: Id,
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
}

impl GraphNode {
    /// Creates a node record.
    pub fn new(id: Id, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            category: category.into(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Display title of the entity.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-form category label (e.g. the kind of document).
    pub fn category(&self) -> &str {
        &self.category
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A directed relationship between two entities.
///
/// Direction, `document`, `index` and `weight` are carried through for
/// consumers; connectivity for layout purposes ignores all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    source: Id,
    target: Id,
    /// Id of the document the relationship was extracted from.
    #[serde(default)]
    document: String,
    /// Position of the relationship within its originating document.
    #[serde(default)]
    index: usize,
    #[serde(default = "default_weight")]
    weight: f64,
}

impl RelationshipEdge {
    /// Creates an edge with an empty originating document, index 0 and weight 1.
    pub fn new(source: Id, target: Id) -> Self {
        Self {
            source,
            target,
            document: String::new(),
            index: 0,
            weight: default_weight(),
        }
    }

    /// Sets the originating document and sequence index.
    pub fn with_document(mut self, document: impl Into<String>, index: usize) -> Self {
        self.document = document.into();
        self.index = index;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns `true` if the edge starts and ends at the same entity.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Ordered mapping of entities plus an ordered list of edges.
///
/// The graph allows self-loops and duplicate edges. It does not check that
/// edge endpoints exist in the node map; the layout engine reports such
/// edges as faults.
///
/// # Examples
///
/// ```
/// use constellation_core::graph::{GraphNode, RelationshipEdge, RelationshipGraph};
/// use constellation_core::identifier::Id;
///
/// let mut graph = RelationshipGraph::new();
/// let a = Id::new("a");
/// let b = Id::new("b");
/// graph.add_node(GraphNode::new(a, "A", "note"));
/// graph.add_node(GraphNode::new(b, "B", "note"));
/// graph.add_edge(RelationshipEdge::new(a, b));
///
/// assert_eq!(graph.nodes_count(), 2);
/// assert_eq!(graph.edges_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipGraph {
    nodes: IndexMap<Id, GraphNode>,
    edges: Vec<RelationshipEdge>,
}

impl RelationshipGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from node and edge lists, keeping their order.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = GraphNode>,
        edges: impl IntoIterator<Item = RelationshipEdge>,
    ) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        graph.edges.extend(edges);
        graph
    }

    /// Adds a node. A node with the same id replaces the earlier record but
    /// keeps its original position in the ordering.
    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.insert(node.id(), node);
    }

    pub fn add_edge(&mut self, edge: RelationshipEdge) {
        self.edges.push(edge);
    }

    /// Returns the node record for the given id, if it exists.
    pub fn node(&self, id: Id) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns the input-order index of a node.
    pub fn node_index(&self, id: Id) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    /// Iterates node records in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Iterates node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes.keys().copied()
    }

    pub fn edges(&self) -> &[RelationshipEdge] {
        &self.edges
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
