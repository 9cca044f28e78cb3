//! Reading relationship graphs from TOML files.
//!
//! A graph file lists nodes and edges as arrays of tables:
//!
//! ```toml
//! [[nodes]]
//! id = "intro"
//! title = "Introduction"
//! category = "chapter"
//!
//! [[edges]]
//! source = "intro"
//! target = "setup"
//! document = "intro.md"
//! index = 0
//! weight = 1.0
//! ```
//!
//! Only `id`, `source` and `target` are required.

use std::{fs, path::Path};

use log::debug;
use serde::Deserialize;

use constellation::{
    ConstellationError,
    graph::{GraphNode, RelationshipEdge, RelationshipGraph},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GraphFile {
    nodes: Vec<GraphNode>,
    edges: Vec<RelationshipEdge>,
}

/// Parses a relationship graph from TOML source.
///
/// # Errors
///
/// Returns [`ConstellationError::Config`] if the document is not a valid
/// graph file.
pub fn parse_graph(source: &str) -> Result<RelationshipGraph, ConstellationError> {
    let file: GraphFile = toml::from_str(source)
        .map_err(|e| ConstellationError::Config(format!("Invalid graph file: {e}")))?;

    debug!(nodes = file.nodes.len(), edges = file.edges.len(); "Graph file parsed");
    Ok(RelationshipGraph::from_parts(file.nodes, file.edges))
}

/// Reads and parses a relationship graph file.
///
/// # Errors
///
/// Returns [`ConstellationError::Io`] if the file cannot be read and
/// [`ConstellationError::Config`] if it cannot be parsed.
pub fn read_graph(path: impl AsRef<Path>) -> Result<RelationshipGraph, ConstellationError> {
    let source = fs::read_to_string(path)?;
    parse_graph(&source)
}
