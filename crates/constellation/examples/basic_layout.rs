//! Example: Laying out a small relationship graph
//!
//! This example builds a relationship graph by hand, runs the layout with a
//! custom configuration and prints the resulting clusters and positions.

use constellation::{
    ConstellationBuilder,
    config::{LayoutConfig, RefinementConfig},
    graph::{GraphNode, RelationshipEdge, RelationshipGraph},
    identifier::Id,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building relationship graph...\n");

    let mut graph = RelationshipGraph::new();

    // Two groups of linked notes and one note nobody links to
    for (name, title) in [
        ("rust", "Rust"),
        ("ownership", "Ownership"),
        ("lifetimes", "Lifetimes"),
        ("coffee", "Coffee"),
        ("espresso", "Espresso"),
        ("todo", "Todo list"),
    ] {
        graph.add_node(GraphNode::new(Id::new(name), title, "note"));
    }

    for (index, (source, target)) in [
        ("rust", "ownership"),
        ("ownership", "lifetimes"),
        ("coffee", "espresso"),
    ]
    .into_iter()
    .enumerate()
    {
        graph.add_edge(
            RelationshipEdge::new(Id::new(source), Id::new(target))
                .with_document(format!("{source}.md"), index),
        );
    }

    println!("Graph:");
    println!("  Nodes: {}", graph.nodes_count());
    println!("  Edges: {}", graph.edges_count());
    println!();

    let config = LayoutConfig::default()
        .with_sphere_radius(1000.0)
        .with_refinement(RefinementConfig::default().with_padding(0.05));
    let builder = ConstellationBuilder::new(config);

    // Surface faults directly instead of receiving an empty result
    let result = builder.try_compute_layout(&graph)?;
    let stats = result.stats();

    println!("Layout computed in {:?}", stats.computation_time());
    println!("  Clusters: {}", stats.cluster_count());
    println!("  Standalone: {}", stats.standalone_count());
    println!("  Refinement successful: {}", stats.refinement_successful());
    println!();

    for cluster in result.clusters() {
        println!(
            "Cluster {} ({} members, radius {:.3} rad, color {})",
            cluster.id(),
            cluster.size(),
            cluster.radius(),
            cluster.color()
        );
    }
    println!();

    for (id, position) in result.node_positions() {
        println!(
            "{:>10}: ({:>9.2}, {:>9.2}, {:>9.2})",
            id.to_string(),
            position.x, position.y, position.z
        );
    }

    Ok(())
}
