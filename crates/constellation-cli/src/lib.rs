//! Constellation CLI library
//!
//! This module contains the core CLI logic for the Constellation layout tool.

pub mod error_adapter;
pub mod input;
pub mod output;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info, warn};

use constellation::{ConstellationBuilder, ConstellationError, identifier::Id};

/// Run the Constellation CLI application
///
/// This function reads the input graph, lays it out on the sphere and
/// writes the resulting layout to the output file. Nodes the engine left
/// without a position receive fallback positions.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ConstellationError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed graph files
/// - Layout faults
pub fn run(args: &Args) -> Result<(), ConstellationError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing graph"
    );

    let layout_config = config::load_config(args.config.as_ref())?;
    let graph = input::read_graph(&args.input)?;

    let builder = ConstellationBuilder::new(layout_config);
    let mut result = builder.try_compute_layout(&graph)?;

    let known: Vec<Id> = graph.node_ids().collect();
    let missing = builder.validate(&known, result.node_positions());
    if !missing.is_empty() {
        warn!(missing = missing.len(); "Layout left nodes without positions");
        let filled = builder.fill_missing(&known, result.node_positions());
        result = result.with_node_positions(filled);
    }

    if !result.stats().refinement_successful() {
        warn!(
            remaining_overlaps = result.stats().remaining_overlaps();
            "Some clusters still overlap"
        );
    }

    fs::write(&args.output, output::render_layout(&result)?)?;

    debug!(interned_ids = Id::interned_count(); "Identifier interner size");

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}
