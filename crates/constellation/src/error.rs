//! Error types for Constellation operations.
//!
//! This module provides the main error type [`ConstellationError`]. Internal
//! layout phases return it through `Result`; the public layout entry point
//! catches it and reports it through [`LayoutResult::failure`] instead.
//!
//! [`LayoutResult::failure`]: crate::LayoutResult::failure

use std::io;

use thiserror::Error;

use constellation_core::identifier::Id;

/// The main error type for Constellation operations.
#[derive(Debug, Error)]
pub enum ConstellationError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),

    #[error("Edge {edge} references unknown node `{endpoint}`")]
    UnknownEndpoint { edge: usize, endpoint: Id },

    #[error("Non-finite position computed for node `{id}`")]
    NonFinite { id: Id },
}
