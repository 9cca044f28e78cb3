//! Ring local layout engine
//!
//! Places members evenly on the unit circle in member order, starting at
//! angle zero. Edges are ignored. Useful when a cluster's internal structure
//! does not matter or force simulation is too costly.

use std::f64::consts::TAU;

use indexmap::IndexSet;

use constellation_core::{geometry::Point, identifier::Id};

use super::{LocalLayoutEngine, PlanarLayout};

/// Ring layout engine
#[derive(Debug, Default)]
pub struct Engine;

impl Engine {
    /// Create a new ring layout engine
    pub fn new() -> Self {
        Self
    }
}

impl LocalLayoutEngine for Engine {
    fn calculate(
        &self,
        _cluster_id: usize,
        members: &IndexSet<Id>,
        _edges: &[(Id, Id)],
    ) -> PlanarLayout {
        let count = members.len();
        if count <= 1 {
            return members.iter().map(|&id| (id, Point::default())).collect();
        }

        members
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let angle = TAU * i as f64 / count as f64;
                (id, Point::new(angle.cos(), angle.sin()))
            })
            .collect()
    }
}
