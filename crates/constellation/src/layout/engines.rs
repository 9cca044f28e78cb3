//! Local layout engines
//!
//! A local layout engine arranges the members of a single cluster in a plane.
//! The result is normalized into the unit disk: the member furthest from the
//! origin sits at distance exactly 1 (unless every member shares one point),
//! and a single member sits at the origin. The projection step later scales
//! the disk to the cluster's angular territory.

mod force;
mod ring;

pub use force::Engine as Force;
pub use ring::Engine as Ring;

use indexmap::{IndexMap, IndexSet};

use constellation_core::{geometry::Point, identifier::Id};

use crate::config::{LayoutConfig, LocalEngineKind};

/// Positions of a cluster's members in its local plane, in member order.
pub type PlanarLayout = IndexMap<Id, Point>;

/// Trait defining the interface for local (per-cluster) layout engines
pub trait LocalLayoutEngine {
    /// Calculate a planar layout for one cluster.
    ///
    /// - `cluster_id`: Stable cluster identifier; engines that use randomness
    ///   seed it from this value.
    /// - `members`: Cluster members in input order. Every member must appear
    ///   in the returned layout.
    /// - `edges`: Edges with both endpoints inside the cluster, in input order.
    ///   Self-loops and duplicates may be present.
    fn calculate(
        &self,
        cluster_id: usize,
        members: &IndexSet<Id>,
        edges: &[(Id, Id)],
    ) -> PlanarLayout;
}

/// Builds the local layout engine selected by the configuration.
pub fn build_engine(config: &LayoutConfig) -> Box<dyn LocalLayoutEngine> {
    match config.local_engine() {
        LocalEngineKind::Force => Box::new(Force::new(config.force())),
        LocalEngineKind::Ring => Box::new(Ring::new()),
    }
}

/// Translates the layout so its bounding box is centered on the origin, then
/// scales it so the furthest member lies on the unit circle.
pub(crate) fn normalize_to_unit_disk(positions: &mut [Point]) {
    if positions.is_empty() {
        return;
    }

    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    for pos in positions.iter() {
        min_x = min_x.min(pos.x());
        min_y = min_y.min(pos.y());
        max_x = max_x.max(pos.x());
        max_y = max_y.max(pos.y());
    }

    let center = Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
    for pos in positions.iter_mut() {
        *pos = pos.sub_point(center);
    }

    let extent = positions.iter().map(|pos| pos.hypot()).fold(0.0, f64::max);
    if extent > f64::EPSILON {
        for pos in positions.iter_mut() {
            *pos = pos.scale(1.0 / extent);
        }
    } else {
        positions.fill(Point::default());
    }
}
