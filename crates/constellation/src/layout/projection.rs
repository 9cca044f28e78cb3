//! Projection of planar cluster layouts onto the sphere.
//!
//! A planar layout lives in the unit disk. Scaling it by the cluster's
//! angular radius times the fill ratio turns each position into a tangent
//! offset in radians; the exponential map at the cluster center then wraps
//! that offset onto the unit sphere, and the result is scaled to world units.

use glam::DVec3;
use indexmap::IndexMap;

use constellation_core::identifier::Id;

use crate::{
    clustering::Cluster,
    error::ConstellationError,
    layout::engines::PlanarLayout,
    sphere::{exponential_map, scale_to_sphere, tangent_basis},
};

/// Projects one cluster's planar layout to world-space positions.
///
/// # Errors
///
/// Returns [`ConstellationError::NonFinite`] if any planar or projected
/// coordinate is NaN or infinite.
pub fn project_cluster(
    cluster: &Cluster,
    layout: &PlanarLayout,
    fill_ratio: f64,
    sphere_radius: f64,
) -> Result<IndexMap<Id, DVec3>, ConstellationError> {
    let basis = tangent_basis(cluster.center());
    let extent = cluster.radius() * fill_ratio;

    layout
        .iter()
        .map(|(&id, &planar)| {
            if !planar.is_finite() {
                return Err(ConstellationError::NonFinite { id });
            }
            let on_sphere = exponential_map(cluster.center(), planar.scale(extent), basis);
            let world = scale_to_sphere(on_sphere, sphere_radius);
            if world.is_finite() {
                Ok((id, world))
            } else {
                Err(ConstellationError::NonFinite { id })
            }
        })
        .collect()
}
