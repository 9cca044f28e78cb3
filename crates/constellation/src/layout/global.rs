//! Global positioning of clusters on the sphere.
//!
//! Each cluster claims a spherical cap whose area is its share of all nodes
//! times the configured coverage budget, floored at the cap of `min_radius`.
//! Centers come from the Fibonacci lattice: clusters are stably sorted by
//! descending size and zipped with `fibonacci_sphere(cluster_count)` by
//! index. The sort only fixes placement order; it does not promise that
//! large clusters get better separated points. Overlaps are left for
//! refinement to resolve.

use log::debug;

use crate::{
    clustering::{Cluster, ClusterSeed},
    config::LayoutConfig,
    sphere::{SPHERE_AREA, area_to_radius, fibonacci_sphere, spherical_cap_area},
};

/// Angular radius for a cluster of `size` members out of `total_nodes`.
///
/// `radius = area_to_radius(max(cap(min_radius), coverage · 4π · size / total))`.
pub fn cluster_radius(size: usize, total_nodes: usize, config: &LayoutConfig) -> f64 {
    let floor_area = spherical_cap_area(config.min_radius());
    let share = if total_nodes == 0 {
        0.0
    } else {
        size as f64 / total_nodes as f64
    };
    let area = (config.coverage_factor() * SPHERE_AREA * share).max(floor_area);
    area_to_radius(area)
}

/// Assigns every seed a center and angular radius.
///
/// The returned clusters keep the input (cluster id) order; only the choice
/// of Fibonacci point follows the size ordering.
pub fn position_clusters(
    seeds: Vec<ClusterSeed>,
    total_nodes: usize,
    config: &LayoutConfig,
) -> Vec<Cluster> {
    let centers = fibonacci_sphere(seeds.len());

    let mut placement_order: Vec<usize> = (0..seeds.len()).collect();
    placement_order.sort_by(|&a, &b| seeds[b].size().cmp(&seeds[a].size()));

    let mut slot_of = vec![0; seeds.len()];
    for (slot, &seed_idx) in placement_order.iter().enumerate() {
        slot_of[seed_idx] = slot;
    }

    let clusters: Vec<Cluster> = seeds
        .into_iter()
        .enumerate()
        .map(|(seed_idx, seed)| {
            let radius = cluster_radius(seed.size(), total_nodes, config);
            let center = centers[slot_of[seed_idx]];
            Cluster::place(seed, center, radius)
        })
        .collect();

    for cluster in &clusters {
        debug!(
            cluster_id = cluster.id(),
            size = cluster.size(),
            radius = cluster.radius(),
            center:? = cluster.center();
            "Cluster positioned"
        );
    }

    clusters
}
