//! Overlap refinement between placed clusters.
//!
//! Two clusters overlap when the angular separation of their centers is less
//! than the sum of their radii (plus the configured padding). Each pass
//! collects, for every overlapping pair, a push that moves both centers apart
//! along the great circle joining them, then applies all pushes at once. The
//! smaller cluster of a pair takes the larger share of the move. Passes stop
//! when no pair overlaps or the iteration budget runs out.
//!
//! Failing to resolve every overlap is not an error: the report carries the
//! number of pairs that still overlap and the caller decides how loudly to
//! complain.

use glam::DVec3;
use log::{debug, trace};

use crate::{
    clustering::Cluster,
    config::RefinementConfig,
    sphere::{angular_distance, move_along, tangent_basis},
};

/// Tangent directions shorter than this are treated as undefined.
const DIRECTION_EPSILON: f64 = 1e-12;

/// Extra separation (radians) aimed for beyond the exact required gap, so a
/// pair is pushed strictly past touching instead of approaching it forever.
const RESOLUTION_MARGIN: f64 = 1e-6;

/// Outcome of [`refine_clusters`].
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementReport {
    clusters: Vec<Cluster>,
    remaining_overlaps: usize,
    total_displacement: f64,
    iterations: usize,
}

impl RefinementReport {
    /// Clusters in their original order, possibly with moved centers.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }

    /// `true` iff no overlapping pair remains.
    pub fn is_successful(&self) -> bool {
        self.remaining_overlaps == 0
    }

    /// Number of cluster pairs that still overlap.
    pub fn remaining_overlaps(&self) -> usize {
        self.remaining_overlaps
    }

    /// Sum of the angular distances (radians) moved by all centers.
    pub fn total_displacement(&self) -> f64 {
        self.total_displacement
    }

    /// Number of passes that moved at least one center.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// Returns `true` if two clusters overlap under the given padding.
pub fn overlaps(a: &Cluster, b: &Cluster, padding: f64) -> bool {
    angular_distance(a.center(), b.center()) < a.radius() + b.radius() + padding
}

/// Counts overlapping cluster pairs.
pub fn count_overlaps(clusters: &[Cluster], padding: f64) -> usize {
    let mut count = 0;
    for (i, a) in clusters.iter().enumerate() {
        for b in &clusters[i + 1..] {
            if overlaps(a, b, padding) {
                count += 1;
            }
        }
    }
    count
}

/// Directions at `a` and at `b` pointing away from each other along the
/// great circle through both, or `None` if the pair is antipodal.
fn separating_directions(a: DVec3, b: DVec3) -> Option<(DVec3, DVec3)> {
    let away_from_b = a * a.dot(b) - b;
    let away_from_a = b * b.dot(a) - a;

    if away_from_b.length() > DIRECTION_EPSILON && away_from_a.length() > DIRECTION_EPSILON {
        return Some((away_from_b.try_normalize()?, away_from_a.try_normalize()?));
    }
    if a.dot(b) > 0.0 {
        // Coincident centers: split along an arbitrary tangent.
        let (tangent, _) = tangent_basis(a);
        return Some((tangent, -tangent));
    }
    None
}

/// Moves cluster centers apart until no pair overlaps or the iteration
/// budget is exhausted.
pub fn refine_clusters(clusters: Vec<Cluster>, config: &RefinementConfig) -> RefinementReport {
    let padding = config.padding();
    let mut centers: Vec<DVec3> = clusters.iter().map(Cluster::center).collect();
    let mut total_displacement = 0.0;
    let mut iterations = 0;

    for iteration in 0..config.max_iterations() {
        let mut pushes = vec![DVec3::ZERO; clusters.len()];
        let mut overlapping = 0;

        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                let separation = angular_distance(centers[i], centers[j]);
                let required = clusters[i].radius() + clusters[j].radius() + padding;
                if separation >= required {
                    continue;
                }
                overlapping += 1;

                let Some((away_i, away_j)) = separating_directions(centers[i], centers[j]) else {
                    continue;
                };

                let size_i = clusters[i].size() as f64;
                let size_j = clusters[j].size() as f64;
                let share_i = size_j / (size_i + size_j);
                let step = (required - separation + RESOLUTION_MARGIN) * config.step_factor();

                pushes[i] += away_i * (step * share_i);
                pushes[j] += away_j * (step * (1.0 - share_i));
            }
        }

        if overlapping == 0 {
            break;
        }

        let mut moved = false;
        for (center, push) in centers.iter_mut().zip(&pushes) {
            let distance = push.length().min(config.max_step());
            if distance <= DIRECTION_EPSILON {
                continue;
            }
            *center = move_along(*center, *push, distance);
            total_displacement += distance;
            moved = true;
        }

        trace!(iteration, overlapping, total_displacement; "Refinement pass");
        if !moved {
            break;
        }
        iterations = iteration + 1;
    }

    let clusters: Vec<Cluster> = clusters
        .into_iter()
        .zip(centers)
        .map(|(cluster, center)| cluster.with_center(center))
        .collect();
    let remaining_overlaps = count_overlaps(&clusters, padding);

    debug!(
        iterations,
        remaining_overlaps,
        total_displacement;
        "Refinement finished"
    );

    RefinementReport {
        clusters,
        remaining_overlaps,
        total_displacement,
        iterations,
    }
}

/// Returns `true` if `after` differs from `before` by a measurable angle.
pub(crate) fn center_moved(before: DVec3, after: DVec3) -> bool {
    angular_distance(before, after) > DIRECTION_EPSILON
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use indexmap::IndexSet;

    use constellation_core::identifier::Id;

    use super::*;
    use crate::clustering::ClusterSeed;

    fn cluster(id: usize, size: usize, center: DVec3, radius: f64) -> Cluster {
        let members: IndexSet<Id> = (0..size)
            .map(|i| Id::new(&format!("rf-{id}-{i}")))
            .collect();
        Cluster::place(ClusterSeed::new(id, members), center, radius)
    }

    fn unit(x: f64, y: f64, z: f64) -> DVec3 {
        DVec3::new(x, y, z).normalize()
    }

    #[test]
    fn test_separated_clusters_are_untouched() {
        let clusters = vec![cluster(0, 3, DVec3::X, 0.2), cluster(1, 3, DVec3::Y, 0.2)];
        let report = refine_clusters(clusters.clone(), &RefinementConfig::default());

        assert!(report.is_successful());
        assert_eq!(report.remaining_overlaps(), 0);
        assert_eq!(report.iterations(), 0);
        assert_eq!(report.total_displacement(), 0.0);
        assert_eq!(report.clusters(), clusters.as_slice());
    }

    #[test]
    fn test_resolvable_overlap_is_resolved() {
        let clusters = vec![
            cluster(0, 4, DVec3::X, 0.3),
            cluster(1, 4, unit(1.0, 0.2, 0.0), 0.3),
        ];
        assert_eq!(count_overlaps(&clusters, 0.0), 1);

        let report = refine_clusters(clusters, &RefinementConfig::default());

        assert!(report.is_successful());
        assert!(report.total_displacement() > 0.0);
        let [a, b] = report.clusters() else {
            panic!("expected two clusters");
        };
        assert!(angular_distance(a.center(), b.center()) >= 0.6);
        assert_approx_eq!(f64, a.center().length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_smaller_cluster_moves_further() {
        let big = cluster(0, 9, DVec3::X, 0.3);
        let small = cluster(1, 1, unit(1.0, 0.3, 0.0), 0.3);
        let config = RefinementConfig::default().with_max_iterations(1);

        let report = refine_clusters(vec![big, small], &config);
        let moved_big = angular_distance(report.clusters()[0].center(), DVec3::X);
        let moved_small = angular_distance(report.clusters()[1].center(), unit(1.0, 0.3, 0.0));

        assert!(moved_small > moved_big);
    }

    #[test]
    fn test_coincident_centers_are_split() {
        let clusters = vec![cluster(0, 2, DVec3::Z, 0.1), cluster(1, 2, DVec3::Z, 0.1)];
        let report = refine_clusters(clusters, &RefinementConfig::default());

        assert!(report.is_successful());
    }

    #[test]
    fn test_unresolvable_overlap_is_reported_honestly() {
        // Two hemispheres-plus cannot both fit on the sphere.
        let clusters = vec![cluster(0, 2, DVec3::Y, 2.0), cluster(1, 2, DVec3::X, 2.0)];
        let config = RefinementConfig::default().with_max_iterations(20);
        let report = refine_clusters(clusters, &config);

        assert!(!report.is_successful());
        assert_eq!(report.remaining_overlaps(), 1);
        assert_eq!(report.remaining_overlaps(), count_overlaps(report.clusters(), 0.0));
    }

    #[test]
    fn test_padding_widens_required_gap() {
        let clusters = vec![
            cluster(0, 1, DVec3::X, 0.2),
            cluster(1, 1, unit(1.0, 0.45, 0.0), 0.2),
        ];
        assert_eq!(count_overlaps(&clusters, 0.0), 0);
        assert_eq!(count_overlaps(&clusters, 0.2), 1);

        let config = RefinementConfig::default().with_padding(0.2);
        let report = refine_clusters(clusters, &config);
        assert!(report.is_successful());
    }
}
