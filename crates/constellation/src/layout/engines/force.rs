//! Force-directed local layout engine
//!
//! This module implements a spring embedding for the members of a cluster.
//! Edges pull their endpoints toward a rest length, every pair of members
//! pushes apart, and the per-step movement limit decays geometrically so the
//! simulation settles within a bounded number of steps.

use indexmap::IndexSet;
use log::{debug, trace};
use rand::{Rng, SeedableRng, rngs::StdRng};

use constellation_core::{geometry::Point, identifier::Id};

use crate::config::ForceConfig;

use super::{LocalLayoutEngine, PlanarLayout, normalize_to_unit_disk};

/// Multiplier used to spread cluster ids across the seed space.
const SEED_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Distances below this are clamped when computing forces.
const MIN_DISTANCE: f64 = 1e-2;

/// Force layout engine for cluster members
///
/// Initial positions come from a grid with seeded jitter, so the same
/// members, edges, cluster id and configuration always produce the same
/// layout.
pub struct Engine {
    // Simulation parameters
    iterations: usize,
    spring_constant: f64,
    repulsion_constant: f64,
    ideal_edge_length: f64,
    // Step schedule
    initial_step: f64,
    step_decay: f64,
    convergence_threshold: f64,
    seed: u64,
}

impl Engine {
    /// Create a new force layout engine from configuration
    pub fn new(config: &ForceConfig) -> Self {
        Self {
            iterations: config.iterations(),
            spring_constant: config.spring_constant(),
            repulsion_constant: config.repulsion_constant(),
            ideal_edge_length: config.ideal_edge_length(),
            initial_step: config.initial_step(),
            step_decay: config.step_decay(),
            convergence_threshold: config.convergence_threshold(),
            seed: config.seed(),
        }
    }

    /// Place members on a grid with seeded jitter
    fn initialize_positions(&self, cluster_id: usize, count: usize) -> Vec<Point> {
        let cluster_seed = (cluster_id as u64).wrapping_mul(SEED_SPREAD);
        let mut rng = StdRng::seed_from_u64(self.seed ^ cluster_seed);

        let grid_size = (count as f64).sqrt().ceil() as usize;
        let cell_size = self.ideal_edge_length;
        let jitter = cell_size * 0.2;

        (0..count)
            .map(|i| {
                let row = i / grid_size;
                let col = i % grid_size;

                let base = Point::new(col as f64 * cell_size, row as f64 * cell_size);
                let offset = Point::new(
                    rng.random_range(-jitter..jitter),
                    rng.random_range(-jitter..jitter),
                );

                base.add_point(offset)
            })
            .collect()
    }

    /// Run the spring simulation and return member positions in member order
    fn run_force_simulation(
        &self,
        cluster_id: usize,
        count: usize,
        springs: &[(usize, usize)],
    ) -> Vec<Point> {
        let mut positions = self.initialize_positions(cluster_id, count);
        let mut step_limit = self.initial_step;
        let mut steps_run = 0;

        for iteration in 0..self.iterations {
            let mut forces = vec![Point::default(); count];

            // Repulsion between every pair of members
            for i in 0..count {
                for j in (i + 1)..count {
                    let delta = positions[i].sub_point(positions[j]);
                    let distance = delta.hypot().max(MIN_DISTANCE);
                    let magnitude = self.repulsion_constant / (distance * distance);
                    let push = delta.scale(magnitude / distance);

                    forces[i] = forces[i].add_point(push);
                    forces[j] = forces[j].sub_point(push);
                }
            }

            // Springs along edges
            for &(source, target) in springs {
                if source == target {
                    continue;
                }
                let delta = positions[target].sub_point(positions[source]);
                let distance = delta.hypot().max(MIN_DISTANCE);
                let magnitude = self.spring_constant * (distance - self.ideal_edge_length);
                let pull = delta.scale(magnitude / distance);

                forces[source] = forces[source].add_point(pull);
                forces[target] = forces[target].sub_point(pull);
            }

            // Move each member, never further than the current step limit
            let mut max_move: f64 = 0.0;
            for (position, force) in positions.iter_mut().zip(&forces) {
                let length = force.hypot();
                let movement = if length > step_limit {
                    force.scale(step_limit / length)
                } else {
                    *force
                };
                *position = position.add_point(movement);
                max_move = max_move.max(movement.hypot());
            }

            steps_run = iteration + 1;
            step_limit *= self.step_decay;

            trace!(cluster_id, iteration, max_move; "Force step");
            if max_move < self.convergence_threshold {
                break;
            }
        }

        debug!(cluster_id, member_count = count, steps_run; "Force layout finished");
        positions
    }
}

impl LocalLayoutEngine for Engine {
    fn calculate(
        &self,
        cluster_id: usize,
        members: &IndexSet<Id>,
        edges: &[(Id, Id)],
    ) -> PlanarLayout {
        let count = members.len();
        if count <= 1 {
            return members.iter().map(|&id| (id, Point::default())).collect();
        }

        let springs: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|(source, target)| {
                Some((members.get_index_of(source)?, members.get_index_of(target)?))
            })
            .collect();

        let mut positions = self.run_force_simulation(cluster_id, count, &springs);
        normalize_to_unit_disk(&mut positions);

        members.iter().copied().zip(positions).collect()
    }
}
