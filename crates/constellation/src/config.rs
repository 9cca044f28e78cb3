//! Configuration types for Constellation layouts.
//!
//! This module provides the configuration structures that control how a
//! relationship graph is laid out on the sphere. All types implement
//! [`serde::Deserialize`] with per-field defaults, so a partial document
//! overrides only the values it names.
//!
//! # Overview
//!
//! - [`LayoutConfig`] - Top-level configuration: area budget, radius floor,
//!   world scale and local layout selection.
//! - [`ForceConfig`] - Tuning knobs of the force-directed local layout.
//! - [`RefinementConfig`] - Iteration and step budget of overlap refinement.
//!
//! # Example
//!
//! ```
//! # use constellation::config::LayoutConfig;
//! let config = LayoutConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.sphere_radius(), 5000.0);
//! ```

use std::f64::consts::PI;

use serde::Deserialize;

use crate::error::ConstellationError;

/// Local layout algorithm used inside each cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalEngineKind {
    /// Spring embedding driven by the cluster's internal edges.
    #[default]
    Force,
    /// Members spaced evenly on a circle in member order.
    Ring,
}

/// Top-level layout configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fraction of the sphere's area that clusters may claim in aggregate.
    coverage_factor: f64,

    /// Smallest angular radius (radians) any cluster receives.
    min_radius: f64,

    /// Radius of the output sphere in world units.
    sphere_radius: f64,

    /// Fraction of a cluster's angular radius its local layout may span.
    local_fill_ratio: f64,

    /// Local layout algorithm.
    local_engine: LocalEngineKind,

    /// Force-directed local layout section.
    force: ForceConfig,

    /// Overlap refinement section.
    refinement: RefinementConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            coverage_factor: 0.6,
            min_radius: 0.08,
            sphere_radius: 5000.0,
            local_fill_ratio: 0.85,
            local_engine: LocalEngineKind::default(),
            force: ForceConfig::default(),
            refinement: RefinementConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Returns the aggregate cluster area budget as a fraction of the sphere.
    pub fn coverage_factor(&self) -> f64 {
        self.coverage_factor
    }

    /// Returns the minimum cluster angular radius in radians.
    pub fn min_radius(&self) -> f64 {
        self.min_radius
    }

    /// Returns the output sphere radius in world units.
    pub fn sphere_radius(&self) -> f64 {
        self.sphere_radius
    }

    pub fn local_fill_ratio(&self) -> f64 {
        self.local_fill_ratio
    }

    pub fn local_engine(&self) -> LocalEngineKind {
        self.local_engine
    }

    pub fn force(&self) -> &ForceConfig {
        &self.force
    }

    pub fn refinement(&self) -> &RefinementConfig {
        &self.refinement
    }

    /// Set the aggregate cluster area budget
    pub fn with_coverage_factor(mut self, coverage_factor: f64) -> Self {
        self.coverage_factor = coverage_factor;
        self
    }

    /// Set the minimum cluster angular radius
    pub fn with_min_radius(mut self, min_radius: f64) -> Self {
        self.min_radius = min_radius;
        self
    }

    /// Set the output sphere radius
    pub fn with_sphere_radius(mut self, sphere_radius: f64) -> Self {
        self.sphere_radius = sphere_radius;
        self
    }

    /// Set the fraction of a cluster's radius used by its local layout
    pub fn with_local_fill_ratio(mut self, ratio: f64) -> Self {
        self.local_fill_ratio = ratio;
        self
    }

    /// Set the local layout algorithm
    pub fn with_local_engine(mut self, engine: LocalEngineKind) -> Self {
        self.local_engine = engine;
        self
    }

    pub fn with_force(mut self, force: ForceConfig) -> Self {
        self.force = force;
        self
    }

    pub fn with_refinement(mut self, refinement: RefinementConfig) -> Self {
        self.refinement = refinement;
        self
    }

    /// Checks every value against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`ConstellationError::InvalidConfig`] naming the first value
    /// that is out of range.
    pub fn validate(&self) -> Result<(), ConstellationError> {
        if !(self.coverage_factor > 0.0 && self.coverage_factor <= 1.0) {
            return Err(invalid(format!(
                "coverage_factor must be in (0, 1], got {}",
                self.coverage_factor
            )));
        }
        if !(self.min_radius > 0.0 && self.min_radius < PI) {
            return Err(invalid(format!(
                "min_radius must be in (0, π), got {}",
                self.min_radius
            )));
        }
        if !(self.sphere_radius > 0.0 && self.sphere_radius.is_finite()) {
            return Err(invalid(format!(
                "sphere_radius must be positive and finite, got {}",
                self.sphere_radius
            )));
        }
        if !(self.local_fill_ratio > 0.0 && self.local_fill_ratio <= 1.0) {
            return Err(invalid(format!(
                "local_fill_ratio must be in (0, 1], got {}",
                self.local_fill_ratio
            )));
        }
        self.force.validate()?;
        self.refinement.validate()
    }
}

fn invalid(message: String) -> ConstellationError {
    ConstellationError::InvalidConfig(message)
}

/// Force-directed local layout parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Hard cap on simulation steps.
    iterations: usize,
    spring_constant: f64,
    repulsion_constant: f64,
    /// Rest length of an edge spring, in simulation units.
    ideal_edge_length: f64,
    /// Largest move a node may make in the first step.
    initial_step: f64,
    /// Per-step multiplier applied to the step limit.
    step_decay: f64,
    /// The simulation stops early once no node moves further than this.
    convergence_threshold: f64,
    /// Base seed for initial jitter; mixed with the cluster id.
    seed: u64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            spring_constant: 0.08,
            repulsion_constant: 0.6,
            ideal_edge_length: 1.0,
            initial_step: 0.25,
            step_decay: 0.985,
            convergence_threshold: 1e-4,
            seed: 0x5EED,
        }
    }
}

impl ForceConfig {
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn spring_constant(&self) -> f64 {
        self.spring_constant
    }

    pub fn repulsion_constant(&self) -> f64 {
        self.repulsion_constant
    }

    pub fn ideal_edge_length(&self) -> f64 {
        self.ideal_edge_length
    }

    pub fn initial_step(&self) -> f64 {
        self.initial_step
    }

    pub fn step_decay(&self) -> f64 {
        self.step_decay
    }

    pub fn convergence_threshold(&self) -> f64 {
        self.convergence_threshold
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Set the number of iterations for the force simulation
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the spring constant for edge forces
    pub fn with_spring_constant(mut self, constant: f64) -> Self {
        self.spring_constant = constant;
        self
    }

    /// Set the repulsion constant for node forces
    pub fn with_repulsion_constant(mut self, constant: f64) -> Self {
        self.repulsion_constant = constant;
        self
    }

    /// Set the initial step limit and its per-step decay
    pub fn with_step(mut self, initial_step: f64, step_decay: f64) -> Self {
        self.initial_step = initial_step;
        self.step_decay = step_decay;
        self
    }

    /// Set the base seed for initial placement jitter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), ConstellationError> {
        if self.iterations == 0 {
            return Err(invalid("force.iterations must be at least 1".to_string()));
        }
        let positive = [
            ("force.spring_constant", self.spring_constant),
            ("force.repulsion_constant", self.repulsion_constant),
            ("force.ideal_edge_length", self.ideal_edge_length),
            ("force.initial_step", self.initial_step),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if !(self.step_decay > 0.0 && self.step_decay <= 1.0) {
            return Err(invalid(format!(
                "force.step_decay must be in (0, 1], got {}",
                self.step_decay
            )));
        }
        if !(self.convergence_threshold >= 0.0) {
            return Err(invalid(format!(
                "force.convergence_threshold must be non-negative, got {}",
                self.convergence_threshold
            )));
        }
        Ok(())
    }
}

/// Overlap refinement parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    /// Hard cap on refinement passes.
    max_iterations: usize,
    /// Fraction of a pair's overlap resolved per pass.
    step_factor: f64,
    /// Largest angular move (radians) a center may make in one pass.
    max_step: f64,
    /// Extra angular gap (radians) required between cluster edges.
    padding: f64,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            step_factor: 0.5,
            max_step: 0.25,
            padding: 0.0,
        }
    }
}

impl RefinementConfig {
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn step_factor(&self) -> f64 {
        self.step_factor
    }

    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Set the maximum number of refinement passes
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the per-pass step factor and step cap
    pub fn with_step(mut self, step_factor: f64, max_step: f64) -> Self {
        self.step_factor = step_factor;
        self.max_step = max_step;
        self
    }

    /// Set the extra gap required between clusters
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    fn validate(&self) -> Result<(), ConstellationError> {
        if self.max_iterations == 0 {
            return Err(invalid(
                "refinement.max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.step_factor > 0.0 && self.step_factor <= 1.0) {
            return Err(invalid(format!(
                "refinement.step_factor must be in (0, 1], got {}",
                self.step_factor
            )));
        }
        if !(self.max_step > 0.0 && self.max_step.is_finite()) {
            return Err(invalid(format!(
                "refinement.max_step must be positive and finite, got {}",
                self.max_step
            )));
        }
        if !(self.padding >= 0.0 && self.padding.is_finite()) {
            return Err(invalid(format!(
                "refinement.padding must be non-negative, got {}",
                self.padding
            )));
        }
        Ok(())
    }
}
