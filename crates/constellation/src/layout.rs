//! Layout phases of the constellation pipeline.
//!
//! - [`engines`] - planar layout of the members inside one cluster
//! - [`global`] - cluster centers and angular radii on the sphere
//! - [`refinement`] - overlap removal between placed clusters
//! - [`projection`] - mapping planar layouts onto cluster territory

pub mod engines;
pub mod global;
pub mod projection;
pub mod refinement;
