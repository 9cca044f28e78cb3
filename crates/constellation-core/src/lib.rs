//! Constellation Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Constellation
//! layout engine and its front ends. It includes:
//!
//! - **Identifiers**: Interned entity identifiers ([`identifier::Id`])
//! - **Colors**: Cluster display colors ([`color::Color`])
//! - **Geometry**: Planar layout points ([`geometry`] module)
//! - **Graph**: The relationship graph data model ([`graph`] module)

pub mod color;
pub mod geometry;
pub mod graph;
pub mod identifier;
