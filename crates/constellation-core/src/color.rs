//! Display colors for clusters.
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Colors are display hints only; the layout engine never
//! reads them back.

use color::{AlphaColor, DynamicColor, Hsl};
use serde::{Serialize, Serializer};

/// Golden angle in degrees, used to spread consecutive hues around the wheel.
const GOLDEN_ANGLE_DEGREES: f32 = 137.507_76;

const CLUSTER_SATURATION: f32 = 65.0;
const CLUSTER_LIGHTNESS: f32 = 58.0;

/// Wrapper around the `DynamicColor` type from the color crate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Creates a fully opaque color from HSL components.
    ///
    /// `hue` is in degrees and wrapped into `[0, 360)`; `saturation` and
    /// `lightness` are percentages in `[0, 100]`.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let hue = hue.rem_euclid(360.0);
        let hsl = AlphaColor::<Hsl>::new([hue, saturation, lightness, 1.0]);
        Self {
            color: DynamicColor::from_alpha_color(hsl),
        }
    }

    /// Returns the display color for the cluster with the given index.
    ///
    /// Consecutive indices advance the hue by the golden angle, so any prefix
    /// of the sequence stays visually distinct.
    ///
    /// # Examples
    ///
    /// ```
    /// use constellation_core::color::Color;
    ///
    /// assert_eq!(Color::for_cluster(3), Color::for_cluster(3));
    /// assert_ne!(Color::for_cluster(0), Color::for_cluster(1));
    /// ```
    pub fn for_cluster(index: usize) -> Self {
        let hue = (index as f32 * GOLDEN_ANGLE_DEGREES).rem_euclid(360.0);
        Self::from_hsl(hue, CLUSTER_SATURATION, CLUSTER_LIGHTNESS)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_hsl(0.0, 0.0, 75.0)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
