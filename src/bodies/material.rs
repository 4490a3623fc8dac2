#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Material properties baked into a fixture at creation time.
///
/// Changing any of these on a tracked body rebuilds the fixture; the engine
/// never mutates a live fixture's material in place.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Material {
    /// Density of the shape, used by the engine to derive mass
    pub density: f32,

    /// Coefficient of friction, 0-1
    pub friction: f32,

    /// Coefficient of restitution (bounciness), 0-1
    pub restitution: f32,
}

impl Material {
    /// Creates a new material with the specified properties
    pub fn new(density: f32, friction: f32, restitution: f32) -> Self {
        Self {
            density,
            friction,
            restitution,
        }
    }

    /// Creates a material for rubber (high friction, bouncy)
    pub fn rubber() -> Self {
        Self {
            density: 1.2,
            friction: 0.8,
            restitution: 0.7,
        }
    }

    /// Creates a material for wood (medium friction, little bounce)
    pub fn wood() -> Self {
        Self {
            density: 0.7,
            friction: 0.6,
            restitution: 0.2,
        }
    }

    /// Creates a material for ice (low friction, some bounce)
    pub fn ice() -> Self {
        Self {
            density: 0.9,
            friction: 0.05,
            restitution: 0.4,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.5,
            restitution: 0.3,
        }
    }
}
