use crate::math::Vec2;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Default scale: 50 screen units per 1 world unit.
pub const DEFAULT_SCALE_FACTOR: f32 = 1.0 / 50.0;

/// Converts lengths between screen units and physics-world units.
///
/// The inverse factor is cached so the hot screen-ward direction never
/// divides. Changing the factor at runtime only affects future conversions;
/// bodies and shapes already created keep their world-space dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct UnitConverter {
    scale: f32,
    inverse: f32,
}

impl UnitConverter {
    /// Creates a converter with the given screen-to-world scale factor
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            inverse: 1.0 / scale,
        }
    }

    /// Returns the current screen-to-world scale factor
    pub fn scale_factor(&self) -> f32 {
        self.scale
    }

    /// Replaces the scale factor, refreshing the cached inverse
    pub fn set_scale_factor(&mut self, scale: f32) {
        self.scale = scale;
        self.inverse = 1.0 / scale;
    }

    /// Converts a length from screen units to world units
    #[inline]
    pub fn to_world(&self, screen: f32) -> f32 {
        screen * self.scale
    }

    /// Converts a length from world units to screen units
    #[inline]
    pub fn to_screen(&self, world: f32) -> f32 {
        world * self.inverse
    }

    /// Converts a point or vector from screen units to world units
    #[inline]
    pub fn to_world_vec(&self, screen: Vec2) -> Vec2 {
        screen * self.scale
    }

    /// Converts a point or vector from world units to screen units
    #[inline]
    pub fn to_screen_vec(&self, world: Vec2) -> Vec2 {
        world * self.inverse
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE_FACTOR)
    }
}
