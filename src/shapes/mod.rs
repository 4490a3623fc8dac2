//! Collision shape derivation from actor geometry.
//!
//! A tracked body carries a shape descriptor (circle flag and optional
//! normalized outline); the concrete [`CollisionShape`] handed to the engine
//! is rebuilt from the actor's current size on demand.

use crate::math::{vec2, Vec2};
use crate::units::UnitConverter;

/// A collision shape in world units, positioned relative to its body origin
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// A circle centered on the body origin
    Circle {
        /// Radius in world units
        radius: f32,
    },

    /// A convex polygon with counter-clockwise vertices relative to the
    /// body origin
    Polygon {
        /// Vertices in world units
        vertices: Vec<Vec2>,
    },
}

/// Derives the collision shape for an actor of the given screen size.
///
/// Precedence: circle flag, then explicit outline, then an axis-aligned box.
/// An outline with fewer than 3 vertices is treated as absent rather than
/// rejected. The circle is centered on the body origin; the body itself is
/// positioned at the actor's center for circles, so box and polygon vertices
/// keep the actor's top-left origin convention instead.
pub fn derive_shape(
    is_circle: bool,
    outline: Option<&[Vec2]>,
    width: f32,
    height: f32,
    converter: &UnitConverter,
) -> CollisionShape {
    if is_circle {
        return CollisionShape::Circle {
            radius: converter.to_world(width.min(height) / 2.0),
        };
    }

    if let Some(outline) = outline.filter(|o| o.len() >= 3) {
        let vertices = outline
            .iter()
            .map(|v| converter.to_world_vec(vec2(v.x * width, v.y * height)))
            .collect();
        return CollisionShape::Polygon { vertices };
    }

    let w = converter.to_world(width);
    let h = converter.to_world(height);
    CollisionShape::Polygon {
        vertices: vec![vec2(0.0, 0.0), vec2(w, 0.0), vec2(w, h), vec2(0.0, h)],
    }
}
