/// 2D vector used throughout the bridge, in either screen or world units
/// depending on context.
pub type Vec2 = nalgebra::Vector2<f32>;

/// Shorthand constructor for [`Vec2`]
#[inline]
pub fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}
