//! Vector and matrix math for the transform pipeline.

pub mod mat4;
pub mod vec2;
pub mod vec3;

/// Linearly interpolates from `a` to `b`.
///
/// `t` is not clamped, so values outside `[0, 1]` extrapolate.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
