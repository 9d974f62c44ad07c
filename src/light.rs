//! Lighting types for the renderer.

use crate::math::vec3::Vec3;

/// A point light used for per-vertex diffuse lighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 10.0, 10.0))
    }
}

impl PointLight {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Cosine of the angle between the surface normal and the direction to
    /// the light.
    ///
    /// The result is not clamped: surfaces facing away from the light get a
    /// negative term, which darkens the shaded color to black when packed.
    pub fn n_dot_l(&self, world_position: Vec3, world_normal: Vec3) -> f32 {
        let light_direction = (self.position - world_position).normalize();
        world_normal.normalize().dot(light_direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direct_illumination() {
        let light = PointLight::new(Vec3::new(0.0, 0.0, 10.0));
        let intensity = light.n_dot_l(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(intensity, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_back_facing_is_negative() {
        let light = PointLight::new(Vec3::new(0.0, 0.0, 10.0));
        let intensity = light.n_dot_l(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(intensity, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_angled_illumination() {
        // Light straight above, normal at 45 degrees
        let light = PointLight::new(Vec3::new(0.0, 10.0, 0.0));
        let intensity = light.n_dot_l(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0));
        assert_relative_eq!(intensity, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
    }
}
