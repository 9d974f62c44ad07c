//! Look-at camera.
//!
//! # Coordinate System
//!
//! Uses a **left-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)
//!
//! The camera stores only an eye point and a target. The up vector is always
//! world +Y, so a camera looking straight up or down has no valid basis.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// Eye point and look-at target, both in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for Camera {
    /// Ten units back on +Z, looking at the origin.
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Moves eye and target together, keeping the viewing direction.
    pub fn translate(&mut self, delta: Vec3) {
        self.position = self.position + delta;
        self.target = self.target + delta;
    }

    /// Returns true when no view basis can be built from this camera:
    /// eye and target coincide, or the view direction is parallel to world up.
    pub fn is_degenerate(&self) -> bool {
        let direction = self.target - self.position;
        if direction.magnitude() <= f32::EPSILON {
            return true;
        }
        Vec3::UP.cross(direction.normalize()).magnitude() <= f32::EPSILON
    }

    /// Computes the view matrix for the rendering pipeline.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.position, self.target, Vec3::UP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn view_matrix_places_target_in_front() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO);
        let origin = camera.view_matrix() * Vec3::ZERO;
        assert_relative_eq!(origin.z, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn translate_moves_eye_and_target() {
        let mut camera = Camera::default();
        camera.translate(Vec3::new(0.05, 0.0, -0.2));
        assert_relative_eq!(camera.position.x, 0.05);
        assert_relative_eq!(camera.position.z, 9.8, epsilon = 1e-6);
        assert_relative_eq!(camera.target.x, 0.05);
        assert_relative_eq!(camera.target.z, -0.2);
    }

    #[test]
    fn degenerate_cameras_are_detected() {
        assert!(Camera::new(Vec3::ONE, Vec3::ONE).is_degenerate());
        assert!(Camera::new(Vec3::ZERO, Vec3::new(0.0, -3.0, 0.0)).is_degenerate());
        assert!(!Camera::default().is_degenerate());
    }
}
