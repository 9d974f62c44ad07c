//! 4x4 homogeneous transformation matrix using column-major convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! A pipeline described as "world, then view, then projection" is therefore
//! written `projection * view * world`.
//!
//! # Example
//! ```ignore
//! let world = Mat4::translation(0.0, 0.0, 5.0) * Mat4::rotation_yaw_pitch_roll(yaw, pitch, roll);
//! let screen = (projection * view * world).transform_point(vertex);
//! ```

use std::ops::Mul;

use super::vec3::Vec3;

/// 4x4 matrix stored as `data[row][col]` with column-major convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column (column-major convention).
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the X axis (pitch).
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis (yaw).
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Z axis (roll).
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation from Euler angles.
    ///
    /// Roll is applied first, then pitch, then yaw. The order is fixed;
    /// changing it changes how animated meshes tumble.
    pub fn rotation_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        Mat4::rotation_y(yaw) * Mat4::rotation_x(pitch) * Mat4::rotation_z(roll)
    }

    /// Creates a left-handed perspective projection matrix.
    ///
    /// View-space depth in `[z_near, z_far]` maps to `[0, 1]` after the
    /// perspective divide, and `w` carries the view-space depth.
    ///
    /// # Arguments
    ///
    /// * `fov_y` - Vertical field of view in radians.
    /// * `aspect_ratio` - Width divided by height.
    /// * `z_near`, `z_far` - Must satisfy `0 < z_near < z_far`.
    pub fn perspective_lh(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        let cot = 1.0 / (fov_y * 0.5).tan();
        let a = z_far / (z_far - z_near);
        let b = (z_near * z_far) / (z_near - z_far);
        Mat4::new([
            [cot / aspect_ratio, 0.0, 0.0, 0.0],
            [0.0, cot, 0.0, 0.0],
            [0.0, 0.0, a, b],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Creates a view matrix with left-handed coordinate system.
    ///
    /// # Arguments
    ///
    /// * `eye` - The position of the camera.
    /// * `target` - The point the camera is looking at.
    /// * `up` - The up direction of the camera.
    ///
    /// # Returns
    ///
    /// A view matrix. If `target - eye` is parallel to `up` the basis is
    /// degenerate and the matrix contains NaN.
    pub fn look_at_lh(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let right = up.cross(forward).normalize();
        let up = forward.cross(right).normalize();

        Self::new([
            [right.x, right.y, right.z, -right.dot(eye)],
            [up.x, up.y, up.z, -up.dot(eye)],
            [forward.x, forward.y, forward.z, -forward.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Computes the inverse by Gauss-Jordan elimination with partial pivoting.
    /// Returns `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Mat4> {
        let mut m = self.data;
        let mut inv = Mat4::identity().data;

        for col in 0..4 {
            let pivot = (col..4).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
            if m[pivot][col].abs() < f32::EPSILON {
                return None;
            }
            m.swap(col, pivot);
            inv.swap(col, pivot);

            let scale = 1.0 / m[col][col];
            for k in 0..4 {
                m[col][k] *= scale;
                inv[col][k] *= scale;
            }

            for row in 0..4 {
                if row == col {
                    continue;
                }
                let factor = m[row][col];
                if factor == 0.0 {
                    continue;
                }
                for k in 0..4 {
                    m[row][k] -= factor * m[col][k];
                    inv[row][k] -= factor * inv[col][k];
                }
            }
        }

        Some(Mat4::new(inv))
    }

    /// Transforms a point (w = 1) and applies the perspective divide.
    ///
    /// The divide is unconditional; a point that lands on `w == 0` comes back
    /// with non-finite components.
    #[inline]
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        let d = &self.data;
        let x = d[0][0] * v.x + d[0][1] * v.y + d[0][2] * v.z + d[0][3];
        let y = d[1][0] * v.x + d[1][1] * v.y + d[1][2] * v.z + d[1][3];
        let z = d[2][0] * v.x + d[2][1] * v.y + d[2][2] * v.z + d[2][3];
        let w = d[3][0] * v.x + d[3][1] * v.y + d[3][2] * v.z + d[3][3];
        Vec3::new(x / w, y / w, z / w)
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|v| v.is_finite())
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For column-major convention, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, out) in result.iter_mut().enumerate() {
            for (col, value) in out.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.data[row][k] * rhs.data[k][col]).sum();
            }
        }

        Mat4::new(result)
    }
}

/// Transform a point: `Mat4 * Vec3`, see [`Mat4::transform_point`].
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        self.transform_point(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-4);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-4);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-4);
    }

    #[test]
    fn identity_leaves_points_unchanged() {
        let p = Vec3::new(1.5, -2.25, 7.0);
        assert_eq!(Mat4::identity().transform_point(p), p);
    }

    #[test]
    fn translation_moves_point() {
        let p = Mat4::translation(1.0, 2.0, 3.0) * Vec3::new(1.0, 1.0, 1.0);
        assert_vec_eq(p, Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn yaw_turns_forward_into_right() {
        let p = Mat4::rotation_yaw_pitch_roll(FRAC_PI_2, 0.0, 0.0) * Vec3::FORWARD;
        assert_vec_eq(p, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn roll_is_applied_before_pitch_and_yaw() {
        let (yaw, pitch, roll) = (0.3, -0.7, 1.1);
        let p = Vec3::new(0.2, 0.5, -0.9);
        let composed = Mat4::rotation_yaw_pitch_roll(yaw, pitch, roll) * p;
        let stepped = Mat4::rotation_y(yaw) * (Mat4::rotation_x(pitch) * (Mat4::rotation_z(roll) * p));
        assert_vec_eq(composed, stepped);
    }

    #[test]
    fn look_at_maps_eye_to_origin_and_back() {
        let eye = Vec3::new(3.0, 4.0, -6.0);
        let view = Mat4::look_at_lh(eye, Vec3::new(0.5, 0.0, 1.0), Vec3::UP);

        assert_vec_eq(view * eye, Vec3::ZERO);

        let inverse = view.inverse().expect("view matrix is invertible");
        assert_vec_eq(inverse * Vec3::ZERO, eye);
        assert_vec_eq(inverse * (view * Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn look_at_puts_target_on_positive_z() {
        let view = Mat4::look_at_lh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::UP);
        assert_vec_eq(view * Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn look_at_parallel_to_up_is_not_finite() {
        let view = Mat4::look_at_lh(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), Vec3::UP);
        assert!(!view.is_finite());
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth() {
        let proj = Mat4::perspective_lh(0.78, 1.5, 0.5, 20.0);
        assert_relative_eq!((proj * Vec3::new(0.0, 0.0, 0.5)).z, 0.0, epsilon = 1e-5);
        assert_relative_eq!((proj * Vec3::new(0.0, 0.0, 20.0)).z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let mut data = [[0.0; 4]; 4];
        data[3][3] = 1.0;
        assert!(Mat4::new(data).inverse().is_none());
    }
}
