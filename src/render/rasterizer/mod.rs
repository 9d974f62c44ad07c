//! Triangle rasterization.
//!
//! [`ScanlineRasterizer`] fills projected triangles top to bottom, one
//! horizontal span at a time, with Gouraud lighting and optional texturing.

mod scanline;

pub use scanline::ScanlineRasterizer;

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::texture::Texture;

/// A vertex after projection, ready for rasterization.
///
/// `position` holds pixel coordinates in x/y and the projected depth in z.
/// The world-space position and normal feed the lighting term.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenVertex {
    pub position: Vec3,
    pub world_position: Vec3,
    pub world_normal: Vec3,
    pub texture_coordinates: Option<Vec2>,
}

impl ScreenVertex {
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
    }
}

/// How a filled triangle is colored.
#[derive(Clone, Copy, Debug)]
pub enum Shading<'a> {
    /// Base color scaled by the interpolated light term.
    Gouraud,
    /// Gouraud lighting multiplied channel-wise by a texture sample.
    Textured(&'a Texture),
}
