use std::path::Path;

use crate::colors;

/// An immutable 2D image used for texture mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format.
    width: u32,     // The width of the texture in pixels.
    height: u32,    // The height of the texture in pixels.
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a texture from row-major ARGB pixels.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, data: Vec<u32>) -> Self {
        assert_eq!(
            data.len(),
            (width * height) as usize,
            "texture data doesn't match dimensions"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Sample the texture at UV coordinates using nearest-neighbor filtering.
    ///
    /// # Wrapping
    /// Coordinates repeat: `px = |floor(u * width)| mod width` and likewise
    /// for `v`. The absolute value mirrors negative UVs back into the grid.
    /// V is used as stored, with row 0 at the top of the image.
    ///
    /// An empty image samples as opaque white.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        if self.width == 0 || self.height == 0 {
            return colors::WHITE;
        }

        let x = wrap(u, self.width);
        let y = wrap(v, self.height);

        self.data[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[inline]
fn wrap(coord: f32, size: u32) -> u32 {
    let texel = (coord * size as f32).floor() as i64;
    (texel.unsigned_abs() % size as u64) as u32
}
