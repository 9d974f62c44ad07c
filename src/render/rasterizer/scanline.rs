//! Scanline-based triangle rasterization.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by Y coordinate (top to bottom in screen space) into
//!    `p1`, `p2`, `p3`.
//! 2. **Classify** the triangle by which side of the long edge `p1->p3` the
//!    middle vertex `p2` lies on. If `p2` is to the right, `p1->p3` is the
//!    left boundary for every scanline; otherwise it is the right one. The
//!    test is a 2D cross product, so triangles with a flat top or bottom are
//!    classified the same way whatever order their tied vertices came in.
//! 3. **Walk scanlines** from `p1.y` to `p3.y`. Above `p2` the short side is
//!    `p1->p2`, at or below it the short side is `p2->p3`.
//!
//! ```text
//!        p1                  p1
//!        /|                  |\
//!       / |                  | \
//!  p2  <  |  long edge       |  >  p2
//!       \ |  on the right    |  /      long edge on the left
//!        \|                  | /
//!        p3                  p3
//! ```
//!
//! # Per-span interpolation
//!
//! Each edge has a parametric gradient `g = (y - a.y) / (b.y - a.y)`, forced
//! to 1 on horizontal edges. Start/end X, depth, light term and UV are lerped
//! along both edges, then again across the span with
//! `gradient = (x - start_x) / (end_x - start_x)`.
//!
//! This is Gouraud shading: the N·L term is computed once per vertex and
//! interpolated, never evaluated per pixel. UVs are interpolated linearly in
//! screen space, without perspective correction.

use super::{ScreenVertex, Shading};
use crate::colors::{pack_color, unpack_color};
use crate::light::PointLight;
use crate::math::lerp;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::render::framebuffer::FrameBuffer;

/// Scanline triangle rasterizer with depth testing.
///
/// The rasterizer sorts vertices internally, so input triangles can have
/// vertices in any order and either winding.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanlineRasterizer;

/// Per-vertex attributes that get interpolated across the triangle.
#[derive(Clone, Copy, Debug)]
struct Lit {
    position: Vec3,
    ndotl: f32,
    uv: Vec2,
}

impl Lit {
    fn new(vertex: &ScreenVertex, light: &PointLight) -> Self {
        Self {
            position: vertex.position,
            ndotl: light.n_dot_l(vertex.world_position, vertex.world_normal),
            uv: vertex.texture_coordinates.unwrap_or_default(),
        }
    }
}

/// An edge's attributes evaluated at the current scanline.
struct EdgePoint {
    x: i32,
    z: f32,
    ndotl: f32,
    uv: Vec2,
}

impl EdgePoint {
    fn at(y: f32, a: &Lit, b: &Lit) -> Self {
        let (pa, pb) = (a.position, b.position);
        let gradient = if pa.y != pb.y {
            (y - pa.y) / (pb.y - pa.y)
        } else {
            1.0
        };
        Self {
            x: lerp(pa.x, pb.x, gradient) as i32,
            z: lerp(pa.z, pb.z, gradient),
            ndotl: lerp(a.ndotl, b.ndotl, gradient),
            uv: Vec2::new(
                lerp(a.uv.x, b.uv.x, gradient),
                lerp(a.uv.y, b.uv.y, gradient),
            ),
        }
    }
}

impl ScanlineRasterizer {
    /// Creates a new scanline rasterizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Sorts three vertices by ascending Y with three compare-and-swaps.
    ///
    /// Swaps happen only on strictly greater Y, so vertices that share a Y
    /// keep their input order.
    fn sort_vertices(v: &mut [Lit; 3]) {
        if v[0].position.y > v[1].position.y {
            v.swap(0, 1);
        }
        if v[1].position.y > v[2].position.y {
            v.swap(1, 2);
        }
        if v[0].position.y > v[1].position.y {
            v.swap(0, 1);
        }
    }

    /// True when `p2` lies to the right of the edge `p1 -> p3` in screen
    /// space (Y grows downward). For vertices with distinct Y this matches
    /// comparing the inverse slopes of `p1->p2` and `p1->p3`.
    fn long_edge_on_left(p1: Vec3, p2: Vec3, p3: Vec3) -> bool {
        let cross = (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x);
        cross > 0.0
    }

    /// Fills a projected triangle into `buffer`.
    ///
    /// # Arguments
    ///
    /// * `vertices` - The projected triangle, in any order
    /// * `buffer` - Frame buffer to write pixels to, depth tested
    /// * `base_color` - Surface color before lighting
    /// * `shading` - Whether a texture modulates the lit color
    /// * `light` - Light used for the per-vertex N·L term
    pub fn fill_triangle(
        &self,
        vertices: &[ScreenVertex; 3],
        buffer: &mut FrameBuffer,
        base_color: u32,
        shading: Shading,
        light: &PointLight,
    ) {
        let mut sorted = vertices.map(|v| Lit::new(&v, light));
        Self::sort_vertices(&mut sorted);
        let [v1, v2, v3] = sorted;
        let (p1, p2, p3) = (v1.position, v2.position, v3.position);

        let long_edge_left = Self::long_edge_on_left(p1, p2, p3);

        let base = unpack_color(base_color);

        // Rows outside the buffer would be discarded pixel by pixel anyway.
        let y_start = (p1.y as i32).max(0);
        let y_end = (p3.y as i32).min(buffer.height() as i32 - 1);

        for y in y_start..=y_end {
            let upper = (y as f32) < p2.y;
            let (left, right) = if long_edge_left {
                if upper {
                    ((&v1, &v3), (&v1, &v2))
                } else {
                    ((&v1, &v3), (&v2, &v3))
                }
            } else if upper {
                ((&v1, &v2), (&v1, &v3))
            } else {
                ((&v2, &v3), (&v1, &v3))
            };

            Self::process_scanline(y, left, right, base, shading, buffer);
        }
    }

    /// Draws one span from the left edge `a->b` to the right edge `c->d`.
    fn process_scanline(
        y: i32,
        (a, b): (&Lit, &Lit),
        (c, d): (&Lit, &Lit),
        base: (f32, f32, f32),
        shading: Shading,
        buffer: &mut FrameBuffer,
    ) {
        let start = EdgePoint::at(y as f32, a, b);
        let end = EdgePoint::at(y as f32, c, d);

        let span = (end.x as i64 - start.x as i64) as f32;
        let x_from = start.x.max(0);
        let x_to = end.x.min(buffer.width() as i32);

        for x in x_from..x_to {
            let gradient = (x as i64 - start.x as i64) as f32 / span;
            let z = lerp(start.z, end.z, gradient);
            let ndotl = lerp(start.ndotl, end.ndotl, gradient);

            let (mut r, mut g, mut b) = (base.0 * ndotl, base.1 * ndotl, base.2 * ndotl);
            if let Shading::Textured(texture) = shading {
                let u = lerp(start.uv.x, end.uv.x, gradient);
                let v = lerp(start.uv.y, end.uv.y, gradient);
                let (tr, tg, tb) = unpack_color(texture.sample(u, v));
                r *= tr;
                g *= tg;
                b *= tb;
            }

            buffer.set_pixel_with_depth(x, y, z, pack_color(r, g, b, 1.0));
        }
    }
}
