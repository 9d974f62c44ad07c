//! Low-level rendering primitives.
//!
//! Provides the [`Renderer`] struct which owns the color and depth buffers
//! and implements line drawing and wireframe triangles.

use super::framebuffer::FrameBuffer;
use super::rasterizer::ScreenVertex;

pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32, background: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![background; size],
            depth_buffer: vec![f32::INFINITY; size],
            width,
            height,
        }
    }

    /// Reallocates both buffers. Contents are reset to `background` and an
    /// empty depth buffer.
    pub fn resize(&mut self, width: u32, height: u32, background: u32) {
        let size = (width * height) as usize;
        self.color_buffer = vec![background; size];
        self.depth_buffer = vec![f32::INFINITY; size];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fills the color buffer and resets every depth cell to infinitely far.
    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
        self.depth_buffer.fill(f32::INFINITY);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.color_buffer[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Draws the three edges of a projected triangle. No depth test.
    ///
    /// Screen coordinates are truncated toward zero to pick the end pixels.
    pub fn draw_triangle_wireframe(&mut self, points: &[ScreenVertex; 3], color: u32) {
        for (start, end) in [(0, 1), (1, 2), (2, 0)] {
            let p0 = points[start].position;
            let p1 = points[end].position;
            self.draw_line(p0.x as i32, p0.y as i32, p1.x as i32, p1.y as i32, color);
        }
    }

    /// Draws a line between two points using Bresenham's line algorithm.
    ///
    /// Bresenham's algorithm determines which pixels to illuminate using only
    /// integer arithmetic. It tracks an "error" term that represents the
    /// distance between the ideal line and the current pixel; when the error
    /// crosses a threshold, we also step along the minor axis.
    ///
    /// Only the part of the walk that can touch the buffer is visited. X and
    /// Y each move in one direction, so the walk jumps straight to the first
    /// step at which both are on screen and stops once either has left. The
    /// pixels drawn are exactly those of the full walk clipped to the buffer.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let (w, h) = (self.width as i64, self.height as i64);
        let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        if (x0 < 0 && x1 < 0) || (y0 < 0 && y1 < 0) || (x0 >= w && x1 >= w) || (y0 >= h && y1 >= h)
        {
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();

        let x_incr_direction = if x0 < x1 { 1 } else { -1 };
        let y_incr_direction = if y0 < y1 { 1 } else { -1 };

        let Some((i, j)) = Self::line_entry(
            dx,
            dy,
            Self::steps_to_enter(x0, x_incr_direction, w),
            Self::steps_to_enter(y0, y_incr_direction, h),
        ) else {
            return;
        };

        // After i steps in x and j in y the error term is dx(1 + j) - dy(1 + i),
        // which always stays within a few multiples of max(dx, dy).
        let mut err = (dx as i128 * (1 + j as i128) - dy as i128 * (1 + i as i128)) as i64;

        let mut x = x0 + x_incr_direction * i;
        let mut y = y0 + y_incr_direction * j;

        let mut buffer = self.as_framebuffer();
        loop {
            let x_done = (x_incr_direction > 0 && x >= w) || (x_incr_direction < 0 && x < 0);
            let y_done = (y_incr_direction > 0 && y >= h) || (y_incr_direction < 0 && y < 0);
            if x_done || y_done {
                break;
            }

            buffer.set_pixel(x as i32, y as i32, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;

            if e2 > -dy {
                err -= dy;
                x += x_incr_direction;
            }

            // Both conditions can be true, resulting in a diagonal step.
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }

    /// Unit steps needed before a coordinate moving in `direction` is inside `[0, size)`.
    fn steps_to_enter(start: i64, direction: i64, size: i64) -> i64 {
        if direction > 0 && start < 0 {
            -start
        } else if direction < 0 && start >= size {
            start - (size - 1)
        } else {
            0
        }
    }

    /// Offsets `(i, j)` along x and y of the first point of the walk at which
    /// x has taken at least `need_x` steps and y at least `need_y`, or `None`
    /// if the walk ends first.
    ///
    /// The major axis steps on every iteration. After `k` major steps the
    /// minor axis has taken `ceil((2 * minor * k - major) / (2 * major))`.
    fn line_entry(dx: i64, dy: i64, need_x: i64, need_y: i64) -> Option<(i64, i64)> {
        let (major, minor, need_major, need_minor) = if dx >= dy {
            (dx, dy, need_x, need_y)
        } else {
            (dy, dx, need_y, need_x)
        };
        let (major, minor) = (major as i128, minor as i128);

        let k_for_minor = if need_minor == 0 {
            0
        } else if minor == 0 {
            return None;
        } else {
            (2 * major * need_minor as i128 - major).div_euclid(2 * minor) + 1
        };
        let k = k_for_minor.max(need_major as i128);
        if k > major {
            return None;
        }
        let m = if major == 0 {
            0
        } else {
            -(-(2 * minor * k - major)).div_euclid(2 * major)
        };

        let (k, m) = (k as i64, m as i64);
        Some(if dx >= dy { (k, m) } else { (m, k) })
    }

    /// The color buffer as raw bytes (ARGB8888, native endian).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.color_buffer)
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
    }
}
