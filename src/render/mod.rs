//! Pixel-level rendering: buffers, lines and triangle fill.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;

pub use framebuffer::FrameBuffer;
pub use rasterizer::{ScanlineRasterizer, ScreenVertex, Shading};
pub use renderer::Renderer;
