//! A CPU-based software 3D renderer.
//!
//! Triangle meshes are projected through a left-handed camera and
//! perspective, then drawn as wireframes or filled with a scanline
//! rasterizer using a depth buffer, per-vertex (Gouraud) lighting from one
//! point light, and optional texture mapping. SDL2 is only used by the
//! [`window`] module to put the finished frame on screen.
//!
//! # Quick Start
//!
//! ```no_run
//! use softrender::prelude::*;
//!
//! let mut engine = Engine::new(900, 550);
//! let camera = Camera::default();
//! let meshes = vec![Mesh::cube()];
//! engine.render_frame(&camera, &meshes, RenderMode::Shading)?;
//! let frame: &[u8] = engine.frame_buffer();
//! # Ok::<(), softrender::RenderError>(())
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod engine;
pub mod error;
pub mod light;
pub mod loader;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod texture;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use engine::{Engine, EngineConfig, RenderMode, Surface};
pub use error::{LoadError, RenderError};
pub use mesh::{Face, Mesh, MeshError, Vertex};
pub use projection::Projection;
pub use texture::Texture;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::engine::{Engine, EngineConfig, RenderMode, Surface};
    pub use crate::error::{LoadError, RenderError};
    pub use crate::light::PointLight;
    pub use crate::loader::{load_babylon_file, load_obj_file, load_scene_file};
    pub use crate::mesh::{Face, Mesh, Vertex};
    pub use crate::projection::Projection;
    pub use crate::texture::Texture;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;

    // Window & Input
    pub use crate::window::{FpsCounter, FrameLimiter, Window, WindowEvent};
}
