//! Core rendering engine.
//!
//! The [`Engine`] struct is the main entry point for the renderer. It owns the
//! color and depth buffers and runs the per-frame pipeline: view and
//! projection from the camera, a world matrix per mesh, projection of every
//! face, then rasterization according to the [`RenderMode`].
//!
//! A frame is two phases, always in order: [`Engine::clear`] then
//! [`Engine::render`]. [`Engine::render_frame`] does both and keeps the
//! previous frame intact if the scene fails validation.

use log::{debug, trace};

use crate::camera::Camera;
use crate::colors;
use crate::error::RenderError;
use crate::light::PointLight;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::mesh::{Mesh, Vertex};
use crate::projection::Projection;
use crate::render::{Renderer, ScanlineRasterizer, ScreenVertex, Shading};

/// Rendering mode, selected by the driver each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Triangle edges only, no fill and no depth test (key: 1)
    Wireframe,
    /// Depth-buffered fill with Gouraud lighting (key: 2)
    #[default]
    Shading,
    /// Gouraud lighting multiplied by the mesh texture (key: 3)
    Texture,
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Wireframe => write!(f, "Wireframe"),
            RenderMode::Shading => write!(f, "Shading"),
            RenderMode::Texture => write!(f, "Texture"),
        }
    }
}

/// Host surface that can display a finished frame.
pub trait Surface {
    /// Displays `frame` (ARGB8888 bytes, `width * height * 4` long).
    fn present(&mut self, frame: &[u8], width: u32, height: u32) -> Result<(), String>;
}

/// Scene-independent engine settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub background: u32,
    pub wireframe_color: u32,
    /// Base surface color before lighting.
    pub fill_color: u32,
    pub light: PointLight,
    pub projection: Projection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            background: colors::BACKGROUND,
            wireframe_color: colors::WIREFRAME,
            fill_color: colors::FILL,
            light: PointLight::default(),
            projection: Projection::default(),
        }
    }
}

pub struct Engine {
    renderer: Renderer,
    rasterizer: ScanlineRasterizer,
    config: EngineConfig,
}

impl Engine {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, EngineConfig::default())
    }

    /// Creates an engine; the projection's aspect ratio is taken from the
    /// buffer size.
    pub fn with_config(width: u32, height: u32, mut config: EngineConfig) -> Self {
        config
            .projection
            .set_aspect_ratio(width as f32 / height as f32);
        Self {
            renderer: Renderer::new(width, height, config.background),
            rasterizer: ScanlineRasterizer::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    pub fn width(&self) -> u32 {
        self.renderer.width()
    }

    pub fn height(&self) -> u32 {
        self.renderer.height()
    }

    /// Reallocates the buffers for a new output size.
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("resizing frame buffers to {}x{}", width, height);
        self.renderer.resize(width, height, self.config.background);
        self.config
            .projection
            .set_aspect_ratio(width as f32 / height as f32);
    }

    /// Fills the color buffer with the background and resets depth.
    pub fn clear(&mut self) {
        self.renderer.clear(self.config.background);
    }

    /// Checks everything `render` relies on without touching the buffers.
    pub fn validate(&self, camera: &Camera, meshes: &[Mesh]) -> Result<(), RenderError> {
        if !self.config.projection.is_valid() {
            return Err(RenderError::InvalidProjection);
        }
        if camera.is_degenerate() || !camera.view_matrix().is_finite() {
            return Err(RenderError::DegenerateCamera);
        }
        for mesh in meshes {
            mesh.validate()
                .map_err(|source| RenderError::InvalidMesh {
                    mesh: mesh.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Draws `meshes` as seen from `camera` into the current buffers.
    ///
    /// Does nothing when there are no meshes. The whole scene is validated
    /// before the first pixel write, so an error leaves the buffers as they
    /// were.
    pub fn render(
        &mut self,
        camera: &Camera,
        meshes: &[Mesh],
        mode: RenderMode,
    ) -> Result<(), RenderError> {
        if meshes.is_empty() {
            return Ok(());
        }
        self.validate(camera, meshes)?;
        self.draw_scene(camera, meshes, mode);
        Ok(())
    }

    /// Validates, clears, then renders. On error the previous frame is kept.
    ///
    /// An empty scene clears to the background without validating the camera.
    pub fn render_frame(
        &mut self,
        camera: &Camera,
        meshes: &[Mesh],
        mode: RenderMode,
    ) -> Result<(), RenderError> {
        if !meshes.is_empty() {
            self.validate(camera, meshes)?;
        }
        self.clear();
        self.draw_scene(camera, meshes, mode);
        Ok(())
    }

    /// Rasterizes an already validated scene.
    fn draw_scene(&mut self, camera: &Camera, meshes: &[Mesh], mode: RenderMode) {
        let view = camera.view_matrix();
        let projection = self.config.projection.matrix();
        let light = self.config.light;

        for mesh in meshes {
            let world = Self::world_matrix(mesh);
            let transform = projection * view * world;

            let shading = match (mode, mesh.texture()) {
                (RenderMode::Texture, Some(texture)) => Shading::Textured(texture),
                _ => Shading::Gouraud,
            };

            let vertices = mesh.vertices();
            for face in mesh.faces() {
                let projected = face
                    .indices()
                    .map(|i| self.project(&vertices[i], &transform, &world));

                if !projected.iter().all(ScreenVertex::is_finite) {
                    trace!("skipping face {:?} of '{}': vertex at w = 0", face, mesh.name());
                    continue;
                }

                match mode {
                    RenderMode::Wireframe => self
                        .renderer
                        .draw_triangle_wireframe(&projected, self.config.wireframe_color),
                    RenderMode::Shading | RenderMode::Texture => {
                        let mut buffer = self.renderer.as_framebuffer();
                        self.rasterizer.fill_triangle(
                            &projected,
                            &mut buffer,
                            self.config.fill_color,
                            shading,
                            &light,
                        );
                    }
                }
            }
        }
    }

    /// Rotation (roll, pitch, then yaw) followed by translation.
    pub fn world_matrix(mesh: &Mesh) -> Mat4 {
        let (position, rotation) = (mesh.position, mesh.rotation);
        Mat4::translation(position.x, position.y, position.z)
            * Mat4::rotation_yaw_pitch_roll(rotation.y, rotation.x, rotation.z)
    }

    /// Projects an object-space vertex to screen space.
    ///
    /// Pixel coordinates come from `x * width + width / 2` and
    /// `-y * height + height / 2` (screen Y grows downward); the projected z
    /// is kept as the depth key. Position and normal are also carried into
    /// world space for lighting. The normal goes through the full world
    /// matrix, translation included.
    pub fn project(&self, vertex: &Vertex, transform: &Mat4, world: &Mat4) -> ScreenVertex {
        let width = self.renderer.width() as f32;
        let height = self.renderer.height() as f32;

        let clip = transform.transform_point(vertex.coordinates);
        let position = Vec3::new(
            clip.x * width + width / 2.0,
            -clip.y * height + height / 2.0,
            clip.z,
        );

        ScreenVertex {
            position,
            world_position: world.transform_point(vertex.coordinates),
            world_normal: world.transform_point(vertex.normal),
            texture_coordinates: vertex.texture_coordinates,
        }
    }

    /// Returns the rendered frame as bytes (ARGB8888 format)
    pub fn frame_buffer(&self) -> &[u8] {
        self.renderer.as_bytes()
    }

    /// Returns the color of one pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.renderer.pixel(x, y)
    }

    /// The packed color buffer, row-major.
    pub fn pixels(&self) -> &[u32] {
        self.renderer.color_buffer()
    }

    /// Presents the current frame on the host surface.
    pub fn draw(&self, surface: &mut dyn Surface) -> Result<(), String> {
        surface.present(self.frame_buffer(), self.width(), self.height())
    }
}
