//! Error types for scene loading and rendering.

use std::fmt;
use std::path::PathBuf;

use crate::mesh::MeshError;

/// Errors raised while importing a scene.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Obj(tobj::LoadError),
    Image(image::ImageError),
    /// The file extension names no known scene format.
    UnsupportedFormat { path: PathBuf },
    /// `uvCount` other than 0, 1 or 2.
    UnsupportedUvCount { mesh: String, uv_count: u32 },
    /// The flat vertex array is not a multiple of the per-vertex stride.
    VertexStride { mesh: String, len: usize, stride: usize },
    /// The flat index array is not a multiple of 3.
    IndexStride { mesh: String, len: usize },
    /// A textured mesh names a material that is missing or has no texture.
    MissingMaterial { mesh: String, material_id: Option<String> },
    InvalidMesh { mesh: String, source: MeshError },
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Json(err)
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(err: tobj::LoadError) -> Self {
        LoadError::Obj(err)
    }
}

impl From<image::ImageError> for LoadError {
    fn from(err: image::ImageError) -> Self {
        LoadError::Image(err)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "io error: {}", err),
            LoadError::Json(err) => write!(f, "json error: {}", err),
            LoadError::Obj(err) => write!(f, "obj error: {}", err),
            LoadError::Image(err) => write!(f, "texture error: {}", err),
            LoadError::UnsupportedFormat { path } => {
                write!(f, "unsupported scene format: {}", path.display())
            }
            LoadError::UnsupportedUvCount { mesh, uv_count } => {
                write!(f, "mesh '{}': unsupported uvCount {}", mesh, uv_count)
            }
            LoadError::VertexStride { mesh, len, stride } => write!(
                f,
                "mesh '{}': {} vertex values is not a multiple of stride {}",
                mesh, len, stride
            ),
            LoadError::IndexStride { mesh, len } => write!(
                f,
                "mesh '{}': {} indices is not a multiple of 3",
                mesh, len
            ),
            LoadError::MissingMaterial { mesh, material_id } => match material_id {
                Some(id) => write!(f, "mesh '{}': material '{}' has no texture", mesh, id),
                None => write!(f, "mesh '{}': has UVs but no materialId", mesh),
            },
            LoadError::InvalidMesh { mesh, source } => write!(f, "mesh '{}': {}", mesh, source),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Json(err) => Some(err),
            LoadError::Obj(err) => Some(err),
            LoadError::Image(err) => Some(err),
            LoadError::InvalidMesh { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors that abort a frame before any pixel is written.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A mesh failed validation.
    InvalidMesh { mesh: String, source: MeshError },
    /// Eye and target coincide or the view direction is parallel to world up.
    DegenerateCamera,
    /// Projection planes do not satisfy `0 < z_near < z_far`.
    InvalidProjection,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidMesh { mesh, source } => {
                write!(f, "degenerate geometry in mesh '{}': {}", mesh, source)
            }
            RenderError::DegenerateCamera => {
                write!(f, "degenerate camera: view direction is zero or parallel to up")
            }
            RenderError::InvalidProjection => {
                write!(f, "invalid projection: expected 0 < z_near < z_far")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::InvalidMesh { source, .. } => Some(source),
            _ => None,
        }
    }
}
