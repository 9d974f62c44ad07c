//! Scene geometry: vertices, triangular faces and meshes.
//!
//! Meshes are read-only to the renderer. The only fields a driver is expected
//! to touch between frames are [`Mesh::position`] and [`Mesh::rotation`].

use std::fmt;

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::texture::Texture;

/// A mesh vertex in object space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub coordinates: Vec3,
    pub normal: Vec3,
    pub texture_coordinates: Option<Vec2>,
}

impl Vertex {
    pub const fn new(coordinates: Vec3, normal: Vec3) -> Self {
        Self {
            coordinates,
            normal,
            texture_coordinates: None,
        }
    }

    pub const fn with_uv(coordinates: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            coordinates,
            normal,
            texture_coordinates: Some(uv),
        }
    }
}

// A triangle defined by three indices into the vertex array of its mesh.
// Indices are zero-based; winding is kept exactly as supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Face {
    pub const fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

/// Structural problems found by [`Mesh::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            } => write!(
                f,
                "face {} references vertex {} but the mesh has {} vertices",
                face, index, vertex_count
            ),
        }
    }
}

impl std::error::Error for MeshError {}

/// A triangle mesh with its world placement.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    texture: Option<Texture>,
    /// World-space translation.
    pub position: Vec3,
    /// Euler angles in radians: x=pitch, y=yaw, z=roll.
    pub rotation: Vec3,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        Self {
            name: name.into(),
            vertices,
            faces,
            texture: None,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    /// The 2x2x2 cube centred on the origin, with per-corner normals.
    pub fn cube() -> Self {
        let vertices = CUBE_CORNERS
            .iter()
            .map(|&corner| Vertex::new(corner, corner.normalize()))
            .collect();
        Self::new("Cube", vertices, CUBE_FACES.to_vec())
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn set_texture(&mut self, texture: Option<Texture>) {
        self.texture = texture;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Checks that every face index addresses an existing vertex.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.vertices.len();
        for (face_idx, face) in self.faces.iter().enumerate() {
            if let Some(&index) = face.indices().iter().find(|&&i| i >= vertex_count) {
                return Err(MeshError::FaceIndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}

const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, -1.0),
];

const CUBE_FACES: [Face; 12] = [
    Face::new(0, 1, 2),
    Face::new(1, 2, 3),
    Face::new(1, 3, 6),
    Face::new(1, 5, 6),
    Face::new(0, 1, 4),
    Face::new(1, 4, 5),
    Face::new(2, 3, 7),
    Face::new(3, 6, 7),
    Face::new(0, 2, 7),
    Face::new(0, 4, 7),
    Face::new(4, 5, 6),
    Face::new(4, 6, 7),
];
