//! Scene import.
//!
//! Two formats are understood: the Babylon JSON export (`.babylon`/`.json`)
//! and Wavefront OBJ. Both produce validated [`Mesh`]es with any diffuse
//! texture already decoded.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::LoadError;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::mesh::{Face, Mesh, Vertex};
use crate::texture::Texture;

#[derive(Debug, Default, Deserialize)]
struct BabylonScene {
    #[serde(default)]
    materials: Vec<BabylonMaterial>,
    #[serde(default)]
    meshes: Vec<BabylonMesh>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BabylonMaterial {
    #[serde(default)]
    id: String,
    #[serde(default)]
    diffuse_texture: Option<BabylonTexture>,
}

#[derive(Debug, Deserialize)]
struct BabylonTexture {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BabylonMesh {
    #[serde(default)]
    name: String,
    #[serde(default)]
    vertices: Vec<f32>,
    #[serde(default)]
    indices: Vec<usize>,
    #[serde(default)]
    position: [f32; 3],
    #[serde(default)]
    rotation: [f32; 3],
    #[serde(default)]
    uv_count: u32,
    #[serde(default)]
    material_id: Option<String>,
}

/// Loads a scene, picking the format from the file extension.
pub fn load_scene_file<P: AsRef<Path>>(path: P) -> Result<Vec<Mesh>, LoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("babylon") | Some("json") => load_babylon_file(path),
        Some("obj") => load_obj_file(path),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Loads a Babylon JSON file. Textures are resolved next to the file.
pub fn load_babylon_file<P: AsRef<Path>>(path: P) -> Result<Vec<Mesh>, LoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let texture_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_babylon(&json, texture_dir)
}

/// Parses a Babylon JSON document.
///
/// Each mesh carries a flat `vertices` array whose stride depends on
/// `uvCount`: 6 floats (position, normal) for 0, 8 for 1 and 10 for 2. Only
/// the first UV set (offsets 6 and 7) is used. A mesh with UVs must name a
/// material whose `diffuseTexture` can be found in `texture_dir`.
pub fn parse_babylon(json: &str, texture_dir: &Path) -> Result<Vec<Mesh>, LoadError> {
    let scene: BabylonScene = serde_json::from_str(json)?;
    info!(
        "babylon scene: {} meshes, {} materials",
        scene.meshes.len(),
        scene.materials.len()
    );

    let materials: HashMap<&str, &BabylonMaterial> = scene
        .materials
        .iter()
        .map(|material| (material.id.as_str(), material))
        .collect();
    let mut textures = TextureCache::default();

    scene
        .meshes
        .iter()
        .map(|raw| build_babylon_mesh(raw, &materials, texture_dir, &mut textures))
        .collect()
}

fn build_babylon_mesh(
    raw: &BabylonMesh,
    materials: &HashMap<&str, &BabylonMaterial>,
    texture_dir: &Path,
    textures: &mut TextureCache,
) -> Result<Mesh, LoadError> {
    let stride = match raw.uv_count {
        0 => 6,
        1 => 8,
        2 => 10,
        uv_count => {
            return Err(LoadError::UnsupportedUvCount {
                mesh: raw.name.clone(),
                uv_count,
            })
        }
    };
    if raw.vertices.len() % stride != 0 {
        return Err(LoadError::VertexStride {
            mesh: raw.name.clone(),
            len: raw.vertices.len(),
            stride,
        });
    }
    if raw.indices.len() % 3 != 0 {
        return Err(LoadError::IndexStride {
            mesh: raw.name.clone(),
            len: raw.indices.len(),
        });
    }

    let vertices = raw
        .vertices
        .chunks_exact(stride)
        .map(|v| {
            let coordinates = Vec3::new(v[0], v[1], v[2]);
            let normal = Vec3::new(v[3], v[4], v[5]);
            if raw.uv_count > 0 {
                Vertex::with_uv(coordinates, normal, Vec2::new(v[6], v[7]))
            } else {
                Vertex::new(coordinates, normal)
            }
        })
        .collect();
    let faces = raw
        .indices
        .chunks_exact(3)
        .map(|f| Face::new(f[0], f[1], f[2]))
        .collect();

    let mut mesh = Mesh::new(raw.name.clone(), vertices, faces);
    mesh.position = Vec3::new(raw.position[0], raw.position[1], raw.position[2]);
    mesh.rotation = Vec3::new(raw.rotation[0], raw.rotation[1], raw.rotation[2]);

    if raw.uv_count > 0 {
        let texture_name = raw
            .material_id
            .as_deref()
            .and_then(|id| materials.get(id))
            .and_then(|material| material.diffuse_texture.as_ref())
            .map(|texture| texture.name.as_str())
            .ok_or_else(|| LoadError::MissingMaterial {
                mesh: raw.name.clone(),
                material_id: raw.material_id.clone(),
            })?;
        mesh.set_texture(Some(textures.load(&texture_dir.join(texture_name))?));
    }

    mesh.validate().map_err(|source| LoadError::InvalidMesh {
        mesh: raw.name.clone(),
        source,
    })?;
    debug!(
        "loaded mesh '{}': {} vertices, {} faces",
        mesh.name(),
        mesh.vertices().len(),
        mesh.faces().len()
    );
    Ok(mesh)
}

/// Loads a Wavefront OBJ file.
///
/// Faces are triangulated and every model becomes one [`Mesh`]. Missing
/// normals fall back to the normalized position. A material's diffuse
/// texture is loaded relative to the OBJ file.
pub fn load_obj_file<P: AsRef<Path>>(path: P) -> Result<Vec<Mesh>, LoadError> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;
    let materials = materials.unwrap_or_else(|err| {
        warn!("ignoring materials of {}: {}", path.display(), err);
        Vec::new()
    });
    info!(
        "obj scene: {} meshes, {} materials",
        models.len(),
        materials.len()
    );

    let texture_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut textures = TextureCache::default();

    models
        .iter()
        .map(|model| -> Result<Mesh, LoadError> {
            let m = &model.mesh;
            let vertices = (0..m.positions.len() / 3)
                .map(|i| {
                    let coordinates = Vec3::new(
                        m.positions[i * 3],
                        m.positions[i * 3 + 1],
                        m.positions[i * 3 + 2],
                    );
                    let normal = match m.normals.get(i * 3..i * 3 + 3) {
                        Some(n) => Vec3::new(n[0], n[1], n[2]),
                        None => fallback_normal(coordinates),
                    };
                    match m.texcoords.get(i * 2..i * 2 + 2) {
                        Some(uv) => Vertex::with_uv(coordinates, normal, Vec2::new(uv[0], uv[1])),
                        None => Vertex::new(coordinates, normal),
                    }
                })
                .collect();
            let faces = m
                .indices
                .chunks_exact(3)
                .map(|f| Face::new(f[0] as usize, f[1] as usize, f[2] as usize))
                .collect();

            let mut mesh = Mesh::new(model.name.clone(), vertices, faces);
            let texture_name = m
                .material_id
                .and_then(|id| materials.get(id))
                .and_then(|material| material.diffuse_texture.as_deref());
            if let Some(name) = texture_name {
                mesh.set_texture(Some(textures.load(&texture_dir.join(name))?));
            }

            mesh.validate().map_err(|source| LoadError::InvalidMesh {
                mesh: model.name.clone(),
                source,
            })?;
            Ok(mesh)
        })
        .collect()
}

fn fallback_normal(position: Vec3) -> Vec3 {
    let normal = position.normalize();
    if normal.is_finite() {
        normal
    } else {
        Vec3::UP
    }
}

/// Decodes each texture file once per load.
#[derive(Default)]
struct TextureCache {
    loaded: HashMap<PathBuf, Texture>,
}

impl TextureCache {
    fn load(&mut self, path: &Path) -> Result<Texture, LoadError> {
        if let Some(texture) = self.loaded.get(path) {
            return Ok(texture.clone());
        }
        let texture = Texture::from_file(path)?;
        debug!(
            "decoded texture {} ({}x{})",
            path.display(),
            texture.width(),
            texture.height()
        );
        self.loaded.insert(path.to_path_buf(), texture.clone());
        Ok(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshError;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("softrender-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_checker(dir: &Path, name: &str) {
        let img = image::RgbaImage::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        img.save(dir.join(name)).unwrap();
    }

    const TRIANGLE_NO_UV: &str = r#"{
        "producer": { "name": "Blender" },
        "meshes": [{
            "name": "Tri",
            "vertices": [0,0,0, 0,0,1,  1,0,0, 0,0,1,  0,1,0, 0,0,1],
            "indices": [0,1,2],
            "position": [1,2,3],
            "rotation": [0.1,0.2,0.3],
            "uvCount": 0
        }]
    }"#;

    #[test]
    fn parses_stride_six_mesh() {
        let meshes = parse_babylon(TRIANGLE_NO_UV, Path::new(".")).unwrap();
        assert_eq!(meshes.len(), 1);

        let mesh = &meshes[0];
        assert_eq!(mesh.name(), "Tri");
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
        assert_eq!(mesh.vertices()[1].coordinates, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.vertices()[1].normal, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.vertices()[1].texture_coordinates, None);
        assert_eq!(mesh.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.rotation, Vec3::new(0.1, 0.2, 0.3));
        assert!(mesh.texture().is_none());
    }

    #[test]
    fn missing_position_and_rotation_default_to_zero() {
        let json = r#"{ "meshes": [{ "name": "M", "vertices": [], "indices": [] }] }"#;
        let meshes = parse_babylon(json, Path::new(".")).unwrap();
        assert_eq!(meshes[0].position, Vec3::ZERO);
        assert_eq!(meshes[0].rotation, Vec3::ZERO);
    }

    #[test]
    fn reads_uvs_and_texture_with_stride_eight() {
        let dir = scratch_dir("uv8");
        write_checker(&dir, "checker.png");
        let json = r#"{
            "materials": [{ "id": "mat0", "name": "Mat", "diffuseTexture": { "name": "checker.png" } }],
            "meshes": [{
                "name": "Quad",
                "vertices": [0,0,0, 0,0,1, 0.25,0.75,  1,0,0, 0,0,1, 1,0,  0,1,0, 0,0,1, 0,1],
                "indices": [0,1,2],
                "uvCount": 1,
                "materialId": "mat0"
            }]
        }"#;

        let meshes = parse_babylon(json, &dir).unwrap();
        let mesh = &meshes[0];
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(
            mesh.vertices()[0].texture_coordinates,
            Some(Vec2::new(0.25, 0.75))
        );
        let texture = mesh.texture().unwrap();
        assert_eq!((texture.width(), texture.height()), (2, 2));
        assert_eq!(texture.sample(0.0, 0.0), 0xFFFF0000);
        assert_eq!(texture.sample(0.5, 0.0), 0xFF0000FF);
    }

    #[test]
    fn stride_ten_uses_first_uv_set() {
        let dir = scratch_dir("uv10");
        write_checker(&dir, "t.png");
        let json = r#"{
            "materials": [{ "id": "m", "diffuseTexture": { "name": "t.png" } }],
            "meshes": [{
                "name": "Two",
                "vertices": [0,0,0, 0,0,1, 0.5,0.5, 9,9,  1,1,1, 0,1,0, 0.1,0.2, 8,8],
                "indices": [],
                "uvCount": 2,
                "materialId": "m"
            }]
        }"#;

        let meshes = parse_babylon(json, &dir).unwrap();
        assert_eq!(meshes[0].vertices().len(), 2);
        assert_eq!(
            meshes[0].vertices()[1].texture_coordinates,
            Some(Vec2::new(0.1, 0.2))
        );
    }

    #[test]
    fn rejects_unknown_uv_count() {
        let json = r#"{ "meshes": [{ "name": "M", "vertices": [], "indices": [], "uvCount": 3 }] }"#;
        match parse_babylon(json, Path::new(".")) {
            Err(LoadError::UnsupportedUvCount { mesh, uv_count }) => {
                assert_eq!(mesh, "M");
                assert_eq!(uv_count, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_ragged_vertex_array() {
        let json = r#"{ "meshes": [{ "name": "M", "vertices": [0,0,0,0,0], "indices": [] }] }"#;
        assert!(matches!(
            parse_babylon(json, Path::new(".")),
            Err(LoadError::VertexStride { len: 5, stride: 6, .. })
        ));
    }

    #[test]
    fn rejects_ragged_index_array() {
        let json = r#"{ "meshes": [{ "name": "M", "vertices": [0,0,0,0,0,1], "indices": [0,0] }] }"#;
        assert!(matches!(
            parse_babylon(json, Path::new(".")),
            Err(LoadError::IndexStride { len: 2, .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_face_index() {
        let json = r#"{ "meshes": [{ "name": "M", "vertices": [0,0,0,0,0,1], "indices": [0,0,1] }] }"#;
        match parse_babylon(json, Path::new(".")) {
            Err(LoadError::InvalidMesh { mesh, source }) => {
                assert_eq!(mesh, "M");
                assert_eq!(
                    source,
                    MeshError::FaceIndexOutOfRange {
                        face: 0,
                        index: 1,
                        vertex_count: 1
                    }
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn textured_mesh_needs_a_material() {
        let json = r#"{ "meshes": [{ "name": "M", "vertices": [], "indices": [], "uvCount": 1 }] }"#;
        assert!(matches!(
            parse_babylon(json, Path::new(".")),
            Err(LoadError::MissingMaterial { material_id: None, .. })
        ));

        let json = r#"{
            "materials": [{ "id": "plain" }],
            "meshes": [{ "name": "M", "vertices": [], "indices": [], "uvCount": 1, "materialId": "plain" }]
        }"#;
        match parse_babylon(json, Path::new(".")) {
            Err(LoadError::MissingMaterial { material_id, .. }) => {
                assert_eq!(material_id.as_deref(), Some("plain"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn untextured_mesh_ignores_material_id() {
        let json = r#"{ "meshes": [{ "name": "M", "vertices": [], "indices": [], "materialId": "nowhere" }] }"#;
        let meshes = parse_babylon(json, Path::new(".")).unwrap();
        assert!(meshes[0].texture().is_none());
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            parse_babylon("{ \"meshes\": [", Path::new(".")),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn loads_obj_triangle_with_fallback_normals() {
        let dir = scratch_dir("obj");
        let path = dir.join("tri.obj");
        fs::write(
            &path,
            "o Tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n",
        )
        .unwrap();

        let meshes = load_scene_file(&path).unwrap();
        assert_eq!(meshes.len(), 1);
        let mesh = &meshes[0];
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.faces().len(), 1);
        assert_eq!(mesh.vertices()[0].normal, Vec3::UP);
        assert_eq!(mesh.vertices()[1].normal, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(
            mesh.vertices()[2].texture_coordinates,
            Some(Vec2::new(0.0, 1.0))
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            load_scene_file("scene.fbx"),
            Err(LoadError::UnsupportedFormat { .. })
        ));
    }
}
