use softrender::colors;
use softrender::prelude::*;

const W: u32 = 900;
const H: u32 = 550;

fn facing_triangle(name: &str, z: f32, texture: Texture) -> Mesh {
    let normal = Vec3::new(0.0, 0.0, 1.0);
    let vertices = vec![
        Vertex::with_uv(Vec3::new(-1.0, -1.0, 0.0), normal, Vec2::ZERO),
        Vertex::with_uv(Vec3::new(1.0, -1.0, 0.0), normal, Vec2::ZERO),
        Vertex::with_uv(Vec3::new(0.0, 1.0, 0.0), normal, Vec2::ZERO),
    ];
    let mut mesh = Mesh::new(name, vertices, vec![Face::new(0, 1, 2)]).with_texture(texture);
    mesh.position = Vec3::new(0.0, 0.0, z);
    mesh
}

fn solid(color: u32) -> Texture {
    Texture::from_pixels(1, 1, vec![color])
}

#[test]
fn wireframe_cube_uses_only_edge_and_background_colors() {
    let mut engine = Engine::new(W, H);
    engine
        .render_frame(&Camera::default(), &[Mesh::cube()], RenderMode::Wireframe)
        .unwrap();

    let pixels = engine.pixels();
    assert_eq!(pixels.len(), (W * H) as usize);
    assert!(pixels
        .iter()
        .all(|&p| p == colors::BACKGROUND || p == colors::WIREFRAME));
    assert!(pixels.iter().any(|&p| p == colors::WIREFRAME));
    assert_eq!(engine.pixel(0, 0), Some(colors::BACKGROUND));
}

#[test]
fn shaded_cube_covers_screen_center() {
    let mut engine = Engine::new(W, H);
    engine
        .render_frame(&Camera::default(), &[Mesh::cube()], RenderMode::Shading)
        .unwrap();

    let center = engine.pixel(W / 2, H / 2).unwrap();
    assert_ne!(center, colors::BACKGROUND);
    assert_eq!(engine.pixel(5, 5), Some(colors::BACKGROUND));
}

#[test]
fn shaded_cube_has_no_holes() {
    // Distinct from the black that back-lit pixels pack to.
    const BACKDROP: u32 = 0xFF203040;
    let config = EngineConfig {
        background: BACKDROP,
        ..EngineConfig::default()
    };
    let mut engine = Engine::with_config(W, H, config);
    engine
        .render_frame(&Camera::default(), &[Mesh::cube()], RenderMode::Shading)
        .unwrap();

    let covered: Vec<(u32, u32)> = (0..H)
        .flat_map(|y| (0..W).map(move |x| (x, y)))
        .filter(|&(x, y)| engine.pixel(x, y) != Some(BACKDROP))
        .collect();
    let min_x = covered.iter().map(|p| p.0).min().unwrap();
    let max_x = covered.iter().map(|p| p.0).max().unwrap();
    let min_y = covered.iter().map(|p| p.1).min().unwrap();
    let max_y = covered.iter().map(|p| p.1).max().unwrap();
    assert!(max_x - min_x > 200 && max_y - min_y > 200);

    // The unrotated cube's silhouette is its front square.
    let margin = 3;
    for y in min_y + margin..=max_y - margin {
        for x in min_x + margin..=max_x - margin {
            assert_ne!(engine.pixel(x, y), Some(BACKDROP), "hole at ({}, {})", x, y);
        }
    }
}

#[test]
fn nearer_mesh_wins_regardless_of_order() {
    let near = facing_triangle("near", 0.5, solid(0xFFFF0000));
    let far = facing_triangle("far", -0.5, solid(0xFF0000FF));

    for meshes in [vec![near.clone(), far.clone()], vec![far, near]] {
        let mut engine = Engine::new(W, H);
        engine
            .render_frame(&Camera::default(), &meshes, RenderMode::Texture)
            .unwrap();

        let (r, _, b) = colors::unpack_color(engine.pixel(W / 2, H / 2).unwrap());
        assert!(r > 0.0);
        assert_eq!(b, 0.0);
    }
}

#[test]
fn texture_mode_without_texture_matches_shading() {
    let camera = Camera::default();
    let mut cube = Mesh::cube();
    cube.rotation = Vec3::new(0.3, 0.5, 0.0);
    let meshes = [cube];

    let mut shaded = Engine::new(W, H);
    shaded.render_frame(&camera, &meshes, RenderMode::Shading).unwrap();
    let mut textured = Engine::new(W, H);
    textured.render_frame(&camera, &meshes, RenderMode::Texture).unwrap();

    assert_eq!(shaded.pixels(), textured.pixels());
}

#[test]
fn failed_frame_keeps_previous_image() {
    let camera = Camera::default();
    let mut engine = Engine::new(W, H);
    engine
        .render_frame(&camera, &[Mesh::cube()], RenderMode::Shading)
        .unwrap();
    let before = engine.pixels().to_vec();

    let broken = Mesh::new("broken", Vec::new(), vec![Face::new(0, 1, 2)]);
    let err = engine
        .render_frame(&camera, &[Mesh::cube(), broken], RenderMode::Shading)
        .unwrap_err();

    assert!(matches!(err, RenderError::InvalidMesh { ref mesh, .. } if mesh == "broken"));
    assert_eq!(engine.pixels(), before.as_slice());
}

#[test]
fn camera_translation_moves_the_image() {
    let mut engine = Engine::new(W, H);
    let mut camera = Camera::default();
    engine
        .render_frame(&camera, &[Mesh::cube()], RenderMode::Shading)
        .unwrap();
    let centered = engine.pixels().to_vec();

    camera.translate(Vec3::new(2.0, 0.0, 0.0));
    engine
        .render_frame(&camera, &[Mesh::cube()], RenderMode::Shading)
        .unwrap();
    assert_ne!(engine.pixels(), centered.as_slice());
}
