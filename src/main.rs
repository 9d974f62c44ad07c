use log::{debug, info, warn};
use softrender::prelude::*;
use softrender::window::{WINDOW_HEIGHT, WINDOW_WIDTH};

/// Rotation added to every mesh per tick, in radians around x and y.
const ROTATION_STEP: f32 = 0.01;

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut meshes = match std::env::args().nth(1) {
        Some(path) => load_scene_file(&path).map_err(|e| e.to_string())?,
        None => vec![Mesh::cube()],
    };
    info!("rendering {} mesh(es)", meshes.len());

    let mut window = Window::new("softrender", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut engine = Engine::new(WINDOW_WIDTH, WINDOW_HEIGHT);
    let mut camera = Camera::default();
    let mut mode = RenderMode::default();
    let mut rotating = true;
    let mut frame_limiter = FrameLimiter::new(&window);
    let mut fps_counter = FpsCounter::new();

    'running: loop {
        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(w, h) => {
                    window.resize(w, h)?;
                    engine.resize(w, h);
                }
                WindowEvent::MoveCamera(delta) => camera.translate(delta),
                WindowEvent::SelectMode(selected) => {
                    info!("render mode: {}", selected);
                    mode = selected;
                }
                WindowEvent::ToggleRotation => rotating = !rotating,
                WindowEvent::ResetCamera => camera = Camera::default(),
            }
        }

        let delta = frame_limiter.wait_and_get_delta(&window);
        debug!("frame time {} ms", delta);
        if let Some(fps) = fps_counter.tick(delta) {
            window.set_title(&format!("softrender - {:.1} fps", fps))?;
        }

        if rotating {
            for mesh in &mut meshes {
                mesh.rotation.x += ROTATION_STEP;
                mesh.rotation.y += ROTATION_STEP;
            }
        }

        if let Err(err) = engine.render_frame(&camera, &meshes, mode) {
            warn!("frame skipped: {}", err);
        }
        engine.draw(&mut window)?;
    }

    Ok(())
}
