//! SDL2 host window: presentation, keyboard input and frame pacing.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::engine::{RenderMode, Surface};
use crate::math::vec3::Vec3;

pub const WINDOW_WIDTH: u32 = 900;
pub const WINDOW_HEIGHT: u32 = 550;
pub const TICKS_PER_SECOND: u64 = 50;
pub const FRAME_TARGET_TIME: f64 = 1000.0 / TICKS_PER_SECOND as f64;

/// Camera step for the arrow keys, in world units.
pub const PAN_STEP: f32 = 0.05;
/// Camera step for W/S.
pub const DOLLY_STEP: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Quit,
    Resize(u32, u32),
    /// Move camera position and target together by this offset.
    MoveCamera(Vec3),
    SelectMode(RenderMode),
    ToggleRotation,
    ResetCamera,
}

/// Maps a pressed key to the action it triggers.
///
/// Arrows pan the camera, W/S dolly it, 1/2/3 pick the render mode and
/// Space starts or stops the mesh rotation.
pub fn event_for_key(keycode: Keycode) -> Option<WindowEvent> {
    let event = match keycode {
        Keycode::Escape => WindowEvent::Quit,
        Keycode::Up => WindowEvent::MoveCamera(Vec3::new(0.0, -PAN_STEP, 0.0)),
        Keycode::Down => WindowEvent::MoveCamera(Vec3::new(0.0, PAN_STEP, 0.0)),
        Keycode::Right => WindowEvent::MoveCamera(Vec3::new(PAN_STEP, 0.0, 0.0)),
        Keycode::Left => WindowEvent::MoveCamera(Vec3::new(-PAN_STEP, 0.0, 0.0)),
        Keycode::W => WindowEvent::MoveCamera(Vec3::new(0.0, 0.0, -DOLLY_STEP)),
        Keycode::S => WindowEvent::MoveCamera(Vec3::new(0.0, 0.0, DOLLY_STEP)),
        Keycode::Num1 => WindowEvent::SelectMode(RenderMode::Wireframe),
        Keycode::Num2 => WindowEvent::SelectMode(RenderMode::Shading),
        Keycode::Num3 => WindowEvent::SelectMode(RenderMode::Texture),
        Keycode::Space => WindowEvent::ToggleRotation,
        Keycode::R => WindowEvent::ResetCamera,
        _ => return None,
    };
    Some(event)
}

pub struct FrameLimiter {
    previous_frame_time: u64,
}

impl FrameLimiter {
    pub fn new(window: &Window) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
        }
    }

    /// Waits if necessary to hold the tick rate and returns the delta time in milliseconds.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> u64 {
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time - self.previous_frame_time;

        if delta_time < FRAME_TARGET_TIME as u64 {
            let time_to_wait = (FRAME_TARGET_TIME as u64) - delta_time;
            std::thread::sleep(std::time::Duration::from_millis(time_to_wait));
            current_time = window.timer().ticks64();
            delta_time = current_time - self.previous_frame_time;
        }

        self.previous_frame_time = current_time;
        delta_time
    }
}

/// Averages frame deltas into a frames-per-second figure, once per second.
#[derive(Debug, Default)]
pub struct FpsCounter {
    elapsed_ms: u64,
    frames: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame. Returns the average rate once a full second has
    /// accumulated, then starts a new window.
    pub fn tick(&mut self, delta_ms: u64) -> Option<f32> {
        self.elapsed_ms += delta_ms;
        self.frames += 1;
        if self.elapsed_ms < 1000 {
            return None;
        }
        let fps = self.frames as f32 * 1000.0 / self.elapsed_ms as f32;
        *self = Self::default();
        Some(fps)
    }
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // Field order matters: `texture` borrows from `texture_creator` and must drop first.
    texture: sdl2::render::Texture<'static>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;
        let texture = Self::create_texture(&texture_creator, width, height)?;

        log::info!("opened {}x{} window '{}'", width, height, title);

        Ok(Self {
            canvas,
            texture,
            texture_creator,
            event_pump,
            timer_subsystem,
            width,
            height,
        })
    }

    fn create_texture(
        texture_creator: &sdl2::render::TextureCreator<sdl2::video::WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<sdl2::render::Texture<'static>, String> {
        // SAFETY: the creator is boxed, so its address is stable, and it lives
        // in the same `Window` as the texture, which is dropped first.
        let texture_creator: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator as *const _) };
        texture_creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())
    }

    /// Drains pending SDL events into window events.
    pub fn poll_events(&mut self) -> Vec<WindowEvent> {
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(WindowEvent::Quit),
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => events.extend(event_for_key(keycode)),
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => events.push(WindowEvent::Resize(w as u32, h as u32)),
                _ => {}
            }
        }
        events
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.texture = Self::create_texture(&self.texture_creator, width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), String> {
        self.canvas
            .window_mut()
            .set_title(title)
            .map_err(|e| e.to_string())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }
}

impl Surface for Window {
    fn present(&mut self, frame: &[u8], width: u32, height: u32) -> Result<(), String> {
        if (width, height) != (self.width, self.height) {
            self.resize(width, height)?;
        }
        self.texture
            .update(None, frame, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))?;
        self.canvas.present();
        Ok(())
    }
}
