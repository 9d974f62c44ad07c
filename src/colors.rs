//! Color constants and helpers for packed ARGB8888 pixels.
//!
//! Shading works on unpacked `(r, g, b)` channels in `[0.0, 1.0]`; values are
//! clamped only when packed back into a `u32`, so a negative light term
//! renders as black instead of wrapping around.

pub const BACKGROUND: u32 = 0xFF000000;
pub const WIREFRAME: u32 = 0xFFFFFFFF;
pub const FILL: u32 = 0xFFFFFFFF;
pub const WHITE: u32 = 0xFFFFFFFF;

/// Packs floating-point channels into ARGB8888, clamping each to `[0, 1]`.
#[inline]
pub fn pack_color(r: f32, g: f32, b: f32, a: f32) -> u32 {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (to_byte(a) << 24) | (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
}

/// Unpacks the RGB channels of an ARGB8888 color into `[0, 1]` floats.
#[inline]
pub fn unpack_color(color: u32) -> (f32, f32, f32) {
    let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    (channel(16), channel(8), channel(0))
}
