//! Scalar and color interpolation plus the easing curves used by the engine.
//!
//! Everything here is pure and deterministic: the same inputs always produce the
//! same output, which keeps the per-frame state machine easy to test.

use crate::constants::BACK_TENSION;
use std::f32::consts::PI;

/// Linear interpolation between `a` and `b`. `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Overshooting ease-out: passes 1.0 before settling back onto it.
#[inline]
pub fn ease_out_back(t: f32) -> f32 {
    let c1 = BACK_TENSION;
    let c3 = c1 + 1.0;
    let u = t - 1.0;
    1.0 + c3 * u * u * u + c1 * u * u
}

/// Quadratic deceleration, fast at first and flat at the end.
#[inline]
pub fn ease_out_decelerate(t: f32) -> f32 {
    let u = 1.0 - t;
    1.0 - u * u
}

#[inline]
pub fn accelerate_decelerate(t: f32) -> f32 {
    ((t + 1.0) * PI).cos() / 2.0 + 0.5
}

/// Named curve applied to a cycle's normalized progress before radius lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    EaseOutBack,
    EaseOutDecelerate,
    AccelerateDecelerate,
}

impl Easing {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseOutBack => ease_out_back(t),
            Easing::EaseOutDecelerate => ease_out_decelerate(t),
            Easing::AccelerateDecelerate => accelerate_decelerate(t),
        }
    }
}

/// Packed `0xAARRGGBB` color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    pub const TRANSPARENT: Argb = Argb(0x0000_0000);
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);
    pub const BLACK: Argb = Argb(0xFF00_0000);

    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Argb(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }
    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }
    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Argb((self.0 & 0x00FF_FFFF) | ((a as u32) << 24))
    }

    /// Straight (non-premultiplied) RGBA in 0..1, the layout GPU hosts expect.
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.red() as f32 / 255.0,
            self.green() as f32 / 255.0,
            self.blue() as f32 / 255.0,
            self.alpha() as f32 / 255.0,
        ]
    }
}

impl From<u32> for Argb {
    fn from(v: u32) -> Self {
        Argb(v)
    }
}

#[inline]
fn lerp_channel(a: u8, b: u8, t: f32) -> u8 {
    lerp(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8
}

/// Per-channel linear blend of two colors; `t` is clamped to \[0, 1\].
pub fn lerp_color(c0: Argb, c1: Argb, t: f32) -> Argb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    Argb::from_argb(
        lerp_channel(c0.alpha(), c1.alpha(), t),
        lerp_channel(c0.red(), c1.red(), t),
        lerp_channel(c0.green(), c1.green(), t),
        lerp_channel(c0.blue(), c1.blue(), t),
    )
}
