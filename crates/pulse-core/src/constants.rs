// Shared tuning defaults used by the effect presets and by hosts.

// Timing
pub const DEFAULT_DURATION_MS: u64 = 2000; // one grow-and-fade cycle
pub const DEFAULT_FADE_IN_MS: u64 = 300; // instance-wide entrance ramp
pub const DEFAULT_CONCEAL_MS: u64 = 300; // suggested stop fade for hosts

// Shape layout
pub const DEFAULT_SHAPE_COUNT: usize = 3;
pub const MAX_SHAPE_COUNT: usize = 64; // slots allocated per run
pub const DEFAULT_STROKE_WIDTH_PX: f32 = 2.5;
pub const DEFAULT_BORDER_WIDTH_PX: f32 = 2.5;

// Radius bounds as multiples of the target extent (half of its short side)
pub const INDICATOR_SCALE_MIN: f32 = 1.0;
pub const INDICATOR_SCALE_MAX: f32 = 2.0;
pub const RIPPLE_SCALE_MIN: f32 = 0.0;
pub const RIPPLE_SCALE_MAX: f32 = 2.0;

// Rounded-rect bounds as multiples of the target half size, per axis
pub const RECT_WIDTH_SCALE_MIN: f32 = 1.0;
pub const RECT_WIDTH_SCALE_MAX: f32 = 1.25;
pub const RECT_HEIGHT_SCALE_MIN: f32 = 1.0;
pub const RECT_HEIGHT_SCALE_MAX: f32 = 1.5;

// The indicator cuts the target itself out of the pulse
pub const INDICATOR_CLIP_SCALE: f32 = 1.0;

// Opacity range
pub const DEFAULT_MIN_OPACITY: f32 = 0.0;
pub const DEFAULT_MAX_OPACITY: f32 = 1.0;

// Colors (packed ARGB)
pub const DEFAULT_COLOR: u32 = 0xFFFF_FFFF;
pub const DEFAULT_STROKE_COLOR: u32 = 0xFFFF_FFFF;

// Easing
pub const BACK_TENSION: f32 = 1.701_58; // overshoot amount for ease-out-back
