//! Validated, immutable parameter bundle for one effect instance.

use crate::constants::*;
use crate::effect::millis;
use crate::geometry::{RectScale, ScaleRange};
use crate::interpolate::{Argb, Easing};
use std::time::Duration;
use thiserror::Error;

/// Which logical effect a configuration drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Persistent pulse around a target, drawn outside the target itself.
    Indicator,
    /// Short burst spreading out from a tapped target.
    Ripple,
}

/// How a shape continues after finishing a cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatMode {
    /// Jump back to the start of the sweep.
    #[default]
    Restart,
    /// Play every odd cycle backwards.
    Reverse,
}

/// Number of cycles a shape plays before stopping on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Play this many cycles. `Count(0)` plays a single cycle.
    Count(u32),
    Infinite,
}

impl Repeat {
    /// Total cycles to play, `None` when unbounded.
    pub fn total_cycles(self) -> Option<u32> {
        match self {
            Repeat::Count(n) => Some(n.max(1)),
            Repeat::Infinite => None,
        }
    }
}

/// Opacity over one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpacityCurve {
    /// `min -> max -> min`, peaking mid-cycle.
    #[default]
    Swell,
    /// Starts at `max` and decays linearly to `min`.
    Fade,
}

/// Outline every shape of an effect is drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ShapeKind {
    #[default]
    Circle,
    /// Rounded rectangle sized per axis from the target's half size.
    RoundRect { corner_radius_px: f32 },
}

/// Fixed ring drawn at the minimum radius for the whole run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InnerOutline {
    pub color: Argb,
    pub width_px: f32,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("duration must be greater than zero")]
    ZeroDuration,

    #[error("count must be at least 1")]
    ZeroCount,

    #[error("count {count} exceeds the maximum of {max}")]
    TooManyShapes { count: usize, max: usize },

    #[error("{name} must be within 0.0..=1.0, got {value}")]
    OpacityOutOfRange { name: &'static str, value: f32 },

    #[error("min opacity {min} is greater than max opacity {max}")]
    OpacityInverted { min: f32, max: f32 },

    #[error("{name} must be a finite, non-negative width, got {value}")]
    InvalidWidth { name: &'static str, value: f32 },

    #[error("scale range must satisfy 0 <= min < max, got {min}..{max}")]
    InvalidScale { min: f32, max: f32 },

    #[error("clip scale must be finite and non-negative, got {0}")]
    InvalidClipScale(f32),

    #[error("offsets must be finite, got ({x}, {y})")]
    InvalidOffset { x: f32, y: f32 },
}

/// Immutable effect parameters. Construct with [`EffectConfig::builder`] or one
/// of the presets.
///
/// Fields:
/// - `color_start` / `color_end`: body color, and the color it blends toward
///   over a cycle when `use_color_interpolation` is set
/// - `stroke_width_px`: ring width; 0 draws a filled disc
/// - `reveal_delay`: wait between a shape's launch and its first cycle
/// - `scale`: radius bounds as multiples of the target extent
/// - `shape` / `rect_scale`: outline kind, and per-axis bounds used when it is
///   a rounded rect
/// - `fade_in`: instance-wide entrance ramp after `start`
/// - `clip_scale`: radius (in extents) the host must leave unpainted
#[derive(Clone, Debug, PartialEq)]
pub struct EffectConfig {
    pub kind: EffectKind,
    pub color_start: Argb,
    pub color_end: Option<Argb>,
    pub stroke_color: Argb,
    pub count: usize,
    pub duration: Duration,
    pub repeats: Repeat,
    pub repeat_mode: RepeatMode,
    pub min_opacity: f32,
    pub max_opacity: f32,
    pub stroke_width_px: f32,
    pub show_border_stroke: bool,
    pub border_width_px: f32,
    pub reveal_delay: Duration,
    pub use_color_interpolation: bool,
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: ScaleRange,
    pub shape: ShapeKind,
    pub rect_scale: RectScale,
    pub easing: Easing,
    pub opacity_curve: OpacityCurve,
    pub fade_in: Duration,
    pub clip_scale: Option<f32>,
    pub inner_outline: Option<InnerOutline>,
}

impl EffectConfig {
    pub fn builder(kind: EffectKind) -> EffectConfigBuilder {
        EffectConfigBuilder::new(kind)
    }

    /// Three filled rings pulsing around the target, repeating forever.
    pub fn indicator() -> EffectConfig {
        Self::defaults(EffectKind::Indicator)
    }

    /// Three outlined rings spreading from the target center, repeating forever.
    pub fn ripple() -> EffectConfig {
        Self::defaults(EffectKind::Ripple)
    }

    fn defaults(kind: EffectKind) -> EffectConfig {
        let (scale, stroke_width_px, clip_scale, opacity_curve) = match kind {
            EffectKind::Indicator => (
                ScaleRange::new(INDICATOR_SCALE_MIN, INDICATOR_SCALE_MAX),
                0.0,
                Some(INDICATOR_CLIP_SCALE),
                OpacityCurve::Fade,
            ),
            EffectKind::Ripple => (
                ScaleRange::new(RIPPLE_SCALE_MIN, RIPPLE_SCALE_MAX),
                DEFAULT_STROKE_WIDTH_PX,
                None,
                OpacityCurve::Swell,
            ),
        };
        EffectConfig {
            kind,
            color_start: Argb(DEFAULT_COLOR),
            color_end: None,
            stroke_color: Argb(DEFAULT_STROKE_COLOR),
            count: DEFAULT_SHAPE_COUNT,
            duration: Duration::from_millis(DEFAULT_DURATION_MS),
            repeats: Repeat::Infinite,
            repeat_mode: RepeatMode::Restart,
            min_opacity: DEFAULT_MIN_OPACITY,
            max_opacity: DEFAULT_MAX_OPACITY,
            stroke_width_px,
            show_border_stroke: false,
            border_width_px: DEFAULT_BORDER_WIDTH_PX,
            reveal_delay: Duration::ZERO,
            use_color_interpolation: false,
            offset_x: 0.0,
            offset_y: 0.0,
            scale,
            shape: ShapeKind::Circle,
            rect_scale: RectScale::new(
                ScaleRange::new(RECT_WIDTH_SCALE_MIN, RECT_WIDTH_SCALE_MAX),
                ScaleRange::new(RECT_HEIGHT_SCALE_MIN, RECT_HEIGHT_SCALE_MAX),
            ),
            easing: Easing::Linear,
            opacity_curve,
            fade_in: Duration::from_millis(DEFAULT_FADE_IN_MS),
            clip_scale,
            inner_outline: None,
        }
    }

    #[inline]
    pub fn duration_ms(&self) -> f32 {
        millis(self.duration)
    }

    #[inline]
    pub fn reveal_delay_ms(&self) -> f32 {
        millis(self.reveal_delay)
    }

    #[inline]
    pub fn filled(&self) -> bool {
        self.stroke_width_px == 0.0
    }

    /// Rejects parameters a running instance cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        if self.count < 1 {
            return Err(ConfigError::ZeroCount);
        }
        if self.count > MAX_SHAPE_COUNT {
            return Err(ConfigError::TooManyShapes {
                count: self.count,
                max: MAX_SHAPE_COUNT,
            });
        }
        for (name, value) in [
            ("min_opacity", self.min_opacity),
            ("max_opacity", self.max_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OpacityOutOfRange { name, value });
            }
        }
        if self.min_opacity > self.max_opacity {
            return Err(ConfigError::OpacityInverted {
                min: self.min_opacity,
                max: self.max_opacity,
            });
        }
        let mut widths = vec![
            ("stroke_width_px", self.stroke_width_px),
            ("border_width_px", self.border_width_px),
        ];
        if let Some(outline) = self.inner_outline {
            widths.push(("inner_outline.width_px", outline.width_px));
        }
        if let ShapeKind::RoundRect { corner_radius_px } = self.shape {
            widths.push(("corner_radius_px", corner_radius_px));
        }
        for (name, value) in widths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWidth { name, value });
            }
        }
        validate_scale(self.scale)?;
        validate_rect_scale(self.rect_scale)?;
        if let Some(clip) = self.clip_scale {
            if !clip.is_finite() || clip < 0.0 {
                return Err(ConfigError::InvalidClipScale(clip));
            }
        }
        if !self.offset_x.is_finite() || !self.offset_y.is_finite() {
            return Err(ConfigError::InvalidOffset {
                x: self.offset_x,
                y: self.offset_y,
            });
        }
        Ok(())
    }
}

pub(crate) fn validate_scale(scale: ScaleRange) -> Result<(), ConfigError> {
    let ok = scale.min.is_finite() && scale.max.is_finite() && scale.min >= 0.0;
    if !ok || scale.min >= scale.max {
        return Err(ConfigError::InvalidScale {
            min: scale.min,
            max: scale.max,
        });
    }
    Ok(())
}

pub(crate) fn validate_rect_scale(scale: RectScale) -> Result<(), ConfigError> {
    validate_scale(scale.width)?;
    validate_scale(scale.height)
}

/// Mutable staging area for an [`EffectConfig`]; `build` validates it.
#[derive(Clone, Debug)]
pub struct EffectConfigBuilder {
    config: EffectConfig,
}

impl EffectConfigBuilder {
    /// Starts from the preset for `kind`.
    pub fn new(kind: EffectKind) -> Self {
        Self {
            config: EffectConfig::defaults(kind),
        }
    }

    pub fn color(mut self, color: Argb) -> Self {
        self.config.color_start = color;
        self
    }

    /// Blend from `start` to `end` over each cycle.
    pub fn color_range(mut self, start: Argb, end: Argb) -> Self {
        self.config.color_start = start;
        self.config.color_end = Some(end);
        self.config.use_color_interpolation = true;
        self
    }

    pub fn use_color_interpolation(mut self, enabled: bool) -> Self {
        self.config.use_color_interpolation = enabled;
        self
    }

    pub fn stroke_color(mut self, color: Argb) -> Self {
        self.config.stroke_color = color;
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.config.count = count;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    pub fn repeats(mut self, repeats: Repeat) -> Self {
        self.config.repeats = repeats;
        self
    }

    pub fn repeat_mode(mut self, mode: RepeatMode) -> Self {
        self.config.repeat_mode = mode;
        self
    }

    pub fn opacity(mut self, min: f32, max: f32) -> Self {
        self.config.min_opacity = min;
        self.config.max_opacity = max;
        self
    }

    pub fn stroke_width_px(mut self, width: f32) -> Self {
        self.config.stroke_width_px = width;
        self
    }

    pub fn border(mut self, show: bool, width_px: f32) -> Self {
        self.config.show_border_stroke = show;
        self.config.border_width_px = width_px;
        self
    }

    pub fn reveal_delay(mut self, delay: Duration) -> Self {
        self.config.reveal_delay = delay;
        self
    }

    pub fn offset(mut self, x: f32, y: f32) -> Self {
        self.config.offset_x = x;
        self.config.offset_y = y;
        self
    }

    pub fn scale(mut self, min: f32, max: f32) -> Self {
        self.config.scale = ScaleRange::new(min, max);
        self
    }

    pub fn shape(mut self, shape: ShapeKind) -> Self {
        self.config.shape = shape;
        self
    }

    /// Width and height bounds for rounded-rect shapes.
    pub fn rect_scale(mut self, width: ScaleRange, height: ScaleRange) -> Self {
        self.config.rect_scale = RectScale::new(width, height);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.config.easing = easing;
        self
    }

    pub fn opacity_curve(mut self, curve: OpacityCurve) -> Self {
        self.config.opacity_curve = curve;
        self
    }

    pub fn fade_in(mut self, fade_in: Duration) -> Self {
        self.config.fade_in = fade_in;
        self
    }

    pub fn clip_scale(mut self, clip: Option<f32>) -> Self {
        self.config.clip_scale = clip;
        self
    }

    pub fn inner_outline(mut self, outline: Option<InnerOutline>) -> Self {
        self.config.inner_outline = outline;
        self
    }

    pub fn build(self) -> Result<EffectConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
