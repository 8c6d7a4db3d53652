//! Frame-facing surface: the records a host paints and the per-frame entry point.

use crate::config::EffectKind;
use crate::effect::EffectInstance;
use crate::interpolate::Argb;
use glam::Vec2;
use smallvec::SmallVec;
use std::time::Duration;

/// Rounded box around a center. A circle is a box whose corner radius equals
/// its half size on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Outline {
    pub half_size: Vec2,
    pub corner_radius: f32,
}

impl Outline {
    pub fn circle(radius: f32) -> Self {
        Self {
            half_size: Vec2::splat(radius),
            corner_radius: radius,
        }
    }

    /// Corner radius is clamped to the shorter half axis.
    pub fn round_rect(half_size: Vec2, corner_radius: f32) -> Self {
        Self {
            half_size,
            corner_radius: corner_radius.clamp(0.0, half_size.min_element().max(0.0)),
        }
    }

    /// Radius of the smallest circle around the box's axis-aligned extent.
    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        self.half_size.max_element()
    }
}

/// Stroked outline drawn alongside a shape (border or inner outline).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    pub radius: f32,
    pub outline: Outline,
    pub color: Argb,
    pub width_px: f32,
}

/// Everything needed to paint one shape for the current frame.
///
/// `opacity` multiplies the alpha of `color`, `border` and `inner_outline`.
/// `radius` is the circle radius, or the larger half axis of a rounded rect;
/// `outline` carries the exact box. When `clip_radius > 0` the host should
/// leave `clip` (centered on `center`) unpainted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawRecord {
    pub center: Vec2,
    pub radius: f32,
    pub outline: Outline,
    pub opacity: f32,
    pub color: Argb,
    pub stroke_width_px: f32,
    pub filled: bool,
    pub border: Option<Ring>,
    pub clip_radius: f32,
    pub clip: Outline,
    pub inner_outline: Option<Ring>,
}

/// Draw records for one frame, in shape-index order.
pub type DrawList = SmallVec<[DrawRecord; 4]>;

/// Packed per-instance data for a GPU rounded-box pipeline.
///
/// `stroke_width == 0` means a filled box. `color` is straight RGBA with the
/// record opacity already folded into alpha. A zero `clip_radius` disables the
/// clip box.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub stroke_width: f32,
    pub color: [f32; 4],
    pub half_size: [f32; 2],
    pub corner_radius: f32,
    pub clip_radius: f32,
    pub clip_half_size: [f32; 2],
    pub clip_corner_radius: f32,
    pub _pad: f32,
}

impl DrawRecord {
    fn instance(
        &self,
        radius: f32,
        outline: Outline,
        color: Argb,
        stroke_width: f32,
    ) -> ShapeInstance {
        let mut rgba = color.to_rgba_f32();
        rgba[3] *= self.opacity;
        ShapeInstance {
            center: self.center.to_array(),
            radius,
            stroke_width,
            color: rgba,
            half_size: outline.half_size.to_array(),
            corner_radius: outline.corner_radius,
            clip_radius: self.clip_radius,
            clip_half_size: self.clip.half_size.to_array(),
            clip_corner_radius: self.clip.corner_radius,
            _pad: 0.0,
        }
    }

    /// Body instance, without border or inner outline.
    pub fn to_instance(&self) -> ShapeInstance {
        let stroke = if self.filled { 0.0 } else { self.stroke_width_px };
        self.instance(self.radius, self.outline, self.color, stroke)
    }

    /// Appends the body followed by its border and inner outline rings.
    pub fn push_instances(&self, out: &mut Vec<ShapeInstance>) {
        out.push(self.to_instance());
        for ring in [self.border, self.inner_outline].into_iter().flatten() {
            out.push(self.instance(ring.radius, ring.outline, ring.color, ring.width_px));
        }
    }
}

/// What a host calls once per display frame.
pub trait FrameRenderer {
    fn on_tick(&mut self, dt: Duration) -> DrawList;
    fn is_running(&self) -> bool;
}

impl FrameRenderer for EffectInstance {
    fn on_tick(&mut self, dt: Duration) -> DrawList {
        self.tick(dt)
    }

    fn is_running(&self) -> bool {
        EffectInstance::is_running(self)
    }
}

/// Host-side holder with at most one instance per [`EffectKind`].
#[derive(Debug, Default)]
pub struct EffectSet {
    indicator: Option<EffectInstance>,
    ripple: Option<EffectInstance>,
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, kind: EffectKind) -> &mut Option<EffectInstance> {
        match kind {
            EffectKind::Indicator => &mut self.indicator,
            EffectKind::Ripple => &mut self.ripple,
        }
    }

    /// Places `instance` in the slot for its kind, returning the one it replaces.
    pub fn insert(&mut self, instance: EffectInstance) -> Option<EffectInstance> {
        let kind = instance.config().kind;
        self.slot_mut(kind).replace(instance)
    }

    pub fn remove(&mut self, kind: EffectKind) -> Option<EffectInstance> {
        self.slot_mut(kind).take()
    }

    pub fn get(&self, kind: EffectKind) -> Option<&EffectInstance> {
        match kind {
            EffectKind::Indicator => self.indicator.as_ref(),
            EffectKind::Ripple => self.ripple.as_ref(),
        }
    }

    pub fn get_mut(&mut self, kind: EffectKind) -> Option<&mut EffectInstance> {
        self.slot_mut(kind).as_mut()
    }

    pub fn stop_all(&mut self, fade: Option<Duration>) {
        for instance in [&mut self.indicator, &mut self.ripple]
            .into_iter()
            .flatten()
        {
            instance.stop(fade);
        }
    }

    /// Ticks the indicator, then the ripple, and concatenates their records.
    pub fn tick(&mut self, dt: Duration) -> DrawList {
        let mut out = DrawList::new();
        for instance in [&mut self.indicator, &mut self.ripple]
            .into_iter()
            .flatten()
        {
            out.extend(instance.tick(dt));
        }
        out
    }
}

impl FrameRenderer for EffectSet {
    fn on_tick(&mut self, dt: Duration) -> DrawList {
        self.tick(dt)
    }

    fn is_running(&self) -> bool {
        [&self.indicator, &self.ripple]
            .into_iter()
            .flatten()
            .any(|i| i.is_running())
    }
}
