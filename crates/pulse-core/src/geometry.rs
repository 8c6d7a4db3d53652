//! Target geometry: where an effect is centered and how large its shapes get.
//!
//! The engine never stores absolute target positions. A [`BoundsProvider`] is
//! queried on every tick so moves and resizes take effect immediately.

use crate::interpolate::{lerp, Easing};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

/// Current anchor of an effect: its center and a reference extent.
///
/// The extent is the radius unit that `scale_min`/`scale_max` multiply, usually
/// half of the target's shorter side. `half_size` is the unit for rounded-rect
/// shapes, scaled per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TargetBounds {
    pub center: Vec2,
    pub extent: f32,
    pub half_size: Vec2,
}

impl TargetBounds {
    /// Square bounds: `half_size` is `extent` on both axes.
    pub fn new(center: Vec2, extent: f32) -> Self {
        Self {
            center,
            extent,
            half_size: Vec2::splat(extent),
        }
    }

    /// Bounds of an axis-aligned rectangle given by its top-left corner and size.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        let w = width.max(0.0);
        let h = height.max(0.0);
        Self {
            center: Vec2::new(x + w / 2.0, y + h / 2.0),
            extent: w.min(h) / 2.0,
            half_size: Vec2::new(w / 2.0, h / 2.0),
        }
    }
}

/// Source of the latest target bounds, supplied by the host.
pub trait BoundsProvider {
    fn bounds(&self) -> TargetBounds;
}

impl<F> BoundsProvider for F
where
    F: Fn() -> TargetBounds,
{
    fn bounds(&self) -> TargetBounds {
        self()
    }
}

impl BoundsProvider for TargetBounds {
    fn bounds(&self) -> TargetBounds {
        *self
    }
}

// Shared cell the host rewrites on layout changes.
impl BoundsProvider for Rc<RefCell<TargetBounds>> {
    fn bounds(&self) -> TargetBounds {
        *self.borrow()
    }
}

/// Radius bounds expressed as multiples of the target extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
}

impl ScaleRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Per-axis bounds for rounded-rect shapes, as multiples of the target half size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectScale {
    pub width: ScaleRange,
    pub height: ScaleRange,
}

impl RectScale {
    pub fn new(width: ScaleRange, height: ScaleRange) -> Self {
        Self { width, height }
    }

    /// Half size at the start of the sweep.
    pub fn min_half_size(&self, half_size: Vec2) -> Vec2 {
        sanitize(half_size * Vec2::new(self.width.min, self.height.min))
    }
}

#[inline]
pub fn resolve_center(bounds: &TargetBounds, offset_x: f32, offset_y: f32) -> Vec2 {
    bounds.center + Vec2::new(offset_x, offset_y)
}

/// `extent * lerp(scale_min, scale_max, easing(t))`, never negative.
///
/// Unmeasured targets (zero or non-finite extent) resolve to radius 0.
pub fn resolve_radius(extent: f32, t: f32, scale_min: f32, scale_max: f32, easing: Easing) -> f32 {
    if !extent.is_finite() || extent <= 0.0 {
        return 0.0;
    }
    let r = extent * lerp(scale_min, scale_max, easing.apply(t));
    if r.is_finite() {
        r.max(0.0)
    } else {
        0.0
    }
}

/// Rounded-rect counterpart of [`resolve_radius`], applied to each axis.
pub fn resolve_half_size(half_size: Vec2, t: f32, scale: RectScale, easing: Easing) -> Vec2 {
    let e = easing.apply(t);
    sanitize(Vec2::new(
        half_size.x * lerp(scale.width.min, scale.width.max, e),
        half_size.y * lerp(scale.height.min, scale.height.max, e),
    ))
}

fn sanitize(v: Vec2) -> Vec2 {
    let axis = |a: f32| if a.is_finite() { a.max(0.0) } else { 0.0 };
    Vec2::new(axis(v.x), axis(v.y))
}
