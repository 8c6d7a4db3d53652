//! Lifecycle of a single concentric shape.
//!
//! A shape only tracks time and normalized progress. Radius is resolved against
//! whatever extent the owning instance passes in on each frame.

use crate::config::{EffectConfig, OpacityCurve, RepeatMode};
use crate::effect::RunToken;
use crate::geometry::{resolve_half_size, resolve_radius, RectScale, ScaleRange};
use crate::interpolate::{lerp, lerp_color, Argb, Easing};
use glam::Vec2;
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShapePhase {
    /// Allocated but not launched yet.
    #[default]
    Idle,
    /// Launched, waiting out the reveal delay.
    Starting,
    Running,
    /// Fading out after an external stop.
    Stopping,
    /// Terminal until restarted.
    Stopped,
}

impl ShapePhase {
    /// Whether a shape in this phase produces a draw record.
    #[inline]
    pub fn is_visible(self) -> bool {
        matches!(
            self,
            ShapePhase::Starting | ShapePhase::Running | ShapePhase::Stopping
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct StopFade {
    total_ms: f32,
    elapsed_ms: f32,
    from_opacity: f32,
}

#[derive(Clone, Debug)]
pub struct ShapeRuntime {
    token: RunToken,
    phase: ShapePhase,
    elapsed_ms: f32,
    cycle_index: u32,
    progress: f32,
    opacity: f32,
    color: Argb,
    fade: Option<StopFade>,
}

impl ShapeRuntime {
    pub fn new(token: RunToken) -> Self {
        Self {
            token,
            phase: ShapePhase::Idle,
            elapsed_ms: 0.0,
            cycle_index: 0,
            progress: 0.0,
            opacity: 0.0,
            color: Argb::TRANSPARENT,
            fade: None,
        }
    }

    pub fn token(&self) -> RunToken {
        self.token
    }
    pub fn phase(&self) -> ShapePhase {
        self.phase
    }
    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }
    pub fn cycle_index(&self) -> u32 {
        self.cycle_index
    }
    /// Sweep position in \[0, 1\] after the repeat direction is applied.
    pub fn progress(&self) -> f32 {
        self.progress
    }
    pub fn opacity(&self) -> f32 {
        self.opacity
    }
    pub fn color(&self) -> Argb {
        self.color
    }

    pub fn radius(&self, extent: f32, scale: ScaleRange, easing: Easing) -> f32 {
        resolve_radius(extent, self.progress, scale.min, scale.max, easing)
    }

    pub fn half_size(&self, target_half_size: Vec2, scale: RectScale, easing: Easing) -> Vec2 {
        resolve_half_size(target_half_size, self.progress, scale, easing)
    }

    /// Resets the shape and launches it. Ignored unless Idle or Stopped.
    pub fn request_start(&mut self, config: &EffectConfig) {
        if !matches!(self.phase, ShapePhase::Idle | ShapePhase::Stopped) {
            log::trace!("[shape] start ignored in {:?}", self.phase);
            return;
        }
        self.elapsed_ms = 0.0;
        self.cycle_index = 0;
        self.fade = None;
        if config.reveal_delay.is_zero() {
            self.phase = ShapePhase::Running;
            self.refresh(config);
        } else {
            self.phase = ShapePhase::Starting;
            self.hold(config);
        }
    }

    /// Begins a fade-out from the current opacity; `fade_ms <= 0` stops at once.
    pub fn request_stop(&mut self, fade_ms: f32) {
        match self.phase {
            ShapePhase::Stopped => {}
            ShapePhase::Idle => self.phase = ShapePhase::Stopped,
            _ if fade_ms <= 0.0 || !fade_ms.is_finite() => self.phase = ShapePhase::Stopped,
            _ => {
                self.fade = Some(StopFade {
                    total_ms: fade_ms,
                    elapsed_ms: 0.0,
                    from_opacity: self.opacity,
                });
                self.phase = ShapePhase::Stopping;
            }
        }
    }

    /// Moves the shape `delta_ms` forward. At most one cycle completes per call.
    pub fn advance(&mut self, delta_ms: f32, config: &EffectConfig) {
        let delta_ms = delta_ms.max(0.0);
        match self.phase {
            ShapePhase::Idle | ShapePhase::Stopped => {}
            ShapePhase::Starting => {
                self.elapsed_ms += delta_ms;
                let reveal_ms = config.reveal_delay_ms();
                if self.elapsed_ms < reveal_ms {
                    self.hold(config);
                } else {
                    let leftover = self.elapsed_ms - reveal_ms;
                    self.phase = ShapePhase::Running;
                    self.elapsed_ms = 0.0;
                    self.advance_running(leftover, config);
                }
            }
            ShapePhase::Running => self.advance_running(delta_ms, config),
            ShapePhase::Stopping => self.advance_fade(delta_ms),
        }
    }

    fn advance_running(&mut self, delta_ms: f32, config: &EffectConfig) {
        let duration_ms = config.duration_ms();
        self.elapsed_ms = (self.elapsed_ms + delta_ms).min(duration_ms);
        self.refresh(config);
        if self.elapsed_ms >= duration_ms {
            self.complete_cycle(config);
        }
    }

    fn complete_cycle(&mut self, config: &EffectConfig) {
        // Only parity matters once an unbounded run wraps.
        self.cycle_index = self.cycle_index.wrapping_add(1);
        match config.repeats.total_cycles() {
            Some(total) if self.cycle_index >= total => {
                self.phase = ShapePhase::Stopped;
            }
            _ => self.elapsed_ms = 0.0,
        }
    }

    fn advance_fade(&mut self, delta_ms: f32) {
        let Some(fade) = self.fade.as_mut() else {
            self.phase = ShapePhase::Stopped;
            return;
        };
        fade.elapsed_ms = (fade.elapsed_ms + delta_ms).min(fade.total_ms);
        let remaining = 1.0 - fade.elapsed_ms / fade.total_ms;
        self.opacity = fade.from_opacity * remaining;
        if fade.elapsed_ms >= fade.total_ms {
            self.opacity = 0.0;
            self.fade = None;
            self.phase = ShapePhase::Stopped;
        }
    }

    // Waiting shapes sit at the start of the sweep with minimum opacity.
    fn hold(&mut self, config: &EffectConfig) {
        self.progress = 0.0;
        self.opacity = config.min_opacity;
        self.color = config.color_start;
    }

    fn refresh(&mut self, config: &EffectConfig) {
        let duration_ms = config.duration_ms();
        let t = (self.elapsed_ms / duration_ms).clamp(0.0, 1.0);
        let p = match config.repeat_mode {
            RepeatMode::Reverse if self.cycle_index % 2 == 1 => 1.0 - t,
            _ => t,
        };
        self.progress = p;
        self.opacity = cycle_opacity(config, p);
        self.color = match (config.use_color_interpolation, config.color_end) {
            (true, Some(end)) => lerp_color(config.color_start, end, p),
            _ => config.color_start,
        };
    }
}

/// Opacity at sweep position `p` for the configured curve.
pub fn cycle_opacity(config: &EffectConfig, p: f32) -> f32 {
    let (min, max) = (config.min_opacity, config.max_opacity);
    let o = match config.opacity_curve {
        OpacityCurve::Swell => lerp(min, max, (PI * p).sin()),
        OpacityCurve::Fade => lerp(max, min, p),
    };
    o.clamp(0.0, 1.0)
}
