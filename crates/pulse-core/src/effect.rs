//! One configured effect: a group of staggered shapes anchored to a target.
//!
//! All timing is driven from [`EffectInstance::tick`]. Launch offsets, reveal
//! delays and scheduled stops are thresholds on the run clock, so there are no
//! deferred callbacks that could outlive the run that created them.

use crate::config::{
    validate_rect_scale, validate_scale, ConfigError, EffectConfig, ShapeKind,
};
use crate::geometry::{resolve_center, BoundsProvider, RectScale, ScaleRange, TargetBounds};
use crate::interpolate::ease_out_decelerate;
use crate::render::{DrawList, DrawRecord, Outline, Ring};
use crate::shape::{ShapePhase, ShapeRuntime};
use glam::Vec2;
use std::time::Duration;

/// Identifies one `start` of an instance. Operations carrying an older token
/// are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunToken(u64);

impl RunToken {
    #[inline]
    pub fn next(self) -> Self {
        RunToken(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Slot {
    launch_at_ms: Option<f64>,
    shape: ShapeRuntime,
}

#[derive(Clone, Copy, Debug)]
struct PendingStop {
    at_ms: f64,
    fade_ms: f32,
    token: RunToken,
}

#[inline]
pub(crate) fn millis(d: Duration) -> f32 {
    millis_f64(d) as f32
}

// Run clocks stay in f64 so 16 ms ticks still register after days of uptime.
#[inline]
fn millis_f64(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

pub struct EffectInstance {
    config: EffectConfig,
    target: Option<Box<dyn BoundsProvider>>,
    scale: ScaleRange,
    rect_scale: RectScale,
    slots: Vec<Slot>,
    token: RunToken,
    clock_ms: f64,
    running: bool,
    pending_stop: Option<PendingStop>,
    // Fade-in multiplier last drawn; held once the run is told to stop.
    presence: f32,
    presence_held: bool,
}

impl EffectInstance {
    /// Validates `config` so an instance never runs with broken parameters.
    pub fn new(config: EffectConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scale: config.scale,
            rect_scale: config.rect_scale,
            config,
            target: None,
            slots: Vec::new(),
            token: RunToken::default(),
            clock_ms: 0.0,
            running: false,
            pending_stop: None,
            presence: 0.0,
            presence_held: false,
        })
    }

    pub fn with_target(mut self, provider: impl BoundsProvider + 'static) -> Self {
        self.target = Some(Box::new(provider));
        self
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Scale range currently used for radius resolution.
    pub fn scale(&self) -> ScaleRange {
        self.scale
    }

    /// Per-axis bounds currently used for rounded-rect shapes.
    pub fn rect_scale(&self) -> RectScale {
        self.rect_scale
    }

    /// Replaces the rounded-rect bounds; applies from the next tick on.
    pub fn set_rect_scale(&mut self, scale: RectScale) -> Result<(), ConfigError> {
        validate_rect_scale(scale)?;
        self.rect_scale = scale;
        Ok(())
    }

    pub fn run_token(&self) -> RunToken {
        self.token
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Phase of every shape of the current run, in shape-index order.
    pub fn phases(&self) -> impl Iterator<Item = ShapePhase> + '_ {
        self.slots.iter().map(|s| s.shape.phase())
    }

    pub fn shapes(&self) -> impl Iterator<Item = &ShapeRuntime> + '_ {
        self.slots.iter().map(|s| &s.shape)
    }

    /// Anchors the effect to `provider`, queried again on every tick.
    ///
    /// A `scale` override applies from the next tick on, including to shapes
    /// already in flight.
    pub fn set_target(
        &mut self,
        provider: impl BoundsProvider + 'static,
        scale: Option<ScaleRange>,
    ) -> Result<(), ConfigError> {
        if let Some(scale) = scale {
            validate_scale(scale)?;
            self.scale = scale;
        }
        self.target = Some(Box::new(provider));
        log::debug!("[effect] {:?} target updated", self.config.kind);
        Ok(())
    }

    /// Starts a fresh run. `stagger` defaults to `duration / count`.
    pub fn start(&mut self, stagger: Option<Duration>) -> RunToken {
        self.start_after(Duration::ZERO, stagger)
    }

    /// Starts a fresh run whose first shape launches after `initial_delay`.
    ///
    /// Shapes of any previous run, including ones still fading out, are dropped.
    pub fn start_after(&mut self, initial_delay: Duration, stagger: Option<Duration>) -> RunToken {
        self.token = self.token.next();
        let count = self.config.count;
        let stagger_ms = match stagger {
            Some(s) => millis(s),
            None => self.config.duration_ms() / count as f32,
        };
        let initial_ms = millis_f64(initial_delay);
        self.slots = (0..count)
            .map(|i| Slot {
                launch_at_ms: Some(initial_ms + i as f64 * stagger_ms as f64),
                shape: ShapeRuntime::new(self.token),
            })
            .collect();
        self.clock_ms = 0.0;
        self.pending_stop = None;
        self.running = true;
        self.presence_held = false;
        self.presence = self.fade_in_ramp();
        self.launch_due();
        log::debug!(
            "[effect] {:?} run {} started: {} shapes, stagger {:.1}ms",
            self.config.kind,
            self.token.value(),
            count,
            stagger_ms
        );
        self.token
    }

    /// Stops every shape. `None` or a zero fade cancels immediately and no
    /// further draw records are produced.
    pub fn stop(&mut self, fade: Option<Duration>) {
        let fade_ms = fade.map(millis).unwrap_or(0.0);
        self.stop_ms(fade_ms);
    }

    /// Stops only if `token` still names the current run.
    pub fn stop_run(&mut self, token: RunToken, fade: Option<Duration>) -> bool {
        if token != self.token {
            log::debug!(
                "[effect] ignoring stop for run {} (current {})",
                token.value(),
                self.token.value()
            );
            return false;
        }
        self.stop(fade);
        true
    }

    /// Stops the current run once `after` more time has been ticked.
    pub fn schedule_stop(&mut self, after: Duration, fade: Option<Duration>) -> RunToken {
        self.pending_stop = Some(PendingStop {
            at_ms: self.clock_ms + millis_f64(after),
            fade_ms: fade.map(millis).unwrap_or(0.0),
            token: self.token,
        });
        self.token
    }

    fn stop_ms(&mut self, fade_ms: f32) {
        let token = self.token;
        for slot in self.slots.iter_mut().filter(|s| s.shape.token() == token) {
            slot.launch_at_ms = None;
            slot.shape.request_stop(fade_ms);
        }
        self.pending_stop = None;
        // Fading shapes must never brighten, so the entrance ramp stops here.
        self.presence_held = true;
        self.refresh_running();
        log::debug!(
            "[effect] {:?} run {} stopping, fade {:.1}ms",
            self.config.kind,
            token.value(),
            fade_ms
        );
    }

    /// Advances the run clock and returns what to paint this frame.
    pub fn tick(&mut self, dt: Duration) -> DrawList {
        let mut out = DrawList::new();
        if !self.running {
            return out;
        }
        let dt_ms = millis_f64(dt);
        self.clock_ms += dt_ms;

        if let Some(pending) = self.pending_stop {
            if pending.token != self.token {
                self.pending_stop = None;
            } else if self.clock_ms >= pending.at_ms {
                self.stop_ms(pending.fade_ms);
            }
        }

        let token = self.token;
        let clock_ms = self.clock_ms;
        for slot in self.slots.iter_mut().filter(|s| s.shape.token() == token) {
            match slot.launch_at_ms {
                Some(at) if clock_ms >= at => {
                    slot.launch_at_ms = None;
                    slot.shape.request_start(&self.config);
                    slot.shape.advance((clock_ms - at) as f32, &self.config);
                }
                Some(_) => {}
                None => slot.shape.advance(dt_ms as f32, &self.config),
            }
        }
        self.refresh_running();

        let bounds = self
            .target
            .as_ref()
            .map(|t| t.bounds())
            .unwrap_or_default();
        if !self.presence_held {
            self.presence = self.fade_in_ramp();
        }
        let presence = self.presence;
        for slot in &self.slots {
            if slot.shape.token() == token && slot.shape.phase().is_visible() {
                out.push(self.draw_record(&slot.shape, &bounds, presence));
            }
        }
        out
    }

    fn launch_due(&mut self) {
        let clock_ms = self.clock_ms;
        for slot in &mut self.slots {
            if matches!(slot.launch_at_ms, Some(at) if clock_ms >= at) {
                slot.launch_at_ms = None;
                slot.shape.request_start(&self.config);
            }
        }
    }

    fn refresh_running(&mut self) {
        let token = self.token;
        self.running = self.slots.iter().any(|s| {
            s.shape.token() == token
                && (s.launch_at_ms.is_some() || s.shape.phase() != ShapePhase::Stopped)
        });
    }

    // Entrance ramp shared by every shape of the run.
    fn fade_in_ramp(&self) -> f32 {
        let fade_in_ms = millis_f64(self.config.fade_in);
        if fade_in_ms <= 0.0 {
            return 1.0;
        }
        ease_out_decelerate((self.clock_ms / fade_in_ms).clamp(0.0, 1.0) as f32)
    }

    fn draw_record(&self, shape: &ShapeRuntime, bounds: &TargetBounds, presence: f32) -> DrawRecord {
        let cfg = &self.config;
        let extent = bounds.extent.max(0.0);
        let clip_scale = cfg.clip_scale.unwrap_or(0.0);
        let (outline, inner, clip) = match cfg.shape {
            ShapeKind::Circle => (
                Outline::circle(shape.radius(extent, self.scale, cfg.easing)),
                Outline::circle(extent * self.scale.min),
                Outline::circle(extent * clip_scale),
            ),
            ShapeKind::RoundRect { corner_radius_px } => {
                let half = bounds.half_size.max(Vec2::ZERO);
                (
                    Outline::round_rect(
                        shape.half_size(half, self.rect_scale, cfg.easing),
                        corner_radius_px,
                    ),
                    Outline::round_rect(self.rect_scale.min_half_size(half), corner_radius_px),
                    Outline::round_rect(half * clip_scale, corner_radius_px),
                )
            }
        };
        let radius = outline.bounding_radius();
        let border = (cfg.show_border_stroke && cfg.border_width_px > 0.0).then_some(Ring {
            radius,
            outline,
            color: cfg.stroke_color,
            width_px: cfg.border_width_px,
        });
        let inner_outline = cfg.inner_outline.map(|o| Ring {
            radius: inner.bounding_radius(),
            outline: inner,
            color: o.color,
            width_px: o.width_px,
        });
        DrawRecord {
            center: resolve_center(bounds, cfg.offset_x, cfg.offset_y),
            radius,
            outline,
            opacity: (shape.opacity() * presence).clamp(0.0, 1.0),
            color: shape.color(),
            stroke_width_px: cfg.stroke_width_px,
            filled: cfg.filled(),
            border,
            clip_radius: clip.bounding_radius(),
            clip,
            inner_outline,
        }
    }
}

impl std::fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectInstance")
            .field("kind", &self.config.kind)
            .field("token", &self.token)
            .field("running", &self.running)
            .field("clock_ms", &self.clock_ms)
            .field("shapes", &self.slots.len())
            .finish()
    }
}
