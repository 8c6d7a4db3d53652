use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use glam::Vec2;
use instant::Instant;
use rand::prelude::*;

use pulse_core::{
    Argb, EffectConfig, EffectInstance, EffectKind, EffectSet, FrameRenderer, Repeat,
    ShapeInstance, ShapeKind, TargetBounds, DEFAULT_BORDER_WIDTH_PX, DEFAULT_CONCEAL_MS,
};

// Headless host: a drifting target with an indicator on it, one tap ripple,
// and a faded stop. Frames are packed as they would be for a GPU upload.

const VIEWPORT: [f32; 2] = [800.0, 600.0];
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const SEED: u64 = 7;

const TAP_AT_SEC: f32 = 2.0;
const STOP_AT_SEC: f32 = 4.5;
const MAX_RUN_SEC: f32 = 8.0;

const TARGET_MIN_SIDE: f32 = 24.0;
const TARGET_MAX_SIDE: f32 = 160.0;
const RESIZE_CHANCE_PER_FRAME: f32 = 0.02;
const TARGET_CORNER_RADIUS: f32 = 8.0;

/// Target rectangle wandering around the viewport, published through a shared
/// cell the effects read on every tick.
struct DriftingTarget {
    pos: Vec2,
    size: Vec2,
    vel: Vec2,
    rng: StdRng,
    bounds: Rc<RefCell<TargetBounds>>,
}

impl DriftingTarget {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let pos = Vec2::new(
            rng.gen_range(0.0..VIEWPORT[0] - TARGET_MAX_SIDE),
            rng.gen_range(0.0..VIEWPORT[1] - TARGET_MAX_SIDE),
        );
        let size = Vec2::splat(64.0);
        let vel = Vec2::new(rng.gen_range(-80.0..80.0), rng.gen_range(-60.0..60.0));
        let bounds = Rc::new(RefCell::new(TargetBounds::from_rect(
            pos.x, pos.y, size.x, size.y,
        )));
        Self {
            pos,
            size,
            vel,
            rng,
            bounds,
        }
    }

    fn step(&mut self, dt_sec: f32) {
        self.pos += self.vel * dt_sec;
        let max = Vec2::from(VIEWPORT) - self.size;
        if self.pos.x < 0.0 || self.pos.x > max.x {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0.0 || self.pos.y > max.y {
            self.vel.y = -self.vel.y;
        }
        self.pos = self.pos.clamp(Vec2::ZERO, max.max(Vec2::ZERO));

        if self.rng.gen::<f32>() < RESIZE_CHANCE_PER_FRAME {
            let factor: f32 = self.rng.gen_range(0.8..1.25);
            self.size = (self.size * factor).clamp(
                Vec2::splat(TARGET_MIN_SIDE),
                Vec2::splat(TARGET_MAX_SIDE),
            );
            log::debug!("[target] resized to {:.0}x{:.0}", self.size.x, self.size.y);
        }

        *self.bounds.borrow_mut() =
            TargetBounds::from_rect(self.pos.x, self.pos.y, self.size.x, self.size.y);
    }
}

#[derive(Default)]
struct FrameStats {
    frames: u32,
    records: usize,
    instances: usize,
    bytes: usize,
    max_radius: f32,
}

fn build_indicator(target: &DriftingTarget) -> anyhow::Result<EffectInstance> {
    let config = EffectConfig::builder(EffectKind::Indicator)
        .color_range(Argb(0xFF3F_51B5), Argb(0xFF00_BCD4))
        .stroke_color(Argb::WHITE)
        .border(true, DEFAULT_BORDER_WIDTH_PX)
        .shape(ShapeKind::RoundRect {
            corner_radius_px: TARGET_CORNER_RADIUS,
        })
        .opacity(0.0, 0.8)
        .build()
        .context("indicator config")?;
    Ok(EffectInstance::new(config)?.with_target(Rc::clone(&target.bounds)))
}

fn build_ripple(at: TargetBounds) -> anyhow::Result<EffectInstance> {
    let config = EffectConfig::builder(EffectKind::Ripple)
        .count(2)
        .duration(Duration::from_millis(800))
        .repeats(Repeat::Count(1))
        .color(Argb::WHITE)
        .fade_in(Duration::ZERO)
        .build()
        .context("ripple config")?;
    // A ripple stays where the tap landed even if the target moves on.
    Ok(EffectInstance::new(config)?.with_target(at))
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    log::info!("pulse-native starting");

    let mut target = DriftingTarget::new(SEED);
    let mut effects = EffectSet::new();

    let mut indicator = build_indicator(&target)?;
    indicator.start(None);
    effects.insert(indicator);

    let mut instances: Vec<ShapeInstance> = Vec::with_capacity(16);
    let mut stats = FrameStats::default();
    let mut tapped = false;
    let mut stopped = false;

    let start = Instant::now();
    let mut last = start;
    let mut next_report = 1.0f32;

    loop {
        let now = Instant::now();
        let dt = now - last;
        last = now;
        let t = (now - start).as_secs_f32();

        target.step(dt.as_secs_f32());

        if !tapped && t >= TAP_AT_SEC {
            tapped = true;
            let at = *target.bounds.borrow();
            let mut ripple = build_ripple(at)?;
            ripple.start(None);
            effects.insert(ripple);
            log::info!("[tap] ripple at ({:.0}, {:.0})", at.center.x, at.center.y);
        }

        if !stopped && t >= STOP_AT_SEC {
            stopped = true;
            if let Some(indicator) = effects.get_mut(EffectKind::Indicator) {
                indicator.stop(Some(Duration::from_millis(DEFAULT_CONCEAL_MS)));
            }
            log::info!("[stop] indicator fading out");
        }

        let records = effects.on_tick(dt);
        instances.clear();
        for record in &records {
            record.push_instances(&mut instances);
            stats.max_radius = stats.max_radius.max(record.radius);
        }
        let bytes: &[u8] = bytemuck::cast_slice(&instances);

        stats.frames += 1;
        stats.records += records.len();
        stats.instances += instances.len();
        stats.bytes += bytes.len();

        if t >= next_report {
            next_report += 1.0;
            log::info!(
                "[frame] t={:.1}s frames={} shapes={} instances={} upload={}B",
                t,
                stats.frames,
                records.len(),
                instances.len(),
                bytes.len()
            );
        }

        if (stopped && !effects.is_running()) || t >= MAX_RUN_SEC {
            break;
        }
        thread::sleep(FRAME_INTERVAL);
    }

    log::info!(
        "pulse-native done: {} frames, {} records, {} instances, {} bytes packed, max radius {:.1}px",
        stats.frames,
        stats.records,
        stats.instances,
        stats.bytes,
        stats.max_radius
    );
    Ok(())
}
