// Host-side tests for draw records, packed instances and the effect set.

use glam::Vec2;
use pulse_core::*;
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn effect(kind: EffectKind) -> EffectInstance {
    let config = EffectConfig::builder(kind)
        .count(1)
        .duration(ms(1000))
        .fade_in(Duration::ZERO)
        .build()
        .expect("valid config");
    EffectInstance::new(config)
        .expect("valid config")
        .with_target(TargetBounds::new(Vec2::new(10.0, 20.0), 8.0))
}

fn record() -> DrawRecord {
    DrawRecord {
        center: Vec2::new(3.0, 4.0),
        radius: 12.0,
        outline: Outline::circle(12.0),
        opacity: 0.5,
        color: Argb(0xFFFF_0000),
        stroke_width_px: 2.0,
        filled: false,
        border: None,
        clip_radius: 6.0,
        clip: Outline::circle(6.0),
        inner_outline: None,
    }
}

#[test]
fn instance_packs_opacity_into_alpha() {
    let inst = record().to_instance();
    assert_eq!(inst.center, [3.0, 4.0]);
    assert_eq!(inst.radius, 12.0);
    assert_eq!(inst.stroke_width, 2.0);
    assert_eq!(inst.clip_radius, 6.0);
    assert_eq!(inst.clip_half_size, [6.0, 6.0]);
    assert_eq!(inst.half_size, [12.0, 12.0]);
    assert_eq!(inst.corner_radius, 12.0);
    assert_eq!(inst.color, [1.0, 0.0, 0.0, 0.5]);
}

#[test]
fn filled_records_pack_zero_stroke() {
    let mut r = record();
    r.filled = true;
    assert_eq!(r.to_instance().stroke_width, 0.0);
}

#[test]
fn rings_become_extra_instances() {
    let mut r = record();
    r.border = Some(Ring {
        radius: 12.0,
        outline: Outline::circle(12.0),
        color: Argb::WHITE,
        width_px: 1.5,
    });
    r.inner_outline = Some(Ring {
        radius: 4.0,
        outline: Outline::circle(4.0),
        color: Argb::BLACK,
        width_px: 1.0,
    });
    let mut out = Vec::new();
    r.push_instances(&mut out);
    assert_eq!(out.len(), 3);
    assert_eq!(out[1].stroke_width, 1.5);
    assert_eq!(out[1].color, [1.0, 1.0, 1.0, 0.5]);
    assert_eq!(out[2].radius, 4.0);
    assert_eq!(out[2].half_size, [4.0, 4.0]);

    let bytes: &[u8] = bytemuck::cast_slice(&out);
    assert_eq!(bytes.len(), 3 * std::mem::size_of::<ShapeInstance>());
    assert_eq!(std::mem::size_of::<ShapeInstance>(), 64);
}

#[test]
fn round_rect_outline_clamps_corner() {
    let o = Outline::round_rect(Vec2::new(30.0, 10.0), 25.0);
    assert_eq!(o.corner_radius, 10.0);
    assert_eq!(o.bounding_radius(), 30.0);
    assert_eq!(Outline::round_rect(Vec2::new(5.0, 5.0), -2.0).corner_radius, 0.0);

    let mut r = record();
    r.outline = o;
    r.radius = o.bounding_radius();
    let inst = r.to_instance();
    assert_eq!(inst.half_size, [30.0, 10.0]);
    assert_eq!(inst.corner_radius, 10.0);
}

#[test]
fn effect_set_keeps_one_instance_per_kind() {
    let mut set = EffectSet::new();
    assert!(set.insert(effect(EffectKind::Indicator)).is_none());
    assert!(set.insert(effect(EffectKind::Ripple)).is_none());
    assert!(set.insert(effect(EffectKind::Ripple)).is_some());
    assert!(set.get(EffectKind::Indicator).is_some());

    assert!(set.remove(EffectKind::Indicator).is_some());
    assert!(set.get(EffectKind::Indicator).is_none());
}

#[test]
fn effect_set_ticks_indicator_before_ripple() {
    let mut set = EffectSet::new();
    set.insert(effect(EffectKind::Ripple));
    set.insert(effect(EffectKind::Indicator));
    assert!(!FrameRenderer::is_running(&set));

    for kind in [EffectKind::Indicator, EffectKind::Ripple] {
        set.get_mut(kind).expect("inserted").start(None);
    }
    assert!(FrameRenderer::is_running(&set));

    let records = set.tick(ms(100));
    assert_eq!(records.len(), 2);
    // indicator preset is filled and clipped, ripple preset is outlined
    assert!(records[0].filled && records[0].clip_radius > 0.0);
    assert!(!records[1].filled && records[1].clip_radius == 0.0);

    set.stop_all(None);
    assert!(set.tick(ms(100)).is_empty());
    assert!(!FrameRenderer::is_running(&set));
}

#[test]
fn hosts_can_drive_any_frame_renderer() {
    let mut renderers: Vec<Box<dyn FrameRenderer>> = Vec::new();
    let mut single = effect(EffectKind::Ripple);
    single.start(None);
    renderers.push(Box::new(single));

    let mut set = EffectSet::new();
    let mut indicator = effect(EffectKind::Indicator);
    indicator.start(None);
    set.insert(indicator);
    renderers.push(Box::new(set));

    for r in &mut renderers {
        assert!(r.is_running());
        assert_eq!(r.on_tick(ms(16)).len(), 1);
    }
}
