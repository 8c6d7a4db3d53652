// Host-side tests for the per-shape state machine.

use pulse_core::*;
use std::time::Duration;

fn config(repeats: Repeat, mode: RepeatMode) -> EffectConfig {
    EffectConfig::builder(EffectKind::Ripple)
        .count(1)
        .duration(Duration::from_millis(1000))
        .repeats(repeats)
        .repeat_mode(mode)
        .opacity(0.0, 1.0)
        .scale(1.0, 3.0)
        .fade_in(Duration::ZERO)
        .build()
        .expect("valid config")
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn idle_shape_ignores_advance() {
    let cfg = config(Repeat::Infinite, RepeatMode::Restart);
    let mut shape = ShapeRuntime::new(RunToken::default());
    assert_eq!(shape.phase(), ShapePhase::Idle);
    shape.advance(400.0, &cfg);
    assert_eq!(shape.phase(), ShapePhase::Idle);
    assert_eq!(shape.elapsed_ms(), 0.0);
}

#[test]
fn start_without_reveal_delay_runs_immediately() {
    let cfg = config(Repeat::Infinite, RepeatMode::Restart);
    let mut shape = ShapeRuntime::new(RunToken::default());
    shape.request_start(&cfg);
    assert_eq!(shape.phase(), ShapePhase::Running);
    assert_eq!(shape.progress(), 0.0);
    assert_eq!(shape.radius(10.0, cfg.scale, cfg.easing), 10.0);
}

#[test]
fn reveal_delay_holds_min_opacity_then_runs() {
    let cfg = EffectConfig::builder(EffectKind::Ripple)
        .duration(Duration::from_millis(1000))
        .reveal_delay(Duration::from_millis(200))
        .opacity(0.25, 1.0)
        .build()
        .expect("valid config");
    let mut shape = ShapeRuntime::new(RunToken::default());
    shape.request_start(&cfg);
    assert_eq!(shape.phase(), ShapePhase::Starting);

    shape.advance(100.0, &cfg);
    assert_eq!(shape.phase(), ShapePhase::Starting);
    assert_eq!(shape.opacity(), 0.25);
    assert_eq!(shape.progress(), 0.0);

    shape.advance(150.0, &cfg);
    assert_eq!(shape.phase(), ShapePhase::Running);
    assert!(approx(shape.elapsed_ms(), 50.0), "leftover carried into the cycle");
}

#[test]
fn start_while_running_is_ignored() {
    let cfg = config(Repeat::Infinite, RepeatMode::Restart);
    let mut shape = ShapeRuntime::new(RunToken::default());
    shape.request_start(&cfg);
    shape.advance(300.0, &cfg);
    shape.request_start(&cfg);
    assert_eq!(shape.phase(), ShapePhase::Running);
    assert!(approx(shape.elapsed_ms(), 300.0));
}

#[test]
fn advance_completes_at_most_one_cycle() {
    let cfg = config(Repeat::Infinite, RepeatMode::Restart);
    let mut shape = ShapeRuntime::new(RunToken::default());
    shape.request_start(&cfg);
    shape.advance(5000.0, &cfg);
    assert_eq!(shape.cycle_index(), 1);
    assert_eq!(shape.elapsed_ms(), 0.0);
    assert_eq!(shape.progress(), 1.0);
    assert_eq!(shape.phase(), ShapePhase::Running);
}

#[test]
fn finite_restart_plays_exact_cycle_count() {
    let cfg = config(Repeat::Count(3), RepeatMode::Restart);
    let mut shape = ShapeRuntime::new(RunToken::default());
    shape.request_start(&cfg);

    let mut progress = Vec::new();
    for _ in 0..12 {
        shape.advance(250.0, &cfg);
        progress.push(shape.progress());
    }
    let expected = [0.25, 0.5, 0.75, 1.0].repeat(3);
    for (i, (got, want)) in progress.iter().zip(expected.iter()).enumerate() {
        assert!(approx(*got, *want), "step {i}: {got} != {want}");
    }
    assert_eq!(shape.cycle_index(), 3);
    assert_eq!(shape.phase(), ShapePhase::Stopped);

    shape.advance(250.0, &cfg);
    assert_eq!(shape.phase(), ShapePhase::Stopped);
    assert_eq!(shape.cycle_index(), 3);
}

#[test]
fn reverse_mode_flips_odd_cycles() {
    let cfg = config(Repeat::Infinite, RepeatMode::Reverse);
    let mut shape = ShapeRuntime::new(RunToken::default());
    shape.request_start(&cfg);
    for _ in 0..4 {
        shape.advance(250.0, &cfg);
    }
    assert_eq!(shape.cycle_index(), 1);

    shape.advance(250.0, &cfg);
    assert!(approx(shape.progress(), 0.75));
    shape.advance(500.0, &cfg);
    assert!(approx(shape.progress(), 0.25));
    shape.advance(250.0, &cfg);
    assert_eq!(shape.cycle_index(), 2);
    shape.advance(250.0, &cfg);
    assert!(approx(shape.progress(), 0.25), "cycle 2 grows again");
}

#[test]
fn stop_from_idle_or_without_fade_is_immediate() {
    let cfg = config(Repeat::Infinite, RepeatMode::Restart);
    let mut idle = ShapeRuntime::new(RunToken::default());
    idle.request_stop(300.0);
    assert_eq!(idle.phase(), ShapePhase::Stopped);

    let mut running = ShapeRuntime::new(RunToken::default());
    running.request_start(&cfg);
    running.advance(100.0, &cfg);
    running.request_stop(0.0);
    assert_eq!(running.phase(), ShapePhase::Stopped);
}

#[test]
fn stop_with_fade_decays_from_snapshot() {
    let cfg = config(Repeat::Infinite, RepeatMode::Restart);
    let mut shape = ShapeRuntime::new(RunToken::default());
    shape.request_start(&cfg);
    shape.advance(500.0, &cfg);
    let snapshot = shape.opacity();
    let progress = shape.progress();
    assert!(approx(snapshot, 1.0));

    shape.request_stop(500.0);
    assert_eq!(shape.phase(), ShapePhase::Stopping);

    shape.advance(250.0, &cfg);
    assert!(approx(shape.opacity(), snapshot * 0.5));
    assert_eq!(shape.progress(), progress, "radius frozen while fading");

    shape.advance(250.0, &cfg);
    assert_eq!(shape.phase(), ShapePhase::Stopped);
    assert_eq!(shape.opacity(), 0.0);
}

#[test]
fn stopped_shape_can_restart() {
    let cfg = config(Repeat::Count(1), RepeatMode::Restart);
    let mut shape = ShapeRuntime::new(RunToken::default());
    shape.request_start(&cfg);
    shape.advance(1000.0, &cfg);
    assert_eq!(shape.phase(), ShapePhase::Stopped);

    shape.request_start(&cfg);
    assert_eq!(shape.phase(), ShapePhase::Running);
    assert_eq!(shape.cycle_index(), 0);
    assert_eq!(shape.elapsed_ms(), 0.0);
}

#[test]
fn opacity_curves() {
    let swell = config(Repeat::Infinite, RepeatMode::Restart);
    assert!(approx(cycle_opacity(&swell, 0.0), 0.0));
    assert!(approx(cycle_opacity(&swell, 0.5), 1.0));
    assert!(approx(cycle_opacity(&swell, 1.0), 0.0));

    let fade = EffectConfig::builder(EffectKind::Indicator)
        .opacity(0.2, 0.8)
        .opacity_curve(OpacityCurve::Fade)
        .build()
        .expect("valid config");
    assert!(approx(cycle_opacity(&fade, 0.0), 0.8));
    assert!(approx(cycle_opacity(&fade, 0.5), 0.5));
    assert!(approx(cycle_opacity(&fade, 1.0), 0.2));
}

#[test]
fn color_follows_progress_when_interpolating() {
    let cfg = EffectConfig::builder(EffectKind::Ripple)
        .duration(Duration::from_millis(1000))
        .color_range(Argb(0xFF00_0000), Argb(0xFFFF_FFFF))
        .build()
        .expect("valid config");
    let mut shape = ShapeRuntime::new(RunToken::default());
    shape.request_start(&cfg);
    assert_eq!(shape.color(), Argb(0xFF00_0000));
    shape.advance(500.0, &cfg);
    assert_eq!(shape.color(), Argb(0xFF80_8080));

    let plain = EffectConfig::builder(EffectKind::Ripple)
        .color_range(Argb(0xFF00_0000), Argb(0xFFFF_FFFF))
        .use_color_interpolation(false)
        .build()
        .expect("valid config");
    let mut shape = ShapeRuntime::new(RunToken::default());
    shape.request_start(&plain);
    shape.advance(700.0, &plain);
    assert_eq!(shape.color(), Argb(0xFF00_0000));
}
