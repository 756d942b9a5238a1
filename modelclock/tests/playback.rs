//! End-to-end playback scenarios through the public API.

use modelclock::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

const EPS: f64 = 1e-9;

fn pingpong_clock(clamp_dt: f64) -> Timebase {
    Timebase::new(TimebaseConfig {
        wrap: WrapMode::PingPong,
        window: TimeWindow::new(0.0, 2.0),
        clamp_dt,
        ..TimebaseConfig::default()
    })
    .unwrap()
}

#[test]
fn half_second_frames_fire_the_impact_cue_exactly_once() {
    // Three half-second frames: t goes 0 -> 0.5 -> 1.0 -> 1.5. The cue at
    // 1.0 s fires on the frame arriving at 1.0 and must not fire again on
    // the frame departing from it.
    let mut clock = pingpong_clock(0.5);
    let fired = Arc::new(AtomicU32::new(0));
    let count = fired.clone();
    clock.on(1.0, move |_| {
        count.fetch_add(1, Ordering::Relaxed);
    });

    clock.advance(0.5);
    assert!((clock.model_time() - 0.5).abs() < EPS);
    assert_eq!(fired.load(Ordering::Relaxed), 0);

    clock.advance(0.5);
    assert!((clock.model_time() - 1.0).abs() < EPS);
    assert_eq!(fired.load(Ordering::Relaxed), 1);

    clock.advance(0.5);
    assert!((clock.model_time() - 1.5).abs() < EPS);
    assert_eq!(fired.load(Ordering::Relaxed), 1);
}

#[test]
fn pingpong_round_trip_keeps_firing_the_cue() {
    // A full bounce passes t = 1.0 once per direction of travel.
    let mut clock = pingpong_clock(0.5);
    let fired = Arc::new(AtomicU32::new(0));
    let count = fired.clone();
    clock.on(1.0, move |_| {
        count.fetch_add(1, Ordering::Relaxed);
    });

    // 0 -> 0.5 -> 1.0 -> 1.5 -> 2.0 (bounce) -> 1.5 -> 1.0 -> 0.5
    for _ in 0..7 {
        clock.advance(0.5);
    }
    assert!((clock.model_time() - 0.5).abs() < EPS);
    assert_eq!(fired.load(Ordering::Relaxed), 2);
}

#[test]
fn loop_wrap_jump_is_an_ordinary_cue_segment() {
    let mut clock = Timebase::new(TimebaseConfig {
        wrap: WrapMode::Loop,
        window: TimeWindow::new(0.0, 1.0),
        clamp_dt: 0.25,
        ..TimebaseConfig::default()
    })
    .unwrap();

    let fired = Arc::new(AtomicU32::new(0));
    let count = fired.clone();
    clock.on(0.5, move |_| {
        count.fetch_add(1, Ordering::Relaxed);
    });

    // Two full cycles: 0 .25 .5 .75 0 .25 .5 .75 0. The cue fires on each
    // forward crossing of 0.5, and again on each wrap frame: the jump from
    // 0.75 back to 0.0 is swept like any other segment and spans 0.5.
    for _ in 0..8 {
        clock.advance(0.25);
    }
    assert_eq!(fired.load(Ordering::Relaxed), 4);
}

#[test]
fn scrubbing_then_playing_only_fires_from_motion() {
    let mut clock = Timebase::new(TimebaseConfig {
        window: TimeWindow::new(0.0, 10.0),
        clamp_dt: 1.0,
        ..TimebaseConfig::default()
    })
    .unwrap();

    let fired = Arc::new(AtomicU32::new(0));
    let count = fired.clone();
    clock.on(4.5, move |_| {
        count.fetch_add(1, Ordering::Relaxed);
    });

    // Scrub straight past the trigger: nothing fires.
    clock.seek(9.0);
    assert_eq!(fired.load(Ordering::Relaxed), 0);

    // Scrub back before it, then play across it: fires once.
    clock.seek(4.0);
    clock.advance(1.0);
    assert_eq!(fired.load(Ordering::Relaxed), 1);
}

#[test]
fn pause_freezes_time_and_cues() {
    let mut clock = Timebase::new(TimebaseConfig {
        clamp_dt: 1.0,
        ..TimebaseConfig::default()
    })
    .unwrap();
    let fired = Arc::new(AtomicU32::new(0));
    let count = fired.clone();
    clock.on(0.5, move |_| {
        count.fetch_add(1, Ordering::Relaxed);
    });

    clock.pause();
    for _ in 0..10 {
        clock.advance(1.0);
    }
    assert_eq!(clock.model_time(), 0.0);
    assert_eq!(fired.load(Ordering::Relaxed), 0);

    clock.play();
    clock.advance(1.0);
    assert_eq!(fired.load(Ordering::Relaxed), 1);
}

#[test]
fn range_cue_tracks_a_reversing_clock() {
    let mut clock = Timebase::new(TimebaseConfig {
        window: TimeWindow::new(0.0, 10.0),
        clamp_dt: 1.0,
        ..TimebaseConfig::default()
    })
    .unwrap();

    let enters = Arc::new(AtomicU32::new(0));
    let exits = Arc::new(AtomicU32::new(0));
    let enter_count = enters.clone();
    let exit_count = exits.clone();
    clock.on_range(
        2.0,
        3.0,
        move |_| {
            enter_count.fetch_add(1, Ordering::Relaxed);
        },
        move |_| {
            exit_count.fetch_add(1, Ordering::Relaxed);
        },
    );

    clock.seek(1.5);
    clock.advance(1.0); // 2.5: inside
    clock.advance(1.0); // 3.5: outside
    clock.reverse();
    clock.advance(1.0); // 2.5: inside again
    clock.advance(1.0); // 1.5: outside again
    assert_eq!(enters.load(Ordering::Relaxed), 2);
    assert_eq!(exits.load(Ordering::Relaxed), 2);
}

#[test]
fn rate_changes_compose_with_wrapping() {
    let mut clock = pingpong_clock(1.0);
    clock.set_rate(2.0);
    clock.advance(0.5); // dt = 0.5, rate = 2 -> +1.0 model second
    assert!((clock.model_time() - 1.0).abs() < EPS);
    clock.speed(0.5);
    clock.advance(1.0); // dt capped at 1.0, rate 0.5 -> +0.5
    assert!((clock.model_time() - 1.5).abs() < EPS);
}
