use approx::assert_abs_diff_eq;
use skelanim_core::{ClipTiming, LoopMode, PlayState, PlaybackClock};

fn clock(length: f32, loop_mode: LoopMode, speed: f32) -> PlaybackClock {
    let mut c = PlaybackClock::new(ClipTiming {
        length,
        loop_mode,
        speed,
    });
    c.play();
    c
}

/// it should wrap time and count loops
#[test]
fn loop_wraps_and_counts() {
    let mut c = clock(2.0, LoopMode::Loop, 1.0);
    c.advance(2.5);
    assert_abs_diff_eq!(c.current_time(), 0.5, epsilon = 1e-6);
    assert_eq!(c.loop_count(), 1);
    assert!(c.is_playing());

    let mut split = clock(2.0, LoopMode::Loop, 1.0);
    for _ in 0..5 {
        split.advance(0.5);
    }
    assert_abs_diff_eq!(split.current_time(), 0.5, epsilon = 1e-6);
    assert_eq!(split.loop_count(), 1);
}

/// it should stop at the end yet keep contributing in hold-last mode
#[test]
fn hold_last_finishes_but_still_applies() {
    let mut c = clock(1.0, LoopMode::HoldLast, 1.0);
    c.advance(1.5);
    assert_eq!(c.state(), PlayState::Stopped);
    assert!(c.is_finished());
    assert!(c.should_apply());
    assert_eq!(c.current_time(), 1.0);
}

#[test]
fn once_finishes_and_stops_applying() {
    let mut c = clock(1.0, LoopMode::Once, 1.0);
    c.advance(0.4);
    assert!(c.should_apply());
    c.advance(0.7);
    assert!(c.is_finished());
    assert!(!c.should_apply());
    assert_eq!(c.current_time(), 1.0);
}

#[test]
fn speed_scales_time() {
    let mut c = clock(10.0, LoopMode::Once, 2.0);
    c.advance(1.0);
    assert_abs_diff_eq!(c.current_time(), 2.0, epsilon = 1e-6);

    c.set_speed_scale(0.5);
    c.advance(1.0);
    assert_abs_diff_eq!(c.current_time(), 3.0, epsilon = 1e-6);

    c.set_speed_scale(-4.0);
    assert_eq!(c.speed_scale(), 0.0);
}

#[test]
fn zero_length_once_finishes_immediately() {
    let mut c = clock(0.0, LoopMode::Once, 1.0);
    c.advance(0.016);
    assert!(c.is_finished());
    assert!(c.is_stopped());
    assert_eq!(c.current_time(), 0.0);
    assert_eq!(c.progress(), 0.0);
}

#[test]
fn stop_and_restart_reset_state() {
    let mut c = clock(1.0, LoopMode::Loop, 1.0);
    c.advance(2.25);
    assert_eq!(c.loop_count(), 1);

    c.stop();
    assert!(c.is_stopped());
    assert_eq!(c.current_time(), 0.0);
    assert_eq!(c.loop_count(), 0);
    assert!(!c.is_finished());
    c.advance(0.5);
    assert_eq!(c.current_time(), 0.0);

    let mut done = clock(1.0, LoopMode::Once, 1.0);
    done.advance(2.0);
    done.restart();
    assert!(done.is_playing());
    assert!(!done.is_finished());
    assert_eq!(done.current_time(), 0.0);
}

#[test]
fn seek_clamps_and_reports_progress() {
    let mut c = clock(4.0, LoopMode::Loop, 1.0);
    c.seek(3.0);
    assert_abs_diff_eq!(c.progress(), 0.75, epsilon = 1e-6);
    assert_abs_diff_eq!(c.normalized_time(), 0.75, epsilon = 1e-6);
    c.seek(9.0);
    assert_eq!(c.current_time(), 4.0);
    assert_abs_diff_eq!(c.normalized_time(), 0.0, epsilon = 1e-6);
    c.seek(-1.0);
    assert_eq!(c.current_time(), 0.0);
}
