use skelanim_core::{
    collect_events, visit_events, Clip, ClipEvent, ClipTiming, EventConfig, EventKind,
    EventTracker, FiredEvent, LoopMode, PlaybackClock,
};

fn stepping_clip() -> Clip {
    Clip::new("walk", 1.0, LoopMode::Loop)
        .with_particle_event(ClipEvent::new(0.0, "dust", "foot_left"))
        .with_particle_event(ClipEvent::new(0.5, "dust", "foot_right"))
        .with_sound_event(ClipEvent::new(0.5, "step", ""))
}

fn summary(events: &[FiredEvent<'_>]) -> Vec<(EventKind, f32, String)> {
    events
        .iter()
        .map(|e| (e.kind, e.timestamp(), e.effect().to_string()))
        .collect()
}

fn playing(clip: &Clip) -> PlaybackClock {
    let mut clock = PlaybackClock::new(clip.timing());
    clock.play();
    clock
}

/// it should report each crossing once across ticks and loop wraps
#[test]
fn tracker_follows_a_looping_clock() {
    let clip = stepping_clip();
    let cfg = EventConfig::default();
    let mut clock = playing(&clip);
    let mut tracker = EventTracker::new();

    let first = tracker.observe(&clip, &clock, &cfg);
    assert_eq!(summary(&first), [(EventKind::Particle, 0.0, "dust".to_string())]);
    assert_eq!(first[0].locator(), "foot_left");

    clock.advance(0.6);
    let second = tracker.observe(&clip, &clock, &cfg);
    assert_eq!(
        summary(&second),
        [
            (EventKind::Particle, 0.5, "dust".to_string()),
            (EventKind::Sound, 0.5, "step".to_string()),
        ]
    );

    clock.advance(0.6);
    assert_eq!(clock.loop_count(), 1);
    let third = tracker.observe(&clip, &clock, &cfg);
    assert_eq!(summary(&third), [(EventKind::Particle, 0.0, "dust".to_string())]);

    assert!(tracker.observe(&clip, &clock, &cfg).is_empty());
}

#[test]
fn reset_reports_from_the_start_again() {
    let clip = stepping_clip();
    let cfg = EventConfig::default();
    let mut clock = playing(&clip);
    clock.advance(0.7);

    let mut tracker = EventTracker::new();
    assert_eq!(tracker.observe(&clip, &clock, &cfg).len(), 3);
    assert!(tracker.observe(&clip, &clock, &cfg).is_empty());

    tracker.reset();
    assert_eq!(tracker.observe(&clip, &clock, &cfg).len(), 3);
}

/// it should treat a backwards range as wrapped even without the flag
#[test]
fn backwards_range_wraps() {
    let clip = Clip::new("swing", 1.0, LoopMode::Once)
        .with_particle_event(ClipEvent::new(0.1, "early", ""))
        .with_particle_event(ClipEvent::new(0.9, "late", ""));
    let fired = collect_events(&clip, 0.8, 0.3, false, &EventConfig::default());
    let names: Vec<_> = fired.iter().map(|e| e.effect()).collect();
    assert_eq!(names, ["late", "early"]);
}

#[test]
fn event_at_clip_end_fires_once_on_wrap() {
    let clip = Clip::new("spin", 1.0, LoopMode::Loop)
        .with_sound_event(ClipEvent::new(1.0, "clang", ""))
        .with_sound_event(ClipEvent::new(0.0, "tick", ""));
    let fired = collect_events(&clip, 0.9, 0.05, true, &EventConfig::default());
    let names: Vec<_> = fired.iter().map(|e| e.effect()).collect();
    assert_eq!(names, ["clang", "tick"]);
}

#[test]
fn epsilon_widens_the_closing_edge() {
    let clip = stepping_clip();
    let cfg = EventConfig { epsilon: 0.01 };
    let fired = collect_events(&clip, 0.2, 0.495, false, &cfg);
    assert_eq!(fired.len(), 2);
    assert!(collect_events(&clip, 0.2, 0.48, false, &cfg).is_empty());
}

#[test]
fn visitor_sees_particles_before_sounds() {
    let clip = stepping_clip();
    let mut kinds = Vec::new();
    visit_events(&clip, 0.25, 0.75, false, &EventConfig::default(), |e| {
        kinds.push(e.kind)
    });
    assert_eq!(kinds, [EventKind::Particle, EventKind::Sound]);
}

#[test]
fn seeking_a_finished_clip_backwards_rewinds_events() {
    let clip = Clip::new("wave", 2.0, LoopMode::HoldLast)
        .with_particle_event(ClipEvent::new(1.0, "sparkle", "hand"));
    let cfg = EventConfig::default();
    let mut clock = PlaybackClock::new(ClipTiming {
        length: 2.0,
        loop_mode: LoopMode::HoldLast,
        speed: 1.0,
    });
    clock.play();
    let mut tracker = EventTracker::new();

    clock.advance(3.0);
    assert_eq!(tracker.observe(&clip, &clock, &cfg).len(), 1);

    clock.seek(0.5);
    // 2.0 -> 0.5 reads as wrapped: nothing in (2, 2] and nothing in [0, 0.5]
    assert!(tracker.observe(&clip, &clock, &cfg).is_empty());
    clock.play();
    clock.advance(0.6);
    assert_eq!(tracker.observe(&clip, &clock, &cfg).len(), 1);
}
