//! Event query for particle and sound triggers.
//!
//! A pull API: the caller passes the previous and current clip time and gets
//! back the events whose timestamps were crossed. Playing the named effects is
//! the caller's job.
//!
//! Ranges:
//! - plain: `(previous, current]`
//! - wrapped (loop crossed the end, or time went backwards):
//!   `(previous, length]` followed by `[0, current]`
//!
//! Both ends are widened by `EventConfig::epsilon`. Particle events are reported
//! before sound events.

use serde::{Deserialize, Serialize};

use crate::clock::PlaybackClock;
use crate::config::EventConfig;
use crate::data::{Clip, ClipEvent};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Particle,
    Sound,
}

/// An event crossed during a time range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FiredEvent<'a> {
    pub kind: EventKind,
    pub event: &'a ClipEvent,
}

impl FiredEvent<'_> {
    #[inline]
    pub fn timestamp(&self) -> f32 {
        self.event.timestamp
    }

    #[inline]
    pub fn effect(&self) -> &str {
        &self.event.effect
    }

    #[inline]
    pub fn locator(&self) -> &str {
        &self.event.locator
    }
}

#[derive(Copy, Clone, Debug)]
struct Window {
    previous: f32,
    current: f32,
    length: f32,
    wrapped: bool,
    include_start: bool,
    eps: f32,
}

impl Window {
    fn in_tail(&self, t: f32) -> bool {
        t > self.previous + self.eps && t <= self.length + self.eps
    }

    fn in_head(&self, t: f32) -> bool {
        t >= -self.eps && t <= self.current + self.eps
    }

    fn in_plain(&self, t: f32) -> bool {
        let lower = if self.include_start {
            t >= self.previous - self.eps
        } else {
            t > self.previous + self.eps
        };
        lower && t <= self.current + self.eps
    }

    fn visit<'a>(&self, kind: EventKind, events: &'a [ClipEvent], f: &mut impl FnMut(FiredEvent<'a>)) {
        if !self.wrapped {
            for event in events.iter().filter(|e| self.in_plain(e.timestamp)) {
                f(FiredEvent { kind, event });
            }
            return;
        }
        for event in events.iter().filter(|e| self.in_tail(e.timestamp)) {
            f(FiredEvent { kind, event });
        }
        for event in events
            .iter()
            .filter(|e| self.in_head(e.timestamp) && !self.in_tail(e.timestamp))
        {
            f(FiredEvent { kind, event });
        }
    }
}

fn visit_window<'a>(clip: &'a Clip, window: Window, mut f: impl FnMut(FiredEvent<'a>)) {
    window.visit(EventKind::Particle, &clip.particle_events, &mut f);
    window.visit(EventKind::Sound, &clip.sound_events, &mut f);
}

/// Call `f` for every event crossed moving from `previous` to `current`.
///
/// A range with `current < previous` is treated as wrapped even when
/// `wrapped` is false.
pub fn visit_events<'a>(
    clip: &'a Clip,
    previous: f32,
    current: f32,
    wrapped: bool,
    cfg: &EventConfig,
    f: impl FnMut(FiredEvent<'a>),
) {
    let window = Window {
        previous,
        current,
        length: clip.length,
        wrapped: wrapped || current + cfg.epsilon < previous - cfg.epsilon,
        include_start: false,
        eps: cfg.epsilon,
    };
    visit_window(clip, window, f);
}

/// Events crossed moving from `previous` to `current`, particles first.
pub fn collect_events<'a>(
    clip: &'a Clip,
    previous: f32,
    current: f32,
    wrapped: bool,
    cfg: &EventConfig,
) -> Vec<FiredEvent<'a>> {
    let mut out = Vec::new();
    visit_events(clip, previous, current, wrapped, cfg, |e| out.push(e));
    out
}

/// Remembers the last observed time of one clip instance and reports the
/// events crossed since.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventTracker {
    last: Option<(f32, u32)>,
}

impl EventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last observation; the next one reports `[0, current]` again.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Events crossed since the previous call for `clip` driven by `clock`.
    pub fn observe<'a>(
        &mut self,
        clip: &'a Clip,
        clock: &PlaybackClock,
        cfg: &EventConfig,
    ) -> Vec<FiredEvent<'a>> {
        let current = clock.current_time();
        let loops = clock.loop_count();
        let eps = cfg.epsilon;
        let mut out = Vec::new();

        match self.last.replace((current, loops)) {
            None => {
                if current >= -eps {
                    let window = Window {
                        previous: 0.0,
                        current,
                        length: clip.length,
                        wrapped: false,
                        include_start: true,
                        eps,
                    };
                    visit_window(clip, window, |e| out.push(e));
                }
            }
            Some((previous, last_loops)) => {
                let wrapped =
                    loops != last_loops || (clip.is_looping() && current + eps < previous);
                visit_events(clip, previous, current, wrapped, cfg, |e| out.push(e));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LoopMode;

    fn clip() -> Clip {
        Clip::new("swing", 2.0, LoopMode::Loop)
            .with_particle_event(ClipEvent::new(0.0, "dust", "foot"))
            .with_particle_event(ClipEvent::new(1.5, "spark", "blade"))
            .with_sound_event(ClipEvent::new(1.5, "whoosh", ""))
    }

    fn effects(events: &[FiredEvent<'_>]) -> Vec<String> {
        events.iter().map(|e| e.effect().to_string()).collect()
    }

    #[test]
    fn start_of_range_is_exclusive() {
        let c = clip();
        let cfg = EventConfig::default();
        assert!(collect_events(&c, 1.5, 1.9, false, &cfg).is_empty());
        assert_eq!(effects(&collect_events(&c, 1.0, 1.5, false, &cfg)), ["spark", "whoosh"]);
    }

    #[test]
    fn wrapped_range_reports_tail_then_head() {
        let c = clip();
        let cfg = EventConfig::default();
        let fired = collect_events(&c, 1.2, 0.1, true, &cfg);
        assert_eq!(effects(&fired), ["spark", "dust", "whoosh"]);
        assert_eq!(fired[2].kind, EventKind::Sound);
    }
}
