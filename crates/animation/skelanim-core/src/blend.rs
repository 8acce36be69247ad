//! Blend stack: concurrently playing clips with weights, fades and priorities.
//!
//! Methods:
//! - add_layer / push_layer / remove_layer / clear
//! - set_weight (immediate), fade_in / fade_out (timed)
//! - update(dt): advance clocks, then move fading weights toward their targets
//! - apply(pose): reset to bind pose, then blend each layer in order
//!
//! Layers are ordered by descending priority (ties keep insertion order) and
//! are blended one after another into the pose. Weights are not normalized, so
//! the result depends on layer order and weights need not sum to 1.

use std::sync::Arc;

use tracing::debug;

use crate::binding::{BoneBindings, BoneSlot};
use crate::clock::PlaybackClock;
use crate::config::Config;
use crate::data::Clip;
use crate::ids::{LayerId, LayerIdAllocator};
use crate::pose::{blend_bone, compose_with_bind, Pose};
use crate::sampling::{LoopWrap, Sampler, TrackCursors};
use crate::scratch::Scratch;

/// One playing clip inside a [`BlendStack`].
#[derive(Debug, Clone)]
pub struct BlendLayer {
    id: LayerId,
    clip: Arc<Clip>,
    clock: PlaybackClock,
    weight: f32,
    target_weight: f32,
    transition_speed: f32,
    transitioning: bool,
    priority: i32,
    /// One cursor triple per bone track, in track order.
    cursors: Vec<TrackCursors>,
    /// Pose index per bone track, resolved on first apply.
    slots: Option<Vec<BoneSlot>>,
}

impl BlendLayer {
    fn new(id: LayerId, clip: Arc<Clip>, weight: f32, priority: i32) -> Self {
        let weight = weight.clamp(0.0, 1.0);
        let mut clock = PlaybackClock::new(clip.timing());
        clock.play();
        Self {
            id,
            cursors: vec![TrackCursors::default(); clip.bones.len()],
            clip,
            clock,
            weight,
            target_weight: weight,
            transition_speed: 1.0,
            transitioning: false,
            priority,
            slots: None,
        }
    }

    #[inline]
    pub fn id(&self) -> LayerId {
        self.id
    }

    #[inline]
    pub fn clip(&self) -> &Arc<Clip> {
        &self.clip
    }

    #[inline]
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    #[inline]
    pub fn clock_mut(&mut self) -> &mut PlaybackClock {
        &mut self.clock
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    #[inline]
    pub fn target_weight(&self) -> f32 {
        self.target_weight
    }

    /// Weight units per second while fading.
    #[inline]
    pub fn transition_speed(&self) -> f32 {
        self.transition_speed
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    fn set_weight(&mut self, weight: f32) {
        let weight = weight.clamp(0.0, 1.0);
        self.weight = weight;
        self.target_weight = weight;
        self.transitioning = false;
    }

    fn fade_to(&mut self, target: f32, duration: f32) {
        self.target_weight = target;
        if duration > 0.0 {
            self.transition_speed = 1.0 / duration;
            self.transitioning = true;
        } else {
            self.weight = target;
            self.transitioning = false;
        }
    }

    /// Move the weight toward its target; returns true when the fade completes.
    fn step_fade(&mut self, dt: f32, epsilon: f32) -> bool {
        if !self.transitioning {
            return false;
        }
        let delta = self.transition_speed * dt;
        self.weight = if self.weight < self.target_weight {
            (self.weight + delta).min(self.target_weight)
        } else {
            (self.weight - delta).max(self.target_weight)
        };
        if (self.weight - self.target_weight).abs() < epsilon {
            self.weight = self.target_weight;
            self.transitioning = false;
            return true;
        }
        false
    }
}

/// Ordered set of weighted layers composed into one pose.
#[derive(Debug)]
pub struct BlendStack {
    cfg: Config,
    sampler: Sampler,
    ids: LayerIdAllocator,
    layers: Vec<BlendLayer>,
    bindings: BoneBindings,
    scratch: Scratch,
}

impl Default for BlendStack {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl BlendStack {
    pub fn new(cfg: Config) -> Self {
        Self {
            sampler: Sampler::new(cfg.sampler),
            ids: LayerIdAllocator::new(),
            layers: Vec::with_capacity(cfg.blend.initial_layer_capacity),
            bindings: BoneBindings::new(),
            scratch: Scratch::new(&cfg),
            cfg,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Add a clip as a new playing layer. `weight` is clamped to [0, 1].
    pub fn add_layer(&mut self, clip: Arc<Clip>, weight: f32, priority: i32) -> LayerId {
        let id = self.ids.alloc();
        debug!(layer = id.0, clip = %clip.name, weight, priority, "add layer");
        self.layers.push(BlendLayer::new(id, clip, weight, priority));
        // stable: equal priorities keep insertion order
        self.layers.sort_by(|a, b| b.priority.cmp(&a.priority));
        id
    }

    /// Add a layer whose priority is the current layer count.
    pub fn push_layer(&mut self, clip: Arc<Clip>, weight: f32) -> LayerId {
        let priority = i32::try_from(self.layers.len()).unwrap_or(i32::MAX);
        self.add_layer(clip, weight, priority)
    }

    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|l| l.id != id);
        let removed = self.layers.len() != before;
        if removed {
            debug!(layer = id.0, "remove layer");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Set a layer's weight immediately, cancelling any fade in flight.
    pub fn set_weight(&mut self, id: LayerId, weight: f32) -> bool {
        self.with_layer(id, |l| l.set_weight(weight))
    }

    /// Fade a layer to full weight over `duration` seconds (`<= 0` snaps).
    pub fn fade_in(&mut self, id: LayerId, duration: f32) -> bool {
        self.with_layer(id, |l| l.fade_to(1.0, duration))
    }

    /// Fade a layer to zero weight over `duration` seconds (`<= 0` snaps).
    pub fn fade_out(&mut self, id: LayerId, duration: f32) -> bool {
        self.with_layer(id, |l| l.fade_to(0.0, duration))
    }

    fn with_layer(&mut self, id: LayerId, f: impl FnOnce(&mut BlendLayer)) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                f(layer);
                true
            }
            None => false,
        }
    }

    /// Advance every clock by `dt`, then step fades.
    pub fn update(&mut self, dt: f32) {
        for layer in &mut self.layers {
            let was_finished = layer.clock.is_finished();
            layer.clock.advance(dt);
            if !was_finished && layer.clock.is_finished() {
                debug!(layer = layer.id.0, clip = %layer.clip.name, "clip finished");
            }
        }
        let epsilon = self.cfg.blend.fade_epsilon;
        for layer in &mut self.layers {
            if layer.step_fade(dt, epsilon) {
                debug!(layer = layer.id.0, weight = layer.weight, "fade complete");
            }
        }
    }

    /// Reset `pose` to its bind pose and blend every contributing layer into it.
    pub fn apply<P: Pose + ?Sized>(&mut self, pose: &mut P) {
        pose.reset_to_bind_pose();

        let weight_epsilon = self.cfg.blend.weight_epsilon;
        let sampler = &self.sampler;
        let bindings = &mut self.bindings;
        let scratch = &mut self.scratch;

        for layer in &mut self.layers {
            if layer.weight <= weight_epsilon || !layer.clock.should_apply() {
                continue;
            }
            let clip = &layer.clip;
            let slots = layer.slots.get_or_insert_with(|| {
                clip.bones
                    .keys()
                    .map(|name| bindings.resolve(&*pose, name))
                    .collect()
            });

            let t = layer.clock.current_time();
            let wrap = LoopWrap::for_clip(clip);
            scratch.begin_layer();
            for (track, cursors) in clip.bones.values().zip(layer.cursors.iter_mut()) {
                scratch
                    .samples
                    .push(sampler.sample_track(track, t, cursors, wrap));
            }

            for (sample, slot) in scratch.samples.iter().zip(slots.iter()) {
                let Some(index) = *slot else {
                    continue;
                };
                let Some(bind) = pose.bind_pose(index).copied() else {
                    continue;
                };
                let target = compose_with_bind(sample, &bind);
                if let Some(bone) = pose.bone_mut(index) {
                    blend_bone(bone, &target, layer.weight, sampler.config());
                }
            }
        }
    }

    /// Drop cached bone resolutions so the next `apply` re-resolves names.
    pub fn rebind(&mut self) {
        self.bindings.clear();
        for layer in &mut self.layers {
            layer.slots = None;
        }
    }

    pub fn play_all(&mut self) {
        self.layers.iter_mut().for_each(|l| l.clock.play());
    }

    pub fn pause_all(&mut self) {
        self.layers.iter_mut().for_each(|l| l.clock.pause());
    }

    pub fn stop_all(&mut self) {
        self.layers.iter_mut().for_each(|l| l.clock.stop());
    }

    pub fn seek(&mut self, id: LayerId, time: f32) -> bool {
        self.with_layer(id, |l| l.clock.seek(time))
    }

    pub fn layer(&self, id: LayerId) -> Option<&BlendLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut BlendLayer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Current weight, or 0 for unknown layers.
    pub fn weight(&self, id: LayerId) -> f32 {
        self.layer(id).map_or(0.0, BlendLayer::weight)
    }

    pub fn target_weight(&self, id: LayerId) -> f32 {
        self.layer(id).map_or(0.0, BlendLayer::target_weight)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layer(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers in application order.
    pub fn layers(&self) -> impl Iterator<Item = &BlendLayer> {
        self.layers.iter()
    }

    /// Weight-averaged clip progress, 0 when every weight is 0.
    pub fn blended_progress(&self) -> f32 {
        let (progress, total) = self.layers.iter().fold((0.0, 0.0), |(p, w), l| {
            (p + l.clock.progress() * l.weight, w + l.weight)
        });
        if total > 0.0 {
            progress / total
        } else {
            0.0
        }
    }

    /// True when every layer with a noticeable weight has finished.
    pub fn is_all_finished(&self) -> bool {
        let eps = self.cfg.blend.weight_epsilon;
        self.layers
            .iter()
            .all(|l| l.clock.is_finished() || l.weight <= eps)
    }
}
