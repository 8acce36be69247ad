use std::sync::Arc;

use approx::assert_abs_diff_eq;
use skelanim_core::{
    BlendStack, BoneTransform, ChannelKind, Clip, ClipError, Config, Interpolation, LoopMode,
    RootMotionConfig, Sampler, SkeletonPose,
};
use skelanim_test_fixtures::{clips, configs};

fn load_clip(name: &str) -> Clip {
    clips::load::<Clip>(name).expect("load clip fixture")
}

#[test]
fn every_listed_fixture_exists() {
    assert_eq!(clips::keys(), ["arm-wave", "unsorted-channel", "walk-cycle"]);
    for key in clips::keys() {
        assert!(clips::path(&key).expect("path").exists(), "{key}");
    }
    assert!(clips::json("no-such-clip").is_err());
}

#[test]
fn walk_cycle_loads_and_validates() {
    let clip = load_clip("walk-cycle");
    clip.validate().expect("walk cycle is well formed");
    assert_eq!(clip.loop_mode, LoopMode::Loop);
    assert_eq!(clip.speed, 1.0);
    let names: Vec<_> = clip.bones.keys().map(String::as_str).collect();
    assert_eq!(names, ["root", "hips", "leg_left", "leg_right"]);
    assert_eq!(clip.particle_events.len(), 2);
    assert!(clip.sound_events.iter().all(|e| e.locator.is_empty()));

    let leg = clip.bone("leg_right").expect("leg_right");
    let modes: Vec<_> = leg
        .channel(ChannelKind::Rotation)
        .keyframes()
        .iter()
        .map(|k| k.interpolation)
        .collect();
    assert_eq!(modes[0], Interpolation::parse("Sine.InOut"));
}

/// it should fall back to linear for unknown interpolation names
#[test]
fn arm_wave_fields_and_mode_fallback() {
    let clip = load_clip("arm-wave");
    clip.validate().expect("arm wave is well formed");
    assert_eq!(clip.loop_mode, LoopMode::HoldLast);
    assert!(clip.override_previous);
    assert_eq!(clip.speed, 1.0);

    let tail = clip.bone("tail").expect("tail");
    let first = &tail.channel(ChannelKind::Position).keyframes()[0];
    assert_eq!(first.interpolation, Interpolation::Linear);
    assert!(tail.channel(ChannelKind::Rotation).is_empty());
}

#[test]
fn arm_wave_rotation_follows_handles() {
    let clip = load_clip("arm-wave");
    let sampler = Sampler::default();
    let z = |t: f32| {
        sampler
            .sample_bone(&clip, "arm_right", t)
            .and_then(|s| s.rotation)
            .expect("rotation")
            .z
    };
    assert_abs_diff_eq!(z(0.5), 56.25, epsilon = 1e-2);
    // the closing frame of a segment reports its `pre`
    assert_abs_diff_eq!(z(1.0), 80.0, epsilon = 1e-3);
    assert_abs_diff_eq!(z(1.5), 90.0, epsilon = 1e-3);
    assert_abs_diff_eq!(z(2.0), 45.0, epsilon = 1e-3);
    assert_abs_diff_eq!(z(3.0), 45.0, epsilon = 1e-3);

    let scale = sampler
        .sample_bone(&clip, "arm_right", 1.0)
        .and_then(|s| s.scale)
        .expect("scale");
    assert!(scale.x > 1.2, "back.out should overshoot, got {}", scale.x);
}

#[test]
fn hold_last_clip_keeps_final_pose_in_stack() {
    let clip = Arc::new(load_clip("arm-wave"));
    let mut stack = BlendStack::default();
    stack.push_layer(clip, 1.0);
    let mut pose = SkeletonPose::new()
        .with_bone("arm_right", BoneTransform::identity())
        .with_bone("tail", BoneTransform::identity());

    stack.update(2.5);
    stack.apply(&mut pose);
    assert!(stack.is_all_finished());
    let arm = pose.get("arm_right").expect("arm");
    assert_abs_diff_eq!(arm.rotation.z, 45.0, epsilon = 1e-3);
    assert_abs_diff_eq!(arm.scale.x, 1.2, epsilon = 1e-5);
    assert_abs_diff_eq!(pose.get("tail").expect("tail").position.y, 3.0, epsilon = 1e-5);
}

#[test]
fn unsorted_channel_is_rejected() {
    let clip = load_clip("unsorted-channel");
    let err = clip.validate().expect_err("unsorted scale channel");
    assert_eq!(
        err,
        ClipError::UnsortedChannel {
            clip: "broken".to_string(),
            bone: "spine".to_string(),
            channel: ChannelKind::Scale,
            index: 2,
        }
    );
    assert_eq!(err.clip(), "broken");
}

#[test]
fn partial_config_keeps_defaults() {
    let cfg: Config = configs::load("tight-root-motion").expect("config fixture");
    assert_eq!(cfg.root_motion.max_linear_velocity, 1.0);
    assert_eq!(cfg.root_motion.max_angular_velocity, 90.0);
    assert_eq!(cfg.root_motion.position_scale, RootMotionConfig::default().position_scale);
    assert!(cfg.root_motion.apply_position);
    assert_eq!(cfg.blend.fade_epsilon, 0.01);
    assert_eq!(cfg.blend.weight_epsilon, Config::default().blend.weight_epsilon);
    assert_eq!(cfg.sampler, Config::default().sampler);
}

#[test]
fn interpolation_serializes_as_mode_name() {
    let eased: Interpolation = serde_json::from_str("\"QUAD.IN\"").expect("parse");
    assert_eq!(serde_json::to_string(&eased).expect("write"), "\"quad.in\"");
    assert_eq!(
        serde_json::to_string(&Interpolation::CatmullRom).expect("write"),
        "\"catmullrom\""
    );
    let unknown: Interpolation = serde_json::from_str("\"wobble\"").expect("parse");
    assert_eq!(unknown, Interpolation::Linear);
}
