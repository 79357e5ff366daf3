//! Per-frame filtering of the aggregated displacement.
//!
//! The raw sum of gesture contributions goes through three stages before it
//! is committed: momentum blending against the previous frame, an
//! acceleration clamp, and soft range limiting against the joints' current
//! values. All functions here are pure.

use crate::bone::Bone;
use crate::config::{SequenceConfig, ValueRange};
use crate::displacement::DisplacementFrame;
use crate::rig::RigSnapshot;
use crate::value::Channel;

/// Damping factor for a step that overshoots a range bound by `x`:
/// `2 - 2 / (1 + e^(-10|x|))`, 1 at the bound and falling towards 0.
#[inline]
pub fn ease_overshoot(x: f32) -> f32 {
    2.0 - 2.0 / (1.0 + (-10.0 * x.abs()).exp())
}

/// `previous * weight + current * (1 - weight)` for every component.
pub fn blend_momentum(
    previous: &DisplacementFrame,
    current: &DisplacementFrame,
    weight: f32,
) -> DisplacementFrame {
    let mut out = DisplacementFrame::zero();
    for (bone, channel, axis) in DisplacementFrame::components() {
        let p = previous.scalar(bone, channel, axis);
        let c = current.scalar(bone, channel, axis);
        *out.scalar_mut(bone, channel, axis) = p * weight + c * (1.0 - weight);
    }
    out
}

fn acceleration_cap(channel: Channel, cfg: &SequenceConfig) -> Option<f32> {
    match channel {
        Channel::Location => cfg.max_translation_acceleration,
        Channel::Rotation => cfg.max_rotation_acceleration,
    }
}

/// Keep every component within its cap of the previous frame's value.
pub fn clamp_acceleration(
    previous: &DisplacementFrame,
    blended: &DisplacementFrame,
    cfg: &SequenceConfig,
) -> DisplacementFrame {
    let mut out = *blended;
    for (bone, channel, axis) in DisplacementFrame::components() {
        let Some(limit) = acceleration_cap(channel, cfg) else {
            continue;
        };
        let p = previous.scalar(bone, channel, axis);
        let diff = blended.scalar(bone, channel, axis) - p;
        if diff.abs() > limit {
            *out.scalar_mut(bone, channel, axis) = p + limit.copysign(diff);
        }
    }
    out
}

fn value_range(bone: Bone, channel: Channel, cfg: &SequenceConfig) -> Option<ValueRange> {
    match channel {
        Channel::Location => cfg.location_range,
        Channel::Rotation => cfg.rotation_ranges.get(bone),
    }
}

/// Shrink a single step `d` from `current` that would leave `range`
/// further behind. Steps inside the range, or heading back into it, pass
/// through unchanged.
#[inline]
pub fn limit_step(current: f32, d: f32, range: ValueRange) -> f32 {
    let next = current + d;
    // Compares `next` against `current` rather than the overshoot itself, so a
    // step that crosses the bound from inside is damped by its full overshoot.
    if next < range.min && next < current {
        d * ease_overshoot(range.min - next)
    } else if next > range.max && next > current {
        d * ease_overshoot(next - range.max)
    } else {
        d
    }
}

/// Apply [`limit_step`] to every component that has a configured range.
pub fn limit_range(
    displacement: &DisplacementFrame,
    joints: &RigSnapshot,
    cfg: &SequenceConfig,
) -> DisplacementFrame {
    let mut out = *displacement;
    for (bone, channel, axis) in DisplacementFrame::components() {
        let Some(range) = value_range(bone, channel, cfg) else {
            continue;
        };
        let current = joints.value(bone, channel)[axis];
        let d = out.scalar_mut(bone, channel, axis);
        *d = limit_step(current, *d, range);
    }
    out
}

/// Momentum, acceleration clamp and range limiting, in that order.
pub fn compose_frame(
    previous: &DisplacementFrame,
    raw: &DisplacementFrame,
    joints: &RigSnapshot,
    cfg: &SequenceConfig,
) -> DisplacementFrame {
    let blended = blend_momentum(previous, raw, cfg.momentum_weight);
    let clamped = clamp_acceleration(previous, &blended, cfg);
    limit_range(&clamped, joints, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;
    use crate::value::Vec3;

    fn frame_with(bone: Bone, channel: Channel, v: Vec3) -> DisplacementFrame {
        let mut f = DisplacementFrame::zero();
        f.add(bone, channel, v);
        f
    }

    #[test]
    fn ease_is_one_at_bound_and_decays() {
        assert!((ease_overshoot(0.0) - 1.0).abs() < 1e-6);
        assert!(ease_overshoot(0.1) < 1.0);
        assert!(ease_overshoot(0.5) < ease_overshoot(0.1));
        assert!(ease_overshoot(5.0) < 1e-6);
        assert_eq!(ease_overshoot(-0.3), ease_overshoot(0.3));
    }

    #[test]
    fn momentum_converges_to_constant_input() {
        let c = frame_with(Bone::Arm, Channel::Location, Vec3::new(1.0, -2.0, 0.5));
        let mut prev = DisplacementFrame::zero();
        let mut last_err = f32::INFINITY;
        for _ in 0..60 {
            prev = blend_momentum(&prev, &c, 0.8);
            let err = (prev.get(Bone::Arm, Channel::Location) - c.get(Bone::Arm, Channel::Location))
                .to_array()
                .iter()
                .fold(0.0f32, |m, v| m.max(v.abs()));
            assert!(err <= last_err);
            last_err = err;
        }
        assert!(last_err < 1e-4);
    }

    #[test]
    fn momentum_weight_bounds() {
        let prev = frame_with(Bone::Hand, Channel::Rotation, Vec3::new(0.3, 0.0, 0.0));
        let cur = frame_with(Bone::Hand, Channel::Rotation, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(blend_momentum(&prev, &cur, 0.0), cur);
        assert_eq!(blend_momentum(&prev, &cur, 1.0), prev);
    }

    #[test]
    fn acceleration_clamp_uses_channel_specific_caps() {
        let cfg = SequenceConfig {
            max_translation_acceleration: Some(0.1),
            max_rotation_acceleration: Some(0.5),
            ..SequenceConfig::passthrough()
        };
        let prev = DisplacementFrame::zero();
        let mut blended = DisplacementFrame::zero();
        blended.add(Bone::Arm, Channel::Location, Vec3::new(1.0, -1.0, 0.05));
        blended.add(Bone::Forearm, Channel::Rotation, Vec3::new(1.0, -0.2, 0.0));

        let out = clamp_acceleration(&prev, &blended, &cfg);
        assert_eq!(out.get(Bone::Arm, Channel::Location), Vec3::new(0.1, -0.1, 0.05));
        assert_eq!(out.get(Bone::Forearm, Channel::Rotation), Vec3::new(0.5, -0.2, 0.0));
    }

    #[test]
    fn range_limit_damps_only_outward_steps() {
        let r = ValueRange::new(-1.0, 1.0);
        // inside, staying inside
        assert_eq!(limit_step(0.0, 0.5, r), 0.5);
        // crossing the upper bound
        let d = limit_step(0.9, 0.3, r);
        assert!(d > 0.0 && d < 0.3);
        // already outside, moving further out
        let d = limit_step(-1.5, -0.2, r);
        assert!(d < 0.0 && d > -0.2);
        // outside, heading back in
        assert_eq!(limit_step(1.5, -0.2, r), -0.2);
        assert_eq!(limit_step(-1.5, 0.4, r), 0.4);
    }

    #[test]
    fn range_limit_never_reverses_a_step() {
        let r = ValueRange::new(-0.5, 0.5);
        let mut v = 0.0f32;
        let mut max_seen = v;
        for _ in 0..100 {
            let d = limit_step(v, 0.05, r);
            assert!(d >= 0.0);
            v += d;
            assert!(v >= max_seen);
            max_seen = v;
        }
        // unlimited, the same 100 steps would reach 5.0
        assert!(v > 0.5 && v < 1.0, "settled at {v}");
    }

    #[test]
    fn compose_limits_only_configured_components() {
        let cfg = SequenceConfig::passthrough();
        let mut joints = RigSnapshot::default();
        joints.joint_mut(Bone::Hand).rotation = Vec3::new(1.5, 0.0, 0.0);
        let raw = frame_with(Bone::Hand, Channel::Rotation, Vec3::new(0.2, 0.0, 0.0));

        let unrestricted = compose_frame(&DisplacementFrame::zero(), &raw, &joints, &cfg);
        assert_eq!(unrestricted, raw);

        let restricted = compose_frame(
            &DisplacementFrame::zero(),
            &raw,
            &joints,
            &SequenceConfig {
                rotation_ranges: SequenceConfig::default().rotation_ranges,
                ..cfg
            },
        );
        let d = restricted.scalar(Bone::Hand, Channel::Rotation, Axis::X);
        assert!(d > 0.0 && d < 0.2);
    }
}
