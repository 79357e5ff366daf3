//! Per-frame displacement aggregate.
//!
//! Every active gesture adds into one [`DisplacementFrame`]; contributions to
//! the same joint accumulate by vector sum. The frame holds deltas for the
//! current frame only, never cumulative values.

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::bone::Bone;
use crate::value::{Channel, Vec3};

/// Location and rotation delta for one joint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneDisplacement {
    pub location: Vec3,
    pub rotation: Vec3,
}

impl BoneDisplacement {
    #[inline]
    pub fn get(&self, channel: Channel) -> Vec3 {
        match channel {
            Channel::Location => self.location,
            Channel::Rotation => self.rotation,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, channel: Channel) -> &mut Vec3 {
        match channel {
            Channel::Location => &mut self.location,
            Channel::Rotation => &mut self.rotation,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplacementFrame {
    bones: [BoneDisplacement; 3],
}

impl DisplacementFrame {
    /// Zero displacement for every joint.
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn bone(&self, bone: Bone) -> &BoneDisplacement {
        &self.bones[bone.index()]
    }

    #[inline]
    pub fn bone_mut(&mut self, bone: Bone) -> &mut BoneDisplacement {
        &mut self.bones[bone.index()]
    }

    #[inline]
    pub fn get(&self, bone: Bone, channel: Channel) -> Vec3 {
        self.bone(bone).get(channel)
    }

    /// Accumulate `delta` into `(bone, channel)`.
    #[inline]
    pub fn add(&mut self, bone: Bone, channel: Channel, delta: Vec3) {
        *self.bone_mut(bone).get_mut(channel) += delta;
    }

    /// Accumulate a scalar into one component.
    #[inline]
    pub fn add_scalar(&mut self, bone: Bone, channel: Channel, axis: Axis, delta: f32) {
        self.bone_mut(bone).get_mut(channel)[axis] += delta;
    }

    #[inline]
    pub fn scalar(&self, bone: Bone, channel: Channel, axis: Axis) -> f32 {
        self.get(bone, channel)[axis]
    }

    #[inline]
    pub fn scalar_mut(&mut self, bone: Bone, channel: Channel, axis: Axis) -> &mut f32 {
        &mut self.bone_mut(bone).get_mut(channel)[axis]
    }

    pub fn is_zero(&self) -> bool {
        self.bones
            .iter()
            .all(|b| b.location.is_zero() && b.rotation.is_zero())
    }

    /// Every `(bone, channel, axis)` slot, in a fixed order.
    pub fn components() -> impl Iterator<Item = (Bone, Channel, Axis)> {
        Bone::ALL.into_iter().flat_map(|bone| {
            Channel::ALL.into_iter().flat_map(move |channel| {
                Axis::ALL
                    .into_iter()
                    .map(move |axis| (bone, channel, axis))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contributions_accumulate_by_sum() {
        let mut frame = DisplacementFrame::zero();
        frame.add(Bone::Arm, Channel::Location, Vec3::new(1.0, 0.0, 0.0));
        frame.add(Bone::Arm, Channel::Location, Vec3::new(0.5, 2.0, 0.0));
        frame.add_scalar(Bone::Hand, Channel::Rotation, Axis::Z, 0.25);

        assert_eq!(frame.get(Bone::Arm, Channel::Location), Vec3::new(1.5, 2.0, 0.0));
        assert_eq!(frame.scalar(Bone::Hand, Channel::Rotation, Axis::Z), 0.25);
        assert!(frame.get(Bone::Forearm, Channel::Rotation).is_zero());
        assert!(!frame.is_zero());
    }

    #[test]
    fn components_cover_all_eighteen_slots() {
        assert_eq!(DisplacementFrame::components().count(), 18);
    }
}
