//! Host seam: joints, scene clock, and the rig tying them together.
//!
//! Hosts (a DCC application, an offline baker) implement these traits; the
//! sequence only reads and writes joint values through them and asks for
//! keyframes to be committed. [`crate::recording::RecordingRig`] is the
//! in-memory implementation.

use serde::{Deserialize, Serialize};

use crate::bone::Bone;
use crate::value::{Channel, Vec3};

/// One animated joint handle.
pub trait Joint {
    fn location(&self) -> Vec3;
    fn set_location(&mut self, value: Vec3);
    /// XYZ Euler angles, radians.
    fn rotation(&self) -> Vec3;
    fn set_rotation(&mut self, value: Vec3);
    /// Commit the current value of `channel` as a keyframe at `frame`.
    fn commit_keyframe(&mut self, channel: Channel, frame: u32);

    fn get(&self, channel: Channel) -> Vec3 {
        match channel {
            Channel::Location => self.location(),
            Channel::Rotation => self.rotation(),
        }
    }

    fn set(&mut self, channel: Channel, value: Vec3) {
        match channel {
            Channel::Location => self.set_location(value),
            Channel::Rotation => self.set_rotation(value),
        }
    }
}

/// Host-owned timeline.
pub trait SceneClock {
    fn set_current_frame(&mut self, frame: u32);
    /// Written once when a sequence finishes.
    fn set_animation_range(&mut self, start_frame: u32, end_frame: u32);
}

/// Arm, forearm and hand joints plus the scene clock.
pub trait Rig: SceneClock {
    type Joint: Joint;

    fn joint(&self, bone: Bone) -> &Self::Joint;
    fn joint_mut(&mut self, bone: Bone) -> &mut Self::Joint;

    /// Current values of all three joints.
    fn snapshot(&self) -> RigSnapshot {
        let mut snap = RigSnapshot::default();
        for bone in Bone::ALL {
            let j = self.joint(bone);
            snap.joints[bone.index()] = JointState {
                location: j.location(),
                rotation: j.rotation(),
            };
        }
        snap
    }
}

/// Value snapshot of one joint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointState {
    pub location: Vec3,
    pub rotation: Vec3,
}

impl JointState {
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

/// Joint values of the whole rig at one instant, indexed by [`Bone::index`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RigSnapshot {
    pub joints: [JointState; 3],
}

impl RigSnapshot {
    #[inline]
    pub fn joint(&self, bone: Bone) -> &JointState {
        &self.joints[bone.index()]
    }

    #[inline]
    pub fn joint_mut(&mut self, bone: Bone) -> &mut JointState {
        &mut self.joints[bone.index()]
    }

    #[inline]
    pub fn value(&self, bone: Bone, channel: Channel) -> Vec3 {
        self.joint(bone).get(channel)
    }
}
