//! In-memory rig that records committed keyframes, and the baked export format.

use serde::{Deserialize, Serialize};

use crate::bone::Bone;
use crate::rig::{Joint, JointState, Rig, RigSnapshot, SceneClock};
use crate::value::{Channel, Vec3};

/// One committed keyframe.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: u32,
    pub value: Vec3,
}

/// Joint that keeps its current values and every keyframe committed on it.
#[derive(Clone, Debug, Default)]
pub struct RecordedJoint {
    pub state: JointState,
    pub location_keys: Vec<Keyframe>,
    pub rotation_keys: Vec<Keyframe>,
}

impl RecordedJoint {
    pub fn keys(&self, channel: Channel) -> &[Keyframe] {
        match channel {
            Channel::Location => &self.location_keys,
            Channel::Rotation => &self.rotation_keys,
        }
    }
}

impl Joint for RecordedJoint {
    fn location(&self) -> Vec3 {
        self.state.location
    }

    fn set_location(&mut self, value: Vec3) {
        self.state.location = value;
    }

    fn rotation(&self) -> Vec3 {
        self.state.rotation
    }

    fn set_rotation(&mut self, value: Vec3) {
        self.state.rotation = value;
    }

    fn commit_keyframe(&mut self, channel: Channel, frame: u32) {
        let value = self.state.get(channel);
        let keys = match channel {
            Channel::Location => &mut self.location_keys,
            Channel::Rotation => &mut self.rotation_keys,
        };
        // Re-committing a frame replaces its key.
        match keys.last_mut() {
            Some(last) if last.frame == frame => last.value = value,
            _ => keys.push(Keyframe { frame, value }),
        }
    }
}

/// Three recorded joints plus the clock state a host would hold.
#[derive(Clone, Debug, Default)]
pub struct RecordingRig {
    joints: [RecordedJoint; 3],
    pub current_frame: u32,
    /// Set once by a finished sequence.
    pub animation_range: Option<(u32, u32)>,
}

impl RecordingRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rig whose joints start from the given values.
    pub fn from_snapshot(snapshot: RigSnapshot) -> Self {
        let mut rig = Self::default();
        for bone in Bone::ALL {
            rig.joints[bone.index()].state = *snapshot.joint(bone);
        }
        rig
    }

    pub fn keys(&self, bone: Bone, channel: Channel) -> &[Keyframe] {
        self.joints[bone.index()].keys(channel)
    }

    pub fn keyframe_count(&self) -> usize {
        self.joints
            .iter()
            .map(|j| j.location_keys.len() + j.rotation_keys.len())
            .sum()
    }

    /// Collect all recorded channels into the export format.
    pub fn bake(&self, frame_rate: u32) -> BakedSequence {
        let (start_frame, end_frame) = self.animation_range.unwrap_or((0, self.current_frame));
        let mut tracks = Vec::new();
        for bone in Bone::ALL {
            for channel in Channel::ALL {
                let keys = self.keys(bone, channel);
                if keys.is_empty() {
                    continue;
                }
                tracks.push(BakedTrack {
                    bone,
                    channel,
                    keyframes: keys.to_vec(),
                });
            }
        }
        BakedSequence {
            frame_rate,
            start_frame,
            end_frame,
            tracks,
        }
    }
}

impl SceneClock for RecordingRig {
    fn set_current_frame(&mut self, frame: u32) {
        self.current_frame = frame;
    }

    fn set_animation_range(&mut self, start_frame: u32, end_frame: u32) {
        self.animation_range = Some((start_frame, end_frame));
    }
}

impl Rig for RecordingRig {
    type Joint = RecordedJoint;

    fn joint(&self, bone: Bone) -> &RecordedJoint {
        &self.joints[bone.index()]
    }

    fn joint_mut(&mut self, bone: Bone) -> &mut RecordedJoint {
        &mut self.joints[bone.index()]
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BakedTrack {
    pub bone: Bone,
    pub channel: Channel,
    pub keyframes: Vec<Keyframe>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BakedSequence {
    pub frame_rate: u32,
    pub start_frame: u32,
    pub end_frame: u32,
    pub tracks: Vec<BakedTrack>,
}

/// Export baked keyframes as serde_json::Value (stable schema for downstream tooling).
pub fn export_baked_json(baked: &BakedSequence) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}
