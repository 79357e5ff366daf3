use crate::bone::Bone;
use crate::displacement::DisplacementFrame;
use crate::value::{Channel, Vec3};

/// Whole change applied in a single frame (translation/rotation events).
#[derive(Clone, Debug, PartialEq)]
pub struct Impulse {
    pub bone: Bone,
    pub channel: Channel,
    delta: Vec3,
}

impl Impulse {
    /// Absolute events land on `target`; relative ones shift by it.
    pub fn new(bone: Bone, channel: Channel, target: Vec3, relative: bool, captured: Vec3) -> Self {
        let delta = if relative { target } else { target - captured };
        Self {
            bone,
            channel,
            delta,
        }
    }

    #[inline]
    pub fn delta(&self) -> Vec3 {
        self.delta
    }

    pub(crate) fn contribute(&self, out: &mut DisplacementFrame) {
        out.add(self.bone, self.channel, self.delta);
    }
}
