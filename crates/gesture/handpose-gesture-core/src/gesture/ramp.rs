use crate::bone::Bone;
use crate::displacement::DisplacementFrame;
use crate::gesture::FrameWindow;
use crate::value::{Channel, Vec3};

/// Constant per-frame increment spreading a total change over the window.
#[derive(Clone, Debug, PartialEq)]
pub struct Ramp {
    pub bone: Bone,
    pub channel: Channel,
    per_frame: Vec3,
}

impl Ramp {
    /// `target` is a delta when `relative`, otherwise the absolute value to
    /// reach at `end_frame`, resolved against `captured` (the joint value when
    /// the gesture was promoted).
    pub fn new(
        window: FrameWindow,
        bone: Bone,
        channel: Channel,
        target: Vec3,
        relative: bool,
        captured: Vec3,
    ) -> Self {
        let total = if relative { target } else { target - captured };
        Self {
            bone,
            channel,
            per_frame: total / window.duration() as f32,
        }
    }

    #[inline]
    pub fn per_frame(&self) -> Vec3 {
        self.per_frame
    }

    pub(crate) fn contribute(&self, out: &mut DisplacementFrame) {
        out.add(self.bone, self.channel, self.per_frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_ramp_splits_vector_evenly() {
        let w = FrameWindow::new(1, 11).unwrap();
        let r = Ramp::new(
            w,
            Bone::Arm,
            Channel::Location,
            Vec3::new(10.0, 0.0, -5.0),
            true,
            Vec3::new(100.0, 100.0, 100.0),
        );
        assert_eq!(r.per_frame(), Vec3::new(1.0, 0.0, -0.5));
    }

    #[test]
    fn absolute_ramp_subtracts_captured_value() {
        let w = FrameWindow::new(3, 7).unwrap();
        let r = Ramp::new(
            w,
            Bone::Forearm,
            Channel::Rotation,
            Vec3::new(1.0, 0.0, 0.0),
            false,
            Vec3::new(0.2, 0.4, 0.0),
        );
        let p = r.per_frame();
        assert!((p.x - 0.2).abs() < 1e-6);
        assert!((p.y + 0.1).abs() < 1e-6);
        assert_eq!(p.z, 0.0);
    }
}
