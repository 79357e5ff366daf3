//! Sinusoidal gestures.
//!
//! Oscillating gestures contribute the discrete derivative of their waveform,
//! `wave(f) - wave(f - 1)`, rather than its value. Summed over a window the
//! deltas telescope to `wave(end - 1) - wave(start - 1)`, and concurrent gestures on
//! the same component compose by addition.

use std::f32::consts::TAU;

use crate::axis::Axis;
use crate::bone::Bone;
use crate::displacement::DisplacementFrame;
use crate::value::Channel;

/// `amplitude * sin(2π * (frame - 1) / frame_rate * frequency + phase)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    pub frame_rate: f32,
    pub frequency: f32,
    pub amplitude: f32,
    pub phase: f32,
}

impl Oscillator {
    pub fn value(&self, frame: i64) -> f32 {
        let t = (frame - 1) as f32 / self.frame_rate;
        (TAU * t * self.frequency + self.phase).sin() * self.amplitude
    }

    /// Change of the waveform between `frame - 1` and `frame`.
    #[inline]
    pub fn delta(&self, frame: u32) -> f32 {
        let f = i64::from(frame);
        self.value(f) - self.value(f - 1)
    }
}

/// Single-axis oscillation of one joint component.
#[derive(Clone, Debug, PartialEq)]
pub struct Sine {
    pub bone: Bone,
    pub channel: Channel,
    pub axis: Axis,
    pub oscillator: Oscillator,
}

impl Sine {
    pub(crate) fn contribute(&self, frame: u32, out: &mut DisplacementFrame) {
        out.add_scalar(self.bone, self.channel, self.axis, self.oscillator.delta(frame));
    }
}

/// Phase and amplitude coupling between the joints of a [`Wave`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveCascade {
    pub arm_phase_shift: f32,
    pub forearm_phase_shift: f32,
    pub forearm_amplitude_factor: f32,
    pub hand_phase_shift: f32,
    pub hand_amplitude_factor: f32,
}

/// Rotation wave travelling down the arm: every joint oscillates on the same
/// axis at the same frequency, each one phase-shifted by everything upstream
/// of it and attenuated by the upstream amplitude factors.
#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
    pub axis: Axis,
    oscillators: [Oscillator; 3],
}

impl Wave {
    pub fn new(
        axis: Axis,
        frame_rate: f32,
        frequency: f32,
        amplitude: f32,
        cascade: WaveCascade,
    ) -> Self {
        let forearm_phase = cascade.arm_phase_shift + cascade.forearm_phase_shift;
        let hand_phase = forearm_phase + cascade.hand_phase_shift;
        let forearm_amplitude = amplitude * cascade.forearm_amplitude_factor;
        let hand_amplitude = forearm_amplitude * cascade.hand_amplitude_factor;
        let osc = |amplitude, phase| Oscillator {
            frame_rate,
            frequency,
            amplitude,
            phase,
        };
        Self {
            axis,
            oscillators: [
                osc(amplitude, cascade.arm_phase_shift),
                osc(forearm_amplitude, forearm_phase),
                osc(hand_amplitude, hand_phase),
            ],
        }
    }

    pub fn oscillator(&self, bone: Bone) -> &Oscillator {
        &self.oscillators[bone.index()]
    }

    pub(crate) fn contribute(&self, frame: u32, out: &mut DisplacementFrame) {
        for bone in Bone::ALL {
            let d = self.oscillator(bone).delta(frame);
            out.add_scalar(bone, Channel::Rotation, self.axis, d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_4, PI};

    fn osc(phase: f32) -> Oscillator {
        Oscillator {
            frame_rate: 24.0,
            frequency: 2.0,
            amplitude: 0.3,
            phase,
        }
    }

    #[test]
    fn deltas_telescope_to_waveform_difference() {
        let o = osc(0.4);
        let start = 7u32;
        let mut sum = 0.0f32;
        for f in (start + 1)..=40 {
            sum += o.delta(f);
            let expected = o.value(i64::from(f)) - o.value(i64::from(start));
            assert!((sum - expected).abs() < 1e-4, "frame {f}: {sum} vs {expected}");
        }
    }

    #[test]
    fn waveform_starts_at_phase_on_frame_one() {
        let o = osc(PI / 2.0);
        assert!((o.value(1) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn wave_cascades_phase_and_amplitude() {
        let w = Wave::new(
            Axis::Y,
            24.0,
            1.0,
            1.0,
            WaveCascade {
                arm_phase_shift: 0.1,
                forearm_phase_shift: FRAC_PI_4,
                forearm_amplitude_factor: 0.5,
                hand_phase_shift: FRAC_PI_4,
                hand_amplitude_factor: 0.5,
            },
        );
        let forearm = w.oscillator(Bone::Forearm);
        let hand = w.oscillator(Bone::Hand);
        assert!((forearm.phase - (0.1 + FRAC_PI_4)).abs() < 1e-6);
        assert!((hand.phase - (0.1 + 2.0 * FRAC_PI_4)).abs() < 1e-6);
        assert_eq!(forearm.amplitude, 0.5);
        assert_eq!(hand.amplitude, 0.25);

        let mut out = DisplacementFrame::zero();
        w.contribute(3, &mut out);
        for bone in Bone::ALL {
            assert_eq!(
                out.scalar(bone, Channel::Rotation, Axis::Y),
                w.oscillator(bone).delta(3)
            );
            assert_eq!(out.scalar(bone, Channel::Rotation, Axis::X), 0.0);
            assert!(out.get(bone, Channel::Location).is_zero());
        }
    }
}
