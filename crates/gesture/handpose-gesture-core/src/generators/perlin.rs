//! Octave-layered oscillations approximating 1/f noise.
//!
//! Octave `k` runs at `2^k` times a sampled base frequency with amplitude
//! scaled by `persistence^k`; each octave is an independent gesture.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::bone::Bone;
use crate::declaration::{GestureDecl, GestureSet, RotationSineArgs, RotationWaveArgs};
use crate::error::{GestureError, Result};
use crate::generators::{GenContext, ModuleGenerator, LOWEST_PRIORITY};
use crate::sequence::FIRST_FRAME;

fn default_weight() -> f32 {
    1.0
}

fn default_priority() -> u32 {
    LOWEST_PRIORITY
}

/// Parameters shared by the Perlin-style generators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerlinParams {
    pub id: String,
    pub start_frame: u32,
    pub end_frame: u32,
    /// Base frequency range of octave 0.
    pub period_range: (f32, f32),
    pub amplitude_range: (f32, f32),
    pub persistence: f32,
    /// Octave count drawn from `[lo, hi)`.
    pub n_octaves_range: (u32, u32),
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default = "default_priority")]
    pub priority: u32,
}

impl PerlinParams {
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(GestureError::generator(&self.id, reason));
        if self.start_frame < FIRST_FRAME {
            return fail(format!(
                "start frame {} precedes the first simulated frame ({FIRST_FRAME})",
                self.start_frame
            ));
        }
        if self.start_frame >= self.end_frame {
            return fail(format!(
                "start frame {} must be less than end frame {}",
                self.start_frame, self.end_frame
            ));
        }
        let (p_lo, p_hi) = self.period_range;
        if !(p_lo > 0.0) || p_hi < p_lo {
            return fail(format!(
                "period range ({p_lo}, {p_hi}) must be positive and ordered"
            ));
        }
        let (a_lo, a_hi) = self.amplitude_range;
        if a_lo < 0.0 || a_hi < a_lo {
            return fail(format!(
                "amplitude range ({a_lo}, {a_hi}) must be non-negative and ordered"
            ));
        }
        if !(0.0..=1.0).contains(&self.persistence) {
            return fail(format!(
                "persistence {} must be in [0, 1]",
                self.persistence
            ));
        }
        let (o_lo, o_hi) = self.n_octaves_range;
        if o_lo < 1 || o_hi < o_lo {
            return fail(format!(
                "octave range ({o_lo}, {o_hi}) must start at 1 or more and be ordered"
            ));
        }
        if self.weight < 0.0 {
            return fail(format!("weight {} must be non-negative", self.weight));
        }
        Ok(())
    }

    /// `(frequency, amplitude)` for each octave of one layer.
    fn octaves(&self, ctx: &mut GenContext) -> Vec<(f32, f32)> {
        let (lo, hi) = self.n_octaves_range;
        let n = if hi > lo {
            ctx.rng.gen_range(lo..hi)
        } else {
            lo
        };
        (0..n)
            .map(|octave| {
                let period = ctx.uniform(self.period_range);
                let amplitude = ctx.uniform(self.amplitude_range);
                let k = octave as i32;
                (
                    2f32.powi(k) * period,
                    self.persistence.powi(k) * amplitude,
                )
            })
            .collect()
    }
}

/// Emits octave-layered [`GestureDecl::RotationWaveGesture`]s on every axis.
#[derive(Clone, Debug)]
pub struct PerlinRotationWaveGenerator {
    params: PerlinParams,
}

impl PerlinRotationWaveGenerator {
    pub fn new(params: PerlinParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }
}

impl ModuleGenerator for PerlinRotationWaveGenerator {
    fn generate(&self, ctx: &mut GenContext) -> Result<GestureSet> {
        let s = &self.params;
        let mut out = GestureSet::new();
        for axis in Axis::ALL {
            for (octave, (frequency, amplitude)) in s.octaves(ctx).into_iter().enumerate() {
                out.insert(
                    format!("{}_{axis}_{octave}", s.id),
                    GestureDecl::RotationWaveGesture(RotationWaveArgs {
                        start_frame: s.start_frame,
                        end_frame: s.end_frame,
                        frame_rate: Some(ctx.frame_rate),
                        axis,
                        wave_frequency: frequency,
                        wave_amplitude: amplitude,
                        arm_phase_shift: 0.0,
                        forearm_phase_shift: 0.0,
                        forearm_amplitude_factor: 0.5,
                        hand_phase_shift: 0.0,
                        hand_amplitude_factor: 0.5,
                    }),
                )?;
            }
        }
        Ok(out)
    }

    fn weight(&self) -> f32 {
        self.params.weight
    }

    fn priority(&self) -> u32 {
        self.params.priority
    }
}

/// Emits octave-layered [`GestureDecl::RotationSineGesture`]s for every bone and axis.
#[derive(Clone, Debug)]
pub struct PerlinRotationSineGenerator {
    params: PerlinParams,
}

impl PerlinRotationSineGenerator {
    pub fn new(params: PerlinParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }
}

impl ModuleGenerator for PerlinRotationSineGenerator {
    fn generate(&self, ctx: &mut GenContext) -> Result<GestureSet> {
        let s = &self.params;
        let mut out = GestureSet::new();
        for bone in Bone::ALL {
            for axis in Axis::ALL {
                for (octave, (frequency, amplitude)) in s.octaves(ctx).into_iter().enumerate() {
                    out.insert(
                        format!("{}_{bone}_{axis}_{octave}", s.id),
                        GestureDecl::RotationSineGesture(RotationSineArgs {
                            start_frame: s.start_frame,
                            end_frame: s.end_frame,
                            frame_rate: Some(ctx.frame_rate),
                            bone,
                            axis,
                            phase_shift: 0.0,
                            wave_frequency: frequency,
                            wave_amplitude: amplitude,
                        }),
                    )?;
                }
            }
        }
        Ok(out)
    }

    fn weight(&self) -> f32 {
        self.params.weight
    }

    fn priority(&self) -> u32 {
        self.params.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PerlinParams {
        PerlinParams {
            id: "perlin".into(),
            start_frame: 1,
            end_frame: 50,
            period_range: (1.0, 3.0),
            amplitude_range: (0.5, 2.0),
            persistence: 0.5,
            n_octaves_range: (3, 3),
            weight: 1.0,
            priority: LOWEST_PRIORITY,
        }
    }

    #[test]
    fn octaves_double_frequency_and_decay_amplitude() {
        let g = PerlinRotationWaveGenerator::new(PerlinParams {
            period_range: (2.0, 2.0),
            amplitude_range: (1.0, 1.0),
            ..params()
        })
        .unwrap();
        let set = g.generate(&mut GenContext::new(7, 30)).unwrap();
        assert_eq!(set.len(), 9);
        match set.get("perlin_Y_2").unwrap() {
            GestureDecl::RotationWaveGesture(a) => {
                assert_eq!(a.wave_frequency, 8.0);
                assert_eq!(a.wave_amplitude, 0.25);
                assert_eq!(a.frame_rate, Some(30));
                assert_eq!(a.axis, Axis::Y);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sine_generator_covers_every_bone_and_axis() {
        let g = PerlinRotationSineGenerator::new(PerlinParams {
            n_octaves_range: (1, 1),
            ..params()
        })
        .unwrap();
        let set = g.generate(&mut GenContext::new(1, 24)).unwrap();
        assert_eq!(set.len(), 9);
        assert!(set.get("perlin_Forearm_Z_0").is_some());
    }

    #[test]
    fn same_seed_same_output() {
        let g = PerlinRotationWaveGenerator::new(PerlinParams {
            n_octaves_range: (1, 5),
            ..params()
        })
        .unwrap();
        let a = g.generate(&mut GenContext::new(42, 24)).unwrap();
        let b = g.generate(&mut GenContext::new(42, 24)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_invalid_params() {
        for bad in [
            PerlinParams { end_frame: 1, ..params() },
            PerlinParams { start_frame: 0, ..params() },
            PerlinParams { period_range: (0.0, 1.0), ..params() },
            PerlinParams { period_range: (3.0, 1.0), ..params() },
            PerlinParams { amplitude_range: (2.0, 1.0), ..params() },
            PerlinParams { persistence: 1.5, ..params() },
            PerlinParams { n_octaves_range: (0, 2), ..params() },
            PerlinParams { n_octaves_range: (3, 2), ..params() },
        ] {
            assert!(matches!(
                PerlinRotationWaveGenerator::new(bad),
                Err(GestureError::Generator { .. })
            ));
        }
    }
}
