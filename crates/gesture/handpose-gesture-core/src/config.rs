//! Sequence configuration: momentum, acceleration caps and joint ranges.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::bone::Bone;
use crate::error::{GestureError, Result};

/// Closed interval a joint component should stay within.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Symmetric range `[-half_width, half_width]`.
    pub const fn symmetric(half_width: f32) -> Self {
        Self {
            min: -half_width,
            max: half_width,
        }
    }

    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Optional range per bone (`None` = unrestricted).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneRanges {
    #[serde(default)]
    pub arm: Option<ValueRange>,
    #[serde(default)]
    pub forearm: Option<ValueRange>,
    #[serde(default)]
    pub hand: Option<ValueRange>,
}

impl BoneRanges {
    pub fn get(&self, bone: Bone) -> Option<ValueRange> {
        match bone {
            Bone::Arm => self.arm,
            Bone::Forearm => self.forearm,
            Bone::Hand => self.hand,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (Bone, ValueRange)> + '_ {
        Bone::ALL
            .into_iter()
            .filter_map(move |b| self.get(b).map(|r| (b, r)))
    }
}

/// Limits applied to the aggregated displacement every frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Frame rate used by oscillating gestures whose declaration omits one.
    pub frame_rate: u32,
    /// Share of the previous frame's displacement kept in the current one, in `[0, 1]`.
    pub momentum_weight: f32,
    /// Per-frame change cap on location components (`None` = unbounded).
    pub max_translation_acceleration: Option<f32>,
    /// Per-frame change cap on rotation components, radians (`None` = unbounded).
    pub max_rotation_acceleration: Option<f32>,
    /// Location range, shared by all joints.
    pub location_range: Option<ValueRange>,
    /// Rotation range per joint, radians.
    pub rotation_ranges: BoneRanges,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            frame_rate: 24,
            momentum_weight: 0.5,
            max_translation_acceleration: Some(0.05),
            max_rotation_acceleration: Some(0.1),
            location_range: None,
            rotation_ranges: BoneRanges {
                arm: None,
                forearm: Some(ValueRange::symmetric(FRAC_PI_2)),
                hand: Some(ValueRange::symmetric(FRAC_PI_2)),
            },
        }
    }
}

impl SequenceConfig {
    /// Plain aggregation: no momentum, no acceleration caps, no ranges.
    pub fn passthrough() -> Self {
        Self {
            momentum_weight: 0.0,
            max_translation_acceleration: None,
            max_rotation_acceleration: None,
            location_range: None,
            rotation_ranges: BoneRanges::default(),
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: SequenceConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(GestureError::InvalidConfig(
                "frame_rate must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.momentum_weight) {
            return Err(GestureError::InvalidConfig(format!(
                "momentum_weight must be in [0, 1], got {}",
                self.momentum_weight
            )));
        }
        for (name, cap) in [
            ("max_translation_acceleration", self.max_translation_acceleration),
            ("max_rotation_acceleration", self.max_rotation_acceleration),
        ] {
            if let Some(c) = cap {
                if c.is_nan() || c <= 0.0 {
                    return Err(GestureError::InvalidConfig(format!(
                        "{name} must be greater than 0, got {c}"
                    )));
                }
            }
        }
        if let Some(r) = self.location_range {
            check_range("location_range", r)?;
        }
        for (bone, r) in self.rotation_ranges.iter() {
            check_range(&format!("rotation_ranges.{bone}"), r)?;
        }
        Ok(())
    }
}

fn check_range(name: &str, r: ValueRange) -> Result<()> {
    if r.min.is_nan() || r.max.is_nan() || r.min > r.max {
        return Err(GestureError::InvalidConfig(format!(
            "{name}: min {} must not exceed max {}",
            r.min, r.max
        )));
    }
    Ok(())
}

/// Settings for the procedural gesture generators.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Fixed seed for reproducible output; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    /// Frame rate written into generated oscillating gestures.
    pub frame_rate: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            frame_rate: 24,
        }
    }
}
