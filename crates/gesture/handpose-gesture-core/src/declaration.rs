//! Declarative gesture descriptions and their JSON contract.
//!
//! A gesture document looks like
//!
//! ```json
//! { "gestures": {
//!     "lift": { "type": "TranslationGesture",
//!               "args": { "start_frame": 1, "end_frame": 11,
//!                         "vector": { "x": 0.0, "y": 0.0, "z": 1.0 } } } } }
//! ```
//!
//! Declarations are validated eagerly when a sequence is built, but only
//! turned into [`Gesture`]s when the sequence clock reaches their start frame,
//! so absolute targets resolve against the joint value at that moment.

use std::f32::consts::FRAC_PI_4;
use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::bone::Bone;
use crate::config::SequenceConfig;
use crate::error::{GestureError, Result};
use crate::gesture::{
    FrameWindow, Gesture, GestureKind, Impulse, Oscillator, Ramp, Sine, Wave, WaveCascade,
};
use crate::rig::RigSnapshot;
use crate::value::{Channel, Vec3};

fn default_true() -> bool {
    true
}

fn default_wave_frequency() -> f32 {
    4.0
}

fn default_wave_amplitude() -> f32 {
    0.1
}

fn default_cascade_phase() -> f32 {
    FRAC_PI_4
}

fn default_cascade_factor() -> f32 {
    0.5
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationArgs {
    pub start_frame: u32,
    pub end_frame: u32,
    pub vector: Vec3,
    #[serde(default = "default_true")]
    pub relative: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotationArgs {
    pub start_frame: u32,
    pub end_frame: u32,
    pub bone: Bone,
    pub euler: Vec3,
    #[serde(default = "default_true")]
    pub relative: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationSineArgs {
    pub start_frame: u32,
    pub end_frame: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
    pub axis: Axis,
    #[serde(default)]
    pub phase_shift: f32,
    #[serde(default = "default_wave_frequency", alias = "wave_period")]
    pub wave_frequency: f32,
    #[serde(default = "default_wave_amplitude")]
    pub wave_amplitude: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotationSineArgs {
    pub start_frame: u32,
    pub end_frame: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
    pub bone: Bone,
    pub axis: Axis,
    #[serde(default)]
    pub phase_shift: f32,
    #[serde(default = "default_wave_frequency", alias = "wave_period")]
    pub wave_frequency: f32,
    #[serde(default = "default_wave_amplitude")]
    pub wave_amplitude: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotationWaveArgs {
    pub start_frame: u32,
    pub end_frame: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
    pub axis: Axis,
    #[serde(default = "default_wave_frequency", alias = "wave_period")]
    pub wave_frequency: f32,
    #[serde(default = "default_wave_amplitude")]
    pub wave_amplitude: f32,
    #[serde(default)]
    pub arm_phase_shift: f32,
    #[serde(default = "default_cascade_phase")]
    pub forearm_phase_shift: f32,
    #[serde(default = "default_cascade_factor")]
    pub forearm_amplitude_factor: f32,
    #[serde(default = "default_cascade_phase")]
    pub hand_phase_shift: f32,
    #[serde(default = "default_cascade_factor")]
    pub hand_amplitude_factor: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationEventArgs {
    pub start_frame: u32,
    pub location: Vec3,
    #[serde(default = "default_true")]
    pub relative: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotationEventArgs {
    pub start_frame: u32,
    pub bone: Bone,
    pub rotation: Vec3,
    #[serde(default = "default_true")]
    pub relative: bool,
}

/// One declared gesture: constructor type plus its named arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "args")]
pub enum GestureDecl {
    TranslationGesture(TranslationArgs),
    RotationGesture(RotationArgs),
    TranslationSineGesture(TranslationSineArgs),
    RotationSineGesture(RotationSineArgs),
    RotationWaveGesture(RotationWaveArgs),
    TranslationEvent(TranslationEventArgs),
    RotationEvent(RotationEventArgs),
}

impl GestureDecl {
    pub fn start_frame(&self) -> u32 {
        match self {
            GestureDecl::TranslationGesture(a) => a.start_frame,
            GestureDecl::RotationGesture(a) => a.start_frame,
            GestureDecl::TranslationSineGesture(a) => a.start_frame,
            GestureDecl::RotationSineGesture(a) => a.start_frame,
            GestureDecl::RotationWaveGesture(a) => a.start_frame,
            GestureDecl::TranslationEvent(a) => a.start_frame,
            GestureDecl::RotationEvent(a) => a.start_frame,
        }
    }

    /// Declared end frame; events end one frame after they start.
    pub fn end_frame(&self) -> u32 {
        match self {
            GestureDecl::TranslationGesture(a) => a.end_frame,
            GestureDecl::RotationGesture(a) => a.end_frame,
            GestureDecl::TranslationSineGesture(a) => a.end_frame,
            GestureDecl::RotationSineGesture(a) => a.end_frame,
            GestureDecl::RotationWaveGesture(a) => a.end_frame,
            GestureDecl::TranslationEvent(_) | GestureDecl::RotationEvent(_) => {
                self.start_frame().saturating_add(1)
            }
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(
            self,
            GestureDecl::TranslationEvent(_) | GestureDecl::RotationEvent(_)
        )
    }

    pub fn window(&self, id: &str) -> Result<FrameWindow> {
        let (start_frame, end_frame) = (self.start_frame(), self.end_frame());
        FrameWindow::new(start_frame, end_frame).ok_or_else(|| GestureError::InvalidWindow {
            id: id.to_string(),
            start_frame,
            end_frame,
        })
    }

    /// Check every precondition that does not depend on joint state.
    pub fn validate(&self, id: &str, cfg: &SequenceConfig) -> Result<()> {
        self.window(id)?;
        match self {
            GestureDecl::TranslationSineGesture(a) => {
                check_frame_rate(id, a.frame_rate, cfg)?;
                check_frequency(id, a.wave_frequency)?;
                check_amplitude(id, a.wave_amplitude)
            }
            GestureDecl::RotationSineGesture(a) => {
                check_frame_rate(id, a.frame_rate, cfg)?;
                check_frequency(id, a.wave_frequency)?;
                check_amplitude(id, a.wave_amplitude)
            }
            GestureDecl::RotationWaveGesture(a) => {
                check_frame_rate(id, a.frame_rate, cfg)?;
                check_frequency(id, a.wave_frequency)
            }
            _ => Ok(()),
        }
    }

    /// Build the runtime gesture, capturing joint values from `snapshot` for
    /// absolute targets.
    pub fn instantiate(
        &self,
        id: &str,
        snapshot: &RigSnapshot,
        cfg: &SequenceConfig,
    ) -> Result<Gesture> {
        self.validate(id, cfg)?;
        let window = self.window(id)?;
        let rate = |r: Option<u32>| r.unwrap_or(cfg.frame_rate) as f32;
        let kind = match self {
            GestureDecl::TranslationGesture(a) => GestureKind::Translation(Ramp::new(
                window,
                Bone::Arm,
                Channel::Location,
                a.vector,
                a.relative,
                snapshot.value(Bone::Arm, Channel::Location),
            )),
            GestureDecl::RotationGesture(a) => GestureKind::Rotation(Ramp::new(
                window,
                a.bone,
                Channel::Rotation,
                a.euler,
                a.relative,
                snapshot.value(a.bone, Channel::Rotation),
            )),
            GestureDecl::TranslationSineGesture(a) => GestureKind::TranslationSine(Sine {
                bone: Bone::Arm,
                channel: Channel::Location,
                axis: a.axis,
                oscillator: Oscillator {
                    frame_rate: rate(a.frame_rate),
                    frequency: a.wave_frequency,
                    amplitude: a.wave_amplitude,
                    phase: a.phase_shift,
                },
            }),
            GestureDecl::RotationSineGesture(a) => GestureKind::RotationSine(Sine {
                bone: a.bone,
                channel: Channel::Rotation,
                axis: a.axis,
                oscillator: Oscillator {
                    frame_rate: rate(a.frame_rate),
                    frequency: a.wave_frequency,
                    amplitude: a.wave_amplitude,
                    phase: a.phase_shift,
                },
            }),
            GestureDecl::RotationWaveGesture(a) => GestureKind::RotationWave(Wave::new(
                a.axis,
                rate(a.frame_rate),
                a.wave_frequency,
                a.wave_amplitude,
                WaveCascade {
                    arm_phase_shift: a.arm_phase_shift,
                    forearm_phase_shift: a.forearm_phase_shift,
                    forearm_amplitude_factor: a.forearm_amplitude_factor,
                    hand_phase_shift: a.hand_phase_shift,
                    hand_amplitude_factor: a.hand_amplitude_factor,
                },
            )),
            GestureDecl::TranslationEvent(a) => GestureKind::TranslationEvent(Impulse::new(
                Bone::Arm,
                Channel::Location,
                a.location,
                a.relative,
                snapshot.value(Bone::Arm, Channel::Location),
            )),
            GestureDecl::RotationEvent(a) => GestureKind::RotationEvent(Impulse::new(
                a.bone,
                Channel::Rotation,
                a.rotation,
                a.relative,
                snapshot.value(a.bone, Channel::Rotation),
            )),
        };
        Ok(Gesture::new(window, kind))
    }
}

fn check_frame_rate(id: &str, frame_rate: Option<u32>, cfg: &SequenceConfig) -> Result<()> {
    if frame_rate.unwrap_or(cfg.frame_rate) == 0 {
        return Err(GestureError::parameter(id, "frame_rate", "must be greater than 0"));
    }
    Ok(())
}

fn check_frequency(id: &str, frequency: f32) -> Result<()> {
    if !(frequency > 0.0) {
        return Err(GestureError::parameter(
            id,
            "wave_frequency",
            format!("must be greater than 0, got {frequency}"),
        ));
    }
    Ok(())
}

fn check_amplitude(id: &str, amplitude: f32) -> Result<()> {
    if amplitude < 0.0 {
        return Err(GestureError::parameter(
            id,
            "wave_amplitude",
            format!("must be greater than or equal to 0, got {amplitude}"),
        ));
    }
    Ok(())
}

/// Ordered, uniquely-named collection of gesture declarations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureSet {
    entries: IndexMap<String, GestureDecl>,
}

impl GestureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, decl: GestureDecl) -> Result<()> {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return Err(GestureError::DuplicateGesture(id));
        }
        self.entries.insert(id, decl);
        Ok(())
    }

    /// Builder-style [`GestureSet::insert`].
    pub fn with(mut self, id: impl Into<String>, decl: GestureDecl) -> Result<Self> {
        self.insert(id, decl)?;
        Ok(self)
    }

    /// Append all of `other`; fails without modifying `self` if any id is already present.
    pub fn merge(&mut self, other: GestureSet) -> Result<()> {
        if let Some(dup) = other.entries.keys().find(|k| self.entries.contains_key(*k)) {
            return Err(GestureError::DuplicateGesture(dup.clone()));
        }
        self.entries.extend(other.entries);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&GestureDecl> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GestureDecl)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn from_raw(raw: RawEntries) -> Result<Self> {
        let mut set = GestureSet::new();
        for (id, value) in raw.0 {
            let decl: GestureDecl = serde_json::from_value(value).map_err(|source| {
                GestureError::Declaration {
                    id: id.clone(),
                    source,
                }
            })?;
            set.insert(id, decl)?;
        }
        Ok(set)
    }
}

impl IntoIterator for GestureSet {
    type Item = (String, GestureDecl);
    type IntoIter = indexmap::map::IntoIter<String, GestureDecl>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for GestureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GestureSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawEntries::deserialize(deserializer)?;
        GestureSet::from_raw(raw).map_err(de::Error::custom)
    }
}

/// Map entries in source order, duplicates kept so they can be reported.
struct RawEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of gesture id to declaration")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<RawEntries, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((k, v)) = map.next_entry::<String, serde_json::Value>()? {
                    out.push((k, v));
                }
                Ok(RawEntries(out))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Deserialize)]
struct RawDocument {
    gestures: RawEntries,
}

/// Top-level gesture document (`{"gestures": {...}}`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureDocument {
    pub gestures: GestureSet,
}

impl GestureDocument {
    /// Parse a document, reporting malformed entries and duplicate ids with
    /// the offending gesture id.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(s)?;
        Ok(Self {
            gestures: GestureSet::from_raw(raw.gestures)?,
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
