//! Handpose gesture core (host-agnostic)
//!
//! Declarative gesture timelines for a three-bone arm chain (arm, forearm,
//! hand). Gestures contribute per-frame displacements which are summed,
//! smoothed by momentum, clamped by acceleration, softly range-limited and
//! committed as keyframes through the [`Rig`] seam.

pub mod axis;
pub mod bone;
pub mod compose;
pub mod config;
pub mod declaration;
pub mod displacement;
pub mod error;
pub mod generators;
pub mod gesture;
pub mod recording;
pub mod rig;
pub mod sequence;
pub mod value;

// Re-exports for hosts
pub use axis::Axis;
pub use bone::Bone;
pub use config::{BoneRanges, GeneratorConfig, SequenceConfig, ValueRange};
pub use declaration::{
    GestureDecl, GestureDocument, GestureSet, RotationArgs, RotationEventArgs, RotationSineArgs,
    RotationWaveArgs, TranslationArgs, TranslationEventArgs, TranslationSineArgs,
};
pub use displacement::{BoneDisplacement, DisplacementFrame};
pub use error::{GestureError, Result};
pub use generators::{
    generate_gestures, AllOf, GenContext, Generated, ModuleGenerator, OneOf,
    PerlinRotationSineGenerator, PerlinRotationWaveGenerator, PerlinParams, SomeOf,
};
pub use gesture::{FrameWindow, Gesture, GestureKind};
pub use recording::{export_baked_json, BakedSequence, BakedTrack, Keyframe, RecordingRig};
pub use rig::{Joint, JointState, Rig, RigSnapshot, SceneClock};
pub use sequence::{FrameRecord, GestureSequence, SequenceReport, FIRST_FRAME};
pub use value::{Channel, Vec3};
