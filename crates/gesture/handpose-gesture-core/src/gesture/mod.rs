//! Gestures: time-windowed motion contributors.
//!
//! A [`Gesture`] pairs a [`FrameWindow`] with one [`GestureKind`]. The
//! sequence asks every active gesture to add its delta for the current frame
//! into a shared [`DisplacementFrame`]; a gesture never touches joint state.

mod impulse;
mod oscillation;
mod ramp;

use serde::{Deserialize, Serialize};

use crate::displacement::DisplacementFrame;

pub use impulse::Impulse;
pub use oscillation::{Oscillator, Sine, Wave, WaveCascade};
pub use ramp::Ramp;

/// Half-open frame interval `[start_frame, end_frame)` with `start_frame < end_frame`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameWindow {
    start_frame: u32,
    end_frame: u32,
}

impl FrameWindow {
    /// Returns `None` when the window would be empty.
    pub fn new(start_frame: u32, end_frame: u32) -> Option<Self> {
        (start_frame < end_frame).then_some(Self {
            start_frame,
            end_frame,
        })
    }

    /// One-frame window used by events.
    pub fn single(start_frame: u32) -> Self {
        Self {
            start_frame,
            end_frame: start_frame.saturating_add(1),
        }
    }

    #[inline]
    pub fn start_frame(&self) -> u32 {
        self.start_frame
    }

    #[inline]
    pub fn end_frame(&self) -> u32 {
        self.end_frame
    }

    /// Always at least 1.
    #[inline]
    pub fn duration(&self) -> u32 {
        self.end_frame - self.start_frame
    }

    #[inline]
    pub fn contains(&self, frame: u32) -> bool {
        frame >= self.start_frame && frame < self.end_frame
    }
}

/// Variant payloads. Translation variants always drive the arm's location.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureKind {
    Translation(Ramp),
    Rotation(Ramp),
    TranslationSine(Sine),
    RotationSine(Sine),
    RotationWave(Wave),
    TranslationEvent(Impulse),
    RotationEvent(Impulse),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gesture {
    pub window: FrameWindow,
    pub kind: GestureKind,
}

impl Gesture {
    pub fn new(window: FrameWindow, kind: GestureKind) -> Self {
        Self { window, kind }
    }

    #[inline]
    pub fn is_active(&self, frame: u32) -> bool {
        self.window.contains(frame)
    }

    /// Add this gesture's delta for `frame` into `out`.
    pub fn contribute(&self, frame: u32, out: &mut DisplacementFrame) {
        match &self.kind {
            GestureKind::Translation(r) | GestureKind::Rotation(r) => r.contribute(out),
            GestureKind::TranslationSine(s) | GestureKind::RotationSine(s) => {
                s.contribute(frame, out)
            }
            GestureKind::RotationWave(w) => w.contribute(frame, out),
            GestureKind::TranslationEvent(i) | GestureKind::RotationEvent(i) => i.contribute(out),
        }
    }

    /// By-value form of [`Gesture::contribute`].
    pub fn apply(&self, mut displacement: DisplacementFrame, frame: u32) -> DisplacementFrame {
        self.contribute(frame, &mut displacement);
        displacement
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            GestureKind::Translation(_) => "TranslationGesture",
            GestureKind::Rotation(_) => "RotationGesture",
            GestureKind::TranslationSine(_) => "TranslationSineGesture",
            GestureKind::RotationSine(_) => "RotationSineGesture",
            GestureKind::RotationWave(_) => "RotationWaveGesture",
            GestureKind::TranslationEvent(_) => "TranslationEvent",
            GestureKind::RotationEvent(_) => "RotationEvent",
        }
    }
}
