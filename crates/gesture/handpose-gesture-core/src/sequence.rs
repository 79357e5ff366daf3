//! GestureSequence: the frame clock that drives a gesture timeline.
//!
//! Per frame:
//! 1. move the host clock, retire gestures whose window closed, promote the
//!    ones starting now (capturing joint values);
//! 2. sum every active gesture's contribution into a fresh displacement;
//! 3. filter it ([`crate::compose::compose_frame`]);
//! 4. add the result to the joints and commit keyframes for changed channels.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::bone::Bone;
use crate::compose::compose_frame;
use crate::config::SequenceConfig;
use crate::declaration::{GestureDecl, GestureSet};
use crate::displacement::DisplacementFrame;
use crate::error::{GestureError, Result};
use crate::gesture::Gesture;
use crate::rig::{Joint, Rig, RigSnapshot};
use crate::value::Channel;

/// First simulated frame.
pub const FIRST_FRAME: u32 = 1;

/// Displacement history of one simulated frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u32,
    /// Unfiltered sum of active contributions.
    pub raw: DisplacementFrame,
    /// What was added to the joints.
    pub displacement: DisplacementFrame,
    pub active_gestures: usize,
}

/// Summary returned by [`GestureSequence::apply`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceReport {
    /// Largest declared end frame; the host range is `[0, end_frame - 1]`.
    pub end_frame: u32,
    pub frames: Vec<FrameRecord>,
    pub keyframes_committed: usize,
}

impl SequenceReport {
    pub fn frame(&self, frame: u32) -> Option<&FrameRecord> {
        self.frames.iter().find(|r| r.frame == frame)
    }
}

#[derive(Debug)]
struct Declared {
    id: String,
    decl: GestureDecl,
}

#[derive(Debug)]
struct ActiveGesture {
    index: usize,
    gesture: Gesture,
}

#[derive(Debug)]
pub struct GestureSequence {
    cfg: SequenceConfig,
    declared: Vec<Declared>,
    /// Min-heap of (start_frame, declaration index).
    pending: BinaryHeap<Reverse<(u32, usize)>>,
    /// Kept in declaration order.
    active: Vec<ActiveGesture>,
    previous: DisplacementFrame,
    end_frame: u32,
}

impl GestureSequence {
    /// Validate the config and every declaration; nothing is skipped.
    pub fn new(gestures: GestureSet, cfg: SequenceConfig) -> Result<Self> {
        cfg.validate()?;
        let mut declared = Vec::with_capacity(gestures.len());
        let mut pending = BinaryHeap::with_capacity(gestures.len());
        let mut end_frame = 0;
        for (index, (id, decl)) in gestures.into_iter().enumerate() {
            decl.validate(&id, &cfg)?;
            if decl.start_frame() < FIRST_FRAME {
                return Err(GestureError::StartBeforeClock { id });
            }
            end_frame = end_frame.max(decl.end_frame());
            pending.push(Reverse((decl.start_frame(), index)));
            declared.push(Declared { id, decl });
        }
        Ok(Self {
            cfg,
            declared,
            pending,
            active: Vec::new(),
            previous: DisplacementFrame::zero(),
            end_frame,
        })
    }

    /// Largest end frame over all declarations (0 when empty).
    pub fn end_frame(&self) -> u32 {
        self.end_frame
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.cfg
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// Run the whole timeline against `rig`, frames `1..end_frame`, then set
    /// the host animation range to `[0, end_frame - 1]`.
    pub fn apply<R: Rig>(mut self, rig: &mut R) -> Result<SequenceReport> {
        info!(
            "applying {} gestures over frames {}..{}",
            self.declared.len(),
            FIRST_FRAME,
            self.end_frame
        );
        let mut report = SequenceReport {
            end_frame: self.end_frame,
            ..SequenceReport::default()
        };

        for frame in FIRST_FRAME..self.end_frame {
            rig.set_current_frame(frame);
            self.retire(frame);
            let snapshot = rig.snapshot();
            self.promote(frame, &snapshot)?;

            let raw = self.aggregate(frame);
            let displacement = compose_frame(&self.previous, &raw, &snapshot, &self.cfg);
            trace!("frame {frame}: raw={raw:?} out={displacement:?}");

            report.keyframes_committed += commit(rig, &displacement, frame);
            report.frames.push(FrameRecord {
                frame,
                raw,
                displacement,
                active_gestures: self.active.len(),
            });
            self.previous = displacement;
        }

        let last = self.end_frame.saturating_sub(1);
        rig.set_animation_range(0, last);
        info!(
            "sequence done: {} frames, {} keyframes",
            report.frames.len(),
            report.keyframes_committed
        );
        Ok(report)
    }

    fn retire(&mut self, frame: u32) {
        let declared = &self.declared;
        self.active.retain(|a| {
            let keep = a.gesture.is_active(frame);
            if !keep {
                debug!("frame {frame}: retire '{}'", declared[a.index].id);
            }
            keep
        });
    }

    fn promote(&mut self, frame: u32, snapshot: &RigSnapshot) -> Result<()> {
        while let Some(Reverse((start, index))) = self.pending.peek().copied() {
            if start != frame {
                break;
            }
            self.pending.pop();
            let Declared { id, decl } = &self.declared[index];
            let gesture = decl.instantiate(id, snapshot, &self.cfg)?;
            debug!("frame {frame}: promote '{id}' ({})", gesture.type_name());
            let pos = self.active.partition_point(|a| a.index < index);
            self.active.insert(pos, ActiveGesture { index, gesture });
        }
        Ok(())
    }

    fn aggregate(&self, frame: u32) -> DisplacementFrame {
        let mut raw = DisplacementFrame::zero();
        for a in &self.active {
            a.gesture.contribute(frame, &mut raw);
        }
        raw
    }
}

/// Add `displacement` to the joints; returns the number of keyframes committed.
fn commit<R: Rig>(rig: &mut R, displacement: &DisplacementFrame, frame: u32) -> usize {
    let mut committed = 0;
    for bone in Bone::ALL {
        for channel in Channel::ALL {
            let delta = displacement.get(bone, channel);
            if delta.is_zero() {
                continue;
            }
            let joint = rig.joint_mut(bone);
            let value = joint.get(channel) + delta;
            joint.set(channel, value);
            joint.commit_keyframe(channel, frame);
            committed += 1;
        }
    }
    committed
}
