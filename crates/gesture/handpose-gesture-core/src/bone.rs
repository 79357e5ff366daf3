//! The three animated joints of the arm rig, ordered from shoulder to wrist.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bone {
    Arm,
    Forearm,
    Hand,
}

impl Bone {
    /// Upstream-first order; wave phase cascades follow it.
    pub const ALL: [Bone; 3] = [Bone::Arm, Bone::Forearm, Bone::Hand];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Bone::Arm => 0,
            Bone::Forearm => 1,
            Bone::Hand => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Bone::Arm => "Arm",
            Bone::Forearm => "Forearm",
            Bone::Hand => "Hand",
        }
    }
}

impl fmt::Display for Bone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
