//! Finger state extraction.
//!
//! Turns one [`LandmarkSnapshot`] into a raised/lowered flag per finger plus
//! the two fingertip distances the pinch gestures are built on.

use crate::landmarks::{index, LandmarkSnapshot};
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// (tip, reference joint) landmark ids. Fingers compare against their
    /// PIP joint, the thumb against its IP joint.
    pub fn landmarks(self) -> (usize, usize) {
        match self {
            Finger::Thumb => (index::THUMB_TIP, index::THUMB_IP),
            Finger::Index => (index::INDEX_TIP, index::INDEX_PIP),
            Finger::Middle => (index::MIDDLE_TIP, index::MIDDLE_PIP),
            Finger::Ring => (index::RING_TIP, index::RING_PIP),
            Finger::Pinky => (index::PINKY_TIP, index::PINKY_PIP),
        }
    }
}

/// Raised (`true`) / lowered (`false`) per finger for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    pub const fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        Self {
            thumb,
            index,
            middle,
            ring,
            pinky,
        }
    }

    /// Builds from a `[thumb, index, middle, ring, pinky]` bit list.
    pub const fn from_bits(bits: [u8; 5]) -> Self {
        Self::new(bits[0] != 0, bits[1] != 0, bits[2] != 0, bits[3] != 0, bits[4] != 0)
    }

    pub fn is_raised(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }

    pub fn raised_count(&self) -> usize {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|&&up| up)
            .count()
    }

    /// Index up, middle down: the pose thumb-index gestures are made from.
    pub fn is_pointer_pose(&self) -> bool {
        self.index && !self.middle
    }

    /// Ring and pinky up, everything else down.
    pub fn is_scroll_pose(&self) -> bool {
        self.ring && self.pinky && !self.thumb && !self.index && !self.middle
    }
}

/// Fingertip distances in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PinchDistances {
    pub thumb_index: f32,
    pub index_middle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandReading {
    pub fingers: FingerStates,
    pub distances: PinchDistances,
}

pub fn finger_states(hand: &LandmarkSnapshot, margin: f32) -> FingerStates {
    FingerStates {
        thumb: thumb_raised(hand, margin),
        index: finger_raised(hand, Finger::Index, margin),
        middle: finger_raised(hand, Finger::Middle, margin),
        ring: finger_raised(hand, Finger::Ring, margin),
        pinky: finger_raised(hand, Finger::Pinky, margin),
    }
}

pub fn pinch_distances(hand: &LandmarkSnapshot) -> PinchDistances {
    let thumb = hand.point(index::THUMB_TIP);
    let idx = hand.point(index::INDEX_TIP);
    let mid = hand.point(index::MIDDLE_TIP);
    PinchDistances {
        thumb_index: thumb.distance_2d(&idx),
        index_middle: idx.distance_2d(&mid),
    }
}

pub fn read_hand(hand: &LandmarkSnapshot, margin: f32) -> HandReading {
    HandReading {
        fingers: finger_states(hand, margin),
        distances: pinch_distances(hand),
    }
}

// Image Y grows downward, so a raised tip has the smaller Y.
fn finger_raised(hand: &LandmarkSnapshot, finger: Finger, margin: f32) -> bool {
    let (tip, joint) = finger.landmarks();
    hand.point(joint).y - hand.point(tip).y > margin
}

// The thumb folds sideways: compare how far tip and IP joint reach away from
// the wrist along X, in the outward direction of this hand side.
fn thumb_raised(hand: &LandmarkSnapshot, margin: f32) -> bool {
    let (tip, joint) = Finger::Thumb.landmarks();
    let outward = hand.side.thumb_outward();
    let wrist_x = hand.wrist().x;
    let reach = |id: usize| outward * (hand.point(id).x - wrist_x);
    reach(tip) - reach(joint) > margin
}
