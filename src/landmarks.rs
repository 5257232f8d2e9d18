use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::{Display, EnumString};

/// Number of landmarks the hand model reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices (MediaPipe hand model convention).
#[allow(dead_code)]
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A landmark position in frame-pixel space. Image Y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance in pixels; depth is ignored.
    pub fn distance_2d(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum HandSide {
    #[serde(alias = "left", alias = "LEFT")]
    Left,
    #[default]
    #[serde(alias = "right", alias = "RIGHT")]
    Right,
}

impl HandSide {
    /// Sign of the image X direction in which the thumb extends away from
    /// the palm for this hand.
    pub fn thumb_outward(self) -> f32 {
        match self {
            HandSide::Right => 1.0,
            HandSide::Left => -1.0,
        }
    }
}

/// One hand as seen in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSnapshot {
    pub timestamp: Duration,
    pub side: HandSide,
    points: [Point; LANDMARK_COUNT],
}

impl LandmarkSnapshot {
    pub fn new(timestamp: Duration, side: HandSide, points: [Point; LANDMARK_COUNT]) -> Self {
        Self {
            timestamp,
            side,
            points,
        }
    }

    /// Returns `None` unless exactly 21 points are supplied.
    pub fn from_points(timestamp: Duration, side: HandSide, points: &[Point]) -> Option<Self> {
        let points: [Point; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self::new(timestamp, side, points))
    }

    #[inline(always)]
    pub fn point(&self, id: usize) -> Point {
        self.points[id]
    }

    pub fn points(&self) -> &[Point; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> Point {
        self.points[index::WRIST]
    }

    pub fn index_tip(&self) -> Point {
        self.points[index::INDEX_TIP]
    }
}

/// Everything the detector reported for one camera frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Detection {
    pub timestamp: Duration,
    pub hands: Vec<LandmarkSnapshot>,
}

impl Detection {
    pub fn empty(timestamp: Duration) -> Self {
        Self {
            timestamp,
            hands: Vec::new(),
        }
    }

    pub fn single(hand: LandmarkSnapshot) -> Self {
        Self {
            timestamp: hand.timestamp,
            hands: vec![hand],
        }
    }

    /// Only the first tracked hand drives the cursor.
    pub fn primary(&self) -> Option<&LandmarkSnapshot> {
        self.hands.first()
    }
}
