//! Scripted hands for the `--demo` mode, benches and tests.
//!
//! [`HandPose`] lays out a plausible 21-point hand around a wrist position:
//! each finger is either extended or curled, and the two pinches move one
//! fingertip onto the index tip. Offsets are for a right hand and mirrored
//! for a left one.

use crate::error::VmResult;
use crate::fingers::FingerStates;
use crate::landmarks::{index, Detection, HandSide, LandmarkSnapshot, Point, LANDMARK_COUNT};
use crate::source::LandmarkSource;
use std::time::Duration;

type Offset = (f32, f32);

// (mcp, pip, dip, tip) relative to the wrist; y is negative (up).
const INDEX_UP: [Offset; 4] = [(30., -90.), (40., -115.), (50., -140.), (60., -160.)];
const INDEX_DOWN: [Offset; 4] = [(30., -90.), (32., -110.), (30., -95.), (30., -80.)];
const MIDDLE_UP: [Offset; 4] = [(10., -95.), (10., -125.), (10., -150.), (10., -175.)];
const MIDDLE_DOWN: [Offset; 4] = [(10., -95.), (10., -115.), (8., -100.), (8., -85.)];
const RING_UP: [Offset; 4] = [(-10., -90.), (-18., -118.), (-26., -142.), (-35., -165.)];
const RING_DOWN: [Offset; 4] = [(-10., -90.), (-10., -110.), (-10., -95.), (-10., -82.)];
const PINKY_UP: [Offset; 4] = [(-28., -80.), (-40., -100.), (-55., -120.), (-70., -140.)];
const PINKY_DOWN: [Offset; 4] = [(-28., -80.), (-28., -98.), (-28., -86.), (-28., -74.)];

// (cmc, mcp, ip, tip)
const THUMB_UP: [Offset; 4] = [(20., -20.), (40., -40.), (55., -55.), (85., -65.)];
const THUMB_DOWN: [Offset; 4] = [(20., -20.), (40., -40.), (55., -55.), (35., -60.)];

// Where a pinching fingertip lands relative to the index tip.
const THUMB_PINCH_OFFSET: Offset = (8., 6.);
const MIDDLE_PINCH_OFFSET: Offset = (-12., -4.);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    pub wrist: Point,
    pub side: HandSide,
    pub fingers: FingerStates,
    pub thumb_index_pinch: bool,
    pub index_middle_pinch: bool,
}

impl HandPose {
    pub fn new(fingers: FingerStates) -> Self {
        Self {
            wrist: Point::new(320.0, 400.0),
            side: HandSide::Right,
            fingers,
            thumb_index_pinch: false,
            index_middle_pinch: false,
        }
    }

    /// Index up, everything else down.
    pub fn pointer() -> Self {
        Self::new(FingerStates::new(false, true, false, false, false))
    }

    /// Ring and pinky up, everything else down.
    pub fn scroll() -> Self {
        Self::new(FingerStates::new(false, false, false, true, true))
    }

    pub fn fist() -> Self {
        Self::new(FingerStates::default())
    }

    pub fn open_palm() -> Self {
        Self::new(FingerStates::new(true, true, true, true, true))
    }

    pub fn side(mut self, side: HandSide) -> Self {
        self.side = side;
        self
    }

    /// Places the wrist.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.wrist = Point::new(x, y);
        self
    }

    /// Places the hand so the index tip lands on (`x`, `y`).
    pub fn index_tip_at(self, x: f32, y: f32) -> Self {
        let (dx, dy) = self.mirror(self.index_chain()[3]);
        self.at(x - dx, y - dy)
    }

    pub fn pinch_thumb_index(mut self, on: bool) -> Self {
        self.thumb_index_pinch = on;
        self
    }

    pub fn pinch_index_middle(mut self, on: bool) -> Self {
        self.index_middle_pinch = on;
        self
    }

    pub fn landmarks(&self) -> [Point; LANDMARK_COUNT] {
        let f = &self.fingers;
        let mut points = [self.wrist; LANDMARK_COUNT];

        let chains: [(usize, [Offset; 4]); 5] = [
            (index::THUMB_CMC, if f.thumb { THUMB_UP } else { THUMB_DOWN }),
            (index::INDEX_MCP, self.index_chain()),
            (index::MIDDLE_MCP, if f.middle { MIDDLE_UP } else { MIDDLE_DOWN }),
            (index::RING_MCP, if f.ring { RING_UP } else { RING_DOWN }),
            (index::PINKY_MCP, if f.pinky { PINKY_UP } else { PINKY_DOWN }),
        ];
        for (first, chain) in chains {
            for (k, offset) in chain.into_iter().enumerate() {
                points[first + k] = self.place(offset);
            }
        }

        let tip = self.index_chain()[3];
        if self.thumb_index_pinch {
            points[index::THUMB_TIP] = self.place(add(tip, THUMB_PINCH_OFFSET));
        }
        if self.index_middle_pinch {
            points[index::MIDDLE_TIP] = self.place(add(tip, MIDDLE_PINCH_OFFSET));
        }
        points
    }

    pub fn snapshot(&self, timestamp: Duration) -> LandmarkSnapshot {
        LandmarkSnapshot::new(timestamp, self.side, self.landmarks())
    }

    fn index_chain(&self) -> [Offset; 4] {
        if self.fingers.index {
            INDEX_UP
        } else {
            INDEX_DOWN
        }
    }

    fn mirror(&self, (dx, dy): Offset) -> Offset {
        (dx * self.side.thumb_outward(), dy)
    }

    fn place(&self, offset: Offset) -> Point {
        let (dx, dy) = self.mirror(offset);
        Point::new(self.wrist.x + dx, self.wrist.y + dy)
    }
}

fn add(a: Offset, b: Offset) -> Offset {
    (a.0 + b.0, a.1 + b.1)
}

/// One stretch of the demo script.
#[derive(Debug, Clone)]
pub struct Segment {
    pub label: &'static str,
    pub frames: u32,
    /// `None` = no hand in view.
    pub pose: Option<HandPose>,
    /// Wrist travel over the whole segment, in frame pixels.
    pub travel: (f32, f32),
}

impl Segment {
    pub fn hold(label: &'static str, frames: u32, pose: HandPose) -> Self {
        Self {
            label,
            frames,
            pose: Some(pose),
            travel: (0.0, 0.0),
        }
    }

    pub fn sweep(label: &'static str, frames: u32, pose: HandPose, travel: (f32, f32)) -> Self {
        Self {
            label,
            frames,
            pose: Some(pose),
            travel,
        }
    }

    pub fn absent(label: &'static str, frames: u32) -> Self {
        Self {
            label,
            frames,
            pose: None,
            travel: (0.0, 0.0),
        }
    }

    fn pose_at(&self, k: u32) -> Option<HandPose> {
        let pose = self.pose?;
        let p = if self.frames > 1 {
            k as f32 / (self.frames - 1) as f32
        } else {
            0.0
        };
        Some(pose.at(
            pose.wrist.x + self.travel.0 * p,
            pose.wrist.y + self.travel.1 * p,
        ))
    }
}

/// Walks through every gesture once: point, left click, right click, drag,
/// scroll up and down, and a short loss of the hand.
pub fn demo_script() -> Vec<Segment> {
    let pointer = HandPose::pointer().index_tip_at(320.0, 240.0);
    let v_sign = HandPose::new(FingerStates::new(false, true, true, false, false))
        .index_tip_at(220.0, 200.0);
    let scroll = HandPose::scroll();

    vec![
        Segment::sweep("point", 45, pointer, (-120.0, -40.0)),
        Segment::hold("spread", 6, v_sign),
        Segment::hold("left click", 6, v_sign.pinch_index_middle(true)),
        Segment::hold("spread", 6, v_sign),
        Segment::hold("point", 6, pointer),
        Segment::hold("right click", 5, pointer.pinch_thumb_index(true)),
        Segment::hold("point", 6, pointer),
        Segment::sweep("drag", 30, pointer.pinch_thumb_index(true), (120.0, 40.0)),
        Segment::hold("drop", 6, pointer.at(pointer.wrist.x + 120.0, pointer.wrist.y + 40.0)),
        Segment::hold("scroll up", 20, scroll.at(320.0, 60.0)),
        Segment::hold("scroll down", 20, scroll.at(320.0, 430.0)),
        Segment::absent("hand lost", 10),
        Segment::hold("rest", 6, HandPose::fist()),
    ]
}

/// Replays a script of [`Segment`]s at a fixed frame rate with seeded
/// landmark jitter.
pub struct SyntheticSource {
    script: Vec<Segment>,
    segment: usize,
    step: u32,
    frame: u64,
    fps: f64,
    jitter: f32,
    rng: fastrand::Rng,
}

impl SyntheticSource {
    pub fn new(script: Vec<Segment>, fps: f64, seed: u64) -> Self {
        Self {
            script,
            segment: 0,
            step: 0,
            frame: 0,
            fps: fps.max(1.0),
            jitter: 1.5,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn demo(seed: u64) -> Self {
        Self::new(demo_script(), 30.0, seed)
    }

    /// Uniform noise of +/- `px` on every coordinate. Zero disables it.
    pub fn with_jitter(mut self, px: f32) -> Self {
        self.jitter = px.max(0.0);
        self
    }

    pub fn total_frames(&self) -> u64 {
        self.script.iter().map(|s| s.frames as u64).sum()
    }

    /// Label of the segment the next frame comes from.
    pub fn current_label(&self) -> Option<&'static str> {
        self.script.get(self.segment).map(|s| s.label)
    }

    fn timestamp(&self) -> Duration {
        Duration::from_micros((self.frame as f64 * 1_000_000.0 / self.fps) as u64)
    }

    fn jittered(&mut self, pose: &HandPose, timestamp: Duration) -> LandmarkSnapshot {
        let mut points = pose.landmarks();
        if self.jitter > 0.0 {
            for p in points.iter_mut() {
                p.x += (self.rng.f32() * 2.0 - 1.0) * self.jitter;
                p.y += (self.rng.f32() * 2.0 - 1.0) * self.jitter;
            }
        }
        LandmarkSnapshot::new(timestamp, pose.side, points)
    }
}

impl LandmarkSource for SyntheticSource {
    fn next_frame(&mut self) -> VmResult<Option<Detection>> {
        while let Some(seg) = self.script.get(self.segment) {
            if self.step < seg.frames {
                break;
            }
            self.segment += 1;
            self.step = 0;
        }
        let Some(seg) = self.script.get(self.segment) else {
            return Ok(None);
        };

        let pose = seg.pose_at(self.step);
        let timestamp = self.timestamp();
        self.step += 1;
        self.frame += 1;

        Ok(Some(match pose {
            Some(pose) => Detection::single(self.jittered(&pose, timestamp)),
            None => Detection::empty(timestamp),
        }))
    }

    fn describe(&self) -> String {
        format!("synthetic demo ({} frames)", self.total_frames())
    }
}
