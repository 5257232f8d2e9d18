//! JSON-lines landmark stream.
//!
//! One object per line:
//!
//! ```text
//! {"t": 1.25, "normalized": true,
//!  "hands": [{"side": "Right", "landmarks": [[0.51, 0.62, -0.01], ...]}]}
//! ```
//!
//! `t` (seconds) is optional; frames without it are stamped from a monotonic
//! clock. Landmarks may be `[x, y]`, `[x, y, z]` or `{"x":..,"y":..,"z":..}`.

use crate::error::VmResult;
use crate::landmarks::{Detection, HandSide, LandmarkSnapshot, Point};
use crate::source::LandmarkSource;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    t: Option<f64>,
    #[serde(default)]
    normalized: bool,
    #[serde(default)]
    hands: Vec<HandRecord>,
    // Detector-side failure for this frame; treated as a miss.
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HandRecord {
    #[serde(default)]
    side: HandSide,
    landmarks: Vec<LandmarkRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LandmarkRecord {
    Array(Vec<f32>),
    Object(Point),
}

impl LandmarkRecord {
    fn to_point(&self) -> Option<Point> {
        match self {
            LandmarkRecord::Array(v) if v.len() >= 2 => Some(Point {
                x: v[0],
                y: v[1],
                z: v.get(2).copied().unwrap_or(0.0),
            }),
            LandmarkRecord::Array(_) => None,
            LandmarkRecord::Object(p) => Some(*p),
        }
    }
}

pub struct JsonLinesSource<R> {
    reader: R,
    label: String,
    frame: (f32, f32),
    clock: Instant,
    last: Option<Duration>,
    line: String,
    line_no: usize,
}

impl<R: BufRead> JsonLinesSource<R> {
    /// `frame` is the pixel size normalized coordinates are scaled by.
    pub fn new(reader: R, frame: (f32, f32)) -> Self {
        Self {
            reader,
            label: "json-lines".to_string(),
            frame,
            clock: Instant::now(),
            last: None,
            line: String::new(),
            line_no: 0,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    fn to_detection(&mut self, record: FrameRecord) -> Detection {
        let timestamp = self.stamp(record.t);

        if let Some(err) = record.error {
            warn!("⚠️  Detector reported an error on line {}: {}", self.line_no, err);
            return Detection::empty(timestamp);
        }

        let (fw, fh) = self.frame;
        let mut hands = Vec::with_capacity(record.hands.len());
        for hand in record.hands {
            let mut points: Vec<Point> = hand
                .landmarks
                .iter()
                .filter_map(LandmarkRecord::to_point)
                .collect();
            if points.len() != hand.landmarks.len() {
                warn!("⚠️  Line {}: landmark with fewer than 2 coordinates", self.line_no);
                continue;
            }
            if record.normalized {
                for p in points.iter_mut() {
                    p.x *= fw;
                    p.y *= fh;
                }
            }
            match LandmarkSnapshot::from_points(timestamp, hand.side, &points) {
                Some(snapshot) => hands.push(snapshot),
                None => warn!(
                    "⚠️  Line {}: expected 21 landmarks, got {}",
                    self.line_no,
                    points.len()
                ),
            }
        }

        Detection { timestamp, hands }
    }

    // Frames must be seen in capture order; a timestamp that goes backwards
    // is pinned to the previous one.
    fn stamp(&mut self, t: Option<f64>) -> Duration {
        let raw = match t {
            Some(secs) => match Duration::try_from_secs_f64(secs) {
                Ok(d) => d,
                Err(_) => {
                    warn!("⚠️  Line {}: invalid timestamp {}", self.line_no, secs);
                    self.last.unwrap_or_default()
                }
            },
            None => self.clock.elapsed(),
        };

        let stamped = match self.last {
            Some(prev) if raw < prev => {
                warn!(
                    "⚠️  Line {}: timestamp went backwards ({:?} < {:?}), clamping",
                    self.line_no, raw, prev
                );
                prev
            }
            _ => raw,
        };
        self.last = Some(stamped);
        stamped
    }
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, frame: (f32, f32)) -> VmResult<Self> {
        let label = path.as_ref().display().to_string();
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), frame).with_label(label))
    }
}

impl<R: BufRead> LandmarkSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> VmResult<Option<Detection>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                debug!("{}: end of stream after {} lines", self.label, self.line_no);
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<FrameRecord>(trimmed) {
                Ok(record) => return Ok(Some(self.to_detection(record))),
                Err(e) => warn!("⚠️  Skipping malformed line {}: {}", self.line_no, e),
            }
        }
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
