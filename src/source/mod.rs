//! Where landmark frames come from.
//!
//! The pipeline never talks to a camera directly: a detector (MediaPipe or
//! anything else producing 21-point hands) runs out of process and streams
//! JSON lines, or frames are replayed from a recording, or a scripted demo
//! generates them.

pub mod detector;
pub mod jsonl;
pub mod synthetic;

pub use self::detector::DetectorProcess;
pub use self::jsonl::JsonLinesSource;
pub use self::synthetic::{HandPose, SyntheticSource};

use crate::error::{VirtualMouseError, VmResult};
use crate::landmarks::Detection;
use std::collections::VecDeque;
use std::fmt::Display;
use tracing::{info, warn};

pub trait LandmarkSource {
    /// Next frame in capture order. `Ok(None)` ends the stream.
    fn next_frame(&mut self) -> VmResult<Option<Detection>>;

    fn describe(&self) -> String {
        "landmark source".to_string()
    }
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn next_frame(&mut self) -> VmResult<Option<Detection>> {
        (**self).next_frame()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Tries each candidate in order and keeps the first that opens. Used for
/// the camera priority list.
pub fn first_success<C, T, F>(candidates: &[C], mut attempt: F) -> VmResult<T>
where
    C: Display,
    F: FnMut(&C) -> VmResult<T>,
{
    let mut failures = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        match attempt(candidate) {
            Ok(opened) => {
                info!("✅ Opened camera {}", candidate);
                return Ok(opened);
            }
            Err(e) => {
                warn!("⚠️  Camera {} unavailable: {}", candidate, e);
                failures.push(format!("{}: {}", candidate, e));
            }
        }
    }

    if failures.is_empty() {
        return Err(VirtualMouseError::Acquisition(
            "no camera candidates configured".to_string(),
        ));
    }
    Err(VirtualMouseError::Acquisition(format!(
        "no camera could be opened ({})",
        failures.join("; ")
    )))
}

/// Plays back detections held in memory.
#[derive(Debug, Default, Clone)]
pub struct ReplaySource {
    frames: VecDeque<Detection>,
}

impl ReplaySource {
    pub fn new(frames: impl IntoIterator<Item = Detection>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FromIterator<Detection> for ReplaySource {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> VmResult<Option<Detection>> {
        Ok(self.frames.pop_front())
    }

    fn describe(&self) -> String {
        format!("replay ({} frames)", self.frames.len())
    }
}
