use crate::fingers::PinchDistances;
use std::time::Duration;

/// What happened to a pinch on the latest update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinchEdge {
    Open,
    Started,
    Held,
    /// The fingertips separated. `held` is the full pinch duration and
    /// `latched` whether the pinch had already been used up.
    Released { held: Duration, latched: bool },
}

/// One fingertip pair. Distance-driven: closed below the threshold, open
/// again as soon as the distance exceeds it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pinch {
    pub distance: f32,
    pub active: bool,
    pub since: Option<Duration>,
    /// Set once the pinch has produced (or forfeited) its action; cleared on
    /// release. Keeps edge-triggered gestures from repeating.
    pub latched: bool,
}

impl Pinch {
    pub fn update(&mut self, distance: f32, threshold: f32, now: Duration) -> PinchEdge {
        self.distance = distance;
        let closed = distance < threshold;

        match (self.active, closed) {
            (false, true) => {
                self.active = true;
                self.since = Some(now);
                self.latched = false;
                PinchEdge::Started
            }
            (true, true) => PinchEdge::Held,
            (true, false) => {
                let held = self.held_for(now).unwrap_or_default();
                let latched = self.latched;
                self.active = false;
                self.since = None;
                self.latched = false;
                PinchEdge::Released { held, latched }
            }
            (false, false) => PinchEdge::Open,
        }
    }

    pub fn held_for(&self, now: Duration) -> Option<Duration> {
        self.since.map(|t| now.saturating_sub(t))
    }

    /// Active and not yet used up.
    pub fn is_armed(&self) -> bool {
        self.active && !self.latched
    }

    pub fn latch(&mut self) {
        if self.active {
            self.latched = true;
        }
    }

    pub fn clear(&mut self) {
        *self = Pinch::default();
    }
}

/// Both tracked pinch pairs. Only thumb-index timing matters (click vs.
/// drag), index-middle is purely edge-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PinchState {
    pub thumb_index: Pinch,
    pub index_middle: Pinch,
}

impl PinchState {
    pub fn update(
        &mut self,
        distances: &PinchDistances,
        threshold: f32,
        now: Duration,
    ) -> (PinchEdge, PinchEdge) {
        (
            self.thumb_index
                .update(distances.thumb_index, threshold, now),
            self.index_middle
                .update(distances.index_middle, threshold, now),
        )
    }

    pub fn clear(&mut self) {
        self.thumb_index.clear();
        self.index_middle.clear();
    }
}
