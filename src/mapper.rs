use crate::config::CursorParams;
use crate::landmarks::Point;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Maps frame pixels onto the screen and smooths the result with a
/// first-order exponential filter.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    frame: (f32, f32),
    screen: (f32, f32),
    margin: f32,
    smoothing: f32,
    position: Option<ScreenPoint>,
}

impl CoordinateMapper {
    pub fn new(params: &CursorParams, frame: (f32, f32), screen: (u32, u32)) -> Self {
        Self {
            frame,
            screen: (screen.0 as f32, screen.1 as f32),
            margin: params.frame_margin,
            smoothing: params.smoothing,
            position: None,
        }
    }

    pub fn screen_size(&self) -> (f32, f32) {
        self.screen
    }

    /// Last smoothed position, `None` until the first update after a reset.
    pub fn position(&self) -> Option<ScreenPoint> {
        self.position
    }

    /// Raw (unsmoothed) screen position for a frame point. The frame is
    /// mirrored horizontally so the cursor follows the hand, and the margin
    /// band around the frame edge saturates at the screen edge.
    pub fn map_raw(&self, p: Point) -> ScreenPoint {
        let (fw, fh) = self.frame;
        let (sw, sh) = self.screen;
        let mirrored_x = fw - p.x;
        ScreenPoint {
            x: interp(mirrored_x, self.margin, fw - self.margin, sw),
            y: interp(p.y, self.margin, fh - self.margin, sh),
        }
    }

    /// Moves the smoothed position `1/smoothing` of the way toward the mapped
    /// target. The first update after a reset lands on the target directly.
    pub fn update(&mut self, p: Point) -> ScreenPoint {
        let target = self.map_raw(p);
        let next = match self.position {
            None => target,
            Some(prev) => ScreenPoint {
                x: prev.x + (target.x - prev.x) / self.smoothing,
                y: prev.y + (target.y - prev.y) / self.smoothing,
            },
        };
        let next = ScreenPoint {
            x: next.x.clamp(0.0, self.screen.0),
            y: next.y.clamp(0.0, self.screen.1),
        };
        self.position = Some(next);
        next
    }

    pub fn reset(&mut self) {
        self.position = None;
    }
}

// Linear map of [lo, hi] onto [0, out], clamped at both ends.
fn interp(v: f32, lo: f32, hi: f32, out: f32) -> f32 {
    if hi <= lo {
        return 0.0;
    }
    ((v - lo) / (hi - lo)).clamp(0.0, 1.0) * out
}
