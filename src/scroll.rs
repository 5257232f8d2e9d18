//! Progressive scroll speed.
//!
//! The frame height is split into three bands: a neutral band around the
//! vertical midpoint that never scrolls, and an acceleration band above and
//! below it where speed grows quadratically with the distance from the
//! neutral edge, from `base` at the edge to `max` at the frame border.
//! Raw speeds are averaged over a short rolling window and dispatch is
//! rate-limited by a minimum delay between scroll events.

use crate::config::ScrollParams;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollZones {
    pub neutral_top: f32,
    pub neutral_bottom: f32,
    pub frame_height: f32,
}

impl ScrollZones {
    pub fn new(frame_height: f32, neutral_ratio: f32) -> Self {
        let neutral = frame_height * neutral_ratio;
        Self {
            neutral_top: (frame_height - neutral) / 2.0,
            neutral_bottom: (frame_height + neutral) / 2.0,
            frame_height,
        }
    }

    pub fn contains_neutral(&self, y: f32) -> bool {
        (self.neutral_top..=self.neutral_bottom).contains(&y)
    }
}

#[derive(Debug, Clone)]
pub struct ScrollEngine {
    zones: ScrollZones,
    base: f32,
    max: f32,
    min_speed: f32,
    delay: Duration,
    capacity: usize,
    window: VecDeque<f32>,
    last_dispatch: Option<Duration>,
}

impl ScrollEngine {
    pub fn new(params: &ScrollParams, frame_height: f32) -> Self {
        let capacity = params.scroll_history_length.max(1);
        Self {
            zones: ScrollZones::new(frame_height, params.neutral_zone_ratio),
            base: params.base_scroll_sensitivity,
            max: params.max_scroll_sensitivity,
            min_speed: params.min_scroll_speed,
            delay: params.scroll_delay(),
            capacity,
            window: VecDeque::with_capacity(capacity),
            last_dispatch: None,
        }
    }

    pub fn zones(&self) -> ScrollZones {
        self.zones
    }

    /// Signed speed for a hand at `y`: negative above the neutral band
    /// (scroll up), positive below it (scroll down), zero inside it.
    pub fn raw_speed(&self, y: f32) -> f32 {
        let z = &self.zones;
        if z.contains_neutral(y) {
            return 0.0;
        }

        let (sign, dist, extent) = if y < z.neutral_top {
            (-1.0, z.neutral_top - y, z.neutral_top)
        } else {
            (1.0, y - z.neutral_bottom, z.frame_height - z.neutral_bottom)
        };

        let normalized = if extent > 0.0 {
            (dist / extent).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let factor = normalized * normalized;
        sign * (self.base + (self.max - self.base) * factor)
    }

    /// Pushes the raw speed for `y` into the rolling window and returns the
    /// window mean.
    pub fn sample(&mut self, y: f32) -> f32 {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(self.raw_speed(y));
        self.smoothed()
    }

    pub fn smoothed(&self) -> f32 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().sum::<f32>() / self.window.len() as f32
    }

    /// Samples every frame; returns a delta only when the scroll delay has
    /// elapsed since the previous dispatch and the speed is significant.
    pub fn update(&mut self, y: f32, now: Duration) -> Option<f32> {
        let speed = self.sample(y);

        let due = match self.last_dispatch {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.delay,
        };
        if !due || speed.abs() <= self.min_speed {
            return None;
        }

        self.last_dispatch = Some(now);
        Some(speed)
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Drops history and the dispatch clock. Called on leaving scroll mode.
    pub fn reset(&mut self) {
        self.window.clear();
        self.last_dispatch = None;
    }
}
