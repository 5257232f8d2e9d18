use std::time::Duration;
use tracing::debug;

/// Frame rate from frame timestamps. Logs the running average every
/// `log_every` frames at debug level.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    first: Option<Duration>,
    last: Option<Duration>,
    frames: u64,
    current: f32,
    log_every: u64,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(150)
    }
}

impl FpsCounter {
    pub fn new(log_every: u64) -> Self {
        Self {
            first: None,
            last: None,
            frames: 0,
            current: 0.0,
            log_every,
        }
    }

    /// Records a frame and returns the instantaneous rate (0 until two
    /// frames with distinct timestamps have been seen).
    pub fn tick(&mut self, timestamp: Duration) -> f32 {
        self.frames += 1;
        self.first.get_or_insert(timestamp);

        if let Some(prev) = self.last {
            let dt = timestamp.saturating_sub(prev).as_secs_f32();
            if dt > 0.0 {
                self.current = 1.0 / dt;
            }
        }
        self.last = Some(timestamp);

        if self.log_every > 0 && self.frames % self.log_every == 0 {
            debug!(
                "fps {:.1} (avg {:.1} over {} frames)",
                self.current,
                self.average(),
                self.frames
            );
        }
        self.current
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Frames per second over everything seen so far.
    pub fn average(&self) -> f32 {
        match (self.first, self.last) {
            (Some(_), Some(_)) if self.frames > 1 => {
                let span = self.span().as_secs_f32();
                if span > 0.0 {
                    (self.frames - 1) as f32 / span
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    /// Time between the first and the latest frame.
    pub fn span(&self) -> Duration {
        match (self.first, self.last) {
            (Some(first), Some(last)) => last.saturating_sub(first),
            _ => Duration::ZERO,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
