use crate::error::{VirtualMouseError, VmResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Screen size assumed when neither the CLI nor the dispatcher provides one.
pub const FALLBACK_SCREEN: (u32, u32) = (1920, 1080);

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub camera: CameraParams,
    #[command(flatten)]
    pub cursor: CursorParams,
    #[command(flatten)]
    pub gestures: GestureParams,
    #[command(flatten)]
    pub scroll: ScrollParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraParams {
    #[arg(long, default_value_t = 640)]
    pub frame_width: u32,
    #[arg(long, default_value_t = 480)]
    pub frame_height: u32,

    // Camera indices tried in order until one opens
    #[arg(long, default_value = "2,0,1,3,4")]
    pub camera_priorities: String,

    // Consecutive frames without a hand before gesture state is dropped
    #[arg(long, default_value_t = 2)]
    pub max_gap_frames: u32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            frame_width: 640,
            frame_height: 480,
            camera_priorities: "2,0,1,3,4".to_string(),
            max_gap_frames: 2,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CursorParams {
    #[arg(long, default_value_t = 100.0)]
    pub frame_margin: f32,
    #[arg(long, default_value_t = 7.0)]
    pub smoothing: f32,

    // Unset = ask the dispatcher, then fall back to 1920x1080
    #[arg(long)]
    pub screen_width: Option<u32>,
    #[arg(long)]
    pub screen_height: Option<u32>,
}

impl Default for CursorParams {
    fn default() -> Self {
        Self {
            frame_margin: 100.0,
            smoothing: 7.0,
            screen_width: None,
            screen_height: None,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureParams {
    #[arg(long, default_value_t = 40.0)]
    pub pinch_threshold: f32,
    #[arg(long, default_value_t = 0.3)]
    pub drag_hold_secs: f64,

    // A finger counts as raised only when its tip clears the joint by this much
    #[arg(long, default_value_t = 2.0)]
    pub finger_margin: f32,
}

impl Default for GestureParams {
    fn default() -> Self {
        Self {
            pinch_threshold: 40.0,
            drag_hold_secs: 0.3,
            finger_margin: 2.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollParams {
    #[arg(long, default_value_t = 0.2)]
    pub neutral_zone_ratio: f32,
    #[arg(long, default_value_t = 5.0)]
    pub base_scroll_sensitivity: f32,
    #[arg(long, default_value_t = 20.0)]
    pub max_scroll_sensitivity: f32,
    #[arg(long, default_value_t = 0.02)]
    pub scroll_delay_secs: f64,
    #[arg(long, default_value_t = 3)]
    pub scroll_history_length: usize,

    // Smoothed speeds at or below this are not dispatched
    #[arg(long, default_value_t = 0.5)]
    pub min_scroll_speed: f32,

    // Wheel lines per unit of scroll speed (OS dispatcher only)
    #[arg(long, default_value_t = 0.25)]
    pub wheel_scale: f32,
}

impl Default for ScrollParams {
    fn default() -> Self {
        Self {
            neutral_zone_ratio: 0.2,
            base_scroll_sensitivity: 5.0,
            max_scroll_sensitivity: 20.0,
            scroll_delay_secs: 0.02,
            scroll_history_length: 3,
            min_scroll_speed: 0.5,
            wheel_scale: 0.25,
        }
    }
}

impl CameraParams {
    pub fn get_camera_priorities(&self) -> VmResult<Vec<u32>> {
        let indices = self
            .camera_priorities
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u32>().map_err(|_| {
                    VirtualMouseError::Config(format!("Invalid camera index '{}'", s))
                })
            })
            .collect::<VmResult<Vec<u32>>>()?;

        if indices.is_empty() {
            return Err(VirtualMouseError::Config(
                "camera_priorities must list at least one index".to_string(),
            ));
        }
        Ok(indices)
    }

    pub fn frame_size(&self) -> (f32, f32) {
        (self.frame_width as f32, self.frame_height as f32)
    }
}

impl CursorParams {
    /// CLI/file values win, then the dispatcher's report, then the fallback.
    pub fn resolve_screen(&self, reported: Option<(u32, u32)>) -> (u32, u32) {
        let (rw, rh) = reported.unwrap_or(FALLBACK_SCREEN);
        (
            self.screen_width.unwrap_or(rw),
            self.screen_height.unwrap_or(rh),
        )
    }
}

impl GestureParams {
    pub fn drag_hold(&self) -> Duration {
        Duration::from_secs_f64(self.drag_hold_secs)
    }
}

impl ScrollParams {
    pub fn scroll_delay(&self) -> Duration {
        Duration::from_secs_f64(self.scroll_delay_secs)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> VmResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot run with. Called once at startup.
    pub fn validate(&self) -> VmResult<()> {
        let c = &self.camera;
        let cur = &self.cursor;
        let g = &self.gestures;
        let s = &self.scroll;

        if c.frame_width == 0 || c.frame_height == 0 {
            return invalid("frame size must be non-zero");
        }
        c.get_camera_priorities()?;

        if !cur.smoothing.is_finite() || cur.smoothing < 1.0 {
            return invalid(format!("smoothing must be >= 1.0 (got {})", cur.smoothing));
        }
        if !(cur.frame_margin >= 0.0) {
            return invalid(format!(
                "frame_margin must be >= 0 (got {})",
                cur.frame_margin
            ));
        }
        let (w, h) = c.frame_size();
        if cur.frame_margin * 2.0 >= w.min(h) {
            return invalid(format!(
                "frame_margin {} leaves no interaction area in a {}x{} frame",
                cur.frame_margin, c.frame_width, c.frame_height
            ));
        }
        if cur.screen_width == Some(0) || cur.screen_height == Some(0) {
            return invalid("screen size must be non-zero");
        }

        if !(g.pinch_threshold > 0.0) {
            return invalid(format!(
                "pinch_threshold must be > 0 (got {})",
                g.pinch_threshold
            ));
        }
        if Duration::try_from_secs_f64(g.drag_hold_secs).is_err() {
            return invalid(format!(
                "drag_hold_secs must be a non-negative duration (got {})",
                g.drag_hold_secs
            ));
        }
        if !(g.finger_margin >= 0.0) {
            return invalid(format!(
                "finger_margin must be >= 0 (got {})",
                g.finger_margin
            ));
        }

        if !(0.0..1.0).contains(&s.neutral_zone_ratio) {
            return invalid(format!(
                "neutral_zone_ratio must be in [0, 1) (got {})",
                s.neutral_zone_ratio
            ));
        }
        if !(s.base_scroll_sensitivity >= 0.0) {
            return invalid("base_scroll_sensitivity must be >= 0");
        }
        if !(s.max_scroll_sensitivity >= s.base_scroll_sensitivity) {
            return invalid(format!(
                "max_scroll_sensitivity ({}) must be >= base_scroll_sensitivity ({})",
                s.max_scroll_sensitivity, s.base_scroll_sensitivity
            ));
        }
        if Duration::try_from_secs_f64(s.scroll_delay_secs).is_err() {
            return invalid(format!(
                "scroll_delay_secs must be a non-negative duration (got {})",
                s.scroll_delay_secs
            ));
        }
        if s.scroll_history_length < 3 {
            return invalid(format!(
                "scroll_history_length must be >= 3 (got {})",
                s.scroll_history_length
            ));
        }
        if !(s.min_scroll_speed >= 0.0) || !(s.wheel_scale > 0.0) {
            return invalid("min_scroll_speed must be >= 0 and wheel_scale > 0");
        }

        Ok(())
    }

    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(camera.frame_width);
        update_if_present!(camera.frame_height);
        update_if_present!(camera.camera_priorities);
        update_if_present!(camera.max_gap_frames);

        update_if_present!(cursor.frame_margin);
        update_if_present!(cursor.smoothing);
        update_if_present!(cursor.screen_width);
        update_if_present!(cursor.screen_height);

        update_if_present!(gestures.pinch_threshold);
        update_if_present!(gestures.drag_hold_secs);
        update_if_present!(gestures.finger_margin);

        update_if_present!(scroll.neutral_zone_ratio);
        update_if_present!(scroll.base_scroll_sensitivity);
        update_if_present!(scroll.max_scroll_sensitivity);
        update_if_present!(scroll.scroll_delay_secs);
        update_if_present!(scroll.scroll_history_length);
        update_if_present!(scroll.min_scroll_speed);
        update_if_present!(scroll.wheel_scale);
    }
}

fn invalid<T>(msg: impl Into<String>) -> VmResult<T> {
    Err(VirtualMouseError::Config(msg.into()))
}
