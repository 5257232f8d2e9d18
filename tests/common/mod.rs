#![allow(dead_code)]

use std::time::Duration;
use virtual_mouse::action::Action;
use virtual_mouse::config::Config;
use virtual_mouse::fingers::FingerStates;
use virtual_mouse::gesture::{GestureMachine, InteractionMode, Transition};
use virtual_mouse::landmarks::{Detection, LandmarkSnapshot};
use virtual_mouse::source::HandPose;

pub const FPS: u64 = 30;
pub const SCREEN: (u32, u32) = (1920, 1080);

/// Timestamp of frame `k` at 30 fps, exact to the microsecond.
pub fn frame_time(k: u64) -> Duration {
    Duration::from_micros(k * 1_000_000 / FPS)
}

pub fn fingers(bits: [u8; 5]) -> FingerStates {
    FingerStates::from_bits(bits)
}

pub fn machine() -> GestureMachine {
    GestureMachine::new(&Config::default(), SCREEN)
}

pub fn machine_with(config: &Config) -> GestureMachine {
    GestureMachine::new(config, SCREEN)
}

/// Builds a frame sequence pose by pose, like a storyboard.
#[derive(Default)]
pub struct FrameScript {
    frames: Vec<Option<HandPose>>,
}

impl FrameScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(mut self, pose: HandPose, frames: usize) -> Self {
        self.frames.extend(std::iter::repeat(Some(pose)).take(frames));
        self
    }

    pub fn absent(mut self, frames: usize) -> Self {
        self.frames.extend(std::iter::repeat(None).take(frames));
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn snapshots(&self) -> Vec<(Duration, Option<LandmarkSnapshot>)> {
        self.frames
            .iter()
            .enumerate()
            .map(|(k, pose)| {
                let t = frame_time(k as u64);
                (t, pose.map(|p| p.snapshot(t)))
            })
            .collect()
    }

    pub fn detections(&self) -> Vec<Detection> {
        self.snapshots()
            .into_iter()
            .map(|(t, hand)| match hand {
                Some(hand) => Detection::single(hand),
                None => Detection::empty(t),
            })
            .collect()
    }

    /// Feeds every frame through `machine` in order.
    pub fn run(&self, machine: &mut GestureMachine) -> Vec<Transition> {
        self.snapshots()
            .iter()
            .map(|(t, hand)| machine.step(*t, hand.as_ref()))
            .collect()
    }
}

pub fn actions(transitions: &[Transition]) -> Vec<Action> {
    transitions.iter().filter_map(|t| t.action).collect()
}

pub fn modes(transitions: &[Transition]) -> Vec<InteractionMode> {
    transitions.iter().map(|t| t.mode).collect()
}

/// Frame indices whose action satisfies `pred`.
pub fn frames_where(transitions: &[Transition], pred: impl Fn(&Action) -> bool) -> Vec<usize> {
    transitions
        .iter()
        .enumerate()
        .filter(|(_, t)| t.action.as_ref().is_some_and(&pred))
        .map(|(k, _)| k)
        .collect()
}

// Poses used across suites.

pub fn pointer() -> HandPose {
    HandPose::pointer().index_tip_at(320.0, 240.0)
}

pub fn pointer_pinch() -> HandPose {
    pointer().pinch_thumb_index(true)
}

pub fn v_sign() -> HandPose {
    HandPose::new(fingers([0, 1, 1, 0, 0])).index_tip_at(320.0, 240.0)
}

pub fn v_pinch() -> HandPose {
    v_sign().pinch_index_middle(true)
}

pub fn scroll_at(wrist_y: f32) -> HandPose {
    HandPose::scroll().at(320.0, wrist_y)
}
