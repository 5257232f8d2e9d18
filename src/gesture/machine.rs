//! The gesture state machine.
//!
//! Every frame resolves to exactly one [`InteractionMode`] and at most one
//! [`Action`]. Priority, top to bottom, first match wins:
//!
//! | Priority | Mode | Condition |
//! |---|---|---|
//! | 1 | Scroll | ring + pinky up, thumb + index + middle down |
//! | 2 | Drag | button already held, thumb-index pinch still closed, pointer pose |
//! | 3 | RightClick / Drag | thumb-index pinch in pointer pose (release < hold = click, hold reached = press) |
//! | 4 | LeftClick | index-middle pinch, index + middle up (fires on pinch start) |
//! | 5 | Move | index up |
//! | 6 | Idle | anything else |
//!
//! "Pointer pose" is index up with middle down.
//!
//! All priority and hysteresis rules live in [`decide`]; [`GestureMachine`]
//! only applies its result to the mapper, scroll engine and pinch latches.

use super::pinch::{PinchEdge, PinchState};
use super::InteractionMode;
use crate::action::{Action, MouseButton};
use crate::config::Config;
use crate::fingers::{read_hand, FingerStates, HandReading};
use crate::landmarks::LandmarkSnapshot;
use crate::mapper::CoordinateMapper;
use crate::scroll::ScrollEngine;
use std::time::Duration;
use tracing::debug;

/// What the resolved mode wants done this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Nothing,
    MoveCursor,
    PressDrag,
    ReleaseDrag,
    ClickLeft,
    ClickRight,
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub mode: InteractionMode,
    pub intent: Intent,
    /// Mark the thumb-index pinch as used up until it is released.
    pub latch_thumb: bool,
    /// Mark the index-middle pinch as used up until it is released.
    pub latch_middle: bool,
}

impl Decision {
    fn new(mode: InteractionMode, intent: Intent) -> Self {
        Self {
            mode,
            intent,
            latch_thumb: false,
            latch_middle: false,
        }
    }

    fn with_thumb_latch(mut self, latch: bool) -> Self {
        self.latch_thumb |= latch;
        self
    }
}

/// Resolves the mode for one frame. Pure: `pinch` must already reflect this
/// frame's distances and `thumb_edge` is what that update reported for the
/// thumb-index pair.
pub fn decide(
    drag_held: bool,
    fingers: &FingerStates,
    pinch: &PinchState,
    thumb_edge: PinchEdge,
    now: Duration,
    hold: Duration,
) -> Decision {
    use InteractionMode as M;

    // 1. Scroll pose pre-empts everything, including an active drag.
    if fingers.is_scroll_pose() {
        let intent = if drag_held {
            Intent::ReleaseDrag
        } else {
            Intent::Scroll
        };
        return Decision::new(M::Scroll, intent).with_thumb_latch(true);
    }

    // 2. Sticky drag.
    if drag_held {
        if pinch.thumb_index.active && fingers.is_pointer_pose() {
            return Decision::new(M::Drag, Intent::MoveCursor);
        }
        return Decision::new(M::Drag, Intent::ReleaseDrag).with_thumb_latch(true);
    }

    // 3. Thumb-index: right click on a short pinch, drag on a long one.
    let ti = &pinch.thumb_index;
    let mut forfeit_thumb = false;
    if ti.is_armed() {
        if !fingers.is_pointer_pose() {
            // Pose broke mid-pinch: this pinch produces nothing until released.
            forfeit_thumb = true;
        } else if ti.held_for(now).is_some_and(|held| held >= hold) {
            return Decision::new(M::Drag, Intent::PressDrag).with_thumb_latch(true);
        } else {
            return Decision::new(M::RightClick, Intent::Nothing);
        }
    }
    if let PinchEdge::Released {
        held,
        latched: false,
    } = thumb_edge
    {
        if held < hold {
            return Decision::new(M::RightClick, Intent::ClickRight);
        }
    }

    // 4. Index-middle: left click once per pinch.
    let im = &pinch.index_middle;
    if im.active {
        if !im.latched && fingers.index && fingers.middle {
            let mut d = Decision::new(M::LeftClick, Intent::ClickLeft)
                .with_thumb_latch(forfeit_thumb);
            d.latch_middle = true;
            return d;
        }
        if im.latched {
            return Decision::new(M::LeftClick, Intent::Nothing)
                .with_thumb_latch(forfeit_thumb);
        }
    }

    // 5 / 6.
    if fingers.index {
        Decision::new(M::Move, Intent::MoveCursor).with_thumb_latch(forfeit_thumb)
    } else {
        Decision::new(M::Idle, Intent::Nothing).with_thumb_latch(forfeit_thumb)
    }
}

/// Result of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub mode: InteractionMode,
    pub action: Option<Action>,
    /// `None` when no hand was detected.
    pub reading: Option<HandReading>,
}

impl Transition {
    fn idle(action: Option<Action>) -> Self {
        Self {
            mode: InteractionMode::Idle,
            action,
            reading: None,
        }
    }
}

/// Owns all state that persists across frames. Must see every frame in
/// capture order; pinch-hold timing is computed from frame timestamps.
#[derive(Debug, Clone)]
pub struct GestureMachine {
    mode: InteractionMode,
    drag_held: bool,
    pinch: PinchState,
    mapper: CoordinateMapper,
    scroll: ScrollEngine,
    missed_frames: u32,

    pinch_threshold: f32,
    finger_margin: f32,
    hold: Duration,
    max_gap_frames: u32,
}

impl GestureMachine {
    pub fn new(config: &Config, screen: (u32, u32)) -> Self {
        let frame = config.camera.frame_size();
        Self {
            mode: InteractionMode::Idle,
            drag_held: false,
            pinch: PinchState::default(),
            mapper: CoordinateMapper::new(&config.cursor, frame, screen),
            scroll: ScrollEngine::new(&config.scroll, frame.1),
            missed_frames: 0,
            pinch_threshold: config.gestures.pinch_threshold,
            finger_margin: config.gestures.finger_margin,
            hold: config.gestures.drag_hold(),
            max_gap_frames: config.camera.max_gap_frames,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_held
    }

    pub fn pinch(&self) -> &PinchState {
        &self.pinch
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn scroll(&self) -> &ScrollEngine {
        &self.scroll
    }

    pub fn step(&mut self, now: Duration, hand: Option<&LandmarkSnapshot>) -> Transition {
        let Some(hand) = hand else {
            return self.on_miss();
        };
        self.missed_frames = 0;

        let reading = read_hand(hand, self.finger_margin);
        let (thumb_edge, _) = self
            .pinch
            .update(&reading.distances, self.pinch_threshold, now);

        let decision = decide(
            self.drag_held,
            &reading.fingers,
            &self.pinch,
            thumb_edge,
            now,
            self.hold,
        );
        let action = self.apply(&decision, hand, now);

        Transition {
            mode: decision.mode,
            action,
            reading: Some(reading),
        }
    }

    /// Releases a held drag button. Call once when the session ends.
    pub fn shutdown(&mut self) -> Option<Action> {
        let action = self.take_drag_release();
        self.reset();
        action
    }

    fn apply(&mut self, d: &Decision, hand: &LandmarkSnapshot, now: Duration) -> Option<Action> {
        if d.latch_thumb {
            self.pinch.thumb_index.latch();
        }
        if d.latch_middle {
            self.pinch.index_middle.latch();
        }

        if (self.mode == InteractionMode::Scroll) != (d.mode == InteractionMode::Scroll) {
            self.scroll.reset();
        }
        if self.mode.tracks_cursor() && !d.mode.tracks_cursor() {
            self.mapper.reset();
        }
        if self.mode != d.mode {
            debug!("mode {} -> {}", self.mode, d.mode);
            self.mode = d.mode;
        }

        match d.intent {
            Intent::Nothing => None,
            Intent::MoveCursor => {
                let p = self.mapper.update(hand.index_tip());
                Some(Action::MoveTo { x: p.x, y: p.y })
            }
            Intent::PressDrag => {
                self.drag_held = true;
                Some(Action::Press(MouseButton::Left))
            }
            Intent::ReleaseDrag => self.take_drag_release(),
            Intent::ClickLeft => Some(Action::Click(MouseButton::Left)),
            Intent::ClickRight => Some(Action::Click(MouseButton::Right)),
            Intent::Scroll => self
                .scroll
                .update(hand.wrist().y, now)
                .map(|delta| Action::ScrollBy { delta }),
        }
    }

    // Short gaps keep every timer and the held button; the first miss past
    // the tolerance drops all gesture state.
    fn on_miss(&mut self) -> Transition {
        self.missed_frames = self.missed_frames.saturating_add(1);
        if self.missed_frames != self.max_gap_frames.saturating_add(1) {
            return Transition::idle(None);
        }

        debug!(
            "hand lost for {} frames, resetting gesture state",
            self.missed_frames
        );
        let action = self.take_drag_release();
        self.reset();
        Transition::idle(action)
    }

    fn take_drag_release(&mut self) -> Option<Action> {
        if self.drag_held {
            self.drag_held = false;
            Some(Action::Release(MouseButton::Left))
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.mode = InteractionMode::Idle;
        self.pinch.clear();
        self.scroll.reset();
        self.mapper.reset();
    }
}
