//! Mouse actions emitted by the gesture state machine and the dispatchers
//! that carry them out.

use crate::error::VmResult;
use serde::Serialize;
use strum_macros::{Display, EnumIter, IntoStaticStr};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Action {
    /// Absolute screen position.
    MoveTo { x: f32, y: f32 },
    Click(MouseButton),
    Press(MouseButton),
    Release(MouseButton),
    /// Signed scroll speed; negative scrolls up.
    ScrollBy { delta: f32 },
}

/// Field-less mirror of [`Action`] used for counting and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum ActionKind {
    Move,
    LeftClick,
    RightClick,
    Press,
    Release,
    Scroll,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::MoveTo { .. } => ActionKind::Move,
            Action::Click(MouseButton::Left) => ActionKind::LeftClick,
            Action::Click(MouseButton::Right) => ActionKind::RightClick,
            Action::Press(_) => ActionKind::Press,
            Action::Release(_) => ActionKind::Release,
            Action::ScrollBy { .. } => ActionKind::Scroll,
        }
    }
}

/// Performs emitted actions. Implementations own every platform quirk.
pub trait Dispatcher {
    fn dispatch(&mut self, action: &Action) -> VmResult<()>;

    /// Screen size in pixels, when the backend can tell.
    fn screen_size(&self) -> Option<(u32, u32)> {
        None
    }
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    fn dispatch(&mut self, action: &Action) -> VmResult<()> {
        (**self).dispatch(action)
    }

    fn screen_size(&self) -> Option<(u32, u32)> {
        (**self).screen_size()
    }
}

/// Dry-run dispatcher: logs every action and injects nothing.
#[derive(Debug, Default)]
pub struct LogDispatcher;

impl Dispatcher for LogDispatcher {
    fn dispatch(&mut self, action: &Action) -> VmResult<()> {
        match action {
            Action::MoveTo { x, y } => info!("🖱️  move_to({:.0}, {:.0})", x, y),
            Action::Click(b) => info!("🖱️  click({})", b),
            Action::Press(b) => info!("🖱️  press({})", b),
            Action::Release(b) => info!("🖱️  release({})", b),
            Action::ScrollBy { delta } => info!("🖱️  scroll_by({:+.2})", delta),
        }
        Ok(())
    }
}

/// Keeps every dispatched action in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingDispatcher {
    pub actions: Vec<Action>,
    pub screen: Option<(u32, u32)>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screen(width: u32, height: u32) -> Self {
        Self {
            actions: Vec::new(),
            screen: Some((width, height)),
        }
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind() == kind).count()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&mut self, action: &Action) -> VmResult<()> {
        self.actions.push(*action);
        Ok(())
    }

    fn screen_size(&self) -> Option<(u32, u32)> {
        self.screen
    }
}

#[cfg(feature = "enigo")]
pub use self::os::EnigoDispatcher;

#[cfg(feature = "enigo")]
mod os {
    use super::{Action, Dispatcher, MouseButton};
    use crate::error::{VirtualMouseError, VmResult};
    use enigo::{Axis, Button, Coordinate, Direction, Enigo, Mouse, Settings};
    use tracing::debug;

    /// Injects real mouse input through `enigo`.
    pub struct EnigoDispatcher {
        enigo: Enigo,
        wheel_scale: f32,
        wheel_carry: f32,
    }

    impl EnigoDispatcher {
        pub fn new(wheel_scale: f32) -> VmResult<Self> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| VirtualMouseError::Dispatch(format!("{:?}", e)))?;
            Ok(Self {
                enigo,
                wheel_scale,
                wheel_carry: 0.0,
            })
        }

        // Scroll speed is continuous, wheel lines are not: carry the remainder.
        fn wheel_lines(&mut self, delta: f32) -> i32 {
            self.wheel_carry += delta * self.wheel_scale;
            let lines = self.wheel_carry.trunc();
            self.wheel_carry -= lines;
            lines as i32
        }
    }

    fn button(b: MouseButton) -> Button {
        match b {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
        }
    }

    fn dispatch_err(e: enigo::InputError) -> VirtualMouseError {
        VirtualMouseError::Dispatch(format!("{:?}", e))
    }

    impl Dispatcher for EnigoDispatcher {
        fn dispatch(&mut self, action: &Action) -> VmResult<()> {
            match *action {
                Action::MoveTo { x, y } => self
                    .enigo
                    .move_mouse(x.round() as i32, y.round() as i32, Coordinate::Abs)
                    .map_err(dispatch_err),
                Action::Click(b) => self
                    .enigo
                    .button(button(b), Direction::Click)
                    .map_err(dispatch_err),
                Action::Press(b) => self
                    .enigo
                    .button(button(b), Direction::Press)
                    .map_err(dispatch_err),
                Action::Release(b) => self
                    .enigo
                    .button(button(b), Direction::Release)
                    .map_err(dispatch_err),
                Action::ScrollBy { delta } => {
                    let lines = self.wheel_lines(delta);
                    if lines == 0 {
                        return Ok(());
                    }
                    debug!("wheel {} lines (speed {:+.2})", lines, delta);
                    self.enigo
                        .scroll(lines, Axis::Vertical)
                        .map_err(dispatch_err)
                }
            }
        }

        fn screen_size(&self) -> Option<(u32, u32)> {
            match self.enigo.main_display() {
                Ok((w, h)) if w > 0 && h > 0 => Some((w as u32, h as u32)),
                _ => None,
            }
        }
    }
}
