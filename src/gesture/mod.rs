pub mod machine;
pub mod pinch;

pub use self::machine::{decide, Decision, GestureMachine, Intent, Transition};
pub use self::pinch::{Pinch, PinchEdge, PinchState};

use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// The single active interaction for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumIter)]
pub enum InteractionMode {
    #[default]
    Idle,
    Move,
    LeftClick,
    RightClick,
    Drag,
    Scroll,
}

impl InteractionMode {
    /// Modes in which the smoothed cursor position stays meaningful.
    pub fn tracks_cursor(self) -> bool {
        !matches!(self, InteractionMode::Idle | InteractionMode::Scroll)
    }
}
