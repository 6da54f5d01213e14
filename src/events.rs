//! Raw host input events and the allow-list of inputs whose latency is tracked.
//!
//! The host's input dispatch reports every key and axis event as a [`RawInput`]. Only a small,
//! fixed set of mouse inputs is ever measured; [`RawInput::tracked`] maps an event onto that
//! set or rejects it.
//!
//! # Tracked inputs
//!
//! - Left or right mouse button, on press or auto-repeat
//! - Mouse X or Y axis, when the reported delta is non-zero
//!
//! # Example
//!
//! ```rust
//! use input_lag_diagnostics::events::{InputKind, MouseAxis, MouseButton, RawInput, TrackedInput};
//!
//! let click = RawInput::button(MouseButton::Left, InputKind::Pressed);
//! assert_eq!(click.tracked(), Some(TrackedInput::LeftMouseButton));
//!
//! let release = RawInput::button(MouseButton::Left, InputKind::Released);
//! assert_eq!(release.tracked(), None);
//!
//! let still = RawInput::axis(MouseAxis::X, 0.0);
//! assert_eq!(still.tracked(), None);
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mouse button as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Side/thumb buttons and anything else.
    Other(u8),
}

/// Mouse axes reported as per-frame deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAxis {
    /// Horizontal movement.
    X,
    /// Vertical movement.
    Y,
    /// Scroll wheel.
    Wheel,
}

/// Transition reported for a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// The key went down.
    Pressed,
    /// The key went up.
    Released,
    /// Auto-repeat while held.
    Repeat,
    /// Second press of a double click.
    DoubleClick,
}

impl InputKind {
    /// Whether this transition counts as the user acting, i.e. press or repeat.
    fn is_activation(self) -> bool {
        matches!(self, InputKind::Pressed | InputKind::Repeat)
    }
}

/// One raw event from the host's input dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    /// Mouse button transition.
    Button {
        /// Which button.
        button: MouseButton,
        /// Press, release, repeat...
        kind: InputKind,
    },
    /// Mouse axis movement.
    Axis {
        /// Which axis.
        axis: MouseAxis,
        /// Movement reported for this event.
        delta: f32,
    },
    /// Keyboard key transition. Never tracked.
    Key {
        /// Character the key produces.
        code: char,
        /// Press, release, repeat...
        kind: InputKind,
    },
}

impl RawInput {
    /// Creates a mouse button event.
    pub fn button(button: MouseButton, kind: InputKind) -> Self {
        RawInput::Button { button, kind }
    }

    /// Creates a mouse axis event.
    pub fn axis(axis: MouseAxis, delta: f32) -> Self {
        RawInput::Axis { axis, delta }
    }

    /// Creates a keyboard event.
    pub fn key(code: char, kind: InputKind) -> Self {
        RawInput::Key { code, kind }
    }

    /// Maps this event onto the tracked-input allow-list.
    ///
    /// Returns `None` for anything whose latency is not measured.
    pub fn tracked(&self) -> Option<TrackedInput> {
        match *self {
            RawInput::Button { button: MouseButton::Left, kind } if kind.is_activation() => {
                Some(TrackedInput::LeftMouseButton)
            }
            RawInput::Button { button: MouseButton::Right, kind } if kind.is_activation() => {
                Some(TrackedInput::RightMouseButton)
            }
            RawInput::Axis { axis: MouseAxis::X, delta } if delta != 0.0 => Some(TrackedInput::MouseX),
            RawInput::Axis { axis: MouseAxis::Y, delta } if delta != 0.0 => Some(TrackedInput::MouseY),
            _ => None,
        }
    }
}

/// The inputs whose latency can be measured.
///
/// The [`Display`](fmt::Display) form is the name written to the CSV log and shown on the
/// overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrackedInput {
    /// Left mouse button press/repeat.
    LeftMouseButton,
    /// Right mouse button press/repeat.
    RightMouseButton,
    /// Horizontal mouse movement.
    MouseX,
    /// Vertical mouse movement.
    MouseY,
}

impl TrackedInput {
    /// Returns the identifier as a static string.
    pub fn as_str(self) -> &'static str {
        match self {
            TrackedInput::LeftMouseButton => "LeftMouseButton",
            TrackedInput::RightMouseButton => "RightMouseButton",
            TrackedInput::MouseX => "MouseX",
            TrackedInput::MouseY => "MouseY",
        }
    }
}

impl fmt::Display for TrackedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame snapshot of the input owner's state.
///
/// Some hosts cannot hook raw dispatch and instead expose "was this key just pressed" and the
/// current axis values once per tick. [`InputState::first_candidate`] turns such a snapshot
/// into the single event worth offering to the sampler.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Left button went down this frame.
    pub left_just_pressed: bool,
    /// Right button went down this frame.
    pub right_just_pressed: bool,
    /// Mouse X delta this frame.
    pub mouse_x: f32,
    /// Mouse Y delta this frame.
    pub mouse_y: f32,
}

impl InputState {
    /// Returns the highest-priority trackable event in this snapshot.
    ///
    /// Buttons win over movement, left over right, X over Y.
    pub fn first_candidate(&self) -> Option<RawInput> {
        if self.left_just_pressed {
            Some(RawInput::button(MouseButton::Left, InputKind::Pressed))
        } else if self.right_just_pressed {
            Some(RawInput::button(MouseButton::Right, InputKind::Pressed))
        } else if self.mouse_x.abs() > 0.0 {
            Some(RawInput::axis(MouseAxis::X, self.mouse_x))
        } else if self.mouse_y.abs() > 0.0 {
            Some(RawInput::axis(MouseAxis::Y, self.mouse_y))
        } else {
            None
        }
    }
}

/// Source of polled input state, implemented by the host.
///
/// Returning `None` means there is no input owner this frame (e.g. no local player yet);
/// callers skip the frame.
pub trait InputSource {
    /// Returns this frame's input snapshot.
    fn poll(&mut self) -> Option<InputState>;
}

impl InputSource for Option<InputState> {
    fn poll(&mut self) -> Option<InputState> {
        *self
    }
}
