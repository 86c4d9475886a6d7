//! Engine event types

use crate::coords::Point;
use smallvec::SmallVec;

/// Identifier of one tracked touch, as supplied by the platform
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub i64);

/// Phase of a touch event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchAction {
    /// One or more touches started
    TouchDown,
    /// Tracked touches moved
    Move,
    /// Touches ended; with no touches, clears all tracked touches
    TouchUp,
}

/// A single touch point in window space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Touch {
    /// Platform touch identifier
    pub id: TouchId,
    /// Position in window coordinates
    pub position: Point,
    /// Number of taps this touch belongs to
    pub tap_count: usize,
}

/// Touches reported together at one instant
#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    /// What happened to the touches
    pub action: TouchAction,
    /// The touches, in the order the platform reported them
    pub touches: SmallVec<[Touch; 4]>,
}

impl TouchEvent {
    /// Create a touch event
    pub fn new(action: TouchAction, touches: SmallVec<[Touch; 4]>) -> Self {
        Self { action, touches }
    }

    /// The "clear all tracked touches" signal: a touch-up with no touches
    pub fn clear() -> Self {
        Self {
            action: TouchAction::TouchUp,
            touches: SmallVec::new(),
        }
    }

    /// Check if this event resets touch tracking
    pub fn is_clear(&self) -> bool {
        self.action == TouchAction::TouchUp && self.touches.is_empty()
    }
}

/// Events delivered through an [`EventDispatcher`](crate::EventDispatcher)
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Touch input for a window
    Touch(TouchEvent),
    /// Text typed on the on-screen keyboard
    TextInput(String),
    /// Request to show the on-screen keyboard
    ShowKeyboard,
    /// The on-screen keyboard was hidden
    HideKeyboard,
    /// A performance measurement finished
    PerformanceResult {
        /// Measured frames per second
        fps: f32,
    },
    /// Engine error message
    Error(String),
    /// Engine warning message
    Warning(String),
}

/// Event discriminant used for subscriptions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Touch,
    TextInput,
    ShowKeyboard,
    HideKeyboard,
    PerformanceResult,
    Error,
    Warning,
}

impl Event {
    /// The kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Touch(_) => EventKind::Touch,
            Event::TextInput(_) => EventKind::TextInput,
            Event::ShowKeyboard => EventKind::ShowKeyboard,
            Event::HideKeyboard => EventKind::HideKeyboard,
            Event::PerformanceResult { .. } => EventKind::PerformanceResult,
            Event::Error(_) => EventKind::Error,
            Event::Warning(_) => EventKind::Warning,
        }
    }
}
