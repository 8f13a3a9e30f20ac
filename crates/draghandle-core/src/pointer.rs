//! Pointer event normalization for touch and mouse input.

use crate::error::{DragError, DragResult};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Which family of platform events drives the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerScheme {
    Touch,
    Mouse,
}

impl PointerScheme {
    /// Touch events when the platform supports them, mouse events otherwise.
    pub fn detect(touch_supported: bool) -> Self {
        if touch_supported {
            PointerScheme::Touch
        } else {
            PointerScheme::Mouse
        }
    }

    /// Platform event name for a phase.
    pub fn event_name(self, phase: PointerPhase) -> &'static str {
        match (self, phase) {
            (PointerScheme::Touch, PointerPhase::Down) => "touchstart",
            (PointerScheme::Touch, PointerPhase::Move) => "touchmove",
            (PointerScheme::Touch, PointerPhase::Up) => "touchend",
            (PointerScheme::Mouse, PointerPhase::Down) => "mousedown",
            (PointerScheme::Mouse, PointerPhase::Move) => "mousemove",
            (PointerScheme::Mouse, PointerPhase::Up) => "mouseup",
        }
    }

    /// Reverse lookup of a platform event name.
    pub fn parse_event_name(name: &str) -> Option<(Self, PointerPhase)> {
        let parsed = match name {
            "touchstart" => (PointerScheme::Touch, PointerPhase::Down),
            "touchmove" => (PointerScheme::Touch, PointerPhase::Move),
            "touchend" => (PointerScheme::Touch, PointerPhase::Up),
            "mousedown" => (PointerScheme::Mouse, PointerPhase::Down),
            "mousemove" => (PointerScheme::Mouse, PointerPhase::Move),
            "mouseup" => (PointerScheme::Mouse, PointerPhase::Up),
            _ => return None,
        };
        Some(parsed)
    }
}

/// Payload of a pointer event, in page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerSource {
    /// Active touch points.
    Touch { touches: Vec<Point> },
    /// Mouse position.
    Mouse { page: Point },
}

/// A normalized pointer event as delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub source: PointerSource,
    #[serde(skip)]
    default_prevented: Cell<bool>,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, source: PointerSource) -> Self {
        Self {
            phase,
            source,
            default_prevented: Cell::new(false),
        }
    }

    /// A touch event with the given touch points.
    pub fn touch(phase: PointerPhase, touches: Vec<Point>) -> Self {
        Self::new(phase, PointerSource::Touch { touches })
    }

    /// A mouse event at the given page position.
    pub fn mouse(phase: PointerPhase, page: Point) -> Self {
        Self::new(phase, PointerSource::Mouse { page })
    }

    pub fn scheme(&self) -> PointerScheme {
        match self.source {
            PointerSource::Touch { .. } => PointerScheme::Touch,
            PointerSource::Mouse { .. } => PointerScheme::Mouse,
        }
    }

    /// Platform event name of this event.
    pub fn name(&self) -> &'static str {
        self.scheme().event_name(self.phase)
    }

    /// Page position of the pointer: the first touch point, or the mouse itself.
    pub fn page_point(&self) -> DragResult<Point> {
        match &self.source {
            PointerSource::Touch { touches } => {
                touches.first().copied().ok_or(DragError::MissingTouchPoint)
            }
            PointerSource::Mouse { page } => Ok(*page),
        }
    }

    /// Ask the host to suppress default scrolling/selection for this event.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl PartialEq for PointerEvent {
    fn eq(&self, other: &Self) -> bool {
        self.phase == other.phase && self.source == other.source
    }
}
