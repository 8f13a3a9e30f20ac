//! Semantic events emitted on the container.

use crate::geometry::Edges;
use crate::pointer::PointerEvent;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Prefix namespacing every event this component dispatches.
pub const EVENT_PREFIX: &str = "drag";

/// The kinds of event a drag controller emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragEventKind {
    /// The handle changed position.
    Translate,
    /// A pointer gesture finished.
    Ended,
    /// The handle was sent to its closest edges.
    Snapped,
}

impl DragEventKind {
    pub const ALL: [DragEventKind; 3] = [
        DragEventKind::Translate,
        DragEventKind::Ended,
        DragEventKind::Snapped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DragEventKind::Translate => "translate",
            DragEventKind::Ended => "ended",
            DragEventKind::Snapped => "snapped",
        }
    }

    /// Namespaced name used on the container, e.g. `dragtranslate`.
    pub fn event_name(self) -> String {
        format!("{}{}", EVENT_PREFIX, self.as_str())
    }
}

/// Snapshot of the handle after a position update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleState {
    /// Offset in pixels from the container origin.
    pub position: Point,
    /// Measured handle size.
    pub size: Size,
    /// Position as a fraction of the maximum offset per axis.
    pub ratio: Vec2,
}

/// An event dispatched on the container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "lowercase")]
pub enum DragEvent {
    Translate(HandleState),
    Ended(PointerEvent),
    Snapped(Edges),
}

impl DragEvent {
    pub fn kind(&self) -> DragEventKind {
        match self {
            DragEvent::Translate(_) => DragEventKind::Translate,
            DragEvent::Ended(_) => DragEventKind::Ended,
            DragEvent::Snapped(_) => DragEventKind::Snapped,
        }
    }

    /// Namespaced event name.
    pub fn name(&self) -> String {
        self.kind().event_name()
    }
}
