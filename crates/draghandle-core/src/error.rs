//! Error types for the drag controller.

use crate::geometry::Axis;
use thiserror::Error;

/// Drag controller errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DragError {
    #[error("Touch event carries no touch points")]
    MissingTouchPoint,
    #[error("Invalid coordinate: {0}")]
    InvalidCoord(String),
    #[error("Handle ({handle}px) exceeds container ({container}px) on the {axis} axis")]
    HandleExceedsContainer {
        axis: Axis,
        handle: f64,
        container: f64,
    },
    #[error("DOM error: {0}")]
    Dom(String),
}

/// Result type for drag operations.
pub type DragResult<T> = Result<T, DragError>;
