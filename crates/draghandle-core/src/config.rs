//! Drag controller configuration.

use crate::dom::{ContainerElement, HandleElement};
use crate::error::{DragError, DragResult};
use crate::geometry::{self, Axis};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Default duration of a full-span snap transition, in milliseconds.
pub const DEFAULT_SLIDE_DURATION_MS: f64 = 140.0;

/// Tunable options, loadable from serialized settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragOptions {
    /// Duration of a transition across the whole span, in milliseconds.
    pub slide_duration: f64,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            slide_duration: DEFAULT_SLIDE_DURATION_MS,
        }
    }
}

impl DragOptions {
    /// The configured slide duration, or the default when unset, zero or negative.
    pub fn slide_duration(&self) -> f64 {
        if self.slide_duration.is_finite() && self.slide_duration > 0.0 {
            self.slide_duration
        } else {
            DEFAULT_SLIDE_DURATION_MS
        }
    }
}

/// The bounding element and its measured size.
#[derive(Clone)]
pub struct ContainerConfig {
    pub element: Rc<dyn ContainerElement>,
    pub size: Size,
}

impl ContainerConfig {
    pub fn new(element: Rc<dyn ContainerElement>, size: Size) -> Self {
        Self { element, size }
    }
}

impl fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// The draggable element, its measured size and its current offset.
#[derive(Clone)]
pub struct HandleConfig {
    pub element: Rc<dyn HandleElement>,
    pub size: Size,
    pub position: Point,
}

impl HandleConfig {
    pub fn new(element: Rc<dyn HandleElement>, size: Size) -> Self {
        Self {
            element,
            size,
            position: Point::ZERO,
        }
    }

    /// Start the handle at `position` instead of the origin.
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }
}

impl fmt::Debug for HandleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleConfig")
            .field("size", &self.size)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// Full controller configuration.
#[derive(Debug, Clone)]
pub struct DragConfig {
    pub options: DragOptions,
    pub container: ContainerConfig,
    pub handle: HandleConfig,
}

impl DragConfig {
    pub fn new(container: ContainerConfig, handle: HandleConfig) -> Self {
        Self {
            options: DragOptions::default(),
            container,
            handle,
        }
    }

    pub fn with_options(mut self, options: DragOptions) -> Self {
        self.options = options;
        self
    }

    /// Maximum offset derived from the container and handle sizes.
    pub fn max_offset(&self) -> Vec2 {
        geometry::max_offset(self.container.size, self.handle.size)
    }

    /// Check that the handle fits inside the container on both axes.
    ///
    /// Not required: the controller clamps degenerate geometry, but a handle
    /// that does not fit can never move on that axis.
    pub fn validate(&self) -> DragResult<()> {
        for axis in [Axis::X, Axis::Y] {
            let handle = axis.of_size(self.handle.size);
            let container = axis.of_size(self.container.size);
            if handle > container {
                return Err(DragError::HandleExceedsContainer {
                    axis,
                    handle,
                    container,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryElement;

    fn config(container: Size, handle: Size) -> DragConfig {
        DragConfig::new(
            ContainerConfig::new(Rc::new(MemoryElement::new()), container),
            HandleConfig::new(Rc::new(MemoryElement::new()), handle),
        )
    }

    #[test]
    fn test_default_slide_duration() {
        let options: DragOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.slide_duration(), DEFAULT_SLIDE_DURATION_MS);

        let options: DragOptions = serde_json::from_str(r#"{"slide_duration": 300}"#).unwrap();
        assert_eq!(options.slide_duration(), 300.0);
    }

    #[test]
    fn test_zero_slide_duration_falls_back() {
        let options = DragOptions { slide_duration: 0.0 };
        assert_eq!(options.slide_duration(), DEFAULT_SLIDE_DURATION_MS);
    }

    #[test]
    fn test_max_offset() {
        let config = config(Size::new(400.0, 100.0), Size::new(100.0, 100.0));
        assert_eq!(config.max_offset(), Vec2::new(300.0, 0.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_handle() {
        let config = config(Size::new(400.0, 100.0), Size::new(100.0, 120.0));
        assert_eq!(
            config.validate(),
            Err(DragError::HandleExceedsContainer {
                axis: Axis::Y,
                handle: 120.0,
                container: 100.0,
            })
        );
    }
}
