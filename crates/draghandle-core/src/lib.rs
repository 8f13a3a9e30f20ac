//! DragHandle Core Library
//!
//! Platform-agnostic drag controller: binds a handle's position to pointer
//! input, constrains it to a container and reports semantic events.

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod events;
pub mod geometry;
pub mod pointer;
pub mod scheduler;

pub use config::{ContainerConfig, DragConfig, DragOptions, HandleConfig, DEFAULT_SLIDE_DURATION_MS};
pub use controller::{DragController, Host};
pub use dom::{ContainerElement, EventTarget, HandleElement, Listener, ListenerMap, MemoryElement, MemoryWindow};
pub use error::{DragError, DragResult};
pub use events::{DragEvent, DragEventKind, HandleState, EVENT_PREFIX};
pub use geometry::{Axis, Coord, Edge, Edges};
pub use pointer::{PointerEvent, PointerPhase, PointerScheme, PointerSource};
pub use scheduler::{DeferredFlag, ManualScheduler, Scheduler, Task, TaskId};
