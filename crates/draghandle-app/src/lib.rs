//! DragHandle Application
//!
//! Widgets built on the drag controller, with a headless native shell and
//! DOM bindings for the browser.

pub mod demo;
mod switch;

pub use switch::{ChangeListener, Switch};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{run_wasm, DomElement, DomWindow, TimeoutScheduler, WebSwitch};
