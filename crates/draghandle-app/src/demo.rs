//! Headless switch session driven by scripted pointer input.

use crate::Switch;
use draghandle_core::{
    ContainerConfig, DragConfig, DragController, DragEvent, DragEventKind, HandleConfig, Host,
    ManualScheduler, MemoryElement, MemoryWindow, PointerEvent, PointerPhase, PointerScheme,
};
use kurbo::{Point, Size};
use std::rc::Rc;

/// Number of move events used to replay a drag.
const DRAG_STEPS: u32 = 5;

/// A switch wired to in-memory elements.
pub struct DemoSession {
    handle: Rc<MemoryElement>,
    window: Rc<MemoryWindow>,
    scheduler: Rc<ManualScheduler>,
    switch: Switch,
}

impl DemoSession {
    /// Build a 400x100 track with a 100x100 handle.
    pub fn new(checked: bool) -> Self {
        let container = Rc::new(MemoryElement::new());
        let handle = Rc::new(MemoryElement::new());
        let window = Rc::new(MemoryWindow::new());
        let scheduler = Rc::new(ManualScheduler::new());

        let config = DragConfig::new(
            ContainerConfig::new(container, Size::new(400.0, 100.0)),
            HandleConfig::new(handle.clone(), Size::new(100.0, 100.0)),
        );
        let drag = DragController::new(
            config,
            Host {
                window: window.clone(),
                scheduler: scheduler.clone(),
                scheme: PointerScheme::Touch,
            },
        );
        for kind in DragEventKind::ALL {
            drag.on(kind, Rc::new(log_event));
        }

        Self {
            handle,
            window,
            scheduler,
            switch: Switch::new(drag, checked),
        }
    }

    pub fn switch(&self) -> &Switch {
        &self.switch
    }

    /// Current handle transform.
    pub fn transform(&self) -> String {
        self.handle.transform()
    }

    /// Press and release without letting the scheduler run in between.
    pub fn tap(&self) {
        let at = self.grab_point();
        self.handle.emit_pointer(&touch(PointerPhase::Down, at));
        self.window.emit_pointer(&touch(PointerPhase::Up, at));
        self.scheduler.run_until_idle();
    }

    /// Drag the handle horizontally by `dx` pixels and release it.
    pub fn drag_by(&self, dx: f64) {
        let mut at = self.grab_point();
        self.handle.emit_pointer(&touch(PointerPhase::Down, at));
        self.scheduler.run_until_idle();
        for _ in 0..DRAG_STEPS {
            at.x += dx / f64::from(DRAG_STEPS);
            self.window.emit_pointer(&touch(PointerPhase::Move, at));
            self.scheduler.run_until_idle();
        }
        self.window.emit_pointer(&touch(PointerPhase::Up, at));
        self.scheduler.run_until_idle();
    }

    /// Page position of the handle's centre.
    fn grab_point(&self) -> Point {
        let state = self.switch.drag().handle_state();
        state.position + state.size.to_vec2() / 2.0
    }
}

fn touch(phase: PointerPhase, at: Point) -> PointerEvent {
    PointerEvent::touch(phase, vec![at])
}

fn log_event(event: &DragEvent) {
    match serde_json::to_string(event) {
        Ok(json) => log::info!("{}: {}", event.name(), json),
        Err(err) => log::warn!("failed to serialize {}: {}", event.name(), err),
    }
}

/// Replay a tap and a few drags, returning the switch state after each step.
pub fn run() -> Vec<bool> {
    let session = DemoSession::new(false);
    let mut states = vec![session.switch().checked()];

    session.tap();
    states.push(session.switch().checked());

    for dx in [-200.0, 120.0, 250.0] {
        session.drag_by(dx);
        log::info!("dragged {}px, handle at {}", dx, session.transform());
        states.push(session.switch().checked());
    }
    states
}
