//! Toggle switch driven by a drag controller.
//!
//! Tapping the handle flips the switch; dragging it and letting go snaps to
//! the closest edge, and the switch is on when the handle rests on the far edge.

use draghandle_core::{Coord, DragController, DragEvent, DragEventKind, Edge, Edges, Listener};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Change notification callback.
pub type ChangeListener = Rc<dyn Fn(bool)>;

/// A two-state switch whose handle travels along the x axis.
#[derive(Clone)]
pub struct Switch {
    inner: Rc<SwitchInner>,
}

struct SwitchInner {
    drag: DragController,
    checked: Cell<bool>,
    subscribers: RefCell<Vec<ChangeListener>>,
    ended: Listener<DragEvent>,
    snapped: Listener<DragEvent>,
}

fn edge_for(checked: bool) -> Edge {
    if checked {
        Edge::Far
    } else {
        Edge::Near
    }
}

impl Switch {
    /// Bind a switch to `drag`, placing the handle on the edge for `checked`.
    pub fn new(drag: DragController, checked: bool) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<SwitchInner>| {
            let on_ended = weak.clone();
            let ended: Listener<DragEvent> = Rc::new(move |_: &DragEvent| {
                if let Some(inner) = on_ended.upgrade() {
                    inner.on_ended();
                }
            });
            let on_snapped = weak.clone();
            let snapped: Listener<DragEvent> = Rc::new(move |event: &DragEvent| {
                if let (Some(inner), DragEvent::Snapped(edges)) = (on_snapped.upgrade(), event) {
                    inner.on_snapped(*edges);
                }
            });
            SwitchInner {
                drag,
                checked: Cell::new(checked),
                subscribers: RefCell::new(Vec::new()),
                ended,
                snapped,
            }
        });

        inner.drag.on(DragEventKind::Ended, Rc::clone(&inner.ended));
        inner.drag.on(DragEventKind::Snapped, Rc::clone(&inner.snapped));
        inner.drag.translate(Coord::from(edge_for(checked)), 0.0);
        Self { inner }
    }

    pub fn checked(&self) -> bool {
        self.inner.checked.get()
    }

    /// Slide to the edge for `checked`, notifying subscribers if it changed.
    pub fn set_checked(&self, checked: bool) {
        self.inner.set_checked(checked);
    }

    pub fn toggle(&self) {
        self.inner.set_checked(!self.checked());
    }

    /// Call `listener` whenever the checked state changes.
    pub fn on_change(&self, listener: impl Fn(bool) + 'static) {
        self.inner.subscribers.borrow_mut().push(Rc::new(listener));
    }

    pub fn drag(&self) -> &DragController {
        &self.inner.drag
    }

    /// Detach from the controller and stop listening for pointer input.
    pub fn destroy(&self) {
        let drag = &self.inner.drag;
        drag.off(DragEventKind::Ended, &self.inner.ended);
        drag.off(DragEventKind::Snapped, &self.inner.snapped);
        drag.stop_events();
        self.inner.subscribers.borrow_mut().clear();
    }
}

impl SwitchInner {
    fn on_ended(&self) {
        if self.drag.is_dragging() {
            self.drag.snap();
        } else {
            self.set_checked(!self.checked.get());
        }
    }

    fn on_snapped(&self, edges: Edges) {
        self.update(edges.x == Edge::Far);
    }

    fn set_checked(&self, checked: bool) {
        self.drag.transition_to(Coord::from(edge_for(checked)), 0.0);
        self.update(checked);
    }

    fn update(&self, checked: bool) {
        if self.checked.replace(checked) == checked {
            return;
        }
        log::info!("switch {}", if checked { "on" } else { "off" });
        let subscribers: Vec<ChangeListener> = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber(checked);
        }
    }
}
