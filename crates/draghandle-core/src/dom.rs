//! Element abstractions the controller drives, plus in-memory implementations.
//!
//! Listeners are reference-counted closures. Removal matches by pointer
//! identity, so the same `Rc` used to add a listener must be used to remove it.

use crate::events::DragEvent;
use crate::pointer::PointerEvent;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A shared event callback.
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// Something that accepts named listeners.
pub trait EventTarget<E> {
    /// Register a listener. Adding the same listener twice for a name is a no-op.
    fn add_listener(&self, name: &str, listener: Listener<E>);

    /// Remove a listener previously added under `name`.
    fn remove_listener(&self, name: &str, listener: &Listener<E>);
}

/// The draggable element.
pub trait HandleElement: EventTarget<PointerEvent> {
    /// Set the visual transform, e.g. `translate(5px, 0px)`.
    fn set_transform(&self, value: &str);

    /// Set the transition duration, e.g. `140ms`.
    fn set_transition_duration(&self, value: &str);
}

/// The bounding element; semantic drag events are dispatched on it.
pub trait ContainerElement: EventTarget<DragEvent> {
    /// Emit a non-bubbling event to the listeners registered under `name`.
    fn dispatch(&self, name: &str, event: &DragEvent);
}

/// Named listener registry with identity-based removal.
pub struct ListenerMap<E> {
    listeners: RefCell<Vec<(String, Listener<E>)>>,
}

impl<E> Default for ListenerMap<E> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<E> fmt::Debug for ListenerMap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.listeners.borrow().iter().map(|(n, _)| n.clone()).collect();
        f.debug_struct("ListenerMap").field("listeners", &names).finish()
    }
}

impl<E> ListenerMap<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, name: &str, listener: Listener<E>) {
        let mut listeners = self.listeners.borrow_mut();
        if listeners.iter().any(|(n, l)| n == name && Rc::ptr_eq(l, &listener)) {
            return;
        }
        listeners.push((name.to_string(), listener));
    }

    pub fn remove(&self, name: &str, listener: &Listener<E>) {
        self.listeners
            .borrow_mut()
            .retain(|(n, l)| !(n == name && Rc::ptr_eq(l, listener)));
    }

    /// Call every listener registered under `name`.
    ///
    /// Listeners may add or remove listeners while running. Listeners added
    /// during emission wait for the next one; listeners removed during
    /// emission are not called.
    pub fn emit(&self, name: &str, event: &E) {
        let matching: Vec<Listener<E>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in matching {
            if self.contains(name, &listener) {
                listener(event);
            }
        }
    }

    fn contains(&self, name: &str, listener: &Listener<E>) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|(n, l)| n == name && Rc::ptr_eq(l, listener))
    }

    /// Number of listeners registered under `name`.
    pub fn count(&self, name: &str) -> usize {
        self.listeners.borrow().iter().filter(|(n, _)| n == name).count()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

/// In-memory element for tests and headless hosts.
///
/// Usable both as a handle (pointer listeners, style writes) and as a
/// container (drag event listeners, dispatch).
#[derive(Debug, Default)]
pub struct MemoryElement {
    pointer: ListenerMap<PointerEvent>,
    drag: ListenerMap<DragEvent>,
    transform: RefCell<String>,
    transition_duration: RefCell<String>,
    dispatched: RefCell<Vec<String>>,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last transform written to the element.
    pub fn transform(&self) -> String {
        self.transform.borrow().clone()
    }

    /// Last transition duration written to the element.
    pub fn transition_duration(&self) -> String {
        self.transition_duration.borrow().clone()
    }

    /// Names of every event dispatched on this element, in order.
    pub fn dispatched(&self) -> Vec<String> {
        self.dispatched.borrow().clone()
    }

    /// Deliver a pointer event to this element's listeners.
    pub fn emit_pointer(&self, event: &PointerEvent) {
        self.pointer.emit(event.name(), event);
    }

    pub fn pointer_listener_count(&self, name: &str) -> usize {
        self.pointer.count(name)
    }

    pub fn drag_listener_count(&self, name: &str) -> usize {
        self.drag.count(name)
    }
}

impl EventTarget<PointerEvent> for MemoryElement {
    fn add_listener(&self, name: &str, listener: Listener<PointerEvent>) {
        self.pointer.add(name, listener);
    }

    fn remove_listener(&self, name: &str, listener: &Listener<PointerEvent>) {
        self.pointer.remove(name, listener);
    }
}

impl EventTarget<DragEvent> for MemoryElement {
    fn add_listener(&self, name: &str, listener: Listener<DragEvent>) {
        self.drag.add(name, listener);
    }

    fn remove_listener(&self, name: &str, listener: &Listener<DragEvent>) {
        self.drag.remove(name, listener);
    }
}

impl HandleElement for MemoryElement {
    fn set_transform(&self, value: &str) {
        *self.transform.borrow_mut() = value.to_string();
    }

    fn set_transition_duration(&self, value: &str) {
        *self.transition_duration.borrow_mut() = value.to_string();
    }
}

impl ContainerElement for MemoryElement {
    fn dispatch(&self, name: &str, event: &DragEvent) {
        self.dispatched.borrow_mut().push(name.to_string());
        self.drag.emit(name, event);
    }
}

/// In-memory global scope receiving pointer move/up listeners.
#[derive(Debug, Default)]
pub struct MemoryWindow {
    pointer: ListenerMap<PointerEvent>,
}

impl MemoryWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a pointer event to the window's listeners.
    pub fn emit_pointer(&self, event: &PointerEvent) {
        self.pointer.emit(event.name(), event);
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.pointer.count(name)
    }

    pub fn has_listeners(&self) -> bool {
        !self.pointer.is_empty()
    }
}

impl EventTarget<PointerEvent> for MemoryWindow {
    fn add_listener(&self, name: &str, listener: Listener<PointerEvent>) {
        self.pointer.add(name, listener);
    }

    fn remove_listener(&self, name: &str, listener: &Listener<PointerEvent>) {
        self.pointer.remove(name, listener);
    }
}
