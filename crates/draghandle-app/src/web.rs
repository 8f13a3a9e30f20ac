//! WebAssembly entry point and DOM bindings.

use crate::Switch;
use draghandle_core::{
    ContainerConfig, ContainerElement, DragConfig, DragController, DragError, DragEvent,
    EventTarget, HandleConfig, HandleElement, Host, Listener, ListenerMap, PointerEvent,
    PointerScheme, Scheduler, Task, TaskId,
};
use kurbo::{Point, Size};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Event, HtmlElement, MouseEvent, TouchEvent};

type DomCallback = Closure<dyn FnMut(Event)>;

fn dom_error(err: JsValue) -> DragError {
    DragError::Dom(format!("{:?}", err))
}

/// Convert a DOM touch or mouse event into a core pointer event.
fn pointer_event_from_dom(event: &Event) -> Option<PointerEvent> {
    let (scheme, phase) = PointerScheme::parse_event_name(&event.type_())?;
    let pointer = match scheme {
        PointerScheme::Touch => {
            let list = event.unchecked_ref::<TouchEvent>().touches();
            let touches = (0..list.length())
                .filter_map(|i| list.get(i))
                .map(|touch| Point::new(f64::from(touch.page_x()), f64::from(touch.page_y())))
                .collect();
            PointerEvent::touch(phase, touches)
        }
        PointerScheme::Mouse => {
            let mouse = event.unchecked_ref::<MouseEvent>();
            PointerEvent::mouse(
                phase,
                Point::new(f64::from(mouse.page_x()), f64::from(mouse.page_y())),
            )
        }
    };
    Some(pointer)
}

/// Forwards DOM pointer events on one target to core listeners.
struct PointerBridge {
    target: web_sys::EventTarget,
    entries: RefCell<Vec<(String, Listener<PointerEvent>, DomCallback)>>,
    // Removed callbacks may still be on the stack; drop them on the next add.
    retired: RefCell<Vec<DomCallback>>,
}

impl PointerBridge {
    fn new(target: web_sys::EventTarget) -> Self {
        Self {
            target,
            entries: RefCell::new(Vec::new()),
            retired: RefCell::new(Vec::new()),
        }
    }

    fn add(&self, name: &str, listener: Listener<PointerEvent>) {
        self.retired.borrow_mut().clear();
        let registered = self
            .entries
            .borrow()
            .iter()
            .any(|(n, l, _)| n == name && Rc::ptr_eq(l, &listener));
        if registered {
            return;
        }

        let forward = Rc::clone(&listener);
        let callback = DomCallback::new(move |event: Event| {
            if let Some(pointer) = pointer_event_from_dom(&event) {
                forward(&pointer);
                if pointer.is_default_prevented() {
                    event.prevent_default();
                }
            }
        });
        if let Err(err) = self
            .target
            .add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
        {
            log::warn!("{}", dom_error(err));
            return;
        }
        self.entries
            .borrow_mut()
            .push((name.to_string(), listener, callback));
    }

    fn remove(&self, name: &str, listener: &Listener<PointerEvent>) {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            entries
                .iter()
                .position(|(n, l, _)| n == name && Rc::ptr_eq(l, listener))
                .map(|index| entries.remove(index))
        };
        if let Some((name, _, callback)) = removed {
            if let Err(err) = self
                .target
                .remove_event_listener_with_callback(&name, callback.as_ref().unchecked_ref())
            {
                log::warn!("{}", dom_error(err));
            }
            self.retired.borrow_mut().push(callback);
        }
    }
}

/// An `HtmlElement` usable as drag handle or container.
pub struct DomElement {
    element: HtmlElement,
    pointer: PointerBridge,
    drag: ListenerMap<DragEvent>,
}

impl DomElement {
    pub fn new(element: HtmlElement) -> Self {
        let target: web_sys::EventTarget = element.clone().into();
        Self {
            element,
            pointer: PointerBridge::new(target),
            drag: ListenerMap::new(),
        }
    }

    /// Rendered size of the element.
    pub fn size(&self) -> Size {
        Size::new(
            f64::from(self.element.offset_width()),
            f64::from(self.element.offset_height()),
        )
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(err) = self.element.style().set_property(property, value) {
            log::warn!("{}", dom_error(err));
        }
    }

    /// Fire a non-bubbling `CustomEvent` for script listeners.
    fn dispatch_custom(&self, name: &str, event: &DragEvent) -> Result<(), DragError> {
        let detail = serde_wasm_bindgen::to_value(event)
            .map_err(|err| DragError::Dom(err.to_string()))?;
        let init = CustomEventInit::new();
        init.set_bubbles(false);
        init.set_detail(&detail);
        let custom = CustomEvent::new_with_event_init_dict(name, &init).map_err(dom_error)?;
        self.element.dispatch_event(&custom).map_err(dom_error)?;
        Ok(())
    }
}

impl EventTarget<PointerEvent> for DomElement {
    fn add_listener(&self, name: &str, listener: Listener<PointerEvent>) {
        self.pointer.add(name, listener);
    }

    fn remove_listener(&self, name: &str, listener: &Listener<PointerEvent>) {
        self.pointer.remove(name, listener);
    }
}

impl EventTarget<DragEvent> for DomElement {
    fn add_listener(&self, name: &str, listener: Listener<DragEvent>) {
        self.drag.add(name, listener);
    }

    fn remove_listener(&self, name: &str, listener: &Listener<DragEvent>) {
        self.drag.remove(name, listener);
    }
}

impl HandleElement for DomElement {
    fn set_transform(&self, value: &str) {
        self.set_style("transform", value);
    }

    fn set_transition_duration(&self, value: &str) {
        self.set_style("transition-duration", value);
    }
}

impl ContainerElement for DomElement {
    fn dispatch(&self, name: &str, event: &DragEvent) {
        self.drag.emit(name, event);
        if let Err(err) = self.dispatch_custom(name, event) {
            log::warn!("failed to dispatch {}: {}", name, err);
        }
    }
}

/// The browser window as the global pointer target.
pub struct DomWindow {
    pointer: PointerBridge,
}

impl DomWindow {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            pointer: PointerBridge::new(window.into()),
        }
    }
}

impl EventTarget<PointerEvent> for DomWindow {
    fn add_listener(&self, name: &str, listener: Listener<PointerEvent>) {
        self.pointer.add(name, listener);
    }

    fn remove_listener(&self, name: &str, listener: &Listener<PointerEvent>) {
        self.pointer.remove(name, listener);
    }
}

type TimerCallback = Closure<dyn FnMut()>;

/// Scheduler backed by `setTimeout(fn, 0)`.
pub struct TimeoutScheduler {
    window: web_sys::Window,
    next_id: Cell<u64>,
    timers: Rc<RefCell<HashMap<TaskId, (i32, TimerCallback)>>>,
    retired: Rc<RefCell<Vec<TimerCallback>>>,
}

impl TimeoutScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            next_id: Cell::new(0),
            timers: Rc::new(RefCell::new(HashMap::new())),
            retired: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl Scheduler for TimeoutScheduler {
    fn defer(&self, task: Task) -> TaskId {
        self.retired.borrow_mut().clear();
        let id = TaskId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let timers = Rc::clone(&self.timers);
        let retired = Rc::clone(&self.retired);
        let mut task = Some(task);
        let callback = TimerCallback::new(move || {
            if let Some((_, callback)) = timers.borrow_mut().remove(&id) {
                retired.borrow_mut().push(callback);
            }
            if let Some(task) = task.take() {
                task();
            }
        });

        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), 0)
        {
            Ok(handle) => {
                self.timers.borrow_mut().insert(id, (handle, callback));
            }
            Err(err) => log::warn!("{}", dom_error(err)),
        }
        id
    }

    fn cancel(&self, id: TaskId) {
        if let Some((handle, _callback)) = self.timers.borrow_mut().remove(&id) {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// A switch bound to two DOM elements, exported to JavaScript.
#[wasm_bindgen]
pub struct WebSwitch {
    container: Rc<DomElement>,
    handle: Rc<DomElement>,
    switch: Switch,
}

#[wasm_bindgen]
impl WebSwitch {
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, handle: HtmlElement, checked: bool) -> Result<WebSwitch, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let touch_supported = js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart")).unwrap_or(false);

        let container = Rc::new(DomElement::new(container));
        let handle = Rc::new(DomElement::new(handle));
        let config = DragConfig::new(
            ContainerConfig::new(container.clone(), container.size()),
            HandleConfig::new(handle.clone(), handle.size()),
        );
        let drag = DragController::new(
            config,
            Host {
                window: Rc::new(DomWindow::new(window.clone())),
                scheduler: Rc::new(TimeoutScheduler::new(window)),
                scheme: PointerScheme::detect(touch_supported),
            },
        );

        Ok(WebSwitch {
            container,
            handle,
            switch: Switch::new(drag, checked),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn checked(&self) -> bool {
        self.switch.checked()
    }

    #[wasm_bindgen(setter)]
    pub fn set_checked(&self, checked: bool) {
        self.switch.set_checked(checked);
    }

    pub fn toggle(&self) {
        self.switch.toggle();
    }

    /// Re-measure the elements, e.g. after an orientation change.
    pub fn resize(&self) {
        self.switch.drag().resize(self.container.size(), self.handle.size());
    }

    pub fn destroy(&self) {
        self.switch.destroy();
    }
}

/// Initialize logging for the WASM module.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }

    log::info!("DragHandle (WASM) ready");
}
