//! The drag controller: pointer handling, clamped translation and snapping.

use crate::config::DragConfig;
use crate::dom::{ContainerElement, EventTarget, HandleElement, Listener};
use crate::events::{DragEvent, DragEventKind, HandleState};
use crate::geometry::{self, Coord, Edges};
use crate::pointer::{PointerEvent, PointerPhase, PointerScheme};
use crate::scheduler::{DeferredFlag, Scheduler};
use kurbo::{Point, Size, Vec2};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Platform services the controller depends on.
pub struct Host {
    /// Global scope receiving move/up listeners while a gesture is active.
    pub window: Rc<dyn EventTarget<PointerEvent>>,
    /// Runs the deferred dragging-flag updates.
    pub scheduler: Rc<dyn Scheduler>,
    /// Touch or mouse event names.
    pub scheme: PointerScheme,
}

/// Binds a handle's position to pointer input, constrained to its container.
///
/// Cloning yields another reference to the same controller. Semantic events
/// (`dragtranslate`, `dragended`, `dragsnapped`) are dispatched on the
/// container element; subscribe with [`DragController::on`].
///
/// All state is single-threaded and mutated only from the host's event turn.
#[derive(Clone)]
pub struct DragController {
    inner: Rc<Inner>,
}

struct Inner {
    state: RefCell<State>,
    dragging: DeferredFlag,
    window: Rc<dyn EventTarget<PointerEvent>>,
    scheme: PointerScheme,
    bound: BoundListeners,
}

struct State {
    /// `config.handle.position` is the current handle position.
    config: DragConfig,
    max: Vec2,
    /// Last pointer sample of the active gesture.
    point: Option<Point>,
    listening: bool,
}

impl State {
    fn position(&self) -> Point {
        self.config.handle.position
    }

    fn handle_state(&self) -> HandleState {
        let position = self.position();
        HandleState {
            position,
            size: self.config.handle.size,
            ratio: geometry::ratio_of(position, self.max),
        }
    }
}

/// Pointer listeners created once, so removal matches the added identity.
struct BoundListeners {
    start: Listener<PointerEvent>,
    moved: Listener<PointerEvent>,
    end: Listener<PointerEvent>,
}

impl BoundListeners {
    fn bind(weak: &Weak<Inner>) -> Self {
        Self {
            start: bind_handler(weak, Inner::on_pointer_start),
            moved: bind_handler(weak, Inner::on_pointer_move),
            end: bind_handler(weak, Inner::on_pointer_end),
        }
    }
}

fn bind_handler(weak: &Weak<Inner>, handler: fn(&Inner, &PointerEvent)) -> Listener<PointerEvent> {
    let weak = weak.clone();
    Rc::new(move |event: &PointerEvent| {
        if let Some(inner) = weak.upgrade() {
            handler(&*inner, event);
        }
    })
}

/// Maximum offset for a configuration, warning about geometry that cannot move.
fn max_offset_of(config: &DragConfig) -> Vec2 {
    if let Err(err) = config.validate() {
        log::warn!("degenerate drag geometry: {}", err);
    }
    config.max_offset()
}

fn px(value: f64) -> String {
    // `+ 0.0` normalizes negative zero
    format!("{}px", value + 0.0)
}

fn transform(position: Point) -> String {
    format!("translate({}, {})", px(position.x), px(position.y))
}

impl DragController {
    /// Create a controller and start listening for pointer-down on the handle.
    pub fn new(config: DragConfig, host: Host) -> Self {
        log::debug!("init {:?}", config);
        let Host {
            window,
            scheduler,
            scheme,
        } = host;
        let max = max_offset_of(&config);
        let inner = Rc::new_cyclic(|weak| Inner {
            state: RefCell::new(State {
                config,
                max,
                point: None,
                listening: false,
            }),
            dragging: DeferredFlag::new(scheduler, false),
            window,
            scheme,
            bound: BoundListeners::bind(weak),
        });
        let controller = Self { inner };
        controller.start_events();
        controller
    }

    /// Apply a new configuration, e.g. after the elements were resized.
    ///
    /// The maximum offset is recomputed; the current position is kept (the
    /// configured handle position is ignored) and may exceed the new bounds
    /// until the next translation clamps it.
    pub fn configure(&self, config: DragConfig) {
        self.inner.configure(config);
    }

    /// Re-measure container and handle without replacing the elements.
    pub fn resize(&self, container: Size, handle: Size) {
        let mut config = self.inner.state.borrow().config.clone();
        config.container.size = container;
        config.handle.size = handle;
        self.inner.configure(config);
    }

    /// Listen for pointer-down on the handle. Idempotent.
    pub fn start_events(&self) {
        self.inner.start_events();
    }

    /// Remove every listener this controller added and clear the dragging flag.
    pub fn stop_events(&self) {
        self.inner.stop_events();
    }

    pub fn on_pointer_start(&self, event: &PointerEvent) {
        self.inner.on_pointer_start(event);
    }

    pub fn on_pointer_move(&self, event: &PointerEvent) {
        self.inner.on_pointer_move(event);
    }

    pub fn on_pointer_end(&self, event: &PointerEvent) {
        self.inner.on_pointer_end(event);
    }

    /// Move the handle by a pixel delta.
    pub fn translate_by(&self, delta: Vec2) {
        self.inner.translate_by(delta);
    }

    /// Move the handle to `(x, y)`, clamped to the container.
    pub fn translate(&self, x: impl Into<Coord>, y: impl Into<Coord>) {
        self.inner.translate(x.into(), y.into());
    }

    /// Animate to `(x, y)` with a duration proportional to the distance.
    pub fn transition_to(&self, x: impl Into<Coord>, y: impl Into<Coord>) {
        self.inner.transition_to(x.into(), y.into());
    }

    /// Transition to the closest edge on each axis and dispatch `snapped`.
    pub fn snap(&self) {
        self.inner.snap();
    }

    /// Transition duration in milliseconds for travelling between two positions.
    pub fn duration_between(&self, from: Point, to: Point) -> f64 {
        let state = self.inner.state.borrow();
        geometry::transition_duration(from, to, state.max, state.config.options.slide_duration())
    }

    pub fn closest_edges(&self) -> Edges {
        self.inner.closest_edges()
    }

    /// Subscribe to one of the controller's events.
    pub fn on(&self, kind: DragEventKind, listener: Listener<DragEvent>) {
        self.inner.container().add_listener(&kind.event_name(), listener);
    }

    /// Unsubscribe a listener added with [`DragController::on`].
    pub fn off(&self, kind: DragEventKind, listener: &Listener<DragEvent>) {
        self.inner.container().remove_listener(&kind.event_name(), listener);
    }

    /// Dispatch an event on the container under its namespaced name.
    pub fn dispatch(&self, event: DragEvent) {
        self.inner.dispatch(event);
    }

    /// Whether a drag gesture is in progress. Taps never report `true`.
    pub fn is_dragging(&self) -> bool {
        self.inner.dragging.get()
    }

    pub fn is_listening(&self) -> bool {
        self.inner.state.borrow().listening
    }

    pub fn position(&self) -> Point {
        self.inner.state.borrow().position()
    }

    pub fn max_offset(&self) -> Vec2 {
        self.inner.state.borrow().max
    }

    pub fn ratio(&self) -> Vec2 {
        self.handle_state().ratio
    }

    pub fn handle_state(&self) -> HandleState {
        self.inner.state.borrow().handle_state()
    }

    pub fn slide_duration(&self) -> f64 {
        self.inner.state.borrow().config.options.slide_duration()
    }

    pub fn scheme(&self) -> PointerScheme {
        self.inner.scheme
    }
}

impl fmt::Debug for DragController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("DragController")
            .field("position", &state.position())
            .field("max", &state.max)
            .field("dragging", &self.inner.dragging.get())
            .field("listening", &state.listening)
            .finish()
    }
}

impl Inner {
    fn handle(&self) -> Rc<dyn HandleElement> {
        Rc::clone(&self.state.borrow().config.handle.element)
    }

    fn container(&self) -> Rc<dyn ContainerElement> {
        Rc::clone(&self.state.borrow().config.container.element)
    }

    fn configure(&self, mut config: DragConfig) {
        log::debug!("configure {:?}", config);
        let max = max_offset_of(&config);
        let (previous, listening) = {
            let mut state = self.state.borrow_mut();
            config.handle.position = state.position();
            let previous = std::mem::replace(&mut state.config, config);
            state.max = max;
            (previous.handle.element, state.listening)
        };

        let current = self.handle();
        if listening && !Rc::ptr_eq(&previous, &current) {
            let down = self.scheme.event_name(PointerPhase::Down);
            previous.remove_listener(down, &self.bound.start);
            current.add_listener(down, Rc::clone(&self.bound.start));
        }
    }

    fn start_events(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.listening {
                return;
            }
            state.listening = true;
        }
        log::debug!("setup events {:?}", self.scheme);
        self.handle().add_listener(
            self.scheme.event_name(PointerPhase::Down),
            Rc::clone(&self.bound.start),
        );
    }

    fn stop_events(&self) {
        let was_listening = std::mem::replace(&mut self.state.borrow_mut().listening, false);
        if was_listening {
            self.handle()
                .remove_listener(self.scheme.event_name(PointerPhase::Down), &self.bound.start);
        }
        self.detach_gesture();
        self.dragging.reset(false);
    }

    fn detach_gesture(&self) {
        self.state.borrow_mut().point = None;
        self.window
            .remove_listener(self.scheme.event_name(PointerPhase::Move), &self.bound.moved);
        self.window
            .remove_listener(self.scheme.event_name(PointerPhase::Up), &self.bound.end);
    }

    fn on_pointer_start(&self, event: &PointerEvent) {
        log::debug!("pointer start {:?}", event.source);
        let point = match event.page_point() {
            Ok(point) => point,
            Err(err) => {
                log::warn!("ignoring pointer start: {}", err);
                return;
            }
        };
        self.state.borrow_mut().point = Some(point);
        self.window.add_listener(
            self.scheme.event_name(PointerPhase::Move),
            Rc::clone(&self.bound.moved),
        );
        self.window.add_listener(
            self.scheme.event_name(PointerPhase::Up),
            Rc::clone(&self.bound.end),
        );
        self.dragging.set_deferred(true);
    }

    fn on_pointer_move(&self, event: &PointerEvent) {
        log::debug!("pointer move {:?}", event.source);
        event.prevent_default();
        let point = match event.page_point() {
            Ok(point) => point,
            Err(err) => {
                log::warn!("ignoring pointer move: {}", err);
                return;
            }
        };
        let previous = self.state.borrow_mut().point.replace(point).unwrap_or(point);
        self.set_duration(0.0);
        self.translate_by(point - previous);
    }

    fn on_pointer_end(&self, event: &PointerEvent) {
        log::debug!("pointer end {:?}", event.source);
        self.dragging.set_deferred(false);
        self.detach_gesture();
        self.dispatch(DragEvent::Ended(event.clone()));
    }

    fn translate_by(&self, delta: Vec2) {
        log::debug!("translate by {:?}", delta);
        let position = self.state.borrow().position();
        let target = position + delta;
        self.translate(Coord::Absolute(target.x), Coord::Absolute(target.y));
    }

    fn translate(&self, x: Coord, y: Coord) {
        log::debug!("translate {:?} {:?}", x, y);
        let (handle, snapshot) = {
            let mut state = self.state.borrow_mut();
            let mut target = geometry::resolve(x, y, state.max);
            if !(target.x.is_finite() && target.y.is_finite()) {
                log::warn!("ignoring non-finite translation to {:?}", target);
                let current = state.position();
                if !target.x.is_finite() {
                    target.x = current.x;
                }
                if !target.y.is_finite() {
                    target.y = current.y;
                }
            }
            let position = geometry::clamp_position(target, state.max);
            state.config.handle.position = position;
            (Rc::clone(&state.config.handle.element), state.handle_state())
        };
        handle.set_transform(&transform(snapshot.position));
        self.dispatch(DragEvent::Translate(snapshot));
    }

    fn transition_to(&self, x: Coord, y: Coord) {
        let (target, duration) = {
            let state = self.state.borrow();
            let target = geometry::clamp_position(geometry::resolve(x, y, state.max), state.max);
            let duration = geometry::transition_duration(
                state.position(),
                target,
                state.max,
                state.config.options.slide_duration(),
            );
            (target, duration)
        };
        self.set_duration(duration);
        self.translate(Coord::Absolute(target.x), Coord::Absolute(target.y));
    }

    fn snap(&self) {
        log::debug!("snap");
        let edges = self.closest_edges();
        self.transition_to(edges.x.into(), edges.y.into());
        self.dispatch(DragEvent::Snapped(edges));
    }

    fn closest_edges(&self) -> Edges {
        let state = self.state.borrow();
        geometry::closest_edges(state.position(), state.max)
    }

    fn set_duration(&self, ms: f64) {
        self.handle().set_transition_duration(&format!("{}ms", ms + 0.0));
    }

    fn dispatch(&self, event: DragEvent) {
        let name = event.name();
        self.container().dispatch(&name, &event);
        log::debug!("dispatched {}", name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContainerConfig, DragOptions, HandleConfig};
    use crate::dom::{MemoryElement, MemoryWindow};
    use crate::geometry::Edge;
    use crate::scheduler::ManualScheduler;
    use std::cell::Cell;

    struct Fixture {
        container: Rc<MemoryElement>,
        handle: Rc<MemoryElement>,
        window: Rc<MemoryWindow>,
        scheduler: Rc<ManualScheduler>,
        drag: DragController,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_scheme(PointerScheme::Touch)
        }

        fn with_scheme(scheme: PointerScheme) -> Self {
            let container = Rc::new(MemoryElement::new());
            let handle = Rc::new(MemoryElement::new());
            let window = Rc::new(MemoryWindow::new());
            let scheduler = Rc::new(ManualScheduler::new());
            let config = DragConfig::new(
                ContainerConfig::new(container.clone(), Size::new(400.0, 100.0)),
                HandleConfig::new(handle.clone(), Size::new(100.0, 100.0)),
            );
            let drag = DragController::new(
                config,
                Host {
                    window: window.clone(),
                    scheduler: scheduler.clone(),
                    scheme,
                },
            );
            Self {
                container,
                handle,
                window,
                scheduler,
                drag,
            }
        }

        fn start(&self, x: f64, y: f64) {
            self.handle.emit_pointer(&touch(PointerPhase::Down, x, y));
        }

        fn move_to(&self, x: f64, y: f64) {
            self.window.emit_pointer(&touch(PointerPhase::Move, x, y));
        }

        fn end(&self, x: f64, y: f64) {
            self.window.emit_pointer(&touch(PointerPhase::Up, x, y));
        }

        fn transform(&self) -> String {
            self.handle.transform()
        }

        fn count(&self, kind: DragEventKind) -> Rc<Cell<usize>> {
            let count = Rc::new(Cell::new(0));
            let counter = Rc::clone(&count);
            self.drag
                .on(kind, Rc::new(move |_: &DragEvent| counter.set(counter.get() + 1)));
            count
        }
    }

    fn touch(phase: PointerPhase, x: f64, y: f64) -> PointerEvent {
        PointerEvent::touch(phase, vec![Point::new(x, y)])
    }

    #[test]
    fn test_moves_with_pointer() {
        let f = Fixture::new();
        let (mut x, y) = (10.0, 0.0);

        f.start(x, y);
        f.move_to(x, y);
        for expected in ["5px", "10px", "15px", "20px"] {
            x += 5.0;
            f.move_to(x, y);
            assert_eq!(f.transform(), format!("translate({}, 0px)", expected));
        }
        f.end(x, y);
        assert_eq!(f.drag.position(), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_stays_within_container() {
        let f = Fixture::new();
        let (mut x, mut y) = (10.0, 0.0);

        f.start(x, y);
        f.move_to(x, y);
        x += 5.0;
        f.move_to(x, y);
        assert_eq!(f.transform(), "translate(5px, 0px)");
        x += 5.0;
        f.move_to(x, y);
        assert_eq!(f.transform(), "translate(10px, 0px)");
        x += 400.0;
        y += 100.0;
        f.move_to(x, y);
        assert_eq!(f.transform(), "translate(300px, 0px)");
        f.end(x, y);
    }

    #[test]
    fn test_position_always_clamped() {
        let f = Fixture::new();
        for x in [-500.0, -1.0, 0.0, 42.5, 299.9, 300.0, 301.0, 1e9] {
            for y in [-10.0, 0.0, 10.0] {
                f.drag.translate(x, y);
                let position = f.drag.position();
                assert!((0.0..=300.0).contains(&position.x));
                assert_eq!(position.y, 0.0);
                assert_eq!(f.transform(), transform(position));
            }
        }
    }

    #[test]
    fn test_move_suppresses_default_and_duration() {
        let f = Fixture::new();
        f.drag.transition_to(Coord::Ratio(1.0), 0.0);
        assert_ne!(f.handle.transition_duration(), "0ms");

        f.start(0.0, 0.0);
        let event = touch(PointerPhase::Move, 5.0, 0.0);
        f.window.emit_pointer(&event);
        assert!(event.is_default_prevented());
        assert_eq!(f.handle.transition_duration(), "0ms");
    }

    #[test]
    fn test_ended_fires_once_per_gesture() {
        let f = Fixture::new();
        let ended = f.count(DragEventKind::Ended);

        f.start(10.0, 0.0);
        f.move_to(20.0, 0.0);
        f.move_to(30.0, 0.0);
        f.end(30.0, 0.0);
        assert_eq!(ended.get(), 1);

        // Listeners are detached after the gesture
        f.end(30.0, 0.0);
        assert_eq!(ended.get(), 1);
        assert!(!f.window.has_listeners());
    }

    #[test]
    fn test_translate_fires_per_move() {
        let f = Fixture::new();
        let translated = f.count(DragEventKind::Translate);

        f.start(10.0, 0.0);
        f.move_to(20.0, 0.0);
        f.move_to(30.0, 0.0);
        f.end(30.0, 0.0);
        assert_eq!(translated.get(), 2);
        assert_eq!(
            f.container.dispatched(),
            vec!["dragtranslate", "dragtranslate", "dragended"]
        );
    }

    #[test]
    fn test_ended_carries_end_event() {
        let f = Fixture::new();
        let seen: Rc<RefCell<Option<DragEvent>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&seen);
        f.drag.on(
            DragEventKind::Ended,
            Rc::new(move |event: &DragEvent| *slot.borrow_mut() = Some(event.clone())),
        );

        f.start(10.0, 0.0);
        f.end(12.0, 3.0);
        assert_eq!(
            *seen.borrow(),
            Some(DragEvent::Ended(touch(PointerPhase::Up, 12.0, 3.0)))
        );
    }

    #[test]
    fn test_translate_to_position() {
        let f = Fixture::new();
        f.drag.translate(10.0, 0.0);
        assert_eq!(f.transform(), "translate(10px, 0px)");
    }

    #[test]
    fn test_ratios_scale_max_offset() {
        let f = Fixture::new();
        f.drag.translate(Coord::Ratio(0.5), 0.0);
        assert_eq!(f.transform(), "translate(150px, 0px)");

        f.drag.translate("1.0".parse::<Coord>().unwrap(), 0.0);
        assert_eq!(f.transform(), "translate(300px, 0px)");

        f.drag.translate(Coord::Ratio(2.0), Coord::Ratio(1.0));
        assert_eq!(f.transform(), "translate(300px, 0px)");
    }

    #[test]
    fn test_translate_payload() {
        let f = Fixture::new();
        let seen: Rc<RefCell<Vec<HandleState>>> = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        f.drag.on(
            DragEventKind::Translate,
            Rc::new(move |event: &DragEvent| {
                if let DragEvent::Translate(state) = event {
                    log.borrow_mut().push(*state);
                }
            }),
        );

        f.drag.translate(150.0, 0.0);
        let states = seen.borrow();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].position, Point::new(150.0, 0.0));
        assert_eq!(states[0].size, Size::new(100.0, 100.0));
        assert!((states[0].ratio.x - 0.5).abs() < f64::EPSILON);
        // No travel on y, so the ratio is zero rather than NaN
        assert_eq!(states[0].ratio.y, 0.0);
    }

    #[test]
    fn test_snap_to_near_edge() {
        let f = Fixture::new();
        let snapped: Rc<RefCell<Vec<Edges>>> = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&snapped);
        f.drag.on(
            DragEventKind::Snapped,
            Rc::new(move |event: &DragEvent| {
                if let DragEvent::Snapped(edges) = event {
                    log.borrow_mut().push(*edges);
                }
            }),
        );

        f.drag.translate(Coord::Ratio(0.25), 0.0);
        assert_eq!(f.transform(), "translate(75px, 0px)");

        f.drag.snap();
        assert_eq!(f.transform(), "translate(0px, 0px)");
        assert_eq!(f.handle.transition_duration(), "35ms");
        assert_eq!(*snapped.borrow(), vec![Edges::new(Edge::Near, Edge::Near)]);
    }

    #[test]
    fn test_snap_to_far_edge() {
        let f = Fixture::new();
        f.drag.translate(Coord::Ratio(0.75), 0.0);
        assert_eq!(f.drag.closest_edges(), Edges::new(Edge::Far, Edge::Near));

        f.drag.snap();
        assert_eq!(f.transform(), "translate(300px, 0px)");
        assert_eq!(f.drag.ratio(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_full_span_transition_takes_slide_duration() {
        let f = Fixture::new();
        f.drag.transition_to(Coord::Ratio(1.0), 0.0);
        assert_eq!(f.handle.transition_duration(), "140ms");
        assert_eq!(
            f.drag.duration_between(Point::new(300.0, 0.0), Point::new(150.0, 0.0)),
            70.0
        );
    }

    #[test]
    fn test_tap_is_not_a_drag() {
        let f = Fixture::new();

        f.start(10.0, 0.0);
        f.move_to(10.0, 0.0);
        f.end(10.0, 0.0);
        assert!(!f.drag.is_dragging(), "not flagged dragging");

        f.scheduler.tick();
        assert!(!f.drag.is_dragging());
    }

    #[test]
    fn test_drag_is_flagged_until_after_release() {
        let f = Fixture::new();
        let mut x = 10.0;

        f.start(x, 0.0);
        for _ in 0..3 {
            x += 5.0;
            f.move_to(x, 0.0);
            f.scheduler.tick();
            assert!(f.drag.is_dragging());
        }
        f.end(x, 0.0);
        assert!(f.drag.is_dragging());

        f.scheduler.tick();
        assert!(!f.drag.is_dragging());
    }

    #[test]
    fn test_ended_listener_sees_gesture_state() {
        let f = Fixture::new();
        let observed = Rc::new(RefCell::new(Vec::new()));
        let (log, drag) = (Rc::clone(&observed), f.drag.clone());
        f.drag.on(
            DragEventKind::Ended,
            Rc::new(move |_: &DragEvent| log.borrow_mut().push(drag.is_dragging())),
        );

        // Tap
        f.start(10.0, 0.0);
        f.end(10.0, 0.0);
        f.scheduler.tick();

        // Drag
        f.start(10.0, 0.0);
        f.scheduler.tick();
        f.move_to(40.0, 0.0);
        f.end(40.0, 0.0);
        f.scheduler.tick();

        assert_eq!(*observed.borrow(), vec![false, true]);
    }

    #[test]
    fn test_reconfigure_keeps_position() {
        let f = Fixture::new();
        f.drag.translate(200.0, 0.0);

        f.drag.resize(Size::new(250.0, 100.0), Size::new(100.0, 100.0));
        assert_eq!(f.drag.max_offset(), Vec2::new(150.0, 0.0));
        assert_eq!(f.drag.position(), Point::new(200.0, 0.0));

        f.drag.translate_by(Vec2::ZERO);
        assert_eq!(f.transform(), "translate(150px, 0px)");
    }

    #[test]
    fn test_reconfigure_moves_listener_to_new_handle() {
        let f = Fixture::new();
        let replacement = Rc::new(MemoryElement::new());
        let config = DragConfig::new(
            ContainerConfig::new(f.container.clone(), Size::new(400.0, 100.0)),
            HandleConfig::new(replacement.clone(), Size::new(50.0, 50.0)),
        )
        .with_options(DragOptions { slide_duration: 200.0 });

        f.drag.configure(config);
        assert_eq!(f.handle.pointer_listener_count("touchstart"), 0);
        assert_eq!(replacement.pointer_listener_count("touchstart"), 1);
        assert_eq!(f.drag.max_offset(), Vec2::new(350.0, 50.0));
        assert_eq!(f.drag.slide_duration(), 200.0);
    }

    #[test]
    fn test_stop_events_detaches_everything() {
        let f = Fixture::new();
        assert_eq!(f.handle.pointer_listener_count("touchstart"), 1);

        f.start(10.0, 0.0);
        assert_eq!(f.window.listener_count("touchmove"), 1);
        assert_eq!(f.window.listener_count("touchend"), 1);

        f.drag.stop_events();
        assert!(!f.drag.is_listening());
        assert_eq!(f.handle.pointer_listener_count("touchstart"), 0);
        assert!(!f.window.has_listeners());
        assert_eq!(f.scheduler.pending(), 0);

        // Idempotent start
        f.drag.start_events();
        f.drag.start_events();
        assert_eq!(f.handle.pointer_listener_count("touchstart"), 1);
    }

    #[test]
    fn test_off_unsubscribes() {
        let f = Fixture::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let listener: Listener<DragEvent> = Rc::new(move |_: &DragEvent| counter.set(counter.get() + 1));

        f.drag.on(DragEventKind::Translate, Rc::clone(&listener));
        f.drag.translate(1.0, 0.0);
        f.drag.off(DragEventKind::Translate, &listener);
        f.drag.translate(2.0, 0.0);

        assert_eq!(count.get(), 1);
        assert_eq!(f.container.drag_listener_count("dragtranslate"), 0);
    }

    #[test]
    fn test_listener_removed_during_dispatch_is_skipped() {
        let f = Fixture::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let second: Listener<DragEvent> = Rc::new(move |_: &DragEvent| counter.set(counter.get() + 1));

        let (drag, target) = (f.drag.clone(), Rc::clone(&second));
        f.drag.on(
            DragEventKind::Translate,
            Rc::new(move |_: &DragEvent| drag.off(DragEventKind::Translate, &target)),
        );
        f.drag.on(DragEventKind::Translate, second);

        f.drag.translate(10.0, 0.0);
        assert_eq!(count.get(), 0);
        assert_eq!(f.container.drag_listener_count("dragtranslate"), 1);
    }

    #[test]
    fn test_non_finite_translation_keeps_axis() {
        let f = Fixture::new();
        f.drag.translate(50.0, 0.0);

        f.drag.translate(f64::NAN, f64::INFINITY);
        assert_eq!(f.drag.position(), Point::new(50.0, 0.0));

        f.drag.translate_by(Vec2::new(f64::NEG_INFINITY, 0.0));
        assert_eq!(f.transform(), "translate(50px, 0px)");

        f.drag.translate(Coord::Ratio(f64::NAN), 0.0);
        assert_eq!(f.drag.position(), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_mouse_scheme() {
        let f = Fixture::with_scheme(PointerScheme::Mouse);
        assert_eq!(f.handle.pointer_listener_count("mousedown"), 1);

        f.handle
            .emit_pointer(&PointerEvent::mouse(PointerPhase::Down, Point::new(0.0, 0.0)));
        f.window
            .emit_pointer(&PointerEvent::mouse(PointerPhase::Move, Point::new(25.0, 0.0)));
        f.window
            .emit_pointer(&PointerEvent::mouse(PointerPhase::Up, Point::new(25.0, 0.0)));

        assert_eq!(f.transform(), "translate(25px, 0px)");
        assert!(!f.window.has_listeners());
    }

    #[test]
    fn test_touch_without_points_is_ignored() {
        let f = Fixture::new();
        f.handle.emit_pointer(&PointerEvent::touch(PointerPhase::Down, vec![]));
        assert!(!f.window.has_listeners());
        assert_eq!(f.scheduler.pending(), 0);
    }

    #[test]
    fn test_listener_may_reenter_controller() {
        let f = Fixture::new();
        let drag = f.drag.clone();
        f.drag
            .on(DragEventKind::Ended, Rc::new(move |_: &DragEvent| drag.snap()));

        f.start(0.0, 0.0);
        f.move_to(200.0, 0.0);
        f.end(200.0, 0.0);
        assert_eq!(f.transform(), "translate(300px, 0px)");
    }

    #[test]
    fn test_dropped_controller_stops_handling() {
        let f = Fixture::new();
        let Fixture {
            handle,
            window,
            drag,
            ..
        } = f;
        drop(drag);

        // The bound listener outlives the controller but does nothing
        handle.emit_pointer(&touch(PointerPhase::Down, 0.0, 0.0));
        assert!(!window.has_listeners());
    }
}
