//! The interactive sheet viewport: binds the DOM pointer/wheel stream to the
//! gesture engine and renders the current sheet plus the swipe neighbor
//! panes.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{PointerEvent, WheelEvent};

use sheetview_core::{
    Bounds, PaneOffsets, PointerId, PointerInput, PointerKind, SheetId, SwipeDirection, ViewState,
    ViewportEngine, ViewportHost,
};

use crate::dom::ListenerScope;
use crate::state::AppState;
use crate::storage;
use crate::types::SheetRecord;

/// Signals the engine writes through the host; the view reads them.
#[derive(Clone, Copy)]
struct ViewportSignals {
    view: RwSignal<ViewState>,
    offsets: RwSignal<PaneOffsets>,
    swipe_active: RwSignal<bool>,
    prev_sheet: RwSignal<Option<SheetRecord>>,
    next_sheet: RwSignal<Option<SheetRecord>>,
}

impl ViewportSignals {
    fn new() -> Self {
        Self {
            view: RwSignal::new(ViewState::default()),
            offsets: RwSignal::new(PaneOffsets::default()),
            swipe_active: RwSignal::new(false),
            prev_sheet: RwSignal::new(None),
            next_sheet: RwSignal::new(None),
        }
    }
}

/// Engine plus its browser host, shared between event handlers, effects, and
/// queued animation-frame callbacks.
struct Viewport {
    engine: RefCell<ViewportEngine>,
    host: RefCell<BrowserHost>,
}

impl Viewport {
    fn new(
        state: AppState,
        signals: ViewportSignals,
        container: NodeRef<leptos::html::Div>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Viewport>| Viewport {
            engine: RefCell::new(ViewportEngine::new()),
            host: RefCell::new(BrowserHost {
                viewport: weak.clone(),
                state,
                signals,
                container,
            }),
        })
    }

    fn with_engine<R>(&self, f: impl FnOnce(&mut ViewportEngine, &mut BrowserHost) -> R) -> R {
        let mut host = self.host.borrow_mut();
        f(&mut self.engine.borrow_mut(), &mut host)
    }

    fn tick(self: Rc<Self>) {
        self.with_engine(|engine, host| engine.on_frame(host));
    }
}

/// [`ViewportHost`] over the DOM: transforms land in signals, frames go
/// through `requestAnimationFrame`, neighbors come from the sheet collection.
struct BrowserHost {
    viewport: Weak<Viewport>,
    state: AppState,
    signals: ViewportSignals,
    container: NodeRef<leptos::html::Div>,
}

impl ViewportHost for BrowserHost {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn request_frame(&mut self) {
        let Some(viewport) = self.viewport.upgrade() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move || viewport.tick());
        if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {err:?}");
        }
    }

    fn apply_transform(&mut self, state: ViewState) {
        self.signals.view.set(state);
    }

    fn show_swipe_panes(&mut self) {
        self.signals.swipe_active.set(true);
    }

    fn set_pane_offsets(&mut self, offsets: PaneOffsets) {
        self.signals.offsets.set(offsets);
    }

    fn clear_swipe_panes(&mut self) {
        self.signals.swipe_active.set(false);
        self.signals.offsets.set(PaneOffsets::default());
        self.signals.prev_sheet.set(None);
        self.signals.next_sheet.set(None);
    }

    fn request_neighbor(&mut self, direction: SwipeDirection) {
        // Resolved on the next task so the engine call that requested it has
        // fully unwound first.
        let Some(viewport) = self.viewport.upgrade() else {
            return;
        };
        let state = self.state;
        wasm_bindgen_futures::spawn_local(async move {
            let id = state.neighbor_sheet(direction).map(|s| SheetId(s.id));
            viewport.with_engine(|engine, host| engine.neighbor_ready(direction, id, host));
        });
    }

    fn set_neighbor_pane(&mut self, direction: SwipeDirection, sheet: Option<SheetId>) {
        let record = sheet.and_then(|id| self.state.sheet_by_id(id.0));
        let slot = match direction {
            SwipeDirection::Previous => self.signals.prev_sheet,
            SwipeDirection::Next => self.signals.next_sheet,
        };
        slot.set(record);
    }

    fn capture_pointer(&mut self, id: PointerId) -> bool {
        let Some(container) = self.container.get_untracked() else {
            return false;
        };
        match container.set_pointer_capture(id.0) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("pointer capture refused for {}: {err:?}", id.0);
                false
            }
        }
    }

    fn release_pointer(&mut self, id: PointerId) {
        let Some(container) = self.container.get_untracked() else {
            return;
        };
        if let Err(err) = container.release_pointer_capture(id.0) {
            log::debug!("pointer capture release failed for {}: {err:?}", id.0);
        }
    }

    fn notify_selected(&mut self, direction: Option<SwipeDirection>) {
        match direction {
            Some(dir) => self.state.step(dir),
            None => log::debug!("swipe settled without changing sheets"),
        }
    }

    fn gestures_locked(&self) -> bool {
        self.state.picker_open.get_untracked() || self.state.menu_drag_active.get_untracked()
    }
}

fn local_point(
    container: NodeRef<leptos::html::Div>,
    client_x: f64,
    client_y: f64,
) -> Option<(f64, f64)> {
    let el = container.get_untracked()?;
    let rect = el.get_bounding_client_rect();
    Some((client_x - rect.left(), client_y - rect.top()))
}

/// True when the event landed inside an element opted out of tap-zoom.
fn tap_zoom_exempt(ev: &PointerEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest("[data-no-tap-zoom]").ok().flatten())
        .is_some()
}

fn push_dimensions(
    viewport: &Rc<Viewport>,
    state: &AppState,
    container: NodeRef<leptos::html::Div>,
) {
    let Some(el) = container.get_untracked() else {
        return;
    };
    let Some(sheet) = state.current_sheet_untracked() else {
        return;
    };
    let rect = el.get_bounding_client_rect();
    viewport.with_engine(|engine, host| {
        engine.set_dimensions(
            Bounds::new(sheet.width, sheet.height),
            Bounds::new(rect.width(), rect.height()),
            host,
        );
    });
}

#[component]
pub fn SheetViewport() -> impl IntoView {
    let state = expect_context::<AppState>();
    let container = NodeRef::<leptos::html::Div>::new();
    let signals = ViewportSignals::new();
    let viewport = Viewport::new(state, signals, container);

    // Persisting the pre-restore default would clobber the saved view, so
    // hold off until the first restore has happened.
    let restored = Rc::new(Cell::new(false));
    let last_index: Rc<Cell<Option<usize>>> = Rc::new(Cell::new(None));

    // Measure and (on sheet change) restore the persisted view.
    Effect::new({
        let viewport = viewport.clone();
        let restored = restored.clone();
        let last_index = last_index.clone();
        move || {
            let index = state.current_index.get();
            state.sheets.track();
            if container.get().is_none() {
                return;
            }
            let Some(sheet) = state.current_sheet_untracked() else {
                return;
            };
            let switched = last_index.replace(Some(index)) != Some(index);
            push_dimensions(&viewport, &state, container);
            if switched {
                viewport.with_engine(|engine, host| {
                    engine.restore_view_state(storage::load_view_state(sheet.id), host)
                });
                restored.set(true);
            }
        }
    });

    // Persist the view whenever it changes.
    Effect::new({
        let restored = restored.clone();
        move || {
            let view = signals.view.get();
            if !restored.get() {
                return;
            }
            if let Some(sheet) = state.current_sheet_untracked() {
                storage::save_view_state(sheet.id, &view);
            }
        }
    });

    // Swipe eligibility follows the collection size (it wraps, so every sheet
    // has neighbors once there are two).
    Effect::new({
        let viewport = viewport.clone();
        move || {
            let count = state.sheets.with(|sheets| sheets.len());
            state.current_index.track();
            let has_neighbors = count > 1;
            viewport
                .engine
                .borrow_mut()
                .set_neighbor_availability(has_neighbors, has_neighbors);
        }
    });

    // Opening the picker or grabbing the sidebar handle cancels any gesture.
    Effect::new({
        let viewport = viewport.clone();
        move || {
            let locked = state.picker_open.get() || state.menu_drag_active.get();
            if locked {
                viewport.with_engine(|engine, host| engine.interrupt(host));
            }
        }
    });

    // Toolbar fit button.
    Effect::new({
        let viewport = viewport.clone();
        move || {
            if state.reset_view_signal.get() > 0 {
                viewport.with_engine(|engine, host| engine.reset_view(host));
            }
        }
    });

    let mut listeners = web_sys::window().map(|w| ListenerScope::new(w.into()));
    if let Some(scope) = listeners.as_mut() {
        let viewport = viewport.clone();
        scope.listen("resize", move |_| push_dimensions(&viewport, &state, container));
    }
    on_cleanup({
        let cleanup = send_wrapper::SendWrapper::new({
            let viewport = viewport.clone();
            move || {
                viewport.with_engine(|engine, host| engine.teardown(host));
                drop(listeners);
            }
        });
        move || cleanup.take()()
    });

    let on_pointer_down = {
        let viewport = viewport.clone();
        move |ev: PointerEvent| {
            ev.prevent_default();
            let Some((x, y)) = local_point(container, ev.client_x() as f64, ev.client_y() as f64)
            else {
                return;
            };
            let input = PointerInput {
                id: PointerId(ev.pointer_id()),
                kind: PointerKind::from_pointer_type(&ev.pointer_type()),
                x,
                y,
                tap_zoom_exempt: tap_zoom_exempt(&ev),
            };
            viewport.with_engine(|engine, host| engine.pointer_down(input, host));
        }
    };
    let on_pointer_move = {
        let viewport = viewport.clone();
        move |ev: PointerEvent| {
            let Some((x, y)) = local_point(container, ev.client_x() as f64, ev.client_y() as f64)
            else {
                return;
            };
            viewport
                .with_engine(|engine, host| engine.pointer_move(PointerId(ev.pointer_id()), x, y, host));
        }
    };
    let on_pointer_up = {
        let viewport = viewport.clone();
        move |ev: PointerEvent| {
            let Some((x, y)) = local_point(container, ev.client_x() as f64, ev.client_y() as f64)
            else {
                return;
            };
            viewport
                .with_engine(|engine, host| engine.pointer_up(PointerId(ev.pointer_id()), x, y, host));
        }
    };
    let on_pointer_cancel = {
        let viewport = viewport.clone();
        move |ev: PointerEvent| {
            viewport.with_engine(|engine, host| engine.pointer_cancel(PointerId(ev.pointer_id()), host));
        }
    };
    let on_wheel = {
        let viewport = viewport.clone();
        move |ev: WheelEvent| {
            ev.prevent_default();
            let Some((x, y)) = local_point(container, ev.client_x() as f64, ev.client_y() as f64)
            else {
                return;
            };
            viewport.with_engine(|engine, host| engine.wheel(ev.delta_y(), x, y, host));
        }
    };

    view! {
        <div
            class="sheet-viewport"
            node_ref=container
            style="position: relative; overflow: hidden; touch-action: none; width: 100%; height: 100%;"
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointercancel=on_pointer_cancel
            on:wheel=on_wheel
        >
            {neighbor_pane(signals, SwipeDirection::Previous)}
            <div
                class="pane pane-current"
                style:transform=move || {
                    format!("translate3d({}px, 0px, 0px)", signals.offsets.get().current)
                }
            >
                <div
                    class="sheet-content"
                    style:transform=move || {
                        let v = signals.view.get();
                        format!(
                            "translate({}px, {}px) scale({})",
                            v.translate_x, v.translate_y, v.scale
                        )
                    }
                    style:transform-origin="0 0"
                    style:width=move || {
                        state.current_sheet().map(|s| format!("{}px", s.width)).unwrap_or_default()
                    }
                    style:height=move || {
                        state.current_sheet().map(|s| format!("{}px", s.height)).unwrap_or_default()
                    }
                    inner_html=move || {
                        state.current_sheet().map(|s| s.markup).unwrap_or_default()
                    }
                ></div>
            </div>
            {neighbor_pane(signals, SwipeDirection::Next)}
        </div>
    }
}

/// One swipe neighbor pane: hidden at rest, a placeholder until its sheet
/// resolves, then the resolved sheet at its natural size.
fn neighbor_pane(signals: ViewportSignals, side: SwipeDirection) -> impl IntoView {
    let offset = move || {
        let offsets = signals.offsets.get();
        match side {
            SwipeDirection::Previous => offsets.previous,
            SwipeDirection::Next => offsets.next,
        }
    };
    let sheet = move || match side {
        SwipeDirection::Previous => signals.prev_sheet.get(),
        SwipeDirection::Next => signals.next_sheet.get(),
    };

    view! {
        <div
            class="pane pane-neighbor"
            style:display=move || {
                if signals.swipe_active.get() && offset().is_some() { "block" } else { "none" }
            }
            style:transform=move || {
                format!("translate3d({}px, 0px, 0px)", offset().unwrap_or(0.0))
            }
        >
            {move || match sheet() {
                Some(record) => {
                    view! { <div class="sheet-content" inner_html=record.markup></div> }.into_any()
                }
                None => view! { <div class="sheet-placeholder"></div> }.into_any(),
            }}
        </div>
    }
}
