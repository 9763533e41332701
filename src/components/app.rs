use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::PointerEvent;

use crate::components::picker::SheetPicker;
use crate::components::sheet_viewport::SheetViewport;
use crate::state::AppState;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();
    provide_context(state);

    view! {
        <div class="app" style="display: flex; flex-direction: column; height: 100vh;">
            <Toolbar />
            <MainArea />
            <SheetPicker />
        </div>
    }
}

#[component]
fn Toolbar() -> impl IntoView {
    let state = expect_context::<AppState>();
    let title = move || {
        state
            .current_sheet()
            .map(|s| s.name)
            .unwrap_or_else(|| "No sheet".into())
    };

    view! {
        <div class="toolbar">
            <span class="toolbar-title">{title}</span>
            <button class="tool-button" on:click=move |_| state.picker_open.set(true)>
                "Sheets"
            </button>
            <button
                class="tool-button"
                on:click=move |_| state.reset_view_signal.update(|n| *n = n.wrapping_add(1))
            >
                "Fit"
            </button>
        </div>
    }
}

#[component]
fn MainArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let has_sheets = move || state.sheets.with(|sheets| !sheets.is_empty());

    view! {
        <div class="main" style="display: flex; flex: 1; min-height: 0;">
            {move || {
                if has_sheets() {
                    view! { <SheetViewport /> }.into_any()
                } else {
                    view! { <div class="empty-state">"No record sheets loaded"</div> }.into_any()
                }
            }}
            <Sidebar />
        </div>
    }
}

/// Details sidebar with a resize handle. While the handle is held, the
/// viewport treats the pointer stream as spoken for and suspends gestures.
#[component]
fn Sidebar() -> impl IntoView {
    let state = expect_context::<AppState>();

    let on_handle_down = move |ev: PointerEvent| {
        ev.prevent_default();
        state.menu_drag_active.set(true);
        if let Some(el) = ev.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
            if let Err(err) = el.set_pointer_capture(ev.pointer_id()) {
                log::debug!("sidebar handle capture refused: {err:?}");
            }
        }
    };
    let on_handle_move = move |ev: PointerEvent| {
        if !state.menu_drag_active.get_untracked() {
            return;
        }
        let window_w = web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        if window_w > 0.0 {
            let width = (window_w - ev.client_x() as f64).clamp(140.0, 480.0);
            state.sidebar_width.set(width);
        }
    };
    let on_handle_up = move |ev: PointerEvent| {
        state.menu_drag_active.set(false);
        if let Some(el) = ev.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
            if let Err(err) = el.release_pointer_capture(ev.pointer_id()) {
                log::debug!("sidebar handle release failed: {err:?}");
            }
        }
    };

    view! {
        <div class="sidebar" style:width=move || format!("{}px", state.sidebar_width.get())>
            <div
                class="sidebar-handle"
                on:pointerdown=on_handle_down
                on:pointermove=on_handle_move
                on:pointerup=on_handle_up
                on:pointercancel=on_handle_up
            ></div>
            <div class="sidebar-body">
                {move || match state.current_sheet() {
                    Some(sheet) => {
                        let count = state.sheets.with(|sheets| sheets.len());
                        let position = state.current_index.get() + 1;
                        view! {
                            <div class="setting-group">
                                <div class="setting-group-title">{sheet.name}</div>
                                <div class="setting-row">
                                    <span class="setting-label">"Size"</span>
                                    <span>{format!("{} x {}", sheet.width, sheet.height)}</span>
                                </div>
                                <div class="setting-row">
                                    <span class="setting-label">"Sheet"</span>
                                    <span>{format!("{position} of {count}")}</span>
                                </div>
                            </div>
                        }
                            .into_any()
                    }
                    None => view! { <div class="empty-state">"No sheet selected"</div> }.into_any(),
                }}
            </div>
        </div>
    }
}
