use leptos::prelude::*;

use crate::state::AppState;

/// Modal sheet picker. While it is open the viewport suspends all gesture
/// handling; selection closes it and switches sheets.
#[component]
pub fn SheetPicker() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div
            class="picker-overlay"
            style:display=move || if state.picker_open.get() { "flex" } else { "none" }
            on:click=move |_| state.picker_open.set(false)
        >
            <div class="picker-panel" on:click=move |ev: web_sys::MouseEvent| ev.stop_propagation()>
                <div class="picker-title">"Record sheets"</div>
                {move || {
                    state
                        .sheets
                        .get()
                        .into_iter()
                        .enumerate()
                        .map(|(index, sheet)| {
                            view! {
                                <button
                                    class="picker-entry"
                                    class:selected=move || state.current_index.get() == index
                                    on:click=move |_| {
                                        state.current_index.set(index);
                                        state.picker_open.set(false);
                                    }
                                >
                                    {sheet.name}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </div>
    }
}
