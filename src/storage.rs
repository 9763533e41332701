//! Per-sheet view-state persistence in localStorage.
//!
//! Storage failures (private browsing, quota) and unreadable entries are
//! absorbed: the viewer falls back to the fit view.

use sheetview_core::ViewState;

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn view_key(sheet_id: u64) -> String {
    format!("sheetview.view.{sheet_id}")
}

pub fn load_view_state(sheet_id: u64) -> Option<ViewState> {
    let raw = storage()?.get_item(&view_key(sheet_id)).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(state) => Some(state),
        Err(err) => {
            log::debug!("discarding unreadable view state for sheet {sheet_id}: {err}");
            None
        }
    }
}

pub fn save_view_state(sheet_id: u64, state: &ViewState) {
    let Some(store) = storage() else { return };
    match serde_json::to_string(state) {
        Ok(json) => {
            if let Err(err) = store.set_item(&view_key(sheet_id), &json) {
                log::debug!("failed to persist view state for sheet {sheet_id}: {err:?}");
            }
        }
        Err(err) => log::debug!("failed to serialize view state: {err}"),
    }
}
