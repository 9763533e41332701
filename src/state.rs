use leptos::prelude::*;
use sheetview_core::SwipeDirection;

use crate::types::{sample_sheets, SheetRecord};

/// Shared application state, provided as context at the app root.
#[derive(Clone, Copy)]
pub struct AppState {
    pub sheets: RwSignal<Vec<SheetRecord>>,
    pub current_index: RwSignal<usize>,
    /// Picker overlay is open: all viewport gestures are suspended.
    pub picker_open: RwSignal<bool>,
    /// An unrelated UI drag (sidebar resize) holds the pointer stream.
    pub menu_drag_active: RwSignal<bool>,
    pub sidebar_width: RwSignal<f64>,
    /// Nudge counter; incrementing requests a reset-to-fit of the viewport.
    pub reset_view_signal: RwSignal<u32>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            sheets: RwSignal::new(sample_sheets()),
            current_index: RwSignal::new(0),
            picker_open: RwSignal::new(false),
            menu_drag_active: RwSignal::new(false),
            sidebar_width: RwSignal::new(240.0),
            reset_view_signal: RwSignal::new(0),
        }
    }

    pub fn current_sheet(&self) -> Option<SheetRecord> {
        let index = self.current_index.get();
        self.sheets.with(|sheets| sheets.get(index).cloned())
    }

    pub fn current_sheet_untracked(&self) -> Option<SheetRecord> {
        let index = self.current_index.get_untracked();
        self.sheets
            .with_untracked(|sheets| sheets.get(index).cloned())
    }

    pub fn sheet_by_id(&self, id: u64) -> Option<SheetRecord> {
        self.sheets
            .with_untracked(|sheets| sheets.iter().find(|s| s.id == id).cloned())
    }

    /// Index of the neighbor in the given direction. The collection wraps
    /// around; a single-sheet collection has no neighbors.
    pub fn neighbor_index(&self, direction: SwipeDirection) -> Option<usize> {
        let count = self.sheets.with_untracked(|sheets| sheets.len());
        if count < 2 {
            return None;
        }
        let index = self.current_index.get_untracked();
        Some(match direction {
            SwipeDirection::Previous => (index + count - 1) % count,
            SwipeDirection::Next => (index + 1) % count,
        })
    }

    pub fn neighbor_sheet(&self, direction: SwipeDirection) -> Option<SheetRecord> {
        let index = self.neighbor_index(direction)?;
        self.sheets.with_untracked(|sheets| sheets.get(index).cloned())
    }

    /// Advances the selection after a committed swipe.
    pub fn step(&self, direction: SwipeDirection) {
        if let Some(index) = self.neighbor_index(direction) {
            self.current_index.set(index);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
