pub mod app;
pub mod picker;
pub mod sheet_viewport;
