pub mod components;
pub mod dom;
pub mod state;
pub mod storage;
pub mod types;
