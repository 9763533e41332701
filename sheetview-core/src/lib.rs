//! Viewport and gesture engine for the record sheet viewer.
//!
//! Everything in this crate is plain geometry and state-machine logic with no
//! DOM types, so it can be exercised on any target. The browser side feeds
//! pointer/wheel events into [`engine::ViewportEngine`] and receives its
//! effects (transform updates, pane offsets, capture requests) through the
//! [`engine::ViewportHost`] trait.

pub mod engine;
pub mod pointers;
pub mod session;
pub mod swipe;
pub mod tap;
pub mod transform;

pub use engine::{PointerInput, ViewportEngine, ViewportHost};
pub use pointers::{PointerId, PointerKind, PointerRecord, PointerSet};
pub use swipe::{NeighborSlot, PaneOffsets, SheetId, SwipeDirection};
pub use transform::{Bounds, ViewState, ViewTransform};
