//! Horizontal swipe navigation between neighboring sheets.
//!
//! While a swipe is live, up to three panes are stacked: the current sheet
//! plus placeholders (later resolved content) for its neighbors. All panes
//! slide together with the pointer; release either commits to a neighbor or
//! springs back, through a fixed-duration settle animation.

/// Fraction of the viewport width the pointer must cross for a release to
/// commit instead of cancel.
pub const SWIPE_COMMIT_FRACTION: f64 = 0.5;

/// Duration of the commit/cancel settle animation.
pub const SETTLE_DURATION_MS: f64 = 250.0;

/// Opaque identity of a sheet, assigned by the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SheetId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Previous,
    Next,
}

/// Resolution state of one neighbor request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborSlot {
    /// Requested from the provider; pane shows a placeholder meanwhile.
    Pending,
    Ready(SheetId),
    /// No neighbor on this side (or the provider resolved to none).
    Missing,
}

impl NeighborSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, NeighborSlot::Ready(_))
    }

    /// A pane is rendered for this side (placeholder or resolved content).
    pub fn pane_visible(&self) -> bool {
        !matches!(self, NeighborSlot::Missing)
    }
}

/// Live swipe gesture state.
#[derive(Clone, Copy, Debug)]
pub struct SwipeState {
    pub pointer: crate::pointers::PointerId,
    pub origin_x: f64,
    /// Latest pointer displacement; applied once per animation frame.
    pub target_dx: f64,
    /// Displacement last pushed to the panes.
    pub applied_dx: f64,
    pub prev: NeighborSlot,
    pub next: NeighborSlot,
}

/// Horizontal offsets for the stacked panes at a given displacement. `None`
/// means no pane is rendered on that side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PaneOffsets {
    pub previous: Option<f64>,
    pub current: f64,
    pub next: Option<f64>,
}

/// Slides the current pane by `total_dx` and parks the neighbor panes one
/// viewport-width out on either side. Positive displacement pulls the next
/// sheet in from the left.
pub fn pane_offsets(
    total_dx: f64,
    viewport_w: f64,
    prev_visible: bool,
    next_visible: bool,
) -> PaneOffsets {
    PaneOffsets {
        previous: prev_visible.then_some(viewport_w + total_dx),
        current: total_dx,
        next: next_visible.then_some(-viewport_w + total_dx),
    }
}

/// Commit/cancel decision at release: commit needs the displacement past the
/// threshold *and* that neighbor actually resolved.
pub fn resolve(
    total_dx: f64,
    viewport_w: f64,
    prev: NeighborSlot,
    next: NeighborSlot,
) -> Option<SwipeDirection> {
    let threshold = viewport_w * SWIPE_COMMIT_FRACTION;
    if total_dx > threshold && next.is_ready() {
        Some(SwipeDirection::Next)
    } else if total_dx < -threshold && prev.is_ready() {
        Some(SwipeDirection::Previous)
    } else {
        None
    }
}

/// Fixed-duration animation driving panes to their resting place after the
/// pointer is released (or the gesture is cancelled non-interactively).
#[derive(Clone, Copy, Debug)]
pub struct SettleAnimation {
    pub from_dx: f64,
    pub to_dx: f64,
    /// `Some` commits to that neighbor when the animation lands.
    pub commit: Option<SwipeDirection>,
    pub started_ms: f64,
    pub prev_visible: bool,
    pub next_visible: bool,
}

impl SettleAnimation {
    pub fn new(
        from_dx: f64,
        commit: Option<SwipeDirection>,
        viewport_w: f64,
        started_ms: f64,
        prev_visible: bool,
        next_visible: bool,
    ) -> Self {
        let to_dx = match commit {
            Some(SwipeDirection::Next) => viewport_w,
            Some(SwipeDirection::Previous) => -viewport_w,
            None => 0.0,
        };
        Self {
            from_dx,
            to_dx,
            commit,
            started_ms,
            prev_visible,
            next_visible,
        }
    }

    pub fn offsets_at(&self, now_ms: f64, viewport_w: f64) -> PaneOffsets {
        let t = ((now_ms - self.started_ms) / SETTLE_DURATION_MS).clamp(0.0, 1.0);
        let dx = self.from_dx + (self.to_dx - self.from_dx) * ease_out_cubic(t);
        pane_offsets(dx, viewport_w, self.prev_visible, self.next_visible)
    }

    pub fn finished(&self, now_ms: f64) -> bool {
        now_ms - self.started_ms >= SETTLE_DURATION_MS
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
