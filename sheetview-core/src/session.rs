//! Gesture session state machine.
//!
//! One continuous pointer interaction is one session:
//! `Idle -> Awaiting -> {Panning | Pinching | Swiping} -> Idle`. The session
//! is a single tagged value replaced wholesale on every transition, so there
//! is no loose per-gesture state to go stale between handlers.

use crate::pointers::{PointerId, PointerRecord};
use crate::swipe::SwipeState;

/// Movement (px) from the down-point before a session classifies; keeps taps
/// from being misread as micro-pans. 8px is the common touch-slop value.
pub const GESTURE_SLOP_PX: f64 = 8.0;

/// Tolerance for treating the current scale as "at fit scale" when deciding
/// swipe eligibility. UI feel depends on this exact threshold; tune with care.
pub const SWIPE_SCALE_EPSILON: f64 = 1.001;

/// Two-finger start distances below this produce a pinch ratio of 1 (the
/// division would amplify jitter into wild scale jumps).
pub const PINCH_MIN_START_DISTANCE: f64 = 10.0;

#[derive(Clone, Copy, Debug)]
pub enum GestureSession {
    Idle,
    Awaiting(AwaitState),
    Panning(PanState),
    Pinching(PinchState),
    Swiping(SwipeState),
}

impl GestureSession {
    pub fn is_active(&self) -> bool {
        !matches!(self, GestureSession::Idle)
    }
}

/// A pointer is down but has not yet crossed the slop threshold.
#[derive(Clone, Copy, Debug)]
pub struct AwaitState {
    pub pointer: PointerId,
    pub origin_x: f64,
    pub origin_y: f64,
    /// Down landed on an element opted out of tap-zoom handling.
    pub tap_zoom_exempt: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct PanState {
    pub pointer: PointerId,
    pub origin_x: f64,
    pub origin_y: f64,
    pub start_translate_x: f64,
    pub start_translate_y: f64,
    /// Latest pointer position; applied once per animation frame.
    pub target_x: f64,
    pub target_y: f64,
}

/// Baseline captured at pinch entry plus the coalesced per-frame target.
///
/// Scale is derived from the *starting* distance and scale, so a pinch that
/// returns to its starting geometry restores the starting zoom. The midpoint
/// is tracked incrementally for pan-while-pinching.
#[derive(Clone, Copy, Debug)]
pub struct PinchState {
    pub ids: [PointerId; 2],
    pub start_distance: f64,
    pub start_scale: f64,
    pub last_mid_x: f64,
    pub last_mid_y: f64,
    pub target_mid_x: f64,
    pub target_mid_y: f64,
    pub target_distance: f64,
}

impl PinchState {
    pub fn scale_ratio(&self) -> f64 {
        if self.start_distance >= PINCH_MIN_START_DISTANCE {
            self.target_distance / self.start_distance
        } else {
            1.0
        }
    }
}

/// Midpoint and distance of a two-pointer contact.
pub fn pinch_geometry(a: &PointerRecord, b: &PointerRecord) -> (f64, f64, f64) {
    let mid_x = (a.x + b.x) / 2.0;
    let mid_y = (a.y + b.y) / 2.0;
    let distance = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
    (mid_x, mid_y, distance)
}
