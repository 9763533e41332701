//! Double-tap detection for tap-to-zoom.

/// Two taps closer together than this (in ms) pair into a double-tap.
pub const DOUBLE_TAP_WINDOW_MS: f64 = 300.0;

/// Maximum distance (px) between the two taps of a pair.
pub const DOUBLE_TAP_SLOP_PX: f64 = 30.0;

/// Magnification applied over fit scale on double-tap zoom-in.
pub const TAP_ZOOM_FACTOR: f64 = 2.0;

#[derive(Clone, Copy, Debug)]
struct TapRecord {
    x: f64,
    y: f64,
    at_ms: f64,
}

/// Remembers the most recent single tap and pairs it with the next one.
///
/// Multi-pointer activity, slop-crossing movement, or taps on exempt elements
/// all clear the memory via [`TapZoomDetector::invalidate`].
#[derive(Debug, Default)]
pub struct TapZoomDetector {
    pending: Option<TapRecord>,
}

impl TapZoomDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.pending = None;
    }

    /// Feeds one completed tap. Returns the *first* tap's position when this
    /// tap completes a double-tap: the zoom pivots where the interaction
    /// started, not where the second finger landed.
    pub fn register_tap(&mut self, x: f64, y: f64, now_ms: f64) -> Option<(f64, f64)> {
        if let Some(first) = self.pending.take() {
            let dt = now_ms - first.at_ms;
            let dist = ((x - first.x).powi(2) + (y - first.y).powi(2)).sqrt();
            if dt <= DOUBLE_TAP_WINDOW_MS && dist <= DOUBLE_TAP_SLOP_PX {
                return Some((first.x, first.y));
            }
        }
        self.pending = Some(TapRecord { x, y, at_ms: now_ms });
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_two_taps_inside_window_and_slop() {
        let mut det = TapZoomDetector::new();
        assert_eq!(det.register_tap(100.0, 100.0, 1000.0), None);
        assert_eq!(det.register_tap(110.0, 105.0, 1250.0), Some((100.0, 100.0)));
    }

    #[test]
    fn expired_window_rearms_as_fresh_first_tap() {
        let mut det = TapZoomDetector::new();
        assert_eq!(det.register_tap(100.0, 100.0, 0.0), None);
        assert_eq!(det.register_tap(100.0, 100.0, 500.0), None);
        // The 500ms tap re-armed; a quick follow-up pairs with it.
        assert_eq!(det.register_tap(101.0, 99.0, 600.0), Some((100.0, 100.0)));
    }

    #[test]
    fn distant_second_tap_does_not_pair() {
        let mut det = TapZoomDetector::new();
        det.register_tap(100.0, 100.0, 0.0);
        assert_eq!(det.register_tap(200.0, 100.0, 100.0), None);
    }

    #[test]
    fn invalidate_clears_pending_memory() {
        let mut det = TapZoomDetector::new();
        det.register_tap(100.0, 100.0, 0.0);
        det.invalidate();
        assert_eq!(det.register_tap(100.0, 100.0, 100.0), None);
    }

    #[test]
    fn double_tap_consumes_memory() {
        let mut det = TapZoomDetector::new();
        det.register_tap(100.0, 100.0, 0.0);
        assert!(det.register_tap(100.0, 100.0, 100.0).is_some());
        // Third tap right after is a fresh single tap, not a triple.
        assert_eq!(det.register_tap(100.0, 100.0, 200.0), None);
    }
}
