//! View transform: scale + translate over the sheet content, with fit-scale
//! derivation and covered-viewport clamping.

use serde::{Deserialize, Serialize};

/// Global scale floor, applied even when the fit computation would go lower.
pub const SCALE_FLOOR: f64 = 0.2;
/// Global scale ceiling; also the maximum zoom.
pub const SCALE_CEILING: f64 = 5.0;

/// The public, persistable view: a 2D affine transform applied to the sheet.
///
/// Invariant (maintained by [`ViewTransform`]): `min_scale <= scale <=
/// max_scale`, and the scaled content never reveals empty viewport area in a
/// dimension where it is large enough to cover it; where it is smaller, it is
/// centered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

/// Width/height pair used for both content and viewport dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Owns the current [`ViewState`] plus the content/viewport dimensions it is
/// derived from. All mutation goes through methods that re-establish the
/// clamp invariant before returning.
#[derive(Clone, Copy, Debug)]
pub struct ViewTransform {
    state: ViewState,
    content: Bounds,
    viewport: Bounds,
    min_scale: f64,
    max_scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self {
            state: ViewState::default(),
            content: Bounds::new(1.0, 1.0),
            viewport: Bounds::new(1.0, 1.0),
            min_scale: 1.0,
            max_scale: SCALE_CEILING,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    pub fn viewport(&self) -> Bounds {
        self.viewport
    }

    pub fn content(&self) -> Bounds {
        self.content
    }

    /// Recomputes `min_scale` from new content/viewport dimensions.
    ///
    /// Non-positive or non-finite dimensions are rejected as a no-op (returns
    /// false): a half-measured layout must never poison the current view.
    pub fn update_dimensions(&mut self, content: Bounds, viewport: Bounds) -> bool {
        if !content.is_valid() || !viewport.is_valid() {
            log::debug!(
                "rejecting degenerate dimensions content={:?} viewport={:?}",
                content,
                viewport
            );
            return false;
        }
        self.content = content;
        self.viewport = viewport;
        self.min_scale = (viewport.width / content.width)
            .min(viewport.height / content.height)
            .clamp(SCALE_FLOOR, SCALE_CEILING);
        self.max_scale = SCALE_CEILING;
        self.state.scale = self.state.scale.clamp(self.min_scale, self.max_scale);
        self.clamp_pan();
        true
    }

    /// Snaps to fit scale. Translate is re-clamped, which centers the content
    /// in any dimension it does not fill.
    pub fn reset_to_fit(&mut self) {
        self.state.scale = self.min_scale;
        self.clamp_pan();
    }

    /// Applies a persisted or externally supplied state, clamping it into the
    /// current bounds. A non-finite or non-positive scale falls back to fit.
    pub fn set_state_clamped(&mut self, state: ViewState) {
        let scale = if state.scale.is_finite() && state.scale > 0.0 {
            state.scale
        } else {
            log::debug!("invalid scale {} in restored state; using fit", state.scale);
            self.min_scale
        };
        self.state = ViewState {
            scale: scale.clamp(self.min_scale, self.max_scale),
            translate_x: if state.translate_x.is_finite() { state.translate_x } else { 0.0 },
            translate_y: if state.translate_y.is_finite() { state.translate_y } else { 0.0 },
        };
        self.clamp_pan();
    }

    /// Re-clamps the translate so the scaled content cannot be dragged to
    /// reveal empty viewport area. A dimension the content does not fill is
    /// centered instead.
    pub fn clamp_pan(&mut self) {
        self.state.translate_x = clamp_axis(
            self.state.translate_x,
            self.content.width * self.state.scale,
            self.viewport.width,
        );
        self.state.translate_y = clamp_axis(
            self.state.translate_y,
            self.content.height * self.state.scale,
            self.viewport.height,
        );
    }

    /// Pivot-preserving zoom: solves for the translate that keeps the given
    /// viewport point over the same content point across the scale change.
    pub fn apply_zoom_around_point(&mut self, new_scale: f64, pivot_x: f64, pivot_y: f64) {
        self.apply_zoom_tracking_point(new_scale, pivot_x, pivot_y, pivot_x, pivot_y);
    }

    /// Zoom around a pivot that is itself moving: the content point that was
    /// under `(from_x, from_y)` ends up under `(to_x, to_y)` at the new
    /// scale. Solving pan and zoom in one translate update keeps the step
    /// path-independent, so a pinch whose fingers return to their starting
    /// distance and midpoint restores the starting transform exactly.
    pub fn apply_zoom_tracking_point(
        &mut self,
        new_scale: f64,
        from_x: f64,
        from_y: f64,
        to_x: f64,
        to_y: f64,
    ) {
        let new_scale = if new_scale.is_finite() && new_scale > 0.0 {
            new_scale
        } else {
            log::debug!("degenerate zoom target {}; resetting to fit scale", new_scale);
            self.min_scale
        };
        let new_scale = new_scale.clamp(self.min_scale, self.max_scale);
        let ratio = new_scale / self.state.scale;
        self.state.translate_x = to_x - (from_x - self.state.translate_x) * ratio;
        self.state.translate_y = to_y - (from_y - self.state.translate_y) * ratio;
        self.state.scale = new_scale;
        self.clamp_pan();
    }

    pub fn set_translate(&mut self, translate_x: f64, translate_y: f64) {
        self.state.translate_x = translate_x;
        self.state.translate_y = translate_y;
        self.clamp_pan();
    }

    pub fn translate_by(&mut self, dx: f64, dy: f64) {
        self.set_translate(self.state.translate_x + dx, self.state.translate_y + dy);
    }
}

fn clamp_axis(translate: f64, scaled_content: f64, viewport: f64) -> f64 {
    if scaled_content <= viewport {
        (viewport - scaled_content) / 2.0
    } else {
        translate.clamp(viewport - scaled_content, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(content_w: f64, content_h: f64, view_w: f64, view_h: f64) -> ViewTransform {
        let mut t = ViewTransform::new();
        assert!(t.update_dimensions(
            Bounds::new(content_w, content_h),
            Bounds::new(view_w, view_h)
        ));
        t
    }

    #[test]
    fn fit_scale_is_smaller_axis_ratio() {
        let t = fitted(2000.0, 2000.0, 800.0, 600.0);
        assert!((t.min_scale() - 0.3).abs() < 1e-12);
        assert_eq!(t.max_scale(), SCALE_CEILING);
    }

    #[test]
    fn fit_scale_respects_global_floor() {
        let t = fitted(100_000.0, 100_000.0, 800.0, 600.0);
        assert_eq!(t.min_scale(), SCALE_FLOOR);
    }

    #[test]
    fn degenerate_dimensions_are_a_noop() {
        let mut t = fitted(800.0, 600.0, 800.0, 600.0);
        let before_min = t.min_scale();
        let before = t.state();
        assert!(!t.update_dimensions(Bounds::new(0.0, 500.0), Bounds::new(800.0, 600.0)));
        assert!(!t.update_dimensions(Bounds::new(f64::NAN, 500.0), Bounds::new(800.0, 600.0)));
        assert!(!t.update_dimensions(Bounds::new(800.0, 600.0), Bounds::new(-4.0, 600.0)));
        assert_eq!(t.min_scale(), before_min);
        assert_eq!(t.state(), before);
    }

    #[test]
    fn clamp_covers_viewport_when_content_larger() {
        let mut t = fitted(2000.0, 2000.0, 800.0, 600.0);
        t.set_state_clamped(ViewState {
            scale: 1.0,
            translate_x: 500.0,
            translate_y: -5000.0,
        });
        let s = t.state();
        // Content is 2000x2000 at scale 1: legal x range [-1200, 0], y [-1400, 0].
        assert_eq!(s.translate_x, 0.0);
        assert_eq!(s.translate_y, -1400.0);
        // Covered: no gutter on either edge.
        assert!(s.translate_x <= 0.0 && s.translate_x + 2000.0 >= 800.0);
        assert!(s.translate_y <= 0.0 && s.translate_y + 2000.0 >= 600.0);
    }

    #[test]
    fn clamp_centers_when_content_smaller() {
        let mut t = fitted(400.0, 200.0, 800.0, 600.0);
        // min_scale = min(2.0, 3.0) = 2.0; at fit the content is 800x400.
        t.reset_to_fit();
        let s = t.state();
        assert_eq!(s.scale, 2.0);
        assert_eq!(s.translate_x, 0.0);
        assert_eq!(s.translate_y, 100.0);
    }

    #[test]
    fn zoom_pivot_stays_on_same_content_point() {
        let mut t = fitted(2000.0, 2000.0, 800.0, 600.0);
        t.set_state_clamped(ViewState {
            scale: 1.0,
            translate_x: -600.0,
            translate_y: -700.0,
        });
        let before = t.state();
        let (px, py) = (400.0, 300.0);
        let content_x = (px - before.translate_x) / before.scale;
        let content_y = (py - before.translate_y) / before.scale;
        t.apply_zoom_around_point(1.5, px, py);
        let after = t.state();
        assert!((after.scale - 1.5).abs() < 1e-12);
        assert!(((px - after.translate_x) / after.scale - content_x).abs() < 1e-9);
        assert!(((py - after.translate_y) / after.scale - content_y).abs() < 1e-9);
    }

    #[test]
    fn zoom_tracking_a_moving_pivot_pins_the_content_point() {
        let mut t = fitted(2000.0, 2000.0, 800.0, 600.0);
        t.set_state_clamped(ViewState {
            scale: 1.0,
            translate_x: -600.0,
            translate_y: -700.0,
        });
        let before = t.state();
        let (from_x, from_y) = (400.0, 300.0);
        let content_x = (from_x - before.translate_x) / before.scale;
        let content_y = (from_y - before.translate_y) / before.scale;
        let (to_x, to_y) = (500.0, 350.0);
        t.apply_zoom_tracking_point(1.5, from_x, from_y, to_x, to_y);
        let after = t.state();
        assert!((after.scale - 1.5).abs() < 1e-12);
        assert!((after.translate_x - -1000.0).abs() < 1e-9);
        assert!((after.translate_y - -1150.0).abs() < 1e-9);
        // The content point that started under `from` is now under `to`.
        assert!(((to_x - after.translate_x) / after.scale - content_x).abs() < 1e-9);
        assert!(((to_y - after.translate_y) / after.scale - content_y).abs() < 1e-9);
    }

    #[test]
    fn zoom_clamps_into_scale_bounds() {
        let mut t = fitted(800.0, 600.0, 800.0, 600.0);
        t.apply_zoom_around_point(50.0, 0.0, 0.0);
        assert_eq!(t.state().scale, SCALE_CEILING);
        t.apply_zoom_around_point(0.01, 0.0, 0.0);
        assert_eq!(t.state().scale, t.min_scale());
    }

    #[test]
    fn degenerate_zoom_target_resets_to_fit_scale() {
        let mut t = fitted(800.0, 600.0, 800.0, 600.0);
        t.apply_zoom_around_point(2.0, 400.0, 300.0);
        t.apply_zoom_around_point(f64::NAN, 400.0, 300.0);
        assert_eq!(t.state().scale, t.min_scale());
        t.apply_zoom_around_point(-3.0, 400.0, 300.0);
        assert_eq!(t.state().scale, t.min_scale());
    }

    #[test]
    fn restored_state_with_bad_scale_falls_back_to_fit() {
        let mut t = fitted(800.0, 600.0, 800.0, 600.0);
        t.set_state_clamped(ViewState {
            scale: f64::INFINITY,
            translate_x: 10.0,
            translate_y: f64::NAN,
        });
        let s = t.state();
        assert_eq!(s.scale, t.min_scale());
        assert!(s.translate_x.is_finite() && s.translate_y.is_finite());
    }
}
