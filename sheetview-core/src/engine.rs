//! Viewport engine: owns the view transform and the gesture session, consumes
//! the unified pointer/wheel stream, and drives every platform effect through
//! a [`ViewportHost`].
//!
//! The engine is the sole writer of the view state. Geometry mutations are
//! coalesced to at most one per animation frame: pointer moves arriving
//! faster than the frame budget overwrite the pending target instead of
//! queueing further work.

use crate::pointers::{PointerId, PointerKind, PointerRecord, PointerSet};
use crate::session::{
    pinch_geometry, AwaitState, GestureSession, PanState, PinchState, GESTURE_SLOP_PX,
    SWIPE_SCALE_EPSILON,
};
use crate::swipe::{
    pane_offsets, resolve, NeighborSlot, PaneOffsets, SettleAnimation, SheetId, SwipeDirection,
    SwipeState,
};
use crate::tap::{TapZoomDetector, TAP_ZOOM_FACTOR};
use crate::transform::{Bounds, ViewState, ViewTransform};

/// Per-tick wheel zoom factors, matching the feel of ctrl-wheel zoom in the
/// sheet canvases.
pub const WHEEL_ZOOM_IN_FACTOR: f64 = 1.1;
pub const WHEEL_ZOOM_OUT_FACTOR: f64 = 0.9;

/// Platform effects the engine needs. The browser layer implements this over
/// DOM elements and signals; tests implement it with a mock that records
/// every effect and owns a manual clock.
///
/// No method may propagate an error: platform failures (refused pointer
/// capture, missing elements) are absorbed on the host side.
pub trait ViewportHost {
    fn now_ms(&self) -> f64;
    /// Schedules exactly one future `on_frame` call. The engine guarantees it
    /// never asks for a second frame while one is pending.
    fn request_frame(&mut self);
    fn apply_transform(&mut self, state: ViewState);
    /// Makes the neighbor panes visible (as placeholders until resolved).
    fn show_swipe_panes(&mut self);
    fn set_pane_offsets(&mut self, offsets: PaneOffsets);
    /// Hides the neighbor panes and returns the current pane to rest.
    fn clear_swipe_panes(&mut self);
    /// Asks the neighbor provider for the sheet in the given direction. Must
    /// eventually come back through [`ViewportEngine::neighbor_ready`].
    fn request_neighbor(&mut self, direction: SwipeDirection);
    /// A neighbor request resolved; `None` means no sheet on that side.
    fn set_neighbor_pane(&mut self, direction: SwipeDirection, sheet: Option<SheetId>);
    /// Acquires pointer capture; returns false when the platform refuses, in
    /// which case tracking continues through the container listeners.
    fn capture_pointer(&mut self, id: PointerId) -> bool;
    fn release_pointer(&mut self, id: PointerId);
    /// Outcome of a swipe: `Some` advances the selection, `None` is the
    /// neutral resolution of a cancel so callers are never left waiting.
    fn notify_selected(&mut self, direction: Option<SwipeDirection>);
    /// True while the picker overlay is open or an unrelated drag holds the
    /// input lock; suspends all gesture handling.
    fn gestures_locked(&self) -> bool;
}

/// A translated pointer-down event, in viewport coordinates.
#[derive(Clone, Copy, Debug)]
pub struct PointerInput {
    pub id: PointerId,
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    /// Down landed inside an exclusion zone for tap-zoom.
    pub tap_zoom_exempt: bool,
}

#[derive(Clone, Copy, Debug)]
struct WheelZoom {
    scale: f64,
    pivot_x: f64,
    pivot_y: f64,
}

pub struct ViewportEngine {
    transform: ViewTransform,
    pointers: PointerSet,
    session: GestureSession,
    tap: TapZoomDetector,
    settle: Option<SettleAnimation>,
    captured: Vec<PointerId>,
    pending_dims: Option<(Bounds, Bounds)>,
    pending_wheel: Option<WheelZoom>,
    frame_scheduled: bool,
    neighbor_prev: bool,
    neighbor_next: bool,
}

impl Default for ViewportEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportEngine {
    pub fn new() -> Self {
        Self {
            transform: ViewTransform::new(),
            pointers: PointerSet::new(),
            session: GestureSession::Idle,
            tap: TapZoomDetector::new(),
            settle: None,
            captured: Vec::new(),
            pending_dims: None,
            pending_wheel: None,
            frame_scheduled: false,
            neighbor_prev: false,
            neighbor_next: false,
        }
    }

    pub fn view_state(&self) -> ViewState {
        self.transform.state()
    }

    pub fn min_scale(&self) -> f64 {
        self.transform.min_scale()
    }

    pub fn is_idle(&self) -> bool {
        !self.session.is_active()
    }

    /// Whether sheets exist on either side of the current one; pushed by the
    /// caller so swipe eligibility can be decided synchronously at
    /// classification time, before the async neighbor requests resolve.
    pub fn set_neighbor_availability(&mut self, prev: bool, next: bool) {
        self.neighbor_prev = prev;
        self.neighbor_next = next;
    }

    /// Pushes fresh content/viewport dimensions. Applying a new fit scale
    /// mid-gesture would make the sheet visibly jump under the finger, so the
    /// update is cached until the session ends.
    pub fn set_dimensions(
        &mut self,
        content: Bounds,
        viewport: Bounds,
        host: &mut impl ViewportHost,
    ) {
        if self.session.is_active() {
            self.pending_dims = Some((content, viewport));
            return;
        }
        if self.transform.update_dimensions(content, viewport) {
            host.apply_transform(self.transform.state());
        }
    }

    /// Applies a persisted view state if it is usable, otherwise resets to
    /// fit.
    pub fn restore_view_state(&mut self, state: Option<ViewState>, host: &mut impl ViewportHost) {
        match state {
            Some(s)
                if s.scale.is_finite()
                    && s.scale > 0.0
                    && s.translate_x.is_finite()
                    && s.translate_y.is_finite() =>
            {
                self.transform.set_state_clamped(s);
            }
            _ => self.transform.reset_to_fit(),
        }
        host.apply_transform(self.transform.state());
    }

    pub fn reset_view(&mut self, host: &mut impl ViewportHost) {
        self.transform.reset_to_fit();
        host.apply_transform(self.transform.state());
    }

    pub fn pointer_down(&mut self, input: PointerInput, host: &mut impl ViewportHost) {
        if host.gestures_locked() {
            self.abort_session(host);
            return;
        }
        self.ensure_session_consistent(host);
        // A settling swipe resolves instantly so the new interaction starts
        // from clean pane state.
        self.fast_forward_settle(host);

        self.pointers.insert(PointerRecord {
            id: input.id,
            x: input.x,
            y: input.y,
            kind: input.kind,
        });
        if self.pointers.len() > 1 {
            self.tap.invalidate();
        }
        if host.capture_pointer(input.id) {
            self.captured.push(input.id);
        } else {
            log::debug!(
                "pointer capture refused for {:?}; relying on container listeners",
                input.id
            );
        }

        match self.pointers.len() {
            1 => {
                self.session = GestureSession::Awaiting(AwaitState {
                    pointer: input.id,
                    origin_x: input.x,
                    origin_y: input.y,
                    tap_zoom_exempt: input.tap_zoom_exempt,
                });
            }
            2 => self.enter_pinch(host),
            // Further pointers are ignored; the pinch pair stays fixed.
            _ => {}
        }
    }

    pub fn pointer_move(&mut self, id: PointerId, x: f64, y: f64, host: &mut impl ViewportHost) {
        if host.gestures_locked() {
            self.abort_session(host);
            return;
        }
        self.ensure_session_consistent(host);
        if !self.pointers.update(id, x, y) {
            return; // stray move for an untracked pointer
        }

        if let GestureSession::Awaiting(await_state) = self.session {
            if await_state.pointer != id {
                return;
            }
            let dx = x - await_state.origin_x;
            let dy = y - await_state.origin_y;
            if (dx * dx + dy * dy).sqrt() > GESTURE_SLOP_PX {
                self.classify_single(await_state, x, y, host);
            }
            return;
        }

        let mut needs_frame = false;
        match &mut self.session {
            GestureSession::Panning(pan) if pan.pointer == id => {
                pan.target_x = x;
                pan.target_y = y;
                needs_frame = true;
            }
            GestureSession::Swiping(swipe) if swipe.pointer == id => {
                swipe.target_dx = x - swipe.origin_x;
                needs_frame = true;
            }
            GestureSession::Pinching(pinch) if pinch.ids.contains(&id) => {
                if let (Some(a), Some(b)) = (
                    self.pointers.get(pinch.ids[0]),
                    self.pointers.get(pinch.ids[1]),
                ) {
                    let (mid_x, mid_y, distance) = pinch_geometry(&a, &b);
                    pinch.target_mid_x = mid_x;
                    pinch.target_mid_y = mid_y;
                    pinch.target_distance = distance;
                    needs_frame = true;
                }
            }
            _ => {}
        }
        if needs_frame {
            self.schedule_frame(host);
        }
    }

    pub fn pointer_up(&mut self, id: PointerId, x: f64, y: f64, host: &mut impl ViewportHost) {
        if self.pointers.remove(id).is_none() {
            return; // up for an untracked pointer
        }
        self.release_capture(id, host);
        if host.gestures_locked() {
            self.abort_session(host);
            return;
        }

        match self.session {
            GestureSession::Awaiting(await_state) if await_state.pointer == id => {
                self.session = GestureSession::Idle;
                self.finish_tap(await_state, x, y, host);
                self.apply_pending_dims(host);
            }
            GestureSession::Panning(pan) if pan.pointer == id => {
                self.transform.set_translate(
                    pan.start_translate_x + (x - pan.origin_x),
                    pan.start_translate_y + (y - pan.origin_y),
                );
                host.apply_transform(self.transform.state());
                self.session = GestureSession::Idle;
                self.apply_pending_dims(host);
            }
            GestureSession::Pinching(pinch) if pinch.ids.contains(&id) => {
                self.apply_pinch_target(&pinch, host);
                self.reseed_after_pinch(host);
            }
            GestureSession::Swiping(mut swipe) if swipe.pointer == id => {
                swipe.target_dx = x - swipe.origin_x;
                self.session = GestureSession::Idle;
                self.resolve_swipe(swipe, host);
                self.apply_pending_dims(host);
            }
            _ => {}
        }
    }

    /// Platform-cancelled pointer: like an up, except it can never complete a
    /// tap and a live swipe springs back instead of resolving.
    pub fn pointer_cancel(&mut self, id: PointerId, host: &mut impl ViewportHost) {
        if self.pointers.remove(id).is_none() {
            return;
        }
        self.release_capture(id, host);

        match self.session {
            GestureSession::Awaiting(await_state) if await_state.pointer == id => {
                self.tap.invalidate();
                self.session = GestureSession::Idle;
                self.apply_pending_dims(host);
            }
            GestureSession::Panning(pan) if pan.pointer == id => {
                self.session = GestureSession::Idle;
                self.apply_pending_dims(host);
            }
            GestureSession::Pinching(pinch) if pinch.ids.contains(&id) => {
                self.reseed_after_pinch(host);
            }
            GestureSession::Swiping(swipe) if swipe.pointer == id => {
                self.session = GestureSession::Idle;
                self.settle = Some(SettleAnimation::new(
                    swipe.applied_dx,
                    None,
                    self.transform.viewport().width,
                    host.now_ms(),
                    swipe.prev.pane_visible(),
                    swipe.next.pane_visible(),
                ));
                self.schedule_frame(host);
                self.apply_pending_dims(host);
            }
            _ => {}
        }
    }

    /// Wheel zoom: an always-available path outside the session machine.
    /// Ticks arriving faster than the frame budget chain multiplicatively
    /// onto the pending target.
    pub fn wheel(&mut self, delta_y: f64, x: f64, y: f64, host: &mut impl ViewportHost) {
        if host.gestures_locked() || delta_y == 0.0 {
            return;
        }
        let base = self
            .pending_wheel
            .map(|w| w.scale)
            .unwrap_or(self.transform.state().scale);
        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT_FACTOR
        } else {
            WHEEL_ZOOM_IN_FACTOR
        };
        let target = (base * factor).clamp(self.transform.min_scale(), self.transform.max_scale());
        self.pending_wheel = Some(WheelZoom {
            scale: target,
            pivot_x: x,
            pivot_y: y,
        });
        self.schedule_frame(host);
    }

    /// Animation-frame tick: applies the coalesced geometry targets and
    /// advances the settle animation.
    pub fn on_frame(&mut self, host: &mut impl ViewportHost) {
        self.frame_scheduled = false;

        if let Some(wheel) = self.pending_wheel.take() {
            self.transform
                .apply_zoom_around_point(wheel.scale, wheel.pivot_x, wheel.pivot_y);
            host.apply_transform(self.transform.state());
        }

        let mut transform_dirty = false;
        let mut swipe_offsets = None;
        match &mut self.session {
            GestureSession::Panning(pan) => {
                self.transform.set_translate(
                    pan.start_translate_x + (pan.target_x - pan.origin_x),
                    pan.start_translate_y + (pan.target_y - pan.origin_y),
                );
                transform_dirty = true;
            }
            GestureSession::Pinching(pinch) => {
                let new_scale = pinch.start_scale * pinch.scale_ratio();
                self.transform.apply_zoom_tracking_point(
                    new_scale,
                    pinch.last_mid_x,
                    pinch.last_mid_y,
                    pinch.target_mid_x,
                    pinch.target_mid_y,
                );
                pinch.last_mid_x = pinch.target_mid_x;
                pinch.last_mid_y = pinch.target_mid_y;
                transform_dirty = true;
            }
            GestureSession::Swiping(swipe) => {
                swipe.applied_dx = swipe.target_dx;
                swipe_offsets = Some(pane_offsets(
                    swipe.applied_dx,
                    self.transform.viewport().width,
                    swipe.prev.pane_visible(),
                    swipe.next.pane_visible(),
                ));
            }
            _ => {}
        }
        if transform_dirty {
            host.apply_transform(self.transform.state());
        }
        if let Some(offsets) = swipe_offsets {
            host.set_pane_offsets(offsets);
        }

        if let Some(anim) = self.settle {
            let now = host.now_ms();
            host.set_pane_offsets(anim.offsets_at(now, self.transform.viewport().width));
            if anim.finished(now) {
                self.settle = None;
                host.clear_swipe_panes();
                host.notify_selected(anim.commit);
            } else {
                self.schedule_frame(host);
            }
        }
    }

    /// A neighbor request resolved. Duplicate or late resolutions are
    /// ignored, so providers may safely resolve more than once.
    pub fn neighbor_ready(
        &mut self,
        direction: SwipeDirection,
        sheet: Option<SheetId>,
        host: &mut impl ViewportHost,
    ) {
        let mut updated = false;
        if let GestureSession::Swiping(swipe) = &mut self.session {
            let slot = match direction {
                SwipeDirection::Previous => &mut swipe.prev,
                SwipeDirection::Next => &mut swipe.next,
            };
            if matches!(slot, NeighborSlot::Pending) {
                *slot = match sheet {
                    Some(id) => NeighborSlot::Ready(id),
                    None => NeighborSlot::Missing,
                };
                updated = true;
            }
        }
        if updated {
            host.set_neighbor_pane(direction, sheet);
            self.schedule_frame(host);
        }
    }

    /// External suspension (picker opened, drag lock asserted) or an explicit
    /// reset: cancel whatever is in progress and return to `Idle` with the
    /// view state exactly as it was.
    pub fn interrupt(&mut self, host: &mut impl ViewportHost) {
        self.abort_session(host);
    }

    /// Detaches the engine: releases any captured pointer and drops all
    /// ephemeral state. Only the view state survives.
    pub fn teardown(&mut self, host: &mut impl ViewportHost) {
        self.abort_session(host);
        self.pointers.clear();
        self.tap.invalidate();
        self.pending_dims = None;
    }

    // ── Session transitions ───────────────────────────────────────────────

    fn classify_single(
        &mut self,
        from: AwaitState,
        x: f64,
        y: f64,
        host: &mut impl ViewportHost,
    ) {
        // One-time decision per session: once panning, a session never
        // re-classifies into a swipe.
        self.tap.invalidate();
        if self.swipe_eligible() {
            self.begin_swipe(from.pointer, from.origin_x, x, host);
        } else {
            let state = self.transform.state();
            self.session = GestureSession::Panning(PanState {
                pointer: from.pointer,
                origin_x: from.origin_x,
                origin_y: from.origin_y,
                start_translate_x: state.translate_x,
                start_translate_y: state.translate_y,
                target_x: x,
                target_y: y,
            });
            self.schedule_frame(host);
        }
    }

    fn swipe_eligible(&self) -> bool {
        let at_fit =
            self.transform.state().scale <= self.transform.min_scale() * SWIPE_SCALE_EPSILON;
        at_fit && (self.neighbor_prev || self.neighbor_next)
    }

    fn begin_swipe(
        &mut self,
        pointer: PointerId,
        origin_x: f64,
        current_x: f64,
        host: &mut impl ViewportHost,
    ) {
        let prev = if self.neighbor_prev {
            host.request_neighbor(SwipeDirection::Previous);
            NeighborSlot::Pending
        } else {
            NeighborSlot::Missing
        };
        let next = if self.neighbor_next {
            host.request_neighbor(SwipeDirection::Next);
            NeighborSlot::Pending
        } else {
            NeighborSlot::Missing
        };
        host.show_swipe_panes();
        self.session = GestureSession::Swiping(SwipeState {
            pointer,
            origin_x,
            target_dx: current_x - origin_x,
            applied_dx: 0.0,
            prev,
            next,
        });
        self.schedule_frame(host);
    }

    fn enter_pinch(&mut self, host: &mut impl ViewportHost) {
        // A second pointer preempts everything. An in-progress swipe ends as
        // an immediate cancel before the pinch baseline is captured.
        if matches!(self.session, GestureSession::Swiping(_)) {
            self.cancel_swipe_immediate(host);
        }
        let Some((a, b)) = self.pointers.pair() else {
            return;
        };
        let (mid_x, mid_y, distance) = pinch_geometry(&a, &b);
        self.session = GestureSession::Pinching(PinchState {
            ids: [a.id, b.id],
            start_distance: distance,
            start_scale: self.transform.state().scale,
            last_mid_x: mid_x,
            last_mid_y: mid_y,
            target_mid_x: mid_x,
            target_mid_y: mid_y,
            target_distance: distance,
        });
        self.tap.invalidate();
    }

    fn apply_pinch_target(&mut self, pinch: &PinchState, host: &mut impl ViewportHost) {
        let new_scale = pinch.start_scale * pinch.scale_ratio();
        self.transform.apply_zoom_tracking_point(
            new_scale,
            pinch.last_mid_x,
            pinch.last_mid_y,
            pinch.target_mid_x,
            pinch.target_mid_y,
        );
        host.apply_transform(self.transform.state());
    }

    /// One pinch pointer lifted: the survivor re-seeds a pan or swipe
    /// immediately, without waiting out the slop threshold again.
    fn reseed_after_pinch(&mut self, host: &mut impl ViewportHost) {
        if self.pointers.len() >= 2 {
            self.enter_pinch(host);
            return;
        }
        match self.pointers.first() {
            Some(record) => {
                if self.swipe_eligible() {
                    self.begin_swipe(record.id, record.x, record.x, host);
                } else {
                    let state = self.transform.state();
                    self.session = GestureSession::Panning(PanState {
                        pointer: record.id,
                        origin_x: record.x,
                        origin_y: record.y,
                        start_translate_x: state.translate_x,
                        start_translate_y: state.translate_y,
                        target_x: record.x,
                        target_y: record.y,
                    });
                }
            }
            None => {
                self.session = GestureSession::Idle;
                self.apply_pending_dims(host);
            }
        }
    }

    fn resolve_swipe(&mut self, swipe: SwipeState, host: &mut impl ViewportHost) {
        let viewport_w = self.transform.viewport().width;
        let commit = resolve(swipe.target_dx, viewport_w, swipe.prev, swipe.next);
        self.settle = Some(SettleAnimation::new(
            swipe.target_dx,
            commit,
            viewport_w,
            host.now_ms(),
            swipe.prev.pane_visible(),
            swipe.next.pane_visible(),
        ));
        self.schedule_frame(host);
    }

    fn cancel_swipe_immediate(&mut self, host: &mut impl ViewportHost) {
        host.clear_swipe_panes();
        host.notify_selected(None);
        self.session = GestureSession::Idle;
    }

    fn fast_forward_settle(&mut self, host: &mut impl ViewportHost) {
        if let Some(anim) = self.settle.take() {
            host.clear_swipe_panes();
            host.notify_selected(anim.commit);
        }
    }

    fn finish_tap(&mut self, from: AwaitState, x: f64, y: f64, host: &mut impl ViewportHost) {
        if from.tap_zoom_exempt {
            self.tap.invalidate();
            return;
        }
        if let Some((pivot_x, pivot_y)) = self.tap.register_tap(x, y, host.now_ms()) {
            let min_scale = self.transform.min_scale();
            if self.transform.state().scale <= min_scale * SWIPE_SCALE_EPSILON {
                let target = (min_scale * TAP_ZOOM_FACTOR).min(self.transform.max_scale());
                self.transform.apply_zoom_around_point(target, pivot_x, pivot_y);
            } else {
                self.transform.reset_to_fit();
            }
            host.apply_transform(self.transform.state());
        }
    }

    // ── Cleanup paths ─────────────────────────────────────────────────────

    fn abort_session(&mut self, host: &mut impl ViewportHost) {
        if matches!(self.session, GestureSession::Swiping(_)) {
            self.cancel_swipe_immediate(host);
        }
        self.fast_forward_settle(host);
        self.session = GestureSession::Idle;
        self.release_all_captures(host);
        self.pending_wheel = None;
        self.apply_pending_dims(host);
    }

    /// Hung-session guard: if the driving pointer vanished without an up or
    /// cancel, the session self-terminates on this event instead of hanging.
    fn ensure_session_consistent(&mut self, host: &mut impl ViewportHost) {
        let missing = match &self.session {
            GestureSession::Idle => false,
            GestureSession::Awaiting(a) => !self.pointers.contains(a.pointer),
            GestureSession::Panning(p) => !self.pointers.contains(p.pointer),
            GestureSession::Swiping(s) => !self.pointers.contains(s.pointer),
            GestureSession::Pinching(p) => p.ids.iter().any(|id| !self.pointers.contains(*id)),
        };
        if missing {
            log::warn!("gesture pointer vanished without up/cancel; resetting session");
            self.abort_session(host);
        }
    }

    fn apply_pending_dims(&mut self, host: &mut impl ViewportHost) {
        if self.session.is_active() {
            return;
        }
        if let Some((content, viewport)) = self.pending_dims.take() {
            if self.transform.update_dimensions(content, viewport) {
                host.apply_transform(self.transform.state());
            }
        }
    }

    fn release_capture(&mut self, id: PointerId, host: &mut impl ViewportHost) {
        if let Some(index) = self.captured.iter().position(|c| *c == id) {
            self.captured.remove(index);
            host.release_pointer(id);
        }
    }

    fn release_all_captures(&mut self, host: &mut impl ViewportHost) {
        for id in self.captured.drain(..) {
            host.release_pointer(id);
        }
    }

    fn schedule_frame(&mut self, host: &mut impl ViewportHost) {
        if !self.frame_scheduled {
            self.frame_scheduled = true;
            host.request_frame();
        }
    }
}
