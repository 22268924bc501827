//! Zoom policy and pointer gesture sessions.
//!
//! The controller owns everything about *how* the view may change: the zoom
//! limits of each input modality, the wheel cooldown, and the two gesture
//! sessions (drawing a box, dragging the image). It never owns the
//! [`ViewTransform`] itself; callers pass the transform of the active image.
//!
//! Drawing and panning are mutually exclusive. While a box is being drawn
//! every zoom operation is rejected so the rubber band stays aligned with a
//! fixed view.

use std::time::Duration;
use web_time::Instant;

use crate::config::ZoomConfig;
use crate::view::transform::{ViewTransform, fit_to_canvas};

/// Input modality a zoom request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomModality {
    /// Zoom shortcuts and absolute zoom actions
    Keyboard,
    /// Mouse wheel, debounced and centered on the cursor
    Mouse,
}

/// Direction of a relative zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Why a zoom request did not change the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A box is being drawn
    Drawing,
    /// The step would leave the allowed scale range
    OutOfRange,
    /// A wheel zoom arrived inside the cooldown window
    Cooldown,
    /// No image is open
    NoImage,
}

/// Result of a zoom request. Rejections are expected steady-state
/// occurrences, not errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomOutcome {
    /// The view now has this scale
    Applied(f64),
    /// Nothing changed
    Rejected(RejectReason),
}

impl ZoomOutcome {
    /// Whether the view changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, ZoomOutcome::Applied(_))
    }
}

/// Result of a fit-to-canvas request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitResult {
    /// The view was refit with this scale
    Applied(f64),
    /// The canvas has no usable size yet; retry after layout
    Deferred,
    /// A box is being drawn
    Rejected,
}

/// Zoom limits and increments per modality.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomPolicy {
    pub min: f64,
    pub max_keyboard: f64,
    pub max_mouse: f64,
    pub keyboard_step: f64,
    pub mouse_step: f64,
    pub wheel_cooldown: Duration,
    pub canvas_margin: f64,
}

impl ZoomPolicy {
    /// Upper scale bound for the given modality.
    pub fn max_for(&self, modality: ZoomModality) -> f64 {
        match modality {
            ZoomModality::Keyboard => self.max_keyboard,
            ZoomModality::Mouse => self.max_mouse,
        }
    }

    /// Multiplicative step for the given modality.
    pub fn step_for(&self, modality: ZoomModality) -> f64 {
        match modality {
            ZoomModality::Keyboard => self.keyboard_step,
            ZoomModality::Mouse => self.mouse_step,
        }
    }

    /// Clamp a scale to the absolute-zoom range.
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max_keyboard)
    }
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self::from(&ZoomConfig::default())
    }
}

impl From<&ZoomConfig> for ZoomPolicy {
    fn from(config: &ZoomConfig) -> Self {
        Self {
            min: config.min,
            max_keyboard: config.max_keyboard,
            max_mouse: config.max_mouse,
            keyboard_step: config.keyboard_step,
            mouse_step: config.mouse_step,
            wheel_cooldown: Duration::from_millis(config.wheel_cooldown_ms),
            canvas_margin: config.canvas_margin,
        }
    }
}

/// Two canvas corners produced by a finished drawing gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnRect {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl DrawnRect {
    /// Canvas width of the rectangle.
    pub fn width(&self) -> f64 {
        (self.end.0 - self.start.0).abs()
    }

    /// Canvas height of the rectangle.
    pub fn height(&self) -> f64 {
        (self.end.1 - self.start.1).abs()
    }
}

/// Active pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Drawing { start: (f64, f64), current: (f64, f64) },
    Panning { last: (f64, f64) },
}

/// Applies gestures to a [`ViewTransform`] under a [`ZoomPolicy`].
#[derive(Debug, Clone)]
pub struct ZoomPanController {
    policy: ZoomPolicy,
    min_box_size: f64,
    pan_deadzone: f64,
    gesture: Gesture,
    last_wheel_zoom: Option<Instant>,
}

impl ZoomPanController {
    /// Create a controller with the given policy and gesture thresholds.
    pub fn new(policy: ZoomPolicy, min_box_size: f64, pan_deadzone: f64) -> Self {
        Self {
            policy,
            min_box_size,
            pan_deadzone,
            gesture: Gesture::Idle,
            last_wheel_zoom: None,
        }
    }

    /// The zoom policy in effect.
    pub fn policy(&self) -> &ZoomPolicy {
        &self.policy
    }

    /// Whether a box-drawing gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, Gesture::Drawing { .. })
    }

    /// Whether a pan gesture is in progress.
    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// Rubber band of the box being drawn, if any.
    pub fn drawing_rect(&self) -> Option<DrawnRect> {
        match self.gesture {
            Gesture::Drawing { start, current } => Some(DrawnRect {
                start,
                end: current,
            }),
            _ => None,
        }
    }

    /// Forget any gesture and the wheel cooldown. Used when the active image changes.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.last_wheel_zoom = None;
    }

    // ------------------------------------------------------------------
    // Draw session
    // ------------------------------------------------------------------

    /// Enter a draw-session at a canvas position. Ends any pan in progress.
    pub fn begin_draw(&mut self, x: f64, y: f64) {
        if self.is_panning() {
            log::debug!("Drawing started while panning, pan ended");
        }
        self.gesture = Gesture::Drawing {
            start: (x, y),
            current: (x, y),
        };
    }

    /// Move the free corner of the box being drawn.
    pub fn update_draw(&mut self, x: f64, y: f64) {
        if let Gesture::Drawing { current, .. } = &mut self.gesture {
            *current = (x, y);
        }
    }

    /// Leave the draw-session.
    ///
    /// Returns the drawn rectangle when both sides exceed the minimum box
    /// size; smaller drags are discarded.
    pub fn end_draw(&mut self, x: f64, y: f64) -> Option<DrawnRect> {
        let Gesture::Drawing { start, .. } = self.gesture else {
            return None;
        };
        self.gesture = Gesture::Idle;

        let rect = DrawnRect { start, end: (x, y) };
        if rect.width() > self.min_box_size && rect.height() > self.min_box_size {
            Some(rect)
        } else {
            log::trace!(
                "Discarded box {:.1}x{:.1} (minimum {:.1})",
                rect.width(),
                rect.height(),
                self.min_box_size
            );
            None
        }
    }

    /// Abandon the box being drawn without producing a rectangle.
    pub fn cancel_draw(&mut self) {
        if self.is_drawing() {
            self.gesture = Gesture::Idle;
        }
    }

    // ------------------------------------------------------------------
    // Pan session
    // ------------------------------------------------------------------

    /// Enter a pan-session. Refused while a box is being drawn.
    pub fn begin_pan(&mut self, x: f64, y: f64) -> bool {
        if self.is_drawing() {
            return false;
        }
        self.gesture = Gesture::Panning { last: (x, y) };
        true
    }

    /// Track the pointer during a pan.
    ///
    /// Movements within the deadzone are ignored and do not advance the
    /// tracked position. Otherwise the transform is panned and the applied
    /// delta returned, so overlays can shift by the same amount.
    pub fn update_pan(
        &mut self,
        transform: &mut ViewTransform,
        x: f64,
        y: f64,
    ) -> Option<(f64, f64)> {
        let Gesture::Panning { last } = &mut self.gesture else {
            return None;
        };

        let dx = x - last.0;
        let dy = y - last.1;
        if dx.abs() <= self.pan_deadzone && dy.abs() <= self.pan_deadzone {
            return None;
        }

        transform.pan_by(dx, dy);
        *last = (x, y);
        Some((dx, dy))
    }

    /// Leave the pan-session.
    pub fn end_pan(&mut self) {
        if self.is_panning() {
            self.gesture = Gesture::Idle;
        }
    }

    // ------------------------------------------------------------------
    // Zoom
    // ------------------------------------------------------------------

    /// One keyboard zoom step in. The image stays anchored at its origin.
    pub fn zoom_in_keyboard(&mut self, transform: &mut ViewTransform) -> ZoomOutcome {
        self.zoom_step(transform, ZoomModality::Keyboard, ZoomDirection::In, None)
    }

    /// One keyboard zoom step out. The image stays anchored at its origin.
    pub fn zoom_out_keyboard(&mut self, transform: &mut ViewTransform) -> ZoomOutcome {
        self.zoom_step(transform, ZoomModality::Keyboard, ZoomDirection::Out, None)
    }

    /// One wheel tick in, centered on the cursor.
    pub fn zoom_in_mouse(&mut self, transform: &mut ViewTransform, x: f64, y: f64) -> ZoomOutcome {
        self.zoom_mouse_at(transform, ZoomDirection::In, x, y, Instant::now())
    }

    /// One wheel tick out, centered on the cursor.
    pub fn zoom_out_mouse(&mut self, transform: &mut ViewTransform, x: f64, y: f64) -> ZoomOutcome {
        self.zoom_mouse_at(transform, ZoomDirection::Out, x, y, Instant::now())
    }

    /// Wheel zoom with an explicit timestamp for the cooldown check.
    pub fn zoom_mouse_at(
        &mut self,
        transform: &mut ViewTransform,
        direction: ZoomDirection,
        x: f64,
        y: f64,
        now: Instant,
    ) -> ZoomOutcome {
        if self.is_drawing() {
            return reject(RejectReason::Drawing);
        }
        if let Some(last) = self.last_wheel_zoom {
            if now.saturating_duration_since(last) < self.policy.wheel_cooldown {
                return reject(RejectReason::Cooldown);
            }
        }

        let outcome = self.zoom_step(transform, ZoomModality::Mouse, direction, Some((x, y)));
        if outcome.is_applied() {
            self.last_wheel_zoom = Some(now);
        }
        outcome
    }

    /// Jump to an absolute scale, clamped to the keyboard range.
    ///
    /// Without a focal point the origin is left untouched, so the zoom is
    /// anchored at the image's current top-left corner.
    pub fn zoom_to_scale(
        &mut self,
        transform: &mut ViewTransform,
        scale: f64,
        focal: Option<(f64, f64)>,
    ) -> ZoomOutcome {
        if self.is_drawing() {
            return reject(RejectReason::Drawing);
        }
        let scale = self.policy.clamp(scale);
        apply_scale(transform, scale, focal);
        log::debug!("🔍 Zoom to {:.0}%", scale * 100.0);
        ZoomOutcome::Applied(scale)
    }

    /// Refit the image into the canvas and center it.
    pub fn fit(
        &mut self,
        transform: &mut ViewTransform,
        canvas_size: (f64, f64),
        image_size: (f64, f64),
    ) -> FitResult {
        if self.is_drawing() {
            log::trace!("Fit rejected: drawing in progress");
            return FitResult::Rejected;
        }
        let Some(scale) = fit_to_canvas(
            canvas_size.0,
            canvas_size.1,
            image_size.0,
            image_size.1,
            self.policy.canvas_margin,
        ) else {
            log::debug!(
                "Canvas not laid out yet ({}x{}), fit deferred",
                canvas_size.0,
                canvas_size.1
            );
            return FitResult::Deferred;
        };

        let scale = self.policy.clamp(scale);
        transform.center_on(scale, canvas_size.0, canvas_size.1, image_size.0, image_size.1);
        log::debug!(
            "🔍 Fit: {:.2}x, origin ({:.1}, {:.1})",
            scale,
            transform.origin_x,
            transform.origin_y
        );
        FitResult::Applied(scale)
    }

    fn zoom_step(
        &mut self,
        transform: &mut ViewTransform,
        modality: ZoomModality,
        direction: ZoomDirection,
        focal: Option<(f64, f64)>,
    ) -> ZoomOutcome {
        if self.is_drawing() {
            return reject(RejectReason::Drawing);
        }

        let step = self.policy.step_for(modality);
        let new_scale = match direction {
            ZoomDirection::In => transform.scale * step,
            ZoomDirection::Out => transform.scale / step,
        };
        if new_scale > self.policy.max_for(modality) || new_scale < self.policy.min {
            return reject(RejectReason::OutOfRange);
        }

        apply_scale(transform, new_scale, focal);
        log::debug!("🔍 Zoom {:?} ({:?}): {:.2}x", direction, modality, new_scale);
        ZoomOutcome::Applied(new_scale)
    }
}

impl Default for ZoomPanController {
    fn default() -> Self {
        Self::new(
            ZoomPolicy::default(),
            crate::constants::gesture::MIN_BOX_SIZE,
            crate::constants::gesture::PAN_DEADZONE,
        )
    }
}

fn apply_scale(transform: &mut ViewTransform, scale: f64, focal: Option<(f64, f64)>) {
    match focal {
        Some((x, y)) => transform.zoom_at(scale, x, y),
        None => transform.scale = scale,
    }
}

fn reject(reason: RejectReason) -> ZoomOutcome {
    log::trace!("Zoom rejected: {:?}", reason);
    ZoomOutcome::Rejected(reason)
}

/// Zoom level as a whole percentage for display.
pub fn zoom_percentage(transform: &ViewTransform) -> u32 {
    (transform.scale * 100.0).floor().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn controller() -> ZoomPanController {
        ZoomPanController::default()
    }

    #[test]
    fn test_keyboard_zoom_in_multiplies() {
        let mut c = controller();
        let mut t = ViewTransform::new(1.0, 30.0, 40.0);
        let outcome = c.zoom_in_keyboard(&mut t);
        assert!(outcome.is_applied());
        assert!(approx_eq(t.scale, 1.1));
        // Anchored at the current origin
        assert_eq!((t.origin_x, t.origin_y), (30.0, 40.0));
    }

    #[test]
    fn test_keyboard_zoom_in_past_max_is_rejected() {
        let mut c = controller();
        let mut t = ViewTransform::new(1.9, 0.0, 0.0);
        let outcome = c.zoom_in_keyboard(&mut t);
        assert_eq!(outcome, ZoomOutcome::Rejected(RejectReason::OutOfRange));
        assert_eq!(t.scale, 1.9);
    }

    #[test]
    fn test_keyboard_zoom_out_past_min_is_rejected() {
        let mut c = controller();
        let mut t = ViewTransform::new(0.105, 0.0, 0.0);
        let outcome = c.zoom_out_keyboard(&mut t);
        assert_eq!(outcome, ZoomOutcome::Rejected(RejectReason::OutOfRange));
        assert_eq!(t.scale, 0.105);

        let mut t = ViewTransform::new(1.0, 0.0, 0.0);
        assert!(c.zoom_out_keyboard(&mut t).is_applied());
        assert!(approx_eq(t.scale, 1.0 / 1.1));
    }

    #[test]
    fn test_zoom_rejected_while_drawing() {
        let mut c = controller();
        let mut t = ViewTransform::new(1.0, 5.0, 5.0);
        c.begin_draw(10.0, 10.0);

        let before = t;
        let now = Instant::now();
        assert_eq!(
            c.zoom_in_keyboard(&mut t),
            ZoomOutcome::Rejected(RejectReason::Drawing)
        );
        assert_eq!(
            c.zoom_out_keyboard(&mut t),
            ZoomOutcome::Rejected(RejectReason::Drawing)
        );
        assert_eq!(
            c.zoom_mouse_at(&mut t, ZoomDirection::In, 50.0, 50.0, now),
            ZoomOutcome::Rejected(RejectReason::Drawing)
        );
        assert_eq!(
            c.zoom_to_scale(&mut t, 2.0, None),
            ZoomOutcome::Rejected(RejectReason::Drawing)
        );
        assert_eq!(
            c.fit(&mut t, (800.0, 600.0), (100.0, 100.0)),
            FitResult::Rejected
        );
        assert_eq!(t, before);

        // Leaving the draw-session restores normal zoom behavior
        c.end_draw(12.0, 12.0);
        assert!(c.zoom_in_keyboard(&mut t).is_applied());
        assert!(approx_eq(t.scale, 1.1));
    }

    #[test]
    fn test_mouse_zoom_uses_smaller_step_and_focal_point() {
        let mut c = controller();
        let mut t = ViewTransform::new(1.0, 20.0, 10.0);
        let focal = (200.0, 150.0);
        let img_before = t.to_image_coords(focal.0, focal.1);

        let outcome = c.zoom_mouse_at(&mut t, ZoomDirection::In, focal.0, focal.1, Instant::now());
        assert!(outcome.is_applied());
        assert!(approx_eq(t.scale, 1.05));

        let (cx, cy) = t.to_canvas_coords(img_before.0, img_before.1);
        assert!(approx_eq(cx, focal.0));
        assert!(approx_eq(cy, focal.1));
    }

    #[test]
    fn test_mouse_zoom_cooldown_is_sliding() {
        let mut c = controller();
        let mut t = ViewTransform::identity();
        let t0 = Instant::now();
        let cooldown = c.policy().wheel_cooldown;

        assert!(c.zoom_mouse_at(&mut t, ZoomDirection::In, 0.0, 0.0, t0).is_applied());
        let scale = t.scale;

        let inside = t0 + cooldown / 2;
        assert_eq!(
            c.zoom_mouse_at(&mut t, ZoomDirection::In, 0.0, 0.0, inside),
            ZoomOutcome::Rejected(RejectReason::Cooldown)
        );
        assert_eq!(t.scale, scale);

        // A rejected tick does not extend the window
        let after = t0 + cooldown;
        assert!(c.zoom_mouse_at(&mut t, ZoomDirection::In, 0.0, 0.0, after).is_applied());

        // The window restarts at the last accepted tick
        let inside_again = after + cooldown / 2;
        assert_eq!(
            c.zoom_mouse_at(&mut t, ZoomDirection::Out, 0.0, 0.0, inside_again),
            ZoomOutcome::Rejected(RejectReason::Cooldown)
        );
    }

    #[test]
    fn test_mouse_zoom_respects_mouse_max() {
        let policy = ZoomPolicy {
            max_mouse: 1.5,
            ..ZoomPolicy::default()
        };
        let mut c = ZoomPanController::new(policy, 5.0, 1.0);
        let mut t = ViewTransform::new(1.45, 0.0, 0.0);

        let outcome = c.zoom_mouse_at(&mut t, ZoomDirection::In, 0.0, 0.0, Instant::now());
        assert_eq!(outcome, ZoomOutcome::Rejected(RejectReason::OutOfRange));

        // Keyboard still has its own ceiling
        assert!(c.zoom_in_keyboard(&mut t).is_applied());
    }

    #[test]
    fn test_out_of_range_wheel_does_not_start_cooldown() {
        let mut c = controller();
        let mut t = ViewTransform::new(1.99, 0.0, 0.0);
        let t0 = Instant::now();
        assert_eq!(
            c.zoom_mouse_at(&mut t, ZoomDirection::In, 0.0, 0.0, t0),
            ZoomOutcome::Rejected(RejectReason::OutOfRange)
        );
        assert!(c.zoom_mouse_at(&mut t, ZoomDirection::Out, 0.0, 0.0, t0).is_applied());
    }

    #[test]
    fn test_zoom_to_scale_clamps_and_keeps_origin() {
        let mut c = controller();
        let mut t = ViewTransform::new(0.5, 70.0, 80.0);

        assert_eq!(c.zoom_to_scale(&mut t, 1.0, None), ZoomOutcome::Applied(1.0));
        assert_eq!((t.origin_x, t.origin_y), (70.0, 80.0));

        assert_eq!(c.zoom_to_scale(&mut t, 10.0, None), ZoomOutcome::Applied(2.0));
        assert_eq!(c.zoom_to_scale(&mut t, 0.0, None), ZoomOutcome::Applied(0.1));
    }

    #[test]
    fn test_zoom_to_scale_with_focal_point() {
        let mut c = controller();
        let mut t = ViewTransform::new(1.0, 0.0, 0.0);
        let before = t.to_image_coords(400.0, 300.0);
        c.zoom_to_scale(&mut t, 2.0, Some((400.0, 300.0)));
        let after = t.to_image_coords(400.0, 300.0);
        assert!(approx_eq(before.0, after.0));
        assert!(approx_eq(before.1, after.1));
    }

    #[test]
    fn test_fit_centers_and_defers() {
        let mut c = controller();
        let mut t = ViewTransform::identity();

        assert_eq!(c.fit(&mut t, (1.0, 1.0), (1000.0, 500.0)), FitResult::Deferred);
        assert_eq!(t, ViewTransform::identity());

        let result = c.fit(&mut t, (800.0, 600.0), (1000.0, 500.0));
        assert!(matches!(result, FitResult::Applied(s) if approx_eq(s, 0.72)));
        // 720x360 image centered in 800x600
        assert!(approx_eq(t.origin_x, 40.0));
        assert!(approx_eq(t.origin_y, 120.0));
    }

    #[test]
    fn test_end_draw_discards_small_boxes() {
        let mut c = controller();
        c.begin_draw(100.0, 100.0);
        assert!(c.is_drawing());
        assert_eq!(c.end_draw(104.0, 300.0), None);
        assert!(!c.is_drawing());

        c.begin_draw(100.0, 100.0);
        c.update_draw(150.0, 160.0);
        assert_eq!(
            c.drawing_rect(),
            Some(DrawnRect {
                start: (100.0, 100.0),
                end: (150.0, 160.0)
            })
        );
        let rect = c.end_draw(40.0, 20.0).unwrap();
        assert_eq!(rect.start, (100.0, 100.0));
        assert_eq!(rect.end, (40.0, 20.0));
    }

    #[test]
    fn test_pan_deadzone_and_delta() {
        let mut c = controller();
        let mut t = ViewTransform::identity();
        assert!(c.begin_pan(10.0, 10.0));

        // Within the 1-unit deadzone: nothing happens
        assert_eq!(c.update_pan(&mut t, 11.0, 10.5), None);
        assert_eq!(t, ViewTransform::identity());

        assert_eq!(c.update_pan(&mut t, 15.0, 7.0), Some((5.0, -3.0)));
        assert_eq!((t.origin_x, t.origin_y), (5.0, -3.0));

        // Deltas are measured from the last applied position
        assert_eq!(c.update_pan(&mut t, 25.0, 7.0), Some((10.0, 0.0)));
        assert_eq!((t.origin_x, t.origin_y), (15.0, -3.0));

        c.end_pan();
        assert!(!c.is_panning());
        assert_eq!(c.update_pan(&mut t, 100.0, 100.0), None);
    }

    #[test]
    fn test_pan_refused_while_drawing() {
        let mut c = controller();
        let mut t = ViewTransform::identity();
        c.begin_draw(0.0, 0.0);
        assert!(!c.begin_pan(0.0, 0.0));
        assert_eq!(c.update_pan(&mut t, 50.0, 50.0), None);
        assert!(c.is_drawing());
    }

    #[test]
    fn test_zoom_percentage() {
        assert_eq!(zoom_percentage(&ViewTransform::new(1.0, 0.0, 0.0)), 100);
        assert_eq!(zoom_percentage(&ViewTransform::new(0.726, 0.0, 0.0)), 72);
    }
}
