//! Rectangle overlay for the boxes of the active image.
//!
//! Handles are derived from the normalized box list on every full redraw and
//! only shifted in place while panning. Canvas coordinates are never stored
//! alongside the boxes themselves.

use crate::annotation::BoundingBox;
use crate::surface::{CanvasRect, RectHandle, RenderSurface};
use crate::view::ViewTransform;
use crate::view::controller::DrawnRect;

/// Rectangles currently shown on a surface.
#[derive(Debug, Default)]
pub struct BoxOverlay {
    handles: Vec<RectHandle>,
    preview: Option<RectHandle>,
}

impl BoxOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles of the drawn boxes, in box order.
    pub fn handles(&self) -> &[RectHandle] {
        &self.handles
    }

    /// Canvas rectangle of one box under `transform`.
    pub fn canvas_rect(
        bbox: &BoundingBox,
        transform: &ViewTransform,
        image_size: (f64, f64),
    ) -> CanvasRect {
        let (x1, y1, x2, y2) = bbox.to_image_corners(image_size.0, image_size.1);
        CanvasRect::from_corners(
            transform.to_canvas_coords(x1, y1),
            transform.to_canvas_coords(x2, y2),
        )
    }

    /// Remove every rectangle and draw one per box.
    pub fn redraw(
        &mut self,
        surface: &mut dyn RenderSurface,
        transform: &ViewTransform,
        image_size: (f64, f64),
        boxes: &[BoundingBox],
    ) {
        self.clear(surface);
        self.handles = boxes
            .iter()
            .map(|b| surface.draw_rect(Self::canvas_rect(b, transform, image_size)))
            .collect();
        log::trace!("Overlay redrawn with {} boxes", self.handles.len());
    }

    /// Move every rectangle by a pan delta.
    pub fn shift(&mut self, surface: &mut dyn RenderSurface, dx: f64, dy: f64) {
        for handle in self.handles.iter().chain(self.preview.iter()) {
            surface.move_rect(*handle, dx, dy);
        }
    }

    /// Show the rubber band of a box being drawn, replacing the previous one.
    pub fn set_preview(&mut self, surface: &mut dyn RenderSurface, rect: Option<DrawnRect>) {
        if let Some(handle) = self.preview.take() {
            surface.delete_rect(handle);
        }
        self.preview = rect.map(|r| surface.draw_rect(CanvasRect::from_corners(r.start, r.end)));
    }

    /// Remove every rectangle from the surface.
    pub fn clear(&mut self, surface: &mut dyn RenderSurface) {
        for handle in self.handles.drain(..).chain(self.preview.take()) {
            surface.delete_rect(handle);
        }
    }
}
