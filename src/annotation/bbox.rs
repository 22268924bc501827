//! The normalized bounding box annotation.

use crate::view::transform::{denormalize, normalize};

/// One annotation: a class id and a box normalized to the original image size.
///
/// Geometry is always relative to the unscaled image and never depends on the
/// current zoom or pan; canvas positions are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub class_id: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(class_id: u32, x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            class_id,
            x_center,
            y_center,
            width,
            height,
        }
    }

    /// Build a box from two image-space corners given in any order.
    ///
    /// Returns `None` for degenerate boxes (zero width or height) or a
    /// zero-sized image.
    pub fn from_image_corners(
        class_id: u32,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        (img_width, img_height): (f64, f64),
    ) -> Option<Self> {
        if img_width <= 0.0 || img_height <= 0.0 {
            return None;
        }
        let (xc, yc, w, h) = normalize(x1, y1, x2, y2, img_width, img_height);
        if w > 0.0 && h > 0.0 {
            Some(Self::new(class_id, xc, yc, w, h))
        } else {
            None
        }
    }

    /// Image-space `(min_x, min_y, max_x, max_y)` for an image of the given size.
    pub fn to_image_corners(&self, img_width: f64, img_height: f64) -> (f64, f64, f64, f64) {
        denormalize(
            self.x_center,
            self.y_center,
            self.width,
            self.height,
            img_width,
            img_height,
        )
    }
}
