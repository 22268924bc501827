//! Canvas, image and normalized coordinate mathematics.
//!
//! Three coordinate spaces are involved:
//!
//! - **canvas**: pixels of the viewport, depending on scale and pan origin
//! - **image**: pixels of the original, unscaled image
//! - **normalized**: YOLO `(x_center, y_center, width, height)` in `[0, 1]`
//!   relative to the original image size
//!
//! [`ViewTransform`] converts between canvas and image space. The normalized
//! conversions only depend on the image size and are free functions.

/// Scale and image origin of the current view.
///
/// `origin_x`/`origin_y` is the canvas position of the image's top-left
/// corner at the current scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl ViewTransform {
    /// Create a new transform with the given scale and origin.
    pub fn new(scale: f64, origin_x: f64, origin_y: f64) -> Self {
        Self {
            scale,
            origin_x,
            origin_y,
        }
    }

    /// Create an identity transform (scale=1, origin at canvas top-left).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Convert a canvas position to original image pixels.
    pub fn to_image_coords(&self, canvas_x: f64, canvas_y: f64) -> (f64, f64) {
        (
            (canvas_x - self.origin_x) / self.scale,
            (canvas_y - self.origin_y) / self.scale,
        )
    }

    /// Convert original image pixels to a canvas position.
    pub fn to_canvas_coords(&self, img_x: f64, img_y: f64) -> (f64, f64) {
        (
            img_x * self.scale + self.origin_x,
            img_y * self.scale + self.origin_y,
        )
    }

    /// Set `scale` and place the image for it.
    ///
    /// Along each axis where the scaled image is smaller than the canvas the
    /// image is centered; otherwise it is pinned at origin 0 on that axis
    /// until the user pans.
    pub fn center_on(
        &mut self,
        scale: f64,
        canvas_width: f64,
        canvas_height: f64,
        img_width: f64,
        img_height: f64,
    ) {
        self.scale = scale;

        let scaled_width = img_width * scale;
        let scaled_height = img_height * scale;

        self.origin_x = if scaled_width < canvas_width {
            (canvas_width - scaled_width) / 2.0
        } else {
            0.0
        };
        self.origin_y = if scaled_height < canvas_height {
            (canvas_height - scaled_height) / 2.0
        } else {
            0.0
        };
    }

    /// Move the image by a canvas delta. No clamping.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.origin_x += dx;
        self.origin_y += dy;
    }

    /// Change the scale while keeping the image point under the focal
    /// canvas position fixed.
    ///
    /// 1. Find the image-space point under the focal point at the old scale
    /// 2. Apply the new scale
    /// 3. Move the origin so that point maps back onto the focal point
    pub fn zoom_at(&mut self, new_scale: f64, focal_x: f64, focal_y: f64) {
        let (img_x, img_y) = self.to_image_coords(focal_x, focal_y);
        self.scale = new_scale;
        self.origin_x = focal_x - img_x * new_scale;
        self.origin_y = focal_y - img_y * new_scale;
    }

    /// Size of the image on the canvas at the current scale.
    pub fn scaled_size(&self, img_width: f64, img_height: f64) -> (f64, f64) {
        (img_width * self.scale, img_height * self.scale)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Scale that fits the whole image into the canvas, shrunk by `margin`.
///
/// Returns `None` while the canvas has not been laid out yet (either side
/// `<= 1`); the caller should try again once it has a real size.
pub fn fit_to_canvas(
    canvas_width: f64,
    canvas_height: f64,
    img_width: f64,
    img_height: f64,
    margin: f64,
) -> Option<f64> {
    if canvas_width <= 1.0 || canvas_height <= 1.0 || img_width <= 0.0 || img_height <= 0.0 {
        return None;
    }
    let scale_x = canvas_width / img_width;
    let scale_y = canvas_height / img_height;
    Some(scale_x.min(scale_y) * margin)
}

/// Convert two image-space corners into YOLO `(x_center, y_center, width, height)`.
///
/// The corners can be given in any diagonal order.
pub fn normalize(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    img_width: f64,
    img_height: f64,
) -> (f64, f64, f64, f64) {
    let x_center = (x1 + x2) / 2.0 / img_width;
    let y_center = (y1 + y2) / 2.0 / img_height;
    let width = (x2 - x1).abs() / img_width;
    let height = (y2 - y1).abs() / img_height;
    (x_center, y_center, width, height)
}

/// Convert YOLO `(x_center, y_center, width, height)` back into the
/// image-space `(min_x, min_y, max_x, max_y)` corners.
pub fn denormalize(
    x_center: f64,
    y_center: f64,
    width: f64,
    height: f64,
    img_width: f64,
    img_height: f64,
) -> (f64, f64, f64, f64) {
    let x1 = (x_center - width / 2.0) * img_width;
    let y1 = (y_center - height / 2.0) * img_height;
    let x2 = (x_center + width / 2.0) * img_width;
    let y2 = (y_center + height / 2.0) * img_height;
    (x1, y1, x2, y2)
}
