//! Seams to the presentation toolkit.
//!
//! The labeling core never draws pixels or opens dialogs itself. A frontend
//! implements [`RenderSurface`] for its canvas and [`DirectoryPicker`] for
//! folder selection; [`RfdPicker`] is the native implementation.

use std::path::PathBuf;

use crate::image_source::ImageRef;

/// Opaque id of a rectangle drawn on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RectHandle(pub u64);

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl CanvasRect {
    /// Build from two corners in any order.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            min_x: a.0.min(b.0),
            min_y: a.1.min(b.1),
            max_x: a.0.max(b.0),
            max_y: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Same rectangle moved by a canvas delta.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }
}

/// Canvas a frontend draws the active image and its boxes on.
pub trait RenderSurface {
    /// Current canvas size in pixels. Zero or one before layout.
    fn viewport_size(&self) -> (f64, f64);

    /// Clear the canvas and draw `image` scaled by `scale` with its top-left at `origin`.
    fn draw_image(&mut self, image: &ImageRef, scale: f64, origin: (f64, f64));

    /// Draw a box outline and return a handle for later updates.
    fn draw_rect(&mut self, rect: CanvasRect) -> RectHandle;

    /// Move a previously drawn rectangle.
    fn move_rect(&mut self, handle: RectHandle, dx: f64, dy: f64);

    fn delete_rect(&mut self, handle: RectHandle);
}

/// Asks the user for a directory.
pub trait DirectoryPicker {
    /// `None` when the user cancels.
    fn pick_directory(&self, title: &str) -> Option<PathBuf>;
}

/// Native folder dialog.
#[derive(Debug, Clone, Default)]
pub struct RfdPicker {
    start_dir: Option<PathBuf>,
}

impl RfdPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog in `dir` instead of the platform default.
    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }
}

impl DirectoryPicker for RfdPicker {
    fn pick_directory(&self, title: &str) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title(title);
        if let Some(dir) = &self.start_dir {
            dialog = dialog.set_directory(dir);
        }
        let picked = dialog.pick_folder();
        match &picked {
            Some(dir) => log::info!("📂 Selected folder: {:?}", dir),
            None => log::debug!("Folder selection cancelled"),
        }
        picked
    }
}
