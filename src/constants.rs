//! Default values for the labeling core.
//!
//! Everything here can be overridden through [`crate::LabelerConfig`]; these
//! constants are the values the config falls back to.

/// Zoom limits and increments.
pub mod zoom {
    /// Minimum zoom (10% of original size)
    pub const MIN: f64 = 0.1;
    /// Maximum zoom reachable with keyboard shortcuts and absolute zoom (200%)
    pub const MAX_KEYBOARD: f64 = 2.0;
    /// Maximum zoom reachable with the mouse wheel
    pub const MAX_MOUSE: f64 = 2.0;
    /// Multiplicative step for one keyboard zoom
    pub const KEYBOARD_STEP: f64 = 1.1;
    /// Multiplicative step for one wheel tick
    pub const MOUSE_STEP: f64 = 1.05;
    /// Minimum time between two accepted wheel zooms, in milliseconds
    pub const WHEEL_COOLDOWN_MS: u64 = 50;
    /// Fraction of the canvas an image occupies after "fit"
    pub const CANVAS_MARGIN: f64 = 0.9;
}

/// Pointer gesture thresholds (canvas pixels).
pub mod gesture {
    /// Both sides of a drawn box must exceed this to become a box
    pub const MIN_BOX_SIZE: f64 = 5.0;
    /// Pointer movement at or below this is ignored while panning
    pub const PAN_DEADZONE: f64 = 1.0;
}

/// Label file layout.
pub mod label {
    /// Extension of label files, without the dot
    pub const EXTENSION: &str = "txt";
    /// Decimal places written for normalized coordinates
    pub const PRECISION: usize = 6;
    /// Class id assigned to newly drawn boxes
    pub const DEFAULT_CLASS_ID: u32 = 0;
}

/// Dataset directories and file types.
pub mod dataset {
    /// Default directory holding source images
    pub const IMAGES_DIR: &str = "data/images";
    /// Default directory holding label files
    pub const LABELS_DIR: &str = "data/labels";
    /// Image extensions the labeler picks up (lowercase, without dots)
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];
    /// Extensions the resize utility accepts; a superset of the labeler's
    pub const RESIZE_EXTENSIONS: &[&str] =
        &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];
    /// Shorter-side target used by the resize utility
    pub const RESIZE_TARGET: u32 = 640;
    /// JPEG quality used by the resize utility
    pub const RESIZE_JPEG_QUALITY: u8 = 95;
}
