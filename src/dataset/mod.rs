//! Dataset housekeeping: finding images, scaffolding label files and
//! normalizing image sizes before labeling.

mod discover;
mod resize;
mod scaffold;

pub use discover::{discover_images, is_supported_image};
pub use resize::{ResizeReport, resize_directory, resize_to_short_side, short_side_dimensions};
pub use scaffold::{ScaffoldReport, scaffold_labels};
