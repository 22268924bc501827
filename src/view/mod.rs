//! Canvas view state: the coordinate transform and the controller driving it.

pub mod controller;
pub mod transform;

pub use controller::{FitResult, ZoomModality, ZoomOutcome, ZoomPanController, ZoomPolicy};
pub use transform::ViewTransform;
