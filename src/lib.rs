//! boxlabel - bounding box image labeling
//!
//! The labeling core of a YOLO-style annotation tool: the canvas/image
//! coordinate transform, zoom and pan gestures, and a per-image box list
//! persisted to one label file per image. Presentation is left to a frontend
//! implementing [`surface::RenderSurface`].

pub mod annotation;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod event;
pub mod image_source;
pub mod overlay;
pub mod session;
pub mod surface;
pub mod view;

pub use annotation::{AnnotationStore, BoundingBox};
pub use config::{ConfigError, LabelerConfig};
pub use error::LabelError;
pub use event::{LabelEvent, ViewMode};
pub use image_source::ImageRef;
pub use session::{LabelingSession, Modifiers};
pub use view::{ViewTransform, ZoomPanController};
