//! Bounding box annotations and their label-file persistence.

mod bbox;
pub mod label_file;
mod store;

#[cfg(test)]
mod tests;

pub use bbox::BoundingBox;
pub use store::AnnotationStore;
