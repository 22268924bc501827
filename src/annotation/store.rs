//! Box list of the active image, persisted to its label file.
//!
//! The store keeps the label file in step with memory: every `add`,
//! `undo_last` and `clear` writes through synchronously. A failed write is
//! logged and leaves the in-memory list authoritative; [`AnnotationStore::is_synced`]
//! reports it so the presentation layer can warn.

use std::path::{Path, PathBuf};

use crate::annotation::BoundingBox;
use crate::annotation::label_file::{format_labels, label_path_for, parse_labels};
use crate::error::LabelError;

/// Ordered boxes for one image, in drawing order.
#[derive(Debug)]
pub struct AnnotationStore {
    labels_dir: PathBuf,
    active_image: Option<PathBuf>,
    boxes: Vec<BoundingBox>,
    synced: bool,
}

impl AnnotationStore {
    /// Create an empty store writing label files into `labels_dir`.
    ///
    /// The directory is created lazily on first write.
    pub fn new(labels_dir: impl Into<PathBuf>) -> Self {
        Self {
            labels_dir: labels_dir.into(),
            active_image: None,
            boxes: Vec::new(),
            synced: true,
        }
    }

    /// Directory label files are written to.
    pub fn labels_dir(&self) -> &Path {
        &self.labels_dir
    }

    /// Image whose labels are currently loaded.
    pub fn active_image(&self) -> Option<&Path> {
        self.active_image.as_deref()
    }

    /// Label file path for an image.
    pub fn label_path_for(&self, image_path: &Path) -> Result<PathBuf, LabelError> {
        label_path_for(&self.labels_dir, image_path)
    }

    /// Current boxes in drawing order.
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Whether the label file matches memory after the last mutation.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Make `image_path` the active image and replace the box list with its labels.
    ///
    /// A missing label file yields an empty list. Malformed lines are skipped.
    /// If the file exists but cannot be read the list stays empty, the store
    /// reports itself unsynced and the error is returned for the caller to log.
    pub fn load(&mut self, image_path: &Path) -> Result<usize, LabelError> {
        self.boxes.clear();
        self.active_image = Some(image_path.to_path_buf());
        self.synced = true;

        let label_path = self.label_path_for(image_path)?;
        let bytes = match std::fs::read(&label_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No labels for {:?}", image_path);
                return Ok(0);
            }
            Err(e) => {
                // The file exists but memory does not reflect it
                self.synced = false;
                return Err(LabelError::io(label_path, e));
            }
        };

        // Invalid UTF-8 only spoils the lines it appears on
        self.boxes = parse_labels(&String::from_utf8_lossy(&bytes));
        log::debug!("Loaded {} boxes from {:?}", self.boxes.len(), label_path);
        Ok(self.boxes.len())
    }

    /// Write every box to the label file of `image_path`, overwriting it.
    pub fn save(&self, image_path: &Path) -> Result<(), LabelError> {
        let label_path = self.label_path_for(image_path)?;
        std::fs::create_dir_all(&self.labels_dir)
            .map_err(|e| LabelError::io(&self.labels_dir, e))?;
        std::fs::write(&label_path, format_labels(&self.boxes))
            .map_err(|e| LabelError::io(&label_path, e))?;
        log::trace!("Saved {} boxes to {:?}", self.boxes.len(), label_path);
        Ok(())
    }

    /// Delete the label file of `image_path`. Returns whether a file was removed.
    pub fn delete_labels(&self, image_path: &Path) -> Result<bool, LabelError> {
        let label_path = self.label_path_for(image_path)?;
        match std::fs::remove_file(&label_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(LabelError::io(label_path, e)),
        }
    }

    /// Append a box and persist.
    pub fn add(&mut self, x_center: f64, y_center: f64, width: f64, height: f64, class_id: u32) {
        self.push(BoundingBox::new(class_id, x_center, y_center, width, height));
    }

    /// Append an existing box and persist.
    pub fn push(&mut self, bbox: BoundingBox) {
        self.boxes.push(bbox);
        self.sync();
    }

    /// Remove the most recently added box and persist.
    ///
    /// Returns `false`, touching nothing, when the list is empty.
    pub fn undo_last(&mut self) -> bool {
        if self.boxes.pop().is_none() {
            return false;
        }
        self.sync();
        true
    }

    /// Remove every box and delete the label file.
    pub fn clear(&mut self) {
        self.boxes.clear();
        let Some(image) = self.active_image.clone() else {
            return;
        };
        match self.delete_labels(&image) {
            Ok(removed) => {
                self.synced = true;
                if removed {
                    log::debug!("Deleted labels for {:?}", image);
                }
            }
            Err(e) => {
                self.synced = false;
                log::error!("Failed to delete labels for {:?}: {}", image, e);
            }
        }
    }

    /// Drop the box list and the active image without touching disk.
    pub fn reset(&mut self) {
        self.boxes.clear();
        self.active_image = None;
        self.synced = true;
    }

    fn sync(&mut self) {
        let Some(image) = self.active_image.as_deref() else {
            log::warn!("Boxes changed with no active image; nothing persisted");
            self.synced = false;
            return;
        };
        match self.save(image) {
            Ok(()) => self.synced = true,
            Err(e) => {
                log::error!("Failed to save labels for {:?}: {}", image, e);
                self.synced = false;
            }
        }
    }
}
