use std::path::{Path, PathBuf};

use crate::annotation::label_file::label_path_for;
use crate::dataset::discover_images;
use crate::error::LabelError;

/// Outcome of [`scaffold_labels`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    /// Images found in the images directory
    pub images: usize,
    /// Label files that were created empty
    pub created: Vec<PathBuf>,
}

impl ScaffoldReport {
    /// Images that already had a label file.
    pub fn existing(&self) -> usize {
        self.images - self.created.len()
    }
}

/// Create an empty label file for every image that has none.
///
/// Existing label files are never touched. The labels directory is created
/// if needed.
pub fn scaffold_labels(images_dir: &Path, labels_dir: &Path) -> Result<ScaffoldReport, LabelError> {
    std::fs::create_dir_all(labels_dir).map_err(|e| LabelError::io(labels_dir, e))?;

    let images = discover_images(images_dir)?;
    let mut report = ScaffoldReport {
        images: images.len(),
        created: Vec::new(),
    };

    for image in &images {
        let label_path = label_path_for(labels_dir, image)?;
        if label_path.exists() {
            continue;
        }
        std::fs::write(&label_path, "").map_err(|e| LabelError::io(&label_path, e))?;
        log::debug!("Created empty label file {:?}", label_path);
        report.created.push(label_path);
    }

    log::info!(
        "Scaffolded {} label files for {} images",
        report.created.len(),
        report.images
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_creates_only_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let images = tmp.path().join("images");
        let labels = tmp.path().join("labels");
        std::fs::create_dir_all(&images).unwrap();
        std::fs::create_dir_all(&labels).unwrap();
        for name in ["a.jpg", "b.png", "c.bmp"] {
            std::fs::write(images.join(name), b"").unwrap();
        }
        std::fs::write(labels.join("b.txt"), "0 0.5 0.5 0.1 0.1\n").unwrap();

        let report = scaffold_labels(&images, &labels).unwrap();
        assert_eq!(report.images, 3);
        assert_eq!(report.created, vec![labels.join("a.txt"), labels.join("c.txt")]);
        assert_eq!(report.existing(), 1);

        assert_eq!(std::fs::read_to_string(labels.join("a.txt")).unwrap(), "");
        assert_eq!(
            std::fs::read_to_string(labels.join("b.txt")).unwrap(),
            "0 0.5 0.5 0.1 0.1\n"
        );

        // Second run has nothing to do
        let again = scaffold_labels(&images, &labels).unwrap();
        assert!(again.created.is_empty());
    }

    #[test]
    fn test_scaffold_creates_labels_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let labels = tmp.path().join("out").join("labels");
        let report = scaffold_labels(&tmp.path().join("images"), &labels).unwrap();
        assert_eq!(report, ScaffoldReport::default());
        assert!(labels.is_dir());
    }
}
