use std::path::{Path, PathBuf};

use crate::constants::dataset::IMAGE_EXTENSIONS;
use crate::error::LabelError;

/// Whether the path has one of the supported image extensions (any case).
pub fn is_supported_image(path: &Path) -> bool {
    has_extension(path, IMAGE_EXTENSIONS)
}

/// Whether the path ends in one of `extensions`, ignoring ASCII case.
pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// List the images directly inside `dir`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, LabelError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Image directory {:?} does not exist", dir);
            return Ok(Vec::new());
        }
        Err(e) => return Err(LabelError::io(dir, e)),
    };

    let mut images = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| LabelError::io(dir, e))?.path();
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        }
    }
    images.sort();

    log::debug!("Found {} images in {:?}", images.len(), dir);
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a.png")));
        assert!(is_supported_image(Path::new("dir/B.JPG")));
        assert!(is_supported_image(Path::new("c.Jpeg")));
        assert!(!is_supported_image(Path::new("labels.txt")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "notes.txt", "c.gif"] {
            std::fs::write(tmp.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(tmp.path().join("nested.png")).unwrap();

        let images = discover_images(tmp.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.JPG", "b.png", "c.gif"]);
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(discover_images(&tmp.path().join("nope")).unwrap().is_empty());
    }
}
