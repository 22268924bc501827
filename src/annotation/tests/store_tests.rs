//! Tests for the write-through annotation store.

use std::path::{Path, PathBuf};

use crate::annotation::{AnnotationStore, BoundingBox};
use crate::view::transform::ViewTransform;

const EPSILON: f64 = 1e-6;

fn store_in(dir: &Path) -> (AnnotationStore, PathBuf) {
    let labels = dir.join("labels");
    (AnnotationStore::new(&labels), labels)
}

fn image_path(dir: &Path, name: &str) -> PathBuf {
    dir.join("images").join(name)
}

#[test]
fn test_load_missing_file_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, _) = store_in(tmp.path());

    let count = store.load(&image_path(tmp.path(), "a.jpg")).unwrap();
    assert_eq!(count, 0);
    assert!(store.is_empty());
    assert_eq!(store.active_image(), Some(image_path(tmp.path(), "a.jpg").as_path()));
}

#[test]
fn test_add_persists_immediately() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, labels) = store_in(tmp.path());
    let image = image_path(tmp.path(), "photo.png");
    store.load(&image).unwrap();

    store.add(0.5, 0.5, 0.2, 0.1, 0);
    assert!(store.is_synced());

    let content = std::fs::read_to_string(labels.join("photo.txt")).unwrap();
    assert_eq!(content, "0 0.500000 0.500000 0.200000 0.100000\n");

    store.add(0.1, 0.1, 0.05, 0.05, 2);
    let content = std::fs::read_to_string(labels.join("photo.txt")).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.lines().nth(1).unwrap().starts_with("2 "));
}

#[test]
fn test_undo_last_on_empty_store() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, labels) = store_in(tmp.path());
    store.load(&image_path(tmp.path(), "a.jpg")).unwrap();

    assert!(!store.undo_last());
    assert!(store.is_empty());
    // Nothing was written for a no-op undo
    assert!(!labels.join("a.txt").exists());
}

#[test]
fn test_undo_last_is_lifo_and_persists() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, labels) = store_in(tmp.path());
    let image = image_path(tmp.path(), "a.jpg");
    store.load(&image).unwrap();

    store.add(0.1, 0.1, 0.1, 0.1, 0);
    store.add(0.2, 0.2, 0.1, 0.1, 1);
    store.add(0.3, 0.3, 0.1, 0.1, 2);

    assert!(store.undo_last());
    assert_eq!(store.len(), 2);
    assert_eq!(store.boxes().last().unwrap().class_id, 1);

    let content = std::fs::read_to_string(labels.join("a.txt")).unwrap();
    assert_eq!(content.lines().count(), 2);

    // Undo down to empty leaves an empty (but present) file
    assert!(store.undo_last());
    assert!(store.undo_last());
    assert!(!store.undo_last());
    assert_eq!(std::fs::read_to_string(labels.join("a.txt")).unwrap(), "");
}

#[test]
fn test_clear_deletes_file_and_load_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, labels) = store_in(tmp.path());
    let image = image_path(tmp.path(), "a.jpg");
    store.load(&image).unwrap();
    store.add(0.5, 0.5, 0.5, 0.5, 0);
    assert!(labels.join("a.txt").exists());

    store.clear();
    assert!(store.is_empty());
    assert!(!labels.join("a.txt").exists());

    assert_eq!(store.load(&image).unwrap(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_clear_without_label_file_is_fine() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, _) = store_in(tmp.path());
    store.load(&image_path(tmp.path(), "never-labeled.jpg")).unwrap();

    store.clear();
    assert!(store.is_synced());
    assert!(store.is_empty());
}

#[test]
fn test_load_replaces_previous_boxes() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, labels) = store_in(tmp.path());
    std::fs::create_dir_all(&labels).unwrap();
    std::fs::write(labels.join("b.txt"), "1 0.5 0.5 0.1 0.1\nbroken\n").unwrap();

    store.load(&image_path(tmp.path(), "a.jpg")).unwrap();
    store.add(0.2, 0.2, 0.1, 0.1, 0);

    let count = store.load(&image_path(tmp.path(), "b.jpg")).unwrap();
    assert_eq!(count, 1);
    assert_eq!(store.boxes(), &[BoundingBox::new(1, 0.5, 0.5, 0.1, 0.1)]);
}

#[test]
fn test_example_box_survives_save_and_load() {
    // 1000x500 image, box drawn from canvas (100,100) to (300,200) at scale 1
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, _) = store_in(tmp.path());
    let image = image_path(tmp.path(), "wide.jpg");
    store.load(&image).unwrap();

    let view = ViewTransform::identity();
    let p1 = view.to_image_coords(100.0, 100.0);
    let p2 = view.to_image_coords(300.0, 200.0);
    let bbox = BoundingBox::from_image_corners(0, p1, p2, (1000.0, 500.0)).unwrap();
    store.push(bbox);

    let mut reloaded = AnnotationStore::new(store.labels_dir());
    reloaded.load(&image).unwrap();
    let b = reloaded.boxes()[0];
    assert_eq!(b.class_id, 0);
    assert!((b.x_center - 0.2).abs() < EPSILON);
    assert!((b.y_center - 0.3).abs() < EPSILON);
    assert!((b.width - 0.2).abs() < EPSILON);
    assert!((b.height - 0.2).abs() < EPSILON);
}

#[test]
fn test_save_creates_labels_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let labels = tmp.path().join("nested").join("labels");
    let mut store = AnnotationStore::new(&labels);
    store.load(Path::new("x.png")).unwrap();
    store.add(0.5, 0.5, 0.1, 0.1, 0);
    assert!(labels.join("x.txt").is_file());
}

#[test]
fn test_write_failure_keeps_memory_authoritative() {
    let tmp = tempfile::tempdir().unwrap();
    // A regular file where the labels directory should be
    let blocker = tmp.path().join("labels");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut store = AnnotationStore::new(&blocker);
    store.load(Path::new("a.jpg")).unwrap_err();
    store.add(0.5, 0.5, 0.1, 0.1, 0);

    assert_eq!(store.len(), 1);
    assert!(!store.is_synced());
}

#[test]
fn test_mutation_without_active_image_is_not_synced() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, labels) = store_in(tmp.path());
    store.add(0.5, 0.5, 0.1, 0.1, 0);
    assert_eq!(store.len(), 1);
    assert!(!store.is_synced());
    assert!(!labels.exists());
}

#[test]
fn test_invalid_utf8_line_only_drops_that_line() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, labels) = store_in(tmp.path());
    std::fs::create_dir_all(&labels).unwrap();
    std::fs::write(
        labels.join("a.txt"),
        b"0 0.1 0.1 0.1 0.1\n\xff\xfe junk\n1 0.2 0.2 0.2 0.2\n",
    )
    .unwrap();

    let count = store.load(&image_path(tmp.path(), "a.jpg")).unwrap();
    assert_eq!(count, 2);
    assert!(store.is_synced());

    // Saving after an edit keeps the boxes that were readable
    store.add(0.5, 0.5, 0.1, 0.1, 0);
    let content = std::fs::read_to_string(labels.join("a.txt")).unwrap();
    assert_eq!(
        content,
        "0 0.100000 0.100000 0.100000 0.100000\n\
         1 0.200000 0.200000 0.200000 0.200000\n\
         0 0.500000 0.500000 0.100000 0.100000\n"
    );
}

#[test]
fn test_unreadable_label_file_is_not_synced() {
    let tmp = tempfile::tempdir().unwrap();
    let (mut store, labels) = store_in(tmp.path());
    // A directory in place of the label file cannot be read
    std::fs::create_dir_all(labels.join("a.txt")).unwrap();

    assert!(store.load(&image_path(tmp.path(), "a.jpg")).is_err());
    assert!(store.is_empty());
    assert!(!store.is_synced());
}
