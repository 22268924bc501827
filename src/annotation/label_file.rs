//! YOLO label text format.
//!
//! One label file per image, one box per line:
//!
//! ```text
//! <class_id> <x_center> <y_center> <width> <height>
//! ```
//!
//! Coordinates are normalized to `[0, 1]` and written with six decimals.
//! Reading is line tolerant: a line that is not exactly five parseable
//! whitespace-separated fields is skipped, the rest of the file still loads.

use std::path::{Path, PathBuf};

use crate::annotation::BoundingBox;
use crate::constants::label::{EXTENSION, PRECISION};
use crate::error::LabelError;

/// Label file path for an image: `<labels_dir>/<image stem>.txt`.
pub fn label_path_for(labels_dir: &Path, image_path: &Path) -> Result<PathBuf, LabelError> {
    let stem = image_path
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LabelError::InvalidImagePath {
            path: image_path.to_path_buf(),
        })?;

    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(EXTENSION);
    Ok(labels_dir.join(file_name))
}

/// Parse one label line. Returns `None` for anything that is not a box.
pub fn parse_line(line: &str) -> Option<BoundingBox> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 5 {
        return None;
    }

    let class_id = parse_class_id(parts[0])?;
    let x_center = parse_coord(parts[1])?;
    let y_center = parse_coord(parts[2])?;
    let width = parse_coord(parts[3])?;
    let height = parse_coord(parts[4])?;

    Some(BoundingBox::new(class_id, x_center, y_center, width, height))
}

/// Class ids are integers, but files written by older tools carry `0.0`.
fn parse_class_id(token: &str) -> Option<u32> {
    if let Ok(id) = token.parse::<u32>() {
        return Some(id);
    }
    let value: f64 = token.parse().ok()?;
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}

fn parse_coord(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format one box as a label line (without the newline).
pub fn format_line(bbox: &BoundingBox) -> String {
    format!(
        "{} {:.prec$} {:.prec$} {:.prec$} {:.prec$}",
        bbox.class_id,
        bbox.x_center,
        bbox.y_center,
        bbox.width,
        bbox.height,
        prec = PRECISION
    )
}

/// Parse a whole label file, skipping lines that are not boxes.
pub fn parse_labels(content: &str) -> Vec<BoundingBox> {
    let mut boxes = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(bbox) => boxes.push(bbox),
            None => log::debug!("Skipping malformed label line {}: {:?}", line_no + 1, line),
        }
    }
    boxes
}

/// Format boxes as label file content, every line newline-terminated.
pub fn format_labels(boxes: &[BoundingBox]) -> String {
    let mut content = String::with_capacity(boxes.len() * 48);
    for bbox in boxes {
        content.push_str(&format_line(bbox));
        content.push('\n');
    }
    content
}
