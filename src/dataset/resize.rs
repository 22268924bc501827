use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::constants::dataset::{RESIZE_EXTENSIONS, RESIZE_JPEG_QUALITY};
use crate::dataset::discover::has_extension;
use crate::error::LabelError;

/// Dimensions after scaling so the shorter side equals `target`.
///
/// The longer side is truncated, never rounded up.
pub fn short_side_dimensions(width: u32, height: u32, target: u32) -> (u32, u32) {
    let scaled = |long: u32, short: u32| {
        ((u64::from(long) * u64::from(target)) / u64::from(short)) as u32
    };
    if width < height {
        (target, scaled(height, width).max(1))
    } else {
        (scaled(width, height).max(1), target)
    }
}

/// Decode an image and rotate or flip it as its EXIF orientation says.
fn open_upright(path: &Path) -> Result<DynamicImage, LabelError> {
    let mut decoder = ImageReader::open(path)
        .map_err(|e| LabelError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| LabelError::io(path, e))?
        .into_decoder()
        .map_err(|e| LabelError::image(path, e))?;
    let orientation = decoder
        .orientation()
        .map_err(|e| LabelError::image(path, e))?;

    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| LabelError::image(path, e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Resize one image so its shorter side is `target` pixels and write it as JPEG.
///
/// The EXIF orientation is applied first and not written back, so viewers
/// that honor EXIF do not rotate the output a second time. Transparency is
/// dropped. Returns the output dimensions.
pub fn resize_to_short_side(
    input: &Path,
    output: &Path,
    target: u32,
) -> Result<(u32, u32), LabelError> {
    let img = open_upright(input)?;
    if img.width() == 0 || img.height() == 0 || target == 0 {
        return Err(LabelError::EmptyImage {
            path: input.to_path_buf(),
            width: img.width(),
            height: img.height(),
        });
    }

    let (width, height) = short_side_dimensions(img.width(), img.height(), target);
    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    let resized = DynamicImage::ImageRgb8(resized.to_rgb8());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| LabelError::io(parent, e))?;
    }
    let file = File::create(output).map_err(|e| LabelError::io(output, e))?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), RESIZE_JPEG_QUALITY);
    resized
        .write_with_encoder(encoder)
        .map_err(|e| LabelError::image(output, e))?;

    log::info!(
        "Resized {:?} -> {:?} ({}x{} -> {}x{})",
        input,
        output,
        img.width(),
        img.height(),
        width,
        height
    );
    Ok((width, height))
}

/// Outcome of [`resize_directory`].
#[derive(Debug, Default)]
pub struct ResizeReport {
    /// Written output files
    pub resized: Vec<PathBuf>,
    /// Inputs that could not be processed
    pub failed: Vec<(PathBuf, LabelError)>,
}

/// Resize every image below `input_dir` into `output_dir`.
///
/// Subdirectories are walked and mirrored in the output. Outputs keep their
/// full file stem and get a `.jpg` extension. A failing image is logged and
/// recorded; the rest are still processed.
pub fn resize_directory(
    input_dir: &Path,
    output_dir: &Path,
    target: u32,
) -> Result<ResizeReport, LabelError> {
    std::fs::create_dir_all(output_dir).map_err(|e| LabelError::io(output_dir, e))?;

    let mut inputs = Vec::new();
    collect_images(input_dir, output_dir, &mut inputs)?;
    inputs.sort();
    log::debug!("Found {} images below {:?}", inputs.len(), input_dir);

    let mut report = ResizeReport::default();
    for input in inputs {
        let Some(output) = output_path(input_dir, output_dir, &input) else {
            continue;
        };
        match resize_to_short_side(&input, &output, target) {
            Ok(_) => report.resized.push(output),
            Err(e) => {
                log::error!("Failed to resize {:?}: {}", input, e);
                report.failed.push((input, e));
            }
        }
    }
    Ok(report)
}

/// Recursively gather resizable images, skipping the output directory.
fn collect_images(dir: &Path, skip: &Path, images: &mut Vec<PathBuf>) -> Result<(), LabelError> {
    let entries = std::fs::read_dir(dir).map_err(|e| LabelError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| LabelError::io(dir, e))?.path();
        if path.is_dir() {
            if path != skip {
                collect_images(&path, skip, images)?;
            }
        } else if path.is_file() && has_extension(&path, RESIZE_EXTENSIONS) {
            images.push(path);
        }
    }
    Ok(())
}

/// `<output_dir>/<relative parent>/<stem>.jpg` for an input below `input_dir`.
fn output_path(input_dir: &Path, output_dir: &Path, input: &Path) -> Option<PathBuf> {
    let relative = input.strip_prefix(input_dir).ok()?;
    let name = jpeg_file_name(relative.file_stem()?);
    Some(match relative.parent() {
        Some(parent) => output_dir.join(parent).join(name),
        None => output_dir.join(name),
    })
}

fn jpeg_file_name(stem: &OsStr) -> OsString {
    let mut name = stem.to_os_string();
    name.push(".jpg");
    name
}
