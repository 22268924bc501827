use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use env_logger::Env;

use boxlabel::constants::dataset::RESIZE_TARGET;
use boxlabel::dataset::{discover_images, resize_directory, scaffold_labels};
use boxlabel::surface::{DirectoryPicker, RfdPicker};
use boxlabel::{AnnotationStore, ImageRef, LabelerConfig};

#[derive(Parser)]
#[command(name = "boxlabel")]
#[command(about = "Bounding box labels in YOLO text format", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the images (overrides the configuration)
    #[arg(long, global = true, value_name = "DIR")]
    images: Option<PathBuf>,

    /// Directory holding the label files (overrides the configuration)
    #[arg(long, global = true, value_name = "DIR")]
    labels: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List images with their box counts
    Status,

    /// Print the boxes of one image
    Show {
        /// Image path, or a file name inside the images directory
        image: PathBuf,
    },

    /// Create empty label files for images that have none
    Scaffold {
        /// Choose the images directory with a folder dialog
        #[arg(long)]
        pick: bool,
    },

    /// Resize images so their shorter side matches a target, as JPEG
    Resize {
        input: PathBuf,
        output: PathBuf,
        /// Target length of the shorter side in pixels
        #[arg(long, default_value_t = RESIZE_TARGET)]
        size: u32,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LabelerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LabelerConfig::default(),
    };
    if let Some(images) = cli.images {
        config.images_dir = images;
    }
    if let Some(labels) = cli.labels {
        config.labels_dir = labels;
    }

    // RUST_LOG still overrides
    let default_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_filter_str()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Status => status(&config),
        Commands::Show { image } => show(&config, &image),
        Commands::Scaffold { pick } => scaffold(&config, pick),
        Commands::Resize {
            input,
            output,
            size,
        } => resize(&input, &output, size),
    }
}

fn status(config: &LabelerConfig) -> anyhow::Result<()> {
    let images = discover_images(&config.images_dir)?;
    if images.is_empty() {
        println!("No images in {}", config.images_dir.display());
        return Ok(());
    }

    let mut store = AnnotationStore::new(&config.labels_dir);
    let mut total = 0;
    let mut unlabeled = 0;
    for image in &images {
        let count = store.load(image).unwrap_or_else(|e| {
            log::warn!("{e}");
            0
        });
        total += count;
        if count == 0 {
            unlabeled += 1;
        }
        let name = image.file_name().unwrap_or(image.as_os_str());
        println!("{:>5}  {}", count, name.to_string_lossy());
    }
    println!(
        "{} images, {} boxes, {} without boxes",
        images.len(),
        total,
        unlabeled
    );
    Ok(())
}

fn show(config: &LabelerConfig, image: &Path) -> anyhow::Result<()> {
    let path = if image.exists() {
        image.to_path_buf()
    } else {
        config.images_dir.join(image)
    };
    let image = ImageRef::open(&path)?;
    let mut store = AnnotationStore::new(&config.labels_dir);
    store.load(image.path())?;

    println!(
        "{} ({}x{}), labels in {}",
        image.file_name(),
        image.width(),
        image.height(),
        store.label_path_for(image.path())?.display()
    );
    let (width, height) = image.size();
    for (i, bbox) in store.boxes().iter().enumerate() {
        let (x1, y1, x2, y2) = bbox.to_image_corners(width, height);
        println!(
            "{:>3}: class {} center ({:.4}, {:.4}) size ({:.4}, {:.4})",
            i, bbox.class_id, bbox.x_center, bbox.y_center, bbox.width, bbox.height
        );
        println!("     px ({x1:.0}, {y1:.0})-({x2:.0}, {y2:.0})");
    }
    if store.is_empty() {
        println!("No boxes");
    }
    Ok(())
}

fn scaffold(config: &LabelerConfig, pick: bool) -> anyhow::Result<()> {
    let images_dir = if pick {
        match RfdPicker::new().pick_directory("Select image folder") {
            Some(dir) => dir,
            None => bail!("No folder selected"),
        }
    } else {
        config.images_dir.clone()
    };

    let report = scaffold_labels(&images_dir, &config.labels_dir)?;
    for created in &report.created {
        println!("Created {}", created.display());
    }
    println!(
        "{} images, {} label files created, {} already present",
        report.images,
        report.created.len(),
        report.existing()
    );
    Ok(())
}

fn resize(input: &Path, output: &Path, size: u32) -> anyhow::Result<()> {
    if !input.is_dir() {
        bail!("Input directory {} does not exist", input.display());
    }
    if size == 0 {
        bail!("Target size must be positive");
    }

    let report = resize_directory(input, output, size)?;
    if report.resized.is_empty() && report.failed.is_empty() {
        bail!("No images found in {}", input.display());
    }
    for (path, e) in &report.failed {
        eprintln!("Failed: {} ({e})", path.display());
    }
    println!(
        "{} images resized into {}, {} failed",
        report.resized.len(),
        output.display(),
        report.failed.len()
    );
    Ok(())
}
