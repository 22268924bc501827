//! The labeling session: one object owning every piece of per-image state.
//!
//! A frontend forwards its input events here and listens for [`LabelEvent`]s
//! to know when to redraw. The session switches between a grid overview and
//! the labeling view of a single image. Entering the labeling view reloads
//! the box list from disk and resets the view transform; the frontend then
//! calls [`LabelingSession::fit_to_canvas`] once its canvas is laid out.

use std::path::{Path, PathBuf};

use web_time::Instant;

use crate::annotation::{AnnotationStore, BoundingBox};
use crate::config::LabelerConfig;
use crate::dataset::discover_images;
use crate::error::LabelError;
use crate::event::{LabelEvent, ViewMode};
use crate::image_source::ImageRef;
use crate::overlay::BoxOverlay;
use crate::surface::RenderSurface;
use crate::view::controller::{DrawnRect, RejectReason, ZoomDirection};
use crate::view::{FitResult, ViewTransform, ZoomOutcome, ZoomPanController, ZoomPolicy};

/// Keyboard modifiers held during a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Ctrl turns a press into a box-drawing gesture
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { ctrl: false };
    pub const CTRL: Self = Self { ctrl: true };
}

type Subscriber = Box<dyn FnMut(&LabelEvent)>;

/// Labeling state for one image directory.
pub struct LabelingSession {
    config: LabelerConfig,
    images: Vec<PathBuf>,
    current_index: usize,
    mode: ViewMode,
    active: Option<ImageRef>,
    transform: ViewTransform,
    store: AnnotationStore,
    controller: ZoomPanController,
    fit_pending: bool,
    subscribers: Vec<Subscriber>,
}

impl LabelingSession {
    /// Create a session and make sure the labels directory exists.
    pub fn new(config: LabelerConfig) -> Result<Self, LabelError> {
        std::fs::create_dir_all(&config.labels_dir)
            .map_err(|e| LabelError::io(&config.labels_dir, e))?;

        let controller = ZoomPanController::new(
            ZoomPolicy::from(&config.zoom),
            config.min_box_size,
            config.pan_deadzone,
        );
        Ok(Self {
            store: AnnotationStore::new(&config.labels_dir),
            config,
            images: Vec::new(),
            current_index: 0,
            mode: ViewMode::Grid,
            active: None,
            transform: ViewTransform::identity(),
            controller,
            fit_pending: false,
            subscribers: Vec::new(),
        })
    }

    /// Register a callback invoked for every event, in registration order.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&LabelEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn config(&self) -> &LabelerConfig {
        &self.config
    }

    /// Images of the loaded directory, sorted.
    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    /// Image open in the labeling view.
    pub fn active_image(&self) -> Option<&ImageRef> {
        self.active.as_ref()
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Boxes of the active image.
    pub fn boxes(&self) -> &[BoundingBox] {
        self.store.boxes()
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn controller(&self) -> &ZoomPanController {
        &self.controller
    }

    /// Whether a fit was requested but the canvas had no size yet.
    pub fn fit_pending(&self) -> bool {
        self.fit_pending
    }

    /// Rubber band of the box being drawn.
    pub fn drawing_rect(&self) -> Option<DrawnRect> {
        self.controller.drawing_rect()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Replace the image list with the images in `dir` and show the grid.
    pub fn load_directory(&mut self, dir: &Path) -> Result<usize, LabelError> {
        self.images = discover_images(dir)?;
        self.current_index = 0;
        self.show_grid();
        log::info!("📂 Loaded {} images from {:?}", self.images.len(), dir);
        Ok(self.images.len())
    }

    /// Open the image at `index` in the labeling view.
    ///
    /// If the image cannot be opened the session stays in (or returns to)
    /// the grid view and the error is returned.
    pub fn select_image(&mut self, index: usize) -> Result<(), LabelError> {
        let Some(path) = self.images.get(index).cloned() else {
            return Err(LabelError::IndexOutOfRange {
                index,
                len: self.images.len(),
            });
        };

        let image = match ImageRef::open(&path) {
            Ok(image) => image,
            Err(e) => {
                log::error!("Failed to open {:?}: {}", path, e);
                self.show_grid();
                return Err(e);
            }
        };

        self.current_index = index;
        self.controller.reset();
        self.transform = ViewTransform::identity();
        self.fit_pending = true;

        let box_count = match self.store.load(&path) {
            Ok(count) => count,
            Err(e) => {
                log::error!("Failed to load labels for {:?}: {}", path, e);
                0
            }
        };
        log::debug!(
            "Opened {} ({}x{}) with {} boxes",
            image.file_name(),
            image.width(),
            image.height(),
            box_count
        );
        self.active = Some(image);

        self.set_mode(ViewMode::Labeling);
        self.emit(LabelEvent::ImageOpened {
            index,
            path,
            box_count,
        });
        Ok(())
    }

    /// Open the next image, wrapping to the first.
    pub fn next_image(&mut self) -> Result<(), LabelError> {
        let len = self.images.len();
        if len == 0 {
            return Err(LabelError::NoImages);
        }
        self.select_image((self.current_index + 1) % len)
    }

    /// Open the previous image, wrapping to the last.
    pub fn prev_image(&mut self) -> Result<(), LabelError> {
        let len = self.images.len();
        if len == 0 {
            return Err(LabelError::NoImages);
        }
        self.select_image((self.current_index + len - 1) % len)
    }

    /// Leave the labeling view. The box list is dropped; it is already on disk.
    pub fn show_grid(&mut self) {
        self.controller.reset();
        self.store.reset();
        self.active = None;
        self.fit_pending = false;
        self.set_mode(ViewMode::Grid);
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    /// Fit the active image into a canvas of the given size.
    ///
    /// Returns [`FitResult::Deferred`] while the canvas is not laid out; the
    /// fit stays pending until a later call succeeds.
    pub fn fit_to_canvas(&mut self, canvas_width: f64, canvas_height: f64) -> FitResult {
        let Some(image) = &self.active else {
            return FitResult::Rejected;
        };

        let result = self
            .controller
            .fit(&mut self.transform, (canvas_width, canvas_height), image.size());
        if let FitResult::Applied(scale) = result {
            self.fit_pending = false;
            self.emit(LabelEvent::ZoomChanged { scale });
        }
        result
    }

    pub fn zoom_in(&mut self) -> ZoomOutcome {
        self.zoom_with(|controller, transform| controller.zoom_in_keyboard(transform))
    }

    pub fn zoom_out(&mut self) -> ZoomOutcome {
        self.zoom_with(|controller, transform| controller.zoom_out_keyboard(transform))
    }

    /// Refit to the surface's current viewport size.
    pub fn zoom_fit(&mut self, surface: &dyn RenderSurface) -> FitResult {
        let (width, height) = surface.viewport_size();
        self.fit_to_canvas(width, height)
    }

    /// Retry a fit that was deferred because the canvas had no size yet.
    ///
    /// Returns `None` when no fit is pending. Frontends call this after
    /// layout or resize events.
    pub fn fit_if_pending(&mut self, surface: &dyn RenderSurface) -> Option<FitResult> {
        if !self.fit_pending {
            return None;
        }
        Some(self.zoom_fit(surface))
    }

    /// Show the image at its native resolution.
    pub fn zoom_100(&mut self) -> ZoomOutcome {
        self.zoom_with(|controller, transform| controller.zoom_to_scale(transform, 1.0, None))
    }

    pub fn zoom_200(&mut self) -> ZoomOutcome {
        self.zoom_with(|controller, transform| controller.zoom_to_scale(transform, 2.0, None))
    }

    /// Wheel zoom centered on the cursor. Positive deltas zoom in.
    pub fn wheel(&mut self, delta: f64, x: f64, y: f64) -> ZoomOutcome {
        self.wheel_at(delta, x, y, Instant::now())
    }

    /// Wheel zoom with an explicit timestamp for the cooldown check.
    pub fn wheel_at(&mut self, delta: f64, x: f64, y: f64, now: Instant) -> ZoomOutcome {
        let direction = if delta > 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        };
        self.zoom_with(|controller, transform| {
            controller.zoom_mouse_at(transform, direction, x, y, now)
        })
    }

    fn zoom_with(
        &mut self,
        zoom: impl FnOnce(&mut ZoomPanController, &mut ViewTransform) -> ZoomOutcome,
    ) -> ZoomOutcome {
        if self.active.is_none() {
            return ZoomOutcome::Rejected(RejectReason::NoImage);
        }
        let outcome = zoom(&mut self.controller, &mut self.transform);
        if let ZoomOutcome::Applied(scale) = outcome {
            self.emit(LabelEvent::ZoomChanged { scale });
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Pointer gestures
    // ------------------------------------------------------------------

    /// Start a gesture: with Ctrl held a box is drawn, otherwise the view is dragged.
    pub fn pointer_pressed(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        if self.active.is_none() {
            return;
        }
        if modifiers.ctrl {
            self.controller.begin_draw(x, y);
        } else {
            self.controller.begin_pan(x, y);
        }
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if self.controller.is_drawing() {
            self.controller.update_draw(x, y);
        } else if let Some((dx, dy)) = self.controller.update_pan(&mut self.transform, x, y) {
            self.emit(LabelEvent::PanDelta { dx, dy });
        }
    }

    /// Finish the current gesture. Returns the box created by a draw, if any.
    pub fn pointer_released(&mut self, x: f64, y: f64) -> Option<BoundingBox> {
        if self.controller.is_panning() {
            self.controller.end_pan();
            return None;
        }

        let rect = self.controller.end_draw(x, y)?;
        let image = self.active.as_ref()?;
        let p1 = self.transform.to_image_coords(rect.start.0, rect.start.1);
        let p2 = self.transform.to_image_coords(rect.end.0, rect.end.1);
        let class_id = self.config.default_class_id;
        let bbox = BoundingBox::from_image_corners(class_id, p1, p2, image.size())?;

        self.store.push(bbox);
        log::debug!("Created box {:?}", bbox);
        self.emit(LabelEvent::BoxCreated(bbox));
        Some(bbox)
    }

    // ------------------------------------------------------------------
    // Box actions
    // ------------------------------------------------------------------

    /// Remove the most recently drawn box.
    pub fn undo_box(&mut self) -> Option<BoundingBox> {
        let last = self.store.boxes().last().copied()?;
        if !self.store.undo_last() {
            return None;
        }
        self.emit(LabelEvent::BoxRemoved(last));
        Some(last)
    }

    /// Remove every box of the active image and its label file.
    pub fn clear_labels(&mut self) -> Result<(), LabelError> {
        if self.active.is_none() {
            return Err(LabelError::NoActiveImage);
        }
        self.store.clear();
        self.emit(LabelEvent::BoxesCleared);
        Ok(())
    }

    /// Redraw the active image and all its boxes.
    pub fn render(&self, surface: &mut dyn RenderSurface, overlay: &mut BoxOverlay) {
        let Some(image) = &self.active else {
            overlay.clear(surface);
            return;
        };
        let origin = (self.transform.origin_x, self.transform.origin_y);
        surface.draw_image(image, self.transform.scale, origin);
        overlay.redraw(surface, &self.transform, image.size(), self.store.boxes());
        overlay.set_preview(surface, self.controller.drawing_rect());
    }

    fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            log::debug!("View mode: {:?}", mode);
            self.emit(LabelEvent::ViewModeChanged(mode));
        }
    }

    fn emit(&mut self, event: LabelEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }
}
