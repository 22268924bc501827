//! Notifications emitted by a labeling session.

use std::path::PathBuf;

use crate::annotation::BoundingBox;

/// Which view the session is presenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Thumbnail overview of the image directory
    #[default]
    Grid,
    /// One image open for drawing boxes
    Labeling,
}

/// State changes subscribers may react to.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelEvent {
    /// An image became active with this many boxes loaded
    ImageOpened {
        index: usize,
        path: PathBuf,
        box_count: usize,
    },
    /// A box was appended to the active image
    BoxCreated(BoundingBox),
    /// The most recent box was undone
    BoxRemoved(BoundingBox),
    /// Every box of the active image was removed
    BoxesCleared,
    /// The view was dragged by this canvas delta
    PanDelta { dx: f64, dy: f64 },
    /// The view scale changed; a full redraw is needed
    ZoomChanged { scale: f64 },
    ViewModeChanged(ViewMode),
}
