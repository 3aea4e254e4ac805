//! Drawing Overlay Module
//!
//! The freehand annotation layer of the 2D canvas editor. Each view owns an
//! independent raster bitmap and its own bounded undo/redo history; nothing
//! here touches lesion markers or their lifecycle. Stroke coordinates are
//! pixels in the same `CanvasBounds` frame the view's markers use.

pub mod bitmap;
pub mod history;

pub use bitmap::{Brush, OverlayBitmap};
pub use history::{SnapshotRing, SNAPSHOT_CAPACITY};

use std::collections::HashMap;

use glam::Vec2;
use log::debug;

use crate::projection::ViewKind;

// ============================================================================
// STROKE OVERLAY
// ============================================================================

/// One view's drawing layer: the live bitmap plus its snapshot history.
pub struct StrokeOverlay {
    /// The view this overlay belongs to.
    view: ViewKind,
    /// The live raster layer.
    bitmap: OverlayBitmap,
    /// Bounded undo/redo history of completed strokes.
    history: SnapshotRing,
    /// Whether a stroke is in flight.
    stroke_active: bool,
    /// Last stamped point of the in-flight stroke.
    last_point: Option<Vec2>,
}

impl StrokeOverlay {
    /// Create a transparent overlay for `view` at the given pixel size.
    pub fn new(view: ViewKind, width: u32, height: u32) -> Self {
        Self {
            view,
            bitmap: OverlayBitmap::new(width, height),
            history: SnapshotRing::new(),
            stroke_active: false,
            last_point: None,
        }
    }

    /// The view this overlay belongs to.
    pub fn view(&self) -> ViewKind {
        self.view
    }

    /// Read access for renderers and export collaborators.
    pub fn bitmap(&self) -> &OverlayBitmap {
        &self.bitmap
    }

    /// Resize the overlay to a new canvas size. Stroke pixels are
    /// resolution-dependent, so the layer restarts transparent and history
    /// is dropped.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.bitmap.width() && height == self.bitmap.height() {
            return;
        }
        self.bitmap = OverlayBitmap::new(width, height);
        self.history.clear();
        self.stroke_active = false;
        self.last_point = None;
    }

    // ========================================================================
    // STROKES
    // ========================================================================

    /// Begin a stroke at pixel coordinates.
    pub fn begin_stroke(&mut self, point: Vec2, brush: &Brush) {
        self.stroke_active = true;
        self.bitmap.stamp(point, brush);
        self.last_point = Some(point);
    }

    /// Extend the in-flight stroke to a new pointer position. No-op when no
    /// stroke is active.
    pub fn stroke_to(&mut self, point: Vec2, brush: &Brush) {
        if !self.stroke_active {
            return;
        }
        if let Some(last) = self.last_point {
            self.bitmap.stroke_segment(last, point, brush);
        }
        self.last_point = Some(point);
    }

    /// Finish the in-flight stroke and record a history snapshot.
    pub fn end_stroke(&mut self) {
        if !self.stroke_active {
            return;
        }
        self.stroke_active = false;
        self.last_point = None;
        self.history.push(self.bitmap.clone());
        debug!("{} overlay: stroke committed", self.view.name());
    }

    /// Wipe the layer. Recorded in history like a stroke, so it is undoable.
    pub fn clear(&mut self) {
        self.stroke_active = false;
        self.last_point = None;
        self.bitmap.clear();
        self.history.push(self.bitmap.clone());
    }

    // ========================================================================
    // UNDO / REDO
    // ========================================================================

    /// Step back one stroke. Below the oldest retained snapshot the canvas
    /// reverts to empty. Ignored while a stroke is in flight.
    pub fn undo(&mut self) {
        if self.stroke_active || !self.history.undo() {
            return;
        }
        self.restore_current();
        debug!("{} overlay: undo", self.view.name());
    }

    /// Step forward one stroke. No-op past the newest snapshot or while a
    /// stroke is in flight.
    pub fn redo(&mut self) {
        if self.stroke_active || !self.history.redo() {
            return;
        }
        self.restore_current();
        debug!("{} overlay: redo", self.view.name());
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the live bitmap with the history cursor's state.
    fn restore_current(&mut self) {
        self.bitmap = match self.history.current() {
            Some(snapshot) => snapshot.clone(),
            None => OverlayBitmap::new(self.bitmap.width(), self.bitmap.height()),
        };
    }
}

// ============================================================================
// OVERLAY SET
// ============================================================================

/// The drawing layers of an editing session: one independent overlay per
/// view, allocated on first use.
pub struct OverlaySet {
    width: u32,
    height: u32,
    overlays: HashMap<ViewKind, StrokeOverlay>,
}

impl OverlaySet {
    /// Create an empty set; overlays are created at `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            overlays: HashMap::new(),
        }
    }

    /// The overlay for `view`, created transparent on first access.
    pub fn overlay_mut(&mut self, view: ViewKind) -> &mut StrokeOverlay {
        let (w, h) = (self.width, self.height);
        self.overlays
            .entry(view)
            .or_insert_with(|| StrokeOverlay::new(view, w, h))
    }

    /// Read access to an existing overlay.
    pub fn overlay(&self, view: ViewKind) -> Option<&StrokeOverlay> {
        self.overlays.get(&view)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn brush() -> Brush {
        Brush::new(2.0, [0, 0, 255, 255])
    }

    fn overlay() -> StrokeOverlay {
        StrokeOverlay::new(ViewKind::Coronal, 64, 64)
    }

    fn draw_dot(o: &mut StrokeOverlay, x: f32, y: f32) {
        o.begin_stroke(Vec2::new(x, y), &brush());
        o.end_stroke();
    }

    #[test]
    fn test_stroke_paints_and_commits() {
        let mut o = overlay();
        o.begin_stroke(Vec2::new(10.0, 10.0), &brush());
        o.stroke_to(Vec2::new(30.0, 10.0), &brush());
        o.end_stroke();

        assert!(!o.bitmap().is_blank());
        assert!(o.can_undo());
        assert!(!o.can_redo());
    }

    #[test]
    fn test_undo_single_stroke_reverts_to_empty() {
        let mut o = overlay();
        draw_dot(&mut o, 10.0, 10.0);
        o.undo();
        assert!(o.bitmap().is_blank());
        assert!(o.can_redo());
    }

    #[test]
    fn test_undo_redo_restores_stroke() {
        let mut o = overlay();
        draw_dot(&mut o, 10.0, 10.0);
        let painted = o.bitmap().clone();

        o.undo();
        o.redo();
        assert_eq!(*o.bitmap(), painted);

        // Redo past the newest entry changes nothing.
        o.redo();
        assert_eq!(*o.bitmap(), painted);
    }

    #[test]
    fn test_new_stroke_after_undo_discards_redo() {
        let mut o = overlay();
        draw_dot(&mut o, 10.0, 10.0);
        draw_dot(&mut o, 20.0, 20.0);
        o.undo();
        assert!(o.can_redo());

        draw_dot(&mut o, 40.0, 40.0);
        assert!(!o.can_redo());
    }

    #[test]
    fn test_undo_ignored_mid_stroke() {
        let mut o = overlay();
        draw_dot(&mut o, 10.0, 10.0);
        o.begin_stroke(Vec2::new(30.0, 30.0), &brush());
        o.undo();
        // The committed dot is still there: undo did not run mid-stroke.
        assert_ne!(o.bitmap().pixel(10, 10), Some(0));
        o.end_stroke();
    }

    #[test]
    fn test_stroke_to_without_begin_is_noop() {
        let mut o = overlay();
        o.stroke_to(Vec2::new(10.0, 10.0), &brush());
        o.end_stroke();
        assert!(o.bitmap().is_blank());
        assert!(!o.can_undo());
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut o = overlay();
        draw_dot(&mut o, 10.0, 10.0);
        o.clear();
        assert!(o.bitmap().is_blank());

        o.undo();
        assert!(!o.bitmap().is_blank());
    }

    #[test]
    fn test_resize_restarts_layer() {
        let mut o = overlay();
        draw_dot(&mut o, 10.0, 10.0);
        o.resize(128, 128);
        assert!(o.bitmap().is_blank());
        assert_eq!(o.bitmap().width(), 128);
        assert!(!o.can_undo());
    }

    #[test]
    fn test_overlays_are_independent_per_view() {
        let mut set = OverlaySet::new(64, 64);
        let a = set.overlay_mut(ViewKind::SagittalPrimary);
        a.begin_stroke(Vec2::new(5.0, 5.0), &brush());
        a.end_stroke();

        let b = set.overlay_mut(ViewKind::Posterior);
        assert!(b.bitmap().is_blank());
        assert!(!b.can_undo());

        assert!(set.overlay(ViewKind::SagittalPrimary).unwrap().can_undo());
        assert!(set.overlay(ViewKind::Coronal).is_none());
    }
}
