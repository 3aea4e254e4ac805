//! 2D Canvas Controller
//!
//! Pointer-event handling for one projected 2D view. The controller owns the
//! view binding, the zoom slider state, the active marking severity, and the
//! in-flight drag; the marker collection itself lives in the shared
//! [`LesionMarkerEngine`].
//!
//! Canvas bounds are re-derived from the surface size and the current zoom on
//! every pointer event. Degenerate bounds (zero-sized canvas) drop the event
//! instead of projecting through an unusable frame.

use glam::{Vec2, Vec3};
use log::debug;

use super::InteractionMode;
use crate::config::MapperConfig;
use crate::markers::{LesionMarkerEngine, Severity};
use crate::projection::{CanvasBounds, ViewKind};
use crate::space::clamp_position;

/// An in-flight marker drag.
///
/// `depth_anchor` is the marker's position at drag start. Every move event
/// unprojects against it, so a drag inside this view can never perturb the
/// axis the view cannot observe -- even if the global selection changes
/// mid-drag.
struct DragState {
    id: String,
    depth_anchor: Vec3,
}

/// Interaction controller for one 2D canvas surface.
pub struct CanvasController {
    /// The projected view this surface renders.
    pub view: ViewKind,
    /// Current interaction mode.
    pub mode: InteractionMode,
    /// Severity applied to newly created markers.
    pub severity: Severity,
    /// Zoom slider state, clamped to the configured range.
    zoom: f32,
    /// Interaction tunables.
    config: MapperConfig,
    /// Active drag, if any.
    drag: Option<DragState>,
    /// Transient hover highlight; never touches the model.
    hover: Option<String>,
}

impl CanvasController {
    /// Create a controller for `view` with default tunables.
    pub fn new(view: ViewKind) -> Self {
        Self::with_config(view, MapperConfig::default())
    }

    /// Create a controller for `view` with explicit tunables.
    pub fn with_config(view: ViewKind, config: MapperConfig) -> Self {
        Self {
            view,
            mode: InteractionMode::Navigate,
            severity: Severity::Superficial,
            zoom: 1.0,
            config,
            drag: None,
            hover: None,
        }
    }

    // ========================================================================
    // ZOOM
    // ========================================================================

    /// Current zoom level.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom level directly (slider input), clamped to the configured
    /// range.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
    }

    /// Handle scroll-wheel zoom. Positive `delta` zooms in, negative out.
    pub fn on_scroll(&mut self, delta: f32) {
        if delta > 0.0 {
            self.zoom *= self.config.zoom_factor;
        } else if delta < 0.0 {
            self.zoom /= self.config.zoom_factor;
        }
        self.zoom = self.zoom.clamp(self.config.min_zoom, self.config.max_zoom);
    }

    /// Derive the pixel frame for a surface of `width` x `height` at the
    /// current zoom. Renderers call this so strokes and markers share one
    /// frame per frame.
    pub fn bounds(&self, width: f32, height: f32) -> CanvasBounds {
        CanvasBounds::compute(width, height, self.zoom)
    }

    // ========================================================================
    // MODE & SEVERITY
    // ========================================================================

    /// Switch interaction mode. An active drag is dropped.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            self.drag = None;
            self.mode = mode;
            debug!("{} canvas: mode {mode}", self.view.name());
        }
    }

    /// Toggle between Navigate and Mark.
    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Select the severity applied to newly created markers.
    pub fn set_severity(&mut self, severity: Severity) {
        self.severity = severity;
        debug!("{} canvas: severity {severity}", self.view.name());
    }

    // ========================================================================
    // POINTER EVENTS
    // ========================================================================

    /// Handle pointer-down at surface-local pixel coordinates.
    ///
    /// In Mark mode: a hit on an existing marker selects it and begins a
    /// move-drag; a miss creates a marker at the unprojected position
    /// (depth axis from the currently selected marker, or 0) and begins
    /// dragging the new marker.
    pub fn on_pointer_down(
        &mut self,
        engine: &mut LesionMarkerEngine,
        width: f32,
        height: f32,
        x: f32,
        y: f32,
    ) {
        let bounds = self.bounds(width, height);
        if !bounds.is_renderable() || self.mode != InteractionMode::Mark {
            return;
        }
        let point = Vec2::new(x, y);
        let radius = self.config.base_hit_radius * self.zoom;

        if let Some(id) = engine.hit_test(point, self.view, &bounds, radius) {
            if let Some(marker) = engine.get(&id) {
                let depth_anchor = marker.position;
                engine.select(&id);
                self.drag = Some(DragState { id, depth_anchor });
            }
        } else {
            let previous = engine.selected().map(|m| m.position);
            let position = clamp_position(self.view.unproject(point, &bounds, previous));
            let id = engine.create(position, self.severity);
            self.drag = Some(DragState {
                id,
                depth_anchor: position,
            });
        }
    }

    /// Handle pointer movement.
    ///
    /// During an active drag each event moves the dragged marker to the
    /// freshly unprojected position, depth axis pinned to the drag anchor.
    /// Outside a drag only the transient hover highlight is updated.
    pub fn on_pointer_move(
        &mut self,
        engine: &mut LesionMarkerEngine,
        width: f32,
        height: f32,
        x: f32,
        y: f32,
    ) {
        let bounds = self.bounds(width, height);
        if !bounds.is_renderable() {
            return;
        }
        let point = Vec2::new(x, y);

        if let Some(drag) = &self.drag {
            let position =
                clamp_position(self.view.unproject(point, &bounds, Some(drag.depth_anchor)));
            engine.move_marker(&drag.id, position);
        } else {
            let radius = self.config.base_hit_radius * self.zoom;
            self.hover = engine.hit_test(point, self.view, &bounds, radius);
        }
    }

    /// Handle pointer-up: end the drag. Every move already mutated
    /// authoritative state, so there is nothing to commit.
    pub fn on_pointer_up(&mut self) {
        if let Some(drag) = self.drag.take() {
            debug!("{} canvas: drag ended for {}", self.view.name(), drag.id);
        }
    }

    /// Id of the marker currently hovered (transient highlight only).
    pub fn hover_id(&self) -> Option<&str> {
        self.hover.as_deref()
    }

    /// Whether a marker drag is in flight.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================
