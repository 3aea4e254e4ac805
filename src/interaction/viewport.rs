//! 3D Viewport Controller
//!
//! Pointer-event handling for the 3D model surface. Ray/model intersection
//! belongs to the renderer, so the controller receives a pick resolver that
//! maps surface-local pixel coordinates to a point on the model, and works
//! entirely in canonical model space from there. Hit detection uses the
//! engine's 3D proximity query; drags move on the full 3D position, so no
//! depth anchor is involved.

use glam::Vec3;
use log::debug;

use super::InteractionMode;
use crate::config::MapperConfig;
use crate::markers::{LesionMarkerEngine, Severity};
use crate::space::clamp_position;

/// Interaction controller for the 3D viewport surface.
pub struct ViewportController {
    /// Current interaction mode.
    pub mode: InteractionMode,
    /// Severity applied to newly created markers.
    pub severity: Severity,
    /// Interaction tunables.
    config: MapperConfig,
    /// Id of the marker being dragged, if any.
    drag: Option<String>,
}

impl ViewportController {
    /// Create a controller with default tunables.
    pub fn new() -> Self {
        Self::with_config(MapperConfig::default())
    }

    /// Create a controller with explicit tunables.
    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            mode: InteractionMode::Navigate,
            severity: Severity::Superficial,
            config,
            drag: None,
        }
    }

    /// Switch interaction mode. An active drag is dropped.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            self.drag = None;
            self.mode = mode;
            debug!("viewport: mode {mode}");
        }
    }

    /// Toggle between Navigate and Mark.
    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Select the severity applied to newly created markers.
    pub fn set_severity(&mut self, severity: Severity) {
        self.severity = severity;
        debug!("viewport: severity {severity}");
    }

    // ========================================================================
    // POINTER EVENTS
    // ========================================================================

    /// Handle pointer-down at surface-local pixel coordinates.
    ///
    /// `pick(x, y)` returns the model-space point under the pointer, or
    /// `None` when the ray misses the model. In Mark mode a pick near an
    /// existing marker selects it and begins a drag; otherwise a marker is
    /// created at the (clamped) picked point and dragged.
    pub fn on_pointer_down(
        &mut self,
        engine: &mut LesionMarkerEngine,
        x: f32,
        y: f32,
        pick: &dyn Fn(f32, f32) -> Option<Vec3>,
    ) {
        if self.mode != InteractionMode::Mark {
            return;
        }
        let Some(point) = pick(x, y) else {
            return;
        };

        if let Some(id) = engine.nearest_within(point, self.config.pick_radius) {
            engine.select(&id);
            self.drag = Some(id);
        } else {
            let id = engine.create(clamp_position(point), self.severity);
            self.drag = Some(id);
        }
    }

    /// Handle pointer movement. During a drag, each pick that lands on the
    /// model moves the dragged marker; picks that miss leave it in place.
    pub fn on_pointer_move(
        &mut self,
        engine: &mut LesionMarkerEngine,
        x: f32,
        y: f32,
        pick: &dyn Fn(f32, f32) -> Option<Vec3>,
    ) {
        if let Some(id) = &self.drag {
            if let Some(point) = pick(x, y) {
                engine.move_marker(id, clamp_position(point));
            }
        }
    }

    /// Handle pointer-up: end the drag.
    pub fn on_pointer_up(&mut self) {
        if let Some(id) = self.drag.take() {
            debug!("viewport: drag ended for {id}");
        }
    }

    /// Whether a marker drag is in flight.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
