//! Canvas Bounds
//!
//! The per-render pixel-space frame (center + scale) used to convert between
//! canonical model coordinates and canvas pixels. Recomputed on every resize
//! or zoom change, never persisted.

/// Divisor applied to the smaller canvas dimension when deriving the base
/// scale: at zoom 1.0 the visible range spans 5 model units across the
/// shorter axis, so the +-2.0 model cube fits with a margin.
const SCALE_DIVISOR: f32 = 5.0;

/// Pixel-space frame for one rendered view.
///
/// `center_x`/`center_y` are always the canvas midpoint; `scale` is the
/// pixels-per-model-unit factor. Derived, ephemeral, per-render data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Horizontal canvas midpoint in pixels.
    pub center_x: f32,
    /// Vertical canvas midpoint in pixels.
    pub center_y: f32,
    /// Pixels per model unit: `min(width, height) / 5 * zoom`.
    pub scale: f32,
}

impl CanvasBounds {
    /// Derive the frame for a canvas of `width` x `height` pixels at the
    /// given zoom level.
    ///
    /// Deterministic, no hidden state. Callers own the precondition that
    /// `width`, `height`, and `zoom` are positive; a frame computed from
    /// degenerate inputs is unusable and must be caught with
    /// [`CanvasBounds::is_renderable`] before any projection or interaction
    /// runs through it.
    pub fn compute(width: f32, height: f32, zoom: f32) -> Self {
        Self {
            width,
            height,
            center_x: width / 2.0,
            center_y: height / 2.0,
            scale: (width.min(height) / SCALE_DIVISOR) * zoom,
        }
    }

    /// Precondition check for rendering and interaction: the frame is usable
    /// iff both dimensions and the derived scale are positive. Call sites
    /// skip the event or the render pass when this is false.
    pub fn is_renderable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.scale > 0.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
