//! Canonical Model Space
//!
//! Defines the fixed 3D coordinate system every lesion position is stored in,
//! independent of any view or canvas. The anatomical model occupies a cube of
//! +-2.0 units per axis; positions derived from pointer input are clamped back
//! into this cube before they reach the marker engine.
//!
//! Pure functions only, no state.

use glam::Vec3;

/// Half-extent of the anatomical model on each axis. The model occupies
/// `[-MODEL_HALF_EXTENT, MODEL_HALF_EXTENT]` in x, y, and z.
pub const MODEL_HALF_EXTENT: f32 = 2.0;

/// Returns true iff every axis of `p` lies within the model cube (inclusive).
pub fn is_within_model_bounds(p: Vec3) -> bool {
    p.x.abs() <= MODEL_HALF_EXTENT && p.y.abs() <= MODEL_HALF_EXTENT && p.z.abs() <= MODEL_HALF_EXTENT
}

/// Clamp a position per-axis into the model cube. Total function: any finite
/// input produces a valid in-bounds position.
pub fn clamp_position(p: Vec3) -> Vec3 {
    p.clamp(
        Vec3::splat(-MODEL_HALF_EXTENT),
        Vec3::splat(MODEL_HALF_EXTENT),
    )
}

// ============================================================================
// TESTS
// ============================================================================
