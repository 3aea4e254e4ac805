//! Named Views
//!
//! The four fixed orthogonal projections of canonical model space onto a 2D
//! canvas: two sagittal variants (mirror images of each other), a coronal
//! view, and a posterior view. The axis mapping per view is the load-bearing
//! contract of the whole crate -- a marker is stored once in 3D and every
//! rendered view derives its pixel position through [`ViewKind::project`].
//!
//! Each view can observe exactly two model axes. The third (the depth axis)
//! cannot be recovered from a 2D click; [`ViewKind::unproject`] carries it
//! over from a prior position instead. This is the documented lossy contract,
//! not a defect: `project(unproject(project(p)))` is stable on the visible
//! axes while the depth axis follows whatever `previous` supplied.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::bounds::CanvasBounds;

// ============================================================================
// AXES
// ============================================================================

/// A model-space axis. Returned by [`ViewKind::depth_axis`] to name the one
/// axis a given view cannot observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

// ============================================================================
// VIEW KIND
// ============================================================================

/// One of the four fixed orthogonal views.
///
/// The variant is a closed tag: both projection directions match on it
/// exhaustively, so adding a view is a compile-checked change in both
/// `project` and `unproject`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    /// Primary sagittal view: +z to the right, +y up. Depth axis: x.
    SagittalPrimary,
    /// Mirrored sagittal view: +z to the left, +y up. Depth axis: x.
    SagittalMirrored,
    /// Coronal (anterior) view: +x to the right, +y up. Depth axis: z.
    Coronal,
    /// Posterior view: +x to the left, +y up. Depth axis: z.
    Posterior,
}

impl ViewKind {
    /// All views, in display order. Engine operations that must keep every
    /// rendered surface consistent iterate over this.
    pub const ALL: [ViewKind; 4] = [
        ViewKind::SagittalPrimary,
        ViewKind::SagittalMirrored,
        ViewKind::Coronal,
        ViewKind::Posterior,
    ];

    /// Stable identifier, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::SagittalPrimary => "sagittal-primary",
            ViewKind::SagittalMirrored => "sagittal-mirrored",
            ViewKind::Coronal => "coronal",
            ViewKind::Posterior => "posterior",
        }
    }

    /// Human-readable title for view headers and report captions.
    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::SagittalPrimary => "Sagittal",
            ViewKind::SagittalMirrored => "Sagittal (mirrored)",
            ViewKind::Coronal => "Coronal",
            ViewKind::Posterior => "Posterior",
        }
    }

    /// Accent color (RGBA) used to frame this view in the UI and reports.
    pub fn color(&self) -> [f32; 4] {
        match self {
            ViewKind::SagittalPrimary => [0.31, 0.56, 0.86, 1.0],
            ViewKind::SagittalMirrored => [0.36, 0.72, 0.66, 1.0],
            ViewKind::Coronal => [0.85, 0.60, 0.29, 1.0],
            ViewKind::Posterior => [0.67, 0.45, 0.78, 1.0],
        }
    }

    /// The model axis this view cannot observe from a 2D click.
    pub fn depth_axis(&self) -> Axis {
        match self {
            ViewKind::SagittalPrimary | ViewKind::SagittalMirrored => Axis::X,
            ViewKind::Coronal | ViewKind::Posterior => Axis::Z,
        }
    }

    // ========================================================================
    // PROJECTION
    // ========================================================================

    /// Project a canonical 3D position into this view's pixel space.
    ///
    /// | view              | x(px)                 | y(px)                 |
    /// |-------------------|-----------------------|-----------------------|
    /// | sagittal-primary  | center_x + z * scale  | center_y - y * scale  |
    /// | sagittal-mirrored | center_x - z * scale  | center_y - y * scale  |
    /// | coronal           | center_x + x * scale  | center_y - y * scale  |
    /// | posterior         | center_x - x * scale  | center_y - y * scale  |
    ///
    /// `bounds` must be renderable; see [`CanvasBounds::is_renderable`].
    pub fn project(&self, p: Vec3, bounds: &CanvasBounds) -> Vec2 {
        let (cx, cy, s) = (bounds.center_x, bounds.center_y, bounds.scale);
        match self {
            ViewKind::SagittalPrimary => Vec2::new(cx + p.z * s, cy - p.y * s),
            ViewKind::SagittalMirrored => Vec2::new(cx - p.z * s, cy - p.y * s),
            ViewKind::Coronal => Vec2::new(cx + p.x * s, cy - p.y * s),
            ViewKind::Posterior => Vec2::new(cx - p.x * s, cy - p.y * s),
        }
    }

    /// Recover a canonical 3D position from a pixel position in this view.
    ///
    /// The two axes this view can observe are inverted exactly from the
    /// projection above. The depth axis is taken from `previous` (0.0 when
    /// `None`): a click can never supply it, so prior state must.
    pub fn unproject(&self, px: Vec2, bounds: &CanvasBounds, previous: Option<Vec3>) -> Vec3 {
        let (cx, cy, s) = (bounds.center_x, bounds.center_y, bounds.scale);
        let prev = previous.unwrap_or(Vec3::ZERO);
        let y = (cy - px.y) / s;
        match self {
            ViewKind::SagittalPrimary => Vec3::new(prev.x, y, (px.x - cx) / s),
            ViewKind::SagittalMirrored => Vec3::new(prev.x, y, (cx - px.x) / s),
            ViewKind::Coronal => Vec3::new((px.x - cx) / s, y, prev.z),
            ViewKind::Posterior => Vec3::new((cx - px.x) / s, y, prev.z),
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

// ============================================================================
// TESTS
// ============================================================================
